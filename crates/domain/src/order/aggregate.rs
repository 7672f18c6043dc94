//! Order aggregate implementation.

use common::{CustomerId, Money, OrderId, OrderItemId};
use serde::{Deserialize, Serialize};

use super::OrderItem;
use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// Order aggregate root.
///
/// The total is never stored on the entity; [`Order::total`] sums the items
/// every time it is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,

    /// Customer who placed the order. A reference, not ownership.
    customer_id: CustomerId,

    /// Items in insertion order.
    items: Vec<OrderItem>,
}

impl Order {
    /// Creates an order. Id, customer id and at least one item are required.
    pub fn new(
        id: impl Into<OrderId>,
        customer_id: impl Into<CustomerId>,
        items: Vec<OrderItem>,
    ) -> Result<Self, DomainError> {
        let order = Self {
            id: id.into(),
            customer_id: customer_id.into(),
            items,
        };
        order.validate()?;
        Ok(order)
    }

    /// Rebuilds an order from previously stored state.
    pub fn restore(id: OrderId, customer_id: CustomerId, items: Vec<OrderItem>) -> Self {
        Self {
            id,
            customer_id,
            items,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_blank() {
            return Err(DomainError::IdRequired);
        }
        if self.customer_id.is_blank() {
            return Err(DomainError::CustomerIdRequired);
        }
        if self.items.is_empty() {
            return Err(DomainError::ItemsRequired);
        }
        for (position, item) in self.items.iter().enumerate() {
            if self.items[..position].iter().any(|seen| seen.id() == item.id()) {
                return Err(DomainError::DuplicateItem(item.id().clone()));
            }
        }
        Ok(())
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Sum of price * quantity over all items.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::total).sum()
    }

    /// Appends an item. Item ids must be unique within the order.
    pub fn add_item(&mut self, item: OrderItem) -> Result<(), DomainError> {
        if self.items.iter().any(|existing| existing.id() == item.id()) {
            return Err(DomainError::DuplicateItem(item.id().clone()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Removes an item by id. An order cannot lose its last item.
    pub fn remove_item(&mut self, item_id: &OrderItemId) -> Result<OrderItem, DomainError> {
        let position = self
            .items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or_else(|| DomainError::ItemNotFound(item_id.clone()))?;

        if self.items.len() == 1 {
            return Err(DomainError::ItemsRequired);
        }

        Ok(self.items.remove(position))
    }
}

impl Aggregate for Order {
    type Id = OrderId;

    const NAME: &'static str = "Order";

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Orders are matched on both id and customer id when updated.
    fn same_key(&self, stored: &Self) -> bool {
        self.id == stored.id && self.customer_id == stored.customer_id
    }
}
