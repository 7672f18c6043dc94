//! Value objects for the order domain.

use common::{Money, OrderItemId, ProductId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A line item in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    id: OrderItemId,
    name: String,
    price: Money,
    product_id: ProductId,
    quantity: u32,
}

impl OrderItem {
    /// Creates a new order item. Quantity must be positive.
    pub fn new(
        id: impl Into<OrderItemId>,
        name: impl Into<String>,
        price: Money,
        product_id: impl Into<ProductId>,
        quantity: u32,
    ) -> Result<Self, DomainError> {
        let item = Self {
            id: id.into(),
            name: name.into(),
            price,
            product_id: product_id.into(),
            quantity,
        };
        item.validate()?;
        Ok(item)
    }

    /// Rebuilds an item from previously stored state.
    pub fn restore(
        id: OrderItemId,
        name: String,
        price: Money,
        product_id: ProductId,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            name,
            price,
            product_id,
            quantity,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_blank() {
            return Err(DomainError::IdRequired);
        }
        if self.quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        if self.price.is_negative() {
            return Err(DomainError::NegativePrice);
        }
        Ok(())
    }

    pub fn id(&self) -> &OrderItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price.
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns price * quantity.
    pub fn total(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}
