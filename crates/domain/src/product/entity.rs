//! Product entity.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Money,
}

impl Product {
    /// Creates a product, rejecting blank ids/names and negative prices.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
    ) -> Result<Self, DomainError> {
        let product = Self {
            id: id.into(),
            name: name.into(),
            price,
        };
        product.validate()?;
        Ok(product)
    }

    /// Rebuilds a product from previously stored state.
    pub fn restore(id: ProductId, name: String, price: Money) -> Self {
        Self { id, name, price }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_blank() {
            return Err(DomainError::IdRequired);
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::NameRequired);
        }
        if self.price.is_negative() {
            return Err(DomainError::NegativePrice);
        }
        Ok(())
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::NameRequired);
        }
        self.name = name;
        Ok(())
    }

    pub fn change_price(&mut self, price: Money) -> Result<(), DomainError> {
        if price.is_negative() {
            return Err(DomainError::NegativePrice);
        }
        self.price = price;
        Ok(())
    }
}

impl Aggregate for Product {
    type Id = ProductId;

    const NAME: &'static str = "Product";

    fn id(&self) -> &ProductId {
        &self.id
    }
}
