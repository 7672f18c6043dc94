//! Customer entity.

use common::CustomerId;
use serde::{Deserialize, Serialize};

use super::Address;
use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// A customer with an optional address, an activation flag and a reward
/// points balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    address: Option<Address>,
    active: bool,
    reward_points: u32,
}

impl Customer {
    /// Creates an inactive customer without address or reward points.
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>) -> Result<Self, DomainError> {
        let customer = Self {
            id: id.into(),
            name: name.into(),
            address: None,
            active: false,
            reward_points: 0,
        };
        customer.validate()?;
        Ok(customer)
    }

    /// Rebuilds a customer from previously stored state.
    pub fn restore(
        id: CustomerId,
        name: String,
        address: Option<Address>,
        active: bool,
        reward_points: u32,
    ) -> Self {
        Self {
            id,
            name,
            address,
            active,
            reward_points,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.id.is_blank() {
            return Err(DomainError::IdRequired);
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::NameRequired);
        }
        Ok(())
    }

    pub fn id(&self) -> &CustomerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reward_points(&self) -> u32 {
        self.reward_points
    }

    /// Renames the customer. The previous name is kept if the new one is blank.
    pub fn change_name(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::NameRequired);
        }
        self.name = name;
        Ok(())
    }

    pub fn change_address(&mut self, address: Address) {
        self.address = Some(address);
    }

    /// Activates the customer. An address must be on file.
    pub fn activate(&mut self) -> Result<(), DomainError> {
        if self.address.is_none() {
            return Err(DomainError::AddressRequiredToActivate);
        }
        self.active = true;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Adds reward points, saturating at `u32::MAX`.
    pub fn add_reward_points(&mut self, points: u32) {
        self.reward_points = self.reward_points.saturating_add(points);
    }
}

impl Aggregate for Customer {
    type Id = CustomerId;

    const NAME: &'static str = "Customer";

    fn id(&self) -> &CustomerId {
        &self.id
    }
}
