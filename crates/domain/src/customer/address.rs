//! Customer address value object.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Postal address of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    street: String,
    number: u32,
    zip: String,
    city: String,
}

impl Address {
    /// Creates an address, rejecting blank text fields.
    pub fn new(
        street: impl Into<String>,
        number: u32,
        zip: impl Into<String>,
        city: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let address = Self {
            street: street.into(),
            number,
            zip: zip.into(),
            city: city.into(),
        };
        address.validate()?;
        Ok(address)
    }

    /// Rebuilds an address from previously stored state.
    pub fn restore(street: String, number: u32, zip: String, city: String) -> Self {
        Self {
            street,
            number,
            zip,
            city,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("Street", &self.street),
            ("Zip", &self.zip),
            ("City", &self.city),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::AddressFieldRequired { field });
            }
        }
        Ok(())
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn zip(&self) -> &str {
        &self.zip
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.street, self.number, self.zip, self.city
        )
    }
}
