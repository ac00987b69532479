use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};

/// Postal address owned by a user (at most one per user)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub street: String,
    pub number: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

/// Input for a new address; every field is required
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AddressProps {
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "Number is required"))]
    pub number: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
}

/// Partial address update; absent fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AddressPatch {
    #[validate(length(min = 1, message = "Street cannot be empty"))]
    pub street: Option<String>,
    #[validate(length(min = 1, message = "Number cannot be empty"))]
    pub number: Option<String>,
    #[validate(length(min = 1, message = "Postal code cannot be empty"))]
    pub postal_code: Option<String>,
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: Option<String>,
    #[validate(length(min = 1, message = "Country cannot be empty"))]
    pub country: Option<String>,
}

impl Address {
    /// Validate `props` and assign a fresh id
    pub fn create(props: AddressProps) -> UserResult<Self> {
        props.validate()?;
        Ok(Self::with_id(props, Uuid::now_v7()))
    }

    /// Rehydrate a persisted address; no validation
    pub fn with_id(props: AddressProps, id: Uuid) -> Self {
        Self {
            id,
            street: props.street,
            number: props.number,
            postal_code: props.postal_code,
            city: props.city,
            country: props.country,
        }
    }

    pub fn update(&mut self, patch: AddressPatch) -> UserResult<()> {
        patch.validate()?;
        self.apply(patch);
        Ok(())
    }

    /// Apply an already validated patch
    pub(crate) fn apply(&mut self, patch: AddressPatch) {
        if let Some(street) = non_empty(patch.street) {
            self.street = street;
        }
        if let Some(number) = non_empty(patch.number) {
            self.number = number;
        }
        if let Some(postal_code) = non_empty(patch.postal_code) {
            self.postal_code = postal_code;
        }
        if let Some(city) = non_empty(patch.city) {
            self.city = city;
        }
        if let Some(country) = non_empty(patch.country) {
            self.country = country;
        }
    }
}

/// A user without an address can only gain one from a complete patch.
impl TryFrom<AddressPatch> for AddressProps {
    type Error = UserError;

    fn try_from(patch: AddressPatch) -> Result<Self, Self::Error> {
        let props = AddressProps {
            street: patch.street.unwrap_or_default(),
            number: patch.number.unwrap_or_default(),
            postal_code: patch.postal_code.unwrap_or_default(),
            city: patch.city.unwrap_or_default(),
            country: patch.country.unwrap_or_default(),
        };
        props.validate()?;
        Ok(props)
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
