use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::address::non_empty;
use crate::error::UserResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub id: Uuid,
    pub number: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PhoneProps {
    #[validate(length(min = 10, message = "Phone number must have at least 10 digits"))]
    pub number: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Phone entry in an update request.
///
/// An `id` that matches a stored phone updates it in place; any other
/// entry is inserted. Stored phones missing from the list are deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PhoneInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(min = 10, message = "Phone number must have at least 10 digits"))]
    pub number: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PhonePatch {
    #[validate(length(min = 10, message = "Phone number must have at least 10 digits"))]
    pub number: Option<String>,
    pub is_primary: Option<bool>,
}

impl Phone {
    pub fn create(props: PhoneProps) -> UserResult<Self> {
        props.validate()?;
        Ok(Self::with_id(props, Uuid::now_v7()))
    }

    pub fn with_id(props: PhoneProps, id: Uuid) -> Self {
        Self {
            id,
            number: props.number,
            is_primary: props.is_primary,
        }
    }

    /// Validate an update entry, keeping its id or generating one
    pub fn from_input(input: PhoneInput) -> UserResult<Self> {
        input.validate()?;
        Ok(Self {
            id: input.id.unwrap_or_else(Uuid::now_v7),
            number: input.number,
            is_primary: input.is_primary,
        })
    }

    pub fn update(&mut self, patch: PhonePatch) -> UserResult<()> {
        patch.validate()?;

        if let Some(number) = non_empty(patch.number) {
            self.number = number;
        }
        if let Some(is_primary) = patch.is_primary {
            self.is_primary = is_primary;
        }
        Ok(())
    }
}
