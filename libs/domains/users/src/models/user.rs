use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

use super::address::{Address, AddressPatch, AddressProps, non_empty};
use super::document::{Document, DocumentPatch, DocumentProps};
use super::phone::{Phone, PhoneInput, PhoneProps};
use crate::error::{UserError, UserResult, collect_messages};

/// User aggregate root
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Stored as supplied by the caller, never exposed when serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub profile_picture: Option<String>,
    pub address: Option<Address>,
    pub phones: Vec<Phone>,
    pub document: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password_hash: String,
    #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub address: Option<AddressProps>,
    #[serde(default)]
    #[validate(nested)]
    pub phones: Vec<PhoneProps>,
    #[validate(nested)]
    pub document: DocumentProps,
}

/// DTO for updating an existing user; every field is optional
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password_hash: Option<String>,
    #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub profile_picture: Option<String>,
    #[validate(nested)]
    pub address: Option<AddressPatch>,
    /// Replaces the whole phone list when present
    pub phones: Option<Vec<PhoneInput>>,
    #[validate(nested)]
    pub document: Option<DocumentPatch>,
}

impl CreateUser {
    /// Field rules plus the cross-field phone checks
    pub fn check(&self) -> UserResult<()> {
        let mut messages = Vec::new();
        if let Err(errors) = self.validate() {
            collect_messages("", &errors, &mut messages);
        }
        check_primary(self.phones.iter().map(|p| p.is_primary), &mut messages);

        finish(messages)
    }
}

impl UpdateUser {
    pub fn check(&self) -> UserResult<()> {
        let mut messages = Vec::new();
        if let Err(errors) = self.validate() {
            collect_messages("", &errors, &mut messages);
        }

        if let Some(phones) = &self.phones {
            for (index, phone) in phones.iter().enumerate() {
                if let Err(errors) = phone.validate() {
                    collect_messages(&format!("phones[{}]", index), &errors, &mut messages);
                }
            }
            check_primary(phones.iter().map(|p| p.is_primary), &mut messages);

            let mut seen = HashSet::new();
            for id in phones.iter().filter_map(|p| p.id) {
                if !seen.insert(id) {
                    messages.push(format!("phones: Duplicate phone id {}", id));
                }
            }
        }

        finish(messages)
    }
}

fn check_primary(flags: impl Iterator<Item = bool>, messages: &mut Vec<String>) {
    if flags.filter(|primary| *primary).count() > 1 {
        messages.push("phones: Only one phone can be primary".to_string());
    }
}

fn finish(messages: Vec<String>) -> UserResult<()> {
    if messages.is_empty() {
        Ok(())
    } else {
        Err(UserError::validation(messages))
    }
}

impl User {
    /// Validate `input` (nested entities included) and build a new aggregate
    pub fn create(input: CreateUser) -> UserResult<Self> {
        input.check()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::now_v7(),
            email: input.email,
            password_hash: input.password_hash,
            name: input.name,
            birth_date: input.birth_date,
            profile_picture: input.profile_picture,
            address: input
                .address
                .map(|props| Address::with_id(props, Uuid::now_v7())),
            phones: input
                .phones
                .into_iter()
                .map(|props| Phone::with_id(props, Uuid::now_v7()))
                .collect(),
            document: Document::with_id(input.document, Uuid::now_v7()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch. The patch is fully validated first, so on error
    /// the user is left untouched.
    pub fn update(&mut self, patch: UpdateUser) -> UserResult<()> {
        patch.check()?;

        let new_address = match (&self.address, &patch.address) {
            (None, Some(address)) => Some(Address::with_id(
                AddressProps::try_from(address.clone())?,
                Uuid::now_v7(),
            )),
            _ => None,
        };

        let phones = patch
            .phones
            .map(|inputs| {
                inputs
                    .into_iter()
                    .map(Phone::from_input)
                    .collect::<UserResult<Vec<_>>>()
            })
            .transpose()?;

        if let Some(email) = non_empty(patch.email) {
            self.email = email;
        }
        if let Some(password_hash) = non_empty(patch.password_hash) {
            self.password_hash = password_hash;
        }
        if let Some(name) = non_empty(patch.name) {
            self.name = name;
        }
        if let Some(birth_date) = patch.birth_date {
            self.birth_date = Some(birth_date);
        }
        if let Some(profile_picture) = non_empty(patch.profile_picture) {
            self.profile_picture = Some(profile_picture);
        }

        if let Some(created) = new_address {
            self.address = Some(created);
        } else if let (Some(address_patch), Some(existing)) = (patch.address, self.address.as_mut()) {
            existing.apply(address_patch);
        }

        if let Some(document_patch) = patch.document {
            self.document.apply(document_patch);
        }
        if let Some(phones) = phones {
            self.phones = phones;
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn primary_phone(&self) -> Option<&Phone> {
        self.phones.iter().find(|p| p.is_primary)
    }
}
