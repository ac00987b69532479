//! Entities and request DTOs.
//!
//! `*Props` carry the fields needed to create an entity and are validated on
//! construction. `*Patch` types are partial updates. `with_id` constructors
//! rehydrate persisted rows without re-validating them.

mod address;
mod document;
mod phone;
mod user;

pub use address::{Address, AddressPatch, AddressProps};
pub use document::{Document, DocumentPatch, DocumentProps};
pub use phone::{Phone, PhoneInput, PhonePatch, PhoneProps};
pub use user::{CreateUser, UpdateUser, User};
