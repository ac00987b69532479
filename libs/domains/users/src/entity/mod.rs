//! SeaORM entities for the user aggregate tables.
//!
//! `users` owns one optional `addresses` row, one `documents` row, and any
//! number of `phones` rows. Every child row is deleted with its user.

pub mod address;
pub mod document;
pub mod phone;
pub mod user;
