//! Users Domain
//!
//! A user aggregate made of the user itself, an optional address, a
//! required identity document, and any number of phones.
//!
//! # Features
//!
//! - Declarative validation of create and update requests
//! - Patch semantics that never blank out required fields
//! - Atomic updates with phone reconciliation (insert / update / delete)
//! - PostgreSQL (SeaORM) and in-memory repositories
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← CreateUser / UpdateUser use cases
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Port (trait) + Postgres and in-memory adapters
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, patches, validation rules
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{InMemoryUserRepository, UserService};
//! use domain_users::models::{CreateUser, DocumentProps};
//!
//! # async fn run() -> domain_users::UserResult<()> {
//! let service = UserService::new(InMemoryUserRepository::new());
//!
//! let user = service
//!     .create_user(CreateUser {
//!         email: "kawa@example.com".to_string(),
//!         password_hash: "hashed".to_string(),
//!         name: "kawa".to_string(),
//!         birth_date: None,
//!         profile_picture: None,
//!         address: None,
//!         phones: Vec::new(),
//!         document: DocumentProps {
//!             rg: "0005".to_string(),
//!             cpf: "70119006405".to_string(),
//!             other_info: None,
//!         },
//!     })
//!     .await?;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod reconcile;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{Address, CreateUser, Document, Phone, UpdateUser, User};
pub use postgres::PgUserRepository;
pub use reconcile::{PhonePlan, plan_phones};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
