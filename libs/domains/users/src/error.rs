use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Map a write failure, turning a unique violation on `users.email`
    /// into [`UserError::DuplicateEmail`].
    pub(crate) fn from_write(err: DbErr, email: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("email") => {
                UserError::DuplicateEmail(email.to_string())
            }
            _ => err.into(),
        }
    }

    /// Build a [`UserError::Validation`] from collected `field: message` lines
    pub(crate) fn validation(mut messages: Vec<String>) -> Self {
        messages.sort();
        messages.dedup();
        UserError::Validation(messages.join("; "))
    }
}

impl From<DbErr> for UserError {
    fn from(err: DbErr) -> Self {
        UserError::Internal(format!("Database error: {}", err))
    }
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_messages("", &errors, &mut messages);
        UserError::validation(messages)
    }
}

/// Flatten nested validator output into `path: message` lines,
/// e.g. `document.cpf: CPF must have at least 11 characters`.
pub(crate) fn collect_messages(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", error.code));
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}
