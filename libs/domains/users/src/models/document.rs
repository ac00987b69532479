use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::address::non_empty;
use crate::error::UserResult;

/// Identity documents (RG and CPF); every user has exactly one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub rg: String,
    pub cpf: String,
    pub other_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DocumentProps {
    #[validate(length(min = 1, message = "RG is required"))]
    pub rg: String,
    #[validate(length(min = 11, message = "CPF must have at least 11 characters"))]
    pub cpf: String,
    #[serde(default)]
    pub other_info: Option<String>,
}

/// Partial document update. No length rules; empty strings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DocumentPatch {
    pub rg: Option<String>,
    pub cpf: Option<String>,
    pub other_info: Option<String>,
}

impl Document {
    pub fn create(props: DocumentProps) -> UserResult<Self> {
        props.validate()?;
        Ok(Self::with_id(props, Uuid::now_v7()))
    }

    pub fn with_id(props: DocumentProps, id: Uuid) -> Self {
        Self {
            id,
            rg: props.rg,
            cpf: props.cpf,
            other_info: props.other_info,
        }
    }

    pub fn update(&mut self, patch: DocumentPatch) -> UserResult<()> {
        patch.validate()?;
        self.apply(patch);
        Ok(())
    }

    pub(crate) fn apply(&mut self, patch: DocumentPatch) {
        if let Some(rg) = non_empty(patch.rg) {
            self.rg = rg;
        }
        if let Some(cpf) = non_empty(patch.cpf) {
            self.cpf = cpf;
        }
        if let Some(other_info) = non_empty(patch.other_info) {
            self.other_info = Some(other_info);
        }
    }
}
