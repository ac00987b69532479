use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use super::{address, document, phone};
use crate::models::User;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub birth_date: Option<Date>,
    #[sea_orm(column_type = "Text", nullable)]
    pub profile_picture: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::address::Entity")]
    Address,
    #[sea_orm(has_one = "super::document::Entity")]
    Document,
    #[sea_orm(has_many = "super::phone::Entity")]
    Phone,
}

impl Related<address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Address.def()
    }
}

impl Related<document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl Related<phone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phone.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the aggregate from its rows. Stored rows are trusted,
    /// so nothing is re-validated.
    pub fn into_user(
        self,
        address: Option<address::Model>,
        document: document::Model,
        phones: Vec<phone::Model>,
    ) -> User {
        User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            name: self.name,
            birth_date: self.birth_date,
            profile_picture: self.profile_picture,
            address: address.map(Into::into),
            phones: phones.into_iter().map(Into::into).collect(),
            document: document.into(),
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}

// Every column is set; inserts and full-row updates share this
impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            name: Set(user.name.clone()),
            birth_date: Set(user.birth_date),
            profile_picture: Set(user.profile_picture.clone()),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
