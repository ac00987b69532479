use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::Address;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub street: String,
    pub number: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Address {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            street: model.street,
            number: model.number,
            postal_code: model.postal_code,
            city: model.city,
            country: model.country,
        }
    }
}

pub fn active_model(address: &Address, user_id: Uuid) -> ActiveModel {
    ActiveModel {
        id: Set(address.id),
        user_id: Set(user_id),
        street: Set(address.street.clone()),
        number: Set(address.number.clone()),
        postal_code: Set(address.postal_code.clone()),
        city: Set(address.city.clone()),
        country: Set(address.country.clone()),
    }
}
