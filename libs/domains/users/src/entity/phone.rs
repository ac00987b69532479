use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::Phone;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "phones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub number: String,
    pub is_primary: bool,
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

impl From<Model> for Phone {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            number: model.number,
            is_primary: model.is_primary,
        }
    }
}

pub fn active_model(phone: &Phone, user_id: Uuid) -> ActiveModel {
    ActiveModel {
        id: Set(phone.id),
        user_id: Set(user_id),
        number: Set(phone.number.clone()),
        is_primary: Set(phone.is_primary),
    }
}
