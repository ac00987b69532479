use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::Document;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub rg: String,
    pub cpf: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub other_info: Option<String>,
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

impl From<Model> for Document {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            rg: model.rg,
            cpf: model.cpf,
            other_info: model.other_info,
        }
    }
}

pub fn active_model(document: &Document, user_id: Uuid) -> ActiveModel {
    ActiveModel {
        id: Set(document.id),
        user_id: Set(user_id),
        rg: Set(document.rg.clone()),
        cpf: Set(document.cpf.clone()),
        other_info: Set(document.other_info.clone()),
    }
}
