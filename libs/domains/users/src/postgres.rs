use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{address, document, phone, user},
    error::{UserError, UserResult},
    models::User,
    reconcile::plan_phones,
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load address, document, and phones for a user row
    async fn load<C: ConnectionTrait>(conn: &C, model: user::Model) -> UserResult<User> {
        let address = address::Entity::find()
            .filter(address::Column::UserId.eq(model.id))
            .one(conn)
            .await?;

        let document = document::Entity::find()
            .filter(document::Column::UserId.eq(model.id))
            .one(conn)
            .await?
            .ok_or_else(|| UserError::Internal(format!("User {} has no document", model.id)))?;

        let phones = phone::Entity::find()
            .filter(phone::Column::UserId.eq(model.id))
            .order_by_asc(phone::Column::Id)
            .all(conn)
            .await?;

        Ok(model.into_user(address, document, phones))
    }

    async fn reload(&self, id: Uuid) -> UserResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| UserError::Internal(format!("User {} vanished after write", id)))
    }

    async fn upsert_address<C: ConnectionTrait>(conn: &C, user: &User) -> UserResult<()> {
        match &user.address {
            Some(address) => {
                address::Entity::insert(address::active_model(address, user.id))
                    .on_conflict(
                        OnConflict::column(address::Column::UserId)
                            .update_columns([
                                address::Column::Street,
                                address::Column::Number,
                                address::Column::PostalCode,
                                address::Column::City,
                                address::Column::Country,
                            ])
                            .to_owned(),
                    )
                    .exec_without_returning(conn)
                    .await?;
            }
            None => {
                address::Entity::delete_many()
                    .filter(address::Column::UserId.eq(user.id))
                    .exec(conn)
                    .await?;
            }
        }
        Ok(())
    }

    async fn reconcile_phones<C: ConnectionTrait>(conn: &C, user: &User) -> UserResult<()> {
        let persisted: Vec<Uuid> = phone::Entity::find()
            .select_only()
            .column(phone::Column::Id)
            .filter(phone::Column::UserId.eq(user.id))
            .into_tuple()
            .all(conn)
            .await?;

        let plan = plan_phones(&persisted, &user.phones);
        if plan.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            user_id = %user.id,
            inserted = plan.insert.len(),
            updated = plan.update.len(),
            deleted = plan.delete.len(),
            "Reconciling phones"
        );

        if !plan.delete.is_empty() {
            phone::Entity::delete_many()
                .filter(phone::Column::UserId.eq(user.id))
                .filter(phone::Column::Id.is_in(plan.delete))
                .exec(conn)
                .await?;
        }

        for existing in &plan.update {
            phone::active_model(existing, user.id).update(conn).await?;
        }

        for added in &plan.insert {
            phone::active_model(added, user.id).insert(conn).await?;
        }

        Ok(())
    }

    async fn upsert_document<C: ConnectionTrait>(conn: &C, user: &User) -> UserResult<()> {
        document::Entity::insert(document::active_model(&user.document, user.id))
            .on_conflict(
                OnConflict::column(document::Column::Id)
                    .update_columns([
                        document::Column::Rg,
                        document::Column::Cpf,
                        document::Column::OtherInfo,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let txn = self.db.begin().await?;

        user::ActiveModel::from(&user)
            .insert(&txn)
            .await
            .map_err(|e| UserError::from_write(e, &user.email))?;

        if let Some(address) = &user.address {
            address::active_model(address, user.id).insert(&txn).await?;
        }

        document::active_model(&user.document, user.id)
            .insert(&txn)
            .await?;

        for added in &user.phones {
            phone::active_model(added, user.id).insert(&txn).await?;
        }

        txn.commit().await?;

        tracing::info!(user_id = %user.id, phones = user.phones.len(), "Created user");
        self.reload(user.id).await
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let txn = self.db.begin().await?;

        let mut row = user::ActiveModel::from(&user);
        row.created_at = sea_orm::ActiveValue::NotSet;

        row.update(&txn).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => UserError::NotFound(user.id),
            other => UserError::from_write(other, &user.email),
        })?;

        Self::upsert_address(&txn, &user).await?;
        Self::reconcile_phones(&txn, &user).await?;
        Self::upsert_document(&txn, &user).await?;

        txn.commit().await?;

        tracing::info!(user_id = %user.id, "Updated user");
        self.reload(user.id).await
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        match user::Entity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(Self::load(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        match model {
            Some(model) => Ok(Some(Self::load(&self.db, model).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Statement, Value};
    use std::collections::BTreeMap;

    fn user_row(id: Uuid) -> user::Model {
        let now = Utc::now();
        user::Model {
            id,
            email: "kawa@example.com".to_string(),
            password_hash: "hash12".to_string(),
            name: "kawa".to_string(),
            birth_date: None,
            profile_picture: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn document_row(user_id: Uuid) -> document::Model {
        document::Model {
            id: Uuid::now_v7(),
            user_id,
            rg: "0005".to_string(),
            cpf: "70119006405".to_string(),
            other_info: None,
        }
    }

    fn phone_row(user_id: Uuid, number: &str) -> phone::Model {
        phone::Model {
            id: Uuid::now_v7(),
            user_id,
            number: number.to_string(),
            is_primary: false,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let found = repo.find_by_id(Uuid::now_v7()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_loads_aggregate() {
        let id = Uuid::now_v7();
        let document = document_row(id);
        let first = phone_row(id, "84999221557");
        let second = phone_row(id, "84933334444");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row(id)]])
            .append_query_results([Vec::<address::Model>::new()])
            .append_query_results([vec![document.clone()]])
            .append_query_results([vec![first.clone(), second.clone()]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert!(user.address.is_none());
        assert_eq!(user.document.id, document.id);
        assert_eq!(user.document.cpf, "70119006405");
        let numbers: Vec<_> = user.phones.iter().map(|p| p.number.as_str()).collect();
        assert_eq!(numbers, vec!["84999221557", "84933334444"]);
    }

    #[tokio::test]
    async fn test_missing_document_is_internal() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row(id)]])
            .append_query_results([Vec::<address::Model>::new()])
            .append_query_results([Vec::<document::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let result = repo.find_by_id(id).await;
        assert!(matches!(result, Err(UserError::Internal(_))));
    }

    #[tokio::test]
    async fn test_find_by_email_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let found = repo.find_by_email("nobody@example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = user_row(id).into_user(None, document_row(id), Vec::new());
        let result = repo.update(user).await;
        assert!(matches!(result, Err(UserError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_database_error_is_internal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        match repo.find_by_id(Uuid::now_v7()).await {
            Err(UserError::Internal(message)) => assert!(message.contains("connection reset")),
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    fn address_row(user_id: Uuid) -> address::Model {
        address::Model {
            id: Uuid::now_v7(),
            user_id,
            street: "Rua A".to_string(),
            number: "10".to_string(),
            postal_code: "59000-000".to_string(),
            city: "Natal".to_string(),
            country: "Brazil".to_string(),
        }
    }

    fn id_row(id: Uuid) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("id", Value::from(id))])
    }

    fn affected(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn logged_statements(db: DatabaseConnection) -> Vec<Statement> {
        db.into_transaction_log()
            .iter()
            .flat_map(|txn| txn.statements().to_vec())
            .collect()
    }

    fn position(statements: &[Statement], prefix: &str) -> usize {
        statements
            .iter()
            .position(|s| s.sql.starts_with(prefix))
            .unwrap_or_else(|| panic!("no statement starting with {}", prefix))
    }

    fn binds(statement: &Statement, value: Uuid) -> bool {
        statement
            .values
            .as_ref()
            .is_some_and(|values| values.0.contains(&Value::from(value)))
    }

    #[tokio::test]
    async fn test_create_writes_every_row_in_one_transaction() {
        let id = Uuid::now_v7();
        let address = address_row(id);
        let document = document_row(id);
        let phone = phone_row(id, "84999221557");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row(id)]])
            .append_query_results([vec![address.clone()]])
            .append_query_results([vec![document.clone()]])
            .append_query_results([vec![phone.clone()]])
            // reload
            .append_query_results([vec![user_row(id)]])
            .append_query_results([vec![address.clone()]])
            .append_query_results([vec![document.clone()]])
            .append_query_results([vec![phone.clone()]])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        let user = user_row(id).into_user(
            Some(address.clone()),
            document.clone(),
            vec![phone.clone()],
        );
        let created = repo.create(user).await.unwrap();
        assert_eq!(created.address.map(|a| a.id), Some(address.id));
        assert_eq!(created.phones.len(), 1);

        let log = db.into_transaction_log();
        let write = log
            .iter()
            .find(|txn| {
                txn.statements()
                    .iter()
                    .any(|s| s.sql.starts_with(r#"INSERT INTO "users""#))
            })
            .expect("user insert logged");
        let sql: Vec<&str> = write.statements().iter().map(|s| s.sql.as_str()).collect();

        for table in ["users", "addresses", "documents", "phones"] {
            let prefix = format!(r#"INSERT INTO "{}""#, table);
            assert!(
                sql.iter().any(|s| s.starts_with(&prefix)),
                "{} insert missing from the create transaction",
                table
            );
        }
    }

    #[tokio::test]
    async fn test_update_reconciles_phones_in_order() {
        let id = Uuid::now_v7();
        let document = document_row(id);
        let kept = phone_row(id, "84911112222");
        let added = phone_row(id, "84933334444");
        let dropped = Uuid::now_v7();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row(id)]])
            .append_query_results([vec![id_row(kept.id), id_row(dropped)]])
            .append_query_results([vec![kept.clone()]])
            .append_query_results([vec![added.clone()]])
            // reload
            .append_query_results([vec![user_row(id)]])
            .append_query_results([Vec::<address::Model>::new()])
            .append_query_results([vec![document.clone()]])
            .append_query_results([vec![kept.clone(), added.clone()]])
            // address delete, phone delete, document upsert
            .append_exec_results([affected(0), affected(1), affected(1)])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        let user = user_row(id).into_user(None, document, vec![kept.clone(), added.clone()]);
        let updated = repo.update(user).await.unwrap();
        let ids: Vec<Uuid> = updated.phones.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![kept.id, added.id]);

        let statements = logged_statements(db);
        let update_user = position(&statements, r#"UPDATE "users""#);
        let delete_address = position(&statements, r#"DELETE FROM "addresses""#);
        let lookup = position(&statements, r#"SELECT "phones"."id" FROM "phones""#);
        let delete_phones = position(&statements, r#"DELETE FROM "phones""#);
        let update_phone = position(&statements, r#"UPDATE "phones""#);
        let insert_phone = position(&statements, r#"INSERT INTO "phones""#);
        let upsert_document = position(&statements, r#"INSERT INTO "documents""#);

        assert!(update_user < delete_address);
        assert!(delete_address < lookup);
        assert!(lookup < delete_phones);
        assert!(delete_phones < update_phone);
        assert!(update_phone < insert_phone);
        assert!(insert_phone < upsert_document);

        assert!(statements[delete_address].sql.contains(r#""addresses"."user_id""#));
        assert!(binds(&statements[delete_address], id));

        assert!(statements[lookup].sql.contains(r#""phones"."user_id""#));
        assert!(binds(&statements[lookup], id));

        let delete_sql = &statements[delete_phones].sql;
        assert!(delete_sql.contains(r#""phones"."user_id""#));
        assert!(delete_sql.contains(r#""phones"."id" IN"#));
        assert!(binds(&statements[delete_phones], id));
        assert!(binds(&statements[delete_phones], dropped));
        assert!(!binds(&statements[delete_phones], kept.id));

        assert!(binds(&statements[update_phone], kept.id));
        assert!(binds(&statements[insert_phone], added.id));

        assert!(statements[upsert_document].sql.contains(r#"ON CONFLICT ("id") DO UPDATE"#));
    }

    #[tokio::test]
    async fn test_update_upserts_address_by_user() {
        let id = Uuid::now_v7();
        let address = address_row(id);
        let document = document_row(id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row(id)]])
            .append_query_results([Vec::<phone::Model>::new()])
            // reload
            .append_query_results([vec![user_row(id)]])
            .append_query_results([vec![address.clone()]])
            .append_query_results([vec![document.clone()]])
            .append_query_results([Vec::<phone::Model>::new()])
            // address upsert, document upsert
            .append_exec_results([affected(1), affected(1)])
            .into_connection();
        let repo = PgUserRepository::new(db.clone());

        let user = user_row(id).into_user(Some(address.clone()), document, Vec::new());
        let updated = repo.update(user).await.unwrap();
        assert_eq!(updated.address.map(|a| a.city), Some("Natal".to_string()));

        let statements = logged_statements(db);
        let upsert_address = position(&statements, r#"INSERT INTO "addresses""#);
        assert!(statements[upsert_address].sql.contains(r#"ON CONFLICT ("user_id") DO UPDATE"#));

        // Nothing stored and nothing desired, so no phone writes
        assert!(!statements.iter().any(|s| s.sql.starts_with(r#"DELETE FROM "phones""#)));
        assert!(!statements.iter().any(|s| s.sql.starts_with(r#"INSERT INTO "phones""#)));
        assert!(!statements.iter().any(|s| s.sql.starts_with(r#"DELETE FROM "addresses""#)));
    }
}
