use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::{DependOnItemQuery, ItemQuery};
use kernel::interface::update::{DependOnItemModifier, ItemModifier};
use kernel::prelude::entity::{
    IsAvailable, Item, ItemDescription, ItemId, ItemName, RequestId, UserId,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresItemRepository;

#[async_trait::async_trait]
impl ItemQuery<PostgresConnection> for PostgresItemRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        PgItemInternal::find_by_id(con, id).await
    }

    async fn find_all_by_owner(
        &self,
        con: &mut PostgresConnection,
        owner_id: &UserId,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        PgItemInternal::find_all_by_owner(con, owner_id).await
    }

    async fn find_all_by_request(
        &self,
        con: &mut PostgresConnection,
        request_id: &RequestId,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        PgItemInternal::find_all_by_request(con, request_id).await
    }

    async fn search(
        &self,
        con: &mut PostgresConnection,
        text: &str,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        PgItemInternal::search(con, text).await
    }
}

impl DependOnItemQuery<PostgresConnection> for PostgresDatabase {
    type ItemQuery = PostgresItemRepository;
    fn item_query(&self) -> &Self::ItemQuery {
        &PostgresItemRepository
    }
}

#[async_trait::async_trait]
impl ItemModifier<PostgresConnection> for PostgresItemRepository {
    async fn create(
        &self,
        con: &mut PostgresConnection,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        PgItemInternal::create(con, item).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        item: &Item,
    ) -> error_stack::Result<(), KernelError> {
        PgItemInternal::update(con, item).await
    }
}

impl DependOnItemModifier<PostgresConnection> for PostgresDatabase {
    type ItemModifier = PostgresItemRepository;
    fn item_modifier(&self) -> &Self::ItemModifier {
        &PostgresItemRepository
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    description: String,
    available: bool,
    request_id: Option<Uuid>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item::new(
            ItemId::new(row.id),
            UserId::new(row.owner_id),
            ItemName::new(row.name),
            ItemDescription::new(row.description),
            IsAvailable::new(row.available),
            row.request_id.map(RequestId::new),
        )
    }
}

pub(in crate::database) struct PgItemInternal;

impl PgItemInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &ItemId,
    ) -> error_stack::Result<Option<Item>, KernelError> {
        let row = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            SELECT id, owner_id, name, description, available, request_id
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Item::from))
    }

    async fn find_all_by_owner(
        con: &mut PgConnection,
        owner_id: &UserId,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            SELECT id, owner_id, name, description, available, request_id
            FROM items
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn find_all_by_request(
        con: &mut PgConnection,
        request_id: &RequestId,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            SELECT id, owner_id, name, description, available, request_id
            FROM items
            WHERE request_id = $1
            "#,
        )
        .bind(request_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn search(
        con: &mut PgConnection,
        text: &str,
    ) -> error_stack::Result<Vec<Item>, KernelError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            // language=postgresql
            r#"
            SELECT id, owner_id, name, description, available, request_id
            FROM items
            WHERE available = TRUE
              AND (name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(text)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn create(con: &mut PgConnection, item: &Item) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO items (id, owner_id, name, description, available, request_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(item.id().as_ref())
        .bind(item.owner_id().as_ref())
        .bind(item.name().as_ref())
        .bind(item.description().as_ref())
        .bind(item.available().as_ref())
        .bind(item.request_id().as_ref().map(|id| *id.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, item: &Item) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE items
            SET name = $2, description = $3, available = $4, request_id = $5
            WHERE id = $1
            "#,
        )
        .bind(item.id().as_ref())
        .bind(item.name().as_ref())
        .bind(item.description().as_ref())
        .bind(item.available().as_ref())
        .bind(item.request_id().as_ref().map(|id| *id.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::QueryDatabaseConnection;
    use kernel::interface::query::ItemQuery;
    use kernel::interface::update::{ItemModifier, UserModifier};
    use kernel::prelude::entity::{
        IsAvailable, Item, ItemDescription, ItemId, ItemName, User, UserEmail, UserId, UserName,
    };
    use kernel::KernelError;
    use rand::distributions::{Alphanumeric, DistString};

    use crate::database::postgres::{
        PostgresDatabase, PostgresItemRepository, PostgresUserRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let suffix = Alphanumeric.sample_string(&mut rand::thread_rng(), 8);
        let owner_id = UserId::new(uuid::Uuid::new_v4());
        let owner = User::new(
            owner_id.clone(),
            UserName::new("owner"),
            UserEmail::new(format!("{suffix}@example.com")),
        );
        PostgresUserRepository.create(&mut con, &owner).await?;

        let item_id = ItemId::new(uuid::Uuid::new_v4());
        let item = Item::new(
            item_id.clone(),
            owner_id.clone(),
            ItemName::new(format!("drill-{suffix}")),
            ItemDescription::new("electric drill"),
            IsAvailable::new(true),
            None,
        );
        PostgresItemRepository.create(&mut con, &item).await?;

        let found = PostgresItemRepository.find_by_id(&mut con, &item_id).await?;
        assert_eq!(found, Some(item.clone()));

        let owned = PostgresItemRepository
            .find_all_by_owner(&mut con, &owner_id)
            .await?;
        assert_eq!(owned, vec![item.clone()]);

        let searched = PostgresItemRepository
            .search(&mut con, &format!("drill-{suffix}"))
            .await?;
        assert_eq!(searched, vec![item]);
        Ok(())
    }
}
