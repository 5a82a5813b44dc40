use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{DependOnRequestQuery, RequestQuery};
use kernel::interface::update::{DependOnRequestModifier, RequestModifier};
use kernel::prelude::entity::{
    CreatedAt, RentalRequest, RequestDescription, RequestId, UserId,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresRequestRepository;

#[async_trait::async_trait]
impl RequestQuery<PostgresConnection> for PostgresRequestRepository {
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &RequestId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        PgRequestInternal::find_by_id(con, id).await
    }

    async fn find_all_by_requester(
        &self,
        con: &mut PostgresConnection,
        requester_id: &UserId,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        PgRequestInternal::find_all_by_requester(con, requester_id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        PgRequestInternal::find_all(con).await
    }
}

impl DependOnRequestQuery<PostgresConnection> for PostgresDatabase {
    type RequestQuery = PostgresRequestRepository;
    fn request_query(&self) -> &Self::RequestQuery {
        &PostgresRequestRepository
    }
}

#[async_trait::async_trait]
impl RequestModifier<PostgresConnection> for PostgresRequestRepository {
    async fn create(
        &self,
        con: &mut PostgresConnection,
        request: &RentalRequest,
    ) -> error_stack::Result<(), KernelError> {
        PgRequestInternal::create(con, request).await
    }
}

impl DependOnRequestModifier<PostgresConnection> for PostgresDatabase {
    type RequestModifier = PostgresRequestRepository;
    fn request_modifier(&self) -> &Self::RequestModifier {
        &PostgresRequestRepository
    }
}

#[derive(sqlx::FromRow)]
struct RequestRow {
    id: Uuid,
    requester_id: Uuid,
    description: String,
    created_at: OffsetDateTime,
}

impl From<RequestRow> for RentalRequest {
    fn from(row: RequestRow) -> Self {
        RentalRequest::new(
            RequestId::new(row.id),
            UserId::new(row.requester_id),
            RequestDescription::new(row.description),
            CreatedAt::new(row.created_at),
        )
    }
}

pub(in crate::database) struct PgRequestInternal;

impl PgRequestInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &RequestId,
    ) -> error_stack::Result<Option<RentalRequest>, KernelError> {
        let row = sqlx::query_as::<_, RequestRow>(
            // language=postgresql
            r#"
            SELECT id, requester_id, description, created_at
            FROM item_requests
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(RentalRequest::from))
    }

    async fn find_all_by_requester(
        con: &mut PgConnection,
        requester_id: &UserId,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        let rows = sqlx::query_as::<_, RequestRow>(
            // language=postgresql
            r#"
            SELECT id, requester_id, description, created_at
            FROM item_requests
            WHERE requester_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(requester_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(RentalRequest::from).collect())
    }

    async fn find_all(
        con: &mut PgConnection,
    ) -> error_stack::Result<Vec<RentalRequest>, KernelError> {
        let rows = sqlx::query_as::<_, RequestRow>(
            // language=postgresql
            r#"
            SELECT id, requester_id, description, created_at
            FROM item_requests
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(RentalRequest::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        request: &RentalRequest,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO item_requests (id, requester_id, description, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.requester_id().as_ref())
        .bind(request.description().as_ref())
        .bind(*request.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
