use sqlx::pool::PoolConnection;
use sqlx::{Pool, Postgres};

use kernel::interface::database::QueryDatabaseConnection;
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{booking::*, comment::*, item::*, request::*, user::*};

mod booking;
mod comment;
mod item;
mod request;
mod user;

static POSTGRES_URL: &str = "POSTGRES_URL";

pub type PostgresConnection = PoolConnection<Postgres>;

pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        tracing::debug!("connecting postgres pool");
        let pool = Pool::connect(&url).await.convert_error()?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl QueryDatabaseConnection<PostgresConnection> for PostgresDatabase {
    async fn transact(&self) -> error_stack::Result<PostgresConnection, KernelError> {
        let con = self.pool.acquire().await.convert_error()?;
        Ok(con)
    }
}
