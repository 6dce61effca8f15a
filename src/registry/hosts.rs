use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::models::Host;
use crate::errors::DispatchResult;
use crate::registry::HostRegistry;

pub struct PostgresHostRegistry {
    pool: PgPool,
}

impl PostgresHostRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HostRegistry for PostgresHostRegistry {
    async fn get(&self, id: &str) -> DispatchResult<Option<Host>> {
        let host = sqlx::query_as::<_, Host>("SELECT id, address, name FROM hosts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(host)
    }

    async fn get_by_address(&self, address: &str) -> DispatchResult<Option<Host>> {
        let host =
            sqlx::query_as::<_, Host>("SELECT id, address, name FROM hosts WHERE address = $1")
                .bind(address)
                .fetch_optional(&self.pool)
                .await?;
        Ok(host)
    }
}
