use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::core::models::Operation;
use crate::errors::DispatchResult;
use crate::registry::OperationLog;

pub struct PostgresOperationLog {
    pool: PgPool,
}

impl PostgresOperationLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OperationLog for PostgresOperationLog {
    async fn append(&self, operation: &Operation) -> DispatchResult<()> {
        sqlx::query(
            r#"
            INSERT INTO operations (id, container_id, status, payload, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&operation.id)
        .bind(&operation.container_id)
        .bind(&operation.status)
        .bind(&operation.payload)
        .bind(operation.recorded_at)
        .execute(&self.pool)
        .await?;

        debug!(operation = %operation.id, "operation recorded");
        Ok(())
    }
}
