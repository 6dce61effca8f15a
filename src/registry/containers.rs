use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::core::models::{Container, ContainerListing};
use crate::errors::{DispatchError, DispatchResult};
use crate::registry::ContainerRegistry;

pub struct PostgresContainerRegistry {
    pool: PgPool,
}

impl PostgresContainerRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContainerRegistry for PostgresContainerRegistry {
    async fn insert(&self, container: &Container) -> DispatchResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO containers (id, host_id, name, container_type, alias, deployed)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&container.id)
        .bind(&container.host_id)
        .bind(&container.name)
        .bind(&container.container_type)
        .bind(&container.alias)
        .bind(container.deployed)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!(container = %container.id, host = %container.host_id, "container row inserted");
                Ok(())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DispatchError::Conflict(container.id.clone()))
            }
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(DispatchError::Inconsistent {
                    container: container.id.clone(),
                    host: container.host_id.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: &str) -> DispatchResult<Option<Container>> {
        let container = sqlx::query_as::<_, Container>(
            "SELECT id, host_id, name, container_type, alias, deployed FROM containers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(container)
    }

    async fn delete(&self, id: &str) -> DispatchResult<bool> {
        let result = sqlx::query("DELETE FROM containers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_joined(&self) -> DispatchResult<Vec<ContainerListing>> {
        // Runtime state lives on the agents; the listing derives status from
        // the deployed flag only.
        let rows = sqlx::query_as::<_, ContainerListing>(
            r#"
            SELECT c.id AS id,
                   h.name AS host_name,
                   c.name AS container_name,
                   c.alias AS image,
                   CASE WHEN c.deployed THEN 'deployed' ELSE 'pending' END AS status
            FROM containers c
            JOIN hosts h ON c.host_id = h.id
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
