// cabindesk/src/backend/postgres.rs
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, info};

use super::{BackendError, CabinTable};
use crate::cabins::{Cabin, CabinRow};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS cabins (
        id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        name TEXT NOT NULL,
        max_capacity INTEGER NOT NULL CHECK (max_capacity >= 1),
        regular_price DOUBLE PRECISION NOT NULL CHECK (regular_price > 0),
        discount DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (discount >= 0),
        description TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL
    )
"#;

const SELECT_ALL: &str = r#"
    SELECT id, created_at, name, max_capacity, regular_price, discount, description, image
    FROM cabins
    ORDER BY id
"#;

const SELECT_BY_ID: &str = r#"
    SELECT id, created_at, name, max_capacity, regular_price, discount, description, image
    FROM cabins
    WHERE id = $1
"#;

const INSERT: &str = r#"
    INSERT INTO cabins (name, max_capacity, regular_price, discount, description, image)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, created_at, name, max_capacity, regular_price, discount, description, image
"#;

const UPDATE: &str = r#"
    UPDATE cabins
    SET name = $2, max_capacity = $3, regular_price = $4, discount = $5, description = $6, image = $7
    WHERE id = $1
    RETURNING id, created_at, name, max_capacity, regular_price, discount, description, image
"#;

const DELETE: &str = "DELETE FROM cabins WHERE id = $1";

const RESTORE: &str = r#"
    INSERT INTO cabins (id, created_at, name, max_capacity, regular_price, discount, description, image)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    ON CONFLICT (id) DO UPDATE SET
        created_at = EXCLUDED.created_at,
        name = EXCLUDED.name,
        max_capacity = EXCLUDED.max_capacity,
        regular_price = EXCLUDED.regular_price,
        discount = EXCLUDED.discount,
        description = EXCLUDED.description,
        image = EXCLUDED.image
"#;

/// The `cabins` table in Postgres.
#[derive(Clone)]
pub struct PgCabinTable {
    pool: PgPool,
}

impl PgCabinTable {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, BackendError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        info!("Connected to cabin database");
        Ok(Self { pool })
    }

    /// Creates the `cabins` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), BackendError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("cabins table is in place");
        Ok(())
    }
}

#[async_trait]
impl CabinTable for PgCabinTable {
    async fn select_all(&self) -> Result<Vec<Cabin>, BackendError> {
        let cabins = sqlx::query_as::<_, Cabin>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = cabins.len(), "selected cabins");
        Ok(cabins)
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<Cabin>, BackendError> {
        Ok(sqlx::query_as::<_, Cabin>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, row: &CabinRow) -> Result<Cabin, BackendError> {
        let cabin = sqlx::query_as::<_, Cabin>(INSERT)
            .bind(&row.name)
            .bind(row.max_capacity)
            .bind(row.regular_price)
            .bind(row.discount)
            .bind(&row.description)
            .bind(&row.image)
            .fetch_one(&self.pool)
            .await?;
        debug!(cabin_id = cabin.id, "inserted cabin row");
        Ok(cabin)
    }

    async fn update(&self, id: i64, row: &CabinRow) -> Result<Option<Cabin>, BackendError> {
        Ok(sqlx::query_as::<_, Cabin>(UPDATE)
            .bind(id)
            .bind(&row.name)
            .bind(row.max_capacity)
            .bind(row.regular_price)
            .bind(row.discount)
            .bind(&row.description)
            .bind(&row.image)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, BackendError> {
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, cabin: &Cabin) -> Result<(), BackendError> {
        sqlx::query(RESTORE)
            .bind(cabin.id)
            .bind(cabin.created_at)
            .bind(&cabin.name)
            .bind(cabin.max_capacity)
            .bind(cabin.regular_price)
            .bind(cabin.discount)
            .bind(&cabin.description)
            .bind(&cabin.image)
            .execute(&self.pool)
            .await?;
        debug!(cabin_id = cabin.id, "restored cabin row");
        Ok(())
    }
}
