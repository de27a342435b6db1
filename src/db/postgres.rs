use crate::db::database::Database;
use crate::db::error::DatabaseError;
use crate::db::models::{NewRegistration, Registration};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

const COLUMNS: &str =
    "id, name, roll_no, reg_no, year, phone, email, payment_screenshot, created_at";

/// A PostgreSQL implementation of the Database trait
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Create a new PostgresDatabase with the given connection URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(60))
            .connect_lazy(database_url)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                DatabaseError::ConnectionError(e.to_string())
            })?;

        if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
            error!("Database connectivity test failed: {}", e);
            return Err(DatabaseError::ConnectionError(format!(
                "Database is not accessible: {}",
                e
            )));
        }

        let db = PostgresDatabase { pool };
        db.ensure_schema().await?;

        info!("PostgreSQL database connection established successfully");
        Ok(db)
    }

    /// Create the registrations table if it does not exist.
    ///
    /// The UNIQUE constraints on email, phone, reg_no and roll_no are the
    /// final backstop against check-then-insert races.
    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let create_table_query = r#"
            CREATE TABLE IF NOT EXISTS registrations (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                roll_no TEXT NOT NULL UNIQUE,
                reg_no TEXT NOT NULL UNIQUE,
                year TEXT NOT NULL,
                phone TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                payment_screenshot TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
        "#;

        debug!("Ensuring registrations table exists");
        sqlx::query(create_table_query)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to create registrations table: {}", e);
                DatabaseError::QueryError(format!("Failed to create table: {}", e))
            })?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS registrations_created_at_idx \
             ON registrations (created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create created_at index: {}", e);
            DatabaseError::QueryError(format!("Failed to create index: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn find_conflicts(
        &self,
        email: &str,
        phone: &str,
        reg_no: &str,
        roll_no: &str,
    ) -> Result<Vec<Registration>, DatabaseError> {
        debug!("Looking up unique-field conflicts for email={}", email);

        let query = format!(
            "SELECT {COLUMNS} FROM registrations \
             WHERE email = $1 OR phone = $2 OR reg_no = $3 OR roll_no = $4"
        );

        let rows = sqlx::query_as::<_, Registration>(&query)
            .bind(email)
            .bind(phone)
            .bind(reg_no)
            .bind(roll_no)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Conflict lookup failed: {}", e);
                DatabaseError::QueryError(e.to_string())
            })?;

        debug!("Conflict lookup returned {} rows", rows.len());
        Ok(rows)
    }

    async fn insert(&self, new: NewRegistration) -> Result<Registration, DatabaseError> {
        let registration = Registration {
            id: Uuid::new_v4(),
            name: new.name,
            roll_no: new.roll_no,
            reg_no: new.reg_no,
            year: new.year,
            phone: new.phone,
            email: new.email,
            payment_screenshot: new.payment_screenshot,
            created_at: Utc::now(),
        };

        let query = format!(
            "INSERT INTO registrations ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
        );

        sqlx::query(&query)
            .bind(registration.id)
            .bind(&registration.name)
            .bind(&registration.roll_no)
            .bind(&registration.reg_no)
            .bind(&registration.year)
            .bind(&registration.phone)
            .bind(&registration.email)
            .bind(&registration.payment_screenshot)
            .bind(registration.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err)
                    if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
                {
                    debug!("Insert lost a uniqueness race: {}", db_err);
                    DatabaseError::UniqueViolation
                }
                _ => {
                    error!("Failed to insert registration: {}", e);
                    DatabaseError::QueryError(e.to_string())
                }
            })?;

        info!("Persisted registration {}", registration.id);
        Ok(registration)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to count registrations: {}", e);
                DatabaseError::QueryError(e.to_string())
            })?;

        debug!("Counted {} registrations", count);
        Ok(count)
    }

    #[cfg(test)]
    async fn clear(&self) -> Result<(), DatabaseError> {
        sqlx::query("TRUNCATE registrations")
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(())
    }
}
