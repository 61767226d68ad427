use crate::record::{BackRecord, FrontRecord, NewBackRecord, NewFrontRecord};
use crate::{RecordBackend, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS aadhar_front (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        dob TEXT NOT NULL,
        gender TEXT NOT NULL,
        adhar_number TEXT NOT NULL,
        image_path TEXT
    )",
    "CREATE INDEX IF NOT EXISTS aadhar_front_adhar_number ON aadhar_front (adhar_number)",
    "CREATE TABLE IF NOT EXISTS aadhar_back (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        address TEXT NOT NULL,
        pincode TEXT NOT NULL,
        reenter_adhar TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS aadhar_back_reenter_adhar ON aadhar_back (reenter_adhar)",
];

const INSERT_FRONT: &str =
    "INSERT INTO aadhar_front (name, dob, gender, adhar_number, image_path) VALUES (?, ?, ?, ?, ?)";
const INSERT_BACK: &str = "INSERT INTO aadhar_back (address, pincode, reenter_adhar) VALUES (?, ?, ?)";
const SELECT_FRONT: &str = "SELECT id, name, dob, gender, adhar_number, image_path \
     FROM aadhar_front WHERE adhar_number = ? ORDER BY id LIMIT 1";
const SELECT_BACK: &str = "SELECT id, address, pincode, reenter_adhar \
     FROM aadhar_back WHERE reenter_adhar = ? ORDER BY id LIMIT 1";

/// SQLite backend over a `sqlx` connection pool.
///
/// The tables are created on first use. If that fails (for example because the
/// database file is not writable yet) the next query tries again.
pub struct SqliteBackend {
    pool: SqlitePool,
    schema: OnceCell<()>,
}

impl SqliteBackend {
    /// Create a pool for `url` without opening a connection.
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy_with(options);
        Ok(Self::from_pool(pool))
    }

    /// Use an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    async fn ready(&self) -> Result<&SqlitePool, StoreError> {
        self.schema
            .get_or_try_init(|| async {
                for statement in SCHEMA {
                    sqlx::query(statement).execute(&self.pool).await?;
                }
                tracing::info!("record schema ready");
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(&self.pool)
    }
}

#[async_trait]
impl RecordBackend for SqliteBackend {
    async fn insert_front(&self, record: &NewFrontRecord) -> Result<i64, StoreError> {
        let pool = self.ready().await?;
        let result = sqlx::query(INSERT_FRONT)
            .bind(&record.name)
            .bind(&record.date_of_birth)
            .bind(&record.gender)
            .bind(&record.document_number)
            .bind(&record.image_path)
            .execute(pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn insert_back(&self, record: &NewBackRecord) -> Result<i64, StoreError> {
        let pool = self.ready().await?;
        let result = sqlx::query(INSERT_BACK)
            .bind(&record.address)
            .bind(&record.postal_code)
            .bind(&record.document_number_restated)
            .execute(pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn first_front(&self, document_number: &str) -> Result<Option<FrontRecord>, StoreError> {
        let pool = self.ready().await?;
        let row = sqlx::query_as::<_, FrontRecord>(SELECT_FRONT)
            .bind(document_number)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    async fn first_back(&self, document_number: &str) -> Result<Option<BackRecord>, StoreError> {
        let pool = self.ready().await?;
        let row = sqlx::query_as::<_, BackRecord>(SELECT_BACK)
            .bind(document_number)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let pool = self.ready().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
