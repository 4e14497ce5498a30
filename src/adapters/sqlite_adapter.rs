//! SQLite price store.

use crate::domain::asset::Asset;
use crate::domain::error::{PortfolioError, Result};
use crate::domain::price::PriceRecord;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_source::PriceSource;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn query_error(e: rusqlite::Error) -> PortfolioError {
    PortfolioError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_stored_date(value: &str) -> std::result::Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            value.len(),
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| PortfolioError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let configured = config.get_int("sqlite", "pool_size", 4);
        let pool_size = u32::try_from(configured)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| PortfolioError::ConfigInvalid {
                section: "sqlite".into(),
                key: "pool_size".into(),
                reason: format!("expected a positive pool size, got {configured}"),
            })?;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| PortfolioError::Database {
                reason: e.to_string(),
            })?;

        tracing::debug!(path = %db_path, pool_size, "opened sqlite price store");
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| PortfolioError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| PortfolioError::Database {
                reason: e.to_string(),
            })
    }

    pub fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS prices (
                symbol TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                price REAL NOT NULL,
                PRIMARY KEY (symbol, timestamp)
            );
            CREATE INDEX IF NOT EXISTS idx_prices_timestamp ON prices(timestamp);",
        )
        .map_err(query_error)?;

        Ok(())
    }

    /// Upserts records; an existing (symbol, timestamp) price is replaced.
    pub fn insert_records(&self, records: &[PriceRecord]) -> Result<usize> {
        let mut conn = self.connection()?;
        let tx = conn.transaction().map_err(query_error)?;

        for record in records {
            tx.execute(
                "INSERT OR REPLACE INTO prices (symbol, timestamp, price) VALUES (?1, ?2, ?3)",
                params![
                    record.asset.symbol(),
                    record.timestamp.format("%Y-%m-%d").to_string(),
                    record.price
                ],
            )
            .map_err(query_error)?;
        }

        tx.commit().map_err(query_error)?;
        tracing::info!(records = records.len(), "stored price records");
        Ok(records.len())
    }
}

impl PriceSource for SqliteAdapter {
    fn fetch_prices(&self, start: NaiveDate) -> Result<Vec<PriceRecord>> {
        let conn = self.connection()?;
        let start_str = start.format("%Y-%m-%d").to_string();

        let mut stmt = conn
            .prepare(
                "SELECT symbol, timestamp, price FROM prices
                 WHERE timestamp >= ?1
                 ORDER BY timestamp ASC, symbol ASC",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map(params![start_str], |row| {
                let symbol: String = row.get(0)?;
                let timestamp: String = row.get(1)?;
                let price: f64 = row.get(2)?;
                Ok((symbol, parse_stored_date(&timestamp)?, price))
            })
            .map_err(query_error)?;

        let mut records = Vec::new();
        for row in rows {
            let (symbol, timestamp, price) = row.map_err(query_error)?;
            let asset: Asset = symbol.parse()?;
            records.push(PriceRecord::new(asset, timestamp, price));
        }

        tracing::debug!(%start, records = records.len(), "read sqlite prices");
        Ok(records)
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>> {
        let conn = self.connection()?;

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(
                "SELECT MIN(timestamp), MAX(timestamp), COUNT(*) FROM prices",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(query_error)?;

        match result {
            (Some(min), Some(max), count) if count > 0 => Ok(Some((
                parse_stored_date(&min).map_err(query_error)?,
                parse_stored_date(&max).map_err(query_error)?,
                count as usize,
            ))),
            _ => Ok(None),
        }
    }
}
