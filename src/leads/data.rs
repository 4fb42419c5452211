use super::ProfileRecord;
use crate::{utils, LeadStore, ScraperError, Table};
use chrono::{DateTime, FixedOffset};
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use std::path::Path;

pub struct LeadTable {
    name: String,
    pool: SqlitePool,
}

const INSERT_COLUMNS: &str = "(id, name, job_title, company, location, source, date_added)";

#[async_trait::async_trait]
impl Table for LeadTable {
    fn get_name(&self) -> &str {
        self.name.as_str()
    }

    fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create(&self) -> Result<(), sqlx::Error> {
        if !utils::is_table_exists(self.get_pool(), &self.name).await? {
            let query = format!(
                r#"
                        CREATE TABLE {} (
                            id TEXT PRIMARY KEY,
                            name TEXT,
                            job_title TEXT,
                            company TEXT,
                            location TEXT,
                            source TEXT,
                            date_added DATETIME
                        )
                    "#,
                &self.name
            );
            sqlx::query(query.as_str()).execute(self.get_pool()).await?;
        }
        Ok(())
    }
}

impl LeadTable {
    /// Inserts the records in one transaction. Known profile URLs are left untouched.
    pub async fn insert_all(&self, records: &[ProfileRecord]) -> Result<u64, sqlx::Error> {
        let mut tx = self.get_pool().begin().await?;
        let query = format!(
            "INSERT OR IGNORE INTO {} {} VALUES (?, ?, ?, ?, ?, ?, ?)",
            self.name, INSERT_COLUMNS
        );

        let mut inserted = 0;
        for record in records {
            inserted += sqlx::query(&query)
                .bind(record.profile_url.trim())
                .bind(record.name.as_str())
                .bind(record.job_title.as_str())
                .bind(record.company.as_str())
                .bind(record.location.as_str())
                .bind(record.source.as_str())
                .bind(record.date_added.unwrap_or_else(utils::get_now))
                .execute(&mut tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;

        Ok(inserted)
    }
}

/// SQLite-backed document store for leads.
pub struct LeadData {
    pub leads: LeadTable,
    pool: SqlitePool,
}

impl LeadData {
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<LeadData, ScraperError> {
        let opt = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opt).await?;
        let p = LeadData {
            leads: LeadTable {
                name: "leads".to_string(),
                pool: pool.clone(),
            },
            pool,
        };

        if !utils::is_table_exists(&p.pool, &p.leads.name).await? {
            tracing::debug!("Create table {}", p.leads.name);
            p.leads.create().await?;
        } else {
            tracing::debug!("Use table {}", p.leads.name);
        }

        Ok(p)
    }
}

#[async_trait::async_trait]
impl LeadStore for LeadData {
    async fn insert_many(&self, records: &[ProfileRecord]) -> Result<u64, ScraperError> {
        Ok(self.leads.insert_all(records).await?)
    }

    async fn all(&self) -> Result<Vec<ProfileRecord>, ScraperError> {
        let query = format!(
            "SELECT id, name, job_title, company, location, source, date_added FROM {} ORDER BY date_added, rowid",
            self.leads.get_name()
        );

        let mut records = vec![];
        for row in sqlx::query(&query).fetch_all(&self.pool).await? {
            records.push(ProfileRecord {
                profile_url: row.try_get("id")?,
                name: row.try_get("name")?,
                job_title: row.try_get("job_title")?,
                company: row.try_get("company")?,
                location: row.try_get("location")?,
                source: row.try_get("source")?,
                date_added: row.try_get::<Option<DateTime<FixedOffset>>, _>("date_added")?,
            });
        }
        Ok(records)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
