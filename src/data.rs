use sqlx::{Row, SqlitePool};

#[async_trait::async_trait]
pub trait Table {
    fn get_name(&self) -> &str;
    fn get_pool(&self) -> &SqlitePool;

    async fn create(&self) -> Result<(), sqlx::Error>;

    async fn count(&self) -> Result<u32, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", self.get_name());
        Ok(sqlx::query(&query)
            .fetch_one(self.get_pool())
            .await?
            .try_get(0)?)
    }
}
