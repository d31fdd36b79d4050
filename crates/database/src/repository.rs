use crate::connection::ConnectionProvider;
use crate::DbError;
use async_trait::async_trait;
use core_types::{NewStock, Stock};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// The CRUD surface the HTTP layer talks to.
///
/// Absence is never an error here: `get_stock` yields `Stock::default()` and
/// the mutating calls report how many rows they touched.
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Inserts a row and returns the id the database generated for it.
    async fn create_stock(&self, stock: &NewStock) -> Result<i64, DbError>;

    /// Fetches one row, or the empty stock when nothing matches `id`.
    async fn get_stock(&self, id: i64) -> Result<Stock, DbError>;

    async fn get_all_stocks(&self) -> Result<Vec<Stock>, DbError>;

    /// Overwrites name, price and company. Returns the affected-count (0 or 1).
    async fn update_stock(&self, id: i64, stock: &NewStock) -> Result<u64, DbError>;

    /// Returns the affected-count (0 or 1).
    async fn delete_stock(&self, id: i64) -> Result<u64, DbError>;
}

/// A row of the `stocks` table.
#[derive(FromRow, Debug, Clone)]
pub struct DbStock {
    pub stockid: i64,
    pub name: String,
    pub price: Decimal,
    pub company: String,
}

impl From<DbStock> for Stock {
    fn from(row: DbStock) -> Self {
        Stock {
            id: row.stockid,
            name: row.name,
            price: row.price,
            company: row.company,
        }
    }
}

/// The `DbRepository` runs the stock statements against PostgreSQL.
/// Each call checks out its own connection and releases it before returning.
#[derive(Debug, Clone)]
pub struct DbRepository {
    provider: ConnectionProvider,
}

impl DbRepository {
    /// Creates a new `DbRepository` on top of a shared connection provider.
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl StockStore for DbRepository {
    async fn create_stock(&self, stock: &NewStock) -> Result<i64, DbError> {
        let mut conn = self.provider.acquire().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO stocks (name, price, company) VALUES ($1, $2, $3) RETURNING stockid",
        )
        .bind(&stock.name)
        .bind(stock.price)
        .bind(&stock.company)
        .fetch_one(&mut *conn)
        .await
        .map_err(DbError::Operation)?;

        tracing::info!(id, "Inserted a single record");
        Ok(id)
    }

    async fn get_stock(&self, id: i64) -> Result<Stock, DbError> {
        let mut conn = self.provider.acquire().await?;

        let row = sqlx::query_as::<_, DbStock>(
            "SELECT stockid, name, price, company FROM stocks WHERE stockid = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::Operation)?;

        match row {
            Some(row) => Ok(row.into()),
            None => {
                tracing::debug!(id, "No rows were returned");
                Ok(Stock::default())
            }
        }
    }

    async fn get_all_stocks(&self) -> Result<Vec<Stock>, DbError> {
        let mut conn = self.provider.acquire().await?;

        let rows = sqlx::query_as::<_, DbStock>(
            "SELECT stockid, name, price, company FROM stocks ORDER BY stockid",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(DbError::Operation)?;

        Ok(rows.into_iter().map(Stock::from).collect())
    }

    async fn update_stock(&self, id: i64, stock: &NewStock) -> Result<u64, DbError> {
        let mut conn = self.provider.acquire().await?;

        let rows_affected =
            sqlx::query("UPDATE stocks SET name = $2, price = $3, company = $4 WHERE stockid = $1")
                .bind(id)
                .bind(&stock.name)
                .bind(stock.price)
                .bind(&stock.company)
                .execute(&mut *conn)
                .await
                .map_err(DbError::Operation)?
                .rows_affected();

        tracing::info!(id, rows_affected, "Total rows affected");
        Ok(rows_affected)
    }

    async fn delete_stock(&self, id: i64) -> Result<u64, DbError> {
        let mut conn = self.provider.acquire().await?;

        let rows_affected = sqlx::query("DELETE FROM stocks WHERE stockid = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(DbError::Operation)?
            .rows_affected();

        tracing::info!(id, rows_affected, "Total rows affected");
        Ok(rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::DatabaseSettings;
    use rust_decimal_macros::dec;

    #[test]
    fn row_maps_stockid_to_id() {
        let stock: Stock = DbStock {
            stockid: 7,
            name: "ACME".to_string(),
            price: dec!(12.5),
            company: "Acme Corp".to_string(),
        }
        .into();

        assert_eq!(stock.id, 7);
        assert_eq!(stock.name, "ACME");
        assert_eq!(stock.price, dec!(12.5));
        assert_eq!(stock.company, "Acme Corp");
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p database -- --ignored

    async fn live_repository() -> DbRepository {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let provider = ConnectionProvider::connect(&DatabaseSettings {
            url,
            max_connections: 5,
            acquire_timeout_secs: 5,
        })
        .await
        .expect("pool creation failed");

        sqlx::query(include_str!("../schema.sql"))
            .execute(provider.pool())
            .await
            .expect("schema setup failed");

        DbRepository::new(provider)
    }

    fn acme() -> NewStock {
        NewStock {
            name: "ACME".to_string(),
            price: dec!(12.5),
            company: "Acme Corp".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_round_trips() {
        let repo = live_repository().await;

        let id = repo.create_stock(&acme()).await.unwrap();
        let fetched = repo.get_stock(id).await.unwrap();

        assert_eq!(fetched, acme().with_id(id));
        repo.delete_stock(id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_row_is_empty_not_error() {
        let repo = live_repository().await;

        assert_eq!(repo.get_stock(-1).await.unwrap(), Stock::default());
        assert_eq!(repo.update_stock(-1, &acme()).await.unwrap(), 0);
        assert_eq!(repo.delete_stock(-1).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_overwrites_all_fields() {
        let repo = live_repository().await;
        let id = repo.create_stock(&acme()).await.unwrap();

        let replacement = NewStock {
            name: "ACME2".to_string(),
            price: dec!(15),
            company: "Acme Holdings".to_string(),
        };
        assert_eq!(repo.update_stock(id, &replacement).await.unwrap(), 1);
        assert_eq!(repo.get_stock(id).await.unwrap(), replacement.with_id(id));

        repo.delete_stock(id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_removes_exactly_one_row() {
        let repo = live_repository().await;
        let id = repo.create_stock(&acme()).await.unwrap();

        assert_eq!(repo.delete_stock(id).await.unwrap(), 1);
        assert_eq!(repo.get_stock(id).await.unwrap(), Stock::default());
        assert_eq!(repo.delete_stock(id).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn get_all_lists_each_created_row_once() {
        let repo = live_repository().await;
        let first = repo.create_stock(&acme()).await.unwrap();
        let second = repo.create_stock(&acme()).await.unwrap();

        let all = repo.get_all_stocks().await.unwrap();
        for id in [first, second] {
            assert_eq!(all.iter().filter(|s| s.id == id).count(), 1);
        }

        repo.delete_stock(first).await.unwrap();
        repo.delete_stock(second).await.unwrap();
    }
}
