use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::schema::{Transaction, TransactionStatus};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://payments.sqlite";

/// Columns returned for a transaction. The storage `id` is never selected.
const TRANSACTION_COLUMNS: &str = "transaction_id, name, mobile, plan, amount, payment_url, \
     qr_code_path, status, created_at, updated_at";

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        if is_in_memory(database_url) {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .context("Failed to create SQLite connect options")?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to `{}`", database_url))?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database. Every pooled connection would otherwise get
    /// its own empty database, so the pool is pinned to a single connection.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Failed to create SQLite connect options")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        //Apply migrations
        sqlx::migrate!()
            .run(&pool)
            .await
            .context("Database migration error")?;
        Ok(Self { pool })
    }

    /// Appends a transaction. Uniqueness of `transaction_id` is not checked here.
    pub async fn insert_transaction(&self, transaction: &Transaction) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id, name, mobile, plan, amount, payment_url, qr_code_path, status
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.transaction_id)
        .bind(&transaction.name)
        .bind(&transaction.mobile)
        .bind(&transaction.plan)
        .bind(transaction.amount)
        .bind(&transaction.payment_url)
        .bind(&transaction.qr_code_path)
        .bind(transaction.status)
        .execute(&self.pool)
        .await
        .with_context(|| {
            format!(
                "Failed to save transaction {} to database",
                transaction.transaction_id
            )
        })?;

        Ok(())
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> anyhow::Result<Option<Transaction>> {
        let query = format!(
            "SELECT {} FROM transactions WHERE transaction_id = ? ORDER BY id LIMIT 1",
            TRANSACTION_COLUMNS
        );
        let transaction = sqlx::query_as::<_, Transaction>(&query)
            .bind(transaction_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to get transaction {}", transaction_id))?;
        Ok(transaction)
    }

    /// Sets the status to `Completed` and returns how many rows actually changed.
    ///
    /// Rows that are already completed are not counted, so a second call for
    /// the same id returns 0, exactly like an unknown id.
    pub async fn mark_completed(&self, transaction_id: &str) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE transaction_id = ? AND status <> ?
            "#,
        )
        .bind(TransactionStatus::Completed)
        .bind(transaction_id)
        .bind(TransactionStatus::Completed)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to complete transaction {}", transaction_id))?;

        Ok(result.rows_affected())
    }

    pub async fn get_all_transactions(&self) -> anyhow::Result<Vec<Transaction>> {
        let query = format!("SELECT {} FROM transactions ORDER BY id", TRANSACTION_COLUMNS);
        let transactions = sqlx::query_as::<_, Transaction>(&query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to get all transactions")?;
        Ok(transactions)
    }

    pub async fn get_transactions_by_status(
        &self,
        status: TransactionStatus,
    ) -> anyhow::Result<Vec<Transaction>> {
        let query = format!(
            "SELECT {} FROM transactions WHERE status = ? ORDER BY id",
            TRANSACTION_COLUMNS
        );
        let transactions = sqlx::query_as::<_, Transaction>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to get {} transactions", status))?;
        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PaymentLink;

    fn transaction(id: &str, plan: &str, amount: i64) -> Transaction {
        Transaction::new(
            PaymentLink {
                transaction_id: id.to_string(),
                payment_uri: format!("upi://pay?tid={}", id),
            },
            "A".to_string(),
            "999".to_string(),
            plan.to_string(),
            amount,
            format!("static/qrcodes/{}.png", id),
        )
    }

    #[tokio::test]
    async fn insert_then_find_returns_pending_record() {
        let db = Database::in_memory().await.unwrap();
        db.insert_transaction(&transaction("t1", "monthly", 999))
            .await
            .unwrap();

        let found = db.get_transaction("t1").await.unwrap().unwrap();
        assert_eq!(found.plan, "monthly");
        assert_eq!(found.amount, 999);
        assert_eq!(found.status, TransactionStatus::Pending);
        assert!(found.created_at.is_some());

        assert!(db.get_transaction("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_url_shares_one_migrated_database() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        for id in ["m1", "m2", "m3"] {
            db.insert_transaction(&transaction(id, "monthly", 999))
                .await
                .unwrap();
        }

        assert_eq!(db.get_all_transactions().await.unwrap().len(), 3);
        assert!(db.get_transaction("m2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn file_url_creates_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("payments.sqlite").display());

        let db = Database::new(&url).await.unwrap();
        db.insert_transaction(&transaction("f1", "weekly", 449))
            .await
            .unwrap();

        assert!(dir.path().join("payments.sqlite").exists());
        assert_eq!(db.mark_completed("f1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_completed_counts_only_real_changes() {
        let db = Database::in_memory().await.unwrap();
        db.insert_transaction(&transaction("t1", "weekly", 449))
            .await
            .unwrap();

        assert_eq!(db.mark_completed("t1").await.unwrap(), 1);
        assert_eq!(db.mark_completed("t1").await.unwrap(), 0);
        assert_eq!(db.mark_completed("nope").await.unwrap(), 0);

        let found = db.get_transaction("t1").await.unwrap().unwrap();
        assert_eq!(found.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn list_and_filter_by_status() {
        let db = Database::in_memory().await.unwrap();
        for id in ["a", "b", "c"] {
            db.insert_transaction(&transaction(id, "yearly", 3999))
                .await
                .unwrap();
        }
        db.mark_completed("b").await.unwrap();

        let all = db.get_all_transactions().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let pending = db
            .get_transactions_by_status(TransactionStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);

        let completed = db
            .get_transactions_by_status(TransactionStatus::Completed)
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].transaction_id, "b");
    }
}
