//! Order Repository
//!
//! All order reads and writes go through this type. `update_status` is the
//! single status write path; nothing else touches the `status` column.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem, OrderStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Raw row shape; `items` is a JSON-encoded array
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    items: String,
    pickup_slot: i64,
    status: String,
    created_at: i64,
}

impl OrderRow {
    fn into_order(self) -> RepoResult<Order> {
        let items: Vec<OrderItem> = serde_json::from_str(&self.items)
            .map_err(|e| RepoError::Database(format!("corrupt items column: {e}")))?;
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|e: String| RepoError::Database(e))?;
        Ok(Order {
            id: self.id,
            items,
            pickup_slot: self.pickup_slot,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new order with a freshly assigned id.
    ///
    /// Single atomic INSERT: a failed create leaves no row behind.
    pub async fn create(
        &self,
        items: Vec<OrderItem>,
        pickup_slot: i64,
        status: OrderStatus,
    ) -> RepoResult<Order> {
        let id = snowflake_id();
        let created_at = now_millis();
        let items_json = serde_json::to_string(&items)
            .map_err(|e| RepoError::Validation(format!("unserializable items: {e}")))?;

        sqlx::query(
            "INSERT INTO orders (id, items, pickup_slot, status, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&items_json)
        .bind(pickup_slot)
        .bind(status.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Order {
            id,
            items,
            pickup_slot,
            status,
            created_at,
        })
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, items, pickup_slot, status, created_at FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(OrderRow::into_order).transpose()
    }

    /// Fetch a batch of orders in a single query; missing ids are skipped
    pub async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Order>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!(
            "SELECT id, items, pickup_slot, status, created_at FROM orders WHERE id IN ({placeholders})"
        );
        let mut query = sqlx::query_as::<_, OrderRow>(&sql);
        for id in ids {
            query = query.bind(*id);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Persist a validated status transition. Callers must have routed the
    /// change through the status machine first.
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> RepoResult<Order> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("order {id}")));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("order {id}")))
    }

    /// Administrative bulk delete, outside the normal lifecycle
    pub async fn delete_many(&self, ids: &[i64]) -> RepoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!("DELETE FROM orders WHERE id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(*id);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Count non-cancelled orders whose pickup slot falls in
    /// `[slot_start, slot_start + width_ms)`
    pub async fn count_in_slot(&self, slot_start: i64, width_ms: i64) -> RepoResult<u32> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE status != 'cancelled' AND pickup_slot >= ? AND pickup_slot < ?",
        )
        .bind(slot_start)
        .bind(slot_start + width_ms)
        .fetch_one(&self.pool)
        .await?;
        Ok(count as u32)
    }

    /// Per-slot counts of non-cancelled orders over `[range_start, range_end)`,
    /// keyed by the stored (already slot-aligned) pickup_slot value
    pub async fn slot_counts(
        &self,
        range_start: i64,
        range_end: i64,
    ) -> RepoResult<HashMap<i64, u32>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT pickup_slot, COUNT(*) FROM orders WHERE status != 'cancelled' AND pickup_slot >= ? AND pickup_slot < ? GROUP BY pickup_slot",
        )
        .bind(range_start)
        .bind(range_end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(slot, count)| (slot, count as u32))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn test_repo() -> (tempfile::TempDir, OrderRepository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        (dir, OrderRepository::new(db.pool))
    }

    fn espresso(quantity: u32) -> Vec<OrderItem> {
        vec![OrderItem {
            item_id: "espresso".into(),
            quantity,
        }]
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (_dir, repo) = test_repo().await;
        let created = repo
            .create(espresso(2), 900_000, OrderStatus::Pending)
            .await
            .unwrap();

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.items, espresso(2));
        assert_eq!(found.pickup_slot, 900_000);
        assert_eq!(found.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_find_by_ids_skips_missing() {
        let (_dir, repo) = test_repo().await;
        let a = repo
            .create(espresso(1), 0, OrderStatus::Pending)
            .await
            .unwrap();
        let b = repo
            .create(espresso(1), 0, OrderStatus::Pending)
            .await
            .unwrap();

        let found = repo.find_by_ids(&[a.id, b.id, 424242]).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status() {
        let (_dir, repo) = test_repo().await;
        let order = repo
            .create(espresso(1), 0, OrderStatus::Pending)
            .await
            .unwrap();

        let updated = repo
            .update_status(order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Confirmed);

        let err = repo.update_status(424242, OrderStatus::Confirmed).await;
        assert!(matches!(err, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_many() {
        let (_dir, repo) = test_repo().await;
        let a = repo
            .create(espresso(1), 0, OrderStatus::Pending)
            .await
            .unwrap();
        let b = repo
            .create(espresso(1), 0, OrderStatus::Pending)
            .await
            .unwrap();
        let keep = repo
            .create(espresso(1), 0, OrderStatus::Pending)
            .await
            .unwrap();

        let removed = repo.delete_many(&[a.id, b.id, 424242]).await.unwrap();
        assert_eq!(removed, 2);
        assert!(repo.find_by_id(keep.id).await.unwrap().is_some());
        assert!(repo.find_by_id(a.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_counts_exclude_cancelled() {
        let (_dir, repo) = test_repo().await;
        let slot = 1_800_000;
        let width = 900_000;

        for _ in 0..3 {
            repo.create(espresso(1), slot, OrderStatus::Pending)
                .await
                .unwrap();
        }
        let cancelled = repo
            .create(espresso(1), slot, OrderStatus::Pending)
            .await
            .unwrap();
        repo.update_status(cancelled.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        // Order in a different slot must not count
        repo.create(espresso(1), slot + width, OrderStatus::Pending)
            .await
            .unwrap();

        assert_eq!(repo.count_in_slot(slot, width).await.unwrap(), 3);

        let counts = repo.slot_counts(slot, slot + 2 * width).await.unwrap();
        assert_eq!(counts.get(&slot), Some(&3));
        assert_eq!(counts.get(&(slot + width)), Some(&1));
    }
}
