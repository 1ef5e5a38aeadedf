//! Order admission scheduler
//!
//! Orchestrates the write path: validates incoming orders, checks slot
//! capacity against live load, creates the record, and drives all status
//! transitions through the state machine.

use shared::error::{AppError, AppResult};
use shared::models::{Order, OrderItem, OrderStatus};
use std::collections::BTreeMap;

use crate::core::SlotConfig;
use crate::db::repository::OrderRepository;
use crate::scheduler::slots::slot_start;
use crate::scheduler::status::OrderStatusMachine;

#[derive(Clone)]
pub struct OrderAdmissionScheduler {
    repo: OrderRepository,
    cfg: SlotConfig,
}

impl OrderAdmissionScheduler {
    pub fn new(repo: OrderRepository, cfg: SlotConfig) -> Self {
        Self { repo, cfg }
    }

    /// Admit a new order into the requested pickup slot.
    ///
    /// The slot count is re-read immediately before the insert. Two
    /// concurrent submissions can both observe `count < max` and both
    /// succeed, momentarily exceeding max — an accepted soft guarantee at
    /// walk-up scale; the insert itself is atomic, so a failure leaves no
    /// partial record.
    pub async fn submit(&self, requested_slot: i64, items: Vec<OrderItem>) -> AppResult<Order> {
        if items.is_empty() {
            return Err(AppError::invalid_order("order must contain at least one item"));
        }
        if let Some(bad) = items.iter().find(|i| i.quantity == 0) {
            return Err(
                AppError::invalid_order("item quantity must be positive")
                    .with_detail("item_id", bad.item_id.clone()),
            );
        }

        let slot = slot_start(requested_slot, self.cfg.slot_width_minutes);
        let count = self.repo.count_in_slot(slot, self.cfg.width_ms()).await?;
        if self.cfg.thresholds.blocks(count) {
            tracing::info!(slot, count, "Rejected order for full slot");
            return Err(AppError::slot_full(slot));
        }

        let order = self.repo.create(items, slot, OrderStatus::Pending).await?;
        tracing::info!(
            order_id = order.id,
            slot,
            count = count + 1,
            "Order admitted"
        );
        Ok(order)
    }

    /// Resolve current status for a set of order ids in one query.
    ///
    /// Every id must be well-formed (`InvalidReference` otherwise);
    /// well-formed ids that match nothing are simply absent from the map.
    pub async fn batch_status(&self, ids: &[String]) -> AppResult<BTreeMap<String, OrderStatus>> {
        let parsed: Vec<i64> = ids
            .iter()
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| AppError::invalid_reference(raw.clone()))
            })
            .collect::<AppResult<_>>()?;

        let orders = self.repo.find_by_ids(&parsed).await?;
        Ok(orders
            .into_iter()
            .map(|o| (o.id.to_string(), o.status))
            .collect())
    }

    /// Apply a staff-triggered status transition.
    ///
    /// The state machine is consulted before the single-write-path update;
    /// concurrent transitions on one order race last-write-wins at the
    /// repository layer.
    pub async fn transition(&self, order_id: i64, target: OrderStatus) -> AppResult<Order> {
        let order = self
            .repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::order_not_found(order_id.to_string()))?;

        OrderStatusMachine::validate(order.status, target)?;

        let updated = self.repo.update_status(order_id, target).await?;
        tracing::info!(
            order_id,
            from = %order.status,
            to = %target,
            "Order status transitioned"
        );
        Ok(updated)
    }

    /// Administrative bulk delete, outside the normal lifecycle
    pub async fn purge(&self, ids: &[String]) -> AppResult<u64> {
        let parsed: Vec<i64> = ids
            .iter()
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| AppError::invalid_reference(raw.clone()))
            })
            .collect::<AppResult<_>>()?;

        let removed = self.repo.delete_many(&parsed).await?;
        tracing::info!(removed, "Orders purged");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SlotConfig;
    use crate::db::DbService;
    use shared::error::ErrorCode;
    use shared::models::SlotThresholds;

    const WIDTH: i64 = 15 * 60_000;

    fn cfg() -> SlotConfig {
        SlotConfig {
            slot_width_minutes: 15,
            past_slots_to_show: 1,
            future_slots_to_show: 8,
            thresholds: SlotThresholds {
                warning: 5,
                critical: 8,
                max: 10,
            },
        }
    }

    async fn test_scheduler() -> (tempfile::TempDir, OrderAdmissionScheduler, OrderRepository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        let repo = OrderRepository::new(db.pool);
        (dir, OrderAdmissionScheduler::new(repo.clone(), cfg()), repo)
    }

    fn espresso(quantity: u32) -> Vec<OrderItem> {
        vec![OrderItem {
            item_id: "espresso".into(),
            quantity,
        }]
    }

    #[tokio::test]
    async fn test_submit_rejects_malformed_orders() {
        let (_dir, scheduler, _) = test_scheduler().await;

        let err = scheduler.submit(0, vec![]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrder);

        let err = scheduler.submit(0, espresso(0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrder);
    }

    #[tokio::test]
    async fn test_submit_snaps_slot_and_starts_pending() {
        let (_dir, scheduler, _) = test_scheduler().await;
        // 14:07-style timestamp inside the 56th slot of the day
        let requested = 56 * WIDTH + 7 * 60_000;
        let order = scheduler.submit(requested, espresso(2)).await.unwrap();
        assert_eq!(order.pickup_slot, 56 * WIDTH);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_slot_fills_at_max_and_neighbor_stays_open() {
        let (_dir, scheduler, _) = test_scheduler().await;
        let slot = 56 * WIDTH; // "14:00"

        // Nine orders placed; the tenth still succeeds and fills the slot
        for _ in 0..9 {
            scheduler.submit(slot, espresso(1)).await.unwrap();
        }
        let tenth = scheduler.submit(slot, espresso(1)).await.unwrap();
        assert_eq!(tenth.status, OrderStatus::Pending);

        // The eleventh is refused
        let err = scheduler.submit(slot, espresso(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SlotFull);

        // The next slot ("14:15") admits regardless
        let next = scheduler.submit(slot + WIDTH, espresso(1)).await.unwrap();
        assert_eq!(next.pickup_slot, slot + WIDTH);
    }

    #[tokio::test]
    async fn test_cancelled_orders_free_capacity() {
        let (_dir, scheduler, _) = test_scheduler().await;
        let slot = 56 * WIDTH;
        let mut first = None;
        for _ in 0..10 {
            let o = scheduler.submit(slot, espresso(1)).await.unwrap();
            first.get_or_insert(o.id);
        }
        assert_eq!(
            scheduler.submit(slot, espresso(1)).await.unwrap_err().code,
            ErrorCode::SlotFull
        );

        scheduler
            .transition(first.unwrap(), OrderStatus::Cancelled)
            .await
            .unwrap();
        assert!(scheduler.submit(slot, espresso(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_batch_status() {
        let (_dir, scheduler, _) = test_scheduler().await;
        let a = scheduler.submit(0, espresso(1)).await.unwrap();
        let b = scheduler.submit(0, espresso(1)).await.unwrap();
        scheduler.transition(b.id, OrderStatus::Confirmed).await.unwrap();
        scheduler.transition(b.id, OrderStatus::Preparing).await.unwrap();
        scheduler.transition(b.id, OrderStatus::Ready).await.unwrap();

        let statuses = scheduler
            .batch_status(&[a.id.to_string(), b.id.to_string(), "424242".into()])
            .await
            .unwrap();

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[&a.id.to_string()], OrderStatus::Pending);
        assert_eq!(statuses[&b.id.to_string()], OrderStatus::Ready);
        assert!(!statuses.contains_key("424242"));
    }

    #[tokio::test]
    async fn test_batch_status_rejects_malformed_ids() {
        let (_dir, scheduler, _) = test_scheduler().await;
        let err = scheduler
            .batch_status(&["notanid".into()])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidReference);
    }

    #[tokio::test]
    async fn test_transition_enforces_machine() {
        let (_dir, scheduler, _) = test_scheduler().await;
        let order = scheduler.submit(0, espresso(1)).await.unwrap();

        // Skipping a state is refused and nothing is persisted
        let err = scheduler
            .transition(order.id, OrderStatus::Ready)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::IllegalTransition);

        let statuses = scheduler
            .batch_status(&[order.id.to_string()])
            .await
            .unwrap();
        assert_eq!(statuses[&order.id.to_string()], OrderStatus::Pending);

        // Unknown order id
        let err = scheduler
            .transition(424242, OrderStatus::Confirmed)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
    }

    #[tokio::test]
    async fn test_purge() {
        let (_dir, scheduler, repo) = test_scheduler().await;
        let a = scheduler.submit(0, espresso(1)).await.unwrap();
        let b = scheduler.submit(0, espresso(1)).await.unwrap();

        let removed = scheduler
            .purge(&[a.id.to_string(), "424242".into()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(repo.find_by_id(a.id).await.unwrap().is_none());
        assert!(repo.find_by_id(b.id).await.unwrap().is_some());

        let err = scheduler.purge(&["bogus".into()]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidReference);
    }
}
