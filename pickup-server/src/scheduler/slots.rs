//! Time-slot bucketing and aggregation
//!
//! Buckets are half-open `[start, start + width)` windows aligned to the
//! Unix epoch, so two computations of the same instant always agree. The
//! aggregation itself is a derived view: one repository read plus a pure,
//! restartable iterator over the configured window. Nothing is retained
//! between calls.

use shared::error::AppResult;
use shared::models::TimeSlot;
use std::collections::HashMap;

use crate::core::SlotConfig;
use crate::db::repository::OrderRepository;

/// Floor `ts_ms` to the start of its slot
pub fn slot_start(ts_ms: i64, slot_width_minutes: u32) -> i64 {
    let width = slot_width_minutes as i64 * 60_000;
    // rem_euclid keeps pre-epoch timestamps on the same grid
    ts_ms - ts_ms.rem_euclid(width)
}

/// Materialize the rolling window around `now_ms` from per-slot counts.
///
/// Spans `[now - past*width, now + future*width]`; the slot containing
/// `now` is flagged `is_current` once here so consumers need not recompute
/// it. Lazy and side-effect free.
pub fn build_slots<'a>(
    now_ms: i64,
    counts: &'a HashMap<i64, u32>,
    cfg: &'a SlotConfig,
) -> impl Iterator<Item = TimeSlot> + 'a {
    let width = cfg.width_ms();
    let current = slot_start(now_ms, cfg.slot_width_minutes);
    let first = current - cfg.past_slots_to_show as i64 * width;
    let total = cfg.past_slots_to_show + cfg.future_slots_to_show + 1;

    (0..total as i64).map(move |i| {
        let start = first + i * width;
        let count = counts.get(&start).copied().unwrap_or(0);
        TimeSlot {
            start,
            count,
            color: cfg.thresholds.color_for(count),
            blocked: cfg.thresholds.blocks(count),
            is_current: start == current,
        }
    })
}

/// Aggregates live order load into the slot window for dashboards
#[derive(Clone)]
pub struct TimeSlotAggregator {
    repo: OrderRepository,
    cfg: SlotConfig,
}

impl TimeSlotAggregator {
    pub fn new(repo: OrderRepository, cfg: SlotConfig) -> Self {
        Self { repo, cfg }
    }

    /// Produce the ordered slot sequence around `now_ms`.
    ///
    /// Counts reflect orders visible at query time — an eventually
    /// consistent snapshot, not a frozen transaction.
    pub async fn aggregate(&self, now_ms: i64) -> AppResult<Vec<TimeSlot>> {
        let width = self.cfg.width_ms();
        let current = slot_start(now_ms, self.cfg.slot_width_minutes);
        let range_start = current - self.cfg.past_slots_to_show as i64 * width;
        let range_end = current + (self.cfg.future_slots_to_show as i64 + 1) * width;

        let counts = self.repo.slot_counts(range_start, range_end).await?;
        Ok(build_slots(now_ms, &counts, &self.cfg).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{SlotColor, SlotThresholds};

    fn cfg() -> SlotConfig {
        SlotConfig {
            slot_width_minutes: 15,
            past_slots_to_show: 1,
            future_slots_to_show: 3,
            thresholds: SlotThresholds {
                warning: 5,
                critical: 8,
                max: 10,
            },
        }
    }

    const WIDTH: i64 = 15 * 60_000;

    #[test]
    fn test_same_window_same_bucket() {
        let base = 1_700_000_100_000;
        let start = slot_start(base, 15);
        // Every instant in [start, start+width) maps to start
        assert_eq!(slot_start(start, 15), start);
        assert_eq!(slot_start(start + 1, 15), start);
        assert_eq!(slot_start(start + WIDTH - 1, 15), start);
        // The boundary itself opens the next bucket
        assert_eq!(slot_start(start + WIDTH, 15), start + WIDTH);
    }

    #[test]
    fn test_bucketing_is_deterministic() {
        for ts in [0, 1, 899_999, 900_000, 1_700_000_123_456] {
            assert_eq!(slot_start(ts, 15), slot_start(ts, 15));
            assert_eq!(slot_start(ts, 15) % WIDTH, 0);
        }
    }

    #[test]
    fn test_pre_epoch_timestamps_stay_on_grid() {
        assert_eq!(slot_start(-1, 15), -WIDTH);
        assert_eq!(slot_start(-WIDTH, 15), -WIDTH);
    }

    #[test]
    fn test_window_shape() {
        let cfg = cfg();
        let now = 5 * WIDTH + 1_234;
        let slots: Vec<TimeSlot> = build_slots(now, &HashMap::new(), &cfg).collect();

        // past + current + future buckets, ordered, contiguous
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[0].start, 4 * WIDTH);
        assert_eq!(slots[4].start, 8 * WIDTH);
        for pair in slots.windows(2) {
            assert_eq!(pair[1].start - pair[0].start, WIDTH);
        }

        // Exactly one current slot, the one containing now
        let current: Vec<&TimeSlot> = slots.iter().filter(|s| s.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].start, 5 * WIDTH);
    }

    #[test]
    fn test_counts_drive_color_and_blocked() {
        let cfg = cfg();
        let now = 10 * WIDTH;
        let mut counts = HashMap::new();
        counts.insert(10 * WIDTH, 5u32); // warn
        counts.insert(11 * WIDTH, 8u32); // crit
        counts.insert(12 * WIDTH, 10u32); // crit + blocked

        let slots: Vec<TimeSlot> = build_slots(now, &counts, &cfg).collect();
        let by_start: HashMap<i64, &TimeSlot> = slots.iter().map(|s| (s.start, s)).collect();

        let empty = by_start[&(9 * WIDTH)];
        assert_eq!((empty.count, empty.color, empty.blocked), (0, SlotColor::Ok, false));

        let warn = by_start[&(10 * WIDTH)];
        assert_eq!((warn.color, warn.blocked), (SlotColor::Warn, false));

        let crit = by_start[&(11 * WIDTH)];
        assert_eq!((crit.color, crit.blocked), (SlotColor::Crit, false));

        let full = by_start[&(12 * WIDTH)];
        assert_eq!((full.color, full.blocked), (SlotColor::Crit, true));
    }

    #[test]
    fn test_iterator_is_restartable() {
        let cfg = cfg();
        let counts = HashMap::from([(0i64, 3u32)]);
        let first: Vec<TimeSlot> = build_slots(0, &counts, &cfg).collect();
        let second: Vec<TimeSlot> = build_slots(0, &counts, &cfg).collect();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!((a.start, a.count), (b.start, b.count));
        }
    }
}
