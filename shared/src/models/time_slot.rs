//! Time Slot View Model
//!
//! Slots are derived views over live order counts. Color and blocked are
//! pure functions of (count, thresholds); they are never stored and always
//! recomputed from current state.

use serde::{Deserialize, Serialize};

/// Load-based slot coloring for staff dashboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotColor {
    Ok,
    Warn,
    Crit,
}

/// Configured count boundaries driving slot color and blocking.
///
/// `warning ≤ critical` must hold; `max` is independent and may sit below,
/// at, or above `critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotThresholds {
    pub warning: u32,
    pub critical: u32,
    pub max: u32,
}

impl SlotThresholds {
    /// Color for a slot with `count` active orders
    pub fn color_for(&self, count: u32) -> SlotColor {
        if count >= self.critical {
            SlotColor::Crit
        } else if count >= self.warning {
            SlotColor::Warn
        } else {
            SlotColor::Ok
        }
    }

    /// Whether a slot with `count` active orders rejects new admissions
    pub fn blocks(&self, count: u32) -> bool {
        count >= self.max
    }
}

/// One fixed-width time bucket of the aggregation window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot start, UTC milliseconds, aligned to the slot boundary
    pub start: i64,
    /// Count of non-cancelled orders assigned to this slot
    pub count: u32,
    pub color: SlotColor,
    pub blocked: bool,
    /// Presentation hint: this slot contains "now"
    pub is_current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: SlotThresholds = SlotThresholds {
        warning: 5,
        critical: 8,
        max: 10,
    };

    #[test]
    fn test_color_bands() {
        assert_eq!(THRESHOLDS.color_for(0), SlotColor::Ok);
        assert_eq!(THRESHOLDS.color_for(4), SlotColor::Ok);
        assert_eq!(THRESHOLDS.color_for(5), SlotColor::Warn);
        assert_eq!(THRESHOLDS.color_for(7), SlotColor::Warn);
        assert_eq!(THRESHOLDS.color_for(8), SlotColor::Crit);
        assert_eq!(THRESHOLDS.color_for(100), SlotColor::Crit);
    }

    #[test]
    fn test_warning_count_never_ok_and_critical_never_warn() {
        // warning ≤ critical: count == warning must not be Ok,
        // count == critical must not be Warn
        for warning in 1..10u32 {
            for critical in warning..12u32 {
                let t = SlotThresholds {
                    warning,
                    critical,
                    max: 10,
                };
                assert_ne!(t.color_for(warning), SlotColor::Ok);
                assert_ne!(t.color_for(critical), SlotColor::Warn);
            }
        }
    }

    #[test]
    fn test_blocking_independent_of_color() {
        // max below critical: a slot can block while still Warn-colored
        let t = SlotThresholds {
            warning: 2,
            critical: 8,
            max: 4,
        };
        assert!(!t.blocks(3));
        assert!(t.blocks(4));
        assert_eq!(t.color_for(4), SlotColor::Warn);

        // max above critical: a Crit slot may still admit
        let t = SlotThresholds {
            warning: 2,
            critical: 4,
            max: 8,
        };
        assert_eq!(t.color_for(5), SlotColor::Crit);
        assert!(!t.blocks(5));
    }
}
