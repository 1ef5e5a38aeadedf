//! Session Model

use serde::{Deserialize, Serialize};

/// A time-bounded authentication credential tying a token to a staff identity.
///
/// The token is an opaque random identifier; the store never interprets its
/// content. Expiry is fixed at creation and never extended implicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    /// UTC milliseconds
    pub expires_at: i64,
}

impl Session {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at < now_ms
    }
}
