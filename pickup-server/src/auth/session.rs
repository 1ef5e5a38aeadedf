//! Bearer session store
//!
//! Issues, validates, and expires opaque bearer tokens. Constructed once at
//! startup and handed to request handlers through [`crate::core::AppState`];
//! never a module-level singleton, so tests can build and drop their own.

use dashmap::DashMap;
use rand::Rng;
use rand::distributions::Alphanumeric;
use shared::error::{AppError, AppResult};
use shared::models::Session;
use shared::util::now_millis;

const TOKEN_LEN: usize = 48;

/// Process-wide session store. Exactly one non-expired session per token;
/// expiry is fixed at creation and never extended implicitly.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    lifetime_ms: i64,
}

impl SessionStore {
    pub fn new(lifetime_hours: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            lifetime_ms: lifetime_hours as i64 * 3_600_000,
        }
    }

    /// Issue a new session for `user_id`
    pub fn create(&self, user_id: &str) -> Session {
        self.create_at(user_id, now_millis())
    }

    /// Resolve a token to its owning user id.
    ///
    /// Fails `NotAuthenticated` both when no session matches and when the
    /// matching session has expired — callers cannot distinguish the two.
    pub fn validate(&self, token: &str) -> AppResult<String> {
        self.validate_at(token, now_millis())
    }

    /// Delete the session for `token`; returns whether one existed
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Remove every session whose expiry has passed, returning the count
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(now_millis())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn create_at(&self, user_id: &str, now_ms: i64) -> Session {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        let session = Session {
            token: token.clone(),
            user_id: user_id.to_owned(),
            expires_at: now_ms + self.lifetime_ms,
        };
        self.sessions.insert(token, session.clone());
        session
    }

    fn validate_at(&self, token: &str, now_ms: i64) -> AppResult<String> {
        match self.sessions.get(token) {
            Some(session) if !session.is_expired_at(now_ms) => Ok(session.user_id.clone()),
            _ => Err(AppError::not_authenticated()),
        }
    }

    fn sweep_expired_at(&self, now_ms: i64) -> usize {
        // Counted inside the closure: logins insert concurrently, so a
        // before/after length difference can go negative
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let keep = !session.is_expired_at(now_ms);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}
