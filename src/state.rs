//! Application state shared across all handlers

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::codes::store::CodeStore;
use crate::wallet::WalletSession;

/// A connected game client
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub connected_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn new() -> Self {
        Self {
            connected_at: Utc::now(),
        }
    }
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared application state
pub struct AppState {
    /// Persistent store of redemption codes
    pub store: CodeStore,
    /// Process-wide wallet session
    pub wallet: Arc<WalletSession>,
    /// Active game connections, keyed by connection UUID
    pub sessions: DashMap<Uuid, SessionInfo>,
}

impl AppState {
    pub fn new(store: CodeStore, wallet: Arc<WalletSession>) -> Self {
        Self {
            store,
            wallet,
            sessions: DashMap::new(),
        }
    }

    /// Number of connected game clients
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
