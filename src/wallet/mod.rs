//! Wallet adapter
//!
//! [`WalletProvider`] is the boundary to the external wallet: account
//! authorization plus a stream of account-change notifications. The current
//! implementation is a mock; a real blockchain client can be swapped in
//! behind the same trait without touching the game or code modules.

pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::config::{MINT_DELAY_MS, MINT_TOKEN_SPACE};
use crate::error::WalletError;

/// Receiver of account-change notifications
pub type AccountsReceiver = broadcast::Receiver<Vec<String>>;

/// Capability boundary to the external wallet
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet to authorize account access
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Subscribe to account-change notifications
    fn subscribe_accounts(&self) -> AccountsReceiver;
}

/// Holds the connected account for the lifetime of the process and exposes
/// the mint simulation.
pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    account: RwLock<Option<String>>,
}

impl WalletSession {
    /// Create a session over a provider and start applying its
    /// account-change notifications. The watcher runs until the provider
    /// goes away.
    pub fn new(provider: Arc<dyn WalletProvider>) -> Arc<Self> {
        let session = Arc::new(Self {
            provider: provider.clone(),
            account: RwLock::new(None),
        });

        let watcher = session.clone();
        let mut changes = provider.subscribe_accounts();
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(accounts) => {
                        let next = accounts.into_iter().next();
                        info!(account = ?next, "wallet accounts changed");
                        *watcher.account.write().await = next;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "account watcher lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        session
    }

    /// The currently connected account, if any
    pub async fn account(&self) -> Option<String> {
        self.account.read().await.clone()
    }

    /// Request account access and store the first returned address
    pub async fn connect(&self) -> Result<String, WalletError> {
        let accounts = self.provider.request_accounts().await?;
        let first = accounts
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::Rejected("no accounts returned".into()))?;

        *self.account.write().await = Some(first.clone());
        info!(account = %first, "wallet connected");
        Ok(first)
    }

    /// Simulate minting an NFT against the entered code.
    ///
    /// No chain is involved: after a fixed delay standing in for transaction
    /// latency, a random token identifier comes back.
    pub async fn mint_simulate(&self, code: &str) -> Result<String, WalletError> {
        let account = self.account().await.ok_or(WalletError::NotConnected)?;

        tokio::time::sleep(Duration::from_millis(MINT_DELAY_MS)).await;

        let token_id = rand::thread_rng().gen_range(0..MINT_TOKEN_SPACE).to_string();
        info!(%code, %account, %token_id, "simulated mint");
        Ok(token_id)
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockProvider;
    use super::*;
    use crate::config::MINT_TOKEN_SPACE;

    #[tokio::test]
    async fn test_connect_stores_first_account() {
        let provider = Arc::new(MockProvider::with_accounts(vec![
            "0xalice".to_string(),
            "0xbob".to_string(),
        ]));
        let session = WalletSession::new(provider);

        assert_eq!(session.account().await, None);

        let account = session.connect().await.unwrap();
        assert_eq!(account, "0xalice");
        assert_eq!(session.account().await, Some("0xalice".to_string()));
    }

    #[tokio::test]
    async fn test_absent_provider_reports_unavailable() {
        let session = WalletSession::new(Arc::new(MockProvider::absent()));

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, WalletError::Unavailable));
        assert_eq!(session.account().await, None);
    }

    #[tokio::test]
    async fn test_mint_requires_connection() {
        let session = WalletSession::new(Arc::new(MockProvider::with_accounts(vec![
            "0xalice".to_string(),
        ])));

        let err = session.mint_simulate("AAAA1111").await.unwrap_err();
        assert!(matches!(err, WalletError::NotConnected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mint_returns_token_id() {
        let session = WalletSession::new(Arc::new(MockProvider::with_accounts(vec![
            "0xalice".to_string(),
        ])));
        session.connect().await.unwrap();

        let token_id = session.mint_simulate("AAAA1111").await.unwrap();
        let token: u64 = token_id.parse().unwrap();
        assert!(token < MINT_TOKEN_SPACE);
    }

    #[tokio::test]
    async fn test_account_change_updates_session() {
        let provider = Arc::new(MockProvider::with_accounts(vec!["0xalice".to_string()]));
        let session = WalletSession::new(provider.clone());
        session.connect().await.unwrap();

        provider.push_accounts(vec!["0xbob".to_string()]);

        // Give the watcher task a chance to apply the notification
        for _ in 0..20 {
            tokio::task::yield_now().await;
            if session.account().await == Some("0xbob".to_string()) {
                break;
            }
        }
        assert_eq!(session.account().await, Some("0xbob".to_string()));
    }

    #[tokio::test]
    async fn test_account_change_can_disconnect() {
        let provider = Arc::new(MockProvider::with_accounts(vec!["0xalice".to_string()]));
        let session = WalletSession::new(provider.clone());
        session.connect().await.unwrap();

        provider.push_accounts(Vec::new());

        for _ in 0..20 {
            tokio::task::yield_now().await;
            if session.account().await.is_none() {
                break;
            }
        }
        assert_eq!(session.account().await, None);
    }
}
