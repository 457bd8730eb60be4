//! Mock wallet provider - stands in for the browser wallet extension

use async_trait::async_trait;
use rand::RngCore;
use tokio::sync::broadcast;

use crate::error::WalletError;

use super::{AccountsReceiver, WalletProvider};

/// Capacity of the account-change channel
const CHANGE_CAPACITY: usize = 8;

/// In-process wallet provider with a fixed account list.
///
/// `push_accounts` plays the role of the extension's account-change
/// notification, so tests and the dev server can drive the full adapter.
pub struct MockProvider {
    accounts: Vec<String>,
    available: bool,
    changes: broadcast::Sender<Vec<String>>,
}

impl MockProvider {
    /// A provider exposing the given accounts
    pub fn with_accounts(accounts: Vec<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            accounts,
            available: true,
            changes,
        }
    }

    /// A provider with one freshly generated dev account
    pub fn dev() -> Self {
        Self::with_accounts(vec![random_address()])
    }

    /// No extension installed: every request reports unavailability
    pub fn absent() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            accounts: Vec::new(),
            available: false,
            changes,
        }
    }

    /// Emit an account-change notification to all subscribers
    pub fn push_accounts(&self, accounts: Vec<String>) {
        // No receivers is fine
        let _ = self.changes.send(accounts);
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        if !self.available {
            return Err(WalletError::Unavailable);
        }
        Ok(self.accounts.clone())
    }

    fn subscribe_accounts(&self) -> AccountsReceiver {
        self.changes.subscribe()
    }
}

/// Generate a plausible 20-byte hex address
pub fn random_address() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_accounts() {
        let provider = MockProvider::with_accounts(vec!["0xalice".to_string()]);
        assert_eq!(
            provider.request_accounts().await.unwrap(),
            vec!["0xalice".to_string()]
        );
    }

    #[tokio::test]
    async fn test_absent_provider() {
        let provider = MockProvider::absent();
        assert!(matches!(
            provider.request_accounts().await,
            Err(WalletError::Unavailable)
        ));
    }

    #[test]
    fn test_random_address_shape() {
        let address = random_address();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
    }
}
