//! Minting interface - validate an entered code, then simulate the mint
//!
//! The redeem flow walks validating → minting → success/error, pushing each
//! transition to the caller's channel. An invalid code never reaches the
//! wallet; a failed attempt is terminal and retried only by the user.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::codes::store::CodeStore;
use crate::codes::validator;
use crate::protocol::ServerMessage;
use crate::wallet::WalletSession;

/// State of an in-flight mint attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MintStatus {
    /// Checking the entered code against the store
    Validating,
    /// Code accepted; simulated transaction in flight
    Minting,
    /// Minted; carries the token identifier
    Success { token_id: String },
    /// Terminal failure for this attempt
    Error { message: String },
}

/// Run one redeem attempt, reporting every transition on `out`.
pub async fn redeem(
    store: &CodeStore,
    wallet: &WalletSession,
    code: &str,
    out: &mpsc::Sender<ServerMessage>,
) {
    if wallet.account().await.is_none() {
        let _ = out
            .send(ServerMessage::Notice {
                message: "Connect your wallet before minting.".to_string(),
            })
            .await;
        return;
    }

    let _ = out
        .send(ServerMessage::Mint {
            status: MintStatus::Validating,
        })
        .await;

    let valid = match validator::validate(store, code).await {
        Ok(valid) => valid,
        Err(e) => {
            error!(error = %e, "code validation failed");
            let _ = out
                .send(ServerMessage::Mint {
                    status: MintStatus::Error {
                        message: "Something went wrong. Please try again.".to_string(),
                    },
                })
                .await;
            return;
        }
    };

    if !valid {
        let _ = out
            .send(ServerMessage::Mint {
                status: MintStatus::Error {
                    message: "Invalid code. Please enter a valid code generated from the game."
                        .to_string(),
                },
            })
            .await;
        return;
    }

    let _ = out
        .send(ServerMessage::Mint {
            status: MintStatus::Minting,
        })
        .await;

    match wallet.mint_simulate(code).await {
        Ok(token_id) => {
            let _ = out
                .send(ServerMessage::Mint {
                    status: MintStatus::Success { token_id },
                })
                .await;
        }
        Err(e) => {
            warn!(error = %e, "mint simulation failed");
            let _ = out
                .send(ServerMessage::Mint {
                    status: MintStatus::Error {
                        message: "An error occurred during minting. Please try again.".to_string(),
                    },
                })
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::codes::issuer;
    use crate::wallet::mock::MockProvider;

    async fn test_store() -> (tempfile::TempDir, CodeStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CodeStore::open(dir.path().join("codes.db")).await.unwrap();
        (dir, store)
    }

    fn statuses(messages: &[ServerMessage]) -> Vec<&MintStatus> {
        messages
            .iter()
            .filter_map(|m| match m {
                ServerMessage::Mint { status } => Some(status),
                _ => None,
            })
            .collect()
    }

    async fn drain(mut rx: mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    #[tokio::test]
    async fn test_redeem_happy_path() {
        let (_dir, store) = test_store().await;
        let wallet =
            WalletSession::new(Arc::new(MockProvider::with_accounts(vec![
                "0xalice".to_string()
            ])));
        wallet.connect().await.unwrap();

        let code = issuer::issue(&store).await.unwrap();

        let (tx, rx) = mpsc::channel(16);
        redeem(&store, &wallet, &code, &tx).await;
        drop(tx);

        let messages = drain(rx).await;
        let statuses = statuses(&messages);
        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[0], &MintStatus::Validating);
        assert_eq!(statuses[1], &MintStatus::Minting);
        assert!(matches!(statuses[2], MintStatus::Success { .. }));
    }

    #[tokio::test]
    async fn test_redeem_invalid_code_skips_wallet() {
        let (_dir, store) = test_store().await;
        let wallet =
            WalletSession::new(Arc::new(MockProvider::with_accounts(vec![
                "0xalice".to_string()
            ])));
        wallet.connect().await.unwrap();

        let (tx, rx) = mpsc::channel(16);
        redeem(&store, &wallet, "NOT1SSUED", &tx).await;
        drop(tx);

        let messages = drain(rx).await;
        let statuses = statuses(&messages);
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0], &MintStatus::Validating);
        assert!(matches!(statuses[1], MintStatus::Error { .. }));
    }

    #[tokio::test]
    async fn test_redeem_without_account_gives_guidance() {
        let (_dir, store) = test_store().await;
        let wallet =
            WalletSession::new(Arc::new(MockProvider::with_accounts(vec![
                "0xalice".to_string()
            ])));
        // Never connected
        let code = issuer::issue(&store).await.unwrap();

        let (tx, rx) = mpsc::channel(16);
        redeem(&store, &wallet, &code, &tx).await;
        drop(tx);

        let messages = drain(rx).await;
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], ServerMessage::Notice { .. }));

        // The code is untouched and still redeemable
        assert!(!store.get(&code).await.unwrap().unwrap().used);
    }
}
