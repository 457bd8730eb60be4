//! Code issuer - generates and persists single-use redemption codes

use rand::Rng;
use tracing::debug;

use crate::config::{CODE_ALPHABET, CODE_ISSUE_ATTEMPTS, CODE_LENGTH};
use crate::error::StoreError;

use super::store::CodeStore;

/// Generate a code: independent uniform draws from the code alphabet
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();

    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Generate a fresh code and persist it as unused.
///
/// Generation has no memory of existing codes; the UNIQUE constraint catches
/// the rare collision and we draw again, a bounded number of times.
pub async fn issue(store: &CodeStore) -> Result<String, StoreError> {
    for _ in 0..CODE_ISSUE_ATTEMPTS {
        let code = generate_code();
        if store.try_insert(&code).await? {
            return Ok(code);
        }
        debug!(%code, "generated code already exists, drawing again");
    }

    Err(StoreError::Exhausted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[tokio::test]
    async fn test_issue_persists_unused_code() {
        let dir = tempfile::tempdir().unwrap();
        let store = CodeStore::open(dir.path().join("codes.db")).await.unwrap();

        let code = issue(&store).await.unwrap();

        let record = store.get(&code).await.unwrap().unwrap();
        assert_eq!(record.code, code);
        assert!(!record.used);
    }
}
