//! Snapshot of the user's accounts and transactions.
//!
//! The backend owns the real ledger; the client only ever holds a copy.  A
//! snapshot is read from a JSON file in the backend's response shape, or
//! taken from the built-in demo data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::account::Account;
use super::transaction::{Source, Transaction};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ledger {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub user: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LedgerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| LedgerError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Transactions touching `account_id`, newest first.
    pub fn history_for(&self, account_id: i64) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.touches(account_id))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        out
    }

    /// Demo data used when no snapshot file is given.
    pub fn demo() -> Self {
        let account = |id: i64, name: &str, balance: f64| Account {
            id,
            name: name.to_string(),
            balance,
        };
        let tx = |id: i64, balance: f64, origin: Source, destination: Source, timestamp: i64| {
            Transaction {
                id,
                balance,
                origin,
                destination,
                state: "Completed".to_string(),
                timestamp,
            }
        };

        let savings = 2_388_376_114;
        let allowance = 123_123_123;
        let travel = 987_654_321;
        let rainy_day = 555_000_111;
        let friend = 42_424_242;

        Self {
            user: "han_yuji".to_string(),
            accounts: vec![
                account(savings, "Savings", 10.0),
                account(allowance, "Allowance", 100.0),
                account(travel, "Travel", 1_000.0),
                account(rainy_day, "Rainy Day", 100_000.0),
            ],
            transactions: vec![
                tx(1, 500.0, Source::Bank, Source::User(allowance), 1_717_200_000),
                tx(2, 50.0, Source::User(allowance), Source::User(savings), 1_717_286_400),
                tx(3, 40.0, Source::User(savings), Source::User(friend), 1_717_372_800),
                tx(4, 25.0, Source::AutoTransfer(allowance), Source::User(travel), 1_717_459_200),
                tx(5, 12.5, Source::User(travel), Source::User(friend), 1_717_545_600),
                tx(6, 99_000.0, Source::Bank, Source::User(rainy_day), 1_717_632_000),
                tx(7, 25.0, Source::AutoTransfer(allowance), Source::User(travel), 1_718_064_000),
            ],
        }
    }
}
