//! Account-to-account transfer form.
//!
//! The form walks `AccountSelection → AmountSelection → Done` and ends with
//! the [`TransferRequest`] the backend would receive.  Submitting it is left
//! to the caller; nothing here touches the network.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::account::{format_account_id, format_currency, Account};

/// Keep digits and a single decimal point, with at most two decimals.
///
/// Every `.` after the first is dropped and the pieces around it are joined,
/// so `"1.2.3"` becomes `"1.23"`.
pub fn sanitize_amount(input: &str) -> String {
    let filtered: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = filtered.split('.');
    let whole = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return whole.to_string();
    }
    let fraction: String = rest.concat().chars().take(2).collect();
    format!("{whole}.{fraction}")
}

// ───────────────────────────────────────── request ───────────

/// What a confirmed form hands to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferRequest {
    pub amount: f64,
    pub origin: i64,
    pub destination: i64,
}

impl TransferRequest {
    /// Path and query of the backend transfer endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "/transfer/account/account?amount={}&origin={}&destination={}",
            self.amount, self.origin, self.destination
        )
    }
}

// ───────────────────────────────────────── outcome ───────────

/// Backend answer to a transfer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Success,
    InsufficientBalance,
    SurpassedLimit,
    WillSurpassLimit,
    /// Anything else the backend may answer, kept verbatim.
    Other(String),
}

impl TransferOutcome {
    /// Parse a response body: `"Success"` or a one-entry map such as
    /// `{"Account": "InsufficientBalance"}`.
    pub fn from_response(body: &Value) -> Self {
        let code = match body {
            Value::String(s) => s.as_str(),
            Value::Object(map) => match map.values().next() {
                Some(Value::String(s)) => s.as_str(),
                Some(other) => return Self::Other(other.to_string()),
                None => return Self::Other(String::new()),
            },
            other => return Self::Other(other.to_string()),
        };
        Self::from_code(code)
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "Success" => Self::Success,
            "InsufficientBalance" => Self::InsufficientBalance,
            "SurpassedLimit" => Self::SurpassedLimit,
            "WillSurpassLimit" => Self::WillSurpassLimit,
            other => Self::Other(other.to_string()),
        }
    }

    /// Message shown on the form; `None` on success.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Success => None,
            Self::InsufficientBalance => Some("Insufficient balance"),
            Self::SurpassedLimit => Some("Limit already surpassed"),
            Self::WillSurpassLimit => Some("Limit will be surpassed"),
            Self::Other(_) => Some("Invalid"),
        }
    }
}

// ───────────────────────────────────────── form ──────────────

/// Steps of the send form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStage {
    AccountSelection,
    AmountSelection,
    Done,
}

/// Result of pressing confirm on the form.
#[derive(Debug, Clone, PartialEq)]
pub enum SendStep {
    /// Moved on to the next stage.
    Advanced,
    /// The request was rejected before leaving the client.
    Rejected(TransferOutcome),
    /// Form is complete; this is what would be sent.
    Ready(TransferRequest),
    /// Nothing to do (no destination to pick).
    Unchanged,
}

/// Send-money form for one origin account.
#[derive(Debug, Clone)]
pub struct SendFlow {
    origin: Account,
    destinations: Vec<Account>,
    selected: usize,
    amount: String,
    stage: SendStage,
    status: Option<&'static str>,
}

impl SendFlow {
    /// Every account except `origin` is a possible destination.
    pub fn new(origin: Account, accounts: &[Account]) -> Self {
        let destinations = accounts
            .iter()
            .filter(|a| a.id != origin.id)
            .cloned()
            .collect();
        Self {
            origin,
            destinations,
            selected: 0,
            amount: String::new(),
            stage: SendStage::AccountSelection,
            status: None,
        }
    }

    pub fn origin(&self) -> &Account {
        &self.origin
    }

    pub fn destinations(&self) -> &[Account] {
        &self.destinations
    }

    pub fn destination(&self) -> Option<&Account> {
        self.destinations.get(self.selected)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn stage(&self) -> SendStage {
        self.stage
    }

    /// Message of the last rejected confirm, cleared on the next edit.
    pub fn status(&self) -> Option<&'static str> {
        self.status
    }

    pub fn select_next(&mut self) {
        if self.stage == SendStage::AccountSelection && self.selected + 1 < self.destinations.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.stage == SendStage::AccountSelection {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    /// Type one character into the amount field.
    pub fn push_char(&mut self, c: char) {
        if self.stage != SendStage::AmountSelection {
            return;
        }
        let mut raw = self.amount.clone();
        raw.push(c);
        self.amount = sanitize_amount(&raw);
        self.status = None;
    }

    pub fn pop_char(&mut self) {
        if self.stage == SendStage::AmountSelection {
            self.amount.pop();
            self.status = None;
        }
    }

    /// Confirm the current stage.
    pub fn confirm(&mut self) -> SendStep {
        match self.stage {
            SendStage::AccountSelection => {
                if self.destination().is_none() {
                    return SendStep::Unchanged;
                }
                self.stage = SendStage::AmountSelection;
                SendStep::Advanced
            }
            SendStage::AmountSelection => {
                let Some(destination) = self.destination() else {
                    return SendStep::Unchanged;
                };
                let request = TransferRequest {
                    amount: self.amount.parse().unwrap_or(0.0),
                    origin: self.origin.id,
                    destination: destination.id,
                };
                match self.preflight(&request) {
                    TransferOutcome::Success => {
                        debug!(?request, "transfer form complete");
                        self.stage = SendStage::Done;
                        SendStep::Ready(request)
                    }
                    outcome => {
                        self.status = outcome.message();
                        SendStep::Rejected(outcome)
                    }
                }
            }
            SendStage::Done => SendStep::Unchanged,
        }
    }

    /// Step back; returns `false` when the form should close instead.
    pub fn cancel(&mut self) -> bool {
        match self.stage {
            SendStage::AmountSelection => {
                self.stage = SendStage::AccountSelection;
                self.status = None;
                true
            }
            SendStage::AccountSelection | SendStage::Done => false,
        }
    }

    /// Checks the client can make against its own snapshot.
    fn preflight(&self, request: &TransferRequest) -> TransferOutcome {
        if request.amount.is_nan() || request.amount <= 0.0 {
            return TransferOutcome::Other("InvalidAmount".into());
        }
        if request.amount > self.origin.balance {
            return TransferOutcome::InsufficientBalance;
        }
        TransferOutcome::Success
    }

    /// One-line summary of a prepared request.
    pub fn describe(&self, request: &TransferRequest) -> String {
        format!(
            "{} from {} to {}",
            format_currency(request.amount),
            format_account_id(request.origin),
            format_account_id(request.destination)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(id: i64, balance: f64) -> Account {
        Account {
            id,
            name: format!("acc{id}"),
            balance,
        }
    }

    fn flow() -> SendFlow {
        let accounts = [account(1, 50.0), account(2, 0.0), account(3, 10.0)];
        SendFlow::new(accounts[0].clone(), &accounts)
    }

    fn type_amount(flow: &mut SendFlow, text: &str) {
        for c in text.chars() {
            flow.push_char(c);
        }
    }

    #[test]
    fn sanitizer_keeps_one_point_and_two_decimals() {
        assert_eq!(sanitize_amount("12"), "12");
        assert_eq!(sanitize_amount("12."), "12.");
        assert_eq!(sanitize_amount("1.2.3"), "1.23");
        assert_eq!(sanitize_amount("1.234"), "1.23");
        assert_eq!(sanitize_amount("..5"), ".5");
        assert_eq!(sanitize_amount(".05"), ".05");
        assert_eq!(sanitize_amount("1a2,5"), "125");
        assert_eq!(sanitize_amount(""), "");
    }

    #[test]
    fn outcome_messages() {
        let cases = [
            (json!("Success"), None),
            (json!({"Account": "InsufficientBalance"}), Some("Insufficient balance")),
            (json!({"Limit": "SurpassedLimit"}), Some("Limit already surpassed")),
            (json!({"Limit": "WillSurpassLimit"}), Some("Limit will be surpassed")),
            (json!({"Account": "NoPermission"}), Some("Invalid")),
            (json!({"Session": "SessionIDExpired"}), Some("Invalid")),
            (json!(42), Some("Invalid")),
        ];
        for (body, message) in cases {
            assert_eq!(TransferOutcome::from_response(&body).message(), message, "{body}");
        }
    }

    #[test]
    fn origin_is_not_a_destination() {
        let flow = flow();
        let ids: Vec<i64> = flow.destinations().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(flow.stage(), SendStage::AccountSelection);
    }

    #[test]
    fn full_flow_produces_request() {
        let mut flow = flow();
        flow.select_next();
        flow.select_next();
        assert_eq!(flow.destination().map(|a| a.id), Some(3));

        assert_eq!(flow.confirm(), SendStep::Advanced);
        // Picker is locked once the amount is being entered.
        flow.select_prev();
        assert_eq!(flow.destination().map(|a| a.id), Some(3));

        type_amount(&mut flow, "12.505");
        assert_eq!(flow.amount(), "12.50");

        let expected = TransferRequest {
            amount: 12.5,
            origin: 1,
            destination: 3,
        };
        assert_eq!(flow.confirm(), SendStep::Ready(expected));
        assert_eq!(flow.stage(), SendStage::Done);
        assert_eq!(
            expected.endpoint(),
            "/transfer/account/account?amount=12.5&origin=1&destination=3"
        );
    }

    #[test]
    fn overdraft_is_rejected_with_message() {
        let mut flow = flow();
        flow.confirm();
        type_amount(&mut flow, "75");

        assert_eq!(
            flow.confirm(),
            SendStep::Rejected(TransferOutcome::InsufficientBalance)
        );
        assert_eq!(flow.status(), Some("Insufficient balance"));
        assert_eq!(flow.stage(), SendStage::AmountSelection);

        flow.pop_char();
        assert_eq!(flow.status(), None);
    }

    #[test]
    fn empty_amount_is_invalid() {
        let mut flow = flow();
        flow.confirm();
        assert!(matches!(flow.confirm(), SendStep::Rejected(TransferOutcome::Other(_))));
        assert_eq!(flow.status(), Some("Invalid"));
    }

    #[test]
    fn cancel_steps_back_then_closes() {
        let mut flow = flow();
        flow.confirm();
        type_amount(&mut flow, "5");
        assert!(flow.cancel());
        assert_eq!(flow.stage(), SendStage::AccountSelection);
        assert!(!flow.cancel());
    }

    #[test]
    fn single_account_has_nowhere_to_send() {
        let only = account(1, 10.0);
        let mut flow = SendFlow::new(only.clone(), &[only]);
        assert_eq!(flow.confirm(), SendStep::Unchanged);
        assert_eq!(flow.stage(), SendStage::AccountSelection);
    }
}
