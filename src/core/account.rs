//! Account records as returned by the backend, plus display helpers.

use serde::{Deserialize, Serialize};

use super::carousel::Identified;

/// Currency code shown in front of every amount.
pub const CURRENCY: &str = "MYR";

/// A single bank account owned by the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub balance: f64,
}

impl Identified for Account {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }
}

impl Account {
    pub fn display_id(&self) -> String {
        format_account_id(self.id)
    }

    pub fn display_balance(&self) -> String {
        format_currency(self.balance)
    }
}

/// Render an id as `xxxx-xxxx` using its first eight zero-padded hex digits.
pub fn format_account_id(id: i64) -> String {
    let hex = format!("{:08x}", id as u64);
    format!("{}-{}", &hex[..4], &hex[4..8])
}

/// Format `amount` as `MYR 1,234.50` (negatives as `-MYR 5.00`).
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{CURRENCY} --");
    }
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.00" is not a debt.
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{CURRENCY} {grouped}.{frac_part}")
}

/// Number of background circles drawn on a card: one per balance digit
/// beyond the first, between 1 and 6.
pub fn circle_count(balance: f64) -> usize {
    let digits = balance.to_string().len();
    digits.saturating_sub(1).clamp(1, 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_ids_are_split_hex() {
        assert_eq!(format_account_id(2388376114), "8e5b-ba32");
        assert_eq!(format_account_id(123123123), "0756-b5b3");
        assert_eq!(format_account_id(0), "0000-0000");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(10.0), "MYR 10.00");
        assert_eq!(format_currency(1230.0), "MYR 1,230.00");
        assert_eq!(format_currency(100000.0), "MYR 100,000.00");
        assert_eq!(format_currency(1234567.891), "MYR 1,234,567.89");
        assert_eq!(format_currency(0.5), "MYR 0.50");
    }

    #[test]
    fn currency_negative_and_degenerate() {
        assert_eq!(format_currency(-5.0), "-MYR 5.00");
        assert_eq!(format_currency(-0.001), "MYR 0.00");
        assert_eq!(format_currency(f64::NAN), "MYR --");
    }

    #[test]
    fn circle_count_tracks_balance_digits() {
        assert_eq!(circle_count(5.0), 1);
        assert_eq!(circle_count(10.0), 1);
        assert_eq!(circle_count(1000.0), 3);
        assert_eq!(circle_count(10.5), 3);
        assert_eq!(circle_count(123_456_789.0), 6);
    }

    #[test]
    fn identity_ignores_balance() {
        let a = Account {
            id: 9,
            name: "Savings".into(),
            balance: 1.0,
        };
        let b = Account {
            balance: 2.0,
            ..a.clone()
        };
        assert_ne!(a, b);
        assert_eq!(a.id(), b.id());
    }
}
