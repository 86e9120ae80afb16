//! Drifting circles painted behind each account card.
//!
//! Every circle oscillates along both axes, `start → target → start`, with
//! independently randomised leg durations.  Positions are pure functions of
//! elapsed time, so the renderer can sample them on any frame.

use std::collections::HashMap;
use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::trace;

use super::account::{circle_count, Account};

/// Circle fill colours as RGB.
pub const PALETTE: [(u8, u8, u8); 4] = [
    (0x21, 0x19, 0x51),
    (0x83, 0x6f, 0xff),
    (0x15, 0xf5, 0xba),
    (0x48, 0xcf, 0xcb),
];

const LEG_MIN_MS: f64 = 10_000.0;
const LEG_SPAN_MS: f64 = 2_000.0;

/// One axis of motion: out to `target`, back to `start`, forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub start: f64,
    pub target: f64,
    pub out_ms: f64,
    pub back_ms: f64,
}

impl Oscillation {
    pub fn at(&self, elapsed: Duration) -> f64 {
        let period = self.out_ms + self.back_ms;
        if period <= 0.0 {
            return self.start;
        }
        let t = (elapsed.as_secs_f64() * 1_000.0) % period;
        if t < self.out_ms {
            lerp(self.start, self.target, t / self.out_ms)
        } else {
            lerp(self.target, self.start, (t - self.out_ms) / self.back_ms)
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A single circle, measured in card rows.  Terminal cells are roughly twice
/// as tall as they are wide, so the horizontal radius is `2 * radius` columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
    /// Column of the circle's left edge.
    pub left: Oscillation,
    /// Row of the circle's top edge.
    pub top: Oscillation,
    pub color: (u8, u8, u8),
}

impl Circle {
    /// Whether cell `(col, row)` (card-relative) is covered at `elapsed`.
    pub fn covers(&self, col: u16, row: u16, elapsed: Duration) -> bool {
        let cx = self.left.at(elapsed) + self.radius * 2.0;
        let cy = self.top.at(elapsed) + self.radius;
        let dx = (col as f64 + 0.5 - cx) / (self.radius * 2.0);
        let dy = (row as f64 + 0.5 - cy) / self.radius;
        dx * dx + dy * dy <= 1.0
    }
}

/// The full background of one card.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CircleField {
    pub circles: Vec<Circle>,
}

impl CircleField {
    /// Generate `count` circles for a card `width` columns by `height` rows.
    ///
    /// Circles start low on the card so they peek up from the bottom edge.
    pub fn generate<R: Rng>(count: usize, width: u16, height: u16, rng: &mut R) -> Self {
        let w = width.max(1) as f64;
        let h = height.max(1) as f64;

        let circles = (0..count)
            .map(|_| {
                let radius = h * (0.33 + rng.gen::<f64>() * 0.17);
                let span_x = (w - radius * 4.0).max(0.0);
                let leg = |rng: &mut R, base: f64, span: f64| Oscillation {
                    start: base + rng.gen::<f64>() * span,
                    target: base + rng.gen::<f64>() * span,
                    out_ms: LEG_MIN_MS + rng.gen::<f64>() * LEG_SPAN_MS,
                    back_ms: LEG_MIN_MS + rng.gen::<f64>() * LEG_SPAN_MS,
                };
                let top = leg(&mut *rng, h * 0.66, h);
                let left = leg(&mut *rng, 0.0, span_x);
                let color = PALETTE[rng.gen_range(0..PALETTE.len())];
                Circle {
                    radius,
                    left,
                    top,
                    color,
                }
            })
            .collect();

        Self { circles }
    }

    /// Deterministic field for one account so its card looks the same on
    /// every frame and every reload.
    pub fn for_account(seed: u64, account_id: i64, count: usize, width: u16, height: u16) -> Self {
        let mut rng = StdRng::seed_from_u64(seed ^ account_id as u64);
        Self::generate(count, width, height, &mut rng)
    }

    /// Colour of the topmost circle covering `(col, row)`, if any.
    pub fn color_at(&self, col: u16, row: u16, elapsed: Duration) -> Option<(u8, u8, u8)> {
        self.circles
            .iter()
            .rev()
            .find(|c| c.covers(col, row, elapsed))
            .map(|c| c.color)
    }
}

// ───────────────────────────────────────── cache ─────────────

/// Circle fields of every account, keyed by account id.
///
/// Generation re-seeds an RNG per card, so fields are built once per
/// (ledger, seed, card size) and sampled on every frame after that.
#[derive(Debug, Clone, Default)]
pub struct CircleCache {
    seed: u64,
    width: u16,
    height: u16,
    fields: HashMap<i64, CircleField>,
}

impl CircleCache {
    /// Fields for `accounts` on cards with a `width` by `height` interior.
    pub fn build(seed: u64, accounts: &[Account], width: u16, height: u16) -> Self {
        let mut cache = Self {
            seed,
            width,
            height,
            fields: HashMap::new(),
        };
        cache.rebuild(accounts);
        cache
    }

    /// Regenerate every field, e.g. after the ledger was replaced.
    pub fn rebuild(&mut self, accounts: &[Account]) {
        self.fields = accounts
            .iter()
            .map(|a| {
                let field = CircleField::for_account(
                    self.seed,
                    a.id,
                    circle_count(a.balance),
                    self.width,
                    self.height,
                );
                (a.id, field)
            })
            .collect();
        trace!(cards = self.fields.len(), "circle fields rebuilt");
    }

    /// Change seed or card size; rebuilds only when one of them differs.
    pub fn reconfigure(&mut self, seed: u64, width: u16, height: u16, accounts: &[Account]) {
        if (seed, width, height) == (self.seed, self.width, self.height) {
            return;
        }
        self.seed = seed;
        self.width = width;
        self.height = height;
        self.rebuild(accounts);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn get(&self, account_id: i64) -> Option<&CircleField> {
        self.fields.get(&account_id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillation_returns_to_start() {
        let osc = Oscillation {
            start: 0.0,
            target: 10.0,
            out_ms: 10_000.0,
            back_ms: 10_000.0,
        };
        assert_eq!(osc.at(Duration::ZERO), 0.0);
        assert_eq!(osc.at(Duration::from_secs(5)), 5.0);
        assert_eq!(osc.at(Duration::from_secs(10)), 10.0);
        assert_eq!(osc.at(Duration::from_secs(15)), 5.0);
        assert_eq!(osc.at(Duration::from_secs(20)), 0.0);
    }

    #[test]
    fn generated_circles_stay_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = CircleField::generate(6, 34, 6, &mut rng);
        assert_eq!(field.circles.len(), 6);
        for c in &field.circles {
            assert!(c.radius >= 6.0 * 0.33 && c.radius < 6.0 * 0.5);
            for osc in [c.left, c.top] {
                assert!(osc.out_ms >= LEG_MIN_MS && osc.out_ms < LEG_MIN_MS + LEG_SPAN_MS);
                assert!(osc.back_ms >= LEG_MIN_MS && osc.back_ms < LEG_MIN_MS + LEG_SPAN_MS);
            }
            assert!(c.left.start >= 0.0 && c.left.start <= 34.0);
            assert!(PALETTE.contains(&c.color));
        }
    }

    #[test]
    fn account_fields_are_stable() {
        let a = CircleField::for_account(1, 123, 3, 30, 6);
        let b = CircleField::for_account(1, 123, 3, 30, 6);
        let c = CircleField::for_account(1, 124, 3, 30, 6);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    fn accounts() -> Vec<Account> {
        vec![
            Account {
                id: 1,
                name: "a".into(),
                balance: 10.0,
            },
            Account {
                id: 2,
                name: "b".into(),
                balance: 12_345.0,
            },
        ]
    }

    #[test]
    fn cache_matches_direct_generation() {
        let accounts = accounts();
        let cache = CircleCache::build(9, &accounts, 34, 6);
        assert_eq!(cache.len(), 2);
        let expected = CircleField::for_account(9, 2, circle_count(12_345.0), 34, 6);
        assert_eq!(cache.get(2), Some(&expected));
        assert!(cache.get(3).is_none());
    }

    #[test]
    fn cache_rebuilds_only_on_changed_inputs() {
        let accounts = accounts();
        let mut cache = CircleCache::build(9, &accounts, 34, 6);

        // Unchanged inputs keep the existing fields even for a new list.
        cache.reconfigure(9, 34, 6, &accounts[..1]);
        assert_eq!(cache.len(), 2);

        cache.reconfigure(9, 46, 6, &accounts[..1]);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get(1),
            Some(&CircleField::for_account(9, 1, circle_count(10.0), 46, 6))
        );
    }

    #[test]
    fn tiny_cards_do_not_panic() {
        let field = CircleField::for_account(0, 0, 2, 0, 0);
        assert_eq!(field.circles.len(), 2);
        let _ = field.color_at(0, 0, Duration::from_millis(1234));
    }

    #[test]
    fn covers_centre_cell() {
        let still = |v: f64| Oscillation {
            start: v,
            target: v,
            out_ms: 1.0,
            back_ms: 1.0,
        };
        let circle = Circle {
            radius: 2.0,
            left: still(0.0),
            top: still(0.0),
            color: PALETTE[0],
        };
        assert!(circle.covers(3, 1, Duration::ZERO));
        assert!(!circle.covers(10, 1, Duration::ZERO));
    }
}
