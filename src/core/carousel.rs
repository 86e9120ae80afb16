//! Carousel selection synchronizer.
//!
//! A horizontally scrolling strip of fixed-width cards reports a continuous
//! offset many times per second while it is dragged or animating.  This
//! module folds that stream into a single "active" card and fires the
//! selection side effects exactly once per distinct selection.
//!
//! Selection is compared by identity ([`Identified::id`]), never by the whole
//! record: a card whose balance changes underneath the carousel is still the
//! same selection.

use std::fmt::Debug;

use tracing::{debug, trace};

// ───────────────────────────────────────── identity ──────────

/// Anything with a stable identity that survives field updates.
pub trait Identified {
    type Id: PartialEq + Copy + Debug;

    fn id(&self) -> Self::Id;
}

// ───────────────────────────────────────── geometry ──────────

/// Fixed card spacing along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselGeometry {
    /// Distance between the starts of consecutive cards (width + gap).
    step: f64,
    /// Leading padding; the first card is centred at `x = -inset`.
    inset: f64,
}

impl CarouselGeometry {
    /// `step` below one unit (or non-finite) is raised to one unit so index
    /// resolution never divides by zero.
    pub fn new(step: f64, inset: f64) -> Self {
        let step = if step.is_finite() { step.max(1.0) } else { 1.0 };
        let inset = if inset.is_finite() { inset } else { 0.0 };
        Self { step, inset }
    }

    /// Geometry for cards of `width` separated by `gap`.
    pub fn from_card(width: f64, gap: f64, inset: f64) -> Self {
        Self::new(width + gap, inset)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn inset(&self) -> f64 {
        self.inset
    }

    /// Offset at which the scroll surface starts.
    pub fn initial_offset(&self) -> f64 {
        -self.inset
    }

    /// Candidate index for offset `x`, or `None` for non-finite input.
    ///
    /// Halves round upward (`-0.5 → 0`, `2.5 → 3`), so a card boundary
    /// always belongs to the card on its right.
    pub fn index_at(&self, x: f64) -> Option<i64> {
        if !x.is_finite() {
            return None;
        }
        Some(((x + self.inset) / self.step + 0.5).floor() as i64)
    }

    /// Offset at which card `index` is centred.
    pub fn offset_of(&self, index: usize) -> f64 {
        index as f64 * self.step - self.inset
    }
}

// ───────────────────────────────────────── state machine ─────

/// The two states of the synchronizer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Selection<T> {
    #[default]
    Idle,
    Active(T),
}

impl<T> Selection<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Selection::Idle => None,
            Selection::Active(item) => Some(item),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }
}

/// Side effects fired on a selection change, in order: one haptic pulse,
/// then one `on_select` with the newly active item.
pub trait SelectionEffects<T> {
    fn haptic(&mut self);

    fn on_select(&mut self, item: &T);
}

/// No side effects; for callers that only need the resulting state.
impl<T> SelectionEffects<T> for () {
    fn haptic(&mut self) {}

    fn on_select(&mut self, _item: &T) {}
}

/// Returned by an update that changed the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChange<T> {
    pub index: usize,
    pub item: T,
}

// ───────────────────────────────────────── synchronizer ──────

/// Maps scroll offsets over `items` to a single active item.
///
/// The index `items.len()` is a sentinel for the trailing "create new" card:
/// it passes the range guard but never changes the selection.
#[derive(Debug, Clone)]
pub struct CarouselSync<T> {
    items: Vec<T>,
    geometry: CarouselGeometry,
    offset: f64,
    selection: Selection<T>,
    active_index: Option<usize>,
    has_trailing: bool,
}

impl<T: Identified + Clone> CarouselSync<T> {
    /// Starts idle at the geometry's initial offset.  Nothing fires until
    /// the first scroll update.
    pub fn new(items: Vec<T>, geometry: CarouselGeometry) -> Self {
        Self {
            items,
            offset: geometry.initial_offset(),
            geometry,
            selection: Selection::Idle,
            active_index: None,
            has_trailing: true,
        }
    }

    /// Whether the trailing create card can be scrolled to.
    pub fn with_trailing(mut self, has_trailing: bool) -> Self {
        self.has_trailing = has_trailing;
        self
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn geometry(&self) -> CarouselGeometry {
        self.geometry
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn has_trailing(&self) -> bool {
        self.has_trailing
    }

    pub fn selection(&self) -> &Selection<T> {
        &self.selection
    }

    pub fn active(&self) -> Option<&T> {
        self.selection.as_option()
    }

    /// Position of the active item, always `< len()`.
    pub fn active_index(&self) -> Option<usize> {
        self.active_index.filter(|&i| i < self.items.len())
    }

    /// Highest index a snap may land on.
    pub fn max_index(&self) -> usize {
        if self.has_trailing {
            self.items.len()
        } else {
            self.items.len().saturating_sub(1)
        }
    }

    /// Index the current offset resolves to, clamped to the snap range.
    pub fn nearest_index(&self) -> usize {
        let raw = self.geometry.index_at(self.offset).unwrap_or(0);
        raw.clamp(0, self.max_index() as i64) as usize
    }

    /// True when the offset rests on the trailing create card.
    pub fn is_sentinel_focused(&self) -> bool {
        self.has_trailing && self.geometry.index_at(self.offset) == Some(self.items.len() as i64)
    }

    // ── updates ─────────────────────────────────────────────────

    /// Feed a new scroll offset.
    pub fn scroll_to<E>(&mut self, x: f64, effects: &mut E) -> Option<SelectionChange<T>>
    where
        E: SelectionEffects<T>,
    {
        let Some(index) = self.geometry.index_at(x) else {
            trace!(x, "non-finite scroll offset ignored");
            return None;
        };
        self.offset = x;
        self.resolve(index, effects)
    }

    pub fn scroll_by<E>(&mut self, dx: f64, effects: &mut E) -> Option<SelectionChange<T>>
    where
        E: SelectionEffects<T>,
    {
        self.scroll_to(self.offset + dx, effects)
    }

    /// Jump straight to card `index` (clamped to the snap range).
    pub fn snap_to<E>(&mut self, index: usize, effects: &mut E) -> Option<SelectionChange<T>>
    where
        E: SelectionEffects<T>,
    {
        let index = index.min(self.max_index());
        self.scroll_to(self.geometry.offset_of(index), effects)
    }

    /// Replace the list out-of-band and re-resolve the current offset.
    ///
    /// A same-id item at the resolved index refreshes the active record
    /// without firing; a different id is an ordinary selection change.  When
    /// the offset no longer lands on a card, the active item is looked up by
    /// id and the selection falls back to `Idle` if it was removed.
    pub fn set_items<E>(&mut self, items: Vec<T>, effects: &mut E) -> Option<SelectionChange<T>>
    where
        E: SelectionEffects<T>,
    {
        self.items = items;
        let change = match self.geometry.index_at(self.offset) {
            Some(index) => self.resolve(index, effects),
            None => None,
        };
        if change.is_none() {
            self.retain_active();
        }
        change
    }

    /// Swap geometry while keeping the card under the viewport centre.
    pub fn set_geometry<E>(
        &mut self,
        geometry: CarouselGeometry,
        effects: &mut E,
    ) -> Option<SelectionChange<T>>
    where
        E: SelectionEffects<T>,
    {
        let index = self.nearest_index();
        self.geometry = geometry;
        self.snap_to(index, effects)
    }

    /// Re-locate the active item in `items`; drop it if its id is gone.
    fn retain_active(&mut self) {
        let Selection::Active(current) = &mut self.selection else {
            return;
        };
        let id = current.id();
        match self.items.iter().position(|item| item.id() == id) {
            Some(index) => {
                *current = self.items[index].clone();
                self.active_index = Some(index);
            }
            None => {
                debug!(id = ?id, "active item removed, selection cleared");
                self.selection = Selection::Idle;
                self.active_index = None;
            }
        }
    }

    fn resolve<E>(&mut self, index: i64, effects: &mut E) -> Option<SelectionChange<T>>
    where
        E: SelectionEffects<T>,
    {
        if index < 0 || index > self.items.len() as i64 {
            trace!(index, len = self.items.len(), "scroll index out of range");
            return None;
        }
        let index = index as usize;

        // index == len: the create card, selection stays as it was.
        let candidate = self.items.get(index)?;

        if let Selection::Active(current) = &mut self.selection {
            if current.id() == candidate.id() {
                *current = candidate.clone();
                self.active_index = Some(index);
                return None;
            }
        }

        debug!(index, id = ?candidate.id(), "carousel selection changed");
        self.selection = Selection::Active(candidate.clone());
        self.active_index = Some(index);
        effects.haptic();
        effects.on_select(candidate);

        Some(SelectionChange {
            index,
            item: candidate.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Card {
        id: u32,
        balance: f64,
    }

    impl Identified for Card {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    fn card(id: u32) -> Card {
        Card { id, balance: 0.0 }
    }

    #[derive(Default)]
    struct Recorder {
        haptics: usize,
        selected: Vec<u32>,
    }

    impl SelectionEffects<Card> for Recorder {
        fn haptic(&mut self) {
            self.haptics += 1;
        }

        fn on_select(&mut self, item: &Card) {
            self.selected.push(item.id);
        }
    }

    fn three() -> CarouselSync<Card> {
        CarouselSync::new(vec![card(1), card(2), card(3)], CarouselGeometry::new(300.0, 50.0))
    }

    #[test]
    fn starts_idle_at_initial_offset() {
        let sync = three();
        assert!(sync.selection().is_idle());
        assert_eq!(sync.offset(), -50.0);
        assert_eq!(sync.active_index(), None);
    }

    #[test]
    fn documented_offsets_resolve_to_cards() {
        let mut sync = three();
        let mut fx = Recorder::default();

        sync.scroll_to(-50.0, &mut fx);
        assert_eq!(sync.active().map(|c| c.id), Some(1));
        sync.scroll_to(250.0, &mut fx);
        assert_eq!(sync.active().map(|c| c.id), Some(2));
        sync.scroll_to(550.0, &mut fx);
        assert_eq!(sync.active().map(|c| c.id), Some(3));

        assert_eq!(fx.selected, vec![1, 2, 3]);
        assert_eq!(fx.haptics, 3);
    }

    #[test]
    fn every_card_offset_resolves_to_its_index() {
        let geometry = CarouselGeometry::from_card(280.0, 20.0, 50.0);
        let items: Vec<Card> = (0..8).map(card).collect();
        let mut sync = CarouselSync::new(items, geometry);
        for i in 0..8 {
            let change = sync.scroll_to(geometry.offset_of(i), &mut ());
            assert_eq!(change.map(|c| c.index), Some(i));
            assert_eq!(sync.active_index(), Some(i));
        }
    }

    #[test]
    fn jitter_within_one_card_fires_once() {
        let mut sync = three();
        let mut fx = Recorder::default();
        for x in [240.0, 251.3, 260.0, 249.9, 399.0, 101.0] {
            sync.scroll_to(x, &mut fx);
        }
        assert_eq!(fx.selected, vec![2]);
        assert_eq!(fx.haptics, 1);
    }

    #[test]
    fn repeated_identical_offset_is_idempotent() {
        let mut sync = three();
        let mut fx = Recorder::default();
        assert!(sync.scroll_to(250.0, &mut fx).is_some());
        assert!(sync.scroll_to(250.0, &mut fx).is_none());
        assert_eq!(fx.haptics, 1);
    }

    #[test]
    fn sentinel_index_keeps_previous_selection() {
        let mut sync = three();
        let mut fx = Recorder::default();
        sync.scroll_to(550.0, &mut fx);
        let change = sync.scroll_to(850.0, &mut fx);

        assert!(change.is_none());
        assert_eq!(sync.active().map(|c| c.id), Some(3));
        assert!(sync.is_sentinel_focused());
        assert_eq!(fx.selected, vec![3]);
    }

    #[test]
    fn sentinel_from_idle_stays_idle() {
        let mut sync = three();
        sync.scroll_to(850.0, &mut ());
        assert!(sync.selection().is_idle());
    }

    #[test]
    fn out_of_range_offsets_are_rejected() {
        let mut sync = three();
        let mut fx = Recorder::default();
        sync.scroll_to(250.0, &mut fx);

        assert!(sync.scroll_to(-400.0, &mut fx).is_none());
        assert!(sync.scroll_to(5_000.0, &mut fx).is_none());
        assert!(sync.scroll_to(f64::NAN, &mut fx).is_none());
        assert!(sync.scroll_to(f64::INFINITY, &mut fx).is_none());

        assert_eq!(sync.active().map(|c| c.id), Some(2));
        assert_eq!(fx.haptics, 1);
    }

    #[test]
    fn boundary_half_rounds_toward_next_card() {
        let geometry = CarouselGeometry::new(300.0, 50.0);
        // (x + inset) / step == -0.5 and 0.5 respectively.
        assert_eq!(geometry.index_at(-200.0), Some(0));
        assert_eq!(geometry.index_at(100.0), Some(1));
    }

    #[test]
    fn empty_items_never_activate() {
        let mut sync: CarouselSync<Card> = CarouselSync::new(Vec::new(), CarouselGeometry::new(300.0, 50.0));
        let mut fx = Recorder::default();
        for x in [-1_000.0, -50.0, 0.0, 120.0, 250.0, 10_000.0] {
            sync.scroll_to(x, &mut fx);
        }
        assert!(sync.active().is_none());
        assert_eq!(fx.haptics, 0);
    }

    #[test]
    fn same_id_replacement_does_not_fire() {
        let mut sync = three();
        let mut fx = Recorder::default();
        sync.scroll_to(250.0, &mut fx);

        let updated = vec![
            card(1),
            Card {
                id: 2,
                balance: 9_999.0,
            },
            card(3),
        ];
        let change = sync.set_items(updated, &mut fx);

        assert!(change.is_none());
        assert_eq!(fx.haptics, 1);
        // The stored record reflects the refreshed fields.
        assert_eq!(sync.active().map(|c| c.balance), Some(9_999.0));
    }

    #[test]
    fn different_id_replacement_fires() {
        let mut sync = three();
        let mut fx = Recorder::default();
        sync.scroll_to(250.0, &mut fx);

        let change = sync.set_items(vec![card(1), card(7), card(3)], &mut fx);
        assert_eq!(change.map(|c| c.item.id), Some(7));
        assert_eq!(fx.selected, vec![2, 7]);
    }

    #[test]
    fn shrinking_below_active_index_clears_removed_item() {
        let mut sync = three();
        let mut fx = Recorder::default();
        sync.scroll_to(550.0, &mut fx);
        sync.set_items(vec![card(1)], &mut fx);

        assert!(sync.selection().is_idle());
        assert_eq!(sync.active_index(), None);
        assert_eq!(fx.selected, vec![3]);
    }

    #[test]
    fn emptying_list_returns_to_idle() {
        let mut sync = three();
        sync.scroll_to(250.0, &mut ());
        sync.set_items(Vec::new(), &mut ());

        assert!(sync.selection().is_idle());
        for x in [-50.0, 0.0, 250.0] {
            sync.scroll_to(x, &mut ());
        }
        assert!(sync.active().is_none());
    }

    #[test]
    fn active_item_is_always_listed_after_replacement() {
        let replacements = [
            vec![card(1)],
            vec![card(3), card(1)],
            vec![card(9), card(8), card(7), card(6), card(5)],
            Vec::new(),
        ];
        for offset in [-50.0, 250.0, 550.0, 850.0] {
            for items in &replacements {
                let mut sync = three();
                sync.scroll_to(offset, &mut ());
                sync.set_items(items.clone(), &mut ());

                if let Some(active) = sync.active() {
                    let index = sync.active_index();
                    assert!(index.is_some(), "active item without index at {offset}");
                    assert_eq!(sync.items().get(index.unwrap_or(0)).map(|c| c.id), Some(active.id));
                }
            }
        }
    }

    #[test]
    fn reordered_list_follows_active_id_from_sentinel() {
        let mut sync = three();
        sync.scroll_to(550.0, &mut ());
        sync.scroll_to(850.0, &mut ());
        sync.set_items(vec![card(3), card(1), card(2)], &mut ());

        assert_eq!(sync.active().map(|c| c.id), Some(3));
        assert_eq!(sync.active_index(), Some(0));
    }

    #[test]
    fn snap_is_clamped_to_trailing_card() {
        let mut sync = three();
        sync.snap_to(10, &mut ());
        assert_eq!(sync.nearest_index(), 3);
        assert!(sync.is_sentinel_focused());

        let mut no_trailing = three().with_trailing(false);
        no_trailing.snap_to(10, &mut ());
        assert_eq!(no_trailing.nearest_index(), 2);
        assert_eq!(no_trailing.active().map(|c| c.id), Some(3));
    }

    #[test]
    fn scroll_by_accumulates_offset() {
        let mut sync = three();
        let mut fx = Recorder::default();
        for _ in 0..30 {
            sync.scroll_by(10.0, &mut fx);
        }
        assert_eq!(sync.offset(), 250.0);
        assert_eq!(fx.selected, vec![1, 2]);
    }

    #[test]
    fn geometry_change_keeps_centred_card() {
        let mut sync = three();
        let mut fx = Recorder::default();
        sync.snap_to(1, &mut fx);
        sync.set_geometry(CarouselGeometry::new(40.0, 1.0), &mut fx);

        assert_eq!(sync.offset(), 39.0);
        assert_eq!(sync.active_index(), Some(1));
        assert_eq!(fx.haptics, 1);
    }

    #[test]
    fn degenerate_step_is_raised() {
        let geometry = CarouselGeometry::new(0.0, 0.0);
        assert_eq!(geometry.step(), 1.0);
        assert_eq!(geometry.index_at(3.0), Some(3));
    }
}
