use habitual_core::Filter;

use crate::view::HabitCard;

/// Holds the active filter and applies it to already-rendered cards.
/// Never touches the data layer.
#[derive(Debug, Default)]
pub struct FilterController {
    active: Filter,
}

impl FilterController {
    pub fn new() -> Self {
        Self {
            active: Filter::All,
        }
    }

    pub fn active(&self) -> Filter {
        self.active
    }

    pub fn set_filter(&mut self, filter: Filter, cards: &mut [HabitCard]) {
        self.active = filter;
        self.apply(cards);
    }

    /// Re-evaluate visibility. Must run after every re-render, since
    /// rendering produces fresh, unhidden cards.
    pub fn apply(&self, cards: &mut [HabitCard]) {
        for card in cards.iter_mut() {
            card.hidden = !self.active.matches(card.filter_tag);
        }
    }
}
