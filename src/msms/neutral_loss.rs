
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::msms::model::NeutralLoss;

/// Earliest sequence positions at which each neutral loss becomes
/// applicable. Boundaries are 1-indexed residue counts from the respective
/// terminus: a loss is active on a forward ion of number p iff
/// p >= forward start, and on a complementary ion of number p iff
/// p >= rewind start.
// BTreeMap keeps loss iteration order stable, so annotation output order
// is deterministic.
#[derive(Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct NeutralLossesMap {
    boundaries: BTreeMap<NeutralLoss, (i32, i32)>,
}

impl NeutralLossesMap {
    pub fn new() -> NeutralLossesMap {
        NeutralLossesMap {
            boundaries: BTreeMap::new(),
        }
    }

    /// Registers a loss, keeping for each direction the most permissive
    /// (lowest) start seen so far. Later calls only tighten the earliest
    /// allowed start, never loosen it.
    pub fn add_neutral_loss(&mut self, loss: NeutralLoss, forward_start: i32, rewind_start: i32) {
        let entry = self
            .boundaries
            .entry(loss)
            .or_insert((forward_start, rewind_start));
        if forward_start < entry.0 {
            entry.0 = forward_start;
        }
        if rewind_start < entry.1 {
            entry.1 = rewind_start;
        }
    }

    /// Resets every boundary to 1: each loss applies from the first residue
    /// in either direction.
    pub fn make_sequence_independent(&mut self) {
        for boundary in self.boundaries.values_mut() {
            *boundary = (1, 1);
        }
    }

    pub fn contains_loss(&self, loss: NeutralLoss) -> bool {
        self.boundaries.contains_key(&loss)
    }

    pub fn get_forward_start(&self, loss: NeutralLoss) -> Option<i32> {
        self.boundaries.get(&loss).map(|b| b.0)
    }

    pub fn get_rewind_start(&self, loss: NeutralLoss) -> i32 {
        self.boundaries.get(&loss).map(|b| b.1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn losses(&self) -> impl Iterator<Item = NeutralLoss> + '_ {
        self.boundaries.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_keep_the_minimum_of_repeated_adds() {
        let mut map = NeutralLossesMap::new();
        map.add_neutral_loss(NeutralLoss::H2O, 5, 3);
        map.add_neutral_loss(NeutralLoss::H2O, 2, 7);

        assert_eq!(map.get_forward_start(NeutralLoss::H2O), Some(2));
        assert_eq!(map.get_rewind_start(NeutralLoss::H2O), 3);
    }

    #[test]
    fn absent_loss_defaults() {
        let map = NeutralLossesMap::new();
        assert!(!map.contains_loss(NeutralLoss::NH3));
        assert_eq!(map.get_forward_start(NeutralLoss::NH3), None);
        assert_eq!(map.get_rewind_start(NeutralLoss::NH3), 0);
    }

    #[test]
    fn sequence_independent_resets_every_boundary_to_one() {
        let mut map = NeutralLossesMap::new();
        map.add_neutral_loss(NeutralLoss::H2O, 4, 6);
        map.add_neutral_loss(NeutralLoss::H3PO4, 2, 9);
        map.make_sequence_independent();

        for loss in [NeutralLoss::H2O, NeutralLoss::H3PO4] {
            assert_eq!(map.get_forward_start(loss), Some(1));
            assert_eq!(map.get_rewind_start(loss), 1);
        }
    }
}
