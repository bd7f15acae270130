use core::fmt::{Display, Formatter};
use crate::util::base_name;

pub const HOME: u8 = 4;

/// Subset of {2, 3, 4}: the bases a runner can take after reaching first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BaseSet(u8);

impl BaseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(base: u8) -> bool {
        (2..=HOME).contains(&base)
    }

    pub fn contains(self, base: u8) -> bool {
        Self::is_valid(base) && self.0 & (1 << base) != 0
    }

    pub fn insert(&mut self, base: u8) -> bool {
        if !Self::is_valid(base) || self.contains(base) {
            return false;
        }
        self.0 |= 1 << base;
        true
    }

    pub fn remove(&mut self, base: u8) -> bool {
        if !self.contains(base) {
            return false;
        }
        self.0 &= !(1 << base);
        true
    }

    pub fn toggle(&mut self, base: u8) {
        if !self.remove(base) {
            self.insert(base);
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn max(self) -> Option<u8> {
        self.iter().last()
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (2..=HOME).filter(move |&base| self.contains(base))
    }

    pub fn to_vec(self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl FromIterator<u8> for BaseSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut set = Self::new();
        for base in iter {
            set.insert(base);
        }
        set
    }
}

impl Display for BaseSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names = self.iter().map(base_name).collect::<Vec<_>>();
        write!(f, "{}", names.join(", "))
    }
}

// out is final_base == Some(0) or out_at > 0; the final base is only raised automatically while not out
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BaseAdvancementTracker {
    initial: u8,
    final_base: Option<u8>,
    out_at: u8,
    stolen: BaseSet,
    hit_around: BaseSet,
}

impl BaseAdvancementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // stolen wins when a base is in both sets; final_base is not reconciled
    pub fn from_parts(initial: u8, final_base: Option<u8>, out_at: u8, stolen: BaseSet, hit_around: BaseSet) -> Self {
        let mut hit_around = hit_around;
        for base in stolen.iter() {
            hit_around.remove(base);
        }
        Self {
            initial: initial.min(HOME),
            final_base: final_base.map(|base| base.min(HOME)),
            out_at: out_at.min(HOME),
            stolen,
            hit_around,
        }
    }

    pub fn initial(&self) -> u8 {
        self.initial
    }

    pub fn final_base(&self) -> Option<u8> {
        self.final_base
    }

    pub fn out_at(&self) -> u8 {
        self.out_at
    }

    pub fn stolen_bases(&self) -> BaseSet {
        self.stolen
    }

    pub fn hit_around_bases(&self) -> BaseSet {
        self.hit_around
    }

    pub fn is_out(&self) -> bool {
        self.final_base == Some(0) || self.out_at > 0
    }

    pub fn furthest_advance(&self) -> u8 {
        [Some(self.initial), self.stolen.max(), self.hit_around.max()]
            .into_iter()
            .flatten()
            .max()
            .unwrap_or(0)
    }

    pub fn set_initial_base(&mut self, base: u8) {
        self.initial = base.min(HOME);
        self.reconcile();
    }

    /// Scorer override; may sit below the advancement sets until the next toggle.
    pub fn set_final_base(&mut self, base: u8) {
        self.final_base = Some(base.min(HOME));
    }

    pub fn clear_final_base(&mut self) {
        self.final_base = None;
    }

    /// Picking the base that is already set clears it.
    pub fn set_out_at(&mut self, base: u8) {
        let base = base.min(HOME);
        self.out_at = if self.out_at == base { 0 } else { base };
    }

    pub fn toggle_stolen_base(&mut self, base: u8) -> bool {
        if !BaseSet::is_valid(base) || self.hit_around.contains(base) {
            tracing::debug!(base, "stolen base toggle rejected");
            return false;
        }
        self.stolen.toggle(base);
        self.reconcile();
        true
    }

    pub fn toggle_hit_around(&mut self, base: u8) -> bool {
        if !BaseSet::is_valid(base) || self.stolen.contains(base) {
            tracing::debug!(base, "hit-around toggle rejected");
            return false;
        }
        self.hit_around.toggle(base);
        self.reconcile();
        true
    }

    fn reconcile(&mut self) {
        if self.is_out() {
            return;
        }
        let target = self.furthest_advance();
        match self.final_base {
            Some(base) if base < target => self.final_base = Some(target),
            None if !self.stolen.is_empty() || !self.hit_around.is_empty() => self.final_base = Some(target),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_set_only_holds_second_through_home() {
        let set = [1, 2, 4, 5, 4].into_iter().collect::<BaseSet>();
        assert_eq!(set.to_vec(), vec![2, 4]);
        assert_eq!(set.max(), Some(4));
        assert!(!set.contains(1));
        assert!(BaseSet::new().max().is_none());
    }

    #[test]
    fn stolen_bases_advance_final_base() {
        let mut bases = BaseAdvancementTracker::new();
        bases.set_initial_base(1);
        assert_eq!(bases.final_base(), None);
        assert!(bases.toggle_stolen_base(2));
        assert!(bases.toggle_stolen_base(3));
        assert_eq!(bases.final_base(), Some(3));
        assert!(bases.toggle_stolen_base(3));
        assert_eq!(bases.final_base(), Some(3));
        assert_eq!(bases.stolen_bases().to_vec(), vec![2]);
    }

    #[test]
    fn hit_around_rejected_when_stolen() {
        let mut bases = BaseAdvancementTracker::new();
        bases.set_initial_base(1);
        bases.toggle_stolen_base(2);
        assert!(!bases.toggle_hit_around(2));
        assert!(bases.hit_around_bases().is_empty());
        assert!(bases.toggle_hit_around(3));
        assert!(!bases.toggle_stolen_base(3));
        assert_eq!(bases.final_base(), Some(3));
        assert!(!bases.toggle_stolen_base(1));
    }

    #[test]
    fn override_holds_until_next_toggle() {
        let mut bases = BaseAdvancementTracker::new();
        bases.set_initial_base(1);
        bases.toggle_hit_around(3);
        bases.set_final_base(2);
        assert_eq!(bases.final_base(), Some(2));
        bases.toggle_stolen_base(2);
        assert_eq!(bases.final_base(), Some(3));
    }

    #[test]
    fn initial_base_raises_a_decided_final_base_only() {
        let mut bases = BaseAdvancementTracker::new();
        bases.set_initial_base(2);
        assert_eq!(bases.final_base(), None);
        bases.set_final_base(2);
        bases.set_initial_base(3);
        assert_eq!(bases.final_base(), Some(3));
        bases.set_initial_base(1);
        assert_eq!(bases.final_base(), Some(3));
    }

    #[test]
    fn out_records_are_not_advanced() {
        let mut bases = BaseAdvancementTracker::new();
        bases.set_initial_base(1);
        bases.set_final_base(0);
        assert!(bases.is_out());
        bases.toggle_stolen_base(2);
        assert_eq!(bases.final_base(), Some(0));

        let mut bases = BaseAdvancementTracker::new();
        bases.set_initial_base(1);
        bases.set_out_at(3);
        bases.toggle_stolen_base(2);
        assert_eq!(bases.final_base(), None);
        assert!(bases.is_out());
    }

    #[test]
    fn out_at_toggles() {
        let mut bases = BaseAdvancementTracker::new();
        bases.set_out_at(2);
        assert_eq!(bases.out_at(), 2);
        bases.set_out_at(3);
        assert_eq!(bases.out_at(), 3);
        bases.set_out_at(3);
        assert_eq!(bases.out_at(), 0);
        assert!(!bases.is_out());
        bases.set_out_at(9);
        assert_eq!(bases.out_at(), HOME);
    }

    #[test]
    fn stored_sets_are_made_disjoint() {
        let stolen = [2, 3].into_iter().collect();
        let hit_around = [3, 4].into_iter().collect();
        let bases = BaseAdvancementTracker::from_parts(1, Some(4), 0, stolen, hit_around);
        assert_eq!(bases.hit_around_bases().to_vec(), vec![4]);
        assert_eq!(bases.stolen_bases().to_vec(), vec![2, 3]);
    }
}
