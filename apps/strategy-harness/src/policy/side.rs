//! Side selection for in-bounds quoting.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::models::Side;

/// Source of the quoting side when position is within bounds.
pub trait SideChooser {
    /// Pick a side for the next quote.
    fn choose(&mut self) -> Side;
}

/// Fair coin over Bid/Ask backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomSide<R> {
    rng: R,
}

impl<R: Rng> RandomSide<R> {
    /// Wrap a random generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSide<StdRng> {
    /// Reproducible chooser from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Chooser seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> SideChooser for RandomSide<R> {
    fn choose(&mut self) -> Side {
        if self.rng.random_bool(0.5) {
            Side::Bid
        } else {
            Side::Ask
        }
    }
}

/// Always returns the same side.
#[derive(Debug, Clone, Copy)]
pub struct FixedSide(pub Side);

impl SideChooser for FixedSide {
    fn choose(&mut self) -> Side {
        self.0
    }
}

impl<C: SideChooser + ?Sized> SideChooser for Box<C> {
    fn choose(&mut self) -> Side {
        (**self).choose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_chooser_is_reproducible() {
        let mut a = RandomSide::seeded(7);
        let mut b = RandomSide::seeded(7);

        let first: Vec<Side> = (0..64).map(|_| a.choose()).collect();
        let second: Vec<Side> = (0..64).map(|_| b.choose()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_random_chooser_picks_both_sides() {
        let mut chooser = RandomSide::seeded(1);
        let picks: Vec<Side> = (0..200).map(|_| chooser.choose()).collect();

        assert!(picks.contains(&Side::Bid));
        assert!(picks.contains(&Side::Ask));
    }

    #[test]
    fn test_fixed_side() {
        let mut chooser: Box<dyn SideChooser> = Box::new(FixedSide(Side::Ask));
        assert_eq!(chooser.choose(), Side::Ask);
        assert_eq!(chooser.choose(), Side::Ask);
    }
}
