//! Deterministic random stream for battle mechanics.
//!
//! Every random draw in a battle (dodge, crit, tie-breaks, random targets,
//! random abilities, handler procs) goes through one [`BattleRng`] so that a
//! battle replays bit-for-bit from its seed. The generator state is plain data
//! and travels inside snapshots.

use tracing::trace;

/// Why a random number is drawn. Only used to label draws in traces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RollPurpose {
    TieBreak,
    Dodge,
    Crit,
    RandomTarget,
    RandomAbility,
    Handler,
}

/// Seeded PCG-XSH-RR stream shared by every subsystem of one battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleRng {
    seed: u64,
    state: u64,
    draws: u64,
}

impl BattleRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            state: scramble(seed),
            draws: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Draws the next raw value.
    pub fn next_u32(&mut self, purpose: RollPurpose) -> u32 {
        let old = self.state;
        self.state = old
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.draws += 1;

        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let value = xorshifted.rotate_right((old >> 59) as u32);
        trace!(?purpose, draw = self.draws, value, "rng draw");
        value
    }

    /// Bernoulli draw: true with probability `percent`/100.
    ///
    /// Percentages of 0 never succeed and 100 or more always succeed; neither
    /// consumes a draw, which keeps streams aligned when chances are static.
    pub fn chance_pct(&mut self, percent: u32, purpose: RollPurpose) -> bool {
        if percent == 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        self.next_u32(purpose) % 100 < percent
    }

    /// Uniform pick among `items`. A single candidate is returned without a draw.
    pub fn pick<T: Copy>(&mut self, items: &[T], purpose: RollPurpose) -> Option<T> {
        match items.len() {
            0 => None,
            1 => items.first().copied(),
            len => {
                let index = self.next_u32(purpose) as usize % len;
                items.get(index).copied()
            }
        }
    }
}

/// SplitMix64 finalizer; spreads small seeds over the whole state space.
fn scramble(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = BattleRng::new(42);
        let mut b = BattleRng::new(42);
        for _ in 0..32 {
            assert_eq!(
                a.next_u32(RollPurpose::Crit),
                b.next_u32(RollPurpose::Dodge)
            );
        }
        assert_eq!(a, b);
    }

    #[test]
    fn adjacent_seeds_diverge() {
        let mut a = BattleRng::new(1);
        let mut b = BattleRng::new(2);
        let left: Vec<u32> = (0..8).map(|_| a.next_u32(RollPurpose::Dodge)).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32(RollPurpose::Dodge)).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn certain_chances_do_not_consume_draws() {
        let mut rng = BattleRng::new(7);
        assert!(!rng.chance_pct(0, RollPurpose::Dodge));
        assert!(rng.chance_pct(100, RollPurpose::Crit));
        assert_eq!(rng.draws(), 0);
        rng.chance_pct(50, RollPurpose::Crit);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn half_chance_is_roughly_half() {
        let mut rng = BattleRng::new(0xC0FFEE);
        let hits = (0..1000)
            .filter(|_| rng.chance_pct(50, RollPurpose::Dodge))
            .count();
        assert!((400..=600).contains(&hits), "{hits} hits");
    }

    #[test]
    fn pick_stays_in_bounds() {
        let mut rng = BattleRng::new(99);
        let items = [3, 5, 8];
        for _ in 0..100 {
            let value = rng.pick(&items, RollPurpose::TieBreak);
            assert!(matches!(value, Some(3 | 5 | 8)));
        }
        assert_eq!(rng.pick::<u8>(&[], RollPurpose::TieBreak), None);

        let before = rng.draws();
        assert_eq!(rng.pick(&[9], RollPurpose::TieBreak), Some(9));
        assert_eq!(rng.draws(), before);
    }
}
