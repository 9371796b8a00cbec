use std::fmt;

/// Unique identifier for a combatant tracked in one battle.
///
/// Ids are allocated in placement order (blue roster, then red roster, then
/// summons) and are never reused within a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in cell coordinates.
///
/// Coordinates are signed so that handler arithmetic (offsets, directions)
/// can step outside the board; the [`Board`](super::Board) rejects or clamps
/// such positions instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Chebyshev (king-move) distance, the metric used for range checks.
    pub fn distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Manhattan distance, used only to break movement ties.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Unit step (each component in -1..=1) pointing from `self` toward `other`.
    pub fn direction_to(self, other: Position) -> (i32, i32) {
        (
            other.x.cmp(&self.x) as i32,
            other.y.cmp(&self.y) as i32,
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The two sides of a battle.
///
/// Blue deploys on the low rows and advances toward higher `y`; red deploys
/// mirrored on the high rows.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    /// Update order used by the simulation clock.
    pub const ALL: [Team; 2] = [Team::Blue, Team::Red];

    pub const fn opponent(self) -> Self {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Team::Blue => 0,
            Team::Red => 1,
        }
    }
}

/// Number of `update` calls the simulation clock has processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_chebyshev() {
        let a = Position::new(1, 1);
        assert_eq!(a.distance(Position::new(3, 2)), 2);
        assert_eq!(a.distance(Position::new(2, 2)), 1);
        assert_eq!(a.manhattan(Position::new(2, 2)), 2);
    }

    #[test]
    fn direction_is_clamped_to_unit_steps() {
        let a = Position::new(4, 1);
        assert_eq!(a.direction_to(Position::new(0, 5)), (-1, 1));
        assert_eq!(a.direction_to(a), (0, 0));
    }

    #[test]
    fn opponents_are_symmetric() {
        for team in Team::ALL {
            assert_eq!(team.opponent().opponent(), team);
            assert_ne!(team.opponent(), team);
        }
    }
}
