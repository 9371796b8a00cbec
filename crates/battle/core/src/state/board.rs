//! Fixed-size battle grid.
//!
//! The board owns cell occupancy by [`UnitId`] and the per-cell environment
//! tags. It never holds combatants directly; [`BattleState`](super::BattleState)
//! keeps the id-to-unit arena and both sides are kept in sync by its methods.
//!
//! Every geometric query clamps to the grid and only returns valid cells.
//! Mutations on coordinates outside the grid return [`BoardError::OutOfBounds`].

use crate::error::{BattleError, ErrorSeverity};

use super::{Position, Team, UnitId};

// ============================================================================
// Environment
// ============================================================================

/// Ground effects left on a cell independently of its occupant.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnvironmentKind {
    /// Burns units of the opposing team standing on it.
    Ember,
    /// Poisons units of the opposing team standing on it.
    PoisonGas,
    /// Paralyzes units of the opposing team standing on it.
    StickyWeb,
    /// Confuses units of the opposing team standing on it.
    Smoke,
    /// Heals units of the owning team standing on it.
    Grass,
}

impl EnvironmentKind {
    /// Beneficial tags affect their owner's team; harmful ones affect the others.
    pub const fn is_beneficial(self) -> bool {
        matches!(self, Self::Grass)
    }
}

/// Environment tag stored on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentTag {
    pub kind: EnvironmentKind,
    /// Team that laid the tag; `None` affects everyone.
    pub owner: Option<Team>,
    /// Milliseconds before the tag disappears; `None` lasts the whole battle.
    pub remaining_ms: Option<i32>,
}

impl EnvironmentTag {
    pub const fn new(kind: EnvironmentKind, owner: Option<Team>) -> Self {
        Self {
            kind,
            owner,
            remaining_ms: None,
        }
    }

    #[must_use]
    pub const fn with_lifetime(mut self, ms: i32) -> Self {
        self.remaining_ms = Some(ms);
        self
    }

    /// Returns true if a unit of `team` standing on the cell is affected.
    pub fn affects(&self, team: Team) -> bool {
        match (self.kind.is_beneficial(), self.owner) {
            (_, None) => true,
            (true, Some(owner)) => owner == team,
            (false, Some(owner)) => owner != team,
        }
    }
}

// ============================================================================
// Cells
// ============================================================================

/// One slot of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub occupant: Option<UnitId>,
    pub environment: Option<EnvironmentTag>,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Errors raised by board mutations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("position {position} is outside the board")]
    OutOfBounds { position: Position },

    #[error("position {position} is already occupied by unit {occupant}")]
    Occupied {
        position: Position,
        occupant: UnitId,
    },

    #[error("position {position} has no occupant")]
    Vacant { position: Position },
}

impl BattleError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfBounds { .. } => ErrorSeverity::Internal,
            Self::Occupied { .. } | Self::Vacant { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfBounds { .. } => "BOARD_OUT_OF_BOUNDS",
            Self::Occupied { .. } => "BOARD_OCCUPIED",
            Self::Vacant { .. } => "BOARD_VACANT",
        }
    }
}

// ============================================================================
// Board
// ============================================================================

/// Width × height grid of [`Cell`]s, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    fn position_at(&self, index: usize) -> Position {
        let width = self.width.max(1) as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    pub fn cell(&self, position: Position) -> Result<&Cell, BoardError> {
        self.index(position)
            .map(|index| &self.cells[index])
            .ok_or(BoardError::OutOfBounds { position })
    }

    fn cell_mut(&mut self, position: Position) -> Result<&mut Cell, BoardError> {
        match self.index(position) {
            Some(index) => Ok(&mut self.cells[index]),
            None => Err(BoardError::OutOfBounds { position }),
        }
    }

    /// Occupant of a cell; `None` for empty or off-board positions.
    pub fn get(&self, position: Position) -> Option<UnitId> {
        self.index(position)
            .and_then(|index| self.cells[index].occupant)
    }

    /// Overwrites the occupant of a cell and returns the previous one.
    pub fn set(
        &mut self,
        position: Position,
        occupant: Option<UnitId>,
    ) -> Result<Option<UnitId>, BoardError> {
        let cell = self.cell_mut(position)?;
        Ok(std::mem::replace(&mut cell.occupant, occupant))
    }

    /// Places a unit on an empty cell.
    pub fn place(&mut self, position: Position, unit: UnitId) -> Result<(), BoardError> {
        let cell = self.cell_mut(position)?;
        if let Some(occupant) = cell.occupant {
            return Err(BoardError::Occupied { position, occupant });
        }
        cell.occupant = Some(unit);
        Ok(())
    }

    /// Empties a cell, returning its previous occupant.
    pub fn remove(&mut self, position: Position) -> Result<UnitId, BoardError> {
        self.cell_mut(position)?
            .occupant
            .take()
            .ok_or(BoardError::Vacant { position })
    }

    /// Exchanges the occupants of two cells (either may be empty).
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), BoardError> {
        let ia = self.index(a).ok_or(BoardError::OutOfBounds { position: a })?;
        let ib = self.index(b).ok_or(BoardError::OutOfBounds { position: b })?;
        let occupant = self.cells[ia].occupant;
        self.cells[ia].occupant = self.cells[ib].occupant;
        self.cells[ib].occupant = occupant;
        Ok(())
    }

    /// In bounds and without occupant.
    pub fn is_empty_cell(&self, position: Position) -> bool {
        self.index(position)
            .is_some_and(|index| self.cells[index].is_empty())
    }

    /// Every position in row-major scan order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(|index| self.position_at(index))
    }

    /// Visits every cell in scan order.
    pub fn for_each(&self, mut visit: impl FnMut(Position, &Cell)) {
        for (index, cell) in self.cells.iter().enumerate() {
            visit(self.position_at(index), cell);
        }
    }

    /// Occupied cells in scan order.
    pub fn occupants(&self) -> impl Iterator<Item = (Position, UnitId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.occupant.map(|id| (self.position_at(index), id)))
    }

    /// Empty cells in scan order.
    pub fn empty_cells(&self) -> Vec<Position> {
        self.positions()
            .filter(|position| self.is_empty_cell(*position))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    /// The up to eight neighbours of `center`.
    pub fn adjacent_cells(&self, center: Position) -> Vec<Position> {
        self.cells_in_radius(center, 1)
    }

    /// Cells within Chebyshev distance `radius` of `center`, excluding `center`,
    /// in scan order. The scanned window is clipped to the grid first, so any
    /// center or radius is accepted.
    pub fn cells_in_radius(&self, center: Position, radius: u32) -> Vec<Position> {
        let r = i64::from(radius);
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let x_lo = (cx - r).max(0);
        let x_hi = (cx + r).min(i64::from(self.width) - 1);
        let y_lo = (cy - r).max(0);
        let y_hi = (cy + r).min(i64::from(self.height) - 1);

        let mut cells = Vec::new();
        for y in y_lo..=y_hi {
            for x in x_lo..=x_hi {
                // Both bounds are inside 0..u8::MAX here.
                let position = Position::new(x as i32, y as i32);
                if position != center {
                    cells.push(position);
                }
            }
        }
        cells
    }

    /// Cells on the straight line from `a` to `b`, both endpoints excluded.
    ///
    /// Uses Bresenham's algorithm so the result is symmetric in length and
    /// deterministic for a given pair. Endpoints far off the grid are pulled
    /// in to the ring just outside it before walking.
    pub fn cells_between(&self, a: Position, b: Position) -> Vec<Position> {
        let a = self.clamp_outside(a);
        let b = self.clamp_outside(b);
        let mut cells = Vec::new();
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = (b.x - a.x).signum();
        let sy = (b.y - a.y).signum();
        let mut err = dx + dy;
        let mut current = a;

        while current != b {
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                current.x += sx;
            }
            if e2 <= dx {
                err += dx;
                current.y += sy;
            }
            if current != b && self.contains(current) {
                cells.push(current);
            }
        }
        cells
    }

    /// Clamps a position into `-1..=width` x `-1..=height`.
    fn clamp_outside(&self, position: Position) -> Position {
        Position::new(
            position.x.clamp(-1, i32::from(self.width)),
            position.y.clamp(-1, i32::from(self.height)),
        )
    }

    /// Cells within `depth` of `origin` that lie ahead of it in the direction
    /// of `toward`, in scan order.
    pub fn cells_in_front(&self, origin: Position, toward: Position, depth: u32) -> Vec<Position> {
        let (dx, dy) = origin.direction_to(toward);
        if (dx, dy) == (0, 0) {
            return Vec::new();
        }
        self.cells_in_radius(origin, depth)
            .into_iter()
            .filter(|cell| {
                let ahead = (i64::from(cell.x) - i64::from(origin.x)) * i64::from(dx)
                    + (i64::from(cell.y) - i64::from(origin.y)) * i64::from(dy);
                ahead > 0
            })
            .collect()
    }

    /// Destination of a teleport away from `from`: the free corner farthest
    /// from it, or the farthest free cell when every corner is taken.
    pub fn teleportation_cell(&self, from: Position) -> Option<Position> {
        let (w, h) = (self.width as i32 - 1, self.height as i32 - 1);
        let corners = [
            Position::new(0, 0),
            Position::new(w, 0),
            Position::new(0, h),
            Position::new(w, h),
        ];
        farthest(corners.into_iter().filter(|c| self.is_empty_cell(*c)), from)
            .or_else(|| farthest(self.empty_cells().into_iter(), from))
    }

    /// Free cell within `max_travel` of `unit` that is farthest from `threat`.
    /// Ties favour the shorter flight, then scan order.
    pub fn fly_away_cell(
        &self,
        unit: Position,
        threat: Position,
        max_travel: u32,
    ) -> Option<Position> {
        self.cells_in_radius(unit, max_travel)
            .into_iter()
            .filter(|cell| self.is_empty_cell(*cell))
            .filter(|cell| cell.distance(threat) > unit.distance(threat))
            .fold(None, |best: Option<Position>, cell| match best {
                None => Some(cell),
                Some(current) => {
                    let key = (cell.distance(threat), std::cmp::Reverse(cell.distance(unit)));
                    let best_key = (
                        current.distance(threat),
                        std::cmp::Reverse(current.distance(unit)),
                    );
                    if key > best_key { Some(cell) } else { Some(current) }
                }
            })
    }

    // ------------------------------------------------------------------------
    // Environment
    // ------------------------------------------------------------------------

    pub fn environment(&self, position: Position) -> Option<EnvironmentTag> {
        self.cell(position).ok().and_then(|cell| cell.environment)
    }

    /// Lays (or replaces) an environment tag on a cell.
    pub fn set_environment(
        &mut self,
        position: Position,
        tag: Option<EnvironmentTag>,
    ) -> Result<(), BoardError> {
        self.cell_mut(position)?.environment = tag;
        Ok(())
    }

    /// Ages timed environment tags, removing the expired ones.
    ///
    /// Returns the positions whose tag disappeared.
    pub fn tick_environment(&mut self, dt: u32) -> Vec<Position> {
        let dt = dt.min(i32::MAX as u32) as i32;
        let mut expired = Vec::new();
        for index in 0..self.cells.len() {
            let cell = &mut self.cells[index];
            let Some(tag) = cell.environment.as_mut() else {
                continue;
            };
            let Some(remaining) = tag.remaining_ms.as_mut() else {
                continue;
            };
            *remaining -= dt;
            if *remaining <= 0 {
                cell.environment = None;
                expired.push(self.position_at(index));
            }
        }
        expired
    }
}

/// First position maximizing distance from `from` (first found wins ties).
fn farthest(candidates: impl Iterator<Item = Position>, from: Position) -> Option<Position> {
    candidates.fold(None, |best, candidate| match best {
        Some(current) if current.distance(from) >= candidate.distance(from) => Some(current),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_rejects_occupied_and_out_of_bounds() {
        let mut board = Board::new(4, 4);
        board.place(Position::new(1, 1), UnitId(1)).unwrap();
        assert_eq!(
            board.place(Position::new(1, 1), UnitId(2)),
            Err(BoardError::Occupied {
                position: Position::new(1, 1),
                occupant: UnitId(1)
            })
        );
        assert!(matches!(
            board.place(Position::new(4, 0), UnitId(2)),
            Err(BoardError::OutOfBounds { .. })
        ));
        assert_eq!(board.get(Position::new(-1, 0)), None);
    }

    #[test]
    fn adjacency_is_clamped_at_corners() {
        let board = Board::new(8, 6);
        assert_eq!(board.adjacent_cells(Position::new(0, 0)).len(), 3);
        assert_eq!(board.adjacent_cells(Position::new(3, 3)).len(), 8);
        assert_eq!(board.adjacent_cells(Position::new(7, 2)).len(), 5);
    }

    #[test]
    fn radius_never_leaves_the_grid() {
        let board = Board::new(3, 3);
        let cells = board.cells_in_radius(Position::new(1, 1), 10);
        assert_eq!(cells.len(), 8);
        assert!(cells.iter().all(|c| board.contains(*c)));
    }

    #[test]
    fn extreme_inputs_stay_on_the_grid() {
        let board = Board::new(8, 6);
        let far = Position::new(i32::MAX, i32::MIN);

        let cells = board.cells_in_radius(Position::new(3, 3), u32::MAX);
        assert_eq!(cells.len(), 47);
        assert!(board.cells_in_radius(far, 4).is_empty());
        assert_eq!(board.cells_in_radius(Position::new(i32::MIN, 0), u32::MAX).len(), 48);

        assert_eq!(
            board.cells_between(Position::new(-1, 0), Position::new(i32::MAX, 0)),
            (0..8).map(|x| Position::new(x, 0)).collect::<Vec<_>>()
        );
        assert!(
            board
                .cells_between(far, Position::new(i32::MIN, i32::MAX))
                .iter()
                .all(|c| board.contains(*c))
        );

        assert!(board.cells_in_front(far, Position::ORIGIN, u32::MAX).len() <= 48);
        assert_eq!(Position::new(i32::MIN, 0).distance(Position::new(i32::MAX, 0)), u32::MAX);
        assert!(board.fly_away_cell(Position::new(2, 2), far, u32::MAX).is_some());
    }

    #[test]
    fn cells_between_excludes_endpoints() {
        let board = Board::new(8, 8);
        assert_eq!(
            board.cells_between(Position::new(0, 0), Position::new(3, 3)),
            vec![Position::new(1, 1), Position::new(2, 2)]
        );
        assert_eq!(
            board.cells_between(Position::new(2, 5), Position::new(2, 1)),
            vec![Position::new(2, 4), Position::new(2, 3), Position::new(2, 2)]
        );
        assert!(
            board
                .cells_between(Position::new(1, 1), Position::new(2, 2))
                .is_empty()
        );
    }

    #[test]
    fn cells_in_front_follow_direction() {
        let board = Board::new(8, 6);
        let front = board.cells_in_front(Position::new(3, 2), Position::new(3, 5), 1);
        assert_eq!(
            front,
            vec![
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(4, 3)
            ]
        );
    }

    #[test]
    fn swap_exchanges_occupants() {
        let mut board = Board::new(4, 4);
        board.place(Position::new(0, 0), UnitId(1)).unwrap();
        board.swap(Position::new(0, 0), Position::new(3, 3)).unwrap();
        assert_eq!(board.get(Position::new(0, 0)), None);
        assert_eq!(board.get(Position::new(3, 3)), Some(UnitId(1)));
    }

    #[test]
    fn teleport_prefers_far_free_corner() {
        let mut board = Board::new(8, 6);
        board.place(Position::new(7, 5), UnitId(9)).unwrap();
        let cell = board.teleportation_cell(Position::new(6, 4));
        assert_eq!(cell, Some(Position::new(0, 0)));
    }

    #[test]
    fn fly_away_increases_distance_from_threat() {
        let board = Board::new(8, 6);
        let unit = Position::new(3, 3);
        let threat = Position::new(3, 4);
        let cell = board.fly_away_cell(unit, threat, 2).unwrap();
        assert!(cell.distance(threat) > unit.distance(threat));
        assert_eq!(cell.distance(threat), 3);
    }

    #[test]
    fn environment_tags_expire() {
        let mut board = Board::new(4, 4);
        let tag = EnvironmentTag::new(EnvironmentKind::Ember, Some(Team::Blue)).with_lifetime(1000);
        board.set_environment(Position::new(2, 2), Some(tag)).unwrap();
        assert!(board.tick_environment(600).is_empty());
        assert_eq!(board.tick_environment(400), vec![Position::new(2, 2)]);
        assert_eq!(board.environment(Position::new(2, 2)), None);
    }

    #[test]
    fn tag_ownership_selects_affected_team() {
        let ember = EnvironmentTag::new(EnvironmentKind::Ember, Some(Team::Blue));
        assert!(ember.affects(Team::Red));
        assert!(!ember.affects(Team::Blue));
        let grass = EnvironmentTag::new(EnvironmentKind::Grass, Some(Team::Blue));
        assert!(grass.affects(Team::Blue));
        assert!(!grass.affects(Team::Red));
    }
}
