//! Board, cells and coordinates.

use crate::game::GeneralId;

/// Player seat (0 or 1).
pub type PlayerId = u8;

/// Number of seats in a match.
pub const NUM_PLAYERS: usize = 2;

/// Return the other seat.
#[must_use]
pub const fn opponent(player: PlayerId) -> PlayerId {
    1 - player
}

/// A position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Row index (grows downward).
    pub row: u16,
    /// Column index (grows rightward).
    pub col: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Build a coordinate from raw command parameters.
    ///
    /// Returns `None` for negative or oversized values; the board still has
    /// to confirm the result is in bounds.
    #[must_use]
    pub fn from_params(row: i64, col: i64) -> Option<Self> {
        let row = u16::try_from(row).ok()?;
        let col = u16::try_from(col).ok()?;
        Some(Self::new(row, col))
    }

    /// Step one cell in a direction. `None` when leaving the top or left edge.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Self::new(row, self.col)),
            Direction::Down => self.row.checked_add(1).map(|row| Self::new(row, self.col)),
            Direction::Left => self.col.checked_sub(1).map(|col| Self::new(self.row, col)),
            Direction::Right => self.col.checked_add(1).map(|col| Self::new(self.row, col)),
        }
    }

    /// Chebyshev (king-move) distance.
    #[must_use]
    pub const fn chebyshev(self, other: Self) -> u16 {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        if dr > dc { dr } else { dc }
    }

    /// Manhattan distance.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.row.abs_diff(other.row) as u32 + self.col.abs_diff(other.col) as u32
    }

    /// `[row, col]` as emitted in replay records.
    #[must_use]
    pub const fn to_pair(self) -> [u16; 2] {
        [self.row, self.col]
    }
}

/// Orthogonal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
    /// Toward the last column.
    Right,
}

impl Direction {
    /// All four directions in command-code order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Decode a command direction (1 = up, 2 = down, 3 = left, 4 = right).
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Up),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            4 => Some(Self::Right),
            _ => None,
        }
    }

    /// Command code of this direction.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => 2,
            Self::Left => 3,
            Self::Right => 4,
        }
    }
}

/// Terrain of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Terrain {
    /// Open ground.
    #[default]
    Plain = 0,
    /// Drains one army per round unless the owner has bog immunity.
    Bog = 1,
    /// Impassable without climbing tech.
    Mountain = 2,
}

impl Terrain {
    /// Digit used in the replay terrain string.
    #[must_use]
    pub const fn digit(self) -> char {
        match self {
            Self::Plain => '0',
            Self::Bog => '1',
            Self::Mountain => '2',
        }
    }

    /// Parse a terrain digit.
    #[must_use]
    pub const fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Plain),
            '1' => Some(Self::Bog),
            '2' => Some(Self::Mountain),
            _ => None,
        }
    }
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// Terrain type.
    pub terrain: Terrain,
    /// Owning seat, `None` when neutral.
    pub owner: Option<PlayerId>,
    /// Army stationed here.
    pub army: u32,
    /// General standing on this cell.
    pub general: Option<GeneralId>,
}

impl Cell {
    /// Create an empty neutral cell.
    #[must_use]
    pub const fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            owner: None,
            army: 0,
            general: None,
        }
    }

    /// Clear ownership if the cell holds neither army nor a General.
    pub fn neutralize_if_empty(&mut self) {
        if self.army == 0 && self.general.is_none() {
            self.owner = None;
        }
    }
}

/// Rectangular grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: u16,
    cols: u16,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an all-plain board. `None` if either dimension is zero.
    #[must_use]
    pub fn new(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        let size = usize::from(rows) * usize::from(cols);
        Some(Self {
            rows,
            cols,
            cells: vec![Cell::default(); size],
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Check that a coordinate lies on the board.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| usize::from(coord.row) * usize::from(self.cols) + usize::from(coord.col))
    }

    /// Cell at a coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    /// Mutable cell at a coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).map(|idx| &mut self.cells[idx])
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over coordinates and cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        let cols = usize::from(self.cols);
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx / cols) as u16, (idx % cols) as u16);
            (coord, cell)
        })
    }

    /// Every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Coord::new(row, col)))
    }

    /// Coordinates within Chebyshev `radius` of `center`, clamped to the board.
    pub fn area(&self, center: Coord, radius: u16) -> impl Iterator<Item = Coord> + use<> {
        let row_lo = center.row.saturating_sub(radius);
        let row_hi = center.row.saturating_add(radius).min(self.rows.saturating_sub(1));
        let col_lo = center.col.saturating_sub(radius);
        let col_hi = center.col.saturating_add(radius).min(self.cols.saturating_sub(1));
        (row_lo..=row_hi).flat_map(move |row| (col_lo..=col_hi).map(move |col| Coord::new(row, col)))
    }

    /// In-bounds orthogonal neighbours.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| coord.step(dir))
            .filter(|next| self.in_bounds(*next))
    }

    /// Sum of army on cells owned by `player`.
    #[must_use]
    pub fn total_army(&self, player: PlayerId) -> u64 {
        self.cells
            .iter()
            .filter(|cell| cell.owner == Some(player))
            .map(|cell| u64::from(cell.army))
            .sum()
    }

    /// Number of cells owned by `player`.
    #[must_use]
    pub fn count_cells(&self, player: PlayerId) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let count = self
            .cells
            .iter()
            .filter(|cell| cell.owner == Some(player))
            .count() as u32;
        count
    }

    /// Terrain of every cell as a digit string in row-major order.
    #[must_use]
    pub fn terrain_string(&self) -> String {
        self.cells.iter().map(|cell| cell.terrain.digit()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_codes() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_code(dir.code()), Some(dir));
        }
        assert_eq!(Direction::from_code(0), None);
        assert_eq!(Direction::from_code(5), None);
    }

    #[test]
    fn test_step_up_decrements_row() {
        let c = Coord::new(3, 4);
        assert_eq!(c.step(Direction::Up), Some(Coord::new(2, 4)));
        assert_eq!(c.step(Direction::Right), Some(Coord::new(3, 5)));
        assert_eq!(Coord::new(0, 0).step(Direction::Up), None);
        assert_eq!(Coord::new(0, 0).step(Direction::Left), None);
    }

    #[test]
    fn test_distances() {
        let a = Coord::new(1, 1);
        let b = Coord::new(3, 2);
        assert_eq!(a.chebyshev(b), 2);
        assert_eq!(a.manhattan(b), 3);
    }

    #[test]
    fn test_from_params_rejects_negative() {
        assert_eq!(Coord::from_params(-1, 0), None);
        assert_eq!(Coord::from_params(0, 70_000), None);
        assert_eq!(Coord::from_params(2, 3), Some(Coord::new(2, 3)));
    }

    #[test]
    fn test_area_clamped_at_corner() {
        let board = Board::new(15, 15).unwrap();
        let cells: Vec<_> = board.area(Coord::new(0, 0), 1).collect();
        assert_eq!(cells.len(), 4);
        let cells: Vec<_> = board.area(Coord::new(7, 7), 2).collect();
        assert_eq!(cells.len(), 25);
        let cells: Vec<_> = board.area(Coord::new(14, 7), 1).collect();
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn test_neighbors_at_edge() {
        let board = Board::new(5, 5).unwrap();
        assert_eq!(board.neighbors(Coord::new(0, 0)).count(), 2);
        assert_eq!(board.neighbors(Coord::new(4, 2)).count(), 3);
        assert_eq!(board.neighbors(Coord::new(2, 2)).count(), 4);
    }

    #[test]
    fn test_zero_size_board() {
        assert!(Board::new(0, 5).is_none());
        assert!(Board::new(5, 0).is_none());
    }

    #[test]
    fn test_neutralize_if_empty() {
        let mut cell = Cell::new(Terrain::Plain);
        cell.owner = Some(0);
        cell.general = Some(3);
        cell.neutralize_if_empty();
        assert_eq!(cell.owner, Some(0));
        cell.general = None;
        cell.neutralize_if_empty();
        assert_eq!(cell.owner, None);
    }

    #[test]
    fn test_totals_and_terrain_string() {
        let mut board = Board::new(2, 3).unwrap();
        board.get_mut(Coord::new(0, 1)).unwrap().terrain = Terrain::Bog;
        board.get_mut(Coord::new(1, 2)).unwrap().terrain = Terrain::Mountain;
        {
            let cell = board.get_mut(Coord::new(1, 0)).unwrap();
            cell.owner = Some(1);
            cell.army = 7;
        }
        assert_eq!(board.terrain_string(), "010002");
        assert_eq!(board.total_army(1), 7);
        assert_eq!(board.count_cells(1), 1);
        assert_eq!(board.count_cells(0), 0);
    }
}
