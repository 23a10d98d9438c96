//! Tile grid
//!
//! Built once per round from a static layout: walls stay walls, every other
//! tile starts as a collectible except the actors' start tiles. A collectible
//! turns into open floor exactly once.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Default maze, '1' = wall, '0' = open
pub const DEFAULT_LAYOUT: [&str; 15] = [
    "1111111111111111111",
    "1000000000000000001",
    "1011111101110111101",
    "1000000100000100001",
    "1011110101110101111",
    "1000010001000000001",
    "1111011101011110101",
    "1000000000000000001",
    "1010111110111110101",
    "1000100000100000101",
    "1110101110101110101",
    "1000001000001000001",
    "1011111011111011111",
    "1000000000000000001",
    "1111111111111111111",
];

pub const DEFAULT_PLAYER_START: IVec2 = IVec2::new(1, 1);

/// Pursuer pen in the middle of the maze
pub const DEFAULT_PURSUER_STARTS: [IVec2; 4] = [
    IVec2::new(9, 7),
    IVec2::new(11, 7),
    IVec2::new(9, 8),
    IVec2::new(9, 9),
];

/// A single grid tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Open,
    Collectible,
}

/// The play field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major; length = width * height
    tiles: Vec<Tile>,
    collectibles: u32,
}

impl Grid {
    /// Parse a layout and fill it with collectibles, leaving start tiles clear.
    ///
    /// Fails on an empty or ragged layout, unknown characters, or a start tile
    /// that is off the grid or inside a wall.
    pub fn generate<S: AsRef<str>>(
        layout: &[S],
        player_start: IVec2,
        pursuer_starts: &[IVec2],
    ) -> Result<Self, LayoutError> {
        let mut grid = Self::parse(layout)?;

        let starts = std::iter::once(("player", player_start))
            .chain(pursuer_starts.iter().map(|&cell| ("pursuer", cell)));
        for (actor, cell) in starts.clone() {
            if !grid.in_bounds(cell) {
                return Err(LayoutError::StartOutOfBounds {
                    actor,
                    x: cell.x,
                    y: cell.y,
                });
            }
            if grid.tile(cell) == Tile::Wall {
                return Err(LayoutError::StartOnWall {
                    actor,
                    x: cell.x,
                    y: cell.y,
                });
            }
        }

        for tile in grid.tiles.iter_mut().filter(|t| **t == Tile::Open) {
            *tile = Tile::Collectible;
        }
        for (_, cell) in starts {
            let idx = grid.index(cell);
            grid.tiles[idx] = Tile::Open;
        }
        grid.collectibles = grid
            .tiles
            .iter()
            .filter(|t| **t == Tile::Collectible)
            .count() as u32;

        if grid.collectibles == 0 {
            return Err(LayoutError::NoCollectibles);
        }
        Ok(grid)
    }

    /// Walls and open floor only
    fn parse<S: AsRef<str>>(layout: &[S]) -> Result<Self, LayoutError> {
        let first = layout.first().ok_or(LayoutError::Empty)?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * layout.len());
        for (y, row) in layout.iter().enumerate() {
            let row = row.as_ref();
            let row_width = row.chars().count();
            if row_width != width {
                return Err(LayoutError::Ragged {
                    row: y,
                    width: row_width,
                    expected: width,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                tiles.push(match ch {
                    '1' => Tile::Wall,
                    '0' => Tile::Open,
                    _ => return Err(LayoutError::UnknownTile { ch, x, y }),
                });
            }
        }

        Ok(Self {
            width: width as i32,
            height: layout.len() as i32,
            tiles,
            collectibles: 0,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    #[inline]
    fn index(&self, cell: IVec2) -> usize {
        (cell.y * self.width + cell.x) as usize
    }

    /// Tile at `cell`; anything off the grid reads as wall
    pub fn tile(&self, cell: IVec2) -> Tile {
        if self.in_bounds(cell) {
            self.tiles[self.index(cell)]
        } else {
            Tile::Wall
        }
    }

    /// Whether an actor may stand on `cell`
    #[inline]
    pub fn is_open(&self, cell: IVec2) -> bool {
        self.tile(cell) != Tile::Wall
    }

    /// Collect the bean at `cell`, if there is one
    pub fn collect(&mut self, cell: IVec2) -> bool {
        if self.tile(cell) != Tile::Collectible {
            return false;
        }
        let idx = self.index(cell);
        self.tiles[idx] = Tile::Open;
        self.collectibles -= 1;
        true
    }

    pub fn collectibles_remaining(&self) -> u32 {
        self.collectibles
    }

    /// Rows for drawing, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width as usize)
    }

    /// Every collectible cell (row-major)
    pub fn collectible_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.tiles.iter().enumerate().filter_map(|(i, t)| {
            (*t == Tile::Collectible)
                .then(|| IVec2::new(i as i32 % self.width, i as i32 / self.width))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_grid() -> Grid {
        Grid::generate(&DEFAULT_LAYOUT, DEFAULT_PLAYER_START, &DEFAULT_PURSUER_STARTS).unwrap()
    }

    #[test]
    fn test_default_layout_generates() {
        let grid = default_grid();
        assert_eq!(grid.width(), 19);
        assert_eq!(grid.height(), 15);

        let open = DEFAULT_LAYOUT
            .iter()
            .flat_map(|row| row.chars())
            .filter(|c| *c == '0')
            .count() as u32;
        // Every open tile except the five start tiles
        assert_eq!(grid.collectibles_remaining(), open - 5);
        assert_eq!(grid.tile(DEFAULT_PLAYER_START), Tile::Open);
        for start in DEFAULT_PURSUER_STARTS {
            assert_eq!(grid.tile(start), Tile::Open);
        }
        assert_eq!(grid.tile(IVec2::new(2, 1)), Tile::Collectible);
        assert_eq!(grid.tile(IVec2::new(0, 0)), Tile::Wall);
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let grid = default_grid();
        assert!(!grid.is_open(IVec2::new(-1, 1)));
        assert!(!grid.is_open(IVec2::new(1, 15)));
        assert!(!grid.is_open(IVec2::new(19, 1)));
    }

    #[test]
    fn test_collect_once() {
        let mut grid = default_grid();
        let before = grid.collectibles_remaining();
        let cell = IVec2::new(2, 1);

        assert!(grid.collect(cell));
        assert_eq!(grid.tile(cell), Tile::Open);
        assert_eq!(grid.collectibles_remaining(), before - 1);
        assert!(!grid.collect(cell));
        assert_eq!(grid.collectibles_remaining(), before - 1);
        // Walls are never collectible
        assert!(!grid.collect(IVec2::new(0, 0)));
    }

    #[test]
    fn test_ragged_layout() {
        let err = Grid::generate(&["111", "10", "111"], IVec2::new(1, 1), &[]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::Ragged {
                row: 1,
                width: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn test_unknown_tile() {
        let err = Grid::generate(&["111", "1x1", "111"], IVec2::new(1, 1), &[]).unwrap_err();
        assert_eq!(err, LayoutError::UnknownTile { ch: 'x', x: 1, y: 1 });
    }

    #[test]
    fn test_empty_layout() {
        let empty: [&str; 0] = [];
        assert_eq!(
            Grid::generate(&empty, IVec2::ZERO, &[]).unwrap_err(),
            LayoutError::Empty
        );
    }

    #[test]
    fn test_start_on_wall() {
        let err = Grid::generate(&DEFAULT_LAYOUT, IVec2::new(1, 1), &[IVec2::new(11, 8)])
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::StartOnWall {
                actor: "pursuer",
                x: 11,
                y: 8
            }
        );
    }

    #[test]
    fn test_start_out_of_bounds() {
        let err = Grid::generate(&DEFAULT_LAYOUT, IVec2::new(40, 1), &[]).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::StartOutOfBounds { actor: "player", .. }
        ));
    }

    #[test]
    fn test_no_collectibles() {
        let err = Grid::generate(&["111", "101", "111"], IVec2::new(1, 1), &[]).unwrap_err();
        assert_eq!(err, LayoutError::NoCollectibles);
    }

    #[test]
    fn test_rows_top_to_bottom() {
        let grid = Grid::generate(&["11111", "10001", "11111"], IVec2::new(1, 1), &[]).unwrap();
        let rows: Vec<&[Tile]> = grid.rows().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 5));
        assert!(rows[0].iter().all(|&t| t == Tile::Wall));
        for (y, row) in rows.iter().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                assert_eq!(tile, grid.tile(IVec2::new(x as i32, y as i32)));
            }
        }
    }

    #[test]
    fn test_collectible_cells_match_count() {
        let grid = default_grid();
        let cells: Vec<IVec2> = grid.collectible_cells().collect();
        assert_eq!(cells.len() as u32, grid.collectibles_remaining());
        assert!(cells.iter().all(|c| grid.tile(*c) == Tile::Collectible));
    }
}
