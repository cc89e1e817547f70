//! Edge-state classification
//!
//! Every cell keeps one [`EdgeState`] per direction describing whether the
//! shared boundary with that neighbor can produce a collision and whether
//! it needs shape-specific handling:
//! - `Off`: the boundary can never collide (both sides open, or the
//!   neighbor's mass is unreachable across it)
//! - `Interesting`: the neighbor's surface faces this cell (or is exactly
//!   perpendicular to the boundary); the broad phase must dispatch to the
//!   neighbor's shape resolver
//! - `Solid`: the boundary blocks fully; the broad phase may resolve
//!   straight along the axis
//!
//! The state depends only on this cell's shape and the corresponding
//! neighbor's shape, so it is recomputed eagerly for a cell and its four
//! neighbors whenever either side changes shape.

use glam::IVec2;

use super::tile::{ShapeClass, Tile};

/// Per-direction boundary classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeState {
    #[default]
    Off,
    Interesting,
    Solid,
}

/// Grid direction; offsets are in (column, row) order with rows growing
/// downward, matching world +y
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// Unit cell offset toward the neighbor on this side
    #[inline]
    pub fn offset(self) -> IVec2 {
        match self {
            Dir::Up => IVec2::new(0, -1),
            Dir::Down => IVec2::new(0, 1),
            Dir::Left => IVec2::new(-1, 0),
            Dir::Right => IVec2::new(1, 0),
        }
    }

    /// Opposite direction
    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// The four edge states of one cell
#[derive(Debug, Clone, Copy, Default)]
pub struct Edges {
    pub up: EdgeState,
    pub down: EdgeState,
    pub left: EdgeState,
    pub right: EdgeState,
}

impl Edges {
    #[inline]
    pub fn get(&self, dir: Dir) -> EdgeState {
        match dir {
            Dir::Up => self.up,
            Dir::Down => self.down,
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    #[inline]
    pub fn set(&mut self, dir: Dir, state: EdgeState) {
        match dir {
            Dir::Up => self.up = state,
            Dir::Down => self.down = state,
            Dir::Left => self.left = state,
            Dir::Right => self.right = state,
        }
    }
}

/// Small-slope exception: a 67.5° small tile seen across a vertical edge
/// (or a 22.5° small tile across a horizontal edge) keeps a vertex
/// strictly inside the cell, so the plain normal-component test
/// misclassifies it. `d` selects the axis and the sign the tile's
/// orientation must match.
fn small_slope_exception(tile: &Tile, d: IVec2) -> bool {
    if d.y != 0 {
        tile.shape == ShapeClass::Slope67Small && tile.sign.y == d.y
    } else {
        tile.shape == ShapeClass::Slope22Small && tile.sign.x == d.x
    }
}

/// Neighbor surface faces this cell across the edge (or is exactly
/// perpendicular to it — the `<=` deliberately classifies half tiles seen
/// from the side as interesting).
fn neighbor_faces_cell(neighbor: &Tile, d: IVec2) -> bool {
    neighbor.sign.dot(d) <= 0 || small_slope_exception(neighbor, d)
}

/// Classify the edge of `cell` toward its `neighbor` in direction `dir`.
///
/// Two rule rows cover all shapes:
/// - a *blocking* row (empty cells, shaped cells whose own normal faces
///   the edge, and the small-slope far-side exception): the neighbor can
///   present a solid face here, so FULL and away-facing neighbors are
///   `Solid`;
/// - a *pass-through* row (full cells, shaped cells facing away): the
///   cell's own mass already covers the boundary, so the neighbor can at
///   most be `Interesting`.
pub fn classify_edge(cell: &Tile, neighbor: &Tile, dir: Dir) -> EdgeState {
    let d = dir.offset();

    let blocking = match cell.shape {
        ShapeClass::Empty => true,
        ShapeClass::Full => false,
        _ => cell.sign.dot(d) >= 0 || small_slope_exception(cell, -d),
    };

    match neighbor.shape {
        ShapeClass::Empty => EdgeState::Off,
        ShapeClass::Full => {
            if blocking {
                EdgeState::Solid
            } else {
                EdgeState::Off
            }
        }
        _ => {
            if neighbor_faces_cell(neighbor, d) {
                EdgeState::Interesting
            } else if blocking {
                EdgeState::Solid
            } else {
                EdgeState::Off
            }
        }
    }
}
