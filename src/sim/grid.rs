//! Padded tile grid
//!
//! The grid is logically `rows x cols` of playable tiles surrounded by one
//! ring of permanently full, unbreakable border cells. Storage is a flat
//! column-major array addressed by `(i = column, j = row)` over the padded
//! dimensions; neighbor links are bounds-checked index lookups that are
//! absent across the outer boundary. External callers address interior
//! cells only; the border offset is applied transparently.

use glam::Vec2;
use log::debug;
use rand::Rng;
use thiserror::Error;

use super::edge::{classify_edge, Dir, EdgeState};
use super::tile::{Tile, TileColor, TileId};
use crate::level::{self, LevelError};

/// Index of a cell in the padded grid (`i` = column, `j` = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellIdx {
    pub i: usize,
    pub j: usize,
}

/// Structural grid errors; geometric edge cases never surface here
#[derive(Debug, Error)]
pub enum GridError {
    #[error("point ({x}, {y}) lies outside the padded grid")]
    PointOutOfBounds { x: f32, y: f32 },
    #[error("interior cell index ({i}, {j}) is out of range")]
    IndexOutOfBounds { i: usize, j: usize },
}

pub struct TileGrid {
    rows: usize,
    cols: usize,
    full_rows: usize,
    full_cols: usize,
    /// Tile half extents; every cell shares the same geometry
    half: Vec2,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Allocate and link a `(rows+2) x (cols+2)` grid and force-set the
    /// outer ring to full, unbreakable tiles.
    pub fn build(rows: usize, cols: usize, half_w: f32, half_h: f32) -> Self {
        let full_rows = rows + 2;
        let full_cols = cols + 2;
        let half = Vec2::new(half_w, half_h);
        let (tw, th) = (half_w * 2.0, half_h * 2.0);

        let mut tiles = Vec::with_capacity(full_cols * full_rows);
        for i in 0..full_cols {
            for j in 0..full_rows {
                let center = Vec2::new(half_w + i as f32 * tw, half_h + j as f32 * th);
                tiles.push(Tile::new(center, half));
            }
        }

        let mut grid = Self { rows, cols, full_rows, full_cols, half, tiles };

        for i in 0..full_cols {
            for j in 0..full_rows {
                if i == 0 || j == 0 || i == full_cols - 1 || j == full_rows - 1 {
                    let c = CellIdx { i, j };
                    let slot = grid.slot(c);
                    grid.tiles[slot].classify(TileId::Full);
                    grid.tiles[slot].breakable = false;
                }
            }
        }
        // one full pass settles every edge state after the border fill
        for i in 0..full_cols {
            for j in 0..full_rows {
                grid.refresh_edges(CellIdx { i, j });
            }
        }
        grid
    }

    #[inline]
    fn slot(&self, c: CellIdx) -> usize {
        c.i * self.full_rows + c.j
    }

    /// Interior row count
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Interior column count
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Tile half extents
    pub fn tile_half(&self) -> Vec2 {
        self.half
    }

    /// World height of the padded grid
    pub fn pixel_height(&self) -> f32 {
        self.full_rows as f32 * self.half.y * 2.0
    }

    /// World width of the padded grid
    pub fn pixel_width(&self) -> f32 {
        self.full_cols as f32 * self.half.x * 2.0
    }

    /// Lower world bound past which the body counts as fallen out (half a
    /// tile above the padded grid's bottom edge, i.e. the bottom border
    /// row's center line)
    pub fn fall_out_y(&self) -> f32 {
        self.pixel_height() - self.half.y
    }

    #[inline]
    pub fn tile(&self, c: CellIdx) -> &Tile {
        &self.tiles[self.slot(c)]
    }

    /// Neighbor index in `dir`, absent across the outer boundary
    pub fn neighbor(&self, c: CellIdx, dir: Dir) -> Option<CellIdx> {
        let d = dir.offset();
        let i = c.i.checked_add_signed(d.x as isize)?;
        let j = c.j.checked_add_signed(d.y as isize)?;
        (i < self.full_cols && j < self.full_rows).then_some(CellIdx { i, j })
    }

    /// Map a world point to its containing padded cell
    pub fn locate(&self, p: Vec2) -> Result<CellIdx, GridError> {
        let (tw, th) = (self.half.x * 2.0, self.half.y * 2.0);
        if p.x < 0.0 || p.y < 0.0 {
            return Err(GridError::PointOutOfBounds { x: p.x, y: p.y });
        }
        let i = (p.x / tw) as usize;
        let j = (p.y / th) as usize;
        if i >= self.full_cols || j >= self.full_rows {
            return Err(GridError::PointOutOfBounds { x: p.x, y: p.y });
        }
        Ok(CellIdx { i, j })
    }

    /// Locate with explicit clamping to the padded grid. Used by the
    /// collision scan: a body pressed past the solid border snaps to the
    /// nearest border cell and resolves back inward instead of indexing
    /// out of bounds.
    pub fn locate_clamped(&self, p: Vec2) -> CellIdx {
        let (tw, th) = (self.half.x * 2.0, self.half.y * 2.0);
        let i = (p.x.max(0.0) / tw) as usize;
        let j = (p.y.max(0.0) / th) as usize;
        CellIdx {
            i: i.min(self.full_cols - 1),
            j: j.min(self.full_rows - 1),
        }
    }

    /// Recompute the four edge states of one cell from its current
    /// neighbors. Edges on the outer boundary stay off.
    fn refresh_edges(&mut self, c: CellIdx) {
        let own = *self.tile(c);
        for dir in Dir::ALL {
            let state = match self.neighbor(c, dir) {
                Some(n) => classify_edge(&own, self.tile(n), dir),
                None => EdgeState::Off,
            };
            let slot = self.slot(c);
            self.tiles[slot].edges.set(dir, state);
        }
    }

    /// Set a padded cell's shape and propagate: reclassify, roll hit
    /// points and color from `rng` for non-empty shapes, then recompute
    /// this cell's and all four neighbors' edges.
    pub(crate) fn set_state<R: Rng + ?Sized>(&mut self, c: CellIdx, id: TileId, rng: &mut R) {
        if id == TileId::Empty {
            self.clear(c);
            return;
        }
        let slot = self.slot(c);
        let (hp, color) = roll_strength(rng);
        self.tiles[slot].hp = hp;
        self.tiles[slot].color = color;
        self.tiles[slot].classify(id);
        self.refresh_edges(c);
        self.broadcast_to_neighbors(c);
    }

    /// Reset a padded cell to empty and propagate edge updates
    pub(crate) fn clear(&mut self, c: CellIdx) {
        let slot = self.slot(c);
        self.tiles[slot].classify(TileId::Empty);
        self.refresh_edges(c);
        self.broadcast_to_neighbors(c);
        debug!("cleared tile ({}, {})", c.i, c.j);
    }

    fn broadcast_to_neighbors(&mut self, c: CellIdx) {
        for dir in Dir::ALL {
            if let Some(n) = self.neighbor(c, dir) {
                self.refresh_edges(n);
            }
        }
    }

    /// Apply one hit of damage: breakable tiles lose a hit point and
    /// clear at zero; unbreakable tiles are unaffected.
    pub(crate) fn damage(&mut self, c: CellIdx) {
        let slot = self.slot(c);
        let tile = self.tiles[slot];
        if !tile.breakable || tile.is_empty() {
            return;
        }
        if tile.hp > 1 {
            self.tiles[slot].hp -= 1;
        } else {
            self.clear(c);
        }
    }

    fn interior(&self, i: usize, j: usize) -> Result<CellIdx, GridError> {
        if i >= self.cols || j >= self.rows {
            return Err(GridError::IndexOutOfBounds { i, j });
        }
        Ok(CellIdx { i: i + 1, j: j + 1 })
    }

    /// Shape id of the interior cell `(i = column, j = row)`
    pub fn tile_state(&self, i: usize, j: usize) -> Result<TileId, GridError> {
        Ok(self.tile(self.interior(i, j)?).id)
    }

    /// Set a single interior cell's shape
    pub fn set_tile_state<R: Rng + ?Sized>(
        &mut self,
        i: usize,
        j: usize,
        id: TileId,
        rng: &mut R,
    ) -> Result<(), GridError> {
        let c = self.interior(i, j)?;
        self.set_state(c, id, rng);
        Ok(())
    }

    /// Override the breakable flag of an interior cell (supplied by the
    /// embedding layer at load time)
    pub fn set_breakable(&mut self, i: usize, j: usize, flag: bool) -> Result<(), GridError> {
        let c = self.interior(i, j)?;
        let slot = self.slot(c);
        self.tiles[slot].breakable = flag;
        Ok(())
    }

    /// Bulk-set every interior cell from a level descriptor. The
    /// descriptor is validated in full before any cell mutates.
    pub fn load_state<R: Rng + ?Sized>(
        &mut self,
        descriptor: &str,
        rng: &mut R,
    ) -> Result<(), LevelError> {
        let ids = level::parse_descriptor(descriptor, self.rows, self.cols)?;
        for i in 0..self.cols {
            for j in 0..self.rows {
                let c = CellIdx { i: i + 1, j: j + 1 };
                self.set_state(c, ids[i * self.rows + j], rng);
            }
        }
        debug!("loaded {}x{} level state", self.rows, self.cols);
        Ok(())
    }

    /// Encode every interior cell back to a descriptor string, in the
    /// same traversal order `load_state` consumes
    pub fn save_state(&self) -> String {
        let mut out = String::with_capacity(self.rows * self.cols);
        for i in 0..self.cols {
            for j in 0..self.rows {
                out.push(level::encode_code(self.tile(CellIdx { i: i + 1, j: j + 1 }).id));
            }
        }
        out
    }

    /// Iterate interior cells as `(column, row, tile)`
    pub fn interior_tiles(&self) -> impl Iterator<Item = (usize, usize, &Tile)> {
        (0..self.cols).flat_map(move |i| {
            (0..self.rows).map(move |j| (i, j, self.tile(CellIdx { i: i + 1, j: j + 1 })))
        })
    }

    /// Number of breakable, non-empty interior tiles still standing
    pub fn remaining_breakable(&self) -> usize {
        self.interior_tiles()
            .filter(|(_, _, t)| t.breakable && !t.is_empty())
            .count()
    }
}

/// Hit points and color class rolled for a freshly set tile:
/// 2 HP in 6/12 cases, 4 HP in 4/12, 8 HP in 2/12
fn roll_strength<R: Rng + ?Sized>(rng: &mut R) -> (u8, TileColor) {
    match rng.random_range(0..12u8) {
        10.. => (8, TileColor::Cobalt),
        6.. => (4, TileColor::Crimson),
        _ => (2, TileColor::Gold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_border_is_full_and_unbreakable() {
        let grid = TileGrid::build(8, 8, 20.0, 20.0);
        for i in 0..10 {
            for j in 0..10 {
                let border = i == 0 || j == 0 || i == 9 || j == 9;
                let t = grid.tile(CellIdx { i, j });
                if border {
                    assert_eq!(t.id, TileId::Full);
                    assert!(!t.breakable);
                } else {
                    assert_eq!(t.id, TileId::Empty);
                }
            }
        }
    }

    #[test]
    fn test_border_never_loses_hit_points() {
        let mut grid = TileGrid::build(4, 4, 20.0, 20.0);
        let c = CellIdx { i: 0, j: 2 };
        let before = *grid.tile(c);
        grid.damage(c);
        assert_eq!(grid.tile(c).id, before.id);
        assert_eq!(grid.tile(c).hp, before.hp);
    }

    #[test]
    fn test_locate_maps_centers() {
        let grid = TileGrid::build(8, 8, 20.0, 20.0);
        let c = grid.locate(Vec2::new(100.0, 60.0)).unwrap();
        assert_eq!(c, CellIdx { i: 2, j: 1 });
        assert_eq!(grid.tile(c).center, Vec2::new(100.0, 60.0));
    }

    #[test]
    fn test_locate_out_of_range_is_error() {
        let grid = TileGrid::build(8, 8, 20.0, 20.0);
        assert!(grid.locate(Vec2::new(-1.0, 50.0)).is_err());
        assert!(grid.locate(Vec2::new(50.0, 400.0)).is_err());
        // clamped variant snaps to the nearest border cell
        assert_eq!(grid.locate_clamped(Vec2::new(-1.0, 50.0)), CellIdx { i: 0, j: 1 });
        assert_eq!(
            grid.locate_clamped(Vec2::new(50.0, 1e6)),
            CellIdx { i: 1, j: 9 }
        );
    }

    #[test]
    fn test_neighbor_links_stop_at_boundary() {
        let grid = TileGrid::build(8, 8, 20.0, 20.0);
        let corner = CellIdx { i: 0, j: 0 };
        assert_eq!(grid.neighbor(corner, Dir::Up), None);
        assert_eq!(grid.neighbor(corner, Dir::Left), None);
        assert_eq!(grid.neighbor(corner, Dir::Down), Some(CellIdx { i: 0, j: 1 }));
        assert_eq!(grid.neighbor(corner, Dir::Right), Some(CellIdx { i: 1, j: 0 }));
    }

    #[test]
    fn test_set_state_cascades_edges_to_neighbors() {
        let mut grid = TileGrid::build(8, 8, 20.0, 20.0);
        let mut rng = rng();
        grid.set_tile_state(3, 3, TileId::Full, &mut rng).unwrap();
        // the empty cell above now sees a solid edge below
        let above = CellIdx { i: 4, j: 3 };
        assert_eq!(grid.tile(above).edges.down, EdgeState::Solid);
        // clearing the tile turns the edge back off
        grid.set_tile_state(3, 3, TileId::Empty, &mut rng).unwrap();
        assert_eq!(grid.tile(above).edges.down, EdgeState::Off);
    }

    #[test]
    fn test_damage_decrements_then_clears() {
        let mut grid = TileGrid::build(8, 8, 20.0, 20.0);
        let mut rng = rng();
        grid.set_tile_state(2, 2, TileId::Full, &mut rng).unwrap();
        let c = CellIdx { i: 3, j: 3 };
        let hp = grid.tile(c).hp;
        assert!(hp >= 2);
        for _ in 0..hp - 1 {
            grid.damage(c);
        }
        assert_eq!(grid.tile(c).hp, 1);
        grid.damage(c);
        assert_eq!(grid.tile(c).id, TileId::Empty);
    }

    #[test]
    fn test_fall_out_bound() {
        let grid = TileGrid::build(8, 8, 20.0, 20.0);
        // 10 padded rows of 40 world units, minus half a tile
        assert_eq!(grid.fall_out_y(), 380.0);
    }

    #[test]
    fn test_interior_indexing_is_offset() {
        let mut grid = TileGrid::build(8, 8, 20.0, 20.0);
        let mut rng = rng();
        grid.set_tile_state(0, 0, TileId::Slope45Pn, &mut rng).unwrap();
        assert_eq!(grid.tile(CellIdx { i: 1, j: 1 }).id, TileId::Slope45Pn);
        assert_eq!(grid.tile_state(0, 0).unwrap(), TileId::Slope45Pn);
        assert!(grid.tile_state(8, 0).is_err());
    }

    #[test]
    fn test_non_square_descriptor_round_trip() {
        // column-major order with the interior row count as stride; encode
        // and decode must agree even when rows != cols
        let mut grid = TileGrid::build(3, 5, 20.0, 20.0);
        let mut rng = rng();
        let descriptor = "0123456789ABCDE";
        grid.load_state(descriptor, &mut rng).unwrap();
        assert_eq!(grid.save_state(), descriptor);
        // index 3 = column 1, row 0
        assert_eq!(grid.tile_state(1, 0).unwrap(), TileId::Slope45Nn);
    }

    #[test]
    fn test_short_descriptor_fails_before_mutation() {
        let mut grid = TileGrid::build(8, 8, 20.0, 20.0);
        let mut rng = rng();
        grid.set_tile_state(4, 4, TileId::Full, &mut rng).unwrap();
        let before = grid.save_state();
        assert!(grid.load_state("0123", &mut rng).is_err());
        assert_eq!(grid.save_state(), before);
    }

    #[test]
    fn test_roll_strength_distribution_shape() {
        let mut rng = rng();
        for _ in 0..100 {
            let (hp, color) = roll_strength(&mut rng);
            match color {
                TileColor::Gold => assert_eq!(hp, 2),
                TileColor::Crimson => assert_eq!(hp, 4),
                TileColor::Cobalt => assert_eq!(hp, 8),
            }
        }
    }
}
