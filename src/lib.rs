//! Tilebounce - collision core for a tile-grid breakout game
//!
//! A single circular body bounces through a static grid of heterogeneous
//! tiles (full blocks, half blocks, 45°/22.5°/67.5° slopes, quarter-circle
//! arcs). Core modules:
//! - `sim`: deterministic simulation (grid, edge rules, broad/narrow phase,
//!   Verlet body)
//! - `level`: descriptor codec and level sets
//! - `tuning`: data-driven physics parameters
//!
//! Coordinates are screen-style: +x right, +y down. Gravity acts along +y.
//! The simulation is single-threaded and synchronous; one step is
//! "integrate, then scan and resolve".

pub mod level;
pub mod sim;
pub mod tuning;

pub use sim::{Ball, GameEvent, GameState, TileGrid, tick};
pub use tuning::Tuning;

use glam::Vec2;

/// Engine constants
pub mod consts {
    /// Default tile half-extent in world units (tiles are 40x40)
    pub const TILE_HALF: f32 = 20.0;
    /// Default ball radius; must stay below the tile half-extent so the
    /// diagonal broad-phase assumptions hold
    pub const BALL_RADIUS: f32 = 16.0;

    /// Default interior grid dimensions (the demo stages are 8x8)
    pub const GRID_ROWS: usize = 8;
    pub const GRID_COLS: usize = 8;
}

/// Right-hand perpendicular of a vector: rotates 90° clockwise in
/// screen coordinates
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Project `v` onto `onto`, returning zero when `onto` has zero length
#[inline]
pub fn project_onto_safe(v: Vec2, onto: Vec2) -> Vec2 {
    let den = onto.length_squared();
    if den == 0.0 { Vec2::ZERO } else { onto * (v.dot(onto) / den) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perp_is_right_hand_normal() {
        let v = Vec2::new(3.0, 4.0);
        let p = perp(v);
        assert_eq!(p, Vec2::new(-4.0, 3.0));
        assert!(v.dot(p).abs() < f32::EPSILON);
    }

    #[test]
    fn test_project_onto_safe_zero_axis() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(project_onto_safe(v, Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_project_onto_safe_matches_dot() {
        let v = Vec2::new(3.0, 1.0);
        let axis = Vec2::new(2.0, 0.0);
        assert_eq!(project_onto_safe(v, axis), Vec2::new(3.0, 0.0));
    }
}
