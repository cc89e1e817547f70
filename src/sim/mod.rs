//! Deterministic simulation module
//!
//! All collision logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed external cadence, no internal clock
//! - Seeded RNG threaded in explicitly
//! - No rendering or platform dependencies

pub mod ball;
pub mod edge;
pub mod grid;
pub mod resolve;
pub mod scan;
pub mod state;
pub mod tick;
pub mod tile;

pub use ball::Ball;
pub use edge::{Dir, EdgeState, Edges, classify_edge};
pub use grid::{CellIdx, GridError, TileGrid};
pub use resolve::{Contact, Resolution, Resolved, resolve_tile};
pub use scan::collide_ball_tilemap;
pub use state::{GameEvent, GameState};
pub use tick::tick;
pub use tile::{ShapeClass, Tile, TileColor, TileId};
