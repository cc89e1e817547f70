//! Aggregate simulation state
//!
//! Everything one playfield needs: the padded tile grid, the single
//! dynamic body, and the physics parameters. The embedding layer drives
//! it with [`super::tick::tick`], observes cleared tiles by polling grid
//! state, and reacts to the lifecycle event when the body drops out.

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::grid::TileGrid;
use crate::level::LevelError;
use crate::tuning::Tuning;

/// Lifecycle events crossing the simulation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The body left the playfield past the lower world bound
    BallLost,
}

pub struct GameState {
    pub grid: TileGrid,
    pub ball: Ball,
    pub tuning: Tuning,
}

impl GameState {
    /// Fresh playfield with an empty interior
    pub fn new(
        rows: usize,
        cols: usize,
        half_w: f32,
        half_h: f32,
        ball: Ball,
        tuning: Tuning,
    ) -> Self {
        Self {
            grid: TileGrid::build(rows, cols, half_w, half_h),
            ball,
            tuning,
        }
    }

    /// Replace the interior with a level descriptor. Hit points and color
    /// classes are rolled from the caller's RNG so replays are exact.
    pub fn load_level<R: Rng + ?Sized>(
        &mut self,
        descriptor: &str,
        rng: &mut R,
    ) -> Result<(), LevelError> {
        self.grid.load_state(descriptor, rng)
    }

    /// Re-seed the body for a stage start
    pub fn reset_ball(&mut self, pos: Vec2, velocity: Vec2) {
        self.ball.reset(pos, velocity);
    }

    /// True once every breakable tile is gone
    pub fn cleared(&self) -> bool {
        self.grid.remaining_breakable() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DEMO_STAGES;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(
            8,
            8,
            20.0,
            20.0,
            Ball::new(Vec2::new(73.5, 91.5), 16.0),
            Tuning::default(),
        )
    }

    #[test]
    fn test_new_state_is_cleared() {
        assert!(state().cleared());
    }

    #[test]
    fn test_load_level_populates_interior() {
        let mut s = state();
        let mut rng = Pcg32::seed_from_u64(1);
        s.load_level(DEMO_STAGES[1], &mut rng).unwrap();
        assert!(!s.cleared());
        assert!(s.grid.remaining_breakable() > 0);
    }

    #[test]
    fn test_load_level_round_trips() {
        let mut s = state();
        let mut rng = Pcg32::seed_from_u64(1);
        s.load_level(DEMO_STAGES[2], &mut rng).unwrap();
        assert_eq!(s.grid.save_state(), DEMO_STAGES[2]);
    }

    #[test]
    fn test_bad_level_leaves_grid_untouched() {
        let mut s = state();
        let mut rng = Pcg32::seed_from_u64(1);
        s.load_level(DEMO_STAGES[1], &mut rng).unwrap();
        let before = s.grid.save_state();
        assert!(s.load_level("too short", &mut rng).is_err());
        assert_eq!(s.grid.save_state(), before);
    }
}
