//! Headless demo driver
//!
//! Loads the bundled demo stages into a playfield and steps the
//! simulation until each stage is cleared, the ball drops out, or a step
//! budget runs dry. All observable output goes through the logger; run
//! with `RUST_LOG=debug` to watch tiles clear.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use tilebounce::consts::{BALL_RADIUS, GRID_COLS, GRID_ROWS, TILE_HALF};
use tilebounce::level::DEMO_STAGES;
use tilebounce::sim::{Ball, GameEvent, GameState, tick};
use tilebounce::Tuning;

const MAX_STEPS_PER_STAGE: u64 = 200_000;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xB0B5);
    let mut rng = Pcg32::seed_from_u64(seed);
    log::info!("tilebounce demo starting with seed {seed}");

    let tuning = Tuning::default();
    tuning.validate().expect("default tuning is in range");

    let ball = Ball::new(Vec2::new(73.5, 91.5), BALL_RADIUS);
    let mut state = GameState::new(GRID_ROWS, GRID_COLS, TILE_HALF, TILE_HALF, ball, tuning);

    // stage 0 is the empty warm-up board; start from the first real stage
    for (stage_no, descriptor) in DEMO_STAGES.iter().enumerate().skip(1) {
        state
            .load_level(descriptor, &mut rng)
            .expect("bundled stages are valid");
        state.reset_ball(Vec2::new(73.5, 91.5), Vec2::new(1.6, 2.1));
        log::info!(
            "stage {stage_no}: {} breakable tiles",
            state.grid.remaining_breakable()
        );

        let mut steps: u64 = 0;
        loop {
            steps += 1;
            if let Some(GameEvent::BallLost) = tick(&mut state) {
                log::info!("stage {stage_no}: ball lost after {steps} steps");
                break;
            }
            if state.cleared() {
                log::info!("stage {stage_no}: cleared in {steps} steps");
                break;
            }
            if steps >= MAX_STEPS_PER_STAGE {
                log::warn!(
                    "stage {stage_no}: step budget exhausted with {} tiles left",
                    state.grid.remaining_breakable()
                );
                break;
            }
        }
    }
}
