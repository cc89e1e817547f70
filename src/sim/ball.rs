//! The dynamic body: a circle integrated with Verlet position updates
//!
//! Velocity is implicit in the difference between `pos` and `old_pos`;
//! impulses are injected by shifting `old_pos`, which is the Verlet idiom
//! for altering velocity without a separate velocity field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Position one step ago; never aliases `pos` conceptually — resetting
    /// both to the same point means zero velocity
    pub old_pos: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            old_pos: pos,
            radius: radius.abs(),
        }
    }

    /// Implicit velocity in world units per step
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.pos - self.old_pos
    }

    /// Re-seed position and implicit velocity (stage transitions)
    pub fn reset(&mut self, pos: Vec2, velocity: Vec2) {
        self.old_pos = pos;
        self.pos = pos + velocity;
    }

    /// Verlet step: advance by the dragged implicit velocity plus gravity
    pub fn integrate(&mut self, tuning: &Tuning) {
        let vel = self.pos - self.old_pos;
        self.old_pos = self.pos;
        self.pos += vel * tuning.drag + Vec2::new(0.0, tuning.gravity);
    }

    /// Collision response: translate out of penetration by `push` and,
    /// when the body is moving into the surface, reflect the normal
    /// velocity component (bounce) and damp the tangential component
    /// (friction) by shifting `old_pos`.
    pub fn report_collision(&mut self, push: Vec2, normal: Vec2, tuning: &Tuning) {
        let vel = self.pos - self.old_pos;
        let dp = vel.dot(normal);
        let vel_n = normal * dp;
        let vel_t = vel - vel_n;

        let impulse = if dp < 0.0 {
            vel_n * (1.0 + tuning.bounce) + vel_t * tuning.friction
        } else {
            // moving out of the collision already; no response forces
            Vec2::ZERO
        };

        self.pos += push;
        self.old_pos += push + impulse;
    }
}
