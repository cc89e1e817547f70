//! Physics parameters
//!
//! Data-driven balance for the simulation core. Defaults give the classic
//! arcade feel: no gravity, near-zero drag, full bounce, no friction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Uniform physics parameters applied to the single dynamic body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration per step (world units)
    pub gravity: f32,
    /// Velocity retained per step; 1 is frictionless flight, 0 stops dead
    pub drag: f32,
    /// Restitution of the normal velocity component on impact, in [0, 1].
    /// 1 is a perfectly elastic bounce (prone to energy creep with Verlet,
    /// so treat 0.9 as the practical ceiling).
    pub bounce: f32,
    /// Fraction of the tangential velocity component removed on impact
    pub friction: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.0,
            drag: 0.999999,
            bounce: 1.0,
            friction: 0.0,
        }
    }
}

impl Tuning {
    /// Range-check every parameter
    pub fn validate(&self) -> Result<(), TuningError> {
        let ranges = [
            ("gravity", self.gravity, 0.0, 1.0),
            ("drag", self.drag, 0.0, 1.0),
            ("bounce", self.bounce, 0.0, 1.0),
            ("friction", self.friction, 0.0, 1.0),
        ];
        for (name, value, min, max) in ranges {
            if !(min..=max).contains(&value) {
                return Err(TuningError::OutOfRange { name, value, min, max });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let t = Tuning {
            bounce: 1.5,
            ..Tuning::default()
        };
        assert!(t.validate().is_err());
        let t = Tuning {
            gravity: -0.1,
            ..Tuning::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let t: Tuning = serde_json::from_str(r#"{"gravity": 0.3}"#).unwrap();
        assert_eq!(t.gravity, 0.3);
        assert_eq!(t.bounce, Tuning::default().bounce);
    }
}
