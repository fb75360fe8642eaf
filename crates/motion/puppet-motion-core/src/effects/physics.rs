//! The physics contract.
//!
//! Spring and pendulum simulation is supplied by the host; this crate only
//! defines the per-frame evaluation seam and the environment settings it is
//! configured with.

use serde::{Deserialize, Serialize};

use crate::model::Model;

/// Environment configuration handed to a physics implementation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsSettings {
    pub gravity: [f32; 2],
    pub wind: [f32; 2],
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        PhysicsSettings {
            gravity: [0.0, -1.0],
            wind: [0.0, 0.0],
        }
    }
}

/// A secondary layer that mutates model parameters once per frame, after
/// primary motion blending.
pub trait PhysicsEffect {
    fn evaluate(&mut self, model: &mut dyn Model, delta_seconds: f32);
}
