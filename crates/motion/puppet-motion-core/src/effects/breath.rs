//! Sinusoidal breathing offsets layered onto parameters each frame.

use serde::{Deserialize, Serialize};

use crate::ids::ParameterId;
use crate::model::Model;

/// One breathing channel: `offset + peak * sin(2π * t / cycle)` added into
/// the parameter with `weight`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreathParameter {
    pub id: ParameterId,
    pub offset: f32,
    pub peak: f32,
    /// Period of one breath in seconds.
    pub cycle: f32,
    pub weight: f32,
}

/// Accumulates time and applies every configured channel additively.
#[derive(Clone, Debug, Default)]
pub struct Breath {
    parameters: Vec<BreathParameter>,
    current_time: f32,
}

impl Breath {
    pub fn new(parameters: Vec<BreathParameter>) -> Self {
        Breath {
            parameters,
            current_time: 0.0,
        }
    }

    pub fn parameters(&self) -> &[BreathParameter] {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: Vec<BreathParameter>) {
        self.parameters = parameters;
    }

    pub fn update(&mut self, model: &mut dyn Model, delta_seconds: f32) {
        self.current_time += delta_seconds.max(0.0);
        let phase_base = self.current_time * 2.0 * std::f32::consts::PI;

        for parameter in &self.parameters {
            let value = parameter.offset + parameter.peak * (phase_base / parameter.cycle).sin();
            model.add_parameter_by_id(parameter.id, value, parameter.weight);
        }
    }
}
