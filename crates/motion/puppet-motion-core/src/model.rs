//! The host-model contract.
//!
//! The engine never owns parameter storage; it writes into a [`Model`]
//! supplied by the host each update. Id-to-index resolution belongs to the
//! model — an unresolvable id makes the engine skip that curve for the frame
//! rather than error.

use crate::ids::ParameterId;

/// Addressable buffer of named float parameters plus part opacities.
///
/// The weighted write operations follow fixed blend formulas; `weight`
/// always scales the delta from the current (or identity) value:
/// - set: `current + (value - current) * weight`
/// - add: `current + value * weight`
/// - multiply: `current * (1 + (value - 1) * weight)`
pub trait Model {
    /// Resolve a parameter id to a dense index, or `None` if the model does
    /// not carry that parameter.
    fn parameter_index(&self, id: ParameterId) -> Option<usize>;

    fn parameter_value(&self, index: usize) -> f32;

    fn set_parameter_value(&mut self, index: usize, value: f32);

    /// Resolve a part id to a dense index.
    fn part_index(&self, id: ParameterId) -> Option<usize>;

    fn part_opacity(&self, index: usize) -> f32;

    fn set_part_opacity(&mut self, index: usize, opacity: f32);

    fn set_parameter_weighted(&mut self, index: usize, value: f32, weight: f32) {
        let current = self.parameter_value(index);
        self.set_parameter_value(index, current + (value - current) * weight);
    }

    fn add_parameter_value(&mut self, index: usize, value: f32, weight: f32) {
        let current = self.parameter_value(index);
        self.set_parameter_value(index, current + value * weight);
    }

    fn multiply_parameter_value(&mut self, index: usize, value: f32, weight: f32) {
        let current = self.parameter_value(index);
        self.set_parameter_value(index, current * (1.0 + (value - 1.0) * weight));
    }

    /// Id-addressed conveniences; silently skip unresolved ids.
    fn set_parameter_by_id(&mut self, id: ParameterId, value: f32, weight: f32) {
        if let Some(index) = self.parameter_index(id) {
            self.set_parameter_weighted(index, value, weight);
        }
    }

    fn add_parameter_by_id(&mut self, id: ParameterId, value: f32, weight: f32) {
        if let Some(index) = self.parameter_index(id) {
            self.add_parameter_value(index, value, weight);
        }
    }

    fn multiply_parameter_by_id(&mut self, id: ParameterId, value: f32, weight: f32) {
        if let Some(index) = self.parameter_index(id) {
            self.multiply_parameter_value(index, value, weight);
        }
    }
}
