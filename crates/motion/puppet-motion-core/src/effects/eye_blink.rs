//! Automatic eye blinking.
//!
//! A small state machine cycles open → closing → closed → opening → open,
//! with a randomized pause between blinks, and writes the eyelid openness
//! (1 open, 0 closed) to every registered parameter.

use rand::Rng;

use crate::ids::ParameterId;
use crate::model::Model;

const DEFAULT_BLINK_INTERVAL_SECONDS: f32 = 4.0;
const DEFAULT_CLOSING_SECONDS: f32 = 0.1;
const DEFAULT_CLOSED_SECONDS: f32 = 0.05;
const DEFAULT_OPENING_SECONDS: f32 = 0.15;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum EyeState {
    /// Before the first update.
    First,
    /// Eyes open, waiting for the next blink time.
    Interval,
    Closing,
    Closed,
    Opening,
}

pub struct EyeBlink {
    parameter_ids: Vec<ParameterId>,
    state: EyeState,
    blink_interval_seconds: f32,
    closing_seconds: f32,
    closed_seconds: f32,
    opening_seconds: f32,
    user_time: f32,
    next_blink_time: f32,
    state_start_time: f32,
}

impl EyeBlink {
    pub fn new(parameter_ids: Vec<ParameterId>) -> Self {
        EyeBlink {
            parameter_ids,
            state: EyeState::First,
            blink_interval_seconds: DEFAULT_BLINK_INTERVAL_SECONDS,
            closing_seconds: DEFAULT_CLOSING_SECONDS,
            closed_seconds: DEFAULT_CLOSED_SECONDS,
            opening_seconds: DEFAULT_OPENING_SECONDS,
            user_time: 0.0,
            next_blink_time: 0.0,
            state_start_time: 0.0,
        }
    }

    pub fn set_blink_interval(&mut self, seconds: f32) {
        self.blink_interval_seconds = seconds;
    }

    /// Durations of the closing, closed, and opening phases.
    pub fn set_blink_timing(&mut self, closing: f32, closed: f32, opening: f32) {
        self.closing_seconds = closing;
        self.closed_seconds = closed;
        self.opening_seconds = opening;
    }

    pub fn set_parameter_ids(&mut self, parameter_ids: Vec<ParameterId>) {
        self.parameter_ids = parameter_ids;
    }

    pub fn parameter_ids(&self) -> &[ParameterId] {
        &self.parameter_ids
    }

    /// Jittered delay until the next blink, in `[now, now + 2·interval − 1)`.
    fn determine_next_blink_time(&self) -> f32 {
        let r: f32 = rand::rng().random();
        self.user_time + r * (2.0 * self.blink_interval_seconds - 1.0)
    }

    pub fn update(&mut self, model: &mut dyn Model, delta_seconds: f32) {
        self.user_time += delta_seconds.max(0.0);

        let openness = match self.state {
            EyeState::First => {
                self.state = EyeState::Interval;
                self.next_blink_time = self.determine_next_blink_time();
                1.0
            }
            EyeState::Interval => {
                if self.next_blink_time < self.user_time {
                    self.state = EyeState::Closing;
                    self.state_start_time = self.user_time;
                }
                1.0
            }
            EyeState::Closing => {
                let mut t = (self.user_time - self.state_start_time) / self.closing_seconds;
                if t >= 1.0 {
                    t = 1.0;
                    self.state = EyeState::Closed;
                    self.state_start_time = self.user_time;
                }
                1.0 - t
            }
            EyeState::Closed => {
                let t = (self.user_time - self.state_start_time) / self.closed_seconds;
                if t >= 1.0 {
                    self.state = EyeState::Opening;
                    self.state_start_time = self.user_time;
                }
                0.0
            }
            EyeState::Opening => {
                let mut t = (self.user_time - self.state_start_time) / self.opening_seconds;
                if t >= 1.0 {
                    t = 1.0;
                    self.state = EyeState::Interval;
                    self.next_blink_time = self.determine_next_blink_time();
                }
                t
            }
        };

        for id in &self.parameter_ids {
            model.set_parameter_by_id(*id, openness, 1.0);
        }
    }
}
