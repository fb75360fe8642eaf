//! Playable motions: keyframe timelines and flat expression sets.
//!
//! A [`Motion`] is immutable once wrapped in an `Arc` and handed to the
//! queue; every piece of per-playback state (start time, fade bookkeeping,
//! event cursor) lives on the queue entry, so one motion asset can play in
//! several entries at once without cross-talk.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::{CurveTarget, MotionData, MotionEvent};
use crate::ids::{IdManager, ParameterId};
use crate::math::ease_sine;
use crate::model::Model;
use crate::motion_json::{
    parse_expression_json, parse_motion_json, MotionParseError, ParsedExpression, ParsedMotion,
};
use crate::queue::MotionQueueEntry;
use crate::sampling::evaluate_curve;

/// Reserved model-curve channel driven by the auto eye-blink effect.
pub const EFFECT_ID_EYE_BLINK: &str = "EyeBlink";
/// Reserved model-curve channel driven by lip-sync input.
pub const EFFECT_ID_LIP_SYNC: &str = "LipSync";

/// How one expression parameter combines with the model's current value.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ExpressionBlendType {
    Add,
    Multiply,
    Overwrite,
}

/// One entry of an expression motion's flat parameter set.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionParameter {
    pub id: ParameterId,
    pub blend: ExpressionBlendType,
    pub value: f32,
}

/// The two playable motion variants.
#[derive(Clone, Debug)]
pub enum MotionKind {
    /// Timed keyframe curves over model parameters and part opacities.
    Keyframe(MotionData),
    /// Untimed parameter set applied every frame while the entry lives.
    Expression(Vec<ExpressionParameter>),
}

/// A playable motion asset. Shared across queue entries via [`Arc`].
#[derive(Clone, Debug)]
pub struct Motion {
    kind: MotionKind,
    fade_in_seconds: f32,
    fade_out_seconds: f32,
    weight: f32,
    looped: bool,
    loop_fade_in: bool,
    offset_seconds: f32,
    eye_blink_ids: Vec<ParameterId>,
    lip_sync_ids: Vec<ParameterId>,
    eye_blink_curve_id: ParameterId,
    lip_sync_curve_id: ParameterId,
}

/// Bitmask over effect-target list positions, grown on demand. There is no
/// hard cap on target count; unusually long lists only cost the extra words.
#[derive(Default)]
struct AppliedMask {
    bits: Vec<u64>,
}

impl AppliedMask {
    fn mark(&mut self, index: usize) {
        let word = index / 64;
        if word >= self.bits.len() {
            self.bits.resize(word + 1, 0);
        }
        self.bits[word] |= 1 << (index % 64);
    }

    fn is_marked(&self, index: usize) -> bool {
        self.bits
            .get(index / 64)
            .map_or(false, |w| w & (1 << (index % 64)) != 0)
    }
}

impl Motion {
    /// Wrap parsed keyframe data. Fade and loop settings come from the
    /// asset; weight starts at 1.
    pub fn keyframe(parsed: ParsedMotion, ids: &mut IdManager) -> Self {
        let looped = parsed.data.looped;
        Motion {
            kind: MotionKind::Keyframe(parsed.data),
            fade_in_seconds: parsed.fade_in_seconds,
            fade_out_seconds: parsed.fade_out_seconds,
            weight: 1.0,
            looped,
            loop_fade_in: true,
            offset_seconds: 0.0,
            eye_blink_ids: Vec::new(),
            lip_sync_ids: Vec::new(),
            eye_blink_curve_id: ids.id(EFFECT_ID_EYE_BLINK),
            lip_sync_curve_id: ids.id(EFFECT_ID_LIP_SYNC),
        }
    }

    /// Wrap a parsed expression parameter set.
    pub fn expression(parsed: ParsedExpression, ids: &mut IdManager) -> Self {
        Motion {
            kind: MotionKind::Expression(parsed.parameters),
            fade_in_seconds: parsed.fade_in_seconds,
            fade_out_seconds: parsed.fade_out_seconds,
            weight: 1.0,
            looped: false,
            loop_fade_in: false,
            offset_seconds: 0.0,
            eye_blink_ids: Vec::new(),
            lip_sync_ids: Vec::new(),
            eye_blink_curve_id: ids.id(EFFECT_ID_EYE_BLINK),
            lip_sync_curve_id: ids.id(EFFECT_ID_LIP_SYNC),
        }
    }

    /// Parse and wrap a motion3.json document in one step.
    pub fn from_motion_json(json: &str, ids: &mut IdManager) -> Result<Self, MotionParseError> {
        Ok(Self::keyframe(parse_motion_json(json, ids)?, ids))
    }

    /// Parse and wrap an exp3.json document in one step.
    pub fn from_expression_json(json: &str, ids: &mut IdManager) -> Result<Self, MotionParseError> {
        Ok(Self::expression(parse_expression_json(json, ids)?, ids))
    }

    pub fn kind(&self) -> &MotionKind {
        &self.kind
    }

    pub fn fade_in_seconds(&self) -> f32 {
        self.fade_in_seconds
    }

    pub fn set_fade_in_seconds(&mut self, seconds: f32) {
        self.fade_in_seconds = seconds;
    }

    pub fn fade_out_seconds(&self) -> f32 {
        self.fade_out_seconds
    }

    pub fn set_fade_out_seconds(&mut self, seconds: f32) {
        self.fade_out_seconds = seconds;
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    pub fn set_loop_fade_in(&mut self, enabled: bool) {
        self.loop_fade_in = enabled;
    }

    pub fn set_offset_seconds(&mut self, seconds: f32) {
        self.offset_seconds = seconds;
    }

    /// Register the parameters the automatic eye-blink and lip-sync
    /// overrides fold into during keyframe evaluation.
    pub fn set_effect_ids(&mut self, eye_blink: Vec<ParameterId>, lip_sync: Vec<ParameterId>) {
        if eye_blink.len() > 64 || lip_sync.len() > 64 {
            log::debug!(
                "large effect-target lists ({} eye blink, {} lip sync)",
                eye_blink.len(),
                lip_sync.len()
            );
        }
        self.eye_blink_ids = eye_blink;
        self.lip_sync_ids = lip_sync;
    }

    /// Fade-in override for every curve driving `id` (keyframe motions only).
    pub fn set_parameter_fade_in(&mut self, id: ParameterId, seconds: f32) {
        if let MotionKind::Keyframe(data) = &mut self.kind {
            data.set_parameter_fade_in(id, seconds);
        }
    }

    /// Fade-out override for every curve driving `id` (keyframe motions only).
    pub fn set_parameter_fade_out(&mut self, id: ParameterId, seconds: f32) {
        if let MotionKind::Keyframe(data) = &mut self.kind {
            data.set_parameter_fade_out(id, seconds);
        }
    }

    /// Playback length in seconds, or `None` when indefinite (expressions
    /// and looping keyframe motions).
    pub fn duration(&self) -> Option<f32> {
        match &self.kind {
            MotionKind::Keyframe(data) if !self.looped => Some(data.duration),
            _ => None,
        }
    }

    /// Events whose fire time falls in the half-open local-time interval
    /// `(before, now]`. Expressions carry no events.
    pub fn events_in<'a>(
        &'a self,
        before: f32,
        now: f32,
    ) -> impl Iterator<Item = &'a MotionEvent> + 'a {
        let events: &[MotionEvent] = match &self.kind {
            MotionKind::Keyframe(data) => &data.events,
            MotionKind::Expression(_) => &[],
        };
        events
            .iter()
            .filter(move |e| e.fire_time > before && e.fire_time <= now)
    }

    /// Run one frame of the base-motion contract against a queue entry:
    /// first-update bookkeeping, fade weight, variant dispatch, end check.
    pub fn update_parameters(
        &self,
        model: &mut dyn Model,
        entry: &mut MotionQueueEntry,
        user_time: f32,
    ) {
        if !entry.is_available() || entry.is_finished() {
            return;
        }

        if !entry.is_started() {
            entry.set_started(true);
            entry.set_start_time(user_time - self.offset_seconds);
            entry.set_fade_in_start_time(user_time);
            if entry.end_time().is_none() {
                if let Some(duration) = self.duration() {
                    entry.set_end_time(Some(entry.start_time() + duration));
                }
            }
        }

        let fade_in = if self.fade_in_seconds <= 0.0 {
            1.0
        } else {
            ease_sine((user_time - entry.fade_in_start_time()) / self.fade_in_seconds)
        };
        let fade_out = match entry.end_time() {
            Some(end) if self.fade_out_seconds > 0.0 => {
                ease_sine((end - user_time) / self.fade_out_seconds)
            }
            _ => 1.0,
        };
        let fade_weight = (self.weight * fade_in * fade_out).clamp(0.0, 1.0);
        debug_assert!((0.0..=1.0).contains(&fade_weight));

        match &self.kind {
            MotionKind::Keyframe(data) => {
                self.apply_keyframe(data, model, entry, user_time, fade_in, fade_out, fade_weight);
            }
            MotionKind::Expression(parameters) => {
                apply_expression(parameters, model, fade_weight);
            }
        }

        entry.set_state(user_time, fade_weight);

        if let Some(end) = entry.end_time() {
            if user_time > end {
                entry.set_finished(true);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_keyframe(
        &self,
        data: &MotionData,
        model: &mut dyn Model,
        entry: &mut MotionQueueEntry,
        user_time: f32,
        fade_in: f32,
        fade_out: f32,
        fade_weight: f32,
    ) {
        let elapsed = (user_time - entry.start_time()).max(0.0);
        let mut time = elapsed;
        if self.looped {
            while time > data.duration {
                time -= data.duration;
            }
        }

        let mut eye_blink_value: Option<f32> = None;
        let mut lip_sync_value: Option<f32> = None;
        let mut eye_blink_applied = AppliedMask::default();
        let mut lip_sync_applied = AppliedMask::default();

        // Model curves first (the group order invariant): they only feed the
        // reserved effect channels.
        let mut cursor = 0;
        while cursor < data.curves.len() && data.curves[cursor].target == CurveTarget::Model {
            let curve = &data.curves[cursor];
            let value = evaluate_curve(data, cursor, time);
            if curve.id == self.eye_blink_curve_id {
                eye_blink_value = Some(value);
            } else if curve.id == self.lip_sync_curve_id {
                lip_sync_value = Some(value);
            }
            cursor += 1;
        }

        while cursor < data.curves.len() && data.curves[cursor].target == CurveTarget::Parameter {
            let curve = &data.curves[cursor];
            cursor += 1;

            let Some(parameter_index) = model.parameter_index(curve.id) else {
                continue;
            };
            let source_value = model.parameter_value(parameter_index);
            let mut value = evaluate_curve(data, cursor - 1, time);

            if let Some(eye) = eye_blink_value {
                if let Some(pos) = self.eye_blink_ids.iter().position(|id| *id == curve.id) {
                    value *= eye;
                    eye_blink_applied.mark(pos);
                }
            }
            if let Some(lip) = lip_sync_value {
                if let Some(pos) = self.lip_sync_ids.iter().position(|id| *id == curve.id) {
                    value += lip;
                    lip_sync_applied.mark(pos);
                }
            }

            let blend_weight = if curve.fade_in_time.is_none() && curve.fade_out_time.is_none() {
                fade_weight
            } else {
                // Independent per-curve fade, combined with the motion's
                // static weight instead of the motion-level fade product.
                let fin = match curve.fade_in_time {
                    None => fade_in,
                    Some(fi) if fi <= 0.0 => 1.0,
                    Some(fi) => ease_sine((user_time - entry.fade_in_start_time()) / fi),
                };
                let fout = match (curve.fade_out_time, entry.end_time()) {
                    (None, _) => fade_out,
                    (Some(fo), Some(end)) if fo > 0.0 => ease_sine((end - user_time) / fo),
                    _ => 1.0,
                };
                (self.weight * fin * fout).clamp(0.0, 1.0)
            };

            model.set_parameter_value(
                parameter_index,
                source_value + (value - source_value) * blend_weight,
            );
        }

        // Effect targets without an explicit curve still receive the
        // override, blended by the motion-level fade weight.
        if let Some(eye) = eye_blink_value {
            for (pos, id) in self.eye_blink_ids.iter().enumerate() {
                if !eye_blink_applied.is_marked(pos) {
                    model.set_parameter_by_id(*id, eye, fade_weight);
                }
            }
        }
        if let Some(lip) = lip_sync_value {
            for (pos, id) in self.lip_sync_ids.iter().enumerate() {
                if !lip_sync_applied.is_marked(pos) {
                    model.set_parameter_by_id(*id, lip, fade_weight);
                }
            }
        }

        // Part-opacity curves are authoritative: written unfaded.
        while cursor < data.curves.len() {
            let curve = &data.curves[cursor];
            let value = evaluate_curve(data, cursor, time);
            cursor += 1;
            if let Some(part_index) = model.part_index(curve.id) {
                model.set_part_opacity(part_index, value);
            }
        }

        if elapsed >= data.duration {
            if self.looped {
                // Restart the cycle; fade-in only replays when configured.
                entry.set_start_time(user_time);
                if self.loop_fade_in {
                    entry.set_fade_in_start_time(user_time);
                }
            } else {
                entry.set_finished(true);
            }
        }
    }
}

fn apply_expression(parameters: &[ExpressionParameter], model: &mut dyn Model, fade_weight: f32) {
    for parameter in parameters {
        match parameter.blend {
            ExpressionBlendType::Add => {
                model.add_parameter_by_id(parameter.id, parameter.value, fade_weight)
            }
            ExpressionBlendType::Multiply => {
                model.multiply_parameter_by_id(parameter.id, parameter.value, fade_weight)
            }
            ExpressionBlendType::Overwrite => {
                model.set_parameter_by_id(parameter.id, parameter.value, fade_weight)
            }
        }
    }
}

/// Convenience used throughout the queue and tests.
pub type SharedMotion = Arc<Motion>;
