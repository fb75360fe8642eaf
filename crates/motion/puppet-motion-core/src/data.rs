//! Canonical keyframe-motion data model.
//!
//! One [`MotionData`] is the parsed, immutable representation of a motion
//! asset: curves in target-group order, with their segments and keyframe
//! points held in flat pools indexed by the curves. Curves are grouped by
//! target — all Model curves first, then Parameter, then PartOpacity — and
//! evaluation relies on that ordering, so [`MotionData::validate`] enforces
//! it at load time.

use serde::{Deserialize, Serialize};

use crate::ids::ParameterId;
use crate::motion_json::MotionParseError;

/// A single keyframe: time in seconds, value in parameter units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionPoint {
    pub time: f32,
    pub value: f32,
}

/// Interpolation kind of one segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SegmentType {
    Linear,
    Bezier,
    Stepped,
    InverseStepped,
}

impl SegmentType {
    /// Points consumed past the segment's base point: a bezier spans four
    /// points, everything else spans two.
    #[inline]
    pub fn point_span(self) -> usize {
        match self {
            SegmentType::Bezier => 3,
            _ => 1,
        }
    }
}

/// One time-contiguous piece of a curve, referencing the shared point pool.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct MotionSegment {
    pub segment_type: SegmentType,
    pub base_point_index: usize,
}

/// What a curve drives on the model.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CurveTarget {
    /// Reserved whole-model effect channels ("EyeBlink", "LipSync").
    Model,
    Parameter,
    PartOpacity,
}

/// A per-target animation timeline.
///
/// `fade_in_time`/`fade_out_time` of `None` inherit the motion-level fade;
/// `Some(secs)` gives the curve its own independent fade window.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionCurve {
    pub target: CurveTarget,
    pub id: ParameterId,
    pub base_segment_index: usize,
    pub segment_count: usize,
    pub fade_in_time: Option<f32>,
    pub fade_out_time: Option<f32>,
}

/// A named event fired once when playback crosses `fire_time`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionEvent {
    pub fire_time: f32,
    pub value: String,
}

/// Parsed, immutable representation of one motion asset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionData {
    /// Length of one cycle in seconds.
    pub duration: f32,
    /// Whether the asset was authored as looping.
    pub looped: bool,
    /// Source frame rate (informational).
    pub fps: f32,
    pub curves: Vec<MotionCurve>,
    pub segments: Vec<MotionSegment>,
    pub points: Vec<MotionPoint>,
    pub events: Vec<MotionEvent>,
}

impl MotionData {
    /// Check the invariants evaluation relies on: positive duration,
    /// target-group ordering, segment/point pool accounting, and
    /// non-decreasing point times within each curve.
    pub fn validate(&self) -> Result<(), MotionParseError> {
        if !(self.duration > 0.0) {
            return Err(MotionParseError::InvalidDuration(self.duration));
        }
        let mut last_target = CurveTarget::Model;
        for (index, curve) in self.curves.iter().enumerate() {
            if curve.target < last_target {
                return Err(MotionParseError::CurveOrder(index));
            }
            last_target = curve.target;

            let end = curve.base_segment_index + curve.segment_count;
            if curve.segment_count == 0 || end > self.segments.len() {
                return Err(MotionParseError::TruncatedSegments(index));
            }
            let mut last_time = f32::NEG_INFINITY;
            for segment in &self.segments[curve.base_segment_index..end] {
                let span = segment.segment_type.point_span();
                let last_point = segment.base_point_index + span;
                if last_point >= self.points.len() {
                    return Err(MotionParseError::TruncatedSegments(index));
                }
                let start = self.points[segment.base_point_index].time;
                let end_time = self.points[last_point].time;
                if start < last_time || end_time < start {
                    return Err(MotionParseError::NonMonotonicTimes(index));
                }
                last_time = end_time;
            }
        }
        Ok(())
    }

    /// Override the fade-in window of every curve driving `id`.
    pub fn set_parameter_fade_in(&mut self, id: ParameterId, seconds: f32) {
        for curve in &mut self.curves {
            if curve.id == id {
                curve.fade_in_time = Some(seconds);
            }
        }
    }

    /// Override the fade-out window of every curve driving `id`.
    pub fn set_parameter_fade_out(&mut self, id: ParameterId, seconds: f32) {
        for curve in &mut self.curves {
            if curve.id == id {
                curve.fade_out_time = Some(seconds);
            }
        }
    }

    /// The fade-in override of the first curve driving `id`, if any.
    pub fn parameter_fade_in(&self, id: ParameterId) -> Option<f32> {
        self.curves
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.fade_in_time)
    }

    /// The fade-out override of the first curve driving `id`, if any.
    pub fn parameter_fade_out(&self, id: ParameterId) -> Option<f32> {
        self.curves
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.fade_out_time)
    }
}
