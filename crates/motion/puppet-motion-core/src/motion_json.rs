//! Asset parsing: motion3.json and exp3.json byte streams into core types.
//!
//! The motion format stores each curve's segments as a flat number stream:
//! the first two numbers are the first keyframe (time, value); after that a
//! type tag (0 linear, 1 bezier, 2 stepped, 3 inverse-stepped) is followed by
//! one keyframe for linear/stepped kinds or three for bezier. Keyframes are
//! appended to the shared point pool; consecutive segments share their
//! boundary point.

use serde::Deserialize;
use thiserror::Error;

use crate::data::{
    CurveTarget, MotionCurve, MotionData, MotionEvent, MotionPoint, MotionSegment, SegmentType,
};
use crate::ids::IdManager;
use crate::motion::{ExpressionBlendType, ExpressionParameter};

const TARGET_MODEL: &str = "Model";
const TARGET_PARAMETER: &str = "Parameter";
const TARGET_PART_OPACITY: &str = "PartOpacity";

const BLEND_ADD: &str = "Add";
const BLEND_MULTIPLY: &str = "Multiply";
const BLEND_OVERWRITE: &str = "Overwrite";

/// Motion-level fade defaults to one second when absent or negative.
const DEFAULT_FADE_SECONDS: f32 = 1.0;

#[derive(Debug, Error)]
pub enum MotionParseError {
    #[error("invalid motion json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("motion duration must be positive (got {0})")]
    InvalidDuration(f32),
    #[error("unknown curve target '{0}'")]
    UnknownTarget(String),
    #[error("unknown segment type tag {tag} in curve {curve}")]
    UnknownSegmentType { curve: usize, tag: i32 },
    #[error("curve targets out of group order at curve {0}")]
    CurveOrder(usize),
    #[error("truncated segment stream in curve {0}")]
    TruncatedSegments(usize),
    #[error("non-monotonic keyframe times in curve {0}")]
    NonMonotonicTimes(usize),
}

/// A parsed keyframe motion plus its motion-level fade windows.
#[derive(Clone, Debug)]
pub struct ParsedMotion {
    pub data: MotionData,
    pub fade_in_seconds: f32,
    pub fade_out_seconds: f32,
}

/// A parsed expression: flat parameter list plus fade windows.
#[derive(Clone, Debug)]
pub struct ParsedExpression {
    pub parameters: Vec<ExpressionParameter>,
    pub fade_in_seconds: f32,
    pub fade_out_seconds: f32,
}

/// Parse a motion3.json document.
///
/// Curves are stable-sorted into target-group order (Model, Parameter,
/// PartOpacity) — evaluation relies on that grouping — and the result is
/// validated before being returned.
pub fn parse_motion_json(json: &str, ids: &mut IdManager) -> Result<ParsedMotion, MotionParseError> {
    let raw: RawMotion = serde_json::from_str(json)?;

    let mut points: Vec<MotionPoint> = Vec::new();
    let mut segments: Vec<MotionSegment> = Vec::new();
    let mut curves: Vec<MotionCurve> = Vec::with_capacity(raw.curves.len());

    for (curve_index, raw_curve) in raw.curves.iter().enumerate() {
        let target = match raw_curve.target.as_str() {
            TARGET_MODEL => CurveTarget::Model,
            TARGET_PARAMETER => CurveTarget::Parameter,
            TARGET_PART_OPACITY => CurveTarget::PartOpacity,
            other => return Err(MotionParseError::UnknownTarget(other.to_string())),
        };

        let base_segment_index = segments.len();
        let mut segment_count = 0usize;

        let stream = &raw_curve.segments;
        let mut cursor = 0usize;
        let mut first = true;
        while cursor < stream.len() {
            let base_point_index;
            if first {
                if cursor + 2 > stream.len() {
                    return Err(MotionParseError::TruncatedSegments(curve_index));
                }
                base_point_index = points.len();
                points.push(MotionPoint {
                    time: stream[cursor],
                    value: stream[cursor + 1],
                });
                cursor += 2;
                first = false;
                if cursor >= stream.len() {
                    break;
                }
            } else {
                base_point_index = points.len() - 1;
            }

            let tag = stream[cursor] as i32;
            cursor += 1;
            let (segment_type, consumed_points) = match tag {
                0 => (SegmentType::Linear, 1),
                1 => (SegmentType::Bezier, 3),
                2 => (SegmentType::Stepped, 1),
                3 => (SegmentType::InverseStepped, 1),
                tag => {
                    return Err(MotionParseError::UnknownSegmentType {
                        curve: curve_index,
                        tag,
                    })
                }
            };
            if cursor + consumed_points * 2 > stream.len() {
                return Err(MotionParseError::TruncatedSegments(curve_index));
            }
            for _ in 0..consumed_points {
                points.push(MotionPoint {
                    time: stream[cursor],
                    value: stream[cursor + 1],
                });
                cursor += 2;
            }
            segments.push(MotionSegment {
                segment_type,
                base_point_index,
            });
            segment_count += 1;
        }

        curves.push(MotionCurve {
            target,
            id: ids.id(&raw_curve.id),
            base_segment_index,
            segment_count,
            fade_in_time: raw_curve.fade_in_time,
            fade_out_time: raw_curve.fade_out_time,
        });
    }

    curves.sort_by_key(|c| c.target);

    let events = raw
        .user_data
        .into_iter()
        .map(|e| MotionEvent {
            fire_time: e.time,
            value: e.value,
        })
        .collect();

    let data = MotionData {
        duration: raw.meta.duration,
        looped: raw.meta.looped,
        fps: raw.meta.fps,
        curves,
        segments,
        points,
        events,
    };
    data.validate()?;

    Ok(ParsedMotion {
        data,
        fade_in_seconds: fade_or_default(raw.meta.fade_in_time),
        fade_out_seconds: fade_or_default(raw.meta.fade_out_time),
    })
}

/// Parse an exp3.json document. Unknown blend strings degrade to `Add`.
pub fn parse_expression_json(
    json: &str,
    ids: &mut IdManager,
) -> Result<ParsedExpression, MotionParseError> {
    let raw: RawExpression = serde_json::from_str(json)?;

    let mut parameters = Vec::with_capacity(raw.parameters.len());
    for raw_param in raw.parameters {
        let blend = match raw_param.blend.as_deref() {
            None | Some(BLEND_ADD) => ExpressionBlendType::Add,
            Some(BLEND_MULTIPLY) => ExpressionBlendType::Multiply,
            Some(BLEND_OVERWRITE) => ExpressionBlendType::Overwrite,
            Some(other) => {
                log::warn!("unknown expression blend '{other}' for '{}', using Add", raw_param.id);
                ExpressionBlendType::Add
            }
        };
        parameters.push(ExpressionParameter {
            id: ids.id(&raw_param.id),
            blend,
            value: raw_param.value,
        });
    }

    Ok(ParsedExpression {
        parameters,
        fade_in_seconds: fade_or_default(raw.fade_in_time),
        fade_out_seconds: fade_or_default(raw.fade_out_time),
    })
}

fn fade_or_default(value: Option<f32>) -> f32 {
    match value {
        Some(v) if v >= 0.0 => v,
        _ => DEFAULT_FADE_SECONDS,
    }
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct RawMotion {
    #[serde(rename = "Meta")]
    meta: RawMeta,
    #[serde(rename = "Curves")]
    curves: Vec<RawCurve>,
    #[serde(rename = "UserData", default)]
    user_data: Vec<RawUserData>,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    #[serde(rename = "Duration")]
    duration: f32,
    #[serde(rename = "Fps", default = "default_fps")]
    fps: f32,
    #[serde(rename = "Loop", default)]
    looped: bool,
    #[serde(rename = "FadeInTime", default)]
    fade_in_time: Option<f32>,
    #[serde(rename = "FadeOutTime", default)]
    fade_out_time: Option<f32>,
}

fn default_fps() -> f32 {
    30.0
}

#[derive(Debug, Deserialize)]
struct RawCurve {
    #[serde(rename = "Target")]
    target: String,
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Segments")]
    segments: Vec<f32>,
    #[serde(rename = "FadeInTime", default)]
    fade_in_time: Option<f32>,
    #[serde(rename = "FadeOutTime", default)]
    fade_out_time: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct RawUserData {
    #[serde(rename = "Time")]
    time: f32,
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawExpression {
    #[serde(rename = "FadeInTime", default)]
    fade_in_time: Option<f32>,
    #[serde(rename = "FadeOutTime", default)]
    fade_out_time: Option<f32>,
    #[serde(rename = "Parameters", default)]
    parameters: Vec<RawExpressionParameter>,
}

#[derive(Debug, Deserialize)]
struct RawExpressionParameter {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Value")]
    value: f32,
    #[serde(rename = "Blend", default)]
    blend: Option<String>,
}
