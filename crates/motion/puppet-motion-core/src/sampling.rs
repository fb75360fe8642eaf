//! Pure segment and curve evaluation.
//!
//! Each evaluator takes the slice of points starting at the segment's base
//! point and the absolute query time, and returns the interpolated value.
//! No side effects, O(1) per segment. Segments with coincident endpoint
//! times must not occur in valid input (the parser rejects them); linear
//! evaluation would divide by zero on such data.
//!
//! [`evaluate_curve`] scans the curve's segments in time order and picks the
//! first whose end point lies strictly beyond the query time; past the last
//! segment the final point's value is held (clamped extrapolation).

use crate::data::{MotionData, MotionPoint, SegmentType};
use crate::math::lerp_point;

/// Two-point linear interpolation; `t` clamps at 0 but extrapolates above 1.
#[inline]
pub fn linear_evaluate(points: &[MotionPoint], time: f32) -> f32 {
    let t = ((time - points[0].time) / (points[1].time - points[0].time)).max(0.0);
    points[0].value + (points[1].value - points[0].value) * t
}

/// Four-point cubic bezier via De Casteljau reduction. Only the value
/// component of the reduced point is used.
#[inline]
pub fn bezier_evaluate(points: &[MotionPoint], time: f32) -> f32 {
    let t = ((time - points[0].time) / (points[3].time - points[0].time)).max(0.0);

    let p01 = lerp_point(points[0], points[1], t);
    let p12 = lerp_point(points[1], points[2], t);
    let p23 = lerp_point(points[2], points[3], t);

    let p012 = lerp_point(p01, p12, t);
    let p123 = lerp_point(p12, p23, t);

    lerp_point(p012, p123, t).value
}

/// Hold the earlier value through the whole span.
#[inline]
pub fn stepped_evaluate(points: &[MotionPoint], _time: f32) -> f32 {
    points[0].value
}

/// Jump immediately to the later value.
#[inline]
pub fn inverse_stepped_evaluate(points: &[MotionPoint], _time: f32) -> f32 {
    points[1].value
}

/// Dispatch on segment type.
#[inline]
pub fn evaluate_segment(segment_type: SegmentType, points: &[MotionPoint], time: f32) -> f32 {
    match segment_type {
        SegmentType::Linear => linear_evaluate(points, time),
        SegmentType::Bezier => bezier_evaluate(points, time),
        SegmentType::Stepped => stepped_evaluate(points, time),
        SegmentType::InverseStepped => inverse_stepped_evaluate(points, time),
    }
}

/// Evaluate one curve of `data` at `time` (seconds, local motion time).
pub fn evaluate_curve(data: &MotionData, curve_index: usize, time: f32) -> f32 {
    let curve = &data.curves[curve_index];
    let total = curve.base_segment_index + curve.segment_count;

    let mut end_point = 0;
    for i in curve.base_segment_index..total {
        let segment = &data.segments[i];
        // End point of this segment = first point of the next.
        end_point = segment.base_point_index + segment.segment_type.point_span();

        if data.points[end_point].time > time {
            return evaluate_segment(
                segment.segment_type,
                &data.points[segment.base_point_index..],
                time,
            );
        }
    }

    // Past every segment: hold the final keyframe's value.
    data.points[end_point].value
}
