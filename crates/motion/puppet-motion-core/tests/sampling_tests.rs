use puppet_motion_core::data::MotionPoint;
use puppet_motion_core::ids::IdManager;
use puppet_motion_core::sampling::{
    bezier_evaluate, evaluate_curve, inverse_stepped_evaluate, linear_evaluate, stepped_evaluate,
};
use puppet_motion_core::CurveTarget;
use puppet_test_fixtures::MotionBuilder;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn pt(time: f32, value: f32) -> MotionPoint {
    MotionPoint { time, value }
}

#[test]
fn linear_midpoint_and_clamp_below() {
    let points = [pt(0.0, 0.0), pt(2.0, 10.0)];
    approx(linear_evaluate(&points, 1.0), 5.0, 1e-6);
    // t clamps at 0 for queries before the segment.
    approx(linear_evaluate(&points, -5.0), 0.0, 1e-6);
    // Above 1 it extrapolates.
    approx(linear_evaluate(&points, 3.0), 15.0, 1e-6);
}

#[test]
fn bezier_endpoints_are_fixed_points() {
    let points = [pt(0.0, 2.0), pt(0.3, 8.0), pt(0.7, -4.0), pt(1.0, 6.0)];
    approx(bezier_evaluate(&points, 0.0), 2.0, 1e-5);
    approx(bezier_evaluate(&points, 1.0), 6.0, 1e-5);
}

#[test]
fn bezier_midpoint_matches_de_casteljau_by_hand() {
    // Control values 0, 0, 1, 1 at t=0.5 reduce to 0.5.
    let points = [pt(0.0, 0.0), pt(0.25, 0.0), pt(0.75, 1.0), pt(1.0, 1.0)];
    approx(bezier_evaluate(&points, 0.5), 0.5, 1e-5);
}

#[test]
fn stepped_and_inverse_inside_span() {
    let points = [pt(0.0, 1.0), pt(1.0, 9.0)];
    for time in [0.01, 0.25, 0.5, 0.99] {
        approx(stepped_evaluate(&points, time), 1.0, 0.0);
        approx(inverse_stepped_evaluate(&points, time), 9.0, 0.0);
    }
}

#[test]
fn curve_scan_picks_covering_segment() {
    let mut ids = IdManager::new();
    let x = ids.id("X");
    let data = MotionBuilder::new(2.0)
        .linear_curve(CurveTarget::Parameter, x, &[(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)])
        .build();

    approx(evaluate_curve(&data, 0, 0.5), 5.0, 1e-6);
    // Exactly at the shared boundary the later segment takes over.
    approx(evaluate_curve(&data, 0, 1.0), 10.0, 1e-6);
    approx(evaluate_curve(&data, 0, 1.5), 5.0, 1e-6);
}

#[test]
fn curve_scan_clamps_past_end() {
    let mut ids = IdManager::new();
    let x = ids.id("X");
    let data = MotionBuilder::new(1.0)
        .linear_curve(CurveTarget::Parameter, x, &[(0.0, 0.0), (1.0, 10.0)])
        .build();

    approx(evaluate_curve(&data, 0, 5.0), 10.0, 0.0);
}
