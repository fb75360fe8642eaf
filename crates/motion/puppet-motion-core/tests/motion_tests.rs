use std::sync::Arc;

use puppet_motion_core::ids::IdManager;
use puppet_motion_core::motion::{ExpressionBlendType, ExpressionParameter, Motion};
use puppet_motion_core::motion_json::{ParsedExpression, ParsedMotion};
use puppet_motion_core::queue::MotionQueueManager;
use puppet_motion_core::CurveTarget;
use puppet_test_fixtures::{BufferModel, MotionBuilder, SIMPLE_MOTION_JSON};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn keyframe_no_fade(data: puppet_motion_core::MotionData, ids: &mut IdManager) -> Motion {
    Motion::keyframe(
        ParsedMotion {
            data,
            fade_in_seconds: 0.0,
            fade_out_seconds: 0.0,
        },
        ids,
    )
}

#[test]
fn linear_motion_writes_midpoint_value_then_finishes() {
    let mut ids = IdManager::new();
    let motion = Motion::from_motion_json(SIMPLE_MOTION_JSON, &mut ids).unwrap();
    let x = ids.get("X").unwrap();

    let mut model = BufferModel::new();
    model.add_parameter(x, 0.0);

    let mut queue = MotionQueueManager::new();
    let handle = queue.start_motion(Arc::new(motion));

    queue.update(&mut model, 0.0);
    approx(model.parameter(x), 0.0, 1e-6);

    queue.update(&mut model, 0.5);
    approx(model.parameter(x), 5.0, 1e-6);
    assert!(!queue.is_finished_handle(handle));

    queue.update(&mut model, 1.1);
    assert!(queue.is_finished_handle(handle));
    assert!(queue.is_finished());
    assert_eq!(queue.outputs().finished, vec![handle]);
}

#[test]
fn fade_in_weight_is_monotonic() {
    let mut ids = IdManager::new();
    let x = ids.id("X");
    let data = MotionBuilder::new(1.0)
        .looped(true)
        .linear_curve(CurveTarget::Parameter, x, &[(0.0, 0.0), (1.0, 1.0)])
        .build();
    let mut motion = Motion::keyframe(
        ParsedMotion {
            data,
            fade_in_seconds: 2.0,
            fade_out_seconds: 0.0,
        },
        &mut ids,
    );
    motion.set_loop_fade_in(false);

    let mut model = BufferModel::new();
    model.add_parameter(x, 0.0);

    let mut queue = MotionQueueManager::new();
    let handle = queue.start_motion(Arc::new(motion));

    let mut last_weight = 0.0f32;
    for step in 0..=20 {
        let now = step as f32 * 0.1;
        queue.update(&mut model, now);
        let weight = queue.entry(handle).unwrap().state_weight();
        assert!(weight >= last_weight, "weight dipped at t={now}");
        assert!((0.0..=1.0).contains(&weight));
        last_weight = weight;
    }
    approx(last_weight, 1.0, 1e-5);
}

#[test]
fn loop_wraps_seamlessly() {
    let mut ids = IdManager::new();
    let x = ids.id("X");
    let build = |ids: &mut IdManager| {
        let data = MotionBuilder::new(1.0)
            .looped(true)
            .linear_curve(CurveTarget::Parameter, x, &[(0.0, 0.0), (1.0, 10.0)])
            .build();
        let mut motion = keyframe_no_fade(data, ids);
        motion.set_loop_fade_in(false);
        Arc::new(motion)
    };

    let mut model_a = BufferModel::new();
    model_a.add_parameter(x, 0.0);
    let mut queue_a = MotionQueueManager::new();
    queue_a.start_motion(build(&mut ids));
    queue_a.update(&mut model_a, 0.0);
    queue_a.update(&mut model_a, 1.05);

    let mut model_b = BufferModel::new();
    model_b.add_parameter(x, 0.0);
    let mut queue_b = MotionQueueManager::new();
    queue_b.start_motion(build(&mut ids));
    queue_b.update(&mut model_b, 0.0);
    queue_b.update(&mut model_b, 0.05);

    approx(model_a.parameter(x), model_b.parameter(x), 1e-5);
}

#[test]
fn expression_blend_modes_scale_by_weight() {
    let mut ids = IdManager::new();
    let a = ids.id("A");
    let m = ids.id("M");

    let mut model = BufferModel::new();
    model.add_parameter(a, 1.0);
    model.add_parameter(m, 2.0);

    let add = Motion::expression(
        ParsedExpression {
            parameters: vec![ExpressionParameter {
                id: a,
                blend: ExpressionBlendType::Add,
                value: 2.0,
            }],
            fade_in_seconds: 0.0,
            fade_out_seconds: 0.0,
        },
        &mut ids,
    );

    let mut multiply = Motion::expression(
        ParsedExpression {
            parameters: vec![ExpressionParameter {
                id: m,
                blend: ExpressionBlendType::Multiply,
                value: 3.0,
            }],
            fade_in_seconds: 0.0,
            fade_out_seconds: 0.0,
        },
        &mut ids,
    );
    multiply.set_weight(0.5);

    let mut queue_add = MotionQueueManager::new();
    queue_add.start_motion(Arc::new(add));
    queue_add.update(&mut model, 0.0);
    approx(model.parameter(a), 3.0, 1e-6);

    let mut queue_mul = MotionQueueManager::new();
    queue_mul.start_motion(Arc::new(multiply));
    queue_mul.update(&mut model, 0.0);
    // 2 * (1 + (3 - 1) * 0.5)
    approx(model.parameter(m), 4.0, 1e-6);
}

#[test]
fn eye_blink_multiplies_curve_driven_targets_and_reaches_the_rest() {
    let mut ids = IdManager::new();
    let eye_l = ids.id("EyeL");
    let eye_r = ids.id("EyeR");
    let blink_channel = ids.id("EyeBlink");

    let data = MotionBuilder::new(1.0)
        .linear_curve(CurveTarget::Model, blink_channel, &[(0.0, 0.5), (1.0, 0.5)])
        .linear_curve(CurveTarget::Parameter, eye_l, &[(0.0, 1.0), (1.0, 1.0)])
        .build();
    let mut motion = keyframe_no_fade(data, &mut ids);
    motion.set_effect_ids(vec![eye_l, eye_r], Vec::new());

    let mut model = BufferModel::new();
    model.add_parameter(eye_l, 0.0);
    model.add_parameter(eye_r, 1.0);

    let mut queue = MotionQueueManager::new();
    queue.start_motion(Arc::new(motion));
    queue.update(&mut model, 0.25);

    // Curve-driven target: curve value folded with the blink override.
    approx(model.parameter(eye_l), 0.5, 1e-6);
    // No explicit curve: post-pass blends straight to the override value.
    approx(model.parameter(eye_r), 0.5, 1e-6);
}

#[test]
fn lip_sync_adds_into_curve_driven_targets() {
    let mut ids = IdManager::new();
    let mouth = ids.id("Mouth");
    let mouth_form = ids.id("MouthForm");
    let lip_channel = ids.id("LipSync");

    let data = MotionBuilder::new(1.0)
        .linear_curve(CurveTarget::Model, lip_channel, &[(0.0, 0.25), (1.0, 0.25)])
        .linear_curve(CurveTarget::Parameter, mouth, &[(0.0, 0.5), (1.0, 0.5)])
        .build();
    let mut motion = keyframe_no_fade(data, &mut ids);
    motion.set_effect_ids(Vec::new(), vec![mouth, mouth_form]);

    let mut model = BufferModel::new();
    model.add_parameter(mouth, 0.0);
    model.add_parameter(mouth_form, 0.0);

    let mut queue = MotionQueueManager::new();
    queue.start_motion(Arc::new(motion));
    queue.update(&mut model, 0.25);

    approx(model.parameter(mouth), 0.75, 1e-6);
    approx(model.parameter(mouth_form), 0.25, 1e-6);
}

#[test]
fn per_curve_fade_override_bypasses_motion_fade() {
    let mut ids = IdManager::new();
    let fast = ids.id("Fast");
    let slow = ids.id("Slow");

    let data = MotionBuilder::new(10.0)
        .linear_curve(CurveTarget::Parameter, fast, &[(0.0, 8.0), (10.0, 8.0)])
        .linear_curve(CurveTarget::Parameter, slow, &[(0.0, 4.0), (10.0, 4.0)])
        .build();
    let mut motion = Motion::keyframe(
        ParsedMotion {
            data,
            fade_in_seconds: 10.0,
            fade_out_seconds: 0.0,
        },
        &mut ids,
    );
    motion.set_parameter_fade_in(fast, 0.0);

    let mut model = BufferModel::new();
    model.add_parameter(fast, 0.0);
    model.add_parameter(slow, 0.0);

    let mut queue = MotionQueueManager::new();
    queue.start_motion(Arc::new(motion));
    queue.update(&mut model, 0.0);
    queue.update(&mut model, 0.1);

    // The override ignores the 10 s motion fade entirely.
    approx(model.parameter(fast), 8.0, 1e-5);
    // The other curve is still deep inside the motion-level fade-in.
    assert!(model.parameter(slow) < 0.05);
}

#[test]
fn large_effect_target_lists_are_fully_applied() {
    let mut ids = IdManager::new();
    let blink_channel = ids.id("EyeBlink");
    let targets: Vec<_> = (0..70).map(|i| ids.id(&format!("Eye{i:02}"))).collect();

    let data = MotionBuilder::new(1.0)
        .linear_curve(CurveTarget::Model, blink_channel, &[(0.0, 0.0), (1.0, 0.0)])
        .build();
    let mut motion = keyframe_no_fade(data, &mut ids);
    motion.set_effect_ids(targets.clone(), Vec::new());

    let mut model = BufferModel::new();
    for id in &targets {
        model.add_parameter(*id, 1.0);
    }

    let mut queue = MotionQueueManager::new();
    queue.start_motion(Arc::new(motion));
    queue.update(&mut model, 0.5);

    for id in &targets {
        approx(model.parameter(*id), 0.0, 1e-6);
    }
}

#[test]
fn duration_reports_indefinite_for_loops_and_expressions() {
    let mut ids = IdManager::new();
    let x = ids.id("X");

    let finite = keyframe_no_fade(
        MotionBuilder::new(2.0)
            .linear_curve(CurveTarget::Parameter, x, &[(0.0, 0.0), (2.0, 1.0)])
            .build(),
        &mut ids,
    );
    assert_eq!(finite.duration(), Some(2.0));

    let looping = keyframe_no_fade(
        MotionBuilder::new(2.0)
            .looped(true)
            .linear_curve(CurveTarget::Parameter, x, &[(0.0, 0.0), (2.0, 1.0)])
            .build(),
        &mut ids,
    );
    assert_eq!(looping.duration(), None);

    let expression = Motion::expression(
        ParsedExpression {
            parameters: Vec::new(),
            fade_in_seconds: 0.0,
            fade_out_seconds: 0.0,
        },
        &mut ids,
    );
    assert_eq!(expression.duration(), None);
}

#[test]
fn part_opacity_curves_write_unfaded() {
    let mut ids = IdManager::new();
    let part = ids.id("PartHair");

    let data = MotionBuilder::new(1.0)
        .linear_curve(CurveTarget::PartOpacity, part, &[(0.0, 0.0), (1.0, 1.0)])
        .build();
    // A long fade-in must not dampen opacity curves.
    let motion = Motion::keyframe(
        ParsedMotion {
            data,
            fade_in_seconds: 100.0,
            fade_out_seconds: 0.0,
        },
        &mut ids,
    );

    let mut model = BufferModel::new();
    model.add_part(part, 0.0);

    let mut queue = MotionQueueManager::new();
    queue.start_motion(Arc::new(motion));
    queue.update(&mut model, 0.0);
    queue.update(&mut model, 0.5);

    approx(model.part(part), 0.5, 1e-6);
}
