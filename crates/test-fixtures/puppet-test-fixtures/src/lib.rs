//! Shared test fixtures: a reference [`Model`] implementation backed by
//! flat vectors, and canned motion/expression/pose documents.

use std::collections::HashMap;

use puppet_motion_core::{
    CurveTarget, Model, MotionCurve, MotionData, MotionEvent, MotionPoint, MotionSegment,
    ParameterId, SegmentType,
};

/// Reference model: named float parameters and part opacities in dense
/// vectors, with id-to-index maps maintained on registration.
#[derive(Default, Debug)]
pub struct BufferModel {
    parameter_ids: HashMap<ParameterId, usize>,
    parameters: Vec<f32>,
    part_ids: HashMap<ParameterId, usize>,
    part_opacities: Vec<f32>,
}

impl BufferModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter with an initial value; returns its dense index.
    pub fn add_parameter(&mut self, id: ParameterId, value: f32) -> usize {
        let index = self.parameters.len();
        self.parameters.push(value);
        self.parameter_ids.insert(id, index);
        index
    }

    /// Register a part with an initial opacity; returns its dense index.
    pub fn add_part(&mut self, id: ParameterId, opacity: f32) -> usize {
        let index = self.part_opacities.len();
        self.part_opacities.push(opacity);
        self.part_ids.insert(id, index);
        index
    }

    pub fn parameter(&self, id: ParameterId) -> f32 {
        self.parameters[self.parameter_ids[&id]]
    }

    pub fn part(&self, id: ParameterId) -> f32 {
        self.part_opacities[self.part_ids[&id]]
    }
}

impl Model for BufferModel {
    fn parameter_index(&self, id: ParameterId) -> Option<usize> {
        self.parameter_ids.get(&id).copied()
    }

    fn parameter_value(&self, index: usize) -> f32 {
        self.parameters[index]
    }

    fn set_parameter_value(&mut self, index: usize, value: f32) {
        self.parameters[index] = value;
    }

    fn part_index(&self, id: ParameterId) -> Option<usize> {
        self.part_ids.get(&id).copied()
    }

    fn part_opacity(&self, index: usize) -> f32 {
        self.part_opacities[index]
    }

    fn set_part_opacity(&mut self, index: usize, opacity: f32) {
        self.part_opacities[index] = opacity;
    }
}

/// Hand-builds [`MotionData`] for tests without going through JSON.
///
/// Curves must be added in target-group order (Model, Parameter,
/// PartOpacity), same as parsed assets.
pub struct MotionBuilder {
    data: MotionData,
}

impl MotionBuilder {
    pub fn new(duration: f32) -> Self {
        MotionBuilder {
            data: MotionData {
                duration,
                looped: false,
                fps: 30.0,
                curves: Vec::new(),
                segments: Vec::new(),
                points: Vec::new(),
                events: Vec::new(),
            },
        }
    }

    pub fn looped(mut self, looped: bool) -> Self {
        self.data.looped = looped;
        self
    }

    /// A curve of linear segments through `keys` (time, value pairs).
    pub fn linear_curve(mut self, target: CurveTarget, id: ParameterId, keys: &[(f32, f32)]) -> Self {
        assert!(keys.len() >= 2, "a curve needs at least two keys");
        let base_segment_index = self.data.segments.len();
        self.data.points.push(MotionPoint {
            time: keys[0].0,
            value: keys[0].1,
        });
        for key in &keys[1..] {
            self.data.segments.push(MotionSegment {
                segment_type: SegmentType::Linear,
                base_point_index: self.data.points.len() - 1,
            });
            self.data.points.push(MotionPoint {
                time: key.0,
                value: key.1,
            });
        }
        self.data.curves.push(MotionCurve {
            target,
            id,
            base_segment_index,
            segment_count: keys.len() - 1,
            fade_in_time: None,
            fade_out_time: None,
        });
        self
    }

    pub fn event(mut self, time: f32, value: &str) -> Self {
        self.data.events.push(MotionEvent {
            fire_time: time,
            value: value.to_string(),
        });
        self
    }

    pub fn build(self) -> MotionData {
        self.data.validate().expect("builder produced invalid data");
        self.data
    }
}

/// One-second non-looping motion: a single linear Parameter curve "X" from
/// (0, 0) to (1, 10), no fades, one event at t = 0.75.
pub const SIMPLE_MOTION_JSON: &str = r#"{
  "Version": 3,
  "Meta": {
    "Duration": 1.0,
    "Fps": 30.0,
    "Loop": false,
    "FadeInTime": 0.0,
    "FadeOutTime": 0.0
  },
  "Curves": [
    {
      "Target": "Parameter",
      "Id": "X",
      "Segments": [0.0, 0.0, 0, 1.0, 10.0]
    }
  ],
  "UserData": [
    { "Time": 0.75, "Value": "step" }
  ]
}"#;

/// Mixed-segment motion: one curve with a linear piece into a bezier piece,
/// plus a stepped curve, exercising the flat segment-stream decoding.
pub const MIXED_SEGMENTS_MOTION_JSON: &str = r#"{
  "Version": 3,
  "Meta": {
    "Duration": 2.0,
    "Fps": 30.0,
    "Loop": false
  },
  "Curves": [
    {
      "Target": "Parameter",
      "Id": "Angle",
      "Segments": [0.0, 0.0, 0, 1.0, 4.0, 1, 1.2, 4.0, 1.8, 8.0, 2.0, 8.0]
    },
    {
      "Target": "Parameter",
      "Id": "Step",
      "Segments": [0.0, 1.0, 2, 2.0, 5.0]
    }
  ]
}"#;

/// Expression with all three blend modes plus an unknown one that must
/// degrade to Add.
pub const EXPRESSION_JSON: &str = r#"{
  "FadeInTime": 0.0,
  "FadeOutTime": 0.0,
  "Parameters": [
    { "Id": "A", "Value": 2.0, "Blend": "Add" },
    { "Id": "M", "Value": 3.0, "Blend": "Multiply" },
    { "Id": "O", "Value": 7.0, "Blend": "Overwrite" },
    { "Id": "U", "Value": 1.5, "Blend": "Screen" }
  ]
}"#;

/// Two-group pose: arms A/B crossfade (A linked to a watch part), plus a
/// single-part scarf group.
pub const POSE_JSON: &str = r#"{
  "FadeInTime": 0.5,
  "Groups": [
    [
      { "Id": "PartArmA", "Link": ["PartWatch"] },
      { "Id": "PartArmB" }
    ],
    [
      { "Id": "PartScarf" }
    ]
  ]
}"#;
