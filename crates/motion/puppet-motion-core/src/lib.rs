//! Puppet Motion Core (engine-agnostic)
//!
//! The motion-blending and parameter-animation engine behind a 2D skeletal
//! character model: keyframe curve evaluation, fade-weight compositing, the
//! motion queue with priority management, and the procedural secondary
//! layers (breath, pose crossfade, auto eye blink, physics seam). The crate
//! owns no parameter storage and does no rendering; each frame it writes
//! into a host-supplied [`Model`] buffer.

pub mod data;
pub mod effects;
pub mod ids;
pub mod manager;
pub mod math;
pub mod model;
pub mod motion;
pub mod motion_json;
pub mod outputs;
pub mod queue;
pub mod sampling;

// Re-exports for consumers (adapters)
pub use data::{CurveTarget, MotionCurve, MotionData, MotionEvent, MotionPoint, MotionSegment, SegmentType};
pub use effects::{Breath, BreathParameter, EyeBlink, PhysicsEffect, PhysicsSettings, Pose};
pub use ids::{EntryHandle, IdManager, ParameterId};
pub use manager::{MotionManager, PRIORITY_NONE};
pub use model::Model;
pub use motion::{
    ExpressionBlendType, ExpressionParameter, Motion, MotionKind, SharedMotion,
    EFFECT_ID_EYE_BLINK, EFFECT_ID_LIP_SYNC,
};
pub use motion_json::{
    parse_expression_json, parse_motion_json, MotionParseError, ParsedExpression, ParsedMotion,
};
pub use outputs::{EventSink, FiredEvent, Outputs};
pub use queue::{MotionQueueEntry, MotionQueueManager};
pub use sampling::evaluate_curve;
