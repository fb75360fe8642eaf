//! Procedural layers applied after primary motion blending.

pub mod breath;
pub mod eye_blink;
pub mod physics;
pub mod pose;

pub use breath::{Breath, BreathParameter};
pub use eye_blink::EyeBlink;
pub use physics::{PhysicsEffect, PhysicsSettings};
pub use pose::{parse_pose_json, PartData, Pose};
