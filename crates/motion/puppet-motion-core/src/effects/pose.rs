//! Part-opacity crossfade for mutually exclusive part groups.
//!
//! Each group contains parts of which exactly one is "selected" at a time
//! (its driving parameter is above a small epsilon). The selected part's
//! opacity ramps toward 1 over the fade time; the other parts follow a
//! complementary piecewise-linear curve pivoting at opacity 0.5 and clamped
//! so at most 15% of the background bleeds through during the crossfade.

use serde::Deserialize;

use crate::ids::{IdManager, ParameterId};
use crate::model::Model;
use crate::motion_json::MotionParseError;

const EPSILON: f32 = 0.001;
const PHI: f32 = 0.5;
const BACK_OPACITY_THRESHOLD: f32 = 0.15;
const DEFAULT_FADE_SECONDS: f32 = 0.5;

/// One part in a group, with parts that mirror its final opacity.
#[derive(Clone, Debug)]
pub struct PartData {
    pub id: ParameterId,
    pub links: Vec<ParameterId>,
}

/// Crossfade state machine over part groups.
///
/// Groups are stored flattened with a per-group count, in asset order.
#[derive(Clone, Debug)]
pub struct Pose {
    parts: Vec<PartData>,
    group_counts: Vec<usize>,
    fade_seconds: f32,
}

impl Pose {
    pub fn new(groups: Vec<Vec<PartData>>, fade_seconds: f32) -> Self {
        let group_counts = groups.iter().map(Vec::len).collect();
        Pose {
            parts: groups.into_iter().flatten().collect(),
            group_counts,
            fade_seconds,
        }
    }

    pub fn fade_seconds(&self) -> f32 {
        self.fade_seconds
    }

    pub fn set_fade_seconds(&mut self, seconds: f32) {
        self.fade_seconds = seconds;
    }

    /// Force each group to its first part: parameter and opacity 1 for the
    /// head of the group, 0 for the rest.
    pub fn reset(&self, model: &mut dyn Model) {
        let mut begin = 0;
        for count in &self.group_counts {
            for (offset, part) in self.parts[begin..begin + count].iter().enumerate() {
                let value = if offset == 0 { 1.0 } else { 0.0 };
                if let Some(index) = model.parameter_index(part.id) {
                    model.set_parameter_value(index, value);
                }
                if let Some(index) = model.part_index(part.id) {
                    model.set_part_opacity(index, value);
                }
            }
            begin += count;
        }
    }

    pub fn update(&mut self, model: &mut dyn Model, delta_seconds: f32) {
        let delta = delta_seconds.max(0.0);

        let mut begin = 0;
        for &count in &self.group_counts {
            self.fade_group(model, delta, begin, count);
            begin += count;
        }
        self.copy_part_opacities(model);
    }

    fn fade_group(&self, model: &mut dyn Model, delta: f32, begin: usize, count: usize) {
        let group = &self.parts[begin..begin + count];

        // The selected part is the first whose parameter is "on".
        let mut visible: Option<usize> = None;
        let mut new_opacity = 1.0f32;
        for (offset, part) in group.iter().enumerate() {
            let Some(parameter_index) = model.parameter_index(part.id) else {
                continue;
            };
            if model.parameter_value(parameter_index) > EPSILON {
                visible = Some(offset);
                if let Some(part_index) = model.part_index(part.id) {
                    new_opacity = (model.part_opacity(part_index) + delta / self.fade_seconds)
                        .min(1.0);
                }
                break;
            }
        }
        let visible = visible.unwrap_or(0);

        for (offset, part) in group.iter().enumerate() {
            let Some(part_index) = model.part_index(part.id) else {
                continue;
            };
            if offset == visible {
                model.set_part_opacity(part_index, new_opacity);
            } else {
                let mut opacity = model.part_opacity(part_index);

                // Complementary curve through (0,1) and (phi,phi) below the
                // pivot, (phi,phi) and (1,0) above it.
                let mut a1 = if new_opacity < PHI {
                    new_opacity * (PHI - 1.0) / PHI + 1.0
                } else {
                    (1.0 - new_opacity) * PHI / (1.0 - PHI)
                };

                let back_opacity = (1.0 - a1) * (1.0 - new_opacity);
                if back_opacity > BACK_OPACITY_THRESHOLD {
                    a1 = 1.0 - BACK_OPACITY_THRESHOLD / (1.0 - new_opacity);
                }

                if opacity > a1 {
                    opacity = a1;
                }
                model.set_part_opacity(part_index, opacity);
            }
        }
    }

    /// Mirror each part's final opacity onto its linked parts.
    fn copy_part_opacities(&self, model: &mut dyn Model) {
        for part in &self.parts {
            if part.links.is_empty() {
                continue;
            }
            let Some(part_index) = model.part_index(part.id) else {
                continue;
            };
            let opacity = model.part_opacity(part_index);
            for link in &part.links {
                if let Some(link_index) = model.part_index(*link) {
                    model.set_part_opacity(link_index, opacity);
                }
            }
        }
    }
}

/// Parse a pose3.json document: an optional fade time plus part groups.
pub fn parse_pose_json(json: &str, ids: &mut IdManager) -> Result<Pose, MotionParseError> {
    let raw: RawPose = serde_json::from_str(json)?;

    let fade_seconds = match raw.fade_in_time {
        Some(v) if v >= 0.0 => v,
        _ => DEFAULT_FADE_SECONDS,
    };

    let groups = raw
        .groups
        .into_iter()
        .map(|group| {
            group
                .into_iter()
                .map(|part| PartData {
                    id: ids.id(&part.id),
                    links: part.link.iter().map(|l| ids.id(l)).collect(),
                })
                .collect()
        })
        .collect();

    Ok(Pose::new(groups, fade_seconds))
}

#[derive(Debug, Deserialize)]
struct RawPose {
    #[serde(rename = "FadeInTime", default)]
    fade_in_time: Option<f32>,
    #[serde(rename = "Groups", default)]
    groups: Vec<Vec<RawPart>>,
}

#[derive(Debug, Deserialize)]
struct RawPart {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Link", default)]
    link: Vec<String>,
}
