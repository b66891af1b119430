//! Dependent-attribute propagation
//!
//! Some editor sliders move others: raising `arm_size` by three also raises
//! `upper_arm_thickness` and `forearm_thickness` by three, clamped to the
//! page's range. The planner has to mirror that or its idea of the current
//! slider values drifts from the editor's.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::Section;

/// Clamp range applied to propagated values; a property of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClampPolicy {
    /// [0, 400]
    Wide,
    /// [-100, 100]
    Narrow,
}

impl ClampPolicy {
    pub fn range(self) -> (i32, i32) {
        match self {
            ClampPolicy::Wide => (0, 400),
            ClampPolicy::Narrow => (-100, 100),
        }
    }

    pub fn clamp(self, value: i32) -> i32 {
        let (lo, hi) = self.range();
        value.clamp(lo, hi)
    }
}

/// Page → clamp policy. Pages without an entry are `Narrow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampTable {
    pages: BTreeMap<String, ClampPolicy>,
}

impl Default for ClampTable {
    fn default() -> Self {
        let mut pages = BTreeMap::new();
        pages.insert("markings".to_string(), ClampPolicy::Wide);
        Self { pages }
    }
}

impl ClampTable {
    pub fn new(pages: BTreeMap<String, ClampPolicy>) -> Self {
        Self { pages }
    }

    pub fn policy_for(&self, page: &str) -> ClampPolicy {
        self.pages.get(page).copied().unwrap_or(ClampPolicy::Narrow)
    }
}

/// Primary attribute → ordered dependents. Dependents always live in the
/// primary's own section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTable {
    entries: Vec<(String, Vec<String>)>,
}

const DEFAULT_DEPENDENCIES: &[(&str, &[&str])] = &[
    ("arm_size", &["upper_arm_thickness", "forearm_thickness"]),
    ("leg_size", &["thigh_size", "calf_size"]),
    ("brow_depth_overall", &["brow_depth_inner", "brow_depth_outer"]),
    ("bridge_bump_overall", &["bridge_bump_upper", "bridge_bump_lower"]),
    ("cheek_thickness", &["cheek_bulge", "neck_fat"]),
    ("body_tattoo_overall_scale", &["body_tattoo_vert_scale", "body_tattoo_horz_scale"]),
    ("right_arm_overall_scale", &["right_arm_vert_scale", "right_arm_horz_scale"]),
    ("left_arm_overall_scale", &["left_arm_vert_scale", "left_arm_horz_scale"]),
    ("right_leg_overall_scale", &["right_leg_vert_scale", "right_leg_horz_scale"]),
    ("left_leg_overall_scale", &["left_leg_vert_scale", "left_leg_horz_scale"]),
    ("body_scar_overall_scale", &["body_scar_vert_scale", "body_scar_horz_scale"]),
    ("right_arm_scar_overall_scale", &["right_arm_scar_horz_scale", "right_arm_scar_vert_scale"]),
    ("left_arm_scar_overall_scale", &["left_arm_scar_horz_scale", "left_arm_scar_vert_scale"]),
    ("right_leg_scar_overall_scale", &["right_leg_scar_horz_scale", "right_leg_scar_vert_scale"]),
    ("left_leg_scar_overall_scale", &["left_leg_scar_horz_scale", "left_leg_scar_vert_scale"]),
];

impl Default for DependencyTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_DEPENDENCIES
                .iter()
                .map(|(primary, deps)| {
                    (primary.to_string(), deps.iter().map(|d| d.to_string()).collect())
                })
                .collect(),
        }
    }
}

impl DependencyTable {
    pub fn from_entries<I, P, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, Vec<D>)>,
        P: Into<String>,
        D: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(p, deps)| (p.into(), deps.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn dependents(&self, primary: &str) -> Option<&[String]> {
        self.entries.iter().find(|(p, _)| p == primary).map(|(_, deps)| deps.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What happened to one declared dependent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    Updated { name: String, from: i32, to: i32 },
    /// Declared in the table but not present in the section.
    Skipped { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    pub section: Section,
    pub adjustments: Vec<Adjustment>,
}

/// Shift every dependent of `primary` by `new_value - old_value`, clamped by
/// `policy`. Returns the section unchanged when `primary` has no dependents.
pub fn propagate(
    table: &DependencyTable,
    primary: &str,
    old_value: i32,
    new_value: i32,
    section: &Section,
    policy: ClampPolicy,
) -> Propagation {
    let mut updated = section.clone();
    let mut adjustments = Vec::new();

    let Some(dependents) = table.dependents(primary) else {
        return Propagation { section: updated, adjustments };
    };

    let delta = new_value.saturating_sub(old_value);
    for name in dependents {
        match section.get(name) {
            Some(from) => {
                let to = policy.clamp(from.saturating_add(delta));
                updated.set(name, to);
                adjustments.push(Adjustment::Updated { name: name.clone(), from, to });
            }
            None => adjustments.push(Adjustment::Skipped { name: name.clone() }),
        }
    }

    Propagation { section: updated, adjustments }
}
