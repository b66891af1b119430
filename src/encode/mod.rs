//! Abstract navigation actions and their primitive key encodings.

use serde::{Deserialize, Serialize};
use std::{fmt, iter, vec};

/// One press-then-release of a single editor key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    /// Slider right.
    Increase,
    /// Slider left.
    Decrease,
    /// Move the cursor to the next row.
    Confirm,
    /// Open a category, or flip a toggle row.
    Toggle,
    /// Back out of a category.
    Cancel,
    /// Switch to the next page tab.
    NextPage,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Increase,
        PrimitiveKind::Decrease,
        PrimitiveKind::Confirm,
        PrimitiveKind::Toggle,
        PrimitiveKind::Cancel,
        PrimitiveKind::NextPage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Increase => "increase",
            PrimitiveKind::Decrease => "decrease",
            PrimitiveKind::Confirm => "confirm",
            PrimitiveKind::Toggle => "toggle",
            PrimitiveKind::Cancel => "cancel",
            PrimitiveKind::NextPage => "next_page",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive plus the pause held after its press and after its release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveEvent {
    pub kind: PrimitiveKind,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay for slider steps.
    pub step_delay_ms: u64,
    /// Delay for every navigation key.
    pub nav_delay_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self { step_delay_ms: 20, nav_delay_ms: 75 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StepSlider { current: i32, target: i32 },
    ConfirmOrAdvance,
    EnterSection,
    LeaveSection,
    NextPage { inside_category: bool },
    ToggleAndAdvance,
}

/// Events for one action, produced on demand.
///
/// A slider run can be long, so its steps are never materialised.
#[derive(Debug, Clone)]
pub enum Encoded {
    Steps(iter::Take<iter::Repeat<PrimitiveEvent>>),
    Keys(vec::IntoIter<PrimitiveEvent>),
}

impl Iterator for Encoded {
    type Item = PrimitiveEvent;

    fn next(&mut self) -> Option<PrimitiveEvent> {
        match self {
            Encoded::Steps(steps) => steps.next(),
            Encoded::Keys(keys) => keys.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Encoded::Steps(steps) => steps.size_hint(),
            Encoded::Keys(keys) => keys.size_hint(),
        }
    }
}

impl ExactSizeIterator for Encoded {}

pub fn encode(action: Action, timing: Timing) -> Encoded {
    let nav = |kind| PrimitiveEvent { kind, delay_ms: timing.nav_delay_ms };

    let keys = match action {
        Action::StepSlider { current, target } => {
            let kind =
                if target > current { PrimitiveKind::Increase } else { PrimitiveKind::Decrease };
            let steps = (i64::from(target) - i64::from(current)).unsigned_abs() as usize;
            let step = PrimitiveEvent { kind, delay_ms: timing.step_delay_ms };
            return Encoded::Steps(iter::repeat(step).take(steps));
        }
        Action::ConfirmOrAdvance => vec![nav(PrimitiveKind::Confirm)],
        Action::EnterSection => vec![nav(PrimitiveKind::Toggle)],
        Action::LeaveSection => vec![nav(PrimitiveKind::Cancel), nav(PrimitiveKind::Confirm)],
        Action::NextPage { inside_category: true } => {
            vec![nav(PrimitiveKind::Cancel), nav(PrimitiveKind::NextPage)]
        }
        Action::NextPage { inside_category: false } => vec![nav(PrimitiveKind::NextPage)],
        Action::ToggleAndAdvance => vec![nav(PrimitiveKind::Toggle), nav(PrimitiveKind::Confirm)],
    };
    Encoded::Keys(keys.into_iter())
}
