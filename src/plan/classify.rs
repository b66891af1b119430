//! Attribute classification by naming convention.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// `*edit*`: a toggle that unlocks the secondary section after it.
    Toggle,
    /// `*closed*`: an on/off flag that excludes the rows around it.
    ExclusiveFlag,
    /// `*preset*`: informational only, never slid.
    Preset,
    /// A numeric slider.
    Ordinary,
}

/// Checked in order, so `preset_edit` is a toggle.
pub fn classify(name: &str) -> AttributeKind {
    if name.contains("edit") {
        AttributeKind::Toggle
    } else if name.contains("closed") {
        AttributeKind::ExclusiveFlag
    } else if name.contains("preset") {
        AttributeKind::Preset
    } else {
        AttributeKind::Ordinary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_conventions() {
        assert_eq!(classify("eyebrow_edit"), AttributeKind::Toggle);
        assert_eq!(classify("eyes_closed"), AttributeKind::ExclusiveFlag);
        assert_eq!(classify("nose_preset"), AttributeKind::Preset);
        assert_eq!(classify("body_height"), AttributeKind::Ordinary);
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify("preset_edit"), AttributeKind::Toggle);
        assert_eq!(classify("closed_preset"), AttributeKind::ExclusiveFlag);
    }
}
