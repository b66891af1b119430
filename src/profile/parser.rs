//! INI-style profile parsing.
//!
//! Accepts the dialect the profile templates are written in: `[section]`
//! headers, `key = value` or `key: value` pairs, and `#`/`;` comment lines.
//! Keys are case-insensitive and stored lowercased; section names are kept
//! verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Info, Profile, ProfileError, Section, INFO_SECTION, UNSET, VALUE_MAX};

static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(?P<name>[^\]]+)\]$").expect("valid regex"));

static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<key>[^=:\s][^=:]*?)\s*[=:]\s*(?P<value>.*)$").expect("valid regex")
});

enum Current {
    None,
    Info,
    Attributes(Section),
}

pub fn parse_profile(source: &str) -> Result<Profile, ProfileError> {
    let mut profile = Profile::new();
    let mut info = Info::default();
    let mut seen_info = false;
    let mut current = Current::None;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            let Some(caps) = SECTION_HEADER.captures(line) else {
                return Err(malformed(line_no, format!("invalid section header '{line}'")));
            };
            let name = caps["name"].trim();

            flush(&mut profile, std::mem::replace(&mut current, Current::None));

            if name == INFO_SECTION {
                if seen_info {
                    return Err(malformed(line_no, "duplicate section 'info'".to_string()));
                }
                seen_info = true;
                current = Current::Info;
            } else {
                if profile.section(name).is_some() {
                    return Err(malformed(line_no, format!("duplicate section '{name}'")));
                }
                current = Current::Attributes(Section::new(name));
            }
            continue;
        }

        let Some(caps) = ASSIGNMENT.captures(line) else {
            return Err(malformed(line_no, format!("expected 'key = value', found '{line}'")));
        };
        let key = caps["key"].trim().to_lowercase();
        let value = caps["value"].trim();

        match &mut current {
            Current::None => {
                return Err(malformed(line_no, format!("'{key}' appears before any section")));
            }
            Current::Info => {
                if info.get(&key).is_some() {
                    return Err(malformed(line_no, format!("duplicate key '{key}' in 'info'")));
                }
                info.insert(key, value.trim_matches('"'));
            }
            Current::Attributes(section) => {
                if section.contains(&key) {
                    return Err(malformed(
                        line_no,
                        format!("duplicate key '{key}' in '{}'", section.name()),
                    ));
                }
                let parsed = if value.is_empty() {
                    UNSET
                } else {
                    value.parse::<i32>().map_err(|_| {
                        malformed(line_no, format!("value for '{key}' is not an integer: '{value}'"))
                    })?
                };
                if !(UNSET..=VALUE_MAX).contains(&parsed) {
                    return Err(malformed(
                        line_no,
                        format!("value for '{key}' is outside {UNSET}..={VALUE_MAX}: {parsed}"),
                    ));
                }
                section.set(&key, parsed);
            }
        }
    }

    flush(&mut profile, current);
    profile.info = info;
    Ok(profile)
}

fn flush(profile: &mut Profile, current: Current) {
    if let Current::Attributes(section) = current {
        profile.push_section(section);
    }
}

fn malformed(line: usize, reason: String) -> ProfileError {
    ProfileError::Malformed { line, reason }
}
