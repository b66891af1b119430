//! Character profiles
//!
//! A profile is an ordered list of sections, each an ordered list of integer
//! attributes, plus a free-form `info` section of strings. Declaration order is
//! the editor's menu order, so nothing here ever re-sorts.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod parser;

/// Value a profile uses for "no value given".
pub const UNSET: i32 = -200;

/// Largest value any editor slider accepts.
pub const VALUE_MAX: i32 = 400;

/// Name of the metadata section.
pub const INFO_SECTION: &str = "info";

/// Suffix marking a secondary section.
pub const SECONDARY_SUFFIX: &str = "_2";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("malformed profile at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("failed reading profile {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Metadata fields from the `info` section, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    fields: Vec<(String, String)>,
}

impl Info {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }
}

/// One navigable category of the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    attributes: Vec<(String, i32)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Vec::new() }
    }

    /// Builder-style helper, mostly for tests.
    pub fn with(mut self, attribute: &str, value: i32) -> Self {
        self.set(attribute, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, attribute: &str) -> Option<i32> {
        self.attributes.iter().find(|(k, _)| k == attribute).map(|(_, v)| *v)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.get(attribute).is_some()
    }

    /// Overwrite an attribute in place, or append it if new.
    pub fn set(&mut self, attribute: &str, value: i32) {
        match self.attributes.iter_mut().find(|(k, _)| k == attribute) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((attribute.to_string(), value)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(k, _)| k.as_str())
    }
}

/// `<page>_<category>[_2]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionName<'a> {
    pub page: &'a str,
    pub secondary: bool,
}

impl<'a> SectionName<'a> {
    pub fn parse(name: &'a str) -> Self {
        let page = name.split('_').next().unwrap_or(name);
        Self { page, secondary: name.ends_with(SECONDARY_SUFFIX) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub info: Info,
    sections: Vec<Section>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(source: &str) -> Result<Self, ProfileError> {
        parser::parse_profile(source)
    }

    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ProfileError::Io { path: path.to_path_buf(), source })?;
        let profile = Self::parse(&content)?;
        tracing::debug!(
            "Loaded profile {} ({} sections)",
            path.display(),
            profile.sections.len()
        );
        Ok(profile)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Append a section, replacing any existing section of the same name in place.
    pub fn push_section(&mut self, section: Section) {
        match self.sections.iter_mut().find(|s| s.name == section.name) {
            Some(slot) => *slot = section,
            None => self.sections.push(section),
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.push_section(section);
        self
    }
}
