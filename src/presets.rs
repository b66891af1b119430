//! Template catalog: one Markdown bullet per template profile in a directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::profile::Profile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetEntry {
    pub path: PathBuf,
    pub name: String,
    pub author: String,
    pub source: String,
}

impl PresetEntry {
    /// `- {name} by [{author}]({source})`, with the author shortened to the
    /// last segment of its profile URL.
    pub fn to_markdown(&self) -> String {
        let author = self.author.trim_end_matches('/').rsplit('/').next().unwrap_or(&self.author);
        format!("- {} by [{}]({})", self.name, author, self.source)
    }
}

/// Every `.ini` directly inside `dir`, sorted by file name.
pub fn collect_presets(dir: &Path) -> Result<Vec<PresetEntry>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("ini"))
        })
        .collect();
    paths.sort();

    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let profile = match Profile::load(&path) {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!("Skipping template {}: {}", path.display(), err);
                continue;
            }
        };
        let field = |key: &str| -> Result<String> {
            profile
                .info
                .get(key)
                .map(str::to_string)
                .with_context(|| format!("Template {} has no info.{}", path.display(), key))
        };
        entries.push(PresetEntry {
            name: field("name")?,
            author: field("author")?,
            source: field("source")?,
            path: path.clone(),
        });
    }
    Ok(entries)
}

pub fn render_catalog(entries: &[PresetEntry]) -> String {
    entries.iter().map(|entry| format!("{}\n", entry.to_markdown())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_markdown_uses_last_author_segment() {
        let entry = PresetEntry {
            path: PathBuf::from("x.ini"),
            name: "Sharp Ranger".to_string(),
            author: "https://example.com/users/kaya/".to_string(),
            source: "https://example.com/p/1".to_string(),
        };
        assert_eq!(entry.to_markdown(), "- Sharp Ranger by [kaya](https://example.com/p/1)");
    }

    #[test]
    fn test_collect_presets_sorted_and_filtered() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("b.ini"),
            "[info]\nname = \"Beta\"\nauthor = \"https://x.io/u/bo\"\nsource = \"https://x.io/s/2\"\n",
        )
        .expect("write");
        fs::write(
            tmp.path().join("a.ini"),
            "[info]\nname = Alpha\nauthor = https://x.io/u/al\nsource = https://x.io/s/1\n[body_body]\nheight = 3\n",
        )
        .expect("write");
        fs::write(tmp.path().join("notes.md"), "ignored").expect("write");

        let entries = collect_presets(tmp.path()).expect("collect");
        assert_eq!(
            render_catalog(&entries),
            "- Alpha by [al](https://x.io/s/1)\n- Beta by [bo](https://x.io/s/2)\n"
        );
    }

    #[test]
    fn test_collect_presets_skips_unreadable_template() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("a.ini"),
            "[info]\nname = Alpha\nauthor = https://x.io/u/al\nsource = https://x.io/s/1\n",
        )
        .expect("write");
        fs::write(
            tmp.path().join("b.ini"),
            "[info]\nname = Beta\nauthor = https://x.io/u/bo\nsource = https://x.io/s/2\n[body_body]\nheight = tall\n",
        )
        .expect("write");

        let entries = collect_presets(tmp.path()).expect("collect");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Alpha");
    }

    #[test]
    fn test_collect_presets_requires_info_fields() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("a.ini"), "[info]\nname = Alpha\n").expect("write");
        let err = collect_presets(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("info.author"));
    }
}
