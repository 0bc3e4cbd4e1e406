use std::{collections::HashMap, fs, path::Path};

use anyhow::{Context, Result};
use mei_script::{Speaker, SpeakerTag};

const BUILTIN_NAMES: &[(&str, &str)] = &[
    ("千雨", "Chisame"),
    ("一穂", "Kazuho"),
    ("梨花", "Rika"),
    ("羽入", "Hanyuu"),
    ("魅音", "Mion"),
    ("美雪", "Miyuki"),
    ("沙都子", "Satoko"),
    ("悟史", "Satoshi"),
    ("夏美", "Natsumi"),
    ("レナ", "Rena"),
    ("菜央", "Nao"),
    ("私服", "Casual"),
];

const NARRATION_LABEL: &str = "System:";

/// Source-language speaker and outfit names mapped to display names.
#[derive(Debug, Clone)]
pub struct NameTable {
    names: HashMap<String, String>,
}

impl Default for NameTable {
    fn default() -> Self {
        Self {
            names: BUILTIN_NAMES
                .iter()
                .map(|(source, target)| (source.to_string(), target.to_string()))
                .collect(),
        }
    }
}

impl NameTable {
    /// Built-in table, extended by a flat JSON object of overrides when given.
    pub fn from_json_file(path: Option<&Path>) -> Result<Self> {
        let mut table = NameTable::default();
        if let Some(p) = path {
            let raw = fs::read_to_string(p)
                .with_context(|| format!("failed to read name table: {}", p.display()))?;
            let overrides: HashMap<String, String> = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse name table json: {}", p.display()))?;
            log::debug!("loaded {} name override(s) from {}", overrides.len(), p.display());
            table.names.extend(overrides);
        }
        Ok(table)
    }

    /// Display name for `source`, or `source` itself when unknown.
    pub fn translate<'a>(&'a self, source: &'a str) -> &'a str {
        self.names.get(source).map(String::as_str).unwrap_or(source)
    }

    pub fn render_speaker(&self, speaker: &Speaker) -> String {
        match speaker {
            Speaker::Tagged(label) if SpeakerTag::is_narration(label) => {
                NARRATION_LABEL.to_string()
            }
            Speaker::Tagged(label) => {
                let tag = SpeakerTag::parse(label);
                let name = self.translate(tag.name);
                match tag.qualifier {
                    Some(outfit) => format!("= {name} ({}) =", self.translate(outfit)),
                    None => format!("= {name} ="),
                }
            }
            Speaker::Untagged(label) => format!("= {label} ="),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn renders_tagged_speakers() {
        let table = NameTable::default();
        let render = |label: &str| table.render_speaker(&Speaker::Tagged(label.to_string()));
        assert_eq!(render("："), "System:");
        assert_eq!(render("梨花：私服"), "= Rika (Casual) =");
        assert_eq!(render("梨花："), "= Rika =");
        assert_eq!(render("赤坂：スーツ"), "= 赤坂 (スーツ) =");
    }

    #[test]
    fn untagged_speakers_stay_raw() {
        let table = NameTable::default();
        assert_eq!(
            table.render_speaker(&Speaker::Untagged("梨花".to_string())),
            "= 梨花 ="
        );
    }

    #[test]
    fn overrides_extend_builtin_table() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"赤坂": "Akasaka", "梨花": "Rika-chan"}}"#)?;
        let table = NameTable::from_json_file(Some(file.path()))?;
        assert_eq!(table.translate("赤坂"), "Akasaka");
        assert_eq!(table.translate("梨花"), "Rika-chan");
        assert_eq!(table.translate("魅音"), "Mion");
        Ok(())
    }

    #[test]
    fn rejects_non_string_overrides() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"赤坂": 3}}"#)?;
        let err = NameTable::from_json_file(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse name table json"));
        Ok(())
    }
}
