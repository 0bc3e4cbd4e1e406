use std::collections::BTreeSet;
use std::io::Write;

use anyhow::Result;
use mei_script::{Arg, CommandRecord, Operation, ScriptHandler};
use serde::Serialize;

/// Asset names referenced across every processed script.
#[derive(Debug, Default, Serialize)]
pub struct AssetCatalog {
    pub outfits: BTreeSet<String>,
    pub backgrounds: BTreeSet<String>,
    pub music: BTreeSet<String>,
    pub sound_effects: BTreeSet<String>,
    pub shaders: BTreeSet<String>,
}

impl AssetCatalog {
    pub fn is_empty(&self) -> bool {
        self.sections().iter().all(|(_, names)| names.is_empty())
    }

    pub fn merge(&mut self, other: AssetCatalog) {
        self.outfits.extend(other.outfits);
        self.backgrounds.extend(other.backgrounds);
        self.music.extend(other.music);
        self.sound_effects.extend(other.sound_effects);
        self.shaders.extend(other.shaders);
    }

    fn sections(&self) -> [(&'static str, &BTreeSet<String>); 5] {
        [
            ("Outfits", &self.outfits),
            ("Backgrounds", &self.backgrounds),
            ("Music", &self.music),
            ("Sound Effects", &self.sound_effects),
            ("Shaders", &self.shaders),
        ]
    }

    pub fn write_text(&self, out: &mut impl Write) -> Result<()> {
        for (idx, (title, names)) in self.sections().into_iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{title}:")?;
            for name in names {
                writeln!(out, "{name}")?;
            }
        }
        Ok(())
    }
}

fn remember(set: &mut BTreeSet<String>, arg: &Arg) {
    if !arg.is_null() {
        set.insert(arg.to_string());
    }
}

impl ScriptHandler for AssetCatalog {
    fn operation(&mut self, _record: &CommandRecord, operation: &Operation) {
        match operation {
            Operation::CharaLoad { chara } => remember(&mut self.outfits, chara),
            Operation::Background { filename } => remember(&mut self.backgrounds, filename),
            Operation::Bgm { filename, .. } => remember(&mut self.music, filename),
            Operation::Se2 { filename, .. } => remember(&mut self.sound_effects, filename),
            Operation::Shader { filename, .. } => remember(&mut self.shaders, filename),
            _ => {}
        }
    }
}
