use std::io::Write;

use anyhow::Result;
use mei_script::{CommandRecord, DialogueLine, ScriptHandler};
use serde::Serialize;
use serde_json::Value;

use crate::names::NameTable;

/// One spoken line; `index` is the command's position in its script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueRow {
    pub index: usize,
    pub speaker: String,
    pub raw_speaker: String,
    pub text: Value,
}

impl DialogueRow {
    pub fn text(&self) -> String {
        match &self.text {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileLines {
    pub file: String,
    pub lines: Vec<DialogueRow>,
}

pub struct LineExtractor<'n> {
    names: &'n NameTable,
    rows: Vec<DialogueRow>,
}

impl<'n> LineExtractor<'n> {
    pub fn new(names: &'n NameTable) -> Self {
        Self {
            names,
            rows: Vec::new(),
        }
    }

    pub fn into_rows(self) -> Vec<DialogueRow> {
        self.rows
    }
}

impl ScriptHandler for LineExtractor<'_> {
    fn dialogue(&mut self, record: &CommandRecord, line: &DialogueLine) {
        self.rows.push(DialogueRow {
            index: record.index(),
            speaker: self.names.render_speaker(&line.speaker),
            raw_speaker: line.speaker.label().to_string(),
            text: line.text.clone(),
        });
    }
}

/// `<index>:\n<speaker>\n<text>\n\n` per row, after the script path.
pub fn write_text(out: &mut impl Write, file: &str, rows: &[DialogueRow]) -> Result<()> {
    writeln!(out, "{file}")?;
    for row in rows {
        writeln!(out, "{}:\n{}", row.index, row.speaker)?;
        writeln!(out, "{}", row.text())?;
        writeln!(out)?;
    }
    Ok(())
}
