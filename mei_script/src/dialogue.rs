//! Dialogue detection.
//!
//! The scenario compiler reuses the opcode field as the speaker tag for
//! spoken lines. A full-width colon joins the speaker with an optional outfit
//! qualifier (`梨花：私服`), and a bare `：` marks narration. Lines without an
//! explicit speaker are recognisable only by an `arg1` with no `arg0`.

use serde::Serialize;
use serde_json::Value;

use crate::error::DispatchError;
use crate::record::CommandRecord;

/// Joins a speaker name and its qualifier inside an opcode name.
pub const SPEAKER_SEPARATOR: char = '：';

const TEXT_POSITION: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum Speaker {
    /// Opcode name containing the separator.
    Tagged(String),
    /// Unregistered opcode name used verbatim.
    Untagged(String),
}

impl Speaker {
    pub fn label(&self) -> &str {
        match self {
            Speaker::Tagged(label) | Speaker::Untagged(label) => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueLine {
    pub speaker: Speaker,
    pub text: Value,
}

/// Speaker name and outfit qualifier split out of a tagged label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakerTag<'a> {
    pub name: &'a str,
    pub qualifier: Option<&'a str>,
}

impl<'a> SpeakerTag<'a> {
    /// Split at the first separator. An empty qualifier counts as absent.
    pub fn parse(label: &'a str) -> Self {
        match label.split_once(SPEAKER_SEPARATOR) {
            Some((name, qualifier)) => SpeakerTag {
                name,
                qualifier: (!qualifier.is_empty()).then_some(qualifier),
            },
            None => SpeakerTag {
                name: label,
                qualifier: None,
            },
        }
    }

    /// Narration marker: a label consisting of the separator alone.
    pub fn is_narration(label: &str) -> bool {
        label.len() == SPEAKER_SEPARATOR.len_utf8() && label.starts_with(SPEAKER_SEPARATOR)
    }
}

pub fn is_speaker_tag(opcode: &str) -> bool {
    opcode.contains(SPEAKER_SEPARATOR)
}

/// Rule consulted before the registry.
pub fn detect_tagged(record: &CommandRecord) -> Option<Result<DialogueLine, DispatchError>> {
    if !is_speaker_tag(record.opcode()) {
        return None;
    }
    let speaker = Speaker::Tagged(record.opcode().to_string());
    Some(
        record
            .arg(TEXT_POSITION)
            .map(|text| DialogueLine {
                speaker,
                text: text.clone(),
            })
            .ok_or_else(|| DispatchError::MissingDialogueText {
                speaker: record.opcode().to_string(),
            }),
    )
}

/// Rule consulted after a registry miss: `arg1` present, `arg0` absent.
pub fn detect_untagged(record: &CommandRecord) -> Option<DialogueLine> {
    if record.has_arg(0) {
        return None;
    }
    record.arg(TEXT_POSITION).map(|text| DialogueLine {
        speaker: Speaker::Untagged(record.opcode().to_string()),
        text: text.clone(),
    })
}
