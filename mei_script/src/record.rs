use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ScriptError;

/// Key of the opcode slot consulted first.
pub const PRIMARY_OPCODE_KEY: &str = "cmd0";
/// Key of the fallback opcode slot.
pub const SECONDARY_OPCODE_KEY: &str = "cmd1";
/// Argument positions scanned per record (`arg0`..`arg9`).
pub const ARG_SLOTS: usize = 10;

const ARG_KEYS: [&str; ARG_SLOTS] = [
    "arg0", "arg1", "arg2", "arg3", "arg4", "arg5", "arg6", "arg7", "arg8", "arg9",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpcodeSlot {
    Primary,
    Secondary,
}

impl OpcodeSlot {
    pub fn key(self) -> &'static str {
        match self {
            OpcodeSlot::Primary => PRIMARY_OPCODE_KEY,
            OpcodeSlot::Secondary => SECONDARY_OPCODE_KEY,
        }
    }
}

/// One entry of a script's command list.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRecord {
    index: usize,
    opcode: String,
    slot: OpcodeSlot,
    args: [Option<Value>; ARG_SLOTS],
    raw: Map<String, Value>,
}

impl CommandRecord {
    /// Extract the opcode and argument slots from the `index`-th raw command.
    pub fn from_value(index: usize, value: &Value) -> Result<Self, ScriptError> {
        let raw = value
            .as_object()
            .ok_or(ScriptError::RecordNotObject { index })?;
        Self::from_map(index, raw.clone())
    }

    pub fn from_map(index: usize, raw: Map<String, Value>) -> Result<Self, ScriptError> {
        let (slot, opcode_value) = [OpcodeSlot::Primary, OpcodeSlot::Secondary]
            .into_iter()
            .find_map(|slot| raw.get(slot.key()).map(|value| (slot, value)))
            .ok_or(ScriptError::MissingOpcode { index })?;
        let opcode = opcode_value
            .as_str()
            .ok_or(ScriptError::OpcodeNotString {
                index,
                key: slot.key(),
            })?
            .to_string();

        if slot == OpcodeSlot::Primary && raw.contains_key(SECONDARY_OPCODE_KEY) {
            log::debug!(
                "command #{index} populates both opcode slots; using {PRIMARY_OPCODE_KEY}"
            );
        }

        let args = std::array::from_fn(|position| raw.get(ARG_KEYS[position]).cloned());
        Ok(Self {
            index,
            opcode,
            slot,
            args,
            raw,
        })
    }

    /// Position of this record within its script.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn opcode(&self) -> &str {
        &self.opcode
    }

    pub fn slot(&self) -> OpcodeSlot {
        self.slot
    }

    pub fn arg(&self, position: usize) -> Option<&Value> {
        self.args.get(position).and_then(Option::as_ref)
    }

    pub fn has_arg(&self, position: usize) -> bool {
        self.arg(position).is_some()
    }

    /// Present arguments with their slot positions, ascending. Gaps are skipped.
    pub fn positioned_args(&self) -> impl Iterator<Item = (usize, &Value)> + '_ {
        self.args
            .iter()
            .enumerate()
            .filter_map(|(position, value)| value.as_ref().map(|value| (position, value)))
    }

    /// Present argument values in slot order, gaps removed.
    pub fn args(&self) -> Vec<&Value> {
        self.positioned_args().map(|(_, value)| value).collect()
    }

    /// The command object exactly as it appeared in the script.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}
