use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::ScriptError;
use crate::record::CommandRecord;

/// Top-level field holding the command list.
pub const CONTAINER_FIELD: &str = "scr";

/// A fully validated command list, loaded in one piece.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    records: Vec<CommandRecord>,
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let bytes = fs::read(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ScriptError> {
        let document: Value = serde_json::from_slice(bytes)?;
        Self::from_value(document)
    }

    /// Either every record extracts cleanly or nothing is returned.
    pub fn from_value(document: Value) -> Result<Self, ScriptError> {
        let Value::Object(mut fields) = document else {
            return Err(ScriptError::MissingContainer {
                field: CONTAINER_FIELD,
            });
        };
        let container = fields
            .remove(CONTAINER_FIELD)
            .ok_or(ScriptError::MissingContainer {
                field: CONTAINER_FIELD,
            })?;
        let Value::Array(entries) = container else {
            return Err(ScriptError::ContainerNotArray {
                field: CONTAINER_FIELD,
            });
        };

        let records = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(map) => CommandRecord::from_map(index, map),
                _ => Err(ScriptError::RecordNotObject { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a CommandRecord;
    type IntoIter = std::slice::Iter<'a, CommandRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
