use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a script from being loaded at all.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("script is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error("expected \"{field}\" field in script document")]
    MissingContainer { field: &'static str },
    #[error("\"{field}\" must hold an array of commands")]
    ContainerNotArray { field: &'static str },
    #[error("command #{index} is not a JSON object")]
    RecordNotObject { index: usize },
    #[error("command #{index} has neither a cmd0 nor a cmd1 opcode")]
    MissingOpcode { index: usize },
    #[error("command #{index} stores a non-string opcode in {key}")]
    OpcodeNotString { index: usize, key: &'static str },
}

/// Raised when a record's arguments do not fit the registered signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("{opcode} takes at most {expected} argument(s) but {supplied} were supplied")]
    TooManyArguments {
        opcode: &'static str,
        expected: usize,
        supplied: usize,
    },
    #[error("{opcode} is missing required argument `{param}`")]
    MissingArgument {
        opcode: &'static str,
        param: &'static str,
    },
}

/// Per-record failure; the processor reports it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("dialogue for speaker {speaker:?} has no text in arg1")]
    MissingDialogueText { speaker: String },
}
