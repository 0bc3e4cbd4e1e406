//! Interpreter core for compiled scenario command streams.
//!
//! A script is a JSON document whose `scr` array holds command records. Each
//! record names an operation in `cmd0` or `cmd1` and carries sparse arguments
//! in `arg0`..`arg9`. The [`processor`] walks the records in order and hands
//! every one of them to a [`ScriptHandler`] as dialogue, a typed
//! [`Operation`], a first-sighting [`DiscoveredOpcode`] report, or the default
//! no-op.

pub mod binder;
pub mod dialogue;
pub mod discovery;
pub mod error;
pub mod operation;
pub mod processor;
pub mod record;
pub mod registry;
pub mod script;

pub use binder::{bind, coerce, Arg, Binding, CoercionFallback};
pub use dialogue::{DialogueLine, Speaker, SpeakerTag, SPEAKER_SEPARATOR};
pub use discovery::{DiscoveredOpcode, DiscoveryState, ObservedArg};
pub use error::{BindError, DispatchError, ScriptError};
pub use operation::Operation;
pub use processor::{
    classify, run_script, Dispatch, FallbackEvent, Processor, RecordFailure, RunSummary,
    ScriptHandler,
};
pub use record::{CommandRecord, OpcodeSlot, ARG_SLOTS};
pub use registry::{Opcode, Param, ParamDefault, ParamKind, Signature};
pub use script::{Script, CONTAINER_FIELD};
