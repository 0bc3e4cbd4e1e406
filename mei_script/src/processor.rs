use serde::{Serialize, Serializer};

use crate::binder::{bind, CoercionFallback};
use crate::dialogue::{self, DialogueLine};
use crate::discovery::{DiscoveredOpcode, DiscoveryState};
use crate::error::DispatchError;
use crate::operation::Operation;
use crate::record::CommandRecord;
use crate::registry::Opcode;
use crate::script::Script;

/// Receives every record of a run exactly once, in script order.
///
/// `operation`, `dialogue` and `record_failed` fall through to
/// [`ScriptHandler::handle_default`], which does nothing unless overridden.
/// `discovered` is a plain no-op and never reaches `handle_default`.
pub trait ScriptHandler {
    fn operation(&mut self, record: &CommandRecord, operation: &Operation) {
        let _ = operation;
        self.handle_default(record);
    }

    fn dialogue(&mut self, record: &CommandRecord, line: &DialogueLine) {
        let _ = line;
        self.handle_default(record);
    }

    /// First sighting of an unregistered opcode in this run.
    fn discovered(&mut self, record: &CommandRecord, report: &DiscoveredOpcode) {
        let _ = (record, report);
    }

    fn record_failed(&mut self, record: &CommandRecord, error: &DispatchError) {
        let _ = error;
        self.handle_default(record);
    }

    fn handle_default(&mut self, record: &CommandRecord) {
        let _ = record;
    }
}

impl ScriptHandler for () {}

/// How a single record is routed.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Dialogue(DialogueLine),
    Operation {
        operation: Operation,
        fallbacks: Vec<CoercionFallback>,
    },
    Discovered(DiscoveredOpcode),
    Default,
}

/// Route `record`: tagged dialogue, then the registry, then untagged
/// dialogue, then discovery. Only discovery touches `discovery`.
pub fn classify(
    record: &CommandRecord,
    discovery: &mut DiscoveryState,
) -> Result<Dispatch, DispatchError> {
    if let Some(line) = dialogue::detect_tagged(record) {
        return line.map(Dispatch::Dialogue);
    }

    if let Some(opcode) = Opcode::lookup(record.opcode()) {
        let mut binding = bind(opcode, &record.args())?;
        let fallbacks = std::mem::take(&mut binding.fallbacks);
        return Ok(Dispatch::Operation {
            operation: Operation::from_binding(binding),
            fallbacks,
        });
    }

    if let Some(line) = dialogue::detect_untagged(record) {
        return Ok(Dispatch::Dialogue(line));
    }

    Ok(match discovery.observe(record) {
        Some(report) => Dispatch::Discovered(report),
        None => Dispatch::Default,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackEvent {
    pub index: usize,
    #[serde(flatten)]
    pub fallback: CoercionFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    pub index: usize,
    pub opcode: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: DispatchError,
}

fn serialize_display<S: Serializer>(
    error: &DispatchError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome counts and reports for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub records: usize,
    pub dialogue: usize,
    pub operations: usize,
    pub defaults: usize,
    pub discovered: Vec<DiscoveredOpcode>,
    pub coercion_fallbacks: Vec<FallbackEvent>,
    pub failures: Vec<RecordFailure>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run context: owns the discovery state for exactly one script.
pub struct Processor<'h, H: ScriptHandler + ?Sized> {
    handler: &'h mut H,
    discovery: DiscoveryState,
    summary: RunSummary,
}

impl<'h, H: ScriptHandler + ?Sized> Processor<'h, H> {
    pub fn new(handler: &'h mut H) -> Self {
        Self {
            handler,
            discovery: DiscoveryState::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn process(&mut self, record: &CommandRecord) {
        self.summary.records += 1;
        match classify(record, &mut self.discovery) {
            Ok(Dispatch::Dialogue(line)) => {
                self.summary.dialogue += 1;
                self.handler.dialogue(record, &line);
            }
            Ok(Dispatch::Operation {
                operation,
                fallbacks,
            }) => {
                self.summary.operations += 1;
                for fallback in fallbacks {
                    log::warn!(
                        "command #{}: {} parameter `{}` expects {}, keeping raw value {}",
                        record.index(),
                        fallback.opcode,
                        fallback.param,
                        fallback.expected,
                        fallback.value
                    );
                    self.summary.coercion_fallbacks.push(FallbackEvent {
                        index: record.index(),
                        fallback,
                    });
                }
                self.handler.operation(record, &operation);
            }
            Ok(Dispatch::Discovered(report)) => {
                self.handler.discovered(record, &report);
            }
            Ok(Dispatch::Default) => {
                self.summary.defaults += 1;
                self.handler.handle_default(record);
            }
            Err(error) => {
                log::warn!(
                    "command #{} ({}) skipped: {error}",
                    record.index(),
                    record.opcode()
                );
                self.handler.record_failed(record, &error);
                self.summary.failures.push(RecordFailure {
                    index: record.index(),
                    opcode: record.opcode().to_string(),
                    error,
                });
            }
        }
    }

    pub fn finish(self) -> RunSummary {
        let mut summary = self.summary;
        summary.discovered = self.discovery.into_reports();
        log::debug!(
            "processed {} command(s): {} dialogue, {} operation(s), {} default, \
             {} discovered, {} failed",
            summary.records,
            summary.dialogue,
            summary.operations,
            summary.defaults,
            summary.discovered.len(),
            summary.failures.len()
        );
        summary
    }
}

/// Process every record of `script` in order with fresh discovery state.
pub fn run_script<H: ScriptHandler + ?Sized>(script: &Script, handler: &mut H) -> RunSummary {
    let mut processor = Processor::new(handler);
    for record in script {
        processor.process(record);
    }
    processor.finish()
}
