use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::record::CommandRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedArg {
    pub position: usize,
    pub value: Value,
}

impl ObservedArg {
    pub fn placeholder(&self) -> String {
        format!("arg{}", self.position)
    }
}

/// Best-effort signature for an opcode the registry does not know.
///
/// Placeholders are named after the argument slot the value came from. The
/// observed values are a hint of shape only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveredOpcode {
    pub opcode: String,
    /// Index of the first record that used the opcode.
    pub first_index: usize,
    pub observed: Vec<ObservedArg>,
}

impl DiscoveredOpcode {
    pub fn from_record(record: &CommandRecord) -> Self {
        Self {
            opcode: record.opcode().to_string(),
            first_index: record.index(),
            observed: record
                .positioned_args()
                .map(|(position, value)| ObservedArg {
                    position,
                    value: value.clone(),
                })
                .collect(),
        }
    }

    pub fn arity(&self) -> usize {
        self.observed.len()
    }
}

impl fmt::Display for DiscoveredOpcode {
    /// `foo(raw, cmd, arg0, arg2) // observed: "bar", 3`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(raw, cmd", self.opcode)?;
        for arg in &self.observed {
            write!(f, ", {}", arg.placeholder())?;
        }
        f.write_str(")")?;
        if !self.observed.is_empty() {
            let hint = self
                .observed
                .iter()
                .map(|arg| arg.value.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " // observed: {hint}")?;
        }
        Ok(())
    }
}

/// Unknown opcodes reported so far in one run, in first-occurrence order.
#[derive(Debug, Default)]
pub struct DiscoveryState {
    seen: HashSet<String>,
    reports: Vec<DiscoveredOpcode>,
}

impl DiscoveryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `record`'s opcode on its first sighting; `None` afterwards.
    pub fn observe(&mut self, record: &CommandRecord) -> Option<DiscoveredOpcode> {
        if self.seen.contains(record.opcode()) {
            return None;
        }
        self.seen.insert(record.opcode().to_string());
        let report = DiscoveredOpcode::from_record(record);
        log::debug!(
            "discovered unknown opcode {:?} at command #{} with {} argument(s)",
            report.opcode,
            report.first_index,
            report.arity()
        );
        self.reports.push(report.clone());
        Some(report)
    }

    pub fn reports(&self) -> &[DiscoveredOpcode] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<DiscoveredOpcode> {
        self.reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(index: usize, value: Value) -> CommandRecord {
        CommandRecord::from_value(index, &value).expect("record")
    }

    #[test]
    fn reports_each_name_once_in_first_occurrence_order() {
        let mut state = DiscoveryState::new();
        let first = state.observe(&record(0, json!({"cmd0": "foo", "arg0": "bar"})));
        assert!(first.is_some());
        assert!(state
            .observe(&record(1, json!({"cmd0": "foo", "arg0": "baz"})))
            .is_none());
        assert!(state.observe(&record(2, json!({"cmd0": "qux"}))).is_some());
        assert!(state
            .observe(&record(3, json!({"cmd0": "foo"})))
            .is_none());

        let names: Vec<&str> = state.reports().iter().map(|r| r.opcode.as_str()).collect();
        assert_eq!(names, vec!["foo", "qux"]);
        assert_eq!(state.reports()[0].observed[0].value, json!("bar"));
    }

    #[test]
    fn stub_uses_positional_placeholders() {
        let report = DiscoveredOpcode::from_record(&record(
            4,
            json!({"cmd1": "flash", "arg0": "white", "arg2": 30}),
        ));
        assert_eq!(
            report.to_string(),
            r#"flash(raw, cmd, arg0, arg2) // observed: "white", 30"#
        );
        let bare = DiscoveredOpcode::from_record(&record(5, json!({"cmd1": "clear"})));
        assert_eq!(bare.to_string(), "clear(raw, cmd)");
    }
}
