use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::BindError;
use crate::registry::{Opcode, ParamDefault, ParamKind};

/// A bound parameter value.
///
/// Typed parameters hold `Int`/`Float` once coercion succeeds; anything that
/// could not be coerced, and every untyped parameter, stays `Raw`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Arg {
    Int(i64),
    Float(f64),
    Raw(Value),
}

impl Arg {
    pub fn null() -> Self {
        Arg::Raw(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Raw(Value::Null))
    }
}

impl From<ParamDefault> for Arg {
    fn from(value: ParamDefault) -> Self {
        match value {
            ParamDefault::Int(i) => Arg::Int(i),
            ParamDefault::Null => Arg::null(),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(value) => write!(f, "{value}"),
            Arg::Float(value) => write!(f, "{value}"),
            Arg::Raw(Value::String(s)) => f.write_str(s),
            Arg::Raw(other) => write!(f, "{other}"),
        }
    }
}

/// A typed parameter whose raw value was kept because it did not convert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercionFallback {
    pub opcode: Opcode,
    pub param: &'static str,
    pub expected: ParamKind,
    pub value: Value,
}

/// Result of aligning raw arguments with a signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub opcode: Opcode,
    /// One entry per declared parameter, in declaration order.
    pub values: Vec<Arg>,
    pub fallbacks: Vec<CoercionFallback>,
}

/// Bind present arguments positionally to `opcode`'s parameters.
pub fn bind(opcode: Opcode, args: &[&Value]) -> Result<Binding, BindError> {
    let signature = opcode.signature();
    if args.len() > signature.params.len() {
        return Err(BindError::TooManyArguments {
            opcode: signature.handler,
            expected: signature.params.len(),
            supplied: args.len(),
        });
    }

    let mut values = Vec::with_capacity(signature.params.len());
    let mut fallbacks = Vec::new();
    for (position, param) in signature.params.iter().enumerate() {
        let Some(raw) = args.get(position) else {
            let default = param.default.ok_or(BindError::MissingArgument {
                opcode: signature.handler,
                param: param.name,
            })?;
            values.push(Arg::from(default));
            continue;
        };
        match coerce(param.kind, raw) {
            Some(value) => values.push(value),
            None => {
                fallbacks.push(CoercionFallback {
                    opcode,
                    param: param.name,
                    expected: param.kind,
                    value: (*raw).clone(),
                });
                values.push(Arg::Raw((*raw).clone()));
            }
        }
    }

    Ok(Binding {
        opcode,
        values,
        fallbacks,
    })
}

/// Convert `value` to `kind`. `None` means the value does not convert.
pub fn coerce(kind: ParamKind, value: &Value) -> Option<Arg> {
    match kind {
        ParamKind::Any => Some(Arg::Raw(value.clone())),
        ParamKind::Int => coerce_int(value).map(Arg::Int),
        ParamKind::Float => coerce_float(value).map(Arg::Float),
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.trunc().abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::Bool(flag) => Some(i64::from(*flag)),
        Value::String(text) => ascii_numeral(text).parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => ascii_numeral(text).parse::<f64>().ok(),
        _ => None,
    }
}

/// Fold full-width digits, signs and the full-width period to ASCII.
fn ascii_numeral(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '－' | '−' => '-',
            '＋' => '+',
            '．' => '.',
            _ => c,
        })
        .collect()
}
