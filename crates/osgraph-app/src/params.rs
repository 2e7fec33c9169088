//! # Parameter Resolver
//!
//! Turns a template's declared parameter list plus a concrete target into
//! the list sent to the execution service.
//!
//! Resolution is by parameter name:
//!
//! | name | value |
//! |------|-------|
//! | `start_timestamp` | now minus 120 calendar months, epoch seconds |
//! | `end_timestamp` | now, epoch seconds |
//! | anything else | stored default if non-blank, otherwise the target |
//!
//! Output always has the same length and order as the input.

use chrono::{DateTime, Months, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use crate::clock::Clock;
use crate::errors::ResolveError;
use crate::types::{ParameterSpec, ParameterValue, ResolvedParameter};

/// Parameter computed as the start of the rolling window.
pub const START_TIMESTAMP: &str = "start_timestamp";
/// Parameter computed as the end of the rolling window.
pub const END_TIMESTAMP: &str = "end_timestamp";
/// Length of the rolling window.
pub const WINDOW_MONTHS: u32 = 120;

/// Resolve `specs` against `target` using `clock` for the time window.
pub fn resolve(specs: &[ParameterSpec], target: &str, clock: &dyn Clock) -> Vec<ResolvedParameter> {
    resolve_at(specs, target, clock.now())
}

/// Resolve `specs` against `target` at a fixed instant.
pub fn resolve_at(specs: &[ParameterSpec], target: &str, now: DateTime<Utc>) -> Vec<ResolvedParameter> {
    specs
        .iter()
        .map(|spec| ResolvedParameter {
            parameter_name: spec.parameter_name.clone(),
            parameter_value: value_for(spec, target, now),
            value_type: spec.value_type.clone(),
        })
        .collect()
}

fn value_for(spec: &ParameterSpec, target: &str, now: DateTime<Utc>) -> ParameterValue {
    match spec.parameter_name.as_str() {
        START_TIMESTAMP => ParameterValue::Integer(window_start(now).timestamp()),
        END_TIMESTAMP => ParameterValue::Integer(now.timestamp()),
        _ => match &spec.parameter_value {
            Some(stored) if !stored.is_blank() => stored.clone(),
            _ => ParameterValue::Text(target.to_string()),
        },
    }
}

fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(WINDOW_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Comma-joined resolved values, used by hosts as a cache/display key.
#[must_use]
pub fn joined_values(resolved: &[ResolvedParameter]) -> String {
    resolved
        .iter()
        .map(|p| p.parameter_value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Map parameter name → value, in list order. Later duplicates win.
#[must_use]
pub fn property_map(resolved: &[ResolvedParameter]) -> IndexMap<String, ParameterValue> {
    resolved
        .iter()
        .map(|p| (p.parameter_name.clone(), p.parameter_value.clone()))
        .collect()
}

/// Like [`property_map`] for a parameter list that arrived untyped from a host.
///
/// # Errors
///
/// Fails with [`ResolveError::NotASequence`] unless `raw` is a JSON array, and
/// with [`ResolveError::MalformedParameter`] if an entry is not a parameter.
pub fn property_map_from_value(raw: &Value) -> Result<IndexMap<String, ParameterValue>, ResolveError> {
    let Value::Array(items) = raw else {
        return Err(ResolveError::NotASequence {
            found: json_kind(raw),
        });
    };

    let resolved = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<ResolvedParameter>(item.clone()).map_err(|e| {
                ResolveError::MalformedParameter {
                    index,
                    reason: e.to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(property_map(&resolved))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
