//! Untyped step descriptors as supplied by a preset catalog, and the typed
//! parameter reader that turns them into step records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LutError, Result};

/// A single parameter value. Catalogs only ever carry numbers and flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One pipeline step as written in a preset: a step-type identifier plus
/// named parameters.
///
/// In JSON the identifier lives under `"type"` and parameters sit beside it:
/// `{"type": "exposure", "gamma": 1.35}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, ParamValue>,
}

impl StepDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder-style parameter insertion, mostly for tests and programmatic presets.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Typed access to a descriptor's parameters on behalf of one step type.
///
/// Records which names were read so that leftovers can be reported once
/// parsing finishes.
pub(crate) struct Params<'a> {
    step: &'static str,
    values: &'a BTreeMap<String, ParamValue>,
    consumed: Vec<&'static str>,
}

impl<'a> Params<'a> {
    pub(crate) fn new(step: &'static str, values: &'a BTreeMap<String, ParamValue>) -> Self {
        Self {
            step,
            values,
            consumed: Vec::new(),
        }
    }

    fn lookup(&mut self, name: &'static str) -> Option<ParamValue> {
        self.consumed.push(name);
        self.values.get(name).copied()
    }

    fn invalid(&self, name: &str, reason: impl Into<String>) -> LutError {
        LutError::InvalidParameter {
            step: self.step,
            param: name.to_string(),
            reason: reason.into(),
        }
    }

    fn expect_number(&self, name: &'static str, value: ParamValue) -> Result<f64> {
        match value {
            ParamValue::Number(n) if n.is_finite() => Ok(n),
            ParamValue::Number(n) => Err(self.invalid(name, format!("{n} is not finite"))),
            ParamValue::Bool(_) => Err(self.invalid(name, "expected a number, found a boolean")),
        }
    }

    /// A required numeric parameter.
    pub(crate) fn number(&mut self, name: &'static str) -> Result<f64> {
        match self.lookup(name) {
            Some(value) => self.expect_number(name, value),
            None => Err(LutError::MissingParameter {
                step: self.step,
                param: name,
            }),
        }
    }

    /// An optional numeric parameter with a default.
    pub(crate) fn number_or(&mut self, name: &'static str, default: f64) -> Result<f64> {
        match self.lookup(name) {
            Some(value) => self.expect_number(name, value),
            None => Ok(default),
        }
    }

    /// An optional boolean parameter with a default.
    pub(crate) fn flag_or(&mut self, name: &'static str, default: bool) -> Result<bool> {
        match self.lookup(name) {
            Some(ParamValue::Bool(b)) => Ok(b),
            Some(ParamValue::Number(_)) => {
                Err(self.invalid(name, "expected a boolean, found a number"))
            }
            None => Ok(default),
        }
    }

    /// Reject a parameter combination that no step could evaluate sensibly.
    pub(crate) fn ensure(&self, ok: bool, name: &'static str, reason: &str) -> Result<()> {
        if ok { Ok(()) } else { Err(self.invalid(name, reason)) }
    }

    /// Warn about parameters the step type never asked for.
    pub(crate) fn finish(self) {
        for name in self.values.keys() {
            if !self.consumed.iter().any(|c| *c == name.as_str()) {
                tracing::warn!(step = self.step, param = %name, "ignoring unrecognized step parameter");
            }
        }
    }
}
