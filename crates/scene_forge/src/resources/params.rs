//! Untyped descriptor parameters and the validating reader that turns them
//! into typed construction parameters.
//!
//! Descriptors arrive as a flat `name -> value` map (from code, RON or TOML).
//! Each constructor reads the fields it knows through a [`ParamReader`], which
//! applies defaults, checks the semantic type of every supplied value, and
//! finally rejects any field the constructor did not consume.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Upper bound on any segment count; keeps generated meshes within `u32` indices
pub const MAX_SEGMENTS: u32 = 1024;

/// A single descriptor parameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Any number; integers and colors are validated on read
    Number(f64),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Number(_) => "number",
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Number(value as f64)
    }
}

/// Descriptor parameter map. Ordered so error reporting is deterministic.
pub type Params = BTreeMap<String, ParamValue>;

/// Reads typed fields out of a [`Params`] map on behalf of one tag
pub struct ParamReader<'a> {
    tag: &'static str,
    params: &'a Params,
    consumed: BTreeSet<&'static str>,
}

impl<'a> ParamReader<'a> {
    /// Start reading `params` for the constructor of `tag`
    pub fn new(tag: &'static str, params: &'a Params) -> Self {
        Self {
            tag,
            params,
            consumed: BTreeSet::new(),
        }
    }

    fn error(&self, field: &str, reason: impl Into<String>) -> EngineError {
        EngineError::config(self.tag, field, reason)
    }

    fn raw(&mut self, field: &'static str) -> Option<ParamValue> {
        self.consumed.insert(field);
        self.params.get(field).copied()
    }

    /// Finite number, `default` when absent
    pub fn number(&mut self, field: &'static str, default: f64) -> Result<f64> {
        match self.raw(field) {
            None => Ok(default),
            Some(ParamValue::Number(n)) if n.is_finite() => Ok(n),
            Some(ParamValue::Number(_)) => Err(self.error(field, "must be a finite number")),
            Some(other) => Err(self.error(field, format!("expected a number, found {}", other.kind()))),
        }
    }

    /// Number with an inclusive lower bound
    pub fn at_least(&mut self, field: &'static str, default: f64, min: f64) -> Result<f32> {
        let value = self.number(field, default)?;
        if value < min {
            return Err(self.error(field, format!("must be >= {min}, got {value}")));
        }
        Ok(value as f32)
    }

    /// Finite, non-negative length
    pub fn length(&mut self, field: &'static str, default: f64) -> Result<f32> {
        self.at_least(field, default, 0.0)
    }

    /// Strictly positive number
    pub fn positive(&mut self, field: &'static str, default: f64) -> Result<f32> {
        let value = self.number(field, default)?;
        if value <= 0.0 {
            return Err(self.error(field, format!("must be > 0, got {value}")));
        }
        Ok(value as f32)
    }

    /// Number within `[0, 1]`
    pub fn unit_interval(&mut self, field: &'static str, default: f64) -> Result<f32> {
        let value = self.number(field, default)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(self.error(field, format!("must be within [0, 1], got {value}")));
        }
        Ok(value as f32)
    }

    /// Segment count: a whole number in `min..=MAX_SEGMENTS`
    pub fn segments(&mut self, field: &'static str, default: u32, min: u32) -> Result<u32> {
        self.count(field, default, min, MAX_SEGMENTS)
    }

    /// Whole number in `min..=max`
    pub fn count(&mut self, field: &'static str, default: u32, min: u32, max: u32) -> Result<u32> {
        let value = self.number(field, f64::from(default))?;
        if value.fract() != 0.0 || value < f64::from(min) || value > f64::from(max) {
            return Err(self.error(field, format!("must be a whole number in {min}..={max}, got {value}")));
        }
        Ok(value as u32)
    }

    /// Boolean flag, `default` when absent
    pub fn flag(&mut self, field: &'static str, default: bool) -> Result<bool> {
        match self.raw(field) {
            None => Ok(default),
            Some(ParamValue::Bool(b)) => Ok(b),
            Some(other) => Err(self.error(field, format!("expected a bool, found {}", other.kind()))),
        }
    }

    /// `0xRRGGBB` color
    pub fn color(&mut self, field: &'static str, default: u32) -> Result<u32> {
        let value = self.number(field, default as f64)?;
        if value.fract() != 0.0 || !(0.0..=0xff_ffff as f64).contains(&value) {
            return Err(self.error(field, "must be an integer color in 0x000000..=0xffffff"));
        }
        Ok(value as u32)
    }

    /// Reject every supplied field that was not read
    pub fn finish(self) -> Result<()> {
        match self.params.keys().find(|key| !self.consumed.contains(key.as_str())) {
            Some(unknown) => Err(self.error(unknown, "unknown field")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, ParamValue)]) -> Params {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_defaults_apply_when_absent() {
        let empty = Params::new();
        let mut reader = ParamReader::new("box", &empty);
        assert_eq!(reader.length("width", 1.0).unwrap(), 1.0);
        assert_eq!(reader.segments("width_segments", 1, 1).unwrap(), 1);
        assert!(!reader.flag("open_ended", false).unwrap());
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_bool_where_number_expected() {
        let p = params(&[("width", true.into())]);
        let err = ParamReader::new("box", &p).length("width", 1.0).unwrap_err();
        assert!(matches!(err, EngineError::Config { ref tag, ref field, .. } if tag == "box" && field == "width"));
    }

    #[test]
    fn test_segments_reject_fraction_and_negative() {
        let p = params(&[("segments", 2.5.into())]);
        assert!(ParamReader::new("circle", &p).segments("segments", 32, 3).is_err());

        let p = params(&[("segments", (-4).into())]);
        assert!(ParamReader::new("circle", &p).segments("segments", 32, 3).is_err());

        let p = params(&[("segments", 2.into())]);
        assert!(ParamReader::new("circle", &p).segments("segments", 32, 3).is_err());
    }

    #[test]
    fn test_segments_upper_bound() {
        let p = params(&[("segments", f64::from(MAX_SEGMENTS).into())]);
        assert_eq!(ParamReader::new("circle", &p).segments("segments", 32, 3).unwrap(), MAX_SEGMENTS);

        let p = params(&[("segments", f64::from(u32::MAX).into())]);
        let err = ParamReader::new("circle", &p).segments("segments", 32, 3).unwrap_err();
        assert!(matches!(err, EngineError::Config { ref tag, ref field, .. } if tag == "circle" && field == "segments"));
    }

    #[test]
    fn test_negative_length_rejected() {
        let p = params(&[("radius", (-1.0).into())]);
        assert!(ParamReader::new("sphere", &p).length("radius", 1.0).is_err());
    }

    #[test]
    fn test_color_range() {
        let p = params(&[("color", 0xff0000.into())]);
        assert_eq!(ParamReader::new("unlit", &p).color("color", 0xffffff).unwrap(), 0xff0000);

        let p = params(&[("color", 0x1000000.into())]);
        assert!(ParamReader::new("unlit", &p).color("color", 0xffffff).is_err());
    }

    #[test]
    fn test_unknown_field_reported() {
        let p = params(&[("radius", 1.0.into()), ("colour", 3.0.into())]);
        let mut reader = ParamReader::new("sphere", &p);
        reader.length("radius", 1.0).unwrap();
        let err = reader.finish().unwrap_err();
        assert!(matches!(err, EngineError::Config { ref field, .. } if field == "colour"));
    }

    #[test]
    fn test_untagged_deserialize() {
        let p: Params = ron::from_str("{\"width\": 2, \"open_ended\": true}").unwrap();
        assert_eq!(p["width"], ParamValue::Number(2.0));
        assert_eq!(p["open_ended"], ParamValue::Bool(true));
    }
}
