//! Fixture loading and management.

use std::path::Path;

use frankenfmt_core::Arg;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// A typed formatting argument as it appears in fixture JSON, e.g.
/// `{"u32": 7}`, `{"char": "x"}` or `{"bytes": [0, 255]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureArg {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Usize(usize),
    Isize(isize),
    Char(char),
    /// Raw code point, which may not be a valid scalar value.
    Code(u32),
    Str(String),
    Bytes(Vec<u8>),
}

impl FixtureArg {
    /// Borrow as a formatter argument.
    #[must_use]
    pub fn as_arg(&self) -> Arg<'_> {
        match self {
            Self::U8(v) => Arg::U8(*v),
            Self::I8(v) => Arg::I8(*v),
            Self::U16(v) => Arg::U16(*v),
            Self::I16(v) => Arg::I16(*v),
            Self::U32(v) => Arg::U32(*v),
            Self::I32(v) => Arg::I32(*v),
            Self::U64(v) => Arg::U64(*v),
            Self::I64(v) => Arg::I64(*v),
            Self::Usize(v) => Arg::Usize(*v),
            Self::Isize(v) => Arg::Isize(*v),
            Self::Char(c) => Arg::Char(u32::from(*c)),
            Self::Code(cp) => Arg::Char(*cp),
            Self::Str(s) => Arg::Str(s.as_bytes()),
            Self::Bytes(b) => Arg::Str(b),
        }
    }

    /// Parse the command-line form `<kind>:<value>`, e.g. `i32:-5` or
    /// `str:hello`.
    pub fn from_cli(spec: &str) -> Result<Self, HarnessError> {
        let bad = || HarnessError::BadArgument(spec.to_string());
        let (kind, value) = spec.split_once(':').ok_or_else(bad)?;
        let arg = match kind {
            "u8" => Self::U8(value.parse().map_err(|_| bad())?),
            "i8" => Self::I8(value.parse().map_err(|_| bad())?),
            "u16" => Self::U16(value.parse().map_err(|_| bad())?),
            "i16" => Self::I16(value.parse().map_err(|_| bad())?),
            "u32" => Self::U32(value.parse().map_err(|_| bad())?),
            "i32" => Self::I32(value.parse().map_err(|_| bad())?),
            "u64" => Self::U64(value.parse().map_err(|_| bad())?),
            "i64" => Self::I64(value.parse().map_err(|_| bad())?),
            "usize" => Self::Usize(value.parse().map_err(|_| bad())?),
            "isize" => Self::Isize(value.parse().map_err(|_| bad())?),
            "char" | "c" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => return Err(bad()),
                }
            }
            "str" | "s" => Self::Str(value.to_string()),
            _ => return Err(bad()),
        };
        Ok(arg)
    }
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// Operation under test (`format`, `render_u64`, `parse_u64`, ...).
    pub operation: String,
    /// Behaviour the case pins down, for the report.
    #[serde(default)]
    pub section: String,
    /// Operation inputs.
    pub inputs: serde_json::Value,
    /// Expected output, compared as text.
    pub expected_output: String,
    /// Width policy the case applies to: `term`, `bytes` or `both`.
    #[serde(default = "default_width")]
    pub width: String,
}

fn default_width() -> String {
    String::from("both")
}

/// A collection of fixture cases for one area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Area name, e.g. `stdio/format`.
    pub family: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Load every `*.json` set in `dir`, sorted by file name.
    ///
    /// Files that fail to load are returned separately so the caller can
    /// decide whether to skip them.
    pub fn load_dir(dir: &Path) -> Result<(Vec<Self>, Vec<HarnessError>), HarnessError> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut sets = Vec::new();
        let mut skipped = Vec::new();
        for path in paths {
            match Self::from_file(&path) {
                Ok(set) => sets.push(set),
                Err(err) => skipped.push(HarnessError::FixtureFile {
                    path,
                    source: Box::new(err),
                }),
            }
        }
        if sets.is_empty() {
            return Err(HarnessError::NoFixtures(dir.to_path_buf()));
        }
        Ok((sets, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_deserialize_from_tagged_objects() {
        let args: Vec<FixtureArg> = serde_json::from_str(
            r#"[{"u8": 7}, {"i64": -9}, {"char": "✓"}, {"str": "hi"}, {"bytes": [0, 255]}, {"code": 55296}]"#,
        )
        .unwrap();
        assert_eq!(
            args,
            vec![
                FixtureArg::U8(7),
                FixtureArg::I64(-9),
                FixtureArg::Char('✓'),
                FixtureArg::Str("hi".to_string()),
                FixtureArg::Bytes(vec![0, 255]),
                FixtureArg::Code(0xD800),
            ]
        );
        assert_eq!(args[2].as_arg(), Arg::Char(0x2713));
        assert_eq!(args[4].as_arg(), Arg::Str(&[0, 255]));
    }

    #[test]
    fn test_from_cli() {
        assert_eq!(FixtureArg::from_cli("i32:-5").unwrap(), FixtureArg::I32(-5));
        assert_eq!(FixtureArg::from_cli("c:é").unwrap(), FixtureArg::Char('é'));
        assert_eq!(
            FixtureArg::from_cli("str:a:b").unwrap(),
            FixtureArg::Str("a:b".to_string())
        );
        assert!(FixtureArg::from_cli("u8:300").is_err());
        assert!(FixtureArg::from_cli("char:ab").is_err());
        assert!(FixtureArg::from_cli("nocolon").is_err());
        assert!(FixtureArg::from_cli("f32:1.0").is_err());
    }

    #[test]
    fn case_width_defaults_to_both() {
        let set = FixtureSet::from_json(
            r#"{"version":"v1","family":"stdio/format","cases":[
                {"name":"plain","operation":"format","inputs":{"template":"x"},"expected_output":"x"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(set.cases[0].width, "both");
        assert!(set.cases[0].section.is_empty());
    }
}
