// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Loading the policy catalog from CSV.
//!
//! A catalog has the columns `enabled,long_name,short_name,settings,group`.
//! Settings are separated by `;`, lines whose first non-blank character is
//! `#` are ignored, and an empty group puts the policy in a group of its own.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::data_err;
use crate::policy::{Catalog, PolicyRecord};

/// Every policy the EPS model exposes, all disabled.
pub const BUILTIN_CATALOG: &str = include_str!("../data/policies.csv");

/// The policy package used for cost-curve contribution tests.
pub const COST_CURVE_CATALOG: &str = include_str!("../data/cost-curve.csv");

#[derive(Debug, Deserialize)]
struct CatalogRow {
    enabled: String,
    long_name: String,
    short_name: String,
    settings: String,
    #[serde(default)]
    group: String,
}

fn parse_enabled(value: &str, line: u64) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => data_err!(
            BadCatalog,
            format!("line {line}: expected true or false for enabled, found '{value}'")
        ),
    }
}

fn parse_settings(value: &str, long_name: &str, line: u64) -> Result<Vec<f64>> {
    let mut settings = Vec::new();
    for part in value.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let setting = match f64::from_str(part) {
            Ok(n) => n,
            Err(_) => {
                return data_err!(
                    BadSetting,
                    format!("line {line}: policy '{long_name}' has non-numeric setting '{part}'")
                );
            }
        };
        if !setting.is_finite() {
            return data_err!(
                NonFiniteSetting,
                format!("line {line}: policy '{long_name}' has non-finite setting '{part}'")
            );
        }
        settings.push(setting);
    }

    if settings.is_empty() {
        return data_err!(
            EmptySettings,
            format!("line {line}: policy '{long_name}' has no setting values")
        );
    }

    Ok(settings)
}

fn csv_error(err: csv::Error) -> Error {
    let details = match err.position() {
        Some(pos) => format!("line {}: {}", pos.line(), err),
        None => err.to_string(),
    };
    Error::new(ErrorKind::Data, ErrorCode::BadCatalog, Some(details))
}

/// Blanks out comment lines.  The csv reader only recognizes a comment
/// marker in the first column, and skips empty lines, so this keeps the
/// line numbers in error messages intact.
fn strip_comments(contents: &str) -> String {
    let mut stripped = String::with_capacity(contents.len());
    for line in contents.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            if line.ends_with('\n') {
                stripped.push('\n');
            }
        } else {
            stripped.push_str(line);
        }
    }
    stripped
}

/// Reads a catalog from any CSV source.
pub fn load_catalog<R: Read>(mut reader: R) -> Result<Catalog> {
    let mut contents = String::new();
    if let Err(err) = reader.read_to_string(&mut contents) {
        if err.kind() == std::io::ErrorKind::InvalidData {
            return data_err!(BadCatalog, format!("catalog is not valid UTF-8: {err}"));
        }
        return Err(err.into());
    }
    let contents = strip_comments(&contents);

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let headers = rdr.headers().map_err(csv_error)?.clone();
    let mut record = csv::StringRecord::new();
    let mut policies = Vec::new();
    while rdr.read_record(&mut record).map_err(csv_error)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        let row: CatalogRow = record.deserialize(Some(&headers)).map_err(csv_error)?;

        let enabled = parse_enabled(&row.enabled, line)?;
        let settings = parse_settings(&row.settings, &row.long_name, line)?;
        let group = if row.group.is_empty() {
            row.long_name.clone()
        } else {
            row.group
        };

        policies.push(PolicyRecord {
            enabled,
            long_name: row.long_name,
            short_name: row.short_name,
            settings,
            group,
        });
    }

    Ok(Catalog::new(policies))
}

pub fn load_catalog_str(contents: &str) -> Result<Catalog> {
    load_catalog(contents.as_bytes())
}

pub fn load_catalog_path(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).map_err(|err| {
        Error::new(
            ErrorKind::Io,
            ErrorCode::Io,
            Some(format!("unable to open catalog '{}': {}", path.display(), err)),
        )
    })?;
    load_catalog(std::io::BufReader::new(file))
}
