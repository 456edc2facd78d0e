// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Generates Vensim command scripts that sweep a model's policy levers.
//!
//! A [`Catalog`] lists every policy the model exposes.  The enabled subset
//! is either swept exhaustively over every combination of settings
//! ([`Mode::Combinations`]) or toggled group by group against a baseline
//! ([`Mode::ContributionTest`]), and the resulting runs are written as a
//! script Vensim can execute in batch.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod combinations;
pub mod common;
pub mod config;
pub mod contribution;
mod generate;
pub mod policy;
pub mod script;

pub use catalog::{
    BUILTIN_CATALOG, COST_CURVE_CATALOG, load_catalog, load_catalog_path, load_catalog_str,
};
pub use combinations::{CartesianProduct, PolicyCombinations, PolicySettingCombination};
pub use common::{Error, ErrorCode, ErrorKind, Result};
pub use config::{Config, ConfigFile, GroupToggle, Mode};
pub use contribution::contribution_runs;
pub use generate::{ScriptSummary, generate_script_file, report_in_script, write_script};
pub use policy::{Catalog, PolicyRecord, policy_groups, validate_enabled};
pub use script::{Command, Run, ScriptWriter};
