// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs::File;
use std::io::{BufWriter, Write};

use tracing::{debug, info, warn};

use crate::combinations::PolicyCombinations;
use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::config::{Config, Mode};
use crate::contribution::contribution_runs;
use crate::policy::{Catalog, policy_groups};
use crate::script::ScriptWriter;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptSummary {
    pub runs: usize,
    pub enabled_policies: usize,
    pub groups: usize,
}

/// Writes the complete script for `mode` to `out`.  The catalog is checked
/// and the runs planned before anything is written, so a catalog problem
/// leaves `out` untouched.
pub fn write_script<W: Write>(
    out: W,
    catalog: &Catalog,
    config: &Config,
    mode: Mode,
) -> Result<ScriptSummary> {
    if catalog.is_empty() {
        warn!("policy catalog has no records");
    }
    let enabled = catalog.enabled();
    debug!(
        catalog = catalog.len(),
        enabled = enabled.len(),
        "selected policies"
    );
    let groups = policy_groups(&enabled).len();
    let enabled_policies = enabled.len();

    let runs = match mode {
        Mode::Combinations => {
            let combinations = PolicyCombinations::new(enabled, config.min_policy_cols)?;
            let mut writer = ScriptWriter::new(out, config);
            writer.write_header()?;
            for run in combinations.runs() {
                writer.write_run(&run)?;
            }
            writer.finish()?
        }
        Mode::ContributionTest => {
            let runs = contribution_runs(&enabled, config.enable_or_disable_groups)?;
            let mut writer = ScriptWriter::new(out, config);
            writer.write_header()?;
            for run in runs.iter() {
                writer.write_run(run)?;
            }
            writer.finish()?
        }
    };

    Ok(ScriptSummary {
        runs,
        enabled_policies,
        groups,
    })
}

fn create_script(path: &str) -> Result<File> {
    File::create(path).map_err(|err| {
        Error::new(
            ErrorKind::Io,
            ErrorCode::Io,
            Some(format!("unable to create '{path}': {err}")),
        )
    })
}

/// Replaces `config.output_script` with the explanation of `err`, so a
/// stale script from an earlier run can't be executed by mistake.  Errors
/// that are not reported in the script leave the file alone.
pub fn report_in_script(config: &Config, err: &Error) -> Result<()> {
    if !err.is_reported_in_script() {
        return Ok(());
    }
    let mut out = create_script(&config.output_script)?;
    out.write_all(err.message().as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Generates the script at `config.output_script`, replacing any existing
/// file.  If the catalog can't produce a script, the explanation becomes
/// the file's entire content and the error is still returned.
pub fn generate_script_file(catalog: &Catalog, config: &Config, mode: Mode) -> Result<ScriptSummary> {
    let path = &config.output_script;
    let mut out = BufWriter::new(create_script(path)?);

    match write_script(&mut out, catalog, config, mode) {
        Ok(summary) => {
            info!(
                script = %path,
                runs = summary.runs,
                policies = summary.enabled_policies,
                groups = summary.groups,
                "wrote command script"
            );
            Ok(summary)
        }
        Err(err) => {
            if err.is_reported_in_script() {
                drop(out);
                report_in_script(config, &err)?;
            }
            Err(err)
        }
    }
}
