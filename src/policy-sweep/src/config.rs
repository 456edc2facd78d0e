// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::Result;
use crate::config_err;

/// The two kinds of script that can be generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every combination of every enabled policy's settings.
    Combinations,
    /// One run per policy group, switched against a baseline.
    ContributionTest,
}

/// Whether a contribution test switches each group on from BAU or off from
/// the all-policies scenario.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroupToggle {
    Enable,
    Disable,
}

impl GroupToggle {
    /// Only the exact string "Enable" selects enable mode.
    pub fn from_setting(value: &str) -> Self {
        if value == "Enable" {
            GroupToggle::Enable
        } else {
            GroupToggle::Disable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupToggle::Enable => "Enable",
            GroupToggle::Disable => "Disable",
        }
    }
}

/// Everything a generation run needs besides the catalog.  Built once at
/// startup and never changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub model_file: String,
    pub output_script: String,
    pub run_results_file: String,
    pub output_vars_file: String,
    pub run_name: String,
    pub min_policy_cols: usize,
    pub policy_schedule: i64,
    pub enable_or_disable_groups: GroupToggle,
    pub no_interaction: bool,
    pub save_list: bool,
}

impl Config {
    pub fn for_mode(mode: Mode) -> Self {
        let (output_script, run_results_file) = match mode {
            Mode::Combinations => ("GeneratedCombinationsScript.cmd", "RunResults.tsv"),
            Mode::ContributionTest => (
                "GeneratedContributionTestScript.cmd",
                "ContributionTestResults.tsv",
            ),
        };
        Config {
            model_file: "EPS.mdl".to_owned(),
            output_script: output_script.to_owned(),
            run_results_file: run_results_file.to_owned(),
            output_vars_file: "OutputVarsToExport.lst".to_owned(),
            run_name: "MostRecentRun".to_owned(),
            min_policy_cols: 0,
            policy_schedule: 1,
            enable_or_disable_groups: GroupToggle::Disable,
            no_interaction: false,
            save_list: false,
        }
    }

    /// Overrides any field present in `file`.
    pub fn apply(mut self, file: ConfigFile) -> Self {
        if let Some(v) = file.model_file {
            self.model_file = v;
        }
        if let Some(v) = file.output_script {
            self.output_script = v;
        }
        if let Some(v) = file.run_results_file {
            self.run_results_file = v;
        }
        if let Some(v) = file.output_vars_file {
            self.output_vars_file = v;
        }
        if let Some(v) = file.run_name {
            self.run_name = v;
        }
        if let Some(v) = file.min_policy_cols {
            self.min_policy_cols = v;
        }
        if let Some(v) = file.policy_schedule {
            self.policy_schedule = v;
        }
        if let Some(v) = file.enable_or_disable_groups {
            self.enable_or_disable_groups = GroupToggle::from_setting(&v);
        }
        if let Some(v) = file.no_interaction {
            self.no_interaction = v;
        }
        if let Some(v) = file.save_list {
            self.save_list = v;
        }
        self
    }
}

/// The on-disk form of [`Config`]: a JSON object keyed by the recognized
/// setting names, every key optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub model_file: Option<String>,
    pub output_script: Option<String>,
    pub run_results_file: Option<String>,
    pub output_vars_file: Option<String>,
    pub run_name: Option<String>,
    pub min_policy_cols: Option<usize>,
    pub policy_schedule: Option<i64>,
    pub enable_or_disable_groups: Option<String>,
    pub no_interaction: Option<bool>,
    pub save_list: Option<bool>,
}

impl ConfigFile {
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .or_else(|err| config_err!(BadConfig, format!("invalid configuration: {err}")))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                return config_err!(
                    BadConfig,
                    format!("unable to read '{}': {}", path.display(), err)
                );
            }
        };
        Self::from_json(&contents)
    }
}
