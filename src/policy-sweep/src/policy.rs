// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashSet;

use crate::common::Result;
use crate::config::Mode;
use crate::{data_err, insufficient_policies_err};

/// One controllable input of the simulation model.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyRecord {
    pub enabled: bool,
    /// The variable name exactly as the model knows it, subscripts included.
    pub long_name: String,
    /// Column label used in the run results file.
    pub short_name: String,
    pub settings: Vec<f64>,
    /// Policies sharing a group are toggled together in contribution tests.
    pub group: String,
}

impl PolicyRecord {
    /// Creates a record that is its own group.
    pub fn new(enabled: bool, long_name: &str, short_name: &str, settings: &[f64]) -> Self {
        PolicyRecord {
            enabled,
            long_name: long_name.to_owned(),
            short_name: short_name.to_owned(),
            settings: settings.to_vec(),
            group: long_name.to_owned(),
        }
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_owned();
        self
    }

    /// The setting a contribution test switches the policy on to.
    pub fn on_setting(&self) -> Option<f64> {
        self.settings.get(1).copied()
    }
}

/// The ordered list of every candidate policy.  A record's position is its
/// identity; nothing here is ever reordered or mutated after loading.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub policies: Vec<PolicyRecord>,
}

impl Catalog {
    pub fn new(policies: Vec<PolicyRecord>) -> Self {
        Catalog { policies }
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// The enabled policies, in catalog order.
    pub fn enabled(&self) -> Vec<&PolicyRecord> {
        self.policies.iter().filter(|p| p.enabled).collect()
    }
}

/// Distinct group labels among `policies`, in first-encounter order.
pub fn policy_groups<'a>(policies: &[&'a PolicyRecord]) -> Vec<&'a str> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut groups = Vec::new();
    for policy in policies {
        if seen.insert(policy.group.as_str()) {
            groups.push(policy.group.as_str());
        }
    }
    groups
}

/// Checks the enabled policies meet the minimum count for `mode` and that
/// their records are well formed.  Count problems are reported first.
pub fn validate_enabled(policies: &[&PolicyRecord], mode: Mode) -> Result<()> {
    match mode {
        Mode::Combinations => match policies.len() {
            0 => return insufficient_policies_err!(NoPoliciesEnabled, "two policies"),
            1 => return insufficient_policies_err!(OnlyOnePolicyEnabled, "two policies"),
            _ => {}
        },
        Mode::ContributionTest => {
            if policies.is_empty() {
                return insufficient_policies_err!(NoPoliciesEnabled, "one policy");
            }
        }
    }

    let mut long_names: HashSet<&str> = HashSet::with_capacity(policies.len());
    for policy in policies {
        if policy.settings.is_empty() {
            return data_err!(
                EmptySettings,
                format!(
                    "enabled policy '{}' has no setting values",
                    policy.long_name
                )
            );
        }
        if !long_names.insert(policy.long_name.as_str()) {
            return data_err!(
                DuplicateLongName,
                format!(
                    "policy '{}' is enabled more than once",
                    policy.long_name
                )
            );
        }
        if mode == Mode::ContributionTest && policy.on_setting().is_none() {
            return data_err!(
                MissingOnSetting,
                format!(
                    "policy '{}' needs a second setting value to be switched on in a contribution test",
                    policy.long_name
                )
            );
        }
    }

    Ok(())
}
