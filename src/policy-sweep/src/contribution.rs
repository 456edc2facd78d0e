// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Contribution tests: switch each policy group off from the all-policies
//! scenario (or on from BAU) to see what that group contributes.

use tracing::debug;

use crate::common::Result;
use crate::config::{GroupToggle, Mode};
use crate::policy::{PolicyRecord, policy_groups, validate_enabled};
use crate::script::Run;

const NONE_LABEL: &str = "None";
const ALL_LABEL: &str = "All";

fn column_prefix(toggle: GroupToggle) -> &'static str {
    match toggle {
        GroupToggle::Enable => "Enabled",
        GroupToggle::Disable => "Disabled",
    }
}

fn group_columns(toggle: GroupToggle, group: &str, policies: &str) -> Vec<String> {
    let prefix = column_prefix(toggle);
    vec![
        format!("{prefix}PolicyGroup={group}"),
        format!("{prefix}Policies={policies}"),
    ]
}

fn on_settings<'a, P>(policies: &[&'a PolicyRecord], include: P) -> Vec<(&'a PolicyRecord, f64)>
where
    P: Fn(&PolicyRecord) -> bool,
{
    policies
        .iter()
        .filter(|p| include(p))
        .filter_map(|p| p.on_setting().map(|value| (*p, value)))
        .collect()
}

/// Builds every run of a contribution test, baseline first.
///
/// With [`GroupToggle::Disable`] the baseline has every policy at its
/// on-level, each following run leaves one group at the model default, and
/// the last run is BAU.  [`GroupToggle::Enable`] is the mirror image.
pub fn contribution_runs<'a>(
    policies: &[&'a PolicyRecord],
    toggle: GroupToggle,
) -> Result<Vec<Run<'a>>> {
    validate_enabled(policies, Mode::ContributionTest)?;

    let groups = policy_groups(policies);
    debug!(groups = groups.len(), toggle = toggle.as_str(), "contribution test");

    let mut runs = Vec::with_capacity(groups.len() + 2);

    let all_on = || on_settings(policies, |_| true);

    runs.push(Run {
        settings: match toggle {
            GroupToggle::Disable => all_on(),
            GroupToggle::Enable => vec![],
        },
        columns: group_columns(toggle, NONE_LABEL, NONE_LABEL),
    });

    for group in groups.iter() {
        let members: Vec<&str> = policies
            .iter()
            .filter(|p| p.group == *group)
            .map(|p| p.short_name.as_str())
            .collect();

        let settings = match toggle {
            GroupToggle::Disable => on_settings(policies, |p| p.group != *group),
            GroupToggle::Enable => on_settings(policies, |p| p.group == *group),
        };

        runs.push(Run {
            settings,
            columns: group_columns(toggle, group, &members.join(", ")),
        });
    }

    runs.push(Run {
        settings: match toggle {
            GroupToggle::Disable => vec![],
            GroupToggle::Enable => all_on(),
        },
        columns: group_columns(toggle, ALL_LABEL, ALL_LABEL),
    });

    Ok(runs)
}
