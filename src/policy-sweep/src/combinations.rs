// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Exhaustive sweeps over every combination of enabled policy settings.

use tracing::{debug, warn};

use crate::common::Result;
use crate::config::Mode;
use crate::policy::{PolicyRecord, validate_enabled};
use crate::script::Run;

/// Sweeps larger than this get a warning: the simulation tool pays for every
/// run, not us.
pub const LARGE_SWEEP_RUNS: usize = 10_000;

/// One setting index per enabled policy, in catalog order.
pub type PolicySettingCombination = Vec<usize>;

/// Iterates every index tuple of `0..lengths[0] x 0..lengths[1] x ...` in
/// nested-loop order: the first position varies slowest and the last
/// fastest.  A zero length anywhere makes the product empty.
#[derive(Clone, Debug)]
pub struct CartesianProduct {
    lengths: Vec<usize>,
    next: Option<Vec<usize>>,
}

impl CartesianProduct {
    pub fn new(lengths: Vec<usize>) -> Self {
        let next = if lengths.contains(&0) {
            None
        } else {
            Some(vec![0; lengths.len()])
        };
        CartesianProduct { lengths, next }
    }

    /// Number of tuples in the full product, or None on overflow.
    pub fn total(&self) -> Option<usize> {
        self.lengths
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
    }

    // advance like an odometer, rightmost digit first
    fn successor(&self, current: &[usize]) -> Option<Vec<usize>> {
        let mut succ = current.to_vec();
        for i in (0..succ.len()).rev() {
            succ[i] += 1;
            if succ[i] < self.lengths[i] {
                return Some(succ);
            }
            succ[i] = 0;
        }
        None
    }
}

impl Iterator for CartesianProduct {
    type Item = PolicySettingCombination;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = self.successor(&current);
        Some(current)
    }
}

/// The combination sweep over a validated set of enabled policies.
#[derive(Clone, Debug)]
pub struct PolicyCombinations<'a> {
    policies: Vec<&'a PolicyRecord>,
    min_policy_cols: usize,
}

impl<'a> PolicyCombinations<'a> {
    /// Fails unless at least two policies are enabled and every one of them
    /// has setting values.
    pub fn new(policies: Vec<&'a PolicyRecord>, min_policy_cols: usize) -> Result<Self> {
        validate_enabled(&policies, Mode::Combinations)?;

        let combinations = PolicyCombinations {
            policies,
            min_policy_cols,
        };
        match combinations.total() {
            Some(total) if total > LARGE_SWEEP_RUNS => {
                warn!(runs = total, "combination sweep is very large");
            }
            Some(total) => debug!(runs = total, "combination sweep"),
            None => warn!("combination sweep run count overflows usize"),
        }

        Ok(combinations)
    }

    pub fn total(&self) -> Option<usize> {
        self.iter().total()
    }

    /// A fresh iterator over every setting combination.
    pub fn iter(&self) -> CartesianProduct {
        CartesianProduct::new(self.policies.iter().map(|p| p.settings.len()).collect())
    }

    /// The sweep as runs ready for serialization, numbered from 1.
    pub fn runs(&self) -> impl Iterator<Item = Run<'a>> + '_ {
        self.iter()
            .enumerate()
            .map(move |(i, combination)| self.run(i + 1, &combination))
    }

    fn run(&self, run_number: usize, combination: &[usize]) -> Run<'a> {
        let settings: Vec<(&'a PolicyRecord, f64)> = self
            .policies
            .iter()
            .zip(combination)
            .map(|(policy, &idx)| (*policy, policy.settings[idx]))
            .collect();

        let mut columns = Vec::with_capacity(1 + settings.len().max(self.min_policy_cols));
        columns.push(format!("CurrentRunNumber={run_number}"));
        for (policy, value) in settings.iter() {
            columns.push(format!("{}={}", policy.short_name, value));
        }
        let extra_cols = self.min_policy_cols.saturating_sub(settings.len());
        columns.extend(std::iter::repeat_n("-".to_owned(), extra_cols));

        Run { settings, columns }
    }
}
