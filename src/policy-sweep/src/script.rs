// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Rendering runs as a Vensim command script.
//!
//! Each instruction is one line of the form `SECTION>COMMAND|arg|arg...`.
//! Results are exported with VDF2TAB, whose trailing free-text columns
//! (everything after the `:`) carry the metadata for each run so the
//! results file records which settings produced which rows.

use std::fmt;
use std::io::Write;

use crate::common::Result;
use crate::config::Config;
use crate::policy::PolicyRecord;

/// The model variable selecting the policy implementation schedule file.
pub const SCHEDULE_SELECTOR: &str = "Policy Implementation Schedule Selector";

/// VDF2TAB flag asking Vensim to append to the results file and skip the
/// time header row.
const APPEND_FLAGS: &str = "+!";

/// One simulation: the SETVALs to apply (anything not listed stays at the
/// model default) and the metadata columns that follow the run name in the
/// results file.
#[derive(Clone, Debug, PartialEq)]
pub struct Run<'a> {
    pub settings: Vec<(&'a PolicyRecord, f64)>,
    pub columns: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command<'a> {
    LoadModel(&'a str),
    RunName(&'a str),
    NoInteraction,
    SaveList(&'a str),
    SetVal(&'a str, f64),
    SetSchedule(i64),
    Run,
    Vdf2Tab {
        run_name: &'a str,
        results_file: &'a str,
        output_vars_file: &'a str,
        append: bool,
        columns: &'a [String],
    },
    Delete(&'a str),
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::LoadModel(model) => write!(f, "SPECIAL>LOADMODEL|\"{model}\""),
            Command::RunName(name) => write!(f, "SIMULATE>RUNNAME|{name}"),
            Command::NoInteraction => write!(f, "SPECIAL>NOINTERACTION"),
            Command::SaveList(vars) => write!(f, "SIMULATE>SAVELIST|{vars}"),
            Command::SetVal(name, value) => write!(f, "SIMULATE>SETVAL|{name}={value}"),
            Command::SetSchedule(schedule) => {
                write!(f, "SIMULATE>SETVAL|{SCHEDULE_SELECTOR}={schedule}")
            }
            Command::Run => write!(f, "MENU>RUN|O"),
            Command::Vdf2Tab {
                run_name,
                results_file,
                output_vars_file,
                append,
                columns,
            } => {
                let flags = if *append { APPEND_FLAGS } else { "" };
                write!(
                    f,
                    "MENU>VDF2TAB|{run_name}.vdf|{results_file}|{output_vars_file}|{flags}||||:{run_name}"
                )?;
                for column in columns.iter() {
                    write!(f, "\t{column}")?;
                }
                Ok(())
            }
            // sync tools like Dropbox can lock the .vdf, and Vensim then
            // fails to overwrite it on the next run
            Command::Delete(run_name) => write!(f, "FILE>DELETE|{run_name}.vdf"),
        }
    }
}

/// Streams a command script to `W`.  The first export creates the results
/// file with a header row; every later one appends.
pub struct ScriptWriter<'c, W: Write> {
    out: W,
    config: &'c Config,
    runs_written: usize,
}

impl<'c, W: Write> ScriptWriter<'c, W> {
    pub fn new(out: W, config: &'c Config) -> Self {
        ScriptWriter {
            out,
            config,
            runs_written: 0,
        }
    }

    fn emit(&mut self, command: Command) -> Result<()> {
        writeln!(self.out, "{command}")?;
        Ok(())
    }

    pub fn write_header(&mut self) -> Result<()> {
        let config = self.config;
        self.emit(Command::LoadModel(&config.model_file))?;
        self.emit(Command::RunName(&config.run_name))?;
        // both open an acknowledgement window per run, which piles up over
        // a long batch
        if config.no_interaction {
            self.emit(Command::NoInteraction)?;
        }
        if config.save_list {
            self.emit(Command::SaveList(&config.output_vars_file))?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    pub fn write_run(&mut self, run: &Run) -> Result<()> {
        let config = self.config;
        for (policy, value) in run.settings.iter() {
            self.emit(Command::SetVal(&policy.long_name, *value))?;
        }
        self.emit(Command::SetSchedule(config.policy_schedule))?;
        self.emit(Command::Run)?;
        self.emit(Command::Vdf2Tab {
            run_name: &config.run_name,
            results_file: &config.run_results_file,
            output_vars_file: &config.output_vars_file,
            append: self.runs_written > 0,
            columns: &run.columns,
        })?;
        self.emit(Command::Delete(&config.run_name))?;
        writeln!(self.out)?;

        self.runs_written += 1;
        Ok(())
    }

    /// Flushes the script and returns how many runs it contains.
    pub fn finish(mut self) -> Result<usize> {
        self.out.flush()?;
        Ok(self.runs_written)
    }
}
