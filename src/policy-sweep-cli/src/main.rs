// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use policy_sweep::{
    BUILTIN_CATALOG, COST_CURVE_CATALOG, Catalog, Config, ConfigFile, GroupToggle, Mode,
    generate_script_file, load_catalog_path, load_catalog_str, report_in_script,
};

const EXIT_FAILURE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "policy-sweep", version)]
#[command(about = "Generate Vensim command scripts that sweep model policies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every combination of the enabled policies' settings
    Combinations(GenerateArgs),
    /// Switch each policy group on or off against a baseline
    Contribution(GenerateArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum BuiltinCatalog {
    /// Every policy, all disabled
    Full,
    /// The cost-curve policy package
    CostCurve,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Groups {
    Enable,
    Disable,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON file of settings (ModelFile, RunName, MinPolicyCols, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Policy catalog CSV
    #[arg(long, conflicts_with = "builtin_catalog")]
    catalog: Option<PathBuf>,

    /// Use a catalog bundled with this tool
    #[arg(long, value_enum, default_value_t = BuiltinCatalog::Full)]
    builtin_catalog: BuiltinCatalog,

    /// Vensim model to load
    #[arg(long)]
    model_file: Option<String>,

    /// Path of the command script to write
    #[arg(long)]
    output: Option<String>,

    /// TSV file Vensim exports run results to
    #[arg(long)]
    results_file: Option<String>,

    /// File listing the variables to export
    #[arg(long)]
    output_vars: Option<String>,

    #[arg(long)]
    run_name: Option<String>,

    /// Pad the results file to at least this many policy columns
    #[arg(long)]
    min_policy_cols: Option<usize>,

    /// Policy implementation schedule file number
    #[arg(long)]
    policy_schedule: Option<i64>,

    /// Contribution tests: enable each group from BAU or disable it from
    /// the all-policies scenario
    #[arg(long, value_enum)]
    groups: Option<Groups>,

    /// Emit SPECIAL>NOINTERACTION
    #[arg(long, overrides_with = "interactive")]
    no_interaction: bool,

    /// Omit SPECIAL>NOINTERACTION even if the config file asks for it
    #[arg(long, overrides_with = "no_interaction")]
    interactive: bool,

    /// Emit SIMULATE>SAVELIST with the output variables file
    #[arg(long, overrides_with = "no_save_list")]
    save_list: bool,

    /// Omit SIMULATE>SAVELIST even if the config file asks for it
    #[arg(long, overrides_with = "save_list")]
    no_save_list: bool,
}

/// The value of an on/off flag pair, if either was given.  The pair
/// overrides each other, so at most one is set.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl GenerateArgs {
    fn config(&self, mode: Mode) -> anyhow::Result<Config> {
        let mut config = Config::for_mode(mode);
        if let Some(path) = &self.config {
            let file = ConfigFile::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            config = config.apply(file);
        }

        if let Some(v) = &self.model_file {
            config.model_file = v.clone();
        }
        if let Some(v) = &self.output {
            config.output_script = v.clone();
        }
        if let Some(v) = &self.results_file {
            config.run_results_file = v.clone();
        }
        if let Some(v) = &self.output_vars {
            config.output_vars_file = v.clone();
        }
        if let Some(v) = &self.run_name {
            config.run_name = v.clone();
        }
        if let Some(v) = self.min_policy_cols {
            config.min_policy_cols = v;
        }
        if let Some(v) = self.policy_schedule {
            config.policy_schedule = v;
        }
        if let Some(groups) = self.groups {
            config.enable_or_disable_groups = match groups {
                Groups::Enable => GroupToggle::Enable,
                Groups::Disable => GroupToggle::Disable,
            };
        }
        if let Some(v) = switch(self.no_interaction, self.interactive) {
            config.no_interaction = v;
        }
        if let Some(v) = switch(self.save_list, self.no_save_list) {
            config.save_list = v;
        }

        Ok(config)
    }

    fn catalog(&self) -> policy_sweep::Result<Catalog> {
        match &self.catalog {
            Some(path) => load_catalog_path(path),
            None => match self.builtin_catalog {
                BuiltinCatalog::Full => load_catalog_str(BUILTIN_CATALOG),
                BuiltinCatalog::CostCurve => load_catalog_str(COST_CURVE_CATALOG),
            },
        }
    }

    fn catalog_name(&self) -> String {
        match &self.catalog {
            Some(path) => path.display().to_string(),
            None => format!("builtin {:?}", self.builtin_catalog),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (mode, args) = match &cli.command {
        Commands::Combinations(args) => (Mode::Combinations, args),
        Commands::Contribution(args) => (Mode::ContributionTest, args),
    };

    let config = args.config(mode)?;
    let catalog = match args.catalog() {
        Ok(catalog) => catalog,
        Err(err) => {
            report_in_script(&config, &err)
                .with_context(|| format!("reporting error in {}", config.output_script))?;
            return Err(err).with_context(|| format!("loading catalog {}", args.catalog_name()));
        }
    };
    generate_script_file(&catalog, &config, mode)
        .with_context(|| format!("generating {}", config.output_script))?;
    Ok(())
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{:#}", err);
        process::exit(EXIT_FAILURE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("policy-sweep").chain(args.iter().copied())).unwrap()
    }

    fn generate_args(cli: &Cli) -> &GenerateArgs {
        match &cli.command {
            Commands::Combinations(args) | Commands::Contribution(args) => args,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("sweep.json");
        std::fs::write(
            &config_path,
            r#"{"RunName": "FromFile", "MinPolicyCols": 4, "EnableOrDisableGroups": "Enable"}"#,
        )
        .unwrap();

        let cli = parse(&[
            "contribution",
            "--config",
            config_path.to_str().unwrap(),
            "--min-policy-cols",
            "7",
            "--save-list",
        ]);
        let config = generate_args(&cli).config(Mode::ContributionTest).unwrap();
        assert_eq!("FromFile", config.run_name);
        assert_eq!(7, config.min_policy_cols);
        assert_eq!(GroupToggle::Enable, config.enable_or_disable_groups);
        assert!(config.save_list);
        assert_eq!("GeneratedContributionTestScript.cmd", config.output_script);
    }

    #[test]
    fn test_builtin_catalog_selection() {
        let cli = parse(&["combinations"]);
        let catalog = generate_args(&cli).catalog().unwrap();
        assert!(catalog.enabled().is_empty());

        let cli = parse(&["contribution", "--builtin-catalog", "cost-curve"]);
        let catalog = generate_args(&cli).catalog().unwrap();
        assert_eq!(42, catalog.enabled().len());
    }

    #[test]
    fn test_catalog_conflicts_with_builtin() {
        let parsed = Cli::try_parse_from([
            "policy-sweep",
            "combinations",
            "--catalog",
            "policies.csv",
            "--builtin-catalog",
            "full",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_guard_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.cmd");
        let cli = parse(&["combinations", "--output", output.to_str().unwrap()]);
        assert!(run(cli).is_err());
        let contents = std::fs::read_to_string(&output).unwrap();
        assert!(contents.starts_with("Error: No policies were enabled"));
    }

    #[test]
    fn test_bad_catalog_replaces_stale_script() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.cmd");
        std::fs::write(&output, "SPECIAL>LOADMODEL|\"old.mdl\"\n").unwrap();
        let catalog = dir.path().join("policies.csv");
        std::fs::write(
            &catalog,
            "enabled,long_name,short_name,settings,group\ntrue,A,a,,\n",
        )
        .unwrap();

        let cli = parse(&[
            "combinations",
            "--catalog",
            catalog.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        let err = run(cli).unwrap_err();
        assert!(format!("{err:#}").contains("empty_settings"));
        assert_eq!(
            "Error: line 2: policy 'A' has no setting values",
            std::fs::read_to_string(&output).unwrap()
        );
    }

    #[test]
    fn test_missing_catalog_file_keeps_script() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.cmd");
        std::fs::write(&output, "SPECIAL>LOADMODEL|\"old.mdl\"\n").unwrap();
        let missing = dir.path().join("missing.csv");

        let cli = parse(&[
            "combinations",
            "--catalog",
            missing.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        assert!(run(cli).is_err());
        assert_eq!(
            "SPECIAL>LOADMODEL|\"old.mdl\"\n",
            std::fs::read_to_string(&output).unwrap()
        );
    }

    #[test]
    fn test_flags_turn_config_file_switches_off() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("sweep.json");
        std::fs::write(&config_path, r#"{"NoInteraction": true, "SaveList": true}"#).unwrap();
        let config_arg = config_path.to_str().unwrap();

        let cli = parse(&["combinations", "--config", config_arg]);
        let config = generate_args(&cli).config(Mode::Combinations).unwrap();
        assert!(config.no_interaction);
        assert!(config.save_list);

        let cli = parse(&[
            "combinations",
            "--config",
            config_arg,
            "--interactive",
            "--no-save-list",
        ]);
        let config = generate_args(&cli).config(Mode::Combinations).unwrap();
        assert!(!config.no_interaction);
        assert!(!config.save_list);

        // the last of a flag pair wins
        let cli = parse(&["combinations", "--no-save-list", "--save-list"]);
        let config = generate_args(&cli).config(Mode::Combinations).unwrap();
        assert!(config.save_list);
    }
}
