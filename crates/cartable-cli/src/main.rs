// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod demo;

use anyhow::{Context, Result};
use cartable_app::Role;
use config::Config;
use std::env;
use std::path::PathBuf;

const DEFAULT_DEMO_SEED: u64 = 2026;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `cartable --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        return Ok(());
    }

    let role = options.role.unwrap_or_else(|| config.role());
    if options.demo {
        let seed = options.seed.unwrap_or(DEFAULT_DEMO_SEED);
        return demo::run(&config, role, seed);
    }

    println!(
        "cartable: no transport is bundled; point a frontend at {} or run `cartable --demo` for a seeded walkthrough",
        config.base_url()
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    demo: bool,
    seed: Option<u64>,
    role: Option<Role>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        demo: false,
        seed: None,
        role: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires an integer"))?;
                let seed = value
                    .as_ref()
                    .parse::<u64>()
                    .with_context(|| format!("--seed expects an integer, got {:?}", value.as_ref()))?;
                options.seed = Some(seed);
            }
            "--role" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--role requires a role name"))?;
                let role = Role::parse(value.as_ref()).ok_or_else(|| {
                    anyhow::anyhow!(
                        "unknown role {:?}; expected administrator, teacher, or parent",
                        value.as_ref()
                    )
                })?;
                options.role = Some(role);
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("cartable (Rust)");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate the config file and exit");
    println!("  --demo                   Run a seeded in-memory walkthrough");
    println!("  --seed <n>               Seed for --demo data (default 2026)");
    println!("  --role <name>            Override the session role for --demo");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use cartable_app::Role;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/cartable-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_example: false,
                check_only: false,
                demo: false,
                seed: None,
                role: None,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.demo);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_demo_seed_and_role() -> Result<()> {
        let options = parse_cli_args(
            vec!["--demo", "--seed", "41", "--role", "parent"],
            default_options_path(),
        )?;
        assert!(options.demo);
        assert_eq!(options.seed, Some(41));
        assert_eq!(options.role, Some(Role::Parent));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_non_numeric_seed() {
        let error = parse_cli_args(vec!["--seed", "many"], default_options_path())
            .expect_err("non-numeric seed should fail");
        assert!(error.to_string().contains("--seed expects an integer"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_role() {
        let error = parse_cli_args(vec!["--role", "principal"], default_options_path())
            .expect_err("unknown role should fail");
        assert!(error.to_string().contains("unknown role"));
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
