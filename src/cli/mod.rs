#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{CommandFactory as _, Parser, Subcommand};

use crate::config;
use crate::core::codec::{self, CodecContext};
use crate::core::registry::PropertyRegistry;
use crate::core::resource::ResourceDirectory;
use crate::output::table::Table;
use crate::script;

#[derive(Debug, Parser)]
#[command(
    name = "planedit",
    version,
    about = "Undoable task property editing driven by edit scripts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Properties(PropertiesArgs),
    Config(ConfigArgs),
    Completion(CompletionArgs),
    Version,
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Edit script (YAML) to execute
    pub file: PathBuf,
    /// Output the full run report as JSON
    #[arg(long = "json")]
    pub json: bool,
    /// Output the final task state as CSV
    #[arg(long = "csv")]
    pub csv: bool,
}

#[derive(Debug, Parser)]
pub struct PropertiesArgs {
    /// Output in JSON format
    #[arg(long = "json")]
    pub json: bool,
    /// Output as CSV
    #[arg(long = "csv")]
    pub csv: bool,
}

#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub cmd: ConfigCmd,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCmd {
    List,
    Set(ConfigSetArgs),
    Get(ConfigGetArgs),
}

#[derive(Debug, Parser)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Parser)]
pub struct ConfigGetArgs {
    pub key: String,
}

#[derive(Debug, Parser)]
pub struct CompletionArgs {
    pub shell: clap_complete::Shell,
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.cmd {
        Commands::Run(args) => cmd_run(&args),
        Commands::Properties(args) => cmd_properties(&args),
        Commands::Config(args) => cmd_config(&args),
        Commands::Completion(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "planedit", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => cmd_version(),
    }
}

fn cmd_run(args: &RunArgs) -> anyhow::Result<ExitCode> {
    let (cfg, _doc, _paths) = config::load()?;
    let s = script::load(&args.file)
        .with_context(|| format!("failed to load script {}", args.file.display()))?;
    let report = script::run(&s, cfg)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if args.csv {
        let mut table = Table::new(["task", "property", "value"]);
        for task in &report.tasks {
            for p in &task.properties {
                table.row([task.id.as_str(), p.name.as_str(), p.value.as_str()]);
            }
        }
        table.write_csv()?;
    } else {
        for step in &report.steps {
            let status = if step.ok { "ok" } else { "failed" };
            println!("{:>3}  {:<12} {:<7} {}", step.step, step.action, status, step.detail);
        }
        for task in &report.tasks {
            println!();
            println!("task {}", task.id);
            let mut table = Table::new(["property", "value"]);
            for p in &task.properties {
                table.row([p.name.as_str(), p.value.as_str()]);
            }
            table.print()?;
        }
    }

    Ok(if report.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_properties(args: &PropertiesArgs) -> anyhow::Result<ExitCode> {
    let (cfg, _doc, _paths) = config::load()?;
    let registry = PropertyRegistry::standard(&cfg.defaults)?;
    let resources = ResourceDirectory::new();
    let ctx = CodecContext {
        currency: &cfg.currency,
        resources: &resources,
    };

    if args.json {
        let props: Vec<_> = registry
            .iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.name,
                    "kind": d.kind.label(),
                    "roles": d.roles.iter().map(|r| r.label()).collect::<Vec<_>>(),
                    "default": codec::display_text(&d.default, ctx),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&props)?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut table = Table::new(["property", "kind", "roles", "default"]);
    for d in registry.iter() {
        let roles = d
            .roles
            .iter()
            .map(|r| r.label())
            .collect::<Vec<_>>()
            .join(",");
        table.row([
            d.name.to_owned(),
            d.kind.label().to_owned(),
            roles,
            codec::display_text(&d.default, ctx),
        ]);
    }
    if args.csv {
        table.write_csv()?;
    } else {
        table.print()?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_config(args: &ConfigArgs) -> anyhow::Result<ExitCode> {
    match &args.cmd {
        ConfigCmd::List => {
            print!("{}", config::list_resolved_toml()?);
            Ok(ExitCode::SUCCESS)
        }
        ConfigCmd::Get(get) => match config::get_value_string(&get.key)? {
            Some(v) => {
                println!("{v}");
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprintln!("unknown config key '{}'", get.key);
                Ok(ExitCode::FAILURE)
            }
        },
        ConfigCmd::Set(set) => {
            config::set_value_string(&set.key, &set.value)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_version() -> anyhow::Result<ExitCode> {
    println!("planedit {}", env!("CARGO_PKG_VERSION"));
    println!("  rust: {}", rustc_version_runtime::version());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Role;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["planedit", "run", "edits.yaml", "--json"]).unwrap();
        match cli.cmd {
            Commands::Run(args) => {
                assert!(args.json);
                assert!(!args.csv);
                assert_eq!(args.file, PathBuf::from("edits.yaml"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["planedit", "config", "set", "currency.symbol", "kr"])
            .unwrap();
        match cli.cmd {
            Commands::Config(args) => match args.cmd {
                ConfigCmd::Set(set) => {
                    assert_eq!(set.key, "currency.symbol");
                    assert_eq!(set.value, "kr");
                }
                other => panic!("unexpected config command: {other:?}"),
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn role_labels_match_script_roles() {
        assert_eq!(Role::from_label("display").unwrap().label(), "display");
    }
}
