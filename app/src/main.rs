use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use common::{config::Config, plot::PlotOutcome, report};
use eyre::Result;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod summary;

const MODULES: &[&str] = &["omp_report", "common", "plot_common", "omp_basic"];

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// YAML config file
    #[arg(short, long)]
    config_file: Option<PathBuf>,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the comparison charts
    Plot {
        /// Benchmark results CSV
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Directory the charts are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print baseline, speedups and best run without writing charts
    Summary {
        /// Benchmark results CSV
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("info".to_owned());
    let args = Cli::parse();

    let mut env_filter = EnvFilter::new(format!("omp_report={log_level}"));
    for log in &args.log {
        env_filter = env_filter.add_directive(log.parse()?);
    }
    for module in MODULES {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .init();

    let command = args.command.unwrap_or(Commands::Plot {
        input: None,
        output_dir: None,
    });
    if let Err(err) = run(command, args.config_file.as_deref()) {
        error!("{err:#}");
        return Err(err);
    }
    Ok(())
}

fn run(command: Commands, config_file: Option<&Path>) -> Result<()> {
    let mut config = match config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    match command {
        Commands::Plot { input, output_dir } => {
            if let Some(input) = input {
                config.input = input;
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            plot(&config)
        }
        Commands::Summary { input, json } => {
            if let Some(input) = input {
                config.input = input;
            }
            let report = report::load_report(&config)?;
            if json {
                summary::print_json(&report)
            } else {
                summary::print_table(&report);
                Ok(())
            }
        }
    }
}

fn plot(config: &Config) -> Result<()> {
    let plots = config.plots.clone().unwrap_or_else(omp_basic::default_plots);
    let outcomes = report::generate(config, &plots)?;

    let written = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            PlotOutcome::Written(path) => Some(path),
            PlotOutcome::Skipped { .. } => None,
        })
        .collect::<Vec<_>>();
    info!("Charts generated");
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_config_file_fails_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yml");
        let err = run(
            Commands::Summary {
                input: None,
                json: false,
            },
            Some(&missing),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Read config file"));
    }
}
