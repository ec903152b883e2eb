use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use orderflow_sim::application::runner::{RunnerConfig, ScenarioRunner};
use orderflow_sim::domain::order::Scenario;
use orderflow_sim::domain::ports::ProcessObserverBox;
use orderflow_sim::domain::process::ProcessReport;
use orderflow_sim::domain::speed::SpeedFactor;
use orderflow_sim::infrastructure::simulated::LatencyProfile;
use orderflow_sim::interfaces::bpel;
use orderflow_sim::interfaces::console::{self, ConsoleRenderer};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Simulation speed slider: 1 is 0.1x, 100 is real time, 200 is 10x
    #[arg(long, global = true, default_value_t = 100, value_parser = clap::value_parser!(u8).range(1..=200))]
    speed: u8,

    /// Use a fixed latency (in ms) for every service call instead of random delays
    #[arg(long, global = true)]
    fixed_latency: Option<u64>,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one scenario of the order process
    Run {
        scenario: Scenario,

        /// Print the run report as JSON instead of the text summary
        #[arg(long)]
        json: bool,

        /// Also write the final process variables as JSON to this file
        #[arg(long)]
        vars_out: Option<PathBuf>,
    },
    /// Run the three scenarios one after another
    All {
        /// Print the run reports as a JSON array instead of text summaries
        #[arg(long)]
        json: bool,
    },
    /// Print the BPEL document of the order process
    Bpel {
        /// Write the document to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn build_runner(cli: &Cli, json: bool) -> ScenarioRunner {
    let config = RunnerConfig {
        speed: SpeedFactor::from_slider(cli.speed),
        latency: cli
            .fixed_latency
            .map(LatencyProfile::fixed)
            .unwrap_or_default(),
    };
    tracing::info!(speed = %config.speed, "simulation configured");

    // Keep stdout clean for the JSON report.
    let observer: ProcessObserverBox = if json {
        Box::new(ConsoleRenderer::new(io::stderr()))
    } else {
        Box::new(ConsoleRenderer::new(io::stdout()))
    };
    ScenarioRunner::simulated(config, observer)
}

fn print_reports(reports: &[ProcessReport], json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        let value = match reports {
            [single] => serde_json::to_string_pretty(single),
            many => serde_json::to_string_pretty(many),
        }
        .into_diagnostic()?;
        writeln!(out, "{value}").into_diagnostic()?;
    } else {
        for report in reports {
            console::write_summary(&mut out, report)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::Run {
            scenario,
            json,
            vars_out,
        } => {
            let runner = build_runner(&cli, *json);
            let report = runner.run(*scenario).await?;
            if let Some(path) = vars_out {
                let vars = report.variables.to_pretty_json()?;
                std::fs::write(path, vars).into_diagnostic()?;
            }
            print_reports(&[report], *json)?;
        }
        Command::All { json } => {
            let runner = build_runner(&cli, *json);
            let mut reports = Vec::with_capacity(Scenario::ALL.len());
            for scenario in Scenario::ALL {
                reports.push(runner.run(scenario).await?);
            }
            print_reports(&reports, *json)?;
        }
        Command::Bpel { out } => {
            let xml = bpel::process_document()?;
            match out {
                Some(path) => std::fs::write(path, xml).into_diagnostic()?,
                None => print!("{xml}"),
            }
        }
    }

    Ok(())
}
