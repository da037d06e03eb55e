mod common;
mod logic;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::split_csv;
use logic::{GameplayStrategy, RunRecord, SimulationConfig, resolve_seed_inputs, simulate_run};

#[derive(Debug, Parser)]
#[command(name = "delivery-wars-tester", version = "0.1.0")]
#[command(about = "Automated QA runs for the Delivery Wars engine")]
struct Args {
    /// Seeds to run (comma-separated; ranges like 1..5 of up to 100000 seeds allowed)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Player policies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    policies: String,

    /// List all available policies and exit
    #[arg(long)]
    list_policies: bool,

    /// Days to play per run
    #[arg(long, default_value_t = 10)]
    days: u32,

    /// Actions the policy takes each day before the day ends
    #[arg(long, default_value_t = 3)]
    jobs_per_day: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_policies(&args)? {
        return Ok(());
    }

    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let policies = expand_policies(&args.policies)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let records = run_simulations(&args, &policies, &seeds)?;

    write_reports(&args, &records, start_time)?;

    if records.iter().any(|r| !r.passed()) {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .try_init();
}

fn maybe_list_policies(args: &Args) -> Result<bool> {
    if !args.list_policies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available policies:")?;
    for policy in GameplayStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:12} - {}",
            policy.key(),
            policy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🚚 Delivery Wars Automated Tester".bright_cyan().bold());
    println!("{}", "=================================".cyan());
}

fn expand_policies(policies_arg: &str) -> Result<Vec<GameplayStrategy>> {
    let mut policies = Vec::new();
    for token in split_csv(policies_arg) {
        if token.eq_ignore_ascii_case("all") {
            for policy in GameplayStrategy::ALL {
                if !policies.contains(&policy) {
                    policies.push(policy);
                }
            }
            continue;
        }
        let policy = token
            .parse::<GameplayStrategy>()
            .map_err(anyhow::Error::msg)?;
        if !policies.contains(&policy) {
            policies.push(policy);
        }
    }
    if policies.is_empty() {
        bail!("no policies selected");
    }
    Ok(policies)
}

fn run_simulations(
    args: &Args,
    policies: &[GameplayStrategy],
    seeds: &[u64],
) -> Result<Vec<RunRecord>> {
    let mut records = Vec::with_capacity(policies.len() * seeds.len());
    for &policy in policies {
        for &seed in seeds {
            let config = SimulationConfig::new(policy, seed)
                .with_days(args.days)
                .with_actions_per_day(args.jobs_per_day);
            let record = simulate_run(config)
                .with_context(|| format!("{policy} run failed on seed {seed}"))?;
            if args.verbose {
                log::info!(
                    "{policy} seed {seed}: cash {} after {} deliveries",
                    record.final_cash,
                    record.deliveries
                );
            }
            records.push(record);
        }
    }
    Ok(records)
}

fn write_reports(args: &Args, records: &[RunRecord], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, records)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, records)?,
        _ => {
            let duration = start_time.elapsed();
            logic::reports::generate_console_report(&mut output_target, records, duration)?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
