use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use opentelemetry::KeyValue;

use beredskap_analysis::cost::{estimate_cost, CostRequest, InstanceSize};
use beredskap_analysis::mttr::compute_mttr;
use beredskap_analysis::perf::{mode_benchmarks, project_performance};
use beredskap_config::BeredskapConfig;
use beredskap_core::model::StandbyMode;
use beredskap_simulator::multi_region::MultiRegionScenario;
use beredskap_simulator::replay::replay_scenario;
use beredskap_simulator::{RunReport, Scenario, ScenarioError, Simulator, PREDEFINED_SCENARIOS};
use beredskap_telemetry::logging::EventLogger;
use beredskap_telemetry::metrics::MetricsRecorder;

type CliError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "beredskap", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a predefined, random, or YAML-scripted failover scenario
    Simulate(SimulateArgs),
    /// Replay a recorded scenario file and validate its state hash
    Replay(ReplayArgs),
    /// Run the multi-region disaster recovery scenario
    Disaster(DisasterArgs),
    /// Estimate running cost for a standby configuration
    Cost(CostArgs),
    /// Compute Mean Time To Recovery from its four phases
    Mttr(MttrArgs),
    /// Print the per-mode performance comparison table
    Compare,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Predefined scenario name (primary-failure, load-balancing,
    /// disaster-recovery, maintenance)
    #[arg(long, conflicts_with_all = ["scenario", "random"])]
    pub name: Option<String>,

    /// Path to a scenario YAML file
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Generate a random scenario instead of a scripted one
    #[arg(long)]
    pub random: bool,

    /// Seed for random scenarios (defaults to the configured seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fail unless the run produces this state hash
    #[arg(long)]
    pub validate_hash: Option<String>,

    /// Pace the run against the wall clock. Paced hashes are not comparable
    /// to unpaced ones, so hash validation is rejected here.
    #[arg(long, conflicts_with = "validate_hash")]
    pub live: bool,

    /// Pacing speed multiplier (only with --live)
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Print the Prometheus metrics dump after the run
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Scenario YAML file to replay
    pub scenario: PathBuf,

    /// Fail unless the replay produces this state hash
    #[arg(long)]
    pub validate_hash: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DisasterArgs {
    /// Standby mode of every region
    #[arg(long, value_enum, default_value_t = ModeArg::Hot)]
    pub mode: ModeArg,
}

#[derive(Args, Debug, Clone)]
pub struct CostArgs {
    #[arg(long, value_enum, default_value_t = ModeArg::Cold)]
    pub mode: ModeArg,

    #[arg(long, value_enum, default_value_t = SizeArg::Small)]
    pub size: SizeArg,

    /// Estimate horizon in hours
    #[arg(long, default_value_t = 720)]
    pub hours: u32,

    #[arg(long, default_value_t = 0.0)]
    pub storage_gb: f64,

    #[arg(long, default_value_t = 0.0)]
    pub network_gb: f64,

    /// Whether the primary is running
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    pub primary_on: bool,

    /// Whether the secondary is running (defaults to the mode's posture)
    #[arg(long, action = clap::ArgAction::Set)]
    pub secondary_on: Option<bool>,
}

#[derive(Args, Debug, Clone)]
pub struct MttrArgs {
    /// Detection time in minutes
    #[arg(long, default_value_t = 5)]
    pub detection: u64,

    /// Diagnosis time in minutes
    #[arg(long, default_value_t = 10)]
    pub diagnosis: u64,

    /// Repair time in minutes
    #[arg(long, default_value_t = 30)]
    pub repair: u64,

    /// Testing time in minutes
    #[arg(long, default_value_t = 15)]
    pub testing: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Cold,
    Warm,
    Hot,
}

impl From<ModeArg> for StandbyMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Cold => StandbyMode::Cold,
            ModeArg::Warm => StandbyMode::Warm,
            ModeArg::Hot => StandbyMode::Hot,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SizeArg {
    Small,
    Medium,
    Large,
}

impl From<SizeArg> for InstanceSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Small => InstanceSize::Small,
            SizeArg::Medium => InstanceSize::Medium,
            SizeArg::Large => InstanceSize::Large,
        }
    }
}

pub async fn run_command(cli: Cli) -> Result<(), CliError> {
    let config = BeredskapConfig::load()?;
    let metrics = MetricsRecorder::new();

    match cli.command {
        Commands::Simulate(args) => run_simulate(args, &config, &metrics).await,
        Commands::Replay(args) => run_replay(args, &metrics),
        Commands::Disaster(args) => run_disaster(args, &config),
        Commands::Cost(args) => run_cost(args, &config),
        Commands::Mttr(args) => run_mttr(args),
        Commands::Compare => run_compare(),
    }
}

async fn run_simulate(
    args: SimulateArgs,
    config: &BeredskapConfig,
    metrics: &MetricsRecorder,
) -> Result<(), CliError> {
    let seed = args.seed.unwrap_or(config.simulator.seed);
    let scenario = if let Some(path) = &args.scenario {
        Scenario::from_yaml_path(path)?
    } else if args.random {
        Scenario::random(seed, config.simulator.random_steps)
    } else {
        let name = args.name.as_deref().unwrap_or(PREDEFINED_SCENARIOS[0]);
        Scenario::predefined(name)?
    };

    tracing::info!(scenario = %scenario.name, seed, live = args.live, "starting simulation");
    let simulator = Simulator::with_settings(
        &scenario,
        config.simulator.timeline_capacity,
        config.simulator.grace_ms,
    );
    let report = if args.live {
        simulator.run_paced(&scenario, args.speed).await
    } else {
        simulator.run(&scenario)
    };

    metrics.inputs_applied.inc_by(scenario.steps.len() as f64);
    metrics.failovers_completed.inc_by(report.failovers as f64);
    for delay in &report.completed_delays {
        metrics.failover_delay_ms.observe(*delay as f64);
    }
    EventLogger::log_event(
        "scenario_complete",
        vec![
            KeyValue::new("scenario", report.scenario.clone()),
            KeyValue::new("failovers", report.failovers as i64),
        ],
    );

    print_report(&report);
    if args.metrics {
        println!("\n{}", metrics.gather_metrics()?);
    }
    if let Some(expected) = args.validate_hash {
        if expected != report.state_hash {
            return Err(ScenarioError::HashMismatch {
                expected,
                actual: report.state_hash,
            }
            .into());
        }
        println!("State hash validated.");
    }
    Ok(())
}

fn run_replay(args: ReplayArgs, metrics: &MetricsRecorder) -> Result<(), CliError> {
    let report = replay_scenario(&args.scenario, args.validate_hash.as_deref())?;
    metrics.failovers_completed.inc_by(report.failovers as f64);
    print_report(&report);
    Ok(())
}

fn run_disaster(args: DisasterArgs, config: &BeredskapConfig) -> Result<(), CliError> {
    let mode = StandbyMode::from(args.mode);
    let mut fleet = MultiRegionScenario::new(
        &config.regions.names,
        mode,
        config.simulator.timeline_capacity,
    );

    println!(
        "Simulating disaster across {} regions ({} standby)",
        fleet.regions().len(),
        mode.label()
    );
    fleet.simulate_disaster();
    fleet.advance_ms(config.simulator.grace_ms);

    for region in fleet.regions() {
        let state = region.state();
        println!(
            "\n{}: primary {}, secondary {}, failovers {}",
            region.name(),
            state.primary.status_label(),
            state.secondary.status_label(),
            region.failover_count()
        );
        for event in region.timeline().iter() {
            println!(
                "  +{:>6} ms [{:<9}] {}",
                event.timestamp_ms,
                event.category.label(),
                event.message
            );
        }
    }
    Ok(())
}

fn run_cost(args: CostArgs, config: &BeredskapConfig) -> Result<(), CliError> {
    let mode = StandbyMode::from(args.mode);
    let request = CostRequest {
        mode,
        primary_on: args.primary_on,
        secondary_on: args.secondary_on.unwrap_or(mode.secondary_normally_on()),
        size: args.size.into(),
        hours: args.hours,
        storage_gb: args.storage_gb,
        network_gb: args.network_gb,
        storage_rate_per_gb_hour: config.cost.storage_rate_per_gb_hour,
        network_rate_per_gb: config.cost.network_rate_per_gb,
    };
    let estimate = estimate_cost(&request)?;

    println!(
        "Estimated cost over {} hours ({} standby, {} instances):",
        args.hours,
        mode.label(),
        InstanceSize::from(args.size).label()
    );
    println!("  compute: ${:.2}", estimate.breakdown.compute);
    println!("  storage: ${:.2}", estimate.breakdown.storage);
    println!("  network: ${:.2}", estimate.breakdown.network);
    println!("  total:   ${:.2}", estimate.total);
    for point in &estimate.over_time {
        println!("  after {:>4} h: ${:.2}", point.hour, point.cumulative);
    }
    Ok(())
}

fn run_mttr(args: MttrArgs) -> Result<(), CliError> {
    let total = compute_mttr(args.detection, args.diagnosis, args.repair, args.testing);
    println!(
        "MTTR = {} + {} + {} + {} = {} minutes",
        args.detection, args.diagnosis, args.repair, args.testing, total
    );
    Ok(())
}

fn run_compare() -> Result<(), CliError> {
    println!(
        "{:<6} {:>14} {:>12} {:>8} {:>10} {:>10}  {}",
        "mode", "response (ms)", "rps", "avail %", "eur/h", "mttr(min)", "projection (both on)"
    );
    for row in mode_benchmarks() {
        let projection = project_performance(row.mode, true, true);
        println!(
            "{:<6} {:>14} {:>12} {:>8} {:>10.2} {:>10}  {} ms / {} req/s",
            row.mode.label(),
            row.response_time_ms,
            row.throughput_rps,
            row.availability_pct,
            row.cost_per_hour_eur,
            row.recovery_time_min,
            projection.response_time_ms,
            projection.throughput_rps
        );
    }
    println!();
    for mode in [StandbyMode::Cold, StandbyMode::Warm, StandbyMode::Hot] {
        println!(
            "{}: {} Failover delay {} ms, check interval {} s.",
            mode.label(),
            mode.description(),
            mode.failover_delay_ms(),
            mode.check_interval_secs()
        );
    }
    Ok(())
}


fn print_report(report: &RunReport) {
    println!(
        "Scenario '{}' finished at +{} ms with {} failover(s)",
        report.scenario, report.duration_ms, report.failovers
    );
    println!(
        "Final state: mode {}, primary {}, secondary {}",
        report.final_state.mode.label(),
        report.final_state.primary.status_label(),
        report.final_state.secondary.status_label()
    );
    println!("Timeline (most recent first):");
    for event in &report.timeline {
        println!(
            "  +{:>6} ms [{:<9}] {}",
            event.timestamp_ms,
            event.category.label(),
            event.message
        );
    }
    println!("State hash: {}", report.state_hash);
}
