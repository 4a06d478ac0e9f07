mod console;

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::{Duration, Instant};

use aq_app::{
    AppError, AppResult, AssistantContext, BriefingAssistant, RunProgressEvent, RunReport,
    RunStage, Session, SessionCommand, SessionOptions, compare, narrate_detached, run_service,
    scenario_service,
};
use console::{ConsoleAction, HELP, parse_line};

#[derive(Parser)]
#[command(name = "aq-cli")]
#[command(about = "Aqueduct CLI - water transport control simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
    },
    /// List the built-in design paradigms
    Paradigms,
    /// Run a scenario headless, as fast as possible
    Run {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
        /// Simulated duration in seconds
        #[arg(long, default_value_t = 120.0)]
        duration: f64,
        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,
        /// Write telemetry as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Run a scenario in real time with console controls
    Play {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
        /// Stop after this many simulated seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Simulated seconds per wall-clock second
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
        /// Override the scenario seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run every preset paradigm against the same scenario
    Compare {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
        /// Simulated duration in seconds
        #[arg(long, default_value_t = 120.0)]
        duration: f64,
    },
    /// Print the assistant context after running a scenario
    Context {
        /// Path to the scenario YAML/JSON file
        scenario_path: PathBuf,
        /// Simulated duration in seconds before capture
        #[arg(long, default_value_t = 60.0)]
        duration: f64,
        /// Number of recent samples to include
        #[arg(long, default_value_t = 50)]
        recent: usize,
        /// Print the text prompt instead of JSON
        #[arg(long)]
        prompt: bool,
        /// Also narrate with the built-in briefing assistant
        #[arg(long)]
        narrate: bool,
    },
    /// Write the stock scenario to a new file
    Init {
        /// Destination (.yaml, .yml or .json)
        path: PathBuf,
        /// Scenario name
        #[arg(long, default_value = "Aqueduct Scenario")]
        name: String,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Paradigms => cmd_paradigms(),
        Commands::Run {
            scenario_path,
            duration,
            seed,
            output,
            json,
        } => cmd_run(&scenario_path, duration, seed, output.as_deref(), json),
        Commands::Play {
            scenario_path,
            duration,
            speed,
            seed,
        } => cmd_play(&scenario_path, duration, speed, seed),
        Commands::Compare {
            scenario_path,
            duration,
        } => cmd_compare(&scenario_path, duration),
        Commands::Context {
            scenario_path,
            duration,
            recent,
            prompt,
            narrate,
        } => cmd_context(&scenario_path, duration, recent, prompt, narrate),
        Commands::Init { path, name } => cmd_init(&path, &name),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    scenario_service::compile_scenario(&scenario, None)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_paradigms() -> AppResult<()> {
    println!("Design paradigms:");
    for p in scenario_service::list_paradigms() {
        println!(
            "  {:<11} {} ({} m², {} control)",
            p.id, p.name, p.tank_area_m2, p.algorithm
        );
        println!(
            "              infrastructure={} compute={} resilience={}",
            p.metadata.infrastructure_cost, p.metadata.compute_cost, p.metadata.resilience
        );
        if !p.metadata.description.is_empty() {
            println!("              {}", p.metadata.description);
        }
    }
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    duration: f64,
    seed: Option<u64>,
    output: Option<&Path>,
    json: bool,
) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let config = scenario_service::compile_scenario(&scenario, seed)?;
    if !json {
        println!("Running '{}' for {:.1} s", scenario.name, duration);
    }

    let mut last_emit = Instant::now();
    let report = run_service::run_headless_with_progress(
        config,
        duration,
        Some(&mut |event| {
            if !json && (event.stage != RunStage::Running || last_emit.elapsed().as_millis() >= 100)
            {
                render_cli_progress(&event);
                last_emit = Instant::now();
            }
        }),
    )?;

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        println!("{text}");
    } else {
        clear_progress_line();
        println!("✓ Simulation completed in {:.3}s", report.wall_time_s);
        print_report(&report);
    }

    if let Some(path) = output {
        std::fs::write(path, telemetry_csv(&report))?;
        if !json {
            println!(
                "✓ Exported {} samples to {}",
                report.samples.len(),
                path.display()
            );
        }
    }
    Ok(())
}

fn telemetry_csv(report: &RunReport) -> String {
    let mut csv = String::from("time_s,level_m,target_m,flow_in_m3ps,flow_out_m3ps\n");
    for s in &report.samples {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            s.t, s.level, s.target, s.flow_in, s.flow_out
        ));
    }
    csv
}

fn print_report(report: &RunReport) {
    let m = &report.metrics;
    println!(
        "\n{} ({} control), {} ticks",
        report.paradigm_name, report.algorithm, report.ticks
    );
    println!("  IAE:           {:.3} m·s", m.iae);
    println!("  Max |error|:   {:.3} m", m.max_abs_error);
    println!("  RMS error:     {:.3} m", m.rms_error);
    println!(
        "  Level:         min {:.3}  mean {:.3}  max {:.3} m",
        m.min_level, m.mean_level, m.max_level
    );
    println!("  Time drained:  {:.1} s", m.time_drained_s);
    println!("  Pumped volume: {:.1} m³", m.pumped_volume);
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match event.stage {
        RunStage::Running => {
            let width = 28usize;
            let filled = ((event.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.1}/{:.1}s  tick={}  elapsed={:.2}s",
                bar,
                event.fraction_complete * 100.0,
                event.sim_time_s,
                event.t_end_s,
                event.tick,
                event.elapsed_wall_s
            );
        }
        _ => {
            let mut line = format!(
                "\r{}  elapsed={:.2}s",
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn cmd_play(
    scenario_path: &Path,
    duration: Option<f64>,
    speed: f64,
    seed: Option<u64>,
) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let sim = scenario_service::build_simulation(&scenario, seed)?;
    let session = Session::start(
        sim,
        SessionOptions {
            speed,
            start_running: true,
            ..SessionOptions::default()
        },
    )?;
    println!("Playing '{}' at {}x. Type 'help' for commands.", scenario.name, speed);

    let commands = session.commander();
    let (quit_tx, quit_rx) = std::sync::mpsc::channel::<()>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Ok(None) => {}
                Ok(Some(ConsoleAction::Help)) => println!("{HELP}"),
                Ok(Some(ConsoleAction::Quit)) => break,
                Ok(Some(ConsoleAction::Send(cmd))) => {
                    if commands.send(cmd).is_err() {
                        break;
                    }
                }
                Err(msg) => println!("! {msg}"),
            }
        }
        let _ = quit_tx.send(());
    });

    let mut last_print = -1.0f64;
    loop {
        if quit_rx.try_recv().is_ok() {
            break;
        }
        match session.telemetry().recv_timeout(Duration::from_millis(200)) {
            Ok(snap) => {
                if snap.time < last_print || snap.time - last_print >= 1.0 - 1e-9 {
                    println!(
                        "t={:>7.1}s  level={:>7.2}  target={:>6.2}  pump={:>6.1}  inflow={:>6.1}  demand={:>6.1}{}",
                        snap.time,
                        snap.true_level,
                        snap.target_level,
                        snap.pump_outflow,
                        snap.tank_inflow,
                        snap.demand_outflow,
                        if snap.faults.any() { "  [fault]" } else { "" }
                    );
                    last_print = snap.time;
                }
                if duration.is_some_and(|d| snap.time >= d) {
                    session.send(SessionCommand::Pause)?;
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let sim = session.shutdown()?;
    println!("Stopped at t = {:.1} s", sim.time());
    Ok(())
}

fn cmd_compare(scenario_path: &Path, duration: f64) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let base = scenario_service::compile_scenario(&scenario, None)?;
    let paradigms = scenario_service::list_paradigms();
    println!(
        "Comparing {} paradigms on '{}' for {:.1} s",
        paradigms.len(),
        scenario.name,
        duration
    );

    let reports = compare::compare_paradigms(&base, &paradigms, duration)?;
    let rows = compare::ranking(&paradigms, &reports);

    println!(
        "\n  {:<11} {:>8} {:>10} {:>10} {:>10} {:>8} {:>8} {:>8}",
        "paradigm", "area m²", "IAE", "max|err|", "min level", "infra", "compute", "resil."
    );
    for row in rows {
        println!(
            "  {:<11} {:>8.0} {:>10.2} {:>10.3} {:>10.3} {:>8.1} {:>8.1} {:>8.1}",
            row.paradigm_id,
            row.tank_area_m2,
            row.iae,
            row.max_abs_error,
            row.min_level,
            row.infrastructure_cost,
            row.compute_cost,
            row.resilience
        );
    }
    Ok(())
}

fn cmd_context(
    scenario_path: &Path,
    duration: f64,
    recent: usize,
    prompt: bool,
    narrate: bool,
) -> AppResult<()> {
    let scenario = scenario_service::load_scenario(scenario_path)?;
    let mut sim = scenario_service::build_simulation(&scenario, None)?;
    sim.run_for(duration);
    let context = AssistantContext::capture(&sim, recent);

    if prompt {
        print!("{}", context.to_prompt());
    } else {
        let text = serde_json::to_string_pretty(&context)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        println!("{text}");
    }

    if narrate {
        let (chunks, handle) = narrate_detached(BriefingAssistant::new(0.5), context);
        println!();
        for chunk in chunks {
            println!("> {chunk}");
        }
        handle
            .join()
            .map_err(|_| AppError::Assistant("narration thread panicked".to_string()))?;
    }
    Ok(())
}

fn cmd_init(path: &Path, name: &str) -> AppResult<()> {
    scenario_service::init_scenario(path, name)?;
    println!("✓ Wrote scenario to {}", path.display());
    Ok(())
}
