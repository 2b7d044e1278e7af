use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use emfield_kernel::compute_field;

mod report;
mod scenario;

#[derive(Debug, Parser)]
#[command(author, version, about = "Worst-case EM field hazard grid over a map tile", long_about = None)]
struct Cli {
    /// Scenario file (TOML)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Longitude samples (overrides [grid].width)
    #[arg(long, value_name = "COLUMNS")]
    width: Option<usize>,

    /// Latitude samples (overrides [grid].height)
    #[arg(long, value_name = "ROWS")]
    height: Option<usize>,

    /// Sample altitude in metres (overrides [grid].altitude)
    #[arg(short, long, value_name = "METRES", allow_negative_numbers = true)]
    altitude: Option<f64>,

    /// Detection threshold in V/m (overrides [model].detection_threshold)
    #[arg(short, long, value_name = "V_PER_M")]
    threshold: Option<f64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = scenario::load_scenario_from_path(&cli.scenario)?;
    if let Some(w) = cli.width {
        scenario.size.width = w;
    }
    if let Some(h) = cli.height {
        scenario.size.height = h;
    }
    if let Some(a) = cli.altitude {
        scenario.altitude = a;
    }
    if let Some(t) = cli.threshold {
        scenario.params.detection_threshold = t;
    }
    log::info!(
        "loaded {:?}: {} emitter(s), {} obstacle(s), {}x{} grid",
        cli.scenario,
        scenario.scene.stats().emitters,
        scenario.scene.stats().obstacles,
        scenario.size.width,
        scenario.size.height
    );

    let started = std::time::Instant::now();
    let outcome = scenario.with_request(|req| compute_field(req, &scenario.params))?;
    scenario.scene.mark_computed(scenario.scene.revision());
    log::info!("field computed in {:.1?}", started.elapsed());

    print!("{}", report::render_report(&scenario, &outcome));
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
