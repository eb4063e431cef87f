use chrono::Utc;
use hifitime::{Duration, Epoch};
use skyclear::catalog::CatalogManager;
use skyclear::config::Settings;
use skyclear::constellation::Constellation;
use skyclear::detection::{FieldOfView, ObservationWindow};
use skyclear::errors::InvalidParameterError;
use skyclear::prediction::CancellationToken;
use skyclear::report::write_visible_passes;
use std::env;
use std::error::Error;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage:
  skyclear passes [site]
  skyclear check <ra_deg> <dec_deg> <fov_deg> <unix_start> <len_s>";

// Shell used by `check`: 72 planes of 20 at 550 km, 53°
const SHELL_PLANES: usize = 72;
const SHELL_SATS_PER_PLANE: usize = 20;
const SHELL_ALTITUDE_KM: f64 = 550.0;
const SHELL_INCLINATION_DEG: f64 = 53.0;

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let json_logs = env::var("JSON_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if json_logs {
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
            .with(fmt::layer())
            .init();
    }

    let config_path = env::var_os("SKYCLEAR_CONFIG").map(PathBuf::from);
    let settings = Settings::load_or_default(config_path.as_deref())?;

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("passes") => run_passes(&settings, args.get(1).map(String::as_str).unwrap_or("ctio")),
        Some("check") => run_check(&settings, &args[1..]),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

fn run_passes(settings: &Settings, site: &str) -> Result<(), Box<dyn Error>> {
    let observer = settings.site(site)?;
    info!(
        site,
        latitude = observer.latitude_deg(),
        longitude = observer.longitude_deg(),
        altitude_m = observer.altitude_m(),
        "finding passes"
    );

    let catalog = CatalogManager::new(settings.catalog_url.as_str(), settings.catalog_max_age_hours).load()?;

    let now = Utc::now();
    let start = Epoch::from_unix_seconds(now.timestamp_millis() as f64 / 1000.0);
    let end = start + Duration::from_days(settings.forecast_days);
    let forecast = settings
        .predictor()
        .visible_passes(&catalog, &observer, start, end, &CancellationToken::new())?;
    if !forecast.skipped.is_empty() {
        warn!(skipped = forecast.skipped.len(), "some catalog objects were skipped");
    }

    let output_dir = env::var_os("SKYCLEAR_OUTPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pass_output"));
    let file_name = format!("{}_visible_passes_{}.csv", site, now.format("%Y-%m-%d"));
    let path = write_visible_passes(&forecast.passes, &output_dir, &file_name)?;
    println!("Wrote {} passes to {}", forecast.passes.len(), path.display());
    Ok(())
}

fn parse_arg(args: &[String], index: usize, name: &'static str) -> Result<f64, InvalidParameterError> {
    let raw = args
        .get(index)
        .ok_or_else(|| InvalidParameterError::new(name, "missing"))?;
    raw.parse()
        .map_err(|_| InvalidParameterError::new(name, format!("`{raw}` is not a number")))
}

fn run_check(settings: &Settings, args: &[String]) -> Result<(), Box<dyn Error>> {
    let ra = parse_arg(args, 0, "ra")?;
    let dec = parse_arg(args, 1, "dec")?;
    let radius = parse_arg(args, 2, "fov")?;
    let start = parse_arg(args, 3, "obs_time")?;
    let length = parse_arg(args, 4, "obs_len")?;

    let observer = settings.site("ctio")?;
    let fov = FieldOfView::equatorial(ra, dec, radius)?;
    let window = ObservationWindow::with_cadence(fov, Epoch::from_unix_seconds(start), length, settings.cadence_s)?;

    let mut shell = Constellation::build(
        SHELL_PLANES,
        SHELL_SATS_PER_PLANE,
        SHELL_ALTITUDE_KM,
        SHELL_INCLINATION_DEG,
    )?;
    let verdict = shell.check_observation(&window, &observer)?;

    match &verdict.intruder {
        Some(intrusion) => println!(
            "interference: {} at az {:.2} el {:.2}",
            intrusion.object, intrusion.sample.azimuth, intrusion.sample.elevation
        ),
        None => println!("clear"),
    }
    if !verdict.skipped.is_empty() {
        println!(
            "skipped {} satellites and {} samples",
            verdict.skipped.objects, verdict.skipped.samples
        );
    }
    Ok(())
}
