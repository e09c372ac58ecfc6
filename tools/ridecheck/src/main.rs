use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ridecheck_transit::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "ridecheck",
    author,
    version,
    about = "Detect the bus or train ridden on a trip and the kilometers travelled",
    long_about = "Matches the raw and map-snapped GPS traces of one trip against the bus and \
                  train networks.\n\n\
                  Stops near both ends of the trip select the candidate lines, each line \
                  geometry is cut between those stops, and the best scoring cut decides the \
                  vehicle. The report is printed as JSON on stdout."
)]
struct Args {
    /// Trip request JSON file, or "-" for stdin
    #[arg(short, long, default_value = "-")]
    request: PathBuf,

    /// Bus stop GeoJSON (Overpass export with @relations)
    #[arg(long, env = "RIDECHECK_BUS_STOPS")]
    bus_stops: PathBuf,

    /// Bus route GeoJSON
    #[arg(long, env = "RIDECHECK_BUS_ROUTES")]
    bus_routes: PathBuf,

    /// Train stop GeoJSON (Overpass export with @relations)
    #[arg(long, env = "RIDECHECK_TRAIN_STOPS")]
    train_stops: PathBuf,

    /// Train route GeoJSON
    #[arg(long, env = "RIDECHECK_TRAIN_ROUTES")]
    train_routes: PathBuf,

    /// Route feature property holding the line id
    #[arg(long, env = "RIDECHECK_LINE_PROPERTY", default_value = DEFAULT_LINE_PROPERTY)]
    line_property: String,

    /// Detector config JSON (search radius, scoring buffer, ...)
    #[arg(short, long, env = "RIDECHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn load_dataset(
    vehicle: VehicleType,
    stops: &Path,
    routes: &Path,
    line_property: &str,
) -> Result<Arc<dyn TransitDataset>> {
    for path in [stops, routes] {
        if !path.exists() {
            bail!("{vehicle} dataset file does not exist: {}", path.display());
        }
    }

    let provider = StaticTransitProvider::from_geojson_files(vehicle, stops, routes, line_property)
        .with_context(|| format!("Failed to load {vehicle} dataset"))?;
    Ok(Arc::new(provider))
}

fn read_request(path: &Path) -> Result<TripRequest> {
    let json = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request {}", path.display()))?
    };

    TripRequest::from_json(&json).context("Failed to parse trip request")
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => DetectorConfig::default(),
    };
    log::debug!("Config: {config:?}");

    let bus = load_dataset(
        VehicleType::Bus,
        &args.bus_stops,
        &args.bus_routes,
        &args.line_property,
    )?;
    let train = load_dataset(
        VehicleType::Train,
        &args.train_stops,
        &args.train_routes,
        &args.line_property,
    )?;

    let request = read_request(&args.request)?;
    log::info!(
        "Trip {} of user {}: {} snapped points, {} raw points",
        request.ticket_id,
        request.user_id,
        request.data.snapped_points.len(),
        request.data.raw_data.len()
    );

    let detector = VehicleDetector::new(bus, train, config);
    let report = detector.report(&request);

    let stdout = std::io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(stdout, &report)?;
    } else {
        serde_json::to_writer(stdout, &report)?;
    }
    println!();

    Ok(())
}
