use anyhow::Context;
use clap::Parser;
use map_pins::{ClusteringConfig, ClusteringPipeline, Point, Reconciliation};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Clusters a location file at one zoom level and prints the map objects.
#[derive(Parser, Debug)]
#[command(name = "pin_tester", version)]
struct Args {
    /// JSON array of locations, each with `uuid` and `position`.
    input: PathBuf,

    /// Map zoom level. Defaults to the configured default zoom.
    #[arg(short, long)]
    zoom: Option<u8>,

    /// Write the display objects here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // --- 1. Load ---
    let points = read_points(&args.input)?;

    // --- 2. Cluster ---
    let pipeline = ClusteringPipeline::new(ClusteringConfig::default())?;
    let zoom = args.zoom.unwrap_or(pipeline.config().default_zoom);
    let result = pipeline.cluster(&points, zoom)?;
    log_summary(points.len(), zoom, &result);

    // --- 3. Emit ---
    let json = if args.pretty {
        serde_json::to_string_pretty(&result.objects)?
    } else {
        serde_json::to_string(&result.objects)?
    };
    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("Output saved to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_points(path: &Path) -> anyhow::Result<Vec<Point>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing locations from {}", path.display()))
}

fn log_summary(point_count: usize, zoom: u8, result: &Reconciliation) {
    let clusters = result.objects.iter().filter(|o| o.is_cluster()).count();
    info!(
        points = point_count,
        zoom,
        objects = result.len(),
        clusters,
        pins = result.len() - clusters,
        unmatched = result.unmatched.len(),
        "Clustering complete"
    );
    for miss in &result.unmatched {
        info!(
            summary = miss.summary_index,
            x = miss.coordinate.x(),
            y = miss.coordinate.y(),
            "Unresolved single-point cluster"
        );
    }
}
