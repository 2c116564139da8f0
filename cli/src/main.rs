use anyhow::{Context, Result, bail};
use clap::Parser;
use iquip_plots::Point;
use iquip_scan::{DataPointIndex, DataType, Dataset, DatasetSnapshot, Extracted, MeasuredValue};
use iquip_viewer::{PointInspection, SelectionState, ViewerConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

mod view;

/// scanview - reduce and inspect scan datasets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "scanview")]
#[command(about = "Reduce a scan dataset onto one or two axes and inspect a data point", long_about = None)]
struct Cli {
    /// Dataset snapshot as JSON: {"rows": [[value, p1, ...], ...], "names": [...], "units": [...]}
    #[arg(value_name = "DATASET")]
    input: PathBuf,

    /// Viewer settings as JSON (click_tolerance, data_type, threshold)
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Parameters to plot against (comma-separated, X first, e.g. "t,freq")
    #[arg(short, long, value_delimiter = ',')]
    axes: Option<Vec<String>>,

    /// Reduction for the main plot
    #[arg(short = 'd', long, value_enum)]
    data_type: Option<DataTypeArg>,

    /// Shots with a value strictly above the threshold count towards P1
    #[arg(short, long, allow_negative_numbers = true)]
    threshold: Option<MeasuredValue>,

    /// Data point to inspect (comma-separated index, e.g. "2,0")
    #[arg(short, long, value_delimiter = ',', conflicts_with = "click")]
    point: Option<Vec<usize>>,

    /// Inspect the data point under a click at scene position "x,y"
    #[arg(long, value_delimiter = ',', num_args = 1, allow_negative_numbers = true)]
    click: Option<Vec<f64>>,

    /// Size of the plot area in scene pixels, "width,height"
    #[arg(long, value_delimiter = ',', default_values_t = [640.0, 480.0])]
    scene: Vec<f64>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DataTypeArg {
    /// Sum of the shots at each point
    Total,
    /// Mean of the shots at each point
    Average,
    /// Fraction of shots above the threshold
    P1,
}

impl From<DataTypeArg> for DataType {
    fn from(arg: DataTypeArg) -> Self {
        match arg {
            DataTypeArg::Total => DataType::Total,
            DataTypeArg::Average => DataType::Average,
            DataTypeArg::P1 => DataType::P1,
        }
    }
}

/// Everything the viewer would show, as JSON
#[derive(Debug, Serialize)]
struct Report<'a> {
    parameters: Vec<&'a str>,
    axes: Vec<&'a str>,
    data_type: DataType,
    threshold: MeasuredValue,
    main_plot: Option<&'a Extracted>,
    inspection: Option<&'a PointInspection>,
}

impl<'a> Report<'a> {
    fn new(state: &'a SelectionState) -> Self {
        Self {
            parameters: state
                .dataset()
                .map(|dataset| dataset.parameter_names().collect())
                .unwrap_or_default(),
            axes: state.axis_names(),
            data_type: state.data_type(),
            threshold: state.threshold(),
            main_plot: state.extracted(),
            inspection: state.inspection(),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let snapshot: DatasetSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("Invalid dataset snapshot {}", path.display()))?;
    Dataset::try_from(snapshot).with_context(|| format!("Invalid dataset {}", path.display()))
}

fn pair(values: &[f64], what: &str) -> Result<(f64, f64)> {
    match values {
        [a, b] => Ok((*a, *b)),
        _ => bail!("{} expects two comma-separated numbers, got {}", what, values.len()),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing subscriber with environment filter
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(args.config.as_deref())?;
    let mut state = SelectionState::new(config);

    let fetch = state.begin_fetch();
    let dataset = load_dataset(&args.input)?;
    info!(
        "Loaded {} shot(s) over {} parameter(s) from {}",
        dataset.len(),
        dataset.n_parameters(),
        args.input.display()
    );
    state.apply_fetch(fetch, dataset)?;

    if let Some(data_type) = args.data_type {
        state.set_data_type(data_type.into())?;
    }
    if let Some(threshold) = args.threshold {
        state.set_threshold(threshold)?;
    }
    if let Some(ref axes) = args.axes {
        state
            .set_axes_by_name(axes.as_slice())
            .with_context(|| format!("Cannot plot against {}", axes.join(",")))?;
    }

    if let Some(ref point) = args.point {
        state
            .select_point(DataPointIndex::new(point.clone()))
            .context("Cannot inspect the requested data point")?;
    } else if let Some(ref click) = args.click {
        let (x, y) = pair(click, "--click")?;
        let scene = pair(&args.scene, "--scene")?;
        let Some(kind) = state.main_plot().active() else {
            bail!("Nothing to click on: select one or two axes first");
        };
        if let Some(view_box) = view::fit(state.main_plot(), kind, scene) {
            state.set_view_box(kind, view_box);
        }
        let redraw = state.click(kind, Point::new(x, y))?;
        if redraw.is_none() {
            warn!("Click at ({}, {}) is not on any data point", x, y);
        }
    }
    if let Some(index) = state.index() {
        debug!("Inspecting data point {}", index);
    }

    let json = serde_json::to_string_pretty(&Report::new(&state))?;
    match args.output {
        Some(ref path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            info!("Wrote report to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
