use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use osm_areas::api::load_response;
use osm_areas::config::FileConfig;
use osm_areas::domain::AreaRecord;
use osm_areas::geometry::Bounds;
use osm_areas::osm::{AreaBuild, OsmElements};

/// Build area polygons from saved Overpass JSON dumps
///
/// Examples:
///   # Areas of one dump, printed to stdout
///   osm-areas data/vienna.json
///
///   # Several dumps merged, relations only, written to a file
///   osm-areas data/vienna.json data/graz.json --no-ways -o areas.json
///
///   # Use a config file
///   osm-areas --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "osm-areas")]
#[command(version, about, long_about = None)]
struct Args {
    /// Overpass JSON dumps (optional if the config file lists inputs)
    inputs: Vec<PathBuf>,

    /// Path to config file (optional, auto-searches osm-areas.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON file path (defaults to stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Don't emit areas for plain ways
    #[arg(long)]
    no_ways: bool,

    /// Don't emit areas for relations
    #[arg(long)]
    no_relations: bool,

    /// Skip ways and relations with missing references instead of failing
    #[arg(long)]
    skip_unresolved: bool,
}

fn setup_logging(verbose: bool) {
    use env_logger::{Builder, Env};
    let level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref path) => FileConfig::load_from(path).context("Failed to load config file")?,
        None => FileConfig::load().unwrap_or_default(),
    };

    let inputs = if args.inputs.is_empty() {
        file_config.inputs.clone()
    } else {
        args.inputs.clone()
    };
    let output = args.output.clone().or_else(|| file_config.output.clone());
    let verbose = args.verbose || file_config.verbose;

    let mut options = file_config.build_options();
    options.include_ways &= !args.no_ways;
    options.include_relations &= !args.no_relations;
    options.skip_unresolved |= args.skip_unresolved;

    if inputs.is_empty() {
        bail!("No input dumps given; pass them as arguments or list them under `inputs` in the config");
    }

    if verbose {
        eprintln!("Configuration:");
        for input in &inputs {
            eprintln!("  Input: {}", input.display());
        }
        eprintln!("  Ways: {}", enabled(options.include_ways));
        eprintln!("  Relations: {}", enabled(options.include_relations));
        eprintln!("  Skip unresolved: {}", enabled(options.skip_unresolved));
        match output {
            Some(ref path) => eprintln!("  Output: {}", path.display()),
            None => eprintln!("  Output: stdout"),
        }
        eprintln!();
    }

    let spinner = create_spinner("Loading Overpass dumps...");
    let start = Instant::now();
    let responses = inputs
        .iter()
        .map(|path| load_response(path))
        .collect::<Result<Vec<_>>>()?;
    let element_count: usize = responses.iter().map(|r| r.elements.len()).sum();
    spinner.finish_with_message(format!(
        "Loaded {} elements from {} dumps [{:.1}s]",
        element_count,
        responses.len(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Indexing elements...");
    let start = Instant::now();
    let elements = OsmElements::from_responses(responses);
    spinner.finish_with_message(format!(
        "Indexed {} points, {} ways, {} relations [{:.1}s]",
        elements.points().count(),
        elements.ways().len(),
        elements.relations().len(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Building polygons...");
    let start = Instant::now();
    let build = elements
        .build_areas(&options)
        .context("Dataset has unresolved references (use --skip-unresolved to ignore them)")?;
    spinner.finish_with_message(format!(
        "Built {} areas, skipped {} [{:.1}s]",
        build.areas.len(),
        build.skipped.len(),
        start.elapsed().as_secs_f32()
    ));

    let records: Vec<AreaRecord> = build.areas.iter().map(|a| a.record()).collect();
    match output {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            write_records(BufWriter::new(file), &records)?;
        }
        None => write_records(io::stdout().lock(), &records)?,
    }

    print_summary(&build, verbose);
    eprintln!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn enabled(flag: bool) -> &'static str {
    if flag { "enabled" } else { "disabled" }
}

fn write_records<W: Write>(mut writer: W, records: &[AreaRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records).context("Failed to serialize areas")?;
    writeln!(writer)?;
    writer.flush().context("Failed to write areas")?;
    Ok(())
}

fn print_summary(build: &AreaBuild, verbose: bool) {
    let named = build.areas.iter().filter(|a| a.name.is_some()).count();
    let total_m2: f64 = build.areas.iter().map(|a| a.area_m2()).sum();

    let mut bounds: Option<Bounds> = None;
    for area in &build.areas {
        if let Some(b) = area.bounds() {
            bounds = Some(match bounds.take() {
                Some(mut all) => {
                    all.union(&b);
                    all
                }
                None => b,
            });
        }
    }

    eprintln!();
    eprintln!("Areas: {} ({} named)", build.areas.len(), named);
    eprintln!("Total surface: {:.1} km²", total_m2 / 1_000_000.0);
    if let Some(b) = bounds {
        eprintln!(
            "Extent: lat {:.5}..{:.5}, lon {:.5}..{:.5}",
            b.min_lat, b.max_lat, b.min_lon, b.max_lon
        );
    }
    if !build.skipped.is_empty() {
        eprintln!("Skipped: {}", build.skipped.len());
        if verbose {
            for (kind, id, err) in &build.skipped {
                eprintln!("  {:?} {}: {}", kind, id, err);
            }
        }
    }
    eprintln!();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
