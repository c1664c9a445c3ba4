//! cornerplot - corner plots from the command line
//!
//! Reads a CSV/TSV table of samples (one column per dimension, header row
//! with the names) and writes a PNG or SVG corner plot.

mod config;

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser};
use cornerplot_core::{corner, register_font, Color, PerDim, Samples, Scale};
use cornerplot_io::read_table;
use cornerplot_stats::SummaryStats;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::FileConfig;

#[derive(Parser, Debug)]
#[command(
    name = "cornerplot",
    version,
    about = "Corner plots of multidimensional samples"
)]
struct Cli {
    /// Sample table (.csv, .tsv or .tab) with a header row
    #[arg(required_unless_present = "print_config")]
    input: Option<PathBuf>,

    /// Output image; the extension picks PNG or SVG
    #[arg(short, long, default_value = "corner.png")]
    output: PathBuf,

    /// Option file; defaults to <config dir>/cornerplot/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Columns to plot, in order
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Axis labels, replacing the column names
    #[arg(long, value_delimiter = ',')]
    labels: Option<Vec<String>>,

    /// Histogram bins per dimension
    #[arg(long)]
    bins: Option<usize>,

    /// `linear` or `log`, once for all columns or once per column
    #[arg(long, value_delimiter = ',')]
    axes_scale: Option<Vec<Scale>>,

    /// Color of histograms and contours (`k`, `C0`, `#4682b4`, ...)
    #[arg(long)]
    color: Option<Color>,

    /// Gaussian smoothing of the 2D histograms, in bins
    #[arg(long)]
    smooth: Option<f64>,

    /// Gaussian smoothing of the 1D histograms, in bins
    #[arg(long)]
    smooth1d: Option<f64>,

    /// Quantiles to mark on the diagonal, e.g. 0.16,0.5,0.84
    #[arg(long, value_delimiter = ',')]
    quantiles: Option<Vec<f64>>,

    /// Reference value per column; `none` leaves a column unmarked
    #[arg(long, value_delimiter = ',')]
    truths: Option<Vec<Truth>>,

    /// Quantile summaries above the diagonal
    #[arg(long)]
    show_titles: bool,

    #[arg(long)]
    fill_contours: bool,

    /// Skip the scatter of individual samples
    #[arg(long)]
    no_datapoints: bool,

    /// Mirror the grid so the diagonal runs bottom-left to top-right
    #[arg(long)]
    reverse: bool,

    #[arg(long)]
    dpi: Option<f64>,

    /// Leave out tick labels, axis labels and titles
    #[arg(long)]
    no_text: bool,

    /// TrueType/OpenType font for text in PNG output
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print the merged options as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// One entry of `--truths`
#[derive(Clone, Copy, Debug, PartialEq)]
struct Truth(Option<f64>);

impl FromStr for Truth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "-" | "none" | "None" => Ok(Truth(None)),
            value => value
                .parse()
                .map(|v| Truth(Some(v)))
                .map_err(|_| format!("invalid truth value '{}'", value)),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(font) = &cli.font {
        register_font(font)?;
    }

    let mut config = FileConfig::resolve(cli.config.as_deref())?;
    apply_overrides(cli, &mut config);
    config.corner.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }
    let Some(input) = &cli.input else {
        return Err("no input file given".into());
    };

    let mut table = read_table(input)?;
    if let Some(columns) = &cli.columns {
        table = table.select(columns)?;
    }
    info!(
        path = %input.display(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "read samples"
    );
    for name in &table.columns {
        let stats = SummaryStats::from_data(&table.column(name)?);
        let (lo, hi) = stats.sigma_interval;
        info!(
            column = %name,
            min = stats.min,
            max = stats.max,
            median = stats.median,
            p16 = lo,
            p84 = hi,
            missing = stats.missing,
            "column summary"
        );
        if !stats.has_dynamic_range() {
            warn!(column = %name, "column has no dynamic range");
        }
    }

    let samples = Samples::from_table(&table)?;
    let figure = corner(&samples, &config.corner)?;
    let format = figure.save(&cli.output, &config.export)?;
    println!("wrote {} ({})", cli.output.display(), format.mime_type());
    Ok(())
}

/// Command-line flags win over the option file
fn apply_overrides(cli: &Cli, config: &mut FileConfig) {
    let opts = &mut config.corner;

    if let Some(labels) = &cli.labels {
        opts.labels = Some(labels.clone());
    }
    if let Some(bins) = cli.bins {
        opts.bins = PerDim::All(bins);
    }
    if let Some(scales) = &cli.axes_scale {
        opts.axes_scale = match scales.as_slice() {
            [one] => PerDim::All(*one),
            many => PerDim::Each(many.to_vec()),
        };
    }
    if let Some(color) = cli.color {
        opts.color = color;
    }
    if cli.smooth.is_some() {
        opts.smooth = cli.smooth;
    }
    if cli.smooth1d.is_some() {
        opts.smooth1d = cli.smooth1d;
    }
    if let Some(quantiles) = &cli.quantiles {
        opts.quantiles = quantiles.clone();
    }
    if let Some(truths) = &cli.truths {
        opts.truths = Some(truths.iter().map(|t| t.0).collect());
    }
    opts.show_titles |= cli.show_titles;
    opts.reverse |= cli.reverse;
    opts.verbose |= cli.verbose > 0;
    opts.hist2d.fill_contours |= cli.fill_contours;
    if cli.no_datapoints {
        opts.hist2d.plot_datapoints = false;
    }

    if let Some(dpi) = cli.dpi {
        config.export.dpi = dpi;
    }
    if cli.no_text {
        config.export.include_text = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cornerplot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_overrides() {
        let cli = parse(&[
            "samples.csv",
            "--bins",
            "30",
            "--axes-scale",
            "log",
            "--truths",
            "1.5,none,2",
            "--quantiles",
            "0.16,0.5,0.84",
            "--color",
            "C1",
            "--fill-contours",
            "--no-datapoints",
            "--dpi",
            "150",
            "--no-text",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);

        let mut config = FileConfig::default();
        apply_overrides(&cli, &mut config);
        let opts = &config.corner;
        assert_eq!(opts.bins, PerDim::All(30));
        assert_eq!(opts.axes_scale, PerDim::All(Scale::Log));
        assert_eq!(opts.truths, Some(vec![Some(1.5), None, Some(2.0)]));
        assert_eq!(opts.quantiles, vec![0.16, 0.5, 0.84]);
        assert_eq!(opts.color.to_hex(), "#ff7f0e");
        assert!(opts.hist2d.fill_contours);
        assert!(!opts.hist2d.plot_datapoints);
        assert!(opts.verbose);
        assert_eq!(config.export.dpi, 150.0);
        assert!(!config.export.include_text);
    }

    #[test]
    fn test_flags_keep_file_settings() {
        let cli = parse(&["samples.csv"]);
        let mut config = FileConfig::from_toml("[corner]\nreverse = true\nsmooth = 1.0\n").unwrap();
        apply_overrides(&cli, &mut config);
        assert!(config.corner.reverse);
        assert_eq!(config.corner.smooth, Some(1.0));
        assert_eq!(config.export.dpi, 100.0);
    }

    #[test]
    fn test_print_config_with_unmarked_truth() {
        let cli = parse(&["--print-config", "--truths", "1,none"]);
        let mut config = FileConfig::default();
        apply_overrides(&cli, &mut config);

        let text = config.to_toml().unwrap();
        let reloaded = FileConfig::from_toml(&text).unwrap();
        assert_eq!(reloaded.corner.truths, Some(vec![Some(1.0), None]));
    }

    #[test]
    fn test_per_column_scales() {
        let cli = parse(&["samples.csv", "--axes-scale", "linear,log"]);
        let mut config = FileConfig::default();
        apply_overrides(&cli, &mut config);
        assert_eq!(
            config.corner.axes_scale,
            PerDim::Each(vec![Scale::Linear, Scale::Log])
        );
    }

    #[test]
    fn test_bad_arguments() {
        let args = ["cornerplot", "samples.csv", "--truths", "1,abc"];
        assert!(Cli::try_parse_from(args).is_err());
        assert!(Cli::try_parse_from(["cornerplot"]).is_err());
        assert!(Cli::try_parse_from(["cornerplot", "--print-config"]).is_ok());
    }

    #[test]
    fn test_end_to_end_svg() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("samples.csv");
        let mut content = String::from("# chain 1\nmass,radius,spin\n");
        for i in 0..400 {
            let t = i as f64 / 400.0;
            content.push_str(&format!(
                "{},{},{}\n",
                t,
                (t * 9.0).sin() + t,
                (t * 5.0).cos()
            ));
        }
        std::fs::write(&input, content).unwrap();
        let output = dir.path().join("corner.svg");
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();

        let cli = parse(&[
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
            "--columns",
            "radius,mass",
            "--show-titles",
        ]);
        run(&cli).unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("radius"));
        assert!(svg.contains("mass"));
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        let missing = dir.path().join("missing.csv");

        let cli = parse(&[
            missing.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ]);
        assert!(run(&cli).is_err());
    }
}
