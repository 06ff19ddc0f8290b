use clap::{Parser, Subcommand};
use photo_framer::config::{self, CanvasPreset, FramerConfig};
use photo_framer::export::{self, SourceFile};
use photo_framer::imaging::RustBackend;
use photo_framer::{PROMO_CAPTION, output};
use std::path::{Path, PathBuf};

/// Flags that override `config.toml` for a single run.
///
/// Every flag is optional; only the ones given are layered over the config.
#[derive(clap::Args, Clone, Default)]
struct FrameArgs {
    /// Canvas preset
    #[arg(long, value_parser = parse_preset)]
    preset: Option<CanvasPreset>,

    /// Explicit canvas size as WIDTHxHEIGHT (overrides --preset)
    #[arg(long, value_parser = parse_size)]
    size: Option<[u32; 2]>,

    /// Photo width as a fraction of the canvas width (0.2 - 2.0)
    #[arg(long)]
    scale: Option<f64>,

    /// Horizontal offset from center, in pixels
    #[arg(long, allow_hyphen_values = true)]
    x_offset: Option<i64>,

    /// Vertical offset from center, in pixels
    #[arg(long, allow_hyphen_values = true)]
    y_offset: Option<i64>,

    /// Do not read EXIF from the photos
    #[arg(long)]
    no_exif: bool,

    /// Where the date line comes from
    #[arg(long, value_parser = ["none", "from-metadata", "from-creation-time"])]
    date_source: Option<String>,

    /// Manual aperture (overrides EXIF)
    #[arg(long)]
    aperture: Option<String>,

    /// Manual shutter speed (overrides EXIF)
    #[arg(long)]
    shutter_speed: Option<String>,

    /// Manual ISO (overrides EXIF)
    #[arg(long)]
    iso: Option<String>,

    /// Manual focal length (overrides EXIF)
    #[arg(long)]
    focal_length: Option<String>,

    /// Manual date, YYYY:MM:DD HH:MM:SS (shown with --date-source from-metadata)
    #[arg(long)]
    date: Option<String>,

    /// Caption line
    #[arg(long)]
    caption: Option<String>,

    /// Filter label, rendered as "Filter: <label>.flt"
    #[arg(long)]
    filter: Option<String>,

    /// TTF/OTF font file (built-in bitmap font when omitted or unreadable)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Text size in pixels
    #[arg(long)]
    font_size: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(long)]
    quality: Option<u32>,
}

impl FrameArgs {
    /// The given flags as a sparse config table.
    fn overlay(&self) -> toml::Value {
        let mut root = toml::Table::new();
        let mut set = |path: &[&str], value: toml::Value| insert_path(&mut root, path, value);

        if let Some(preset) = self.preset {
            set(&["canvas", "preset"], preset.name().into());
        }
        if let Some([w, h]) = self.size {
            set(
                &["canvas", "size"],
                toml::Value::Array(vec![i64::from(w).into(), i64::from(h).into()]),
            );
        }
        if let Some(scale) = self.scale {
            set(&["layout", "scale"], scale.into());
        }
        if let Some(x) = self.x_offset {
            set(&["layout", "x_offset"], x.into());
        }
        if let Some(y) = self.y_offset {
            set(&["layout", "y_offset"], y.into());
        }
        if self.no_exif {
            set(&["metadata", "extract"], false.into());
        }
        if let Some(source) = &self.date_source {
            set(&["metadata", "date_source"], source.as_str().into());
        }
        for (key, value) in [
            ("aperture", &self.aperture),
            ("shutter_speed", &self.shutter_speed),
            ("iso", &self.iso),
            ("focal_length", &self.focal_length),
            ("date", &self.date),
        ] {
            if let Some(value) = value {
                set(&["metadata", "manual", key], value.as_str().into());
            }
        }
        if let Some(caption) = &self.caption {
            set(&["text", "caption"], caption.as_str().into());
        }
        if let Some(filter) = &self.filter {
            set(&["text", "filter"], filter.as_str().into());
        }
        if let Some(font) = &self.font {
            set(&["text", "font"], font.to_string_lossy().into_owned().into());
        }
        if let Some(size) = self.font_size {
            set(&["text", "font_size"], i64::from(size).into());
        }
        if let Some(quality) = self.quality {
            set(&["output", "jpeg_quality"], i64::from(quality).into());
        }

        toml::Value::Table(root)
    }
}

#[derive(clap::Args)]
struct FrameCommand {
    /// Photos to frame (one → single image, several → zip archive)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Write a JSON report of every photo's outcome
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(flatten)]
    options: FrameArgs,
}

#[derive(clap::Args)]
struct PreviewCommand {
    /// Photo to preview
    input: PathBuf,

    /// Output file (format from extension)
    #[arg(long, default_value = "preview.png")]
    out: PathBuf,

    /// Preview width in pixels
    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    #[command(flatten)]
    options: FrameArgs,
}

#[derive(Parser)]
#[command(name = "photo-framer")]
#[command(about = "Frame photos on social media canvases with camera metadata")]
#[command(long_about = "\
Frame photos on social media canvases with camera metadata

Each photo is scaled onto a white canvas and a text stack is drawn below it:

  ┌──────────────────────────────┐
  │   ┌──────────────────────┐   │
  │   │        photo         │   │
  │   └──────────────────────┘   │
  │  Aperture: 2.8 | ISO: 200.0  │  camera settings (EXIF or manual)
  │  Day 1                       │  --caption
  │  Filter: retro.flt           │  --filter
  │  Date: 2024:06:01 09:05:07   │  --date-source
  └──────────────────────────────┘

One photo is written as framed_<name>; several are packed into
framed_photos.zip. Settings are read from stock defaults, then --config,
then flags.

Run 'photo-framer gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file layered over the stock defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Frame photos and export an image or a zip archive
    Frame(FrameCommand),
    /// Render a downscaled preview of one framed photo
    Preview(PreviewCommand),
    /// List the canvas presets
    Presets,
    /// Print the promotional caption
    Caption,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Frame(cmd) => {
            let config = resolve_config(cli.config.as_deref(), &cmd.options)?;
            init_thread_pool(&config.processing);
            let sources = read_sources(&cmd.inputs)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_export_event(&event);
                }
            });
            let result = export::export(&sources, &config, Some(tx));
            printer
                .join()
                .map_err(|_| "output thread panicked")?;
            let result = result?;

            std::fs::create_dir_all(&cmd.out)?;
            let destination = cmd.out.join(result.bundle.file_name());
            std::fs::write(&destination, result.bundle.bytes())?;
            println!(
                "{}",
                output::format_summary(&result.report, &destination.display().to_string())
            );

            if let Some(report_path) = &cmd.report {
                let json = serde_json::to_string_pretty(&result.report)?;
                std::fs::write(report_path, json)?;
            }

            let failed = result.report.failed_count();
            if failed > 0 {
                return Err(format!("{failed} photo(s) could not be framed").into());
            }
        }
        Command::Preview(cmd) => {
            let config = resolve_config(cli.config.as_deref(), &cmd.options)?;
            let source = read_source(&cmd.input)?;
            let preview = export::preview(&RustBackend::new(), &source, &config, cmd.width)?;
            preview.save(&cmd.out)?;
            println!(
                "Preview {}x{} → {}",
                preview.width(),
                preview.height(),
                cmd.out.display()
            );
        }
        Command::Presets => output::print_presets(),
        Command::Caption => println!("{PROMO_CAPTION}"),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stock defaults, then the optional config file, then CLI flags.
fn resolve_config(
    config_path: Option<&Path>,
    args: &FrameArgs,
) -> Result<FramerConfig, config::ConfigError> {
    let file = config_path.map(config::load_raw_config).transpose()?;
    config::resolve_config(file.into_iter().chain([args.overlay()]))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn read_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>, String> {
    paths.iter().map(|p| read_source(p)).collect()
}

fn read_source(path: &Path) -> Result<SourceFile, String> {
    SourceFile::read(path).map_err(|e| format!("{}: {e}", path.display()))
}

/// Set `root[path[0]][path[1]]... = value`, creating tables on the way.
fn insert_path(root: &mut toml::Table, path: &[&str], value: toml::Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut table = root;
    for key in parents {
        let entry = table
            .entry(key.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        let Some(child) = entry.as_table_mut() else {
            return;
        };
        table = child;
    }
    table.insert(last.to_string(), value);
}

fn parse_preset(name: &str) -> Result<CanvasPreset, String> {
    CanvasPreset::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = CanvasPreset::ALL.iter().map(|p| p.name()).collect();
        format!("unknown preset '{name}' (expected one of: {})", names.join(", "))
    })
}

fn parse_size(value: &str) -> Result<[u32; 2], String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid size '{value}': {e}"))
    };
    Ok([parse(w)?, parse(h)?])
}
