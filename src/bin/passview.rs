use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rayon::prelude::*;

use passview::{
    FieldGroupKind, FontSpec, MonospaceMeasurer, NominalBarcodeEncoder, ParleyMeasurer, Pass,
    PassArchive, PassSource, RenderConfig, RenderedPass, TextExtent, TextMeasurer,
};

#[derive(Parser, Debug)]
#[command(name = "passview", version)]
struct Cli {
    /// Log decode and layout decisions to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a JSON summary of a pass.
    Inspect(InspectArgs),
    /// Lay out the front of one or more passes as JSON draw lists.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Pass container (.pkpass).
    file: PathBuf,

    /// Preferred locale, highest priority first. Defaults to the environment.
    #[arg(long = "locale")]
    locales: Vec<String>,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Pass containers (.pkpass).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Preferred locale, highest priority first. Defaults to the environment.
    #[arg(long = "locale")]
    locales: Vec<String>,

    /// Font file used to measure text. Without it a fixed-advance approximation is used.
    #[arg(long)]
    font: Option<PathBuf>,

    /// JSON file overriding the render configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write `<stem>.layout.json` files into this directory instead of printing.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn locale_preferences(args: &[String]) -> Vec<String> {
    if args.is_empty() {
        passview::preferred_locales_from_env()
    } else {
        args.to_vec()
    }
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let archive = PassArchive::from_path(&args.file)?;
    let preferences = locale_preferences(&args.locales);
    let pass = archive
        .load_pass(&preferences)
        .with_context(|| format!("load pass '{}'", args.file.display()))?;

    let summary = summarize(&args.file, &archive, &pass);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn summarize(path: &Path, archive: &PassArchive, pass: &Pass<'_>) -> serde_json::Value {
    let groups = FieldGroupKind::ALL
        .into_iter()
        .map(|kind| {
            let fields = match kind {
                FieldGroupKind::Header => &pass.header_fields,
                FieldGroupKind::Primary => &pass.primary_fields,
                FieldGroupKind::Secondary => &pass.secondary_fields,
                FieldGroupKind::Auxiliary => &pass.auxiliary_fields,
                FieldGroupKind::Back => &pass.back_fields,
            };
            (kind.json_key().to_string(), serde_json::json!(fields))
        })
        .collect::<serde_json::Map<_, _>>();

    serde_json::json!({
        "file": path.display().to_string(),
        "formatVersion": pass.format_version,
        "passTypeIdentifier": pass.pass_type_identifier,
        "serialNumber": pass.serial_number,
        "teamIdentifier": pass.team_identifier,
        "organizationName": pass.organization_name,
        "description": pass.description,
        "style": pass.style_kind(),
        "transitType": pass.transit_type(),
        "groupingIdentifier": pass.grouping_identifier(),
        "logoText": pass.logo_text,
        "voided": pass.voided,
        "expirationDate": pass.expiration_date,
        "relevantDate": pass.relevant_date,
        "locations": pass.locations,
        "colors": {
            "background": pass.background_color(),
            "foreground": pass.foreground_color(),
            "label": pass.label_color(),
        },
        "fields": groups,
        "barcodes": pass.barcode_candidates().collect::<Vec<_>>(),
        "images": archive.images().keys().collect::<Vec<_>>(),
        "locales": {
            "available": archive.locales().collect::<Vec<_>>(),
            "selected": pass.locale,
        },
    })
}

/// Per-worker text measurer.
enum Measurer {
    Parley(Box<ParleyMeasurer>),
    Monospace(MonospaceMeasurer),
}

impl Measurer {
    fn new(font: Option<&[u8]>) -> passview::PassResult<Self> {
        match font {
            Some(bytes) => Ok(Self::Parley(Box::new(ParleyMeasurer::from_font_bytes(
                bytes.to_vec(),
            )?))),
            None => Ok(Self::Monospace(MonospaceMeasurer::default())),
        }
    }
}

impl TextMeasurer for Measurer {
    fn measure(&mut self, text: &str, font: &FontSpec, wrap_width: Option<f64>) -> TextExtent {
        match self {
            Self::Parley(m) => m.measure(text, font, wrap_width),
            Self::Monospace(m) => m.measure(text, font, wrap_width),
        }
    }
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => RenderConfig::from_path(path)?,
        None => RenderConfig::default(),
    };
    let font = args
        .font
        .as_ref()
        .map(|p| std::fs::read(p).with_context(|| format!("read font '{}'", p.display())))
        .transpose()?;
    // Fail on a bad font before spinning up workers.
    Measurer::new(font.as_deref())?;

    let preferences = locale_preferences(&args.locales);
    let pool = build_thread_pool(args.threads)?;

    let results: Vec<anyhow::Result<RenderedPass>> = pool.install(|| {
        args.files
            .par_iter()
            .map_init(
                || Measurer::new(font.as_deref()),
                |measurer, path| -> anyhow::Result<RenderedPass> {
                    let measurer = measurer
                        .as_mut()
                        .map_err(|e| anyhow::anyhow!("measurer setup failed: {e}"))?;
                    layout_one(path, measurer, &cfg, &preferences)
                        .with_context(|| format!("lay out '{}'", path.display()))
                },
            )
            .collect()
    });

    if let Some(dir) = &args.out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
    }

    let names = layout_file_names(&args.files);
    let mut printed = Vec::new();
    let mut failures = 0usize;
    for ((path, name), result) in args.files.iter().zip(&names).zip(results) {
        let rendered = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e:#}");
                failures += 1;
                continue;
            }
        };
        match &args.out {
            Some(dir) => {
                let out = dir.join(name);
                let f = std::fs::File::create(&out)
                    .with_context(|| format!("create '{}'", out.display()))?;
                serde_json::to_writer_pretty(f, &rendered)
                    .with_context(|| format!("write '{}'", out.display()))?;
                eprintln!("wrote {}", out.display());
            }
            None => printed.push(serde_json::json!({
                "file": path.display().to_string(),
                "layout": rendered,
            })),
        }
    }

    if args.out.is_none() {
        println!("{}", serde_json::to_string_pretty(&printed)?);
    }
    if failures > 0 {
        anyhow::bail!("{failures} of {} passes failed", args.files.len());
    }
    Ok(())
}

fn layout_one(
    path: &Path,
    measurer: &mut Measurer,
    cfg: &RenderConfig,
    preferences: &[String],
) -> anyhow::Result<RenderedPass> {
    let archive = PassArchive::from_path(path)?;
    let pass = archive.load_pass(preferences)?;
    Ok(passview::render(
        PassSource::Wallet(&pass),
        measurer,
        &NominalBarcodeEncoder,
        cfg,
    ))
}

/// `<stem>.layout.json` per input; repeated stems get `-2`, `-3`, ... suffixes.
fn layout_file_names(paths: &[PathBuf]) -> Vec<String> {
    let mut used = BTreeSet::new();
    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "pass".to_string());
            let mut name = format!("{stem}.layout.json");
            let mut n = 2usize;
            while !used.insert(name.clone()) {
                name = format!("{stem}-{n}.layout.json");
                n += 1;
            }
            name
        })
        .collect()
}

fn build_thread_pool(threads: Option<usize>) -> anyhow::Result<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        anyhow::bail!("--threads must be >= 1 when set");
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().context("build rayon thread pool")
}
