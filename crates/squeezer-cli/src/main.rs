use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use serde::Deserialize;
use squeezer_core::prelude::*;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "squeezer",
    about = "Squeeze a directory of sprites into one texture atlas",
    version,
    author
)]
struct Cli {
    /// Directory of sprite images (searched recursively)
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// YAML config file path (overrides layout and image options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Atlas width; searched from 8 up to 1024 when omitted or 0
    #[arg(long, help_heading = "Layout")]
    width: Option<u32>,
    /// Atlas height; searched from 8 up to 1024 when omitted or 0
    #[arg(long, help_heading = "Layout")]
    height: Option<u32>,
    /// Allow 90° rotations (1/0/true/false/yes/no)
    #[arg(
        long,
        value_parser = parse_bool,
        default_value = "false",
        action = ArgAction::Set,
        help_heading = "Layout"
    )]
    allow_rotations: bool,
    /// Keep a one pixel border around every sprite (1/0/true/false/yes/no)
    #[arg(
        long,
        value_parser = parse_bool,
        default_value = "false",
        action = ArgAction::Set,
        help_heading = "Layout"
    )]
    border: bool,

    // Image Processing
    /// Keep transparent borders instead of trimming them
    #[arg(long, default_value_t = false, help_heading = "Image Processing")]
    no_trim: bool,
    /// Trim alpha threshold (0..=255)
    #[arg(long, default_value_t = 0, help_heading = "Image Processing")]
    trim_threshold: u8,
    /// Policy for fully transparent images when trim is on: keep | one_by_one
    #[arg(long, default_value = "keep", help_heading = "Image Processing")]
    transparent_policy: String,

    // Export
    /// Atlas image path; the format follows the extension
    #[arg(long, default_value = "squeezer.png", help_heading = "Export")]
    output_texture: PathBuf,
    /// Sprite info path (XML or custom template output)
    #[arg(long, default_value = "squeezer.xml", help_heading = "Export")]
    output_info: PathBuf,
    /// C header path (defaults to <base name>.h)
    #[arg(long, help_heading = "Export")]
    output_h: Option<PathBuf>,
    /// C source path (defaults to <base name>.c)
    #[arg(long, help_heading = "Export")]
    output_c: Option<PathBuf>,
    /// Binary sprite table for loading from a file system
    #[arg(long, help_heading = "Export")]
    output_nitro: Option<PathBuf>,
    /// Identifier prefix of the C tables; selects C output
    #[arg(long, help_heading = "Export")]
    output_base_name: Option<String>,
    /// Custom template: text before the first sprite
    #[arg(long, help_heading = "Template")]
    info_header: Option<String>,
    /// Custom template: text rendered per sprite; selects template output
    #[arg(long, help_heading = "Template")]
    info_body: Option<String>,
    /// Custom template: text between two sprites
    #[arg(long, help_heading = "Template")]
    info_split: Option<String>,
    /// Custom template: text after the last sprite
    #[arg(long, help_heading = "Template")]
    info_footer: Option<String>,
    /// Fail on unknown % sequences instead of copying them
    #[arg(long, default_value_t = false, help_heading = "Template")]
    strict_template: bool,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,

    /// Increase verbosity (-v logs every size attempt, -vv traces the packer)
    #[arg(short, long, action = ArgAction::Count, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(short, long, default_value_t = false, help_heading = "Logging")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut cfg = base_config(cli)?;
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.apply(cfg)?;
    }

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let mut engine = Squeezer::new(cfg).context("invalid configuration")?;
    engine
        .pack_dir(&cli.input)
        .with_context(|| format!("pack {}", cli.input.display()))?;
    if let Some(atlas) = engine.packed() {
        info!("{}", atlas.stats(engine.sprites()).summary());
    }

    engine
        .emit(&OutputMode::Image {
            path: cli.output_texture.clone(),
        })
        .with_context(|| format!("write texture {}", cli.output_texture.display()))?;

    let metadata = metadata_mode(cli);
    engine
        .emit(&metadata)
        .with_context(|| format!("write metadata ({})", describe(&metadata)))?;
    Ok(())
}

fn base_config(cli: &Cli) -> anyhow::Result<SqueezerConfig> {
    let mut b = SqueezerConfig::builder()
        .allow_rotation(cli.allow_rotations)
        .has_border(cli.border)
        .verbose(cli.verbose > 0 && !cli.quiet)
        .trim(!cli.no_trim)
        .trim_threshold(cli.trim_threshold)
        .transparent_policy(parse_transparent_policy(&cli.transparent_policy)?);
    // 0 leaves the dimension to the size search.
    if let Some(w) = cli.width.filter(|&w| w != 0) {
        b = b.bin_width(w);
    }
    if let Some(h) = cli.height.filter(|&h| h != 0) {
        b = b.bin_height(h);
    }
    for pat in &cli.include {
        b = b.include(pat.clone());
    }
    for pat in &cli.exclude {
        b = b.exclude(pat.clone());
    }
    Ok(b.build())
}

/// Exactly one metadata output per run: C tables when a base name or a blob
/// path is given, else a custom template when a body is given, else XML.
fn metadata_mode(cli: &Cli) -> OutputMode {
    if cli.output_base_name.is_some() || cli.output_nitro.is_some() {
        let base_name = cli
            .output_base_name
            .clone()
            .unwrap_or_else(|| "squeezer".to_string());
        return OutputMode::CData {
            source: cli
                .output_c
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{base_name}.c"))),
            header: cli
                .output_h
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{base_name}.h"))),
            blob: cli.output_nitro.clone(),
            base_name,
        };
    }
    if let Some(body) = &cli.info_body {
        let mut spec = TemplateSpec::new(body.clone()).policy(if cli.strict_template {
            PlaceholderPolicy::Reject
        } else {
            PlaceholderPolicy::PassThrough
        });
        spec.header = cli.info_header.clone();
        spec.split = cli.info_split.clone();
        spec.footer = cli.info_footer.clone();
        return OutputMode::Template {
            path: cli.output_info.clone(),
            spec,
        };
    }
    OutputMode::Xml {
        path: cli.output_info.clone(),
    }
}

fn describe(mode: &OutputMode) -> String {
    let show = |p: &Path| p.display().to_string();
    match mode {
        OutputMode::Image { path } => format!("image {}", show(path)),
        OutputMode::Xml { path } => format!("xml {}", show(path)),
        OutputMode::CData { source, header, .. } => {
            format!("c {} / {}", show(source), show(header))
        }
        OutputMode::Template { path, .. } => format!("template {}", show(path)),
    }
}

fn parse_bool(s: &str) -> std::result::Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(format!("expected 1/0/true/false/yes/no, got '{other}'")),
    }
}

fn parse_transparent_policy(s: &str) -> anyhow::Result<TransparentPolicy> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown transparent policy: {}", s))
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 | 1 => "info".into(),
            2 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    width: Option<u32>,
    height: Option<u32>,
    allow_rotation: Option<bool>,
    border: Option<bool>,
    verbose: Option<bool>,
    trim: Option<bool>,
    trim_threshold: Option<u8>,
    transparent_policy: Option<String>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
}

impl YamlConfig {
    fn apply(self, mut cfg: SqueezerConfig) -> anyhow::Result<SqueezerConfig> {
        if let Some(v) = self.width {
            cfg.bin_width = (v != 0).then_some(v);
        }
        if let Some(v) = self.height {
            cfg.bin_height = (v != 0).then_some(v);
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        if let Some(v) = self.border {
            cfg.has_border = v;
        }
        if let Some(v) = self.verbose {
            cfg.verbose = v;
        }
        if let Some(v) = self.trim {
            cfg.trim = v;
        }
        if let Some(v) = self.trim_threshold {
            cfg.trim_threshold = v;
        }
        if let Some(v) = self.transparent_policy {
            cfg.transparent_policy = parse_transparent_policy(&v)?;
        }
        if let Some(v) = self.include {
            cfg.include = v;
        }
        if let Some(v) = self.exclude {
            cfg.exclude = v;
        }
        Ok(cfg)
    }
}
