use crate::config::SqueezerConfig;
use crate::error::{Result, SqueezerError};
use crate::model::Sprite;
use crate::trim::trim_sprite;
use globset::{Glob, GlobSet, GlobSetBuilder};
use image::{ImageReader, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Include/exclude glob filter applied to sprite paths relative to the input directory.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
        })
    }

    pub fn accepts(&self, rel: &str) -> bool {
        if self.exclude.as_ref().is_some_and(|ex| ex.is_match(rel)) {
            return false;
        }
        self.include.as_ref().is_none_or(|inc| inc.is_match(rel))
    }
}

fn build_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat)?);
    }
    Ok(Some(b.build()?))
}

pub fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif")
    )
}

/// Sprite name for `path`: relative to `root`, `/`-separated, extension dropped.
pub fn sprite_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.with_extension("")
        .to_string_lossy()
        .replace('\\', "/")
}

/// Builds a sprite from decoded pixels, applying the configured trim.
pub fn make_sprite(name: impl Into<String>, rgba: RgbaImage, cfg: &SqueezerConfig) -> Sprite {
    let trim = trim_sprite(&rgba, cfg.trim, cfg.trim_threshold, cfg.transparent_policy);
    Sprite {
        name: name.into(),
        rgba,
        trim,
    }
}

/// Lists image files under `dir` that pass the filter, sorted by path.
pub fn gather_paths(dir: &Path, filter: &PathFilter) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SqueezerError::InvalidInput(format!(
            "not a directory: {}",
            dir.display()
        )));
    }
    let mut list = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let p = entry.path();
        if !entry.file_type().is_file() || !is_image(p) {
            continue;
        }
        let rel = p
            .strip_prefix(dir)
            .unwrap_or(p)
            .to_string_lossy()
            .replace('\\', "/");
        if filter.accepts(&rel) {
            list.push(p.to_path_buf());
        }
    }
    Ok(list)
}

/// Fails when two paths map to the same sprite name, e.g. `hero.png` and `hero.jpg`.
pub fn check_unique_names(dir: &Path, paths: &[PathBuf]) -> Result<()> {
    let mut named: Vec<(String, &PathBuf)> = paths
        .iter()
        .map(|p| (sprite_name(dir, p), p))
        .collect();
    named.sort();
    for pair in named.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(SqueezerError::InvalidInput(format!(
                "duplicate sprite name '{}' ({} and {})",
                pair[0].0,
                pair[0].1.display(),
                pair[1].1.display()
            )));
        }
    }
    Ok(())
}

/// Loads and trims every sprite image under `dir`.
///
/// Any unreadable image aborts the load, and so does a name shared by two
/// files. Sprites come back sorted by name.
#[instrument(skip(cfg))]
pub fn load_dir(dir: &Path, cfg: &SqueezerConfig) -> Result<Vec<Sprite>> {
    let filter = PathFilter::new(&cfg.include, &cfg.exclude)?;
    let paths = gather_paths(dir, &filter)?;
    if paths.is_empty() {
        return Err(SqueezerError::Empty);
    }
    check_unique_names(dir, &paths)?;
    let mut sprites = Vec::with_capacity(paths.len());
    for p in &paths {
        let rgba = ImageReader::open(p)?
            .with_guessed_format()?
            .decode()?
            .to_rgba8();
        let sprite = make_sprite(sprite_name(dir, p), rgba, cfg);
        debug!(
            name = %sprite.name,
            w = sprite.rgba.width(),
            h = sprite.rgba.height(),
            trimmed_w = sprite.trim.width,
            trimmed_h = sprite.trim.height,
            "loaded sprite"
        );
        sprites.push(sprite);
    }
    sprites.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sprites)
}
