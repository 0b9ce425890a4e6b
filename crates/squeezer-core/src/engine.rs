use crate::compositing::compose;
use crate::config::SqueezerConfig;
use crate::error::{Result, SqueezerError};
use crate::loader::load_dir;
use crate::metadata::{self, CData, OutputMode, TemplateSpec, records, to_xml, write_atomic};
use crate::model::{PackItem, PackedAtlas, Sprite};
use crate::search::{SearchOptions, find_fit};
use image::{ImageFormat, RgbaImage};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{info, instrument};

fn first_duplicate(sprites: &[Sprite]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(sprites.len());
    sprites
        .iter()
        .map(|s| s.name.as_str())
        .find(|name| !seen.insert(*name))
}

/// Packing engine: owns the configuration, the loaded sprites and the last
/// accepted atlas. Outputs are available only after a successful pack.
#[derive(Debug)]
pub struct Squeezer {
    config: SqueezerConfig,
    sprites: Vec<Sprite>,
    packed: Option<PackedAtlas>,
}

impl Squeezer {
    /// Validates `config` and creates an empty engine.
    pub fn new(config: SqueezerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sprites: Vec::new(),
            packed: None,
        })
    }

    pub fn config(&self) -> &SqueezerConfig {
        &self.config
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn packed(&self) -> Option<&PackedAtlas> {
        self.packed.as_ref()
    }

    /// Loads every sprite under `dir` and searches for a bin that fits them all.
    #[instrument(skip(self))]
    pub fn pack_dir(&mut self, dir: &Path) -> Result<&PackedAtlas> {
        let sprites = load_dir(dir, &self.config)?;
        info!(count = sprites.len(), "loaded sprites");
        self.pack_sprites(sprites)
    }

    /// Packs already-loaded sprites, replacing any previous result.
    pub fn pack_sprites(&mut self, sprites: Vec<Sprite>) -> Result<&PackedAtlas> {
        self.packed = None;
        if let Some(s) = sprites.iter().find(|s| s.trim.width == 0 || s.trim.height == 0) {
            return Err(SqueezerError::InvalidInput(format!(
                "sprite '{}' has no pixels",
                s.name
            )));
        }
        if let Some(name) = first_duplicate(&sprites) {
            return Err(SqueezerError::InvalidInput(format!(
                "duplicate sprite name '{}'",
                name
            )));
        }
        self.sprites = sprites;
        let items: Vec<PackItem> = self
            .sprites
            .iter()
            .enumerate()
            .map(|(i, s)| PackItem::from_sprite(i, s))
            .collect();
        let atlas = find_fit(&items, SearchOptions::from(&self.config))?;
        info!(
            width = atlas.bin.width,
            height = atlas.bin.height,
            attempts = atlas.attempts.len(),
            "atlas packed"
        );
        Ok(&*self.packed.insert(atlas))
    }

    fn require_packed(&self) -> Result<&PackedAtlas> {
        self.packed.as_ref().ok_or(SqueezerError::NotPacked)
    }

    /// Renders the composed atlas in memory.
    pub fn atlas_image(&self) -> Result<RgbaImage> {
        Ok(compose(&self.sprites, self.require_packed()?))
    }

    /// Writes the atlas image; the encoder is picked from the extension.
    pub fn output_image(&self, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path)?;
        let image = self.atlas_image()?;
        let mut encoded = Cursor::new(Vec::new());
        image.write_to(&mut encoded, format)?;
        write_atomic(path, |w| {
            w.write_all(encoded.get_ref())?;
            Ok(())
        })?;
        info!(?path, "wrote atlas image");
        Ok(())
    }

    /// Renders the XML description in memory.
    pub fn xml(&self) -> Result<String> {
        let atlas = self.require_packed()?;
        Ok(to_xml(
            atlas.width(),
            atlas.height(),
            &records(&self.sprites, atlas),
        ))
    }

    pub fn output_xml(&self, path: &Path) -> Result<()> {
        let xml = self.xml()?;
        metadata::write_text(path, &xml)?;
        info!(?path, "wrote xml");
        Ok(())
    }

    /// Builds the C tables for the packed atlas.
    pub fn c_data(&self, base_name: &str) -> Result<CData> {
        let atlas = self.require_packed()?;
        CData::new(
            base_name,
            atlas.width(),
            atlas.height(),
            &records(&self.sprites, atlas),
        )
    }

    /// Writes the C source, the C header and optionally the binary blob.
    /// The source includes the header by its file name.
    pub fn output_c(
        &self,
        base_name: &str,
        source: &Path,
        header: &Path,
        blob: Option<&Path>,
    ) -> Result<()> {
        let data = self.c_data(base_name)?;
        let include = header
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SqueezerError::InvalidInput(format!(
                    "header path has no file name: {}",
                    header.display()
                ))
            })?;
        metadata::write_text(header, &data.header())?;
        metadata::write_text(source, &data.source(&include))?;
        if let Some(blob) = blob {
            let bytes = data.blob();
            write_atomic(blob, |w| {
                w.write_all(&bytes)?;
                Ok(())
            })?;
        }
        info!(?source, ?header, ?blob, "wrote c data");
        Ok(())
    }

    /// Renders a custom template in memory.
    pub fn render_template(&self, spec: &TemplateSpec) -> Result<String> {
        let template = spec.compile()?;
        let atlas = self.require_packed()?;
        Ok(template.render(
            atlas.width(),
            atlas.height(),
            &records(&self.sprites, atlas),
        ))
    }

    /// Writes a custom template. A malformed template fails before the file is touched.
    pub fn output_custom(&self, path: &Path, spec: &TemplateSpec) -> Result<()> {
        let text = self.render_template(spec)?;
        metadata::write_text(path, &text)?;
        info!(?path, "wrote custom metadata");
        Ok(())
    }

    /// Dispatches one output mode.
    pub fn emit(&self, mode: &OutputMode) -> Result<()> {
        match mode {
            OutputMode::Image { path } => self.output_image(path),
            OutputMode::Xml { path } => self.output_xml(path),
            OutputMode::CData {
                base_name,
                source,
                header,
                blob,
            } => self.output_c(base_name, source, header, blob.as_deref()),
            OutputMode::Template { path, spec } => self.output_custom(path, spec),
        }
    }
}
