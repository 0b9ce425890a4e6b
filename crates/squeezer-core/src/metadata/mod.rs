//! Metadata emitters: XML, compilable C data and user templates.
//!
//! Every emitter reads the same flattened [`SpriteRecord`] view and renders
//! into memory; [`write_atomic`] puts the result on disk.

use crate::error::Result;
use crate::model::{PackedAtlas, Sprite};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub mod cdata;
pub mod template;
pub mod xml;

pub use cdata::CData;
pub use template::{PlaceholderPolicy, Template, TemplateSpec};
pub use xml::to_xml;

/// Per-sprite fields shared by all metadata formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRecord<'a> {
    pub name: &'a str,
    /// Position on the atlas.
    pub x: u32,
    pub y: u32,
    /// Trimmed size, before rotation.
    pub width: u32,
    pub height: u32,
    /// Trim offsets within the original image.
    pub left: u32,
    pub top: u32,
    pub original_width: u32,
    pub original_height: u32,
    pub rotated: bool,
}

/// Flattens placements into records, ordered like the sprite list.
pub fn records<'a>(sprites: &'a [Sprite], atlas: &PackedAtlas) -> Vec<SpriteRecord<'a>> {
    let mut out: Vec<(usize, SpriteRecord<'a>)> = atlas
        .placements
        .iter()
        .filter_map(|p| {
            let s = sprites.get(p.id)?;
            let (ow, oh) = s.original_size();
            Some((
                p.id,
                SpriteRecord {
                    name: &s.name,
                    x: p.x,
                    y: p.y,
                    width: s.trim.width,
                    height: s.trim.height,
                    left: s.trim.left,
                    top: s.trim.top,
                    original_width: ow,
                    original_height: oh,
                    rotated: p.rotated,
                },
            ))
        })
        .collect();
    out.sort_by_key(|(id, _)| *id);
    out.into_iter().map(|(_, r)| r).collect()
}

/// Output modes of the engine; each variant carries exactly what it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Composed atlas image; the format follows the file extension.
    Image { path: PathBuf },
    /// XML sprite sheet description.
    Xml { path: PathBuf },
    /// C source/header tables plus an optional packed binary blob.
    CData {
        base_name: String,
        source: PathBuf,
        header: PathBuf,
        blob: Option<PathBuf>,
    },
    /// Text assembled from header/body/split/footer templates.
    Template { path: PathBuf, spec: TemplateSpec },
}

/// Writes through a temp file in the destination directory and renames it
/// into place, so a failed write never leaves a partial file at `path`.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        write(&mut w)?;
        w.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    write_atomic(path, |w| {
        w.write_all(text.as_bytes())?;
        Ok(())
    })
}
