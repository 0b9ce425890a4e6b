//! Core library for squeezing a directory of sprites into one texture atlas.
//!
//! - Trimming: transparent borders are cropped before packing (`trim`)
//! - Packing: next-fit decreasing-height shelves with optional 90° rotation (`packer`)
//! - Size search: bins grow from 8 px by doubling up to 1024 px (`search`)
//! - Outputs: atlas image, XML, C header/source/blob, custom text templates (`metadata`)
//!
//! Quick example:
//! ```ignore
//! use squeezer_core::prelude::*;
//! # fn main() -> squeezer_core::Result<()> {
//! let cfg = SqueezerConfig::builder().allow_rotation(true).build();
//! let mut engine = Squeezer::new(cfg)?;
//! engine.pack_dir("sprites".as_ref())?;
//! engine.output_image("atlas.png".as_ref())?;
//! engine.output_xml("atlas.xml".as_ref())?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod metadata;
pub mod model;
pub mod packer;
pub mod search;
pub mod trim;

pub use config::*;
pub use engine::Squeezer;
pub use error::*;
pub use model::*;

/// Convenience prelude for common types and functions.
/// Importing `squeezer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{SqueezerConfig, SqueezerConfigBuilder, TransparentPolicy};
    pub use crate::engine::Squeezer;
    pub use crate::error::{Result, SqueezerError};
    pub use crate::metadata::{OutputMode, PlaceholderPolicy, SpriteRecord, TemplateSpec};
    pub use crate::model::{Bin, PackItem, PackStats, PackedAtlas, Placement, Rect, Sprite, TrimBox};
    pub use crate::search::{BinSizes, SearchOptions, find_fit};
}
