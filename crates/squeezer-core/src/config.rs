use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Starting edge length for a bin dimension the caller left unspecified.
pub const SEED_DIMENSION: u32 = 8;
/// Largest bin edge the size search will try (platform texture limit).
pub const MAX_DIMENSION: u32 = 1024;
/// Gap kept between placements and against the bin edge when the border flag is on.
pub const BORDER_PADDING: u32 = 1;

/// What to do with sprites that have no visible pixel when trimming.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransparentPolicy {
    /// Keep the full original extent (offsets 0,0; not marked trimmed).
    #[default]
    Keep,
    /// Shrink to a single 1x1 pixel at the top-left corner.
    OneByOne,
}

impl FromStr for TransparentPolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "one_by_one" | "1x1" => Ok(Self::OneByOne),
            _ => Err(()),
        }
    }
}

/// Engine configuration. Fixed once handed to [`crate::Squeezer::new`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SqueezerConfig {
    /// Bin width in pixels; `None` lets the size search pick it.
    #[serde(default)]
    pub bin_width: Option<u32>,
    /// Bin height in pixels; `None` lets the size search pick it.
    #[serde(default)]
    pub bin_height: Option<u32>,
    /// Allow 90° rotations where they help a sprite fit.
    #[serde(default)]
    pub allow_rotation: bool,
    /// Log every size-search attempt at info level.
    #[serde(default)]
    pub verbose: bool,
    /// Keep a one pixel gap around every sprite and the bin edge.
    #[serde(default)]
    pub has_border: bool,

    /// Trim transparent borders (alpha <= trim_threshold).
    #[serde(default = "default_trim")]
    pub trim: bool,
    #[serde(default)]
    pub trim_threshold: u8,
    #[serde(default)]
    pub transparent_policy: TransparentPolicy,

    /// Glob patterns a sprite path must match to be loaded (empty = all).
    #[serde(default)]
    pub include: Vec<String>,
    /// Glob patterns excluding sprite paths from loading.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for SqueezerConfig {
    fn default() -> Self {
        Self {
            bin_width: None,
            bin_height: None,
            allow_rotation: false,
            verbose: false,
            has_border: false,
            trim: default_trim(),
            trim_threshold: 0,
            transparent_policy: TransparentPolicy::default(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

fn default_trim() -> bool {
    true
}

impl SqueezerConfig {
    /// Validates the configuration parameters.
    ///
    /// A fixed dimension of zero is rejected, as is a border that would leave
    /// no usable interior.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SqueezerError;

        let width = self.bin_width.unwrap_or(SEED_DIMENSION);
        let height = self.bin_height.unwrap_or(SEED_DIMENSION);
        if width == 0 || height == 0 {
            return Err(SqueezerError::InvalidDimensions { width, height });
        }
        if self.has_border && (width <= BORDER_PADDING * 2 || height <= BORDER_PADDING * 2) {
            return Err(SqueezerError::InvalidInput(format!(
                "border of {} px leaves no usable space in {}x{}",
                BORDER_PADDING, width, height
            )));
        }
        Ok(())
    }

    /// Create a fluent builder for `SqueezerConfig`.
    pub fn builder() -> SqueezerConfigBuilder {
        SqueezerConfigBuilder::new()
    }
}

/// Builder for `SqueezerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct SqueezerConfigBuilder {
    cfg: SqueezerConfig,
}

impl SqueezerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SqueezerConfig::default(),
        }
    }
    pub fn bin_width(mut self, v: u32) -> Self {
        self.cfg.bin_width = Some(v);
        self
    }
    pub fn bin_height(mut self, v: u32) -> Self {
        self.cfg.bin_height = Some(v);
        self
    }
    pub fn with_bin_dimensions(self, w: u32, h: u32) -> Self {
        self.bin_width(w).bin_height(h)
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn verbose(mut self, v: bool) -> Self {
        self.cfg.verbose = v;
        self
    }
    pub fn has_border(mut self, v: bool) -> Self {
        self.cfg.has_border = v;
        self
    }
    pub fn trim(mut self, v: bool) -> Self {
        self.cfg.trim = v;
        self
    }
    pub fn trim_threshold(mut self, v: u8) -> Self {
        self.cfg.trim_threshold = v;
        self
    }
    pub fn transparent_policy(mut self, v: TransparentPolicy) -> Self {
        self.cfg.transparent_policy = v;
        self
    }
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.cfg.include.push(pattern.into());
        self
    }
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.cfg.exclude.push(pattern.into());
        self
    }
    pub fn build(self) -> SqueezerConfig {
        self.cfg
    }
}
