use crate::config::{MAX_DIMENSION, SEED_DIMENSION};
use crate::error::{Result, SqueezerError};
use crate::model::{Bin, PackItem, PackedAtlas};
use crate::packer;
use tracing::{debug, info, instrument};

/// Inputs of the size search: requested dimensions and packing flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub allow_rotation: bool,
    pub has_border: bool,
    pub verbose: bool,
}

impl From<&crate::config::SqueezerConfig> for SearchOptions {
    fn from(cfg: &crate::config::SqueezerConfig) -> Self {
        Self {
            width: cfg.bin_width,
            height: cfg.bin_height,
            allow_rotation: cfg.allow_rotation,
            has_border: cfg.has_border,
            verbose: cfg.verbose,
        }
    }
}

/// Candidate bin sizes in the order the search tries them.
///
/// Fixed dimensions never change. Open dimensions start at
/// [`SEED_DIMENSION`] and double after each candidate: the only open one, or
/// the smaller of two (width on ties). The sequence ends once the next size
/// would exceed [`MAX_DIMENSION`] on either axis. With both dimensions fixed
/// it yields exactly one size.
#[derive(Debug, Clone)]
pub struct BinSizes {
    width: u32,
    height: u32,
    grow_width: bool,
    grow_height: bool,
    done: bool,
}

impl BinSizes {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width: width.unwrap_or(SEED_DIMENSION),
            height: height.unwrap_or(SEED_DIMENSION),
            grow_width: width.is_none(),
            grow_height: height.is_none(),
            done: false,
        }
    }

    fn grow(&mut self) {
        match (self.grow_width, self.grow_height) {
            (true, true) => {
                if self.width <= self.height {
                    self.width = self.width.saturating_mul(2);
                } else {
                    self.height = self.height.saturating_mul(2);
                }
            }
            (true, false) => self.width = self.width.saturating_mul(2),
            (false, true) => self.height = self.height.saturating_mul(2),
            (false, false) => self.done = true,
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            self.done = true;
        }
    }
}

impl Iterator for BinSizes {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = (self.width, self.height);
        self.grow();
        Some(current)
    }
}

/// Grows the bin until every item packs.
///
/// Fails with [`SqueezerError::OutOfSpace`] when both dimensions were fixed,
/// and with [`SqueezerError::SearchExhausted`] when growing ran past the
/// ceiling.
#[instrument(skip_all, fields(items = items.len()))]
pub fn find_fit(items: &[PackItem], opts: SearchOptions) -> Result<PackedAtlas> {
    if items.is_empty() {
        return Err(SqueezerError::Empty);
    }
    let single_attempt = opts.width.is_some() && opts.height.is_some();
    let mut attempts: Vec<(u32, u32)> = Vec::new();
    let mut last_failure = None;

    for (width, height) in BinSizes::new(opts.width, opts.height) {
        if opts.verbose {
            info!(width, height, "trying bin size");
        } else {
            debug!(width, height, "trying bin size");
        }
        attempts.push((width, height));
        let bin = Bin::new(width, height, opts.has_border);
        match packer::pack(items, bin, opts.allow_rotation) {
            Ok(placements) => {
                debug!(width, height, attempts = attempts.len(), "bin size accepted");
                return Ok(PackedAtlas {
                    bin,
                    placements,
                    attempts,
                });
            }
            Err(failure) => {
                debug!(
                    width,
                    height,
                    placed = failure.placed,
                    total = failure.total,
                    "bin size rejected"
                );
                last_failure = Some(failure);
            }
        }
    }

    match (single_attempt, last_failure) {
        (true, Some(failure)) => Err(SqueezerError::OutOfSpace {
            placed: failure.placed,
            total: failure.total,
        }),
        _ => {
            let (width, height) = attempts.last().copied().unwrap_or_default();
            Err(SqueezerError::SearchExhausted {
                attempts: attempts.len(),
                width,
                height,
            })
        }
    }
}
