use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn x2(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn y2(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.x2() <= self.x2() && r.y2() <= self.y2()
    }
    /// Returns true if the two rectangles share any pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.x2() || r.x >= self.x2() || self.y >= r.y2() || r.y >= self.y2())
    }
}

/// Minimal box of visible pixels within a sprite's original image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrimBox {
    /// Columns cropped away on the left.
    pub left: u32,
    /// Rows cropped away on the top.
    pub top: u32,
    pub width: u32,
    pub height: u32,
    /// False when the box covers the whole original image.
    pub trimmed: bool,
}

impl TrimBox {
    /// Box covering the full `w x h` image.
    pub fn full(w: u32, h: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width: w,
            height: h,
            trimmed: false,
        }
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

/// One input image with its original and trimmed geometry.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub name: String,
    pub rgba: RgbaImage,
    pub trim: TrimBox,
}

impl Sprite {
    pub fn original_size(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }
}

/// Rectangle to be packed: trimmed size of one sprite plus its name for ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackItem {
    /// Index of the sprite this item stands for.
    pub id: usize,
    pub name: String,
    pub w: u32,
    pub h: u32,
}

impl PackItem {
    pub fn from_sprite(id: usize, sprite: &Sprite) -> Self {
        Self {
            id,
            name: sprite.name.clone(),
            w: sprite.trim.width,
            h: sprite.trim.height,
        }
    }
}

/// Position (and rotation) assigned to one sprite within the bin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    /// Index of the placed sprite.
    pub id: usize,
    pub x: u32,
    pub y: u32,
    /// Size on the atlas (already swapped when rotated).
    pub w: u32,
    pub h: u32,
    /// True if the sprite was rotated 90° clockwise when placed.
    pub rotated: bool,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Target canvas of one packing attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bin {
    pub width: u32,
    pub height: u32,
    pub has_border: bool,
}

impl Bin {
    pub fn new(width: u32, height: u32, has_border: bool) -> Self {
        Self {
            width,
            height,
            has_border,
        }
    }

    /// Padding kept around every placement and against the bin edges.
    pub fn padding(&self) -> u32 {
        if self.has_border {
            crate::config::BORDER_PADDING
        } else {
            0
        }
    }

    /// Area available to placements once the border is reserved.
    pub fn interior(&self) -> Rect {
        let pad = self.padding();
        Rect::new(
            pad,
            pad,
            self.width.saturating_sub(pad),
            self.height.saturating_sub(pad),
        )
    }
}

/// Explicit "does not fit" outcome of a single packing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitFailure {
    /// Items placed before the first one that did not fit.
    pub placed: usize,
    pub total: usize,
}

/// Outcome of one packing attempt: every item placed, or nothing.
pub type PackingResult = std::result::Result<Vec<Placement>, FitFailure>;

/// Accepted bin and its placements after a successful size search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackedAtlas {
    pub bin: Bin,
    /// Placements in packing order.
    pub placements: Vec<Placement>,
    /// Bin sizes tried, in order, including the accepted one.
    pub attempts: Vec<(u32, u32)>,
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    pub width: u32,
    pub height: u32,
    pub num_sprites: usize,
    /// Total area of the atlas.
    pub atlas_area: u64,
    /// Area covered by placed sprites (without padding).
    pub used_area: u64,
    /// used_area / atlas_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
    pub num_rotated: usize,
    pub num_trimmed: usize,
    pub num_attempts: usize,
}

impl PackedAtlas {
    pub fn width(&self) -> u32 {
        self.bin.width
    }

    pub fn height(&self) -> u32 {
        self.bin.height
    }

    /// Computes packing statistics; `sprites` supplies the trim flags.
    pub fn stats(&self, sprites: &[Sprite]) -> PackStats {
        let atlas_area = self.bin.width as u64 * self.bin.height as u64;
        let used_area: u64 = self.placements.iter().map(|p| p.rect().area()).sum();
        let num_rotated = self.placements.iter().filter(|p| p.rotated).count();
        let num_trimmed = self
            .placements
            .iter()
            .filter(|p| sprites.get(p.id).is_some_and(|s| s.trim.trimmed))
            .count();
        let occupancy = if atlas_area > 0 {
            used_area as f64 / atlas_area as f64
        } else {
            0.0
        };
        PackStats {
            width: self.bin.width,
            height: self.bin.height,
            num_sprites: self.placements.len(),
            atlas_area,
            used_area,
            occupancy,
            num_rotated,
            num_trimmed,
            num_attempts: self.attempts.len(),
        }
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Atlas: {}x{}, Sprites: {}, Occupancy: {:.2}%, Used Area: {} px², Rotated: {}, Trimmed: {}, Attempts: {}",
            self.width,
            self.height,
            self.num_sprites,
            self.occupancy * 100.0,
            self.used_area,
            self.num_rotated,
            self.num_trimmed,
            self.num_attempts,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.atlas_area.saturating_sub(self.used_area)
    }
}
