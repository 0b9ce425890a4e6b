use crate::model::{Bin, FitFailure, PackItem, PackingResult, Placement};
use std::cmp::Ordering;
use tracing::trace;

pub mod shelf;

pub use shelf::{ShelfPacker, Slot};

/// A packer reserves rectangles inside one bin.
///
/// Implementations must ensure no overlaps and respect the bin's border
/// padding. `pack` returns `None` when the rectangle does not fit.
pub trait Packer {
    fn can_pack(&self, w: u32, h: u32) -> bool;
    fn pack(&mut self, w: u32, h: u32) -> Option<Slot>;
}

/// How every item of one attempt is turned before packing.
///
/// The choice is made per item from its own shape only, never from the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Keep every item as loaded.
    AsGiven,
    /// Lay items flat: rotate those taller than wide.
    Flat,
    /// Stand items up: rotate those wider than tall.
    Upright,
}

impl Orientation {
    /// Orientations tried, in order, by [`pack`].
    pub fn candidates(allow_rotation: bool) -> &'static [Orientation] {
        if allow_rotation {
            &[Self::AsGiven, Self::Flat, Self::Upright]
        } else {
            &[Self::AsGiven]
        }
    }

    /// Size on the atlas and the rotated flag for a `w`x`h` item.
    pub fn apply(self, w: u32, h: u32) -> (u32, u32, bool) {
        let turn = match self {
            Self::AsGiven => false,
            Self::Flat => h > w,
            Self::Upright => w > h,
        };
        if turn { (h, w, true) } else { (w, h, false) }
    }
}

/// Packing order: height descending, then width descending, then name ascending.
pub fn packing_order(a: &PackItem, b: &PackItem) -> Ordering {
    b.h.cmp(&a.h)
        .then_with(|| b.w.cmp(&a.w))
        .then_with(|| a.name.cmp(&b.name))
}

/// Packs every item into `bin` with one fixed orientation, or fails as a whole.
///
/// The attempt uses a fresh packer, so repeated calls never share state.
pub fn pack_oriented(items: &[PackItem], bin: Bin, orientation: Orientation) -> PackingResult {
    let mut order: Vec<(PackItem, bool)> = items
        .iter()
        .map(|item| {
            let (w, h, rotated) = orientation.apply(item.w, item.h);
            (PackItem { w, h, ..item.clone() }, rotated)
        })
        .collect();
    // Stable, so equal keys keep their input order.
    order.sort_by(|a, b| packing_order(&a.0, &b.0));

    let mut packer = ShelfPacker::new(bin);
    let mut placements = Vec::with_capacity(order.len());
    for (item, rotated) in &order {
        let Some(slot) = packer.pack(item.w, item.h) else {
            trace!(
                name = %item.name,
                w = item.w,
                h = item.h,
                bin_w = bin.width,
                bin_h = bin.height,
                ?orientation,
                "no shelf fits"
            );
            return Err(FitFailure {
                placed: placements.len(),
                total: order.len(),
            });
        };
        placements.push(Placement {
            id: item.id,
            x: slot.x,
            y: slot.y,
            w: item.w,
            h: item.h,
            rotated: *rotated,
        });
    }
    Ok(placements)
}

/// Packs every item into `bin` or fails as a whole.
///
/// Each candidate orientation is tried in order and the first full fit wins.
/// Success is monotone in the bin size: an attempt that fits `W`x`H` also
/// fits any bin at least as wide and at least as tall. On failure the
/// attempt that placed the most items is reported.
pub fn pack(items: &[PackItem], bin: Bin, allow_rotation: bool) -> PackingResult {
    let mut best: Option<FitFailure> = None;
    for &orientation in Orientation::candidates(allow_rotation) {
        match pack_oriented(items, bin, orientation) {
            Ok(placements) => return Ok(placements),
            Err(failure) => {
                if best.is_none_or(|b| failure.placed > b.placed) {
                    best = Some(failure);
                }
            }
        }
    }
    Err(best.unwrap_or(FitFailure {
        placed: 0,
        total: items.len(),
    }))
}
