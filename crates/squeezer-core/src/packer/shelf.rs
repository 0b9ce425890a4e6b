use super::Packer;
use crate::model::{Bin, Rect};

/// Next-fit shelf packer.
///
/// Items are expected in decreasing height. The open shelf is the free
/// rectangle right of the last placement; an item that does not fit there
/// opens a new shelf directly below. Earlier shelves are closed for good.
///
/// Each instance lives for exactly one packing attempt.
pub struct ShelfPacker {
    /// Usable area of the bin (border excluded on the left/top edges).
    border: Rect,
    /// Remaining span of the open shelf; `None` before the first placement.
    open: Option<Rect>,
    /// Top of the next shelf.
    next_y: u32,
    used: Vec<Rect>,
    padding: u32,
}

/// Slot chosen for one rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub x: u32,
    pub y: u32,
}

impl ShelfPacker {
    pub fn new(bin: Bin) -> Self {
        let border = bin.interior();
        Self {
            border,
            open: None,
            next_y: border.y,
            used: Vec::new(),
            padding: bin.padding(),
        }
    }

    /// Rectangles reserved so far, padding included.
    pub fn used(&self) -> &[Rect] {
        &self.used
    }

    /// Remaining span of the open shelf.
    pub fn open_shelf(&self) -> Option<Rect> {
        self.open
    }

    /// Total height consumed by the shelves so far, padding included.
    pub fn used_height(&self) -> u32 {
        self.next_y.saturating_sub(self.border.y)
    }

    fn choose(&self, w: u32, h: u32) -> Option<(Rect, bool)> {
        if let Some(sh) = self.open {
            if w <= sh.w && h <= sh.h {
                return Some((Rect::new(sh.x, sh.y, w, h), false));
            }
        }
        if w <= self.border.w && self.next_y + h <= self.border.y2() {
            return Some((Rect::new(self.border.x, self.next_y, w, h), true));
        }
        None
    }
}

impl Packer for ShelfPacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        self.choose(w + self.padding, h + self.padding).is_some()
    }

    fn pack(&mut self, w: u32, h: u32) -> Option<Slot> {
        let (slot, new_shelf) = self.choose(w + self.padding, h + self.padding)?;
        let shelf_h = if new_shelf {
            self.next_y = slot.y2();
            slot.h
        } else {
            self.open.map_or(slot.h, |sh| sh.h)
        };
        self.open = Some(Rect::new(
            slot.x2(),
            slot.y,
            self.border.x2().saturating_sub(slot.x2()),
            shelf_h,
        ));
        self.used.push(slot);
        Some(Slot {
            x: slot.x,
            y: slot.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_item_goes_to_origin() {
        let mut p = ShelfPacker::new(Bin::new(32, 32, false));
        assert_eq!(p.pack(10, 20), Some(Slot { x: 0, y: 0 }));
        assert_eq!(p.open_shelf(), Some(Rect::new(10, 0, 22, 20)));
    }

    #[test]
    fn border_offsets_first_item() {
        let mut p = ShelfPacker::new(Bin::new(32, 32, true));
        assert_eq!(p.pack(10, 20), Some(Slot { x: 1, y: 1 }));
        assert_eq!(p.used()[0], Rect::new(1, 1, 11, 21));
        assert_eq!(p.used_height(), 21);
    }

    #[test]
    fn overflow_opens_a_shelf_below() {
        let mut p = ShelfPacker::new(Bin::new(16, 16, false));
        p.pack(10, 6).expect("fits");
        assert_eq!(p.pack(8, 4), Some(Slot { x: 0, y: 6 }));
        assert_eq!(p.pack(8, 3), Some(Slot { x: 8, y: 6 }));
        assert_eq!(p.used_height(), 10);
    }

    #[test]
    fn closed_shelves_are_not_revisited() {
        let mut p = ShelfPacker::new(Bin::new(16, 16, false));
        p.pack(10, 6).expect("fits");
        p.pack(12, 4).expect("fits");
        // Room is left on the first shelf, but only the open one is tried.
        assert_eq!(p.pack(4, 4), Some(Slot { x: 12, y: 6 }));
    }
}
