use crate::model::{PackedAtlas, Rect, Sprite};
use image::RgbaImage;
use tracing::instrument;

/// Blit the `src_rect` region of `src` into `canvas` at (dx, dy),
/// optionally rotated 90° clockwise.
///
/// Only pixels inside `src_rect` are read; writes falling outside the canvas
/// are dropped.
pub fn blit_rgba(
    src: &RgbaImage,
    canvas: &mut RgbaImage,
    dx: u32,
    dy: u32,
    src_rect: Rect,
    rotated: bool,
) {
    let (cw, ch) = canvas.dimensions();
    let Rect {
        x: sx,
        y: sy,
        w: sw,
        h: sh,
    } = src_rect;
    // destination (rendered) size may differ when rotated
    let (rw, rh) = if rotated { (sh, sw) } else { (sw, sh) };

    for yy in 0..rh {
        for xx in 0..rw {
            let (ix, iy) = if rotated {
                (sx + yy, sy + (sh - 1 - xx))
            } else {
                (sx + xx, sy + yy)
            };
            if dx + xx < cw && dy + yy < ch {
                let px = *src.get_pixel(ix, iy);
                canvas.put_pixel(dx + xx, dy + yy, px);
            }
        }
    }
}

/// Renders the atlas: a transparent canvas of the accepted bin size with each
/// sprite's trimmed region copied to its placement.
#[instrument(skip_all, fields(width = atlas.bin.width, height = atlas.bin.height))]
pub fn compose(sprites: &[Sprite], atlas: &PackedAtlas) -> RgbaImage {
    let mut canvas = RgbaImage::new(atlas.bin.width, atlas.bin.height);
    for placement in &atlas.placements {
        if let Some(sprite) = sprites.get(placement.id) {
            blit_rgba(
                &sprite.rgba,
                &mut canvas,
                placement.x,
                placement.y,
                sprite.trim.as_rect(),
                placement.rotated,
            );
        }
    }
    canvas
}
