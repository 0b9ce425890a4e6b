use crate::config::TransparentPolicy;
use crate::model::TrimBox;
use image::RgbaImage;

/// Smallest box enclosing every pixel with alpha above `threshold`.
///
/// Returns `None` when no pixel is visible; callers resolve that case with a
/// [`TransparentPolicy`] (see [`trim_sprite`]).
pub fn compute_trim(rgba: &RgbaImage, threshold: u8) -> Option<TrimBox> {
    let (w, h) = rgba.dimensions();
    let visible = |x: u32, y: u32| rgba.get_pixel(x, y)[3] > threshold;
    let column_visible = |x: u32| (0..h).any(|y| visible(x, y));

    // left
    let x1 = (0..w).find(|&x| column_visible(x))?;
    // right
    let x2 = (x1..w).rev().find(|&x| column_visible(x)).unwrap_or(x1);
    let row_visible = |y: u32| (x1..=x2).any(|x| visible(x, y));
    // top
    let y1 = (0..h).find(|&y| row_visible(y)).unwrap_or(0);
    // bottom
    let y2 = (y1..h).rev().find(|&y| row_visible(y)).unwrap_or(y1);

    let width = x2 - x1 + 1;
    let height = y2 - y1 + 1;
    Some(TrimBox {
        left: x1,
        top: y1,
        width,
        height,
        trimmed: width != w || height != h,
    })
}

/// Resolves the trim box of one sprite according to the trim settings.
pub fn trim_sprite(
    rgba: &RgbaImage,
    trim: bool,
    threshold: u8,
    policy: TransparentPolicy,
) -> TrimBox {
    let (w, h) = rgba.dimensions();
    if !trim {
        return TrimBox::full(w, h);
    }
    match compute_trim(rgba, threshold) {
        Some(b) => b,
        None => match policy {
            TransparentPolicy::Keep => TrimBox::full(w, h),
            TransparentPolicy::OneByOne => TrimBox {
                left: 0,
                top: 0,
                width: 1.min(w),
                height: 1.min(h),
                trimmed: true,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn single_visible_pixel() {
        let mut img = RgbaImage::new(10, 6);
        img.put_pixel(7, 2, Rgba([1, 2, 3, 255]));
        let b = compute_trim(&img, 0).expect("visible");
        assert_eq!((b.left, b.top, b.width, b.height), (7, 2, 1, 1));
        assert!(b.trimmed);
    }

    #[test]
    fn threshold_hides_faint_pixels() {
        let mut img = RgbaImage::new(4, 4);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 10]));
        img.put_pixel(3, 3, Rgba([0, 0, 0, 200]));
        let b = compute_trim(&img, 10).expect("visible");
        assert_eq!((b.left, b.top, b.width, b.height), (3, 3, 1, 1));
    }
}
