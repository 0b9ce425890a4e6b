use squeezer_core::model::{Bin, PackItem};
use squeezer_core::packer::{self, Orientation, Packer, ShelfPacker};

fn item(name: &str, w: u32, h: u32) -> PackItem {
    PackItem {
        id: 0,
        name: name.into(),
        w,
        h,
    }
}

fn items(sizes: &[(u32, u32)]) -> Vec<PackItem> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| PackItem {
            id: i,
            name: format!("s{}", i),
            w,
            h,
        })
        .collect()
}

#[test]
fn rotates_when_only_rotated_fits() {
    let bin = Bin::new(16, 12, false);
    assert!(packer::pack(&[item("r", 8, 14)], bin, false).is_err());

    let placed = packer::pack(&[item("r", 8, 14)], bin, true).expect("rotated fit should succeed");
    assert!(placed[0].rotated, "should rotate because only rotated fits");
    assert_eq!((placed[0].w, placed[0].h), (14, 8));
}

#[test]
fn tall_and_wide_need_rotation() {
    let set = items(&[(16, 32), (32, 16)]);
    let bin = Bin::new(32, 32, false);
    assert!(packer::pack(&set, bin, false).is_err());

    let placed = packer::pack(&set, bin, true).expect("rotation makes both fit");
    assert_eq!(placed.len(), 2);
    assert_eq!(placed.iter().filter(|p| p.rotated).count(), 1);
    for p in &placed {
        assert_eq!((p.w, p.h), (32, 16));
    }
}

#[test]
fn three_sprites_exceeding_bin_area_never_fit() {
    // 16x16 + 32x16 + 16x32 cover 1280 px, more than a 32x32 bin holds.
    let set = items(&[(16, 16), (32, 16), (16, 32)]);
    let bin = Bin::new(32, 32, false);
    let failure = packer::pack(&set, bin, false).unwrap_err();
    assert_eq!(failure.total, 3);
    assert!(packer::pack(&set, bin, true).is_err());
}

#[test]
fn rotation_disabled_never_rotates() {
    let set = items(&[(5, 30), (30, 5), (12, 7), (7, 12), (20, 3), (3, 20)]);
    let placed = packer::pack(&set, Bin::new(64, 64, false), false).expect("fits");
    assert!(placed.iter().all(|p| !p.rotated));
}

#[test]
fn orientation_depends_on_the_item_only() {
    assert_eq!(Orientation::candidates(false), &[Orientation::AsGiven]);
    assert_eq!(Orientation::Flat.apply(8, 14), (14, 8, true));
    assert_eq!(Orientation::Flat.apply(14, 8), (14, 8, false));
    assert_eq!(Orientation::Upright.apply(14, 8), (8, 14, true));
    assert_eq!(Orientation::Upright.apply(9, 9), (9, 9, false));
}

#[test]
fn mixed_set_keeps_fitting_in_larger_bins() {
    // A wide square, two tall strips and a wide block: fits 32x64, so every
    // bin at least that large has to take it too.
    let set = items(&[(6, 11), (18, 37), (4, 38), (24, 20)]);
    for (w, h) in [(32, 64), (33, 64), (32, 65), (64, 64), (32, 128), (64, 128)] {
        assert!(
            packer::pack(&set, Bin::new(w, h, false), false).is_ok(),
            "expected a fit at {w}x{h}"
        );
    }
    // Shorter than the 38 px strip.
    assert!(packer::pack(&set, Bin::new(64, 32, false), false).is_err());
}

#[test]
fn can_pack_matches_pack() {
    let mut p = ShelfPacker::new(Bin::new(10, 10, false));
    assert!(p.can_pack(10, 10));
    assert!(!p.can_pack(11, 1));
    p.pack(10, 10).expect("fits");
    assert!(!p.can_pack(1, 1));
}
