use image::{Rgba, RgbaImage};
use squeezer_core::metadata::cdata::{BLOB_HEADER_LEN, BLOB_MAGIC, BLOB_RECORD_LEN};
use squeezer_core::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_png(path: &Path, img: &RgbaImage) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    img.save(path).expect("save png");
}

/// hero: 32x42 with a one pixel transparent frame; items/coin: opaque 8x8;
/// empty: fully transparent 4x4; plus a file that is not an image.
fn sprite_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut hero = RgbaImage::new(32, 42);
    for y in 1..41 {
        for x in 1..31 {
            hero.put_pixel(x, y, Rgba([200, 50, 50, 255]));
        }
    }
    write_png(&dir.path().join("hero.png"), &hero);
    write_png(
        &dir.path().join("items").join("coin.png"),
        &RgbaImage::from_pixel(8, 8, Rgba([255, 215, 0, 255])),
    );
    write_png(&dir.path().join("empty.png"), &RgbaImage::new(4, 4));
    fs::write(dir.path().join("notes.txt"), "not a sprite").expect("write");
    dir
}

fn packed_engine(src: &Path, cfg: SqueezerConfig) -> Squeezer {
    let mut engine = Squeezer::new(cfg).expect("valid config");
    engine.pack_dir(src).expect("pack");
    engine
}

#[test]
fn loads_trims_and_names_sprites() {
    let src = sprite_dir();
    let engine = packed_engine(src.path(), SqueezerConfig::default());
    let names: Vec<&str> = engine.sprites().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["empty", "hero", "items/coin"]);

    let hero = &engine.sprites()[1];
    assert_eq!(
        (hero.trim.left, hero.trim.top, hero.trim.width, hero.trim.height),
        (1, 1, 30, 40)
    );
    assert!(hero.trim.trimmed);
    // Fully transparent sprites keep their full extent.
    assert_eq!(engine.sprites()[0].trim, TrimBox::full(4, 4));
}

#[test]
fn writes_image_and_xml() {
    let src = sprite_dir();
    let out = tempfile::tempdir().expect("tempdir");
    let engine = packed_engine(src.path(), SqueezerConfig::default());
    let atlas = engine.packed().expect("packed");
    let (w, h) = (atlas.width(), atlas.height());

    let png = out.path().join("atlas.png");
    engine.output_image(&png).expect("image");
    let decoded = image::open(&png).expect("decode").to_rgba8();
    assert_eq!(decoded.dimensions(), (w, h));

    let xml_path = out.path().join("atlas.xml");
    engine.output_xml(&xml_path).expect("xml");
    let xml = fs::read_to_string(&xml_path).expect("read");
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains(&format!("<sprites width=\"{w}\" height=\"{h}\" count=\"3\">")));
    assert!(xml.contains("name=\"items/coin\""));
    assert!(xml.contains("w=\"30\" h=\"40\" left=\"1\" top=\"1\" originalWidth=\"32\" originalHeight=\"42\""));
}

#[test]
fn writes_c_tables_and_blob() {
    let src = sprite_dir();
    let out = tempfile::tempdir().expect("tempdir");
    let engine = packed_engine(src.path(), SqueezerConfig::default());
    let source = out.path().join("atlas.c");
    let header = out.path().join("atlas.h");
    let blob = out.path().join("atlas.bin");
    engine
        .emit(&OutputMode::CData {
            base_name: "atlas".into(),
            source: source.clone(),
            header: header.clone(),
            blob: Some(blob.clone()),
        })
        .expect("c data");

    let h = fs::read_to_string(&header).expect("header");
    assert!(h.contains("#ifndef ATLAS_H"));
    assert!(h.contains("#define ATLAS_COUNT 3"));
    assert!(h.contains("ATLAS_ITEMS_COIN = 2,"));
    let c = fs::read_to_string(&source).expect("source");
    assert!(c.contains("#include \"atlas.h\""));
    assert!(c.contains("\"items/coin\","));

    let bytes = fs::read(&blob).expect("blob");
    assert_eq!(bytes.len(), BLOB_HEADER_LEN + 3 * BLOB_RECORD_LEN);
    assert_eq!(&bytes[..4], BLOB_MAGIC);
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 3);
    let atlas = engine.packed().expect("packed");
    assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]) as u32, atlas.width());
}

#[test]
fn custom_template_renders_each_sprite() {
    let src = sprite_dir();
    let out = tempfile::tempdir().expect("tempdir");
    let engine = packed_engine(src.path(), SqueezerConfig::default());
    let path = out.path().join("atlas.txt");
    let spec = TemplateSpec::new("%n:%w,%h,%l,%t,%c,%r").split(";");
    engine.output_custom(&path, &spec).expect("custom");
    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text, "empty:4,4,0,0,4,4;hero:30,40,1,1,32,42;items/coin:8,8,0,0,8,8");
}

#[test]
fn malformed_template_leaves_no_file() {
    let src = sprite_dir();
    let out = tempfile::tempdir().expect("tempdir");
    let engine = packed_engine(src.path(), SqueezerConfig::default());
    let path = out.path().join("atlas.txt");
    let spec = TemplateSpec::new("%n %z").policy(PlaceholderPolicy::Reject);
    assert!(matches!(
        engine.output_custom(&path, &spec),
        Err(SqueezerError::Template(_))
    ));
    assert!(!path.exists());
}

#[test]
fn unwritable_destination_fails_cleanly() {
    let src = sprite_dir();
    let out = tempfile::tempdir().expect("tempdir");
    let engine = packed_engine(src.path(), SqueezerConfig::default());
    let path = out.path().join("missing").join("atlas.xml");
    assert!(matches!(engine.output_xml(&path), Err(SqueezerError::Io(_))));
    assert!(!path.exists());
}

#[test]
fn filters_limit_loaded_sprites() {
    let src = sprite_dir();
    let cfg = SqueezerConfig::builder().exclude("items/**").build();
    let engine = packed_engine(src.path(), cfg);
    assert_eq!(engine.sprites().len(), 2);

    let cfg = SqueezerConfig::builder().include("items/*.png").build();
    let engine = packed_engine(src.path(), cfg);
    assert_eq!(engine.sprites().len(), 1);
}

#[test]
fn outputs_require_a_packed_atlas() {
    let out = tempfile::tempdir().expect("tempdir");
    let engine = Squeezer::new(SqueezerConfig::default()).expect("valid");
    assert!(matches!(
        engine.output_xml(&out.path().join("a.xml")),
        Err(SqueezerError::NotPacked)
    ));
    assert!(matches!(engine.atlas_image(), Err(SqueezerError::NotPacked)));
    assert!(matches!(engine.c_data("atlas"), Err(SqueezerError::NotPacked)));
}

#[test]
fn empty_and_missing_directories_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = Squeezer::new(SqueezerConfig::default()).expect("valid");
    assert!(matches!(engine.pack_dir(dir.path()), Err(SqueezerError::Empty)));
    assert!(matches!(
        engine.pack_dir(&dir.path().join("nope")),
        Err(SqueezerError::InvalidInput(_))
    ));
}

#[test]
fn unreadable_sprite_aborts_loading() {
    let src = sprite_dir();
    fs::write(src.path().join("broken.png"), b"definitely not a png").expect("write");
    let mut engine = Squeezer::new(SqueezerConfig::default()).expect("valid");
    assert!(matches!(engine.pack_dir(src.path()), Err(SqueezerError::Image(_))));
    assert!(engine.packed().is_none());
}

#[test]
fn fixed_bin_too_small_reports_out_of_space() {
    let src = sprite_dir();
    let cfg = SqueezerConfig::builder().with_bin_dimensions(32, 32).build();
    let mut engine = Squeezer::new(cfg).expect("valid");
    assert!(matches!(
        engine.pack_dir(src.path()),
        Err(SqueezerError::OutOfSpace { .. })
    ));
}

#[test]
fn stats_reflect_the_packed_atlas() {
    let src = sprite_dir();
    let engine = packed_engine(src.path(), SqueezerConfig::default());
    let atlas = engine.packed().expect("packed");
    let stats = atlas.stats(engine.sprites());
    assert_eq!(stats.num_sprites, 3);
    assert_eq!(stats.num_trimmed, 1);
    assert_eq!(stats.used_area, 16 + 1200 + 64);
    assert!(stats.occupancy > 0.0 && stats.occupancy <= 1.0);
}

#[test]
fn same_name_in_two_formats_is_rejected() {
    let src = sprite_dir();
    fs::copy(src.path().join("hero.png"), src.path().join("hero.jpg")).expect("copy");
    let mut engine = Squeezer::new(SqueezerConfig::default()).expect("valid");
    let err = engine.pack_dir(src.path()).unwrap_err();
    assert!(matches!(err, SqueezerError::InvalidInput(ref m) if m.contains("'hero'")));
    assert!(engine.packed().is_none());
}

#[test]
fn duplicate_names_in_loaded_sprites_are_rejected() {
    let sprite = |name: &str| Sprite {
        name: name.into(),
        rgba: RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])),
        trim: TrimBox::full(4, 4),
    };
    let mut engine = Squeezer::new(SqueezerConfig::default()).expect("valid");
    assert!(matches!(
        engine.pack_sprites(vec![sprite("a"), sprite("b"), sprite("a")]),
        Err(SqueezerError::InvalidInput(_))
    ));
    assert!(engine.pack_sprites(vec![sprite("a"), sprite("b")]).is_ok());
}
