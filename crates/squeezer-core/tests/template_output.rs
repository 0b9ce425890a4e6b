use squeezer_core::metadata::{SpriteRecord, Template};
use squeezer_core::prelude::*;

fn hero() -> SpriteRecord<'static> {
    SpriteRecord {
        name: "hero",
        x: 4,
        y: 8,
        width: 30,
        height: 40,
        left: 1,
        top: 1,
        original_width: 32,
        original_height: 42,
        rotated: false,
    }
}

fn compile(spec: TemplateSpec) -> Template {
    spec.compile().expect("template compiles")
}

#[test]
fn hero_body_renders_exactly() {
    let t = compile(TemplateSpec::new("%n,%x,%y,%w,%h,%f;"));
    assert_eq!(t.render(64, 64, &[hero()]), "hero,4,8,30,40,0;");
}

#[test]
fn every_placeholder_is_substituted() {
    let t = compile(TemplateSpec::new("%n %x %y %w %h %l %t %c %r %f %W %H"));
    let mut rec = hero();
    rec.rotated = true;
    assert_eq!(t.render(128, 256, &[rec]), "hero 4 8 30 40 1 1 32 42 1 128 256");
}

#[test]
fn header_split_footer_wrap_the_bodies() {
    let spec = TemplateSpec::new("{%n}")
        .header("[%Wx%H]\\n")
        .split(",\\n")
        .footer("\\n[end]");
    let mut other = hero();
    other.name = "bat";
    let out = compile(spec).render(32, 16, &[other, hero()]);
    assert_eq!(out, "[32x16]\n{bat},\n{hero}\n[end]");
}

#[test]
fn no_records_renders_header_and_footer_only() {
    let spec = TemplateSpec::new("%n").header("begin;").split("|").footer("end;");
    assert_eq!(compile(spec).render(8, 8, &[]), "begin;end;");
}

#[test]
fn trailing_percent_is_kept_under_pass_through() {
    let t = compile(TemplateSpec::new("%n 100%"));
    assert_eq!(t.render(8, 8, &[hero()]), "hero 100%");
}

#[test]
fn escape_after_stray_percent_still_applies() {
    let t = compile(TemplateSpec::new("%n 100%\\n"));
    assert_eq!(t.render(8, 8, &[hero()]), "hero 100%\n");

    let t = compile(TemplateSpec::new("%\\t%w"));
    assert_eq!(t.render(8, 8, &[hero()]), "%\t30");
}

#[test]
fn stray_percent_before_a_placeholder_keeps_both() {
    let t = compile(TemplateSpec::new("%%n"));
    assert_eq!(t.render(8, 8, &[hero()]), "%hero");
}

#[test]
fn reject_policy_reports_the_sequence() {
    let err = TemplateSpec::new("%n")
        .footer("%Q")
        .policy(PlaceholderPolicy::Reject)
        .compile()
        .unwrap_err();
    match err {
        SqueezerError::Template(msg) => {
            assert!(msg.contains("%Q") && msg.contains("footer"), "{msg}")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sprite_placeholder_in_split_is_rejected() {
    let err = TemplateSpec::new("%n").split("%x").compile().unwrap_err();
    assert!(matches!(err, SqueezerError::Template(_)));
}
