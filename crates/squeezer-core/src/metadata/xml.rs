use super::SpriteRecord;
use std::fmt::Write;

/// Renders the sprite sheet as XML: one `<sprite>` element per record inside
/// a `<sprites>` root carrying the atlas size.
pub fn to_xml(width: u32, height: u32, records: &[SpriteRecord<'_>]) -> String {
    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        s,
        "<sprites width=\"{}\" height=\"{}\" count=\"{}\">",
        width,
        height,
        records.len()
    );
    for r in records {
        let _ = writeln!(
            s,
            "  <sprite name=\"{}\" x=\"{}\" y=\"{}\" w=\"{}\" h=\"{}\" left=\"{}\" top=\"{}\" originalWidth=\"{}\" originalHeight=\"{}\" rotated=\"{}\"/>",
            xml_escape(r.name),
            r.x,
            r.y,
            r.width,
            r.height,
            r.left,
            r.top,
            r.original_width,
            r.original_height,
            if r.rotated { 1 } else { 0 },
        );
    }
    s.push_str("</sprites>\n");
    s
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
