//! Compilable sprite tables: a C header, a C source and a packed binary blob
//! for loading from a file system on embedded targets.
//!
//! Blob layout (all integers little-endian):
//!
//! ```text
//! offset size
//! 0      4    magic "SQZR"
//! 4      2    version (1)
//! 6      2    sprite count
//! 8      2    atlas width
//! 10     2    atlas height
//! 12     18*n records: x, y, width, height, left, top,
//!             original_width, original_height (u16 each),
//!             rotated (u8), reserved (u8)
//! ```

use super::SpriteRecord;
use crate::error::{Result, SqueezerError};
use std::collections::HashSet;
use std::fmt::Write;

pub const BLOB_MAGIC: &[u8; 4] = b"SQZR";
pub const BLOB_VERSION: u16 = 1;
pub const BLOB_HEADER_LEN: usize = 12;
pub const BLOB_RECORD_LEN: usize = 18;

/// One sprite row with every field narrowed to 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    left: u16,
    top: u16,
    original_width: u16,
    original_height: u16,
    rotated: bool,
}

/// Validated C tables for one atlas.
#[derive(Debug, Clone)]
pub struct CData {
    /// Lower-case identifier prefix.
    prefix: String,
    width: u16,
    height: u16,
    rows: Vec<Row>,
    names: Vec<String>,
    enum_names: Vec<String>,
}

fn narrow(v: u32, what: &str, name: &str) -> Result<u16> {
    u16::try_from(v).map_err(|_| {
        SqueezerError::InvalidInput(format!("{what} of '{name}' ({v}) does not fit in 16 bits"))
    })
}

/// Turns arbitrary text into a C identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn c_identifier(s: &str) -> String {
    let mut id: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}

fn c_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl CData {
    /// Checks every value fits the 16-bit tables and derives identifiers.
    pub fn new(
        base_name: &str,
        width: u32,
        height: u32,
        records: &[SpriteRecord<'_>],
    ) -> Result<Self> {
        let count = u32::try_from(records.len()).unwrap_or(u32::MAX);
        narrow(count, "sprite count", base_name)?;
        let prefix = c_identifier(base_name).to_ascii_lowercase();
        let upper = prefix.to_ascii_uppercase();
        let mut rows = Vec::with_capacity(records.len());
        let mut names = Vec::with_capacity(records.len());
        let mut enum_names = Vec::with_capacity(records.len());
        let mut seen = HashSet::new();
        for r in records {
            rows.push(Row {
                x: narrow(r.x, "x", r.name)?,
                y: narrow(r.y, "y", r.name)?,
                width: narrow(r.width, "width", r.name)?,
                height: narrow(r.height, "height", r.name)?,
                left: narrow(r.left, "left", r.name)?,
                top: narrow(r.top, "top", r.name)?,
                original_width: narrow(r.original_width, "original width", r.name)?,
                original_height: narrow(r.original_height, "original height", r.name)?,
                rotated: r.rotated,
            });
            let base = format!("{}_{}", upper, c_identifier(r.name).to_ascii_uppercase());
            let mut candidate = base.clone();
            let mut n = 2;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}_{n}");
                n += 1;
            }
            enum_names.push(candidate);
            names.push(r.name.to_string());
        }
        Ok(Self {
            width: narrow(width, "width", "atlas")?,
            height: narrow(height, "height", "atlas")?,
            prefix,
            rows,
            names,
            enum_names,
        })
    }

    fn upper(&self) -> String {
        self.prefix.to_ascii_uppercase()
    }

    /// C header: include guard, size macros, record type, index enum and table declarations.
    pub fn header(&self) -> String {
        let p = &self.prefix;
        let u = self.upper();
        let mut s = String::new();
        let _ = writeln!(s, "/* Generated by squeezer. Do not edit. */");
        let _ = writeln!(s, "#ifndef {u}_H");
        let _ = writeln!(s, "#define {u}_H\n");
        let _ = writeln!(s, "#include <stdint.h>\n");
        let _ = writeln!(s, "#define {u}_WIDTH {}", self.width);
        let _ = writeln!(s, "#define {u}_HEIGHT {}", self.height);
        let _ = writeln!(s, "#define {u}_COUNT {}\n", self.rows.len());
        let _ = writeln!(s, "typedef struct {{");
        for field in [
            "x",
            "y",
            "width",
            "height",
            "left",
            "top",
            "original_width",
            "original_height",
        ] {
            let _ = writeln!(s, "    uint16_t {field};");
        }
        let _ = writeln!(s, "    uint8_t rotated;");
        let _ = writeln!(s, "}} {p}_sprite;\n");
        if !self.enum_names.is_empty() {
            let _ = writeln!(s, "enum {{");
            for (i, e) in self.enum_names.iter().enumerate() {
                let _ = writeln!(s, "    {e} = {i},");
            }
            let _ = writeln!(s, "}};\n");
        }
        let _ = writeln!(s, "extern const {p}_sprite {p}_sprites[{u}_COUNT];");
        let _ = writeln!(s, "extern const char *const {p}_names[{u}_COUNT];\n");
        let _ = writeln!(s, "#endif /* {u}_H */");
        s
    }

    /// C source defining the tables; `header_include` is the file name to `#include`.
    pub fn source(&self, header_include: &str) -> String {
        let p = &self.prefix;
        let u = self.upper();
        let mut s = String::new();
        let _ = writeln!(s, "/* Generated by squeezer. Do not edit. */");
        let _ = writeln!(s, "#include {}\n", c_string(header_include));
        let _ = writeln!(s, "const {p}_sprite {p}_sprites[{u}_COUNT] = {{");
        for (r, name) in self.rows.iter().zip(&self.names) {
            let _ = writeln!(
                s,
                "    {{ {}, {}, {}, {}, {}, {}, {}, {}, {} }}, /* {} */",
                r.x,
                r.y,
                r.width,
                r.height,
                r.left,
                r.top,
                r.original_width,
                r.original_height,
                u8::from(r.rotated),
                name.replace("*/", "* /"),
            );
        }
        let _ = writeln!(s, "}};\n");
        let _ = writeln!(s, "const char *const {p}_names[{u}_COUNT] = {{");
        for name in &self.names {
            let _ = writeln!(s, "    {},", c_string(name));
        }
        let _ = writeln!(s, "}};");
        s
    }

    /// Packed little-endian blob (see the module docs for the layout).
    pub fn blob(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOB_HEADER_LEN + BLOB_RECORD_LEN * self.rows.len());
        out.extend_from_slice(BLOB_MAGIC);
        out.extend_from_slice(&BLOB_VERSION.to_le_bytes());
        out.extend_from_slice(&(self.rows.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        for r in &self.rows {
            for v in [
                r.x,
                r.y,
                r.width,
                r.height,
                r.left,
                r.top,
                r.original_width,
                r.original_height,
            ] {
                out.extend_from_slice(&v.to_le_bytes());
            }
            out.push(u8::from(r.rotated));
            out.push(0);
        }
        out
    }
}
