//! User text templates: `header + body (per sprite, joined by split) + footer`.
//!
//! Placeholders:
//!
//! | token | value                         |
//! |-------|-------------------------------|
//! | `%W`  | atlas width                   |
//! | `%H`  | atlas height                  |
//! | `%n`  | sprite name                   |
//! | `%x`  | left on the atlas             |
//! | `%y`  | top on the atlas              |
//! | `%w`  | trimmed width                 |
//! | `%h`  | trimmed height                |
//! | `%l`  | trim offset left              |
//! | `%t`  | trim offset top               |
//! | `%c`  | original width                |
//! | `%r`  | original height               |
//! | `%f`  | `1` if rotated else `0`       |
//!
//! The two-character sequences `\n`, `\r` and `\t` become newline, carriage
//! return and tab. Any other backslash sequence is kept as written.

use super::SpriteRecord;
use crate::error::{Result, SqueezerError};

/// Handling of `%` sequences that are not a known placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderPolicy {
    /// Copy the sequence to the output unchanged.
    #[default]
    PassThrough,
    /// Fail compilation with [`SqueezerError::Template`].
    Reject,
}

/// The four template strings of a custom output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateSpec {
    pub header: Option<String>,
    pub body: String,
    pub footer: Option<String>,
    pub split: Option<String>,
    pub policy: PlaceholderPolicy,
}

impl TemplateSpec {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }
    pub fn header(mut self, v: impl Into<String>) -> Self {
        self.header = Some(v.into());
        self
    }
    pub fn footer(mut self, v: impl Into<String>) -> Self {
        self.footer = Some(v.into());
        self
    }
    pub fn split(mut self, v: impl Into<String>) -> Self {
        self.split = Some(v.into());
        self
    }
    pub fn policy(mut self, v: PlaceholderPolicy) -> Self {
        self.policy = v;
        self
    }

    /// Parses all four parts; nothing is rendered if any part is malformed.
    pub fn compile(&self) -> Result<Template> {
        let atlas_only = |part: &Option<String>, what: &str| -> Result<Vec<Token>> {
            part.as_deref()
                .map(|s| parse(s, self.policy, false, what))
                .transpose()
                .map(Option::unwrap_or_default)
        };
        Ok(Template {
            header: atlas_only(&self.header, "header")?,
            body: parse(&self.body, self.policy, true, "body")?,
            footer: atlas_only(&self.footer, "footer")?,
            split: atlas_only(&self.split, "split")?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AtlasWidth,
    AtlasHeight,
    Name,
    X,
    Y,
    Width,
    Height,
    Left,
    Top,
    OriginalWidth,
    OriginalHeight,
    Rotated,
}

impl Field {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'W' => Self::AtlasWidth,
            'H' => Self::AtlasHeight,
            'n' => Self::Name,
            'x' => Self::X,
            'y' => Self::Y,
            'w' => Self::Width,
            'h' => Self::Height,
            'l' => Self::Left,
            't' => Self::Top,
            'c' => Self::OriginalWidth,
            'r' => Self::OriginalHeight,
            'f' => Self::Rotated,
            _ => return None,
        })
    }

    fn per_sprite(self) -> bool {
        !matches!(self, Self::AtlasWidth | Self::AtlasHeight)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Field(Field),
}

fn parse(
    src: &str,
    policy: PlaceholderPolicy,
    sprite_fields: bool,
    what: &str,
) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some('n') => {
                    chars.next();
                    text.push('\n');
                }
                Some('r') => {
                    chars.next();
                    text.push('\r');
                }
                Some('t') => {
                    chars.next();
                    text.push('\t');
                }
                _ => text.push('\\'),
            },
            '%' => {
                let next = chars.peek().copied();
                match next.and_then(Field::from_char) {
                    Some(field) if field.per_sprite() && !sprite_fields => {
                        return Err(SqueezerError::Template(format!(
                            "per-sprite placeholder '%{}' is not allowed in the {}",
                            next.unwrap_or_default(),
                            what
                        )));
                    }
                    Some(field) => {
                        chars.next();
                        if !text.is_empty() {
                            tokens.push(Token::Text(std::mem::take(&mut text)));
                        }
                        tokens.push(Token::Field(field));
                    }
                    // The following character is left for the next iteration,
                    // so an escape right after a stray '%' still applies.
                    None => match policy {
                        PlaceholderPolicy::PassThrough => text.push('%'),
                        PlaceholderPolicy::Reject => {
                            let seq: String = std::iter::once('%').chain(next).collect();
                            return Err(SqueezerError::Template(format!(
                                "unrecognized placeholder '{}' in the {}",
                                seq, what
                            )));
                        }
                    },
                }
            }
            other => text.push(other),
        }
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    Ok(tokens)
}

/// A compiled template ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    header: Vec<Token>,
    body: Vec<Token>,
    footer: Vec<Token>,
    split: Vec<Token>,
}

impl Template {
    /// Renders `header + body(r0) + split + body(r1) + ... + footer`.
    pub fn render(&self, width: u32, height: u32, records: &[SpriteRecord<'_>]) -> String {
        let mut out = String::new();
        render_into(&mut out, &self.header, width, height, None);
        for (i, r) in records.iter().enumerate() {
            if i > 0 {
                render_into(&mut out, &self.split, width, height, None);
            }
            render_into(&mut out, &self.body, width, height, Some(r));
        }
        render_into(&mut out, &self.footer, width, height, None);
        out
    }
}

fn render_into(
    out: &mut String,
    tokens: &[Token],
    width: u32,
    height: u32,
    record: Option<&SpriteRecord<'_>>,
) {
    for token in tokens {
        match token {
            Token::Text(t) => out.push_str(t),
            Token::Field(Field::AtlasWidth) => out.push_str(&width.to_string()),
            Token::Field(Field::AtlasHeight) => out.push_str(&height.to_string()),
            // Compilation keeps per-sprite fields out of header/split/footer.
            Token::Field(field) => {
                if let Some(r) = record {
                    out.push_str(&sprite_value(*field, r));
                }
            }
        }
    }
}

fn sprite_value(field: Field, r: &SpriteRecord<'_>) -> String {
    match field {
        Field::Name => r.name.to_string(),
        Field::X => r.x.to_string(),
        Field::Y => r.y.to_string(),
        Field::Width => r.width.to_string(),
        Field::Height => r.height.to_string(),
        Field::Left => r.left.to_string(),
        Field::Top => r.top.to_string(),
        Field::OriginalWidth => r.original_width.to_string(),
        Field::OriginalHeight => r.original_height.to_string(),
        Field::Rotated => if r.rotated { "1" } else { "0" }.to_string(),
        Field::AtlasWidth | Field::AtlasHeight => String::new(),
    }
}
