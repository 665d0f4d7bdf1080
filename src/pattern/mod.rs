//! Input templates such as `[Sub] {{SERIES}} - {{EP_NUM}}.{{EXT}}`.
//!
//! A template is compiled once into a [`Pattern`] and then matched against
//! bare filenames. Matching is always anchored to the whole name.

mod guess;
mod types;

pub use guess::guess_pattern;
pub use types::*;

use regex::Regex;
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::trace;

const IMPLICIT_EXT_GROUP: &str = "implicit_ext";

/// A compiled input template
#[derive(Debug, Clone)]
pub struct Pattern {
    template: String,
    segments: Vec<Segment>,
    regex: Regex,
}

/// Values captured by a successful match, in template order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    values: Vec<(Placeholder, String)>,
    implicit_ext: Option<String>,
}

impl Captures {
    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values
            .iter()
            .find(|(p, _)| *p == placeholder)
            .map(|(_, v)| v.as_str())
    }

    /// The `EXT` capture, or the extension accepted implicitly by a template
    /// that has no `{{EXT}}`
    pub fn extension(&self) -> Option<&str> {
        self.get(Placeholder::Ext).or(self.implicit_ext.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Placeholder, &str)> {
        self.values.iter().map(|(p, v)| (*p, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Compile a template into a reusable matcher.
///
/// A template without `{{EXT}}` also accepts a trailing `.ext`. When such a
/// template ends in a free-text field and the filename has no extension, a
/// last `.word` in that field is read as the extension: `"Part.2"` splits into
/// `"Part"` and `"2"`. Write `{{EXT}}` explicitly to keep dots in the field.
pub fn compile(template: &str) -> Result<Pattern, PatternError> {
    let segments = parse_template(template)?;

    let mut source = String::from("^");
    let mut has_ext = false;

    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Literal(text) => source.push_str(&regex::escape(text)),
            Segment::Field(p) => {
                has_ext |= *p == Placeholder::Ext;
                let _ = write!(source, "(?P<f{}>{})", i, p.regex());
            }
        }
    }

    // Templates written without {{EXT}} still match "name.ext"
    if !has_ext {
        let _ = write!(source, r"(?:\.(?P<{}>\w+))?", IMPLICIT_EXT_GROUP);
    }
    source.push('$');

    trace!(template = %template, regex = %source, "Compiled pattern");

    let regex = Regex::new(&source).map_err(|e| PatternError::Regex(e.to_string()))?;

    Ok(Pattern {
        template: template.to_string(),
        segments,
        regex,
    })
}

impl Pattern {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_placeholder(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Field(p) if *p == placeholder))
    }

    /// Match a bare filename. `None` means the file does not follow this template.
    pub fn matches(&self, filename: &str) -> Option<Captures> {
        let caps = self.regex.captures(filename)?;

        let mut captures = Captures::default();
        for (i, segment) in self.segments.iter().enumerate() {
            if let Segment::Field(p) = segment {
                if captures.get(*p).is_some() {
                    continue;
                }
                if let Some(m) = caps.name(&format!("f{}", i)) {
                    captures.values.push((*p, m.as_str().to_string()));
                }
            }
        }
        captures.implicit_ext = caps
            .name(IMPLICIT_EXT_GROUP)
            .map(|m| m.as_str().to_string());

        Some(captures)
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn parse_template(template: &str) -> Result<Vec<Segment>, PatternError> {
    if template.is_empty() {
        return Err(PatternError::Empty);
    }

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;
    let mut offset = 0;

    loop {
        let open = rest.find("{{");
        let close = rest.find("}}");

        let open = match (open, close) {
            (None, None) => {
                literal.push_str(rest);
                break;
            }
            (None, Some(c)) => return Err(PatternError::UnbalancedBraces { position: offset + c }),
            (Some(o), Some(c)) if c < o => {
                return Err(PatternError::UnbalancedBraces { position: offset + c })
            }
            (Some(o), _) => o,
        };

        literal.push_str(&rest[..open]);

        let inner = &rest[open + 2..];
        let end = inner
            .find("}}")
            .ok_or(PatternError::UnbalancedBraces { position: offset + open })?;
        let name = &inner[..end];
        if name.contains("{{") {
            return Err(PatternError::UnbalancedBraces { position: offset + open });
        }

        let placeholder: Placeholder = name.trim().parse()?;

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Field(placeholder));

        let consumed = open + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}
