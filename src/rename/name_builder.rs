use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;

/// Marker inserted for filler episodes
pub const FILLER_MARKER: &str = "[F]";

/// Episode number width used when the output spec leaves padding at 0
pub const DEFAULT_PADDING: usize = 2;

const GLUE: &str = "+";

/// Semantic value that can be placed in an output filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Series,
    SeriesEn,
    SeriesJp,
    EpNum,
    EpName,
    Filler,
    Res,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Series => "SERIES",
            Field::SeriesEn => "SERIES_EN",
            Field::SeriesJp => "SERIES_JP",
            Field::EpNum => "EP_NUM",
            Field::EpName => "EP_NAME",
            Field::Filler => "FILLER",
            Field::Res => "RES",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "SERIES" => Some(Field::Series),
            "SERIES_EN" => Some(Field::SeriesEn),
            "SERIES_JP" => Some(Field::SeriesJp),
            "EP_NUM" => Some(Field::EpNum),
            "EP_NAME" => Some(Field::EpName),
            "FILLER" => Some(Field::Filler),
            "RES" => Some(Field::Res),
            _ => None,
        }
    }
}

/// One entry of an output spec's field list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldToken {
    Field(Field),
    Literal(String),
    /// Suppresses the separator between its neighbours
    Glue,
}

impl From<&str> for FieldToken {
    fn from(s: &str) -> Self {
        if s == GLUE {
            return FieldToken::Glue;
        }
        match Field::from_name(s) {
            Some(field) => FieldToken::Field(field),
            None => FieldToken::Literal(s.to_string()),
        }
    }
}

impl From<String> for FieldToken {
    fn from(s: String) -> Self {
        FieldToken::from(s.as_str())
    }
}

impl fmt::Display for FieldToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldToken::Field(field) => f.write_str(field.name()),
            FieldToken::Literal(text) => write!(f, "'{}'", text),
            FieldToken::Glue => f.write_str(GLUE),
        }
    }
}

/// How output filenames are assembled
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct OutputSpec {
    pub fields: Vec<FieldToken>,
    #[serde(default)]
    pub separator: String,
    /// Added to the parsed episode number before lookup and rendering
    #[serde(default)]
    pub offset: i64,
    /// Minimum episode number width; 0 selects [`DEFAULT_PADDING`]
    #[serde(default)]
    pub padding: usize,
}

impl OutputSpec {
    pub fn new<I, T>(fields: I, separator: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FieldToken>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            separator: separator.into(),
            offset: 0,
            padding: 0,
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn effective_padding(&self) -> usize {
        if self.padding == 0 {
            DEFAULT_PADDING
        } else {
            self.padding
        }
    }
}

/// Resolved values for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub series: String,
    pub series_en: String,
    pub series_jp: String,
    /// Episode number as parsed from the source file, before the offset
    pub episode_number: Option<i64>,
    pub episode_name: String,
    pub filler: bool,
    pub resolution: String,
}

/// Render `number + offset` zero-padded to at least `padding` digits
pub fn render_episode_number(number: i64, offset: i64, padding: usize) -> String {
    let n = number.saturating_add(offset);
    if n < 0 {
        format!("-{:0width$}", n.unsigned_abs(), width = padding)
    } else {
        format!("{:0width$}", n, width = padding)
    }
}

/// Build an output filename from the spec's tokens.
///
/// Empty fields are dropped together with their separator. The extension is
/// the source file's; pass an empty string for files without one.
pub fn compose(spec: &OutputSpec, values: &FieldValues, extension: &str) -> String {
    let mut name = String::new();
    let mut emitted = false;
    let mut glued = false;

    for token in &spec.fields {
        let text: Cow<'_, str> = match token {
            FieldToken::Glue => {
                glued = true;
                continue;
            }
            FieldToken::Literal(text) => Cow::Borrowed(text.as_str()),
            FieldToken::Field(field) => {
                let value = field_value(*field, spec, values);
                if value.is_empty() {
                    continue;
                }
                Cow::Owned(sanitize_filename(&value))
            }
        };

        if emitted && !glued {
            name.push_str(&spec.separator);
        }
        name.push_str(&text);
        emitted = true;
        glued = false;
    }

    if !extension.is_empty() {
        name.push('.');
        name.push_str(extension);
    }

    name
}

fn field_value<'a>(field: Field, spec: &OutputSpec, values: &'a FieldValues) -> Cow<'a, str> {
    match field {
        Field::Series => Cow::Borrowed(values.series.as_str()),
        Field::SeriesEn => Cow::Borrowed(values.series_en.as_str()),
        Field::SeriesJp => Cow::Borrowed(values.series_jp.as_str()),
        Field::EpName => Cow::Borrowed(values.episode_name.as_str()),
        Field::Res => Cow::Borrowed(values.resolution.as_str()),
        Field::Filler => Cow::Borrowed(if values.filler { FILLER_MARKER } else { "" }),
        Field::EpNum => match values.episode_number {
            Some(n) => Cow::Owned(render_episode_number(n, spec.offset, spec.effective_padding())),
            None => Cow::Borrowed(""),
        },
    }
}

/// Replace characters that are invalid in filenames
fn sanitize_filename(name: &str) -> String {
    let invalid_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

    name.chars()
        .map(|c| if invalid_chars.contains(&c) { '_' } else { c })
        .collect()
}
