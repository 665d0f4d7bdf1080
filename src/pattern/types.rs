use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named field that can appear inside `{{...}}` in an input template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    Series,
    SeriesEn,
    SeriesJp,
    EpNum,
    EpName,
    Res,
    Any,
    Ext,
}

impl Placeholder {
    pub const ALL: [Placeholder; 8] = [
        Placeholder::Series,
        Placeholder::SeriesEn,
        Placeholder::SeriesJp,
        Placeholder::EpNum,
        Placeholder::EpName,
        Placeholder::Res,
        Placeholder::Any,
        Placeholder::Ext,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::Series => "SERIES",
            Placeholder::SeriesEn => "SERIES_EN",
            Placeholder::SeriesJp => "SERIES_JP",
            Placeholder::EpNum => "EP_NUM",
            Placeholder::EpName => "EP_NAME",
            Placeholder::Res => "RES",
            Placeholder::Any => "ANY",
            Placeholder::Ext => "EXT",
        }
    }

    /// Regex fragment this placeholder lowers to (without the capture group)
    pub fn regex(&self) -> &'static str {
        match self {
            Placeholder::EpNum => r"\d+",
            Placeholder::Res => r"\d+[pPiI]",
            Placeholder::Any => r"[[:alnum:]]+?",
            Placeholder::Ext => r"\w+",
            Placeholder::Series
            | Placeholder::SeriesEn
            | Placeholder::SeriesJp
            | Placeholder::EpName => r".+?",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{{}}}}}", self.name())
    }
}

impl FromStr for Placeholder {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Placeholder::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| PatternError::UnknownPlaceholder(s.to_string()))
    }
}

/// One piece of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(Placeholder),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern is empty")]
    Empty,

    #[error("Unknown placeholder: {{{{{0}}}}}")]
    UnknownPlaceholder(String),

    #[error("Unbalanced braces at position {position}")]
    UnbalancedBraces { position: usize },

    #[error("Failed to build matcher: {0}")]
    Regex(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_names_round_trip() {
        for p in Placeholder::ALL {
            assert_eq!(p.name().parse::<Placeholder>().unwrap(), p);
        }
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = "EPISODE".parse::<Placeholder>().unwrap_err();
        assert_eq!(err, PatternError::UnknownPlaceholder("EPISODE".to_string()));
        assert_eq!(err.to_string(), "Unknown placeholder: {{EPISODE}}");
    }

    #[test]
    fn test_placeholder_display() {
        assert_eq!(Placeholder::EpNum.to_string(), "{{EP_NUM}}");
    }
}
