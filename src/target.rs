use serde::Deserialize;
use std::path::PathBuf;

use crate::rename::OutputSpec;

/// Input templates that share one output spec
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatternRule {
    pub input: Vec<String>,
    pub output: OutputSpec,
}

impl PatternRule {
    pub fn new<I, S>(input: I, output: OutputSpec) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            output,
        }
    }
}

/// A directory to rename and the rules that apply to it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    pub path: PathBuf,
    /// Tried in order; the first rule with a matching input owns a file
    pub patterns: Vec<PatternRule>,
}

impl Target {
    pub fn new(path: impl Into<PathBuf>, patterns: Vec<PatternRule>) -> Self {
        Self {
            path: path.into(),
            patterns,
        }
    }
}
