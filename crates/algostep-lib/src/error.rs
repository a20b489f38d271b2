use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the algostep library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Generators never produce these; only the parsing and loading edges around
/// them (maps, algorithm names, challenge files) do.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an ASCII grid map cannot be parsed.
    #[error("invalid grid map at line {line}: {message}")]
    InvalidMap { line: usize, message: String },

    /// Raised when a grid map has no start (`S`) or end (`E`) marker.
    #[error("grid map has no {kind} cell")]
    MissingEndpoint { kind: &'static str },

    /// Raised when a coordinate does not fit inside the grid.
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Raised when an algorithm name could not be recognised.
    #[error("unknown algorithm: {name}{}", format_suggestions(.suggestions))]
    UnknownAlgorithm {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a value list cannot be parsed.
    #[error("invalid value list: {message}")]
    InvalidValues { message: String },

    /// Raised when a challenge declares inconsistent constraints.
    #[error("invalid challenge '{id}': {message}")]
    InvalidChallenge { id: String, message: String },

    /// Raised when a summary is requested for a run that produced no steps.
    #[error("cannot summarise a run without steps")]
    EmptyRun,

    /// Raised when a challenge file cannot be read.
    #[error("failed to read challenge from {path}: {source}")]
    ChallengeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Rank `candidates` by similarity to `name`, keeping the closest few.
pub(crate) fn suggest_names(name: &str, candidates: &[&str], limit: usize) -> Vec<String> {
    let needle = name.to_ascii_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .iter()
        .map(|candidate| (strsim::jaro_winkler(&needle, candidate), *candidate))
        .filter(|(score, _)| *score >= 0.8)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}
