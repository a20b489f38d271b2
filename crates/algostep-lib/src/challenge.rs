//! Scoring of finished runs against challenge constraints.
//!
//! A [`Challenge`] declares a set of [`Constraint`]s plus optional optimal
//! figures used for star ratings. The checker only looks at a run's final
//! counters; it never drives a generator itself.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{suggest_names, Error, Result};
use crate::grid::Grid;
use crate::output::RunSummary;
use crate::pathfinding::PathAlgorithm;
use crate::tree_steps::TreeAlgorithm;

/// Third-star slack: nodes visited may reach 6/5 of the optimum.
const NODE_SLACK_NUMERATOR: usize = 6;
const NODE_SLACK_DENOMINATOR: usize = 5;

/// Identity of any algorithm a challenge can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AlgorithmId {
    Path(PathAlgorithm),
    Tree(TreeAlgorithm),
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmId::Path(algorithm) => fmt::Display::fmt(algorithm, f),
            AlgorithmId::Tree(algorithm) => fmt::Display::fmt(algorithm, f),
        }
    }
}

impl FromStr for AlgorithmId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(algorithm) = s.parse::<PathAlgorithm>() {
            return Ok(AlgorithmId::Path(algorithm));
        }
        if let Ok(algorithm) = s.parse::<TreeAlgorithm>() {
            return Ok(AlgorithmId::Tree(algorithm));
        }
        let names: Vec<&str> = PathAlgorithm::ALL
            .iter()
            .map(|a| a.name())
            .chain(TreeAlgorithm::ALL.iter().map(|a| a.name()))
            .collect();
        Err(Error::UnknownAlgorithm {
            name: s.to_string(),
            suggestions: suggest_names(s, &names, 3),
        })
    }
}

impl From<PathAlgorithm> for AlgorithmId {
    fn from(algorithm: PathAlgorithm) -> Self {
        AlgorithmId::Path(algorithm)
    }
}

impl From<TreeAlgorithm> for AlgorithmId {
    fn from(algorithm: TreeAlgorithm) -> Self {
        AlgorithmId::Tree(algorithm)
    }
}

/// A single rule a run must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Visit at most `limit` nodes.
    MaxNodes { limit: usize },
    /// Finish with a path of at most `limit` cells.
    MaxPathLength { limit: usize },
    /// Solve the challenge with this algorithm.
    RequiredAlgorithm { algorithm: AlgorithmId },
    /// `optimal_nodes / nodes_visited × 100` must reach `percent`.
    MinEfficiency { percent: f64, optimal_nodes: usize },
}

impl Constraint {
    /// Human-readable failure for this constraint, or `None` when it holds.
    fn violation(
        &self,
        algorithm: AlgorithmId,
        nodes_visited: usize,
        path_length: usize,
    ) -> Option<String> {
        match *self {
            Constraint::MaxNodes { limit } if nodes_visited > limit => Some(format!(
                "visited {nodes_visited} nodes, more than the limit of {limit}"
            )),
            Constraint::MaxPathLength { limit } if path_length > limit => Some(format!(
                "path length {path_length} exceeds the limit of {limit}"
            )),
            Constraint::RequiredAlgorithm { algorithm: required } if required != algorithm => {
                Some(format!("required algorithm {required}, but {algorithm} was used"))
            }
            Constraint::MinEfficiency {
                percent,
                optimal_nodes,
            } => {
                let efficiency = efficiency_percent(optimal_nodes, nodes_visited);
                (efficiency < percent).then(|| {
                    format!("efficiency {efficiency:.1}% is below the required {percent}%")
                })
            }
            _ => None,
        }
    }
}

/// Search efficiency as a percentage; a run that visited nothing scores 0.
pub fn efficiency_percent(optimal_nodes: usize, nodes_visited: usize) -> f64 {
    if nodes_visited == 0 {
        0.0
    } else {
        optimal_nodes as f64 / nodes_visited as f64 * 100.0
    }
}

/// A declared challenge, usually loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Path length (in cells) of a shortest solution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_path_length: Option<usize>,
    /// Nodes visited by a reference solution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_nodes: Option<usize>,
    /// Optional ASCII map the challenge is played on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
}

impl Challenge {
    /// Parse and validate a challenge from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let challenge: Challenge = serde_json::from_str(json)?;
        challenge.validate()?;
        Ok(challenge)
    }

    /// The challenge's embedded map, if it has one.
    pub fn grid(&self) -> Option<Result<Grid>> {
        self.map.as_deref().map(Grid::parse)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: String| Error::InvalidChallenge {
            id: self.id.clone(),
            message,
        };
        for constraint in &self.constraints {
            if let Constraint::MinEfficiency {
                percent,
                optimal_nodes,
            } = *constraint
            {
                if !(percent > 0.0 && percent <= 100.0) {
                    return Err(invalid(format!(
                        "min_efficiency percent must be in (0, 100], got {percent}"
                    )));
                }
                if optimal_nodes == 0 {
                    return Err(invalid(
                        "min_efficiency optimal_nodes must be positive".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Read and validate a challenge file.
pub fn load_challenge(path: &Path) -> Result<Challenge> {
    let json = fs::read_to_string(path).map_err(|source| Error::ChallengeRead {
        path: path.to_path_buf(),
        source,
    })?;
    let challenge = Challenge::from_json(&json)?;
    tracing::debug!(
        id = %challenge.id,
        constraints = challenge.constraints.len(),
        path = %path.display(),
        "loaded challenge"
    );
    Ok(challenge)
}

/// Result of checking a run against a challenge's constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintReport {
    pub passed: bool,
    /// One message per violated constraint, in declaration order.
    pub failures: Vec<String>,
}

/// Check a finished run's counters against every constraint of `challenge`.
pub fn check_constraints(
    challenge: &Challenge,
    algorithm: impl Into<AlgorithmId>,
    nodes_visited: usize,
    path_length: usize,
) -> ConstraintReport {
    let algorithm = algorithm.into();
    let failures: Vec<String> = challenge
        .constraints
        .iter()
        .filter_map(|constraint| constraint.violation(algorithm, nodes_visited, path_length))
        .collect();
    ConstraintReport {
        passed: failures.is_empty(),
        failures,
    }
}

/// Award 0-3 stars.
///
/// One star for completing the challenge, a second for a path no longer
/// than the declared optimum, and a third for additionally visiting at most
/// 120% of the declared optimal node count. A missing optimum withholds the
/// star that depends on it.
pub fn star_rating(
    challenge: &Challenge,
    completed: bool,
    path_length: usize,
    nodes_visited: usize,
) -> u8 {
    if !completed {
        return 0;
    }
    let optimal_path = challenge
        .optimal_path_length
        .is_some_and(|optimal| path_length <= optimal);
    if !optimal_path {
        return 1;
    }
    let efficient = challenge.optimal_nodes.is_some_and(|optimal| {
        nodes_visited * NODE_SLACK_DENOMINATOR <= optimal * NODE_SLACK_NUMERATOR
    });
    if efficient {
        3
    } else {
        2
    }
}

/// Combined verdict for a run: constraint report plus stars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeOutcome {
    pub challenge_id: String,
    pub algorithm: AlgorithmId,
    /// The run found a path and satisfied every constraint.
    pub completed: bool,
    pub report: ConstraintReport,
    pub stars: u8,
}

/// Score a pathfinding run summary against `challenge`.
pub fn evaluate_run(challenge: &Challenge, run: &RunSummary) -> ChallengeOutcome {
    let report = check_constraints(challenge, run.algorithm, run.nodes_visited, run.path_length);
    let completed = run.found && report.passed;
    let stars = star_rating(challenge, completed, run.path_length, run.nodes_visited);
    tracing::debug!(
        challenge = %challenge.id,
        algorithm = %run.algorithm,
        completed,
        stars,
        failures = report.failures.len(),
        "evaluated run"
    );
    ChallengeOutcome {
        challenge_id: challenge.id.clone(),
        algorithm: run.algorithm.into(),
        completed,
        report,
        stars,
    }
}
