// Test-only helpers for `algostep-lib` tests
#![allow(dead_code)]
use crate::challenge::{Challenge, Constraint};

/// Builder to create `Challenge` instances in tests with sensible defaults.
pub struct ChallengeBuilder {
    challenge: Challenge,
}

impl ChallengeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            challenge: Challenge {
                id: "test-challenge".to_string(),
                title: "Test challenge".to_string(),
                description: None,
                constraints: Vec::new(),
                optimal_path_length: None,
                optimal_nodes: None,
                map: None,
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.challenge.id = id.to_string();
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.challenge.constraints.push(constraint);
        self
    }

    pub fn optimal_path_length(mut self, cells: usize) -> Self {
        self.challenge.optimal_path_length = Some(cells);
        self
    }

    pub fn optimal_nodes(mut self, nodes: usize) -> Self {
        self.challenge.optimal_nodes = Some(nodes);
        self
    }

    pub fn map(mut self, map: &str) -> Self {
        self.challenge.map = Some(map.to_string());
        self
    }

    pub fn build(self) -> Challenge {
        self.challenge
    }
}

impl Default for ChallengeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
