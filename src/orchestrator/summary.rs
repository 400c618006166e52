use std::fmt;

use crate::orchestrator::workflow::UpdateResult;

/// Final state of one dependent repository after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    Updated(UpdateResult),
    /// Repository name; it has no older dependency on the release.
    Skipped(String),
    Failed { repository: String, error: String },
}

/// Outcomes of a propagation run, in organization listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub outcomes: Vec<RepoOutcome>,
}

impl Summary {
    pub fn new(outcomes: Vec<RepoOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn updated(&self) -> impl Iterator<Item = &UpdateResult> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RepoOutcome::Updated(result) => Some(result),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            RepoOutcome::Failed { repository, error } => {
                Some((repository.as_str(), error.as_str()))
            }
            _ => None,
        })
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, RepoOutcome::Skipped(_)))
            .count()
    }

    /// One line per repository that reached the pull request step.
    /// Skipped and failed repositories are left out.
    pub fn render(&self) -> String {
        self.updated()
            .map(UpdateResult::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
