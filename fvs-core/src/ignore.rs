//! A pure ignore-pattern predicate, independent of the walker that consults it.

use crate::errors::FvsError;

/// A compiled set of shell-style glob patterns (`*`, `?`, `[...]`).
/// A relative path is ignored if *any* pattern matches it.
pub struct Ignore {
    patterns: Vec<glob::Pattern>,
}

impl Ignore {
    pub fn new(patterns: &[String]) -> Result<Self, FvsError> {
        let patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p).map_err(FvsError::InvalidPattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn empty() -> Self {
        Self { patterns: Vec::new() }
    }

    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.patterns.iter().any(|p| {
            let hit = p.matches(relative_path);
            if hit {
                tracing::debug!(relative_path, pattern = %p.as_str(), "ignore pattern matched");
            }
            hit
        })
    }
}
