//! Chat participants seen during this process.

use std::collections::HashSet;

/// Set of viewer names, used to detect first-time arrivals.
#[derive(Debug, Default)]
pub struct Viewers {
    seen: HashSet<String>,
}

impl Viewers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`. Returns true the first time a name is seen.
    pub fn identify(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
