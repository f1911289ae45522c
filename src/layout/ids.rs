//! Deterministic id minting
//!
//! New node and tab ids are derived from a counter so that applying the same
//! action to the same state always produces the same tree.

use std::collections::HashSet;

/// Hands out ids of the form `<prefix>-<n>` that are not already taken
#[derive(Debug, Clone)]
pub struct IdMinter {
    used: HashSet<String>,
    next: u64,
}

impl IdMinter {
    pub fn new(used: HashSet<String>, next: u64) -> Self {
        Self {
            used,
            next: next.max(1),
        }
    }

    /// Mint a fresh id and reserve it
    pub fn fresh(&mut self, prefix: &str) -> String {
        loop {
            let candidate = format!("{}-{}", prefix, self.next);
            self.next += 1;
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Reserve an id chosen elsewhere; false if it is empty or already taken
    pub fn claim(&mut self, id: &str) -> bool {
        !id.is_empty() && self.used.insert(id.to_string())
    }

    pub fn is_used(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Counter value to carry into the next minter
    pub fn next_value(&self) -> u64 {
        self.next
    }
}
