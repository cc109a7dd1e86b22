//! FILENAME: core/engine/src/dependency_graph.rs
//! PURPOSE: Tracks which named cells depend on which other named cells.
//! CONTEXT: The graph is pure topology over cell names. It never holds cell
//! contents, so the spreadsheet's cell store stays the single owner of cell
//! data and the graph can be rebuilt from formulas at any time.
//!
//! TERMINOLOGY:
//! - The pair (s, t) means "t depends on s".
//! - Dependents of s: every t with (s, t). If B1 = A1 + 2, B1 is a dependent of A1.
//! - Dependees of t: every s with (s, t). If B1 = A1 + 2, A1 is a dependee of B1.
//!
//! Both directions are stored so lookups are O(1) either way. Every mutation
//! updates the two maps together before returning.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// dependents["A1"] = cells whose formulas reference A1.
    dependents: HashMap<String, HashSet<String>>,

    /// dependees["B1"] = cells that B1's formula references.
    dependees: HashMap<String, HashSet<String>>,

    /// Number of (s, t) pairs.
    size: usize,
}

impl DependencyGraph {
    /// Creates a new, empty dependency graph.
    pub fn new() -> Self {
        DependencyGraph::default()
    }

    /// The number of ordered pairs in the graph.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The number of dependees of `s`.
    pub fn dependee_count(&self, s: &str) -> usize {
        self.dependees.get(s).map_or(0, HashSet::len)
    }

    pub fn has_dependents(&self, s: &str) -> bool {
        self.dependents.contains_key(s)
    }

    pub fn has_dependees(&self, s: &str) -> bool {
        self.dependees.contains_key(s)
    }

    /// Returns the cells that directly depend on `s` (possibly none).
    pub fn get_dependents(&self, s: &str) -> HashSet<String> {
        self.dependents.get(s).cloned().unwrap_or_default()
    }

    /// Returns the cells `s` directly depends on (possibly none).
    pub fn get_dependees(&self, s: &str) -> HashSet<String> {
        self.dependees.get(s).cloned().unwrap_or_default()
    }

    /// Iterates the direct dependents of `s` without cloning the set.
    pub fn dependents_of<'a>(&'a self, s: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.dependents
            .get(s)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Adds the pair (s, t). Adding an existing pair changes nothing.
    pub fn add_dependency(&mut self, s: &str, t: &str) {
        let inserted = self
            .dependents
            .entry(s.to_string())
            .or_default()
            .insert(t.to_string());

        if inserted {
            self.dependees
                .entry(t.to_string())
                .or_default()
                .insert(s.to_string());
            self.size += 1;
        }
    }

    /// Removes the pair (s, t) if present.
    pub fn remove_dependency(&mut self, s: &str, t: &str) {
        let removed = remove_from(&mut self.dependents, s, t);
        // The mirror entry is removed even if the forward side was missing,
        // so a half-present pair can never linger.
        let mirrored = remove_from(&mut self.dependees, t, s);

        if removed || mirrored {
            self.size -= 1;
        }
    }

    /// Replaces every pair (s, r) with (s, t) for each t in `new_dependents`.
    pub fn replace_dependents<I, S>(&mut self, s: &str, new_dependents: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(old) = self.dependents.remove(s) {
            for r in old {
                remove_from(&mut self.dependees, &r, s);
                self.size -= 1;
            }
        }

        for t in new_dependents {
            self.add_dependency(s, t.as_ref());
        }
    }

    /// Replaces every pair (r, s) with (t, s) for each t in `new_dependees`.
    pub fn replace_dependees<I, S>(&mut self, s: &str, new_dependees: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(old) = self.dependees.remove(s) {
            for r in old {
                remove_from(&mut self.dependents, &r, s);
                self.size -= 1;
            }
        }

        for t in new_dependees {
            self.add_dependency(t.as_ref(), s);
        }
    }

    /// Clears the entire dependency graph.
    pub fn clear(&mut self) {
        self.dependents.clear();
        self.dependees.clear();
        self.size = 0;
    }
}

/// Removes `value` from `map[key]`, dropping the set once it is empty.
/// Returns whether anything was removed.
fn remove_from(map: &mut HashMap<String, HashSet<String>>, key: &str, value: &str) -> bool {
    let Some(set) = map.get_mut(key) else {
        return false;
    };
    let removed = set.remove(value);
    if set.is_empty() {
        map.remove(key);
    }
    removed
}
