//! Set of recipes that have already been published.

use std::collections::HashSet;

use super::RecipeId;

/// Published recipe identifiers, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostedSet {
    order: Vec<RecipeId>,
    members: HashSet<RecipeId>,
}

impl PostedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the newline-delimited on-disk format.
    ///
    /// Blank lines are skipped and repeated lines collapse into one entry.
    pub fn from_lines(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(RecipeId::from)
            .collect()
    }

    pub fn contains(&self, id: &RecipeId) -> bool {
        self.members.contains(id)
    }

    /// Record an identifier. Returns `false` if it was already present.
    pub fn insert(&mut self, id: RecipeId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeId> {
        self.order.iter()
    }
}

impl FromIterator<RecipeId> for PostedSet {
    fn from_iter<I: IntoIterator<Item = RecipeId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
