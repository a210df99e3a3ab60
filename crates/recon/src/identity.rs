use std::collections::HashSet;

/// Case-folded key used for identity comparison.
///
/// Exact match after lowercasing; whitespace and punctuation are left alone.
pub fn fold(identity: &str) -> String {
    identity.to_lowercase()
}

/// Case-insensitive set of identities.
#[derive(Debug, Clone, Default)]
pub struct IdentitySet {
    keys: HashSet<String>,
}

impl IdentitySet {
    pub fn new<'a>(identities: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            keys: identities.into_iter().map(|s| fold(s)).collect(),
        }
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.keys.contains(&fold(identity))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
