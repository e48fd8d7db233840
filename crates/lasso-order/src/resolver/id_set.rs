use std::fmt;

/// An ordered, duplicate-free sequence of capability ids.
///
/// Equality and hashing are structural and order-sensitive, which makes an
/// `IdSet` usable as a canonical cache key: the same ids in the same encounter
/// order always produce the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdSet(Vec<String>);

impl IdSet {
    /// Create an empty id set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an id unless it is already present.
    ///
    /// Returns true if the id was added.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Insert ids at `index`, skipping any that are already present.
    pub fn insert_all_at(&mut self, index: usize, ids: &IdSet) {
        let fresh: Vec<String> = ids
            .iter()
            .filter(|id| !self.contains(id))
            .map(String::from)
            .collect();
        let index = index.min(self.0.len());
        self.0.splice(index..index, fresh);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|known| known == id)
    }

    /// Position of an id in encounter order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|known| known == id)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Ids of `self` that are not in `other`, in `self`'s order
    pub fn difference(&self, other: &IdSet) -> IdSet {
        IdSet(
            self.0
                .iter()
                .filter(|id| !other.contains(id))
                .cloned()
                .collect(),
        )
    }

    /// Number of ids present in both sets
    pub fn overlap(&self, other: &IdSet) -> usize {
        self.0.iter().filter(|id| other.contains(id)).count()
    }

    pub fn is_subset(&self, other: &IdSet) -> bool {
        self.0.iter().all(|id| other.contains(id))
    }

    /// True when both sets hold the same ids, regardless of order.
    pub fn same_members(&self, other: &IdSet) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<S: Into<String>> FromIterator<S> for IdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = IdSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a IdSet {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}

impl fmt::Display for IdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
