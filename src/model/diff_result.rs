use std::collections::BTreeSet;
use std::path::PathBuf;

/// Differences between a source tree and a replica tree at one point in time.
///
/// All paths are relative to the sync roots. A directory that exists on one
/// side only is listed once; its descendants are not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub only_in_source: BTreeSet<PathBuf>,
    pub only_in_replica: BTreeSet<PathBuf>,
    pub differing: BTreeSet<PathBuf>,
}

impl DiffResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.only_in_source.is_empty() && self.only_in_replica.is_empty() && self.differing.is_empty()
    }

    pub fn merge(&mut self, other: DiffResult) {
        self.only_in_source.extend(other.only_in_source);
        self.only_in_replica.extend(other.only_in_replica);
        self.differing.extend(other.differing);
    }

    /// Paths that must be (re)created from source, in path order.
    pub fn to_copy(&self) -> impl Iterator<Item = &PathBuf> {
        self.only_in_source.union(&self.differing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_by_default() {
        let diff = DiffResult::new();
        assert!(diff.is_empty());
    }

    #[test]
    fn merge_unions_each_set() {
        let mut diff = DiffResult::new();
        diff.only_in_source.insert(PathBuf::from("a.txt"));

        let mut nested = DiffResult::new();
        nested.only_in_replica.insert(PathBuf::from("sub/old.txt"));
        nested.differing.insert(PathBuf::from("sub/b.txt"));
        diff.merge(nested);

        assert!(!diff.is_empty());
        assert!(diff.only_in_source.contains(&PathBuf::from("a.txt")));
        assert!(diff.only_in_replica.contains(&PathBuf::from("sub/old.txt")));
        assert!(diff.differing.contains(&PathBuf::from("sub/b.txt")));
    }

    #[test]
    fn copy_set_is_ordered_union() {
        let mut diff = DiffResult::new();
        diff.only_in_source.insert(PathBuf::from("c"));
        diff.differing.insert(PathBuf::from("a"));
        diff.only_in_replica.insert(PathBuf::from("b"));

        let copies: Vec<_> = diff.to_copy().cloned().collect();
        assert_eq!(copies, vec![PathBuf::from("a"), PathBuf::from("c")]);
    }
}
