//! Provenance records linking the paths of a transformation's source to the paths of its
//! result.

use crate::path::Path;

#[cfg(feature = "serde")]
use serde::Serialize;

/// How the nodes at the `from` paths of a [`PathMapping`] relate to the nodes at its `to` paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PathMappingType {
    /// The node is unchanged but its position changed because its siblings changed.
    Shift,

    /// The node was moved to another position, unchanged.
    Move,

    /// The node was factored out of several places into one.
    Factor,

    /// The node was copied into several places.
    Distribute,

    /// The node was introduced, possibly derived from the `from` nodes.
    Introduce,

    /// The nodes were removed.
    Cancel,

    /// The node was rewritten into another one.
    Transform,

    /// Several nodes were combined into one, such as `2 + 3` into `5`.
    Combine,

    /// The nodes are related without one being derived from the other.
    Relate,
}

/// A typed correspondence between paths of a transformation's source and of its result.
///
/// Paths are relative: `from` paths to the root of the source, `to` paths to the root of the
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PathMapping {
    pub from_paths: Vec<Path>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: PathMappingType,
    pub to_paths: Vec<Path>,
}

impl PathMapping {
    /// Creates a new mapping.
    pub fn new(from_paths: Vec<Path>, kind: PathMappingType, to_paths: Vec<Path>) -> Self {
        Self { from_paths, kind, to_paths }
    }

    /// Moves the mapping below the given prefixes: `from` paths are joined onto `from_prefix`
    /// and `to` paths onto `to_prefix`.
    pub fn relativize(&self, from_prefix: &Path, to_prefix: &Path) -> Self {
        Self {
            from_paths: self.from_paths.iter().map(|p| from_prefix.join(p)).collect(),
            kind: self.kind,
            to_paths: self.to_paths.iter().map(|p| to_prefix.join(p)).collect(),
        }
    }

    /// Re-roots the mapping's paths at the given prefixes: the inverse of [`relativize`].
    /// Paths that are not below their prefix are kept as is.
    ///
    /// [`relativize`]: PathMapping::relativize
    pub fn localize(&self, from_prefix: &Path, to_prefix: &Path) -> Self {
        let strip = |path: &Path, prefix: &Path| path.strip_prefix(prefix).unwrap_or_else(|| path.clone());
        Self {
            from_paths: self.from_paths.iter().map(|p| strip(p, from_prefix)).collect(),
            kind: self.kind,
            to_paths: self.to_paths.iter().map(|p| strip(p, to_prefix)).collect(),
        }
    }

    /// Fan-out mappings (distributing a node, or introducing nodes derived from existing ones)
    /// collapse into one mapping when their sources are the same.
    fn is_fan_out(&self) -> bool {
        match self.kind {
            PathMappingType::Distribute => true,
            PathMappingType::Introduce => !self.from_paths.is_empty(),
            _ => false,
        }
    }

    /// Merges two mappings into one, if they can be.
    ///
    /// Identical mappings merge into themselves. Fan-out mappings of the same type and with the
    /// same `from` paths merge into one whose `to` paths are the union of both.
    pub fn merge_with(&self, other: &PathMapping) -> Option<PathMapping> {
        if self == other {
            return Some(self.clone());
        }
        if self.kind != other.kind || self.from_paths != other.from_paths || !self.is_fan_out() {
            return None;
        }
        let mut to_paths = self.to_paths.clone();
        for path in &other.to_paths {
            if !to_paths.contains(path) {
                to_paths.push(path.clone());
            }
        }
        Some(PathMapping::new(self.from_paths.clone(), self.kind, to_paths))
    }
}

/// Merges a list of mappings pairwise, keeping the order in which mappings first appear.
///
/// Merging is idempotent: merging an already merged list returns the same list.
pub fn merge_path_mappings(mappings: impl IntoIterator<Item = PathMapping>) -> Vec<PathMapping> {
    let mut merged: Vec<PathMapping> = Vec::new();
    'outer: for mapping in mappings {
        for existing in merged.iter_mut() {
            if let Some(combined) = existing.merge_with(&mapping) {
                *existing = combined;
                continue 'outer;
            }
        }
        merged.push(mapping);
    }
    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn mapping(from: &[&str], kind: PathMappingType, to: &[&str]) -> PathMapping {
        PathMapping::new(
            from.iter().map(|p| path(p)).collect(),
            kind,
            to.iter().map(|p| path(p)).collect(),
        )
    }

    #[test]
    fn distribute_fans_out() {
        let merged = merge_path_mappings(vec![
            mapping(&["./0"], PathMappingType::Distribute, &["./0/0"]),
            mapping(&["./0"], PathMappingType::Distribute, &["./1/0"]),
            mapping(&["./0"], PathMappingType::Distribute, &["./2/0"]),
        ]);
        assert_eq!(merged, vec![
            mapping(&["./0"], PathMappingType::Distribute, &["./0/0", "./1/0", "./2/0"]),
        ]);
    }

    #[test]
    fn identical_mappings_collapse() {
        let move_ = mapping(&["./1"], PathMappingType::Move, &["./0"]);
        assert_eq!(merge_path_mappings(vec![move_.clone(), move_.clone()]), vec![move_]);
    }

    #[test]
    fn other_types_stay_separate() {
        let mappings = vec![
            mapping(&["./1"], PathMappingType::Move, &["./0"]),
            mapping(&["./1"], PathMappingType::Move, &["./2"]),
            mapping(&[], PathMappingType::Introduce, &["./3"]),
            mapping(&[], PathMappingType::Introduce, &["./4"]),
        ];
        assert_eq!(merge_path_mappings(mappings.clone()), mappings);
    }

    #[test]
    fn merging_is_idempotent() {
        let once = merge_path_mappings(vec![
            mapping(&["./0"], PathMappingType::Introduce, &["./1"]),
            mapping(&["./0", "./1"], PathMappingType::Combine, &["."]),
            mapping(&["./0"], PathMappingType::Introduce, &["./2"]),
            mapping(&["./0"], PathMappingType::Distribute, &["./1/1"]),
        ]);
        let twice = merge_path_mappings(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn relativize_and_localize() {
        let local = mapping(&["./0", "./1"], PathMappingType::Combine, &["."]);
        let global = local.relativize(&path("./2"), &path("./2"));
        assert_eq!(global, mapping(&["./2/0", "./2/1"], PathMappingType::Combine, &["./2"]));
        assert_eq!(global.localize(&path("./2"), &path("./2")), local);
    }
}
