//! Positions of nodes within an expression tree.

use crate::{error::{Error, InvalidPath}, expr::Expression};
use std::{fmt::{self, Display, Formatter}, str::FromStr};

/// A position *within* a node rather than the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathMarker {
    /// The operator glyph of the node, such as the `+` of a sum.
    Operator,

    /// The opening bracket around the node.
    OpeningBracket,

    /// The closing bracket around the node.
    ClosingBracket,
}

impl PathMarker {
    fn suffix(self) -> &'static str {
        match self {
            PathMarker::Operator => "op",
            PathMarker::OpeningBracket => "(",
            PathMarker::ClosingBracket => ")",
        }
    }
}

/// The address of a node, as the list of child indices leading to it from a root, possibly
/// followed by a [`PathMarker`].
///
/// Paths are written `.` for the root and `./1/0` for the first child of the second child.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    indices: Vec<usize>,
    marker: Option<PathMarker>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a list of child indices.
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices, marker: None }
    }

    /// The child indices leading to the node.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The marker at the end of the path, if any.
    pub fn marker(&self) -> Option<PathMarker> {
        self.marker
    }

    /// Returns true if this is the root path.
    pub fn is_root(&self) -> bool {
        self.indices.is_empty() && self.marker.is_none()
    }

    /// The path of the `index`th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices, marker: None }
    }

    /// This path with the given marker.
    pub fn with_marker(&self, marker: PathMarker) -> Self {
        Self { indices: self.indices.clone(), marker: Some(marker) }
    }

    /// The path of the parent node, or [`None`] for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.marker.is_some() {
            return Some(Self::from_indices(self.indices.clone()));
        }
        let (_, parent) = self.indices.split_last()?;
        Some(Self::from_indices(parent.to_vec()))
    }

    /// The index of this node within its parent.
    pub fn last_index(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Returns true if `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        prefix.marker.is_none() && self.indices.starts_with(&prefix.indices)
    }

    /// The path relative to `prefix`, or [`None`] if `prefix` is not an ancestor.
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Self> {
        self.starts_with(prefix).then(|| Self {
            indices: self.indices[prefix.indices.len()..].to_vec(),
            marker: self.marker,
        })
    }

    /// Interprets `relative` as a path below this one.
    pub fn join(&self, relative: &Path) -> Self {
        let mut indices = self.indices.clone();
        indices.extend_from_slice(&relative.indices);
        Self { indices, marker: relative.marker }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, ".")?;
        for index in &self.indices {
            write!(f, "/{}", index)?;
        }
        if let Some(marker) = self.marker {
            write!(f, ":{}", marker.suffix())?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::unspanned(InvalidPath { path: s.to_string() });
        let (body, marker) = match s.split_once(':') {
            Some((body, "op")) => (body, Some(PathMarker::Operator)),
            Some((body, "(")) => (body, Some(PathMarker::OpeningBracket)),
            Some((body, ")")) => (body, Some(PathMarker::ClosingBracket)),
            Some(_) => return Err(invalid()),
            None => (s, None),
        };
        let rest = body.strip_prefix('.').ok_or_else(invalid)?;
        let indices = if rest.is_empty() {
            Vec::new()
        } else {
            rest.strip_prefix('/')
                .ok_or_else(invalid)?
                .split('/')
                .map(|index| index.parse::<usize>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(Self { indices, marker })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An expression together with the path at which it occurs in the tree being worked on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Subexpression {
    /// The expression at the path.
    pub expr: Expression,

    /// Where the expression is.
    pub path: Path,
}

impl Subexpression {
    /// Creates a subexpression.
    pub fn new(expr: Expression, path: Path) -> Self {
        Self { expr, path }
    }

    /// A whole tree, at the root path.
    pub fn root(expr: Expression) -> Self {
        Self::new(expr, Path::root())
    }

    /// The `n`th child, with its path.
    pub fn nth_child(&self, n: usize) -> Option<Subexpression> {
        let child = self.expr.nth_child(n)?;
        Some(Subexpression::new(child.clone(), self.path.child(n)))
    }

    /// All children, with their paths.
    pub fn children(&self) -> Vec<Subexpression> {
        self.expr
            .children()
            .iter()
            .enumerate()
            .map(|(n, child)| Subexpression::new(child.clone(), self.path.child(n)))
            .collect()
    }

    /// The descendant at the given absolute path.
    pub fn descendant(&self, path: &Path) -> Option<Subexpression> {
        let relative = path.strip_prefix(&self.path)?;
        let expr = self.expr.descendant(relative.indices())?;
        Some(Subexpression::new(expr.clone(), path.clone()))
    }

    /// This expression with the descendant at the given absolute path replaced, or [`None`] if
    /// the path is not below this subexpression.
    pub fn substitute(&self, path: &Path, new: Expression) -> Option<Expression> {
        let relative = path.strip_prefix(&self.path)?;
        self.expr.replace_descendant(relative.indices(), new)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::expr::build::*;
    use super::*;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(Path::root().to_string(), ".");
        assert_eq!(Path::root().child(0).child(1).to_string(), "./0/1");
        assert_eq!(path("./2:op"), Path::from_indices(vec![2]).with_marker(PathMarker::Operator));
        assert_eq!(path("."), Path::root());
        assert!("0/1".parse::<Path>().is_err());
        assert!("./a".parse::<Path>().is_err());
        assert!("./1:x".parse::<Path>().is_err());
    }

    #[test]
    fn prefixes() {
        assert!(path("./1/0").starts_with(&path("./1")));
        assert!(!path("./1/0").starts_with(&path("./0")));
        assert_eq!(path("./1/0/2").strip_prefix(&path("./1")), Some(path("./0/2")));
        assert_eq!(path("./1").join(&path("./0:op")), path("./1/0:op"));
        assert_eq!(path("./1/0").parent(), Some(path("./1")));
        assert_eq!(Path::root().parent(), None);
    }

    #[test]
    fn substitute_below_subexpression() {
        let expr = sum_of(vec![xp(1), product_of(vec![xp(2), var("x")])]);
        let sub = Subexpression::root(expr).nth_child(1).unwrap();
        assert_eq!(sub.path, path("./1"));
        let replaced = sub.substitute(&path("./1/1"), var("y")).unwrap();
        assert_eq!(replaced.to_string(), "2 y");
        assert_eq!(sub.substitute(&path("./0"), var("y")), None);
        assert_eq!(sub.descendant(&path("./1/0")).unwrap().expr, xp(2));
    }
}
