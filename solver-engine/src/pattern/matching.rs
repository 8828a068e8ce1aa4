use crate::{expr::Expression, path::{Path, Subexpression}};
use rug::{Integer, Rational};
use std::{fmt, sync::Arc};
use super::{Pattern, PatternId};

struct Binding {
    key: PatternId,
    sub: Subexpression,
    parent: Match,
}

/// An immutable environment binding patterns to the subexpressions they matched.
///
/// A match is a persistent linked list: [`Match::new_child`] returns a new match sharing all
/// existing bindings, so sibling branches of a search never see each other's bindings.
#[derive(Clone, Default)]
pub struct Match(Option<Arc<Binding>>);

impl Match {
    /// The match with no bindings.
    pub fn empty() -> Self {
        Self(None)
    }

    /// Returns a new match that also binds `pattern` to `sub`.
    pub fn new_child(&self, pattern: &impl AsRef<Pattern>, sub: Subexpression) -> Self {
        self.bind(pattern.as_ref().key_id(), sub)
    }

    pub(crate) fn bind(&self, key: PatternId, sub: Subexpression) -> Self {
        Self(Some(Arc::new(Binding { key, sub, parent: self.clone() })))
    }

    /// Iterates over the bindings, newest first.
    fn bindings(&self) -> impl Iterator<Item = &Binding> {
        std::iter::successors(self.0.as_deref(), |binding| binding.parent.0.as_deref())
    }

    pub(crate) fn last_binding_of(&self, key: PatternId) -> Option<&Subexpression> {
        self.bindings()
            .find(|binding| binding.key == key)
            .map(|binding| &binding.sub)
    }

    /// The most recent subexpression bound to the pattern.
    pub fn get_last_binding(&self, pattern: &impl AsRef<Pattern>) -> Option<&Subexpression> {
        self.last_binding_of(pattern.as_ref().key_id())
    }

    /// The expression bound to the pattern.
    pub fn get_bound_expr(&self, pattern: &impl AsRef<Pattern>) -> Option<&Expression> {
        self.get_last_binding(pattern).map(|sub| &sub.expr)
    }

    /// Every path the pattern was bound to, in the order the bindings were made.
    pub fn get_bound_paths(&self, pattern: &impl AsRef<Pattern>) -> Vec<Path> {
        let key = pattern.as_ref().key_id();
        let mut paths = self
            .bindings()
            .filter(|binding| binding.key == key)
            .map(|binding| binding.sub.path.clone())
            .collect::<Vec<_>>();
        paths.reverse();
        paths.dedup();
        paths
    }

    /// Returns true if the pattern is bound.
    pub fn is_bound(&self, pattern: &impl AsRef<Pattern>) -> bool {
        self.get_last_binding(pattern).is_some()
    }

    /// The value of the integer (or negated integer) bound to the pattern.
    pub fn integer_value(&self, pattern: &impl AsRef<Pattern>) -> Option<Integer> {
        self.get_bound_expr(pattern)?.integer_value()
    }

    /// The exact value of the number bound to the pattern.
    pub fn rational_value(&self, pattern: &impl AsRef<Pattern>) -> Option<Rational> {
        self.get_bound_expr(pattern)?.rational_value()
    }
}

impl fmt::Debug for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for binding in self.bindings() {
            list.entry(&format_args!("#{} -> {} at {}", binding.key.0, binding.sub.expr, binding.sub.path));
        }
        list.finish()
    }
}
