//! Matching sums and products against a subset of their terms.

use crate::{
    mapped::{self, MappedExpression},
    context::Context,
    expr::{Expression, Operator},
    path::{Path, Subexpression},
};
use std::sync::Arc;
use super::{Match, Matches, Pattern, PatternKind};

#[derive(Debug)]
pub struct NarySpec {
    pub operator: Operator,
    pub operands: Vec<Pattern>,

    /// Whether the operands must match children in increasing order.
    pub ordered: bool,

    /// Whether unmatched children are allowed.
    pub partial: bool,
}

impl NarySpec {
    pub(crate) fn could_match(&self, expr: &Expression) -> bool {
        let n = expr.child_count();
        let k = self.operands.len();
        *expr.operator() == self.operator && if self.partial { n >= k } else { n == k }
    }
}

/// A search frame for one operand.
struct Frame<'a> {
    /// The bindings made by the operands before this one.
    input: Match,

    /// The next child to try.
    next_candidate: usize,

    /// The child being tried, and its remaining matches.
    current: Option<(usize, Matches<'a>)>,
}

/// The lazy depth-first search of assignments from operands to children.
///
/// Each frame assigns one operand to a child; a match is produced whenever the last operand is
/// assigned. Candidates that are statically incompatible with an operand are never tried, and a
/// choice is abandoned early if some later operand would be left without a compatible child.
pub(crate) struct NaryMatches<'a> {
    spec: Arc<NarySpec>,
    ctx: &'a Context,
    children: Vec<Subexpression>,

    /// `compatible[i][j]` is false if operand `i` can never match child `j`.
    compatible: Vec<Vec<bool>>,

    /// For each operand, the nearest earlier operand that is the same pattern. Identical
    /// operands are assigned to increasing children, since swapping them gives the same match.
    same_as: Vec<Option<usize>>,

    assignment: Vec<usize>,
    used: Vec<bool>,
    stack: Vec<Frame<'a>>,
    base: Option<Match>,
}

impl<'a> NaryMatches<'a> {
    pub(crate) fn new(spec: Arc<NarySpec>, ctx: &'a Context, m: Match, sub: &Subexpression) -> Self {
        let mut search = Self {
            spec: spec.clone(),
            ctx,
            children: Vec::new(),
            compatible: Vec::new(),
            same_as: Vec::new(),
            assignment: Vec::new(),
            used: Vec::new(),
            stack: Vec::new(),
            base: None,
        };
        if !spec.could_match(&sub.expr) {
            return search;
        }

        search.children = sub.children();
        search.compatible = spec
            .operands
            .iter()
            .map(|operand| {
                search.children
                    .iter()
                    .map(|child| operand.could_match(&child.expr))
                    .collect::<Vec<_>>()
            })
            .collect();
        if search.compatible.iter().any(|row| !row.contains(&true)) {
            return search;
        }

        search.same_as = spec
            .operands
            .iter()
            .enumerate()
            .map(|(i, operand)| {
                spec.operands[..i]
                    .iter()
                    .rposition(|earlier| earlier.id() == operand.id())
            })
            .collect();
        search.used = vec![false; search.children.len()];

        if spec.operands.is_empty() {
            search.base = Some(m);
        } else {
            search.stack.push(Frame { input: m, next_candidate: 0, current: None });
        }
        search
    }

    /// The first child operand `depth` may take, given the assignments made so far.
    fn first_candidate(&self, depth: usize) -> usize {
        if self.spec.ordered {
            return depth.checked_sub(1).map_or(0, |prev| self.assignment[prev] + 1);
        }
        self.same_as[depth].map_or(0, |same| self.assignment[same] + 1)
    }

    /// Returns true if every operand after `depth` still has a compatible unused child, given
    /// that operand `depth` takes child `j`.
    fn feasible(&self, depth: usize, j: usize) -> bool {
        let k = self.spec.operands.len();
        let n = self.children.len();
        if self.spec.ordered && n - j - 1 < k - depth - 1 {
            return false;
        }
        (depth + 1..k).all(|later| {
            let start = if self.spec.ordered { j + 1 } else { 0 };
            (start..n).any(|c| c != j && !self.used[c] && self.compatible[later][c])
        })
    }

    /// Finds the next candidate child for operand `depth`, starting at `from`.
    fn next_candidate(&self, depth: usize, from: usize) -> Option<usize> {
        (from..self.children.len()).find(|&j| {
            !self.used[j] && self.compatible[depth][j] && self.feasible(depth, j)
        })
    }
}

impl Iterator for NaryMatches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if let Some(base) = self.base.take() {
            return Some(base);
        }

        let k = self.spec.operands.len();
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let frame = &mut self.stack[depth];

            if let Some((child, matches)) = &mut frame.current {
                let child = *child;
                if let Some(m) = matches.next() {
                    if depth + 1 == k {
                        return Some(m);
                    }
                    self.assignment.truncate(depth);
                    self.assignment.push(child);
                    let next_candidate = self.first_candidate(depth + 1);
                    self.stack.push(Frame { input: m, next_candidate, current: None });
                    continue;
                }
                frame.current = None;
                self.used[child] = false;
            }

            let from = self.stack[depth].next_candidate;
            match self.next_candidate(depth, from) {
                Some(j) => {
                    self.used[j] = true;
                    let operand = &self.spec.operands[depth];
                    let frame = &mut self.stack[depth];
                    let matches = operand.find_matches(self.ctx, &frame.input, &self.children[j]);
                    frame.next_candidate = j + 1;
                    frame.current = Some((j, matches));
                },
                None => {
                    self.stack.pop();
                },
            }
        }
    }
}

/// A pattern matching some of the children of a sum or product, with helpers to rebuild the
/// expression from the children that were not matched.
#[derive(Debug, Clone)]
pub struct NaryPattern {
    pattern: Pattern,
    spec: Arc<NarySpec>,
}

impl NaryPattern {
    pub(crate) fn new(operator: Operator, operands: Vec<Pattern>, ordered: bool, partial: bool) -> Self {
        let spec = Arc::new(NarySpec { operator, operands, ordered, partial });
        Self {
            pattern: Pattern::new(PatternKind::Nary(spec.clone())),
            spec,
        }
    }

    /// The underlying pattern.
    pub fn pattern(&self) -> Pattern {
        self.pattern.clone()
    }

    /// The indices of the children matched by the operands, in increasing order.
    pub fn matched_indices(&self, m: &Match) -> Vec<usize> {
        let Some(sub) = m.get_last_binding(&self.pattern) else {
            return Vec::new();
        };
        let mut indices = self
            .spec
            .operands
            .iter()
            .flat_map(|operand| m.get_bound_paths(operand))
            .filter(|path| path.parent().as_ref() == Some(&sub.path))
            .filter_map(|path| path.last_index())
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Rebuilds the matched expression, replacing the matched children with `replacements`
    /// placed at the position of the first matched child.
    ///
    /// From-paths of the returned mappings are relative to `root`; to-paths are relative to the
    /// new expression. Every kept child is mapped with [`PathMappingType::Shift`].
    ///
    /// [`PathMappingType::Shift`]: crate::mapping::PathMappingType::Shift
    pub fn substitute(
        &self,
        m: &Match,
        root: &Path,
        replacements: Vec<MappedExpression>,
    ) -> Option<MappedExpression> {
        let sub = m.get_last_binding(&self.pattern)?;
        let matched = self.matched_indices(m);
        let first = matched.first().copied().unwrap_or(0);

        let mut children = Vec::with_capacity(sub.expr.child_count());
        for (index, child) in sub.children().into_iter().enumerate() {
            if index == first {
                children.extend(replacements.iter().cloned());
            }
            if matched.binary_search(&index).is_ok() {
                continue;
            }
            let from = child.path.strip_prefix(root)?;
            children.push(MappedExpression::shifted(child.expr, from));
        }

        Some(match self.spec.operator {
            Operator::Product => mapped::product_of(children),
            _ => mapped::sum_of(children),
        })
    }

    /// Rebuilds the matched expression from the children that were not matched.
    pub fn rest(&self, m: &Match, root: &Path) -> Option<MappedExpression> {
        self.substitute(m, root, Vec::new())
    }
}

impl AsRef<Pattern> for NaryPattern {
    fn as_ref(&self) -> &Pattern {
        &self.pattern
    }
}

impl From<&NaryPattern> for Pattern {
    fn from(nary: &NaryPattern) -> Self {
        nary.pattern()
    }
}

impl From<NaryPattern> for Pattern {
    fn from(nary: NaryPattern) -> Self {
        nary.pattern
    }
}

#[cfg(test)]
mod tests {
    use crate::{expr::build::xp, mapping::{PathMapping, PathMappingType}, pattern::*};
    use pretty_assertions::assert_eq;
    use super::*;

    fn sub(src: &str) -> Subexpression {
        Subexpression::root(src.parse().unwrap())
    }

    #[test]
    fn containing_is_ordered() {
        let ctx = Context::default();
        let pattern = sum_containing(vec![fixed(xp(1)), fixed(xp(2))]);
        assert!(pattern.pattern().matches(&ctx, &sub("1 + x + 2")));
        assert!(!pattern.pattern().matches(&ctx, &sub("2 + x + 1")));
    }

    #[test]
    fn commutative_is_exact() {
        let ctx = Context::default();
        let pattern = commutative_sum_of(vec![fixed(xp(1)), variable()]);
        assert!(pattern.pattern().matches(&ctx, &sub("x + 1")));
        assert!(!pattern.pattern().matches(&ctx, &sub("x + 1 + 2")));
    }

    #[test]
    fn all_assignments_in_order() {
        let ctx = Context::default();
        let a = unsigned_integer();
        let b = unsigned_integer();
        let pattern = sum_containing(vec![a.clone(), b.clone()]);
        let pairs = pattern
            .pattern()
            .find_matches(&ctx, &Match::empty(), &sub("1 + 2 + x + 3"))
            .map(|m| (m.integer_value(&a).unwrap(), m.integer_value(&b).unwrap()))
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![
            ("1".to_string(), "2".to_string()),
            ("1".to_string(), "3".to_string()),
            ("2".to_string(), "3".to_string()),
        ]);
    }

    #[test]
    fn identical_operands_are_not_swapped() {
        let ctx = Context::default();
        let x = any();
        let pattern = commutative_product_of(vec![x.clone(), x.clone(), variable()]);
        let count = pattern
            .pattern()
            .find_matches(&ctx, &Match::empty(), &sub("2 y 2"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn wide_unordered_search_is_pruned() {
        let ctx = Context::default();
        let src = (1..=40).map(|n| n.to_string()).collect::<Vec<_>>().join(" + ") + " + x";
        let pattern = sum_containing(vec![unsigned_integer(), variable()]);
        let m = pattern.pattern().first_match(&ctx, &sub(&src));
        assert!(m.is_some());
        assert_eq!(pattern.matched_indices(&m.unwrap()), vec![0, 40]);
    }

    #[test]
    fn rest_and_substitute() {
        let ctx = Context::default();
        let a = unsigned_integer();
        let b = unsigned_integer();
        let pattern = sum_containing(vec![a.clone(), b.clone()]);
        let m = pattern.pattern().first_match(&ctx, &sub("1 + x + 2 + y")).unwrap();

        assert_eq!(pattern.matched_indices(&m), vec![0, 2]);

        let rest = pattern.rest(&m, &Path::root()).unwrap();
        assert_eq!(rest.expr.to_string(), "x + y");

        let replaced = pattern
            .substitute(&m, &Path::root(), vec![MappedExpression::from(xp(3))])
            .unwrap();
        assert_eq!(replaced.expr.to_string(), "3 + x + y");
        assert_eq!(replaced.mappings.len(), 2);
        assert_eq!(replaced.without_identity_shifts().mappings, vec![PathMapping::new(
            vec!["./3".parse().unwrap()],
            PathMappingType::Shift,
            vec!["./2".parse().unwrap()],
        )]);
    }
}
