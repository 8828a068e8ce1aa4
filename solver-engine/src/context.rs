//! Request-scoped configuration threaded through matching and strategy selection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The configuration of one top-level request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Context {
    /// The variable being solved for, if any.
    pub solution_variable: Option<String>,

    /// The number of decimal places used when rounding.
    pub precision: u32,

    /// The curriculum the explanations should follow, such as `"EU"` or `"US"`.
    pub curriculum: Option<String>,

    /// Whether decimal results are preferred to fractions.
    pub prefer_decimals: bool,

    /// Whether the result will be shown in an interactive editor, in which case some cosmetic
    /// rewrites are skipped.
    pub gm_friendly: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            solution_variable: None,
            precision: 2,
            curriculum: None,
            prefer_decimals: false,
            gm_friendly: false,
        }
    }
}

impl Context {
    /// Sets the variable being solved for.
    pub fn with_solution_variable(mut self, variable: impl Into<String>) -> Self {
        self.solution_variable = Some(variable.into());
        self
    }

    /// Sets the curriculum.
    pub fn with_curriculum(mut self, curriculum: impl Into<String>) -> Self {
        self.curriculum = Some(curriculum.into());
        self
    }

    /// Sets whether decimals are preferred.
    pub fn with_prefer_decimals(mut self, prefer_decimals: bool) -> Self {
        self.prefer_decimals = prefer_decimals;
        self
    }

    /// Sets whether the result is shown in an interactive editor.
    pub fn with_gm_friendly(mut self, gm_friendly: bool) -> Self {
        self.gm_friendly = gm_friendly;
        self
    }

    /// Sets the number of decimal places.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }
}

/// Describes which contexts a strategy alternative is meant for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ResourceData {
    pub curriculum: Option<String>,
    pub prefer_decimals: Option<bool>,
    pub gm_friendly: Option<bool>,
}

impl ResourceData {
    /// Scores this resource against a context: each field that is set and agrees with the
    /// context scores a point. Returns [`None`] if a field that is set disagrees.
    pub fn score(&self, ctx: &Context) -> Option<u32> {
        let mut score = 0;
        if let Some(curriculum) = &self.curriculum {
            if ctx.curriculum.as_ref() != Some(curriculum) {
                return None;
            }
            score += 1;
        }
        for (wanted, actual) in [
            (self.prefer_decimals, ctx.prefer_decimals),
            (self.gm_friendly, ctx.gm_friendly),
        ] {
            match wanted {
                Some(wanted) if wanted != actual => return None,
                Some(_) => score += 1,
                None => {},
            }
        }
        Some(score)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn scoring() {
        let ctx = Context::default().with_curriculum("EU").with_prefer_decimals(true);
        assert_eq!(ResourceData::default().score(&ctx), Some(0));

        let eu_decimals = ResourceData {
            curriculum: Some("EU".to_string()),
            prefer_decimals: Some(true),
            gm_friendly: None,
        };
        assert_eq!(eu_decimals.score(&ctx), Some(2));

        let us = ResourceData { curriculum: Some("US".to_string()), ..Default::default() };
        assert_eq!(us.score(&ctx), None);
        assert_eq!(us.score(&Context::default()), None);
    }
}
