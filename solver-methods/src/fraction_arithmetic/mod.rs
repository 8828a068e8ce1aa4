//! Addition and simplification of fractions of integers.

pub mod plans;
pub mod rules;

pub mod explanation {
    crate::explanation::keys!("FractionArithmetic";
        /// `[1 / 5] + [2 / 5]` to `[1 + 2 / 5]`
        AddLikeFractions,

        /// `[3 / 5] - [2 / 5]` to `[3 - 2 / 5]`
        SubtractLikeFractions,

        /// `3 + [1 / 2]` to `[3 / 1] + [1 / 2]`
        ConvertIntegerToFraction,

        /// `[1 / 2] + [1 / 3]` to `[1 * 3 / 2 * 3] + [1 * 2 / 3 * 2]`
        BringToCommonDenominator,

        /// `[-x / y]` to `-[x / y]`
        SimplifyNegativeInNumerator,

        /// `[x / -y]` to `-[x / y]`
        SimplifyNegativeInDenominator,

        /// `[-x / -y]` to `[x / y]`
        SimplifyNegativeInNumeratorAndDenominator,

        /// `[6 / 3]` to `2`
        SimplifyFractionToInteger,

        /// `[6 / 9]` to `[3 * 2 / 3 * 3]`
        FindCommonFactorInFraction,

        /// `[[1 / 2] / 3]` to `[1 / 2 * 3]`
        SimplifyFractionWithFractionNumerator,

        /// `[2 / [3 / 4]]` to `[2 * 4 / 3]`
        SimplifyFractionWithFractionDenominator,

        AddFractions,
        SimplifyFraction,
    );
}
