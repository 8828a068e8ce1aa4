//! Evaluation of sums, products and powers of integers.

pub mod plans;
pub mod rules;

pub mod explanation {
    crate::explanation::keys!("IntegerArithmetic";
        /// `3 + 5` to `8`
        EvaluateIntegerAddition,

        /// `3 - 5` to `-2`
        EvaluateIntegerSubtraction,

        /// `3 * 5` to `15`
        EvaluateIntegerProduct,

        /// `15 : 5` to `3`
        EvaluateIntegerDivision,

        /// `[2 ^ 6]` to `64`
        EvaluateIntegerPowerDirectly,

        /// `[(-2) ^ 4]` to `[2 ^ 4]`
        SimplifyEvenPowerOfNegative,

        /// `[(-2) ^ 3]` to `-[2 ^ 3]`
        SimplifyOddPowerOfNegative,

        EvaluateProductOfIntegers,
        EvaluateSumOfIntegers,
        EvaluateIntegerPower,
        SimplifyIntegersInProduct,
        SimplifyIntegersInSum,
        SimplifyExpressionInBrackets,
        EvaluateArithmeticExpression,
    );
}
