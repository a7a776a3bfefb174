//! Checks tokenizer output against generated STAR documents.
//!
//! A property test generates a document item by item, prints it as STAR text
//! and tokenizes that text. Each item then asserts that the token produced
//! for it has the kind and value it was written with. The [`Option`] and
//! slice impls line whole documents up with the token list, so a missing or
//! extra token fails the case.

use std::fmt::Debug;

use proptest::{
    prop_assert_eq,
    test_runner::{TestCaseError, TestCaseResult},
};

/// A generated piece of STAR text that knows which tokens it stands for.
pub trait Input<Output: Debug>: Debug {
    /// Checks that `output` is what tokenizing this input yields.
    ///
    /// # Errors
    ///
    /// [`TestCaseError`]: the output differs from the expected tokens.
    fn assert(self, output: Output) -> TestCaseResult;
}

impl<T: Debug, U: Debug + Input<T>> Input<Option<T>> for Option<U> {
    fn assert(self, output: Option<T>) -> TestCaseResult {
        match (self, output) {
            (Some(input), Some(output)) => input.assert(output),
            (None, None) => Ok(()),
            (input, output) => Err(TestCaseError::fail(format!(
                "expected a token for {input:?}, got {output:?}"
            ))),
        }
    }
}

impl<'a, T: Debug, U: Debug> Input<&'a [T]> for &[U]
where
    for<'b> &'b U: Input<&'a T>,
{
    fn assert(self, output: &'a [T]) -> TestCaseResult {
        prop_assert_eq!(self.len(), output.len());

        for (input, output) in self.iter().zip(output) {
            input.assert(output)?;
        }

        Ok(())
    }
}
