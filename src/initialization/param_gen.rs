/// A bounded source of starting weights.
///
/// The total amount of values is known up front so callers can reserve the
/// whole destination before generating anything.
pub trait ParamGen {
    /// How many values are left to generate.
    fn remaining(&self) -> usize;

    /// Writes the next values into the front of `out`.
    ///
    /// # Returns
    /// How many were written, `min(out.len(), self.remaining())`. Zero once exhausted.
    fn fill(&mut self, out: &mut [f64]) -> usize;
}
