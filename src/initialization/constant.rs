use super::ParamGen;

/// Repeats a single value, e.g. the zero start.
#[derive(Debug, Clone)]
pub struct ConstParamGen {
    value: f64,
    remaining: usize,
}

impl ConstParamGen {
    /// # Arguments
    /// * `value` - The starting weight of every coordinate.
    /// * `len` - The amount of coordinates.
    pub fn new(value: f64, len: usize) -> Self {
        Self {
            value,
            remaining: len,
        }
    }
}

impl ParamGen for ConstParamGen {
    fn remaining(&self) -> usize {
        self.remaining
    }

    fn fill(&mut self, out: &mut [f64]) -> usize {
        let n = out.len().min(self.remaining);
        out[..n].fill(self.value);
        self.remaining -= n;
        n
    }
}
