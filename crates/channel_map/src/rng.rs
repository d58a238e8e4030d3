/// Small deterministic generator so placement is reproducible per seed.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let val = (self.next_u64() >> 11) as f64;
        val / ((1u64 << 53) as f64)
    }

    /// Uniform in `[low, high)`; returns `low` for an empty range.
    pub fn range_f64(&mut self, low: f64, high: f64) -> f64 {
        if !(high > low) {
            return low;
        }
        low + self.next_f64() * (high - low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut left = Lcg::new(42);
        let mut right = Lcg::new(42);
        for _ in 0..16 {
            assert_eq!(left.next_u64(), right.next_u64());
        }
    }

    #[test]
    fn range_stays_inside_bounds() {
        let mut rng = Lcg::new(7);
        for _ in 0..1_000 {
            let value = rng.range_f64(-3.0, 5.0);
            assert!((-3.0..5.0).contains(&value));
        }
        assert_eq!(rng.range_f64(2.0, 2.0), 2.0);
    }
}
