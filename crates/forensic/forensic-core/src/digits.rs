//! Leading-digit profiling against Benford's Law.

use forensic_spi::DigitDistribution;

/// Chi-squared critical value for 8 degrees of freedom at alpha = 0.05.
pub const BENFORD_CHI_SQ_CRITICAL: f64 = 15.507;

/// Leading significant digit of `|amount|`.
///
/// The magnitude is rendered in plain decimal, the decimal point removed and
/// leading zeros stripped. Returns 0 when no digit remains (a zero amount) and
/// for non-finite amounts.
pub fn leading_digit(amount: f64) -> u8 {
    if !amount.is_finite() {
        return 0;
    }
    let rendered = amount.abs().to_string().replace('.', "");
    rendered
        .trim_start_matches('0')
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
        .unwrap_or(0)
}

/// Benford reference curve `P(d) = log10(1 + 1/d)` for d in 1..=9.
pub fn expected_distribution() -> DigitDistribution {
    let mut frequencies = [0.0; 9];
    for (i, p) in frequencies.iter_mut().enumerate() {
        let d = (i + 1) as f64;
        *p = (1.0 + 1.0 / d).log10();
    }
    DigitDistribution::new(frequencies)
}

/// Empirical distribution over digits 1..=9. Zeros and out-of-domain digits are ignored.
pub fn empirical_distribution(digits: &[u8]) -> DigitDistribution {
    DigitProfiler::from_digits(digits.iter().copied()).distribution()
}

/// Incrementally updatable leading-digit counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigitProfiler {
    counts: [u64; 9],
    zeros: u64,
}

impl DigitProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_digits(digits: impl IntoIterator<Item = u8>) -> Self {
        let mut profiler = Self::new();
        profiler.extend(digits);
        profiler
    }

    /// Record one leading digit.
    pub fn observe(&mut self, digit: u8) {
        match digit {
            1..=9 => self.counts[(digit - 1) as usize] += 1,
            _ => self.zeros += 1,
        }
    }

    pub fn extend(&mut self, digits: impl IntoIterator<Item = u8>) {
        for digit in digits {
            self.observe(digit);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of observations inside the Benford domain.
    pub fn len(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observations that had no leading digit.
    pub fn zero_count(&self) -> u64 {
        self.zeros
    }

    /// Counts ordered by digit (1 first).
    pub fn counts(&self) -> &[u64; 9] {
        &self.counts
    }

    pub fn distribution(&self) -> DigitDistribution {
        let total = self.len();
        if total == 0 {
            return DigitDistribution::zeros();
        }
        let mut frequencies = [0.0; 9];
        for (f, &c) in frequencies.iter_mut().zip(self.counts.iter()) {
            *f = c as f64 / total as f64;
        }
        DigitDistribution::new(frequencies)
    }

    /// Pearson chi-squared statistic of the counts against `expected`.
    pub fn chi_squared(&self, expected: &DigitDistribution) -> f64 {
        let total = self.len() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.counts
            .iter()
            .zip(expected.frequencies().iter())
            .filter(|(_, p)| **p > 0.0)
            .map(|(&observed, &p)| {
                let e = total * p;
                (observed as f64 - e).powi(2) / e
            })
            .sum()
    }

    /// Mean absolute deviation between observed and expected frequencies.
    pub fn mean_absolute_deviation(&self, expected: &DigitDistribution) -> f64 {
        let observed = self.distribution();
        observed
            .iter()
            .map(|(d, f)| (f - expected.get(d)).abs())
            .sum::<f64>()
            / 9.0
    }

    pub fn conforms(&self, expected: &DigitDistribution) -> bool {
        self.chi_squared(expected) <= BENFORD_CHI_SQ_CRITICAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_leading_digit_examples() {
        assert_eq!(leading_digit(0.0), 0);
        assert_eq!(leading_digit(1234.56), 1);
        assert_eq!(leading_digit(-987.0), 9);
        assert_eq!(leading_digit(0.056), 5);
    }

    #[test]
    fn test_leading_digit_edge_cases() {
        assert_eq!(leading_digit(-0.0), 0);
        assert_eq!(leading_digit(0.00001), 1);
        assert_eq!(leading_digit(7e20), 7);
        assert_eq!(leading_digit(f64::NAN), 0);
        assert_eq!(leading_digit(f64::INFINITY), 0);
    }

    #[test]
    fn test_expected_distribution() {
        let expected = expected_distribution();
        assert!((expected.get(1) - 0.30103).abs() < 1e-4);
        assert!((expected.get(9) - 0.04576).abs() < 1e-4);
        assert!((expected.sum() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_empirical_distribution_sums_to_one() {
        let dist = empirical_distribution(&[1, 1, 2, 3, 9, 0, 0]);
        assert!((dist.sum() - 1.0).abs() < EPS);
        assert!((dist.get(1) - 0.4).abs() < EPS);
        assert_eq!(dist.get(4), 0.0);
    }

    #[test]
    fn test_empirical_distribution_empty() {
        let dist = empirical_distribution(&[]);
        assert_eq!(dist.sum(), 0.0);
        assert_eq!(dist.iter().count(), 9);

        let only_zeros = empirical_distribution(&[0, 0]);
        assert_eq!(only_zeros, DigitDistribution::zeros());
    }

    #[test]
    fn test_profiler_incremental_matches_batch() {
        let digits = [3, 1, 4, 1, 5, 9, 2, 6];
        let mut profiler = DigitProfiler::new();
        for &d in &digits {
            profiler.observe(d);
        }
        assert_eq!(profiler.distribution(), empirical_distribution(&digits));
        assert_eq!(profiler.len(), 8);

        profiler.observe(0);
        assert_eq!(profiler.zero_count(), 1);
        assert_eq!(profiler.len(), 8);

        profiler.reset();
        assert!(profiler.is_empty());
    }

    #[test]
    fn test_chi_squared_benford_sample_conforms() {
        // 1000 observations rounded from the Benford curve
        let expected = expected_distribution();
        let mut profiler = DigitProfiler::new();
        for (d, p) in expected.iter() {
            let n = (p * 1000.0).round() as usize;
            profiler.extend(std::iter::repeat(d).take(n));
        }
        assert!(profiler.chi_squared(&expected) < 1.0);
        assert!(profiler.conforms(&expected));
        assert!(profiler.mean_absolute_deviation(&expected) < 0.001);
    }

    #[test]
    fn test_chi_squared_uniform_violates() {
        let expected = expected_distribution();
        let profiler = DigitProfiler::from_digits((0..900).map(|i| (i % 9) as u8 + 1));
        assert!(profiler.chi_squared(&expected) > BENFORD_CHI_SQ_CRITICAL);
        assert!(!profiler.conforms(&expected));
    }

    #[test]
    fn test_chi_squared_empty() {
        assert_eq!(DigitProfiler::new().chi_squared(&expected_distribution()), 0.0);
    }
}
