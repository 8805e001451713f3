//! Leading-digit distribution type.

use serde::{Deserialize, Serialize};

/// Frequency of each leading digit 1..=9.
///
/// Every digit of the domain always has an entry, even when its frequency is 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DigitDistribution {
    frequencies: [f64; 9],
}

impl DigitDistribution {
    /// Create a distribution from frequencies ordered by digit (1 first).
    pub fn new(frequencies: [f64; 9]) -> Self {
        Self { frequencies }
    }

    /// All-zero distribution.
    pub fn zeros() -> Self {
        Self::default()
    }

    /// Frequency of `digit`. Digits outside 1..=9 have frequency 0.
    pub fn get(&self, digit: u8) -> f64 {
        match digit {
            1..=9 => self.frequencies[(digit - 1) as usize],
            _ => 0.0,
        }
    }

    /// Iterate `(digit, frequency)` pairs in digit order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.frequencies
            .iter()
            .enumerate()
            .map(|(i, &f)| (i as u8 + 1, f))
    }

    /// Frequencies ordered by digit.
    pub fn frequencies(&self) -> &[f64; 9] {
        &self.frequencies
    }

    pub fn sum(&self) -> f64 {
        self.frequencies.iter().sum()
    }
}
