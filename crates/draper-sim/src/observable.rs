//! Observables evaluated from measurement counts.

use serde::{Deserialize, Serialize};

use crate::result::Counts;

/// An observable estimated from bitstring counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Observable {
    /// Probability of observing exactly this bitstring.
    ///
    /// For an adder run this is the success probability: the projector
    /// onto the correct-sum outcome. Expectation lies in [0, 1] and
    /// decays toward 1/2^n as noise scrambles the state.
    Projector(String),

    /// Parity of all measured bits: +1 for even weight, −1 for odd.
    ZParity,
}

impl Observable {
    /// Projector onto the binary representation of `value` over `bits` bits,
    /// MSB first.
    pub fn projector_for_value(value: u64, bits: u32) -> Self {
        Observable::Projector(format!("{:0width$b}", value, width = bits as usize))
    }

    /// Estimate the expectation value from counts.
    ///
    /// Returns 0.0 for empty counts.
    pub fn expectation(&self, counts: &Counts) -> f64 {
        let total = counts.total_shots();
        if total == 0 {
            return 0.0;
        }
        match self {
            Observable::Projector(bitstring) => counts.probability(bitstring),
            Observable::ZParity => {
                let signed: f64 = counts
                    .iter()
                    .map(|(bitstring, &count)| {
                        let weight = bitstring.chars().filter(|&c| c == '1').count();
                        let sign = if weight % 2 == 0 { 1.0 } else { -1.0 };
                        sign * f64::from(count)
                    })
                    .sum();
                signed / total as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projector_for_value() {
        assert_eq!(
            Observable::projector_for_value(5, 4),
            Observable::Projector("0101".to_string())
        );
    }

    #[test]
    fn test_projector_expectation() {
        let mut counts = Counts::new();
        counts.insert("101", 75);
        counts.insert("000", 25);

        let obs = Observable::Projector("101".to_string());
        assert!((obs.expectation(&counts) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_parity_expectation() {
        let mut counts = Counts::new();
        counts.insert("11", 60); // even weight, +1
        counts.insert("01", 40); // odd weight, −1

        let obs = Observable::ZParity;
        assert!((obs.expectation(&counts) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_counts() {
        let counts = Counts::new();
        assert_eq!(Observable::ZParity.expectation(&counts), 0.0);
    }
}
