//! Extrapolation of expectation values to the zero-noise limit.

use crate::error::{ZneError, ZneResult};

/// Fits measured (scale factor, expectation) pairs and evaluates the fit
/// at scale factor zero.
pub trait Extrapolator: Send + Sync {
    /// Get a human-readable name for this method.
    fn name(&self) -> &'static str;

    /// Extrapolate to zero noise.
    ///
    /// `scale_factors` and `values` must have equal length.
    fn extrapolate(&self, scale_factors: &[f64], values: &[f64]) -> ZneResult<f64>;
}

fn check_points(scale_factors: &[f64], values: &[f64], needed: usize) -> ZneResult<()> {
    if scale_factors.len() != values.len() {
        return Err(ZneError::LengthMismatch {
            factors: scale_factors.len(),
            values: values.len(),
        });
    }
    let got = scale_factors.len();
    if got < needed {
        return Err(ZneError::InsufficientData { needed, got });
    }
    for (i, a) in scale_factors.iter().enumerate() {
        for b in &scale_factors[i + 1..] {
            if (a - b).abs() < 1e-12 {
                return Err(ZneError::DegenerateScaleFactors);
            }
        }
    }
    Ok(())
}

/// Richardson extrapolation: the unique interpolating polynomial through
/// all data points, evaluated at zero.
///
/// Exact when the true decay is polynomial of degree below the point
/// count, but increasingly sensitive to shot noise as points are added.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichardsonExtrapolator;

impl Extrapolator for RichardsonExtrapolator {
    fn name(&self) -> &'static str {
        "richardson"
    }

    fn extrapolate(&self, scale_factors: &[f64], values: &[f64]) -> ZneResult<f64> {
        check_points(scale_factors, values, 2)?;

        // Lagrange basis evaluated at x = 0.
        let mut result = 0.0;
        for (i, (&xi, &yi)) in scale_factors.iter().zip(values).enumerate() {
            let mut weight = 1.0;
            for (j, &xj) in scale_factors.iter().enumerate() {
                if i != j {
                    weight *= xj / (xj - xi);
                }
            }
            result += yi * weight;
        }
        Ok(result)
    }
}

/// Least-squares polynomial fit of fixed degree, evaluated at zero.
///
/// Unlike Richardson this does not interpolate: with more points than
/// coefficients it averages out shot noise.
#[derive(Debug, Clone, Copy)]
pub struct PolynomialExtrapolator {
    /// Degree of the fitted polynomial.
    pub degree: usize,
}

impl PolynomialExtrapolator {
    /// Create a fit of the given degree.
    pub fn new(degree: usize) -> Self {
        Self { degree }
    }
}

impl Extrapolator for PolynomialExtrapolator {
    fn name(&self) -> &'static str {
        "polynomial"
    }

    fn extrapolate(&self, scale_factors: &[f64], values: &[f64]) -> ZneResult<f64> {
        check_points(scale_factors, values, self.degree + 1)?;

        // Normal equations (Aᵀ A) c = Aᵀ y for the Vandermonde matrix A.
        let m = self.degree + 1;
        let mut ata = vec![vec![0.0f64; m]; m];
        let mut aty = vec![0.0f64; m];

        for (&x, &y) in scale_factors.iter().zip(values) {
            let mut powers = vec![1.0; 2 * m - 1];
            for p in 1..2 * m - 1 {
                powers[p] = powers[p - 1] * x;
            }
            for (r, row) in ata.iter_mut().enumerate() {
                for (c, entry) in row.iter_mut().enumerate() {
                    *entry += powers[r + c];
                }
                aty[r] += powers[r] * y;
            }
        }

        let coefficients = solve(ata, aty)?;
        // The intercept is the value at scale factor zero.
        Ok(coefficients[0])
    }
}

/// Straight-line fit, the textbook default for ZNE.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearExtrapolator;

impl Extrapolator for LinearExtrapolator {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn extrapolate(&self, scale_factors: &[f64], values: &[f64]) -> ZneResult<f64> {
        PolynomialExtrapolator::new(1).extrapolate(scale_factors, values)
    }
}

/// Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> ZneResult<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .ok_or(ZneError::SingularFit)?;
        if a[pivot][col].abs() < 1e-12 {
            return Err(ZneError::SingularFit);
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in row + 1..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_richardson_exact_on_line() {
        // y = 1 − 0.1x
        let xs = [1.0, 2.0, 3.0];
        let ys = [0.9, 0.8, 0.7];
        let value = RichardsonExtrapolator.extrapolate(&xs, &ys).unwrap();
        assert!((value - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_richardson_exact_on_quadratic() {
        // y = 2 − x + 0.25x²
        let f = |x: f64| 2.0 - x + 0.25 * x * x;
        let xs = [1.0, 1.5, 3.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let value = RichardsonExtrapolator.extrapolate(&xs, &ys).unwrap();
        assert!((value - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_linear_fit_averages_noise() {
        // Points scattered around y = 0.95 − 0.05x.
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [0.91, 0.84, 0.81, 0.74];
        let value = LinearExtrapolator.extrapolate(&xs, &ys).unwrap();
        assert!((value - 0.955).abs() < 0.01);
    }

    #[test]
    fn test_polynomial_matches_richardson_when_saturated() {
        // With points == degree + 1 the least-squares fit interpolates.
        let xs = [1.0, 2.0, 3.0];
        let ys = [0.9, 0.7, 0.4];
        let interp = RichardsonExtrapolator.extrapolate(&xs, &ys).unwrap();
        let fit = PolynomialExtrapolator::new(2).extrapolate(&xs, &ys).unwrap();
        assert!((interp - fit).abs() < 1e-8);
    }

    #[test]
    fn test_insufficient_data() {
        let result = PolynomialExtrapolator::new(2).extrapolate(&[1.0, 2.0], &[0.9, 0.8]);
        assert!(matches!(
            result,
            Err(ZneError::InsufficientData { needed: 3, got: 2 })
        ));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let result = RichardsonExtrapolator.extrapolate(&[1.0, 2.0, 3.0], &[0.9, 0.8]);
        assert!(matches!(
            result,
            Err(ZneError::LengthMismatch {
                factors: 3,
                values: 2
            })
        ));
    }

    #[test]
    fn test_degenerate_scale_factors() {
        let result = RichardsonExtrapolator.extrapolate(&[1.0, 1.0], &[0.9, 0.8]);
        assert!(matches!(result, Err(ZneError::DegenerateScaleFactors)));
    }
}
