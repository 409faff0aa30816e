//! Z-score normalization against a reference distribution.
//!
//! A [`ZScore`] holds the mean and standard deviation of a reference
//! population and maps raw values onto that population's scale:
//!
//! ```text
//! z = (x - mean) / std_dev
//! x = z * std_dev + mean
//! ```
//!
//! The constructor rejects a standard deviation that is zero, negative or not
//! finite, so [`ZScore::standardize`] never produces an infinity or `NaN` from
//! a degenerate reference.

/// Error returned when a reference distribution cannot be used for
/// standardization.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("standard deviation must be finite and positive (got {std_dev})")]
pub struct InvalidStdDev {
    pub std_dev: f64,
}

/// Reference mean and standard deviation for z-score normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZScore {
    mean: f64,
    std_dev: f64,
}

impl ZScore {
    /// Creates a z-score transform.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStdDev`] if `std_dev` is not a finite positive number.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, InvalidStdDev> {
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return Err(InvalidStdDev { std_dev });
        }
        Ok(Self { mean, std_dev })
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Maps a raw value to its z-score.
    #[must_use]
    pub fn standardize(&self, value: f64) -> f64 {
        (value - self.mean) / self.std_dev
    }

    /// Maps a z-score back to the raw scale.
    #[must_use]
    pub fn restore(&self, z: f64) -> f64 {
        z * self.std_dev + self.mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_std_dev() {
        assert!(ZScore::new(1.0, 0.0).is_err());
        assert!(ZScore::new(1.0, -0.5).is_err());
        assert!(ZScore::new(1.0, f64::NAN).is_err());
        assert!(ZScore::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_round_trip() {
        let z = ZScore::new(2.82, 0.59).unwrap();
        for x in [-3.5, 0.0, 1.234_567, 2.82, 10.0, 1e6] {
            let restored = z.restore(z.standardize(x));
            assert!((restored - x).abs() <= 1e-9 * x.abs().max(1.0), "{x} -> {restored}");
        }
    }

    #[test]
    fn test_standardize_values() {
        let z = ZScore::new(10.0, 2.0).unwrap();
        assert_eq!(z.standardize(10.0), 0.0);
        assert_eq!(z.standardize(6.0), -2.0);
    }
}
