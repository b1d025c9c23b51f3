use thiserror::Error;

/// Largest supported number of decimals.
///
/// Beyond this, `10^decimals` no longer leaves room for a fractional part in
/// an `f64` mantissa for typical magnitudes.
pub const MAX_DECIMALS: u32 = 12;

/// Rounds values to a fixed number of decimal places.
///
/// Rounding is idempotent: `value(value(v)) == value(v)` for any finite `v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    decimals: u32,
    scale: f64,
}

/// Error returned when the requested precision is not supported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("decimals must be at most {MAX_DECIMALS}, got {0}")]
pub struct DecimalsError(pub u32);

impl Quantizer {
    /// Creates a quantizer that keeps `decimals` places.
    ///
    /// # Errors
    ///
    /// Returns an error if `decimals` exceeds [`MAX_DECIMALS`].
    pub fn new(decimals: u32) -> Result<Self, DecimalsError> {
        if decimals > MAX_DECIMALS {
            return Err(DecimalsError(decimals));
        }
        Ok(Self::with_scale(decimals))
    }

    pub(super) fn with_scale(decimals: u32) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        let scale = 10_f64.powi(decimals as i32);
        Self { decimals, scale }
    }

    /// Returns the number of decimals kept.
    #[must_use]
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Returns the smallest nonzero distance between two quantized values.
    #[must_use]
    pub fn quantum(&self) -> f64 {
        self.scale.recip()
    }

    /// Rounds a single value, with ties away from zero.
    #[must_use]
    pub fn value(&self, v: f64) -> f64 {
        (v * self.scale).round() / self.scale
    }

    /// Rounds every component of `x`.
    #[must_use]
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&v| self.value(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_requested_places() {
        let q = Quantizer::new(4).expect("valid decimals");

        assert_eq!(q.value(1.234_56), 1.2346);
        assert_eq!(q.value(-0.000_04), 0.0);
        assert_eq!(q.value(2.0), 2.0);
        assert_eq!(q.apply(&[0.123_44, 7.0]), vec![0.1234, 7.0]);
    }

    #[test]
    fn rounding_is_idempotent() {
        let q = Quantizer::new(4).expect("valid decimals");

        for v in [
            0.0,
            1e-9,
            0.123_456_789,
            -3.141_592_653,
            1.0 / 3.0,
            2.675,
            12.345_65,
            -9_876.543_21,
            1.0e6 + 0.000_05,
        ] {
            let once = q.value(v);
            assert_eq!(q.value(once), once, "not idempotent for {v}");
        }
    }

    #[test]
    fn quantum_matches_decimals() {
        let q = Quantizer::new(3).expect("valid decimals");
        assert_eq!(q.decimals(), 3);
        assert!((q.quantum() - 1e-3).abs() < 1e-18);
    }

    #[test]
    fn rejects_too_many_decimals() {
        assert_eq!(Quantizer::new(13), Err(DecimalsError(13)));
    }
}
