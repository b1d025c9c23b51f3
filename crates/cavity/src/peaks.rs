//! Lookahead-confirmed local maxima.

use thiserror::Error;

/// Errors from configuring a [`PeakDetector`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DetectorError {
    #[error("lookahead must be at least 1")]
    Lookahead,

    #[error("delta must be finite and non-negative")]
    Delta,
}

/// A confirmed local maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub index: usize,
    pub value: f64,
}

/// Finds local maxima that survive a lookahead window.
///
/// The detector alternates between two states. While seeking a peak it tracks
/// the running maximum; the maximum is confirmed once a later sample has dropped
/// below it by more than `delta` and none of the `lookahead` samples starting
/// there exceed it. It then tracks the following valley the same way before
/// seeking the next peak. Samples near the end that lack a full lookahead
/// window are never confirmed, so a truncated hump at the tail is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDetector {
    lookahead: usize,
    delta: f64,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            lookahead: 20,
            delta: 0.0,
        }
    }
}

enum Seeking {
    Peak { index: usize, value: f64 },
    Valley { value: f64 },
}

impl PeakDetector {
    /// Creates a detector.
    ///
    /// # Errors
    ///
    /// Returns an error if `lookahead` is zero or `delta` is negative or not
    /// finite.
    pub fn new(lookahead: usize, delta: f64) -> Result<Self, DetectorError> {
        if lookahead == 0 {
            return Err(DetectorError::Lookahead);
        }
        if !delta.is_finite() || delta < 0.0 {
            return Err(DetectorError::Delta);
        }
        Ok(Self { lookahead, delta })
    }

    #[must_use]
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the confirmed maxima of `values` in order.
    #[must_use]
    pub fn detect(&self, values: &[f64]) -> Vec<Peak> {
        let mut peaks = Vec::new();
        let mut state = Seeking::Peak {
            index: 0,
            value: f64::NEG_INFINITY,
        };

        let confirmable = values.len().saturating_sub(self.lookahead);
        for i in 0..confirmable {
            let y = values[i];
            let window = &values[i..i + self.lookahead];

            state = match state {
                Seeking::Peak { index, value } => {
                    let (index, value) = if y > value { (i, y) } else { (index, value) };
                    if y < value - self.delta && window.iter().all(|&w| w < value) {
                        peaks.push(Peak { index, value });
                        Seeking::Valley { value: y }
                    } else {
                        Seeking::Peak { index, value }
                    }
                }
                Seeking::Valley { value } => {
                    let value = value.min(y);
                    if y > value + self.delta && window.iter().all(|&w| w > value) {
                        Seeking::Peak { index: i, value: y }
                    } else {
                        Seeking::Valley { value }
                    }
                }
            };
        }

        peaks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `|sin|` humps of the given amplitudes, 200 samples each, then a flat tail.
    fn humps(amplitudes: &[f64], tail: usize) -> Vec<f64> {
        let mut values: Vec<f64> = amplitudes
            .iter()
            .flat_map(|&a| {
                (0..200).map(move |j| a * (std::f64::consts::PI * f64::from(j) / 200.0).sin())
            })
            .collect();
        values.extend(std::iter::repeat_n(0.0, tail));
        values
    }

    #[test]
    fn finds_one_peak_per_hump() {
        let detector = PeakDetector::default();
        let peaks = detector.detect(&humps(&[1.0, 0.8, 1.2], 40));

        let indices: Vec<usize> = peaks.iter().map(|p| p.index).collect();
        let values: Vec<f64> = peaks.iter().map(|p| p.value).collect();
        assert_eq!(indices, vec![100, 300, 500]);
        assert_eq!(values, vec![1.0, 0.8, 1.2]);
    }

    #[test]
    fn peak_without_lookahead_window_is_ignored() {
        let detector = PeakDetector::new(20, 0.0).expect("valid detector");
        let mut values = humps(&[1.0], 0);
        // A second hump cut off 5 samples after its top.
        values.extend((0..105).map(|j| (std::f64::consts::PI * f64::from(j) / 200.0).sin()));

        assert_eq!(detector.detect(&values).len(), 1);
    }

    #[test]
    fn decreasing_start_counts_as_a_peak() {
        let detector = PeakDetector::new(5, 0.0).expect("valid detector");
        let values: Vec<f64> = (0..50).map(|i| 1.0 - f64::from(i) / 100.0).collect();

        let peaks = detector.detect(&values);

        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].index, 0);
        assert_eq!(peaks[0].value, 1.0);
    }

    #[test]
    fn delta_suppresses_small_ripples() {
        let mut values = humps(&[1.0], 0);
        // A ripple of height 0.05 in the valley, then a real hump.
        values.extend((0..40).map(|j| 0.05 * (std::f64::consts::PI * f64::from(j) / 40.0).sin()));
        values.extend(humps(&[1.0], 40));

        let strict = PeakDetector::new(10, 0.0).expect("valid detector");
        let tolerant = PeakDetector::new(10, 0.1).expect("valid detector");

        assert_eq!(strict.detect(&values).len(), 3);
        assert_eq!(tolerant.detect(&values).len(), 2);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(PeakDetector::new(0, 0.0), Err(DetectorError::Lookahead));
        assert_eq!(PeakDetector::new(5, -1.0), Err(DetectorError::Delta));
    }
}
