use libm::fabsf;

use crate::config::FskConfig;

/// Spike suppression and optional smoothing of raw analog samples
///
/// A slow moving average tracks the signal level. Samples further than
/// `spike_margin` from it are replaced by the average, which removes short
/// bursts from interfering infrared beacons without touching the tones.
#[derive(Debug, Clone, Copy)]
pub struct SampleConditioner {
    spike_alpha: f32,
    spike_margin: f32,
    low_pass_alpha: Option<f32>,
    average: Option<f32>,
    low_pass: Option<f32>,
}

impl SampleConditioner {
    pub fn new(config: &FskConfig) -> Self {
        Self {
            spike_alpha: config.spike_alpha,
            spike_margin: config.spike_margin,
            low_pass_alpha: config.low_pass_alpha,
            average: None,
            low_pass: None,
        }
    }

    /// Condition one raw sample, returning the value to store
    pub fn condition(&mut self, raw: f32) -> f32 {
        let average = ewma(raw, self.average, self.spike_alpha);
        self.average = Some(average);

        let corrected = if fabsf(raw - average) > self.spike_margin {
            average
        } else {
            raw
        };

        match self.low_pass_alpha {
            Some(alpha) => {
                let smoothed = ewma(corrected, self.low_pass, alpha);
                self.low_pass = Some(smoothed);
                smoothed
            }
            None => corrected,
        }
    }

    /// Current slow average, if any sample was seen
    pub fn average(&self) -> Option<f32> {
        self.average
    }
}

// the first sample seeds the average
fn ewma(value: f32, previous: Option<f32>, alpha: f32) -> f32 {
    match previous {
        Some(previous) => previous + alpha * (value - previous),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_swings_pass_through() {
        let mut conditioner = SampleConditioner::new(&FskConfig::default());
        assert_eq!(conditioner.condition(2000.0), 2000.0);
        assert_eq!(conditioner.condition(2300.0), 2300.0);
        assert_eq!(conditioner.condition(1700.0), 1700.0);
    }

    #[test]
    fn test_spike_is_replaced_by_average() {
        let mut conditioner = SampleConditioner::new(&FskConfig::default());
        for _ in 0..50 {
            conditioner.condition(2000.0);
        }
        let stored = conditioner.condition(4000.0);
        let average = conditioner.average().expect("samples seen");
        assert_eq!(stored, average);
        assert!((stored - 2030.0).abs() < 1.0);

        let stored = conditioner.condition(0.0);
        assert!(stored > 1500.0);
    }

    #[test]
    fn test_low_pass_smooths_steps() {
        let config = FskConfig {
            low_pass_alpha: Some(0.5),
            ..FskConfig::default()
        };
        let mut conditioner = SampleConditioner::new(&config);
        assert_eq!(conditioner.condition(100.0), 100.0);
        assert_eq!(conditioner.condition(200.0), 150.0);
    }
}
