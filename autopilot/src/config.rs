use fsk::{FskConfig, FSK_SAMPLES};
use localization::{ColorMap, FilterConfig, MotionConfig};

use crate::{AutopilotError, AutopilotResult};

/// Periods of the four VLC tasks, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPeriods {
    /// Analog sampling tick; also the FSK sample period
    pub sample_ms: u32,

    /// Light link consumer (classification, vote, framing)
    pub link_ms: u32,

    /// Motion model integration
    pub motion_ms: u32,

    /// Color intake and resampling
    pub filter_ms: u32,
}

impl Default for TaskPeriods {
    fn default() -> Self {
        Self {
            sample_ms: 1,
            link_ms: 4,
            motion_ms: 10,
            filter_ms: 100,
        }
    }
}

impl TaskPeriods {
    pub fn validate(&self) -> AutopilotResult<()> {
        if self.sample_ms == 0 || self.link_ms == 0 || self.motion_ms == 0 || self.filter_ms == 0 {
            return Err(AutopilotError::InvalidPeriods {
                reason: "periods must be non-zero",
            });
        }
        if self.sample_ms > self.link_ms || self.link_ms > self.filter_ms {
            return Err(AutopilotError::InvalidPeriods {
                reason: "sampling must be fastest and filtering slowest",
            });
        }
        // the consumer must drain a window before the other buffer fills too
        if self.link_ms >= FSK_SAMPLES as u32 * self.sample_ms {
            return Err(AutopilotError::InvalidPeriods {
                reason: "link task slower than one sample window",
            });
        }
        Ok(())
    }
}

/// Complete configuration of the VLC subsystem
#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleConfig {
    pub filter: FilterConfig,
    pub motion: MotionConfig,
    pub fsk: FskConfig,
    pub periods: TaskPeriods,
    pub color_map: ColorMap,
}

impl VehicleConfig {
    pub fn validate(&self) -> AutopilotResult<()> {
        self.filter.validate()?;
        self.motion.validate()?;
        self.fsk.validate(FSK_SAMPLES)?;
        self.periods.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(VehicleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_slow_link_task() {
        let periods = TaskPeriods {
            link_ms: 16,
            filter_ms: 100,
            ..TaskPeriods::default()
        };
        assert!(matches!(periods.validate(), Err(AutopilotError::InvalidPeriods { .. })));
    }

    #[test]
    fn test_library_errors_are_wrapped() {
        let mut config = VehicleConfig::default();
        config.fsk.tone_1 = 190;
        assert!(matches!(config.validate(), Err(AutopilotError::Fsk(_))));

        let mut config = VehicleConfig::default();
        config.filter.low_probability = 0;
        assert!(matches!(config.validate(), Err(AutopilotError::Localization(_))));
    }
}
