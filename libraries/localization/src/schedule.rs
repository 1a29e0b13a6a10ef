use crate::color_map::AMBIENT_COLOR;

/// Decides when a color observation triggers a resample
///
/// A resample is due when the observed color differs from the last one
/// resampled on, or when `interval_ms` has passed since the last resample.
/// The ambient sentinel never triggers one.
#[derive(Debug, Clone, Copy)]
pub struct ResampleSchedule {
    interval_ms: u32,
    last_color: u8,
    last_ms: Option<u32>,
}

impl ResampleSchedule {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_color: AMBIENT_COLOR,
            last_ms: None,
        }
    }

    pub fn should_resample(&self, observed_color: u8, now_ms: u32) -> bool {
        if observed_color >= AMBIENT_COLOR {
            return false;
        }
        match self.last_ms {
            None => true,
            Some(last) => {
                observed_color != self.last_color || now_ms.wrapping_sub(last) >= self.interval_ms
            }
        }
    }

    /// Record a resample on `observed_color`
    pub fn mark(&mut self, observed_color: u8, now_ms: u32) {
        self.last_color = observed_color;
        self.last_ms = Some(now_ms);
    }

    pub fn last_color(&self) -> u8 {
        self.last_color
    }
}
