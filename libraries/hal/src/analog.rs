/// Analog light intensity input

/// Photodiode channel sampled by the light link
pub trait AnalogInput {
    /// Read one raw sample (ADC counts)
    ///
    /// Returns `None` if the conversion was not ready this tick.
    fn read(&mut self) -> Option<f32>;
}
