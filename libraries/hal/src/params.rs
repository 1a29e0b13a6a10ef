/// Parameter framework interface

/// Narrow view of the external parameter/telemetry framework
///
/// Parameters are addressed by a static dotted name such as
/// `"vlc.motionActive"`.
pub trait ParameterStore {
    /// Get the current value of a parameter
    fn get(&self, name: &'static str) -> Option<i32>;

    /// Set a parameter
    ///
    /// Returns true if the value was stored
    fn set(&mut self, name: &'static str, value: i32) -> bool;

    /// Read a parameter as a flag (non-zero is true, missing is false)
    fn flag(&self, name: &'static str) -> bool {
        self.get(name).is_some_and(|value| value != 0)
    }
}
