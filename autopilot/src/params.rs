use hal::ParameterStore;
use heapless::FnvIndexMap;

/// Motion model enable flag
pub const PARAM_MOTION_ACTIVE: &str = "vlc.motionActive";

/// Last flight command handed to the motion model; reset to idle once taken
pub const PARAM_LAST_COMMAND: &str = "vlc.lastCommand";

const CAPACITY: usize = 8;

/// Parameter store kept in RAM
#[derive(Debug, Default)]
pub struct MemoryParameters {
    values: FnvIndexMap<&'static str, i32, CAPACITY>,
}

impl MemoryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the VLC parameters at their start values
    ///
    /// The motion model starts disabled until a motion-model enable command.
    pub fn with_defaults() -> Self {
        let mut params = Self::new();
        params.set(PARAM_MOTION_ACTIVE, 0);
        params.set(PARAM_LAST_COMMAND, 0);
        params
    }
}

impl ParameterStore for MemoryParameters {
    fn get(&self, name: &'static str) -> Option<i32> {
        self.values.get(name).copied()
    }

    fn set(&mut self, name: &'static str, value: i32) -> bool {
        self.values.insert(name, value).is_ok()
    }
}
