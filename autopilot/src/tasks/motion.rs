use hal::{FlightCommand, InertialSample, InertialSensor, ParameterStore};
use localization::{MotionConfig, MotionEvent, MotionModel, MotionModelState};
use log::{trace, warn};

use crate::params::{PARAM_LAST_COMMAND, PARAM_MOTION_ACTIVE};
use crate::{AutopilotResult, SharedContext};

/// Drives the motion model from the inertial sensor and the parameters
///
/// `vlc.motionActive` enables integration. A non-idle `vlc.lastCommand`
/// starts a command as soon as the model accepts one and is then reset to
/// idle. Due deltas are flushed to the population under its lock.
pub struct MotionTask<I> {
    sensor: I,
    model: MotionModel,
    period_ms: u32,
    last_ms: Option<u32>,
}

impl<I: InertialSensor> MotionTask<I> {
    pub fn new(sensor: I, config: MotionConfig, period_ms: u32) -> AutopilotResult<Self> {
        Ok(Self {
            sensor,
            model: MotionModel::new(config)?,
            period_ms,
            last_ms: None,
        })
    }

    /// One motion tick; `None` when no inertial sample was available
    pub fn run<P: ParameterStore + ?Sized>(
        &mut self,
        context: &SharedContext,
        params: &mut P,
        now_ms: u32,
    ) -> Option<MotionEvent> {
        self.model.set_motion_active(params.flag(PARAM_MOTION_ACTIVE));
        self.take_command(params, now_ms);

        let sample = InertialSample::read(&mut self.sensor)?;
        let elapsed_ms = self
            .last_ms
            .map_or(self.period_ms, |last| now_ms.wrapping_sub(last));
        self.last_ms = Some(now_ms);

        let event = match self.model.step(&sample, elapsed_ms as f32 / 1000.0, now_ms) {
            Ok(event) => event,
            Err(error) => {
                warn!("Motion step skipped: {}", error);
                return None;
            }
        };

        if self.model.should_flush() {
            context.with_population(|population| self.model.flush_to_population(population));
        }
        Some(event)
    }

    fn take_command<P: ParameterStore + ?Sized>(&mut self, params: &mut P, now_ms: u32) {
        let Some(value) = params.get(PARAM_LAST_COMMAND) else {
            return;
        };
        let Some(command) = u8::try_from(value)
            .ok()
            .and_then(|byte| FlightCommand::try_from(byte).ok())
        else {
            warn!("Ignoring unknown command {}", value);
            params.set(PARAM_LAST_COMMAND, FlightCommand::Idle as i32);
            return;
        };
        if command == FlightCommand::Idle {
            return;
        }

        match self.model.begin_command(command, now_ms) {
            Ok(true) => {
                params.set(PARAM_LAST_COMMAND, FlightCommand::Idle as i32);
            }
            Ok(false) if command.axis().is_none() => {
                params.set(PARAM_LAST_COMMAND, FlightCommand::Idle as i32);
            }
            // busy or cooling down, retried next tick
            Ok(false) => {}
            Err(error) => trace!("{:?} waits: {}", command, error),
        }
    }

    pub fn state(&self) -> &MotionModelState {
        self.model.state()
    }

    pub fn model(&self) -> &MotionModel {
        &self.model
    }
}
