//! Inertial motion model integrator
//!
//! One accumulator dead-reckons the displacement of the vehicle while a
//! flight command is underway. The accumulated delta is handed to the particle
//! population in one piece and zeroed.

use hal::{Axis, FlightCommand, InertialSample};
use libm::fabsf;
use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::population::ParticlePopulation;
use crate::{LocalizationError, LocalizationResult};

/// Configuration for the motion model
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    /// Stationary samples needed before integration is allowed
    pub calibration_samples: u32,

    /// EWMA weight of a new sample in the bias estimate
    pub bias_alpha: f32,

    /// EWMA weight of a new sample in the filtered acceleration
    pub acceleration_alpha: f32,

    /// Integration steps after which the delta is flushed to the population
    pub flush_steps: u32,

    /// Standard deviation of the per-particle spread added on flush (map units)
    pub noise_std_dev: f32,

    /// Map units per metre of integrated displacement
    pub map_units_per_metre: f32,

    /// Tilt (degrees) marking a lateral command as underway
    pub lateral_tilt_threshold: f32,

    /// Lateral commands without a settled tilt are abandoned after this
    pub lateral_timeout_ms: u32,

    /// Vertical commands last exactly this long
    pub vertical_duration_ms: u32,

    /// Quiet period after a command before the next may start
    pub cooldown_ms: u32,

    /// Keep tracking the bias while idle and stationary
    pub recalibrate_when_idle: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            calibration_samples: 100,
            bias_alpha: 0.1,
            acceleration_alpha: 0.5,
            flush_steps: 10,
            noise_std_dev: 2.0,
            map_units_per_metre: 100.0,
            lateral_tilt_threshold: 2.0,
            lateral_timeout_ms: 3000,
            vertical_duration_ms: 1000,
            cooldown_ms: 500,
            recalibrate_when_idle: true,
        }
    }
}

impl MotionConfig {
    /// Check that the parameters describe a usable integrator
    pub fn validate(&self) -> LocalizationResult<()> {
        if self.calibration_samples == 0 {
            return Err(LocalizationError::InvalidConfig {
                parameter: "calibration_samples",
                reason: "must be non-zero",
            });
        }
        if !(self.bias_alpha > 0.0 && self.bias_alpha <= 1.0) {
            return Err(LocalizationError::InvalidConfig {
                parameter: "bias_alpha",
                reason: "must lie in (0, 1]",
            });
        }
        if !(self.acceleration_alpha > 0.0 && self.acceleration_alpha <= 1.0) {
            return Err(LocalizationError::InvalidConfig {
                parameter: "acceleration_alpha",
                reason: "must lie in (0, 1]",
            });
        }
        if self.flush_steps == 0 {
            return Err(LocalizationError::InvalidConfig {
                parameter: "flush_steps",
                reason: "must be non-zero",
            });
        }
        if !(self.noise_std_dev >= 0.0) {
            return Err(LocalizationError::InvalidConfig {
                parameter: "noise_std_dev",
                reason: "must not be negative",
            });
        }
        if !(self.map_units_per_metre > 0.0) {
            return Err(LocalizationError::InvalidConfig {
                parameter: "map_units_per_metre",
                reason: "must be positive",
            });
        }
        if !(self.lateral_tilt_threshold > 0.0) {
            return Err(LocalizationError::InvalidConfig {
                parameter: "lateral_tilt_threshold",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

/// Command execution stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandStage {
    /// No motion underway; velocity held at zero
    Idle,

    /// A command is moving the vehicle along `axis`
    Executing {
        command: FlightCommand,
        axis: Axis,
        started_ms: u32,
        /// Lateral only: the tilt has crossed the threshold at least once
        tilted: bool,
    },

    /// A command just ended; new commands wait
    Cooldown { since_ms: u32 },
}

/// What one motion tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    /// Bias calibration still running
    Calibrating,

    /// The last calibration sample was just taken
    CalibrationComplete,

    /// Motion model disabled
    Inactive,

    /// Nothing to integrate
    Idle,

    /// Waiting out the cooldown
    Cooling,

    /// Cooldown over, commands accepted again
    CooldownElapsed,

    /// One integration step along `axis`
    Integrated { axis: Axis },

    /// The running command ended
    CommandFinished { command: FlightCommand, timed_out: bool },
}

/// State of the single motion accumulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionModelState {
    /// Last raw acceleration (m/s²)
    pub raw_acceleration: Vector3<f32>,

    /// Bias-corrected, axis-gated, filtered acceleration (m/s²)
    pub filtered_acceleration: Vector3<f32>,

    /// Filtered acceleration of the previous step
    pub previous_acceleration: Vector3<f32>,

    /// Integrated velocity (m/s)
    pub velocity: Vector3<f32>,

    /// Velocity of the previous step
    pub previous_velocity: Vector3<f32>,

    /// Integrated position since start (m)
    pub position: Vector3<f32>,

    /// Displacement since the last flush (m)
    pub delta: Vector3<f32>,

    /// Integration steps since the last flush
    pub steps: u32,

    /// Per-axis acceleration bias (m/s²)
    pub bias: Vector3<f32>,

    /// Stationary samples taken by the calibration
    pub calibration_count: u32,

    /// Calibration finished; never cleared
    pub calibrated: bool,

    /// External motion enable flag
    pub motion_active: bool,

    pub stage: CommandStage,

    /// Axis integrated by the running command
    pub active_axis: Option<Axis>,
}

impl Default for MotionModelState {
    fn default() -> Self {
        Self {
            raw_acceleration: Vector3::zeros(),
            filtered_acceleration: Vector3::zeros(),
            previous_acceleration: Vector3::zeros(),
            velocity: Vector3::zeros(),
            previous_velocity: Vector3::zeros(),
            position: Vector3::zeros(),
            delta: Vector3::zeros(),
            steps: 0,
            bias: Vector3::zeros(),
            calibration_count: 0,
            calibrated: false,
            motion_active: false,
            stage: CommandStage::Idle,
            active_axis: None,
        }
    }
}

/// Motion model integrator
pub struct MotionModel {
    config: MotionConfig,
    state: MotionModelState,
}

impl MotionModel {
    /// Create an uncalibrated integrator
    pub fn new(config: MotionConfig) -> LocalizationResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: MotionModelState::default(),
        })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn state(&self) -> &MotionModelState {
        &self.state
    }

    pub fn is_calibrated(&self) -> bool {
        self.state.calibrated
    }

    /// Feed one sample to the bias calibration
    ///
    /// Samples taken while the vehicle is moving are ignored. Returns whether
    /// the calibration is complete.
    pub fn calibrate_tick(&mut self, sample: &InertialSample) -> bool {
        if self.state.calibrated {
            return true;
        }
        if !sample.stationary {
            return false;
        }

        self.update_bias(sample.acceleration);
        self.state.calibration_count += 1;

        if self.state.calibration_count >= self.config.calibration_samples {
            self.state.calibrated = true;
            info!(
                "Motion model calibrated, bias ({:.3}, {:.3}, {:.3})",
                self.state.bias.x, self.state.bias.y, self.state.bias.z
            );
        }
        self.state.calibrated
    }

    fn update_bias(&mut self, acceleration: Vector3<f32>) {
        if self.state.calibration_count == 0 {
            self.state.bias = acceleration;
        } else {
            let alpha = self.config.bias_alpha;
            self.state.bias = self.state.bias * (1.0 - alpha) + acceleration * alpha;
        }
    }

    /// Enable or disable integration
    ///
    /// Disabling drops any running command and zeroes all velocity state
    /// immediately.
    pub fn set_motion_active(&mut self, active: bool) {
        if self.state.motion_active == active {
            return;
        }
        self.state.motion_active = active;
        if !active {
            self.stop();
            self.state.stage = CommandStage::Idle;
            debug!("Motion model disabled");
        }
    }

    /// Start integrating for `command`
    ///
    /// Returns `Ok(false)` when the command moves no axis or another command
    /// (or its cooldown) is still running.
    pub fn begin_command(
        &mut self,
        command: FlightCommand,
        now_ms: u32,
    ) -> LocalizationResult<bool> {
        if !self.state.calibrated {
            return Err(LocalizationError::NotCalibrated);
        }
        let Some(axis) = command.axis() else {
            return Ok(false);
        };
        if !self.state.motion_active || self.state.stage != CommandStage::Idle {
            return Ok(false);
        }

        self.stop();
        self.state.active_axis = Some(axis);
        self.state.stage = CommandStage::Executing {
            command,
            axis,
            started_ms: now_ms,
            tilted: false,
        };
        debug!("Integrating {:?} along {:?}", command, axis);
        Ok(true)
    }

    /// Advance the integrator by one tick of `dt` seconds
    pub fn step(
        &mut self,
        sample: &InertialSample,
        dt: f32,
        now_ms: u32,
    ) -> LocalizationResult<MotionEvent> {
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(LocalizationError::NonPositiveTimeStep { dt });
        }
        self.state.raw_acceleration = sample.acceleration;

        if !self.state.calibrated {
            return Ok(if self.calibrate_tick(sample) {
                MotionEvent::CalibrationComplete
            } else {
                MotionEvent::Calibrating
            });
        }
        if !self.state.motion_active {
            self.stop();
            return Ok(MotionEvent::Inactive);
        }

        match self.state.stage {
            CommandStage::Idle => {
                self.stop();
                if self.config.recalibrate_when_idle && sample.stationary {
                    self.update_bias(sample.acceleration);
                }
                Ok(MotionEvent::Idle)
            }
            CommandStage::Cooldown { since_ms } => {
                self.stop();
                if now_ms.wrapping_sub(since_ms) >= self.config.cooldown_ms {
                    self.state.stage = CommandStage::Idle;
                    Ok(MotionEvent::CooldownElapsed)
                } else {
                    Ok(MotionEvent::Cooling)
                }
            }
            CommandStage::Executing {
                command,
                axis,
                started_ms,
                mut tilted,
            } => {
                self.integrate(axis, dt);

                let elapsed = now_ms.wrapping_sub(started_ms);
                let finished = match sample.attitude.tilt_for(axis) {
                    Some(tilt) => {
                        let settled = if fabsf(tilt) >= self.config.lateral_tilt_threshold {
                            tilted = true;
                            false
                        } else {
                            tilted
                        };
                        if settled {
                            Some(false)
                        } else if elapsed >= self.config.lateral_timeout_ms {
                            Some(true)
                        } else {
                            None
                        }
                    }
                    None if elapsed >= self.config.vertical_duration_ms => Some(false),
                    None => None,
                };

                match finished {
                    Some(timed_out) => {
                        if timed_out {
                            warn!("{:?} timed out after {} ms", command, elapsed);
                        }
                        self.stop();
                        self.state.stage = CommandStage::Cooldown { since_ms: now_ms };
                        Ok(MotionEvent::CommandFinished { command, timed_out })
                    }
                    None => {
                        self.state.stage = CommandStage::Executing {
                            command,
                            axis,
                            started_ms,
                            tilted,
                        };
                        Ok(MotionEvent::Integrated { axis })
                    }
                }
            }
        }
    }

    fn integrate(&mut self, axis: Axis, dt: f32) {
        let index = axis.index();

        // only the commanded axis is integrated
        let mut corrected = Vector3::zeros();
        corrected[index] = self.state.raw_acceleration[index] - self.state.bias[index];

        let alpha = self.config.acceleration_alpha;
        let filtered = self.state.previous_acceleration * (1.0 - alpha) + corrected * alpha;

        // trapezoidal integration
        let velocity = self.state.previous_velocity
            + (filtered + self.state.previous_acceleration) * (0.5 * dt);
        let displacement = (velocity + self.state.previous_velocity) * (0.5 * dt);

        self.state.filtered_acceleration = filtered;
        self.state.previous_acceleration = filtered;
        self.state.velocity = velocity;
        self.state.previous_velocity = velocity;
        self.state.position += displacement;
        self.state.delta += displacement;
        self.state.steps += 1;
    }

    fn stop(&mut self) {
        self.state.velocity = Vector3::zeros();
        self.state.previous_velocity = Vector3::zeros();
        self.state.filtered_acceleration = Vector3::zeros();
        self.state.previous_acceleration = Vector3::zeros();
        self.state.active_axis = None;
    }

    /// Whether the accumulated delta is due for a flush
    pub fn should_flush(&self) -> bool {
        let executing = matches!(self.state.stage, CommandStage::Executing { .. });
        self.state.steps >= self.config.flush_steps || (self.state.steps > 0 && !executing)
    }

    /// Take the accumulated delta in map units, zeroing the accumulator
    ///
    /// Depth grows downwards while the body axis points up, so `z` is negated.
    pub fn take_delta(&mut self) -> Option<Vector3<f32>> {
        if !self.should_flush() {
            return None;
        }
        let delta = self.state.delta;
        self.state.delta = Vector3::zeros();
        self.state.steps = 0;
        Some(Vector3::new(delta.x, delta.y, -delta.z) * self.config.map_units_per_metre)
    }

    /// Broadcast the accumulated delta to `population` if a flush is due
    ///
    /// Callers sharing the population must hold its lock across this call so
    /// the broadcast and the zeroing happen as one unit.
    pub fn flush_to_population<const N: usize>(
        &mut self,
        population: &mut ParticlePopulation<N>,
    ) -> Option<Vector3<f32>> {
        let delta = self.take_delta()?;
        population.apply_displacement(delta, self.config.noise_std_dev);
        debug!("Flushed ({:.2}, {:.2}, {:.2}) to {} particles", delta.x, delta.y, delta.z, N);
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorMap, FilterConfig};
    use hal::Attitude;

    const DT: f32 = 0.01;

    fn sample(acceleration: Vector3<f32>, stationary: bool) -> InertialSample {
        InertialSample {
            acceleration,
            attitude: Attitude::new(0.0, 0.0),
            stationary,
        }
    }

    fn tilted(acceleration: Vector3<f32>, roll: f32, pitch: f32) -> InertialSample {
        InertialSample {
            acceleration,
            attitude: Attitude::new(roll, pitch),
            stationary: false,
        }
    }

    fn calibrated_model(config: MotionConfig) -> MotionModel {
        let mut model = MotionModel::new(config).expect("valid configuration");
        let rest = sample(Vector3::new(0.0, 0.0, 9.81), true);
        for _ in 0..config.calibration_samples {
            model.calibrate_tick(&rest);
        }
        assert!(model.is_calibrated());
        model.set_motion_active(true);
        model
    }

    #[test]
    fn test_calibration_seeds_with_first_sample() {
        let mut model = MotionModel::new(MotionConfig::default()).expect("valid");
        model.calibrate_tick(&sample(Vector3::new(0.2, -0.1, 9.8), true));
        assert_eq!(model.state().bias, Vector3::new(0.2, -0.1, 9.8));
        assert_eq!(model.state().calibration_count, 1);
    }

    #[test]
    fn test_calibration_ignores_moving_samples() {
        let config = MotionConfig {
            calibration_samples: 3,
            ..MotionConfig::default()
        };
        let mut model = MotionModel::new(config).expect("valid");
        for _ in 0..10 {
            assert!(!model.calibrate_tick(&sample(Vector3::new(5.0, 0.0, 9.8), false)));
        }
        assert_eq!(model.state().calibration_count, 0);

        assert!(!model.calibrate_tick(&sample(Vector3::new(0.0, 0.0, 9.8), true)));
        assert!(!model.calibrate_tick(&sample(Vector3::new(0.0, 0.0, 9.8), true)));
        assert!(model.calibrate_tick(&sample(Vector3::new(0.0, 0.0, 9.8), true)));
    }

    #[test]
    fn test_calibration_is_a_one_way_latch() {
        let mut model = calibrated_model(MotionConfig::default());
        model.set_motion_active(false);
        model.set_motion_active(true);
        for _ in 0..50 {
            model
                .step(&sample(Vector3::new(3.0, 3.0, 3.0), false), DT, 0)
                .expect("valid step");
        }
        assert!(model.is_calibrated());
        assert!(model.calibrate_tick(&sample(Vector3::zeros(), false)));
    }

    #[test]
    fn test_no_integration_before_calibration() {
        let mut model = MotionModel::new(MotionConfig::default()).expect("valid");
        assert_eq!(
            model.begin_command(FlightCommand::Forward, 0),
            Err(LocalizationError::NotCalibrated)
        );

        let event = model
            .step(&sample(Vector3::new(2.0, 0.0, 9.8), false), DT, 10)
            .expect("valid step");
        assert_eq!(event, MotionEvent::Calibrating);
        assert_eq!(model.state().delta, Vector3::zeros());
        assert_eq!(model.state().steps, 0);
    }

    #[test]
    fn test_model_starts_disabled() {
        let mut model = MotionModel::new(MotionConfig::default()).expect("valid");
        assert!(!model.state().motion_active);
        let rest = sample(Vector3::new(0.0, 0.0, 9.81), true);
        for _ in 0..MotionConfig::default().calibration_samples {
            model.step(&rest, DT, 0).expect("valid step");
        }
        assert!(model.is_calibrated());
        assert_eq!(model.begin_command(FlightCommand::Up, 0), Ok(false));
        assert_eq!(model.step(&rest, DT, 10), Ok(MotionEvent::Inactive));

        model.set_motion_active(true);
        assert_eq!(model.begin_command(FlightCommand::Up, 20), Ok(true));
    }

    #[test]
    fn test_step_rejects_bad_time_step() {
        let mut model = calibrated_model(MotionConfig::default());
        let rest = sample(Vector3::zeros(), true);
        assert!(matches!(
            model.step(&rest, 0.0, 0),
            Err(LocalizationError::NonPositiveTimeStep { .. })
        ));
        assert!(model.step(&rest, f32::NAN, 0).is_err());
    }

    #[test]
    fn test_commands_without_axis_are_ignored() {
        let mut model = calibrated_model(MotionConfig::default());
        assert_eq!(model.begin_command(FlightCommand::Idle, 0), Ok(false));
        assert_eq!(model.begin_command(FlightCommand::LinkEnable, 0), Ok(false));
        assert_eq!(model.state().stage, CommandStage::Idle);
    }

    #[test]
    fn test_only_active_axis_is_integrated() {
        let config = MotionConfig {
            acceleration_alpha: 1.0,
            ..MotionConfig::default()
        };
        let mut model = calibrated_model(config);
        assert_eq!(model.begin_command(FlightCommand::Forward, 0), Ok(true));

        let pushed = tilted(Vector3::new(1.0, 4.0, 12.0), 0.0, 5.0);
        for tick in 1..=10 {
            let event = model.step(&pushed, DT, tick * 10).expect("valid step");
            assert_eq!(event, MotionEvent::Integrated { axis: Axis::X });
        }

        let state = model.state();
        assert!(state.delta.x > 0.0);
        assert_eq!(state.delta.y, 0.0);
        assert_eq!(state.delta.z, 0.0);
        assert_eq!(state.steps, 10);
    }

    #[test]
    fn test_trapezoidal_integration_of_constant_acceleration() {
        let config = MotionConfig {
            acceleration_alpha: 1.0,
            calibration_samples: 1,
            ..MotionConfig::default()
        };
        let mut model = MotionModel::new(config).expect("valid");
        model.calibrate_tick(&sample(Vector3::zeros(), true));
        model.set_motion_active(true);
        model.begin_command(FlightCommand::Right, 0).expect("calibrated");

        let pushed = tilted(Vector3::new(0.0, 2.0, 0.0), 5.0, 0.0);
        model.step(&pushed, 0.1, 100).expect("valid step");
        // v1 = (2 + 0) / 2 * 0.1, d1 = (v1 + 0) / 2 * 0.1
        assert!((model.state().velocity.y - 0.1).abs() < 1e-6);
        assert!((model.state().delta.y - 0.005).abs() < 1e-6);

        model.step(&pushed, 0.1, 200).expect("valid step");
        // v2 = 0.1 + 2 * 0.1, d2 = d1 + (0.1 + 0.3) / 2 * 0.1
        assert!((model.state().velocity.y - 0.3).abs() < 1e-6);
        assert!((model.state().delta.y - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_vertical_command_ends_after_duration() {
        let config = MotionConfig::default();
        let mut model = calibrated_model(config);
        model.begin_command(FlightCommand::Up, 1000).expect("calibrated");

        let climbing = sample(Vector3::new(0.0, 0.0, 10.5), false);
        let mut now = 1000;
        let finished = loop {
            now += 10;
            match model.step(&climbing, DT, now).expect("valid step") {
                MotionEvent::Integrated { axis } => assert_eq!(axis, Axis::Z),
                other => break other,
            }
        };
        assert_eq!(
            finished,
            MotionEvent::CommandFinished {
                command: FlightCommand::Up,
                timed_out: false
            }
        );
        assert_eq!(now - 1000, config.vertical_duration_ms);
        assert_eq!(model.state().velocity, Vector3::zeros());
        assert!(model.state().delta.z > 0.0);

        assert_eq!(model.begin_command(FlightCommand::Down, now), Ok(false));
        assert_eq!(model.step(&climbing, DT, now + 10).expect("valid"), MotionEvent::Cooling);
        assert_eq!(
            model.step(&climbing, DT, now + config.cooldown_ms).expect("valid"),
            MotionEvent::CooldownElapsed
        );
        assert_eq!(model.begin_command(FlightCommand::Down, now + config.cooldown_ms), Ok(true));
    }

    #[test]
    fn test_lateral_command_ends_when_tilt_settles() {
        let mut model = calibrated_model(MotionConfig::default());
        model.begin_command(FlightCommand::Left, 0).expect("calibrated");

        let accel = Vector3::new(0.0, -1.0, 9.81);
        // not yet tilted: keeps going
        assert!(matches!(
            model.step(&tilted(accel, 0.5, 0.0), DT, 10),
            Ok(MotionEvent::Integrated { .. })
        ));
        // tilted past the threshold
        assert!(matches!(
            model.step(&tilted(accel, -4.0, 0.0), DT, 20),
            Ok(MotionEvent::Integrated { .. })
        ));
        // pitch does not matter for the Y axis
        assert!(matches!(
            model.step(&tilted(accel, -4.0, 9.0), DT, 30),
            Ok(MotionEvent::Integrated { .. })
        ));
        // back below the threshold
        assert_eq!(
            model.step(&tilted(accel, -0.5, 0.0), DT, 40),
            Ok(MotionEvent::CommandFinished {
                command: FlightCommand::Left,
                timed_out: false
            })
        );
    }

    #[test]
    fn test_lateral_command_times_out() {
        let config = MotionConfig::default();
        let mut model = calibrated_model(config);
        model.begin_command(FlightCommand::Backward, 0).expect("calibrated");

        let flat = tilted(Vector3::new(-0.5, 0.0, 9.81), 0.0, 0.0);
        assert!(matches!(
            model.step(&flat, DT, config.lateral_timeout_ms - 1),
            Ok(MotionEvent::Integrated { .. })
        ));
        assert_eq!(
            model.step(&flat, DT, config.lateral_timeout_ms),
            Ok(MotionEvent::CommandFinished {
                command: FlightCommand::Backward,
                timed_out: true
            })
        );
    }

    #[test]
    fn test_disabling_zeroes_velocity() {
        let mut model = calibrated_model(MotionConfig::default());
        model.begin_command(FlightCommand::Forward, 0).expect("calibrated");
        let pushed = tilted(Vector3::new(2.0, 0.0, 9.81), 0.0, 3.0);
        for tick in 1..5 {
            model.step(&pushed, DT, tick * 10).expect("valid step");
        }
        assert!(model.state().velocity.x > 0.0);

        model.set_motion_active(false);
        assert_eq!(model.state().velocity, Vector3::zeros());
        assert_eq!(model.state().stage, CommandStage::Idle);
        assert_eq!(model.step(&pushed, DT, 60), Ok(MotionEvent::Inactive));
        assert_eq!(model.begin_command(FlightCommand::Forward, 70), Ok(false));

        model.set_motion_active(true);
        assert_eq!(model.begin_command(FlightCommand::Forward, 80), Ok(true));
        assert_eq!(model.state().velocity, Vector3::zeros());
    }

    #[test]
    fn test_idle_recalibrates_bias() {
        let mut model = calibrated_model(MotionConfig::default());
        let before = model.state().bias;
        for _ in 0..20 {
            assert_eq!(
                model.step(&sample(Vector3::new(0.3, 0.0, 9.81), true), DT, 0),
                Ok(MotionEvent::Idle)
            );
        }
        assert!(model.state().bias.x > before.x);
        assert_eq!(model.state().velocity, Vector3::zeros());
        assert_eq!(model.state().steps, 0);
    }

    #[test]
    fn test_flush_threshold_and_hand_off() {
        let config = MotionConfig {
            flush_steps: 5,
            noise_std_dev: 0.0,
            ..MotionConfig::default()
        };
        let mut model = calibrated_model(config);
        model.begin_command(FlightCommand::Up, 0).expect("calibrated");

        let climbing = sample(Vector3::new(0.0, 0.0, 11.0), false);
        for tick in 1..5 {
            model.step(&climbing, DT, tick * 10).expect("valid step");
            assert!(!model.should_flush());
        }
        model.step(&climbing, DT, 50).expect("valid step");
        assert!(model.should_flush());

        let integrated = model.state().delta;
        let mut population =
            ParticlePopulation::<64>::new(FilterConfig::default(), ColorMap::default())
                .expect("valid");
        let depth_before = population.mean_position().z;

        let applied = model.flush_to_population(&mut population).expect("flush due");
        assert!((applied.z + integrated.z * 100.0).abs() < 1e-4);
        assert!(population.mean_position().z < depth_before);
        assert_eq!(model.state().delta, Vector3::zeros());
        assert_eq!(model.state().steps, 0);
        assert!(model.flush_to_population(&mut population).is_none());
    }

    #[test]
    fn test_leftover_steps_flush_after_command() {
        let config = MotionConfig {
            flush_steps: 1000,
            ..MotionConfig::default()
        };
        let mut model = calibrated_model(config);
        model.begin_command(FlightCommand::Down, 0).expect("calibrated");

        let sinking = sample(Vector3::new(0.0, 0.0, 9.0), false);
        let mut now = 0;
        while now < config.vertical_duration_ms {
            now += 10;
            model.step(&sinking, DT, now).expect("valid step");
            if now < config.vertical_duration_ms {
                assert!(!model.should_flush());
            }
        }
        assert!(model.should_flush());
        let delta = model.take_delta().expect("flush due");
        assert!(delta.z > 0.0, "moving down increases depth");
    }

    #[test]
    fn test_config_validation() {
        assert!(MotionConfig::default().validate().is_ok());
        let config = MotionConfig {
            acceleration_alpha: 0.0,
            ..MotionConfig::default()
        };
        assert!(MotionModel::new(config).is_err());
    }
}
