use std::cell::RefCell;
use std::rc::Rc;

use autopilot::{
    ColorIntake, FilterTask, LinkTask, MemoryParameters, MotionTask, SamplingTask, SharedContext,
    Telemetry, VehicleConfig,
};
use hal::{Clock, FlightCommand, Vector3d};
use localization::ColorObservationModel;
use log::debug;

use crate::executor::CommandExecutor;
use crate::sim::{ColorCamera, DataReadyLine, Photodiode, Projector, SimClock, SimImu, SimVehicle};

/// Integration period of the simulated color sensors
const COLOR_INTEGRATION_MS: u32 = 100;

/// Duration of a simulated lateral move
const LATERAL_MOVE_MS: u32 = 800;

/// The VLC subsystem wired to the simulated world, stepped one millisecond at a time
pub struct Simulation {
    clock: SimClock,
    config: VehicleConfig,
    context: SharedContext,
    params: MemoryParameters,
    vehicle: Rc<RefCell<SimVehicle>>,
    projector: Rc<RefCell<Projector>>,
    sampling: SamplingTask<Photodiode>,
    link: LinkTask,
    motion: MotionTask<SimImu>,
    filter: FilterTask<DataReadyLine, DataReadyLine, ColorCamera>,
    executor: CommandExecutor,
}

impl Simulation {
    pub fn new(config: VehicleConfig) -> anyhow::Result<Self> {
        let clock = SimClock::default();
        let context = SharedContext::new(&config)?;

        // start inside a cell near the middle of the map
        let cell = config.filter.starting_cell_size();
        let start = Vector3d::new(4.5 * cell, 3.5 * cell, config.filter.starting_depth);
        let vehicle =
            SimVehicle::new(start, LATERAL_MOVE_MS, config.motion.vertical_duration_ms).shared();

        let projector = Projector::new(clock.clone(), config.fsk).shared();
        let sampling = SamplingTask::new(Photodiode(projector.clone()), &config.fsk);
        let link = LinkTask::new(&config.fsk)?;

        let imu = SimImu::new(vehicle.clone(), Vector3d::new(0.05, -0.03, 0.02));
        let motion = MotionTask::new(imu, config.motion, config.periods.motion_ms)?;

        let observation = ColorObservationModel::new(
            config.color_map,
            config.filter.focal_length,
            config.filter.cell_size,
        );
        let intake = ColorIntake::new(
            DataReadyLine::new(clock.clone(), COLOR_INTEGRATION_MS, 0),
            DataReadyLine::new(clock.clone(), COLOR_INTEGRATION_MS, 3),
            ColorCamera::new(vehicle.clone(), observation),
        );
        let filter = FilterTask::new(intake, &config.filter);

        Ok(Self {
            clock,
            config,
            context,
            params: MemoryParameters::with_defaults(),
            executor: CommandExecutor::new(vehicle.clone()),
            vehicle,
            projector,
            sampling,
            link,
            motion,
            filter,
        })
    }

    pub fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }

    /// Have the projector transmit `command` to this unit
    pub fn transmit(&self, command: FlightCommand) {
        self.projector.borrow_mut().send(self.config.fsk.unit_id, command);
    }

    /// Advance the world and run every task that is due this millisecond
    pub fn step(&mut self) {
        let now = self.clock.now_ms();
        let periods = self.config.periods;

        if let Some(command) = self.vehicle.borrow_mut().step(1) {
            debug!("Vehicle finished {:?} at {} ms", command, now);
        }

        if now % periods.sample_ms == 0 {
            self.sampling.tick(&self.context);
        }
        if now % periods.link_ms == 0 {
            self.link.run(&self.context);
        }
        self.executor.poll(&self.context, &mut self.params);
        if now % periods.motion_ms == 0 {
            if let Some(event) = self.motion.run(&self.context, &mut self.params, now) {
                debug!("Motion {:?}", event);
            }
        }
        if now % periods.filter_ms == 0 {
            self.filter.run(&self.context, now);
        }

        self.clock.advance(1);
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::capture(
            &self.context,
            self.motion.state(),
            self.filter.detected_color(),
            self.link.stats(),
        )
    }

    pub fn true_position(&self) -> Vector3d {
        self.vehicle.borrow().position
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopilot::{PARAM_LAST_COMMAND, PARAM_MOTION_ACTIVE};
    use hal::ParameterStore;
    use localization::CommandStage;

    fn run_until(simulation: &mut Simulation, end_ms: u32) {
        while simulation.now_ms() < end_ms {
            simulation.step();
        }
    }

    #[test]
    fn test_transmitted_move_is_flown_and_integrated() {
        let mut simulation =
            Simulation::new(VehicleConfig::default()).expect("valid configuration");
        assert!(!simulation.params.flag(PARAM_MOTION_ACTIVE));
        simulation.transmit(FlightCommand::MotionModelEnable);
        run_until(&mut simulation, 2000);
        assert!(simulation.telemetry().calibrated);
        assert!(simulation.params.flag(PARAM_MOTION_ACTIVE));
        let start = simulation.true_position();

        simulation.transmit(FlightCommand::Forward);
        run_until(&mut simulation, 6000);

        let telemetry = simulation.telemetry();
        assert_eq!(telemetry.link.frames_decoded, 2);
        assert_eq!(simulation.executor().executed(), 2);
        assert!((simulation.true_position().x - start.x - 20.0).abs() < 1.0);
        assert_eq!(simulation.params.get(PARAM_LAST_COMMAND), Some(0));
        assert_eq!(telemetry.stage, CommandStage::Idle);
        assert_eq!(telemetry.dropped_samples, 0);
        assert_eq!(telemetry.pending_commands, 0);
    }

    #[test]
    fn test_filter_sees_the_true_color() {
        let mut simulation =
            Simulation::new(VehicleConfig::default()).expect("valid configuration");
        run_until(&mut simulation, 500);
        let config = VehicleConfig::default();
        let observation = ColorObservationModel::new(
            config.color_map,
            config.filter.focal_length,
            config.filter.cell_size,
        );
        assert_eq!(
            simulation.telemetry().detected_color,
            observation.expected_color(&simulation.true_position())
        );
    }
}
