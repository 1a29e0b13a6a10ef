use std::time::Duration;

use anyhow::Context;
use autopilot::VehicleConfig;
use hal::FlightCommand;
use log::{error, info};

// critical-section implementation for the host
use critical_section as _;

mod executor;
mod sim;
mod simulation;

use simulation::Simulation;

/// Commands the projector sends, with their start time in milliseconds
const MISSION: [(u32, FlightCommand); 7] = [
    (500, FlightCommand::MotionModelEnable),
    (2_000, FlightCommand::Forward),
    (6_000, FlightCommand::Right),
    (10_000, FlightCommand::Up),
    (14_000, FlightCommand::Backward),
    (18_000, FlightCommand::Left),
    (22_000, FlightCommand::Down),
];

const TELEMETRY_PERIOD_MS: u32 = 1_000;

enum State {
    Initializing,
    Running,
    Stopping,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let duration = match std::env::args().nth(1) {
        Some(arg) => Duration::from_secs(arg.parse().context("duration must be whole seconds")?),
        None => Duration::from_secs(30),
    };
    let end_ms = u32::try_from(duration.as_millis()).context("duration too long")?;

    let mut state = State::Initializing;
    let mut simulation = None;
    let mut next_command = 0;
    loop {
        match state {
            State::Initializing => {
                info!("Initializing...");
                match Simulation::new(VehicleConfig::default()) {
                    Ok(sim) => {
                        simulation = Some(sim);
                        state = State::Running;
                        info!("Running for {} ms", end_ms);
                    }
                    Err(err) => {
                        error!("Failed to set up the simulation: {:?}", err);
                        state = State::Stopping;
                    }
                }
            }
            State::Running => {
                let Some(sim) = simulation.as_mut() else {
                    state = State::Stopping;
                    continue;
                };
                let now = sim.now_ms();
                if let Some(&(at, command)) = MISSION.get(next_command) {
                    if now >= at {
                        sim.transmit(command);
                        next_command += 1;
                    }
                }
                if now % TELEMETRY_PERIOD_MS == 0 {
                    report(sim);
                }
                sim.step();
                if now >= end_ms {
                    state = State::Stopping;
                }
            }
            State::Stopping => {
                info!("Stopping");
                if let Some(sim) = simulation.as_ref() {
                    let link = sim.telemetry().link;
                    info!(
                        "Link: {} windows, {} frames decoded, {} discarded, {} resets, {} timeouts",
                        link.windows,
                        link.frames_decoded,
                        link.frames_discarded,
                        link.resets,
                        link.timeouts
                    );
                    info!(
                        "Executor: {} commands executed, {} rejected",
                        sim.executor().executed(),
                        sim.executor().rejected()
                    );
                }
                break;
            }
        }
    }
    Ok(())
}

fn report(sim: &Simulation) {
    let telemetry = sim.telemetry();
    let truth = sim.true_position();
    let estimate = telemetry.mean_position;
    info!(
        "t={:>6} ms true=({:6.1},{:6.1},{:6.1}) estimate=({:6.1},{:6.1},{:6.1}) \
         color={} stage={:?}",
        sim.now_ms(),
        truth.x,
        truth.y,
        truth.z,
        estimate.x,
        estimate.y,
        estimate.z,
        telemetry.detected_color,
        telemetry.stage
    );
}
