use std::cell::RefCell;
use std::rc::Rc;

use autopilot::{SharedContext, PARAM_LAST_COMMAND, PARAM_MOTION_ACTIVE};
use hal::{FlightCommand, ParameterStore};
use log::{info, warn};

use crate::sim::SimVehicle;

/// Flight command executor of the simulated robot
///
/// Takes one decoded byte per poll. Moves are flown by the simulated
/// vehicle and published through `vlc.lastCommand` for the motion model;
/// the motion model switches act on `vlc.motionActive`.
pub struct CommandExecutor {
    vehicle: Rc<RefCell<SimVehicle>>,
    executed: u32,
    rejected: u32,
}

impl CommandExecutor {
    pub fn new(vehicle: Rc<RefCell<SimVehicle>>) -> Self {
        Self {
            vehicle,
            executed: 0,
            rejected: 0,
        }
    }

    pub fn poll<P: ParameterStore + ?Sized>(
        &mut self,
        context: &SharedContext,
        params: &mut P,
    ) -> Option<FlightCommand> {
        let byte = context.next_command()?;
        let Ok(command) = FlightCommand::try_from(byte) else {
            warn!("Executor ignores unknown command {}", byte);
            self.rejected += 1;
            return None;
        };

        match command {
            FlightCommand::MotionModelEnable => {
                params.set(PARAM_MOTION_ACTIVE, 1);
            }
            FlightCommand::MotionModelDisable => {
                params.set(PARAM_MOTION_ACTIVE, 0);
            }
            _ if command.axis().is_some() => {
                if !self.vehicle.borrow_mut().begin(command) {
                    warn!("Executor busy, dropping {:?}", command);
                    self.rejected += 1;
                    return None;
                }
                params.set(PARAM_LAST_COMMAND, u8::from(command) as i32);
            }
            _ => info!("No flight action for {:?}", command),
        }
        self.executed += 1;
        info!("Executing {:?}", command);
        Some(command)
    }

    pub fn executed(&self) -> u32 {
        self.executed
    }

    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}
