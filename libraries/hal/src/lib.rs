#![cfg_attr(not(test), no_std)]
extern crate nalgebra;

mod analog;
mod clock;
mod color;
mod imu;
mod params;
mod types;

pub use analog::*;
pub use clock::*;
pub use color::*;
pub use imu::*;
pub use params::*;
pub use types::*;
