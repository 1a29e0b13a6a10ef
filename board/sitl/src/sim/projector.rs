use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use fsk::{encode_frame, frame_bits, FskConfig, FSK_SAMPLES};
use hal::{AnalogInput, Clock, FlightCommand};
use log::info;

use super::SimClock;

/// Light level with the modulation off, in ADC counts
const STEADY_LEVEL: f32 = 2000.0;

/// Ground projector modulating command frames onto the light
///
/// Bits are sent least significant first, one tone per `window` FFT windows.
/// Transmissions start on a bit boundary of the simulated sampling clock so
/// the receiver's votes line up with whole bits.
pub struct Projector {
    clock: SimClock,
    config: FskConfig,
    bit_ms: u32,
    queue: VecDeque<u8>,
    current: Option<(u32, [bool; 8])>,
}

impl Projector {
    pub fn new(clock: SimClock, config: FskConfig) -> Self {
        let bit_ms = (FSK_SAMPLES * config.window) as u32 * 1000 / config.sample_rate;
        Self {
            clock,
            config,
            bit_ms,
            queue: VecDeque::new(),
            current: None,
        }
    }

    /// Queue `command` for the unit at `address`
    pub fn send(&mut self, address: u8, command: FlightCommand) {
        let frame = encode_frame(address, command.into(), self.config.address_bits);
        info!("Projector queues {:?} as {:#010b}", command, frame);
        self.queue.push_back(frame);
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }

    /// Frequency on air at `now`, `None` between frames
    fn tone_at(&mut self, now: u32) -> Option<f32> {
        if self.current.is_none() && now % self.bit_ms == 0 {
            if let Some(frame) = self.queue.pop_front() {
                let mut bits = [false; 8];
                for (slot, bit) in bits.iter_mut().zip(frame_bits(frame)) {
                    *slot = bit;
                }
                self.current = Some((now, bits));
            }
        }

        let (start, bits) = self.current?;
        let index = (now.wrapping_sub(start) / self.bit_ms) as usize;
        match bits.get(index) {
            Some(&bit) => Some(self.tone_frequency(bit)),
            None => {
                self.current = None;
                None
            }
        }
    }

    // centre of the FFT bin the receiver reports as the tone
    fn tone_frequency(&self, bit: bool) -> f32 {
        let resolution = self.config.sample_rate as f32 / FSK_SAMPLES as f32;
        let tone = if bit { self.config.tone_1 } else { self.config.tone_0 };
        (tone as f32 / resolution).round() * resolution
    }

    /// Light intensity reaching the robot now, in ADC counts
    pub fn intensity(&mut self) -> f32 {
        let now = self.clock.now_ms();
        let Some(frequency) = self.tone_at(now) else {
            return STEADY_LEVEL;
        };
        let mut sample = [0.0f32; 1];
        fsk::synthesize_tone(frequency, self.config.sample_rate, now, &mut sample);
        STEADY_LEVEL - 500.0 + 1000.0 * sample[0]
    }

    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }
}

/// Light sensor on the robot facing the projector
pub struct Photodiode(pub Rc<RefCell<Projector>>);

impl AnalogInput for Photodiode {
    fn read(&mut self) -> Option<f32> {
        Some(self.0.borrow_mut().intensity())
    }
}
