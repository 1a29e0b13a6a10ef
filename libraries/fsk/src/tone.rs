use core::f64::consts::PI;

use libm::sin;

/// Fill `out` with a tone of `frequency` Hz riding on a 0.5 offset
///
/// Sample `i` of `out` is sample `start + i` of the tone, so consecutive
/// calls with a running `start` produce one continuous signal.
pub fn synthesize_tone(frequency: f32, sample_rate: u32, start: u32, out: &mut [f32]) {
    let step = 2.0 * PI * frequency as f64 / sample_rate as f64;
    for (i, sample) in out.iter_mut().enumerate() {
        let index = start as f64 + i as f64;
        *sample = (0.5 + 0.5 * sin(step * index)) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_is_bounded() {
        let mut out = [0.0; 64];
        synthesize_tone(187.0, 1000, 0, &mut out);
        assert!(out.iter().all(|&s| (0.0..=1.0).contains(&s)));
        assert_eq!(out[0], 0.5);
    }

    #[test]
    fn test_consecutive_windows_are_continuous() {
        let mut whole = [0.0; 32];
        synthesize_tone(125.0, 1000, 0, &mut whole);

        let mut first = [0.0; 16];
        let mut second = [0.0; 16];
        synthesize_tone(125.0, 1000, 0, &mut first);
        synthesize_tone(125.0, 1000, 16, &mut second);
        assert_eq!(&whole[..16], &first[..]);
        assert_eq!(&whole[16..], &second[..]);
    }
}
