//! A small PCG32 random number generator, used to scatter the points
//! of the demo point clouds reproducibly.

// others
use hexf::*;
// reyes
use crate::core::reyes::Float;

pub const FLOAT_ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");
pub const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
pub const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
pub const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

#[derive(Debug, Copy, Clone)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Default for Rng {
    fn default() -> Self {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl Rng {
    /// A generator on its own stream, selected by *seed*.
    pub fn new(seed: u64) -> Self {
        let mut rng: Rng = Rng { state: 0, inc: 0 };
        rng.set_sequence(seed);
        rng
    }
    pub fn set_sequence(&mut self, seed: u64) {
        self.state = 0_u64;
        self.inc = seed.wrapping_shl(1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }
    pub fn uniform_uint32(&mut self) -> u32 {
        let old_state: u64 = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xor_shifted: u32 = ((old_state.wrapping_shr(18) ^ old_state).wrapping_shr(27)) as u32;
        let rot: u32 = old_state.wrapping_shr(59) as u32;
        xor_shifted.rotate_right(rot)
    }
    /// Uniform in `[0, 1)`.
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_uint32() as Float * hexf32!("0x1.0p-32") as Float).min(FLOAT_ONE_MINUS_EPSILON)
    }
    /// Uniform in `[min, max)`.
    pub fn uniform_range(&mut self, min: Float, max: Float) -> Float {
        min + (max - min) * self.uniform_float()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        let mut c = Rng::new(8);
        let sa: Vec<u32> = (0..8).map(|_| a.uniform_uint32()).collect();
        let sb: Vec<u32> = (0..8).map(|_| b.uniform_uint32()).collect();
        let sc: Vec<u32> = (0..8).map(|_| c.uniform_uint32()).collect();
        assert_eq!(sa, sb);
        assert_ne!(sa, sc);
    }

    #[test]
    fn floats_stay_in_range() {
        let mut rng = Rng::default();
        for _ in 0..1000 {
            let f = rng.uniform_range(-2.0, 3.0);
            assert!(f >= -2.0 && f < 3.0);
        }
    }
}
