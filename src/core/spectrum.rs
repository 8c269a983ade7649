//! RGB colors as used by the `Cs` and `Os` grid channels and by
//! `color` parameters.

// std
use std::ops;
use std::ops::{Index, IndexMut};
// reyes
use crate::core::reyes::Float;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RGBSpectrum {
    pub c: [Float; 3],
}

pub type Color = RGBSpectrum;

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        RGBSpectrum { c: [v, v, v] }
    }
    pub fn rgb(r: Float, g: Float, b: Float) -> RGBSpectrum {
        RGBSpectrum { c: [r, g, b] }
    }
    /// Take the first three values of a slice, missing channels are
    /// black.
    pub fn from_slice(v: &[Float]) -> RGBSpectrum {
        let mut s: RGBSpectrum = RGBSpectrum::new(0.0 as Float);
        for (i, value) in v.iter().take(3).enumerate() {
            s.c[i] = *value;
        }
        s
    }
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0 as Float)
    }
}

impl_op_ex!(+|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] + b.c[0], a.c[1] + b.c[1], a.c[2] + b.c[2]],
    }
});

impl_op_ex!(*|a: &RGBSpectrum, b: Float| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] * b, a.c[1] * b, a.c[2] * b],
    }
});

impl Index<usize> for RGBSpectrum {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        &self.c[index]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, index: usize) -> &mut Float {
        &mut self.c[index]
    }
}
