//! Type definition of Float, otherwise constants and functions which
//! can be used almost everywhere else in the code.

// std
use std::f32::consts::PI;
use std::ops::{Add, BitAnd, Mul, Sub};
// others
use num;

pub type Float = f32;

pub const PI_OVER_2: Float = 1.570_796_326_794_896_619_23;
pub const TWO_PI: Float = 6.283_185_307_179_586_476_92;

/// Resolution of the probe grid used to estimate dice sizes.
pub const ESTIMATE_GRID_SIZE: i32 = 8;
/// Hard ceiling on the number of samples a single grid may carry.
pub const TOO_LARGE_QUADS: u64 = 10000;
/// Profile points closer to the axis than this are not revolved.
pub const DEGENERATE_RADIUS: Float = 1e-7;

/// Clamp the given value *val* to lie between the values *low* and *high*.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    let r: T;
    if val < low {
        r = low;
    } else if val > high {
        r = high;
    } else {
        r = val;
    }
    r
}

/// Convert from angles expressed in degrees to radians.
pub fn radians(deg: Float) -> Float {
    (PI / 180.0) * deg
}

/// Determine if a given integer is an exact power of 2.
pub fn is_power_of_2<T>(v: T) -> bool
where
    T: num::Zero + num::One + Copy + PartialOrd + BitAnd<T, Output = T> + Sub<T, Output = T>,
{
    (v > num::Zero::zero()) && !((v & (v - num::One::one())) > num::Zero::zero())
}

/// Round an integer up to the next higher (or equal) power of 2.
pub fn round_up_pow2_32(v: i32) -> i32 {
    let mut ret: i32 = v; // copy value
    ret -= 1_i32;
    ret |= ret >> 1;
    ret |= ret >> 2;
    ret |= ret >> 4;
    ret |= ret >> 8;
    ret |= ret >> 16;
    ret + 1
}

/// Interpolate linearly between two provided values.
pub fn lerp<S, T>(t: S, a: T, b: T) -> T
where
    S: num::One,
    S: Sub<S, Output = S>,
    S: Copy,
    T: Add<T, Output = T>,
    T: Mul<S, Output = T>,
{
    let one: S = num::One::one();
    a * (one - t) + b * t
}

/// Bilinear interpolation across four corner values, ordered
/// (u0,v0), (u1,v0), (u0,v1), (u1,v1).
pub fn bilerp<S, T>(u: S, v: S, c0: T, c1: T, c2: T, c3: T) -> T
where
    S: num::One,
    S: Sub<S, Output = S>,
    S: Copy,
    T: Add<T, Output = T>,
    T: Mul<S, Output = T>,
{
    lerp(v, lerp(u, c0, c1), lerp(u, c2, c3))
}

/// Fraction of the way through a parametric range, `0` for an empty
/// grid.
pub fn grid_fraction(i: i32, size: i32) -> Float {
    if size == 0 {
        0.0 as Float
    } else {
        i as Float / size as Float
    }
}
