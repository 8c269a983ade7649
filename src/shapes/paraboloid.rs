// reyes
use crate::core::geometry::{Bounds3f, Normal3f, Point3f, Vector3f};
use crate::core::reyes::{radians, Float};
use crate::core::shape::{intersect_line, revolve_for_bound, rotate_profile};
use crate::shapes::{sweep, Z_AXIS};

/// `r = r_max * sqrt(z / z_max)` for z in `z_min..z_max`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Paraboloid {
    pub r_max: Float,
    pub z_min: Float,
    pub z_max: Float,
    pub theta_min: Float,
    pub theta_max: Float,
}

impl Paraboloid {
    pub fn new(r_max: Float, z_min: Float, z_max: Float, theta_min: Float, theta_max: Float) -> Self {
        Paraboloid {
            r_max,
            z_min,
            z_max,
            theta_min,
            theta_max,
        }
    }
    pub fn radius_at(&self, z: Float) -> Float {
        if self.z_max == 0.0 as Float {
            0.0 as Float
        } else {
            self.r_max * (z / self.z_max).max(0.0).sqrt()
        }
    }
    /// Direction of the profile curve `(r(z), z)` at *z*.
    fn tangent_at(&self, z: Float) -> Vector3f {
        let q: Float = if self.z_max == 0.0 as Float {
            0.0 as Float
        } else {
            (z / self.z_max).max(0.0).sqrt()
        };
        Vector3f {
            x: self.r_max,
            y: 0.0,
            z: 2.0 * self.z_max * q,
        }
    }
    pub fn dice_point(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> Point3f {
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        let z: Float = sweep(v, v_size, self.z_min, self.z_max);
        let r: Float = self.radius_at(z);
        Point3f {
            x: r * theta.cos(),
            y: r * theta.sin(),
            z,
        }
    }
    pub fn dice_point_normal(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> (Point3f, Normal3f) {
        let p: Point3f = self.dice_point(u, v, u_size, v_size);
        let r2: Float = self.r_max * self.r_max;
        let n: Normal3f = if r2 == 0.0 as Float {
            Normal3f {
                x: 0.0,
                y: 0.0,
                z: -1.0,
            }
        } else {
            Normal3f {
                x: 2.0 * self.z_max * p.x / r2,
                y: 2.0 * self.z_max * p.y / r2,
                z: -1.0,
            }
        };
        (p, n.normalize())
    }
    /// The profile is the two end points plus where their tangents
    /// meet, the (concave) curve lies within that triangle.
    pub fn object_bound(&self) -> Bounds3f {
        let a: Point3f = Point3f {
            x: self.radius_at(self.z_min),
            y: 0.0,
            z: self.z_min,
        };
        let b: Point3f = Point3f {
            x: self.radius_at(self.z_max),
            y: 0.0,
            z: self.z_max,
        };
        let mut profile: Vec<Point3f> = vec![a, b];
        if let Some(c) = intersect_line(&a, &self.tangent_at(self.z_min), &b, &self.tangent_at(self.z_max)) {
            profile.push(c);
        }
        rotate_profile(&mut profile, self.theta_min);
        revolve_for_bound(
            &profile,
            &Point3f::default(),
            &Z_AXIS,
            radians(self.theta_max - self.theta_min),
        )
    }
    /// Halve theta (u) or z (v), the lower half gets its own maximum
    /// radius so it stays on the same surface.
    pub fn halve(&self, split_u: bool) -> (Paraboloid, Paraboloid) {
        let mut a: Paraboloid = *self;
        let mut b: Paraboloid = *self;
        if split_u {
            let theta_mid: Float = (self.theta_min + self.theta_max) * 0.5;
            a.theta_max = theta_mid;
            b.theta_min = theta_mid;
        } else {
            let z_mid: Float = (self.z_min + self.z_max) * 0.5;
            a.r_max = self.radius_at(z_mid);
            a.z_max = z_mid;
            b.z_min = z_mid;
        }
        (a, b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lower_half_stays_on_surface() {
        let paraboloid = Paraboloid::new(2.0, 0.0, 4.0, 0.0, 360.0);
        let (lower, upper) = paraboloid.halve(false);
        for z in [0.5 as Float, 1.0, 1.5, 2.0].iter() {
            assert!((lower.radius_at(*z) - paraboloid.radius_at(*z)).abs() < 1e-5);
        }
        assert_eq!(lower.z_max, upper.z_min);
        assert_eq!(upper.r_max, paraboloid.r_max);
    }
}
