// reyes
use crate::core::geometry::{Bounds3f, Normal3f, Point3f, Vector3f};
use crate::core::reyes::{clamp_t, radians, Float, PI_OVER_2};
use crate::core::shape::{circle, revolve_for_bound, rotate_profile};
use crate::shapes::{sweep, Z_AXIS};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub radius: Float,
    pub z_min: Float,
    pub z_max: Float,
    /// degrees
    pub theta_min: Float,
    /// degrees
    pub theta_max: Float,
}

impl Default for Sphere {
    fn default() -> Self {
        Sphere::new(1.0, -1.0, 1.0, 0.0, 360.0)
    }
}

impl Sphere {
    pub fn new(radius: Float, z_min: Float, z_max: Float, theta_min: Float, theta_max: Float) -> Self {
        Sphere {
            radius,
            z_min,
            z_max,
            theta_min,
            theta_max,
        }
    }
    /// Latitude range in radians, z values beyond the poles clamp to
    /// them.
    pub fn phi_range(&self) -> (Float, Float) {
        let phi = |z: Float| -> Float {
            if self.radius == 0.0 as Float {
                0.0 as Float
            } else {
                clamp_t(z / self.radius, -1.0, 1.0).asin()
            }
        };
        let phi_min: Float = if self.z_min > -self.radius {
            phi(self.z_min)
        } else {
            -PI_OVER_2
        };
        let phi_max: Float = if self.z_max < self.radius {
            phi(self.z_max)
        } else {
            PI_OVER_2
        };
        (phi_min, phi_max)
    }
    pub fn dice_point(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> Point3f {
        let (phi_min, phi_max) = self.phi_range();
        let phi: Float = sweep(v, v_size, phi_min, phi_max);
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        let cos_phi: Float = phi.cos();
        Point3f {
            x: self.radius * theta.cos() * cos_phi,
            y: self.radius * theta.sin() * cos_phi,
            z: self.radius * phi.sin(),
        }
    }
    pub fn dice_point_normal(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> (Point3f, Normal3f) {
        let p: Point3f = self.dice_point(u, v, u_size, v_size);
        (p, Normal3f::from(p).normalize())
    }
    pub fn object_bound(&self) -> Bounds3f {
        let (phi_min, phi_max) = self.phi_range();
        let x_axis: Vector3f = Vector3f {
            x: 1.0,
            y: 0.0,
            z: 0.0,
        };
        let mut profile: Vec<Point3f> = circle(
            &Point3f::default(),
            &x_axis,
            &Z_AXIS,
            self.radius,
            phi_min,
            phi_max,
        );
        rotate_profile(&mut profile, self.theta_min);
        revolve_for_bound(
            &profile,
            &Point3f::default(),
            &Z_AXIS,
            radians(self.theta_max - self.theta_min),
        )
    }
    /// Halve theta (u) or phi (v). Since v runs linearly in phi, the
    /// z range is cut at the height of the middle latitude.
    pub fn halve(&self, split_u: bool) -> (Sphere, Sphere) {
        let mut a: Sphere = *self;
        let mut b: Sphere = *self;
        if split_u {
            let theta_mid: Float = (self.theta_min + self.theta_max) * 0.5;
            a.theta_max = theta_mid;
            b.theta_min = theta_mid;
        } else {
            let (phi_min, phi_max) = self.phi_range();
            let z_mid: Float = self.radius * ((phi_min + phi_max) * 0.5).sin();
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
    fn equator_at_half_sweep() {
        let sphere = Sphere::default();
        let p = sphere.dice_point(2, 2, 4, 4);
        assert!((p.x + 1.0).abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
        assert!(p.z.abs() < 1e-5);
        let (_, n) = sphere.dice_point_normal(0, 2, 4, 4);
        assert!((n.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn z_outside_radius_clamps_to_poles() {
        let sphere = Sphere::new(1.0, -2.0, 2.0, 0.0, 360.0);
        assert_eq!(sphere.phi_range(), (-PI_OVER_2, PI_OVER_2));
    }

    #[test]
    fn v_split_halves_the_latitude_range() {
        let sphere = Sphere::new(1.0, 0.0, 1.0, 0.0, 360.0);
        let (a, b) = sphere.halve(false);
        for u in 0..=4 {
            let parent = sphere.dice_point(u, 1, 4, 2);
            let top = a.dice_point(u, 1, 4, 1);
            let bottom = b.dice_point(u, 0, 4, 1);
            assert!((parent.x - top.x).abs() < 1e-5);
            assert!((parent.y - top.y).abs() < 1e-5);
            assert!((parent.z - top.z).abs() < 1e-5);
            assert_eq!(top, bottom);
        }
        // three quarters up the parent is halfway up the upper child
        let parent = sphere.dice_point(0, 3, 4, 4);
        let child = b.dice_point(0, 1, 4, 2);
        assert!((parent.z - child.z).abs() < 1e-5);
    }
}
