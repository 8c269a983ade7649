// reyes
use crate::core::geometry::{Bounds3f, Normal3f, Point3f, Vector3f};
use crate::core::reyes::{radians, Float};
use crate::core::shape::{circle, revolve_for_bound, rotate_profile};
use crate::shapes::{sweep, Z_AXIS};

/// A tube of *minor_radius* around a circle of *major_radius*, both
/// angle ranges in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Torus {
    pub major_radius: Float,
    pub minor_radius: Float,
    pub phi_min: Float,
    pub phi_max: Float,
    pub theta_min: Float,
    pub theta_max: Float,
}

impl Torus {
    pub fn new(
        major_radius: Float,
        minor_radius: Float,
        phi_min: Float,
        phi_max: Float,
        theta_min: Float,
        theta_max: Float,
    ) -> Self {
        Torus {
            major_radius,
            minor_radius,
            phi_min,
            phi_max,
            theta_min,
            theta_max,
        }
    }
    pub fn dice_point(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> Point3f {
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        let phi: Float = radians(sweep(v, v_size, self.phi_min, self.phi_max));
        let r: Float = self.minor_radius * phi.cos();
        Point3f {
            x: (self.major_radius + r) * theta.cos(),
            y: (self.major_radius + r) * theta.sin(),
            z: self.minor_radius * phi.sin(),
        }
    }
    pub fn dice_point_normal(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> (Point3f, Normal3f) {
        let p: Point3f = self.dice_point(u, v, u_size, v_size);
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        let phi: Float = radians(sweep(v, v_size, self.phi_min, self.phi_max));
        let n: Normal3f = Normal3f {
            x: phi.cos() * theta.cos(),
            y: phi.cos() * theta.sin(),
            z: phi.sin(),
        };
        (p, n.normalize())
    }
    pub fn object_bound(&self) -> Bounds3f {
        let mut profile: Vec<Point3f> = circle(
            &Point3f {
                x: self.major_radius,
                y: 0.0,
                z: 0.0,
            },
            &Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
            &Z_AXIS,
            self.minor_radius,
            radians(self.phi_min),
            radians(self.phi_max),
        );
        rotate_profile(&mut profile, self.theta_min);
        revolve_for_bound(
            &profile,
            &Point3f::default(),
            &Z_AXIS,
            radians(self.theta_max - self.theta_min),
        )
    }
    /// Halve theta (u) or phi (v).
    pub fn halve(&self, split_u: bool) -> (Torus, Torus) {
        let mut a: Torus = *self;
        let mut b: Torus = *self;
        if split_u {
            let theta_mid: Float = (self.theta_min + self.theta_max) * 0.5;
            a.theta_max = theta_mid;
            b.theta_min = theta_mid;
        } else {
            let phi_mid: Float = (self.phi_min + self.phi_max) * 0.5;
            a.phi_max = phi_mid;
            b.phi_min = phi_mid;
        }
        (a, b)
    }
}
