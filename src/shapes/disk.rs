// reyes
use crate::core::geometry::{Bounds3f, Normal3f, Point3f};
use crate::core::reyes::{radians, Float};
use crate::core::shape::{revolve_for_bound, rotate_profile};
use crate::shapes::{sweep, Z_AXIS};

/// A flat ring at *height*, v runs from the major (outer) to the minor
/// (inner) radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Disk {
    pub height: Float,
    pub minor_radius: Float,
    pub major_radius: Float,
    pub theta_min: Float,
    pub theta_max: Float,
}

impl Disk {
    pub fn new(
        height: Float,
        minor_radius: Float,
        major_radius: Float,
        theta_min: Float,
        theta_max: Float,
    ) -> Self {
        Disk {
            height,
            minor_radius,
            major_radius,
            theta_min,
            theta_max,
        }
    }
    pub fn dice_point(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> Point3f {
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        let r: Float = sweep(v, v_size, self.major_radius, self.minor_radius);
        Point3f {
            x: r * theta.cos(),
            y: r * theta.sin(),
            z: self.height,
        }
    }
    /// The normal faces +z for a positive theta_max, -z otherwise.
    pub fn dice_point_normal(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> (Point3f, Normal3f) {
        let z: Float = if self.theta_max > 0.0 as Float {
            1.0
        } else {
            -1.0
        };
        (
            self.dice_point(u, v, u_size, v_size),
            Normal3f { x: 0.0, y: 0.0, z },
        )
    }
    pub fn object_bound(&self) -> Bounds3f {
        let mut profile: Vec<Point3f> = vec![
            Point3f {
                x: self.major_radius,
                y: 0.0,
                z: self.height,
            },
            Point3f {
                x: self.minor_radius,
                y: 0.0,
                z: self.height,
            },
        ];
        rotate_profile(&mut profile, self.theta_min);
        revolve_for_bound(
            &profile,
            &Point3f::default(),
            &Z_AXIS,
            radians(self.theta_max - self.theta_min),
        )
    }
    /// Halve theta (u) or the radius range (v), the first half keeps
    /// the outer ring.
    pub fn halve(&self, split_u: bool) -> (Disk, Disk) {
        let mut a: Disk = *self;
        let mut b: Disk = *self;
        if split_u {
            let theta_mid: Float = (self.theta_min + self.theta_max) * 0.5;
            a.theta_max = theta_mid;
            b.theta_min = theta_mid;
        } else {
            let r_mid: Float = (self.major_radius + self.minor_radius) * 0.5;
            a.minor_radius = r_mid;
            b.major_radius = r_mid;
        }
        (a, b)
    }
}
