// reyes
use crate::core::geometry::{Bounds3f, Normal3f, Point3f};
use crate::core::reyes::{radians, Float};
use crate::core::shape::{revolve_for_bound, rotate_profile};
use crate::shapes::{sweep, Z_AXIS};

/// A cone with its base (of *radius*) at z = 0 and its apex at
/// *height*, cut to `z_min..z_max`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cone {
    pub height: Float,
    pub radius: Float,
    pub z_min: Float,
    pub z_max: Float,
    pub theta_min: Float,
    pub theta_max: Float,
}

impl Cone {
    pub fn new(
        height: Float,
        radius: Float,
        theta_min: Float,
        theta_max: Float,
        z_min: Float,
        z_max: Float,
    ) -> Self {
        Cone {
            height,
            radius,
            z_min,
            z_max,
            theta_min,
            theta_max,
        }
    }
    fn radius_at(&self, z: Float) -> Float {
        if self.height == 0.0 as Float {
            self.radius
        } else {
            self.radius * (1.0 as Float - z / self.height)
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
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        let n: Normal3f = Normal3f {
            x: self.height * theta.cos(),
            y: self.height * theta.sin(),
            z: self.radius,
        };
        (p, n.normalize())
    }
    pub fn object_bound(&self) -> Bounds3f {
        let mut profile: Vec<Point3f> = vec![
            Point3f {
                x: self.radius_at(self.z_min),
                y: 0.0,
                z: self.z_min,
            },
            Point3f {
                x: self.radius_at(self.z_max),
                y: 0.0,
                z: self.z_max,
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
    pub fn halve(&self, split_u: bool) -> (Cone, Cone) {
        let mut a: Cone = *self;
        let mut b: Cone = *self;
        if split_u {
            let theta_mid: Float = (self.theta_min + self.theta_max) * 0.5;
            a.theta_max = theta_mid;
            b.theta_min = theta_mid;
        } else {
            let z_mid: Float = (self.z_min + self.z_max) * 0.5;
            a.z_max = z_mid;
            b.z_min = z_mid;
        }
        (a, b)
    }
}
