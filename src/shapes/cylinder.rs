// reyes
use crate::core::geometry::{Bounds3f, Normal3f, Point3f};
use crate::core::reyes::{radians, Float};
use crate::core::shape::{revolve_for_bound, rotate_profile};
use crate::shapes::{sweep, Z_AXIS};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cylinder {
    pub radius: Float,
    pub z_min: Float,
    pub z_max: Float,
    pub theta_min: Float,
    pub theta_max: Float,
}

impl Cylinder {
    pub fn new(radius: Float, z_min: Float, z_max: Float, theta_min: Float, theta_max: Float) -> Self {
        Cylinder {
            radius,
            z_min,
            z_max,
            theta_min,
            theta_max,
        }
    }
    pub fn dice_point(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> Point3f {
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        Point3f {
            x: self.radius * theta.cos(),
            y: self.radius * theta.sin(),
            z: sweep(v, v_size, self.z_min, self.z_max),
        }
    }
    pub fn dice_point_normal(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> (Point3f, Normal3f) {
        let p: Point3f = self.dice_point(u, v, u_size, v_size);
        let n: Normal3f = Normal3f {
            x: p.x,
            y: p.y,
            z: 0.0,
        };
        (p, n.normalize())
    }
    pub fn object_bound(&self) -> Bounds3f {
        let mut profile: Vec<Point3f> = vec![
            Point3f {
                x: self.radius,
                y: 0.0,
                z: self.z_min,
            },
            Point3f {
                x: self.radius,
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
    pub fn halve(&self, split_u: bool) -> (Cylinder, Cylinder) {
        let mut a: Cylinder = *self;
        let mut b: Cylinder = *self;
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rows_hit_z_range_exactly() {
        let cylinder = Cylinder::new(2.0, 0.0, 10.0, 0.0, 90.0);
        for u in 0..=7 {
            assert_eq!(cylinder.dice_point(u, 0, 7, 1).z, 0.0);
            assert_eq!(cylinder.dice_point(u, 1, 7, 1).z, 10.0);
        }
    }
}
