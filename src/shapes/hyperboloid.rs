// reyes
use crate::core::geometry::{vec3_cross_vec3, Bounds3f, Normal3f, Point3f, Vector3f};
use crate::core::reyes::{lerp, radians, Float};
use crate::core::shape::{revolve_for_bound, rotate_profile};
use crate::shapes::{sweep, Z_AXIS};

/// The surface swept by rotating the line from *p1* to *p2* about the
/// z axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hyperboloid {
    pub p1: Point3f,
    pub p2: Point3f,
    pub theta_min: Float,
    pub theta_max: Float,
}

impl Hyperboloid {
    pub fn new(p1: Point3f, p2: Point3f, theta_min: Float, theta_max: Float) -> Self {
        Hyperboloid {
            p1,
            p2,
            theta_min,
            theta_max,
        }
    }
    fn profile_point(&self, v: i32, v_size: i32) -> Point3f {
        let t: Float = sweep(v, v_size, 0.0, 1.0);
        lerp(t, self.p1, self.p2)
    }
    pub fn dice_point(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> Point3f {
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        let p: Point3f = self.profile_point(v, v_size);
        let (sin_theta, cos_theta) = theta.sin_cos();
        Point3f {
            x: p.x * cos_theta - p.y * sin_theta,
            y: p.x * sin_theta + p.y * cos_theta,
            z: p.z,
        }
    }
    pub fn dice_point_normal(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> (Point3f, Normal3f) {
        let p: Point3f = self.dice_point(u, v, u_size, v_size);
        let theta: Float = radians(sweep(u, u_size, self.theta_min, self.theta_max));
        let (sin_theta, cos_theta) = theta.sin_cos();
        let dpdtheta: Vector3f = Vector3f {
            x: -p.y,
            y: p.x,
            z: 0.0,
        };
        let d: Vector3f = self.p2 - self.p1;
        let dpdv: Vector3f = Vector3f {
            x: d.x * cos_theta - d.y * sin_theta,
            y: d.x * sin_theta + d.y * cos_theta,
            z: d.z,
        };
        (p, Normal3f::from(vec3_cross_vec3(&dpdtheta, &dpdv)).normalize())
    }
    pub fn object_bound(&self) -> Bounds3f {
        let mut profile: Vec<Point3f> = vec![self.p1, self.p2];
        rotate_profile(&mut profile, self.theta_min);
        revolve_for_bound(
            &profile,
            &Point3f::default(),
            &Z_AXIS,
            radians(self.theta_max - self.theta_min),
        )
    }
    /// Halve theta (u) or the generating line at its midpoint (v).
    pub fn halve(&self, split_u: bool) -> (Hyperboloid, Hyperboloid) {
        let mut a: Hyperboloid = *self;
        let mut b: Hyperboloid = *self;
        if split_u {
            let theta_mid: Float = (self.theta_min + self.theta_max) * 0.5;
            a.theta_max = theta_mid;
            b.theta_min = theta_mid;
        } else {
            let mid: Point3f = (self.p1 + self.p2) * 0.5;
            a.p2 = mid;
            b.p1 = mid;
        }
        (a, b)
    }
}
