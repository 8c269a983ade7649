//! The geometric families the dicer knows about. Each one can
//!
//! - evaluate a position (and normal) for integer grid indices,
//! - bound itself in object space,
//! - halve its parametric domain.
//!
//! ## Quadrics
//!
//! Sphere, cone, cylinder, hyperboloid, paraboloid, torus and disk are
//! surfaces of revolution about the z axis. Theta (in degrees) always
//! runs along u, v covers the profile (z, phi, radius or the
//! generating line).
//!
//! ## Points
//!
//! Point clouds have no parametric domain, they are diced into one
//! grid row of points and split at the median of a k-d tree.

pub mod cone;
pub mod cylinder;
pub mod disk;
pub mod hyperboloid;
pub mod paraboloid;
pub mod points;
pub mod sphere;
pub mod torus;

// reyes
use crate::core::geometry::{Bounds3f, Normal3f, Point3f, Vector3f};
use crate::core::reyes::{grid_fraction, lerp, Float};
use crate::shapes::cone::Cone;
use crate::shapes::cylinder::Cylinder;
use crate::shapes::disk::Disk;
use crate::shapes::hyperboloid::Hyperboloid;
use crate::shapes::paraboloid::Paraboloid;
use crate::shapes::points::Points;
use crate::shapes::sphere::Sphere;
use crate::shapes::torus::Torus;

pub const Z_AXIS: Vector3f = Vector3f {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Parameter value at grid index *i* of *size*, hitting *min* and
/// *max* exactly at both ends.
pub fn sweep(i: i32, size: i32, min: Float, max: Float) -> Float {
    lerp(grid_fraction(i, size), min, max)
}

#[derive(Clone)]
pub enum Shape {
    Sphere(Sphere),
    Cone(Cone),
    Cylinder(Cylinder),
    Hyperboloid(Hyperboloid),
    Paraboloid(Paraboloid),
    Torus(Torus),
    Disk(Disk),
    Points(Points),
}

impl Shape {
    pub fn is_quadric(&self) -> bool {
        match self {
            Shape::Points(_) => false,
            _ => true,
        }
    }
    /// Theta range in degrees, `None` for point clouds.
    pub fn theta_range(&self) -> Option<(Float, Float)> {
        match self {
            Shape::Sphere(s) => Some((s.theta_min, s.theta_max)),
            Shape::Cone(s) => Some((s.theta_min, s.theta_max)),
            Shape::Cylinder(s) => Some((s.theta_min, s.theta_max)),
            Shape::Hyperboloid(s) => Some((s.theta_min, s.theta_max)),
            Shape::Paraboloid(s) => Some((s.theta_min, s.theta_max)),
            Shape::Torus(s) => Some((s.theta_min, s.theta_max)),
            Shape::Disk(s) => Some((s.theta_min, s.theta_max)),
            Shape::Points(_) => None,
        }
    }
    /// Object space position at grid indices (*u*, *v*) of a
    /// `u_size x v_size` grid. Point clouds return their *u*-th point.
    pub fn dice_point(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> Point3f {
        match self {
            Shape::Sphere(s) => s.dice_point(u, v, u_size, v_size),
            Shape::Cone(s) => s.dice_point(u, v, u_size, v_size),
            Shape::Cylinder(s) => s.dice_point(u, v, u_size, v_size),
            Shape::Hyperboloid(s) => s.dice_point(u, v, u_size, v_size),
            Shape::Paraboloid(s) => s.dice_point(u, v, u_size, v_size),
            Shape::Torus(s) => s.dice_point(u, v, u_size, v_size),
            Shape::Disk(s) => s.dice_point(u, v, u_size, v_size),
            Shape::Points(s) => s.dice_point(u),
        }
    }
    /// Position and unit normal (zero where the surface degenerates).
    pub fn dice_point_normal(&self, u: i32, v: i32, u_size: i32, v_size: i32) -> (Point3f, Normal3f) {
        match self {
            Shape::Sphere(s) => s.dice_point_normal(u, v, u_size, v_size),
            Shape::Cone(s) => s.dice_point_normal(u, v, u_size, v_size),
            Shape::Cylinder(s) => s.dice_point_normal(u, v, u_size, v_size),
            Shape::Hyperboloid(s) => s.dice_point_normal(u, v, u_size, v_size),
            Shape::Paraboloid(s) => s.dice_point_normal(u, v, u_size, v_size),
            Shape::Torus(s) => s.dice_point_normal(u, v, u_size, v_size),
            Shape::Disk(s) => s.dice_point_normal(u, v, u_size, v_size),
            Shape::Points(s) => (
                s.dice_point(u),
                Normal3f {
                    x: 0.0,
                    y: 0.0,
                    z: 1.0,
                },
            ),
        }
    }
    pub fn object_bound(&self) -> Bounds3f {
        match self {
            Shape::Sphere(s) => s.object_bound(),
            Shape::Cone(s) => s.object_bound(),
            Shape::Cylinder(s) => s.object_bound(),
            Shape::Hyperboloid(s) => s.object_bound(),
            Shape::Paraboloid(s) => s.object_bound(),
            Shape::Torus(s) => s.object_bound(),
            Shape::Disk(s) => s.object_bound(),
            Shape::Points(s) => s.object_bound(),
        }
    }
    /// Two shapes which together cover exactly this one. Quadrics
    /// halve theta for *split_u*, their profile range otherwise.
    pub fn halve(&self, split_u: bool) -> (Shape, Shape) {
        match self {
            Shape::Sphere(s) => {
                let (a, b) = s.halve(split_u);
                (Shape::Sphere(a), Shape::Sphere(b))
            }
            Shape::Cone(s) => {
                let (a, b) = s.halve(split_u);
                (Shape::Cone(a), Shape::Cone(b))
            }
            Shape::Cylinder(s) => {
                let (a, b) = s.halve(split_u);
                (Shape::Cylinder(a), Shape::Cylinder(b))
            }
            Shape::Hyperboloid(s) => {
                let (a, b) = s.halve(split_u);
                (Shape::Hyperboloid(a), Shape::Hyperboloid(b))
            }
            Shape::Paraboloid(s) => {
                let (a, b) = s.halve(split_u);
                (Shape::Paraboloid(a), Shape::Paraboloid(b))
            }
            Shape::Torus(s) => {
                let (a, b) = s.halve(split_u);
                (Shape::Torus(a), Shape::Torus(b))
            }
            Shape::Disk(s) => {
                let (a, b) = s.halve(split_u);
                (Shape::Disk(a), Shape::Disk(b))
            }
            Shape::Points(s) => {
                let (a, b) = s.halve();
                (Shape::Points(a), Shape::Points(b))
            }
        }
    }
}
