//! Helpers shared by all quadric shapes: bounding a surface of
//! revolution and estimating how finely a surface has to be diced.
//!
//! # Bounds
//!
//! A quadric is the revolution of a profile curve about the z axis.
//! The profile (a circular arc for spheres and tori, a straight
//! segment for cones, cylinders, disks and hyperboloids) gets swept
//! through the theta range in exactly four arcs. Every arc is
//! replaced by its two end points plus the intersection of the end
//! tangents, the resulting control points contain the arc and the
//! box around them contains the surface.
//!
//! # Dice size estimation
//!
//! The surface is sampled on a coarse probe grid, projected to raster
//! space and the longest edge in u and in v decides how many
//! micropolygons are needed to hit the shading rate.

// std
use std::mem;
// reyes
use crate::core::geometry::{pnt3_distance_squared_xy, vec3_cross_vec3, vec3_dot_vec3f};
use crate::core::geometry::{Bounds3f, Point3f, Vector3f};
use crate::core::reyes::{clamp_t, round_up_pow2_32, Float};
use crate::core::reyes::{DEGENERATE_RADIUS, ESTIMATE_GRID_SIZE, TWO_PI};
use crate::core::transform::Transform;

/// Number of arcs a sweep gets split into for bounding.
const N_ARCS: usize = 4;
/// Tangents closer to parallel than this don't get intersected.
const PARALLEL_EPSILON: Float = 1.0e-7;
/// Upper limit for a single estimated dice size.
const MAX_DICE_SIZE: i32 = 1 << 24;

/// Intersect two (coplanar) lines given by a point and a direction.
/// Returns `None` if they are (nearly) parallel.
pub fn intersect_line(p1: &Point3f, t1: &Vector3f, p2: &Point3f, t2: &Vector3f) -> Option<Point3f> {
    let d: Vector3f = *p1 - *p2;
    // perpendicular to the first line, within the plane of both
    let v: Vector3f = vec3_cross_vec3(&vec3_cross_vec3(t1, &d), t1).normalize();
    let vw: Float = vec3_dot_vec3f(&v, &t2.normalize());
    if vw * vw < PARALLEL_EPSILON {
        return None;
    }
    let s: Float = vec3_dot_vec3f(&d, &v) / vec3_dot_vec3f(t2, &v);
    Some(*p2 + *t2 * s)
}

/// Project a point onto the line through *s* with direction *t*. A
/// zero direction gives back the line origin.
pub fn project_to_line(s: &Point3f, t: &Vector3f, p: &Point3f) -> Point3f {
    let denom: Float = t.length_squared();
    if denom == 0.0 as Float {
        return *s;
    }
    let fraction: Float = vec3_dot_vec3f(t, &(*p - *s)) / denom;
    *s + *t * fraction
}

/// Control points of a circular arc around *o* in the plane spanned
/// by *x* and *y*, from angle *a_start* to *a_end* (radians). The
/// sweep covers at most a full circle and is always split into four
/// arcs.
pub fn circle(
    o: &Point3f,
    x: &Vector3f,
    y: &Vector3f,
    r: Float,
    a_start: Float,
    a_end: Float,
) -> Vec<Point3f> {
    let a_min: Float = a_start.min(a_end);
    let a_max: Float = a_start.max(a_end).min(a_min + TWO_PI);
    let dtheta: Float = (a_max - a_min) / N_ARCS as Float;
    let point_at = |angle: Float| -> Point3f { *o + *x * (r * angle.cos()) + *y * (r * angle.sin()) };
    let tangent_at = |angle: Float| -> Vector3f { *x * -angle.sin() + *y * angle.cos() };
    let mut points: Vec<Point3f> = Vec::with_capacity(2 * N_ARCS + 1);
    let mut p0: Point3f = point_at(a_min);
    let mut t0: Vector3f = tangent_at(a_min);
    points.push(p0);
    for i in 1..=N_ARCS {
        let angle: Float = a_min + dtheta * i as Float;
        let p2: Point3f = point_at(angle);
        let t2: Vector3f = tangent_at(angle);
        if let Some(p1) = intersect_line(&p0, &t0, &p2, &t2) {
            points.push(p1);
        }
        points.push(p2);
        p0 = p2;
        t0 = t2;
    }
    points
}

/// Bound of the surface swept by revolving *profile* about the axis
/// through *s* along *t*, through *theta* radians (clamped to a full
/// turn either way).
pub fn revolve_for_bound(profile: &[Point3f], s: &Point3f, t: &Vector3f, theta: Float) -> Bounds3f {
    let mut bound: Bounds3f = Bounds3f::default();
    let theta: Float = clamp_t(theta, -TWO_PI, TWO_PI);
    let dtheta: Float = theta / N_ARCS as Float;
    let mut cosines: [Float; N_ARCS + 1] = [1.0; N_ARCS + 1];
    let mut sines: [Float; N_ARCS + 1] = [0.0; N_ARCS + 1];
    for i in 1..=N_ARCS {
        let angle: Float = dtheta * i as Float;
        cosines[i] = angle.cos();
        sines[i] = angle.sin();
    }
    let axis: Vector3f = t.normalize();
    for pj in profile {
        let o: Point3f = project_to_line(s, t, pj);
        let x: Vector3f = *pj - o;
        let r: Float = x.length();
        if r < DEGENERATE_RADIUS {
            bound.encapsulate(&o);
            continue;
        }
        let x: Vector3f = x.normalize();
        let y: Vector3f = vec3_cross_vec3(&axis, &x).normalize();
        let mut p0: Point3f = *pj;
        let mut t0: Vector3f = y;
        bound.encapsulate(&p0);
        for i in 1..=N_ARCS {
            let p2: Point3f = o + x * (r * cosines[i]) + y * (r * sines[i]);
            let t2: Vector3f = x * -sines[i] + y * cosines[i];
            bound.encapsulate(&p2);
            if let Some(p1) = intersect_line(&p0, &t0, &p2, &t2) {
                bound.encapsulate(&p1);
            }
            p0 = p2;
            t0 = t2;
        }
    }
    bound
}

/// Rotate profile points about the z axis by *theta_min* degrees.
pub fn rotate_profile(profile: &mut Vec<Point3f>, theta_min: Float) {
    let rot: Transform = Transform::rotate_z(theta_min);
    for p in profile.iter_mut() {
        *p = rot.transform_point(p);
    }
}

/// Dice sizes for a surface given by *dice_point*, which gets called
/// with probe grid indices `0..=ESTIMATE_GRID_SIZE` (as if diced at
/// that size) and returns object space points.
pub fn estimate_grid_size<F>(
    dice_point: F,
    object_to_raster: &Transform,
    shading_rate_sqrt: Float,
    binary: bool,
) -> (i32, i32)
where
    F: Fn(i32, i32) -> Point3f,
{
    let n: i32 = ESTIMATE_GRID_SIZE;
    let mut max_u: Float = 0.0;
    let mut max_v: Float = 0.0;
    let mut previous: Vec<Point3f> = Vec::with_capacity((n + 1) as usize);
    let mut current: Vec<Point3f> = Vec::with_capacity((n + 1) as usize);
    for v in 0..=n {
        current.clear();
        for u in 0..=n {
            let p: Point3f = object_to_raster.transform_point(&dice_point(u, v));
            // first row and column have no previous sample
            if u >= 1 {
                max_u = max_u.max(pnt3_distance_squared_xy(&p, &current[(u - 1) as usize]));
            }
            if v >= 1 {
                max_v = max_v.max(pnt3_distance_squared_xy(&p, &previous[u as usize]));
            }
            current.push(p);
        }
        mem::swap(&mut previous, &mut current);
    }
    let size = |max_sq: Float| -> i32 {
        let size: Float = (n as Float * max_sq.sqrt() / shading_rate_sqrt).round();
        let size: i32 = clamp_t(size, 1.0 as Float, MAX_DICE_SIZE as Float) as i32;
        if binary {
            round_up_pow2_32(size)
        } else {
            size
        }
    };
    (size(max_u), size(max_v))
}
