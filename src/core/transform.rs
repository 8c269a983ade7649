//! Transformations map points, vectors and normals from one
//! coordinate space to another.
//!
//! # 4 x 4 Matrices
//!
//! The **Matrix4x4** structure provides a low-level representation of
//! 4 x 4 matrices. It is an integral part of the **Transform** class.
//!
//! # Transformations
//!
//! In general a transformation is a mapping from points to points
//! and from vectors to vectors. A **Transform** keeps its matrix and
//! the inverse of it, normals are transformed by the transpose of
//! the inverse.
//!
//! ```rust
//! use rs_reyes::core::geometry::Vector3f;
//! use rs_reyes::core::transform::Transform;
//!
//!     let t = Transform::translate(&Vector3f { x: 0.0, y: 0.0, z: 5.0 });
//!     let s = Transform::scale(2.0, 2.0, 2.0);
//!     let object_to_world = t * s;
//!
//!     println!("object_to_world = {:?}", object_to_world);
//! ```
//!
//! # Motion
//!
//! A **MotionTransform** is a list of keyframes (time and
//! object-to-world transform). Primitives with more than one key are
//! moving, their bounds get widened by the bound at every key.

// std
use std::ops;
use std::ops::Mul;
// others
use smallvec::SmallVec;
// reyes
use crate::core::geometry::bnd3_union_pnt3f;
use crate::core::geometry::{Bounds3f, Normal3f, Point3f, Vector3f};
use crate::core::reyes::radians;
use crate::core::reyes::Float;

#[derive(Debug, Copy, Clone)]
pub struct Matrix4x4 {
    pub m: [[Float; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Matrix4x4 {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

impl Matrix4x4 {
    pub fn new(
        t00: Float,
        t01: Float,
        t02: Float,
        t03: Float,
        t10: Float,
        t11: Float,
        t12: Float,
        t13: Float,
        t20: Float,
        t21: Float,
        t22: Float,
        t23: Float,
        t30: Float,
        t31: Float,
        t32: Float,
        t33: Float,
    ) -> Self {
        Matrix4x4 {
            m: [
                [t00, t01, t02, t03],
                [t10, t11, t12, t13],
                [t20, t21, t22, t23],
                [t30, t31, t32, t33],
            ],
        }
    }
    /// Build a matrix from 16 floats in row-major order.
    pub fn from_slice(v: &[Float]) -> Self {
        let mut r: Matrix4x4 = Matrix4x4::default();
        for (i, value) in v.iter().take(16).enumerate() {
            r.m[i / 4][i % 4] = *value;
        }
        r
    }
    pub fn transpose(m: &Matrix4x4) -> Matrix4x4 {
        Matrix4x4 {
            m: [
                [m.m[0][0], m.m[1][0], m.m[2][0], m.m[3][0]],
                [m.m[0][1], m.m[1][1], m.m[2][1], m.m[3][1]],
                [m.m[0][2], m.m[1][2], m.m[2][2], m.m[3][2]],
                [m.m[0][3], m.m[1][3], m.m[2][3], m.m[3][3]],
            ],
        }
    }
    /// Gauss-Jordan elimination with full pivoting. Returns `None`
    /// for a singular matrix.
    pub fn inverse(m: &Matrix4x4) -> Option<Matrix4x4> {
        let mut indxc: [usize; 4] = [0; 4];
        let mut indxr: [usize; 4] = [0; 4];
        let mut ipiv: [usize; 4] = [0; 4];
        let mut minv: Matrix4x4 = *m;
        for i in 0..4 {
            let mut irow = 0;
            let mut icol = 0;
            let mut big: Float = 0.0;
            // choose pivot
            for j in 0..4 {
                if ipiv[j] != 1 {
                    for (k, item) in ipiv.iter().enumerate() {
                        if *item == 0 {
                            let abs: Float = (minv.m[j][k]).abs();
                            if abs >= big {
                                big = abs;
                                irow = j;
                                icol = k;
                            }
                        } else if *item > 1 {
                            return None;
                        }
                    }
                }
            }
            ipiv[icol] += 1;
            // swap rows _irow_ and _icol_ for pivot
            if irow != icol {
                minv.m.swap(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if minv.m[icol][icol] == 0.0 {
                return None;
            }
            // set $m[icol][icol]$ to one by scaling row _icol_ appropriately
            let pivinv: Float = 1.0 / minv.m[icol][icol];
            minv.m[icol][icol] = 1.0;
            for j in 0..4 {
                minv.m[icol][j] *= pivinv;
            }
            // subtract this row from others to zero out their columns
            for j in 0..4 {
                if j != icol {
                    let save: Float = minv.m[j][icol];
                    minv.m[j][icol] = 0.0;
                    for k in 0..4 {
                        minv.m[j][k] -= minv.m[icol][k] * save;
                    }
                }
            }
        }
        // swap columns to reflect permutation
        for i in 0..4 {
            let j = 3 - i;
            if indxr[j] != indxc[j] {
                for k in 0..4 {
                    minv.m[k].swap(indxr[j], indxc[j])
                }
            }
        }
        Some(minv)
    }
}

impl PartialEq for Matrix4x4 {
    fn eq(&self, rhs: &Matrix4x4) -> bool {
        for i in 0..4 {
            for j in 0..4 {
                if self.m[i][j] != rhs.m[i][j] {
                    return false;
                }
            }
        }
        true
    }
}

// componentwise, used to interpolate matrix parameters across grids
impl_op_ex!(+|a: &Matrix4x4, b: &Matrix4x4| -> Matrix4x4 {
    let mut r: Matrix4x4 = *a;
    for i in 0..4 {
        for j in 0..4 {
            r.m[i][j] += b.m[i][j];
        }
    }
    r
});

impl_op_ex!(*|a: &Matrix4x4, b: Float| -> Matrix4x4 {
    let mut r: Matrix4x4 = *a;
    for row in r.m.iter_mut() {
        for value in row.iter_mut() {
            *value *= b;
        }
    }
    r
});

/// The product of two matrices.
pub fn mtx_mul(m1: &Matrix4x4, m2: &Matrix4x4) -> Matrix4x4 {
    let mut r: Matrix4x4 = Matrix4x4::default();
    for i in 0..4 {
        for j in 0..4 {
            r.m[i][j] = m1.m[i][0] * m2.m[0][j]
                + m1.m[i][1] * m2.m[1][j]
                + m1.m[i][2] * m2.m[2][j]
                + m1.m[i][3] * m2.m[3][j];
        }
    }
    r
}

#[derive(Debug, Copy, Clone)]
pub struct Transform {
    pub m: Matrix4x4,
    pub m_inv: Matrix4x4,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            m: Matrix4x4::default(),
            m_inv: Matrix4x4::default(),
        }
    }
}

impl Transform {
    /// Wrap a matrix, computing its inverse. A singular matrix gets an
    /// identity inverse (it can still transform points, but normals
    /// transformed by it are meaningless).
    pub fn from_matrix(m: Matrix4x4) -> Self {
        let m_inv: Matrix4x4 = Matrix4x4::inverse(&m).unwrap_or_default();
        Transform { m, m_inv }
    }
    pub fn inverse(t: &Transform) -> Transform {
        Transform {
            m: t.m_inv,
            m_inv: t.m,
        }
    }
    /// Transposed inverse, the matrix used to carry normals.
    pub fn inverse_transpose(t: &Transform) -> Transform {
        Transform {
            m: Matrix4x4::transpose(&t.m_inv),
            m_inv: Matrix4x4::transpose(&t.m),
        }
    }
    pub fn translate(delta: &Vector3f) -> Transform {
        Transform {
            m: Matrix4x4::new(
                1.0, 0.0, 0.0, delta.x, 0.0, 1.0, 0.0, delta.y, 0.0, 0.0, 1.0, delta.z, 0.0, 0.0,
                0.0, 1.0,
            ),
            m_inv: Matrix4x4::new(
                1.0, 0.0, 0.0, -delta.x, 0.0, 1.0, 0.0, -delta.y, 0.0, 0.0, 1.0, -delta.z, 0.0,
                0.0, 0.0, 1.0,
            ),
        }
    }
    pub fn scale(x: Float, y: Float, z: Float) -> Transform {
        Transform {
            m: Matrix4x4::new(
                x, 0.0, 0.0, 0.0, 0.0, y, 0.0, 0.0, 0.0, 0.0, z, 0.0, 0.0, 0.0, 0.0, 1.0,
            ),
            m_inv: Matrix4x4::new(
                1.0 / x,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0 / y,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0 / z,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0,
            ),
        }
    }
    /// Rotation about the z axis, *theta* in degrees.
    pub fn rotate_z(theta: Float) -> Transform {
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let m = Matrix4x4::new(
            cos_theta, -sin_theta, 0.0, 0.0, sin_theta, cos_theta, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    /// Rotation about an arbitrary axis, *theta* in degrees.
    pub fn rotate(theta: Float, axis: &Vector3f) -> Transform {
        let a: Vector3f = axis.normalize();
        let sin_theta: Float = radians(theta).sin();
        let cos_theta: Float = radians(theta).cos();
        let mut m = Matrix4x4::default();
        // compute rotation of first basis vector
        m.m[0][0] = a.x * a.x + (1.0 - a.x * a.x) * cos_theta;
        m.m[0][1] = a.x * a.y * (1.0 - cos_theta) - a.z * sin_theta;
        m.m[0][2] = a.x * a.z * (1.0 - cos_theta) + a.y * sin_theta;
        m.m[0][3] = 0.0;
        // compute rotations of second basis vectors
        m.m[1][0] = a.x * a.y * (1.0 - cos_theta) + a.z * sin_theta;
        m.m[1][1] = a.y * a.y + (1.0 - a.y * a.y) * cos_theta;
        m.m[1][2] = a.y * a.z * (1.0 - cos_theta) - a.x * sin_theta;
        m.m[1][3] = 0.0;
        // compute rotations of third basis vectors
        m.m[2][0] = a.x * a.z * (1.0 - cos_theta) - a.y * sin_theta;
        m.m[2][1] = a.y * a.z * (1.0 - cos_theta) + a.x * sin_theta;
        m.m[2][2] = a.z * a.z + (1.0 - a.z * a.z) * cos_theta;
        m.m[2][3] = 0.0;
        Transform {
            m,
            m_inv: Matrix4x4::transpose(&m),
        }
    }
    /// RenderMan style perspective projection: camera space looks
    /// down +z, x and y get divided by z and scaled by the field of
    /// view, z maps from *n*..*f* to 0..1.
    pub fn perspective(fov: Float, n: Float, f: Float) -> Transform {
        // perform projective divide for perspective projection
        let persp = Matrix4x4::new(
            1.0,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
            0.0,
            0.0,
            0.0,
            f / (f - n),
            -f * n / (f - n),
            0.0,
            0.0,
            1.0,
            0.0,
        );
        // scale canonical perspective view to specified field of view
        let inv_tan_ang: Float = 1.0 / (radians(fov) / 2.0).tan();
        let scale: Transform = Transform::scale(inv_tan_ang, inv_tan_ang, 1.0);
        scale * Transform::from_matrix(persp)
    }
    pub fn orthographic(z_near: Float, z_far: Float) -> Transform {
        let translate: Transform = Transform::translate(&Vector3f {
            x: 0.0,
            y: 0.0,
            z: -z_near,
        });
        let scale: Transform = Transform::scale(1.0, 1.0, 1.0 / (z_far - z_near));
        scale * translate
    }
    /// Transform a point, dividing by the homogeneous coordinate. A
    /// point on the projection plane (w == 0) is returned undivided.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let x: Float = p.x;
        let y: Float = p.y;
        let z: Float = p.z;
        let xp: Float =
            self.m.m[0][0] * x + self.m.m[0][1] * y + self.m.m[0][2] * z + self.m.m[0][3];
        let yp: Float =
            self.m.m[1][0] * x + self.m.m[1][1] * y + self.m.m[1][2] * z + self.m.m[1][3];
        let zp: Float =
            self.m.m[2][0] * x + self.m.m[2][1] * y + self.m.m[2][2] * z + self.m.m[2][3];
        let wp: Float =
            self.m.m[3][0] * x + self.m.m[3][1] * y + self.m.m[3][2] * z + self.m.m[3][3];
        if wp == 1.0 as Float || wp == 0.0 as Float {
            Point3f {
                x: xp,
                y: yp,
                z: zp,
            }
        } else {
            let inv: Float = 1.0 as Float / wp;
            Point3f {
                x: inv * xp,
                y: inv * yp,
                z: inv * zp,
            }
        }
    }
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let x: Float = v.x;
        let y: Float = v.y;
        let z: Float = v.z;
        Vector3f {
            x: self.m.m[0][0] * x + self.m.m[0][1] * y + self.m.m[0][2] * z,
            y: self.m.m[1][0] * x + self.m.m[1][1] * y + self.m.m[1][2] * z,
            z: self.m.m[2][0] * x + self.m.m[2][1] * y + self.m.m[2][2] * z,
        }
    }
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        let x: Float = n.x;
        let y: Float = n.y;
        let z: Float = n.z;
        Normal3f {
            x: self.m_inv.m[0][0] * x + self.m_inv.m[1][0] * y + self.m_inv.m[2][0] * z,
            y: self.m_inv.m[0][1] * x + self.m_inv.m[1][1] * y + self.m_inv.m[2][1] * z,
            z: self.m_inv.m[0][2] * x + self.m_inv.m[1][2] * y + self.m_inv.m[2][2] * z,
        }
    }
    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        if b.is_empty() {
            return *b;
        }
        let mut ret: Bounds3f = Bounds3f::default();
        for corner in 0..8_u8 {
            ret = bnd3_union_pnt3f(&ret, &self.transform_point(&b.corner(corner)));
        }
        ret
    }
}

impl PartialEq for Transform {
    fn eq(&self, rhs: &Transform) -> bool {
        rhs.m == self.m && rhs.m_inv == self.m_inv
    }
}

impl Mul for Transform {
    type Output = Transform;
    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            m: mtx_mul(&self.m, &rhs.m),
            m_inv: mtx_mul(&rhs.m_inv, &self.m_inv),
        }
    }
}

/// Object-to-world keyframes of a primitive. A single key means the
/// primitive is not moving.
#[derive(Debug, Clone)]
pub struct MotionTransform {
    pub keys: SmallVec<[(Float, Transform); 2]>,
}

impl Default for MotionTransform {
    fn default() -> Self {
        MotionTransform::new(Transform::default())
    }
}

impl MotionTransform {
    pub fn new(object_to_world: Transform) -> Self {
        let mut keys: SmallVec<[(Float, Transform); 2]> = SmallVec::new();
        keys.push((0.0 as Float, object_to_world));
        MotionTransform { keys }
    }
    /// Add (or replace) the key at *time*, keeping keys ordered by
    /// time.
    pub fn add_key(&mut self, time: Float, object_to_world: Transform) {
        match self
            .keys
            .iter()
            .position(|(t, _)| *t >= time)
        {
            Some(i) if self.keys[i].0 == time => self.keys[i].1 = object_to_world,
            Some(i) => self.keys.insert(i, (time, object_to_world)),
            None => self.keys.push((time, object_to_world)),
        }
    }
    pub fn n_times(&self) -> usize {
        self.keys.len()
    }
    pub fn is_moving(&self) -> bool {
        self.keys.len() > 1
    }
    /// Object-to-world at the given key index.
    pub fn object_to_world(&self, index: usize) -> Transform {
        self.keys[index.min(self.keys.len() - 1)].1
    }
    /// Extend a bound, given in the space *world_to_space* maps to (at
    /// key 0), so that it contains the same box carried along to every
    /// other key.
    pub fn motion_bounds(&self, b: &Bounds3f, world_to_space: &Transform) -> Bounds3f {
        let mut ret: Bounds3f = *b;
        if !self.is_moving() {
            return ret;
        }
        let space_to_object0: Transform =
            Transform::inverse(&(*world_to_space * self.keys[0].1));
        for (_time, object_to_world) in self.keys.iter().skip(1) {
            let delta: Transform = *world_to_space * *object_to_world * space_to_object0;
            let moved: Bounds3f = delta.transform_bounds(b);
            for corner in 0..8_u8 {
                ret = bnd3_union_pnt3f(&ret, &moved.corner(corner));
            }
        }
        ret
    }
}
