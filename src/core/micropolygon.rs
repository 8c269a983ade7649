//! Micropolygons are the flat quads a grid gets busted into. Corners
//! are in raster space, with the camera space depth kept in z.

// others
use smallvec::SmallVec;
// reyes
use crate::core::geometry::{bnd3_union_pnt3f, Bounds3f, Point3f};
use crate::core::reyes::Float;
use crate::core::spectrum::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct MpgQuad {
    pub p: [Point3f; 4],
    pub cs: Color,
    pub os: Color,
}

impl MpgQuad {
    pub fn bound(&self) -> Bounds3f {
        let mut b: Bounds3f = Bounds3f::default();
        for p in &self.p {
            b = bnd3_union_pnt3f(&b, p);
        }
        b
    }
}

/// A quad moving over a sequence of time keys.
#[derive(Debug, Clone, PartialEq)]
pub struct MpgMotion {
    pub keys: SmallVec<[(Float, [Point3f; 4]); 2]>,
    pub cs: Color,
    pub os: Color,
}

impl MpgMotion {
    pub fn new(cs: Color, os: Color) -> Self {
        MpgMotion {
            keys: SmallVec::new(),
            cs,
            os,
        }
    }
    pub fn append_key(&mut self, time: Float, p: [Point3f; 4]) {
        self.keys.push((time, p));
    }
    /// Bound over all keys.
    pub fn bound(&self) -> Bounds3f {
        let mut b: Bounds3f = Bounds3f::default();
        for (_time, corners) in &self.keys {
            for p in corners {
                b = bnd3_union_pnt3f(&b, p);
            }
        }
        b
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MicroPolygon {
    Static(MpgQuad),
    Motion(MpgMotion),
}

impl MicroPolygon {
    pub fn bound(&self) -> Bounds3f {
        match self {
            MicroPolygon::Static(quad) => quad.bound(),
            MicroPolygon::Motion(motion) => motion.bound(),
        }
    }
    /// Nearest camera space depth.
    pub fn depth(&self) -> Float {
        self.bound().p_min.z
    }
    pub fn color(&self) -> Color {
        match self {
            MicroPolygon::Static(quad) => quad.cs,
            MicroPolygon::Motion(motion) => motion.cs,
        }
    }
    pub fn opacity(&self) -> Color {
        match self {
            MicroPolygon::Static(quad) => quad.os,
            MicroPolygon::Motion(motion) => motion.os,
        }
    }
    pub fn n_keys(&self) -> usize {
        match self {
            MicroPolygon::Static(_) => 1,
            MicroPolygon::Motion(motion) => motion.keys.len(),
        }
    }
}
