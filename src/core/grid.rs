//! Micropolygon grids.
//!
//! A diced primitive ends up as a **MicroPolyGrid**: `(u_size + 1) x
//! (v_size + 1)` vertices, stored row-major with index `v * (u_size +
//! 1) + u`. Only the channels the attached shaders read (see
//! **Uses**) get filled. Channels holding a single value are uniform
//! across the grid.
//!
//! Busting a grid projects it to raster space (keeping the camera
//! space depth in z) and hands one micropolygon per cell (or per point
//! for point clouds) to a **MicroPolygonSink**.

// std
use std::str::FromStr;
// others
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
// reyes
use crate::core::bucket::MicroPolygonSink;
use crate::core::error::DiceError;
use crate::core::geometry::{Normal3f, Point3f, Vector3f};
use crate::core::micropolygon::{MicroPolygon, MpgMotion, MpgQuad};
use crate::core::parameters::{ParamClass, ParamValue};
use crate::core::reyes::Float;
use crate::core::spectrum::Color;
use crate::core::transform::Transform;

/// The standard shader variables a grid can carry.
#[derive(EnumString, EnumIter, Display, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum EnvVar {
    P = 0,
    N = 1,
    Ng = 2,
    Cs = 3,
    Os = 4,
    #[strum(serialize = "s")]
    S = 5,
    #[strum(serialize = "t")]
    T = 6,
    #[strum(serialize = "u")]
    U = 7,
    #[strum(serialize = "v")]
    V = 8,
}

impl EnvVar {
    fn bit(self) -> u32 {
        1_u32 << (self as u8)
    }
}

/// Bitmask of the variables a shader reads.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Uses {
    bits: u32,
}

impl Uses {
    pub fn none() -> Self {
        Uses { bits: 0 }
    }
    pub fn all() -> Self {
        EnvVar::iter().fold(Uses::none(), |uses, var| uses.with(var))
    }
    /// What a plain surface shader reads, every standard variable.
    pub fn standard() -> Self {
        Uses::all()
    }
    /// Build a mask from variable names (`"P"`, `"Cs"`, `"s"`, ...).
    pub fn from_names(names: &[&str]) -> Result<Self, DiceError> {
        let mut uses: Uses = Uses::none();
        for name in names {
            let var: EnvVar = EnvVar::from_str(name)
                .map_err(|_| DiceError::BadDeclaration(name.to_string()))?;
            uses = uses.with(var);
        }
        Ok(uses)
    }
    pub fn with(self, var: EnvVar) -> Self {
        Uses {
            bits: self.bits | var.bit(),
        }
    }
    pub fn uses(&self, var: EnvVar) -> bool {
        self.bits & var.bit() != 0
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum GridKind {
    Quadric,
    Points,
}

/// A user parameter spread across a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParameter {
    pub name: String,
    pub class: ParamClass,
    pub array_size: usize,
    pub value: ParamValue,
}

#[derive(Debug, Clone)]
pub struct MicroPolyGrid {
    pub kind: GridKind,
    pub u_size: i32,
    pub v_size: i32,
    pub uses: Uses,
    /// Camera space positions at the first time key.
    pub p: Vec<Point3f>,
    pub n: Vec<Normal3f>,
    pub ng: Vec<Normal3f>,
    pub s: Vec<Float>,
    pub t: Vec<Float>,
    pub u: Vec<Float>,
    pub v: Vec<Float>,
    pub cs: Vec<Color>,
    pub os: Vec<Color>,
    pub user: Vec<GridParameter>,
    /// Time and object-to-camera transform of every key, empty or a
    /// single key for static grids.
    pub motion_keys: SmallVec<[(Float, Transform); 2]>,
    /// Camera space positions of the keys after the first one.
    pub p_keys: Vec<Vec<Point3f>>,
    /// Object space widths, points only.
    pub widths: Vec<Float>,
}

impl MicroPolyGrid {
    pub fn new(kind: GridKind, u_size: i32, v_size: i32, uses: Uses) -> Self {
        MicroPolyGrid {
            kind,
            u_size: u_size.max(0),
            v_size: v_size.max(0),
            uses,
            p: Vec::new(),
            n: Vec::new(),
            ng: Vec::new(),
            s: Vec::new(),
            t: Vec::new(),
            u: Vec::new(),
            v: Vec::new(),
            cs: Vec::new(),
            os: Vec::new(),
            user: Vec::new(),
            motion_keys: SmallVec::new(),
            p_keys: Vec::new(),
            widths: Vec::new(),
        }
    }
    pub fn n_vertices(&self) -> usize {
        ((self.u_size + 1) * (self.v_size + 1)) as usize
    }
    pub fn index(&self, u: i32, v: i32) -> usize {
        (v * (self.u_size + 1) + u) as usize
    }
    pub fn is_moving(&self) -> bool {
        self.motion_keys.len() > 1
    }
    /// Attach a user parameter. Varying values need one element group
    /// per vertex, everything else a single group.
    pub fn set_user_parameter(
        &mut self,
        name: &str,
        class: ParamClass,
        array_size: usize,
        value: ParamValue,
    ) -> Result<(), DiceError> {
        let expected: usize = if class.is_varying() {
            self.n_vertices() * array_size
        } else {
            array_size
        };
        if value.len() != expected {
            return Err(DiceError::GridSizeMismatch {
                name: name.to_string(),
                expected,
                found: value.len(),
            });
        }
        self.user.push(GridParameter {
            name: name.to_string(),
            class,
            array_size,
            value,
        });
        Ok(())
    }
    pub fn user_parameter(&self, name: &str) -> Option<&GridParameter> {
        self.user.iter().find(|p| p.name == name)
    }
    fn color_at(colors: &[Color], i: usize) -> Color {
        match colors.len() {
            0 => Color::new(1.0 as Float),
            1 => colors[0],
            _ => colors[i.min(colors.len() - 1)],
        }
    }
    /// Positions of every time key (first key included).
    fn key_positions(&self) -> Vec<&[Point3f]> {
        let mut keys: Vec<&[Point3f]> = Vec::with_capacity(1 + self.p_keys.len());
        keys.push(&self.p[..]);
        for p in &self.p_keys {
            keys.push(&p[..]);
        }
        keys
    }
    fn key_time(&self, index: usize) -> Float {
        self.motion_keys
            .get(index)
            .map(|(time, _)| *time)
            .unwrap_or(0.0 as Float)
    }
    /// Project the grid and emit its micropolygons, returns how many
    /// were emitted.
    pub fn bust(&self, camera_to_raster: &Transform, sink: &mut dyn MicroPolygonSink) -> usize {
        match self.kind {
            GridKind::Quadric => self.bust_quads(camera_to_raster, sink),
            GridKind::Points => self.bust_points(camera_to_raster, sink),
        }
    }
    fn bust_quads(&self, camera_to_raster: &Transform, sink: &mut dyn MicroPolygonSink) -> usize {
        if self.p.len() != self.n_vertices() || self.u_size == 0 || self.v_size == 0 {
            return 0;
        }
        let raster_keys: Vec<Vec<Point3f>> = self
            .key_positions()
            .iter()
            .map(|positions| {
                positions
                    .iter()
                    .map(|pc| project_keep_depth(camera_to_raster, pc))
                    .collect()
            })
            .collect();
        let mut emitted: usize = 0;
        for v in 0..self.v_size {
            for u in 0..self.u_size {
                let corners: [usize; 4] = [
                    self.index(u, v),
                    self.index(u + 1, v),
                    self.index(u + 1, v + 1),
                    self.index(u, v + 1),
                ];
                let cs: Color = MicroPolyGrid::color_at(&self.cs, corners[0]);
                let os: Color = MicroPolyGrid::color_at(&self.os, corners[0]);
                let quad = |raster: &Vec<Point3f>| -> [Point3f; 4] {
                    [
                        raster[corners[0]],
                        raster[corners[1]],
                        raster[corners[2]],
                        raster[corners[3]],
                    ]
                };
                if raster_keys.len() > 1 {
                    let mut mpg: MpgMotion = MpgMotion::new(cs, os);
                    for (i, raster) in raster_keys.iter().enumerate() {
                        mpg.append_key(self.key_time(i), quad(raster));
                    }
                    sink.add_micro_polygon(MicroPolygon::Motion(mpg));
                } else {
                    sink.add_micro_polygon(MicroPolygon::Static(MpgQuad {
                        p: quad(&raster_keys[0]),
                        cs,
                        os,
                    }));
                }
                emitted += 1;
            }
        }
        emitted
    }
    fn bust_points(&self, camera_to_raster: &Transform, sink: &mut dyn MicroPolygonSink) -> usize {
        let keys: Vec<&[Point3f]> = self.key_positions();
        let mut emitted: usize = 0;
        for i in 0..self.p.len() {
            let width: Float = match self.widths.len() {
                0 => 1.0 as Float,
                1 => self.widths[0],
                _ => self.widths[i.min(self.widths.len() - 1)],
            };
            let cs: Color = MicroPolyGrid::color_at(&self.cs, i);
            let os: Color = MicroPolyGrid::color_at(&self.os, i);
            if keys.len() > 1 {
                let mut mpg: MpgMotion = MpgMotion::new(cs, os);
                for (k, positions) in keys.iter().enumerate() {
                    let object_to_camera: Transform = self
                        .motion_keys
                        .get(k)
                        .map(|(_, xform)| *xform)
                        .unwrap_or_default();
                    mpg.append_key(
                        self.key_time(k),
                        point_quad(camera_to_raster, &object_to_camera, &positions[i], width),
                    );
                }
                sink.add_micro_polygon(MicroPolygon::Motion(mpg));
            } else {
                let object_to_camera: Transform = self
                    .motion_keys
                    .first()
                    .map(|(_, xform)| *xform)
                    .unwrap_or_default();
                sink.add_micro_polygon(MicroPolygon::Static(MpgQuad {
                    p: point_quad(camera_to_raster, &object_to_camera, &self.p[i], width),
                    cs,
                    os,
                }));
            }
            emitted += 1;
        }
        emitted
    }
}

/// Camera to raster, with z left at the camera space depth.
pub fn project_keep_depth(camera_to_raster: &Transform, pc: &Point3f) -> Point3f {
    let mut pr: Point3f = camera_to_raster.transform_point(pc);
    pr.z = pc.z;
    pr
}

/// The square a point of the given object space width covers in raster
/// space.
fn point_quad(
    camera_to_raster: &Transform,
    object_to_camera: &Transform,
    pc: &Point3f,
    width: Float,
) -> [Point3f; 4] {
    let center: Point3f = project_keep_depth(camera_to_raster, pc);
    // a horizontal object space vector of length width, carried into
    // camera space the way normals are so non-uniform scales measure
    // correctly
    let po: Point3f = Transform::inverse(object_to_camera).transform_point(pc);
    let horiz: Vector3f = Vector3f::from(object_to_camera.transform_normal(&Normal3f {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    }));
    let horiz: Vector3f = horiz.normalize() * width;
    let camera_width: Float =
        (object_to_camera.transform_point(&(po + horiz)) - object_to_camera.transform_point(&po))
            .length();
    let edge: Point3f = project_keep_depth(
        camera_to_raster,
        &(*pc
            + Vector3f {
                x: camera_width,
                y: 0.0,
                z: 0.0,
            }),
    );
    let r: Float = (edge - center).length() * 0.5 as Float;
    [
        Point3f {
            x: center.x - r,
            y: center.y - r,
            z: center.z,
        },
        Point3f {
            x: center.x + r,
            y: center.y - r,
            z: center.z,
        },
        Point3f {
            x: center.x + r,
            y: center.y + r,
            z: center.z,
        },
        Point3f {
            x: center.x - r,
            y: center.y + r,
            z: center.z,
        },
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn uses_mask() {
        let uses = Uses::none().with(EnvVar::P).with(EnvVar::S);
        assert!(uses.uses(EnvVar::P));
        assert!(uses.uses(EnvVar::S));
        assert!(!uses.uses(EnvVar::Cs));
        assert_eq!(Uses::from_names(&["P", "s"]).unwrap(), uses);
        assert!(Uses::from_names(&["Q"]).is_err());
        assert!(Uses::standard().uses(EnvVar::Ng));
    }

    #[test]
    fn user_parameter_size_is_checked() {
        let mut grid = MicroPolyGrid::new(GridKind::Quadric, 2, 1, Uses::all());
        assert_eq!(grid.n_vertices(), 6);
        assert!(grid
            .set_user_parameter(
                "roughness",
                ParamClass::Varying,
                1,
                ParamValue::Float(vec![0.0; 5])
            )
            .is_err());
        assert!(grid
            .set_user_parameter(
                "roughness",
                ParamClass::Varying,
                1,
                ParamValue::Float(vec![0.0; 6])
            )
            .is_ok());
        assert!(grid
            .set_user_parameter("Kd", ParamClass::Uniform, 1, ParamValue::Float(vec![0.5]))
            .is_ok());
    }

    #[test]
    fn bust_emits_one_quad_per_cell() {
        let mut grid = MicroPolyGrid::new(GridKind::Quadric, 2, 2, Uses::all());
        for v in 0..3 {
            for u in 0..3 {
                grid.p.push(Point3f {
                    x: u as Float,
                    y: v as Float,
                    z: 5.0,
                });
            }
        }
        let mut sink: Vec<MicroPolygon> = Vec::new();
        assert_eq!(grid.bust(&Transform::default(), &mut sink), 4);
        assert_eq!(sink.len(), 4);
        match &sink[3] {
            MicroPolygon::Static(quad) => {
                assert_eq!(quad.p[0], Point3f { x: 1.0, y: 1.0, z: 5.0 });
                assert_eq!(quad.p[2], Point3f { x: 2.0, y: 2.0, z: 5.0 });
            }
            _ => panic!("expected a static quad"),
        }
    }

    #[test]
    fn point_quads_are_centered() {
        let mut grid = MicroPolyGrid::new(GridKind::Points, 1, 0, Uses::all());
        grid.p = vec![
            Point3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            Point3f {
                x: 4.0,
                y: 2.0,
                z: 1.0,
            },
        ];
        grid.widths = vec![2.0];
        let mut sink: Vec<MicroPolygon> = Vec::new();
        assert_eq!(grid.bust(&Transform::default(), &mut sink), 2);
        match &sink[1] {
            MicroPolygon::Static(quad) => {
                assert!((quad.p[0].x - 3.0).abs() < 1e-5);
                assert!((quad.p[0].y - 1.0).abs() < 1e-5);
                assert!((quad.p[2].x - 5.0).abs() < 1e-5);
                assert!((quad.p[2].y - 3.0).abs() < 1e-5);
            }
            _ => panic!("expected a static quad"),
        }
    }
}
