//! A **Primitive** is a shape plus everything it shares with its split
//! children (attributes, transform and primitive variables) and the
//! state the dicing pipeline keeps about it.
//!
//! Every primitive goes through the same steps:
//!
//! 1. **cull()** bounds it in camera space and drops it if it can't
//!    be seen. A primitive spanning the eye plane is flagged as not
//!    diceable and will be split until its pieces clear the plane.
//! 2. **diceable()** estimates the dice sizes and decides if the grid
//!    would be small enough.
//! 3. **dice()** fills a grid, or **split()** halves the primitive and
//!    the children start again at step 1.

// std
use std::sync::Arc;
// others
use tracing::warn;
// reyes
use crate::core::context::RenderContext;
use crate::core::error::DiceError;
use crate::core::geometry::{bnd2_union_pnt3, Bounds2f, Bounds3f, Normal3f, Point3f};
use crate::core::grid::{EnvVar, GridKind, MicroPolyGrid, Uses};
use crate::core::parameters::{ParamClass, ParamValue, Parameter, PrimitiveVariables};
use crate::core::paramset::Attributes;
use crate::core::reyes::{Float, ESTIMATE_GRID_SIZE, TOO_LARGE_QUADS};
use crate::core::shape::estimate_grid_size;
use crate::core::spectrum::Color;
use crate::core::stats::Statistics;
use crate::core::transform::{MotionTransform, Transform};
use crate::shapes::points::Points;
use crate::shapes::Shape;

/// Names the dicer fills itself, everything else is a user parameter.
const STANDARD_NAMES: [&str; 10] = ["P", "Pw", "N", "Cs", "Os", "s", "t", "u", "v", "st"];

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SplitDir {
    U,
    V,
}

/// State shared by all primitive types.
#[derive(Clone)]
pub struct SurfaceCommon {
    pub attributes: Arc<Attributes>,
    pub transform: Arc<MotionTransform>,
    /// Object to camera at the first time key.
    pub object_to_camera: Transform,
    pub u_dice_size: i32,
    pub v_dice_size: i32,
    pub split_dir: SplitDir,
    /// Cleared by the cull check for primitives spanning the eye plane.
    pub diceable: bool,
    pub eye_splits: i32,
    pub split_depth: i32,
    pub variables: PrimitiveVariables,
}

#[derive(Clone)]
pub struct Primitive {
    pub shape: Shape,
    pub common: SurfaceCommon,
}

fn varying_floats(name: &str, values: Vec<Float>) -> Parameter {
    Parameter {
        name: name.to_string(),
        class: ParamClass::Varying,
        array_size: 1,
        value: ParamValue::Float(values),
    }
}

/// Default s, t, u and v corner values of a quadric.
fn corner_variables(attributes: &Attributes) -> PrimitiveVariables {
    let st: [(Float, Float); 4] = attributes.texture_coordinates();
    let mut variables: PrimitiveVariables = PrimitiveVariables::default();
    variables.set(varying_floats("s", st.iter().map(|c| c.0).collect()));
    variables.set(varying_floats("t", st.iter().map(|c| c.1).collect()));
    variables.set(varying_floats("u", vec![0.0, 1.0, 0.0, 1.0]));
    variables.set(varying_floats("v", vec![0.0, 0.0, 1.0, 1.0]));
    variables
}

impl Primitive {
    pub fn new(shape: Shape, attributes: Arc<Attributes>, transform: Arc<MotionTransform>) -> Self {
        let variables: PrimitiveVariables = if shape.is_quadric() {
            corner_variables(&attributes)
        } else {
            PrimitiveVariables::default()
        };
        Primitive {
            shape,
            common: SurfaceCommon {
                attributes,
                transform,
                object_to_camera: Transform::default(),
                u_dice_size: 0,
                v_dice_size: 0,
                split_dir: SplitDir::U,
                diceable: true,
                eye_splits: 0,
                split_depth: 0,
                variables,
            },
        }
    }
    /// Attach primitive variables. Quadrics take four corner values for
    /// varying variables, point clouds one value per point. An `st`
    /// pair is spread into `s` and `t`.
    pub fn with_variables(mut self, variables: PrimitiveVariables) -> Result<Self, DiceError> {
        variables.validate(self.n_varying())?;
        for param in variables.params {
            if param.name == "st" && param.array_size == 2 {
                if let Some(st) = param.value.as_floats() {
                    let s: Vec<Float> = st.iter().step_by(2).cloned().collect();
                    let t: Vec<Float> = st.iter().skip(1).step_by(2).cloned().collect();
                    for (name, values) in [("s", s), ("t", t)] {
                        self.common.variables.set(Parameter {
                            name: name.to_string(),
                            class: param.class,
                            array_size: 1,
                            value: ParamValue::Float(values),
                        });
                    }
                }
            } else {
                self.common.variables.set(param);
            }
        }
        Ok(self)
    }
    fn n_varying(&self) -> usize {
        match &self.shape {
            Shape::Points(points) => points.cloud.n_points(),
            _ => 4,
        }
    }
    /// Cache object to camera for the first time key.
    pub fn transform(&mut self, ctx: &RenderContext) {
        self.common.object_to_camera = ctx.world_to_camera * self.common.transform.object_to_world(0);
    }
    /// Camera space bound, covering all time keys.
    pub fn bound(&self, ctx: &RenderContext) -> Bounds3f {
        let b: Bounds3f = self
            .common
            .object_to_camera
            .transform_bounds(&self.shape.object_bound());
        self.common
            .transform
            .motion_bounds(&b, &ctx.world_to_camera)
    }
    /// Returns true if the primitive should be dropped, either because
    /// it's outside the viewing volume or because it kept straddling
    /// the eye plane.
    pub fn cull(&mut self, ctx: &RenderContext) -> bool {
        let b: Bounds3f = self.bound(ctx);
        if b.is_empty() {
            Statistics::inc(&ctx.stats.culled, 1);
            return true;
        }
        let (near, far) = ctx.options.clipping();
        if b.p_max.z < near || b.p_min.z > far {
            Statistics::inc(&ctx.stats.culled, 1);
            return true;
        }
        if b.p_min.z < near && ctx.options.is_perspective() {
            // can't be projected, split until the pieces are in front
            if self.common.eye_splits >= ctx.options.eye_splits() {
                warn!(
                    "primitive still spans the eye plane after {} splits, discarded",
                    self.common.eye_splits
                );
                Statistics::inc(&ctx.stats.discarded, 1);
                return true;
            }
            self.common.diceable = false;
            return false;
        }
        self.common.diceable = true;
        let _timer = ctx.stats.project.start();
        let camera_to_raster: Transform = ctx.camera_to_raster();
        let raster: Bounds2f = (0..8_u8).fold(Bounds2f::default(), |rb, corner| {
            bnd2_union_pnt3(&rb, &camera_to_raster.transform_point(&b.corner(corner)))
        });
        let (xres, yres) = ctx.options.resolution();
        if raster.p_max.x < 0.0 as Float
            || raster.p_max.y < 0.0 as Float
            || raster.p_min.x > xres as Float
            || raster.p_min.y > yres as Float
        {
            Statistics::inc(&ctx.stats.culled, 1);
            return true;
        }
        false
    }
    /// Project a probe grid to raster space and store the dice sizes
    /// which would give micropolygons of about the shading rate in
    /// area. Returns the number of grid cells.
    pub fn estimate_grid_size(&mut self, ctx: &RenderContext) -> u64 {
        if let Shape::Points(points) = &self.shape {
            self.common.u_dice_size = points.n_vertices() as i32;
            self.common.v_dice_size = 1;
            return points.n_vertices() as u64;
        }
        let object_to_raster: Transform = ctx.camera_to_raster() * self.common.object_to_camera;
        let shape: &Shape = &self.shape;
        let (u_size, v_size) = estimate_grid_size(
            |u, v| shape.dice_point(u, v, ESTIMATE_GRID_SIZE, ESTIMATE_GRID_SIZE),
            &object_to_raster,
            self.common.attributes.shading_rate_sqrt(),
            self.common.attributes.binary_dicing(),
        );
        self.common.u_dice_size = u_size;
        self.common.v_dice_size = v_size;
        u_size as u64 * v_size as u64
    }
    pub fn diceable(&mut self, ctx: &RenderContext) -> bool {
        let _timer = ctx.stats.diceable.start();
        if !self.common.diceable {
            return false;
        }
        if let Shape::Points(points) = &self.shape {
            let grid_size: Float = match ctx.options.grid_size() {
                Some(grid_size) => grid_size as Float,
                None => {
                    let (bucket_x, _) = ctx.options.bucket_size();
                    (bucket_x * bucket_x) as Float / self.common.attributes.shading_rate()
                }
            };
            return points.n_vertices() as Float <= grid_size.max(1.0 as Float);
        }
        let too_much: u64 = self.estimate_grid_size(ctx);
        self.common.split_dir = if self.common.u_dice_size > self.common.v_dice_size {
            SplitDir::U
        } else {
            SplitDir::V
        };
        let gs: Float = (ctx.options.quadric_grid_size() as Float).sqrt();
        if too_much > TOO_LARGE_QUADS {
            return false;
        }
        if self.common.u_dice_size as Float > gs || self.common.v_dice_size as Float > gs {
            return false;
        }
        true
    }
    /// Halve the primitive, pushing both children onto *out*. Returns
    /// the number of children.
    pub fn split(&self, out: &mut Vec<Primitive>) -> usize {
        let split_u: bool = self.common.split_dir == SplitDir::U;
        let (a, b) = self.shape.halve(split_u);
        let (va, vb) = if self.shape.is_quadric() {
            self.common.variables.subdivide(split_u)
        } else {
            (self.common.variables.clone(), self.common.variables.clone())
        };
        let eye_splits: i32 = if self.common.diceable {
            self.common.eye_splits
        } else {
            self.common.eye_splits + 1
        };
        for (shape, variables) in [(a, va), (b, vb)] {
            out.push(Primitive {
                shape,
                common: SurfaceCommon {
                    variables,
                    eye_splits,
                    split_depth: self.common.split_depth + 1,
                    diceable: true,
                    ..self.common.clone()
                },
            });
        }
        2
    }
    /// Object space point at grid indices (*u*, *v*) using the current
    /// dice sizes.
    pub fn dice_point(&self, u: i32, v: i32) -> Point3f {
        self.shape
            .dice_point(u, v, self.common.u_dice_size, self.common.v_dice_size)
    }
    /// Look a variable up on the primitive, then on the point cloud.
    fn find_variable(&self, name: &str) -> Option<&Parameter> {
        self.common.variables.find(name).or_else(|| match &self.shape {
            Shape::Points(points) => points.cloud.variables.find(name),
            _ => None,
        })
    }
    fn user_variables(&self) -> Vec<&Parameter> {
        let mut params: Vec<&Parameter> = self
            .common
            .variables
            .params
            .iter()
            .filter(|p| !STANDARD_NAMES.contains(&p.name.as_str()))
            .collect();
        if let Shape::Points(points) = &self.shape {
            for param in &points.cloud.variables.params {
                if !STANDARD_NAMES.contains(&param.name.as_str())
                    && !self.common.variables.has(&param.name)
                {
                    params.push(param);
                }
            }
        }
        params
    }
    /// Spread a variable across the grid. Non-varying values stay a
    /// single element, values of the wrong count are passed on as they
    /// are (and rejected by the grid).
    fn dice_variable(&self, param: &Parameter) -> ParamValue {
        if !param.class.is_varying() {
            return param.value.clone();
        }
        match &self.shape {
            Shape::Points(points) if param.count() == points.cloud.n_points() => {
                param.value.select(param.array_size, &points.tree.leaves)
            }
            Shape::Points(_) => param.value.clone(),
            _ if param.count() == 4 => param.value.dice_corners(
                param.array_size,
                self.common.u_dice_size,
                self.common.v_dice_size,
            ),
            _ => param.value.clone(),
        }
    }
    fn dice_floats(&self, name: &str) -> Vec<Float> {
        self.find_variable(name)
            .map(|param| self.dice_variable(param))
            .and_then(|value| value.as_floats().map(|v| v.to_vec()))
            .unwrap_or_default()
    }
    fn dice_color(&self, name: &str, attribute: &str) -> Vec<Color> {
        if let Some(colors) = self
            .find_variable(name)
            .map(|param| self.dice_variable(param))
            .and_then(|value| value.as_colors().map(|v| v.to_vec()))
        {
            return colors;
        }
        vec![self
            .common
            .attributes
            .get_color_attribute("System", attribute)
            .unwrap_or_else(|| Color::new(1.0 as Float))]
    }
    /// Shading normals given as a primitive variable, carried to camera
    /// space. A single (constant or uniform) normal covers the whole grid.
    fn dice_normals(&self, param: &Parameter, n_vertices: usize) -> Result<Vec<Normal3f>, DiceError> {
        let value: ParamValue = self.dice_variable(param);
        let normals: &[Normal3f] = value
            .as_normals()
            .ok_or_else(|| DiceError::ParameterTypeMismatch {
                name: param.name.clone(),
                expected: String::from("normal"),
            })?;
        let object_to_camera: Transform = self.common.object_to_camera;
        let to_camera = |n: &Normal3f| object_to_camera.transform_normal(n).normalize();
        match normals.len() {
            1 => Ok(vec![to_camera(&normals[0]); n_vertices]),
            found if found == n_vertices => Ok(normals.iter().map(to_camera).collect()),
            found => Err(DiceError::GridSizeMismatch {
                name: param.name.clone(),
                expected: n_vertices,
                found,
            }),
        }
    }
    /// Dice the primitive at the current dice sizes into a camera space
    /// grid.
    pub fn dice(&self, ctx: &RenderContext) -> Result<MicroPolyGrid, DiceError> {
        let _timer = ctx.stats.dicing.start();
        let mut grid: MicroPolyGrid = match &self.shape {
            Shape::Points(points) => self.dice_points(ctx, points)?,
            _ => self.dice_quadric(ctx),
        };
        let uses: Uses = grid.uses;
        if uses.uses(EnvVar::S) {
            grid.s = self.dice_floats("s");
        }
        if uses.uses(EnvVar::T) {
            grid.t = self.dice_floats("t");
        }
        if uses.uses(EnvVar::U) {
            grid.u = self.dice_floats("u");
        }
        if uses.uses(EnvVar::V) {
            grid.v = self.dice_floats("v");
        }
        if uses.uses(EnvVar::Cs) {
            grid.cs = self.dice_color("Cs", "Color");
        }
        if uses.uses(EnvVar::Os) {
            grid.os = self.dice_color("Os", "Opacity");
        }
        if uses.uses(EnvVar::N) {
            if let Some(param) = self.find_variable("N") {
                grid.n = self.dice_normals(param, grid.n_vertices())?;
            }
        }
        for param in self.user_variables() {
            grid.set_user_parameter(
                &param.name,
                param.class,
                param.array_size,
                self.dice_variable(param),
            )?;
        }
        Statistics::inc(&ctx.stats.grids, 1);
        Ok(grid)
    }
    /// Object to camera of every transform key.
    fn key_transforms(&self, ctx: &RenderContext) -> Vec<(Float, Transform)> {
        self.common
            .transform
            .keys
            .iter()
            .map(|(time, object_to_world)| (*time, ctx.world_to_camera * *object_to_world))
            .collect()
    }
    fn dice_quadric(&self, ctx: &RenderContext) -> MicroPolyGrid {
        let u_size: i32 = self.common.u_dice_size;
        let v_size: i32 = self.common.v_dice_size;
        let mut grid: MicroPolyGrid = MicroPolyGrid::new(
            GridKind::Quadric,
            u_size,
            v_size,
            self.common.attributes.uses,
        );
        let with_normals: bool = grid.uses.uses(EnvVar::Ng) || grid.uses.uses(EnvVar::N);
        let flip: bool = self.common.attributes.orientation_flipped();
        let object_to_camera: Transform = self.common.object_to_camera;
        let n: usize = grid.n_vertices();
        let mut object_points: Vec<Point3f> = Vec::with_capacity(n);
        grid.p.reserve(n);
        for v in 0..=v_size {
            for u in 0..=u_size {
                if with_normals {
                    let (p, ng) = self.shape.dice_point_normal(u, v, u_size, v_size);
                    let ng: Normal3f = object_to_camera.transform_normal(&ng).normalize();
                    grid.ng.push(if flip { -ng } else { ng });
                    object_points.push(p);
                } else {
                    object_points.push(self.shape.dice_point(u, v, u_size, v_size));
                }
            }
        }
        grid.p = object_points
            .iter()
            .map(|p| object_to_camera.transform_point(p))
            .collect();
        if grid.uses.uses(EnvVar::N) {
            grid.n = grid.ng.clone();
        }
        let keys: Vec<(Float, Transform)> = self.key_transforms(ctx);
        for (_time, key_to_camera) in keys.iter().skip(1) {
            grid.p_keys.push(
                object_points
                    .iter()
                    .map(|p| key_to_camera.transform_point(p))
                    .collect(),
            );
        }
        grid.motion_keys = keys.into_iter().collect();
        grid
    }
    /// One row of points, everything else is indexed through the
    /// leaves of the k-d tree.
    fn dice_points(&self, ctx: &RenderContext, points: &Points) -> Result<MicroPolyGrid, DiceError> {
        let n: usize = points.n_vertices();
        if n == 0 {
            return Err(DiceError::EmptyPointCloud);
        }
        let mut grid: MicroPolyGrid = MicroPolyGrid::new(
            GridKind::Points,
            n as i32 - 1,
            0,
            self.common.attributes.uses,
        );
        let cloud = &points.cloud;
        let leaves: &[usize] = &points.tree.leaves;
        let object_to_camera: Transform = self.common.object_to_camera;
        let object_points: Vec<Point3f> = leaves.iter().map(|i| cloud.positions[0][*i]).collect();
        grid.p = object_points
            .iter()
            .map(|p| object_to_camera.transform_point(p))
            .collect();
        grid.widths = leaves.iter().map(|i| cloud.width(*i)).collect();
        if grid.uses.uses(EnvVar::Ng) || grid.uses.uses(EnvVar::N) {
            let z: Float = if self.common.attributes.orientation_flipped() {
                -1.0
            } else {
                1.0
            };
            grid.ng = vec![Normal3f { x: 0.0, y: 0.0, z }; n];
            if grid.uses.uses(EnvVar::N) {
                grid.n = grid.ng.clone();
            }
        }
        if cloud.n_times() > 1 {
            // deforming points, positions per time slot
            for slot in cloud.positions.iter().skip(1) {
                grid.p_keys.push(
                    leaves
                        .iter()
                        .map(|i| object_to_camera.transform_point(&slot[*i]))
                        .collect(),
                );
            }
            grid.motion_keys = cloud
                .times
                .iter()
                .map(|time| (*time, object_to_camera))
                .collect();
        } else {
            let keys: Vec<(Float, Transform)> = self.key_transforms(ctx);
            for (_time, key_to_camera) in keys.iter().skip(1) {
                grid.p_keys.push(
                    object_points
                        .iter()
                        .map(|p| key_to_camera.transform_point(p))
                        .collect(),
                );
            }
            grid.motion_keys = keys.into_iter().collect();
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Vector3f;
    use crate::core::paramset::Options;
    use crate::shapes::points::PointCloud;
    use crate::shapes::sphere::Sphere;

    fn context() -> RenderContext {
        RenderContext::new(Options::default(), Transform::default())
    }

    fn sphere_at(z: Float, radius: Float) -> Primitive {
        let transform = MotionTransform::new(Transform::translate(&Vector3f { x: 0.0, y: 0.0, z }));
        Primitive::new(
            Shape::Sphere(Sphere::new(radius, -radius, radius, 0.0, 360.0)),
            Arc::new(Attributes::default()),
            Arc::new(transform),
        )
    }

    #[test]
    fn small_sphere_is_diceable() {
        let ctx = context();
        let mut prim = sphere_at(20.0, 0.1);
        prim.transform(&ctx);
        assert!(!prim.cull(&ctx));
        assert!(prim.diceable(&ctx));
        let grid = prim.dice(&ctx).unwrap();
        assert_eq!(grid.p.len(), grid.n_vertices());
        assert_eq!(grid.ng.len(), grid.n_vertices());
        assert_eq!(grid.s.len(), grid.n_vertices());
        assert_eq!(grid.s[0], 0.0);
        assert_eq!(grid.s[grid.n_vertices() - 1], 1.0);
    }

    #[test]
    fn behind_the_camera_is_culled() {
        let ctx = context();
        let mut prim = sphere_at(-10.0, 1.0);
        prim.transform(&ctx);
        assert!(prim.cull(&ctx));
    }

    #[test]
    fn spanning_the_eye_plane_is_not_diceable() {
        let ctx = context();
        let mut prim = sphere_at(0.0, 1.0);
        prim.transform(&ctx);
        assert!(!prim.cull(&ctx));
        assert!(!prim.diceable(&ctx));
        let mut children: Vec<Primitive> = Vec::new();
        assert_eq!(prim.split(&mut children), 2);
        assert!(children.iter().all(|c| c.common.eye_splits == 1));
        assert!(children.iter().all(|c| c.common.split_depth == 1));
    }

    #[test]
    fn too_large_sphere_splits() {
        let ctx = context();
        let mut prim = sphere_at(3.0, 2.0);
        prim.transform(&ctx);
        assert!(!prim.cull(&ctx));
        assert!(!prim.diceable(&ctx));
        let mut children: Vec<Primitive> = Vec::new();
        prim.split(&mut children);
        assert_eq!(children.len(), 2);
        assert!(Arc::ptr_eq(&children[0].common.attributes, &prim.common.attributes));
    }

    #[test]
    fn corner_variables_follow_split() {
        let mut prim = sphere_at(3.0, 1.0);
        prim.common.split_dir = SplitDir::U;
        let mut children: Vec<Primitive> = Vec::new();
        prim.split(&mut children);
        let s = children[1].common.variables.find("s").unwrap();
        assert_eq!(s.value.as_floats().unwrap(), &[0.5, 1.0, 0.5, 1.0]);
    }

    #[test]
    fn st_is_spread() {
        let mut variables = PrimitiveVariables::default();
        variables.set(
            Parameter::new(
                "st",
                ParamValue::Float(vec![0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 2.0, 2.0]),
            )
            .unwrap(),
        );
        let prim = sphere_at(3.0, 1.0).with_variables(variables).unwrap();
        let t = prim.common.variables.find("t").unwrap();
        assert_eq!(t.value.as_floats().unwrap(), &[0.0, 0.0, 2.0, 2.0]);
    }

    #[test]
    fn color_falls_back_to_attribute() {
        let ctx = context();
        let mut attributes = Attributes::default();
        attributes
            .values
            .add_floats("System", "Color", vec![1.0, 0.0, 0.0]);
        let mut prim = Primitive::new(
            Shape::Sphere(Sphere::default()),
            Arc::new(attributes),
            Arc::new(MotionTransform::new(Transform::translate(&Vector3f {
                x: 0.0,
                y: 0.0,
                z: 5.0,
            }))),
        );
        prim.transform(&ctx);
        prim.common.u_dice_size = 2;
        prim.common.v_dice_size = 2;
        let grid = prim.dice(&ctx).unwrap();
        assert_eq!(grid.cs, vec![Color::rgb(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn v_split_keeps_the_parametric_labels() {
        let ctx = context();
        let transform = MotionTransform::new(Transform::translate(&Vector3f {
            x: 0.0,
            y: 0.0,
            z: 5.0,
        }));
        let mut prim = Primitive::new(
            Shape::Sphere(Sphere::new(1.0, 0.0, 1.0, 0.0, 360.0)),
            Arc::new(Attributes::default()),
            Arc::new(transform),
        );
        prim.transform(&ctx);
        prim.common.u_dice_size = 2;
        prim.common.v_dice_size = 4;
        let parent = prim.dice(&ctx).unwrap();
        prim.common.split_dir = SplitDir::V;
        let mut children: Vec<Primitive> = Vec::new();
        prim.split(&mut children);
        let mut lower = children.swap_remove(0);
        lower.common.u_dice_size = 2;
        lower.common.v_dice_size = 2;
        let child = lower.dice(&ctx).unwrap();
        // child rows 0..=2 are parent rows 0..=2
        for i in 0..child.n_vertices() {
            assert!((child.v[i] - parent.v[i]).abs() < 1e-6);
            assert!((child.t[i] - parent.t[i]).abs() < 1e-6);
            assert!((child.p[i].x - parent.p[i].x).abs() < 1e-4);
            assert!((child.p[i].y - parent.p[i].y).abs() < 1e-4);
            assert!((child.p[i].z - parent.p[i].z).abs() < 1e-4);
        }
    }

    #[test]
    fn zero_grid_size_still_dices_tiny_quadrics() {
        let mut options = Options::default();
        options.values.add_int("limits", "gridsize", 0);
        let ctx = RenderContext::new(options, Transform::default());
        let mut prim = sphere_at(20.0, 0.001);
        prim.transform(&ctx);
        assert!(!prim.cull(&ctx));
        assert!(prim.diceable(&ctx));
        assert_eq!((prim.common.u_dice_size, prim.common.v_dice_size), (1, 1));
    }

    #[test]
    fn user_normals_become_shading_normals() {
        let ctx = context();
        let up = Normal3f {
            x: 0.0,
            y: 1.0,
            z: 0.0,
        };
        let mut variables = PrimitiveVariables::default();
        variables.set(Parameter::new("N", ParamValue::Normal(vec![up; 4])).unwrap());
        let mut prim = sphere_at(5.0, 1.0).with_variables(variables).unwrap();
        prim.transform(&ctx);
        prim.common.u_dice_size = 4;
        prim.common.v_dice_size = 3;
        let grid = prim.dice(&ctx).unwrap();
        assert_eq!(grid.n.len(), grid.n_vertices());
        for (n, ng) in grid.n.iter().zip(grid.ng.iter()) {
            assert!(n.x.abs() < 1e-5 && (n.y - 1.0).abs() < 1e-5 && n.z.abs() < 1e-5);
            assert!(ng.y < 0.99);
        }
    }

    #[test]
    fn point_normals_follow_the_leaves() {
        let ctx = context();
        let normals = vec![
            Normal3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
            Normal3f {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
        ];
        let mut variables = PrimitiveVariables::default();
        variables.set(Parameter::new("N", ParamValue::Normal(normals.clone())).unwrap());
        let positions = vec![
            Point3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
            Point3f {
                x: -1.0,
                y: 0.0,
                z: 0.0,
            },
        ];
        let cloud = PointCloud::new(positions, variables).unwrap();
        let mut prim = Primitive::new(
            Shape::Points(Points::new(Arc::new(cloud))),
            Arc::new(Attributes::default()),
            Arc::new(MotionTransform::new(Transform::translate(&Vector3f {
                x: 0.0,
                y: 0.0,
                z: 5.0,
            }))),
        );
        prim.transform(&ctx);
        let grid = prim.dice(&ctx).unwrap();
        if let Shape::Points(points) = &prim.shape {
            for (i, leaf) in points.tree.leaves.iter().enumerate() {
                assert_eq!(grid.n[i], normals[*leaf]);
            }
        }
    }

    #[test]
    fn mismatched_varying_parameter_aborts_dicing() {
        let ctx = context();
        let mut variables = PrimitiveVariables::default();
        variables.set(Parameter::new("varying float rough", ParamValue::Float(vec![0.5; 3])).unwrap());
        let cloud = PointCloud::new(
            vec![Point3f::default(); 4],
            PrimitiveVariables::default(),
        )
        .unwrap();
        let mut prim = Primitive::new(
            Shape::Points(Points::new(Arc::new(cloud))),
            Arc::new(Attributes::default()),
            Arc::new(MotionTransform::default()),
        );
        prim.common.variables = variables;
        prim.transform(&ctx);
        assert!(matches!(
            prim.dice(&ctx),
            Err(DiceError::GridSizeMismatch { .. })
        ));
    }
}
