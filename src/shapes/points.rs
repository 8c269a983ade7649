//! Point clouds. Every point becomes a small square micropolygon
//! facing the camera, sized by its `width` (or the `constantwidth` of
//! the whole cloud).
//!
//! The cloud (positions of every time slot plus the per point
//! variables) is shared between all pieces a **Points** primitive gets
//! split into, every piece only owns the list of point indices it
//! covers.

// std
use std::sync::Arc;
// reyes
use crate::core::error::DiceError;
use crate::core::geometry::{bnd3_expand, bnd3_union_bnd3f, Bounds3f, Point3f};
use crate::core::kdtree::KdTree;
use crate::core::parameters::{ParamClass, ParamType, Parameter, PrimitiveVariables};
use crate::core::reyes::Float;

pub struct PointCloud {
    /// Object space positions, one list per time slot.
    pub positions: Vec<Vec<Point3f>>,
    pub times: Vec<Float>,
    pub variables: PrimitiveVariables,
}

impl PointCloud {
    pub fn new(positions: Vec<Point3f>, variables: PrimitiveVariables) -> Result<Self, DiceError> {
        if positions.is_empty() {
            return Err(DiceError::EmptyPointCloud);
        }
        variables.validate(positions.len())?;
        Ok(PointCloud {
            positions: vec![positions],
            times: vec![0.0],
            variables,
        })
    }
    /// Deformation motion, another set of positions at *time*.
    pub fn add_time_slot(&mut self, time: Float, positions: Vec<Point3f>) -> Result<(), DiceError> {
        if positions.len() != self.n_points() {
            return Err(DiceError::ValueCountMismatch {
                name: String::from("P"),
                expected: self.n_points() * 3,
                found: positions.len() * 3,
            });
        }
        self.positions.push(positions);
        self.times.push(time);
        Ok(())
    }
    pub fn n_points(&self) -> usize {
        self.positions[0].len()
    }
    pub fn n_times(&self) -> usize {
        self.positions.len()
    }
    fn width_parameter(&self) -> Option<&Parameter> {
        self.variables
            .find("width")
            .filter(|p| p.class == ParamClass::Varying && p.ptype() == ParamType::Float)
    }
    fn constant_width(&self) -> Option<Float> {
        self.variables
            .find("constantwidth")
            .filter(|p| p.class == ParamClass::Constant)
            .and_then(|p| p.value.as_floats())
            .and_then(|values| values.first().copied())
    }
    /// Width of point *index*, `1` if neither `width` nor
    /// `constantwidth` were given.
    pub fn width(&self, index: usize) -> Float {
        if let Some(widths) = self.width_parameter().and_then(|p| p.value.as_floats()) {
            if let Some(w) = widths.get(index) {
                return *w;
            }
        }
        self.constant_width().unwrap_or(1.0 as Float)
    }
    pub fn max_width(&self) -> Float {
        match self.width_parameter().and_then(|p| p.value.as_floats()) {
            Some(widths) => widths.iter().cloned().fold(0.0 as Float, Float::max),
            None => self.constant_width().unwrap_or(1.0 as Float),
        }
    }
}

#[derive(Clone)]
pub struct Points {
    pub cloud: Arc<PointCloud>,
    pub tree: KdTree,
}

impl Points {
    pub fn new(cloud: Arc<PointCloud>) -> Self {
        let tree: KdTree = KdTree::new(cloud.n_points());
        Points { cloud, tree }
    }
    pub fn n_vertices(&self) -> usize {
        self.tree.len()
    }
    /// Object space position of the *u*-th point (in leaf order) at
    /// the first time slot.
    pub fn dice_point(&self, u: i32) -> Point3f {
        match self.tree.leaves.get(u.max(0) as usize) {
            Some(index) => self.cloud.positions[0][*index],
            None => Point3f::default(),
        }
    }
    /// Covers every point of every time slot, widened by the largest
    /// width.
    pub fn object_bound(&self) -> Bounds3f {
        let b: Bounds3f = self
            .cloud
            .positions
            .iter()
            .fold(Bounds3f::default(), |b, positions| {
                bnd3_union_bnd3f(&b, &self.tree.bound(positions))
            });
        if b.is_empty() {
            return b;
        }
        bnd3_expand(&b, self.cloud.max_width())
    }
    /// Split the points at the median of the longest axis.
    pub fn halve(&self) -> (Points, Points) {
        let (a, b) = self.tree.subdivide(&self.cloud.positions[0]);
        (
            Points {
                cloud: Arc::clone(&self.cloud),
                tree: a,
            },
            Points {
                cloud: Arc::clone(&self.cloud),
                tree: b,
            },
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::parameters::ParamValue;

    fn line(n: usize) -> Vec<Point3f> {
        (0..n)
            .map(|i| Point3f {
                x: i as Float,
                y: 0.0,
                z: 0.0,
            })
            .collect()
    }

    #[test]
    fn widths() {
        let mut variables = PrimitiveVariables::default();
        variables.set(Parameter::new("constantwidth", ParamValue::Float(vec![0.25])).unwrap());
        let cloud = PointCloud::new(line(3), variables.clone()).unwrap();
        assert_eq!(cloud.width(1), 0.25);
        variables.set(Parameter::new("width", ParamValue::Float(vec![0.5, 2.0, 1.0])).unwrap());
        let cloud = PointCloud::new(line(3), variables).unwrap();
        assert_eq!(cloud.width(1), 2.0);
        assert_eq!(cloud.max_width(), 2.0);
        let cloud = PointCloud::new(line(3), PrimitiveVariables::default()).unwrap();
        assert_eq!(cloud.width(0), 1.0);
    }

    #[test]
    fn empty_and_mismatched_clouds_are_rejected() {
        assert!(PointCloud::new(Vec::new(), PrimitiveVariables::default()).is_err());
        let mut variables = PrimitiveVariables::default();
        variables.set(Parameter::new("width", ParamValue::Float(vec![0.5, 2.0])).unwrap());
        assert!(PointCloud::new(line(3), variables).is_err());
    }

    #[test]
    fn halves_share_the_cloud() {
        let points = Points::new(Arc::new(PointCloud::new(line(9), PrimitiveVariables::default()).unwrap()));
        let (a, b) = points.halve();
        assert_eq!(a.n_vertices() + b.n_vertices(), 9);
        assert!(Arc::ptr_eq(&a.cloud, &b.cloud));
        assert_eq!(Arc::strong_count(&points.cloud), 3);
    }

    #[test]
    fn bound_covers_all_time_slots() {
        let mut cloud = PointCloud::new(line(2), PrimitiveVariables::default()).unwrap();
        let moved: Vec<Point3f> = line(2)
            .iter()
            .map(|p| Point3f {
                x: p.x,
                y: 5.0,
                z: 0.0,
            })
            .collect();
        cloud.add_time_slot(1.0, moved).unwrap();
        let points = Points::new(Arc::new(cloud));
        let b = points.object_bound();
        assert_eq!(b.p_min.y, -1.0);
        assert_eq!(b.p_max.y, 6.0);
        assert_eq!(b.p_min.x, -1.0);
        assert_eq!(b.p_max.x, 2.0);
    }
}
