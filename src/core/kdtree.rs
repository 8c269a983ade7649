//! The k-d tree of a point cloud is nothing but its list of point
//! indices (leaves). Subdividing reorders the list along the axis of
//! greatest extent and cuts it at the median, so repeated splits
//! produce spatially coherent chunks. The positions themselves are
//! never copied.

// std
use std::cmp::Ordering;
// reyes
use crate::core::geometry::{bnd3_union_pnt3f, Bounds3f, Point3f, XYZEnum};

#[derive(Debug, Clone, PartialEq)]
pub struct KdTree {
    pub leaves: Vec<usize>,
}

impl KdTree {
    /// All points, in their natural order.
    pub fn new(n_points: usize) -> Self {
        KdTree {
            leaves: (0..n_points).collect(),
        }
    }
    pub fn len(&self) -> usize {
        self.leaves.len()
    }
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
    pub fn bound(&self, positions: &[Point3f]) -> Bounds3f {
        self.leaves
            .iter()
            .fold(Bounds3f::default(), |b, i| bnd3_union_pnt3f(&b, &positions[*i]))
    }
    /// Split the leaves into two halves (the first one holding `n / 2`
    /// leaves) on either side of the median along the longest axis.
    pub fn subdivide(&self, positions: &[Point3f]) -> (KdTree, KdTree) {
        let mut leaves: Vec<usize> = self.leaves.clone();
        let median: usize = leaves.len() / 2;
        if median > 0 {
            let dim: XYZEnum = XYZEnum::from(self.bound(positions).maximum_extent());
            leaves.select_nth_unstable_by(median, |a, b| {
                positions[*a][dim]
                    .partial_cmp(&positions[*b][dim])
                    .unwrap_or(Ordering::Equal)
            });
        }
        let upper: Vec<usize> = leaves.split_off(median);
        (KdTree { leaves }, KdTree { leaves: upper })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::reyes::Float;

    #[test]
    fn median_split_along_longest_axis() {
        // spread along y, shuffled
        let ys: [Float; 7] = [5.0, 1.0, 6.0, 0.0, 3.0, 2.0, 4.0];
        let positions: Vec<Point3f> = ys
            .iter()
            .map(|y| Point3f {
                x: 0.1 * y,
                y: *y,
                z: 0.0,
            })
            .collect();
        let tree = KdTree::new(positions.len());
        let (a, b) = tree.subdivide(&positions);
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 4);
        let max_a = a
            .leaves
            .iter()
            .map(|i| positions[*i].y)
            .fold(Float::MIN, Float::max);
        let min_b = b
            .leaves
            .iter()
            .map(|i| positions[*i].y)
            .fold(Float::MAX, Float::min);
        assert!(max_a <= min_b);
        // disjoint and complete
        let mut all: Vec<usize> = a.leaves.iter().chain(b.leaves.iter()).cloned().collect();
        all.sort();
        assert_eq!(all, tree.leaves);
    }
}
