//! Collect micropolygons into screen buckets.
//!
//! The image is divided into buckets of `limits:bucketsize` pixels.
//! Every micropolygon is filed under the bucket holding the top-left
//! corner of its raster bound, micropolygons entirely outside of the
//! image are culled. Workers don't touch the collector directly, they
//! fill a **ChannelSink** which forwards batches to the thread owning
//! the collector.

// others
use crossbeam_channel::Sender;
use rayon::prelude::*;
use tracing::debug;
// reyes
use crate::core::geometry::Bounds3f;
use crate::core::micropolygon::MicroPolygon;
use crate::core::reyes::Float;

/// Anything micropolygons can be handed to.
pub trait MicroPolygonSink {
    fn add_micro_polygon(&mut self, mpg: MicroPolygon);
}

impl MicroPolygonSink for Vec<MicroPolygon> {
    fn add_micro_polygon(&mut self, mpg: MicroPolygon) {
        self.push(mpg);
    }
}

pub struct BucketCollector {
    pub resolution: (i32, i32),
    pub bucket_size: (i32, i32),
    pub n_buckets: (i32, i32),
    buckets: Vec<Vec<MicroPolygon>>,
    pub n_culled: usize,
}

impl BucketCollector {
    pub fn new(resolution: (i32, i32), bucket_size: (i32, i32)) -> Self {
        let bucket_size: (i32, i32) = (bucket_size.0.max(1), bucket_size.1.max(1));
        let n_buckets: (i32, i32) = (
            (resolution.0 + bucket_size.0 - 1) / bucket_size.0,
            (resolution.1 + bucket_size.1 - 1) / bucket_size.1,
        );
        let count: usize = (n_buckets.0.max(0) * n_buckets.1.max(0)) as usize;
        let mut buckets: Vec<Vec<MicroPolygon>> = Vec::with_capacity(count);
        buckets.resize_with(count, Vec::new);
        BucketCollector {
            resolution,
            bucket_size,
            n_buckets,
            buckets,
            n_culled: 0,
        }
    }
    fn bucket_index(&self, b: &Bounds3f) -> Option<usize> {
        let (xres, yres) = (self.resolution.0 as Float, self.resolution.1 as Float);
        if b.is_empty()
            || b.p_max.x < 0.0 as Float
            || b.p_max.y < 0.0 as Float
            || b.p_min.x >= xres
            || b.p_min.y >= yres
        {
            return None;
        }
        let bx: i32 = ((b.p_min.x.max(0.0) as i32) / self.bucket_size.0).min(self.n_buckets.0 - 1);
        let by: i32 = ((b.p_min.y.max(0.0) as i32) / self.bucket_size.1).min(self.n_buckets.1 - 1);
        Some((by * self.n_buckets.0 + bx) as usize)
    }
    pub fn bucket(&self, index: usize) -> &[MicroPolygon] {
        &self.buckets[index]
    }
    pub fn len(&self) -> usize {
        self.buckets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
    pub fn n_micro_polygons(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }
    /// Front to back order within every bucket.
    pub fn sort_buckets(&mut self) {
        self.buckets.par_iter_mut().for_each(|bucket| {
            bucket.sort_by(|a, b| {
                a.depth()
                    .partial_cmp(&b.depth())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });
        debug!(
            "sorted {} micropolygons in {} buckets",
            self.n_micro_polygons(),
            self.buckets.len()
        );
    }
}

impl MicroPolygonSink for BucketCollector {
    fn add_micro_polygon(&mut self, mpg: MicroPolygon) {
        match self.bucket_index(&mpg.bound()) {
            Some(index) => self.buckets[index].push(mpg),
            None => self.n_culled += 1,
        }
    }
}

/// Batches micropolygons and sends them over a channel. Whatever is
/// left gets sent on drop.
pub struct ChannelSink {
    sender: Sender<Vec<MicroPolygon>>,
    batch: Vec<MicroPolygon>,
    batch_size: usize,
}

impl ChannelSink {
    pub fn new(sender: Sender<Vec<MicroPolygon>>, batch_size: usize) -> Self {
        let batch_size: usize = batch_size.max(1);
        ChannelSink {
            sender,
            batch: Vec::with_capacity(batch_size),
            batch_size,
        }
    }
    pub fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        let batch: Vec<MicroPolygon> =
            std::mem::replace(&mut self.batch, Vec::with_capacity(self.batch_size));
        // the receiving side only goes away once every worker is done
        let _ = self.sender.send(batch);
    }
}

impl MicroPolygonSink for ChannelSink {
    fn add_micro_polygon(&mut self, mpg: MicroPolygon) {
        self.batch.push(mpg);
        if self.batch.len() >= self.batch_size {
            self.flush();
        }
    }
}

impl Drop for ChannelSink {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Point3f;
    use crate::core::micropolygon::MpgQuad;
    use crate::core::spectrum::Color;

    fn square(x: Float, y: Float, z: Float) -> MicroPolygon {
        let p = |dx: Float, dy: Float| Point3f {
            x: x + dx,
            y: y + dy,
            z,
        };
        MicroPolygon::Static(MpgQuad {
            p: [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)],
            cs: Color::new(1.0),
            os: Color::new(1.0),
        })
    }

    #[test]
    fn files_by_top_left_corner() {
        let mut collector = BucketCollector::new((64, 32), (16, 16));
        assert_eq!(collector.len(), 8);
        collector.add_micro_polygon(square(1.0, 1.0, 2.0));
        collector.add_micro_polygon(square(20.0, 17.0, 2.0));
        collector.add_micro_polygon(square(-5.0, 3.0, 2.0));
        collector.add_micro_polygon(square(100.0, 3.0, 2.0));
        assert_eq!(collector.bucket(0).len(), 1);
        assert_eq!(collector.bucket(5).len(), 1);
        assert_eq!(collector.n_culled, 2);
    }

    #[test]
    fn sorted_front_to_back() {
        let mut collector = BucketCollector::new((16, 16), (16, 16));
        collector.add_micro_polygon(square(1.0, 1.0, 9.0));
        collector.add_micro_polygon(square(2.0, 2.0, 3.0));
        collector.add_micro_polygon(square(3.0, 3.0, 5.0));
        collector.sort_buckets();
        let depths: Vec<Float> = collector.bucket(0).iter().map(|m| m.depth()).collect();
        assert_eq!(depths, vec![3.0, 5.0, 9.0]);
    }

    #[test]
    fn channel_sink_flushes_on_drop() {
        let (tx, rx) = crossbeam_channel::unbounded();
        {
            let mut sink = ChannelSink::new(tx, 2);
            sink.add_micro_polygon(square(0.0, 0.0, 1.0));
            sink.add_micro_polygon(square(0.0, 0.0, 1.0));
            sink.add_micro_polygon(square(0.0, 0.0, 1.0));
        }
        let sizes: Vec<usize> = rx.iter().map(|batch| batch.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
    }
}
