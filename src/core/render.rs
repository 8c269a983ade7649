//! The main loop. Worker threads take top-level primitives from a
//! **PrimitiveQueue** and push each one (and whatever it gets split
//! into) depth-first through cull, diceable, dice or split. The
//! micropolygons of busted grids travel in batches over a channel to a
//! collector thread which files them into buckets.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// others
use tracing::{debug, info, warn};
// reyes
use crate::core::bucket::{BucketCollector, ChannelSink, MicroPolygonSink};
use crate::core::context::RenderContext;
use crate::core::micropolygon::MicroPolygon;
use crate::core::primitive::Primitive;
use crate::core::stats::Statistics;
use crate::core::transform::Transform;
use crate::workqueue::PrimitiveQueue;

/// Micropolygons per channel message.
pub const BATCH_SIZE: usize = 1024;

/// Push one (already transformed) primitive through the pipeline,
/// returns the number of micropolygons handed to *sink*.
pub fn dice_primitive(
    ctx: &RenderContext,
    primitive: Primitive,
    camera_to_raster: &Transform,
    sink: &mut dyn MicroPolygonSink,
) -> usize {
    let max_split_depth: i32 = ctx.options.split_depth();
    let mut emitted: usize = 0;
    let mut stack: Vec<Primitive> = vec![primitive];
    while let Some(mut primitive) = stack.pop() {
        if primitive.cull(ctx) {
            continue;
        }
        if primitive.diceable(ctx) {
            match primitive.dice(ctx) {
                Ok(grid) => {
                    let _timer = ctx.stats.project.start();
                    let n: usize = grid.bust(camera_to_raster, sink);
                    Statistics::inc(&ctx.stats.micro_polygons, n as u64);
                    emitted += n;
                }
                Err(e) => {
                    warn!("dicing failed: {}", e);
                    Statistics::inc(&ctx.stats.errors, 1);
                }
            }
        } else if primitive.common.split_depth >= max_split_depth {
            warn!(
                "primitive not diceable after {} splits, discarded",
                primitive.common.split_depth
            );
            Statistics::inc(&ctx.stats.discarded, 1);
        } else {
            let _timer = ctx.stats.splits.start();
            let mut children: Vec<Primitive> = Vec::with_capacity(2);
            primitive.split(&mut children);
            // first child on top
            stack.extend(children.into_iter().rev());
        }
    }
    emitted
}

/// Dice all *primitives* using *num_threads* workers (`0` means one
/// per core) and return the collected, depth sorted buckets.
pub fn dice_scene(ctx: &RenderContext, primitives: &[Primitive], num_threads: u8) -> BucketCollector {
    let num_cores: usize = if num_threads == 0_u8 {
        num_cpus::get()
    } else {
        num_threads as usize
    };
    info!("Dicing with {:?} thread(s) ...", num_cores);
    let queue: PrimitiveQueue = PrimitiveQueue::new(primitives.len(), (0, 0));
    let finished: AtomicUsize = AtomicUsize::new(0);
    let mut collector: BucketCollector =
        BucketCollector::new(ctx.options.resolution(), ctx.options.bucket_size());
    {
        let queue = &queue;
        let finished = &finished;
        let collector = &mut collector;
        let camera_to_raster: Transform = ctx.camera_to_raster();
        crossbeam::scope(|scope| {
            let (mpg_tx, mpg_rx) = crossbeam_channel::bounded::<Vec<MicroPolygon>>(num_cores * 4);
            // spawn worker threads
            for _ in 0..num_cores {
                let mpg_tx = mpg_tx.clone();
                scope.spawn(move |_| {
                    let mut sink: ChannelSink = ChannelSink::new(mpg_tx, BATCH_SIZE);
                    while let Some(index) = queue.next() {
                        let mut primitive: Primitive = primitives[index].clone();
                        primitive.transform(ctx);
                        let n: usize = dice_primitive(ctx, primitive, &camera_to_raster, &mut sink);
                        debug!("primitive {} gave {} micropolygons", index, n);
                        finished.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
            // the workers hold the only senders now
            drop(mpg_tx);
            // spawn thread to collect micropolygons into buckets
            scope.spawn(move |_| {
                let mut pb = pbr::ProgressBar::new(queue.len() as u64);
                for batch in mpg_rx.iter() {
                    for mpg in batch {
                        collector.add_micro_polygon(mpg);
                    }
                    pb.set(finished.load(Ordering::Relaxed) as u64);
                }
                pb.set(finished.load(Ordering::Relaxed) as u64);
                pb.finish();
            });
        })
        .unwrap_or_else(|_| warn!("a dicing thread panicked"));
    }
    collector.sort_buckets();
    collector
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Vector3f;
    use crate::core::paramset::{Attributes, Options};
    use crate::core::transform::MotionTransform;
    use crate::shapes::sphere::Sphere;
    use crate::shapes::Shape;
    use std::sync::Arc;

    fn sphere(x: f32, z: f32, radius: f32) -> Primitive {
        Primitive::new(
            Shape::Sphere(Sphere::new(radius, -radius, radius, 0.0, 360.0)),
            Arc::new(Attributes::default()),
            Arc::new(MotionTransform::new(Transform::translate(&Vector3f {
                x,
                y: 0.0,
                z,
            }))),
        )
    }

    #[test]
    fn large_sphere_gets_split_and_diced() {
        let ctx = RenderContext::new(Options::default(), Transform::default());
        let mut primitive = sphere(0.0, 4.0, 1.0);
        primitive.transform(&ctx);
        let mut mpgs: Vec<MicroPolygon> = Vec::new();
        let n = dice_primitive(&ctx, primitive, &ctx.camera_to_raster(), &mut mpgs);
        assert_eq!(n, mpgs.len());
        assert!(n > 256);
        assert!(Statistics::get(&ctx.stats.grids) > 1);
        assert_eq!(Statistics::get(&ctx.stats.errors), 0);
    }

    #[test]
    fn threads_see_every_primitive() {
        let ctx = RenderContext::new(Options::default(), Transform::default());
        let primitives: Vec<Primitive> = (0..6)
            .map(|i| sphere(i as f32 - 2.5, 8.0, 0.3))
            .collect();
        let buckets = dice_scene(&ctx, &primitives, 3);
        assert_eq!(
            (buckets.n_micro_polygons() + buckets.n_culled) as u64,
            Statistics::get(&ctx.stats.micro_polygons)
        );
        assert!(buckets.n_micro_polygons() > 0);
    }
}
