// std
use std::sync::Arc;
// others
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
// reyes
use rs_reyes::core::context::RenderContext;
use rs_reyes::core::error::DiceError;
use rs_reyes::core::geometry::{Point3f, Vector3f};
use rs_reyes::core::parameters::{ParamValue, Parameter, PrimitiveVariables};
use rs_reyes::core::paramset::{Attributes, Options};
use rs_reyes::core::primitive::Primitive;
use rs_reyes::core::render::dice_scene;
use rs_reyes::core::reyes::Float;
use rs_reyes::core::rng::Rng;
use rs_reyes::core::spectrum::Color;
use rs_reyes::core::transform::{MotionTransform, Transform};
use rs_reyes::shapes::cone::Cone;
use rs_reyes::shapes::cylinder::Cylinder;
use rs_reyes::shapes::disk::Disk;
use rs_reyes::shapes::hyperboloid::Hyperboloid;
use rs_reyes::shapes::paraboloid::Paraboloid;
use rs_reyes::shapes::points::{PointCloud, Points};
use rs_reyes::shapes::sphere::Sphere;
use rs_reyes::shapes::torus::Torus;
use rs_reyes::shapes::Shape;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DemoScene {
    /// one of every quadric
    Quadrics,
    /// a random point cloud
    Points,
    /// a sphere moving during the shutter interval
    Motion,
    /// everything at once
    All,
}

/// Dice a built-in demo scene into micropolygons and report statistics.
#[derive(Parser)]
#[command(version = VERSION)]
struct Cli {
    /// use specified number of threads for dicing
    #[arg(short = 't', long = "nthreads", default_value_t = 0)]
    nthreads: u8,
    /// scene to dice
    #[arg(short = 's', long = "scene", value_enum, default_value_t = DemoScene::All)]
    scene: DemoScene,
    /// target micropolygon area in pixels
    #[arg(short = 'r', long = "shadingrate", default_value_t = 1.0)]
    shading_rate: Float,
    /// maximum number of grid samples (limits:gridsize)
    #[arg(short = 'g', long = "gridsize")]
    grid_size: Option<i32>,
    /// round dice sizes up to powers of two
    #[arg(short = 'b', long = "binary")]
    binary: bool,
    /// flip the geometric normals
    #[arg(short = 'o', long = "orientation")]
    flip: bool,
    /// image width
    #[arg(short = 'x', long = "xres", default_value_t = 640)]
    xres: i32,
    /// image height
    #[arg(short = 'y', long = "yres", default_value_t = 480)]
    yres: i32,
    /// number of points for the point cloud scenes
    #[arg(short = 'n', long = "npoints", default_value_t = 10000)]
    n_points: usize,
}

fn placed(x: Float, y: Float, z: Float, tilt: Float) -> Arc<MotionTransform> {
    Arc::new(MotionTransform::new(
        Transform::translate(&Vector3f { x, y, z })
            * Transform::rotate(
                tilt,
                &Vector3f {
                    x: 1.0,
                    y: 0.0,
                    z: 0.0,
                },
            ),
    ))
}

fn quadrics(attributes: &Arc<Attributes>) -> Vec<Primitive> {
    let shapes: Vec<(Shape, Float, Float)> = vec![
        (
            Shape::Sphere(Sphere::new(1.0, -1.0, 1.0, 0.0, 360.0)),
            -3.0,
            1.5,
        ),
        (
            Shape::Cone(Cone::new(2.0, 1.0, 0.0, 360.0, 0.0, 2.0)),
            0.0,
            1.5,
        ),
        (
            Shape::Cylinder(Cylinder::new(0.8, -1.0, 1.0, 0.0, 270.0)),
            3.0,
            1.5,
        ),
        (
            Shape::Hyperboloid(Hyperboloid::new(
                Point3f {
                    x: 1.0,
                    y: -0.5,
                    z: -1.0,
                },
                Point3f {
                    x: 0.5,
                    y: 1.0,
                    z: 1.0,
                },
                0.0,
                360.0,
            )),
            -3.0,
            -1.5,
        ),
        (
            Shape::Paraboloid(Paraboloid::new(1.0, 0.0, 2.0, 0.0, 360.0)),
            0.0,
            -1.5,
        ),
        (
            Shape::Torus(Torus::new(1.0, 0.3, 0.0, 360.0, 0.0, 360.0)),
            3.0,
            -1.5,
        ),
        (
            Shape::Disk(Disk::new(0.0, 0.3, 1.0, 0.0, 360.0)),
            0.0,
            0.0,
        ),
    ];
    shapes
        .into_iter()
        .map(|(shape, x, y)| Primitive::new(shape, Arc::clone(attributes), placed(x, y, 8.0, -60.0)))
        .collect()
}

fn random_cloud(n_points: usize) -> Result<PointCloud, DiceError> {
    let mut rng: Rng = Rng::new(17);
    let positions: Vec<Point3f> = (0..n_points)
        .map(|_| Point3f {
            x: rng.uniform_range(-4.0, 4.0),
            y: rng.uniform_range(-3.0, 3.0),
            z: rng.uniform_range(-1.0, 1.0),
        })
        .collect();
    let widths: Vec<Float> = (0..n_points)
        .map(|_| rng.uniform_range(0.01, 0.05))
        .collect();
    let colors: Vec<Color> = (0..n_points)
        .map(|_| {
            Color::rgb(
                rng.uniform_float(),
                rng.uniform_float(),
                rng.uniform_float(),
            )
        })
        .collect();
    let mut variables: PrimitiveVariables = PrimitiveVariables::default();
    variables.set(Parameter::new("width", ParamValue::Float(widths))?);
    variables.set(Parameter::new("Cs", ParamValue::Color(colors))?);
    PointCloud::new(positions, variables)
}

fn point_cloud(attributes: &Arc<Attributes>, n_points: usize) -> Option<Primitive> {
    match random_cloud(n_points) {
        Ok(cloud) => Some(Primitive::new(
            Shape::Points(Points::new(Arc::new(cloud))),
            Arc::clone(attributes),
            placed(0.0, 0.0, 10.0, 0.0),
        )),
        Err(e) => {
            warn!("point cloud skipped: {}", e);
            None
        }
    }
}

fn moving_sphere(attributes: &Arc<Attributes>) -> Primitive {
    let mut transform: MotionTransform = MotionTransform::new(Transform::translate(&Vector3f {
        x: -1.0,
        y: 0.0,
        z: 6.0,
    }));
    transform.add_key(
        1.0,
        Transform::translate(&Vector3f {
            x: 1.0,
            y: 0.0,
            z: 6.0,
        }),
    );
    Primitive::new(
        Shape::Sphere(Sphere::default()),
        Arc::clone(attributes),
        Arc::new(transform),
    )
}

fn main() {
    tracing_subscriber::fmt::init();
    // handle command line options
    let args = Cli::parse();
    let num_cores = num_cpus::get();
    info!("rs_reyes version {} [Detected {} cores]", VERSION, num_cores);
    let mut options: Options = Options::default();
    options
        .values
        .add_ints("Format", "Resolution", vec![args.xres, args.yres]);
    if let Some(grid_size) = args.grid_size {
        options.values.add_int("limits", "gridsize", grid_size);
    }
    let mut attributes: Attributes = Attributes::default();
    attributes.set_shading_rate(args.shading_rate);
    attributes
        .values
        .add_int("dice", "binary", if args.binary { 1 } else { 0 });
    attributes
        .values
        .add_int("System", "Orientation", if args.flip { 1 } else { 0 });
    let attributes: Arc<Attributes> = Arc::new(attributes);
    let mut primitives: Vec<Primitive> = Vec::new();
    if args.scene == DemoScene::Quadrics || args.scene == DemoScene::All {
        primitives.extend(quadrics(&attributes));
    }
    if args.scene == DemoScene::Points || args.scene == DemoScene::All {
        primitives.extend(point_cloud(&attributes, args.n_points));
    }
    if args.scene == DemoScene::Motion || args.scene == DemoScene::All {
        primitives.push(moving_sphere(&attributes));
    }
    let ctx: RenderContext = RenderContext::new(options, Transform::default());
    let buckets = dice_scene(&ctx, &primitives, args.nthreads);
    info!(
        "{} micropolygons in {} buckets, {} outside of the image",
        buckets.n_micro_polygons(),
        buckets.len(),
        buckets.n_culled
    );
    ctx.stats.report();
}
