// std
use std::sync::Arc;
// reyes
use rs_reyes::core::bucket::BucketCollector;
use rs_reyes::core::bucket::MicroPolygonSink;
use rs_reyes::core::context::RenderContext;
use rs_reyes::core::geometry::{bnd3_expand, pnt3_inside_bnd3, Point3f, Vector3f};
use rs_reyes::core::micropolygon::MicroPolygon;
use rs_reyes::core::parameters::{ParamValue, Parameter, PrimitiveVariables};
use rs_reyes::core::paramset::{Attributes, Options};
use rs_reyes::core::primitive::{Primitive, SplitDir};
use rs_reyes::core::render::dice_primitive;
use rs_reyes::core::reyes::{is_power_of_2, Float};
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

const EPS: Float = 1e-4;

fn approx(a: Float, b: Float) -> bool {
    (a - b).abs() < EPS
}

fn context() -> RenderContext {
    RenderContext::new(Options::default(), Transform::default())
}

fn translated(x: Float, y: Float, z: Float) -> Arc<MotionTransform> {
    Arc::new(MotionTransform::new(Transform::translate(&Vector3f {
        x,
        y,
        z,
    })))
}

fn primitive(shape: Shape, attributes: Attributes, z: Float) -> Primitive {
    Primitive::new(shape, Arc::new(attributes), translated(0.0, 0.0, z))
}

fn point(x: Float, y: Float, z: Float) -> Point3f {
    Point3f { x, y, z }
}

/// Angle of a point around the z axis in degrees, in `[0, 360)`.
fn theta_of(p: &Point3f) -> Float {
    let theta: Float = p.y.atan2(p.x).to_degrees();
    if theta < 0.0 {
        theta + 360.0
    } else {
        theta
    }
}

fn same_angle(a: Float, b: Float) -> bool {
    let d: Float = (a - b).rem_euclid(360.0);
    d < 0.01 || d > 359.99
}

fn families() -> Vec<Vec<Shape>> {
    vec![
        vec![
            Shape::Sphere(Sphere::new(1.0, -1.0, 1.0, 0.0, 360.0)),
            Shape::Sphere(Sphere::new(2.0, -0.5, 1.5, 30.0, 120.0)),
            Shape::Sphere(Sphere::new(0.5, -2.0, 2.0, -90.0, 45.0)),
            Shape::Sphere(Sphere::new(1.0, 0.0, 1.0, 0.0, 200.0)),
            Shape::Sphere(Sphere::new(3.0, -3.0, -1.0, 270.0, 360.0)),
        ],
        vec![
            Shape::Cone(Cone::new(2.0, 1.0, 0.0, 360.0, 0.0, 2.0)),
            Shape::Cone(Cone::new(1.0, 2.0, 0.0, 90.0, 0.0, 0.5)),
            Shape::Cone(Cone::new(3.0, 0.5, -45.0, 45.0, 1.0, 2.0)),
            Shape::Cone(Cone::new(1.0, 1.0, 10.0, 300.0, 0.0, 1.0)),
            Shape::Cone(Cone::new(4.0, 3.0, 180.0, 360.0, 0.5, 3.5)),
        ],
        vec![
            Shape::Cylinder(Cylinder::new(1.0, -1.0, 1.0, 0.0, 360.0)),
            Shape::Cylinder(Cylinder::new(2.0, 0.0, 10.0, 0.0, 90.0)),
            Shape::Cylinder(Cylinder::new(0.5, 2.0, 3.0, -60.0, 60.0)),
            Shape::Cylinder(Cylinder::new(3.0, -2.0, 0.0, 100.0, 250.0)),
            Shape::Cylinder(Cylinder::new(1.5, 0.0, 0.1, 0.0, 359.0)),
        ],
        vec![
            Shape::Hyperboloid(Hyperboloid::new(
                point(1.0, 0.0, -1.0),
                point(1.0, 0.0, 1.0),
                0.0,
                360.0,
            )),
            Shape::Hyperboloid(Hyperboloid::new(
                point(1.0, -0.5, -1.0),
                point(0.5, 1.0, 1.0),
                0.0,
                360.0,
            )),
            Shape::Hyperboloid(Hyperboloid::new(
                point(0.0, 0.0, 0.0),
                point(2.0, 0.0, 1.0),
                0.0,
                180.0,
            )),
            Shape::Hyperboloid(Hyperboloid::new(
                point(0.2, 0.3, 2.0),
                point(-1.0, 1.0, -2.0),
                45.0,
                135.0,
            )),
            Shape::Hyperboloid(Hyperboloid::new(
                point(2.0, 2.0, 0.0),
                point(2.0, 2.0, 0.0),
                -30.0,
                30.0,
            )),
        ],
        vec![
            Shape::Paraboloid(Paraboloid::new(1.0, 0.0, 2.0, 0.0, 360.0)),
            Shape::Paraboloid(Paraboloid::new(2.0, 1.0, 3.0, 0.0, 90.0)),
            Shape::Paraboloid(Paraboloid::new(0.5, 0.5, 1.0, -90.0, 90.0)),
            Shape::Paraboloid(Paraboloid::new(3.0, 0.0, 0.5, 0.0, 270.0)),
            Shape::Paraboloid(Paraboloid::new(1.0, 0.25, 4.0, 120.0, 240.0)),
        ],
        vec![
            Shape::Torus(Torus::new(1.0, 0.25, 0.0, 360.0, 0.0, 360.0)),
            Shape::Torus(Torus::new(2.0, 0.5, -90.0, 90.0, 0.0, 180.0)),
            Shape::Torus(Torus::new(1.0, 0.5, 90.0, 270.0, 30.0, 60.0)),
            Shape::Torus(Torus::new(3.0, 1.0, 0.0, 45.0, 0.0, 360.0)),
            Shape::Torus(Torus::new(0.5, 0.5, 0.0, 360.0, -45.0, 300.0)),
        ],
        vec![
            Shape::Disk(Disk::new(0.0, 0.0, 1.0, 0.0, 360.0)),
            Shape::Disk(Disk::new(1.0, 0.5, 2.0, 0.0, 90.0)),
            Shape::Disk(Disk::new(-2.0, 1.0, 1.5, -45.0, 45.0)),
            Shape::Disk(Disk::new(0.5, 0.0, 3.0, 100.0, 350.0)),
            Shape::Disk(Disk::new(0.0, 0.2, 0.4, 0.0, -180.0)),
        ],
    ]
}

#[test]
fn bound_contains_every_diced_point() {
    let ctx = context();
    for family in families() {
        for shape in family {
            let mut prim = primitive(shape, Attributes::default(), 6.0);
            prim.transform(&ctx);
            prim.common.u_dice_size = 17;
            prim.common.v_dice_size = 13;
            let b = bnd3_expand(&prim.bound(&ctx), EPS);
            for v in 0..=13 {
                for u in 0..=17 {
                    let p = prim
                        .common
                        .object_to_camera
                        .transform_point(&prim.dice_point(u, v));
                    assert!(
                        pnt3_inside_bnd3(&p, &b),
                        "{:?} at ({}, {}) outside of {:?}",
                        p,
                        u,
                        v,
                        b
                    );
                }
            }
        }
    }
}

#[test]
fn corners_stay_inside_the_parameter_ranges() {
    for family in families() {
        for shape in family {
            let (theta_min, theta_max) = shape.theta_range().unwrap();
            let (us, vs) = (7, 5);
            for (u, v) in [(0, 0), (us, 0), (0, vs), (us, vs)] {
                let p = shape.dice_point(u, v, us, vs);
                let expected = if u == 0 { theta_min } else { theta_max };
                // the generating line of a hyperboloid may start off the x axis
                let on_x_axis: bool = match &shape {
                    Shape::Hyperboloid(h) => h.p1.y == 0.0 && h.p2.y == 0.0,
                    _ => true,
                };
                if on_x_axis && (p.x.abs() > EPS || p.y.abs() > EPS) {
                    assert!(same_angle(theta_of(&p), expected));
                }
                match &shape {
                    Shape::Sphere(s) => {
                        assert!(p.z >= s.z_min.max(-s.radius) - EPS);
                        assert!(p.z <= s.z_max.min(s.radius) + EPS);
                    }
                    Shape::Cone(s) => assert!(p.z >= s.z_min - EPS && p.z <= s.z_max + EPS),
                    Shape::Cylinder(s) => assert!(p.z >= s.z_min - EPS && p.z <= s.z_max + EPS),
                    Shape::Paraboloid(s) => {
                        assert!(p.z >= s.z_min - EPS && p.z <= s.z_max + EPS)
                    }
                    Shape::Hyperboloid(s) => {
                        let lo = s.p1.z.min(s.p2.z);
                        let hi = s.p1.z.max(s.p2.z);
                        assert!(p.z >= lo - EPS && p.z <= hi + EPS);
                    }
                    Shape::Torus(s) => {
                        let r = (p.x * p.x + p.y * p.y).sqrt() - s.major_radius;
                        assert!(approx((r * r + p.z * p.z).sqrt(), s.minor_radius));
                    }
                    Shape::Disk(s) => {
                        let r = (p.x * p.x + p.y * p.y).sqrt();
                        assert!(r >= s.minor_radius - EPS && r <= s.major_radius + EPS);
                        assert_eq!(p.z, s.height);
                    }
                    Shape::Points(_) => unreachable!(),
                }
            }
        }
    }
}

#[test]
fn theta_split_is_exact() {
    let pairs: [(Float, Float); 6] = [
        (0.0, 360.0),
        (-30.0, 45.0),
        (10.0, 370.0),
        (90.0, -90.0),
        (0.1, 359.3),
        (12.345, 67.891),
    ];
    for (theta_min, theta_max) in pairs {
        let sphere = Sphere::new(1.0, -1.0, 1.0, theta_min, theta_max);
        let (a, b) = sphere.halve(true);
        assert_eq!(a.theta_min, theta_min);
        assert_eq!(a.theta_max, b.theta_min);
        assert_eq!(b.theta_max, theta_max);
        // shared edge is bit identical, no cracks
        for v in 0..=4 {
            assert_eq!(a.dice_point(6, v, 6, 4), b.dice_point(0, v, 3, 4));
        }
        let (a, b) = sphere.halve(false);
        for u in 0..=6 {
            assert_eq!(a.dice_point(u, 4, 6, 4), b.dice_point(u, 0, 6, 2));
        }
    }
}

#[test]
fn every_family_splits_without_cracks() {
    for family in families() {
        for shape in family {
            let (a, b) = shape.halve(true);
            for v in 0..=3 {
                assert_eq!(a.dice_point(4, v, 4, 3), b.dice_point(0, v, 4, 3));
            }
            let (a, b) = shape.halve(false);
            for u in 0..=4 {
                let pa = a.dice_point(u, 3, 4, 3);
                let pb = b.dice_point(u, 0, 4, 3);
                assert!(
                    approx(pa.x, pb.x) && approx(pa.y, pb.y) && approx(pa.z, pb.z),
                    "{:?} != {:?}",
                    pa,
                    pb
                );
            }
        }
    }
}

fn estimate(shading_rate: Float, binary: bool) -> (i32, i32) {
    let ctx = context();
    let mut attributes = Attributes::default();
    attributes.set_shading_rate(shading_rate);
    attributes
        .values
        .add_int("dice", "binary", if binary { 1 } else { 0 });
    let mut prim = primitive(
        Shape::Torus(Torus::new(1.0, 0.3, 0.0, 360.0, 0.0, 270.0)),
        attributes,
        9.0,
    );
    prim.transform(&ctx);
    prim.estimate_grid_size(&ctx);
    (prim.common.u_dice_size, prim.common.v_dice_size)
}

#[test]
fn estimate_is_monotonic_in_shading_rate() {
    let rates: [Float; 6] = [16.0, 4.0, 2.0, 1.0, 0.5, 0.25];
    let mut last = (0, 0);
    for rate in rates {
        let size = estimate(rate, false);
        assert!(size.0 >= last.0 && size.1 >= last.1, "{:?} < {:?}", size, last);
        assert!(size.0 >= 1 && size.1 >= 1);
        last = size;
    }
}

#[test]
fn binary_dicing_gives_larger_powers_of_two() {
    for rate in [16.0, 3.0, 1.0, 0.3] {
        let plain = estimate(rate, false);
        let binary = estimate(rate, true);
        assert!(is_power_of_2(binary.0) && is_power_of_2(binary.1));
        assert!(binary.0 >= plain.0 && binary.1 >= plain.1);
    }
}

#[test]
fn too_large_primitive_splits_into_smaller_children() {
    let ctx = context();
    let mut prim = primitive(Shape::Sphere(Sphere::default()), Attributes::default(), 3.0);
    prim.transform(&ctx);
    assert!(!prim.cull(&ctx));
    let parent = prim.estimate_grid_size(&ctx);
    assert!(!prim.diceable(&ctx));
    assert!(parent > 256);
    let mut children: Vec<Primitive> = Vec::new();
    assert_eq!(prim.split(&mut children), 2);
    assert_eq!(children.len(), 2);
    for child in children.iter_mut() {
        assert!(child.estimate_grid_size(&ctx) < parent);
    }
}

#[test]
fn split_direction_follows_the_larger_size() {
    let ctx = context();
    // long and thin along theta
    let mut prim = primitive(
        Shape::Cylinder(Cylinder::new(2.0, -0.05, 0.05, 0.0, 360.0)),
        Attributes::default(),
        0.0,
    );
    prim.common.transform = Arc::new(MotionTransform::new(
        Transform::translate(&Vector3f {
            x: 0.0,
            y: 0.0,
            z: 4.0,
        }) * Transform::rotate(
            -90.0,
            &Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
        ),
    ));
    prim.transform(&ctx);
    prim.cull(&ctx);
    prim.diceable(&ctx);
    assert!(prim.common.u_dice_size > prim.common.v_dice_size);
    assert_eq!(prim.common.split_dir, SplitDir::U);
}

#[test]
fn unit_sphere_equator() {
    let mut prim = primitive(Shape::Sphere(Sphere::default()), Attributes::default(), 0.0);
    prim.common.u_dice_size = 4;
    prim.common.v_dice_size = 4;
    let p = prim.dice_point(2, 2);
    assert!(approx(p.x, -1.0) && approx(p.y, 0.0) && approx(p.z, 0.0));
}

#[test]
fn cylinder_ends_are_exact() {
    let mut prim = primitive(
        Shape::Cylinder(Cylinder::new(2.0, 0.0, 10.0, 0.0, 90.0)),
        Attributes::default(),
        0.0,
    );
    prim.common.u_dice_size = 5;
    prim.common.v_dice_size = 1;
    for u in 0..=5 {
        assert_eq!(prim.dice_point(u, 0).z, 0.0);
        assert_eq!(prim.dice_point(u, 1).z, 10.0);
    }
}

fn cloud_primitive(z: Float) -> Primitive {
    let mut variables = PrimitiveVariables::default();
    variables.set(Parameter::new("constantwidth", ParamValue::Float(vec![0.5])).unwrap());
    let positions = vec![
        point(-1.0, -1.0, 0.0),
        point(1.0, -1.0, 0.0),
        point(-1.0, 1.0, 0.0),
        point(1.0, 1.0, 0.0),
    ];
    let cloud = PointCloud::new(positions, variables).unwrap();
    Primitive::new(
        Shape::Points(Points::new(Arc::new(cloud))),
        Arc::new(Attributes::default()),
        translated(0.0, 0.0, z),
    )
}

#[test]
fn points_dice_into_camera_facing_squares() {
    let ctx = context();
    let mut prim = cloud_primitive(5.0);
    prim.transform(&ctx);
    assert!(!prim.cull(&ctx));
    assert!(prim.diceable(&ctx));
    let grid = prim.dice(&ctx).unwrap();
    assert_eq!(grid.n_vertices(), 4);
    assert_eq!(grid.p.len(), 4);
    let mut mpgs: Vec<MicroPolygon> = Vec::new();
    assert_eq!(grid.bust(&ctx.camera_to_raster(), &mut mpgs), 4);
    for mpg in &mpgs {
        match mpg {
            MicroPolygon::Static(quad) => {
                // width 0.5 at depth 5 is 24 pixels wide
                assert!((quad.p[1].x - quad.p[0].x - 24.0).abs() < 1e-2);
                assert!((quad.p[2].y - quad.p[1].y - 24.0).abs() < 1e-2);
                assert_eq!(quad.p[0].z, 5.0);
            }
            MicroPolygon::Motion(_) => panic!("static cloud gave motion micropolygons"),
        }
    }
}

#[test]
fn points_split_at_the_median_and_share_the_cloud() {
    let ctx = RenderContext::new(
        {
            let mut options = Options::default();
            options.values.add_int("limits", "gridsize", 1);
            options
        },
        Transform::default(),
    );
    let mut prim = cloud_primitive(5.0);
    prim.transform(&ctx);
    assert!(!prim.diceable(&ctx));
    let mut mpgs: Vec<MicroPolygon> = Vec::new();
    let n = dice_primitive(&ctx, prim, &ctx.camera_to_raster(), &mut mpgs);
    assert_eq!(n, 4);
}

#[test]
fn moving_sphere_gives_motion_micropolygons() {
    let ctx = context();
    let mut transform = MotionTransform::new(Transform::translate(&Vector3f {
        x: -0.5,
        y: 0.0,
        z: 20.0,
    }));
    transform.add_key(
        1.0,
        Transform::translate(&Vector3f {
            x: 0.5,
            y: 0.0,
            z: 20.0,
        }),
    );
    let mut prim = Primitive::new(
        Shape::Sphere(Sphere::new(0.2, -0.2, 0.2, 0.0, 360.0)),
        Arc::new(Attributes::default()),
        Arc::new(transform),
    );
    prim.transform(&ctx);
    let b = prim.bound(&ctx);
    assert!(b.p_min.x <= -0.7 + EPS && b.p_max.x >= 0.7 - EPS);
    let mut collector = BucketCollector::new((640, 480), (16, 16));
    let mut mpgs: Vec<MicroPolygon> = Vec::new();
    let n = dice_primitive(&ctx, prim, &ctx.camera_to_raster(), &mut mpgs);
    assert!(n > 0);
    assert!(mpgs.iter().all(|mpg| mpg.n_keys() == 2));
    for mpg in mpgs {
        collector.add_micro_polygon(mpg);
    }
    collector.sort_buckets();
    assert_eq!(collector.n_micro_polygons(), n);
}

fn assert_moving_squares(mpgs: &[MicroPolygon]) {
    for mpg in mpgs {
        match mpg {
            MicroPolygon::Motion(motion) => {
                assert_eq!(motion.keys.len(), 2);
                assert_eq!(mpg.n_keys(), 2);
                let (t0, p0) = motion.keys[0];
                let (t1, p1) = motion.keys[1];
                assert!(t0 < t1);
                // half a unit at depth 5 is many pixels
                assert!((p1[0].x - p0[0].x).abs() > 1.0);
            }
            MicroPolygon::Static(_) => panic!("moving points gave a static micropolygon"),
        }
    }
}

#[test]
fn deforming_points_give_one_motion_square_each() {
    let ctx = context();
    let mut variables = PrimitiveVariables::default();
    variables.set(Parameter::new("constantwidth", ParamValue::Float(vec![0.1])).unwrap());
    let positions = vec![point(-1.0, 0.0, 0.0), point(1.0, 0.0, 0.0)];
    let moved: Vec<Point3f> = positions.iter().map(|p| point(p.x + 0.5, p.y, p.z)).collect();
    let mut cloud = PointCloud::new(positions, variables).unwrap();
    cloud.add_time_slot(1.0, moved).unwrap();
    let mut prim = Primitive::new(
        Shape::Points(Points::new(Arc::new(cloud))),
        Arc::new(Attributes::default()),
        translated(0.0, 0.0, 5.0),
    );
    prim.transform(&ctx);
    let mut mpgs: Vec<MicroPolygon> = Vec::new();
    let n = dice_primitive(&ctx, prim, &ctx.camera_to_raster(), &mut mpgs);
    assert_eq!(n, 2);
    assert_moving_squares(&mpgs);
}

#[test]
fn moving_transform_carries_a_static_cloud() {
    let ctx = context();
    let mut variables = PrimitiveVariables::default();
    variables.set(Parameter::new("constantwidth", ParamValue::Float(vec![0.1])).unwrap());
    let cloud = PointCloud::new(vec![point(-1.0, 0.0, 0.0), point(1.0, 0.0, 0.0)], variables).unwrap();
    let mut transform = MotionTransform::new(Transform::translate(&Vector3f {
        x: 0.0,
        y: 0.0,
        z: 5.0,
    }));
    transform.add_key(
        1.0,
        Transform::translate(&Vector3f {
            x: 0.5,
            y: 0.0,
            z: 5.0,
        }),
    );
    let mut prim = Primitive::new(
        Shape::Points(Points::new(Arc::new(cloud))),
        Arc::new(Attributes::default()),
        Arc::new(transform),
    );
    prim.transform(&ctx);
    let mut mpgs: Vec<MicroPolygon> = Vec::new();
    let n = dice_primitive(&ctx, prim, &ctx.camera_to_raster(), &mut mpgs);
    assert_eq!(n, 2);
    assert_moving_squares(&mpgs);
}
