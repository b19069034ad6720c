#![allow(clippy::unwrap_used)]

use std::f64::consts::{FRAC_PI_4, TAU};
use std::fs;
use std::path::PathBuf;

use kinfield::collision::self_collides;
use kinfield::math::Point2;
use kinfield::model::ShapeKind;
use kinfield::pointcloud::write_ply;
use kinfield::robot::{end_effector, CrossSection};
use kinfield::sampling::record::EnvironmentInfo;
use kinfield::sampling::PoseRecord;
use kinfield::{
    check, check_many, forward, generate_collision_free, GeometryCatalog, ObstacleSource,
    PointCloud, Pose, Reconstruction, RobotCatalog, RobotGeometry, SamplingOptions,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn ring_points() -> Vec<Point2> {
    (0..72)
        .map(|i| {
            let a = f64::from(i) * TAU / 72.0;
            Point2::new(5.0 + a.cos(), 5.0 + a.sin())
        })
        .collect()
}

fn scene_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kinfield-{tag}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ring.ply"), write_ply(&ring_points())).unwrap();
    fs::write(
        dir.join("ring_meta.json"),
        r#"{
            "clustering_eps": 0.3,
            "min_samples": 5,
            "obstacle_type": "auto",
            "workspace_bounds": [0.0, 10.0, 0.0, 10.0]
        }"#,
    )
    .unwrap();
    dir
}

#[test]
fn ring_scene_end_to_end() {
    init_tracing();
    let dir = scene_dir("e2e");
    let cloud = PointCloud::load(dir.join("ring.ply")).unwrap();
    let catalog = RobotCatalog::builtin();
    let geometry = catalog.get_geometry(0).unwrap();

    // The ring becomes one circle hugging the sensed points.
    let report = Reconstruction::new(cloud.reconstruction_params(Default::default()))
        .execute(cloud.points())
        .unwrap();
    assert_eq!(report.model.len(), 1);
    assert_eq!(report.model.count_of(ShapeKind::Circle), 1);
    let (_, obstacle) = report.model.iter().next().unwrap();
    let kinfield::Obstacle::Circle(circle) = obstacle else {
        panic!("expected a circle");
    };
    let inside = cloud
        .points()
        .iter()
        .filter(|p| (*p - circle.center()).norm() <= 1.2 * circle.radius())
        .count();
    assert!(inside * 100 > cloud.points().len() * 85);

    // Straight along +x is clear; pointing at the ring centre is not.
    let clear = Pose::new(vec![0.0, 0.0, 0.0]);
    let blocked = Pose::new(vec![FRAC_PI_4, 0.0, 0.0]);
    let blocked_tip = end_effector(&blocked, geometry).unwrap();
    assert!(report.model.containing(&blocked_tip).is_some());
    let results = check_many(&[clear, blocked], geometry, &report.model, 0.05).unwrap();
    assert!(!results[0].is_collision);
    assert!(results[1].is_collision);
    assert!(results[1].colliding_links.contains(&2));

    let options = SamplingOptions {
        target_count: 30,
        ..SamplingOptions::default()
    };
    let run = generate_collision_free(
        ObstacleSource::Cloud(&cloud),
        geometry,
        &options,
        &mut StdRng::seed_from_u64(2024),
    )
    .unwrap();
    assert!(run.poses.len() <= 30);
    assert!(run.stats.total_sampled <= options.max_attempts);
    assert!((run.workspace.max_x - 10.0).abs() < 1e-12);
    let model = run.model.as_ref().unwrap();
    for pose in &run.poses {
        assert!(!check(pose, geometry, model, options.safety_margin).unwrap().is_collision);
    }

    let record = PoseRecord::new(
        EnvironmentInfo {
            name: cloud.name().to_owned(),
            metadata: cloud.meta().clone(),
        },
        geometry,
        &run,
        &options,
        Some(2024),
    );
    let out = dir.join("ring_robot_0.json");
    record.write_json(&out).unwrap();
    let back = PoseRecord::from_json(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(back.poses.count, run.poses.len());
    assert_eq!(back.poses.format, "joint_angles_radians");
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn long_arm_reaches_past_the_ring() {
    let dir = scene_dir("long-arm");
    let cloud = PointCloud::load(dir.join("ring.ply")).unwrap();
    let report = Reconstruction::new(cloud.reconstruction_params(Default::default()))
        .execute(cloud.points())
        .unwrap();
    let bounds = cloud.meta().workspace_bounds.unwrap();
    let geometry = RobotGeometry::new(
        100,
        "long",
        CrossSection::Rectangle,
        vec![5.0, 4.0, 3.0],
        vec![0.3, 0.25, 0.2],
    )
    .unwrap();

    // Elbow bends below the ring so the tip lands at (8, 8).
    let around = Pose::new(vec![
        0.453_785_605_518_525_87,
        0.359_086_757_462_421_7,
        0.503_050_438_441_727_4,
    ]);
    let tip = end_effector(&around, &geometry).unwrap();
    assert!((tip - Point2::new(8.0, 8.0)).norm() < 1e-6);
    assert!(bounds.contains(&tip));
    assert!(!self_collides(&forward(&around, &geometry).unwrap(), &geometry));
    assert!(!check(&around, &geometry, &report.model, 0.05).unwrap().is_collision);

    // Straight at the ring centre: the tip stops inside the circle.
    let into_ring = Pose::new(vec![FRAC_PI_4, 0.0, 0.0]);
    let robot = RobotCatalog::builtin();
    let standard = robot.get_geometry(0).unwrap();
    let inner_tip = end_effector(&into_ring, standard).unwrap();
    assert!((inner_tip - Point2::new(5.0, 5.0)).norm() < 1.0);
    let result = check(&into_ring, standard, &report.model, 0.05).unwrap();
    assert!(result.is_collision);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn same_seed_same_poses() {
    let catalog = RobotCatalog::builtin();
    let geometry = catalog.get_geometry(3).unwrap();
    let cloud = PointCloud::new("ring", ring_points());
    let options = SamplingOptions {
        target_count: 10,
        ..SamplingOptions::default()
    };
    let a = generate_collision_free(
        ObstacleSource::Cloud(&cloud),
        geometry,
        &options,
        &mut StdRng::seed_from_u64(77),
    )
    .unwrap();
    let b = generate_collision_free(
        ObstacleSource::Cloud(&cloud),
        geometry,
        &options,
        &mut StdRng::seed_from_u64(77),
    )
    .unwrap();
    assert_eq!(a.poses, b.poses);
}

#[test]
fn unknown_robot_is_not_found() {
    let catalog = RobotCatalog::builtin();
    assert!(catalog.get_geometry(42).is_err());
}
