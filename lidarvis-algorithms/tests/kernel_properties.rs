//! End-to-end checks of the projection / colorization / comparison kernel

use approx::assert_relative_eq;
use lidarvis_algorithms::*;
use lidarvis_core::{range_of, LaserScan, Point3f, PointCloud};
use std::collections::BTreeMap;

fn ring_scan(count: usize) -> LaserScan {
    let mut points = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);
    let mut remissions = Vec::with_capacity(count);
    for i in 0..count {
        let angle = i as f32 / count as f32 * std::f32::consts::TAU;
        let distance = 5.0 + (i % 7) as f32;
        let height = -1.5 + (i % 11) as f32 * 0.3;
        points.push(Point3f::new(distance * angle.cos(), distance * angle.sin(), height));
        labels.push((i % 3) as u32 * 10);
        remissions.push((i % 5) as f32 / 4.0);
    }
    LaserScan::labeled_with_remission(PointCloud::from_points(points), labels, remissions).unwrap()
}

fn table() -> LabelColorTable {
    LabelColorTable::new(BTreeMap::from([
        (0, [10, 10, 10]),
        (10, [245, 150, 100]),
        (20, [30, 60, 150]),
    ]))
}

fn params() -> ProjectionParams {
    ProjectionParams::new(3.0, -25.0, 64, 900).unwrap()
}

#[test]
fn test_every_pixel_range_is_a_point_norm_or_empty() {
    let scan = ring_scan(2000);
    let proj = project(&scan, &params());
    let norms: Vec<f32> = scan.points().iter().map(range_of).collect();

    for ((row, col), &range) in proj.range.indexed_iter() {
        match proj.index[[row, col]] {
            Some(i) => assert_eq!(range, norms[i]),
            None => assert_eq!(range, EMPTY),
        }
    }
    assert!(proj.occupied_count() > 0);
}

#[test]
fn test_projection_is_deterministic() {
    let scan = ring_scan(1500);
    assert_eq!(project(&scan, &params()), project(&scan, &params()));
}

#[test]
fn test_identical_frames_compare_clean() {
    let scan = ring_scan(3000);
    let source = project(&scan, &params());
    let target = project(&scan, &params());

    let diff = compare(&source, &target, &table()).unwrap();
    assert_relative_eq!(diff.summary.mean_iou.unwrap(), 1.0);
    assert_relative_eq!(diff.summary.accuracy.unwrap(), 1.0);
    assert_relative_eq!(diff.summary.mse, 0.0);
    for ((row, col), &d) in diff.range_diff.indexed_iter() {
        let expected = if source.is_occupied(row, col) { 0.0 } else { EMPTY };
        assert_eq!(d, expected);
    }
    assert!(diff.label_diff.unwrap().iter().all(|&c| c == [0, 0, 0]));
    let remission_diff = diff.remission_diff.unwrap();
    assert!(remission_diff.iter().all(|&d| d == 0.0 || d == EMPTY));
}

#[test]
fn test_comparison_requires_matching_resolution() {
    let scan = ring_scan(100);
    let source = project(&scan, &params());
    let target = project(&scan, &ProjectionParams::new(3.0, -25.0, 32, 900).unwrap());
    assert!(compare(&source, &target, &table()).is_err());
}

#[test]
fn test_unlabeled_target_skips_label_scores() {
    let scan = ring_scan(500);
    let source = project(&scan, &params());
    let target = project(&LaserScan::unlabeled(scan.points().clone()), &params());

    let diff = compare(&source, &target, &table()).unwrap();
    assert!(diff.label_diff.is_none());
    assert!(diff.summary.mean_iou.is_none());
    assert!(diff.summary.accuracy.is_none());
    assert_relative_eq!(diff.summary.mse, 0.0);
}

#[test]
fn test_relabeled_target_lowers_scores() {
    let scan = ring_scan(1000);
    let source = project(&scan, &params());
    let shifted: Vec<u32> = scan.labels().unwrap().iter().map(|&l| (l + 10) % 30).collect();
    let target_scan = LaserScan::labeled(scan.points().clone(), shifted).unwrap();
    let target = project(&target_scan, &params());

    let diff = compare(&source, &target, &table()).unwrap();
    assert_relative_eq!(diff.summary.accuracy.unwrap(), 0.0);
    assert_relative_eq!(diff.summary.mean_iou.unwrap(), 0.0);
}

#[test]
fn test_range_image_is_black_only_where_empty() {
    let scan = ring_scan(800);
    let proj = project(&scan, &params());
    let image = range_image(&proj, &Colormap::viridis());

    for ((row, col), color) in image.indexed_iter() {
        assert_eq!(*color == [0, 0, 0], !proj.is_occupied(row, col));
    }
}

#[test]
fn test_error_images_are_black_only_where_source_is_empty() {
    let source = project(&ring_scan(600), &params());
    let target = project(&ring_scan(900), &params());
    let diff = compare(&source, &target, &table()).unwrap();
    let cmap = Colormap::viridis();

    let range = colorize_grid(&diff.range_diff, ScalarKind::Error, 1.0, &cmap);
    let remission = colorize_grid(&diff.remission_diff.unwrap(), ScalarKind::Error, 1.0, &cmap);
    for ((row, col), color) in range.indexed_iter() {
        let empty = !source.is_occupied(row, col);
        assert_eq!(*color == [0, 0, 0], empty, "range pixel ({}, {})", row, col);
        assert_eq!(remission[[row, col]] == [0, 0, 0], empty, "remission pixel ({}, {})", row, col);
    }
}
