// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end landmark-path geometry tests
//!
//! The mesh model is not needed here: landmark sets are constructed by hand
//! and fed straight into the warping pipeline.

use faceswap_node::vision::swap::swap_with_landmark_sets;
use faceswap_node::vision::{LandmarkPoint, SwapError};
use image::{Rgb, RgbImage};

fn lm(x: f32, y: f32) -> LandmarkPoint {
    LandmarkPoint { x, y, z: 0.0 }
}

/// 5x5 landmark grid spanning the square (16,16)-(48,48)
fn grid_landmarks() -> Vec<LandmarkPoint> {
    let mut points = Vec::new();
    for y in (16..=48).step_by(8) {
        for x in (16..=48).step_by(8) {
            points.push(lm(x as f32, y as f32));
        }
    }
    points
}

/// Source: red left half / blue right half inside the face square, white
/// elsewhere. The pattern must survive warping and color matching.
fn patterned_source() -> RgbImage {
    let mut img = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));
    for y in 16..48 {
        for x in 16..48 {
            let color = if x < 32 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            };
            img.put_pixel(x, y, color);
        }
    }
    img
}

#[test]
fn test_swap_preserves_pattern_inside_hull() {
    let source = patterned_source();
    let target = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));
    let points = grid_landmarks();

    let out = swap_with_landmark_sets(&source, &target, &points, &points).unwrap();
    assert_eq!(out.dimensions(), (64, 64));

    let left = out.get_pixel(24, 32);
    let right = out.get_pixel(40, 32);

    // The two halves of the warped face stay distinct
    let diff = left[0].abs_diff(right[0]) as u32 + left[2].abs_diff(right[2]) as u32;
    assert!(diff > 60, "left {:?} right {:?}", left, right);

    // Neither half is plain target white
    assert_ne!(*left, Rgb([255, 255, 255]));
    assert_ne!(*right, Rgb([255, 255, 255]));
}

#[test]
fn test_swap_leaves_outside_untouched() {
    let source = patterned_source();
    let target = RgbImage::from_pixel(64, 64, Rgb([200, 210, 220]));
    let points = grid_landmarks();

    let out = swap_with_landmark_sets(&source, &target, &points, &points).unwrap();

    assert_eq!(*out.get_pixel(2, 2), Rgb([200, 210, 220]));
    assert_eq!(*out.get_pixel(61, 61), Rgb([200, 210, 220]));
}

#[test]
fn test_swap_with_offset_landmarks() {
    // Target face sits in a different corner; the warp must follow it.
    let source = patterned_source();
    let target = RgbImage::from_pixel(96, 96, Rgb([255, 255, 255]));

    let src_points = grid_landmarks();
    let dst_points: Vec<LandmarkPoint> = src_points
        .iter()
        .map(|p| lm(p.x + 30.0, p.y + 30.0))
        .collect();

    let out = swap_with_landmark_sets(&source, &target, &src_points, &dst_points).unwrap();

    // Original face location in the target is untouched
    assert_eq!(*out.get_pixel(24, 24), Rgb([255, 255, 255]));
    // Shifted location carries the pattern
    let left = out.get_pixel(54, 62);
    let right = out.get_pixel(70, 62);
    let diff = left[0].abs_diff(right[0]) as u32 + left[2].abs_diff(right[2]) as u32;
    assert!(diff > 60, "left {:?} right {:?}", left, right);
}

#[test]
fn test_mismatched_landmark_sets() {
    let source = patterned_source();
    let target = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));

    let src_points = grid_landmarks();
    let dst_points = &src_points[..src_points.len() - 1];

    let err =
        swap_with_landmark_sets(&source, &target, &src_points, dst_points).unwrap_err();
    assert!(matches!(err, SwapError::Processing(_)));
}

#[test]
fn test_collinear_landmarks_are_degenerate() {
    let source = patterned_source();
    let target = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));

    let points: Vec<LandmarkPoint> =
        (0..10).map(|i| lm(10.0 + i as f32 * 4.0, 32.0)).collect();

    let err = swap_with_landmark_sets(&source, &target, &points, &points).unwrap_err();
    assert!(matches!(err, SwapError::DegenerateRegion));
}
