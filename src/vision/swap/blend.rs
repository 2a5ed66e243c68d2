// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Mask construction and compositing
//!
//! The warped face is composited over the target through a feathered mask:
//! the convex hull of the target landmarks (landmark path) or an ellipse
//! inside the detected rectangle (fallback path). A mean-color match inside
//! the mask stands in for gradient-domain cloning, which is out of scope.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_polygon_mut};
use imageproc::filter::gaussian_blur_f32;
use imageproc::point::Point;

use crate::vision::detector::FaceRect;

/// Mask value above which a pixel counts as "inside" for statistics
const MASK_INTERIOR: u8 = 128;

/// Filled polygon mask
///
/// `polygon` must be a simple polygon (the hull from triangulation). Returns
/// an all-black mask when the polygon is degenerate.
pub fn polygon_mask(width: u32, height: u32, polygon: &[(f32, f32)]) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    let mut points: Vec<Point<i32>> = polygon
        .iter()
        .map(|&(x, y)| Point::new(x.round() as i32, y.round() as i32))
        .collect();
    points.dedup();
    // draw_polygon_mut requires an open polygon
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 3 {
        return mask;
    }

    draw_polygon_mut(&mut mask, &points, Luma([255u8]));
    mask
}

/// Elliptical mask inscribed in a face rectangle
///
/// Axes follow the bounding-box swap: 45% of the width and 55% of the height.
pub fn ellipse_mask(width: u32, height: u32, rect: &FaceRect) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    let center = (
        rect.x + rect.width as i32 / 2,
        rect.y + rect.height as i32 / 2,
    );
    let rx = ((rect.width as f32 * 0.45) as i32).max(1);
    let ry = ((rect.height as f32 * 0.55) as i32).max(1);

    draw_filled_ellipse_mut(&mut mask, center, rx, ry, Luma([255u8]));
    mask
}

/// Feather a mask with a Gaussian blur
pub fn feather_mask(mask: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(mask, sigma.max(0.1))
}

/// Feather radius proportional to the face size
pub fn feather_sigma(face_width: u32, face_height: u32) -> f32 {
    (face_width.min(face_height) as f32 * 0.05).clamp(3.0, 15.0)
}

/// Shift the overlay's mean color inside the mask toward the target's
///
/// A cheap stand-in for seamless cloning: per-channel mean difference over
/// the mask interior, applied uniformly to the overlay.
pub fn match_color(overlay: &mut RgbImage, target: &RgbImage, mask: &GrayImage) {
    let mut overlay_sum = [0f64; 3];
    let mut target_sum = [0f64; 3];
    let mut count = 0u64;

    for (x, y, m) in mask.enumerate_pixels() {
        if m[0] >= MASK_INTERIOR {
            let o = overlay.get_pixel(x, y);
            let t = target.get_pixel(x, y);
            for c in 0..3 {
                overlay_sum[c] += o[c] as f64;
                target_sum[c] += t[c] as f64;
            }
            count += 1;
        }
    }

    if count == 0 {
        return;
    }

    let shift: [f64; 3] = [
        (target_sum[0] - overlay_sum[0]) / count as f64,
        (target_sum[1] - overlay_sum[1]) / count as f64,
        (target_sum[2] - overlay_sum[2]) / count as f64,
    ];

    for pixel in overlay.pixels_mut() {
        for c in 0..3 {
            pixel[c] = (pixel[c] as f64 + shift[c]).clamp(0.0, 255.0) as u8;
        }
    }
}

/// Alpha-composite `overlay` over `base` using `mask` as per-pixel alpha
pub fn composite(base: &RgbImage, overlay: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut out = base.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let alpha = mask.get_pixel(x, y)[0] as f32 / 255.0;
        if alpha <= 0.0 {
            continue;
        }
        let o = overlay.get_pixel(x, y);
        *pixel = Rgb([
            lerp(pixel[0], o[0], alpha),
            lerp(pixel[1], o[1], alpha),
            lerp(pixel[2], o[2], alpha),
        ]);
    }
    out
}

fn lerp(a: u8, b: u8, alpha: f32) -> u8 {
    (a as f32 * (1.0 - alpha) + b as f32 * alpha).round().clamp(0.0, 255.0) as u8
}
