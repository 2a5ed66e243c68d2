// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-triangle affine warping
//!
//! Each triangle of the source mesh is warped onto the corresponding target
//! triangle: crop both bounding rectangles, solve the affine map between the
//! rect-local triangles, warp the source crop and copy the pixels that fall
//! inside the target triangle.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use nalgebra::{Matrix3, Vector3};

/// A triangle as three (x, y) vertices
pub type Triangle = [(f32, f32); 3];

/// Solve the affine transform mapping `src` onto `dst`
///
/// Returns `[a, b, c, d, e, f]` with `x' = a*x + b*y + c`,
/// `y' = d*x + e*y + f`, or `None` for degenerate triangles.
pub fn affine_from_triangles(src: &Triangle, dst: &Triangle) -> Option<[f32; 6]> {
    let m = Matrix3::new(
        src[0].0, src[0].1, 1.0, //
        src[1].0, src[1].1, 1.0, //
        src[2].0, src[2].1, 1.0,
    );
    let lu = m.lu();
    let xs = lu.solve(&Vector3::new(dst[0].0, dst[1].0, dst[2].0))?;
    let ys = lu.solve(&Vector3::new(dst[0].1, dst[1].1, dst[2].1))?;
    Some([xs[0], xs[1], xs[2], ys[0], ys[1], ys[2]])
}

/// Integer bounding rectangle of a triangle, clamped to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub fn bounding_rect(tri: &Triangle, image_width: u32, image_height: u32) -> Option<BoundRect> {
    let min_x = tri.iter().map(|p| p.0).fold(f32::INFINITY, f32::min).floor();
    let min_y = tri.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor();
    let max_x = tri.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max).ceil();
    let max_y = tri.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max).ceil();

    let x1 = (min_x.max(0.0) as u32).min(image_width);
    let y1 = (min_y.max(0.0) as u32).min(image_height);
    let x2 = (max_x.max(0.0) as u32).min(image_width);
    let y2 = (max_y.max(0.0) as u32).min(image_height);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(BoundRect {
        x: x1,
        y: y1,
        width: x2 - x1,
        height: y2 - y1,
    })
}

/// Barycentric point-in-triangle test with a small tolerance so adjacent
/// triangles cover their shared edges.
pub fn point_in_triangle(px: f32, py: f32, tri: &Triangle) -> bool {
    let [(x1, y1), (x2, y2), (x3, y3)] = *tri;
    let denom = (y2 - y3) * (x1 - x3) + (x3 - x2) * (y1 - y3);
    if denom.abs() < 1e-6 {
        return false;
    }
    let a = ((y2 - y3) * (px - x3) + (x3 - x2) * (py - y3)) / denom;
    let b = ((y3 - y1) * (px - x3) + (x1 - x3) * (py - y3)) / denom;
    let c = 1.0 - a - b;
    const EPS: f32 = -1e-3;
    a >= EPS && b >= EPS && c >= EPS
}

/// Warp one source triangle onto the canvas
///
/// `canvas` is a working copy of the target image; pixels inside the target
/// triangle are replaced with warped source pixels. Degenerate triangles are
/// skipped.
pub fn warp_triangle(
    source: &RgbImage,
    canvas: &mut RgbImage,
    src_tri: &Triangle,
    dst_tri: &Triangle,
) {
    let src_rect = match bounding_rect(src_tri, source.width(), source.height()) {
        Some(r) => r,
        None => return,
    };
    let dst_rect = match bounding_rect(dst_tri, canvas.width(), canvas.height()) {
        Some(r) => r,
        None => return,
    };

    // Rect-local triangles
    let src_local: Triangle = [
        (src_tri[0].0 - src_rect.x as f32, src_tri[0].1 - src_rect.y as f32),
        (src_tri[1].0 - src_rect.x as f32, src_tri[1].1 - src_rect.y as f32),
        (src_tri[2].0 - src_rect.x as f32, src_tri[2].1 - src_rect.y as f32),
    ];
    let dst_local: Triangle = [
        (dst_tri[0].0 - dst_rect.x as f32, dst_tri[0].1 - dst_rect.y as f32),
        (dst_tri[1].0 - dst_rect.x as f32, dst_tri[1].1 - dst_rect.y as f32),
        (dst_tri[2].0 - dst_rect.x as f32, dst_tri[2].1 - dst_rect.y as f32),
    ];

    let affine = match affine_from_triangles(&src_local, &dst_local) {
        Some(a) => a,
        None => return,
    };
    let projection = match Projection::from_matrix([
        affine[0], affine[1], affine[2], //
        affine[3], affine[4], affine[5], //
        0.0, 0.0, 1.0,
    ]) {
        Some(p) => p,
        None => return,
    };

    let src_crop = image::imageops::crop_imm(
        source,
        src_rect.x,
        src_rect.y,
        src_rect.width,
        src_rect.height,
    )
    .to_image();

    let mut warped = RgbImage::new(dst_rect.width, dst_rect.height);
    warp_into(
        &src_crop,
        &projection,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
        &mut warped,
    );

    for y in 0..dst_rect.height {
        for x in 0..dst_rect.width {
            if point_in_triangle(x as f32 + 0.5, y as f32 + 0.5, &dst_local) {
                let pixel = *warped.get_pixel(x, y);
                canvas.put_pixel(dst_rect.x + x, dst_rect.y + y, pixel);
            }
        }
    }
}
