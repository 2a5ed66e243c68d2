// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Landmark triangulation and hull geometry
//!
//! The swap warps the source face triangle-by-triangle. Triangles are built
//! over the *target* landmarks and the resulting index triples are applied to
//! both landmark sets, so the two meshes correspond point-for-point.

use delaunator::{triangulate, Point};

use crate::vision::mesh::LandmarkPoint;

/// Delaunay-triangulate a landmark set
///
/// Returns index triples into `points`. Coincident or collinear inputs that
/// cannot form a triangulation yield an empty result.
pub fn triangulate_landmarks(points: &[LandmarkPoint]) -> Vec<[usize; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }

    let sites: Vec<Point> = points
        .iter()
        .map(|p| Point {
            x: p.x as f64,
            y: p.y as f64,
        })
        .collect();

    let triangulation = triangulate(&sites);

    triangulation
        .triangles
        .chunks_exact(3)
        .map(|t| [t[0], t[1], t[2]])
        .collect()
}

/// Convex hull of a landmark set, counter-clockwise
///
/// Andrew monotone chain over the (x, y) coordinates. Fewer than three
/// distinct points yield an empty hull.
pub fn convex_hull(points: &[LandmarkPoint]) -> Vec<(f32, f32)> {
    let mut pts: Vec<(f32, f32)> = points.iter().map(|p| (p.x, p.y)).collect();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    pts.dedup();

    if pts.len() < 3 {
        return Vec::new();
    }

    let cross = |o: (f32, f32), a: (f32, f32), b: (f32, f32)| -> f32 {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    };

    let mut lower: Vec<(f32, f32)> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<(f32, f32)> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    // Endpoints of each chain are the other chain's start points
    lower.pop();
    upper.pop();
    lower.extend(upper);

    if lower.len() < 3 {
        return Vec::new();
    }
    lower
}
