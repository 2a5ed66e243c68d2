// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the face-mesh model

use image::DynamicImage;
use ndarray::Array4;

/// Input edge length expected by the face-mesh model
pub const MESH_INPUT_SIZE: u32 = 192;

/// Preprocess an image for face-mesh inference
///
/// The mesh model is trained on inputs squashed to a square, so the image is
/// resized to 192x192 without preserving aspect ratio (no letterbox padding).
/// Pixels are scaled to [0, 1] and laid out as an NCHW tensor [1, 3, H, W].
pub fn preprocess_for_mesh(image: &DynamicImage) -> Array4<f32> {
    let resized = image.resize_exact(
        MESH_INPUT_SIZE,
        MESH_INPUT_SIZE,
        image::imageops::FilterType::Triangle,
    );
    let rgb = resized.to_rgb8();

    let size = MESH_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for y in 0..size {
        for x in 0..size {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            for c in 0..3 {
                tensor[[0, c, y, x]] = pixel[c] as f32 / 255.0;
            }
        }
    }

    tensor
}

/// Scale factors mapping mesh-input coordinates back to the original image
pub fn mesh_scale(original_width: u32, original_height: u32) -> (f32, f32) {
    (
        original_width as f32 / MESH_INPUT_SIZE as f32,
        original_height as f32 / MESH_INPUT_SIZE as f32,
    )
}
