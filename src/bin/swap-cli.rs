// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Offline swap CLI
//!
//! Runs the same pipeline as the /swap endpoint against files on disk.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use faceswap_node::vision::{encode_png, FaceSwapper, SwapEngineConfig};

#[derive(Parser, Debug)]
#[command(name = "swap-cli", about = "Swap a face from a source image into a target image")]
struct Cli {
    /// Target image whose face is replaced
    target: PathBuf,

    /// Source face image
    #[arg(short, long, default_value = "static/source.png")]
    source: PathBuf,

    /// Output path for the composited PNG
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,

    /// Face-mesh ONNX model
    #[arg(long, env = "MESH_MODEL_PATH", default_value = "./models/face_mesh.onnx")]
    mesh_model: PathBuf,

    /// SeetaFace frontal detection model
    #[arg(
        long,
        env = "FACE_DETECT_MODEL_PATH",
        default_value = "./models/seeta_fd_frontal_v1.0.bin"
    )]
    detect_model: PathBuf,
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let source = image::open(&cli.source)
        .context(format!("failed to open source image {}", cli.source.display()))?;
    let target = image::open(&cli.target)
        .context(format!("failed to open target image {}", cli.target.display()))?;

    println!("Using source: {} ({}x{})", cli.source.display(), source.width(), source.height());
    println!("Using target: {} ({}x{})", cli.target.display(), target.width(), target.height());

    let swapper = FaceSwapper::new(SwapEngineConfig {
        mesh_model_path: Some(cli.mesh_model),
        face_detect_model_path: Some(cli.detect_model),
    });
    if !swapper.is_available() {
        anyhow::bail!("no face models could be loaded; nothing to swap with");
    }

    let outcome = swapper
        .swap(&source, &target)
        .context("face swap failed")?;

    let bytes = encode_png(&outcome.image)?;
    std::fs::write(&cli.output, bytes)
        .context(format!("failed to write {}", cli.output.display()))?;

    println!(
        "Wrote output: {} ({} swap)",
        cli.output.display(),
        outcome.method.as_str()
    );
    Ok(())
}
