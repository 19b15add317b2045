//! Sun, earth and moon example.
//!
//! The earth orbits the sun at 8 units and the moon orbits the earth at 1
//! unit. Each frame advances the orbits and is saved as a PNG.
//!
//! ```text
//! cargo run --example solar_system -- --earth earth.png --environment milky_way.png
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use orrery_core::TextureCache;
use orrery_tracer::{
    CameraState, FrameCompositor, Material, Scene, TextureData, TracerConfig, Vec3,
};

#[derive(Parser, Debug)]
#[command(about = "Render the sun/earth/moon scene to PNG frames")]
struct Args {
    /// Sun surface texture
    #[arg(long)]
    sun: Option<PathBuf>,

    /// Earth surface texture
    #[arg(long)]
    earth: Option<PathBuf>,

    /// Moon surface texture
    #[arg(long)]
    moon: Option<PathBuf>,

    /// Equirectangular background
    #[arg(long)]
    environment: Option<PathBuf>,

    #[arg(long, default_value_t = 4)]
    frames: u32,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Seconds of simulated time between frames
    #[arg(long, default_value_t = 2.0)]
    step: f32,

    #[arg(long, default_value_t = 5)]
    max_depth: u32,

    #[arg(short, long, default_value = "frames")]
    output: PathBuf,
}

/// Per-body textures, empty when not given on the command line.
struct Textures {
    sun: Arc<TextureData>,
    earth: Arc<TextureData>,
    moon: Arc<TextureData>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cache = TextureCache::new();
    let mut load = |path: &Option<PathBuf>| -> Result<Arc<TextureData>> {
        match path {
            Some(path) => {
                let name = path.to_string_lossy();
                cache
                    .load(&name)
                    .with_context(|| format!("Failed to load texture {}", name))
            }
            None => Ok(Arc::new(TextureData::empty())),
        }
    };

    let textures = Textures {
        sun: load(&args.sun)?,
        earth: load(&args.earth)?,
        moon: load(&args.moon)?,
    };
    let environment = load(&args.environment)?;

    let config = TracerConfig {
        max_depth: args.max_depth,
        ..TracerConfig::default()
    };
    let mut compositor = FrameCompositor::new(args.width, args.height, config)?;
    compositor.set_environment(environment);

    let aspect = args.width as f32 / args.height as f32;
    let camera = CameraState::look_at(Vec3::new(0.0, -6.0, 18.0), Vec3::ZERO, 45.0, aspect);

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    println!("Orrery - solar system example");
    println!(
        "Rendering {} frames at {}x{}...",
        args.frames, args.width, args.height
    );

    for frame_index in 0..args.frames {
        let time = frame_index as f32 * args.step;
        let scene = build_scene(time, &textures);

        let start = Instant::now();
        let frame = compositor.render(&scene, &camera)?;
        let elapsed = start.elapsed();

        let path = args.output.join(format!("frame_{:04}.png", frame_index));
        frame
            .to_image()
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        println!("  {} in {:?}", path.display(), elapsed);
    }

    Ok(())
}

/// Position the three bodies at `time` seconds.
///
/// Orbits lie in the XY plane: the earth completes a turn every 20*pi
/// seconds, the moon every 2*pi seconds.
fn build_scene(time: f32, textures: &Textures) -> Scene {
    let earth_angle = time / 10.0;
    let earth_center = Vec3::new(earth_angle.cos(), earth_angle.sin(), 0.0) * 8.0;

    let moon_angle = earth_angle + time;
    let moon_center = earth_center + Vec3::new(moon_angle.cos(), moon_angle.sin(), 0.0);

    let mut scene = Scene::new();
    scene.add_sphere(
        Vec3::ZERO,
        2.0,
        Material::emissive(Vec3::new(0.9, 0.9, 0.8), Vec3::ONE),
        Arc::clone(&textures.sun),
    );
    scene.add_sphere(
        earth_center,
        0.6,
        Material::diffuse(Vec3::new(0.2, 0.4, 0.8)),
        Arc::clone(&textures.earth),
    );
    scene.add_sphere(
        moon_center,
        0.2,
        Material::diffuse(Vec3::splat(0.7)),
        Arc::clone(&textures.moon),
    );
    scene
}
