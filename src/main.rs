//! Command-line renderer: OBJ mesh in, image out.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scanline::config::{self, SceneConfig};
use scanline::error::RenderError;
use scanline::mesh::Mesh;
use scanline::output;
use scanline::raster::render;

#[derive(Parser, Debug)]
#[command(name = "scanline", version, about = "CPU software rasterizer")]
struct Args {
    /// OBJ mesh to render
    mesh: PathBuf,

    /// Output image path (format from the extension, e.g. .png)
    output: PathBuf,

    /// Output width in pixels
    #[arg(long, default_value_t = 800)]
    width: usize,

    /// Output height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Number of render worker threads
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Scene file (RON) with camera, light, and render settings
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Also write a grayscale depth-buffer image next to the output
    #[arg(long)]
    depth_image: bool,
}

fn run(args: &Args) -> Result<(), RenderError> {
    let scene = match &args.scene {
        Some(path) => config::load_scene(path)?,
        None => SceneConfig::default(),
    };

    let mesh = Mesh::load_obj(&args.mesh)?;
    let camera = scene.build_camera(args.width, args.height);
    let settings = scene.render_settings();

    let spinner = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]").expect("static template"),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!(
        "rendering {} faces at {}x{} on {} workers",
        mesh.face_count(),
        args.width,
        args.height,
        args.workers
    ));

    let frame = render::render_parallel(
        &mesh,
        &camera,
        &settings,
        args.width,
        args.height,
        args.workers,
    )?;
    spinner.finish_and_clear();

    output::save(&frame, &args.output)?;
    if args.depth_image {
        let depth_path = args.output.with_extension("depth.png");
        output::depth_to_image(&frame)
            .save(&depth_path)
            .map_err(|source| RenderError::ImageWrite {
                path: depth_path.display().to_string(),
                source,
            })?;
        info!(path = %depth_path.display(), "depth image written");
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("scanline=info".parse().expect("static directive")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}
