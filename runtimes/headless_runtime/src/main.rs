// Headless runtime - drives the locomotion rig against a rapier scene with
// scripted stick input and reports where the player ended up.

mod scenario;

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context;
use cgmath::Vector3;
use clap::Parser;
use engine::{
    logging::{SCOPE_LOCOMOTION, SCOPE_TRAJECTORY},
    scene::{MeshSink, RecordingMeshSink, StripGeometry},
};
use locomotion::{
    physics::{PlayerBody, RapierLocomotionWorld},
    teleport::{PathAppearance, TeleportFeedback, TeleportVisualStyle},
    util::forward_of,
    LocomotionConfig, LocomotionRig, ModeKind,
};
use scenario::Script;
use serde::Serialize;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "headless_runtime")]
#[command(about = "Run scripted locomotion input against a physics scene without rendering")]
struct Args {
    /// JSON tuning file; defaults are used for anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rendered frames to simulate
    #[arg(short, long, default_value = "180")]
    frames: u32,

    /// Seconds per rendered frame
    #[arg(long, default_value = "0.0138889")]
    frame_dt: f32,

    #[arg(short, long, value_enum, default_value = "all")]
    script: Script,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// Logs presentation changes instead of drawing them.
struct LogFeedback {
    style: TeleportVisualStyle,
}

impl TeleportFeedback for LogFeedback {
    fn set_marker_visible(&mut self, visible: bool) {
        debug!(visible, "marker visibility");
    }

    fn set_marker_position(&mut self, _position: Vector3<f32>) {}

    fn set_path_visible(&mut self, visible: bool) {
        debug!(visible, "path visibility");
    }

    fn set_path_appearance(&mut self, appearance: PathAppearance) {
        let color = self.style.path_color(appearance);
        info!(?appearance, r = color.x, g = color.y, b = color.z, "path appearance");
    }
}

// The rig owns its sink; the run keeps a handle to read the upload count
struct SharedMeshSink(Rc<RefCell<RecordingMeshSink>>);

impl MeshSink for SharedMeshSink {
    fn upload(&mut self, geometry: &StripGeometry) {
        self.0.borrow_mut().upload(geometry);
    }
}

#[derive(Serialize)]
struct ModeChange {
    frame: u32,
    from: String,
    to: String,
}

#[derive(Serialize)]
struct RunSummary {
    script: Script,
    frames: u32,
    physics_ticks: u32,
    final_position: [f32; 3],
    final_yaw_degrees: f32,
    final_mode: String,
    warps: usize,
    ribbon_uploads: usize,
    /// Triangles in the last ribbon built, if any was
    ribbon_triangles: Option<usize>,
    mode_changes: Vec<ModeChange>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "headless_runtime=info".into()),
        )
        .init();
    // Scope levels for the locomotion macros, e.g. LOCOMOTION_LOG=locomotion=debug
    let log_config = engine::logging::init_logging("LOCOMOTION_LOG");
    debug!(
        global = %log_config.global_level(),
        locomotion = ?log_config.scope_level(SCOPE_LOCOMOTION),
        trajectory = ?log_config.scope_level(SCOPE_TRAJECTORY),
        "scoped log levels"
    );

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => LocomotionConfig::from_json_file(path)
            .inspect_err(|err| error!(path = %path.display(), "invalid config: {}", err))
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => LocomotionConfig::default(),
    };

    let summary = engine::profile!("headless run", run(&args, config)).map_err(|err| {
        error!("headless run failed: {:#}", err);
        err
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn run(args: &Args, config: LocomotionConfig) -> anyhow::Result<RunSummary> {
    let mut world = RapierLocomotionWorld::new(
        &scenario::demo_level(),
        &config.player,
        Vector3::new(0.0, 0.0, 0.0),
    );
    let uploads = Rc::new(RefCell::new(RecordingMeshSink::default()));
    let mut rig = LocomotionRig::builder()
        .config(config)
        .feedback(Box::new(LogFeedback {
            style: TeleportVisualStyle::default(),
        }))
        .mesh_sink(Box::new(SharedMeshSink(uploads.clone())))
        .build()
        .context("building locomotion rig")?;

    info!(script = ?args.script, frames = args.frames, "starting headless run");

    let mut physics_ticks = 0;
    let mut mode_changes = Vec::new();
    let mut mode = rig.mode();
    for frame in 0..args.frames {
        let input = scenario::input_for(args.script, frame, args.frames, world.position());
        physics_ticks += rig.advance(&input, args.frame_dt, &mut world, |world, dt| world.step(dt));

        if rig.mode() != mode {
            mode_changes.push(ModeChange {
                frame,
                from: format!("{:?}", mode),
                to: format!("{:?}", rig.mode()),
            });
            mode = rig.mode();
        }
    }

    let position = world.position();
    let forward = forward_of(world.rotation());
    let warps = mode_changes
        .iter()
        .filter(|change| change.to == format!("{:?}", ModeKind::Warping))
        .count();
    let ribbon_uploads = uploads.borrow().uploads;
    let ribbon = rig.ribbon();
    let ribbon_triangles = (!ribbon.is_empty()).then(|| ribbon.triangle_count());

    Ok(RunSummary {
        script: args.script,
        frames: args.frames,
        physics_ticks,
        final_position: [position.x, position.y, position.z],
        final_yaw_degrees: (-forward.x).atan2(-forward.z).to_degrees(),
        final_mode: format!("{:?}", rig.mode()),
        warps,
        ribbon_uploads,
        ribbon_triangles,
        mode_changes,
    })
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{:?}: {} frames, {} physics ticks",
        summary.script, summary.frames, summary.physics_ticks
    );
    for change in &summary.mode_changes {
        println!("  frame {:>4}: {} -> {}", change.frame, change.from, change.to);
    }
    let [x, y, z] = summary.final_position;
    println!("final position: ({:.3}, {:.3}, {:.3})", x, y, z);
    println!("final yaw: {:.1} degrees", summary.final_yaw_degrees);
    println!("final mode: {}", summary.final_mode);
    println!("warps: {}, ribbon uploads: {}", summary.warps, summary.ribbon_uploads);
    if let Some(triangles) = summary.ribbon_triangles {
        println!("last ribbon: {} triangles", triangles);
    }
}
