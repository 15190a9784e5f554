//! Shapes demo application
//!
//! Loads an engine config (TOML) and a scene description (RON), spins every
//! drawable in the scene and runs headless until the configured frame limit,
//! logging frame statistics and pointer hits along the way.
//!
//! Usage: `shapes_demo [config.toml] [scene.ron] [--fixed-step]`

use scene_forge::config::ConfigFileError;
use scene_forge::foundation::logging;
use scene_forge::prelude::*;
use thiserror::Error;

const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config.toml");
const DEFAULT_SCENE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/scene.ron");

/// Demo failure
#[derive(Error, Debug)]
pub enum AppError {
    /// Config or scene file could not be read
    #[error("Failed to load {path}: {source}")]
    Load {
        /// File that failed
        path: String,
        /// Underlying error
        source: ConfigFileError,
    },
    /// Engine error
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Spins everything the scene description put on stage
struct ShapesDemo {
    objects: SceneDescription,
    lights: Vec<Light>,
    spin: Vec3,
}

impl ShapesDemo {
    fn new(mut description: SceneDescription) -> Self {
        let lights = std::mem::take(&mut description.lights);
        Self {
            objects: description,
            lights,
            spin: Vec3::new(0.3, 0.7, 0.0),
        }
    }
}

impl SceneHooks for ShapesDemo {
    fn build_scene(&mut self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let ids = self.objects.spawn_into(ctx.factory, ctx.scene)?;
        log::info!("Placed {} shapes", ids.len());
        Ok(())
    }

    fn build_lighting(&mut self, ctx: &mut SceneContext<'_>) -> Result<()> {
        for light in &self.lights {
            ctx.scene.add_light(light.clone());
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, delta_time: f32) -> Result<()> {
        let step = self.spin * delta_time;
        for (_, drawable) in ctx.scene.iter_mut() {
            drawable.transform.rotate_euler_xyz(step);
        }
        Ok(())
    }
}

fn load<T: Config>(path: &str) -> std::result::Result<T, AppError> {
    T::load_from_file(path).map_err(|source| AppError::Load {
        path: path.to_string(),
        source,
    })
}

fn run() -> std::result::Result<(), AppError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let fixed_step = args.iter().any(|a| a == "--fixed-step");
    let mut paths = args.iter().filter(|a| !a.starts_with("--"));
    let config_path = paths.next().map_or(DEFAULT_CONFIG, String::as_str);
    let scene_path = paths.next().map_or(DEFAULT_SCENE, String::as_str);

    let config: EngineConfig = load(config_path)?;
    logging::init_with_filter(&config.log_level);
    log::info!("Starting shapes demo");
    log::info!("Config: {config_path}, scene: {scene_path}");

    let description: SceneDescription = load(scene_path)?;
    let (renderer, frames) = HeadlessRenderer::new();
    let (events, queue) = QueuedEventSource::new();

    let builder = LifecycleManager::builder(ShapesDemo::new(description))
        .config(config.clone())
        .renderer(renderer)
        .events(events);
    let mut manager = if fixed_step {
        let clock = FixedStepClock::from_fps(config.target_fps);
        match config.max_frames {
            Some(limit) => builder.clock(clock.with_frame_limit(limit)).build()?,
            None => builder.clock(clock).build()?,
        }
    } else {
        builder
            .clock(SystemClock::new(config.target_fps).with_frame_limit(config.max_frames))
            .build()?
    };

    manager.add_capability(FrameStatistics::from_config(&config))?;
    manager.add_capability(PointerInteraction::new())?;
    manager.set_statistics_callback(|stats| log::info!("{stats}"))?;
    manager.set_pointer_handler(|event| match (&event.kind, &event.hit) {
        (PointerEventKind::Enter(id), _) => log::info!("Pointer over '{id}'"),
        (PointerEventKind::Leave(id), _) => log::info!("Pointer left '{id}'"),
        (PointerEventKind::Press(button), Some(hit)) => {
            log::info!("{button:?} press on '{}' at distance {:.2}", hit.id, hit.distance);
        }
        _ => {}
    })?;

    manager.initialize()?;

    // Sweep the pointer across the middle of the viewport
    let viewport = config.viewport;
    let y = f64::from(viewport.height) / 2.0;
    for step in 0..=4 {
        let x = f64::from(viewport.width) * f64::from(step) / 4.0;
        queue.push(InputEvent::PointerMoved { x, y });
    }
    queue.push(InputEvent::PointerPressed {
        button: PointerButton::Primary,
        x: f64::from(viewport.width) / 2.0,
        y,
    });

    manager.run()?;

    {
        let frames = frames.borrow();
        let triangles: usize = frames.iter().map(|f| f.triangles).sum();
        log::info!("Rendered {} frames, {} triangles in total", frames.len(), triangles);
    }
    if let Some(stats) = manager.capability::<FrameStatistics>().and_then(FrameStatistics::latest) {
        log::info!("Final statistics: {stats}");
    }

    manager.dispose()?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("Shapes demo failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    log::info!("Shapes demo completed successfully");
}
