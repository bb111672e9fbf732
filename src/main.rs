//! Summit entry point
//!
//! Native: a headless demo run. A kinematic follower holds the gas until the
//! tank runs dry or the time cap is reached, then the outcome is logged.
//!
//! Usage: `summit [tuning.json] [seed]`
//!
//! The browser build is driven from JS through `summit::platform::SummitGame`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use summit::render::{DrawList, Renderer};
    use summit::sim::{DriveInput, Phase, Session, TerrainFollower};
    use summit::{DistanceRecord, Settings, Tuning, Viewport};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Simulated seconds before the demo gives up
    const TIME_CAP: f32 = 300.0;
    /// Frames between recorded renders
    const RENDER_EVERY: u32 = 60;
    const DEFAULT_SEED: u64 = 0x5eed;

    pub fn run() -> Result<(), String> {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => {
                let tuning = Tuning::from_file(&path).map_err(|e| format!("{}: {}", path, e))?;
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            None => Tuning::default(),
        };
        let seed = match args.next() {
            Some(s) => s.parse().map_err(|e| format!("bad seed {:?}: {}", s, e))?,
            None => DEFAULT_SEED,
        };

        let viewport = Viewport::default();
        let settings = Settings::default();
        let mut session = Session::new(seed, tuning, DistanceRecord::load());
        session.resize(viewport);
        let mut renderer = Renderer::new(viewport);
        let mut frame_list = DrawList::default();
        let mut follower = TerrainFollower::default();
        let gas = DriveInput {
            gas: true,
            ..Default::default()
        };

        log::info!("Headless run (seed {:#x}, {}x{})", seed, viewport.width, viewport.height);
        session.start(&mut follower);

        let mut frames = 0u32;
        let mut peak_paint_ops = 0;
        let mut summary = None;
        while summary.is_none() && (frames as f32) * FRAME_DT < TIME_CAP {
            summary = session.frame(FRAME_DT, &mut follower, &gas);
            frames += 1;

            if frames % RENDER_EVERY == 0 {
                frame_list.clear_commands();
                renderer.draw(&mut frame_list, &session, &settings);
                peak_paint_ops = peak_paint_ops.max(frame_list.paint_ops());
                log::debug!(
                    "t={:.0}s {:.0}m fuel {:.0}% cans {} dust {}",
                    frames as f32 * FRAME_DT,
                    session.distance(),
                    session.fuel().percent(),
                    session.fuel().cans().len(),
                    session.particles().particles().len()
                );
            }
        }

        match summary {
            Some(summary) => log::info!(
                "Out of fuel after {:.1}s: {}m (best {}m{})",
                frames as f32 * FRAME_DT,
                summary.distance_m,
                summary.best_m,
                if summary.new_record { ", new record" } else { "" }
            ),
            None => {
                debug_assert_eq!(session.phase(), Phase::Playing);
                log::info!(
                    "Time cap reached: {:.0}m with {:.0}% fuel",
                    session.distance(),
                    session.fuel().percent()
                );
            }
        }
        log::info!(
            "Terrain generated to x={:.0}, peak {} paint ops per frame",
            session.terrain().generated_up_to(),
            peak_paint_ops
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Summit (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `summit::platform::web::boot`, this is just to satisfy the compiler
}
