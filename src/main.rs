//! Invert Cube headless runner
//!
//! Plays a built-in level with scripted input (hold right, jump every half
//! second) and logs what happens. Useful for checking tuning changes.
//!
//! Usage: `invert-cube [--level N] [--seconds S] [--config PATH]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::PathBuf;

    use clap::Parser;

    use invert_cube::persistence::{LevelLibrary, MemoryStore};
    use invert_cube::sim::{GameEvent, GamePhase};
    use invert_cube::{GameSession, LevelRef, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const JUMP_EVERY_FRAMES: u64 = 30;

    #[derive(Parser)]
    #[command(name = "invert-cube")]
    #[command(about = "Run a built-in level headless with scripted input")]
    pub struct Args {
        /// Built-in level id (1-based)
        #[arg(long, default_value_t = 1)]
        pub level: u32,
        /// Simulated seconds to run
        #[arg(long, default_value_t = 10.0)]
        pub seconds: f64,
        /// Settings JSON file
        #[arg(long)]
        pub config: Option<PathBuf>,
    }

    pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
        let settings = match &args.config {
            Some(path) => Settings::load_file(path)?,
            None => Settings::default(),
        };
        let jump_key = settings
            .controls
            .jump
            .first()
            .cloned()
            .unwrap_or_else(|| "Space".to_string());
        let right_key = settings
            .controls
            .right
            .first()
            .cloned()
            .unwrap_or_else(|| "ArrowRight".to_string());

        let mut session = GameSession::new(&settings, LevelLibrary::new(MemoryStore::new(), 0));
        session.load(LevelRef::Builtin(args.level))?;
        log::info!("Running level {} for {}s", args.level, args.seconds);

        session.key_down(&right_key);
        let frames = (args.seconds * 1000.0 / FRAME_MS).ceil() as u64;
        for frame in 0..frames {
            if frame % JUMP_EVERY_FRAMES == 0 {
                session.key_down(&jump_key);
            } else if frame % JUMP_EVERY_FRAMES == 1 {
                session.key_up(&jump_key);
            }

            for event in session.frame(frame as f64 * FRAME_MS) {
                match event {
                    GameEvent::Jumped => log::debug!("frame {frame}: jump"),
                    other => log::info!("frame {frame}: {other:?}"),
                }
            }
            if session.state().phase == GamePhase::Won {
                break;
            }
        }

        let view = session.view();
        log::info!(
            "Finished in phase {:?}, player at ({:.1}, {:.1}) velocity ({:.1}, {:.1})",
            view.phase,
            view.player.pos.x,
            view.player.pos.y,
            view.player.vel.x,
            view.player.vel.y,
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_defaults() {
            let args = Args::try_parse_from(["invert-cube"]).unwrap();
            assert_eq!(args.level, 1);
            assert_eq!(args.seconds, 10.0);
            assert!(args.config.is_none());
        }

        #[test]
        fn test_args_overrides() {
            let args = Args::try_parse_from([
                "invert-cube",
                "--level",
                "3",
                "--seconds",
                "2.5",
                "--config",
                "tuned.json",
            ])
            .unwrap();
            assert_eq!(args.level, 3);
            assert_eq!(args.seconds, 2.5);
            assert_eq!(args.config, Some(PathBuf::from("tuned.json")));
        }

        #[test]
        fn test_args_reject_unknown_flag() {
            assert!(Args::try_parse_from(["invert-cube", "--speed", "2"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match native::run(native::Args::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}
