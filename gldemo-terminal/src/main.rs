/// gldemo terminal - sketch and solid demos in the terminal
///
/// Usage: gldemo-terminal [sketch|solid|pyramid|octahedron]
///
/// Without an argument the sketch demo runs; `solid` runs the shape set by
/// `solid.shape` in the config. Controls:
///   - sketch: drag once for the circle, again for the segment; C clears
///   - solids: drag to rotate, A/R arcball mode/reset, S/F smooth/flat, G/P Gouraud/Phong
///   - Q/ESC: Quit
use std::env;
use std::io;
use std::process::ExitCode;

use gldemo_terminal::{AppConfig, Demo, TerminalApp};

fn main() -> io::Result<ExitCode> {
    env_logger::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            AppConfig::default()
        }
    };

    let args: Vec<String> = env::args().collect();
    let demo = match Demo::select(args.get(1).map(String::as_str), &config) {
        Ok(demo) => demo,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Usage: {} [sketch|solid|pyramid|octahedron]", args[0]);
            return Ok(ExitCode::FAILURE);
        }
    };
    log::info!("starting {:?} demo", demo);

    let mut app = TerminalApp::new(demo, &config)?;
    app.run()?;

    Ok(ExitCode::SUCCESS)
}
