//! Marble Maze entry point
//!
//! Native builds synthesize a board and print its collision bodies as JSON
//! for the physics/scene side to load. The browser build starts from
//! `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    env_logger::init();
    log::info!("Marble Maze (native) starting...");

    let arg = std::env::args().nth(1);
    match run(arg.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Resolve the board named on the command line
///
/// Accepts a built-in id, `practice:<seed>`, or a path to a JSON definition.
#[cfg(not(target_arch = "wasm32"))]
fn load_board(
    arg: Option<&str>,
    settings: &marble_maze::Settings,
) -> Result<marble_maze::sim::BoardDefinition, Box<dyn std::error::Error>> {
    use marble_maze::boards;
    use marble_maze::sim::BoardDefinition;

    let id = arg.unwrap_or(settings.board.as_str());

    if let Some(seed) = id.strip_prefix("practice:") {
        let seed: u64 = seed.parse()?;
        return Ok(boards::practice(seed, 8));
    }
    if id.ends_with(".json") {
        let json = std::fs::read_to_string(id)?;
        return Ok(BoardDefinition::from_json(&json)?);
    }
    Ok(boards::by_id(id)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn run(arg: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    use glam::Vec3;
    use marble_maze::Settings;
    use marble_maze::physics::{PhysicsWorld, RecordingWorld};

    let settings = Settings::load();
    let definition = load_board(arg, &settings)?;
    let board = definition.build()?;

    let mut world = RecordingWorld::default();
    board.install(&mut world, settings.panel_thickness);
    // Level board until the first tilt sample arrives
    world.set_gravity(Vec3::new(0.0, -settings.effective_gravity_scale(&definition), 0.0));

    log::info!(
        "{}: {} panels, panel area {:.2} + hole area {:.2} = {:.2}",
        definition.name,
        board.panels.len(),
        board.panel_area(),
        board.hole_area(),
        definition.width * definition.height
    );

    let export = serde_json::json!({
        "board": board.id,
        "gravity": world.gravity,
        "bodies": world.bodies,
    });
    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}
