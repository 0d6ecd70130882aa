/*

    A small CPU ray tracer driven by JSON scene descriptions.

    Scenes are read from jsons/<stem>.json and rendered images are
    written to outputs/<stem>.ppm.

*/

use std::path::Path;

use lumen_tracer::interface;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging on console
    tracing_subscriber::fmt::init();

    interface::run_menu(Path::new("jsons"), Path::new("outputs"))?;
    Ok(())
}
