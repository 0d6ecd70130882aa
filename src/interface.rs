/*

    Interactive text menu.

    Prompts for a scene stem, loads jsons/<stem>.json, renders it and
    writes <outdir>/<stem>.ppm. A failed load or render reports a
    single-line error and returns to the prompt; 'exit' leaves the
    loop cleanly.

*/

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::json_parser::load_scene;
use crate::prelude::*;
use crate::renderer;

pub fn run_menu(json_dir: &Path, out_dir: &Path) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Type 'exit' to leave");
    loop {
        println!();
        println!("Enter the json file you wish to render:");
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break; // stdin closed
        };
        let stem = line?.trim().to_string();
        if stem.is_empty() {
            continue;
        }
        if stem == "exit" {
            break;
        }

        render_one(json_dir, out_dir, &stem);
    }
    Ok(())
}

/// Load, render and save a single scene; failures are reported and
/// leave the menu loop running.
pub fn render_one(json_dir: &Path, out_dir: &Path, stem: &str) {
    let json_path: PathBuf = json_dir.join(format!("{stem}.json"));

    let scene = match load_scene(&json_path) {
        Ok(scene) => scene,
        Err(e) => {
            error!("Failed to load {}: {}", json_path.display(), e);
            return;
        }
    };

    let image = renderer::render(&scene, stem);
    match image.save_ppm(out_dir) {
        Ok(path) => println!("Rendered image saved to {}", path.display()),
        Err(e) => error!("Failed to save render of '{}': {}", stem, e),
    }
}
