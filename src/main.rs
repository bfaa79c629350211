//! Headless demo: load an XYZR structure, build the scene and report what
//! sits under the centre of a 1280x720 view.
//!
//! Run with `RUST_LOG=info` to see the output.

use std::path::{Path, PathBuf};

use glam::Vec2;
use molgrid::error::GridError;
use molgrid::molecule::Molecule;
use molgrid::options::Options;
use molgrid::scene::MoleculeScene;

const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

fn run(structure: &Path, options: Option<&Path>) -> Result<(), GridError> {
    let options = match options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let molecule = Molecule::load_xyzr(structure)?;
    let mut scene = MoleculeScene::load(molecule, &options, VIEWPORT)?;

    let grid = scene.picking_grid();
    log::info!(
        "picking grid: {} of {} cells occupied",
        grid.occupied_cell_count(),
        grid.cell_count()
    );
    let occluders = scene.occluders();
    let total: usize = (0..occluders.atom_count())
        .map(|atom| occluders.occluder_count(atom as u32))
        .sum();
    log::info!(
        "occluders: {total} across {} atoms ({} slots each)",
        occluders.atom_count(),
        occluders.max_per_atom()
    );
    log::info!("light at {}", scene.light_position());

    let centre = VIEWPORT / 2.0;
    match scene.pick(centre) {
        Some(id) => {
            if let Some(atom) = scene.molecule().atom(id) {
                log::info!(
                    "atom {id} under the cursor at {} (r = {})",
                    atom.position + scene.center_offset(),
                    atom.radius
                );
            }
        }
        None => log::info!("nothing under the cursor"),
    }

    let overlay = scene.overlay(Some(centre));
    if !overlay.is_empty() {
        log::info!("grid overlay: {} cell instances", overlay.len());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(structure) = args.next() else {
        log::error!("Usage: molgrid <structure.xyzr> [options.toml]");
        std::process::exit(1);
    };
    let options = args.next().map(PathBuf::from);

    if let Err(e) = run(Path::new(&structure), options.as_deref()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
