// Replays a recorded stream of render delegate calls against SceneSync.
// Run with: cargo run --release --bin strata_replay -- <script.json> [texture_dir]

mod script;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use strata_sync::SceneSync;

use crate::script::Script;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <script.json> [texture_dir]", args[0]);
        std::process::exit(1);
    }

    let path = &args[1];
    log::info!("Loading script: {}", path);

    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let Script { mut config, calls } =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?;

    if let Some(dir) = args.get(2) {
        config.texture_base_dir = Some(PathBuf::from(dir));
    }

    let mut sync = SceneSync::with_file_fetcher(config);
    let summary = script::replay(&mut sync, &calls);

    println!("\nReplayed {} call(s), {} skipped", summary.calls, summary.skipped);
    println!("Frames committed: {}", summary.frames.len());

    for (handle, mesh) in sync.meshes() {
        let geometry = &mesh.host.geometry;
        let vertices = geometry.attribute("position").map_or(0, |a| a.count());
        let bounds = geometry.bounds();
        let material = sync
            .effective_material(handle)
            .map_or("<none>", |m| m.name.as_str());

        println!("\n=== Mesh {} ===", mesh.id);
        println!("Vertices: {}", vertices);
        if !bounds.is_empty() {
            println!(
                "Bounds: ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})",
                bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
            );
            let extent = bounds.extent();
            println!("Extent: {:.3} x {:.3} x {:.3}", extent.x, extent.y, extent.z);
        }
        println!("Material: {}", material);
    }

    for (_, material) in sync.materials() {
        println!("\n=== Material {} ===", material.id);
        match material.material() {
            Some(resolved) => {
                let c = resolved.color;
                println!("Color: ({:.3}, {:.3}, {:.3})", c.x, c.y, c.z);
                println!("Textured: {}", resolved.has_textures());
                println!("Transparent: {}", resolved.transparent);
            }
            None => println!("Unresolved (default material)"),
        }
        if material.pending_textures() > 0 {
            println!("Pending textures: {}", material.pending_textures());
        }
    }

    let cache = sync.texture_cache();
    println!(
        "\nTextures: {} requested, {} fetched, {:.1} KB",
        cache.len(),
        cache.fetch_count(),
        cache.total_size_bytes() as f32 / 1024.0
    );

    Ok(())
}
