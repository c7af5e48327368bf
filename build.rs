use std::{env, path::PathBuf};

use fs_extra::dir::CopyOptions;

/// Copies `assets/` (baked.jpg, PortalScene.glb) into `OUT_DIR`.
fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=assets/");

    let assets = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?).join("assets");
    if !assets.exists() {
        println!("cargo:warning=no assets/ directory, the scene falls back to grass and fireflies only");
        return Ok(());
    }

    let options = CopyOptions {
        overwrite: true,
        ..CopyOptions::new()
    };
    fs_extra::copy_items(&[assets], env::var("OUT_DIR")?, &options)?;
    Ok(())
}
