#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    portal_scene::run()
}

// The web build starts from `run_web`.
#[cfg(target_arch = "wasm32")]
fn main() {}
