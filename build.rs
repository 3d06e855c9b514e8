//! Build script for the Si470x demo firmware
//!
//! Adds the crate root to the linker search path so a board-specific
//! `memory.x` placed there overrides the one embassy-stm32 generates.

fn main() {
    // Tell Cargo to re-run this if the linker script changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }
}
