//! Build script for the UV-K5 firmware
//!
//! Adds the cortex-m-rt and defmt linker scripts to the embedded binary.
//! Host test builds (`std` feature) need nothing.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    // .cargo/config.toml may already pass these
    let rustflags = std::env::var("CARGO_ENCODED_RUSTFLAGS").unwrap_or_default();
    if !rustflags.contains("link.x") {
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
    }
    if !rustflags.contains("defmt.x") {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
    if !rustflags.contains("--nmagic") {
        println!("cargo:rustc-link-arg-bins=--nmagic");
    }
}
