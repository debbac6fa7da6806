//! Build script for MicroW firmware
//!
//! Handles:
//! - Memory layout configuration
//! - Warning when host and target feature sets are mixed

fn main() {
    // Tell Cargo to re-run this if the linker script changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    // Link memory.x from project directory
    if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }

    let embedded = std::env::var_os("CARGO_FEATURE_EMBEDDED").is_some();
    let std_build = std::env::var_os("CARGO_FEATURE_STD").is_some();
    if embedded && std_build {
        println!("cargo:warning=`embedded` and `std` both enabled; host tests expect --no-default-features");
    }
}
