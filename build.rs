fn main() {
    // Release builds stamp GHBIN_VERSION from CI; local builds keep the Cargo.toml version
    if let Ok(version) = std::env::var("GHBIN_VERSION") {
        println!("cargo:rustc-env=CARGO_PKG_VERSION={version}");
    }
    println!("cargo:rerun-if-env-changed=GHBIN_VERSION");
}
