fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Stamp the binary with its build time
    let built = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    println!("cargo:rustc-env=BUILD_DATE={}", built);
}
