use std::env;

fn main() {
    // The link layout only applies to the bare-metal target. Host builds of
    // this crate (plain `cargo build`, `cargo test`) link normally.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
        println!(
            "cargo:rustc-link-search={}",
            env::var("CARGO_MANIFEST_DIR").unwrap()
        );
        println!("cargo:rustc-link-arg=-Tlayout.ld");
    }
    println!("cargo:rerun-if-changed=layout.ld");
}
