//! Compiles the tiny C shim that gives `print` a real C-variadic calling
//! convention — something a stable Rust
//! function cannot itself expose.

fn main() {
    cc::Build::new().file("src/shim.c").compile("syn_runtime_shim");
    println!("cargo:rerun-if-changed=src/shim.c");
}
