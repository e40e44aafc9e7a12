use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let include_dir = PathBuf::from(&crate_dir).join("include");
    if let Err(e) = std::fs::create_dir_all(&include_dir) {
        println!("cargo:warning=cannot create {}: {e}", include_dir.display());
        return;
    }

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("CARSXE_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(include_dir.join("carsxe.h"));
        }
        Err(e) => println!("cargo:warning=cbindgen failed, header not regenerated: {e}"),
    }
}
