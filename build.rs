use std::env;

/// Smallest region that can hold the header
const MIN_REGION_SIZE: usize = 8;

/// Largest region the in-memory image buffer supports
const MAX_REGION_SIZE: usize = 4096;

fn main() {
    // Region capacity used by `config::DEFAULT_REGION_SIZE`
    let region_size = env::var("NVPARAMS_REGION_SIZE").unwrap_or_else(|_| "512".into());
    match region_size.trim().parse::<usize>() {
        Ok(size) if (MIN_REGION_SIZE..=MAX_REGION_SIZE).contains(&size) => {
            println!("cargo:rustc-env=NVPARAMS_REGION_SIZE={}", size);
            if size != 512 {
                println!("cargo:warning=Using NVPARAMS_REGION_SIZE from environment: {}", size);
            }
        }
        _ => panic!(
            "NVPARAMS_REGION_SIZE must be an integer in [{}, {}], got '{}'",
            MIN_REGION_SIZE, MAX_REGION_SIZE, region_size
        ),
    }

    // Name prefix that marks parameters as hidden from UI enumeration
    if let Ok(prefix) = env::var("NVPARAMS_HIDDEN_PREFIX") {
        if prefix.is_empty() || prefix.contains('\0') {
            panic!("NVPARAMS_HIDDEN_PREFIX must be non-empty and must not contain NUL");
        }
        println!("cargo:rustc-env=NVPARAMS_HIDDEN_PREFIX={}", prefix);
        println!(
            "cargo:warning=Using NVPARAMS_HIDDEN_PREFIX from environment: {}",
            prefix
        );
    } else {
        println!("cargo:rustc-env=NVPARAMS_HIDDEN_PREFIX=_");
    }

    // Rerun if environment variables change
    println!("cargo:rerun-if-env-changed=NVPARAMS_REGION_SIZE");
    println!("cargo:rerun-if-env-changed=NVPARAMS_HIDDEN_PREFIX");
    println!("cargo:rerun-if-changed=build.rs");
}
