//! Build script for the storefront crate.
//!
//! Fingerprints `static/css/main.css` so the stylesheet can be served under
//! a content-addressed name and cached forever.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex characters of the SHA-256 digest kept in the file name.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let css_path = manifest_dir.join("static/css/main.css");
    println!("cargo:rerun-if-changed={}", css_path.display());

    match fingerprint_css(&css_path, &manifest_dir.join("static/css/derived")) {
        Ok(hash) => println!("cargo:rustc-env=CSS_HASH={hash}"),
        Err(e) => {
            println!("cargo:warning=Could not fingerprint main.css: {e}");
            println!("cargo:rustc-env=CSS_HASH=");
        }
    }
}

/// Copy the stylesheet to `derived_dir/main.{hash}.css` and return the hash.
fn fingerprint_css(css_path: &Path, derived_dir: &Path) -> io::Result<String> {
    let content = fs::read(css_path)?;

    let digest = format!("{:x}", Sha256::digest(&content));
    let hash = digest.get(..HASH_LEN).unwrap_or(&digest).to_owned();

    fs::create_dir_all(derived_dir)?;
    fs::write(derived_dir.join(format!("main.{hash}.css")), &content)?;

    Ok(hash)
}
