use std::path::Path;

use opls_forge::io::Format;

fn extension(path: &Path) -> Option<String> {
    Some(path.extension()?.to_str()?.to_lowercase())
}

pub fn input(path: &Path) -> Option<Format> {
    match extension(path)?.as_str() {
        "mol2" => Some(Format::Mol2),
        "sdf" | "mol" | "sd" => Some(Format::Sdf),
        _ => None,
    }
}

pub fn is_mol2(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ext == "mol2")
}
