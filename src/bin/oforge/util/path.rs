use std::path::Path;

/// File name of `path` for progress lines, or `stdout` when absent.
pub fn display_name(path: Option<&Path>) -> String {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stdout".to_string())
}
