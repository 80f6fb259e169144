mod infer;

pub use infer::{input as infer_input_format, is_mol2 as is_mol2_output};

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// Returns `true` if stdout is a terminal (interactive).
pub fn stdout_is_tty() -> bool {
    io::stdout().is_terminal()
}

/// Opens `path` for buffered reading, or stdin when absent.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    let Some(p) = path else {
        return Ok(Box::new(BufReader::new(io::stdin())));
    };
    let file =
        File::open(p).with_context(|| format!("Failed to open input file: {}", p.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Creates `path` for buffered writing, or locks stdout when absent.
pub fn create_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(p) = path else {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    };
    let file = File::create(p)
        .with_context(|| format!("Failed to create output file: {}", p.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}
