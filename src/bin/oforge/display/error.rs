use std::io::{self, Write};

use anyhow::Error;
use opls_forge::TyperError;
use opls_forge::io::{Error as IoError, Format};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = hints_for(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn hints_for(err: &Error) -> Vec<&'static str> {
    if let Some(io_err) = err.downcast_ref::<IoError>() {
        return io_hints(io_err);
    }
    if let Some(typer_err) = err.downcast_ref::<TyperError>() {
        return typer_hints(typer_err);
    }
    fallback_hints(err)
}

fn io_hints(err: &IoError) -> Vec<&'static str> {
    match err {
        IoError::Io { source } => std_io_hints(source),
        IoError::Parse { format, .. } => {
            let mut hints = vec![
                "Inspect the file around that line for malformed entries",
                "Try specifying --infmt to ensure correct format detection",
            ];
            hints.push(match format {
                Format::Mol2 => "MOL2 needs @<TRIPOS>MOLECULE, ATOM and BOND sections",
                Format::Sdf => "Only V2000 connection tables are supported",
            });
            hints
        }
        IoError::UnknownElement { .. } => vec![
            "Use element symbols or SYBYL types such as C.ar in the type column",
            "Dummy and lone-pair atoms cannot be typed",
        ],
        IoError::Topology { .. } => vec![
            "Look for repeated or self-referencing bond records",
        ],
    }
}

fn std_io_hints(source: &io::Error) -> Vec<&'static str> {
    use io::ErrorKind;

    match source.kind() {
        ErrorKind::NotFound => vec!["Check the path spelling and ensure the file exists"],
        ErrorKind::PermissionDenied => vec![
            "Check file permissions with `ls -la`",
            "Ensure you have read/write access as needed",
        ],
        ErrorKind::UnexpectedEof => vec!["The file may be truncated or incomplete"],
        ErrorKind::BrokenPipe => vec!["The output consumer closed the pipe early"],
        _ => vec!["Check file path, permissions, and disk space"],
    }
}

fn typer_hints(err: &TyperError) -> Vec<&'static str> {
    match err {
        TyperError::RuleParse(_) => vec![
            "Rules are a TOML array of [[rule]] tables",
            "Constraints use op = exactly | at_least | at_most",
            "Checks use check = in_ring | bridges_rings | carries | first_neighbor_carries | neighbor_carries",
        ],
        TyperError::DuplicateRule(_) => vec!["Every rule id must be unique within one table"],
        TyperError::InvalidRule { .. } => vec![
            "Rule ids must be non-empty",
            "Ring sizes must be at least 3",
            "Carries checks need at least one id",
        ],
    }
}

fn fallback_hints(err: &Error) -> Vec<&'static str> {
    let text = err
        .chain()
        .map(|cause| cause.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    if text.contains("terminal") || text.contains("stdin") {
        vec!["Pass an input file or pipe data to stdin with --infmt"]
    } else if text.contains("precedence warning") {
        vec![
            "Each ambiguous pattern needs exactly one winning rule",
            "Blacklist edges must not form cycles",
        ]
    } else if text.contains("only mol2") {
        vec!["Use a .mol2 extension for the output file"]
    } else {
        Vec::new()
    }
}
