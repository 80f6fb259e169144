use std::io::Write;

use anyhow::{Context, Result, bail};

use opls_forge::io::{self as lib_io, Format};
use opls_forge::{Compound, Typer, TyperConfig, TypingReport};

use super::read_rules;
use crate::cli::TypeArgs;
use crate::display::{
    Context as DisplayContext, Progress, print_structure_info, print_type_distribution,
    print_warnings,
};
use crate::io::{
    create_output, infer_input_format, is_mol2_output, open_input, stdin_is_tty, stdout_is_tty,
};
use crate::util::path::display_name;

pub fn run_type(args: TypeArgs, ctx: DisplayContext) -> Result<()> {
    if args.io.input.is_none() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: oforge type <INPUT> or pipe data via stdin."
        );
    }

    let input_format = resolve_input_format(&args)?;
    let write_output = resolve_output(&args)?;
    let total_steps = if write_output { 3 } else { 2 };

    let mut progress = Progress::new(ctx.interactive, total_steps);

    progress.step("Reading structure");
    let mut compound = read_structure(&args, input_format)?;
    progress.complete_step(
        "Reading structure",
        &[
            format!("Parse {} file", input_format).as_str(),
            format!(
                "{} atoms, {} bonds",
                compound.atom_count(),
                compound.bond_count()
            )
            .as_str(),
        ],
    );

    if ctx.interactive {
        print_structure_info(&compound);
    }

    progress.step("Assigning OPLS-AA types");
    let typer = build_typer(&args)?;
    let report = typer.run(&mut compound);
    let typing_substeps = build_typing_substeps(&args, &report);
    let typing_substeps_ref: Vec<&str> = typing_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Assigning OPLS-AA types", &typing_substeps_ref);

    if ctx.interactive {
        print_type_distribution(&report);
        print_warnings("Typing Warnings", &report.warnings);
    }

    if write_output {
        progress.step("Writing output");
        let path = args.io.output.as_deref();
        let mut writer = create_output(path)?;
        lib_io::write_mol2(&mut writer, &compound).context("Failed to write MOL2 file")?;
        writer.flush().context("Failed to flush MOL2 output")?;
        progress.complete_step(
            "Writing output",
            &[format!("Write MOL2 → {}", display_name(path)).as_str()],
        );
    }

    progress.finish();

    Ok(())
}

fn resolve_input_format(args: &TypeArgs) -> Result<Format> {
    if let Some(fmt) = args.input_format {
        return Ok(fmt.into());
    }

    if let Some(path) = &args.io.input {
        if let Some(fmt) = infer_input_format(path) {
            return Ok(fmt);
        }
        bail!(
            "Cannot infer format from '{}'. Use --infmt to specify.",
            path.display()
        );
    }

    bail!("Reading from stdin requires --infmt");
}

/// Whether typed MOL2 goes to a file or a piped stdout.
fn resolve_output(args: &TypeArgs) -> Result<bool> {
    match &args.io.output {
        Some(path) if !is_mol2_output(path) => bail!(
            "Cannot write '{}': only MOL2 output is supported.",
            path.display()
        ),
        Some(_) => Ok(true),
        None => Ok(!stdout_is_tty()),
    }
}

fn read_structure(args: &TypeArgs, format: Format) -> Result<Compound> {
    let input = open_input(args.io.input.as_deref())?;
    lib_io::read(input, format).context("Failed to read structure")
}

fn build_typer(args: &TypeArgs) -> Result<Typer> {
    let config = TyperConfig {
        rules: read_rules(args.typing.rules.as_deref())?,
        max_passes: args.typing.max_passes,
        debug: args.typing.debug,
    };
    Typer::new(&config).context("Failed to build typing rules")
}

fn build_typing_substeps(args: &TypeArgs, report: &TypingReport) -> Vec<String> {
    let mut steps = Vec::new();

    match &args.typing.rules {
        Some(path) => steps.push(format!("Load custom rules ({})", display_name(Some(path)))),
        None => steps.push("Load built-in OPLS-AA rules".to_string()),
    }

    let state = if report.converged {
        "converged"
    } else {
        "not converged"
    };
    steps.push(format!("{} passes ({})", report.passes, state));

    steps.push(format!(
        "{} typed, {} unresolved",
        report.typed_count(),
        report.unresolved_count()
    ));

    if args.typing.debug {
        steps.push("Write candidate lists (debug)".to_string());
    }

    steps
}
