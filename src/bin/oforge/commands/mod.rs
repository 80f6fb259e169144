mod rules;
mod typing;

use rules::run_rules;
use typing::run_type;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::Command;
use crate::display::Context as DisplayContext;

pub fn dispatch(command: Command, ctx: DisplayContext) -> Result<()> {
    match command {
        Command::Type(args) => run_type(args, ctx),
        Command::Rules(args) => run_rules(args, ctx),
    }
}

fn read_rules(path: Option<&Path>) -> Result<Option<String>> {
    path.map(|p| {
        fs::read_to_string(p)
            .with_context(|| format!("Failed to read rules file: {}", p.display()))
    })
    .transpose()
}
