use anyhow::{Context, Result, bail};

use opls_forge::RuleCatalog;

use super::read_rules;
use crate::cli::RulesArgs;
use crate::display::{Context as DisplayContext, print_catalog_summary, print_warnings};

pub fn run_rules(args: RulesArgs, ctx: DisplayContext) -> Result<()> {
    let custom = match read_rules(args.rules.as_deref())? {
        Some(toml) => Some(RuleCatalog::from_toml(&toml).context("Failed to build typing rules")?),
        None => None,
    };
    let catalog = custom.as_ref().unwrap_or_else(|| RuleCatalog::builtin());

    if ctx.interactive {
        print_catalog_summary(catalog);
        print_warnings("Precedence Warnings", catalog.warnings());
    }

    let count = catalog.warnings().len();
    if count > 0 {
        bail!("Rule catalog has {} precedence warning(s)", count);
    }

    Ok(())
}
