//! `depswriter check` command
//!
//! Runs the whole pipeline except rendering and reports what it found.

use anyhow::{Context, Result};

use super::{context, Invocation};
use crate::cli::{CheckArgs, MessageFormat};
use depswriter::util::diagnostic::{emit, FatalDepsError};

pub fn execute(args: CheckArgs, verbose: bool, color: bool) -> Result<()> {
    let ctx = context(verbose, color)?;
    let config = ctx.load_config();
    let invocation = Invocation::prepare(args.inputs, &ctx, &config)?;

    let mut diagnostics = Vec::new();
    let store = invocation.generator().check(&mut diagnostics);

    match args.message_format {
        MessageFormat::Human => {
            for diagnostic in &diagnostics {
                emit(diagnostic, ctx.color());
            }
        }
        MessageFormat::Json => {
            for diagnostic in &diagnostics {
                let line = serde_json::to_string(diagnostic)
                    .context("failed to serialize diagnostic")?;
                println!("{}", line);
            }
        }
    }

    let Some(store) = store else {
        return Err(FatalDepsError::from_diagnostics(&diagnostics).into());
    };

    if args.message_format == MessageFormat::Human {
        eprintln!(
            "checked {} file(s): {} record(s), {} to write, {} warning(s)",
            invocation.file_count(),
            store.len(),
            store.emitted().count(),
            diagnostics.len()
        );
    }

    Ok(())
}
