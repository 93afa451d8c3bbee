//! `depswriter generate` command

use anyhow::Result;

use super::{context, Invocation};
use crate::cli::GenerateArgs;
use depswriter::util::diagnostic::{emit, FatalDepsError};
use depswriter::util::fs::write_string;

pub fn execute(args: GenerateArgs, verbose: bool, color: bool) -> Result<()> {
    let ctx = context(verbose, color)?;
    let config = ctx.load_config();

    // CLI overrides config
    let output_path = args.output.or_else(|| config.generate.output.clone());

    let invocation = Invocation::prepare(args.inputs, &ctx, &config)?;

    let mut diagnostics = Vec::new();
    let output = invocation.generator().generate(&mut diagnostics);

    for diagnostic in &diagnostics {
        emit(diagnostic, ctx.color());
    }

    let Some(output) = output else {
        return Err(FatalDepsError::from_diagnostics(&diagnostics).into());
    };

    match output_path {
        Some(path) => {
            let path = ctx.cwd().join(path);
            write_string(&path, &output)?;
            tracing::info!("wrote {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}
