//! Command implementations

pub mod check;
pub mod completions;
pub mod generate;

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::cli::InputArgs;
use depswriter::core::SourceUnit;
use depswriter::ops::{DepsGenerator, GenerateOptions};
use depswriter::util::fs::{display_path, expand_inputs};
use depswriter::util::{Config, GlobalContext};
use depswriter::ModuleLoader;

/// Everything a generator run needs, loaded from disk.
pub struct Invocation {
    pub manifests: Vec<SourceUnit>,
    pub sources: Vec<SourceUnit>,
    pub options: GenerateOptions,
    pub loader: ModuleLoader,
}

impl Invocation {
    /// Resolve settings (CLI flags over config) and read every input.
    pub fn prepare(inputs: InputArgs, ctx: &GlobalContext, config: &Config) -> Result<Self> {
        if inputs.srcs.is_empty() && inputs.deps.is_empty() {
            bail!("no inputs given; pass source files or --deps files");
        }

        let merge_strategy = match inputs.merge_strategy {
            Some(strategy) => strategy,
            None => config.merge_strategy()?.unwrap_or_default(),
        };
        let mode = match inputs.mode {
            Some(mode) => mode,
            None => config.resolution_mode()?.unwrap_or_default(),
        };

        let roots = if !inputs.roots.is_empty() {
            inputs.roots
        } else if !config.generate.roots.is_empty() {
            config.generate.roots.clone()
        } else {
            vec![".".to_string()]
        };

        let library_root = inputs
            .library_root
            .or_else(|| config.generate.library_root.clone())
            .context(
                "no library root configured; pass --library-root or set \
                 `generate.library_root` in depswriter.toml",
            )?;

        let cwd = ctx.cwd();
        let manifests = load_units(cwd, &inputs.deps)?;
        let sources = load_units(cwd, &inputs.srcs)?;

        tracing::debug!(
            manifests = manifests.len(),
            sources = sources.len(),
            strategy = %merge_strategy,
            mode = %mode,
            "loaded inputs"
        );

        Ok(Invocation {
            manifests,
            sources,
            options: GenerateOptions {
                merge_strategy,
                library_root,
            },
            loader: ModuleLoader::new(display_path(cwd), &roots, mode),
        })
    }

    pub fn generator(&self) -> DepsGenerator<'_> {
        DepsGenerator::new(
            &self.manifests,
            &self.sources,
            self.options.clone(),
            &self.loader,
        )
    }

    pub fn file_count(&self) -> usize {
        self.manifests.len() + self.sources.len()
    }
}

fn load_units(cwd: &Path, inputs: &[String]) -> Result<Vec<SourceUnit>> {
    expand_inputs(cwd, inputs)?
        .iter()
        .map(|path| SourceUnit::from_file(cwd, path))
        .collect()
}

/// Build the context shared by every command.
pub fn context(verbose: bool, color: bool) -> Result<GlobalContext> {
    let mut ctx = GlobalContext::new()?;
    ctx.set_verbose(verbose);
    ctx.set_color(color);
    Ok(ctx)
}
