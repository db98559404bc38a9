use std::path::PathBuf;

use anyhow::ensure;

use crate::{config::CritddConfig, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InitConfigArg {
    /// Output file path, for example critdd.toml
    #[arg(long)]
    output: Option<PathBuf>,
    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,
}

pub(crate) fn run(arg: &InitConfigArg) -> anyhow::Result<()> {
    if let Some(path) = &arg.output {
        ensure!(
            arg.force || !path.exists(),
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }
    let mut output = Output::from_output_path(arg.output.as_deref())?;
    output.write_text(CritddConfig::default_toml())?;
    tracing::info!(output = %output.display_path(), "wrote default config");
    Ok(())
}
