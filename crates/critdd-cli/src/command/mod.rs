use std::path::PathBuf;

use clap::{Parser, Subcommand};
use critdd_diagram::diagram::GroupQuery;
use critdd_stats::adjustment::Adjustment;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::config::CritddConfig;

use self::{
    diagram::DiagramArg, friedman::FriedmanArg, groups::GroupsArg, init_config::InitConfigArg,
};

mod diagram;
mod friedman;
mod groups;
mod init_config;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
    /// Log debug messages
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Config file to use instead of the discovered critdd.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run the Friedman test
    Friedman(#[clap(flatten)] FriedmanArg),
    /// Print groups of indistinguishable treatments
    Groups(#[clap(flatten)] GroupsArg),
    /// Render a critical difference diagram as TikZ code
    Diagram(#[clap(flatten)] DiagramArg),
    /// Print a default critdd.toml
    InitConfig(#[clap(flatten)] InitConfigArg),
}

/// Group query flags shared by the subcommands that extract groups.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct QueryArg {
    /// Significance level of the pairwise tests
    #[arg(long)]
    alpha: Option<f64>,
    /// Multiple testing adjustment (holm or bonferroni)
    #[arg(long)]
    adjustment: Option<Adjustment>,
    /// Drop groups with a single treatment
    #[arg(long)]
    no_singletons: bool,
}

impl QueryArg {
    /// Applies the flags on top of the configured query.
    pub(crate) fn resolve(&self, config: &CritddConfig) -> anyhow::Result<GroupQuery> {
        let mut query = config.groups;
        if let Some(alpha) = self.alpha {
            query.alpha = alpha;
        }
        if let Some(adjustment) = self.adjustment {
            query.adjustment = adjustment;
        }
        if self.no_singletons {
            query.singletons = false;
        }
        query.validate()?;
        Ok(query)
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "critdd=debug"
    } else {
        "critdd=info"
    };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);

    let config = || CritddConfig::resolve(args.config.as_deref());
    match &args.mode {
        Mode::Friedman(arg) => friedman::run(arg)?,
        Mode::Groups(arg) => groups::run(arg, &config()?)?,
        Mode::Diagram(arg) => diagram::run(arg, &config()?)?,
        Mode::InitConfig(arg) => init_config::run(arg)?,
    }
    Ok(())
}
