use std::path::PathBuf;

use critdd_diagram::{
    diagram::{Diagram, GroupQuery},
    groups::Group,
};
use serde::Serialize;

use crate::{command::QueryArg, config::CritddConfig, schema::input, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GroupsArg {
    /// Observation matrix file (JSON)
    input: PathBuf,
    #[clap(flatten)]
    pub(super) query: QueryArg,
    /// Higher values are better
    #[arg(long)]
    maximize: bool,
    /// Print groups as lists of treatment names
    #[arg(long)]
    names: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum GroupList {
    Groups(Vec<Group>),
    Names(Vec<Vec<String>>),
}

impl GroupList {
    fn len(&self) -> usize {
        match self {
            GroupList::Groups(groups) => groups.len(),
            GroupList::Names(names) => names.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct GroupsReport<'a> {
    query: GroupQuery,
    friedman_p_value: f64,
    treatment_names: &'a [String],
    average_ranks: &'a [f64],
    groups: GroupList,
}

fn report(diagram: &Diagram, query: GroupQuery, names: bool) -> anyhow::Result<GroupsReport<'_>> {
    let groups = if names {
        GroupList::Names(diagram.group_names(&query)?)
    } else {
        GroupList::Groups(diagram.groups(&query)?)
    };
    Ok(GroupsReport {
        query,
        friedman_p_value: diagram.friedman().p_value,
        treatment_names: diagram.treatment_names(),
        average_ranks: diagram.average_ranks(),
        groups,
    })
}

pub(crate) fn run(arg: &GroupsArg, config: &CritddConfig) -> anyhow::Result<()> {
    let query = arg.query.resolve(config)?;
    let table = input::read_input_file(&arg.input)?;
    let diagram = Diagram::new(&table.matrix, table.treatment_names, arg.maximize)?;
    let report = report(&diagram, query, arg.names)?;
    tracing::info!(num_groups = report.groups.len(), "extracted groups");

    let mut output = Output::from_output_path(arg.output.as_deref())?;
    output.write_json(&report)?;
    Ok(())
}
