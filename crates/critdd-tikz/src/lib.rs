//! TikZ/pgfplots rendering of critical difference diagrams.
//!
//! This crate only formats text: it receives average ranks, groups and names
//! and produces LaTeX code, optionally as a compilable standalone document.
//! The statistics live in `critdd-stats` and `critdd-diagram`.
//!
//! # Modules
//!
//! - [`options`]: Ordered TikZ options and [`RenderOptions`](options::RenderOptions)
//! - [`latex`]: Environments, documents and label escaping
//! - [`single`]: A single diagram on a 1-D rank axis
//! - [`stacked`]: Several diagrams on a 2-D axis
//! - [`export`]: Writing `.tex`/`.tikz` files and compiling `.pdf`/`.svg`
//!
//! # Examples
//!
//! ```
//! use critdd_diagram::diagram::{Diagram, GroupQuery};
//! use critdd_stats::matrix::ObservationMatrix;
//! use critdd_tikz::options::RenderOptions;
//!
//! let matrix = ObservationMatrix::from_rows([
//!     [0.1, 0.4, 0.5],
//!     [0.2, 0.3, 0.9],
//!     [0.1, 0.6, 0.7],
//!     [0.3, 0.5, 0.8],
//! ])
//! .unwrap();
//! let diagram = Diagram::new(&matrix, None, false).unwrap();
//! let tikz = critdd_tikz::render(&diagram, &GroupQuery::default(), &RenderOptions::default()).unwrap();
//! assert!(tikz.contains(r"\begin{axis}"));
//! assert!(tikz.contains("{treatment 0};"));
//! ```

use std::path::Path;

use critdd_diagram::{CriticalDifference, DiagramError, PlotData, diagram::GroupQuery};

use crate::{
    export::{ExportError, ExportTarget},
    options::RenderOptions,
};

pub mod export;
pub mod latex;
pub mod options;
pub mod single;
pub mod stacked;

/// Renders a single or stacked diagram for the given group query.
pub fn render<D>(
    diagram: &D,
    query: &GroupQuery,
    options: &RenderOptions,
) -> Result<String, DiagramError>
where
    D: CriticalDifference + ?Sized,
{
    let names = diagram.treatment_names();
    let tikz = match diagram.plot_data(query)? {
        PlotData::Single {
            average_ranks,
            groups,
        } => single::to_str(&average_ranks, &groups, names, options),
        PlotData::Stacked {
            diagram_names,
            average_ranks,
            groups,
        } => stacked::to_str_2d(&average_ranks, &groups, names, &diagram_names, options),
    };
    Ok(tikz)
}

/// Renders a diagram into a file, see [`export::to_file`].
///
/// Targets that are compiled are always rendered as a full document.
pub fn to_file<D>(
    diagram: &D,
    path: &Path,
    query: &GroupQuery,
    options: &RenderOptions,
) -> Result<ExportTarget, ExportError>
where
    D: CriticalDifference + ?Sized,
{
    let target = ExportTarget::from_path(path)?;
    let tikz = if target.requires_document() && !options.as_document {
        let options = RenderOptions {
            as_document: true,
            ..options.clone()
        };
        render(diagram, query, &options)?
    } else {
        render(diagram, query, options)?
    };
    export::to_file(path, &tikz)
}
