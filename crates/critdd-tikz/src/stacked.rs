//! TikZ code of several diagrams stacked on one 2-D axis.
//!
//! Diagrams are rows of the axis and ranks its columns. Every treatment is
//! one `\addplot` with a mark per diagram, and every group is a bracket
//! below its diagram's row.

use critdd_diagram::groups::Group;

use crate::{
    latex::{self, escape_label, num},
    options::{Options, RenderOptions},
};

fn tikzpicture_defaults() -> Options {
    Options::from_iter([("group line/.style", "semithick")])
}

fn axis_defaults() -> Options {
    Options::from_iter([
        ("clip", "false"),
        ("grid", "both"),
        ("axis line style", "draw=none"),
        ("tick style", "draw=none"),
        ("xticklabel pos", "upper"),
        ("y dir", "reverse"),
        ("xmin", "0.5"),
        ("ymin", "0.66"),
        (
            "legend style",
            "draw=none,fill=none,at={(1.1,.5)},anchor=west,row sep=.25em,\
             /tikz/every odd column/.append style={column sep=.5em}",
        ),
        ("legend cell align", "left"),
        ("title style", r"yshift=\baselineskip"),
        ("width", r"\axisdefaultwidth"),
    ])
}

/// Height of the axis as a multiple of the default height.
#[expect(clippy::cast_precision_loss)]
fn height_factor(m: usize) -> f64 {
    match m {
        2 => 0.5,
        ..5 => m as f64 / 5.0,
        _ => m as f64 / 6.0,
    }
}

/// Returns the TikZ code of `m` diagrams over the same `k` treatments.
///
/// `average_ranks` holds one row of `k` ranks per diagram and `groups` one
/// group list per diagram.
///
/// # Panics
///
/// Panics if the dimensions of the arguments disagree.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn to_str_2d(
    average_ranks: &[Vec<f64>],
    groups: &[Vec<Group>],
    treatment_names: &[String],
    diagram_names: &[String],
    options: &RenderOptions,
) -> String {
    let m = average_ranks.len();
    let k = treatment_names.len();
    assert_eq!(groups.len(), m, "one group list per diagram expected");
    assert_eq!(diagram_names.len(), m, "one name per diagram expected");
    assert!(
        average_ranks.iter().all(|row| row.len() == k),
        "one rank per treatment expected"
    );

    let mut axis = axis_defaults();
    axis.set(
        "ytick",
        (1..=m).map(|i| i.to_string()).collect::<Vec<_>>().join(","),
    );
    axis.set(
        "yticklabels",
        diagram_names
            .iter()
            .map(|name| format!("{{{}}}", escape_label(name)))
            .collect::<Vec<_>>()
            .join(","),
    );
    axis.set("xmax", num(k as f64 + 0.5));
    axis.set("ymax", num(m as f64 + 0.66));
    axis.set("height", format!("{}*\\axisdefaultheight", num(height_factor(m))));
    if options.reverse_x {
        axis.set("x dir", "reverse");
    }

    let mut commands = (0..k)
        .map(|t| {
            let coordinates = average_ranks
                .iter()
                .enumerate()
                .map(|(i, row)| format!("  ({}, {})", num(row[t]), i + 1))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "\\addplot+[only marks] coordinates {{\n{coordinates}\n}};\n\\addlegendentry{{{}}}",
                escape_label(&treatment_names[t])
            )
        })
        .collect::<Vec<_>>();
    for (i, diagram_groups) in groups.iter().enumerate() {
        let n_groups = diagram_groups.len() as f64;
        for (j, group) in diagram_groups.iter().enumerate() {
            let y = i as f64 + (j as f64 + 0.66) / (1.33 * n_groups + 1.0) + 1.0;
            commands.push(format!(
                "\\draw[group line] (axis cs:{min},{y}) -- ++(0pt,-3pt) -- \
                 ([yshift=-3pt]axis cs:{max},{y}) -- ++(0pt,3pt);",
                min = num(group.min_rank),
                max = num(group.max_rank),
                y = num(y),
            ));
        }
    }

    commands.push(String::new());
    let axis = latex::environment("axis", &commands, &axis.merged(&options.axis_options));
    let picture = latex::environment(
        "tikzpicture",
        &[axis],
        &tikzpicture_defaults().merged(&options.tikzpicture_options),
    );
    if options.as_document {
        latex::document(&picture, options.preamble.as_deref())
    } else {
        picture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}_{i}")).collect()
    }

    #[test]
    fn test_height_factor() {
        assert_eq!(height_factor(1), 0.2);
        assert_eq!(height_factor(2), 0.5);
        assert_eq!(height_factor(4), 0.8);
        assert_eq!(height_factor(12), 2.0);
    }

    #[test]
    fn test_plots_and_brackets() {
        let ranks = vec![vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]];
        let groups = vec![
            vec![Group::spanning(&ranks[0], 1.0, 2.0)],
            vec![
                Group::spanning(&ranks[1], 1.0, 2.0),
                Group::spanning(&ranks[1], 2.0, 3.0),
            ],
        ];
        let tikz = to_str_2d(
            &ranks,
            &groups,
            &names("t", 3),
            &names("d", 2),
            &RenderOptions::default(),
        );
        assert!(tikz.contains(
            "\\addplot+[only marks] coordinates {\n  (1, 1)\n  (3, 2)\n};\n\\addlegendentry{t\\_0}"
        ));
        assert_eq!(tikz.matches("\\addplot+").count(), 3);
        assert_eq!(tikz.matches("\\draw[group line]").count(), 3);
        assert!(tikz.contains("  ytick={1,2},\n  yticklabels={{d\\_0},{d\\_1}},\n"));
        assert!(tikz.contains("  xmax={3.5},\n  ymax={2.66},\n  height={0.5*\\axisdefaultheight},\n"));
        // a single group sits at 0.66 / 2.33 below its row
        let y = 0.66 / (1.33 + 1.0) + 1.0;
        assert!(tikz.contains(&format!(
            "\\draw[group line] (axis cs:1,{y}) -- ++(0pt,-3pt) -- ([yshift=-3pt]axis cs:2,{y}) -- ++(0pt,3pt);"
        )));
        assert!(tikz.starts_with("\\begin{tikzpicture}[\n  group line/.style={semithick},\n]\n"));
    }

    #[test]
    fn test_reverse_and_document() {
        let ranks = vec![vec![1.5, 1.5, 3.0]];
        let options = RenderOptions {
            reverse_x: true,
            as_document: true,
            ..RenderOptions::default()
        };
        let tikz = to_str_2d(&ranks, &[vec![]], &names("t", 3), &names("d", 1), &options);
        assert!(tikz.contains("  x dir={reverse},\n"));
        assert!(tikz.starts_with(r"\documentclass"));
        assert!(!tikz.contains("\\draw[group line]"));
    }
}
