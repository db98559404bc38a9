//! TikZ code of a single critical difference diagram.
//!
//! The axis shows the average ranks. Treatments are sorted by rank; the
//! better half is labelled on one side of the axis and the worse half on the
//! other, with label rows stepping down towards the middle. Each group is a
//! thick bar below the axis, at two thirds of the height of its topmost
//! member's label.

use critdd_diagram::groups::Group;

use crate::{
    latex::{self, escape_label, num},
    options::{Options, RenderOptions},
};

/// Minimum vertical distance between overlapping group bars.
const GROUP_SPACING: f64 = 0.2;

fn tikzpicture_defaults() -> Options {
    Options::from_iter([
        (
            "treatment line/.style",
            "rounded corners=1.5pt, line cap=round, shorten >=1pt",
        ),
        ("treatment label/.style", r"font=\small"),
        ("group line/.style", "ultra thick"),
    ])
}

fn axis_defaults() -> Options {
    Options::from_iter([
        ("clip", "false"),
        ("axis x line", "center"),
        ("axis y line", "none"),
        ("axis line style", "-"),
        ("xmin", "1"),
        ("ymax", "0"),
        ("scale only axis", "true"),
        ("width", r"\axisdefaultwidth"),
        (
            "ticklabel style",
            r"anchor=south, yshift=1.3*\pgfkeysvalueof{/pgfplots/major tick length}, font=\small",
        ),
        ("every tick/.style", "draw=black"),
        (
            "major tick style",
            r"yshift=.5*\pgfkeysvalueof{/pgfplots/major tick length}",
        ),
        (
            "minor tick style",
            r"yshift=.5*\pgfkeysvalueof{/pgfplots/minor tick length}",
        ),
        ("title style", r"yshift=\baselineskip"),
    ])
}

/// Major tick positions and the number of minor ticks between them.
#[expect(clippy::cast_precision_loss)]
fn xticks(k: usize) -> Option<(Vec<f64>, u8)> {
    let ticks = |step: f64| {
        let mut ticks = vec![];
        let mut t = 1.0;
        while t <= k as f64 {
            ticks.push(t);
            t += step;
        }
        ticks
    };
    match k {
        ..=6 => Some((ticks(1.0), 3)),
        7..=8 => Some((ticks(1.0), 1)),
        10 => Some((ticks(1.5), 2)),
        _ if (k - 1) % 3 == 0 => Some((ticks(3.0), 1)),
        _ if k % 2 == 1 => Some((ticks(2.0), 1)),
        _ => None,
    }
}

/// Indices of `values` in ascending order; ties keep their index order.
pub(crate) fn argsort(values: &[f64]) -> Vec<usize> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

/// Returns the TikZ code of a single diagram.
///
/// # Examples
///
/// ```
/// use critdd_diagram::groups::Group;
/// use critdd_tikz::{options::RenderOptions, single::to_str};
///
/// let ranks = [1.0, 2.5, 2.5];
/// let groups = vec![Group::spanning(&ranks, 1.0, 2.5)];
/// let names = ["a_1".to_owned(), "b".to_owned(), "c".to_owned()];
/// let tikz = to_str(&ranks, &groups, &names, &RenderOptions::default());
/// assert!(tikz.starts_with("\\begin{tikzpicture}["));
/// assert!(tikz.contains(r"{a\_1};"));
/// assert!(tikz.contains(
///     r"\draw[group line] (axis cs:1, -1.3333333333333333) -- (axis cs:2.5, -1.3333333333333333);"
/// ));
/// ```
///
/// # Panics
///
/// Panics if `treatment_names` does not hold one name per rank.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn to_str(
    average_ranks: &[f64],
    groups: &[Group],
    treatment_names: &[String],
    options: &RenderOptions,
) -> String {
    let k = average_ranks.len();
    assert_eq!(treatment_names.len(), k, "one name per treatment expected");
    let changepoint = k / 2;

    let mut axis = axis_defaults();
    axis.set("xmax", k.to_string());
    axis.set("ymin", num(-(changepoint as f64 + 1.5)));
    axis.set("height", format!("{}\\baselineskip", changepoint + 2));
    if let Some((ticks, minor)) = xticks(k) {
        let ticks = ticks.into_iter().map(num).collect::<Vec<_>>().join(",");
        axis.set("xtick", ticks);
        axis.set("minor x tick num", minor.to_string());
    }
    if options.reverse_x {
        axis.set("x dir", "reverse");
    }

    let order = argsort(average_ranks);
    let min_rank = order.first().map_or(0.0, |&i| average_ranks[i]);
    let max_rank = order.last().map_or(0.0, |&i| average_ranks[i]);
    let mut is_high = vec![false; k];
    let mut y_pos = vec![0.0; k];
    let odd_shift = if k % 2 == 1 { 0.5 } else { 0.0 };
    for (position, &i) in order.iter().enumerate() {
        is_high[i] = position >= changepoint;
        y_pos[i] = if is_high[i] {
            (1 + k - position) as f64
        } else {
            2.0 + position as f64 + odd_shift
        };
    }
    let spread = k as f64 / 12.0;

    let mut commands = vec![];
    for &i in &order {
        let x_pos = if is_high[i] {
            max_rank + spread
        } else {
            min_rank - spread
        };
        let anchor = if is_high[i] == options.reverse_x {
            "east"
        } else {
            "west"
        };
        commands.push(format!(
            "\\draw[treatment line] ([yshift=-2pt] axis cs:{}, 0) |- (axis cs:{}, {})\n  \
             node[treatment label, anchor={anchor}] {{{}}};",
            num(average_ranks[i]),
            num(x_pos),
            num(-y_pos[i]),
            escape_label(&treatment_names[i]),
        ));
    }

    let y_group = group_positions(groups, &y_pos);
    for (group, y) in groups.iter().zip(y_group) {
        commands.push(format!(
            "\\draw[group line] (axis cs:{}, {}) -- (axis cs:{}, {});",
            num(group.min_rank),
            num(-y),
            num(group.max_rank),
            num(-y),
        ));
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

/// Vertical bar positions, pushed apart where vertically adjacent bars share a member.
fn group_positions(groups: &[Group], y_pos: &[f64]) -> Vec<f64> {
    let mut y_group = groups
        .iter()
        .map(|g| {
            g.members
                .iter()
                .map(|&i| y_pos[i])
                .fold(f64::INFINITY, f64::min)
                * 2.0
                / 3.0
        })
        .collect::<Vec<_>>();
    let order = argsort(&y_group);
    for pair in order.windows(2) {
        let (upper, lower) = (pair[0], pair[1]);
        if groups[lower]
            .members
            .iter()
            .any(|&m| groups[upper].contains(m))
        {
            y_group[lower] = y_group[lower].max(y_group[upper] + GROUP_SPACING);
        }
    }
    y_group
}
