//! CPLEX LP lowering of a [`ConstraintSet`] for integer-programming engines.
//!
//! Node `i` is the binary column `x<i>`, route `j` the binary column `y<j>`.

use std::io::{self, Write};

use monplace_core::{ConstraintSet, Origin, Requirement, Var};

const TERMS_PER_LINE: usize = 8;

/// Row counts of one LP model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LpStats {
    pub rows: usize,
    /// Requirements without any variable; the model is infeasible if non-zero.
    pub empty_rows: usize,
}

fn column(var: Var) -> String {
    match var {
        Var::Monitor(i) => format!("x{}", i),
        Var::Route(j) => format!("y{}", j),
    }
}

fn row_name(origin: Origin) -> String {
    match origin {
        Origin::Cover { node } => format!("cover{}", node),
        Origin::Distinguish { a, b } => format!("dist{}_{}", a, b),
        Origin::Independent { node } => format!("indep{}", node),
        Origin::Component { index } => format!("comp{}", index),
    }
}

/// Writes `t1 + t2 + ...`, wrapping long sums over several lines.
fn write_sum<W: Write>(out: &mut W, terms: &[String]) -> io::Result<()> {
    for (k, term) in terms.iter().enumerate() {
        if k > 0 {
            if k % TERMS_PER_LINE == 0 {
                write!(out, "\n  ")?;
            }
            write!(out, " + ")?;
        }
        write!(out, "{}", term)?;
    }
    Ok(())
}

fn write_requirement<W: Write>(out: &mut W, req: &Requirement, stats: &mut LpStats) -> io::Result<()> {
    stats.rows += 1;
    write!(out, " {}: ", row_name(req.origin))?;
    if req.vars.is_empty() {
        stats.empty_rows += 1;
        return writeln!(out, "0 x0 >= 1");
    }
    let terms: Vec<String> = req.vars.iter().map(|&v| column(v)).collect();
    write_sum(out, &terms)?;
    let op = match req.origin {
        Origin::Independent { .. } => "=",
        _ => ">=",
    };
    writeln!(out, " {} 1", op)
}

/// Writes the model minimizing the number of monitors.
///
/// # Example
///
/// ```
/// use monplace_core::{ConstraintSet, Goal, Route, Topology};
/// use monplace_solver::lp::write_lp;
///
/// let topology = Topology::build(2, vec![Route::new(0, 1, [0, 1], 0)]).unwrap();
/// let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
///
/// let mut model = Vec::new();
/// let stats = write_lp(&constraints, &mut model).unwrap();
/// let text = String::from_utf8(model).unwrap();
/// assert!(text.contains(" act0_c: x0 + x1 - y0 <= 1\n"));
/// assert_eq!(stats.empty_rows, 0);
/// ```
pub fn write_lp<W: Write>(constraints: &ConstraintSet<'_>, out: &mut W) -> io::Result<LpStats> {
    let mut stats = LpStats::default();
    let n = constraints.num_nodes();

    writeln!(out, "\\ monitor placement, goal {}", constraints.goal())?;
    writeln!(out, "Minimize")?;
    write!(out, " obj: ")?;
    let objective: Vec<String> = (0..n).map(|i| column(Var::Monitor(i))).collect();
    write_sum(out, &objective)?;
    writeln!(out)?;

    writeln!(out, "Subject To")?;
    for act in constraints.activations() {
        let (j, s, d) = (act.route, act.start, act.end);
        writeln!(out, " act{j}_s: x{s} - y{j} >= 0")?;
        writeln!(out, " act{j}_d: x{d} - y{j} >= 0")?;
        if s == d {
            writeln!(out, " act{j}_c: 2 x{s} - y{j} <= 1")?;
        } else {
            writeln!(out, " act{j}_c: x{s} + x{d} - y{j} <= 1")?;
        }
        stats.rows += 3;
    }
    for req in constraints.requirements() {
        write_requirement(out, &req, &mut stats)?;
    }

    writeln!(out, "Binary")?;
    for i in 0..n {
        writeln!(out, " x{}", i)?;
    }
    for j in 0..constraints.num_routes() {
        writeln!(out, " y{}", j)?;
    }
    writeln!(out, "End")?;
    Ok(stats)
}
