//! Weighted partial MaxSAT encoding of a [`ConstraintSet`].
//!
//! Variable numbering is 1-based: node `i` is variable `i + 1`, route `j` is
//! variable `n + j + 1`. Clauses are emitted in a fixed order:
//!
//! 1. one soft clause `¬x_i` of weight 1 per node;
//! 2. three hard clauses per route, `(x_s ∨ ¬y)`, `(x_d ∨ ¬y)`, `(¬x_s ∨ ¬x_d ∨ y)`;
//! 3. one hard clause per coverage requirement;
//! 4. for `1id`, one hard clause per pair, grouped by the smaller node;
//! 5. one hard clause per reduction requirement.
//!
//! The sink is told where each group ends so a streaming writer can flush
//! without holding the quadratic pair family in memory.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use monplace_core::{ConstraintSet, Requirement, Result, Var};
use tracing::debug;


/// Clause weight on the wire: `h` or a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Hard,
    Soft(u64),
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Hard => f.write_str("h"),
            Weight::Soft(w) => write!(f, "{}", w),
        }
    }
}

/// One weighted clause. Positive literals are variables, negative ones negations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub weight: Weight,
    pub literals: Vec<i64>,
}

impl Clause {
    pub fn hard(literals: Vec<i64>) -> Self {
        Self {
            weight: Weight::Hard,
            literals,
        }
    }

    pub fn soft(weight: u64, literals: Vec<i64>) -> Self {
        Self {
            weight: Weight::Soft(weight),
            literals,
        }
    }

    pub fn is_hard(&self) -> bool {
        self.weight == Weight::Hard
    }

    /// Evaluates the clause; `assignment[k]` is the value of variable `k + 1`.
    ///
    /// A literal naming `0` or a variable beyond `assignment` is false.
    pub fn is_satisfied_by(&self, assignment: &[bool]) -> bool {
        self.literals.iter().any(|&lit| {
            let value = usize::try_from(lit.unsigned_abs())
                .ok()
                .and_then(|var| var.checked_sub(1))
                .and_then(|k| assignment.get(k).copied());
            match value {
                Some(value) if lit > 0 => value,
                Some(value) => !value,
                None => false,
            }
        })
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weight)?;
        for lit in &self.literals {
            write!(f, " {}", lit)?;
        }
        f.write_str(" 0")
    }
}

/// Variable of node `i`.
pub fn node_var(i: usize) -> i64 {
    i as i64 + 1
}

/// Variable of route `j` in a topology of `n` nodes.
pub fn route_var(n: usize, j: usize) -> i64 {
    (n + j) as i64 + 1
}

fn var_literal(n: usize, var: Var) -> i64 {
    match var {
        Var::Monitor(i) => node_var(i),
        Var::Route(j) => route_var(n, j),
    }
}

/// Receiver of an encoded clause stream.
pub trait ClauseSink {
    fn emit(&mut self, clause: &Clause) -> io::Result<()>;

    /// Marks the end of a group of clauses.
    fn end_group(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ClauseSink for Vec<Clause> {
    fn emit(&mut self, clause: &Clause) -> io::Result<()> {
        self.push(clause.clone());
        Ok(())
    }
}

/// Writes one clause per line, flushing at every group boundary.
pub struct WcnfWriter<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> WcnfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            out: BufWriter::new(inner),
        }
    }

    pub fn get_ref(&self) -> &W {
        self.out.get_ref()
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.out.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> ClauseSink for WcnfWriter<W> {
    fn emit(&mut self, clause: &Clause) -> io::Result<()> {
        writeln!(self.out, "{}", clause)
    }

    fn end_group(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Clause counts of one encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub hard: usize,
    pub soft: usize,
    pub groups: usize,
}

impl EncodeStats {
    pub fn total(&self) -> usize {
        self.hard + self.soft
    }
}

struct Emitter<'s, S: ClauseSink + ?Sized> {
    sink: &'s mut S,
    stats: EncodeStats,
    n: usize,
}

impl<S: ClauseSink + ?Sized> Emitter<'_, S> {
    fn emit(&mut self, clause: Clause) -> io::Result<()> {
        if clause.is_hard() {
            self.stats.hard += 1;
        } else {
            self.stats.soft += 1;
        }
        self.sink.emit(&clause)
    }

    fn requirement(&mut self, req: Requirement) -> io::Result<()> {
        let n = self.n;
        let literals = req.vars.into_iter().map(|v| var_literal(n, v)).collect();
        self.emit(Clause::hard(literals))
    }

    fn end_group(&mut self) -> io::Result<()> {
        self.stats.groups += 1;
        self.sink.end_group()
    }
}

/// Streams the clauses of `constraints` into `sink`.
///
/// # Example
///
/// ```
/// use monplace_core::{ConstraintSet, Goal, Route, Topology};
/// use monplace_solver::encoder::{encode, Clause};
///
/// let topology = Topology::build(1, vec![Route::new(0, 0, [0], 0)]).unwrap();
/// let constraints = ConstraintSet::new(&topology, Goal::Cover, None).unwrap();
///
/// let mut clauses: Vec<Clause> = Vec::new();
/// let stats = encode(&constraints, &mut clauses).unwrap();
/// assert_eq!(stats.soft, 1);
/// assert_eq!(clauses[0].to_string(), "1 -1 0");
/// ```
pub fn encode<S: ClauseSink + ?Sized>(
    constraints: &ConstraintSet<'_>,
    sink: &mut S,
) -> Result<EncodeStats> {
    let n = constraints.num_nodes();
    let mut out = Emitter {
        sink,
        stats: EncodeStats::default(),
        n,
    };

    for i in 0..n {
        out.emit(Clause::soft(1, vec![-node_var(i)]))?;
    }
    out.end_group()?;

    for act in constraints.activations() {
        let (s, d, y) = (node_var(act.start), node_var(act.end), route_var(n, act.route));
        out.emit(Clause::hard(vec![s, -y]))?;
        out.emit(Clause::hard(vec![d, -y]))?;
        out.emit(Clause::hard(vec![-s, -d, y]))?;
    }
    out.end_group()?;

    for req in constraints.coverage() {
        out.requirement(req)?;
    }
    out.end_group()?;

    for row in constraints.distinguishing_rows() {
        for req in row {
            out.requirement(req)?;
        }
        out.end_group()?;
    }

    for req in constraints.reduction_requirements() {
        out.requirement(req)?;
    }
    out.end_group()?;

    let stats = out.stats;
    debug!(
        event = "clauses_encoded",
        goal = %constraints.goal(),
        hard = stats.hard,
        soft = stats.soft,
        groups = stats.groups,
    );
    Ok(stats)
}

/// Encodes `constraints` into a new file at `path`.
pub fn encode_to_path(constraints: &ConstraintSet<'_>, path: &Path) -> Result<EncodeStats> {
    let mut writer = WcnfWriter::new(File::create(path)?);
    let stats = encode(constraints, &mut writer)?;
    writer.into_inner()?;
    Ok(stats)
}
