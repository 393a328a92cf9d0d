//! Distributive-law conversion of a flattened NNF into CNF or DNF.
//!
//! The walk is a post-order traversal over a path of [`PathElement`]s. Every
//! element collects the converted children of its node and the largest
//! nesting depth found beneath it. A clause-connective node (`Or` for CNF,
//! `And` for DNF) with anything but atoms beneath it is replaced by the
//! clauses of the cartesian product of its children, which are spliced into
//! the parent. All other nodes are rebuilt from their converted children.

use indexmap::IndexSet;
use log::debug;

use crate::errors::FormulaError;
use crate::formulas::{Formula, NormalForm};
use crate::handlers::{FactorizationError, FactorizationHandler};
use crate::operations::predicates::{is_cnf, is_dnf, is_nnf};

use super::flatten;
use super::nnf;
use super::subsumption::{clause_atoms, remove_subsumed};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClauseKind {
    Cnf,
    Dnf,
}

impl ClauseKind {
    pub(crate) const fn form(self) -> NormalForm {
        match self {
            Self::Cnf => NormalForm::Cnf,
            Self::Dnf => NormalForm::Dnf,
        }
    }

    const fn is_clause_node(self, formula: &Formula) -> bool {
        match self {
            Self::Cnf => formula.is_or(),
            Self::Dnf => formula.is_and(),
        }
    }

    const fn is_outer_node(self, formula: &Formula) -> bool {
        match self {
            Self::Cnf => formula.is_and(),
            Self::Dnf => formula.is_or(),
        }
    }

    const fn clause(self, atoms: Vec<Formula>) -> Formula {
        match self {
            Self::Cnf => Formula::Or(atoms),
            Self::Dnf => Formula::And(atoms),
        }
    }

    const fn outer(self, clauses: Vec<Formula>) -> Formula {
        match self {
            Self::Cnf => Formula::And(clauses),
            Self::Dnf => Formula::Or(clauses),
        }
    }

    fn check(self, formula: &Formula, strict: bool) -> bool {
        match self {
            Self::Cnf => is_cnf(formula, strict),
            Self::Dnf => is_dnf(formula, strict),
        }
    }
}

/// Atoms and quantified formulas are leaves of the walk.
const fn is_leaf(formula: &Formula) -> bool {
    !matches!(formula, Formula::And(_) | Formula::Or(_))
}

struct PathElement<'a> {
    node: &'a Formula,
    next: usize,
    new_children: Vec<Formula>,
    max_depth: usize,
}

impl<'a> PathElement<'a> {
    fn new(node: &'a Formula) -> Self {
        Self { node, next: 0, new_children: Vec::with_capacity(node.operand_count()), max_depth: 0 }
    }
}

#[derive(Default)]
struct Statistics {
    distributions: usize,
    clauses: usize,
}

/// Full pipeline: NNF, flattening, distribution and shaping.
pub(crate) fn convert(
    formula: &Formula,
    kind: ClauseKind,
    strict: bool,
    handler: &mut dyn FactorizationHandler,
) -> Result<Formula, FormulaError> {
    handler.started();
    let prepared = flatten(&nnf(formula));
    let distributed = distribute(&prepared, kind, handler)?;
    shape(distributed, kind, strict)
}

/// Distribution of an input which already is in (non-strict) NNF.
pub(crate) fn convert_nnf(
    formula: &Formula,
    kind: ClauseKind,
    strict: bool,
    handler: &mut dyn FactorizationHandler,
) -> Result<Formula, FormulaError> {
    if !is_nnf(formula, false) {
        return Err(FormulaError::violation(NormalForm::Nnf, format!("{} distribution needs an NNF input", kind.form())));
    }
    handler.started();
    let distributed = distribute(&flatten(formula), kind, handler)?;
    shape(distributed, kind, strict)
}

fn distribute(
    formula: &Formula,
    kind: ClauseKind,
    handler: &mut dyn FactorizationHandler,
) -> Result<Formula, FactorizationError> {
    if is_leaf(formula) {
        return Ok(formula.clone());
    }
    let mut statistics = Statistics::default();
    let mut top: Vec<Formula> = Vec::new();
    let mut path = vec![PathElement::new(formula)];
    while let Some(element) = path.last_mut() {
        if let Some(child) = element.node.operand(element.next) {
            element.next += 1;
            if is_leaf(child) {
                element.new_children.push(child.clone());
            } else {
                path.push(PathElement::new(child));
            }
            continue;
        }
        let Some(done) = path.pop() else { break };
        let (results, depth) = if kind.is_clause_node(done.node) && done.max_depth > 0 {
            handler.performed_distribution()?;
            statistics.distributions += 1;
            let clauses = product(&done.new_children, kind, handler, &mut statistics)?;
            (remove_subsumed(clauses), 1)
        } else if done.node.is_and() {
            (vec![Formula::And(done.new_children)], done.max_depth + 1)
        } else {
            (vec![Formula::Or(done.new_children)], done.max_depth + 1)
        };
        match path.last_mut() {
            Some(parent) => {
                parent.max_depth = parent.max_depth.max(depth);
                parent.new_children.extend(results);
            }
            None => top = results,
        }
    }
    debug!(
        "{} distribution: {} distributions, {} clauses created, {} top-level operands",
        kind.form(),
        statistics.distributions,
        statistics.clauses,
        top.len()
    );
    Ok(if top.len() == 1 { top.swap_remove(0) } else { kind.outer(top) })
}

/// The alternatives a child of a distributed node offers: one per clause of
/// an outer-connective child, a single one for an atom or a clause.
fn alternatives(child: &Formula, kind: ClauseKind) -> Vec<&[Formula]> {
    if kind.is_outer_node(child) {
        child.operands().map(clause_atoms).collect()
    } else {
        vec![clause_atoms(child)]
    }
}

struct Frame {
    factor: usize,
    next: usize,
    redundant: bool,
    added: usize,
}

impl Frame {
    const fn new(factor: usize) -> Self {
        Self { factor, next: 0, redundant: false, added: 0 }
    }
}

/// Cartesian product of the alternatives of `children`.
///
/// Atoms already in the candidate are not added twice, a candidate receiving
/// the complement of one of its atoms is discarded, and a factor already
/// satisfied by the candidate is skipped.
fn product(
    children: &[Formula],
    kind: ClauseKind,
    handler: &mut dyn FactorizationHandler,
    statistics: &mut Statistics,
) -> Result<Vec<Formula>, FactorizationError> {
    let mut factors: Vec<Vec<&[Formula]>> = children.iter().map(|child| alternatives(child, kind)).collect();
    factors.sort_by_key(Vec::len);
    let mut clauses = Vec::new();
    if factors.is_empty() {
        let clause = kind.clause(Vec::new());
        handler.created_clause(&clause)?;
        statistics.clauses += 1;
        clauses.push(clause);
        return Ok(clauses);
    }

    let mut current: IndexSet<&Formula> = IndexSet::new();
    let mut stack = vec![Frame::new(0)];
    while let Some(frame) = stack.last_mut() {
        for _ in 0..frame.added {
            current.pop();
        }
        frame.added = 0;
        let options = &factors[frame.factor];
        if frame.redundant {
            stack.pop();
            continue;
        }
        if frame.next == 0 && options.iter().any(|alt| alt.iter().all(|atom| current.contains(atom))) {
            frame.redundant = true;
        } else {
            let mut extended = false;
            while let Some(&alt) = options.get(frame.next) {
                frame.next += 1;
                if try_extend(&mut current, alt, &mut frame.added) {
                    extended = true;
                    break;
                }
            }
            if !extended {
                stack.pop();
                continue;
            }
        }
        let next_factor = frame.factor + 1;
        if next_factor == factors.len() {
            let clause = kind.clause(current.iter().map(|&atom| atom.clone()).collect());
            handler.created_clause(&clause)?;
            statistics.clauses += 1;
            clauses.push(clause);
        } else {
            stack.push(Frame::new(next_factor));
        }
    }
    Ok(clauses)
}

/// Adds the atoms of `alternative` to `current`, counting the new ones in
/// `added`. Leaves `current` as it was and returns `false` if an atom meets
/// its complement, including one added from `alternative` itself.
fn try_extend<'a>(current: &mut IndexSet<&'a Formula>, alternative: &'a [Formula], added: &mut usize) -> bool {
    for atom in alternative {
        if atom.negated_atom().is_some_and(|complement| current.contains(&complement)) {
            for _ in 0..*added {
                current.pop();
            }
            *added = 0;
            return false;
        }
        if current.insert(atom) {
            *added += 1;
        }
    }
    true
}

/// Brings a distributed formula into the canonical three-level shape if
/// `strict` is set, and checks the result.
fn shape(formula: Formula, kind: ClauseKind, strict: bool) -> Result<Formula, FormulaError> {
    if !strict {
        return Ok(formula);
    }
    let wrap = |atom: Formula| kind.clause(vec![atom]);
    let shaped = if kind.is_clause_node(&formula) {
        kind.outer(vec![formula])
    } else if kind.is_outer_node(&formula) {
        let mut formula = formula;
        let clauses = match &mut formula {
            Formula::And(ops) | Formula::Or(ops) => std::mem::take(ops),
            _ => Vec::new(),
        };
        kind.outer(clauses.into_iter().map(|c| if kind.is_clause_node(&c) { c } else { wrap(c) }).collect())
    } else {
        kind.outer(vec![wrap(formula)])
    };
    if kind.check(&shaped, true) {
        debug!("{} shaped into {} clauses", kind.form(), shaped.operand_count());
        Ok(shaped)
    } else {
        Err(FormulaError::violation(kind.form(), "distributed formula does not have the clausal shape"))
    }
}
