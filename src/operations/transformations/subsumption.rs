use std::collections::HashSet;
use std::slice;

use log::debug;

use crate::errors::FormulaError;
use crate::formulas::{Formula, NormalForm};

/// This transformation performs subsumption on a given CNF and returns a new
/// CNF. I.e. performs as many subsumptions as possible.
///
/// A subsumption in a CNF means, that e.g. a clause `A | B | C` is subsumed by
/// another clause `A | B` and can therefore be deleted for an equivalent CNF.
/// Duplicate clauses are removed as well. The kept clauses stay in the order
/// of ascending size; a single remaining clause is returned on its own.
///
/// # Errors
///
/// [`FormulaError::NormalFormViolation`] if `formula` is not in CNF.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::FormulaContext;
/// # use featlogic::operations::transformations::cnf_subsumption;
/// let ctx = FormulaContext::new();
///
/// let formula = ctx.parse("(a | b | c) & (a | b) & (a | b)").unwrap();
///
/// assert_eq!(ctx.to_string(&cnf_subsumption(&formula).unwrap()), "a | b");
/// ```
pub fn cnf_subsumption(formula: &Formula) -> Result<Formula, FormulaError> {
    if !formula.is_cnf(false) {
        return Err(FormulaError::violation(NormalForm::Cnf, "CNF subsumption can only be applied to formulas in CNF"));
    }
    Ok(match formula {
        Formula::And(clauses) => single_or(remove_subsumed(clauses.clone()), Formula::and),
        _ => formula.clone(),
    })
}

/// This transformation performs subsumption on a given DNF and returns a new
/// DNF. I.e. performs as many subsumptions as possible.
///
/// A subsumption in a DNF means, that e.g. a minterm `A & B & C` is
/// subsumed by another minterm `A & B` and can therefore be deleted for
/// an equivalent DNF.
///
/// # Errors
///
/// [`FormulaError::NormalFormViolation`] if `formula` is not in DNF.
pub fn dnf_subsumption(formula: &Formula) -> Result<Formula, FormulaError> {
    if !formula.is_dnf(false) {
        return Err(FormulaError::violation(NormalForm::Dnf, "DNF subsumption can only be applied to formulas in DNF"));
    }
    Ok(match formula {
        Formula::Or(terms) => single_or(remove_subsumed(terms.clone()), Formula::or),
        _ => formula.clone(),
    })
}

fn single_or(mut clauses: Vec<Formula>, outer: fn(Vec<Formula>) -> Formula) -> Formula {
    if clauses.len() == 1 {
        clauses.swap_remove(0)
    } else {
        outer(clauses)
    }
}

/// The atoms of a clause (or term): the operands of a conjunction or
/// disjunction, otherwise the formula itself.
pub(crate) fn clause_atoms(clause: &Formula) -> &[Formula] {
    match clause {
        Formula::And(ops) | Formula::Or(ops) => ops,
        other => slice::from_ref(other),
    }
}

/// Sorts the clauses by size and drops every clause which is a superset of
/// an earlier one.
pub(crate) fn remove_subsumed(mut clauses: Vec<Formula>) -> Vec<Formula> {
    clauses.sort_by_key(|clause| clause_atoms(clause).len());
    let keep = {
        let sets: Vec<HashSet<&Formula>> = clauses.iter().map(|clause| clause_atoms(clause).iter().collect()).collect();
        let mut kept: Vec<usize> = Vec::with_capacity(sets.len());
        let mut keep = vec![false; sets.len()];
        for (index, set) in sets.iter().enumerate() {
            if !kept.iter().any(|&earlier| sets[earlier].is_subset(set)) {
                kept.push(index);
                keep[index] = true;
            }
        }
        keep
    };
    let before = clauses.len();
    let result: Vec<Formula> = clauses.into_iter().zip(keep).filter_map(|(clause, keep)| keep.then_some(clause)).collect();
    if result.len() < before {
        debug!("subsumption removed {} of {} clauses", before - result.len(), before);
    }
    result
}
