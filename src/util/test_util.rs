#![allow(non_snake_case)]
#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::datastructures::IndexAssignment;
use crate::formulas::{Comparator, Comparison, Formula, FormulaContext, Literal, Term, ValueType, VariableMap};
use crate::operations::functions;

pub fn hash<H>(element: H) -> u64
where H: Hash {
    let mut hasher = DefaultHasher::new();
    element.hash(&mut hasher);
    hasher.finish()
}

/// Literals given as `"a ~b c"`, resolved against `map`.
pub fn lits(elements: &str, map: &VariableMap) -> BTreeSet<Literal> {
    lits_list(elements, map).into_iter().collect()
}

pub fn lits_list(elements: &str, map: &VariableMap) -> Vec<Literal> {
    elements
        .split(' ')
        .map(|lit| match lit.strip_prefix('~') {
            Some(name) => map.literal(name, false).unwrap(),
            None => map.literal(lit, true).unwrap(),
        })
        .collect()
}

/// All `2^n` boolean assignments of the given indices.
pub fn all_assignments(indices: &[u32]) -> Vec<IndexAssignment> {
    assert!(indices.len() < 20, "too many variables for exhaustive enumeration");
    (0_u32..1 << indices.len())
        .map(|bits| {
            let mut assignment = IndexAssignment::new();
            for (position, &index) in indices.iter().enumerate() {
                assignment.set_bool(index, bits & (1 << position) != 0);
            }
            assignment
        })
        .collect()
}

/// Checks that both formulas evaluate identically under every assignment of
/// their variables.
pub fn equivalent(left: &Formula, right: &Formula, map: &VariableMap) -> bool {
    let indices: Vec<u32> = functions::variables(left).union(&functions::variables(right)).copied().collect();
    all_assignments(&indices)
        .iter()
        .all(|assignment| left.evaluate(assignment, map).unwrap() == right.evaluate(assignment, map).unwrap())
}

/// Clauses of a CNF (or terms of a DNF) as sets of atoms.
pub fn clause_sets(formula: &Formula) -> BTreeSet<Vec<String>> {
    let map = VariableMap::new();
    formula
        .operands()
        .map(|clause| {
            let mut atoms: Vec<String> = if clause.is_atomic() {
                vec![clause.to_string(&map)]
            } else {
                clause.operands().map(|atom| atom.to_string(&map)).collect()
            };
            atoms.sort();
            atoms
        })
        .collect()
}

/// Returns `true` if some clause of `formula` holds an atom together with
/// its complement.
pub fn has_complementary_clause(formula: &Formula) -> bool {
    formula.operands().any(|clause| {
        let atoms: Vec<&Formula> = if clause.is_atomic() { vec![clause] } else { clause.operands().collect() };
        atoms.iter().any(|atom| atoms.iter().any(|other| atom.is_complement_of(other)))
    })
}

/// Returns `true` if the atom set of some clause of `formula` contains the
/// atom set of another clause.
pub fn has_subsumed_clause(formula: &Formula) -> bool {
    let clauses: Vec<BTreeSet<String>> =
        clause_sets(formula).into_iter().map(|clause| clause.into_iter().collect()).collect();
    clauses.iter().enumerate().any(|(i, small)| {
        clauses.iter().enumerate().any(|(j, large)| i != j && small.is_subset(large))
    })
}

#[allow(clippy::struct_field_names)]
pub struct F {
    pub(crate) f: FormulaContext,

    // Constants
    pub(crate) TRUE: Formula,
    pub(crate) FALSE: Formula,

    // Literals
    pub(crate) A: Formula,
    pub(crate) B: Formula,
    pub(crate) C: Formula,
    pub(crate) D: Formula,
    pub(crate) X: Formula,
    pub(crate) Y: Formula,
    pub(crate) Z: Formula,
    pub(crate) NA: Formula,
    pub(crate) NB: Formula,
    pub(crate) NX: Formula,
    pub(crate) NY: Formula,

    // Disjunctions
    pub(crate) OR1: Formula,
    pub(crate) OR2: Formula,
    pub(crate) OR3: Formula,

    // Conjunctions
    pub(crate) AND1: Formula,
    pub(crate) AND2: Formula,
    pub(crate) AND3: Formula,

    // Negations
    pub(crate) NOT1: Formula,
    pub(crate) NOT2: Formula,

    // Implications
    pub(crate) IMP1: Formula,
    pub(crate) IMP2: Formula,
    pub(crate) IMP3: Formula,
    pub(crate) IMP4: Formula,

    // Equivalences
    pub(crate) EQ1: Formula,
    pub(crate) EQ2: Formula,
    pub(crate) EQ3: Formula,
    pub(crate) EQ4: Formula,

    // Integer terms and comparisons
    pub(crate) I: Term,
    pub(crate) J: Term,
    pub(crate) CMP1: Formula,
    pub(crate) CMP2: Formula,
}

impl F {
    pub(crate) fn new() -> Self {
        let f = FormulaContext::new();
        let TRUE = Formula::verum();
        let FALSE = Formula::falsum();

        let A = f.variable("a").unwrap();
        let B = f.variable("b").unwrap();
        let C = f.variable("c").unwrap();
        let D = f.variable("d").unwrap();
        let X = f.variable("x").unwrap();
        let Y = f.variable("y").unwrap();
        let Z = f.variable("z").unwrap();
        let NA = f.literal("a", false).unwrap();
        let NB = f.literal("b", false).unwrap();
        let NX = f.literal("x", false).unwrap();
        let NY = f.literal("y", false).unwrap();

        let OR1 = Formula::or(vec![X.clone(), Y.clone()]);
        let OR2 = Formula::or(vec![NX.clone(), NY.clone()]);
        let AND1 = Formula::and(vec![A.clone(), B.clone()]);
        let AND2 = Formula::and(vec![NA.clone(), NB.clone()]);

        let OR3 = Formula::or(vec![AND1.clone(), AND2.clone()]);
        let AND3 = Formula::and(vec![OR1.clone(), OR2.clone()]);

        let NOT1 = Formula::not(AND1.clone());
        let NOT2 = Formula::not(OR1.clone());

        let IMP1 = Formula::implies(A.clone(), B.clone());
        let EQ1 = Formula::biimplies(A.clone(), B.clone());
        let IMP2 = Formula::implies(NA.clone(), NB.clone());
        let IMP3 = Formula::implies(AND1.clone(), OR1.clone());

        let EQ5 = Formula::biimplies(NX.clone(), NY.clone());
        let IMP4 = Formula::implies(EQ1.clone(), EQ5);

        let EQ2 = Formula::biimplies(NA.clone(), NB.clone());
        let EQ3 = Formula::biimplies(AND1.clone(), OR1.clone());
        let EQ4 = Formula::biimplies(IMP1.clone(), IMP2.clone());

        let (I, J) = {
            let mut map = f.variables().write();
            let i = map.add_variable(Some("i"), None, ValueType::Integer).unwrap();
            let j = map.add_variable(Some("j"), None, ValueType::Integer).unwrap();
            (map.variable(i).unwrap().term(), map.variable(j).unwrap().term())
        };
        let CMP1 = Formula::compare(Comparison::new(Comparator::Lt, I.clone(), J.clone()).unwrap());
        let sum = Term::integer_add(vec![I.clone(), J.clone()]).unwrap();
        let CMP2 = Formula::compare(Comparison::new(Comparator::Eq, sum, J.clone()).unwrap());

        Self {
            f,
            TRUE,
            FALSE,
            A,
            B,
            C,
            D,
            X,
            Y,
            Z,
            NA,
            NB,
            NX,
            NY,
            OR1,
            OR2,
            OR3,
            AND1,
            AND2,
            AND3,
            NOT1,
            NOT2,
            IMP1,
            IMP2,
            IMP3,
            IMP4,
            EQ1,
            EQ2,
            EQ3,
            EQ4,
            I,
            J,
            CMP1,
            CMP2,
        }
    }

    /// Snapshot of the fixture's registry.
    pub(crate) fn map(&self) -> VariableMap {
        self.f.variables().snapshot()
    }

    /// Index of a variable of the fixture.
    pub(crate) fn index(&self, name: &str) -> u32 {
        self.f.variables().read().variable_index(name).unwrap()
    }

    /// Parses `input` against the fixture's registry.
    pub(crate) fn parse(&self, input: &str) -> Formula {
        self.f.parse(input).unwrap()
    }
}
