//! Parser for the textual formula syntax.
//!
//! | Syntax              | Meaning                                  |
//! |---------------------|------------------------------------------|
//! | `$true`, `$false`   | the constants                            |
//! | `a`, `_x1`, `@aux#2` | a boolean variable                      |
//! | `~f`                | negation                                 |
//! | `f & g`             | conjunction                              |
//! | `f \| g`            | disjunction                              |
//! | `f => g`            | implication, right-associative           |
//! | `f <=> g`           | equivalence, right-associative           |
//! | `(f)`               | grouping                                 |
//!
//! The operators are listed from the strongest to the weakest binding.
//! Chains of `&` or `|` become a single n-ary node, a negated variable
//! becomes a negative literal and the empty input is `$true`.

use pest::iterators::Pair;
use pest::Parser;

use crate::errors::FormulaError;
use crate::formulas::{Formula, VariableMap};

mod grammar {
    #[derive(Parser)]
    #[grammar = "parser/formula.pest"]
    pub(super) struct FormulaParser;
}

use grammar::{FormulaParser, Rule};

/// Parses `input`, registering unknown names in `map` as boolean
/// variables.
///
/// # Errors
///
/// [`FormulaError::Parse`] if `input` does not match the syntax and
/// [`FormulaError::TypeMismatch`] if a name belongs to a non-boolean
/// variable.
///
/// # Examples
///
/// Basic usage:
///
/// ```
/// # use featlogic::formulas::{Formula, VariableMap};
/// # use featlogic::parser::parse;
/// let mut map = VariableMap::new();
///
/// let formula = parse("~a | b & ~~c", &mut map).unwrap();
///
/// assert_eq!(formula, Formula::or(vec![
///     Formula::lit(1, false),
///     Formula::and(vec![Formula::var(2), Formula::var(3)]),
/// ]));
/// assert_eq!(map.variable_count(), 3);
/// ```
pub fn parse(input: &str, map: &mut VariableMap) -> Result<Formula, FormulaError> {
    let mut pairs = FormulaParser::parse(Rule::formula, input).map_err(|error| FormulaError::Parse(error.to_string()))?;
    let root = next(&mut pairs)?;
    for pair in root.into_inner() {
        if pair.as_rule() == Rule::equivalence {
            return parse_equivalence(pair, map);
        }
    }
    Ok(Formula::verum())
}

fn next<'i>(pairs: &mut impl Iterator<Item = Pair<'i, Rule>>) -> Result<Pair<'i, Rule>, FormulaError> {
    pairs.next().ok_or_else(|| FormulaError::Parse("unexpected end of input".to_owned()))
}

/// Folds a chain of `pair`'s children from the right with `combine`.
fn parse_chain(
    pair: Pair<'_, Rule>,
    map: &mut VariableMap,
    operand: fn(Pair<'_, Rule>, &mut VariableMap) -> Result<Formula, FormulaError>,
    combine: fn(Formula, Formula) -> Formula,
) -> Result<Formula, FormulaError> {
    let operands = pair.into_inner().map(|child| operand(child, map)).collect::<Result<Vec<_>, _>>()?;
    let mut operands = operands.into_iter().rev();
    let mut formula = operands.next().ok_or_else(|| FormulaError::Parse("missing operand".to_owned()))?;
    for left in operands {
        formula = combine(left, formula);
    }
    Ok(formula)
}

fn parse_nary(
    pair: Pair<'_, Rule>,
    map: &mut VariableMap,
    operand: fn(Pair<'_, Rule>, &mut VariableMap) -> Result<Formula, FormulaError>,
    combine: fn(Vec<Formula>) -> Formula,
) -> Result<Formula, FormulaError> {
    let mut operands = pair.into_inner().map(|child| operand(child, map)).collect::<Result<Vec<_>, _>>()?;
    if operands.len() == 1 {
        Ok(operands.swap_remove(0))
    } else {
        Ok(combine(operands))
    }
}

fn parse_equivalence(pair: Pair<'_, Rule>, map: &mut VariableMap) -> Result<Formula, FormulaError> {
    parse_chain(pair, map, parse_implication, Formula::biimplies)
}

fn parse_implication(pair: Pair<'_, Rule>, map: &mut VariableMap) -> Result<Formula, FormulaError> {
    parse_chain(pair, map, parse_disjunction, Formula::implies)
}

fn parse_disjunction(pair: Pair<'_, Rule>, map: &mut VariableMap) -> Result<Formula, FormulaError> {
    parse_nary(pair, map, parse_conjunction, Formula::or)
}

fn parse_conjunction(pair: Pair<'_, Rule>, map: &mut VariableMap) -> Result<Formula, FormulaError> {
    parse_nary(pair, map, parse_unary, Formula::and)
}

fn parse_unary(pair: Pair<'_, Rule>, map: &mut VariableMap) -> Result<Formula, FormulaError> {
    let mut negations = 0_usize;
    let mut formula = None;
    for token in pair.into_inner() {
        match token.as_rule() {
            Rule::not => negations += 1,
            Rule::verum => formula = Some(Formula::verum()),
            Rule::falsum => formula = Some(Formula::falsum()),
            Rule::variable => formula = Some(Formula::var(map.get_or_add_bool(token.as_str())?)),
            Rule::equivalence => formula = Some(parse_equivalence(token, map)?),
            rule => return Err(FormulaError::Parse(format!("unexpected token {rule:?}"))),
        }
    }
    let mut formula = formula.ok_or_else(|| FormulaError::Parse("missing operand".to_owned()))?;
    for _ in 0..negations {
        formula = match formula.as_literal() {
            Some(literal) => Formula::literal(literal.negate()),
            None => Formula::not(formula),
        };
    }
    Ok(formula)
}
