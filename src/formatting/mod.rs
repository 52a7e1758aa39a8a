//! Default-dialect pretty-printing: a read-only
//! walk over [`crate::syntax`] that renders formulas, rules and theories as
//! text in the one built-in print dialect this crate implements; LaTeX,
//! ECNF and TPTP output are out of scope.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::ids::VarId;
use crate::syntax::formula::{BoolOp, CompOp, Formula, FormulaKind, PredRef, QuantOp};
use crate::syntax::rule::{Definition, Rule};
use crate::syntax::term::{AggOp, FuncRef, SetExpr, Term};
use crate::syntax::theory::Theory;
use crate::vocabulary::overload::SymbolArena;

/// Renders AST nodes given a symbol arena (for predicate/function names)
/// and an assignment of display names to [`VarId`]s — sort derivation
/// produces ids, not names, so a caller owns the naming policy and builds
/// this map itself, picking names however it likes (e.g. by calling
/// [`crate::convenience::choose_fresh_variable_names`] per variable it
/// needs to name).
pub struct Printer<'a> {
    arena: &'a SymbolArena,
    var_names: HashMap<VarId, String>,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a SymbolArena, var_names: HashMap<VarId, String>) -> Self {
        Printer { arena, var_names }
    }

    fn var_name(&self, v: VarId) -> String {
        self.var_names.get(&v).cloned().unwrap_or_else(|| format!("_v{}", v.0))
    }

    pub fn term(&self, term: &Term) -> String {
        match term {
            Term::Var(v) => self.var_name(*v),
            Term::Domain(elem, _) => elem.to_string(),
            Term::Func(func_ref, args) => {
                let name = match func_ref {
                    FuncRef::Resolved(id) => self.arena.function(*id).name.clone(),
                    FuncRef::Overloaded(name) => name.clone(),
                };
                if args.is_empty() {
                    name
                } else {
                    let rendered: Vec<String> = args.iter().map(|a| self.term(a)).collect();
                    format!("{name}({})", rendered.join(","))
                }
            }
            Term::Agg(op, set) => format!("{}{}", agg_op(*op), self.set_expr(set)),
        }
    }

    pub fn set_expr(&self, set: &SetExpr) -> String {
        match set {
            SetExpr::Enum(terms) => {
                let rendered: Vec<String> = terms.iter().map(|t| self.term(t)).collect();
                format!("{{{}}}", rendered.join(";"))
            }
            SetExpr::Quant { vars, condition, term, .. } => {
                let names: Vec<String> = vars.iter().map(|v| self.var_name(*v)).collect();
                format!(
                    "{{{} : {} : {}}}",
                    names.join(","),
                    self.formula(condition),
                    self.term(term)
                )
            }
        }
    }

    pub fn formula(&self, formula: &Formula) -> String {
        let mut out = String::new();
        if !formula.sign {
            out.push('~');
        }
        match &formula.kind {
            FormulaKind::Pred(pred_ref, args) => {
                let name = match pred_ref {
                    PredRef::Resolved(id) => self.arena.predicate(*id).name.clone(),
                    PredRef::Overloaded(name) => name.clone(),
                };
                if args.is_empty() {
                    out.push_str(&name);
                } else {
                    let rendered: Vec<String> = args.iter().map(|a| self.term(a)).collect();
                    let _ = write!(out, "{name}({})", rendered.join(","));
                }
            }
            FormulaKind::Equiv(l, r) => {
                let _ = write!(out, "({} <=> {})", self.formula(l), self.formula(r));
            }
            FormulaKind::Bool(op, parts) => {
                let sep = match op {
                    BoolOp::And => " & ",
                    BoolOp::Or => " | ",
                };
                let rendered: Vec<String> = parts.iter().map(|p| self.formula(p)).collect();
                let _ = write!(out, "({})", rendered.join(sep));
            }
            FormulaKind::Quant(op, vars, _, body) => {
                let quantifier = match op {
                    QuantOp::Forall => "!",
                    QuantOp::Exists => "?",
                };
                let names: Vec<String> = vars.iter().map(|v| self.var_name(*v)).collect();
                let _ = write!(out, "{quantifier} {}: {}", names.join(","), self.formula(body));
            }
            FormulaKind::EqChain(op, terms) => {
                let rendered: Vec<String> = terms.iter().map(|t| self.term(t)).collect();
                out.push_str(&rendered.join(comp_op(*op)));
            }
        }
        out
    }

    pub fn rule(&self, rule: &Rule) -> String {
        let head_name = self.arena.predicate(rule.head_pred).name.clone();
        let args: Vec<String> = rule.head_args.iter().map(|a| self.term(a)).collect();
        format!("{head_name}({}) <- {}.", args.join(","), self.formula(&rule.body))
    }

    pub fn definition(&self, definition: &Definition) -> String {
        let rules: Vec<String> = definition.rules.iter().map(|r| self.rule(r)).collect();
        format!("{{\n{}\n}}", rules.join("\n"))
    }

    pub fn theory(&self, theory: &Theory) -> String {
        let mut out = String::new();
        for sentence in &theory.sentences {
            let _ = writeln!(out, "{}.", self.formula(sentence));
        }
        for definition in &theory.definitions {
            let _ = writeln!(out, "{}", self.definition(definition));
        }
        out
    }
}

fn agg_op(op: AggOp) -> &'static str {
    match op {
        AggOp::Card => "#",
        AggOp::Sum => "sum",
        AggOp::Prod => "prod",
        AggOp::Min => "min",
        AggOp::Max => "max",
    }
}

fn comp_op(op: CompOp) -> &'static str {
    match op {
        CompOp::Eq => "=",
        CompOp::Neq => "~=",
        CompOp::Lt => "<",
        CompOp::Leq => "=<",
        CompOp::Gt => ">",
        CompOp::Geq => ">=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_a_conjunction_with_negation() {
        let mut arena = SymbolArena::new();
        let p = arena.add_predicate(crate::vocabulary::symbol::PredicateSymbol {
            name: "p".to_string(),
            sorts: vec![],
            infix: false,
            parent: None,
            symbol_type: crate::vocabulary::symbol::SymbolType::None,
        });
        let q = arena.add_predicate(crate::vocabulary::symbol::PredicateSymbol {
            name: "q".to_string(),
            sorts: vec![],
            infix: false,
            parent: None,
            symbol_type: crate::vocabulary::symbol::SymbolType::None,
        });
        let printer = Printer::new(&arena, HashMap::new());
        let formula = Formula {
            sign: true,
            kind: FormulaKind::Bool(
                BoolOp::And,
                vec![Formula::pred(true, p, vec![]), Formula::pred(false, q, vec![])],
            ),
        };
        assert_eq!(printer.formula(&formula), "(p & ~q)");
    }
}
