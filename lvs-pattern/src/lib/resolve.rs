// Copyright (c) 2026 Light VerSec contributors
//
// The Universal Permissive License (UPL), Version 1.0
//
// Subject to the condition set forth below, permission is hereby granted to any person obtaining a
// copy of this software, associated documentation and/or data (collectively the "Software"), free
// of charge and under any and all copyright rights in the Software, and any and all patent rights
// owned or freely licensable by each licensor hereunder covering either (i) the unmodified
// Software as contributed to or provided by such licensor, or (ii) the Larger Works (as defined
// below), to deal in both
//
// (a) the Software, and
// (b) any piece of software and/or hardware listed in the lrgrwrks.txt file
// if one is included with the Software (each a "Larger Work" to which the Software is contributed
// by such licensors),
//
// without restriction, including without limitation the rights to copy, create derivative works
// of, display, perform, and distribute the Software and make, use, sell, offer for sale, import,
// export, have made, and have sold the Software and the Larger Work(s), and to sublicense the
// foregoing rights on either these or other terms.
//
// This license is subject to the following condition: The above copyright notice and either this
// complete permission notice or at a minimum a reference to the UPL must be included in all copies
// or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
// BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Rule Resolver (C2). Builds the "rule A refers to rule B" graph from name
//! patterns, topologically sorts it (cycle => `CyclicRuleReference`), then
//! walks the sorted rules left-to-right allocating `PatternId`s: a named
//! tag gets a stable id reused on every later occurrence anywhere in the
//! schema; a bare `_` gets a fresh id every time it is written.
//!
//! Signing references (`<=`) are recorded but deliberately excluded from
//! the dependency graph used for sorting — they are resolved post-hoc,
//! once every rule has produced its chains/tree nodes.

use indexmap::IndexMap;
use log::{debug, trace};

use crate::ast::{ConstraintOpt, ConstraintTerm, FnArg, NameComp, RuleDef, SchemaFile};
use crate::error::{SemanticError, SemanticErrorKind};
use crate::idx::PatternId;

/// A `NameComp` after pattern-id resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedComp {
    Literal(String),
    /// A pattern occurrence. `temporary` is true iff the source token was
    /// the bare `_`, in which case `id` is unique to this occurrence.
    Pattern { id: PatternId, temporary: bool },
    RuleRef(String)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedConstraintOpt {
    Literal(String),
    Var(PatternId),
    FnCall(String, Vec<ResolvedFnArg>)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedFnArg {
    Literal(String),
    Var(PatternId)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConstraintTerm {
    pub pattern_id: PatternId,
    pub options: Vec<ResolvedConstraintOpt>
}

pub type ResolvedConstraintSet = Vec<ResolvedConstraintTerm>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRule {
    pub name: String,
    pub pos: usize,
    pub pattern: Vec<ResolvedComp>,
    /// One alternative per Cartesian/disjunctive constraint-set choice.
    pub constraints: Vec<ResolvedConstraintSet>,
    pub signing: Vec<String>
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSchema {
    /// Rules in topological order: every `RuleRef` a rule's pattern makes
    /// points only at rules earlier in this vector.
    pub rules: Vec<ResolvedRule>,
    /// Named patterns keyed by source identifier, insertion order is id
    /// order: `symbol_table[name] == PatternId(i+1)` for the `i`'th
    /// distinct name encountered.
    pub symbol_table: IndexMap<String, PatternId>,
    pub named_pattern_cnt: u32
}

impl ResolvedSchema {
    pub fn rule(&self, name: &str) -> Option<&ResolvedRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

/// Run C2 over a parsed `SchemaFile`.
pub fn resolve(file: &SchemaFile) -> Result<ResolvedSchema, SemanticError> {
    let order = topo_sort(file)?;
    check_rule_refs_defined(file)?;
    check_signing_refs_defined(file)?;

    let mut symbol_table: IndexMap<String, PatternId> = IndexMap::new();
    let mut rules = Vec::with_capacity(order.len());

    // First pass: allocate every named id by scanning patterns only, in
    // sorted order, so `named_pattern_cnt` is fixed before any temporary
    // id is handed out (temporaries occupy the range above it, §3).
    for &idx in &order {
        for comp in &file.rules[idx].pattern {
            if let NameComp::Tag(name) = comp {
                if name != "_" && !symbol_table.contains_key(name) {
                    let id = PatternId::new(symbol_table.len() as u32 + 1);
                    symbol_table.insert(name.clone(), id);
                }
            }
        }
    }
    let named_pattern_cnt = symbol_table.len() as u32;
    let mut next_temp = named_pattern_cnt;

    for &idx in &order {
        let def = &file.rules[idx];
        debug!("resolving rule #{} at byte {}", def.name, def.pos);
        let mut local: IndexMap<String, PatternId> = IndexMap::new();
        let mut pattern = Vec::with_capacity(def.pattern.len());
        for comp in &def.pattern {
            let resolved = match comp {
                NameComp::Literal(s) => ResolvedComp::Literal(s.clone()),
                NameComp::RuleRef(r) => ResolvedComp::RuleRef(r.clone()),
                NameComp::Tag(name) => {
                    if name == "_" {
                        next_temp += 1;
                        let id = PatternId::new(next_temp);
                        trace!("allocated temporary pattern id {} in #{}", id, def.name);
                        ResolvedComp::Pattern { id, temporary: true }
                    } else {
                        let id = *symbol_table.get(name).expect("named ids pre-allocated above");
                        local.entry(name.clone()).or_insert(id);
                        ResolvedComp::Pattern { id, temporary: false }
                    }
                }
            };
            pattern.push(resolved);
        }

        let mut constraints = Vec::with_capacity(def.constraints.len());
        for set in &def.constraints {
            constraints.push(resolve_constraint_set(def, set, &local)?);
        }

        rules.push(ResolvedRule {
            name: def.name.clone(),
            pos: def.pos,
            pattern,
            constraints,
            signing: def.signing.clone()
        });
    }

    Ok(ResolvedSchema { rules, symbol_table, named_pattern_cnt })
}

fn resolve_constraint_set(
    def: &RuleDef,
    set: &[ConstraintTerm],
    local: &IndexMap<String, PatternId>
) -> Result<ResolvedConstraintSet, SemanticError> {
    let mut out = Vec::with_capacity(set.len());
    for term in set {
        let pattern_id = lookup_local(def, local, &term.tag)?;
        let mut options = Vec::with_capacity(term.options.len());
        for opt in &term.options {
            options.push(match opt {
                ConstraintOpt::Literal(s) => ResolvedConstraintOpt::Literal(s.clone()),
                ConstraintOpt::Tag(name) => ResolvedConstraintOpt::Var(lookup_local(def, local, name)?),
                ConstraintOpt::FnCall(fname, args) => {
                    let mut rargs = Vec::with_capacity(args.len());
                    for a in args {
                        rargs.push(match a {
                            FnArg::Literal(s) => ResolvedFnArg::Literal(s.clone()),
                            FnArg::Tag(name) => ResolvedFnArg::Var(lookup_local(def, local, name)?)
                        });
                    }
                    ResolvedConstraintOpt::FnCall(fname.clone(), rargs)
                }
            });
        }
        out.push(ResolvedConstraintTerm { pattern_id, options });
    }
    Ok(out)
}

fn lookup_local(
    def: &RuleDef,
    local: &IndexMap<String, PatternId>,
    name: &str
) -> Result<PatternId, SemanticError> {
    local.get(name).copied().ok_or_else(|| {
        SemanticError::new(SemanticErrorKind::UnboundConstraintTarget(name.to_string()), Some(def.pos))
    })
}

fn topo_sort(file: &SchemaFile) -> Result<Vec<usize>, SemanticError> {
    let by_name: IndexMap<&str, usize> =
        file.rules.iter().enumerate().map(|(i, r)| (r.name.as_str(), i)).collect();

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done
    }
    let mut mark = vec![Mark::Unvisited; file.rules.len()];
    let mut order = Vec::with_capacity(file.rules.len());
    let mut stack: Vec<usize> = Vec::new();

    fn visit(
        i: usize,
        file: &SchemaFile,
        by_name: &IndexMap<&str, usize>,
        mark: &mut Vec<Mark>,
        stack: &mut Vec<usize>,
        order: &mut Vec<usize>
    ) -> Result<(), SemanticError> {
        match mark[i] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                let start = stack.iter().position(|&x| x == i).unwrap_or(0);
                let mut cycle: Vec<String> =
                    stack[start..].iter().map(|&j| file.rules[j].name.clone()).collect();
                cycle.push(file.rules[i].name.clone());
                return Err(SemanticError::new(
                    SemanticErrorKind::CyclicRuleReference(cycle),
                    Some(file.rules[i].pos)
                ));
            }
            Mark::Unvisited => {}
        }
        mark[i] = Mark::InProgress;
        stack.push(i);
        for comp in &file.rules[i].pattern {
            if let NameComp::RuleRef(r) = comp {
                if let Some(&j) = by_name.get(r.as_str()) {
                    visit(j, file, by_name, mark, stack, order)?;
                }
            }
        }
        stack.pop();
        mark[i] = Mark::Done;
        order.push(i);
        Ok(())
    }

    for i in 0..file.rules.len() {
        visit(i, file, &by_name, &mut mark, &mut stack, &mut order)?;
    }
    Ok(order)
}

fn check_rule_refs_defined(file: &SchemaFile) -> Result<(), SemanticError> {
    for r in &file.rules {
        for comp in &r.pattern {
            if let NameComp::RuleRef(name) = comp {
                if !file.rules.iter().any(|d| &d.name == name) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::UnknownRule(name.clone()),
                        Some(r.pos)
                    ));
                }
            }
        }
    }
    Ok(())
}

fn check_signing_refs_defined(file: &SchemaFile) -> Result<(), SemanticError> {
    for r in &file.rules {
        for name in &r.signing {
            if !file.rules.iter().any(|d| &d.name == name) {
                return Err(SemanticError::new(
                    SemanticErrorKind::UnknownSigningRule(name.clone()),
                    Some(r.pos)
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse;

    fn resolve_src(src: &str) -> ResolvedSchema {
        resolve(&parse(src).unwrap()).unwrap()
    }

    #[test]
    fn topo_sorts_dependencies_before_dependents() {
        let schema = resolve_src(
            r#"
            #root: #platform/#KEY
            #platform: "ndn"/"blog"
            #KEY: "KEY"/_/_/_
        "#
        );
        let pos = |n: &str| schema.rules.iter().position(|r| r.name == n).unwrap();
        assert!(pos("platform") < pos("root"));
        assert!(pos("KEY") < pos("root"));
    }

    #[test]
    fn detects_cycles() {
        let file = parse("#a: #b\n#b: #a\n").unwrap();
        let err = resolve(&file).unwrap_err();
        match err.kind {
            SemanticErrorKind::CyclicRuleReference(_) => {}
            other => panic!("expected cycle, got {:?}", other)
        }
    }

    #[test]
    fn rejects_unknown_rule_reference() {
        let file = parse("#a: #nope\n").unwrap();
        let err = resolve(&file).unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::UnknownRule("nope".to_string()));
    }

    #[test]
    fn rejects_unknown_signing_reference() {
        let file = parse("#a: \"x\" <= #nope\n").unwrap();
        let err = resolve(&file).unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::UnknownSigningRule("nope".to_string()));
    }

    #[test]
    fn shares_one_pattern_id_for_id_across_rules() {
        let schema = resolve_src(
            r#"
            #platform: "ndn"/"blog"
            #KEY: "KEY"/_/_/_
            #root: #platform/#KEY
            #admin: #platform/_role/adminID/#KEY & {_role: "admin"} <= #root
            #author: #platform/_role/ID/#KEY & {_role: "author", ID: $isValidID()} <= #admin
            #article: #platform/ID/"post"/year/articleID & {year: $isValidYear()} <= #admin | #author
        "#
        );
        let author = schema.rule("author").unwrap();
        let article = schema.rule("article").unwrap();
        let author_id = match author.pattern[2] {
            ResolvedComp::Pattern { id, .. } => id,
            _ => panic!()
        };
        let article_id = match article.pattern[1] {
            ResolvedComp::Pattern { id, .. } => id,
            _ => panic!()
        };
        assert_eq!(author_id, article_id);
    }

    #[test]
    fn temporary_underscores_get_distinct_ids() {
        let schema = resolve_src(r#"#KEY: "KEY"/_/_/_"#);
        let ids: Vec<PatternId> = schema.rules[0]
            .pattern
            .iter()
            .filter_map(|c| match c {
                ResolvedComp::Pattern { id, temporary: true } => Some(*id),
                _ => None
            })
            .collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert!(ids.iter().all(|id| id.as_u32() > schema.named_pattern_cnt));
    }

    #[test]
    fn rejects_constraint_on_tag_not_in_own_pattern() {
        let file = parse(r#"#a: "x" & {nope: "y"}"#).unwrap();
        let err = resolve(&file).unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::UnboundConstraintTarget("nope".to_string()));
    }
}
