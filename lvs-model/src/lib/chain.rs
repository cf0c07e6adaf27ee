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

//! Chain Expander (C3). For each rule, in the topological order the
//! resolver already produced, builds the set of fully-inlined chains: rule
//! references are spliced in (already-expanded, since earlier rules are
//! processed first) and disjunctive constraint-set alternatives are
//! expanded into a Cartesian product of chain variants.

use indexmap::IndexMap;
use log::trace;

use lvs_pattern::error::{SemanticError, SemanticErrorKind};
use lvs_pattern::resolve::{ResolvedComp, ResolvedConstraintOpt, ResolvedConstraintSet, ResolvedRule};
use lvs_pattern::{PatternId, ResolvedSchema};

use crate::constraint::{AndTerm, Cnf, ConstraintOption, FnArg};
use crate::name::Component;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainEdgeSpec {
    Value(Component),
    Pattern { id: PatternId, temporary: bool, cnf: Cnf }
}

/// A fully inlined rule: one root-to-leaf edge sequence plus the rule
/// names it may be signed by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    pub edges: Vec<ChainEdgeSpec>,
    pub signing: Vec<String>,
    /// The rule this chain was produced from, kept for tree-node
    /// diagnostics and for resolving signing references to node sets.
    pub source_rule: String
}

/// All chains produced for every rule, keyed by rule name, in the order
/// `expand_chains` processed rules (topological order).
pub struct ChainSet {
    pub by_rule: IndexMap<String, Vec<Chain>>
}

impl ChainSet {
    pub fn chains_for(&self, rule: &str) -> &[Chain] {
        self.by_rule.get(rule).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

pub fn expand_chains(schema: &ResolvedSchema) -> Result<ChainSet, SemanticError> {
    let mut by_rule: IndexMap<String, Vec<Chain>> = IndexMap::new();
    for rule in &schema.rules {
        let chains = expand_rule(rule, &by_rule)?;
        trace!("rule #{} expanded into {} chain(s)", rule.name, chains.len());
        by_rule.insert(rule.name.clone(), chains);
    }
    Ok(ChainSet { by_rule })
}

/// One choice axis in the Cartesian product: either "which constraint-set
/// alternative of this rule" or "which already-expanded chain of an
/// inlined rule reference".
enum Axis<'a> {
    OwnConstraint(&'a [ResolvedConstraintSet]),
    Inlined(&'a [Chain])
}

fn expand_rule(
    rule: &ResolvedRule,
    by_rule: &IndexMap<String, Vec<Chain>>
) -> Result<Vec<Chain>, SemanticError> {
    let mut axes: Vec<Axis> = vec![Axis::OwnConstraint(&rule.constraints)];
    for comp in &rule.pattern {
        if let ResolvedComp::RuleRef(name) = comp {
            let inlined = by_rule
                .get(name)
                .ok_or_else(|| SemanticError::new(SemanticErrorKind::UnknownRule(name.clone()), Some(rule.pos)))?;
            axes.push(Axis::Inlined(inlined));
        }
    }

    let sizes: Vec<usize> = axes
        .iter()
        .map(|a| match a {
            Axis::OwnConstraint(c) => c.len(),
            Axis::Inlined(c) => c.len()
        })
        .collect();
    let combo_count: usize = sizes.iter().copied().product();
    let mut out = Vec::with_capacity(combo_count.max(1));

    for combo in 0..combo_count {
        let mut idx = combo;
        let mut picks = Vec::with_capacity(axes.len());
        for &size in &sizes {
            picks.push(idx % size);
            idx /= size;
        }

        let own_constraint_set = match axes[0] {
            Axis::OwnConstraint(c) => &c[picks[0]],
            _ => unreachable!()
        };

        let mut ruleref_cursor = 1;
        let mut edges = Vec::with_capacity(rule.pattern.len());
        for comp in &rule.pattern {
            match comp {
                ResolvedComp::Literal(s) => edges.push(ChainEdgeSpec::Value(Component::generic(s))),
                ResolvedComp::Pattern { id, temporary } => {
                    let cnf = cnf_for_id(own_constraint_set, *id);
                    edges.push(ChainEdgeSpec::Pattern { id: *id, temporary: *temporary, cnf });
                }
                ResolvedComp::RuleRef(_) => {
                    let inlined = match &axes[ruleref_cursor] {
                        Axis::Inlined(c) => &c[picks[ruleref_cursor]],
                        _ => unreachable!()
                    };
                    edges.extend(inlined.edges.iter().cloned());
                    ruleref_cursor += 1;
                }
            }
        }

        out.push(Chain { edges, signing: rule.signing.clone(), source_rule: rule.name.clone() });
    }

    Ok(out)
}

fn cnf_for_id(set: &ResolvedConstraintSet, id: PatternId) -> Cnf {
    set.iter()
        .filter(|term| term.pattern_id == id)
        .map(|term| {
            term.options
                .iter()
                .map(|opt| match opt {
                    ResolvedConstraintOpt::Literal(s) => ConstraintOption::Val(Component::generic(s)),
                    ResolvedConstraintOpt::Var(p) => ConstraintOption::Var(*p),
                    ResolvedConstraintOpt::FnCall(name, args) => ConstraintOption::Fn(
                        name.clone(),
                        args.iter()
                            .map(|a| match a {
                                lvs_pattern::resolve::ResolvedFnArg::Literal(s) => FnArg::Val(Component::generic(s)),
                                lvs_pattern::resolve::ResolvedFnArg::Var(p) => FnArg::Var(*p)
                            })
                            .collect()
                    )
                })
                .collect::<AndTerm>()
        })
        .collect()
}
