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

//! Matcher / VM (C6): deterministic, backtracking traversal of a compiled
//! `Model` against a concrete name.

use log::trace;

use lvs_model::{AndTerm, Cnf, Component, ConstraintOption, FnArg, Model, NameSource, NodeId, PatternId};

use crate::binding::{Binding, Match};
use crate::predicates::Predicates;

/// Returns every `(terminalNodeId, binding)` match of `name`, in
/// deterministic value-edges-then-pattern-edges, file-order,
/// depth-first order.
pub fn match_name<N: NameSource>(model: &Model, name: &N, preds: &dyn Predicates) -> Vec<Match> {
    let mut out = Vec::new();
    let mut binding = Binding::new();
    walk(model, name, model.start_id, 0, &mut binding, preds, &mut out);
    out
}

/// Same traversal, but starting from a caller-supplied initial binding
/// rather than an empty one (used by the checker's binding carry-over).
pub fn match_name_with_binding<N: NameSource>(
    model: &Model,
    name: &N,
    initial: &Binding,
    preds: &dyn Predicates
) -> Vec<Match> {
    let mut out = Vec::new();
    let mut binding = initial.clone();
    walk(model, name, model.start_id, 0, &mut binding, preds, &mut out);
    out
}

fn walk<N: NameSource>(
    model: &Model,
    name: &N,
    node: NodeId,
    depth: usize,
    binding: &mut Binding,
    preds: &dyn Predicates,
    out: &mut Vec<Match>
) {
    if depth == name.component_count() {
        out.push(Match { node_id: node, binding: binding.clone() });
        return;
    }

    let comp = name.component_at(depth);
    let current = &model.nodes[node.as_usize()];

    for ve in &current.value_edges {
        if &ve.value == comp {
            walk(model, name, ve.dest, depth + 1, binding, preds, out);
        }
    }

    for pe in &current.pattern_edges {
        match binding.get(pe.pattern_id) {
            Some(existing) if existing != comp => {
                trace!(
                    "depth {}: pattern {} already bound to {:?}, {:?} violates the shadow, backtracking",
                    depth,
                    pe.pattern_id,
                    existing,
                    comp
                );
                continue;
            }
            Some(_already_matching) => {
                // re-occurrence of the same value along this path: no
                // rebind needed, just re-check the CNF and recurse.
                if eval_cnf(&pe.cnf, pe.pattern_id, comp, binding, preds) {
                    walk(model, name, pe.dest, depth + 1, binding, preds, out);
                }
            }
            None => {
                binding.bind(pe.pattern_id, comp.clone());
                trace!("depth {}: bound pattern {} to {:?}", depth, pe.pattern_id, comp);
                if eval_cnf(&pe.cnf, pe.pattern_id, comp, binding, preds) {
                    walk(model, name, pe.dest, depth + 1, binding, preds, out);
                }
                binding.unbind(pe.pattern_id);
                trace!("depth {}: undid binding for pattern {}", depth, pe.pattern_id);
            }
        }
    }
}

fn eval_cnf(cnf: &Cnf, own_id: PatternId, comp: &Component, binding: &Binding, preds: &dyn Predicates) -> bool {
    cnf.iter().all(|term| eval_and_term(term, own_id, comp, binding, preds))
}

fn eval_and_term(term: &AndTerm, own_id: PatternId, comp: &Component, binding: &Binding, preds: &dyn Predicates) -> bool {
    term.iter().any(|opt| eval_option(opt, own_id, comp, binding, preds))
}

fn eval_option(opt: &ConstraintOption, own_id: PatternId, comp: &Component, binding: &Binding, preds: &dyn Predicates) -> bool {
    match opt {
        ConstraintOption::Val(v) => v == comp,
        ConstraintOption::Var(p) => resolve_var(*p, own_id, comp, binding).map(|b| &b == comp).unwrap_or(false),
        ConstraintOption::Fn(name, args) => {
            let mut resolved = Vec::with_capacity(args.len());
            for a in args {
                let value = match a {
                    FnArg::Val(v) => Some(v.clone()),
                    FnArg::Var(p) => resolve_var(*p, own_id, comp, binding)
                };
                match value {
                    Some(v) => resolved.push(v),
                    None => return false // unbound Var: the option does not hold
                }
            }
            preds.call(name, comp, &resolved).unwrap_or(false)
        }
    }
}

/// `Var(p)` resolves against the tentative binding of the edge's own
/// patternId (a self-reference is trivially true) or an already-committed
/// earlier binding.
fn resolve_var(p: PatternId, own_id: PatternId, comp: &Component, binding: &Binding) -> Option<Component> {
    if p == own_id {
        Some(comp.clone())
    } else {
        binding.get(p).cloned()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use lvs_model::Name;

    fn model(src: &str) -> Model {
        lvs_model::compile(src).unwrap()
    }

    const BLOG: &str = r#"
        #platform: "ndn"/"blog"
        #KEY: "KEY"/_/_/_
        #root: #platform/#KEY
        #admin: #platform/_role/adminID/#KEY & {_role: "admin"} <= #root
        #author: #platform/"author"/authorID/#KEY & {authorID: $isValidID()} <= #admin
        #user: #platform/"user"/userID/#KEY <= #admin
        #article: #platform/"article"/authorID/articleID/#KEY <= #admin | #author
    "#;

    #[test]
    fn matches_a_well_formed_admin_key_name() {
        let m = model(BLOG);
        let name = Name::from_uri("/ndn/blog/admin/000001/KEY/1/self/1");
        let matches = match_name(&m, &name, &());
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn rejects_a_name_with_wrong_literal() {
        let m = model(BLOG);
        let name = Name::from_uri("/ndn/wiki/admin/000001/KEY/1/self/1");
        assert!(match_name(&m, &name, &()).is_empty());
    }

    #[test]
    fn binds_named_patterns_to_their_matched_components() {
        let m = model(BLOG);
        let name = Name::from_uri("/ndn/blog/admin/000001/KEY/1/self/1");
        let matches = match_name(&m, &name, &());
        let role = m
            .tag_symbols
            .iter()
            .find(|(_, n)| n.as_str() == "_role")
            .map(|(id, _)| *id)
            .unwrap();
        assert_eq!(matches[0].binding.get(role).unwrap().value, b"admin");
    }

    #[test]
    fn unknown_predicate_makes_the_edge_fail() {
        let m = model(BLOG);
        // #author requires $isValidID() on authorID, which () never knows.
        let name = Name::from_uri("/ndn/blog/author/alice/KEY/1/self/1");
        assert!(match_name(&m, &name, &()).is_empty());
    }

    #[test]
    fn known_predicate_gates_the_match() {
        use crate::predicates::FnTable;
        let m = model(BLOG);
        let preds = FnTable::new().register("isValidID", |c, _| c.value.iter().all(u8::is_ascii_digit));
        let good = Name::from_uri("/ndn/blog/author/000001/KEY/1/self/1");
        let bad = Name::from_uri("/ndn/blog/author/alice/KEY/1/self/1");
        assert_eq!(match_name(&m, &good, &preds).len(), 1);
        assert!(match_name(&m, &bad, &preds).is_empty());
    }

    #[test]
    fn shadowed_repeated_pattern_requires_equal_components() {
        let m = model("#dup: \"x\"/role/\"y\"/role");
        let ok = Name::from_uri("/x/a/y/a");
        let bad = Name::from_uri("/x/a/y/b");
        assert_eq!(match_name(&m, &ok, &()).len(), 1);
        assert!(match_name(&m, &bad, &()).is_empty());
    }
}
