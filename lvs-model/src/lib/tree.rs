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

//! Tree Builder (C4). Merges every chain produced by the expander (C3)
//! into one rooted tree, reusing edges that are structurally identical;
//! each pattern edge keeps its own CNF verbatim, so a later occurrence
//! of a pattern id on the same path still carries whatever constraints
//! its own chain attached to it. Also resolves signing-rule names to the
//! node sets they refer to.

use indexmap::IndexMap;
use log::debug;

use lvs_pattern::error::{SemanticError, SemanticErrorKind};
use lvs_pattern::{PatternId, ResolvedSchema};

use crate::chain::{Chain, ChainEdgeSpec, ChainSet};
use crate::constraint::{canonicalize, Cnf};
use crate::error::ModelError;
use crate::idx::NodeId;
use crate::name::Component;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueEdge {
    pub dest: NodeId,
    pub value: Component
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternEdge {
    pub dest: NodeId,
    pub pattern_id: PatternId,
    pub cnf: Cnf
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub node_id: NodeId,
    pub parent: Option<NodeId>,
    /// Value edges, file order preserved; the matcher tries these before
    /// pattern edges, then in this order.
    pub value_edges: Vec<ValueEdge>,
    /// Pattern edges, file order preserved.
    pub pattern_edges: Vec<PatternEdge>,
    /// Resolved node ids this node may be signed by (union across every
    /// chain landing here), sorted ascending for determinism.
    pub signing_refs: Vec<NodeId>,
    /// Rule names whose chains terminate here, for diagnostics only.
    pub rule_names: Vec<String>,
    /// Raw signing-rule names pending resolution into `signing_refs`;
    /// cleared once `resolve_signing_refs` runs.
    pub(crate) pending_signing: Vec<String>
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::new(0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub version: u32,
    pub start_id: NodeId,
    pub named_pattern_cnt: u32,
    pub nodes: Vec<Node>,
    /// `PatternId -> source identifier`, diagnostic-only.
    pub tag_symbols: IndexMap<PatternId, String>
}

/// Model version this builder stamps onto every compiled model.
pub const MODEL_VERSION: u32 = 0x0001_1000;

pub fn build_tree(schema: &ResolvedSchema, chain_set: &ChainSet) -> Result<Model, ModelError> {
    let mut nodes = vec![Node { node_id: NodeId::new(0), ..Node::default() }];
    let mut rule_terminal_nodes: IndexMap<String, Vec<NodeId>> = IndexMap::new();

    for (rule_name, chains) in &chain_set.by_rule {
        let mut terminals = Vec::with_capacity(chains.len());
        for chain in chains {
            let terminal = insert_chain(&mut nodes, chain, rule_name);
            terminals.push(terminal);
        }
        rule_terminal_nodes.insert(rule_name.clone(), terminals);
    }

    resolve_signing_refs(&mut nodes, &rule_terminal_nodes)?;

    let tag_symbols = schema
        .symbol_table
        .iter()
        .map(|(name, id)| (*id, name.clone()))
        .collect::<IndexMap<_, _>>();

    let model = Model {
        version: MODEL_VERSION,
        start_id: NodeId::new(0),
        named_pattern_cnt: schema.named_pattern_cnt,
        nodes,
        tag_symbols
    };

    debug!("tree built: {} nodes from {} rules", model.nodes.len(), chain_set.by_rule.len());
    validate(&model)?;
    Ok(model)
}

fn insert_chain(nodes: &mut Vec<Node>, chain: &Chain, rule_name: &str) -> NodeId {
    let mut current = NodeId::new(0);

    for edge_spec in &chain.edges {
        current = match edge_spec {
            ChainEdgeSpec::Value(value) => {
                if let Some(existing) = nodes[current.as_usize()]
                    .value_edges
                    .iter()
                    .find(|e| &e.value == value)
                {
                    existing.dest
                } else {
                    let dest = push_node(nodes, current);
                    nodes[current.as_usize()].value_edges.push(ValueEdge { dest, value: value.clone() });
                    dest
                }
            }
            ChainEdgeSpec::Pattern { id, cnf, .. } => {
                // A later occurrence of the same pattern id on this path still
                // carries its own edge's constraints verbatim; the matcher
                // re-evaluates whatever CNF sits on the edge it takes on every
                // occurrence, first or not, so nothing here may be dropped.
                let canon = canonicalize(cnf);

                if let Some(existing) = nodes[current.as_usize()]
                    .pattern_edges
                    .iter()
                    .find(|e| e.pattern_id == *id && canonicalize(&e.cnf) == canon)
                {
                    existing.dest
                } else {
                    let dest = push_node(nodes, current);
                    nodes[current.as_usize()].pattern_edges.push(PatternEdge {
                        dest,
                        pattern_id: *id,
                        cnf: cnf.clone()
                    });
                    dest
                }
            }
        };
    }

    let terminal = &mut nodes[current.as_usize()];
    if !terminal.rule_names.iter().any(|r| r == rule_name) {
        terminal.rule_names.push(rule_name.to_string());
    }
    for s in &chain.signing {
        if !terminal.pending_signing.iter().any(|p| p == s) {
            terminal.pending_signing.push(s.clone());
        }
    }
    current
}

fn push_node(nodes: &mut Vec<Node>, parent: NodeId) -> NodeId {
    let id = NodeId::from(nodes.len());
    nodes.push(Node { node_id: id, parent: Some(parent), ..Node::default() });
    id
}

fn resolve_signing_refs(
    nodes: &mut [Node],
    rule_terminal_nodes: &IndexMap<String, Vec<NodeId>>
) -> Result<(), ModelError> {
    for node in nodes.iter_mut() {
        if node.pending_signing.is_empty() {
            continue;
        }
        let mut refs: Vec<NodeId> = Vec::new();
        for rule_name in node.pending_signing.drain(..) {
            let targets = rule_terminal_nodes.get(&rule_name).ok_or_else(|| {
                ModelError::from(SemanticError::new(SemanticErrorKind::UnknownSigningRule(rule_name.clone()), None))
            })?;
            for t in targets {
                if !refs.contains(t) {
                    refs.push(*t);
                }
            }
        }
        refs.sort_by_key(|n| n.as_u32());
        node.signing_refs = refs;
    }
    Ok(())
}

/// Checks the structural well-formedness invariants that are cheap to
/// verify once the tree is built: node ids match their array index, and
/// every edge/signing-ref target and the start id are in range. The codec
/// (C5) re-runs this subset after decoding untrusted bytes.
pub fn validate(model: &Model) -> Result<(), ModelError> {
    for (i, node) in model.nodes.iter().enumerate() {
        if node.node_id.as_usize() != i {
            return Err(ModelError::InvariantViolation(format!("node at index {} has node_id {}", i, node.node_id)));
        }
        for e in &node.value_edges {
            check_dest(model, e.dest)?;
        }
        for e in &node.pattern_edges {
            check_dest(model, e.dest)?;
        }
        for r in &node.signing_refs {
            check_dest(model, *r)?;
        }
    }
    if model.start_id.as_usize() >= model.nodes.len() {
        return Err(ModelError::InvariantViolation("startId out of range".to_string()));
    }
    Ok(())
}

fn check_dest(model: &Model, dest: NodeId) -> Result<(), ModelError> {
    if dest.as_usize() >= model.nodes.len() {
        return Err(ModelError::InvariantViolation(format!("edge target {} out of range", dest)));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use lvs_pattern::{parser::parse, resolve::resolve};

    fn build(src: &str) -> Model {
        let schema = resolve(&parse(src).unwrap()).unwrap();
        let chains = crate::chain::expand_chains(&schema).unwrap();
        build_tree(&schema, &chains).unwrap()
    }

    const BLOG: &str = r#"
        #platform: "ndn"/"blog"
        #KEY: "KEY"/_/_/_
        #root: #platform/#KEY
        #admin: #platform/_role/adminID/#KEY & {_role: "admin"} <= #root
        #author: #platform/"author"/authorID/#KEY <= #admin
        #user: #platform/"user"/userID/#KEY <= #admin
        #article: #platform/"article"/authorID/articleID/#KEY <= #admin | #author
    "#;

    #[test]
    fn shared_platform_prefix_is_one_pair_of_edges() {
        let model = build(BLOG);
        // root node has exactly one outgoing value edge ("ndn"), shared by
        // every rule, since the platform prefix is identical everywhere.
        assert_eq!(model.nodes[0].value_edges.len(), 1);
    }

    #[test]
    fn admin_signing_ref_points_to_root_terminal() {
        let model = build(BLOG);
        let admin_terminal = terminal_of(&model, "admin");
        // #admin <= #root, and #root is itself a trust anchor (no <=), so
        // admin's signingRefs resolve to root's own terminal node.
        assert_eq!(model.nodes[admin_terminal].signing_refs.len(), 1);
        let root_terminal = terminal_of(&model, "root");
        assert_eq!(model.nodes[admin_terminal].signing_refs[0].as_usize(), root_terminal);
    }

    #[test]
    fn root_terminal_is_a_trust_anchor() {
        let model = build(BLOG);
        let root_terminal = terminal_of(&model, "root");
        assert!(model.nodes[root_terminal].signing_refs.is_empty());
    }

    #[test]
    fn article_signing_refs_union_both_admin_and_author() {
        let model = build(BLOG);
        let article_terminal = terminal_of(&model, "article");
        assert_eq!(model.nodes[article_terminal].signing_refs.len(), 2);
    }

    #[test]
    fn validate_accepts_a_freshly_built_model() {
        let model = build(BLOG);
        assert!(validate(&model).is_ok());
    }

    #[test]
    fn a_later_occurrence_of_a_pattern_keeps_its_own_cnf() {
        let model = build(r#"
            #inner: "a"/role
            #outer: #inner/role & {role: $isOk()}
        "#);
        let role_id = model
            .tag_symbols
            .iter()
            .find(|(_, n)| n.as_str() == "role")
            .map(|(id, _)| *id)
            .unwrap();
        // #outer's own "role" edge carries {role: $isOk()} even though
        // "role" already occurred once, inlined from #inner, earlier on
        // the same path.
        let has_constrained_reoccurrence =
            model.nodes.iter().any(|n| n.pattern_edges.iter().any(|e| e.pattern_id == role_id && !e.cnf.is_empty()));
        assert!(has_constrained_reoccurrence);
    }

    fn terminal_of(model: &Model, rule: &str) -> usize {
        model
            .nodes
            .iter()
            .position(|n| n.rule_names.iter().any(|r| r == rule))
            .unwrap_or_else(|| panic!("no terminal node for rule {}", rule))
    }
}
