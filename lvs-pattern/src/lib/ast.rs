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

//! AST produced by the parser (C1). Transient: consumed once by the rule
//! resolver (C2) and never retained after `compile()` returns.

/// One component of a `name` production.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameComp {
    /// A quoted string literal: matches a component byte-equal to the
    /// decoded string.
    Literal(String),
    /// A bare `CNAME`. `"_"` itself is a temporary pattern (a fresh id
    /// per textual occurrence); any other identifier is a named pattern,
    /// stable across every rule that mentions it.
    Tag(String),
    /// A `#rule` reference, inlined by the chain expander (C3).
    RuleRef(String)
}

/// One constraint option: a literal value, a reference to another
/// pattern's bound value, or a call out to a host predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintOpt {
    Literal(String),
    Tag(String),
    FnCall(String, Vec<FnArg>)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FnArg {
    Literal(String),
    Tag(String)
}

/// One `cons_term`: `TAG_ID ":" cons_disj`. A single AND-term (clause) of
/// the constraint-set CNF, targeting the pattern named by `tag`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintTerm {
    pub tag: String,
    pub options: Vec<ConstraintOpt>,
    pub pos: usize
}

/// One `cons_set`: `"{" cons_term { "," cons_term } "}"`. A full CNF
/// formula, its clauses not yet partitioned by which edge/tag they bind.
pub type ConstraintSet = Vec<ConstraintTerm>;

/// `cons_cnf`: `cons_set { "|" cons_set }`. The rule's list of alternative
/// constraint-sets; the chain expander emits one chain per alternative.
/// A rule with no `&` clause at all is represented as a single empty
/// alternative (`vec![vec![]]`), i.e. trivially satisfied.
pub type ConstraintAlternatives = Vec<ConstraintSet>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleDef {
    pub name: String,
    pub pattern: Vec<NameComp>,
    pub constraints: ConstraintAlternatives,
    /// `sign_list`: the rule names this rule's matching names may be
    /// signed by. Empty means this rule's chains are trust anchors.
    pub signing: Vec<String>,
    pub pos: usize
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaFile {
    pub rules: Vec<RuleDef>
}
