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

//! Edge-local constraint representation: a `Cnf` is what a `PatternEdge`
//! carries and the matcher in `lvs-runtime` evaluates.

use lvs_pattern::PatternId;

use crate::name::Component;

/// One constraint option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintOption {
    /// The matched component must byte-equal `c` (type tag included).
    Val(Component),
    /// The matched component must byte-equal whatever `p` is currently
    /// bound to; fails (the option does not hold) if `p` is unbound.
    Var(PatternId),
    /// Call the host predicate `name` with the matched component and the
    /// resolved arguments.
    Fn(String, Vec<FnArg>)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FnArg {
    Val(Component),
    Var(PatternId)
}

/// A non-empty set of options, interpreted disjunctively (one AND-term /
/// clause of the CNF).
pub type AndTerm = Vec<ConstraintOption>;

/// An ordered list of AND-terms, interpreted as CNF. An empty CNF is
/// trivially satisfied.
pub type Cnf = Vec<AndTerm>;

/// Canonicalize a CNF for structural-identity comparison during tree
/// merging: sort options within each AND-term by a stable key, then sort
/// AND-terms likewise. Does not change semantics (AND/OR are
/// commutative), only comparison order.
pub fn canonicalize(cnf: &Cnf) -> Cnf {
    let mut terms: Vec<AndTerm> = cnf
        .iter()
        .map(|term| {
            let mut t = term.clone();
            t.sort_by(|a, b| option_key(a).cmp(&option_key(b)));
            t
        })
        .collect();
    terms.sort_by(|a, b| term_key(a).cmp(&term_key(b)));
    terms
}

fn option_key(o: &ConstraintOption) -> String {
    match o {
        ConstraintOption::Val(c) => format!("V{}:{:?}", c.typ, c.value),
        ConstraintOption::Var(p) => format!("P{}", p.as_u32()),
        ConstraintOption::Fn(name, args) => {
            let mut s = format!("F{}(", name);
            for a in args {
                s.push_str(&match a {
                    FnArg::Val(c) => format!("V{}:{:?},", c.typ, c.value),
                    FnArg::Var(p) => format!("P{},", p.as_u32())
                });
            }
            s.push(')');
            s
        }
    }
}

fn term_key(t: &AndTerm) -> String {
    t.iter().map(option_key).collect::<Vec<_>>().join("|")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn canonicalize_is_order_independent_within_term() {
        let p1 = PatternId::new(1);
        let a = vec![vec![ConstraintOption::Var(p1), ConstraintOption::Val(Component::generic("x"))]];
        let b = vec![vec![ConstraintOption::Val(Component::generic("x")), ConstraintOption::Var(p1)]];
        assert_eq!(canonicalize(&a), canonicalize(&b));
    }

    #[test]
    fn canonicalize_orders_terms() {
        let p1 = PatternId::new(1);
        let p2 = PatternId::new(2);
        let a = vec![vec![ConstraintOption::Var(p2)], vec![ConstraintOption::Var(p1)]];
        let b = vec![vec![ConstraintOption::Var(p1)], vec![ConstraintOption::Var(p2)]];
        assert_eq!(canonicalize(&a), canonicalize(&b));
    }
}
