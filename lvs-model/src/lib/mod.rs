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

//! Name-pattern tree model: chain expansion (C3), tree building (C4) and
//! the binary TLV codec (C5). Consumes the `ResolvedSchema` that
//! `lvs_pattern` (C1/C2) produces and turns it into the `Model` that
//! `lvs_runtime` (C6/C7) matches names against.

pub mod chain;
pub mod codec;
pub mod constraint;
pub mod error;
pub mod idx;
pub mod name;
pub mod tree;

pub use chain::{Chain, ChainEdgeSpec, ChainSet};
pub use constraint::{canonicalize, AndTerm, Cnf, ConstraintOption, FnArg};
pub use error::ModelError;
pub use idx::NodeId;
pub use lvs_pattern::PatternId;
pub use name::{Component, Name, NameSource, GENERIC_COMPONENT_TYPE};
pub use tree::{Model, Node, PatternEdge, ValueEdge, MODEL_VERSION};

/// Compiles LVS source straight through to a binary-codec-ready `Model`:
/// `lvs_pattern::compile_to_resolved` (C1/C2) -> `chain::expand_chains`
/// (C3) -> `tree::build_tree` (C4).
pub fn compile(source: &str) -> Result<Model, ModelError> {
    let schema = lvs_pattern::compile_to_resolved(source).map_err(|e| match e {
        lvs_pattern::CompileError::Syntax(s) => {
            ModelError::Structure(format!("syntax error: {}", s))
        }
        lvs_pattern::CompileError::Semantic(s) => ModelError::Semantic(s)
    })?;
    let chains = chain::expand_chains(&schema)?;
    tree::build_tree(&schema, &chains)
}

#[cfg(test)]
mod test {
    use super::*;

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
    fn compiles_the_blog_schema_end_to_end() {
        let model = compile(BLOG).unwrap();
        assert!(model.nodes.len() > 1);
    }

    #[test]
    fn compile_then_encode_then_decode_round_trips() {
        let model = compile(BLOG).unwrap();
        let bytes = codec::encode(&model);
        let decoded = codec::decode(&bytes).unwrap();
        assert_eq!(decoded.nodes.len(), model.nodes.len());
    }

    #[test]
    fn syntax_errors_surface_through_compile() {
        assert!(compile("#a: \"x\" &").is_err());
    }

    #[test]
    fn semantic_errors_surface_through_compile() {
        assert!(compile("#a: #b\n#b: #a").is_err());
    }
}
