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

//! Lexer, parser and rule resolver for the Light VerSec (LVS) schema
//! language: LVS source text in, a [`resolve::ResolvedSchema`] (rules in
//! dependency order, pattern ids allocated) out. This is C1 and C2 of the
//! LVS toolchain; chain expansion, tree building, the binary codec and the
//! runtime matcher/checker live in the `lvs-model` and `lvs-runtime`
//! crates, which depend on this one the way `lrtable`/`lrpar` depend on
//! `cfgrammar`.
//!
//! An LVS schema declares name patterns with component-level constraints
//! and a signing relation: "names matching this pattern may be signed by
//! keys whose names match that pattern".

pub mod ast;
pub mod error;
pub mod idx;
pub mod lexer;
pub mod parser;
pub mod resolve;

pub use error::{CompileError, SemanticError, SemanticErrorKind, SyntaxError};
pub use idx::PatternId;
pub use resolve::{ResolvedRule, ResolvedSchema};

/// Run C1 (parse) then C2 (resolve) over LVS source text.
pub fn compile_to_resolved(src: &str) -> Result<ResolvedSchema, CompileError> {
    let file = parser::parse(src)?;
    let schema = resolve::resolve(&file)?;
    Ok(schema)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn end_to_end_resolve_of_blog_schema() {
        let src = r#"
            #platform: "ndn"/"blog"
            #KEY: "KEY"/_/_/_
            #root: #platform/#KEY
            #admin: #platform/_role/adminID/#KEY & {_role: "admin"} <= #root
            #author: #platform/_role/ID/#KEY & {_role: "author", ID: $isValidID()} <= #admin
            #user: #platform/_role/ID/#KEY & {_role: "reader"|"author", ID: $isValidID()} <= #admin
            #article: #platform/ID/"post"/year/articleID & {year: $isValidYear()} <= #admin | #author
        "#;
        let schema = compile_to_resolved(src).unwrap();
        assert_eq!(schema.rules.len(), 7);
        assert!(schema.named_pattern_cnt > 0);
    }

    #[test]
    fn surfaces_syntax_errors() {
        let err = compile_to_resolved("#a 1").unwrap_err();
        assert!(matches!(err, CompileError::Syntax(_)));
    }

    #[test]
    fn surfaces_semantic_errors() {
        let err = compile_to_resolved("#a: #b\n#b: #a\n").unwrap_err();
        assert!(matches!(err, CompileError::Semantic(_)));
    }
}
