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

//! Error types shared by the parser (C1) and the rule resolver (C2). The
//! shape follows `cfgrammar`'s `FromYaccParserError`: a plain enum, a
//! `Display` impl that formats a one-line diagnostic, and `From` impls so
//! later stages can bubble an earlier stage's error without a wrapper type
//! per call site.

use std::error::Error;
use std::fmt;

/// Raised by the lexer/parser (C1). Carries the byte offset into the
/// source text where the problem was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub pos: usize,
    pub msg: String
}

impl SyntaxError {
    pub fn new(pos: usize, msg: impl Into<String>) -> Self {
        SyntaxError { pos, msg: msg.into() }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "syntax error at byte {}: {}", self.pos, self.msg)
    }
}

impl Error for SyntaxError {}

/// Raised by the rule resolver (C2), the chain expander and tree builder
/// (C3/C4, in `lvs-model`): cyclic rule references, unknown identifiers,
/// signing references to unknown rules, and constraints targeting a
/// pattern not yet bound along any path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SemanticErrorKind {
    /// A rule reference graph has a cycle; the cycle is listed in
    /// declaration order starting from its lowest-indexed member.
    CyclicRuleReference(Vec<String>),
    /// A name pattern, constraint or signing list refers to a rule that
    /// was never defined.
    UnknownRule(String),
    /// A constraint-set term names a tag that is never bound by any
    /// occurrence of the rule's name pattern.
    UnboundConstraintTarget(String),
    /// A signing reference (`<=`) names a rule that was never defined.
    UnknownSigningRule(String)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    /// Byte offset of the rule definition that triggered the error, when
    /// known statically.
    pub pos: Option<usize>
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, pos: Option<usize>) -> Self {
        SemanticError { kind, pos }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            SemanticErrorKind::CyclicRuleReference(cycle) => {
                write!(f, "cyclic rule reference: {}", cycle.join(" -> "))
            }
            SemanticErrorKind::UnknownRule(name) => {
                write!(f, "reference to undefined rule '#{}'", name)
            }
            SemanticErrorKind::UnboundConstraintTarget(name) => write!(
                f,
                "constraint targets tag '{}' which is never bound in this rule's name pattern",
                name
            ),
            SemanticErrorKind::UnknownSigningRule(name) => {
                write!(f, "signing reference to undefined rule '#{}'", name)
            }
        }
    }
}

impl Error for SemanticError {}

/// Top-level error returned by `compile()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileError {
    Syntax(SyntaxError),
    Semantic(SemanticError)
}

impl From<SyntaxError> for CompileError {
    fn from(e: SyntaxError) -> CompileError {
        CompileError::Syntax(e)
    }
}

impl From<SemanticError> for CompileError {
    fn from(e: SemanticError) -> CompileError {
        CompileError::Semantic(e)
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompileError::Syntax(e) => e.fmt(f),
            CompileError::Semantic(e) => e.fmt(f)
        }
    }
}

impl Error for CompileError {}
