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

//! Errors raised by the chain expander/tree builder (C3/C4) and the
//! binary codec (C5). Shares `lvs_pattern`'s manual enum + `Display` + `From`
//! shape.

use std::error::Error;
use std::fmt;

use lvs_pattern::SemanticError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// Wraps a `SemanticError` raised while resolving rules (C2) or while
    /// building chains/tree (C3/C4), e.g. an unbound constraint target
    /// only visible after inlining.
    Semantic(SemanticError),
    /// `decode()` saw a `version` TLV it does not recognize.
    UnrecognizedVersion(u32),
    /// The decoded bytes do not describe a well-formed model: a bad node
    /// id, a non-tree parent link, a malformed TLV, etc.
    Structure(String),
    /// A decoded model violates one of the structural well-formedness
    /// invariants (node id ordering, edge/signing-ref target ranges, ...).
    InvariantViolation(String)
}

impl From<SemanticError> for ModelError {
    fn from(e: SemanticError) -> ModelError {
        ModelError::Semantic(e)
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::Semantic(e) => e.fmt(f),
            ModelError::UnrecognizedVersion(v) => write!(f, "unrecognized model version 0x{:08x}", v),
            ModelError::Structure(msg) => write!(f, "malformed model: {}", msg),
            ModelError::InvariantViolation(msg) => write!(f, "model invariant violated: {}", msg)
        }
    }
}

impl Error for ModelError {}
