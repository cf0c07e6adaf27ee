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

//! Generic index newtypes, the monomorphic sibling of `cfgrammar`'s
//! `idxnewtype` module: rather than being generic over a `PrimInt +
//! Unsigned` storage type, these are fixed to `u32`, which is ample for any
//! schema a human would write by hand (see DESIGN.md for the tradeoff).

use std::fmt;

/// A strictly positive integer identifying a named or temporary pattern
/// variable. Named patterns occupy
/// `[1, named_pattern_cnt]`; ids above that are temporaries, allocated
/// fresh for each textual occurrence of the anonymous `_` identifier.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PatternId(u32);

impl PatternId {
    pub fn new(v: u32) -> Self {
        assert!(v > 0, "pattern ids are strictly positive, got {}", v);
        PatternId(v)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PatternId({})", self.0)
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PatternId> for u32 {
    fn from(p: PatternId) -> u32 {
        p.0
    }
}

impl From<u32> for PatternId {
    fn from(v: u32) -> PatternId {
        PatternId::new(v)
    }
}
