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

//! The transient binding environment the matcher (C6) threads through its
//! recursion: `patternId -> Component`, mutated in place with explicit
//! bind/unbind so backtracking is a matter of undoing the last bind
//! rather than cloning the whole environment at every edge.

use indexmap::IndexMap;

use lvs_model::{Component, NodeId, PatternId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Binding {
    map: IndexMap<PatternId, Component>
}

impl Binding {
    pub fn new() -> Self {
        Binding { map: IndexMap::new() }
    }

    pub fn get(&self, id: PatternId) -> Option<&Component> {
        self.map.get(&id)
    }

    pub fn is_bound(&self, id: PatternId) -> bool {
        self.map.contains_key(&id)
    }

    /// Binds `id`. Callers only do this after confirming `id` was not
    /// already bound along this path -- re-binding an id this way would
    /// silently discard its prior value, masking a shadow violation.
    pub fn bind(&mut self, id: PatternId, value: Component) {
        self.map.insert(id, value);
    }

    pub fn unbind(&mut self, id: PatternId) {
        self.map.shift_remove(&id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Component)> {
        self.map.iter().map(|(k, v)| (*k, v))
    }
}

/// One successful match: the node the traversal ended on and the
/// bindings accumulated along the way.
#[derive(Clone, Debug)]
pub struct Match {
    pub node_id: NodeId,
    pub binding: Binding
}
