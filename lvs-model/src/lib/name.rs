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

//! The concrete `Component`/`Name` shapes the rest of this crate family
//! treats as external collaborators: the core only ever needs a name to
//! behave as an ordered component sequence, with component value
//! equality and component type-tag extraction. A production deployment
//! plugs in a real NDN codec; this crate ships a minimal concrete
//! implementation so the compiler, tree builder and runtime have
//! something concrete to operate on, plus the `NameSource` trait a
//! host's own name type can implement instead.

use std::fmt;

/// The NDN TLV type used for every literal and pattern component produced
/// from LVS source, since the grammar gives no syntax for specifying a
/// component's type tag explicitly. `8` is the GenericNameComponent type
/// in the NDN naming conventions; see DESIGN.md for this Open-Question
/// resolution.
pub const GENERIC_COMPONENT_TYPE: u64 = 8;

/// An opaque byte string together with an integer type tag. Equality is
/// byte-equality *including* the type tag.
#[derive(Clone, Eq, Hash)]
pub struct Component {
    pub typ: u64,
    pub value: Vec<u8>
}

impl Component {
    pub fn new(typ: u64, value: impl Into<Vec<u8>>) -> Self {
        Component { typ, value: value.into() }
    }

    /// A component of the generic type carrying `s`'s UTF-8 bytes.
    pub fn generic(s: impl AsRef<str>) -> Self {
        Component::new(GENERIC_COMPONENT_TYPE, s.as_ref().as_bytes().to_vec())
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ && self.value == other.value
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match std::str::from_utf8(&self.value) {
            Ok(s) => write!(f, "{}={:?}", self.typ, s),
            Err(_) => write!(f, "{}={:?}", self.typ, self.value)
        }
    }
}

/// An ordered sequence of components.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Name(pub Vec<Component>);

impl Name {
    pub fn new(components: Vec<Component>) -> Self {
        Name(components)
    }

    /// Parse an NDN-URI-like `/a/b/c` string into a `Name` of generic
    /// components, splitting on `/` and skipping empty segments (so a
    /// leading or trailing slash is harmless). Intended for tests and
    /// CLI convenience, not a full NDN URI decoder: it does not handle
    /// percent-escaping or explicit `type=value` component syntax.
    pub fn from_uri(s: &str) -> Self {
        Name(s.split('/').filter(|seg| !seg.is_empty()).map(Component::generic).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Component> {
        self.0.get(i)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for c in &self.0 {
            write!(f, "/")?;
            match std::str::from_utf8(&c.value) {
                Ok(s) => write!(f, "{}", s)?,
                Err(_) => write!(f, "{}", hex(&c.value))?
            }
        }
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Bridges a host's own name representation into the matcher without
/// forcing it to materialize an `lvs_model::Name`.
pub trait NameSource {
    fn component_count(&self) -> usize;
    fn component_at(&self, i: usize) -> &Component;
}

impl NameSource for Name {
    fn component_count(&self) -> usize {
        self.0.len()
    }

    fn component_at(&self, i: usize) -> &Component {
        &self.0[i]
    }
}
