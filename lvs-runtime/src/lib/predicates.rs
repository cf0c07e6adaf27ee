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

//! Host predicate hook for `$fnName(...)` constraint options.

use lvs_model::Component;

/// Evaluates a `$name(args...)` constraint option against the component
/// currently under consideration. A host wires its own domain predicates
/// (`isValidID`, `isValidYear`, ...) in by implementing this trait.
///
/// Returning `None` means `name` is not a predicate this host recognizes.
/// The matcher applies one fixed, consistent policy for that case: the
/// containing option does not hold.
pub trait Predicates {
    fn call(&self, name: &str, component: &Component, args: &[Component]) -> Option<bool>;
}

/// The empty predicate set: every call is unrecognized. Useful for
/// schemas whose constraints never call a user function, and in tests.
impl Predicates for () {
    fn call(&self, _name: &str, _component: &Component, _args: &[Component]) -> Option<bool> {
        None
    }
}

/// A predicate set backed by ordinary Rust closures, for hosts that would
/// rather not define a type per schema.
pub struct FnTable<'a> {
    fns: Vec<(&'a str, Box<dyn Fn(&Component, &[Component]) -> bool + 'a>)>
}

impl<'a> FnTable<'a> {
    pub fn new() -> Self {
        FnTable { fns: Vec::new() }
    }

    pub fn register(mut self, name: &'a str, f: impl Fn(&Component, &[Component]) -> bool + 'a) -> Self {
        self.fns.push((name, Box::new(f)));
        self
    }
}

impl<'a> Default for FnTable<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Predicates for FnTable<'a> {
    fn call(&self, name: &str, component: &Component, args: &[Component]) -> Option<bool> {
        self.fns.iter().find(|(n, _)| *n == name).map(|(_, f)| f(component, args))
    }
}
