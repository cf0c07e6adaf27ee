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

//! Property tests for the universal invariants every compiled model and
//! every matcher/checker call must satisfy, independent of any one
//! worked example.

use proptest::prelude::*;

use lvs_model::{codec, Component, Model, Name};
use lvs_runtime::{check, match_name, FnTable};

const BLOG: &str = r#"
    #platform: "ndn"/"blog"
    #KEY: "KEY"/_/_/_
    #root: #platform/#KEY
    #admin: #platform/_role/adminID/#KEY & {_role: "admin"} <= #root
    #author: #platform/_role/ID/#KEY & {_role: "author", ID: $isValidID()} <= #admin
    #article: #platform/ID/"post"/year/articleID & {year: $isValidYear()} <= #admin | #author
"#;

const DUP: &str = r#"#dup: "x"/role/"y"/role"#;

fn blog_model() -> Model {
    lvs_model::compile(BLOG).unwrap()
}

fn blog_predicates() -> FnTable<'static> {
    FnTable::new()
        .register("isValidID", |c, _| c.value.len() == 6)
        .register("isValidYear", |c, _| c.value.len() == 4)
}

fn digits(n: usize) -> String {
    // simplest injective-enough numeral for test IDs, avoids leading-zero collisions across cases
    format!("{:0width$}", n, width = 6)
}

proptest! {
    // decode() never hands back a model that fails its own structural
    // well-formedness check, and never panics on arbitrary bytes either.
    #[test]
    fn decode_never_panics_and_only_returns_validated_models(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        match codec::decode(&bytes) {
            Ok(model) => prop_assert!(lvs_model::tree::validate(&model).is_ok()),
            Err(_) => {} // malformed input is rejected, not panicked on
        }
    }

    // decode(encode(m)) reproduces m exactly for any compiled model.
    #[test]
    fn encode_then_decode_round_trips_to_an_equal_model(schema_idx in 0usize..2) {
        let src = if schema_idx == 0 { BLOG } else { DUP };
        let model = lvs_model::compile(src).unwrap();
        let bytes = codec::encode(&model);
        let decoded = codec::decode(&bytes).unwrap();
        prop_assert_eq!(decoded, model);
    }

    // Every match reproduces the matched name, component by component, by
    // walking from the root through the node's value/pattern edges.
    #[test]
    fn binding_reproduces_the_matched_name(a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
        let model = lvs_model::compile(DUP).unwrap();
        let name = Name::from_uri(&format!("/x/{}/y/{}", a, b));
        let matches = match_name(&model, &name, &());
        if a == b {
            prop_assert_eq!(matches.len(), 1);
            let role_id = model.tag_symbols.iter().find(|(_, n)| n.as_str() == "role").map(|(id, _)| *id).unwrap();
            prop_assert_eq!(matches[0].binding.get(role_id).unwrap(), &Component::generic(&a));
        } else {
            prop_assert!(matches.is_empty());
        }
    }

    // match is a pure function of (model, name); repeated calls agree.
    #[test]
    fn matching_the_same_name_twice_gives_the_same_result(a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
        let model = lvs_model::compile(DUP).unwrap();
        let name = Name::from_uri(&format!("/x/{}/y/{}", a, b));
        let first = match_name(&model, &name, &());
        let second = match_name(&model, &name, &());
        prop_assert_eq!(first.len(), second.len());
        for (m1, m2) in first.iter().zip(second.iter()) {
            prop_assert_eq!(m1.node_id, m2.node_id);
        }
    }

    // Signing is not transitive. admin is signed by root and author is
    // signed by admin, but that never makes author checkable against root.
    #[test]
    fn signing_is_not_transitive_across_a_chain(admin_n in 100000u32..199999, author_n in 100000u32..199999) {
        let model = blog_model();
        let preds = blog_predicates();
        let admin_pkt = Name::from_uri(&format!("/ndn/blog/admin/{}/KEY/1/root/1", digits(admin_n as usize)));
        let root_key = Name::from_uri("/ndn/blog/KEY/1/self/1");
        let author_pkt = Name::from_uri(&format!("/ndn/blog/author/{}/KEY/1/{}/1", digits(author_n as usize), digits(admin_n as usize)));
        let admin_key = Name::from_uri(&format!("/ndn/blog/admin/{}/KEY/1/root/1", digits(admin_n as usize)));

        prop_assert!(check(&model, &admin_pkt, &root_key, &preds));
        prop_assert!(check(&model, &author_pkt, &admin_key, &preds));
        prop_assert!(!check(&model, &author_pkt, &root_key, &preds));
    }

    // Binding carry-over: an article's signer must share the packet's
    // bound pattern value, here the author id embedded in both names.
    #[test]
    fn checker_enforces_binding_carry_over(pkt_id in 100000u32..199999, key_id in 100000u32..199999) {
        let model = blog_model();
        let preds = blog_predicates();
        let pkt_digits = digits(pkt_id as usize);
        let key_digits = digits(key_id as usize);
        let article = Name::from_uri(&format!("/ndn/blog/{}/post/2022/1", pkt_digits));
        let author_key = Name::from_uri(&format!("/ndn/blog/author/{}/KEY/1/000001/1", key_digits));
        prop_assert_eq!(check(&model, &article, &author_key, &preds), pkt_digits == key_digits);
    }

    // Temporary "_" occurrences never unify -- the three underscores in
    // #KEY/"_"/"_"/"_" may all differ.
    #[test]
    fn temporary_patterns_do_not_unify_across_occurrences(a in "[0-9]{1,6}", b in "[0-9]{1,6}", c in "[0-9]{1,6}") {
        let model = blog_model();
        let name = Name::from_uri(&format!("/ndn/blog/KEY/{}/{}/{}", a, b, c));
        prop_assert_eq!(match_name(&model, &name, &()).len(), 1);
    }
}
