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

//! The blog-tutorial signing scenarios, run against both a freshly
//! compiled model and a model that has made a round trip through the
//! binary codec.

use lvs_model::{codec, Model, Name};
use lvs_runtime::{check, suggest, FnTable, Predicates};

const BLOG: &str = r#"
    #platform: "ndn"/"blog"
    #KEY: "KEY"/_/_/_
    #root: #platform/#KEY
    #admin: #platform/_role/adminID/#KEY & {_role: "admin"} <= #root
    #author: #platform/_role/ID/#KEY & {_role: "author", ID: $isValidID()} <= #admin
    #user: #platform/_role/ID/#KEY & {_role: "reader"|"author", ID: $isValidID()} <= #admin
    #article: #platform/ID/"post"/year/articleID & {year: $isValidYear()} <= #admin | #author
"#;

fn predicates() -> FnTable<'static> {
    FnTable::new()
        .register("isValidID", |c, _| c.value.len() == 6)
        .register("isValidYear", |c, _| c.value.len() == 4)
}

fn models() -> Vec<Model> {
    let fresh = lvs_model::compile(BLOG).unwrap();
    let round_tripped = codec::decode(&codec::encode(&fresh)).unwrap();
    vec![fresh, round_tripped]
}

fn for_each_model(f: impl Fn(&Model, &dyn Predicates)) {
    let preds = predicates();
    for model in models() {
        f(&model, &preds);
    }
}

#[test]
fn admin_signed_by_root_is_accepted() {
    for_each_model(|m, preds| {
        let pkt = Name::from_uri("/ndn/blog/admin/000001/KEY/1/root/1");
        let key = Name::from_uri("/ndn/blog/KEY/1/self/1");
        assert!(check(m, &pkt, &key, preds));
    });
}

#[test]
fn case_mismatch_on_key_literal_is_rejected() {
    for_each_model(|m, preds| {
        let pkt = Name::from_uri("/ndn/blog/admin/000001/key/1/root/1");
        let key = Name::from_uri("/ndn/blog/KEY/1/self/1");
        assert!(!check(m, &pkt, &key, preds));
    });
}

#[test]
fn admin_is_not_signed_by_another_admin() {
    for_each_model(|m, preds| {
        let pkt = Name::from_uri("/ndn/blog/admin/000002/KEY/1/root/1");
        let key = Name::from_uri("/ndn/blog/admin/000001/KEY/1/root/1");
        assert!(!check(m, &pkt, &key, preds));
    });
}

#[test]
fn author_signed_by_admin_is_accepted() {
    for_each_model(|m, preds| {
        let pkt = Name::from_uri("/ndn/blog/author/100001/KEY/1/000001/1");
        let key = Name::from_uri("/ndn/blog/admin/000001/KEY/1/root/1");
        assert!(check(m, &pkt, &key, preds));
    });
}

#[test]
fn author_id_failing_isvalidid_is_rejected() {
    for_each_model(|m, preds| {
        let pkt = Name::from_uri("/ndn/blog/author/1000/KEY/1/000001/1");
        let key = Name::from_uri("/ndn/blog/admin/000001/KEY/1/root/1");
        assert!(!check(m, &pkt, &key, preds));
    });
}

#[test]
fn article_signed_by_its_own_author_is_accepted() {
    for_each_model(|m, preds| {
        let pkt = Name::from_uri("/ndn/blog/100001/post/2022/1");
        let key = Name::from_uri("/ndn/blog/author/100001/KEY/1/000001/1");
        assert!(check(m, &pkt, &key, preds));
    });
}

#[test]
fn article_signed_by_a_different_authors_key_is_rejected() {
    for_each_model(|m, preds| {
        let pkt = Name::from_uri("/ndn/blog/100001/post/2022/1");
        let key = Name::from_uri("/ndn/blog/author/100002/KEY/1/000001/1");
        assert!(!check(m, &pkt, &key, preds));
    });
}

#[test]
fn suggest_skips_the_reader_and_picks_the_author() {
    for_each_model(|m, preds| {
        let pkt = Name::from_uri("/ndn/blog/100001/post/2022/1");
        let inventory = vec![
            Name::from_uri("/ndn/blog/reader/100001/KEY/1/000001/1"),
            Name::from_uri("/ndn/blog/author/100001/KEY/1/000001/1"),
        ];
        let picked = suggest(m, &pkt, inventory.iter(), preds).unwrap();
        assert_eq!(picked, &inventory[1]);
    });
}
