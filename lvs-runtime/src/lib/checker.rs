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

//! Checker (C7): is `pktName` validly signed by `keyName` under this
//! model, and, given an inventory of candidate keys, which one should
//! sign a packet.

use log::{debug, trace};

use lvs_model::{Model, NameSource};

use crate::matcher::{match_name, match_name_with_binding};
use crate::predicates::Predicates;

/// `check(pktName, keyName)`: true iff some match of `pktName` names a
/// node whose `signingRefs` is reachable by matching `keyName` from the
/// root, carrying the packet match's bindings into the key match.
pub fn check<P: NameSource, K: NameSource>(model: &Model, pkt: &P, key: &K, preds: &dyn Predicates) -> bool {
    for pkt_match in match_name(model, pkt, preds) {
        let signing_refs = &model.nodes[pkt_match.node_id.as_usize()].signing_refs;
        if signing_refs.is_empty() {
            trace!("packet match at node {} has no signingRefs, backtracking to the next packet match", pkt_match.node_id);
            continue;
        }
        for key_match in match_name_with_binding(model, key, &pkt_match.binding, preds) {
            if signing_refs.contains(&key_match.node_id) {
                debug!("accepted: key match at node {} is in packet node {}'s signingRefs", key_match.node_id, pkt_match.node_id);
                return true;
            }
        }
    }
    debug!("rejected: no packet match's signingRefs reachable by any key match");
    false
}

/// `suggest(pktName, keyInventory)`: the first candidate in caller order
/// that `check` accepts, or `None` if the inventory is exhausted. Does
/// not itself verify a candidate's own signer; the inventory is assumed
/// trusted.
pub fn suggest<'a, P: NameSource, K: NameSource>(
    model: &Model,
    pkt: &P,
    key_inventory: impl IntoIterator<Item = &'a K>,
    preds: &dyn Predicates
) -> Option<&'a K>
where
    K: 'a
{
    key_inventory.into_iter().find(|candidate| check(model, pkt, *candidate, preds))
}

#[cfg(test)]
mod test {
    use super::*;
    use lvs_model::Name;

    const BLOG: &str = r#"
        #platform: "ndn"/"blog"
        #KEY: "KEY"/_/_/_
        #root: #platform/#KEY
        #admin: #platform/_role/adminID/#KEY & {_role: "admin"} <= #root
        #author: #platform/"author"/authorID/#KEY <= #admin
        #user: #platform/"user"/userID/#KEY <= #admin
        #article: #platform/"article"/authorID/articleID/#KEY <= #admin | #author
    "#;

    fn model() -> Model {
        lvs_model::compile(BLOG).unwrap()
    }

    #[test]
    fn admin_can_be_signed_by_root() {
        let m = model();
        let pkt = Name::from_uri("/ndn/blog/admin/000001/KEY/1/root/1");
        let key = Name::from_uri("/ndn/blog/KEY/1/root/1");
        assert!(check(&m, &pkt, &key, &()));
    }

    #[test]
    fn admin_cannot_be_signed_by_unrelated_key() {
        let m = model();
        let pkt = Name::from_uri("/ndn/blog/admin/000001/KEY/1/root/1");
        let bad_key = Name::from_uri("/ndn/blog/KEY/1/someone-else/1");
        assert!(!check(&m, &pkt, &bad_key, &()));
    }

    #[test]
    fn article_accepts_either_admin_or_author_signer() {
        let m = model();
        let article = Name::from_uri("/ndn/blog/article/alice/post1/KEY/1/root/1");
        let admin_key = Name::from_uri("/ndn/blog/admin/000001/KEY/1/root/1");
        let author_key = Name::from_uri("/ndn/blog/author/alice/KEY/1/admin/000001/1");
        assert!(check(&m, &article, &admin_key, &()));
        assert!(check(&m, &article, &author_key, &()));
    }

    #[test]
    fn article_rejects_an_authors_key_signed_for_a_different_author() {
        let m = model();
        let article = Name::from_uri("/ndn/blog/article/alice/post1/KEY/1/root/1");
        // bound authorID from the packet is "alice"; this key was issued
        // to "bob" and must not satisfy the binding carry-over.
        let bobs_key = Name::from_uri("/ndn/blog/author/bob/KEY/1/admin/000001/1");
        assert!(!check(&m, &article, &bobs_key, &()));
    }

    #[test]
    fn suggest_returns_the_first_inventory_candidate_that_checks() {
        let m = model();
        let article = Name::from_uri("/ndn/blog/article/alice/post1/KEY/1/root/1");
        let candidates = vec![
            Name::from_uri("/ndn/blog/KEY/1/someone-else/1"),
            Name::from_uri("/ndn/blog/admin/000001/KEY/1/root/1"),
            Name::from_uri("/ndn/blog/author/alice/KEY/1/admin/000001/1")
        ];
        let picked = suggest(&m, &article, candidates.iter(), &()).unwrap();
        assert_eq!(picked, &candidates[1]);
    }

    #[test]
    fn suggest_returns_none_when_inventory_is_exhausted() {
        let m = model();
        let article = Name::from_uri("/ndn/blog/article/alice/post1/KEY/1/root/1");
        let candidates = vec![Name::from_uri("/ndn/blog/KEY/1/someone-else/1")];
        assert!(suggest(&m, &article, candidates.iter(), &()).is_none());
    }
}
