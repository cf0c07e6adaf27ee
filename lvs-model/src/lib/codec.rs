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

//! Binary Codec (C5): encode/decode a `Model` to/from a TLV wire format.
//! T and L fields use NDN's variable-length TLV-NUM encoding (1 byte if
//! < 253, else a 0xFD/0xFE/0xFF marker followed by a 2/4/8-byte
//! big-endian value); a `uint` V is the minimal big-endian encoding of
//! the number, with zero itself encoded as a single `0x00` byte.
//!
//! Every TLV type used by this format is odd; decoding treats an
//! unrecognized odd type as critical (rejected) and an unrecognized even
//! type as safe to skip, so a future, backward-compatible extension of
//! this format can add optional fields without breaking old decoders.

use indexmap::IndexMap;

use lvs_pattern::PatternId;

use crate::constraint::{AndTerm, Cnf, ConstraintOption, FnArg};
use crate::error::ModelError;
use crate::idx::NodeId;
use crate::name::Component;
use crate::tree::{validate, Model, Node, PatternEdge, ValueEdge, MODEL_VERSION};

const T_VERSION: u64 = 0x61;
const T_NODE_ID: u64 = 0x25; // also Parent, Destination, StartId
const T_NAMED_PATTERN_CNT: u64 = 0x69;
const T_NODE: u64 = 0x63;
const T_RULE_NAME: u64 = 0x29; // also Identifier
const T_SIGN_REF: u64 = 0x55;
const T_VALUE_EDGE: u64 = 0x51;
const T_VALUE: u64 = 0x21;
const T_PATTERN_EDGE: u64 = 0x53;
const T_TAG: u64 = 0x23;
const T_CONSTRAINT: u64 = 0x43;
const T_CONSTRAINT_OPTION: u64 = 0x41;
const T_USER_FN_CALL: u64 = 0x31;
const T_FN_ID: u64 = 0x27;
const T_USER_FN_ARG: u64 = 0x33;
const T_TAG_SYMBOL: u64 = 0x67;
const T_IDENTIFIER: u64 = 0x29;

// ---- low-level TLV-NUM / TLV plumbing -------------------------------

fn write_varnum(out: &mut Vec<u8>, n: u64) {
    if n < 253 {
        out.push(n as u8);
    } else if n <= 0xFFFF {
        out.push(0xFD);
        out.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xFFFF_FFFF {
        out.push(0xFE);
        out.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        out.push(0xFF);
        out.extend_from_slice(&n.to_be_bytes());
    }
}

fn read_varnum(buf: &[u8], pos: &mut usize) -> Result<u64, ModelError> {
    let marker = *buf.get(*pos).ok_or_else(|| ModelError::Structure("truncated TLV-NUM".to_string()))?;
    *pos += 1;
    match marker {
        0..=252 => Ok(marker as u64),
        0xFD => {
            let bytes = take(buf, pos, 2)?;
            Ok(u16::from_be_bytes([bytes[0], bytes[1]]) as u64)
        }
        0xFE => {
            let bytes = take(buf, pos, 4)?;
            Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64)
        }
        0xFF => {
            let bytes = take(buf, pos, 8)?;
            let mut arr = [0u8; 8];
            arr.copy_from_slice(bytes);
            Ok(u64::from_be_bytes(arr))
        }
        _ => unreachable!()
    }
}

fn take<'a>(buf: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], ModelError> {
    let end = *pos + n;
    let slice = buf.get(*pos..end).ok_or_else(|| ModelError::Structure("truncated TLV value".to_string()))?;
    *pos = end;
    Ok(slice)
}

fn write_tlv(out: &mut Vec<u8>, typ: u64, value: &[u8]) {
    write_varnum(out, typ);
    write_varnum(out, value.len() as u64);
    out.extend_from_slice(value);
}

fn write_uint_tlv(out: &mut Vec<u8>, typ: u64, n: u64) {
    let mut v = n.to_be_bytes().to_vec();
    while v.len() > 1 && v[0] == 0 {
        v.remove(0);
    }
    write_tlv(out, typ, &v);
}

fn decode_uint_value(value: &[u8]) -> u64 {
    let mut n: u64 = 0;
    for &b in value {
        n = (n << 8) | b as u64;
    }
    n
}

/// Sequential reader over one TLV's nested value bytes.
struct TlvReader<'a> {
    buf: &'a [u8],
    pos: usize
}

impl<'a> TlvReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        TlvReader { buf, pos: 0 }
    }

    fn peek_type(&self) -> Option<u64> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let mut p = self.pos;
        read_varnum(self.buf, &mut p).ok()
    }

    fn next(&mut self) -> Result<Option<(u64, &'a [u8])>, ModelError> {
        if self.pos >= self.buf.len() {
            return Ok(None);
        }
        let typ = read_varnum(self.buf, &mut self.pos)?;
        let len = read_varnum(self.buf, &mut self.pos)? as usize;
        let value = take(self.buf, &mut self.pos, len)?;
        Ok(Some((typ, value)))
    }
}

fn is_critical(typ: u64) -> bool {
    typ % 2 == 1
}

// ---- encode -----------------------------------------------------------

pub fn encode(model: &Model) -> Vec<u8> {
    let mut out = Vec::new();
    write_tlv(&mut out, T_VERSION, &model.version.to_be_bytes());
    write_uint_tlv(&mut out, T_NODE_ID, model.start_id.as_u32() as u64);
    write_uint_tlv(&mut out, T_NAMED_PATTERN_CNT, model.named_pattern_cnt as u64);
    for node in &model.nodes {
        let body = encode_node(node);
        write_tlv(&mut out, T_NODE, &body);
    }
    for (pattern_id, name) in &model.tag_symbols {
        let mut body = Vec::new();
        write_uint_tlv(&mut body, T_TAG, pattern_id.as_u32() as u64);
        write_tlv(&mut body, T_IDENTIFIER, name.as_bytes());
        write_tlv(&mut out, T_TAG_SYMBOL, &body);
    }
    out
}

fn encode_node(node: &Node) -> Vec<u8> {
    let mut body = Vec::new();
    write_uint_tlv(&mut body, T_NODE_ID, node.node_id.as_u32() as u64);
    if let Some(parent) = node.parent {
        write_uint_tlv(&mut body, T_NODE_ID, parent.as_u32() as u64);
    }
    for name in &node.rule_names {
        write_tlv(&mut body, T_RULE_NAME, name.as_bytes());
    }
    for ve in &node.value_edges {
        let inner = encode_value_edge(ve);
        write_tlv(&mut body, T_VALUE_EDGE, &inner);
    }
    for pe in &node.pattern_edges {
        let inner = encode_pattern_edge(pe);
        write_tlv(&mut body, T_PATTERN_EDGE, &inner);
    }
    for r in &node.signing_refs {
        write_uint_tlv(&mut body, T_SIGN_REF, r.as_u32() as u64);
    }
    body
}

fn encode_component_tlv(out: &mut Vec<u8>, typ: u64, c: &Component) {
    let mut comp = Vec::new();
    write_tlv(&mut comp, c.typ, &c.value);
    write_tlv(out, typ, &comp);
}

fn encode_value_edge(ve: &ValueEdge) -> Vec<u8> {
    let mut inner = Vec::new();
    write_uint_tlv(&mut inner, T_NODE_ID, ve.dest.as_u32() as u64);
    encode_component_tlv(&mut inner, T_VALUE, &ve.value);
    inner
}

fn encode_pattern_edge(pe: &PatternEdge) -> Vec<u8> {
    let mut inner = Vec::new();
    write_uint_tlv(&mut inner, T_NODE_ID, pe.dest.as_u32() as u64);
    write_uint_tlv(&mut inner, T_TAG, pe.pattern_id.as_u32() as u64);
    for term in &pe.cnf {
        let term_body = encode_constraint(term);
        write_tlv(&mut inner, T_CONSTRAINT, &term_body);
    }
    inner
}

fn encode_constraint(term: &AndTerm) -> Vec<u8> {
    let mut inner = Vec::new();
    for opt in term {
        let opt_body = encode_constraint_option(opt);
        write_tlv(&mut inner, T_CONSTRAINT_OPTION, &opt_body);
    }
    inner
}

fn encode_constraint_option(opt: &ConstraintOption) -> Vec<u8> {
    let mut inner = Vec::new();
    match opt {
        ConstraintOption::Val(c) => encode_component_tlv(&mut inner, T_VALUE, c),
        ConstraintOption::Var(p) => write_uint_tlv(&mut inner, T_TAG, p.as_u32() as u64),
        ConstraintOption::Fn(name, args) => {
            let mut call = Vec::new();
            write_tlv(&mut call, T_FN_ID, name.as_bytes());
            for a in args {
                let arg_body = encode_fn_arg(a);
                write_tlv(&mut call, T_USER_FN_ARG, &arg_body);
            }
            write_tlv(&mut inner, T_USER_FN_CALL, &call);
        }
    }
    inner
}

fn encode_fn_arg(a: &FnArg) -> Vec<u8> {
    let mut inner = Vec::new();
    match a {
        FnArg::Val(c) => encode_component_tlv(&mut inner, T_VALUE, c),
        FnArg::Var(p) => write_uint_tlv(&mut inner, T_TAG, p.as_u32() as u64)
    }
    inner
}

// ---- decode -------------------------------------------------------------

pub fn decode(bytes: &[u8]) -> Result<Model, ModelError> {
    let mut r = TlvReader::new(bytes);

    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("empty model".to_string()))?;
    if typ != T_VERSION || value.len() != 4 {
        return Err(ModelError::Structure("expected a 4-byte Version TLV first".to_string()));
    }
    let version = u32::from_be_bytes([value[0], value[1], value[2], value[3]]);
    if version != MODEL_VERSION {
        return Err(ModelError::UnrecognizedVersion(version));
    }

    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("missing StartId".to_string()))?;
    if typ != T_NODE_ID {
        return Err(ModelError::Structure("expected StartId after Version".to_string()));
    }
    let start_id = NodeId::from(decode_uint_value(value) as u32);

    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("missing NamedPatternCnt".to_string()))?;
    if typ != T_NAMED_PATTERN_CNT {
        return Err(ModelError::Structure("expected NamedPatternCnt after StartId".to_string()));
    }
    let named_pattern_cnt = decode_uint_value(value) as u32;

    let mut nodes = Vec::new();
    let mut tag_symbols = IndexMap::new();
    while let Some((typ, value)) = r.next()? {
        match typ {
            T_NODE => nodes.push(decode_node(value)?),
            T_TAG_SYMBOL => {
                let (id, name) = decode_tag_symbol(value)?;
                tag_symbols.insert(id, name);
            }
            t if !is_critical(t) => {}
            t => return Err(ModelError::Structure(format!("unknown critical top-level TLV type 0x{:02x}", t)))
        }
    }

    let model = Model { version, start_id, named_pattern_cnt, nodes, tag_symbols };
    check_parent_backreferences(&model)?;
    validate(&model)?;
    Ok(model)
}

fn decode_node(bytes: &[u8]) -> Result<Node, ModelError> {
    let mut r = TlvReader::new(bytes);
    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("empty Node".to_string()))?;
    if typ != T_NODE_ID {
        return Err(ModelError::Structure("Node must begin with NodeId".to_string()));
    }
    let node_id = NodeId::from(decode_uint_value(value) as u32);

    let mut parent = None;
    if r.peek_type() == Some(T_NODE_ID) {
        let (_, value) = r.next()?.unwrap();
        parent = Some(NodeId::from(decode_uint_value(value) as u32));
    }

    let mut node = Node { node_id, parent, ..Node::default() };
    while let Some((typ, value)) = r.next()? {
        match typ {
            T_RULE_NAME => node.rule_names.push(decode_cname(value)?),
            T_VALUE_EDGE => node.value_edges.push(decode_value_edge(value)?),
            T_PATTERN_EDGE => node.pattern_edges.push(decode_pattern_edge(value)?),
            T_SIGN_REF => node.signing_refs.push(NodeId::from(decode_uint_value(value) as u32)),
            t if !is_critical(t) => {}
            t => return Err(ModelError::Structure(format!("unknown critical Node TLV type 0x{:02x}", t)))
        }
    }
    Ok(node)
}

fn decode_cname(value: &[u8]) -> Result<String, ModelError> {
    String::from_utf8(value.to_vec()).map_err(|_| ModelError::Structure("CNAME is not valid UTF-8".to_string()))
}

fn decode_component_value(value: &[u8]) -> Result<Component, ModelError> {
    let mut r = TlvReader::new(value);
    let (typ, v) = r
        .next()?
        .ok_or_else(|| ModelError::Structure("Value must wrap one NameComponent TLV".to_string()))?;
    Ok(Component::new(typ, v.to_vec()))
}

fn decode_value_edge(bytes: &[u8]) -> Result<ValueEdge, ModelError> {
    let mut r = TlvReader::new(bytes);
    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("empty ValueEdge".to_string()))?;
    if typ != T_NODE_ID {
        return Err(ModelError::Structure("ValueEdge must begin with Destination".to_string()));
    }
    let dest = NodeId::from(decode_uint_value(value) as u32);

    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("ValueEdge missing Value".to_string()))?;
    if typ != T_VALUE {
        return Err(ModelError::Structure("ValueEdge missing Value".to_string()));
    }
    let value = decode_component_value(value)?;
    Ok(ValueEdge { dest, value })
}

fn decode_pattern_edge(bytes: &[u8]) -> Result<PatternEdge, ModelError> {
    let mut r = TlvReader::new(bytes);
    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("empty PatternEdge".to_string()))?;
    if typ != T_NODE_ID {
        return Err(ModelError::Structure("PatternEdge must begin with Destination".to_string()));
    }
    let dest = NodeId::from(decode_uint_value(value) as u32);

    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("PatternEdge missing Tag".to_string()))?;
    if typ != T_TAG {
        return Err(ModelError::Structure("PatternEdge missing Tag".to_string()));
    }
    let pattern_id = PatternId::new(decode_uint_value(value) as u32);

    let mut cnf: Cnf = Vec::new();
    while let Some((typ, value)) = r.next()? {
        match typ {
            T_CONSTRAINT => cnf.push(decode_constraint(value)?),
            t if !is_critical(t) => {}
            t => return Err(ModelError::Structure(format!("unknown critical PatternEdge TLV type 0x{:02x}", t)))
        }
    }
    Ok(PatternEdge { dest, pattern_id, cnf })
}

fn decode_constraint(bytes: &[u8]) -> Result<AndTerm, ModelError> {
    let mut r = TlvReader::new(bytes);
    let mut term = Vec::new();
    while let Some((typ, value)) = r.next()? {
        match typ {
            T_CONSTRAINT_OPTION => term.push(decode_constraint_option(value)?),
            t if !is_critical(t) => {}
            t => return Err(ModelError::Structure(format!("unknown critical Constraint TLV type 0x{:02x}", t)))
        }
    }
    if term.is_empty() {
        return Err(ModelError::Structure("Constraint has no ConstraintOption".to_string()));
    }
    Ok(term)
}

fn decode_constraint_option(bytes: &[u8]) -> Result<ConstraintOption, ModelError> {
    let mut r = TlvReader::new(bytes);
    let mut found: Option<ConstraintOption> = None;
    while let Some((typ, value)) = r.next()? {
        let parsed = match typ {
            T_VALUE => Some(ConstraintOption::Val(decode_component_value(value)?)),
            T_TAG => Some(ConstraintOption::Var(PatternId::new(decode_uint_value(value) as u32))),
            T_USER_FN_CALL => {
                let (name, args) = decode_user_fn_call(value)?;
                Some(ConstraintOption::Fn(name, args))
            }
            t if !is_critical(t) => None,
            t => return Err(ModelError::Structure(format!("unknown critical ConstraintOption TLV type 0x{:02x}", t)))
        };
        if let Some(p) = parsed {
            if found.is_some() {
                return Err(ModelError::Structure(
                    "ConstraintOption must have exactly one of Value/Tag/FnCall".to_string()
                ));
            }
            found = Some(p);
        }
    }
    found.ok_or_else(|| ModelError::Structure("ConstraintOption must have exactly one of Value/Tag/FnCall".to_string()))
}

fn decode_user_fn_call(bytes: &[u8]) -> Result<(String, Vec<FnArg>), ModelError> {
    let mut r = TlvReader::new(bytes);
    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("empty UserFnCall".to_string()))?;
    if typ != T_FN_ID {
        return Err(ModelError::Structure("UserFnCall must begin with FnId".to_string()));
    }
    let name = decode_cname(value)?;

    let mut args = Vec::new();
    while let Some((typ, value)) = r.next()? {
        match typ {
            T_USER_FN_ARG => args.push(decode_fn_arg(value)?),
            t if !is_critical(t) => {}
            t => return Err(ModelError::Structure(format!("unknown critical UserFnCall TLV type 0x{:02x}", t)))
        }
    }
    Ok((name, args))
}

fn decode_fn_arg(bytes: &[u8]) -> Result<FnArg, ModelError> {
    let mut r = TlvReader::new(bytes);
    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("empty UserFnArg".to_string()))?;
    match typ {
        T_VALUE => Ok(FnArg::Val(decode_component_value(value)?)),
        T_TAG => Ok(FnArg::Var(PatternId::new(decode_uint_value(value) as u32))),
        t => Err(ModelError::Structure(format!("UserFnArg must be Value or Tag, got 0x{:02x}", t)))
    }
}

fn decode_tag_symbol(bytes: &[u8]) -> Result<(PatternId, String), ModelError> {
    let mut r = TlvReader::new(bytes);
    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("empty TagSymbol".to_string()))?;
    if typ != T_TAG {
        return Err(ModelError::Structure("TagSymbol must begin with Tag".to_string()));
    }
    let id = PatternId::new(decode_uint_value(value) as u32);

    let (typ, value) = r.next()?.ok_or_else(|| ModelError::Structure("TagSymbol missing Identifier".to_string()))?;
    if typ != T_IDENTIFIER {
        return Err(ModelError::Structure("TagSymbol missing Identifier".to_string()));
    }
    let name = decode_cname(value)?;
    Ok((id, name))
}

/// Every parent back-reference on a destination node must equal the
/// source of the incoming edge.
fn check_parent_backreferences(model: &Model) -> Result<(), ModelError> {
    for (src_idx, node) in model.nodes.iter().enumerate() {
        let src = NodeId::from(src_idx);
        let dests = node.value_edges.iter().map(|e| e.dest).chain(node.pattern_edges.iter().map(|e| e.dest));
        for dest in dests {
            let dest_node = model
                .nodes
                .get(dest.as_usize())
                .ok_or_else(|| ModelError::Structure(format!("edge target {} out of range", dest)))?;
            match dest_node.parent {
                Some(p) if p == src => {}
                Some(p) => {
                    return Err(ModelError::InvariantViolation(format!(
                        "node {} has parent {} but is reachable from {}",
                        dest, p, src
                    )))
                }
                None => {
                    return Err(ModelError::InvariantViolation(format!(
                        "node {} has an incoming edge from {} but no parent back-reference",
                        dest, src
                    )))
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use lvs_pattern::{parser::parse, resolve::resolve};

    const BLOG: &str = r#"
        #platform: "ndn"/"blog"
        #KEY: "KEY"/_/_/_
        #root: #platform/#KEY
        #admin: #platform/_role/adminID/#KEY & {_role: "admin"} <= #root
        #author: #platform/"author"/authorID/#KEY <= #admin
    "#;

    fn compiled() -> Model {
        let schema = resolve(&parse(BLOG).unwrap()).unwrap();
        let chains = crate::chain::expand_chains(&schema).unwrap();
        crate::tree::build_tree(&schema, &chains).unwrap()
    }

    #[test]
    fn round_trips_through_encode_decode() {
        let model = compiled();
        let bytes = encode(&model);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.nodes.len(), model.nodes.len());
        assert_eq!(decoded.start_id, model.start_id);
        assert_eq!(decoded.named_pattern_cnt, model.named_pattern_cnt);
        for (a, b) in model.nodes.iter().zip(decoded.nodes.iter()) {
            assert_eq!(a.value_edges, b.value_edges);
            assert_eq!(a.pattern_edges, b.pattern_edges);
            assert_eq!(a.signing_refs, b.signing_refs);
        }
    }

    #[test]
    fn rejects_unrecognized_version() {
        let model = compiled();
        let mut bytes = encode(&model);
        // overwrite the Version TLV's value bytes (T=1,L=1 header then 4
        // value bytes: offsets 2..6).
        bytes[5] ^= 0xFF;
        match decode(&bytes) {
            Err(ModelError::UnrecognizedVersion(_)) => {}
            other => panic!("expected UnrecognizedVersion, got {:?}", other)
        }
    }

    #[test]
    fn rejects_truncated_bytes() {
        let model = compiled();
        let bytes = encode(&model);
        let truncated = &bytes[..bytes.len() - 3];
        assert!(decode(truncated).is_err());
    }

    #[test]
    fn skips_unknown_non_critical_top_level_tlv() {
        let model = compiled();
        let mut bytes = encode(&model);
        // an even, therefore non-critical, unknown TLV: T=0x02 L=1 V=[0x00]
        bytes.extend_from_slice(&[0x02, 0x01, 0x00]);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.nodes.len(), model.nodes.len());
    }

    #[test]
    fn rejects_unknown_critical_top_level_tlv() {
        let model = compiled();
        let mut bytes = encode(&model);
        // an odd, therefore critical, unknown TLV: T=0x0B L=1 V=[0x00]
        bytes.extend_from_slice(&[0x0B, 0x01, 0x00]);
        assert!(decode(&bytes).is_err());
    }
}
