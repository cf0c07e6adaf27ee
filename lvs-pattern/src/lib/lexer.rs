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

//! Hand-written lexer for LVS source text. LVS's token set is small enough
//! that a separate lexer-generator crate (`lrlex`) would be pure overhead;
//! `cfgrammar` itself hand-lexes Yacc source the same way.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::SyntaxError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    RuleId(String),
    FnId(String),
    CName(String),
    Str(String),
    Slash,
    Colon,
    Amp,
    Pipe,
    LArrow,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Eof
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub tok: Tok,
    pub pos: usize
}

lazy_static! {
    static ref WS_OR_COMMENT: Regex = Regex::new(r"\A(?:[ \t\r\n]+|//[^\n]*)").unwrap();
    static ref CNAME: Regex = Regex::new(r"\A[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

/// Tokenize an entire LVS source string, stopping at the first lexical
/// error. The returned vector always ends with a single `Tok::Eof`.
pub fn lex(src: &str) -> Result<Vec<Lexeme>, SyntaxError> {
    let bytes = src.as_bytes();
    let mut pos = 0;
    let mut out = Vec::new();
    loop {
        loop {
            if let Some(m) = WS_OR_COMMENT.find(&src[pos..]) {
                pos += m.end();
            } else {
                break;
            }
        }
        if pos >= bytes.len() {
            out.push(Lexeme { tok: Tok::Eof, pos });
            return Ok(out);
        }
        let start = pos;
        let c = bytes[pos] as char;
        let tok = match c {
            '/' => {
                pos += 1;
                Tok::Slash
            }
            ':' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    return Err(SyntaxError::new(pos, "unexpected ':=' (did you mean ':'?)"));
                }
                pos += 1;
                Tok::Colon
            }
            '&' => {
                pos += 1;
                Tok::Amp
            }
            '|' => {
                pos += 1;
                Tok::Pipe
            }
            '{' => {
                pos += 1;
                Tok::LBrace
            }
            '}' => {
                pos += 1;
                Tok::RBrace
            }
            '(' => {
                pos += 1;
                Tok::LParen
            }
            ')' => {
                pos += 1;
                Tok::RParen
            }
            ',' => {
                pos += 1;
                Tok::Comma
            }
            '<' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Tok::LArrow
                } else {
                    return Err(SyntaxError::new(pos, "expected '<=' signing arrow"));
                }
            }
            '"' => {
                pos += 1;
                let mut s = String::new();
                loop {
                    match bytes.get(pos) {
                        None => return Err(SyntaxError::new(start, "unterminated string literal")),
                        Some(b'"') => {
                            pos += 1;
                            break;
                        }
                        Some(b'\\') => {
                            pos += 1;
                            match bytes.get(pos) {
                                Some(b'"') => {
                                    s.push('"');
                                    pos += 1;
                                }
                                Some(b'\\') => {
                                    s.push('\\');
                                    pos += 1;
                                }
                                Some(b'n') => {
                                    s.push('\n');
                                    pos += 1;
                                }
                                _ => return Err(SyntaxError::new(pos, "invalid escape sequence"))
                            }
                        }
                        Some(_) => {
                            let rest = &src[pos..];
                            let ch = rest.chars().next().unwrap();
                            s.push(ch);
                            pos += ch.len_utf8();
                        }
                    }
                }
                Tok::Str(s)
            }
            '#' => {
                pos += 1;
                let name = lex_cname(src, &mut pos, start)?;
                Tok::RuleId(name)
            }
            '$' => {
                pos += 1;
                let name = lex_cname(src, &mut pos, start)?;
                Tok::FnId(name)
            }
            _ => {
                if let Some(m) = CNAME.find(&src[pos..]) {
                    let name = m.as_str().to_string();
                    pos += m.end();
                    Tok::CName(name)
                } else {
                    return Err(SyntaxError::new(pos, format!("unexpected character '{}'", c)));
                }
            }
        };
        out.push(Lexeme { tok, pos: start });
    }
}

fn lex_cname(src: &str, pos: &mut usize, start: usize) -> Result<String, SyntaxError> {
    if let Some(m) = CNAME.find(&src[*pos..]) {
        let name = m.as_str().to_string();
        *pos += m.end();
        Ok(name)
    } else {
        Err(SyntaxError::new(start, "expected identifier after '#' or '$'"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn toks(src: &str) -> Vec<Tok> {
        lex(src).unwrap().into_iter().map(|l| l.tok).collect()
    }

    #[test]
    fn lexes_blog_platform_rule() {
        assert_eq!(
            toks(r#"#platform: "ndn"/"blog""#),
            vec![
                Tok::RuleId("platform".to_string()),
                Tok::Colon,
                Tok::Str("ndn".to_string()),
                Tok::Slash,
                Tok::Str("blog".to_string()),
                Tok::Eof
            ]
        );
    }

    #[test]
    fn lexes_constraint_and_signing() {
        assert_eq!(
            toks(r#"& {_role: "admin"} <= #root"#),
            vec![
                Tok::Amp,
                Tok::LBrace,
                Tok::CName("_role".to_string()),
                Tok::Colon,
                Tok::Str("admin".to_string()),
                Tok::RBrace,
                Tok::LArrow,
                Tok::RuleId("root".to_string()),
                Tok::Eof
            ]
        );
    }

    #[test]
    fn lexes_fn_call() {
        assert_eq!(
            toks(r#"$isValidID()"#),
            vec![
                Tok::FnId("isValidID".to_string()),
                Tok::LParen,
                Tok::RParen,
                Tok::Eof
            ]
        );
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(
            toks("// a comment\n#x: \"y\" // trailing"),
            vec![
                Tok::RuleId("x".to_string()),
                Tok::Colon,
                Tok::Str("y".to_string()),
                Tok::Eof
            ]
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(lex(r#"#x: "unterminated"#).is_err());
    }
}
