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

//! Recursive-descent parser over the token stream produced by `lexer`,
//! implementing the LVS schema grammar. Mirrors the shape of
//! `cfgrammar`'s (unretrieved) `yacc_parser`: a `Parser` struct holding a
//! cursor into the lexeme vector, one method per grammar production.

use crate::ast::{ConstraintOpt, ConstraintSet, ConstraintTerm, FnArg, NameComp, RuleDef, SchemaFile};
use crate::error::SyntaxError;
use crate::lexer::{lex, Lexeme, Tok};

struct Parser {
    lexemes: Vec<Lexeme>,
    cursor: usize
}

/// Parse a full LVS source file into a `SchemaFile` AST.
pub fn parse(src: &str) -> Result<SchemaFile, SyntaxError> {
    let lexemes = lex(src)?;
    let mut p = Parser { lexemes, cursor: 0 };
    p.parse_file()
}

impl Parser {
    fn peek(&self) -> &Tok {
        &self.lexemes[self.cursor].tok
    }

    fn peek_pos(&self) -> usize {
        self.lexemes[self.cursor].pos
    }

    fn advance(&mut self) -> Lexeme {
        let l = self.lexemes[self.cursor].clone();
        if self.cursor + 1 < self.lexemes.len() {
            self.cursor += 1;
        }
        l
    }

    fn err(&self, msg: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.peek_pos(), msg.into())
    }

    fn expect(&mut self, tok: &Tok, what: &str) -> Result<(), SyntaxError> {
        if self.peek() == tok {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected {}", what)))
        }
    }

    fn parse_file(&mut self) -> Result<SchemaFile, SyntaxError> {
        let mut rules = Vec::new();
        while *self.peek() != Tok::Eof {
            rules.push(self.parse_definition()?);
        }
        Ok(SchemaFile { rules })
    }

    fn parse_definition(&mut self) -> Result<RuleDef, SyntaxError> {
        let pos = self.peek_pos();
        let name = match self.advance().tok {
            Tok::RuleId(n) => n,
            _ => return Err(SyntaxError::new(pos, "expected a rule definition '#name: ...'"))
        };
        self.expect(&Tok::Colon, "':' after rule name")?;
        let pattern = self.parse_name()?;
        let constraints = if *self.peek() == Tok::Amp {
            self.advance();
            self.parse_cons_cnf()?
        } else {
            vec![Vec::new()]
        };
        let signing = if *self.peek() == Tok::LArrow {
            self.advance();
            self.parse_sign_list()?
        } else {
            Vec::new()
        };
        Ok(RuleDef { name, pattern, constraints, signing, pos })
    }

    fn parse_name(&mut self) -> Result<Vec<NameComp>, SyntaxError> {
        if *self.peek() == Tok::Slash {
            self.advance();
        }
        let mut comps = vec![self.parse_comp()?];
        while *self.peek() == Tok::Slash {
            self.advance();
            comps.push(self.parse_comp()?);
        }
        Ok(comps)
    }

    fn parse_comp(&mut self) -> Result<NameComp, SyntaxError> {
        match self.peek().clone() {
            Tok::Str(s) => {
                self.advance();
                Ok(NameComp::Literal(s))
            }
            Tok::CName(s) => {
                self.advance();
                Ok(NameComp::Tag(s))
            }
            Tok::RuleId(s) => {
                self.advance();
                Ok(NameComp::RuleRef(s))
            }
            _ => Err(self.err("expected a name component (string, tag or #rule reference)"))
        }
    }

    fn parse_sign_list(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut out = vec![self.parse_rule_id("signing reference")?];
        while *self.peek() == Tok::Pipe {
            self.advance();
            out.push(self.parse_rule_id("signing reference")?);
        }
        Ok(out)
    }

    fn parse_rule_id(&mut self, what: &str) -> Result<String, SyntaxError> {
        match self.advance().tok {
            Tok::RuleId(s) => Ok(s),
            _ => Err(self.err(format!("expected a {} (#rule)", what)))
        }
    }

    fn parse_cons_cnf(&mut self) -> Result<Vec<ConstraintSet>, SyntaxError> {
        let mut out = vec![self.parse_cons_set()?];
        while *self.peek() == Tok::Pipe {
            self.advance();
            out.push(self.parse_cons_set()?);
        }
        Ok(out)
    }

    fn parse_cons_set(&mut self) -> Result<ConstraintSet, SyntaxError> {
        self.expect(&Tok::LBrace, "'{' to start a constraint set")?;
        let mut terms = vec![self.parse_cons_term()?];
        while *self.peek() == Tok::Comma {
            self.advance();
            terms.push(self.parse_cons_term()?);
        }
        self.expect(&Tok::RBrace, "'}' to close a constraint set")?;
        Ok(terms)
    }

    fn parse_cons_term(&mut self) -> Result<ConstraintTerm, SyntaxError> {
        let pos = self.peek_pos();
        let tag = match self.advance().tok {
            Tok::CName(s) => s,
            _ => return Err(SyntaxError::new(pos, "expected a tag identifier in constraint term"))
        };
        self.expect(&Tok::Colon, "':' after constraint tag")?;
        let options = self.parse_cons_disj()?;
        Ok(ConstraintTerm { tag, options, pos })
    }

    fn parse_cons_disj(&mut self) -> Result<Vec<ConstraintOpt>, SyntaxError> {
        let mut out = vec![self.parse_cons_opt()?];
        while *self.peek() == Tok::Pipe {
            self.advance();
            out.push(self.parse_cons_opt()?);
        }
        Ok(out)
    }

    fn parse_cons_opt(&mut self) -> Result<ConstraintOpt, SyntaxError> {
        match self.peek().clone() {
            Tok::Str(s) => {
                self.advance();
                Ok(ConstraintOpt::Literal(s))
            }
            Tok::CName(s) => {
                self.advance();
                Ok(ConstraintOpt::Tag(s))
            }
            Tok::FnId(s) => {
                self.advance();
                self.expect(&Tok::LParen, "'(' after predicate name")?;
                let mut args = Vec::new();
                if *self.peek() != Tok::RParen {
                    args.push(self.parse_fn_arg()?);
                    while *self.peek() == Tok::Comma {
                        self.advance();
                        args.push(self.parse_fn_arg()?);
                    }
                }
                self.expect(&Tok::RParen, "')' to close predicate arguments")?;
                Ok(ConstraintOpt::FnCall(s, args))
            }
            _ => Err(self.err("expected a string, tag or $predicate() in a constraint option"))
        }
    }

    fn parse_fn_arg(&mut self) -> Result<FnArg, SyntaxError> {
        match self.peek().clone() {
            Tok::Str(s) => {
                self.advance();
                Ok(FnArg::Literal(s))
            }
            Tok::CName(s) => {
                self.advance();
                Ok(FnArg::Tag(s))
            }
            _ => Err(self.err("expected a string or tag as a predicate argument"))
        }
    }
}
