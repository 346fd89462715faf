//! Builds an [`Env`] and a clause set from the tokenized surface syntax.
use rustc_hash::FxHashMap;
use thiserror::Error;

use mcsat_formula::{Clause, Env, Term, TypeId};

use crate::lexer::{lex, Token, TokenKind};

/// A user input error: fatal at parse time, carrying the offending line.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("line {line}: unexpected token {found}, expected {expected}")]
    UnexpectedToken { line: usize, found: String, expected: &'static str },
    #[error("line {line}: unterminated list")]
    UnterminatedList { line: usize },
    #[error("line {line}: unknown type '{name}'")]
    UnknownType { line: usize, name: String },
    #[error("line {line}: unknown identifier '{name}'")]
    UnknownSymbol { line: usize, name: String },
    #[error("line {line}: '{name}' expects {expected} argument(s), got {found}")]
    ArityMismatch { line: usize, name: String, expected: usize, found: usize },
    #[error("line {line}: operands of '=' have different types")]
    EqualityTypeMismatch { line: usize },
    #[error("line {line}: '{name}' redeclares a name already in scope")]
    Redeclaration { line: usize, name: String },
    #[error("line {line}: unknown top-level statement '{name}'")]
    UnknownStatement { line: usize, name: String },
}

/// A parenthesized form, read eagerly into a tree so a statement can be matched against
/// shape (`(keyword arg1 arg2 ..)`) without re-tokenizing.
enum Sexpr {
    Atom(String, usize),
    List(Vec<Sexpr>, usize),
}

struct Reader<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Reader<'t> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next_token(&mut self) -> Option<&'t Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn read_sexpr(&mut self) -> Result<Sexpr, ParseError> {
        match self.next_token() {
            None => Err(ParseError::UnexpectedEof { expected: "a term or '('" }),
            Some(Token { kind: TokenKind::Atom(a), line }) => Ok(Sexpr::Atom(a.clone(), *line)),
            Some(Token { kind: TokenKind::LParen, line }) => {
                let open_line = *line;
                let mut items = Vec::new();
                loop {
                    match self.peek() {
                        None => return Err(ParseError::UnterminatedList { line: open_line }),
                        Some(Token { kind: TokenKind::RParen, .. }) => {
                            self.next_token();
                            break;
                        }
                        _ => items.push(self.read_sexpr()?),
                    }
                }
                Ok(Sexpr::List(items, open_line))
            }
            Some(Token { kind: TokenKind::RParen, line }) => {
                Err(ParseError::UnexpectedToken { line: *line, found: ")".to_owned(), expected: "a term or '('" })
            }
        }
    }
}

/// Parses a full program: a sequence of top-level `(ty ..)`/`(fun ..)`/`(assert ..)` forms.
///
/// Returns the populated [`Env`] and the asserted clauses, in source order.
pub fn parse_program(source: &str) -> Result<(Env, Vec<Clause>), ParseError> {
    let tokens = lex(source);
    let mut reader = Reader { tokens: &tokens, pos: 0 };

    let mut env = Env::new();
    let mut declared_types: FxHashMap<String, TypeId> = FxHashMap::default();
    let mut clauses = Vec::new();

    while reader.peek().is_some() {
        let form = reader.read_sexpr()?;
        let (head, rest, line) = match form {
            Sexpr::List(mut items, line) if !items.is_empty() => {
                let head = match items.remove(0) {
                    Sexpr::Atom(a, _) => a,
                    Sexpr::List(_, l) => {
                        return Err(ParseError::UnexpectedToken { line: l, found: "(".to_owned(), expected: "a statement keyword" })
                    }
                };
                (head, items, line)
            }
            Sexpr::List(_, line) => return Err(ParseError::UnexpectedToken { line, found: "()".to_owned(), expected: "a statement" }),
            Sexpr::Atom(a, line) => return Err(ParseError::UnexpectedToken { line, found: a, expected: "a statement" }),
        };

        match head.as_str() {
            "ty" => {
                let name = expect_atom(&rest, 0, line, "a type name")?;
                if declared_types.contains_key(&name) || env.symbols.lookup(&name).is_some() {
                    return Err(ParseError::Redeclaration { line, name });
                }
                let ty = env.declare_type(&name);
                declared_types.insert(name, ty);
            }
            "fun" => {
                let name = expect_atom(&rest, 0, line, "a function name")?;
                let ty_expr = rest.get(1).ok_or(ParseError::UnexpectedEof { expected: "a type" })?;
                let ty = parse_type(ty_expr, &mut env, &declared_types)?;
                env.declare_fun(&name, ty).map_err(|_| ParseError::Redeclaration { line, name })?;
            }
            "assert" => {
                let clause_expr = rest.get(0).ok_or(ParseError::UnexpectedEof { expected: "a clause" })?;
                clauses.push(parse_clause(clause_expr, &mut env, &declared_types)?);
            }
            other => return Err(ParseError::UnknownStatement { line, name: other.to_owned() }),
        }

        log::trace!("parsed top-level statement '{}'", head);
    }

    Ok((env, clauses))
}

fn expect_atom(items: &[Sexpr], idx: usize, line: usize, expected: &'static str) -> Result<String, ParseError> {
    match items.get(idx) {
        Some(Sexpr::Atom(a, _)) => Ok(a.clone()),
        Some(Sexpr::List(_, l)) => Err(ParseError::UnexpectedToken { line: *l, found: "(".to_owned(), expected }),
        None => Err(ParseError::UnexpectedToken { line, found: "end of form".to_owned(), expected }),
    }
}

fn parse_type(expr: &Sexpr, env: &mut Env, declared_types: &FxHashMap<String, TypeId>) -> Result<TypeId, ParseError> {
    match expr {
        Sexpr::Atom(name, line) => match name.as_str() {
            "bool" => Ok(env.types.bool_ty()),
            "rat" => Ok(env.types.rat_ty()),
            _ => declared_types.get(name).copied().ok_or_else(|| ParseError::UnknownType { line: *line, name: name.clone() }),
        },
        Sexpr::List(items, line) => {
            match items.first() {
                Some(Sexpr::Atom(a, _)) if a == "->" => {}
                _ => return Err(ParseError::UnexpectedToken { line: *line, found: "(".to_owned(), expected: "'->'" }),
            }
            if items.len() < 3 {
                return Err(ParseError::UnexpectedToken {
                    line: *line,
                    found: "(->..)".to_owned(),
                    expected: "at least one argument type and a return type",
                });
            }
            let rest = &items[1..];
            let mut tys = Vec::with_capacity(rest.len());
            for item in rest {
                tys.push(parse_type(item, env, declared_types)?);
            }
            let ret = tys.pop().expect("checked len >= 2 above");
            Ok(env.types.arrow_chain(&tys, ret))
        }
    }
}

fn parse_term(expr: &Sexpr, env: &mut Env, declared_types: &FxHashMap<String, TypeId>) -> Result<Term, ParseError> {
    match expr {
        Sexpr::Atom(name, line) => match name.as_str() {
            "true" => Ok(env.bool_const(true)),
            "false" => Ok(env.bool_const(false)),
            _ => {
                let sym = env.symbols.lookup(name).ok_or_else(|| ParseError::UnknownSymbol { line: *line, name: name.clone() })?;
                let (args, _ret) = env.types.open(env.symbols.ty(sym));
                if !args.is_empty() {
                    return Err(ParseError::ArityMismatch { line: *line, name: name.clone(), expected: args.len(), found: 0 });
                }
                Ok(env.app(sym, vec![]))
            }
        },
        Sexpr::List(items, line) => {
            let head = expect_atom(items, 0, *line, "an operator or function name")?;
            let args = &items[1..];
            match head.as_str() {
                "not" => {
                    if args.len() != 1 {
                        return Err(ParseError::ArityMismatch { line: *line, name: "not".to_owned(), expected: 1, found: args.len() });
                    }
                    let t = parse_term(&args[0], env, declared_types)?;
                    if !env.types.is_bool(env.terms.ty(t)) {
                        return Err(ParseError::EqualityTypeMismatch { line: *line });
                    }
                    Ok(env.not_(t))
                }
                "=" => {
                    if args.len() != 2 {
                        return Err(ParseError::ArityMismatch { line: *line, name: "=".to_owned(), expected: 2, found: args.len() });
                    }
                    let a = parse_term(&args[0], env, declared_types)?;
                    let b = parse_term(&args[1], env, declared_types)?;
                    if env.terms.ty(a) != env.terms.ty(b) {
                        return Err(ParseError::EqualityTypeMismatch { line: *line });
                    }
                    Ok(env.eq(a, b))
                }
                name => {
                    let sym = env.symbols.lookup(name).ok_or_else(|| ParseError::UnknownSymbol { line: *line, name: name.to_owned() })?;
                    let (arg_tys, _ret) = env.types.open(env.symbols.ty(sym));
                    if arg_tys.len() != args.len() {
                        return Err(ParseError::ArityMismatch {
                            line: *line,
                            name: name.to_owned(),
                            expected: arg_tys.len(),
                            found: args.len(),
                        });
                    }
                    let mut parsed_args = Vec::with_capacity(args.len());
                    for (arg_expr, &expected_ty) in args.iter().zip(arg_tys.iter()) {
                        let arg = parse_term(arg_expr, env, declared_types)?;
                        if env.terms.ty(arg) != expected_ty {
                            return Err(ParseError::EqualityTypeMismatch { line: *line });
                        }
                        parsed_args.push(arg);
                    }
                    Ok(env.app(sym, parsed_args))
                }
            }
        }
    }
}

fn parse_clause(expr: &Sexpr, env: &mut Env, declared_types: &FxHashMap<String, TypeId>) -> Result<Clause, ParseError> {
    match expr {
        Sexpr::List(items, line) if matches!(items.first(), Some(Sexpr::Atom(a, _)) if a == "or") => {
            let mut clause = Clause::new();
            for lit_expr in &items[1..] {
                clause.insert(parse_term(lit_expr, env, declared_types)?);
            }
            if clause.is_empty() {
                return Err(ParseError::UnexpectedToken { line: *line, found: "(or)".to_owned(), expected: "at least one literal" });
            }
            Ok(clause)
        }
        other => Ok(Clause::from_literals([parse_term(other, env, declared_types)?])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_types_and_funs() {
        let (env, clauses) = parse_program("(ty U) (fun a U) (fun b U) (assert (= a b))").unwrap();
        assert_eq!(clauses.len(), 1);
        assert!(env.symbols.lookup("a").is_some());
    }

    #[test]
    fn parses_or_clause() {
        let (_, clauses) = parse_program("(fun p bool) (fun q bool) (assert (or p (not q)))").unwrap();
        assert_eq!(clauses[0].len(), 2);
    }

    #[test]
    fn rejects_redeclaration() {
        let err = parse_program("(fun p bool) (fun p bool)").unwrap_err();
        assert!(matches!(err, ParseError::Redeclaration { .. }));
    }

    #[test]
    fn rejects_unknown_symbol() {
        let err = parse_program("(assert (not q))").unwrap_err();
        assert!(matches!(err, ParseError::UnknownSymbol { .. }));
    }

    #[test]
    fn rejects_arity_mismatch() {
        let err = parse_program("(ty U) (fun f (-> U U)) (fun a U) (assert (not (f a a)))").unwrap_err();
        assert!(matches!(err, ParseError::ArityMismatch { .. }));
    }

    #[test]
    fn parses_arrow_type_and_application() {
        let (env, clauses) = parse_program("(ty U) (fun f (-> U U)) (fun a U) (assert (= (f a) a))").unwrap();
        assert_eq!(clauses.len(), 1);
        assert!(env.types.is_arrow(env.symbols.ty(env.symbols.lookup("f").unwrap())));
    }
}
