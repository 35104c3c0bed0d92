//! Per-line syntactic recognition.
//!
//! This pass is pure: it turns one whitespace-split line into a [`Line`]
//! shape (operands still borrowed from the source), or a syntax error.
//! Name registration, scope checks, and target resolution happen later in
//! the builder.
//!
//! Dispatch follows the first token. A line starting with a keyword must
//! match that keyword's arity exactly; anything else must be an
//! assignment (`dest := ...`), where the `CALL` keyword is checked before
//! arity so that a malformed call never parses as a copy or arithmetic.

use tacsim_common::{BinOp, Relop, WORD_BYTES};

use crate::error::LoadError;

/// A raw readable operand, classified by addressing mode but not yet
/// interned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawOperand<'a> {
    Imm(i32),
    Var(&'a str),
    AddrOf(&'a str),
    Deref(&'a str),
}

/// A raw assignment destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawDest<'a> {
    Var(&'a str),
    Deref(&'a str),
}

/// The recognized shape of one source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Label {
        name: &'a str,
    },
    Function {
        name: &'a str,
    },
    Goto {
        label: &'a str,
    },
    Return {
        value: RawOperand<'a>,
    },
    Read {
        var: &'a str,
    },
    Write {
        value: RawOperand<'a>,
    },
    Arg {
        value: RawOperand<'a>,
    },
    Param {
        var: &'a str,
    },
    Dec {
        name: &'a str,
        size: u32,
    },
    If {
        lhs: RawOperand<'a>,
        op: Relop,
        rhs: RawOperand<'a>,
        label: &'a str,
    },
    Call {
        dest: RawDest<'a>,
        func: &'a str,
    },
    Move {
        dest: RawDest<'a>,
        src: RawOperand<'a>,
    },
    Arith {
        dest: RawDest<'a>,
        lhs: RawOperand<'a>,
        op: BinOp,
        rhs: RawOperand<'a>,
    },
}

/// Recognize one non-blank line. `text` is the normalized source used in
/// error reports.
pub(crate) fn parse_line<'a>(
    tokens: &[&'a str],
    line: u32,
    text: &str,
) -> Result<Line<'a>, LoadError> {
    match tokens.first().copied() {
        Some("LABEL") => match tokens {
            [_, name, ":"] => {
                let name = expect_ident(name, line, text)?;
                // 'main' must come from FUNCTION; it names the entry point.
                if name == "main" {
                    return Err(syntax(line, text));
                }
                Ok(Line::Label { name })
            }
            _ => Err(syntax(line, text)),
        },
        Some("FUNCTION") => match tokens {
            [_, name, ":"] => Ok(Line::Function {
                name: expect_ident(name, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        Some("GOTO") => match tokens {
            [_, label] => Ok(Line::Goto {
                label: expect_ident(label, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        Some("RETURN") => match tokens {
            [_, value] => Ok(Line::Return {
                value: parse_operand(value, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        Some("READ") => match tokens {
            [_, var] => Ok(Line::Read {
                var: expect_ident(var, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        Some("WRITE") => match tokens {
            [_, value] => Ok(Line::Write {
                value: parse_operand(value, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        Some("ARG") => match tokens {
            [_, value] => Ok(Line::Arg {
                value: parse_operand(value, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        Some("PARAM") => match tokens {
            [_, var] => Ok(Line::Param {
                var: expect_ident(var, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        Some("DEC") => match tokens {
            [_, name, size] => Ok(Line::Dec {
                name: expect_ident(name, line, text)?,
                size: parse_dec_size(size, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        Some("IF") => match tokens {
            [_, lhs, op, rhs, "GOTO", label] => Ok(Line::If {
                lhs: parse_operand(lhs, line, text)?,
                op: Relop::from_token(op).ok_or_else(|| syntax(line, text))?,
                rhs: parse_operand(rhs, line, text)?,
                label: expect_ident(label, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
        _ => match tokens {
            [dest, ":=", "CALL", func] => Ok(Line::Call {
                dest: parse_dest(dest, line, text)?,
                func: expect_ident(func, line, text)?,
            }),
            [_, ":=", "CALL", ..] => Err(syntax(line, text)),
            [dest, ":=", src] => Ok(Line::Move {
                dest: parse_dest(dest, line, text)?,
                src: parse_operand(src, line, text)?,
            }),
            [dest, ":=", lhs, op, rhs] => Ok(Line::Arith {
                dest: parse_dest(dest, line, text)?,
                lhs: parse_operand(lhs, line, text)?,
                op: BinOp::from_token(op).ok_or_else(|| syntax(line, text))?,
                rhs: parse_operand(rhs, line, text)?,
            }),
            _ => Err(syntax(line, text)),
        },
    }
}

fn syntax(line: u32, text: &str) -> LoadError {
    LoadError::Syntax {
        line,
        text: text.to_string(),
    }
}

/// Identifiers: ASCII alphabetic or `_` first, then alphanumerics or `_`.
fn is_ident(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn expect_ident<'a>(token: &'a str, line: u32, text: &str) -> Result<&'a str, LoadError> {
    if is_ident(token) {
        Ok(token)
    } else {
        Err(syntax(line, text))
    }
}

/// Classify a readable operand: `#N`, `&x`, `*x`, or a bare `x`.
fn parse_operand<'a>(token: &'a str, line: u32, text: &str) -> Result<RawOperand<'a>, LoadError> {
    if let Some(literal) = token.strip_prefix('#') {
        let value = literal.parse::<i32>().map_err(|_| syntax(line, text))?;
        return Ok(RawOperand::Imm(value));
    }
    if let Some(name) = token.strip_prefix('&') {
        return Ok(RawOperand::AddrOf(expect_ident(name, line, text)?));
    }
    if let Some(name) = token.strip_prefix('*') {
        return Ok(RawOperand::Deref(expect_ident(name, line, text)?));
    }
    Ok(RawOperand::Var(expect_ident(token, line, text)?))
}

/// Destinations are the writable subset of operands: `x` or `*x`.
fn parse_dest<'a>(token: &'a str, line: u32, text: &str) -> Result<RawDest<'a>, LoadError> {
    match parse_operand(token, line, text)? {
        RawOperand::Var(name) => Ok(RawDest::Var(name)),
        RawOperand::Deref(name) => Ok(RawDest::Deref(name)),
        RawOperand::Imm(_) | RawOperand::AddrOf(_) => Err(syntax(line, text)),
    }
}

/// `DEC` sizes must be positive multiples of the word size.
fn parse_dec_size(token: &str, line: u32, text: &str) -> Result<u32, LoadError> {
    let size = token.parse::<u32>().map_err(|_| syntax(line, text))?;
    if size == 0 || size % WORD_BYTES != 0 {
        return Err(syntax(line, text));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Line<'_>, LoadError> {
        let tokens: Vec<&str> = source.split_whitespace().collect();
        parse_line(&tokens, 1, source)
    }

    fn assert_syntax(source: &str) {
        assert!(
            matches!(parse(source), Err(LoadError::Syntax { line: 1, .. })),
            "expected syntax error for {source:?}"
        );
    }

    // --- Labels and functions ---

    #[test]
    fn label_line() {
        assert_eq!(parse("LABEL loop :"), Ok(Line::Label { name: "loop" }));
    }

    #[test]
    fn function_line() {
        assert_eq!(
            parse("FUNCTION main :"),
            Ok(Line::Function { name: "main" })
        );
    }

    #[test]
    fn label_main_is_reserved() {
        assert_syntax("LABEL main :");
    }

    #[test]
    fn label_requires_trailing_colon() {
        assert_syntax("LABEL loop");
        assert_syntax("LABEL loop ;");
        assert_syntax("LABEL loop : extra");
    }

    // --- Keyword forms ---

    #[test]
    fn goto_line() {
        assert_eq!(parse("GOTO done"), Ok(Line::Goto { label: "done" }));
        assert_syntax("GOTO");
        assert_syntax("GOTO a b");
    }

    #[test]
    fn return_accepts_any_operand() {
        assert_eq!(
            parse("RETURN #0"),
            Ok(Line::Return {
                value: RawOperand::Imm(0)
            })
        );
        assert_eq!(
            parse("RETURN *p"),
            Ok(Line::Return {
                value: RawOperand::Deref("p")
            })
        );
    }

    #[test]
    fn read_and_param_take_bare_identifiers_only() {
        assert_eq!(parse("READ x"), Ok(Line::Read { var: "x" }));
        assert_eq!(parse("PARAM n"), Ok(Line::Param { var: "n" }));
        assert_syntax("READ #1");
        assert_syntax("READ &x");
        assert_syntax("READ *x");
        assert_syntax("PARAM #1");
        assert_syntax("PARAM *p");
    }

    #[test]
    fn write_and_arg_accept_any_operand() {
        assert_eq!(
            parse("WRITE &x"),
            Ok(Line::Write {
                value: RawOperand::AddrOf("x")
            })
        );
        assert_eq!(
            parse("ARG #-3"),
            Ok(Line::Arg {
                value: RawOperand::Imm(-3)
            })
        );
    }

    #[test]
    fn dec_accepts_positive_word_multiples() {
        assert_eq!(
            parse("DEC arr 40"),
            Ok(Line::Dec {
                name: "arr",
                size: 40
            })
        );
        assert_eq!(
            parse("DEC one 4"),
            Ok(Line::Dec {
                name: "one",
                size: 4
            })
        );
    }

    #[test]
    fn dec_rejects_bad_sizes() {
        assert_syntax("DEC arr 0");
        assert_syntax("DEC arr 6");
        assert_syntax("DEC arr -4");
        assert_syntax("DEC arr four");
        assert_syntax("DEC arr");
        assert_syntax("DEC arr 4 5");
    }

    #[test]
    fn if_line() {
        assert_eq!(
            parse("IF x < #10 GOTO loop"),
            Ok(Line::If {
                lhs: RawOperand::Var("x"),
                op: Relop::Lt,
                rhs: RawOperand::Imm(10),
                label: "loop",
            })
        );
    }

    #[test]
    fn if_requires_goto_keyword_and_known_relop() {
        assert_syntax("IF x < #10 JUMP loop");
        assert_syntax("IF x <> #10 GOTO loop");
        assert_syntax("IF x < #10 GOTO");
        assert_syntax("IF x < GOTO loop");
    }

    // --- Assignment family ---

    #[test]
    fn move_line() {
        assert_eq!(
            parse("x := #2"),
            Ok(Line::Move {
                dest: RawDest::Var("x"),
                src: RawOperand::Imm(2)
            })
        );
        assert_eq!(
            parse("*p := y"),
            Ok(Line::Move {
                dest: RawDest::Deref("p"),
                src: RawOperand::Var("y")
            })
        );
    }

    #[test]
    fn arith_line() {
        assert_eq!(
            parse("z := x + y"),
            Ok(Line::Arith {
                dest: RawDest::Var("z"),
                lhs: RawOperand::Var("x"),
                op: BinOp::Add,
                rhs: RawOperand::Var("y"),
            })
        );
        assert_eq!(
            parse("*p := a / #2"),
            Ok(Line::Arith {
                dest: RawDest::Deref("p"),
                lhs: RawOperand::Var("a"),
                op: BinOp::Div,
                rhs: RawOperand::Imm(2),
            })
        );
    }

    #[test]
    fn call_line() {
        assert_eq!(
            parse("r := CALL add"),
            Ok(Line::Call {
                dest: RawDest::Var("r"),
                func: "add"
            })
        );
    }

    #[test]
    fn call_keyword_wins_over_arity() {
        // A lone or overlong CALL is a syntax error, never a copy of a
        // variable named CALL or arithmetic on one.
        assert_syntax("x := CALL");
        assert_syntax("x := CALL f g");
        assert_syntax("x := CALL + f");
    }

    #[test]
    fn destinations_must_be_writable() {
        assert_syntax("#1 := x");
        assert_syntax("&x := y");
        assert_syntax("#1 := x + y");
        assert_syntax("&r := CALL f");
    }

    #[test]
    fn keyword_lines_never_reparse_as_assignments() {
        // First-token dispatch: a malformed keyword line stays an error
        // even if its shape would fit an assignment.
        assert_syntax("READ := x");
        assert_syntax("GOTO := x");
    }

    // --- Operand classification ---

    #[test]
    fn immediates_accept_signs_and_extremes() {
        assert_eq!(
            parse("WRITE #-2147483648"),
            Ok(Line::Write {
                value: RawOperand::Imm(i32::MIN)
            })
        );
        assert_eq!(
            parse("WRITE #2147483647"),
            Ok(Line::Write {
                value: RawOperand::Imm(i32::MAX)
            })
        );
        assert_eq!(
            parse("WRITE #+5"),
            Ok(Line::Write {
                value: RawOperand::Imm(5)
            })
        );
    }

    #[test]
    fn immediates_reject_overflow_and_garbage() {
        assert_syntax("WRITE #2147483648");
        assert_syntax("WRITE #");
        assert_syntax("WRITE #1.5");
        assert_syntax("WRITE #x");
    }

    #[test]
    fn identifier_grammar() {
        assert!(is_ident("x"));
        assert!(is_ident("_tmp"));
        assert!(is_ident("v2"));
        assert!(is_ident("long_name_7"));
        assert!(!is_ident(""));
        assert!(!is_ident("2x"));
        assert!(!is_ident("a-b"));
        assert!(!is_ident("&x"));
        assert!(!is_ident("x y"));
    }

    #[test]
    fn sigils_do_not_nest() {
        assert_syntax("WRITE **p");
        assert_syntax("WRITE &&x");
        assert_syntax("WRITE *&x");
        assert_syntax("WRITE &#1");
    }

    #[test]
    fn bare_operand_lines_are_errors() {
        assert_syntax("x");
        assert_syntax("x y z");
        assert_syntax(":= x");
    }
}
