//! The IR's operator sets: relational tests and integer arithmetic.
//!
//! Both enums pair a source token (`">"` / `"+"` / ...) with fixed `i32`
//! semantics so the loader and the engine agree on exactly one meaning
//! per operator.

/// Relational operator of an `IF lhs op rhs GOTO label` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relop {
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

/// Every relational operator, in source-token order.
pub const ALL_RELOPS: [Relop; 6] = [
    Relop::Gt,
    Relop::Lt,
    Relop::Ge,
    Relop::Le,
    Relop::Eq,
    Relop::Ne,
];

impl Relop {
    /// Parse a source token into an operator.
    pub fn from_token(token: &str) -> Option<Relop> {
        match token {
            ">" => Some(Relop::Gt),
            "<" => Some(Relop::Lt),
            ">=" => Some(Relop::Ge),
            "<=" => Some(Relop::Le),
            "==" => Some(Relop::Eq),
            "!=" => Some(Relop::Ne),
            _ => None,
        }
    }

    /// The source token for this operator.
    pub fn token(&self) -> &'static str {
        match self {
            Relop::Gt => ">",
            Relop::Lt => "<",
            Relop::Ge => ">=",
            Relop::Le => "<=",
            Relop::Eq => "==",
            Relop::Ne => "!=",
        }
    }

    /// Whether the comparison holds for the given operands.
    pub fn holds(&self, lhs: i32, rhs: i32) -> bool {
        match self {
            Relop::Gt => lhs > rhs,
            Relop::Lt => lhs < rhs,
            Relop::Ge => lhs >= rhs,
            Relop::Le => lhs <= rhs,
            Relop::Eq => lhs == rhs,
            Relop::Ne => lhs != rhs,
        }
    }
}

/// Arithmetic operator of a `dest := lhs op rhs` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Every arithmetic operator, in source-token order.
pub const ALL_BINOPS: [BinOp; 4] = [BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div];

impl BinOp {
    /// Parse a source token into an operator.
    pub fn from_token(token: &str) -> Option<BinOp> {
        match token {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            _ => None,
        }
    }

    /// The source token for this operator.
    pub fn token(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// Apply the operator with wrapping two's-complement semantics.
    ///
    /// Division truncates toward zero and `i32::MIN / -1` wraps to
    /// `i32::MIN`. Returns `None` when the divisor is zero; every other
    /// combination of operands produces a value.
    pub fn apply(&self, lhs: i32, rhs: i32) -> Option<i32> {
        match self {
            BinOp::Add => Some(lhs.wrapping_add(rhs)),
            BinOp::Sub => Some(lhs.wrapping_sub(rhs)),
            BinOp::Mul => Some(lhs.wrapping_mul(rhs)),
            BinOp::Div => {
                if rhs == 0 {
                    None
                } else {
                    Some(lhs.wrapping_div(rhs))
                }
            }
        }
    }
}
