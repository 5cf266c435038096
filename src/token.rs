#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Drim,
    Wake,
    Type,
    Conv,
    If,
    Else,
    And,
    Or,
    True,
    False,

    // Literals and Identifiers
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),

    // Arithmetic Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,

    // Comparison Operators
    EqEq,
    NotEq,
    Greater,
    Less,
    GreaterEq,
    LessEq,

    // Bitwise Operators
    Amp,
    Pipe,
    Tilde,
    Shl,
    Shr,

    // Delimiters
    LParen,
    RParen,
    Assign,
    Comma,
    LBrace,
    RBrace,

    /// An unrecognized character. The lexer keeps scanning past it; the
    /// parser skips it in statement position and rejects it anywhere else.
    Error(char),
}
