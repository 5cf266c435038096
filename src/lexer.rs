use chumsky::prelude::*;

use crate::diagnostic::{Diagnostic, Label, Span};
use crate::token::Token;

pub fn lexer<'a>()
-> impl Parser<'a, &'a str, Vec<(Token, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|s: &str| {
            if s.contains('.') {
                Token::Float(s.parse().unwrap())
            } else {
                // Digit runs beyond i64 survive in double precision.
                match s.parse::<i64>() {
                    Ok(n) => Token::Int(n),
                    Err(_) => Token::Float(s.parse().unwrap()),
                }
            }
        });

    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('/'),
        just('"'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
    )));

    let string = just('"')
        .ignore_then(none_of("\\\"").or(escape).repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(Token::Str);

    let ident = text::ident().map(|s: &str| match s {
        "drim" => Token::Drim,
        "wake" => Token::Wake,
        "type" => Token::Type,
        "conv" => Token::Conv,
        "if" => Token::If,
        "else" => Token::Else,
        "and" => Token::And,
        "or" => Token::Or,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Ident(s.to_string()),
    });

    // Two-character operators must win over their one-character prefixes.
    let op_double = choice((
        just("==").to(Token::EqEq),
        just("!=").to(Token::NotEq),
        just(">=").to(Token::GreaterEq),
        just("<=").to(Token::LessEq),
        just("<<").to(Token::Shl),
        just(">>").to(Token::Shr),
    ));

    let op_single = choice((
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('^').to(Token::Caret),
        just('&').to(Token::Amp),
        just('|').to(Token::Pipe),
        just('~').to(Token::Tilde),
        just('>').to(Token::Greater),
        just('<').to(Token::Less),
        just('=').to(Token::Assign),
        just(',').to(Token::Comma),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('{').to(Token::LBrace),
        just('}').to(Token::RBrace),
    ));

    let op = op_double.or(op_single);

    // Anything else (except a quote, which starts the string branch) is
    // surfaced to the parser as an error token rather than halting the scan.
    let unexpected = none_of("\"").map(Token::Error);

    let comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .padded();

    let token = number
        .or(string)
        .or(ident)
        .or(op)
        .or(unexpected)
        .map_with(|tok, e| (tok, e.span()))
        .padded_by(comment.repeated())
        .padded();

    token.repeated().collect().then_ignore(end())
}

/// Runs the lexer and converts a failed scan into diagnostics. The only
/// inputs the scan itself rejects are a string literal that never closes and
/// a malformed escape inside one; everything else becomes an error token.
pub fn tokenize(source: &str) -> Result<Vec<(Token, SimpleSpan)>, Vec<Diagnostic>> {
    match lexer().parse(source).into_result() {
        Ok(tokens) => Ok(tokens),
        Err(errors) => {
            if let Some(start) = unterminated_string_start(source) {
                return Err(vec![Diagnostic::error("unterminated string literal")
                    .with_code("E0001")
                    .with_label(Label::primary(
                        Span::new(start, start + 1),
                        "string starts here",
                    ))]);
            }
            Err(vec![Diagnostic::error("unable to tokenize input")
                .with_code("E0001")
                .with_note(format!("{:?}", errors))])
        }
    }
}

/// Finds the opening quote of a string literal that never closes. Comments
/// are skipped so a quote inside one does not count.
fn unterminated_string_start(source: &str) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'"' => {
                let start = i;
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => return Some(start),
                        Some(b'\\') => i += 2,
                        Some(b'"') => {
                            i += 1;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
            }
            _ => i += 1,
        }
    }
    None
}
