use crate::ast::{BinaryOp, Expr, ExprKind, Stmt, UnaryOp};
use crate::diagnostic::{Diagnostic, Label, Span};
use crate::token::Token;
use crate::value::Value;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub expected: Vec<String>,
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: Vec::new(),
            found: None,
        }
    }

    pub fn with_expected(mut self, expected: Vec<String>) -> Self {
        self.expected = expected;
        self
    }

    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut msg = self.message.clone();
        if !self.expected.is_empty() {
            msg = format!("expected {}", self.expected.join(" or "));
            if let Some(found) = &self.found {
                msg.push_str(&format!(", found {}", found));
            }
        }

        let mut diag = Diagnostic::error(msg)
            .with_code("E0101")
            .with_label(Label::primary(self.span, ""));

        if self.expected.len() == 1 {
            diag = diag.with_help(format!("expected {} here", self.expected[0]));
        }

        diag
    }
}

/// Recursive-descent parser over the spanned token stream. The first hard
/// error aborts the parse; the only recovery is skipping a token that
/// cannot begin a statement.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    current: usize,
    source_len: usize,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            current: 0,
            source_len,
        }
    }

    pub fn from_lexer_output(
        tokens: Vec<(Token, chumsky::span::SimpleSpan)>,
        source_len: usize,
    ) -> Self {
        let spanned_tokens: Vec<SpannedToken> = tokens
            .into_iter()
            .map(|(token, span)| SpannedToken {
                token,
                span: Span::new(span.start, span.end),
            })
            .collect();
        Self::new(spanned_tokens, source_len)
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.current).map(|st| &st.token)
    }

    fn peek_next(&self) -> Option<&Token> {
        self.tokens.get(self.current + 1).map(|st| &st.token)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.current)
            .map(|st| st.span)
            .unwrap_or_else(|| Span::new(self.source_len, self.source_len))
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        if self.current < self.tokens.len() {
            let st = self.tokens[self.current].clone();
            self.current += 1;
            Some(st)
        } else {
            None
        }
    }

    fn expect(&mut self, expected: Token) -> Result<Span, ParseError> {
        match self.current_token() {
            Some(token) if std::mem::discriminant(token) == std::mem::discriminant(&expected) => {
                let span = self.current_span();
                self.advance();
                Ok(span)
            }
            Some(token) => Err(ParseError::new("unexpected token", self.current_span())
                .with_expected(vec![format!("{:?}", expected)])
                .with_found(format!("{:?}", token))),
            None => Err(ParseError::new("unexpected end of input", self.current_span())
                .with_expected(vec![format!("{:?}", expected)])),
        }
    }

    pub fn parse(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while self.current_token().is_some() {
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Option<Stmt>, ParseError> {
        match self.current_token() {
            Some(Token::Drim) => self.parse_input_statement().map(Some),
            Some(Token::Wake) => self.parse_print_statement().map(Some),
            Some(Token::Type) => self.parse_type_statement().map(Some),
            Some(Token::If) => self.parse_if_statement().map(Some),
            Some(Token::LBrace) => Ok(Some(Stmt::Block(self.parse_block()?))),
            Some(Token::Ident(_)) if matches!(self.peek_next(), Some(Token::Assign)) => {
                self.parse_assign_statement().map(Some)
            }
            _ => {
                // A token that cannot begin a statement is skipped.
                self.advance();
                Ok(None)
            }
        }
    }

    fn parse_input_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Drim)?;
        self.expect(Token::LParen)?;
        let name = match self.advance() {
            Some(SpannedToken { token: Token::Ident(name), .. }) => Rc::from(name.as_str()),
            other => {
                let span = other.as_ref().map(|st| st.span).unwrap_or(self.current_span());
                return Err(ParseError::new("expected variable name in drim", span)
                    .with_expected(vec!["identifier".to_string()])
                    .with_found(format!("{:?}", other.map(|st| st.token))));
            }
        };
        self.expect(Token::RParen)?;
        Ok(Stmt::Input { name })
    }

    fn parse_print_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Wake)?;
        self.expect(Token::LParen)?;
        let expr = self.expression()?;
        self.expect(Token::RParen)?;
        Ok(Stmt::Print(expr))
    }

    fn parse_type_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::Type)?;
        self.expect(Token::LParen)?;
        let expr = self.expression()?;
        self.expect(Token::RParen)?;
        Ok(Stmt::TypeQuery(expr))
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.expect(Token::If)?;
        let condition = self.expression()?;
        let then_branch = self.parse_block()?;
        let else_branch = if matches!(self.current_token(), Some(Token::Else)) {
            self.advance();
            if matches!(self.current_token(), Some(Token::If)) {
                Some(vec![self.parse_if_statement()?])
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(Token::LBrace)?;
        let mut statements = Vec::new();
        while !matches!(self.current_token(), Some(Token::RBrace)) && self.current_token().is_some()
        {
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
        }
        self.expect(Token::RBrace)?;
        Ok(statements)
    }

    fn parse_assign_statement(&mut self) -> Result<Stmt, ParseError> {
        let name = match self.advance() {
            Some(SpannedToken { token: Token::Ident(name), .. }) => Rc::from(name.as_str()),
            other => {
                let span = other.as_ref().map(|st| st.span).unwrap_or(self.current_span());
                return Err(ParseError::new("expected identifier", span)
                    .with_expected(vec!["identifier".to_string()]));
            }
        };
        self.expect(Token::Assign)?;
        let value = self.expression()?;
        Ok(Stmt::Assign { name, value })
    }

    // === Expression ladder, lowest to highest binding ===

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.logic_or()
    }

    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr, ParseError>,
        map: fn(&Token) -> Option<BinaryOp>,
    ) -> Result<Expr, ParseError> {
        let mut left = next(self)?;
        while let Some(op) = self.current_token().and_then(map) {
            self.advance();
            let right = next(self)?;
            let span = left.span.merge(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            };
        }
        Ok(left)
    }

    fn logic_or(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::logic_and, |token| match token {
            Token::Or => Some(BinaryOp::Or),
            _ => None,
        })
    }

    fn logic_and(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::equality, |token| match token {
            Token::And => Some(BinaryOp::And),
            _ => None,
        })
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::comparison, |token| match token {
            Token::EqEq => Some(BinaryOp::Eq),
            Token::NotEq => Some(BinaryOp::NotEq),
            _ => None,
        })
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::bitwise_or, |token| match token {
            Token::Less => Some(BinaryOp::Less),
            Token::Greater => Some(BinaryOp::Greater),
            Token::LessEq => Some(BinaryOp::LessEq),
            Token::GreaterEq => Some(BinaryOp::GreaterEq),
            _ => None,
        })
    }

    fn bitwise_or(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::bitwise_and, |token| match token {
            Token::Pipe => Some(BinaryOp::BitOr),
            _ => None,
        })
    }

    fn bitwise_and(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::shift, |token| match token {
            Token::Amp => Some(BinaryOp::BitAnd),
            _ => None,
        })
    }

    fn shift(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::additive, |token| match token {
            Token::Shl => Some(BinaryOp::Shl),
            Token::Shr => Some(BinaryOp::Shr),
            _ => None,
        })
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::term, |token| match token {
            Token::Plus => Some(BinaryOp::Add),
            Token::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        self.binary_level(Self::power, |token| match token {
            Token::Star => Some(BinaryOp::Mul),
            Token::Slash => Some(BinaryOp::Div),
            _ => None,
        })
    }

    // Power is right-associative: the right operand recurses on this level.
    fn power(&mut self) -> Result<Expr, ParseError> {
        let left = self.unary()?;
        if matches!(self.current_token(), Some(Token::Caret)) {
            self.advance();
            let right = self.power()?;
            let span = left.span.merge(right.span);
            return Ok(Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op: BinaryOp::Pow,
                    right: Box::new(right),
                },
                span,
            });
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.current_span();
        if matches!(self.current_token(), Some(Token::Tilde)) {
            self.advance();
            let operand = self.unary()?;
            let span = start_span.merge(operand.span);
            return Ok(Expr {
                kind: ExprKind::Unary {
                    op: UnaryOp::BitNot,
                    operand: Box::new(operand),
                },
                span,
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        match self.current_token().cloned() {
            Some(Token::Int(n)) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Int(n)),
                    span,
                })
            }
            Some(Token::Float(n)) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Float(n)),
                    span,
                })
            }
            Some(Token::Str(s)) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Str(Rc::from(s.as_str()))),
                    span,
                })
            }
            Some(Token::True) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Bool(true)),
                    span,
                })
            }
            Some(Token::False) => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::Literal(Value::Bool(false)),
                    span,
                })
            }
            Some(Token::Conv) => self.conversion(),
            Some(Token::Ident(name)) => {
                self.advance();
                if matches!(self.current_token(), Some(Token::LParen)) {
                    self.call_arguments(name, span)
                } else {
                    Ok(Expr {
                        kind: ExprKind::Variable(Rc::from(name.as_str())),
                        span,
                    })
                }
            }
            Some(Token::LParen) => {
                self.advance();
                let expr = self.expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Error(c)) => Err(ParseError::new(
                format!("unrecognized character `{}`", c),
                span,
            )),
            Some(token) => Err(ParseError::new("expected expression", span)
                .with_expected(vec!["expression".to_string()])
                .with_found(format!("{:?}", token))),
            None => Err(ParseError::new(
                "expected expression, found end of input",
                span,
            )),
        }
    }

    fn call_arguments(&mut self, name: String, start_span: Span) -> Result<Expr, ParseError> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if !matches!(self.current_token(), Some(Token::RParen)) {
            loop {
                args.push(self.expression()?);
                if matches!(self.current_token(), Some(Token::Comma)) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let end_span = self.expect(Token::RParen)?;
        Ok(Expr {
            kind: ExprKind::Call {
                name: Rc::from(name.as_str()),
                args,
            },
            span: start_span.merge(end_span),
        })
    }

    fn conversion(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.expect(Token::Conv)?;
        self.expect(Token::LParen)?;
        let value = self.expression()?;
        self.expect(Token::Comma)?;
        let mode = self.expression()?;
        let end_span = self.expect(Token::RParen)?;
        Ok(Expr {
            kind: ExprKind::Convert {
                value: Box::new(value),
                mode: Box::new(mode),
            },
            span: start_span.merge(end_span),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chumsky::Parser as _;

    fn parse(source: &str) -> Vec<Stmt> {
        let tokens = crate::lexer::lexer().parse(source).output().unwrap().clone();
        Parser::from_lexer_output(tokens, source.len())
            .parse()
            .expect("program should parse")
    }

    fn parse_err(source: &str) -> ParseError {
        let tokens = crate::lexer::lexer().parse(source).output().unwrap().clone();
        Parser::from_lexer_output(tokens, source.len())
            .parse()
            .expect_err("parse should fail")
    }

    fn only_expr(source: &str) -> Expr {
        match parse(source).remove(0) {
            Stmt::Print(expr) => expr,
            other => panic!("expected print statement, got {:?}", other),
        }
    }

    #[test]
    fn test_statement_kinds() {
        let stmts = parse(r#"drim(x) wake(x) type(x) y = 1 { wake(y) }"#);
        assert!(matches!(stmts[0], Stmt::Input { .. }));
        assert!(matches!(stmts[1], Stmt::Print(_)));
        assert!(matches!(stmts[2], Stmt::TypeQuery(_)));
        assert!(matches!(stmts[3], Stmt::Assign { .. }));
        assert!(matches!(stmts[4], Stmt::Block(_)));
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = only_expr("wake(1 + 2 * 3)");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Add, right, .. } => {
                assert!(matches!(
                    right.kind,
                    ExprKind::Binary { op: BinaryOp::Mul, .. }
                ));
            }
            other => panic!("expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_power_is_right_associative() {
        let expr = only_expr("wake(2 ^ 3 ^ 2)");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Pow, left, right } => {
                assert!(matches!(left.kind, ExprKind::Literal(Value::Int(2))));
                assert!(matches!(
                    right.kind,
                    ExprKind::Binary { op: BinaryOp::Pow, .. }
                ));
            }
            other => panic!("expected power at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_comparison_binds_looser_than_bitwise_or() {
        let expr = only_expr("wake(1 < 2 | 3)");
        assert!(matches!(
            expr.kind,
            ExprKind::Binary { op: BinaryOp::Less, .. }
        ));
    }

    #[test]
    fn test_shift_binds_looser_than_additive() {
        let expr = only_expr("wake(1 << 2 + 3)");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Shl, right, .. } => {
                assert!(matches!(
                    right.kind,
                    ExprKind::Binary { op: BinaryOp::Add, .. }
                ));
            }
            other => panic!("expected shift at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_grouping() {
        let expr = only_expr("wake((1 + 2) * 3)");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Mul, left, .. } => {
                assert!(matches!(
                    left.kind,
                    ExprKind::Binary { op: BinaryOp::Add, .. }
                ));
            }
            other => panic!("expected multiplication at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_binds_tightest() {
        let expr = only_expr("wake(~1 + 2)");
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Add, left, .. } => {
                assert!(matches!(left.kind, ExprKind::Unary { .. }));
            }
            other => panic!("expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_call_with_arguments() {
        let expr = only_expr("wake(speed(100, 10))");
        match expr.kind {
            ExprKind::Call { name, args } => {
                assert_eq!(name.as_ref(), "speed");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_conversion_expression() {
        let expr = only_expr(r#"wake(conv(10, "in_cm"))"#);
        assert!(matches!(expr.kind, ExprKind::Convert { .. }));
    }

    #[test]
    fn test_else_if_chain() {
        let stmts = parse("if 1 { wake(1) } else if 2 { wake(2) } else { wake(3) }");
        match &stmts[0] {
            Stmt::If { else_branch: Some(else_stmts), .. } => {
                assert_eq!(else_stmts.len(), 1);
                assert!(matches!(
                    else_stmts[0],
                    Stmt::If { else_branch: Some(_), .. }
                ));
            }
            other => panic!("expected if with else, got {:?}", other),
        }
    }

    #[test]
    fn test_boolean_literals() {
        let expr = only_expr("wake(true)");
        assert!(matches!(expr.kind, ExprKind::Literal(Value::Bool(true))));
    }

    #[test]
    fn test_stray_tokens_are_skipped() {
        // A bare identifier and a stray operator cannot begin a statement
        let stmts = parse("x + 1 wake(2)");
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Stmt::Print(_)));
    }

    #[test]
    fn test_missing_close_paren_is_fatal() {
        let err = parse_err("wake(1 + 2");
        assert_eq!(err.expected, vec!["RParen".to_string()]);
    }

    #[test]
    fn test_missing_expression_is_fatal() {
        let err = parse_err("wake()");
        assert!(err.message.contains("expected expression"));
    }

    #[test]
    fn test_error_token_in_expression_is_fatal() {
        let err = parse_err("x = 1 + @");
        assert!(err.message.contains("unrecognized character"));
    }

    #[test]
    fn test_error_token_in_statement_position_is_skipped() {
        let stmts = parse("@ wake(1)");
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_missing_conv_comma_is_fatal() {
        let err = parse_err(r#"x = conv(10 "in_cm")"#);
        assert_eq!(err.expected, vec!["Comma".to_string()]);
    }
}
