use crate::diagnostic::{Diagnostic, Label, Span};

#[derive(Debug, Clone)]
pub enum RuntimeError {
    UndefinedVariable { name: String, span: Span },
    TypeError { message: String, span: Span },
    DivisionByZero { span: Span },
    InvalidOperation { message: String, span: Span },
    UnknownFunction { name: String, span: Span },
    ArityMismatch { name: String, expected: usize, got: usize, span: Span },
    UnknownConversion { mode: String, span: Span },
    Io { message: String, span: Span },
}

impl RuntimeError {
    pub fn undefined_variable(name: impl Into<String>, span: Span) -> Self {
        Self::UndefinedVariable { name: name.into(), span }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError { message: message.into(), span: Span::dummy() }
    }

    pub fn type_error_at(message: impl Into<String>, span: Span) -> Self {
        Self::TypeError { message: message.into(), span }
    }

    pub fn division_by_zero(span: Span) -> Self {
        Self::DivisionByZero { span }
    }

    pub fn invalid_operation(message: impl Into<String>, span: Span) -> Self {
        Self::InvalidOperation { message: message.into(), span }
    }

    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into(), span: Span::dummy() }
    }

    pub fn arity_mismatch(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::ArityMismatch { name: name.into(), expected, got, span: Span::dummy() }
    }

    pub fn unknown_conversion(mode: impl Into<String>, span: Span) -> Self {
        Self::UnknownConversion { mode: mode.into(), span }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io { message: message.into(), span: Span::dummy() }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedVariable { span, .. } => *span,
            Self::TypeError { span, .. } => *span,
            Self::DivisionByZero { span } => *span,
            Self::InvalidOperation { span, .. } => *span,
            Self::UnknownFunction { span, .. } => *span,
            Self::ArityMismatch { span, .. } => *span,
            Self::UnknownConversion { span, .. } => *span,
            Self::Io { span, .. } => *span,
        }
    }

    /// Anchors an error raised without position information (native
    /// functions, IO) to the expression that triggered it.
    pub fn at(mut self, at: Span) -> Self {
        let span = match &mut self {
            Self::UndefinedVariable { span, .. } => span,
            Self::TypeError { span, .. } => span,
            Self::DivisionByZero { span } => span,
            Self::InvalidOperation { span, .. } => span,
            Self::UnknownFunction { span, .. } => span,
            Self::ArityMismatch { span, .. } => span,
            Self::UnknownConversion { span, .. } => span,
            Self::Io { span, .. } => span,
        };
        if span.is_dummy() {
            *span = at;
        }
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::UndefinedVariable { name, span } => {
                Diagnostic::error(format!("undefined variable `{}`", name))
                    .with_code("E0201")
                    .with_label(Label::primary(*span, "not found in this scope"))
            }
            Self::TypeError { message, span } => {
                Diagnostic::error(format!("type error: {}", message))
                    .with_code("E0202")
                    .with_label(Label::primary(*span, ""))
            }
            Self::DivisionByZero { span } => Diagnostic::error("division by zero")
                .with_code("E0203")
                .with_label(Label::primary(*span, "division by zero here")),
            Self::InvalidOperation { message, span } => {
                Diagnostic::error(format!("invalid operation: {}", message))
                    .with_code("E0204")
                    .with_label(Label::primary(*span, ""))
            }
            Self::UnknownFunction { name, span } => {
                Diagnostic::error(format!("unknown function `{}`", name))
                    .with_code("E0205")
                    .with_label(Label::primary(*span, "not a native function"))
            }
            Self::ArityMismatch { name, expected, got, span } => Diagnostic::error(format!(
                "`{}` expects {} argument{}, got {}",
                name,
                expected,
                if *expected == 1 { "" } else { "s" },
                got
            ))
            .with_code("E0206")
            .with_label(Label::primary(*span, "wrong number of arguments")),
            Self::UnknownConversion { mode, span } => {
                Diagnostic::error(format!("unknown conversion mode `{}`", mode))
                    .with_code("E0207")
                    .with_label(Label::primary(*span, "no such conversion"))
            }
            Self::Io { message, span } => Diagnostic::error(format!("io error: {}", message))
                .with_code("E0208")
                .with_label(Label::primary(*span, "")),
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::UndefinedVariable { name, .. } => {
                write!(f, "Undefined variable: {}", name)
            }
            RuntimeError::TypeError { message, .. } => write!(f, "Type error: {}", message),
            RuntimeError::DivisionByZero { .. } => write!(f, "Division by zero"),
            RuntimeError::InvalidOperation { message, .. } => {
                write!(f, "Invalid operation: {}", message)
            }
            RuntimeError::UnknownFunction { name, .. } => {
                write!(f, "Unknown function: {}", name)
            }
            RuntimeError::ArityMismatch { name, expected, got, .. } => {
                write!(f, "{} expects {} arguments, got {}", name, expected, got)
            }
            RuntimeError::UnknownConversion { mode, .. } => {
                write!(f, "Unknown conversion mode: {}", mode)
            }
            RuntimeError::Io { message, .. } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for RuntimeError {}
