use std::fmt;

/// A byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A message anchored to a span.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<String>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn line_content(source: &str, line_num: usize) -> Option<&str> {
    source.lines().nth(line_num - 1)
}

/// Renders diagnostics in the rustc style:
///
/// ```text
/// error[E0201]: undefined variable `x`
///   --> script:3:8
///    |
///  3 |     wake(x)
///    |          ^ not found in this scope
///    |
/// ```
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let severity_str = match diagnostic.severity {
            Severity::Error => self.style("error", "\x1b[1;31m"),
            Severity::Warning => self.style("warning", "\x1b[1;33m"),
        };
        match &diagnostic.code {
            Some(code) => output.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code,
                self.style(&diagnostic.message, "\x1b[1m")
            )),
            None => output.push_str(&format!(
                "{}: {}\n",
                severity_str,
                self.style(&diagnostic.message, "\x1b[1m")
            )),
        }

        if let Some(label) = diagnostic.labels.first() {
            let (line, col) = line_col(self.source, label.span.start);
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.style("-->", "\x1b[34m"),
                self.file_name,
                line,
                col
            ));

            let width = line.to_string().len();
            let gutter = format!("{} {}\n", " ".repeat(width + 1), self.style("|", "\x1b[34m"));
            output.push_str(&gutter);

            if let Some(content) = line_content(self.source, line) {
                output.push_str(&format!(
                    "{:>width$} {} {}\n",
                    self.style(&line.to_string(), "\x1b[34m"),
                    self.style("|", "\x1b[34m"),
                    content,
                    width = width + 1
                ));

                let (end_line, end_col) =
                    line_col(self.source, label.span.end.saturating_sub(1).max(label.span.start));
                let underline_len = if end_line == line {
                    (end_col + 1).saturating_sub(col).max(1)
                } else {
                    content.len().saturating_sub(col - 1).max(1)
                };
                let mut underline = " ".repeat(col - 1);
                underline.push_str(&"^".repeat(underline_len));
                if !label.message.is_empty() {
                    underline.push(' ');
                    underline.push_str(&label.message);
                }
                output.push_str(&format!(
                    "{} {} {}\n",
                    " ".repeat(width + 1),
                    self.style("|", "\x1b[34m"),
                    self.style(&underline, "\x1b[31m")
                ));
            }

            output.push_str(&gutter);
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.style("=", "\x1b[34m"), note));
        }

        output
    }

    fn style(&self, s: &str, code: &str) -> String {
        if self.use_color {
            format!("{}{}\x1b[0m", code, s)
        } else {
            s.to_string()
        }
    }
}

/// Render a batch of diagnostics followed by the abort summary line.
pub fn render_diagnostics(
    source: &str,
    file_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let renderer = DiagnosticRenderer::new(source, file_name, use_color);
    let mut output = String::new();

    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
        output.push('\n');
    }

    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if error_count > 0 {
        output.push_str(&format!(
            "error: aborting due to {} error{}\n",
            error_count,
            if error_count == 1 { "" } else { "s" }
        ));
    }

    output
}
