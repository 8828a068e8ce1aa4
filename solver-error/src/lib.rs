//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.

use ariadne::{Color, Label, Report, ReportKind};
use std::{fmt::{self, Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
///
/// Implementations are usually derived with `solver_attrs::ErrorKind`.
pub trait ErrorKind: Debug + Send + Sync {
    /// The headline of the error.
    fn message(&self) -> String;

    /// The text of the labels pointing at each span of the error, in span order.
    fn labels(&self) -> Vec<String> {
        Vec::new()
    }

    /// Optional help text describing what the user can do to fix the error.
    fn help(&self) -> Option<String> {
        None
    }

    /// Builds the report for this error.
    ///
    /// Errors raised while building trees programmatically have no spans; their report consists
    /// of the message and help only.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let offset = spans.first().map(|span| span.start).unwrap_or(0);
        let mut labels = self.labels().into_iter();
        let mut builder = Report::build(ReportKind::Error, src_id, offset)
            .with_message(self.message())
            .with_labels(spans.iter().map(|span| {
                let label = Label::new((src_id, span.clone())).with_color(EXPR);
                match labels.next() {
                    Some(text) if !text.is_empty() => label.with_message(text),
                    _ => label,
                }
            }));

        if let Some(help) = self.help() {
            builder.set_help(help);
        }
        builder.finish()
    }
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates an error that is not attached to any source code.
    pub fn unspanned(kind: impl ErrorKind + 'static) -> Self {
        Self::new(Vec::new(), kind)
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Writes the report of this error for the given source code into a string.
    pub fn report_string(&self, src_id: &str, input: &str) -> String {
        let mut buf = Vec::new();
        let source = ariadne::Source::from(input);
        // writing into a `Vec` cannot fail
        let _ = self.build_report(src_id).write((src_id, source), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())?;
        if let Some(help) = self.kind.help() {
            write!(f, " ({})", help)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
