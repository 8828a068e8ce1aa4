use ariadne::Source;
use solver_engine::Error as SolverError;

/// Utility enum to package errors that can occur while parsing / running methods.
pub enum Error {
    /// Errors that occurred while parsing.
    ParseError(Vec<SolverError>),

    /// An error that occurred while looking up or applying a method.
    MethodError(SolverError),
}

impl Error {
    /// Report the errors in this [`Error`] to stderr.
    pub fn report_to_stderr(&self, input: &str) {
        let errs = match self {
            Self::ParseError(errs) => errs.as_slice(),
            Self::MethodError(err) => std::slice::from_ref(err),
        };
        for err in errs {
            if let Err(io_err) = err.build_report("input").eprint(("input", Source::from(input))) {
                eprintln!("{}", io_err);
            }
        }
    }
}

impl From<Vec<SolverError>> for Error {
    fn from(errs: Vec<SolverError>) -> Self {
        Self::ParseError(errs)
    }
}

impl From<SolverError> for Error {
    fn from(err: SolverError) -> Self {
        Self::MethodError(err)
    }
}
