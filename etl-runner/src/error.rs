use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;

use etl::error::EtlError;

/// Returns whether terminal output should include backtraces.
fn should_render_backtrace() -> bool {
    matches!(
        std::env::var("RUST_BACKTRACE").as_deref(),
        Ok("1") | Ok("full")
    )
}

pub type RunnerResult<T> = Result<T, RunnerError>;

/// Backtrace captured when a setup error is created.
pub struct CapturedBacktrace(Backtrace);

impl CapturedBacktrace {
    fn capture() -> Self {
        Self(Backtrace::capture())
    }
}

impl fmt::Debug for CapturedBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type of the runner binary.
///
/// Wraps [`EtlError`] for pipeline failures and provides variants for the binary's own setup.
#[derive(Debug)]
pub enum RunnerError {
    /// Pipeline failure.
    Etl(EtlError),
    /// Configuration could not be loaded or is invalid, or logging could not be set up.
    Config(Box<dyn Error + Send + Sync>, CapturedBacktrace),
    /// I/O failure outside of the pipelines, e.g. building the runtime or reading the event.
    Io(std::io::Error, CapturedBacktrace),
}

impl RunnerError {
    pub fn category(&self) -> &'static str {
        match self {
            RunnerError::Etl(_) => "pipeline error",
            RunnerError::Config(_, _) => "configuration error",
            RunnerError::Io(_, _) => "i/o error",
        }
    }

    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            RunnerError::Etl(err) => err.backtrace(),
            RunnerError::Config(_, cb) => Some(&cb.0),
            RunnerError::Io(_, cb) => Some(&cb.0),
        }
    }

    /// Creates a configuration error from any error type.
    pub fn config<E: Error + Send + Sync + 'static>(err: E) -> Self {
        RunnerError::Config(Box::new(err), CapturedBacktrace::capture())
    }

    /// Returns a user-oriented report for terminal output.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        out.push_str("etl-runner failed\n");
        out.push_str(&format!("category: {}\n", self.category()));
        out.push_str(&format!("error: {self}\n"));

        let mut source = Error::source(self);
        let mut idx = 1usize;
        while let Some(err) = source {
            out.push_str(&format!("cause {idx}: {err}\n"));
            source = err.source();
            idx += 1;
        }

        if should_render_backtrace() {
            if let Some(backtrace) = self.backtrace() {
                out.push_str("backtrace:\n");
                out.push_str(&backtrace.to_string());
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }

        out
    }
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Etl(err) => write!(f, "{err}"),
            RunnerError::Config(source, _) => write!(f, "configuration error: {source}"),
            RunnerError::Io(source, _) => write!(f, "i/o error: {source}"),
        }
    }
}

impl Error for RunnerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RunnerError::Etl(err) => err.source(),
            RunnerError::Config(source, _) => Some(source.as_ref()),
            RunnerError::Io(source, _) => Some(source),
        }
    }
}

impl From<std::io::Error> for RunnerError {
    fn from(err: std::io::Error) -> Self {
        RunnerError::Io(err, CapturedBacktrace::capture())
    }
}

impl From<EtlError> for RunnerError {
    fn from(err: EtlError) -> Self {
        RunnerError::Etl(err)
    }
}
