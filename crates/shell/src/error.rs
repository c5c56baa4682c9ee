use thiserror::Error;

/// Failures of the terminal itself. Database failures never end up here;
/// they are shown in the error area instead.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),
}
