use std::io;

use thiserror::Error;

use crate::input::InputError;

/// Errors surfaced by the box office.
///
/// Running out of seats is not one of them: it is reported as a reservation of `None`.
#[derive(Error, Debug)]
pub enum Error {
    /// Writing the journal or spawning a thread failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The schedule could not be read.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// A client thread panicked before finishing its visit.
    #[error("Client thread panicked: {0}")]
    ClientPanicked(String),
}

/// Result type alias using the box office `Error`.
pub type Result<T> = std::result::Result<T, Error>;
