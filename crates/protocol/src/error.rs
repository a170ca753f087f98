use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The kind of failure that ended an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The endpoint could not be reached at all.
    Connectivity,
    /// The endpoint answered with a 5xx status.
    ServerError,
    /// The endpoint answered with a 404 status.
    NotFound,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Connectivity => write!(f, "Connectivity failure"),
            ErrorKind::ServerError => write!(f, "Server error"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::Other => write!(f, "Request failed"),
        }
    }
}
