#[cfg(feature = "reflect")]
use bevy::reflect::ReflectPathError;
use thiserror::Error;

pub type NewResult<T> = Result<T, NewError>;
pub type GetResult<T> = Result<T, GetError>;

/// Failure to bind a proxy with a textual path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewError {
    #[error("Couldn't parse the proxy path: {0}")]
    Parse(#[from] reflect_path::ParseError),

    #[error("Couldn't parse the proxy path: {0}")]
    ReflectPath(String),

    #[error("`{path}` doesn't lead to a `{expected}` in `{owner}`: {reason}")]
    Unreachable {
        path: Box<str>,
        owner: &'static str,
        expected: &'static str,
        reason: String,
    },

    #[error("The owner of `{0}` is mutably borrowed, the path can't be checked")]
    OwnerBorrowed(Box<str>),
}
#[cfg(feature = "reflect")]
impl From<ReflectPathError<'_>> for NewError {
    fn from(value: ReflectPathError<'_>) -> Self {
        NewError::ReflectPath(value.to_string())
    }
}

/// Failure to read or write through a proxy.
///
/// The non-`try_` methods of proxies panic with this error's message instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetError {
    #[error("The owner of `{0}` was dropped, the proxy outlived it")]
    OwnerDropped(Box<str>),

    /// The owner, or a shared object along the path, is borrowed in a way
    /// that conflicts with the access.
    #[error("The owner of `{0}`, or a shared object along it, is already borrowed")]
    OwnerBorrowed(Box<str>),

    #[error("Couldn't follow the proxy path: {0}")]
    ReflectPath(String),
}
#[cfg(feature = "reflect")]
impl From<ReflectPathError<'_>> for GetError {
    fn from(value: ReflectPathError<'_>) -> Self {
        GetError::ReflectPath(value.to_string())
    }
}
