//! Parse textual field paths such as `.inner.items[2].label` into their
//! individual steps, and compare paths structurally.
use std::fmt;

mod parse;
mod relation;

pub use parse::ParseError;
pub use relation::Relation;

/// A component of a [`Path`] from a source value to a target value.
///
/// Each `Access` goes from a "containing" type (such as a `struct`, a tuple or an array)
/// to a "contained" type. Recursively, until the final access is reached.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Access<'a> {
    /// <https://doc.rust-lang.org/reference/expressions/field-expr.html>
    Field(&'a str),
    /// <https://doc.rust-lang.org/reference/expressions/tuple-expr.html#tuple-indexing-expressions>
    TupleIndex(usize),
    /// <https://doc.rust-lang.org/reference/expressions/array-expr.html#array-and-slice-indexing-expressions>
    ArrayIndex(usize),
}
impl fmt::Display for Access<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Field(name) => write!(f, ".{name}"),
            Access::TupleIndex(index) => write!(f, ".{index}"),
            Access::ArrayIndex(index) => write!(f, "[{index}]"),
        }
    }
}

/// A non-empty list of [`Access`]es, borrowing field names from the parsed string.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Path<'a>(Box<[Access<'a>]>);

impl<'a> Path<'a> {
    /// Split `path` into its [`Access`] steps.
    ///
    /// The leading `.` is optional, `inner.count` and `.inner.count` are
    /// the same path.
    ///
    /// # Errors
    ///
    /// See [`ParseError`] variants.
    pub fn parse(path: &'a str) -> Result<Self, ParseError> {
        parse::parse_path(path).map(Path)
    }
    pub fn accesses(&self) -> &[Access<'a>] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
}
impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|access| access.fmt(f))
    }
}
