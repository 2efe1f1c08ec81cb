//! Access modes of a proxy, as type-level markers.
//!
//! Methods that write through a proxy only exist when its mode is
//! [`ReadWrite`], so writing through a [`ReadOnly`] proxy is a compile error
//! rather than a runtime failure.

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ReadOnly {}
    impl Sealed for super::ReadWrite {}
}

/// Either [`ReadOnly`] or [`ReadWrite`].
pub trait Mode: sealed::Sealed + 'static {
    const WRITE: bool;
    const NAME: &'static str;
}

/// The proxy may only read its field.
#[derive(Debug, Clone, Copy)]
pub enum ReadOnly {}

/// The proxy may read and write its field.
#[derive(Debug, Clone, Copy)]
pub enum ReadWrite {}

impl Mode for ReadOnly {
    const WRITE: bool = false;
    const NAME: &'static str = "read-only";
}
impl Mode for ReadWrite {
    const WRITE: bool = true;
    const NAME: &'static str = "read-write";
}
