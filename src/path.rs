//! Statically typed paths from an owner to one of its nested fields.
//!
//! A path is a chain of steps. Each step goes from a containing type to a
//! contained type:
//! - [`Field`]: a named field that can only be read.
//! - [`FieldMut`]: a named field that can be read and written.
//! - [`Index`]: an element of a `Vec`.
//! - [`Shared`]: cross into an intermediate `Rc<RefCell<_>>` object, so that
//!   changes made through other references to it are seen by the path.
//!
//! Steps are chained with the [`PathExt`] methods. A chain implements
//! [`WritePath`] when every one of its steps does. [`Shared`] is writable even
//! after read-only steps: it only needs a shared reference to the `Rc` it
//! crosses into.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use cuicui_proxy::path::{field, PathExt, ReadPath, WritePath};
//!
//! struct Nested { label: String }
//! struct Storage { nested: Rc<RefCell<Nested>> }
//!
//! let label = field("nested", |s: &Storage| &s.nested)
//!     .shared()
//!     .field_mut("label", |n: &Nested| &n.label, |n| &mut n.label);
//!
//! let storage = Storage { nested: Rc::new(RefCell::new(Nested { label: "a".into() })) };
//! assert_eq!(label.read(&storage, |label| label.clone()), "a");
//! assert_eq!(label.to_path_string(), ".nested.label");
//!
//! let storage = RefCell::new(storage);
//! let _reading = storage.borrow();
//! label.write_in(&storage, |label| label.push('b'));
//! assert_eq!(storage.borrow().nested.borrow().label, "ab");
//! ```
use std::cell::{BorrowError, BorrowMutError, RefCell};
use std::{fmt, marker::PhantomData, rc::Rc};

use thiserror::Error;

/// A `RefCell` along a path is already borrowed in a conflicting way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("A shared object along the path is already borrowed")]
pub struct Borrowed;

impl From<BorrowError> for Borrowed {
    fn from(_: BorrowError) -> Self {
        Borrowed
    }
}
impl From<BorrowMutError> for Borrowed {
    fn from(_: BorrowMutError) -> Self {
        Borrowed
    }
}

/// A path that can read a `Self::Value` from a `T`.
pub trait ReadPath<T> {
    type Value;

    /// Run `f` with a reference to the field at the end of this path.
    fn read<R>(&self, from: &T, f: impl FnOnce(&Self::Value) -> R) -> R;

    /// Like [`ReadPath::read`], but returns [`Borrowed`] instead of panicking
    /// when a shared object along the path is mutably borrowed.
    ///
    /// Steps that don't cross a `RefCell` can keep the default.
    fn try_read<R>(&self, from: &T, f: impl FnOnce(&Self::Value) -> R) -> Result<R, Borrowed> {
        Ok(self.read(from, f))
    }

    /// Write the canonical textual form of this path, such as `.inner.count`.
    fn fmt_path(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    fn to_path_string(&self) -> String
    where
        Self: Sized,
    {
        struct Render<'a, P, T>(&'a P, PhantomData<fn(&T)>);
        impl<P: ReadPath<T>, T> fmt::Display for Render<'_, P, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_path(f)
            }
        }
        Render(self, PhantomData).to_string()
    }
}

/// A [`ReadPath`] that can also write to its field.
pub trait WritePath<T>: ReadPath<T> {
    /// Run `f` with an exclusive reference to the field at the end of this path.
    fn write<R>(&self, from: &mut T, f: impl FnOnce(&mut Self::Value) -> R) -> R;

    /// Like [`WritePath::write`], but returns [`Borrowed`] instead of panicking
    /// when a shared object along the path is already borrowed.
    fn try_write<R>(&self, from: &mut T, f: impl FnOnce(&mut Self::Value) -> R) -> Result<R, Borrowed> {
        Ok(self.write(from, f))
    }

    /// Run `f` with an exclusive reference to the field at the end of this
    /// path, starting from the `RefCell` holding the `T`.
    ///
    /// `from` is borrowed mutably, unless the path crosses a [`Shared`]
    /// object, then `from` is only borrowed immutably.
    fn write_in<R>(&self, from: &RefCell<T>, f: impl FnOnce(&mut Self::Value) -> R) -> R {
        self.write(&mut *from.borrow_mut(), f)
    }

    /// Like [`WritePath::write_in`], but returns [`Borrowed`] instead of
    /// panicking on conflicting borrows.
    fn try_write_in<R>(
        &self,
        from: &RefCell<T>,
        f: impl FnOnce(&mut Self::Value) -> R,
    ) -> Result<R, Borrowed> {
        self.try_write(&mut *from.try_borrow_mut()?, f)
    }
}

/// A read-only named field. See [`field`].
pub struct Field<T, U> {
    name: &'static str,
    read: fn(&T) -> &U,
}
/// A writable named field. See [`field_mut`].
pub struct FieldMut<T, U> {
    name: &'static str,
    read: fn(&T) -> &U,
    write: fn(&mut T) -> &mut U,
}
/// The element at `index` in a `Vec<U>`. See [`index`].
///
/// Reading or writing an out of bound index panics.
pub struct Index<U> {
    index: usize,
    _element: PhantomData<fn() -> U>,
}
/// The inside of the `Rc<RefCell<U>>` at the end of the path `A`. See [`shared`].
///
/// Reading borrows the `RefCell`, writing borrows it mutably, so the
/// usual `RefCell` panics apply. Writing only needs shared access to the
/// path leading to the `Rc`, so `A` may be read-only.
pub struct Shared<A, U> {
    to: A,
    _inner: PhantomData<fn() -> U>,
}

/// `A`, then `B`.
#[derive(Clone, Copy)]
pub struct Then<A, B>(A, B);

/// A read-only field of `T` named `name`.
///
/// `name` is only used for display and aliasing detection.
pub fn field<T, U>(name: &'static str, read: fn(&T) -> &U) -> Field<T, U> {
    Field { name, read }
}
/// A writable field of `T` named `name`.
pub fn field_mut<T, U>(
    name: &'static str,
    read: fn(&T) -> &U,
    write: fn(&mut T) -> &mut U,
) -> FieldMut<T, U> {
    FieldMut { name, read, write }
}
/// The element at `index` of a `Vec<U>`, displayed as `[index]`.
pub fn index<U>(index: usize) -> Index<U> {
    Index { index, _element: PhantomData }
}
/// Cross into the `Rc<RefCell<U>>` that `to` leads to.
///
/// This adds nothing to the textual form of the path.
pub fn shared<A, U>(to: A) -> Shared<A, U> {
    Shared { to, _inner: PhantomData }
}

impl<T, U> ReadPath<T> for Field<T, U> {
    type Value = U;

    fn read<R>(&self, from: &T, f: impl FnOnce(&U) -> R) -> R {
        f((self.read)(from))
    }
    fn fmt_path(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.name)
    }
}
impl<T, U> ReadPath<T> for FieldMut<T, U> {
    type Value = U;

    fn read<R>(&self, from: &T, f: impl FnOnce(&U) -> R) -> R {
        f((self.read)(from))
    }
    fn fmt_path(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.name)
    }
}
impl<T, U> WritePath<T> for FieldMut<T, U> {
    fn write<R>(&self, from: &mut T, f: impl FnOnce(&mut U) -> R) -> R {
        f((self.write)(from))
    }
}
impl<U> ReadPath<Vec<U>> for Index<U> {
    type Value = U;

    fn read<R>(&self, from: &Vec<U>, f: impl FnOnce(&U) -> R) -> R {
        f(&from[self.index])
    }
    fn fmt_path(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.index)
    }
}
impl<U> WritePath<Vec<U>> for Index<U> {
    fn write<R>(&self, from: &mut Vec<U>, f: impl FnOnce(&mut U) -> R) -> R {
        f(&mut from[self.index])
    }
}
impl<T, A, U> ReadPath<T> for Shared<A, U>
where
    A: ReadPath<T, Value = Rc<RefCell<U>>>,
{
    type Value = U;

    fn read<R>(&self, from: &T, f: impl FnOnce(&U) -> R) -> R {
        self.to.read(from, |shared| f(&*shared.borrow()))
    }
    fn try_read<R>(&self, from: &T, f: impl FnOnce(&U) -> R) -> Result<R, Borrowed> {
        let read = |shared: &Rc<RefCell<U>>| shared.try_borrow().map(|shared| f(&*shared));
        Ok(self.to.try_read(from, read)??)
    }
    fn fmt_path(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to.fmt_path(f)
    }
}
impl<T, A, U> WritePath<T> for Shared<A, U>
where
    A: ReadPath<T, Value = Rc<RefCell<U>>>,
{
    fn write<R>(&self, from: &mut T, f: impl FnOnce(&mut U) -> R) -> R {
        self.to.read(from, |shared| f(&mut *shared.borrow_mut()))
    }
    fn try_write<R>(&self, from: &mut T, f: impl FnOnce(&mut U) -> R) -> Result<R, Borrowed> {
        let write = |shared: &Rc<RefCell<U>>| shared.try_borrow_mut().map(|mut shared| f(&mut *shared));
        Ok(self.to.try_read(from, write)??)
    }
    fn write_in<R>(&self, from: &RefCell<T>, f: impl FnOnce(&mut U) -> R) -> R {
        self.to.read(&*from.borrow(), |shared| f(&mut *shared.borrow_mut()))
    }
    fn try_write_in<R>(&self, from: &RefCell<T>, f: impl FnOnce(&mut U) -> R) -> Result<R, Borrowed> {
        let from = from.try_borrow()?;
        let write = |shared: &Rc<RefCell<U>>| shared.try_borrow_mut().map(|mut shared| f(&mut *shared));
        Ok(self.to.try_read(&*from, write)??)
    }
}
impl<T, A, B> ReadPath<T> for Then<A, B>
where
    A: ReadPath<T>,
    B: ReadPath<A::Value>,
{
    type Value = B::Value;

    fn read<R>(&self, from: &T, f: impl FnOnce(&B::Value) -> R) -> R {
        self.0.read(from, |middle| self.1.read(middle, f))
    }
    fn try_read<R>(&self, from: &T, f: impl FnOnce(&B::Value) -> R) -> Result<R, Borrowed> {
        self.0.try_read(from, |middle| self.1.try_read(middle, f))?
    }
    fn fmt_path(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_path(f)?;
        self.1.fmt_path(f)
    }
}
impl<T, A, B> WritePath<T> for Then<A, B>
where
    A: WritePath<T>,
    B: WritePath<A::Value>,
{
    fn write<R>(&self, from: &mut T, f: impl FnOnce(&mut B::Value) -> R) -> R {
        self.0.write(from, |middle| self.1.write(middle, f))
    }
    fn try_write<R>(&self, from: &mut T, f: impl FnOnce(&mut B::Value) -> R) -> Result<R, Borrowed> {
        self.0.try_write(from, |middle| self.1.try_write(middle, f))?
    }
    fn write_in<R>(&self, from: &RefCell<T>, f: impl FnOnce(&mut B::Value) -> R) -> R {
        self.0.write_in(from, |middle| self.1.write(middle, f))
    }
    fn try_write_in<R>(
        &self,
        from: &RefCell<T>,
        f: impl FnOnce(&mut B::Value) -> R,
    ) -> Result<R, Borrowed> {
        self.0.try_write_in(from, |middle| self.1.try_write(middle, f))?
    }
}

/// Chain more steps after a path.
pub trait PathExt<T>: ReadPath<T> + Sized {
    fn then<B: ReadPath<Self::Value>>(self, next: B) -> Then<Self, B> {
        Then(self, next)
    }
    fn field<U>(self, name: &'static str, read: fn(&Self::Value) -> &U) -> Then<Self, Field<Self::Value, U>> {
        Then(self, field(name, read))
    }
    fn field_mut<U>(
        self,
        name: &'static str,
        read: fn(&Self::Value) -> &U,
        write: fn(&mut Self::Value) -> &mut U,
    ) -> Then<Self, FieldMut<Self::Value, U>> {
        Then(self, field_mut(name, read, write))
    }
    fn index<U>(self, at: usize) -> Then<Self, Index<U>>
    where
        Self: ReadPath<T, Value = Vec<U>>,
    {
        Then(self, index(at))
    }
    fn shared<U>(self) -> Shared<Self, U>
    where
        Self: ReadPath<T, Value = Rc<RefCell<U>>>,
    {
        shared(self)
    }
}
impl<T, P: ReadPath<T>> PathExt<T> for P {}

// Manual impls, since derives would require `T: Clone` and `U: Clone`.
impl<T, U> Clone for Field<T, U> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, U> Copy for Field<T, U> {}
impl<T, U> Clone for FieldMut<T, U> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, U> Copy for FieldMut<T, U> {}
impl<U> Clone for Index<U> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<U> Copy for Index<U> {}
impl<A: Clone, U> Clone for Shared<A, U> {
    fn clone(&self) -> Self {
        shared(self.to.clone())
    }
}
impl<A: Copy, U> Copy for Shared<A, U> {}
