//! Proxies with a textual path, resolved through bevy's [`Reflect`].
use std::{any, cell::RefCell, fmt, marker::PhantomData, mem, rc::Rc, rc::Weak};

use bevy::reflect::{GetPath, ParsedPath, Reflect};
use log::{debug, trace};
use reflect_path::Path;

use crate::error::{GetError, GetResult, NewError, NewResult};
use crate::mode::{Mode, ReadOnly, ReadWrite};

/// A [`Proxy`](crate::Proxy) to a `V` field of `O`, where the path to the field
/// is a string such as `.inner.items[2].label`.
///
/// The path is checked against the owner when binding the proxy. Unlike
/// [`Proxy`](crate::Proxy), the path may stop resolving afterward, for
/// example when the `Vec` element it points to is removed. In this case,
/// `get` and `set` panic, and the `try_` methods return [`GetError::ReflectPath`].
pub struct ReflectProxy<O, V, M = ReadWrite> {
    owner: Weak<RefCell<O>>,
    path: Box<str>,
    _types: PhantomData<(fn() -> V, M)>,
}

impl<O: Reflect, V: Reflect> ReflectProxy<O, V, ReadOnly> {
    /// Bind a proxy that can only read the `V` at `path` in `owner`.
    ///
    /// # Errors
    ///
    /// When `path` is not a valid path, doesn't lead to a `V`, or `owner`
    /// is mutably borrowed.
    pub fn read_only(owner: &Rc<RefCell<O>>, path: &str) -> NewResult<Self> {
        Self::bind(owner, path)
    }
}
impl<O: Reflect, V: Reflect> ReflectProxy<O, V, ReadWrite> {
    /// Bind a proxy that can read and write the `V` at `path` in `owner`.
    ///
    /// # Errors
    ///
    /// Same as [`ReflectProxy::read_only`].
    pub fn read_write(owner: &Rc<RefCell<O>>, path: &str) -> NewResult<Self> {
        Self::bind(owner, path)
    }
    /// Forbid writing through this proxy.
    pub fn into_read_only(self) -> ReflectProxy<O, V, ReadOnly> {
        let Self { owner, path, .. } = self;
        ReflectProxy { owner, path, _types: PhantomData }
    }
    /// Run `f` on the proxied field, with exclusive access to it.
    pub fn update<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        let owner = self.upgrade();
        let mut owner = owner.borrow_mut();
        match self.resolve_mut(&mut owner) {
            Ok(field) => f(field),
            Err(err) => panic!("{err}"),
        }
    }
    /// Set the proxied field to `value`.
    pub fn set(&self, value: V) {
        self.update(|field| *field = value);
    }
    /// Set the proxied field to `value`, returning its previous value.
    pub fn replace(&self, value: V) -> V {
        self.update(|field| mem::replace(field, value))
    }
    /// Like [`ReflectProxy::update`], but returns an error instead of
    /// panicking if the owner was dropped or borrowed, or the path stopped resolving.
    pub fn try_update<R>(&self, f: impl FnOnce(&mut V) -> R) -> GetResult<R> {
        let owner = self.try_upgrade()?;
        let mut owner = owner.try_borrow_mut().map_err(|_| self.borrowed())?;
        Ok(f(self.resolve_mut(&mut owner)?))
    }
    pub fn try_set(&self, value: V) -> GetResult<()> {
        self.try_update(|field| *field = value)
    }
}
impl<O: Reflect, V: Reflect, M: Mode> ReflectProxy<O, V, M> {
    fn bind(owner: &Rc<RefCell<O>>, path: &str) -> NewResult<Self> {
        let path: Box<str> = Path::parse(path)?.to_string().into();
        ParsedPath::parse(&path)?;

        let unreachable = |reason: String| {
            debug!("Proxy path `{path}` doesn't resolve: {reason}");
            NewError::Unreachable {
                path: path.clone(),
                owner: any::type_name::<O>(),
                expected: any::type_name::<V>(),
                reason,
            }
        };
        {
            let owner = owner.try_borrow().map_err(|_| NewError::OwnerBorrowed(path.clone()))?;
            if let Err(err) = owner.as_reflect().path::<V>(&path) {
                return Err(unreachable(err.to_string()));
            }
        }
        let proxy = ReflectProxy { owner: Rc::downgrade(owner), path, _types: PhantomData };
        trace!("Bound {} reflect proxy `{proxy}`", M::NAME);
        Ok(proxy)
    }
    fn upgrade(&self) -> Rc<RefCell<O>> {
        match self.owner.upgrade() {
            Some(owner) => owner,
            None => panic!("{}", GetError::OwnerDropped(self.path.clone())),
        }
    }
    fn try_upgrade(&self) -> GetResult<Rc<RefCell<O>>> {
        self.owner.upgrade().ok_or_else(|| GetError::OwnerDropped(self.path.clone()))
    }
    fn borrowed(&self) -> GetError {
        GetError::OwnerBorrowed(self.path.clone())
    }
    fn resolve<'o>(&self, owner: &'o O) -> GetResult<&'o V> {
        Ok(owner.as_reflect().path::<V>(&self.path)?)
    }
    fn resolve_mut<'o>(&self, owner: &'o mut O) -> GetResult<&'o mut V> {
        Ok(owner.as_reflect_mut().path_mut::<V>(&self.path)?)
    }
    /// Run `f` on the proxied field.
    pub fn with<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        let owner = self.upgrade();
        let owner = owner.borrow();
        match self.resolve(&owner) {
            Ok(field) => f(field),
            Err(err) => panic!("{err}"),
        }
    }
    /// The current value of the proxied field.
    pub fn get(&self) -> V
    where
        V: Clone,
    {
        self.with(Clone::clone)
    }
    /// Like [`ReflectProxy::with`], but returns an error instead of panicking.
    pub fn try_with<R>(&self, f: impl FnOnce(&V) -> R) -> GetResult<R> {
        let owner = self.try_upgrade()?;
        let owner = owner.try_borrow().map_err(|_| self.borrowed())?;
        Ok(f(self.resolve(&owner)?))
    }
    pub fn try_get(&self) -> GetResult<V>
    where
        V: Clone,
    {
        self.try_with(Clone::clone)
    }
    /// Whether the owner of this proxy is still alive.
    pub fn is_bound(&self) -> bool {
        self.owner.strong_count() != 0
    }
    /// The owner of this proxy, if it is still alive.
    pub fn owner(&self) -> Option<Rc<RefCell<O>>> {
        self.owner.upgrade()
    }
    /// The canonical form of the proxied path, such as `.inner.count`.
    pub fn path(&self) -> &str {
        &self.path
    }
    /// Whether `self` and `other` may access the same storage.
    ///
    /// See [`Proxy::aliases`](crate::Proxy::aliases).
    pub fn aliases<W: Reflect, N: Mode>(&self, other: &ReflectProxy<O, W, N>) -> bool {
        if !self.owner.ptr_eq(&other.owner) {
            return false;
        }
        // Both paths were successfully parsed in `bind`.
        match (Path::parse(&self.path), Path::parse(&other.path)) {
            (Ok(lhs), Ok(rhs)) => lhs.relation(&rhs).overlaps(),
            _ => self.path == other.path,
        }
    }
}

impl<O, V, M> fmt::Display for ReflectProxy<O, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
impl<O, V, M: Mode> fmt::Debug for ReflectProxy<O, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectProxy")
            .field("path", &self.path)
            .field("value", &any::type_name::<V>())
            .field("write", &M::WRITE)
            .field("bound", &(self.owner.strong_count() != 0))
            .finish()
    }
}
impl<O, V, M> Clone for ReflectProxy<O, V, M> {
    fn clone(&self) -> Self {
        ReflectProxy { owner: self.owner.clone(), path: self.path.clone(), _types: PhantomData }
    }
}
