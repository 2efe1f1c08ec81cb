use std::{cell::RefCell, fmt, marker::PhantomData, mem, rc::Rc, rc::Weak};

use log::trace;
use reflect_path::Path;

use crate::error::{GetError, GetResult};
use crate::mode::{Mode, ReadOnly, ReadWrite};
use crate::path::{ReadPath, WritePath};

/// Forward reads, and writes when `M` is [`ReadWrite`], to the field at the end
/// of `path` in the owner `O`.
///
/// A `Proxy` keeps a [`Weak`] reference to its owner: it never keeps it alive.
/// Every read follows `path` again from the owner, so changes to the owner
/// made through any other reference are always visible. Similarly, writes
/// are visible to any other holder of the owner.
///
/// The methods without `try_` panic if the owner was dropped or is borrowed
/// in a conflicting way (see [`RefCell`]). A proxy outliving its owner is a bug
/// of the code holding the proxy.
pub struct Proxy<O, P, M = ReadWrite> {
    owner: Weak<RefCell<O>>,
    path: P,
    _mode: PhantomData<M>,
}

impl<O, P: ReadPath<O>> Proxy<O, P, ReadOnly> {
    /// Bind a proxy that can only read the field at `path` in `owner`.
    pub fn read_only(owner: &Rc<RefCell<O>>, path: P) -> Self {
        Self::bind(Rc::downgrade(owner), path)
    }
    /// Same as [`Proxy::read_only`], but from a [`Weak`] reference.
    ///
    /// Useful in [`Rc::new_cyclic`], where the owner can't be upgraded yet.
    pub fn read_only_weak(owner: Weak<RefCell<O>>, path: P) -> Self {
        Self::bind(owner, path)
    }
}
impl<O, P: WritePath<O>> Proxy<O, P, ReadWrite> {
    /// Bind a proxy that can read and write the field at `path` in `owner`.
    ///
    /// `path` must be a [`WritePath`]: all of its steps after the last
    /// [`Shared`](crate::path::Shared) object must be writable.
    pub fn read_write(owner: &Rc<RefCell<O>>, path: P) -> Self {
        Self::bind(Rc::downgrade(owner), path)
    }
    /// Same as [`Proxy::read_write`], but from a [`Weak`] reference.
    pub fn read_write_weak(owner: Weak<RefCell<O>>, path: P) -> Self {
        Self::bind(owner, path)
    }
    /// Forbid writing through this proxy.
    pub fn into_read_only(self) -> Proxy<O, P, ReadOnly> {
        let Self { owner, path, .. } = self;
        Proxy { owner, path, _mode: PhantomData }
    }
    /// Run `f` on the proxied field, with exclusive access to it.
    ///
    /// When `path` crosses a [`Shared`](crate::path::Shared) object, the
    /// owner is only borrowed immutably. So a proxy stored in its own owner
    /// can write to such a path while the owner is borrowed.
    pub fn update<R>(&self, f: impl FnOnce(&mut P::Value) -> R) -> R {
        self.path.write_in(&self.upgrade(), f)
    }
    /// Set the proxied field to `value`.
    pub fn set(&self, value: P::Value) {
        self.update(|field| *field = value);
    }
    /// Set the proxied field to `value`, returning its previous value.
    pub fn replace(&self, value: P::Value) -> P::Value {
        self.update(|field| mem::replace(field, value))
    }
    /// Like [`Proxy::update`], but returns an error instead of panicking
    /// if the owner was dropped, or it or a shared object along the path is
    /// already borrowed.
    pub fn try_update<R>(&self, f: impl FnOnce(&mut P::Value) -> R) -> GetResult<R> {
        let owner = self.try_upgrade()?;
        self.path.try_write_in(&owner, f).map_err(|_| self.borrowed())
    }
    pub fn try_set(&self, value: P::Value) -> GetResult<()> {
        self.try_update(|field| *field = value)
    }
}
impl<O, P: ReadPath<O>, M: Mode> Proxy<O, P, M> {
    fn bind(owner: Weak<RefCell<O>>, path: P) -> Self {
        let proxy = Proxy { owner, path, _mode: PhantomData };
        trace!("Bound {} proxy `{proxy}`", M::NAME);
        proxy
    }
    fn upgrade(&self) -> Rc<RefCell<O>> {
        match self.owner.upgrade() {
            Some(owner) => owner,
            None => panic!("{}", GetError::OwnerDropped(self.path().into())),
        }
    }
    fn try_upgrade(&self) -> GetResult<Rc<RefCell<O>>> {
        self.owner.upgrade().ok_or_else(|| GetError::OwnerDropped(self.path().into()))
    }
    fn borrowed(&self) -> GetError {
        GetError::OwnerBorrowed(self.path().into())
    }
    /// Run `f` on the proxied field.
    pub fn with<R>(&self, f: impl FnOnce(&P::Value) -> R) -> R {
        let owner = self.upgrade();
        let owner = owner.borrow();
        self.path.read(&owner, f)
    }
    /// The current value of the proxied field.
    pub fn get(&self) -> P::Value
    where
        P::Value: Clone,
    {
        self.with(Clone::clone)
    }
    /// Like [`Proxy::with`], but returns an error instead of panicking
    /// if the owner was dropped, or it or a shared object along the path is
    /// mutably borrowed.
    pub fn try_with<R>(&self, f: impl FnOnce(&P::Value) -> R) -> GetResult<R> {
        let owner = self.try_upgrade()?;
        let owner = owner.try_borrow().map_err(|_| self.borrowed())?;
        self.path.try_read(&owner, f).map_err(|_| self.borrowed())
    }
    pub fn try_get(&self) -> GetResult<P::Value>
    where
        P::Value: Clone,
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
    /// The textual form of the proxied path, such as `.inner.count`.
    pub fn path(&self) -> String {
        self.path.to_path_string()
    }
    /// Whether `self` and `other` may access the same storage.
    ///
    /// This is the case when both have the same owner, and one's path is
    /// equal to, or a prefix of, the other's path.
    pub fn aliases<Q: ReadPath<O>, N: Mode>(&self, other: &Proxy<O, Q, N>) -> bool {
        if !self.owner.ptr_eq(&other.owner) {
            return false;
        }
        let (self_path, other_path) = (self.path(), other.path());
        match (Path::parse(&self_path), Path::parse(&other_path)) {
            (Ok(lhs), Ok(rhs)) => lhs.relation(&rhs).overlaps(),
            // Field names that are not valid path syntax, compare them as-is.
            _ => self_path == other_path,
        }
    }
}

impl<O, P: ReadPath<O>, M> fmt::Display for Proxy<O, P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt_path(f)
    }
}
impl<O, P: ReadPath<O>, M: Mode> fmt::Debug for Proxy<O, P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("path", &self.path())
            .field("write", &M::WRITE)
            .field("bound", &self.is_bound())
            .finish()
    }
}
impl<O, P: Clone, M> Clone for Proxy<O, P, M> {
    fn clone(&self) -> Self {
        Proxy { owner: self.owner.clone(), path: self.path.clone(), _mode: PhantomData }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{field, field_mut, Field, FieldMut, PathExt, Shared, Then};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Inner {
        count: i32,
        label: String,
        scores: Vec<u32>,
    }
    struct Storage {
        inner: Inner,
    }
    type InnerStep = FieldMut<Storage, Inner>;
    type ReadOnlyCount = Proxy<Storage, Then<InnerStep, Field<Inner, i32>>, ReadOnly>;
    type Label = Proxy<Storage, Then<InnerStep, FieldMut<Inner, String>>>;

    fn storage() -> Rc<RefCell<Storage>> {
        let inner = Inner { count: 0, label: "a".to_owned(), scores: vec![1, 2] };
        Rc::new(RefCell::new(Storage { inner }))
    }
    fn inner() -> InnerStep {
        field_mut("inner", |s: &Storage| &s.inner, |s| &mut s.inner)
    }
    fn count(storage: &Rc<RefCell<Storage>>) -> ReadOnlyCount {
        Proxy::read_only(storage, inner().field("count", |i: &Inner| &i.count))
    }
    fn label(storage: &Rc<RefCell<Storage>>) -> Label {
        Proxy::read_write(storage, inner().field_mut("label", |i: &Inner| &i.label, |i| &mut i.label))
    }

    #[test]
    fn read_only_observes_external_mutation() {
        let storage = storage();
        let count = count(&storage);
        assert_eq!(0, count.get());

        storage.borrow_mut().inner.count = 5;
        assert_eq!(5, count.get());

        storage.borrow_mut().inner = Inner { count: 7, label: String::new(), scores: vec![] };
        assert_eq!(7, count.get());
    }
    #[test]
    fn read_write_writes_through() {
        let storage = storage();
        let label = label(&storage);
        assert_eq!("a", label.get());

        label.set("b".to_owned());
        assert_eq!("b", label.get());
        assert_eq!("b", storage.borrow().inner.label);
    }
    #[test]
    fn read_write_observes_external_mutation() {
        let storage = storage();
        let label = label(&storage);

        storage.borrow_mut().inner.label = "New value".to_owned();
        assert_eq!("New value", label.get());
    }
    #[test]
    fn replace_and_update() {
        let storage = storage();
        let label = label(&storage);

        assert_eq!("a", label.replace("b".to_owned()));
        let len = label.update(|label| {
            label.push('c');
            label.len()
        });
        assert_eq!(2, len);
        assert_eq!("bc", storage.borrow().inner.label);
        assert_eq!(2, label.with(String::len));
    }
    #[test]
    fn indexed_element() {
        let storage = storage();
        let second = Proxy::read_write(
            &storage,
            inner().field_mut("scores", |i: &Inner| &i.scores, |i| &mut i.scores).index(1),
        );
        assert_eq!(2, second.get());
        second.set(20);
        assert_eq!(vec![1, 20], storage.borrow().inner.scores);
        assert_eq!(".inner.scores[1]", second.path());
    }
    #[test]
    fn same_path_proxies_are_equivalent() {
        let storage = storage();
        let (first, second) = (label(&storage), label(&storage));

        first.set("from first".to_owned());
        assert_eq!("from first", second.get());
        second.set("from second".to_owned());
        assert_eq!("from second", first.get());

        assert!(first.aliases(&second));
        assert!(first.clone().aliases(&first));
    }
    #[test]
    fn aliasing() {
        let other_storage = storage();
        let storage = storage();
        let whole_inner = Proxy::read_only(&storage, inner());

        assert!(whole_inner.aliases(&count(&storage)));
        assert!(count(&storage).aliases(&whole_inner));
        assert!(!count(&storage).aliases(&label(&storage)));
        assert!(!count(&storage).aliases(&count(&other_storage)));
    }
    #[test]
    fn shared_intermediate_object() {
        struct Nested {
            label: String,
        }
        struct Owner {
            nested: Rc<RefCell<Nested>>,
        }
        let nested = Rc::new(RefCell::new(Nested { label: "a".to_owned() }));
        let owner = Rc::new(RefCell::new(Owner { nested: Rc::clone(&nested) }));
        let path = field_mut("nested", |o: &Owner| &o.nested, |o| &mut o.nested)
            .shared()
            .field_mut("label", |n: &Nested| &n.label, |n| &mut n.label);
        let label = Proxy::read_write(&owner, path);

        nested.borrow_mut().label = "external".to_owned();
        assert_eq!("external", label.get());

        label.set("proxied".to_owned());
        assert_eq!("proxied", nested.borrow().label);
        assert_eq!(".nested.label", label.to_string());
    }
    #[test]
    fn write_blocked_variant_still_reads() {
        let storage = storage();
        let label = label(&storage).into_read_only();

        storage.borrow_mut().inner.label = "z".to_owned();
        assert_eq!("z", label.get());
    }
    #[test]
    fn does_not_keep_owner_alive() {
        let storage = storage();
        let count = count(&storage);
        assert!(count.is_bound());
        assert!(count.owner().is_some());

        drop(storage);
        assert!(!count.is_bound());
        assert!(count.owner().is_none());
        assert_eq!(Err(GetError::OwnerDropped(".inner.count".into())), count.try_get());
    }
    #[test]
    #[should_panic(expected = "was dropped")]
    fn get_after_owner_dropped_panics() {
        let storage = storage();
        let count = count(&storage);
        drop(storage);
        count.get();
    }
    #[test]
    fn try_methods_report_borrows() {
        let storage = storage();
        let count = count(&storage);
        let label = label(&storage);

        let guard = storage.borrow_mut();
        assert_eq!(Err(GetError::OwnerBorrowed(".inner.count".into())), count.try_get());
        drop(guard);

        let guard = storage.borrow();
        assert_eq!(Ok(0), count.try_get());
        assert_eq!(Err(GetError::OwnerBorrowed(".inner.label".into())), label.try_set("b".to_owned()));
        drop(guard);

        assert_eq!(Ok(()), label.try_set("b".to_owned()));
        assert_eq!("b", storage.borrow().inner.label);
    }
    #[test]
    fn bound_in_new_cyclic() {
        struct Owner {
            count: u32,
            proxy: Proxy<Owner, Field<Owner, u32>, ReadOnly>,
        }
        let owner = Rc::new_cyclic(|this| {
            let proxy = Proxy::read_only_weak(this.clone(), field("count", |o: &Owner| &o.count));
            RefCell::new(Owner { count: 3, proxy })
        });
        owner.borrow_mut().count += 1;
        assert_eq!(4, owner.borrow().proxy.get());
    }
    #[test]
    fn shared_object_after_read_only_step() {
        struct Nested {
            label: String,
        }
        struct Owner {
            nested: Rc<RefCell<Nested>>,
        }
        let nested = Rc::new(RefCell::new(Nested { label: "a".to_owned() }));
        let owner = Rc::new(RefCell::new(Owner { nested: Rc::clone(&nested) }));
        let path = field("nested", |o: &Owner| &o.nested)
            .shared()
            .field_mut("label", |n: &Nested| &n.label, |n| &mut n.label);
        let label = Proxy::read_write(&owner, path);

        let guard = nested.borrow_mut();
        assert_eq!(Err(GetError::OwnerBorrowed(".nested.label".into())), label.try_get());
        assert_eq!(Err(GetError::OwnerBorrowed(".nested.label".into())), label.try_set("b".to_owned()));
        drop(guard);

        let guard = nested.borrow();
        assert_eq!(Ok("a".to_owned()), label.try_get());
        assert_eq!(Err(GetError::OwnerBorrowed(".nested.label".into())), label.try_set("b".to_owned()));
        drop(guard);

        let guard = owner.borrow();
        assert_eq!(Ok(()), label.try_set("b".to_owned()));
        assert_eq!("b", guard.nested.borrow().label);
        drop(guard);

        let guard = owner.borrow_mut();
        assert_eq!(Err(GetError::OwnerBorrowed(".nested.label".into())), label.try_get());
        drop(guard);
    }
    #[test]
    fn self_owned_proxy_writes_through_shared_value() {
        struct Nested {
            label: String,
        }
        type LabelPath = Then<Shared<Field<Owner, Rc<RefCell<Nested>>>, Nested>, FieldMut<Nested, String>>;
        struct Owner {
            value: Rc<RefCell<Nested>>,
            label: Proxy<Owner, LabelPath>,
        }
        let owner = Rc::new_cyclic(|this: &Weak<RefCell<Owner>>| {
            let path = field("value", |o: &Owner| &o.value)
                .shared()
                .field_mut("label", |n: &Nested| &n.label, |n| &mut n.label);
            let value = Rc::new(RefCell::new(Nested { label: "The initial value".to_owned() }));
            RefCell::new(Owner { value, label: Proxy::read_write_weak(this.clone(), path) })
        });
        let object = owner.borrow();
        assert_eq!("The initial value", object.label.get());

        object.label.set("New value".to_owned());
        assert_eq!("New value", object.value.borrow().label);
        assert_eq!("New value", object.label.get());

        object.value.borrow_mut().label = "External".to_owned();
        assert_eq!(Ok("External".to_owned()), object.label.try_get());
        assert_eq!("External", object.label.replace("Last".to_owned()));
        assert_eq!(".value.label", object.label.path());
    }
    #[test]
    fn debug() {
        let storage = storage();
        let count = count(&storage);
        let expected = r#"Proxy { path: ".inner.count", write: false, bound: true }"#;
        assert_eq!(expected, format!("{count:?}"));
    }
}
