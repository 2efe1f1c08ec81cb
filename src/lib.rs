//! Bound field accessors.
//!
//! A [`Proxy`] forwards reads, and optionally writes, to a field nested deep
//! within an owner. The owner lives in an `Rc<RefCell<_>>`: the proxy holds a
//! weak reference to it and follows its path anew at every access. Changes
//! made to the owner through any other reference are seen by the proxy, and
//! changes made through the proxy are seen by any other holder of the owner.
//!
//! A typical use is to expose a few fields of an internal object without
//! exposing the object itself:
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use cuicui_proxy::path::{field, field_mut, Field, FieldMut};
//! use cuicui_proxy::{Proxy, ReadOnly};
//!
//! struct Nested {
//!     label: String,
//!     count: u32,
//! }
//! struct TestObject {
//!     value: Rc<RefCell<Nested>>,
//!     label: Proxy<Nested, FieldMut<Nested, String>>,
//!     count: Proxy<Nested, Field<Nested, u32>, ReadOnly>,
//! }
//! impl TestObject {
//!     fn new(label: &str, count: u32) -> Self {
//!         let value = Rc::new(RefCell::new(Nested { label: label.to_owned(), count }));
//!         TestObject {
//!             label: Proxy::read_write(&value, field_mut("label", |n: &Nested| &n.label, |n| &mut n.label)),
//!             count: Proxy::read_only(&value, field("count", |n: &Nested| &n.count)),
//!             value,
//!         }
//!     }
//! }
//! let object = TestObject::new("The initial value", 3);
//! assert_eq!(object.label.get(), "The initial value");
//!
//! object.label.set("New value".to_owned());
//! assert_eq!(object.value.borrow().label, "New value");
//!
//! object.value.borrow_mut().count = 10;
//! assert_eq!(object.count.get(), 10);
//! ```
//!
//! Writing through a [`ReadOnly`] proxy doesn't compile:
//!
//! ```compile_fail
//! # use std::{cell::RefCell, rc::Rc};
//! # use cuicui_proxy::{path::field_mut, Proxy, ReadOnly};
//! struct Counter { count: u32 }
//! let counter = Rc::new(RefCell::new(Counter { count: 0 }));
//! let path = field_mut("count", |c: &Counter| &c.count, |c| &mut c.count);
//! let count: Proxy<_, _, ReadOnly> = Proxy::read_only(&counter, path);
//! count.set(3);
//! ```
//!
//! Neither does binding a [`ReadWrite`] proxy to a path with a read-only step:
//!
//! ```compile_fail
//! # use std::{cell::RefCell, rc::Rc};
//! # use cuicui_proxy::{path::{field, PathExt}, Proxy};
//! struct Inner { count: u32 }
//! struct Counter { inner: Inner }
//! let counter = Rc::new(RefCell::new(Counter { inner: Inner { count: 0 } }));
//! let path = field("inner", |c: &Counter| &c.inner)
//!     .field_mut("count", |i: &Inner| &i.count, |i| &mut i.count);
//! let count = Proxy::read_write(&counter, path);
//! ```
//!
//! With the `reflect` feature, [`ReflectProxy`] does the same with a textual
//! path such as `.inner.count`, checked when binding the proxy.

mod error;
pub mod mode;
pub mod path;
mod proxy;
#[cfg(feature = "reflect")]
mod reflect;

pub use error::{GetError, GetResult, NewError, NewResult};
pub use mode::{Mode, ReadOnly, ReadWrite};
pub use proxy::Proxy;
#[cfg(feature = "reflect")]
pub use reflect::ReflectProxy;
pub use reflect_path::{ParseError as PathParseError, Relation};
