//! The dynamic function runtime, as far as the operator needs to see it.
//!
//! Values are dynamically typed (`Value`), functions take a whole argument
//! list and return one value (`DynFn`), and functions are found by a
//! two-part name (`FnName`) through a `Resolver`.

pub mod function;
pub mod resolver;
pub mod value;

pub use function::{DynFn, FnName, RuntimeError};
pub use resolver::{Namespace, Registry, ResolveError, Resolver};
pub use value::{LazySeq, Seq, Value};
