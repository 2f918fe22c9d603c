//! Typed views of resolved values: member values and method arguments.

use std::sync::Arc;

use crate::error::{InjectError, InjectResult};
use crate::key::Key;
use crate::traits::AnyArc;

/// A value the engine can resolve for a member.
///
/// Implemented for `Arc<T>` with `T` sized or a trait object. The declared
/// type of a direct-value member is `Self::key()`.
pub trait Dependency: Sized {
    /// Key requested from the container.
    fn key() -> Key;

    /// Converts a resolved value back into `Self`.
    fn from_resolved(value: AnyArc) -> InjectResult<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Dependency for Arc<T> {
    fn key() -> Key {
        Key::of::<T>()
    }

    fn from_resolved(value: AnyArc) -> InjectResult<Self> {
        value
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(InjectError::TypeMismatch(std::any::type_name::<T>()))
    }
}

/// Parameter list of an injected method.
///
/// Implemented for `()` and for tuples of up to eight [`Dependency`] values.
/// Parameters are resolved in tuple order.
pub trait MethodArgs: Sized {
    /// Declared parameter types, in order.
    fn keys() -> Vec<Key>;

    /// Builds the argument tuple from values resolved for [`keys`](Self::keys).
    fn from_resolved(values: Vec<AnyArc>) -> InjectResult<Self>;
}

impl MethodArgs for () {
    fn keys() -> Vec<Key> {
        Vec::new()
    }

    fn from_resolved(_values: Vec<AnyArc>) -> InjectResult<Self> {
        Ok(())
    }
}

macro_rules! impl_method_args {
    ($($name:ident),+) => {
        impl<$($name: Dependency),+> MethodArgs for ($($name,)+) {
            fn keys() -> Vec<Key> {
                vec![$($name::key()),+]
            }

            fn from_resolved(values: Vec<AnyArc>) -> InjectResult<Self> {
                let mut values = values.into_iter();
                Ok(($(
                    $name::from_resolved(
                        values
                            .next()
                            .ok_or(InjectError::TypeMismatch(std::any::type_name::<$name>()))?,
                    )?,
                )+))
            }
        }
    };
}

impl_method_args!(A);
impl_method_args!(A, B);
impl_method_args!(A, B, C);
impl_method_args!(A, B, C, D);
impl_method_args!(A, B, C, D, E);
impl_method_args!(A, B, C, D, E, F);
impl_method_args!(A, B, C, D, E, F, G);
impl_method_args!(A, B, C, D, E, F, G, H);
