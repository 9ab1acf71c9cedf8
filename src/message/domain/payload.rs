//! Type-erased payload envelope.
//!
//! The pipeline never interprets payload contents; it only needs the
//! payload's type identity for handler resolution and its type name for
//! filtering and persistence. Both are captured once at construction, while
//! the concrete type is still known.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A command or query payload with its captured type identity.
///
/// Cloning is cheap; the payload value itself is shared.
///
/// # Examples
///
/// ```
/// use courier::message::domain::Payload;
///
/// struct CreateWidget {
///     name: String,
/// }
///
/// let payload = Payload::new(CreateWidget { name: "x".into() });
/// assert!(payload.type_name().ends_with("CreateWidget"));
/// assert_eq!(payload.downcast_ref::<CreateWidget>().map(|w| w.name.as_str()), Some("x"));
/// ```
#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Payload {
    /// Wraps a payload value, capturing its type identity.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the captured [`TypeId`] of the wrapped value.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the captured type name of the wrapped value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Downcasts the wrapped value to a concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Returns `true` when the wrapped value is of type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
