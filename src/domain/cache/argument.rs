//! Borrowed, type-erased call arguments

use std::any::{Any, TypeId};
use std::fmt;

/// One argument of a cached call, as seen by the key generator
///
/// Arguments are borrowed for the duration of key generation only. A value
/// built with [`Argument::of`] carries its `Display` output as its canonical
/// string form; one built with [`Argument::opaque`] has none and needs a
/// registered strategy to produce a key fragment.
#[derive(Clone, Copy)]
pub enum Argument<'a> {
    /// A null argument, always rendered as the empty fragment
    Null,
    /// A present argument
    Value(ArgumentValue<'a>),
}

/// A present argument with its runtime type information
#[derive(Clone, Copy)]
pub struct ArgumentValue<'a> {
    value: &'a dyn Any,
    canonical: Option<&'a dyn fmt::Display>,
    type_id: TypeId,
    type_name: &'static str,
}

impl<'a> Argument<'a> {
    /// Creates a null argument
    pub fn null() -> Self {
        Self::Null
    }

    /// Creates an argument whose `Display` output is its canonical form
    pub fn of<T: Any + fmt::Display>(value: &'a T) -> Self {
        Self::Value(ArgumentValue {
            value,
            canonical: Some(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Creates an argument with no canonical string form
    pub fn opaque<T: Any>(value: &'a T) -> Self {
        Self::Value(ArgumentValue {
            value,
            canonical: None,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the runtime type of a present argument
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Self::Null => None,
            Self::Value(value) => Some(value.type_id),
        }
    }
}

impl<'a> ArgumentValue<'a> {
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn as_any(&self) -> &'a dyn Any {
        self.value
    }

    /// The canonical string form, if the argument has one
    pub fn canonical(&self) -> Option<&'a dyn fmt::Display> {
        self.canonical
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }
}

impl<'a, T: Any + fmt::Display> From<&'a T> for Argument<'a> {
    fn from(value: &'a T) -> Self {
        Self::of(value)
    }
}

impl<'a, T: Any + fmt::Display> From<Option<&'a T>> for Argument<'a> {
    fn from(value: Option<&'a T>) -> Self {
        match value {
            Some(value) => Self::of(value),
            None => Self::Null,
        }
    }
}

impl fmt::Debug for Argument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Value(value) => fmt::Debug::fmt(value, f),
        }
    }
}

impl fmt::Debug for ArgumentValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let canonical = self.canonical.map(|c| c.to_string());

        f.debug_struct("ArgumentValue")
            .field("type_name", &self.type_name)
            .field("canonical", &canonical)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoDisplay(u8);

    #[test]
    fn test_null_argument() {
        let arg = Argument::null();
        assert!(arg.is_null());
        assert!(arg.type_id().is_none());
    }

    #[test]
    fn test_value_argument_keeps_type() {
        let value = 42u64;
        let arg = Argument::of(&value);

        assert!(!arg.is_null());
        assert_eq!(arg.type_id(), Some(TypeId::of::<u64>()));

        let Argument::Value(inner) = arg else {
            panic!("expected a value argument");
        };
        assert_eq!(inner.type_name(), "u64");
        assert_eq!(inner.canonical().map(|c| c.to_string()), Some("42".to_string()));
        assert_eq!(inner.downcast_ref::<u64>(), Some(&42));
        assert!(inner.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn test_opaque_argument_has_no_canonical_form() {
        let value = NoDisplay(7);
        let arg = Argument::opaque(&value);

        let Argument::Value(inner) = arg else {
            panic!("expected a value argument");
        };
        assert!(inner.canonical().is_none());
        assert_eq!(inner.downcast_ref::<NoDisplay>().map(|v| v.0), Some(7));
    }

    #[test]
    fn test_from_option() {
        let present = String::from("abc");

        assert!(!Argument::from(Some(&present)).is_null());
        assert!(Argument::from(None::<&String>).is_null());
    }
}
