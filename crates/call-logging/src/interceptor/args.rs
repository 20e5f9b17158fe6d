//! Positional access to call arguments for rendering.

use serde::Serialize;
use serde_json::Value;

use crate::constants::SERIALIZATION_ERROR_TEXT;

/// Arguments of a wrapped call, addressable by position.
///
/// Implemented for `()`, tuples of up to eight [`Serialize`] values, and
/// slices or vectors of [`Value`]. An index past the end yields None and
/// renders as `undefined`.
pub trait CallArgs {
    /// Returns argument `index` as a JSON value.
    fn arg(&self, index: usize) -> Option<Value>;
}

/// Converts a value for logging; values that fail to serialize render as
/// a fixed marker instead of aborting the call.
pub fn to_log_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(SERIALIZATION_ERROR_TEXT.to_string()))
}

impl CallArgs for () {
    fn arg(&self, _index: usize) -> Option<Value> {
        None
    }
}

impl CallArgs for [Value] {
    fn arg(&self, index: usize) -> Option<Value> {
        self.get(index).cloned()
    }
}

impl CallArgs for Vec<Value> {
    fn arg(&self, index: usize) -> Option<Value> {
        self.as_slice().arg(index)
    }
}

impl<T: CallArgs + ?Sized> CallArgs for &T {
    fn arg(&self, index: usize) -> Option<Value> {
        (**self).arg(index)
    }
}

macro_rules! impl_call_args {
    ($($name:ident : $index:tt),+) => {
        impl<$($name: Serialize),+> CallArgs for ($($name,)+) {
            fn arg(&self, index: usize) -> Option<Value> {
                match index {
                    $($index => Some(to_log_value(&self.$index)),)+
                    _ => None,
                }
            }
        }
    };
}

impl_call_args!(A: 0);
impl_call_args!(A: 0, B: 1);
impl_call_args!(A: 0, B: 1, C: 2);
impl_call_args!(A: 0, B: 1, C: 2, D: 3);
impl_call_args!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_call_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_call_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_call_args!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_tuple_args() {
        let args = (5, "x", json!({"a": 1}));
        assert_eq!(args.arg(0), Some(json!(5)));
        assert_eq!(args.arg(1), Some(json!("x")));
        assert_eq!(args.arg(2), Some(json!({"a": 1})));
        assert_eq!(args.arg(3), None);
        assert_eq!(().arg(0), None);
    }

    #[test]
    fn test_slice_args() {
        let args = vec![json!(1), json!(null)];
        assert_eq!(args.arg(1), Some(Value::Null));
        assert_eq!((&args[..]).arg(2), None);
    }

    #[test]
    fn test_unserializable_arg() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys cannot be JSON object keys");
        assert_eq!((map,).arg(0), Some(json!(SERIALIZATION_ERROR_TEXT)));
    }
}
