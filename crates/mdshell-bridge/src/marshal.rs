//! Per-argument marshalling across the process boundary.
//!
//! Outbound arguments are turned into JSON text one by one; inbound text is
//! parsed back one by one. Either step falls back to passing the argument
//! through unchanged, so one odd argument never sinks the whole call.
//! Because of that fallback `encode` and `decode` are not strict inverses:
//! wire text that happens to be valid JSON is always decoded.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

/// One positional argument of a cross-process call.
#[derive(Clone)]
pub enum Arg {
    /// Structured data.
    Value(Value),
    /// Wire text, usually produced by [`encode`].
    Text(String),
    /// A value with no data representation (a callback, a native handle).
    Opaque(Opaque),
}

impl Arg {
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Convert any `Serialize` type into a structured argument.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, NotSerializable> {
        serde_json::to_value(value)
            .map(Self::Value)
            .map_err(|e| NotSerializable::new(e.to_string()))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Self::Opaque(o) => Some(o),
            _ => None,
        }
    }

    /// The argument as transport JSON: structured values as-is, text as a JSON string.
    ///
    /// Opaque arguments have no JSON form.
    pub fn to_wire(&self) -> Option<Value> {
        match self {
            Self::Value(v) => Some(v.clone()),
            Self::Text(s) => Some(Value::String(s.clone())),
            Self::Opaque(_) => None,
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<Opaque> for Arg {
    fn from(o: Opaque) -> Self {
        Self::Opaque(o)
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Opaque(o) => f.debug_tuple("Opaque").field(o).finish(),
        }
    }
}

/// A shared handle to a non-data value. Equality is identity.
#[derive(Clone)]
pub struct Opaque {
    label: &'static str,
    inner: Rc<dyn Any>,
}

impl Opaque {
    pub fn new<T: Any>(label: &'static str, value: T) -> Self {
        Self {
            label,
            inner: Rc::new(value),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<opaque {}>", self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("value is not serializable: {reason}")]
pub struct NotSerializable {
    reason: String,
}

impl NotSerializable {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("text is not decodable: {reason}")]
pub struct NotDecodable {
    reason: String,
}

/// What a marshalling step did with an argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Marshalled {
    Converted(Arg),
    PassedThrough(Arg),
}

impl Marshalled {
    pub fn into_arg(self) -> Arg {
        match self {
            Self::Converted(a) | Self::PassedThrough(a) => a,
        }
    }

    pub fn was_converted(&self) -> bool {
        matches!(self, Self::Converted(_))
    }
}

/// Serialize a structured value to JSON text.
pub fn try_encode_value<T: Serialize + ?Sized>(value: &T) -> Result<String, NotSerializable> {
    serde_json::to_string(value).map_err(|e| NotSerializable::new(e.to_string()))
}

/// Encode one argument, failing for values with no data representation.
///
/// Text is already in wire form and is not encoded a second time.
pub fn try_encode(arg: &Arg) -> Result<Option<String>, NotSerializable> {
    match arg {
        Arg::Value(v) => try_encode_value(v).map(Some),
        Arg::Text(_) => Ok(None),
        Arg::Opaque(o) => Err(NotSerializable::new(format!("opaque {}", o.label()))),
    }
}

/// Parse JSON text into a structured value.
pub fn try_decode(text: &str) -> Result<Value, NotDecodable> {
    serde_json::from_str(text).map_err(|e| NotDecodable {
        reason: e.to_string(),
    })
}

pub fn encode_outcome(arg: Arg) -> Marshalled {
    match try_encode(&arg) {
        Ok(Some(text)) => Marshalled::Converted(Arg::Text(text)),
        Ok(None) | Err(_) => Marshalled::PassedThrough(arg),
    }
}

pub fn decode_outcome(arg: Arg) -> Marshalled {
    match &arg {
        Arg::Text(text) => match try_decode(text) {
            Ok(v) => Marshalled::Converted(Arg::Value(v)),
            Err(_) => Marshalled::PassedThrough(arg),
        },
        Arg::Value(_) | Arg::Opaque(_) => Marshalled::PassedThrough(arg),
    }
}

/// Structured to text; anything else comes back unchanged.
pub fn encode(arg: Arg) -> Arg {
    encode_outcome(arg).into_arg()
}

/// Text to structured; undecodable text and non-text come back unchanged.
pub fn decode(arg: Arg) -> Arg {
    decode_outcome(arg).into_arg()
}

pub fn encode_all(args: impl IntoIterator<Item = Arg>) -> Vec<Arg> {
    args.into_iter().map(encode).collect()
}

pub fn decode_all(args: impl IntoIterator<Item = Arg>) -> Vec<Arg> {
    args.into_iter().map(decode).collect()
}

/// Decode a JSON wire value: strings are parsed, everything else is kept.
pub fn decode_wire(value: Value) -> Value {
    match value {
        Value::String(s) => match try_decode(&s) {
            Ok(v) => v,
            Err(_) => Value::String(s),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn structured_value_round_trips() {
        let original = json!({"a": 1, "b": [1, 2, 3]});
        let encoded = encode(Arg::Value(original.clone()));
        assert_eq!(encoded, Arg::text(r#"{"a":1,"b":[1,2,3]}"#));
        assert_eq!(decode(encoded), Arg::Value(original));
    }

    #[test]
    fn nested_and_scalar_values_round_trip() {
        for v in [
            json!(null),
            json!(true),
            json!(-12.5),
            json!("plain string"),
            json!("{\"looks\":\"like json\"}"),
            json!([]),
            json!({"deep": {"list": [{"x": null}, "é", 1e10]}}),
        ] {
            assert_eq!(decode(encode(Arg::Value(v.clone()))), Arg::Value(v));
        }
    }

    #[test]
    fn callable_passes_through_encode() {
        let callback = Opaque::new("callback", |x: i32| x + 1);
        let arg = Arg::Opaque(callback.clone());

        let outcome = encode_outcome(arg.clone());
        assert!(!outcome.was_converted());
        let back = outcome.into_arg();
        assert_eq!(back, arg);

        let f = back.as_opaque().unwrap();
        assert!(f.ptr_eq(&callback));
        assert_eq!(f.label(), "callback");
    }

    #[test]
    fn non_serializable_struct_fails_fast() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys have no JSON form");
        assert!(Arg::from_serialize(&map).is_err());
        assert!(try_encode_value(&map).is_err());
    }

    #[test]
    fn mixed_argument_lists_are_handled_per_argument() {
        let handle = Opaque::new("window", 42u32);
        let args = vec![
            Arg::value(json!({"n": 1})),
            Arg::Opaque(handle.clone()),
            Arg::value(json!("text")),
        ];

        let encoded = encode_all(args);
        assert_eq!(encoded[0], Arg::text(r#"{"n":1}"#));
        assert_eq!(encoded[1], Arg::Opaque(handle.clone()));
        assert_eq!(encoded[2], Arg::text(r#""text""#));

        let decoded = decode_all(encoded);
        assert_eq!(decoded[0], Arg::value(json!({"n": 1})));
        assert_eq!(decoded[1].as_opaque().unwrap().downcast_ref::<u32>(), Some(&42));
        assert_eq!(decoded[2], Arg::value(json!("text")));
    }

    #[test]
    fn undecodable_text_passes_through() {
        let raw = Arg::text("not { json");
        let outcome = decode_outcome(raw.clone());
        assert!(!outcome.was_converted());
        assert_eq!(outcome.into_arg(), raw);
    }

    #[test]
    fn decode_tolerates_already_decoded_input() {
        let v = Arg::value(json!({"a": 1}));
        assert_eq!(decode(v.clone()), v);
    }

    #[test]
    fn text_is_not_double_encoded() {
        let wire = Arg::text(r#"{"a":1}"#);
        let outcome = encode_outcome(wire.clone());
        assert!(!outcome.was_converted());
        assert_eq!(outcome.into_arg(), wire);
    }

    #[test]
    fn json_looking_text_is_always_decoded() {
        // Raw text that happens to be valid JSON cannot be told apart from wire text.
        assert_eq!(decode(Arg::text("123")), Arg::value(json!(123)));
    }

    #[test]
    fn decode_wire_parses_strings_only() {
        assert_eq!(decode_wire(json!("[1,2]")), json!([1, 2]));
        assert_eq!(decode_wire(json!("hello")), json!("hello"));
        assert_eq!(decode_wire(json!(5)), json!(5));
    }

    #[test]
    fn to_wire_forms() {
        assert_eq!(Arg::value(json!(1)).to_wire(), Some(json!(1)));
        assert_eq!(Arg::text("x").to_wire(), Some(json!("x")));
        assert_eq!(Arg::Opaque(Opaque::new("h", ())).to_wire(), None);
    }
}
