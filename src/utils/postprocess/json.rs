use std::io;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};


/// Single-line JSON formatter that puts a space after `,` and `:`.
///
/// With `ensure_ascii`, every non-ASCII character (and DEL) in a string is written as a lowercase `\uXXXX` escape,
/// using a surrogate pair above the Basic Multilingual Plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter {
    pub ensure_ascii: bool,
}

impl Formatter for SpacedFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
        where W: ?Sized + io::Write {
        if !self.ensure_ascii || fragment.bytes().all(|b| b < 0x7f) {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch < '\u{7f}' {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
        where W: ?Sized + io::Write {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    #[inline]
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
        where W: ?Sized + io::Write {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    #[inline]
    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
        where W: ?Sized + io::Write {
        writer.write_all(b": ")
    }
}

fn to_spaced_json<T>(value: &T, formatter: SpacedFormatter) -> serde_json::Result<String>
    where T: ?Sized + Serialize {
    let mut buffer = Vec::with_capacity(256);
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Serializes a value to the canonical text form used for token estimation.
///
/// Struct fields keep their declaration order (map keys are sorted) and non-ASCII characters are written as is.
///
/// # Example
/// ```
/// use fastprompt::utils::postprocess::json::to_canonical_json;
/// use serde_json::json;
/// let text = to_canonical_json(&json!({"destino": "Cancún", "adultos": [2, 1]})).unwrap();
/// assert_eq!(text, r#"{"adultos": [2, 1], "destino": "Cancún"}"#);
/// ```
pub fn to_canonical_json<T>(value: &T) -> serde_json::Result<String>
    where T: ?Sized + Serialize {
    to_spaced_json(value, SpacedFormatter { ensure_ascii: false })
}

/// Like [to_canonical_json], but with every non-ASCII character escaped. Checklist patterns are matched against this.
///
/// # Example
/// ```
/// use fastprompt::utils::postprocess::json::to_ascii_json;
/// use serde_json::json;
/// let text = to_ascii_json(&json!({"destino": "Cancún", "nota": "¡Hola! ↔ 😀"})).unwrap();
/// assert_eq!(text, r#"{"destino": "Canc\u00fan", "nota": "\u00a1Hola! \u2194 \ud83d\ude00"}"#);
/// ```
pub fn to_ascii_json<T>(value: &T) -> serde_json::Result<String>
    where T: ?Sized + Serialize {
    to_spaced_json(value, SpacedFormatter { ensure_ascii: true })
}


#[cfg(test)]
mod test_json {
    use serde::Serialize;
    use serde_json::json;
    use crate::utils::postprocess::json::{to_ascii_json, to_canonical_json};

    #[derive(Serialize)]
    struct Filters {
        destino: &'static str,
        adultos: u32,
        desayuno: bool,
        checks: Vec<String>,
    }

    #[test]
    fn test_struct_field_order_is_kept() {
        let filters = Filters { destino: "Lima", adultos: 2, desayuno: true, checks: vec![] };
        let text = to_canonical_json(&filters).unwrap();
        assert_eq!(r#"{"destino": "Lima", "adultos": 2, "desayuno": true, "checks": []}"#, text);
    }

    #[test]
    fn test_nested_and_unicode() {
        let value = json!({"a": {"b": ["¡Hola!", "↔"]}});
        let text = to_canonical_json(&value).unwrap();
        assert_eq!(r#"{"a": {"b": ["¡Hola!", "↔"]}}"#, text);
    }

    #[test]
    fn test_ascii_escapes() {
        let value = json!({"itinerario": "Día 1", "clave\u{e9}": ["a\"b\n", "ASCII"]});
        let text = to_ascii_json(&value).unwrap();
        assert_eq!(r#"{"clave\u00e9": ["a\"b\n", "ASCII"], "itinerario": "D\u00eda 1"}"#, text);
        assert!(text.is_ascii());
        assert_eq!(r#""\u007f""#, to_ascii_json("\u{7f}").unwrap());
        // unescaped form is left alone
        assert_eq!(r#"{"x": "Día"}"#, to_canonical_json(&json!({"x": "Día"})).unwrap());
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!("{}", to_canonical_json(&json!({})).unwrap());
        assert_eq!("[]", to_canonical_json(&json!([])).unwrap());
    }
}
