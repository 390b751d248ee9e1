//! `SET VARIABLE` directive encoding.
//!
//! Wire form, one directive per line:
//!
//! ```text
//! SET VARIABLE <name> "<value>"\n
//! ```
//!
//! The value is wrapped in double quotes verbatim. Quotes inside the value
//! are not escaped, so a value containing `"` is ambiguous for the server.

use std::fmt;

use bytes::{BufMut, BytesMut};

/// Command verb written before every directive.
pub const SET_VARIABLE: &str = "SET VARIABLE";

/// A pending variable assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDirective {
    /// Variable name.
    pub name: String,
    /// Variable value (unescaped).
    pub value: String,
}

impl VariableDirective {
    /// Create a new directive.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Encoded length including the trailing newline.
    #[inline]
    pub fn encoded_len(&self) -> usize {
        // verb + space + name + space + 2 quotes + value + newline
        SET_VARIABLE.len() + self.name.len() + self.value.len() + 5
    }

    /// Append the wire form (with `\n`) to `buf`.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        buf.put_slice(SET_VARIABLE.as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(self.name.as_bytes());
        buf.put_slice(b" \"");
        buf.put_slice(self.value.as_bytes());
        buf.put_slice(b"\"\n");
    }
}

impl fmt::Display for VariableDirective {
    /// Wire form without the trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", SET_VARIABLE, self.name, self.value)
    }
}

/// Encode a batch of directives into a single buffer, in order.
pub fn encode_batch(directives: &[VariableDirective]) -> BytesMut {
    let total = directives.iter().map(VariableDirective::encoded_len).sum();
    let mut buf = BytesMut::with_capacity(total);
    for directive in directives {
        directive.encode_into(&mut buf);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let d = VariableDirective::new("nome_cliente", "RAFAEL RIZZO");
        assert_eq!(d.to_string(), r#"SET VARIABLE nome_cliente "RAFAEL RIZZO""#);
    }

    #[test]
    fn test_encode_matches_display_plus_newline() {
        let d = VariableDirective::new("X", "1");
        let mut buf = BytesMut::new();
        d.encode_into(&mut buf);
        assert_eq!(&buf[..], format!("{}\n", d).as_bytes());
        assert_eq!(buf.len(), d.encoded_len());
    }

    #[test]
    fn test_quotes_are_not_escaped() {
        let d = VariableDirective::new("V", r#"say "hi""#);
        assert_eq!(d.to_string(), r#"SET VARIABLE V "say "hi"""#);
    }

    #[test]
    fn test_empty_value() {
        let d = VariableDirective::new("EMPTY", "");
        assert_eq!(d.to_string(), r#"SET VARIABLE EMPTY """#);
    }

    #[test]
    fn test_batch_preserves_order() {
        let batch = vec![
            VariableDirective::new("X", "1"),
            VariableDirective::new("X", "2"),
        ];
        let buf = encode_batch(&batch);
        assert_eq!(&buf[..], b"SET VARIABLE X \"1\"\nSET VARIABLE X \"2\"\n");
        assert_eq!(buf.len(), batch.iter().map(|d| d.encoded_len()).sum::<usize>());
    }

    #[test]
    fn test_empty_batch() {
        assert!(encode_batch(&[]).is_empty());
    }
}
