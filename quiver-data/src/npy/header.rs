//! Preamble and header dictionary of the array file format.

use std::fmt;

use crate::error::{NpyError, NpyResult};

/// Magic bytes opening every array file.
pub const MAGIC: &[u8; 6] = b"\x93NUMPY";
/// Type code for little-endian 8-byte floats.
pub const DESCR_F64_LE: &str = "<f8";
/// Byte size of one payload element.
pub const ELEMENT_SIZE: usize = 8;

/// Total preamble size (magic, version, length field, header) is padded to this.
pub(crate) const ALIGNMENT: usize = 16;

/// Format version pair stored right after the magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NpyVersion {
    /// Major version; selects the width of the header length field.
    pub major: u8,
    /// Minor version, carried through but not interpreted.
    pub minor: u8,
}

impl NpyVersion {
    /// The only version the writer produces.
    pub const V1_0: Self = Self { major: 1, minor: 0 };

    /// Width in bytes of the header length field for this version.
    pub(crate) fn length_field_size(self) -> NpyResult<usize> {
        match self.major {
            1 => Ok(2),
            2 | 3 => Ok(4),
            _ => Err(NpyError::format(format!("unsupported format version {self}"))),
        }
    }
}

impl fmt::Display for NpyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parsed description of an array file's layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpyHeader {
    /// Version read from the preamble.
    pub version: NpyVersion,
    /// Length in bytes of the header text, padding included.
    pub header_len: usize,
    /// Element type code, e.g. `<f8`.
    pub descr: String,
    /// Whether the payload is stored column-major.
    pub fortran_order: bool,
    /// Array dimensions in declaration order.
    pub shape: Vec<usize>,
}

impl NpyHeader {
    /// Number of elements the header declares.
    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Byte offset at which the payload starts.
    ///
    /// Fails for a version whose length field width is unknown.
    pub fn payload_offset(&self) -> NpyResult<usize> {
        let field = self.version.length_field_size()?;
        Ok(MAGIC.len() + 2 + field + self.header_len)
    }

    pub(crate) fn parse(version: NpyVersion, header_len: usize, text: &str) -> NpyResult<Self> {
        let mut descr = None;
        let mut fortran_order = None;
        let mut shape = None;

        for (key, value) in parse_dict(text)? {
            match (key.as_str(), value) {
                ("descr", HeaderValue::Str(value)) => descr = Some(value),
                ("fortran_order", HeaderValue::Bool(value)) => fortran_order = Some(value),
                ("shape", HeaderValue::Tuple(value)) => shape = Some(value),
                ("descr" | "fortran_order" | "shape", other) => {
                    return Err(NpyError::format(format!(
                        "header key '{key}' has unexpected value {other:?}"
                    )))
                }
                _ => {}
            }
        }

        Ok(Self {
            version,
            header_len,
            descr: descr.ok_or_else(|| NpyError::format("header is missing 'descr'"))?,
            fortran_order: fortran_order
                .ok_or_else(|| NpyError::format("header is missing 'fortran_order'"))?,
            shape: shape.ok_or_else(|| NpyError::format("header is missing 'shape'"))?,
        })
    }

    /// Rejects anything other than a 1-D, C-ordered, little-endian `f64` array.
    pub(crate) fn validate(&self) -> NpyResult<()> {
        if self.descr != DESCR_F64_LE {
            return Err(NpyError::unsupported(format!(
                "element type '{}' (expected '{DESCR_F64_LE}')",
                self.descr
            )));
        }
        if self.fortran_order {
            return Err(NpyError::unsupported("fortran-ordered layout"));
        }
        if self.shape.len() != 1 {
            return Err(NpyError::unsupported(format!(
                "{}-dimensional shape {:?}",
                self.shape.len(),
                self.shape
            )));
        }
        Ok(())
    }
}

/// Builds the space-padded version 1.0 header text for `count` elements.
pub(crate) fn render_header(count: usize) -> String {
    let mut header =
        format!("{{'descr': '{DESCR_F64_LE}', 'fortran_order': False, 'shape': ({count},), }}");
    let fixed = MAGIC.len() + 2 + 2;
    while (fixed + header.len()) % ALIGNMENT != 0 {
        header.push(' ');
    }
    header
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HeaderValue {
    Str(String),
    Bool(bool),
    Tuple(Vec<usize>),
}

fn parse_dict(text: &str) -> NpyResult<Vec<(String, HeaderValue)>> {
    let body = text.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0');
    let inner = body
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| NpyError::format("header is not a dictionary literal"))?;

    let mut cursor = Cursor { rest: inner };
    let mut entries = Vec::new();
    loop {
        cursor.skip_separators();
        if cursor.is_empty() {
            break;
        }
        let key = cursor.quoted()?;
        cursor.skip_whitespace();
        cursor.expect(':')?;
        cursor.skip_whitespace();
        let value = cursor.value()?;
        entries.push((key, value));
    }
    Ok(entries)
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn skip_separators(&mut self) {
        self.rest = self
            .rest
            .trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
    }

    fn expect(&mut self, expected: char) -> NpyResult<()> {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                Ok(())
            }
            None => Err(NpyError::format(format!(
                "expected '{expected}' in header near {:?}",
                self.rest
            ))),
        }
    }

    fn take_until(&mut self, end: char) -> NpyResult<&'a str> {
        let rest = self.rest;
        let idx = rest.find(end).ok_or_else(|| {
            NpyError::format(format!("unterminated header token, missing '{end}'"))
        })?;
        let token = &rest[..idx];
        self.rest = &rest[idx + end.len_utf8()..];
        Ok(token)
    }

    fn quoted(&mut self) -> NpyResult<String> {
        let quote = match self.rest.chars().next() {
            Some(c @ ('\'' | '"')) => c,
            _ => {
                return Err(NpyError::format(format!(
                    "expected quoted string in header near {:?}",
                    self.rest
                )))
            }
        };
        self.expect(quote)?;
        Ok(self.take_until(quote)?.to_string())
    }

    fn value(&mut self) -> NpyResult<HeaderValue> {
        match self.rest.chars().next() {
            Some('\'' | '"') => self.quoted().map(HeaderValue::Str),
            Some('(') => {
                self.expect('(')?;
                let body = self.take_until(')')?;
                parse_shape(body).map(HeaderValue::Tuple)
            }
            _ => {
                let end = self.rest.find(',').unwrap_or(self.rest.len());
                let word = self.rest[..end].trim();
                self.rest = &self.rest[end..];
                match word {
                    "True" => Ok(HeaderValue::Bool(true)),
                    "False" => Ok(HeaderValue::Bool(false)),
                    other => Err(NpyError::format(format!("unexpected header value '{other}'"))),
                }
            }
        }
    }
}

fn parse_shape(body: &str) -> NpyResult<Vec<usize>> {
    body.split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| {
            dim.trim_end_matches('L')
                .parse::<usize>()
                .map_err(|_| NpyError::format(format!("invalid shape dimension '{dim}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> NpyResult<NpyHeader> {
        NpyHeader::parse(NpyVersion::V1_0, text.len(), text)
    }

    #[test]
    fn rendered_header_is_aligned() {
        for count in [0, 5, 12_345, usize::MAX] {
            let header = render_header(count);
            assert_eq!((10 + header.len()) % ALIGNMENT, 0);
            assert!(header.starts_with("{'descr': '<f8', 'fortran_order': False, 'shape': ("));
            assert!(header.trim_end().ends_with(",), }"));
        }
    }

    #[test]
    fn parses_rendered_header() {
        let header = parse(&render_header(5)).unwrap();
        assert_eq!(header.descr, "<f8");
        assert!(!header.fortran_order);
        assert_eq!(header.shape, vec![5]);
        assert_eq!(header.element_count(), 5);
        header.validate().unwrap();
    }

    #[test]
    fn parses_numpy_style_header_with_newline() {
        let text = "{'descr': '<f8', 'fortran_order': False, 'shape': (3,), }            \n";
        let header = parse(text).unwrap();
        assert_eq!(header.shape, vec![3]);
    }

    #[test]
    fn key_order_does_not_matter() {
        let text = "{\"shape\": (2,), \"fortran_order\": False, \"descr\": \"<f8\"}";
        let header = parse(text).unwrap();
        assert_eq!(header.descr, "<f8");
        assert_eq!(header.shape, vec![2]);
    }

    #[test]
    fn rejects_non_dictionary() {
        assert!(matches!(parse("descr: <f8"), Err(NpyError::Format(_))));
    }

    #[test]
    fn rejects_missing_keys() {
        let err = parse("{'descr': '<f8', 'shape': (1,), }").unwrap_err();
        assert!(err.to_string().contains("fortran_order"));
    }

    #[test]
    fn validation_rejects_other_dtypes_and_layouts() {
        let int = parse("{'descr': '<i8', 'fortran_order': False, 'shape': (4,), }").unwrap();
        assert!(matches!(int.validate(), Err(NpyError::UnsupportedHeader(_))));

        let big = parse("{'descr': '>f8', 'fortran_order': False, 'shape': (4,), }").unwrap();
        assert!(matches!(big.validate(), Err(NpyError::UnsupportedHeader(_))));

        let fortran = parse("{'descr': '<f8', 'fortran_order': True, 'shape': (4,), }").unwrap();
        assert!(matches!(fortran.validate(), Err(NpyError::UnsupportedHeader(_))));

        let matrix = parse("{'descr': '<f8', 'fortran_order': False, 'shape': (2, 3), }").unwrap();
        assert_eq!(matrix.element_count(), 6);
        assert!(matches!(matrix.validate(), Err(NpyError::UnsupportedHeader(_))));

        let scalar = parse("{'descr': '<f8', 'fortran_order': False, 'shape': (), }").unwrap();
        assert!(matches!(scalar.validate(), Err(NpyError::UnsupportedHeader(_))));
    }

    #[test]
    fn version_controls_length_field() {
        assert_eq!(NpyVersion::V1_0.length_field_size().unwrap(), 2);
        assert_eq!(NpyVersion { major: 2, minor: 0 }.length_field_size().unwrap(), 4);
        assert!(NpyVersion { major: 9, minor: 0 }.length_field_size().is_err());
        assert_eq!(NpyVersion::V1_0.to_string(), "1.0");
    }

    #[test]
    fn payload_offset_depends_on_version() {
        let mut header = parse(&render_header(3)).unwrap();
        assert_eq!(header.payload_offset().unwrap(), 10 + header.header_len);

        header.version = NpyVersion { major: 2, minor: 0 };
        assert_eq!(header.payload_offset().unwrap(), 12 + header.header_len);

        header.version = NpyVersion { major: 7, minor: 1 };
        assert!(header.payload_offset().unwrap_err().is_format());
    }
}
