//! Conversion between URIs and MDX identifiers.
//!
//! Schema objects of a Linked Data cube are identified by URIs. URIs contain characters (`:`, `/`,
//! `.`, `#`, ...) that cannot appear in an MDX name, even within brackets. Hence, a URI is
//! percent-encoded and the `%` of every escape is replaced by `XXX`. As `X` itself is always
//! escaped, every `XXX` in an encoded name starts an escape sequence and the encoding can be
//! reversed unambiguously.
//!
//! ```
//! use rdf_olap_model::identifier::{decode_identifier, encode_uri};
//!
//! let encoded = encode_uri("http://example.org/Time#2020");
//! assert_eq!(encoded, "httpXXX3AXXX2FXXX2FexampleXXX2EorgXXX2FTimeXXX232020");
//! assert_eq!(decode_identifier(&encoded), "http://example.org/Time#2020");
//! ```

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// The characters that are escaped. `X` is included such that `XXX` never occurs naturally.
const MDX_ESCAPED: &AsciiSet = &NON_ALPHANUMERIC.add(b'X');

/// The replacement for the `%` of a percent-encoded character.
const ESCAPE_MARKER: &str = "XXX";

/// Encodes `uri` such that it can be used as an MDX name.
pub fn encode_uri(uri: &str) -> String {
    utf8_percent_encode(uri, MDX_ESCAPED)
        .to_string()
        .replace('%', ESCAPE_MARKER)
}

/// Encodes `uri` as a bracketed MDX unique name, e.g., `[httpXXX3AXXX2FXXX2F...]`.
pub fn unique_name_for_uri(uri: &str) -> String {
    format!("[{}]", encode_uri(uri))
}

/// Reverses [encode_uri]. Names that have not been encoded are returned unchanged.
pub fn decode_identifier(name: &str) -> String {
    let percent_encoded = name.replace(ESCAPE_MARKER, "%");
    percent_decode_str(&percent_encoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Splits a unique name like `[Time].[2020]` into its (unbracketed) segments.
///
/// Dots within brackets do not separate segments and `]]` is an escaped bracket. Unbracketed
/// segments are trimmed.
pub fn split_unique_name(unique_name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    let mut chars = unique_name.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '[' if !in_brackets => in_brackets = true,
            ']' if in_brackets => {
                if chars.peek() == Some(&']') {
                    chars.next();
                    current.push(']');
                } else {
                    in_brackets = false;
                }
            }
            '.' if !in_brackets => {
                segments.push(current.trim().to_owned());
                current.clear();
            }
            c => current.push(c),
        }
    }
    segments.push(current.trim().to_owned());
    segments
}

/// Quotes `name` as a bracketed MDX segment.
pub fn quote_segment(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Builds the unique name for the given `segments`, e.g., `[Measures].[Profit]`.
pub fn unique_name_from_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| quote_segment(s.as_ref()))
        .collect::<Vec<_>>()
        .join(".")
}

/// Returns the canonical form of a unique name.
///
/// The canonical form of a single-segment unique name is the decoded segment, which, for
/// URI-based names, is the URI itself. Multi-segment names are decoded segment-wise and joined
/// with a dot. The canonical form is what the Linked Data Engine reports in the key columns of a
/// query result.
pub fn canonical_unique_name(unique_name: &str) -> String {
    split_unique_name(unique_name)
        .iter()
        .map(|segment| decode_identifier(segment))
        .collect::<Vec<_>>()
        .join(".")
}

/// Returns the trailing part of a (decoded) URI, i.e., everything after the last `#` or `/`.
///
/// Strings that are not URIs are returned unchanged.
pub fn local_name(value: &str) -> &str {
    if !value.contains("://") {
        return value;
    }
    value
        .rfind(['#', '/'])
        .map_or(value, |index| &value[index + 1..])
}
