//! RFC 6901 JSON Pointer engine.
//!
//! Pointers address values inside nested JSON containers. They come in two
//! equivalent shapes: text (`"/a~1b/0"`) and decomposed segments
//! (`["a/b", "0"]`). Every function that takes a pointer accepts either through
//! the [`ToPointer`] trait.
//!
//! ```
//! use schema_kit::pointer;
//! use serde_json::json;
//!
//! let mut doc = json!({ "items": [1, 2, 3] });
//! pointer::set(&mut doc, "/items/-", json!(4)).unwrap();
//! assert_eq!(pointer::get(&doc, "/items/3").unwrap(), &json!(4));
//! assert_eq!(pointer::parse("/a~1b/0").unwrap(), vec!["a/b", "0"]);
//! ```
//!
//! A leading `#` (URI fragment form) is accepted on input and never produced
//! on output. `"/"` denotes the root, like `""` and `"#"`.
//!
//! Operations never panic on malformed input. Failures come back as
//! [`PointerError`]; pair them with a [`Reporter`](crate::Reporter) when a
//! diagnostic trail is wanted.

mod access;
mod container;
mod expression;
mod translate;
mod traverse;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::PointerError;

pub use access::{
    get, get_copy, get_first, get_mut, get_slice, has, insert, insert_copy, remove, set, set_copy,
    MAX_ARRAY_GAP,
};
pub use container::array_index;
pub use expression::{evaluate, Evaluation, Expression, Operator};
pub use translate::{
    remove_recursive_references, to_data_pointer, to_generic_pointer, to_indexed_pointer,
    to_schema_pointer, ArrayMap, RecursiveRefMap,
};
pub use traverse::{dict, for_each_deep, for_each_deep_copy, for_each_deep_mut};

/// Escape one key for use as a pointer segment (`~` before `/`).
pub fn escape(key: &str) -> String {
    if !key.contains('~') && !key.contains('/') {
        return key.to_string();
    }
    key.replace('~', "~0").replace('/', "~1")
}

/// Unescape one pointer segment (`~1` before `~0`).
pub fn unescape(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }
    segment.replace("~1", "/").replace("~0", "~")
}

/// Check whether a string is a well-formed pointer.
///
/// Accepts `""`, `"#"`, and anything starting with `/` or `#/` that contains no
/// bare `~` (one not followed by `0` or `1`).
pub fn is_pointer(text: &str) -> bool {
    if text.is_empty() || text == "#" {
        return true;
    }
    if !text.starts_with('/') && !text.starts_with("#/") {
        return false;
    }
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0') | Some('1')) {
            return false;
        }
    }
    true
}

/// Parse pointer text into unescaped segments.
///
/// # Errors
///
/// Returns `PointerError::Invalid` if the text is not a pointer.
pub fn parse(pointer: &str) -> Result<Vec<String>, PointerError> {
    if !is_pointer(pointer) {
        return Err(PointerError::Invalid {
            pointer: pointer.to_string(),
        });
    }
    let body = pointer.strip_prefix('#').unwrap_or(pointer);
    if body.is_empty() || body == "/" {
        return Ok(Vec::new());
    }
    Ok(body[1..].split('/').map(unescape).collect())
}

/// Compile a pointer (text or segments) into normalized pointer text.
///
/// # Errors
///
/// Returns `PointerError::Invalid` for malformed pointer text.
pub fn compile<P: ToPointer + ?Sized>(pointer: &P) -> Result<String, PointerError> {
    compile_with_default(pointer, "")
}

/// Like [`compile`], replacing every empty segment with `default`.
pub fn compile_with_default<P: ToPointer + ?Sized>(
    pointer: &P,
    default: &str,
) -> Result<String, PointerError> {
    let segments = pointer.to_segments()?;
    let mut text = String::new();
    for segment in segments.iter() {
        text.push('/');
        if segment.is_empty() {
            text.push_str(default);
        } else {
            text.push_str(&escape(segment));
        }
    }
    Ok(text)
}

/// Join already-decomposed segments into pointer text.
pub(crate) fn join(segments: &[String]) -> String {
    segments.iter().fold(String::new(), |mut text, segment| {
        text.push('/');
        text.push_str(&escape(segment));
        text
    })
}

/// Last segment of a pointer, or `""` for the root.
pub fn to_key<P: ToPointer + ?Sized>(pointer: &P) -> Result<String, PointerError> {
    let segments = pointer.to_segments()?;
    Ok(segments.last().cloned().unwrap_or_default())
}

/// True if `long` points strictly below `short`.
///
/// With `match_is_true`, equal pointers also count. Invalid pointers never match.
pub fn is_sub_pointer<S, L>(short: &S, long: &L, match_is_true: bool) -> bool
where
    S: ToPointer + ?Sized,
    L: ToPointer + ?Sized,
{
    let (Ok(short), Ok(long)) = (compile(short), compile(long)) else {
        return false;
    };
    if match_is_true && short == long {
        return true;
    }
    long.len() > short.len() && long.starts_with(&short) && long[short.len()..].starts_with('/')
}

/// Split a dotted or bracketed object path into segments.
///
/// `a.b[0]["c.d"]['e']` yields `["a", "b", "0", "c.d", "e"]`. Pointer text is
/// parsed as a pointer instead.
pub fn parse_object_path(path: &str) -> Vec<String> {
    if is_pointer(path) {
        return parse(path).unwrap_or_default();
    }

    let mut parts = Vec::new();
    let mut index = 0;
    while index < path.len() {
        let rest = &path[index..];
        let next_dot = rest.find('.').map(|i| i + index);
        let next_bracket = rest.find('[').map(|i| i + index);

        let bracket = match (next_dot, next_bracket) {
            (None, None) => {
                parts.push(rest.to_string());
                break;
            }
            (Some(dot), None) => {
                parts.push(path[index..dot].to_string());
                index = dot + 1;
                continue;
            }
            (Some(dot), Some(bracket)) if dot < bracket => {
                parts.push(path[index..dot].to_string());
                index = dot + 1;
                continue;
            }
            (_, Some(bracket)) => bracket,
        };

        if bracket > index {
            parts.push(path[index..bracket].to_string());
        }

        match path[bracket + 1..].chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let closing = format!("{}]", quote);
                let mut search = bracket + 2;
                let end = loop {
                    match path[search..].find(&closing) {
                        Some(found) if path.as_bytes()[search + found - 1] == b'\\' => {
                            search += found + 2;
                        }
                        Some(found) => break search + found,
                        None => break path.len(),
                    }
                };
                let escaped_quote = format!("\\{}", quote);
                parts.push(path[bracket + 2..end].replace(&escaped_quote, &quote.to_string()));
                index = end + 2;
            }
            _ => {
                let end = path[bracket..]
                    .find(']')
                    .map_or(path.len(), |i| i + bracket);
                parts.push(path[bracket + 1..end].to_string());
                index = end + 1;
            }
        }

        if path.get(index..).is_some_and(|r| r.starts_with('.')) {
            index += 1;
        }
    }
    parts
}

/// Anything that can be read as a pointer: text or decomposed segments.
///
/// Decomposed sequences are used as-is; text is parsed with [`parse`].
pub trait ToPointer {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError>;
}

impl ToPointer for str {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError> {
        parse(self).map(Cow::Owned)
    }
}

impl ToPointer for String {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError> {
        self.as_str().to_segments()
    }
}

impl ToPointer for [String] {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError> {
        Ok(Cow::Borrowed(self))
    }
}

impl ToPointer for Vec<String> {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl ToPointer for [&str] {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError> {
        Ok(Cow::Owned(self.iter().map(|s| s.to_string()).collect()))
    }
}

impl<const N: usize> ToPointer for [&str; N] {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError> {
        self.as_slice().to_segments()
    }
}

impl ToPointer for Pointer {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError> {
        Ok(Cow::Borrowed(self.segments.as_slice()))
    }
}

impl<T: ToPointer + ?Sized> ToPointer for &T {
    fn to_segments(&self) -> Result<Cow<'_, [String]>, PointerError> {
        (**self).to_segments()
    }
}

/// An owned, already-parsed pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// The root pointer (`""`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse pointer text.
    pub fn parse(text: &str) -> Result<Self, PointerError> {
        parse(text).map(|segments| Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root.
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Pointer to the enclosing container, `None` for the root.
    pub fn parent(&self) -> Option<Pointer> {
        let (_, parent) = self.segments.split_last()?;
        Some(Pointer {
            segments: parent.to_vec(),
        })
    }

    /// Pointer one level deeper.
    pub fn join(&self, key: impl Into<String>) -> Pointer {
        let mut segments = self.segments.clone();
        segments.push(key.into());
        Pointer { segments }
    }
}

impl From<Vec<String>> for Pointer {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pointer::parse(s)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_and_unescape() {
        assert_eq!(escape("a/b~c"), "a~1b~0c");
        assert_eq!(unescape("a~1b~0c"), "a/b~c");
        // ~01 is an escaped "~" followed by "1", never a "/"
        assert_eq!(unescape("~01"), "~1");
    }

    #[test]
    fn is_pointer_shapes() {
        assert!(is_pointer(""));
        assert!(is_pointer("#"));
        assert!(is_pointer("/"));
        assert!(is_pointer("/a/b"));
        assert!(is_pointer("#/a"));
        assert!(is_pointer("/a~0b~1c"));
        assert!(!is_pointer("a/b"));
        assert!(!is_pointer("#a"));
        assert!(!is_pointer("/a~2"));
        assert!(!is_pointer("/a~"));
    }

    #[test]
    fn parse_pointer_text() {
        assert_eq!(parse("/a~1b/0").unwrap(), vec!["a/b", "0"]);
        assert_eq!(parse("#/a/b").unwrap(), vec!["a", "b"]);
        assert!(parse("").unwrap().is_empty());
        assert!(parse("#").unwrap().is_empty());
        assert!(parse("/").unwrap().is_empty());
        assert_eq!(parse("//").unwrap(), vec!["", ""]);
        assert!(matches!(parse("a/b"), Err(PointerError::Invalid { .. })));
    }

    #[test]
    fn compile_segments() {
        let segments = vec!["a/b".to_string(), "0".to_string()];
        assert_eq!(compile(&segments).unwrap(), "/a~1b/0");
        assert_eq!(compile("#").unwrap(), "");
        assert_eq!(compile("#/a/b").unwrap(), "/a/b");
        assert_eq!(compile_with_default(&["a", "", "c"], "-").unwrap(), "/a/-/c");
        assert!(compile("nope").is_err());
    }

    #[test]
    fn to_key_returns_last_segment() {
        assert_eq!(to_key("/a/b").unwrap(), "b");
        assert_eq!(to_key("").unwrap(), "");
        assert!(to_key("bad").is_err());
    }

    #[test]
    fn sub_pointers() {
        assert!(is_sub_pointer("/a", "/a/b", false));
        assert!(!is_sub_pointer("/a", "/ab", false));
        assert!(!is_sub_pointer("/a", "/a", false));
        assert!(is_sub_pointer("/a", "/a", true));
        assert!(is_sub_pointer("", "/a", false));
        assert!(!is_sub_pointer("bad", "/a/b", true));
    }

    #[test]
    fn object_paths() {
        assert_eq!(parse_object_path("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(parse_object_path("a[0].b"), vec!["a", "0", "b"]);
        assert_eq!(
            parse_object_path(r#"a["c.d"]['e'][1]"#),
            vec!["a", "c.d", "e", "1"]
        );
        assert_eq!(parse_object_path(r#"["say \"hi\""]"#), vec![r#"say "hi""#]);
        assert_eq!(parse_object_path("/a/0"), vec!["a", "0"]);
        assert_eq!(parse_object_path("a[unterminated"), vec!["a", "unterminated"]);
    }

    #[test]
    fn pointer_type() {
        let ptr: Pointer = "/a/0".parse().unwrap();
        assert_eq!(ptr.key(), Some("0"));
        assert_eq!(ptr.parent().unwrap().to_string(), "/a");
        assert_eq!(ptr.join("x/y").to_string(), "/a/0/x~1y");
        assert!(Pointer::root().is_root());
        assert!(Pointer::root().parent().is_none());
    }
}
