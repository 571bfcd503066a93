/*!
 * Core Types
 * Caller identity and type-name helpers shared by the throw subsystem
 */

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Suffix appended by the probe fn inside [`caller!`](crate::caller)
#[doc(hidden)]
pub const PROBE_SUFFIX: &str = "::__throw_caller_probe";

const CLOSURE_SUFFIX: &str = "::{{closure}}";

/// Identity of the function that raised a signal
///
/// Normally captured with [`caller!`](crate::caller); callers without macro
/// access (FFI shims, generated code) can use [`Caller::explicit`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller {
    path: Cow<'static, str>,
    member: Cow<'static, str>,
    file: Cow<'static, str>,
    line: u32,
    column: u32,
}

impl Caller {
    /// Build from the type path of a probe fn nested in the caller
    #[doc(hidden)]
    pub fn from_probe(probe: &'static str, file: &'static str, line: u32, column: u32) -> Self {
        let mut path = probe.strip_suffix(PROBE_SUFFIX).unwrap_or(probe);
        while let Some(outer) = path.strip_suffix(CLOSURE_SUFFIX) {
            path = outer;
        }

        Self {
            path: Cow::Borrowed(path),
            member: Cow::Borrowed(last_segment(path)),
            file: Cow::Borrowed(file),
            line,
            column,
        }
    }

    /// Caller identity supplied by hand, without a source location
    pub fn explicit(member: impl Into<Cow<'static, str>>) -> Self {
        let member = member.into();
        Self {
            path: member.clone(),
            member,
            file: Cow::Borrowed("<unknown>"),
            line: 0,
            column: 0,
        }
    }

    /// Bare name of the enclosing function
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Fully qualified path of the enclosing function
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// `file:line:column`
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.location())
    }
}

/// Capture the identity of the immediately-enclosing function
///
/// ```
/// fn load_manifest() -> ai_os_throw::Caller {
///     ai_os_throw::caller!()
/// }
///
/// assert_eq!(load_manifest().member(), "load_manifest");
/// ```
#[macro_export]
macro_rules! caller {
    () => {{
        fn __throw_caller_probe() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::core::types::Caller::from_probe(
            __type_name_of(__throw_caller_probe),
            file!(),
            line!(),
            column!(),
        )
    }};
}

/// Short name of a type: last path segment with generic arguments removed
///
/// `std::io::Error` becomes `Error`, `my::Wrapper<my::Inner>` becomes `Wrapper`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = match full.find('<') {
        Some(idx) => &full[..idx],
        None => full,
    };
    last_segment(base)
}

fn last_segment(path: &str) -> &str {
    // Segments inside `<impl X for Y>` may contain `::`; only split outside brackets
    let mut depth = 0usize;
    let mut start = 0usize;
    let bytes = path.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    &path[start..]
}
