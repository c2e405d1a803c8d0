// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID generation abstractions.
//!
//! Adapted from a fixed-size inline ID buffer. That worked when every ID was
//! generated by the process itself at a known length. Here, `JobRunId` and
//! friends frequently wrap whatever string an external publisher put on the
//! bus (a UUID, a short slug, an upstream message id), so the backing store
//! is a small-string-optimized [`smol_str::SmolStr`] instead: cheap to clone
//! for our own generated ids, unbounded for everyone else's.

pub use smol_str::SmolStr;

/// Define a newtype ID wrapper around [`SmolStr`] with a generation prefix.
///
/// Generates `new()` for random ID generation (`{prefix}{nanoid}`),
/// `from_string()` for wrapping an externally supplied id verbatim, plus
/// `Display`, `From<String>`, `From<&str>`, `Borrow<str>`, and `Deref`.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name($crate::id::SmolStr);

        impl $name {
            pub const PREFIX: &'static str = concat!(stringify!($name), "-");

            /// Generate a new random id with the type's generation prefix.
            pub fn new() -> Self {
                Self($crate::id::SmolStr::new(format!(
                    "{}{}",
                    Self::PREFIX,
                    nanoid::nanoid!(16)
                )))
            }

            /// Wrap an existing id (e.g. one supplied by a publisher) verbatim.
            pub fn from_string(id: impl AsRef<str>) -> Self {
                Self($crate::id::SmolStr::new(id.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_string(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
