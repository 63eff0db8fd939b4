//! Macro for implementing Display and FromStr for name-keyed enums
//!
//! Permissions (and any other enum that travels as a short lowercase name in
//! query strings or config files) share one implementation for both traits.
//!
//! # Example
//!
//! ```rust
//! use vkclient_domain::impl_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum AuthDisplay {
//!     Page,
//!     Popup,
//! }
//!
//! impl_name_conversions!(AuthDisplay {
//!     Page => "page",
//!     Popup => "popup",
//! });
//! ```

/// Implements Display and FromStr traits for name-keyed enums
///
/// Parsing is case-insensitive and surrounding whitespace is ignored, so
/// `" Photos"` from a comma-separated list parses like `"photos"`.
#[macro_export]
macro_rules! impl_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
