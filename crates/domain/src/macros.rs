//! Macro for implementing Display and FromStr for small domain enums
//!
//! # Example
//!
//! ```rust
//! use proxyq_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Side {
//!     Head,
//!     Tail,
//! }
//!
//! impl_domain_enum_conversions!(Side {
//!     Head => "head",
//!     Tail => "tail",
//! });
//!
//! assert_eq!("TAIL".parse::<Side>().unwrap(), Side::Tail);
//! assert_eq!(Side::Head.to_string(), "head");
//! ```

/// Implements Display and FromStr for unit-variant enums
///
/// - Display writes the lowercase label
/// - FromStr accepts the label case-insensitively (surrounding whitespace is
///   ignored) and fails with [`ProxyQError::InvalidInput`] otherwise
///
/// [`ProxyQError::InvalidInput`]: crate::ProxyQError::InvalidInput
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = $crate::ProxyQError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    other => Err($crate::ProxyQError::InvalidInput(format!(
                        "invalid {}: '{}'",
                        stringify!($enum_name),
                        other
                    ))),
                }
            }
        }
    };
}
