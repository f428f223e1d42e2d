//! URL-safe slug type used as the human-readable key for tenants and products.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input string is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input starts or ends with a hyphen.
    #[error("slug cannot start or end with '-'")]
    EdgeHyphen,
}

/// A URL-safe identifier.
///
/// ## Constraints
///
/// - Length: 1-96 characters (matches the content platform's slug field)
/// - Only lowercase ASCII letters, digits and `-`
/// - No leading or trailing `-`
///
/// ## Examples
///
/// ```
/// use tenantmart_core::Slug;
///
/// assert!(Slug::parse("demo-store").is_ok());
/// assert!(Slug::parse("Demo Store").is_err());
/// assert_eq!(Slug::from_name("Demo Store!").unwrap().as_str(), "demo-store");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum length of a slug.
    pub const MAX_LENGTH: usize = 96;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 96 characters,
    /// contains anything other than `[a-z0-9-]`, or has an edge hyphen.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter(c));
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }

        Ok(Self(s.to_owned()))
    }

    /// Derive a slug from a display name.
    ///
    /// Letters are lowercased, runs of other characters collapse into a single
    /// `-`, and the result is trimmed and truncated to [`Self::MAX_LENGTH`].
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if the name has no ASCII alphanumerics.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let mut out = String::with_capacity(name.len());
        let mut pending_hyphen = false;

        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_hyphen && !out.is_empty() {
                    out.push('-');
                }
                pending_hyphen = false;
                out.push(c.to_ascii_lowercase());
            } else {
                pending_hyphen = true;
            }
        }

        out.truncate(Self::MAX_LENGTH);
        let trimmed = out.trim_end_matches('-');
        Self::parse(trimmed)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Slug::parse("demo-store").is_ok());
        assert!(Slug::parse("example").is_ok());
        assert!(Slug::parse("shop-42").is_ok());
        assert!(Slug::parse("a").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(97);
        assert!(matches!(Slug::parse(&long), Err(SlugError::TooLong { .. })));
    }

    #[test]
    fn test_parse_rejects_uppercase_and_spaces() {
        assert_eq!(
            Slug::parse("Demo"),
            Err(SlugError::InvalidCharacter('D'))
        );
        assert_eq!(
            Slug::parse("demo store"),
            Err(SlugError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_parse_rejects_edge_hyphens() {
        assert_eq!(Slug::parse("-demo"), Err(SlugError::EdgeHyphen));
        assert_eq!(Slug::parse("demo-"), Err(SlugError::EdgeHyphen));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Slug::from_name("Demo Store").unwrap().as_str(), "demo-store");
        assert_eq!(
            Slug::from_name("  Tom's   Fine -- Goods! ").unwrap().as_str(),
            "tom-s-fine-goods"
        );
        assert_eq!(Slug::from_name("!!!"), Err(SlugError::Empty));
    }

    #[test]
    fn test_from_name_truncates() {
        let name = "x".repeat(200);
        assert_eq!(Slug::from_name(&name).unwrap().as_str().len(), Slug::MAX_LENGTH);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Slug = serde_json::from_str("\"demo-store\"").unwrap();
        assert_eq!(ok.as_str(), "demo-store");
        assert!(serde_json::from_str::<Slug>("\"Not A Slug\"").is_err());
    }
}
