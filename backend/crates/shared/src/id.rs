//! Common ID Types
//!
//! Type-safe, prefixed string IDs for dashboard entities.
//!
//! The dashboard addresses every record by a human-readable key such as
//! `user_2` or `camp_1`. [`Id<T>`] keeps that wire format while preventing a
//! campaign ID from being passed where a user ID is expected.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Prefix carried by every ID of a marker type
pub trait IdPrefix {
    const PREFIX: &'static str;
}

/// Error returned when a string does not carry the expected prefix
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id {value:?}: expected prefix `{expected}_`")]
pub struct IdParseError {
    pub value: String,
    pub expected: &'static str,
}

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type CampaignId = Id<markers::Campaign>;
///
/// let id = CampaignId::parse("camp_1").unwrap();
/// assert_eq!(id.as_str(), "camp_1");
/// assert!(CampaignId::parse("user_1").is_err());
/// ```
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: IdPrefix> Id<T> {
    /// Create a new random ID: `<prefix>_<uuid v4 simple>`
    pub fn generate() -> Self {
        Self::from_suffix(Uuid::new_v4().simple())
    }

    /// Create `<prefix>_<suffix>`
    pub fn from_suffix(suffix: impl fmt::Display) -> Self {
        Self {
            value: format!("{}_{}", T::PREFIX, suffix),
            _marker: PhantomData,
        }
    }

    /// Parse an ID, requiring the marker's prefix and a non-empty suffix
    pub fn parse(value: impl Into<String>) -> Result<Self, IdParseError> {
        let value = value.into();
        let valid = value
            .strip_prefix(T::PREFIX)
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|suffix| !suffix.is_empty());

        if valid {
            Ok(Self {
                value,
                _marker: PhantomData,
            })
        } else {
            Err(IdParseError {
                value,
                expected: T::PREFIX,
            })
        }
    }
}

impl<T> Id<T> {
    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Convert into the underlying string
    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialEq<str> for Id<T> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl<T> PartialEq<&str> for Id<T> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T: IdPrefix> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    use super::IdPrefix;

    macro_rules! marker {
        ($($name:ident => $prefix:literal),+ $(,)?) => {
            $(
                #[derive(Debug)]
                pub struct $name;

                impl IdPrefix for $name {
                    const PREFIX: &'static str = $prefix;
                }
            )+
        };
    }

    marker! {
        User => "user",
        Campaign => "camp",
        Conversion => "conv",
        Payment => "pay",
        PaymentMethod => "pm",
        Link => "link",
        Notification => "notif",
        Click => "click",
    }
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type CampaignId = Id<markers::Campaign>;
pub type ConversionId = Id<markers::Conversion>;
pub type PaymentId = Id<markers::Payment>;
pub type PaymentMethodId = Id<markers::PaymentMethod>;
pub type LinkId = Id<markers::Link>;
pub type NotificationId = Id<markers::Notification>;
pub type ClickId = Id<markers::Click>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requires_prefix() {
        assert!(UserId::parse("user_1").is_ok());
        assert!(UserId::parse("camp_1").is_err());
        assert!(UserId::parse("user_").is_err());
        assert!(UserId::parse("username").is_err());
    }

    #[test]
    fn test_generate_carries_prefix() {
        let a = CampaignId::generate();
        let b = CampaignId::generate();
        assert!(a.as_str().starts_with("camp_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_suffix() {
        let id = LinkId::from_suffix(7);
        assert_eq!(id.as_str(), "link_7");
        assert_eq!(id, "link_7");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = ConversionId::parse("conv_2").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"conv_2\"");

        let back: ConversionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<ConversionId>("\"user_2\"").is_err());
    }
}
