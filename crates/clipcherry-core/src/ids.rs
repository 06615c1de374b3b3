//! Identifier types for CLIPcherry.
//!
//! Every record in the relational store is keyed by an autoincrement integer.
//! The newtypes below keep a user id from being passed where a content id is
//! expected; all of them serialize as plain JSON numbers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Return the raw row id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Parse a client-supplied id, which must be a positive integer.
            ///
            /// # Errors
            ///
            /// Returns `IdError::NotPositive` for zero or negative values.
            pub const fn positive(id: i64) -> Result<Self, IdError> {
                if id > 0 {
                    Ok(Self(id))
                } else {
                    Err(IdError::NotPositive)
                }
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id = s.parse::<i64>().map_err(|_| IdError::NotAnInteger)?;
                Self::positive(id)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdError;

            fn try_from(id: i64) -> Result<Self, Self::Error> {
                Self::positive(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

int_id!(
    /// A registered user. Creators are users too.
    UserId
);

int_id!(
    /// A piece of creator-owned content.
    ContentId
);

int_id!(
    /// A subscription row.
    SubscriptionId
);

int_id!(
    /// A purchase order.
    OrderId
);

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not an integer.
    #[error("identifier is not an integer")]
    NotAnInteger,

    /// The input is zero or negative.
    #[error("identifier must be positive")]
    NotPositive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers() {
        assert_eq!("42".parse::<OrderId>().unwrap(), OrderId::new(42));
    }

    #[test]
    fn rejects_garbage_and_non_positive() {
        assert_eq!("abc".parse::<OrderId>(), Err(IdError::NotAnInteger));
        assert_eq!("1.5".parse::<OrderId>(), Err(IdError::NotAnInteger));
        assert_eq!("0".parse::<OrderId>(), Err(IdError::NotPositive));
        assert_eq!(UserId::positive(-3), Err(IdError::NotPositive));
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&ContentId::new(7)).unwrap();
        assert_eq!(json, "7");
        let parsed: ContentId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, ContentId::new(7));
    }

    #[test]
    fn debug_names_the_type() {
        assert_eq!(format!("{:?}", UserId::new(3)), "UserId(3)");
    }
}
