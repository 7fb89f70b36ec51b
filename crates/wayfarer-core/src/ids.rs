//! Strongly typed record identifiers.
//!
//! Every identifier wraps a UUID and serializes transparently as its
//! hyphenated string form. Reference fields hold one of these rather than
//! a loaded record; resolution goes through
//! [`ReferenceResolver`](crate::repository::ReferenceResolver).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random (v4) identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

record_id! {
    /// Identifier of a [`DocumentType`](crate::models::document_type::DocumentType).
    DocumentTypeId
}

record_id! {
    /// Identifier of a [`TourDocument`](crate::models::tour_document::TourDocument).
    TourDocumentId
}

record_id! {
    /// Identifier of a custom tour owned by the tour service.
    CustomTourId
}

record_id! {
    /// Identifier of a user account owned by the user service.
    UserId
}
