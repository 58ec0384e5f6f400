//! Strongly-typed ID wrappers
//!
//! Newtype wrappers keep income source, period, bill and assignment IDs from
//! being mixed up at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generates an ID newtype around a v4 UUID with a short display prefix
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse a full UUID, with or without the display prefix
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// True when `s` is this ID's short display form or its full UUID
            pub fn matches(&self, s: &str) -> bool {
                self.to_string() == s || self.0.to_string() == s
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_id!(IncomeSourceId, "inc-");
define_id!(PayPeriodId, "per-");
define_id!(BillId, "bil-");
define_id!(AssignmentId, "asg-");
