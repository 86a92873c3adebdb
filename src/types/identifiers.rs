//! Unique identifier types for generated entities
//!
//! Identifiers are UUIDs drawn from the run's seeded random streams rather than
//! from the operating system, so that two runs with the same seed and scenario
//! produce byte-identical identifiers. Each type renders with a short prefix
//! (`CUST_`, `ORD_`, ...) and accepts either the prefixed or the raw UUID form
//! when deserializing.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Prefix used in the rendered form of this identifier
            pub const PREFIX: &'static str = $prefix;

            /// Draw a new identifier from a seeded random stream
            pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
                Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0.simple())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                let raw = s.strip_prefix($prefix).unwrap_or(&s);
                let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
                Ok($name(uuid))
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a customer
    CustomerId,
    "CUST_"
);
entity_id!(
    /// Unique identifier for a supplier
    SupplierId,
    "SUP_"
);
entity_id!(
    /// Unique identifier for a catalogue product
    ProductId,
    "PROD_"
);
entity_id!(
    /// Unique identifier for a marketing campaign
    CampaignId,
    "CAMP_"
);
entity_id!(
    /// Unique identifier for an order
    OrderId,
    "ORD_"
);
entity_id!(
    /// Unique identifier for a single order line
    OrderItemId,
    "ITEM_"
);
entity_id!(
    /// Unique identifier for a browsing session
    SessionId,
    "SESS_"
);
entity_id!(
    /// Unique identifier for a support ticket
    TicketId,
    "TKT_"
);
entity_id!(
    /// Unique identifier for an abandoned cart
    AbandonmentId,
    "CART_"
);
entity_id!(
    /// Unique identifier for a return record
    ReturnId,
    "RET_"
);
