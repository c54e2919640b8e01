//! Domain models for configuration trees, flattened items and envelopes

pub mod envelope;
pub mod item;
pub mod tree;

pub use envelope::{
    ChannelHeader, ConfigSignature, ConfigUpdate, ConfigUpdateEnvelope, Envelope, Header,
    HeaderType, Payload, SignatureHeader, SignedData,
};
pub use item::{FlatItem, GroupMembership, ItemContent, ItemKind, PolicyReference};
pub use tree::{ConfigGroup, ConfigPolicy, ConfigValue, PolicyDefinition};
