// crates/devprofile-rs-iodd/src/model/comm.rs

//! Contains model structs related to `<CommNetworkProfile>`.

use serde::{Deserialize, Serialize};

/// Represents `<CommNetworkProfile>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CommNetworkProfile {
    #[serde(
        rename = "@xsi:type",
        alias = "@type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub xsi_type: Option<String>,

    #[serde(rename = "@iolinkRevision", default, skip_serializing_if = "Option::is_none")]
    pub iolink_revision: Option<String>,

    #[serde(rename = "TransportLayers", default, skip_serializing_if = "Option::is_none")]
    pub transport_layers: Option<TransportLayers>,

    #[serde(rename = "Test", default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Test>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TransportLayers {
    #[serde(rename = "PhysicalLayer", default, skip_serializing_if = "Option::is_none")]
    pub physical_layer: Option<PhysicalLayer>,
}

/// Represents `<PhysicalLayer>`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct PhysicalLayer {
    #[serde(rename = "@bitrate", default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,

    #[serde(rename = "@minCycleTime", default, skip_serializing_if = "Option::is_none")]
    pub min_cycle_time: Option<String>,

    #[serde(rename = "@sioSupported", default, skip_serializing_if = "Option::is_none")]
    pub sio_supported: Option<String>,

    #[serde(
        rename = "@mSequenceCapability",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub m_sequence_capability: Option<String>,

    #[serde(rename = "Connection", default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<Connection>,
}

/// Represents `<Connection xsi:type="...">` with up to five wires.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Connection {
    #[serde(rename = "@xsi:type", alias = "@type")]
    pub xsi_type: String,

    #[serde(rename = "Wire1", default, skip_serializing_if = "Option::is_none")]
    pub wire1: Option<Wire>,
    #[serde(rename = "Wire2", default, skip_serializing_if = "Option::is_none")]
    pub wire2: Option<Wire>,
    #[serde(rename = "Wire3", default, skip_serializing_if = "Option::is_none")]
    pub wire3: Option<Wire>,
    #[serde(rename = "Wire4", default, skip_serializing_if = "Option::is_none")]
    pub wire4: Option<Wire>,
    #[serde(rename = "Wire5", default, skip_serializing_if = "Option::is_none")]
    pub wire5: Option<Wire>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Wire {
    #[serde(rename = "@color", default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(rename = "@function", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

/// Represents `<Test>` with its fixed `Config1`..`Config7` slots.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Test {
    #[serde(rename = "Config1", default, skip_serializing_if = "Option::is_none")]
    pub config1: Option<TestConfig>,
    #[serde(rename = "Config2", default, skip_serializing_if = "Option::is_none")]
    pub config2: Option<TestConfig>,
    #[serde(rename = "Config3", default, skip_serializing_if = "Option::is_none")]
    pub config3: Option<TestConfig>,
    #[serde(rename = "Config4", default, skip_serializing_if = "Option::is_none")]
    pub config4: Option<TestConfig>,
    #[serde(rename = "Config5", default, skip_serializing_if = "Option::is_none")]
    pub config5: Option<TestConfig>,
    #[serde(rename = "Config6", default, skip_serializing_if = "Option::is_none")]
    pub config6: Option<TestConfig>,
    #[serde(rename = "Config7", default, skip_serializing_if = "Option::is_none")]
    pub config7: Option<TestConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TestConfig {
    #[serde(rename = "@index")]
    pub index: String,

    #[serde(rename = "@testValue", default, skip_serializing_if = "Option::is_none")]
    pub test_value: Option<String>,

    #[serde(rename = "EventTrigger", default, skip_serializing_if = "Vec::is_empty")]
    pub event_trigger: Vec<EventTrigger>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct EventTrigger {
    #[serde(rename = "@appearValue")]
    pub appear_value: String,

    #[serde(rename = "@disappearValue")]
    pub disappear_value: String,
}
