// crates/devprofile-rs-iodd/src/builder/comm.rs

use crate::model::comm::{
    self as model, CommNetworkProfile, Connection, PhysicalLayer, TransportLayers,
};
use devprofile_rs::model::{CommunicationProfile, TestConfig, TestEntry, WiringConfig};
use log::warn;

/// Builds `<CommNetworkProfile>` when any of its parts is present.
pub(super) fn build_comm_network_profile(
    comm: Option<&CommunicationProfile>,
    wiring: Option<&WiringConfig>,
    test: &TestConfig,
) -> Option<CommNetworkProfile> {
    if comm.is_none() && wiring.is_none() && test.entries.is_empty() {
        return None;
    }

    let connection = wiring.map(build_connection);
    let physical_layer = match (comm, connection) {
        (None, None) => None,
        (comm, connection) => Some(PhysicalLayer {
            bitrate: comm.and_then(|c| c.bitrate.clone()),
            min_cycle_time: comm.and_then(|c| c.min_cycle_time).map(|v| v.to_string()),
            sio_supported: comm.and_then(|c| c.sio_supported).map(|v| v.to_string()),
            m_sequence_capability: comm
                .and_then(|c| c.m_sequence_capability)
                .map(|v| v.to_string()),
            connection,
        }),
    };

    Some(CommNetworkProfile {
        xsi_type: Some("IOLinkCommNetworkProfileT".into()),
        iolink_revision: comm.and_then(|c| c.protocol_revision.clone()),
        transport_layers: physical_layer.map(|p| TransportLayers {
            physical_layer: Some(p),
        }),
        test: (!test.entries.is_empty()).then(|| build_test(test)),
    })
}

fn build_connection(wiring: &WiringConfig) -> Connection {
    let mut connection = Connection {
        xsi_type: wiring.connection_type.clone(),
        ..Default::default()
    };
    for wire in &wiring.wires {
        let built = Some(model::Wire {
            color: wire.color.clone(),
            function: wire.function.clone(),
        });
        match wire.number {
            1 => connection.wire1 = built,
            2 => connection.wire2 = built,
            3 => connection.wire3 = built,
            4 => connection.wire4 = built,
            5 => connection.wire5 = built,
            n => warn!("Wire{} does not exist in the markup grammar, skipping", n),
        }
    }
    connection
}

fn build_test(test: &TestConfig) -> model::Test {
    let mut built = model::Test::default();
    for entry in &test.entries {
        let config = Some(build_test_entry(entry));
        match entry.slot {
            1 => built.config1 = config,
            2 => built.config2 = config,
            3 => built.config3 = config,
            4 => built.config4 = config,
            5 => built.config5 = config,
            6 => built.config6 = config,
            7 => built.config7 = config,
            n => warn!("Test Config{} does not exist in the markup grammar, skipping", n),
        }
    }
    built
}

fn build_test_entry(entry: &TestEntry) -> model::TestConfig {
    model::TestConfig {
        index: entry.index.to_string(),
        test_value: (!entry.test_value.is_empty()).then(|| entry.test_value.clone()),
        event_trigger: entry
            .triggers
            .iter()
            .map(|t| model::EventTrigger {
                appear_value: t.appear_value.to_string(),
                disappear_value: t.disappear_value.to_string(),
            })
            .collect(),
    }
}
