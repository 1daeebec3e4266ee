// crates/devprofile-rs-iodd/src/resolver/comm.rs

//! Resolves `<CommNetworkProfile>`: physical layer, wiring and test configuration.

use super::utils::opt_bool;
use crate::model::comm::{CommNetworkProfile, Test, TestConfig as ModelTestConfig};
use devprofile_rs::error::ParseError;
use devprofile_rs::model::{
    CommunicationProfile, EventTrigger, TestConfig, TestEntry, Wire, WiringConfig,
};
use devprofile_rs::numeric::{parse_u16, parse_u32, parse_u8};

pub(super) fn resolve_communication(
    comm: &CommNetworkProfile,
) -> Result<CommunicationProfile, ParseError> {
    let path = "CommNetworkProfile/TransportLayers/PhysicalLayer";
    let mut profile = CommunicationProfile {
        protocol_revision: comm.iolink_revision.clone(),
        ..Default::default()
    };
    if let Some(phy) = comm
        .transport_layers
        .as_ref()
        .and_then(|t| t.physical_layer.as_ref())
    {
        profile.bitrate = phy.bitrate.clone();
        profile.min_cycle_time = phy
            .min_cycle_time
            .as_deref()
            .map(|v| parse_u32(v, &format!("{}/@minCycleTime", path)))
            .transpose()?;
        profile.sio_supported =
            opt_bool(phy.sio_supported.as_ref(), &format!("{}/@sioSupported", path))?;
        profile.m_sequence_capability = phy
            .m_sequence_capability
            .as_deref()
            .map(|v| parse_u8(v, &format!("{}/@mSequenceCapability", path)))
            .transpose()?;
    }
    Ok(profile)
}

pub(super) fn resolve_wiring(comm: &CommNetworkProfile) -> Option<WiringConfig> {
    let connection = comm
        .transport_layers
        .as_ref()?
        .physical_layer
        .as_ref()?
        .connection
        .as_ref()?;

    let slots = [
        &connection.wire1,
        &connection.wire2,
        &connection.wire3,
        &connection.wire4,
        &connection.wire5,
    ];
    let wires = (1u8..)
        .zip(slots)
        .filter_map(|(number, wire)| {
            wire.as_ref().map(|w| Wire {
                number,
                color: w.color.clone(),
                function: w.function.clone(),
            })
        })
        .collect();

    Some(WiringConfig {
        connection_type: connection.xsi_type.clone(),
        wires,
    })
}

pub(super) fn resolve_test(test: &Test) -> Result<TestConfig, ParseError> {
    let slots = [
        &test.config1,
        &test.config2,
        &test.config3,
        &test.config4,
        &test.config5,
        &test.config6,
        &test.config7,
    ];
    let mut entries = Vec::new();
    for (slot, config) in (1u8..).zip(slots) {
        if let Some(config) = config {
            entries.push(test_entry(slot, config)?);
        }
    }
    Ok(TestConfig { entries })
}

fn test_entry(slot: u8, config: &ModelTestConfig) -> Result<TestEntry, ParseError> {
    let path = format!("CommNetworkProfile/Test/Config{}", slot);
    let triggers = config
        .event_trigger
        .iter()
        .map(|t| {
            Ok(EventTrigger {
                appear_value: parse_u16(
                    &t.appear_value,
                    &format!("{}/EventTrigger/@appearValue", path),
                )?,
                disappear_value: parse_u16(
                    &t.disappear_value,
                    &format!("{}/EventTrigger/@disappearValue", path),
                )?,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(TestEntry {
        slot,
        index: parse_u16(&config.index, &format!("{}/@index", path))?,
        test_value: config.test_value.clone().unwrap_or_default(),
        triggers,
    })
}
