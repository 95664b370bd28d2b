//! Provider mapping option syntax used by the OVN and Open vSwitch charms
//!
//! Options such as `ovn-bridge-mappings`, `bridge-interface-mappings`,
//! `data-port` and `vlan-ranges` hold whitespace separated `left:right`
//! entries. Only the first `:` splits an entry, so MAC addresses survive as
//! right-hand values.

use std::collections::BTreeMap;
use thiserror::Error;

/// Bridge used for a data port given without one
pub const DEFAULT_DATA_BRIDGE: &str = "br-data";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("mapping '{0}' must be of the form <left>:<right>")]
    MissingSeparator(String),

    #[error("mapping '{0}' has an empty side")]
    EmptySide(String),

    #[error("port '{port}' is configured on more than one bridge")]
    DuplicatePort { port: String },

    #[error("invalid VLAN range '{range}' for provider '{provider}'")]
    InvalidRange { provider: String, range: String },
}

/// How an option's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    Bridge,
    DataPort,
    VlanRange,
}

impl MappingKind {
    /// Kind for an option key, judged by its suffix
    pub fn for_option(key: &str) -> Option<Self> {
        if key.ends_with("bridge-mappings") {
            Some(MappingKind::Bridge)
        } else if key.ends_with("interface-mappings") || key.ends_with("data-port") {
            Some(MappingKind::DataPort)
        } else if key.ends_with("vlan-ranges") {
            Some(MappingKind::VlanRange)
        } else {
            None
        }
    }

    /// Parse `value` and report only whether it is well formed
    pub fn check(self, value: &str) -> Result<(), MappingError> {
        match self {
            MappingKind::Bridge => parse_bridge_mappings(value).map(drop),
            MappingKind::DataPort => {
                parse_data_port_mappings(value, DEFAULT_DATA_BRIDGE).map(drop)
            }
            MappingKind::VlanRange => parse_vlan_range_mappings(value).map(drop),
        }
    }
}

/// Split whitespace separated `left:right` entries into a map
///
/// Keyed on the left value by default. With `key_rvalue` the map is keyed
/// on the right value and entries without `:` are skipped, which lets the
/// same left value carry several right values.
pub fn parse_mappings(mappings: &str, key_rvalue: bool) -> BTreeMap<String, String> {
    let mut parsed = BTreeMap::new();
    for entry in mappings.split_whitespace() {
        let (left, separator, right) = match entry.split_once(':') {
            Some((left, right)) => (left.trim(), true, right.trim()),
            None => (entry.trim(), false, ""),
        };

        if key_rvalue {
            if !separator {
                continue;
            }
            parsed.insert(right.to_string(), left.to_string());
        } else {
            parsed.insert(left.to_string(), right.to_string());
        }
    }
    parsed
}

/// `provider:bridge` entries as `{provider: bridge}`
pub fn parse_bridge_mappings(mappings: &str) -> Result<BTreeMap<String, String>, MappingError> {
    for entry in mappings.split_whitespace() {
        match entry.split_once(':') {
            None => return Err(MappingError::MissingSeparator(entry.to_string())),
            Some((left, right)) if left.is_empty() || right.is_empty() => {
                return Err(MappingError::EmptySide(entry.to_string()));
            }
            Some(_) => {}
        }
    }
    Ok(parse_mappings(mappings, false))
}

/// `bridge:port` entries as `{port: bridge}`
///
/// A value holding only a port name maps that port to `default_bridge`.
/// Once any `bridge:port` entry is present, bare entries are ignored.
/// Ports may be interface names or MAC addresses.
pub fn parse_data_port_mappings(
    mappings: &str,
    default_bridge: &str,
) -> Result<BTreeMap<String, String>, MappingError> {
    let entries: Vec<&str> = mappings.split_whitespace().collect();
    let Some(first) = entries.first() else {
        return Ok(BTreeMap::new());
    };

    if entries.iter().all(|entry| !entry.contains(':')) {
        return Ok(BTreeMap::from([(
            (*first).to_string(),
            default_bridge.to_string(),
        )]));
    }

    let mut ports: BTreeMap<String, String> = BTreeMap::new();
    for entry in entries {
        // bare ports are only meaningful as the whole value
        let Some((bridge, port)) = entry.split_once(':') else {
            continue;
        };
        if bridge.is_empty() || port.is_empty() {
            return Err(MappingError::EmptySide(entry.to_string()));
        }
        if ports
            .insert(port.to_string(), bridge.to_string())
            .is_some_and(|previous| previous != bridge)
        {
            return Err(MappingError::DuplicatePort {
                port: port.to_string(),
            });
        }
    }
    Ok(ports)
}

/// `provider[:start:end]` entries as `{provider: Some((start, end))}`
pub fn parse_vlan_range_mappings(
    mappings: &str,
) -> Result<BTreeMap<String, Option<(u16, u16)>>, MappingError> {
    let mut ranges = BTreeMap::new();
    for (provider, range) in parse_mappings(mappings, false) {
        if provider.is_empty() {
            return Err(MappingError::EmptySide(mappings.trim().to_string()));
        }
        let parsed = if range.is_empty() {
            None
        } else {
            Some(parse_vlan_range(&provider, &range)?)
        };
        ranges.insert(provider, parsed);
    }
    Ok(ranges)
}

fn parse_vlan_range(provider: &str, range: &str) -> Result<(u16, u16), MappingError> {
    let invalid = || MappingError::InvalidRange {
        provider: provider.to_string(),
        range: range.to_string(),
    };
    let (start, end) = range.split_once(':').ok_or_else(invalid)?;
    let start: u16 = start.parse().map_err(|_| invalid())?;
    let end: u16 = end.parse().map_err(|_| invalid())?;
    if start == 0 || end > 4094 || start > end {
        return Err(invalid());
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mappings_lvalue_keyed() {
        let parsed = parse_mappings("physnet1:br-ex physnet2:br-data", false);
        assert_eq!(parsed.get("physnet1").map(String::as_str), Some("br-ex"));
        assert_eq!(parsed.get("physnet2").map(String::as_str), Some("br-data"));
    }

    #[test]
    fn test_parse_mappings_rvalue_keyed_skips_bare() {
        let parsed = parse_mappings("br-ex:eth1 eth2 br-ex:eth3", true);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("eth1").map(String::as_str), Some("br-ex"));
        assert_eq!(parsed.get("eth3").map(String::as_str), Some("br-ex"));
    }

    #[test]
    fn test_parse_mappings_empty() {
        assert!(parse_mappings("", false).is_empty());
        assert!(parse_mappings("   ", true).is_empty());
    }

    #[test]
    fn test_bridge_mappings() {
        let parsed = parse_bridge_mappings("physnet1:br-provider").unwrap();
        assert_eq!(parsed.get("physnet1").map(String::as_str), Some("br-provider"));
        assert!(matches!(
            parse_bridge_mappings("physnet1"),
            Err(MappingError::MissingSeparator(_))
        ));
        assert!(matches!(
            parse_bridge_mappings("physnet1:"),
            Err(MappingError::EmptySide(_))
        ));
    }

    #[test]
    fn test_data_port_with_mac_address() {
        let parsed = parse_data_port_mappings("br-provider:00:00:5e:00:00:42", DEFAULT_DATA_BRIDGE)
            .unwrap();
        assert_eq!(
            parsed.get("00:00:5e:00:00:42").map(String::as_str),
            Some("br-provider")
        );
    }

    #[test]
    fn test_data_port_only_uses_default_bridge() {
        let parsed = parse_data_port_mappings("eth1", DEFAULT_DATA_BRIDGE).unwrap();
        assert_eq!(parsed.get("eth1").map(String::as_str), Some("br-data"));
        assert!(parse_data_port_mappings("", DEFAULT_DATA_BRIDGE)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_data_port_same_port_two_bridges() {
        let result = parse_data_port_mappings("br-ex:eth1 br-data:eth1", DEFAULT_DATA_BRIDGE);
        assert_eq!(
            result,
            Err(MappingError::DuplicatePort {
                port: "eth1".to_string()
            })
        );
    }

    #[test]
    fn test_data_port_mixed_bare_entry() {
        let ports = parse_data_port_mappings("br-ex:eth1 eth2", DEFAULT_DATA_BRIDGE).unwrap();
        assert_eq!(
            ports,
            BTreeMap::from([("eth1".to_string(), "br-ex".to_string())])
        );
    }

    #[test]
    fn test_data_port_bare_entry_is_not_a_finding() {
        assert!(MappingKind::DataPort.check("br-ex:eth1 eth2").is_ok());
    }

    #[test]
    fn test_vlan_ranges() {
        let parsed = parse_vlan_range_mappings("physnet1:1000:2000 physnet2").unwrap();
        assert_eq!(parsed.get("physnet1"), Some(&Some((1000, 2000))));
        assert_eq!(parsed.get("physnet2"), Some(&None));
    }

    #[test]
    fn test_vlan_range_errors() {
        for value in ["physnet1:2000:1000", "physnet1:0:10", "physnet1:1:5000", "physnet1:a:b", "physnet1:100"] {
            assert!(
                matches!(
                    parse_vlan_range_mappings(value),
                    Err(MappingError::InvalidRange { .. })
                ),
                "{value}"
            );
        }
    }

    #[test]
    fn test_kind_for_option() {
        assert_eq!(MappingKind::for_option("ovn-bridge-mappings"), Some(MappingKind::Bridge));
        assert_eq!(
            MappingKind::for_option("bridge-interface-mappings"),
            Some(MappingKind::DataPort)
        );
        assert_eq!(MappingKind::for_option("data-port"), Some(MappingKind::DataPort));
        assert_eq!(MappingKind::for_option("vlan-ranges"), Some(MappingKind::VlanRange));
        assert_eq!(MappingKind::for_option("flat-network-providers"), None);
    }
}
