//! Guest property table for the appliance configuration.
//!
//! Maps keys from the appliance configuration JSON to the guest properties
//! the appliance firstboot reads. The table is fixed at build time and
//! never mutated.

/// Mapping from configuration key to guest property identifier.
pub const GUEST_PROPERTIES: &[(&str, &str)] = &[
    ("cloudConnect", "guestinfo.onms.cloudconnect"),
    ("hostname", "guestinfo.onms.hostname"),
    ("httpProxy", "guestinfo.onms.proxy.http"),
    ("httpsProxy", "guestinfo.onms.proxy.https"),
    ("ntpServer", "guestinfo.onms.ntp.server"),
    ("staticIpv4Addresses", "guestinfo.onms.network.ipv4"),
    ("staticIpv6Addresses", "guestinfo.onms.network.ipv6"),
    ("gatewayIpv4Address", "guestinfo.onms.network.gateway.ipv4"),
    ("gatewayIpv6Address", "guestinfo.onms.network.gateway.ipv6"),
    ("dnsServers", "guestinfo.onms.network.dns.servers"),
    ("dnsSearchNames", "guestinfo.onms.network.dns.searchnames"),
];

/// Look up the guest property identifier for a configuration key.
///
/// Returns `None` for keys the appliance does not understand; callers
/// treat those as warnings, not errors.
pub fn guest_property(key: &str) -> Option<&'static str> {
    GUEST_PROPERTIES
        .iter()
        .find(|(config_key, _)| *config_key == key)
        .map(|(_, identifier)| *identifier)
}
