use serde::Serialize;
use std::fmt;

/// IPv4ヘッダーのプロトコル番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Protocol(pub u8);

impl Protocol {
    pub const ICMP: Protocol = Protocol(1);
    pub const IGMP: Protocol = Protocol(2);
    pub const TCP: Protocol = Protocol(6);
    pub const UDP: Protocol = Protocol(17);
    pub const ENCAP: Protocol = Protocol(41);
    pub const OSPF: Protocol = Protocol(89);
    pub const SCTP: Protocol = Protocol(132);

    pub fn name(&self) -> &'static str {
        KNOWN_PROTOCOLS
            .iter()
            .find(|(protocol, _)| protocol == self)
            .map(|(_, name)| *name)
            .unwrap_or("Unknown")
    }

    pub fn is_transport(&self) -> bool {
        *self == Protocol::TCP || *self == Protocol::UDP
    }
}

const KNOWN_PROTOCOLS: [(Protocol, &str); 7] = [
    (Protocol::ICMP, "ICMP"),
    (Protocol::IGMP, "IGMP"),
    (Protocol::TCP, "TCP"),
    (Protocol::UDP, "UDP"),
    (Protocol::ENCAP, "ENCAP"),
    (Protocol::OSPF, "OSPF"),
    (Protocol::SCTP, "SCTP"),
];

impl From<u8> for Protocol {
    fn from(value: u8) -> Self {
        Protocol(value)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_protocol_names() {
        assert_eq!(Protocol::ICMP.name(), "ICMP");
        assert_eq!(Protocol::from(41).name(), "ENCAP");
        assert_eq!(Protocol::from(89).name(), "OSPF");
        assert_eq!(Protocol::from(132).name(), "SCTP");
    }

    #[test]
    fn test_unknown_protocol_name() {
        assert_eq!(Protocol(253).name(), "Unknown");
        assert_eq!(Protocol(253).to_string(), "Unknown(253)");
    }

    #[test]
    fn test_only_tcp_and_udp_are_transport() {
        assert!(Protocol::TCP.is_transport());
        assert!(Protocol::UDP.is_transport());
        assert!(!Protocol::ICMP.is_transport());
        assert!(!Protocol::SCTP.is_transport());
    }
}
