use crate::error::OptionError;
use lazy_static::lazy_static;
use log::trace;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// IPv4オプションのタイプ番号 (IANA "IP Option Numbers")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OptionType(pub u8);

impl OptionType {
    pub const END_OF_LIST: OptionType = OptionType(0);
    pub const NO_OPERATION: OptionType = OptionType(1);
    pub const SECURITY_DEFUNCT: OptionType = OptionType(2);
    pub const RECORD_ROUTE: OptionType = OptionType(7);
    pub const EXPERIMENTAL_MEASUREMENT: OptionType = OptionType(10);
    pub const MTU_PROBE: OptionType = OptionType(11);
    pub const MTU_REPLY: OptionType = OptionType(12);
    pub const ENCODE: OptionType = OptionType(15);
    pub const QUICK_START: OptionType = OptionType(25);
    pub const RFC3692_EXPERIMENT_FIRST: OptionType = OptionType(30);
    pub const TIME_STAMP: OptionType = OptionType(68);
    pub const TRACEROUTE: OptionType = OptionType(82);
    pub const RFC3692_EXPERIMENT_SECOND: OptionType = OptionType(94);
    pub const SECURITY_RIPSO: OptionType = OptionType(130);
    pub const LOOSE_SOURCE_ROUTE: OptionType = OptionType(131);
    pub const EXTENDED_SECURITY_RIPSO: OptionType = OptionType(133);
    pub const COMMERCIAL_IP_SECURITY: OptionType = OptionType(134);
    pub const STREAM_ID: OptionType = OptionType(136);
    pub const STRICT_SOURCE_ROUTE: OptionType = OptionType(137);
    pub const EXPERIMENTAL_ACCESS_CONTROL: OptionType = OptionType(142);
    pub const IMI_TRAFFIC_DESCRIPTOR: OptionType = OptionType(144);
    pub const EXTENDED_INTERNET_PROTOCOL: OptionType = OptionType(145);
    pub const ADDRESS_EXTENSION: OptionType = OptionType(147);
    pub const ROUTER_ALERT: OptionType = OptionType(148);
    pub const SELECTIVE_DIRECTED_BROADCAST: OptionType = OptionType(149);
    pub const DYNAMIC_PACKET_STATE: OptionType = OptionType(151);
    pub const UPSTREAM_MULTICAST_PACKET: OptionType = OptionType(152);
    pub const RFC3692_EXPERIMENT_THIRD: OptionType = OptionType(158);
    pub const EXPERIMENTAL_FLOW_CONTROL: OptionType = OptionType(205);
    pub const RFC3692_EXPERIMENT_FOURTH: OptionType = OptionType(222);

    pub fn short_name(&self) -> &'static str {
        OPTION_DESCRIPTIONS
            .get(&self.0)
            .map(|description| description.short)
            .unwrap_or("UNKNOWN")
    }

    pub fn long_name(&self) -> Cow<'static, str> {
        match OPTION_DESCRIPTIONS.get(&self.0) {
            Some(description) => Cow::Borrowed(description.long),
            None => Cow::Owned(format!("Unknown: {}", self.0)),
        }
    }

    /// 例: `SEC(130)`
    pub fn short_name_with_id(&self) -> String {
        format!("{}({})", self.short_name(), self.0)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.short_name(), self.0)
    }
}

struct OptionDescription {
    short: &'static str,
    long: &'static str,
}

lazy_static! {
    static ref OPTION_DESCRIPTIONS: HashMap<u8, OptionDescription> = {
        let entries: [(OptionType, &'static str, &'static str); 30] = [
            (OptionType::END_OF_LIST, "EOOL", "End Of List"),
            (OptionType::NO_OPERATION, "NOP", "No Operation"),
            (OptionType::SECURITY_DEFUNCT, "SEC", "Security Defunct"),
            (OptionType::RECORD_ROUTE, "ROR", "Record Route"),
            (OptionType::EXPERIMENTAL_MEASUREMENT, "EXP", "Experimental Measurement"),
            (OptionType::MTU_PROBE, "MTUP", "MTU Probe"),
            (OptionType::MTU_REPLY, "MTUR", "MTU Reply"),
            (OptionType::ENCODE, "ENCODE", "ENCODE"),
            (OptionType::QUICK_START, "QS", "Quick Start"),
            (OptionType::RFC3692_EXPERIMENT_FIRST, "EXP", "RFC3692 Experiment First"),
            (OptionType::TIME_STAMP, "TS", "Timestamp"),
            (OptionType::TRACEROUTE, "TR", "Traceroute"),
            (OptionType::RFC3692_EXPERIMENT_SECOND, "EXP", "RFC3692 Experiment Second"),
            (OptionType::SECURITY_RIPSO, "SEC", "Security RIPSO"),
            (OptionType::LOOSE_SOURCE_ROUTE, "LSR", "Loose Source Route"),
            (OptionType::EXTENDED_SECURITY_RIPSO, "E-SEC", "Extended Security (RIPSO)"),
            (OptionType::COMMERCIAL_IP_SECURITY, "CIPSO", "Commercial IP Security Option"),
            (OptionType::STREAM_ID, "SID", "Stream ID"),
            (OptionType::STRICT_SOURCE_ROUTE, "SSR", "Strict Source Route"),
            (OptionType::EXPERIMENTAL_ACCESS_CONTROL, "VISA", "Experimental Access Control"),
            (OptionType::IMI_TRAFFIC_DESCRIPTOR, "IMITD", "IMI Traffic Descriptor"),
            (OptionType::EXTENDED_INTERNET_PROTOCOL, "EIP", "Extended Internet Protocol"),
            (OptionType::ADDRESS_EXTENSION, "ADDEXT", "Address Extension"),
            (OptionType::ROUTER_ALERT, "RTRALT", "Router Alert"),
            (OptionType::SELECTIVE_DIRECTED_BROADCAST, "SDB", "Selective Directed Broadcast"),
            (OptionType::DYNAMIC_PACKET_STATE, "DPS", "Dynamic Packet State"),
            (OptionType::UPSTREAM_MULTICAST_PACKET, "UMP", "Upstream Multicast Packet"),
            (OptionType::RFC3692_EXPERIMENT_THIRD, "EXP", "RFC3692 Experiment Third"),
            (OptionType::EXPERIMENTAL_FLOW_CONTROL, "EXPF", "Experimental Flow Control"),
            (OptionType::RFC3692_EXPERIMENT_FOURTH, "EXP", "RFC3692 Experiment Four"),
        ];

        entries
            .into_iter()
            .map(|(option_type, short, long)| (option_type.0, OptionDescription { short, long }))
            .collect()
    };
}

/// デコード済みのオプション1件。データは元のバッファを借用する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IPv4Option<'a> {
    option_type: OptionType,
    length: u8,
    data: &'a [u8],
}

impl<'a> IPv4Option<'a> {
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// タイプ・長さフィールドを含む全長
    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// オプション領域をTLV列として先頭から走査する
///
/// End-of-List で走査を終了し、以降のバイトはパディングとして捨てる。
/// 不正なオプションが一つでもあれば全体が失敗する。
pub fn parse_options(options: &[u8]) -> Result<Vec<IPv4Option<'_>>, OptionError> {
    let mut parsed = Vec::new();
    let mut offset = 0;

    while offset < options.len() {
        let remaining = &options[offset..];
        let option_type = OptionType(remaining[0]);

        match option_type {
            OptionType::END_OF_LIST => {
                trace!("End-of-List でオプションの走査を終了します (オフセット {})", offset);
                break;
            }
            OptionType::NO_OPERATION => {
                parsed.push(IPv4Option {
                    option_type,
                    length: 1,
                    data: &[],
                });
                offset += 1;
            }
            _ => {
                if remaining.len() < 2 {
                    return Err(OptionError::Truncated {
                        name: option_type.short_name(),
                        option_type: option_type.0,
                        remaining: remaining.len(),
                    });
                }

                let length = remaining[1];
                if length <= 2 {
                    return Err(OptionError::InvalidLength {
                        name: option_type.short_name(),
                        option_type: option_type.0,
                        length,
                    });
                }

                if length as usize > remaining.len() {
                    return Err(OptionError::LengthExceedsRemaining {
                        name: option_type.short_name(),
                        option_type: option_type.0,
                        length,
                        remaining: remaining.len(),
                    });
                }

                parsed.push(IPv4Option {
                    option_type,
                    length,
                    data: &remaining[2..length as usize],
                });
                offset += length as usize;
            }
        }
    }

    Ok(parsed)
}
