use crate::network::packet::ipv4::{extract_payload, Flags, IPv4Packet};
use crate::network::packet::{Kind, Transport};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::Ipv4Addr;

/// 入力1パケット分の出力レコード
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    Decoded(PacketSummary),
    Failed(FailureSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct PacketSummary {
    pub line: usize,
    pub timestamp: DateTime<Utc>,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub protocol: u8,
    pub protocol_name: &'static str,
    pub ttl: u8,
    pub flags: Flags,
    pub header_len: usize,
    pub total_len: usize,
    pub options: Vec<OptionSummary>,
    pub options_error: Option<String>,
    /// Base64
    pub payload: String,
    pub transport: Option<TransportSummary>,
    pub transport_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionSummary {
    pub option_type: u8,
    pub short_name: &'static str,
    pub long_name: String,
    pub length: u8,
    pub data_len: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransportSummary {
    pub kind: Kind,
    pub decoded: bool,
    pub source_port: Option<u16>,
    pub destination_port: Option<u16>,
    pub payload_len: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureSummary {
    pub line: usize,
    pub timestamp: DateTime<Utc>,
    pub error: String,
    pub relaxed_payload_len: Option<usize>,
}

impl Report {
    pub fn from_bytes(line: usize, data: &[u8], relaxed: bool) -> Self {
        match IPv4Packet::parse(data) {
            Ok(packet) => Report::Decoded(PacketSummary::from_packet(line, &packet)),
            Err(e) => Report::Failed(FailureSummary {
                line,
                timestamp: Utc::now(),
                error: e.to_string(),
                relaxed_payload_len: if relaxed {
                    extract_payload(data).ok().map(|payload| payload.len())
                } else {
                    None
                },
            }),
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, Report::Decoded(_))
    }
}

impl PacketSummary {
    pub fn from_packet(line: usize, packet: &IPv4Packet) -> Self {
        let header = packet.header();

        let (options, options_error) = match header.parse_options() {
            Ok(options) => (
                options
                    .iter()
                    .map(|option| OptionSummary {
                        option_type: option.option_type().0,
                        short_name: option.option_type().short_name(),
                        long_name: option.option_type().long_name().into_owned(),
                        length: option.length(),
                        data_len: option.data().len(),
                    })
                    .collect(),
                None,
            ),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };

        let (transport, transport_error) = if packet.is_transport() {
            match packet.transport() {
                Ok(transport) => (Some(TransportSummary::from_transport(&transport)), None),
                Err(e) => (None, Some(e.to_string())),
            }
        } else {
            (None, None)
        };

        PacketSummary {
            line,
            timestamp: Utc::now(),
            source: packet.source(),
            destination: packet.destination(),
            protocol: packet.protocol().0,
            protocol_name: packet.protocol().name(),
            ttl: packet.ttl(),
            flags: header.flags,
            header_len: header.header_len(),
            total_len: header.total_len(),
            options,
            options_error,
            payload: STANDARD.encode(packet.payload()),
            transport,
            transport_error,
        }
    }
}

impl TransportSummary {
    fn from_transport(transport: &Transport) -> Self {
        // TCPは未実装なのでポートとペイロード長を出さない
        let decoded = transport.is_decoded();

        TransportSummary {
            kind: transport.kind(),
            decoded,
            source_port: decoded.then(|| transport.source_port()),
            destination_port: decoded.then(|| transport.destination_port()),
            payload_len: decoded.then(|| transport.payload().len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UDP_PACKET: [u8; 56] = [
        0x45, 0x00, 0x00, 0x38, 0x56, 0xaf, 0x40, 0x00, 0x40, 0x11, 0x25, 0xe0, 0xac, 0x11,
        0x00, 0x03, 0x09, 0x09, 0x09, 0x09, 0x99, 0x7a, 0x00, 0x35, 0x00, 0x24, 0xbe, 0x5b,
        0x42, 0x22, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0x67,
        0x6f, 0x6f, 0x67, 0x6c, 0x65, 0x03, 0x63, 0x6f, 0x6d, 0x00, 0x00, 0x01, 0x00, 0x01,
    ];

    const OPTIONS_TCP_PACKET: [u8; 40] = [
        0x49, 0x00, 0x00, 0x28, 0x03, 0x04,
        0x00, 0x00, 0xfe, 0x06, 0xc1, 0xe0,
        0xaf, 0x2d, 0xb0, 0x00, 0x95, 0xab,
        0x7e, 0x0b, 0x01, 0x82, 0x0b, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x01, 0x02, 0x03,
        0xa7, 0x9e, 0x00, 0x50,
    ];

    #[test]
    fn test_udp_summary() {
        let report = Report::from_bytes(1, &UDP_PACKET, false);
        let Report::Decoded(summary) = report else {
            panic!("UDPパケットはデコードできるはずです");
        };

        assert_eq!(summary.source, Ipv4Addr::new(172, 17, 0, 3));
        assert_eq!(summary.destination, Ipv4Addr::new(9, 9, 9, 9));
        assert_eq!(summary.protocol_name, "UDP");
        assert!(summary.flags.dont_fragment);
        assert!(summary.options.is_empty());

        let transport = summary.transport.unwrap();
        assert_eq!(transport.kind, Kind::UDP);
        assert_eq!(transport.source_port, Some(39290));
        assert_eq!(transport.destination_port, Some(53));
        assert_eq!(transport.payload_len, Some(28));
    }

    #[test]
    fn test_tcp_summary_hides_stub_values() {
        let Report::Decoded(summary) = Report::from_bytes(3, &OPTIONS_TCP_PACKET, false) else {
            panic!("TCPパケットはデコードできるはずです");
        };

        assert_eq!(summary.line, 3);
        assert_eq!(summary.header_len, 36);
        assert_eq!(summary.options.len(), 2);
        assert_eq!(summary.options[0].short_name, "NOP");
        assert_eq!(summary.options[1].long_name, "Security RIPSO");
        assert_eq!(summary.options[1].data_len, 9);

        let transport = summary.transport.unwrap();
        assert_eq!(transport.kind, Kind::TCP);
        assert!(!transport.decoded);
        assert_eq!(transport.source_port, None);
    }

    #[test]
    fn test_failed_summary_with_relaxed_payload() {
        let mut data = UDP_PACKET;
        data[6] = 0xc0;

        let report = Report::from_bytes(7, &data, true);
        assert!(!report.is_decoded());

        let Report::Failed(failure) = report else {
            panic!("予約ビット付きのパケットは失敗するはずです");
        };
        assert_eq!(failure.line, 7);
        assert!(failure.error.contains("予約ビット"));
        assert_eq!(failure.relaxed_payload_len, Some(36));

        let Report::Failed(failure) = Report::from_bytes(7, &data, false) else {
            panic!("予約ビット付きのパケットは失敗するはずです");
        };
        assert_eq!(failure.relaxed_payload_len, None);
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let report = Report::from_bytes(1, &UDP_PACKET, false);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "decoded");
        assert_eq!(json["source"], "172.17.0.3");
        assert_eq!(json["transport"]["kind"], "UDP");
        assert_eq!(json["transport"]["destination_port"], 53);
    }
}
