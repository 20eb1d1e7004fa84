use super::ipv4::Protocol;
use super::tcp::TCPPacket;
use super::udp::UDPDatagram;
use super::Kind;
use crate::error::{PacketError, PacketResult};
use log::debug;

/// IPv4ペイロードをデコードしたトランスポート層
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport<'a> {
    UDP(UDPDatagram<'a>),
    TCP(TCPPacket<'a>),
}

impl<'a> Transport<'a> {
    /// TCPは未実装のため常に0
    pub fn source_port(&self) -> u16 {
        match self {
            Transport::UDP(datagram) => datagram.source_port(),
            Transport::TCP(packet) => packet.source_port(),
        }
    }

    /// TCPは未実装のため常に0
    pub fn destination_port(&self) -> u16 {
        match self {
            Transport::UDP(datagram) => datagram.destination_port(),
            Transport::TCP(packet) => packet.destination_port(),
        }
    }

    pub fn payload(&self) -> &'a [u8] {
        match self {
            Transport::UDP(datagram) => datagram.payload(),
            Transport::TCP(packet) => packet.payload(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Transport::UDP(_) => Kind::UDP,
            Transport::TCP(_) => Kind::TCP,
        }
    }

    /// ポートとペイロードが実際にデコードされているか
    pub fn is_decoded(&self) -> bool {
        matches!(self, Transport::UDP(_))
    }

    pub fn as_udp(&self) -> Option<&UDPDatagram<'a>> {
        match self {
            Transport::UDP(datagram) => Some(datagram),
            Transport::TCP(_) => None,
        }
    }

    pub fn as_tcp(&self) -> Option<&TCPPacket<'a>> {
        match self {
            Transport::TCP(packet) => Some(packet),
            Transport::UDP(_) => None,
        }
    }
}

pub(crate) fn dispatch(protocol: Protocol, payload: &[u8]) -> PacketResult<Transport<'_>> {
    if payload.is_empty() {
        return Err(PacketError::EmptyPayload);
    }

    debug!("トランスポート層をデコードします: {} ({} バイト)", protocol, payload.len());

    match protocol {
        Protocol::TCP => Ok(Transport::TCP(TCPPacket::parse(payload)?)),
        Protocol::UDP => Ok(Transport::UDP(UDPDatagram::parse(payload)?)),
        other => Err(PacketError::NotTransportProtocol(other.name())),
    }
}
