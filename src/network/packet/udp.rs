use crate::error::{HeaderError, PacketError, PacketResult};
use crate::network::packet::Kind;
use bytes::Buf;
use serde::Serialize;

pub const HEADER_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UDPHeader {
    pub source_port: u16,
    pub destination_port: u16,
    pub length: u16,
    pub checksum: u16,
}

impl UDPHeader {
    /// 固定8バイトのUDPヘッダーをデコードする。入力バッファは借用し続けない
    pub fn parse(data: &[u8]) -> Result<Self, HeaderError> {
        if data.len() < HEADER_LENGTH {
            return Err(HeaderError::ShortData {
                what: "UDPデータグラム",
                expected: HEADER_LENGTH,
                actual: data.len(),
            });
        }

        let mut buf = &data[..HEADER_LENGTH];

        Ok(Self {
            source_port: buf.get_u16(),
            destination_port: buf.get_u16(),
            length: buf.get_u16(),
            checksum: buf.get_u16(),
        })
    }

    pub fn header_len(&self) -> usize {
        HEADER_LENGTH
    }

    /// ヘッダーの長さフィールドの値。実際のバッファ長とは照合しない
    pub fn datagram_len(&self) -> usize {
        self.length as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UDPDatagram<'a> {
    pub header: UDPHeader,
    pub payload: &'a [u8],
}

impl<'a> UDPDatagram<'a> {
    pub fn parse(data: &'a [u8]) -> PacketResult<Self> {
        let header = UDPHeader::parse(data).map_err(PacketError::CannotParseHeader)?;

        Ok(Self {
            header,
            payload: &data[HEADER_LENGTH..],
        })
    }

    pub fn source_port(&self) -> u16 {
        self.header.source_port
    }

    pub fn destination_port(&self) -> u16 {
        self.header.destination_port
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn kind(&self) -> Kind {
        Kind::UDP
    }
}

pub fn extract_payload(data: &[u8]) -> PacketResult<&[u8]> {
    if data.len() < HEADER_LENGTH {
        return Err(PacketError::ShortData {
            what: "UDPデータグラム",
            expected: HEADER_LENGTH,
            actual: data.len(),
        });
    }

    Ok(&data[HEADER_LENGTH..])
}
