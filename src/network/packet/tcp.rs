use crate::error::{HeaderError, PacketError, PacketResult};
use crate::network::packet::Kind;

/// TCPヘッダー (未実装のため空)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TCPHeader;

impl TCPHeader {
    /// 未実装: 常に空のヘッダーを返す
    pub fn parse(_data: &[u8]) -> Result<Self, HeaderError> {
        Ok(Self)
    }

    pub fn header_len(&self) -> usize {
        0
    }
}

/// TCPセグメント (未実装)
///
/// ペイロードは常に空、ポートは常に0を返す。
/// デコード済みかどうかは [`crate::network::packet::Transport::is_decoded`] で判別する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TCPPacket<'a> {
    header: TCPHeader,
    header_data: &'a [u8],
    payload: &'a [u8],
}

impl<'a> TCPPacket<'a> {
    pub fn parse(data: &'a [u8]) -> PacketResult<Self> {
        let header = TCPHeader::parse(data).map_err(PacketError::CannotParseHeader)?;

        Ok(Self {
            header,
            header_data: &data[..header.header_len()],
            payload: &[],
        })
    }

    pub fn header(&self) -> &TCPHeader {
        &self.header
    }

    pub fn header_data(&self) -> &'a [u8] {
        self.header_data
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn source_port(&self) -> u16 {
        0
    }

    pub fn destination_port(&self) -> u16 {
        0
    }

    pub fn kind(&self) -> Kind {
        Kind::TCP
    }
}

pub fn extract_payload(_data: &[u8]) -> PacketResult<&[u8]> {
    Err(PacketError::NotImplemented("TCP"))
}
