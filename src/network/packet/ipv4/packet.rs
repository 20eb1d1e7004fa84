use super::header::{extract_header_words, header_len, IPv4Header, MIN_HEADER_LENGTH};
use super::protocol::Protocol;
use crate::error::{PacketError, PacketResult};
use crate::network::packet::transport::{dispatch, Transport};
use crate::network::packet::Kind;
use std::net::Ipv4Addr;

/// ヘッダーとペイロードに分割されたIPv4パケット
///
/// ヘッダーのバイト列とペイロードは入力バッファの部分スライスで、コピーしない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IPv4Packet<'a> {
    header: IPv4Header<'a>,
    header_data: &'a [u8],
    payload: &'a [u8],
}

impl<'a> IPv4Packet<'a> {
    /// ヘッダーを完全に検証した上でパケットを組み立てる
    ///
    /// ペイロードはヘッダー終端からトータル長までの範囲。
    /// トータル長がバッファ長を超える場合は失敗する。
    pub fn parse(data: &'a [u8]) -> PacketResult<Self> {
        let header = IPv4Header::parse(data).map_err(PacketError::CannotParseHeader)?;

        let total_len = header.total_len();
        if total_len > data.len() {
            return Err(PacketError::LengthMismatch {
                total_length: total_len,
                data_len: data.len(),
            });
        }

        let header_len = header.header_len();

        Ok(Self {
            header,
            header_data: &data[..header_len],
            payload: &data[header_len..total_len],
        })
    }

    pub fn header(&self) -> &IPv4Header<'a> {
        &self.header
    }

    pub fn header_data(&self) -> &'a [u8] {
        self.header_data
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn source(&self) -> Ipv4Addr {
        self.header.source
    }

    pub fn destination(&self) -> Ipv4Addr {
        self.header.destination
    }

    pub fn ttl(&self) -> u8 {
        self.header.ttl
    }

    pub fn protocol(&self) -> Protocol {
        self.header.protocol
    }

    pub fn kind(&self) -> Kind {
        Kind::IPv4
    }

    pub fn is_transport(&self) -> bool {
        self.header.protocol.is_transport()
    }

    /// プロトコル番号に応じてペイロードをTCP/UDPとしてデコードする
    pub fn transport(&self) -> PacketResult<Transport<'a>> {
        dispatch(self.header.protocol, self.payload)
    }
}

pub fn parse_packet(data: &[u8]) -> PacketResult<IPv4Packet<'_>> {
    IPv4Packet::parse(data)
}

/// ヘッダーの完全な検証を行わずにペイロードを取り出す
///
/// 参照するのはIHLとトータル長だけで、バージョンやフラグは検証しない。
/// [`IPv4Packet::parse`] が拒否するパケットでもペイロードを返すことがある。
/// トータル長がバッファ長を超える場合はバッファ終端までを返す。
pub fn extract_payload(data: &[u8]) -> PacketResult<&[u8]> {
    if data.len() < MIN_HEADER_LENGTH {
        return Err(PacketError::ShortData {
            what: "IPv4パケット",
            expected: MIN_HEADER_LENGTH,
            actual: data.len(),
        });
    }

    let header_len = header_len(extract_header_words(data[0]));
    let total_len = (u16::from_be_bytes([data[2], data[3]]) as usize).min(data.len());

    Ok(data.get(header_len..total_len).unwrap_or(&[]))
}
