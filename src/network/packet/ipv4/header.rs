use super::options::{parse_options, IPv4Option};
use super::protocol::Protocol;
use crate::error::{HeaderError, OptionError};
use bytes::Buf;
use serde::Serialize;
use std::net::Ipv4Addr;

pub const MIN_HEADER_LENGTH: usize = 20;
pub const IPV4_VERSION: u8 = 4;

// フラグ3ビット内の位置 (先頭ビットが予約ビット)
const RESERVED_BIT: u8 = 2;
const DONT_FRAGMENT_BIT: u8 = 1;
const MORE_FRAGMENTS_BIT: u8 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    /// 予約ビット (RFC 3514 の evil bit)。正しいパケットでは常に0
    pub reserved: bool,
    pub dont_fragment: bool,
    pub more_fragments: bool,
}

impl Flags {
    fn from_bits(bits: u8) -> Self {
        Self {
            reserved: check_bit(bits, RESERVED_BIT),
            dont_fragment: check_bit(bits, DONT_FRAGMENT_BIT),
            more_fragments: check_bit(bits, MORE_FRAGMENTS_BIT),
        }
    }
}

fn check_bit(byte: u8, n: u8) -> bool {
    (byte >> n) & 1 == 1
}

// 0                   1                   2                   3
// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |Version|  IHL  |Type of Service|          Total Length         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         Identification        |Flags|      Fragment Offset    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |  Time to Live |    Protocol   |         Header Checksum       |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Source Address                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Destination Address                        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Options                    |    Padding    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// 検証済みのIPv4ヘッダー
///
/// オプション領域は入力バッファを借用したまま保持し、
/// [`IPv4Header::parse_options`] が呼ばれるたびにデコードする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IPv4Header<'a> {
    pub version: u8,
    pub ihl: u8,
    pub tos: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: Flags,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: Protocol,
    pub checksum: u16,
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    options: Option<&'a [u8]>,
}

impl<'a> IPv4Header<'a> {
    /// バッファ先頭のIPv4ヘッダーを検証してデコードする
    ///
    /// 戻り値はバッファのオプション領域を借用する。
    /// 検証に一つでも失敗した場合はヘッダーを返さない。
    pub fn parse(data: &'a [u8]) -> Result<Self, HeaderError> {
        if data.len() < MIN_HEADER_LENGTH {
            return Err(HeaderError::ShortData {
                what: "IPv4パケット",
                expected: MIN_HEADER_LENGTH,
                actual: data.len(),
            });
        }

        let mut buf = &data[..MIN_HEADER_LENGTH];

        let version_ihl = buf.get_u8();
        let version = version_ihl >> 4;
        if version != IPV4_VERSION {
            return Err(HeaderError::InvalidVersion(version));
        }

        let ihl = extract_header_words(version_ihl);
        let header_len = header_len(ihl);

        let tos = buf.get_u8();
        let total_length = buf.get_u16();

        if (total_length as usize) < MIN_HEADER_LENGTH {
            return Err(HeaderError::TotalLengthTooSmall {
                total_length,
                min: MIN_HEADER_LENGTH,
            });
        }

        if header_len < MIN_HEADER_LENGTH {
            return Err(HeaderError::HeaderLengthTooSmall {
                header_len,
                min: MIN_HEADER_LENGTH,
            });
        }

        if header_len > total_length as usize {
            return Err(HeaderError::HeaderLengthExceedsTotal {
                header_len,
                total_len: total_length as usize,
            });
        }

        let identification = buf.get_u16();
        let flags_fragment_offset = buf.get_u16();

        let flags = Flags::from_bits((flags_fragment_offset >> 13) as u8);
        if flags.reserved {
            return Err(HeaderError::ReservedFlagSet);
        }

        let fragment_offset = flags_fragment_offset & 0x1FFF;
        let ttl = buf.get_u8();
        let protocol = Protocol(buf.get_u8());
        let checksum = buf.get_u16();
        let source = Ipv4Addr::from(buf.get_u32());
        let destination = Ipv4Addr::from(buf.get_u32());

        let options = if header_len > MIN_HEADER_LENGTH && data.len() >= header_len {
            Some(&data[MIN_HEADER_LENGTH..header_len])
        } else {
            None
        };

        Ok(Self {
            version,
            ihl,
            tos,
            total_length,
            identification,
            flags,
            fragment_offset,
            ttl,
            protocol,
            checksum,
            source,
            destination,
            options,
        })
    }

    /// ヘッダー長 (バイト単位)
    pub fn header_len(&self) -> usize {
        header_len(self.ihl)
    }

    pub fn total_len(&self) -> usize {
        self.total_length as usize
    }

    pub fn protocol_name(&self) -> &'static str {
        self.protocol.name()
    }

    /// デコード前のオプション領域
    pub fn options(&self) -> Option<&'a [u8]> {
        self.options
    }

    pub fn has_options(&self) -> bool {
        self.options.is_some()
    }

    /// オプション領域をTLV列としてデコードする。結果はキャッシュしない
    pub fn parse_options(&self) -> Result<Vec<IPv4Option<'a>>, OptionError> {
        match self.options {
            Some(options) => parse_options(options),
            None => Ok(Vec::new()),
        }
    }
}

pub fn parse_header(data: &[u8]) -> Result<IPv4Header<'_>, HeaderError> {
    IPv4Header::parse(data)
}

pub(super) fn extract_header_words(version_ihl: u8) -> u8 {
    version_ihl & 0x0F
}

pub(super) fn header_len(words: u8) -> usize {
    words as usize * 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::packet::ipv4::OptionType;

    // 192.168.0.104 -> 192.168.0.1, TCP, DF
    const TCP_HEADER: [u8; 20] = [
        0x45, 0x00, 0x00, 0x3c,
        0x1c, 0x46, 0x40, 0x00,
        0x40, 0x06, 0xb1, 0xe6,
        0xc0, 0xa8, 0x00, 0x68,
        0xc0, 0xa8, 0x00, 0x01,
    ];

    // NOP + RIPSO セキュリティオプション付きのICMPヘッダー
    const OPTIONS_HEADER: [u8; 36] = [
        0x49, 0x00, 0x00, 0x28, 0x03, 0x04,
        0x00, 0x00, 0xfe, 0x01, 0xc1, 0xe0,
        0xaf, 0x2d, 0xb0, 0x00, 0x95, 0xab,
        0x7e, 0x0b, 0x01, 0x82, 0x0b, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x01, 0x02, 0x03,
    ];

    #[test]
    fn test_parse_header_short_data() {
        for len in 0..MIN_HEADER_LENGTH {
            let err = IPv4Header::parse(&TCP_HEADER[..len]).unwrap_err();
            assert_eq!(
                err,
                HeaderError::ShortData { what: "IPv4パケット", expected: 20, actual: len },
                "{} バイトのデータはパースできないはずです",
                len
            );
        }
    }

    #[test]
    fn test_parse_header_without_options() {
        let header = parse_header(&TCP_HEADER).unwrap();

        assert_eq!(header.version, 4);
        assert_eq!(header.ihl, 5);
        assert_eq!(header.header_len(), 20);
        assert_eq!(header.total_length, 60);
        assert_eq!(header.identification, 0x1c46);
        assert_eq!(header.protocol, Protocol::TCP);
        assert_eq!(header.protocol_name(), "TCP");
        assert_eq!(header.source, Ipv4Addr::new(192, 168, 0, 104));
        assert_eq!(header.destination, Ipv4Addr::new(192, 168, 0, 1));
        assert_eq!(header.ttl, 64);
        assert_eq!(header.checksum, 45542);
        assert_eq!(header.fragment_offset, 0);

        assert!(!header.flags.reserved);
        assert!(header.flags.dont_fragment);
        assert!(!header.flags.more_fragments);

        assert!(!header.has_options());
        assert!(header.parse_options().unwrap().is_empty());
    }

    #[test]
    fn test_parse_header_with_options() {
        let header = parse_header(&OPTIONS_HEADER).unwrap();

        assert_eq!(header.header_len(), 36);
        assert_eq!(header.total_length, 40);
        assert_eq!(header.protocol, Protocol::ICMP);
        assert_eq!(header.ttl, 254);
        assert_eq!(header.source, Ipv4Addr::new(175, 45, 176, 0));
        assert_eq!(header.destination, Ipv4Addr::new(149, 171, 126, 11));
        assert_eq!(header.options().map(|o| o.len()), Some(16));

        let options = header.parse_options().unwrap();
        assert_eq!(options.len(), 2);

        assert_eq!(options[0].option_type(), OptionType::NO_OPERATION);
        assert_eq!(options[0].length(), 1);
        assert!(options[0].data().is_empty());

        assert_eq!(options[1].option_type(), OptionType::SECURITY_RIPSO);
        assert_eq!(options[1].option_type().short_name(), "SEC");
        assert_eq!(options[1].length(), 11);
        assert_eq!(options[1].data(), &[0u8; 9][..]);
    }

    #[test]
    fn test_options_are_decoded_on_every_call() {
        let header = parse_header(&OPTIONS_HEADER).unwrap();
        assert_eq!(header.parse_options().unwrap(), header.parse_options().unwrap());
    }

    #[test]
    fn test_invalid_version() {
        let mut data = TCP_HEADER;
        data[0] = 0x65;
        assert_eq!(parse_header(&data).unwrap_err(), HeaderError::InvalidVersion(6));
    }

    #[test]
    fn test_total_length_too_small() {
        let mut data = TCP_HEADER;
        data[2] = 0x00;
        data[3] = 0x13;
        assert_eq!(
            parse_header(&data).unwrap_err(),
            HeaderError::TotalLengthTooSmall { total_length: 19, min: 20 }
        );
    }

    #[test]
    fn test_header_length_too_small() {
        let mut data = TCP_HEADER;
        data[0] = 0x44;
        assert_eq!(
            parse_header(&data).unwrap_err(),
            HeaderError::HeaderLengthTooSmall { header_len: 16, min: 20 }
        );
    }

    #[test]
    fn test_header_length_exceeds_total_length() {
        let mut data = TCP_HEADER;
        data[0] = 0x4f;
        data[3] = 0x28;
        assert_eq!(
            parse_header(&data).unwrap_err(),
            HeaderError::HeaderLengthExceedsTotal { header_len: 60, total_len: 40 }
        );
    }

    #[test]
    fn test_reserved_flag_always_fails() {
        for flags_byte in [0x80, 0xa0, 0xc0, 0xe0, 0x9f] {
            let mut data = TCP_HEADER;
            data[6] = flags_byte;
            assert_eq!(
                parse_header(&data).unwrap_err(),
                HeaderError::ReservedFlagSet,
                "フラグ {:#04x} は拒否されるはずです",
                flags_byte
            );
        }
    }

    #[test]
    fn test_more_fragments_and_offset() {
        let mut data = TCP_HEADER;
        data[6] = 0x20 | 0x01;
        data[7] = 0x02;
        let header = parse_header(&data).unwrap();

        assert!(!header.flags.dont_fragment);
        assert!(header.flags.more_fragments);
        assert_eq!(header.fragment_offset, 0x0102);
    }

    #[test]
    fn test_options_absent_when_buffer_shorter_than_header() {
        // IHL=6 だがバッファには固定部分しかない
        let mut data = TCP_HEADER;
        data[0] = 0x46;
        let header = parse_header(&data).unwrap();

        assert_eq!(header.header_len(), 24);
        assert!(header.options().is_none());
        assert!(header.parse_options().unwrap().is_empty());
    }
}
