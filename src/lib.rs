//! IPv4パケットを読み取り専用のビューとしてデコードするライブラリ
//!
//! 入力バッファはコピーせず、ヘッダー・オプション・ペイロードはすべて
//! 呼び出し側のバッファを借用する。

pub mod config;
pub mod error;
pub mod input;
pub mod network;
pub mod setup_logger;
pub mod summary;

pub use error::{HeaderError, OptionError, PacketError, PacketResult};
pub use network::packet::ipv4::{extract_payload, parse_header, parse_packet, IPv4Header, IPv4Option, IPv4Packet};
pub use network::packet::{Kind, Transport};
