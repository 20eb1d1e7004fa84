mod header;
mod options;
mod packet;
mod protocol;

pub use header::{parse_header, Flags, IPv4Header, IPV4_VERSION, MIN_HEADER_LENGTH};
pub use options::{parse_options, IPv4Option, OptionType};
pub use packet::{extract_payload, parse_packet, IPv4Packet};
pub use protocol::Protocol;
