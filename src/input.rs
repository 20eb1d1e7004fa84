use crate::error::InitProcessError;
use std::io::BufRead;

/// 入力1行分のパケット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub line: usize,
    pub data: Vec<u8>,
}

/// 1行1パケットの16進ダンプを読み込む
///
/// 空白は無視し、`#` 以降はコメントとして捨てる。空行は読み飛ばす。
pub fn read_packets<R: BufRead>(reader: R) -> Result<Vec<RawPacket>, InitProcessError> {
    let mut packets = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default();
        let digits: String = content.chars().filter(|c| !c.is_whitespace()).collect();

        if digits.is_empty() {
            continue;
        }

        let data = hex::decode(&digits).map_err(|source| InitProcessError::HexDecodeError {
            line: index + 1,
            source,
        })?;

        packets.push(RawPacket {
            line: index + 1,
            data,
        });
    }

    Ok(packets)
}
