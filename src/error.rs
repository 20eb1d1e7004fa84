use thiserror::Error;

pub type PacketResult<T> = Result<T, PacketError>;

/// 固定長ヘッダーの検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("データが短すぎます ({what}): 必要 {expected} バイト, 実際 {actual} バイト")]
    ShortData {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("無効なバージョンです: {0}")]
    InvalidVersion(u8),

    #[error("IPトータル長が小さすぎます ({total_length} < {min})")]
    TotalLengthTooSmall { total_length: u16, min: usize },

    #[error("IPヘッダー長が小さすぎます ({header_len} < {min})")]
    HeaderLengthTooSmall { header_len: usize, min: usize },

    #[error("IPヘッダー長がトータル長を超えています ({header_len} > {total_len})")]
    HeaderLengthExceedsTotal { header_len: usize, total_len: usize },

    #[error("IPヘッダーフラグの予約ビットが1に設定されています")]
    ReservedFlagSet,
}

/// IPv4オプションのTLV検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("オプション {name}({option_type}) の長さフィールドがありません: 残り {remaining} バイト")]
    Truncated {
        name: &'static str,
        option_type: u8,
        remaining: usize,
    },

    #[error("オプション {name}({option_type}) の長さが無効です: {length}")]
    InvalidLength {
        name: &'static str,
        option_type: u8,
        length: u8,
    },

    #[error("オプション {name}({option_type}) の長さ {length} が残り {remaining} バイトを超えています")]
    LengthExceedsRemaining {
        name: &'static str,
        option_type: u8,
        length: u8,
        remaining: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("データが短すぎます ({what}): 必要 {expected} バイト, 実際 {actual} バイト")]
    ShortData {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("ヘッダーを解析できません: {0}")]
    CannotParseHeader(#[source] HeaderError),

    #[error("データがIPv4パケット全体を含むには短すぎます: トータル長 {total_length}, データ長 {data_len}")]
    LengthMismatch { total_length: usize, data_len: usize },

    #[error("ペイロードが空です")]
    EmptyPayload,

    #[error("トランスポートパケットではありません: {0}")]
    NotTransportProtocol(&'static str),

    #[error("未実装です: {0}")]
    NotImplemented(&'static str),

    #[error("オプションを解析できません: {0}")]
    InvalidOption(#[from] OptionError),
}

/// バイナリの初期化と入力処理のエラー
#[derive(Error, Debug)]
pub enum InitProcessError {
    #[error("ロガーのセットアップに失敗しました: {0}")]
    LoggerError(String),

    #[error("環境変数の解析に失敗しました: {0}")]
    EnvVarParseError(String),

    #[error("入力の読み込みに失敗しました: {0}")]
    InputReadError(#[from] std::io::Error),

    #[error("16進文字列のデコードに失敗しました (行 {line}): {source}")]
    HexDecodeError {
        line: usize,
        #[source]
        source: hex::FromHexError,
    },

    #[error("出力のシリアライズに失敗しました: {0}")]
    OutputError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_cannot_parse_header_keeps_source() {
        let err = PacketError::CannotParseHeader(HeaderError::InvalidVersion(6));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source, Some(HeaderError::InvalidVersion(6).to_string()));
        assert!(err.to_string().contains("無効なバージョンです: 6"));
    }

    #[test]
    fn test_option_error_converts_into_packet_error() {
        let err: PacketError = OptionError::InvalidLength {
            name: "SEC",
            option_type: 130,
            length: 2,
        }
        .into();
        assert!(matches!(err, PacketError::InvalidOption(OptionError::InvalidLength { length: 2, .. })));
        assert!(err.to_string().contains("SEC(130)"));
    }
}
