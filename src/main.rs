use log::{error, info, warn};
use packet_view::config::AppConfig;
use packet_view::error::InitProcessError;
use packet_view::input::read_packets;
use packet_view::setup_logger::setup_logger;
use packet_view::summary::Report;
use std::fs::File;
use std::io::{self, BufReader, Write};

fn main() -> Result<(), InitProcessError> {
    let config = AppConfig::from_env()?;
    setup_logger(&config.log)?;

    // 入力の読み込み
    let packets = match &config.input.path {
        Some(path) => {
            info!("入力ファイルを読み込みます: {}", path.display());
            read_packets(BufReader::new(File::open(path)?))?
        }
        None => read_packets(io::stdin().lock())?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0;

    for packet in &packets {
        let report = Report::from_bytes(packet.line, &packet.data, config.input.relaxed);

        if let Report::Failed(failure) = &report {
            failed += 1;
            error!("パケットの解析に失敗しました (行 {}): {}", failure.line, failure.error);
            if let Some(len) = failure.relaxed_payload_len {
                warn!("検証なしで抽出したペイロード (行 {}): {} バイト", failure.line, len);
            }
        }

        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
    }

    info!("処理が完了しました: {} 件中 {} 件失敗", packets.len(), failed);

    Ok(())
}
