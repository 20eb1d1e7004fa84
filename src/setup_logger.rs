use crate::config::LogConfig;
use crate::error::InitProcessError;
use env_logger::{Builder, Target};
use log::info;
use std::fs::File;
use std::io::Write;

pub fn setup_logger(config: &LogConfig) -> Result<(), InitProcessError> {
    let mut builder = Builder::new();

    // ログレベルとタイムスタンプ付きのフォーマット
    builder
        .filter_level(config.level_filter())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        });

    // 標準出力はJSONの出力に使うので、ログはファイルか標準エラーへ
    match &config.file {
        Some(path) => {
            let file = File::create(path).map_err(|e| InitProcessError::LoggerError(e.to_string()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder
        .try_init()
        .map_err(|e| InitProcessError::LoggerError(e.to_string()))?;

    info!("ロガーを初期化しました (レベル: {})", config.level_filter());

    Ok(())
}
