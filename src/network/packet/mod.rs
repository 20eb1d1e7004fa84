pub mod ipv4;
pub mod tcp;
pub mod udp;
mod transport;

pub use transport::Transport;

use serde::Serialize;
use std::fmt;

/// デコード結果の種類を表すタグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    IPv4,
    UDP,
    TCP,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::IPv4 => "IPv4",
            Kind::UDP => "UDP",
            Kind::TCP => "TCP",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
