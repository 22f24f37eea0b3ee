use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "whiteboard-server")]
#[command(version)]
#[command(about = "Shared whiteboard over websockets", long_about = None)]
pub struct Config {
    /// Address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory holding the browser client
    #[arg(long, env = "STATIC_DIR", default_value = "client")]
    pub static_dir: PathBuf,

    /// Outbound queue capacity per connection
    #[arg(long, env = "CONNECTION_BUFFER", default_value_t = 32)]
    pub connection_buffer: usize,

    /// Seconds between pings sent to each client
    #[arg(long, env = "HEARTBEAT_INTERVAL", default_value_t = 5)]
    pub heartbeat_interval: u64,

    /// Seconds of silence after which a client is dropped
    #[arg(long, env = "CLIENT_TIMEOUT", default_value_t = 10)]
    pub client_timeout: u64,
}

impl Config {
    pub fn heartbeat(&self) -> Heartbeat {
        Heartbeat {
            interval: Duration::from_secs(self.heartbeat_interval),
            timeout: Duration::from_secs(self.client_timeout),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    pub interval: Duration,
    pub timeout: Duration,
}
