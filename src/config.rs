use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub model_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        let host: IpAddr = std::env::var("HOST")
            .ok()
            .and_then(|s| {
                s.parse()
                    .map_err(|e| {
                        tracing::warn!("Invalid HOST value '{}': {}", s, e);
                        e
                    })
                    .ok()
            })
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let model_dir: PathBuf = std::env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("models"));

        tracing::info!(
            "Configuration loaded: {}:{} (models from {})",
            host,
            port,
            model_dir.display()
        );

        Self {
            bind_addr: SocketAddr::new(host, port),
            model_dir,
        }
    }
}
