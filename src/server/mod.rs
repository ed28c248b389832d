pub mod api;

use crate::agent::ChatAgent;
use crate::cli::Args;
use axum_server::tls_rustls::RustlsConfig;
use log::{ info, error };
use std::error::Error;
use std::net::SocketAddr;

pub struct Server {
    agent: ChatAgent,
    args: Args,
}

impl Server {
    pub fn new(agent: ChatAgent, args: Args) -> Self {
        Self { agent, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let app = api::build_router(self.agent.clone(), &self.args.static_dir);
        let addr = self.resolve_addr().await?;

        match self.tls_paths()? {
            Some((cert_path, key_path)) => {
                info!(
                    "TLS enabled. Loading certificate from '{}' and key from '{}'",
                    cert_path,
                    key_path
                );
                let tls_config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
                info!("🚀 HTTPS server running on {}", addr);
                axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
            }
            None => {
                let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                    error!("Failed to bind HTTP server to {}: {}", addr, e);
                    e
                })?;
                info!("🚀 HTTP server running on {}", addr);
                axum::serve(listener, app.into_make_service()).await?;
            }
        }

        Ok(())
    }

    async fn resolve_addr(&self) -> Result<SocketAddr, Box<dyn Error + Send + Sync>> {
        let addr = self.args.server_addr();
        let resolved = tokio::net::lookup_host(addr.as_str()).await?.next();
        resolved.ok_or_else(|| format!("Could not resolve server address '{}'", addr).into())
    }

    fn tls_paths(&self) -> Result<Option<(&str, &str)>, Box<dyn Error + Send + Sync>> {
        if !self.args.enable_tls {
            info!("TLS not enabled. Running plain HTTP server.");
            return Ok(None);
        }
        match (&self.args.tls_cert_path, &self.args.tls_key_path) {
            (Some(cert_path), Some(key_path)) => Ok(Some((cert_path.as_str(), key_path.as_str()))),
            (Some(_), None) | (None, Some(_)) => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                Err("Missing TLS certificate or key path".into())
            }
            (None, None) => {
                error!("--enable-tls was set but no certificate/key paths provided.");
                Err("TLS enabled without cert/key".into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistoryStore;
    use crate::llm::chat::new_client;
    use crate::llm::LlmConfig;
    use clap::Parser;
    use std::sync::Arc;

    fn server_with(extra: &[&str]) -> Server {
        let mut argv = vec!["groq-relay", "--api-key", "secret"];
        argv.extend_from_slice(extra);
        let args = Args::try_parse_from(argv).unwrap();
        let client = new_client(&LlmConfig {
            api_key: Some("secret".into()),
            ..LlmConfig::default()
        }).unwrap();
        Server::new(ChatAgent::new(client, Arc::new(MemoryHistoryStore::new())), args)
    }

    #[test]
    fn tls_disabled_by_default() {
        assert!(server_with(&[]).tls_paths().unwrap().is_none());
    }

    #[test]
    fn tls_requires_both_paths() {
        let server = server_with(&["--enable-tls", "--tls-cert-path", "cert.pem"]);
        assert!(server.tls_paths().is_err());
        let server = server_with(&["--enable-tls"]);
        assert!(server.tls_paths().is_err());
    }

    #[test]
    fn tls_paths_are_returned_when_complete() {
        let server = server_with(&[
            "--enable-tls",
            "--tls-cert-path",
            "cert.pem",
            "--tls-key-path",
            "key.pem",
        ]);
        assert_eq!(server.tls_paths().unwrap(), Some(("cert.pem", "key.pem")));
    }

    #[tokio::test]
    async fn resolves_numeric_address() {
        let server = server_with(&["--host", "127.0.0.1", "--port", "9090"]);
        let addr = server.resolve_addr().await.unwrap();
        assert_eq!(addr, "127.0.0.1:9090".parse::<SocketAddr>().unwrap());
    }
}
