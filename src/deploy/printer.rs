//! SCP upload to the printer
//!
//! The printer runs a stock OpenSSH server with password login. Documents are
//! written with the SCP sink protocol over a single authenticated session.

use std::{
    io::Write as _,
    net::{TcpStream, ToSocketAddrs as _},
    path::Path,
    sync::Arc,
    time::Duration,
};

use tracing::{debug, info};

use crate::{config::PrinterConfig, job};

const SSH_PORT: u16 = 22;
const TIMEOUT: Duration = Duration::from_secs(15);
const FILE_MODE: i32 = 0o644;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to resolve {0}")]
    Resolve(String),
    #[error("Failed to connect to {host}: {source}")]
    Connect {
        host: String,
        source: std::io::Error,
    },
    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),
    #[error("Failed to write to remote: {0}")]
    Write(std::io::Error),
    #[error("Remote directory {0} not found or is not a directory")]
    MissingRemoteDirectory(String),
    #[error("Remote command exited with status {0}")]
    RemoteStatus(i32),
    #[error("Upload task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct Client {
    session: Arc<ssh2::Session>,
    remote_dir: String,
}

fn open_session(config: &PrinterConfig) -> Result<ssh2::Session, Error> {
    let addr = (config.host.as_str(), SSH_PORT)
        .to_socket_addrs()
        .map_err(|source| Error::Connect {
            host: config.host.clone(),
            source,
        })?
        .next()
        .ok_or_else(|| Error::Resolve(config.host.clone()))?;
    let tcp = TcpStream::connect_timeout(&addr, TIMEOUT).map_err(|source| Error::Connect {
        host: config.host.clone(),
        source,
    })?;
    let mut session = ssh2::Session::new()?;
    session.set_timeout(TIMEOUT.as_millis() as u32);
    session.set_tcp_stream(tcp);
    session.handshake()?;
    session.userauth_password(&config.user, &config.password)?;
    Ok(session)
}

fn check_remote_dir(session: &ssh2::Session, dir: &str) -> Result<(), Error> {
    let mut channel = session.channel_session()?;
    channel.exec(&format!("test -d '{}'", dir.replace('\'', r"'\''")))?;
    channel.wait_close()?;
    match channel.exit_status()? {
        0 => Ok(()),
        _ => Err(Error::MissingRemoteDirectory(dir.to_owned())),
    }
}

fn send_file(session: &ssh2::Session, remote_path: &str, content: &[u8]) -> Result<(), Error> {
    let mut channel = session.scp_send(
        Path::new(remote_path),
        FILE_MODE,
        content.len() as u64,
        None,
    )?;
    channel.write_all(content).map_err(Error::Write)?;
    channel.send_eof()?;
    channel.wait_eof()?;
    channel.close()?;
    channel.wait_close()?;
    match channel.exit_status()? {
        0 => Ok(()),
        status => Err(Error::RemoteStatus(status)),
    }
}

impl Client {
    /// Connect, authenticate and make sure the target directory exists.
    pub async fn connect(config: PrinterConfig) -> Result<Self, Error> {
        let remote_dir = config.remote_dir.trim_end_matches('/').to_owned();
        let session = tokio::task::spawn_blocking({
            let remote_dir = remote_dir.clone();
            move || {
                let session = open_session(&config)?;
                info!(host = %config.host, user = %config.user, "SSH session established");
                check_remote_dir(&session, &remote_dir)?;
                debug!(dir = %remote_dir, "Found remote directory");
                Ok::<_, Error>(session)
            }
        })
        .await??;
        Ok(Self {
            session: Arc::new(session),
            remote_dir,
        })
    }

    fn remote_path(&self, name: &str) -> String {
        format!("{}/{name}", self.remote_dir)
    }
}

impl job::storage::file::Client for Client {
    type Error = Error;

    async fn put(&self, name: &str, content: &[u8]) -> Result<(), Self::Error> {
        let session = self.session.clone();
        let remote_path = self.remote_path(name);
        let content = content.to_vec();
        tokio::task::spawn_blocking(move || {
            debug!(path = %remote_path, bytes = content.len(), "Sending file over SCP");
            send_file(&session, &remote_path, &content)
        })
        .await??;
        Ok(())
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if let Err(error) = self.session.disconnect(None, "sync finished", None) {
            debug!(%error, "Failed to close SSH session");
        }
    }
}

