use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use suppaftp::FtpStream;
use suppaftp::types::FileType;

use super::ftp_like::Credentials;
use crate::TransferError;
use crate::parse::RemoteAddress;

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub connect_timeout: Duration,
    pub io_timeout: Duration,
    pub default_port: u16,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            io_timeout: Duration::from_secs(30),
            default_port: 21,
        }
    }
}

fn resolve(authority: &str) -> Result<SocketAddr, TransferError> {
    let mut addrs = authority
        .to_socket_addrs()
        .map_err(|e| TransferError::Connect(authority.to_string(), e.to_string()))?;
    addrs.next().ok_or_else(|| {
        TransferError::Connect(authority.to_string(), "no address resolved".to_string())
    })
}

/// Open the control connection, log in and switch to binary mode.
pub fn connect_session(
    addr: &RemoteAddress,
    credentials: &Credentials,
    settings: &SessionSettings,
) -> Result<FtpStream, TransferError> {
    let authority = addr.authority();
    let sock = resolve(&authority)?;
    let mut ftp = FtpStream::connect_timeout(sock, settings.connect_timeout)
        .map_err(|e| TransferError::Connect(authority.clone(), e.to_string()))?;
    let _ = ftp.get_ref().set_read_timeout(Some(settings.io_timeout));
    let _ = ftp.get_ref().set_write_timeout(Some(settings.io_timeout));

    ftp.login(credentials.username.as_str(), credentials.password.as_str())
        .map_err(|e| TransferError::Login(authority.clone(), e.to_string()))?;
    ftp.transfer_type(FileType::Binary)
        .map_err(|e| TransferError::Connect(authority.clone(), e.to_string()))?;
    tracing::debug!("[ftp] logged in to {} as {}", authority, credentials.username);
    Ok(ftp)
}
