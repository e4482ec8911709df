use std::fs::File;
use std::path::Path;

use suppaftp::{FtpError, FtpStream, Status};

use super::session::{SessionSettings, connect_session};
use crate::parse::{RemoteAddress, parse_remote_address};
use crate::{MkdirError, TransferError};

/// Login pair for the remote server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Remote operations used by the provisioner and the orchestrator. Both take
/// full `ftp://` URLs so tests can record exactly what would be sent.
pub trait FtpLike {
    /// Create exactly one remote directory and return the server's reply line.
    fn make_dir(&mut self, dir_url: &str, credentials: &Credentials) -> Result<String, MkdirError>;
    /// Store `local` at `file_url`, returning the number of bytes sent.
    fn store(
        &mut self,
        file_url: &str,
        local: &Path,
        credentials: &Credentials,
    ) -> Result<u64, TransferError>;
    /// Release any open connection.
    fn finish(&mut self) {}
}

/// `FtpLike` over a real FTP control connection. One authenticated session is
/// kept per `user@host:port` and reused until an I/O level error drops it.
pub struct FtpClient {
    settings: SessionSettings,
    session: Option<(String, FtpStream)>,
}

impl FtpClient {
    pub fn new(settings: SessionSettings) -> Self {
        Self { settings, session: None }
    }

    fn parse(&self, url: &str) -> Result<RemoteAddress, String> {
        parse_remote_address(url, self.settings.default_port).map_err(|e| e.to_string())
    }

    fn ensure_session(
        &mut self,
        addr: &RemoteAddress,
        credentials: &Credentials,
    ) -> Result<&mut FtpStream, TransferError> {
        let key = format!("{}@{}", credentials.username, addr.authority());
        let reusable = matches!(&self.session, Some((k, _)) if *k == key);
        if !reusable {
            self.close();
            let ftp = connect_session(addr, credentials, &self.settings)?;
            self.session = Some((key, ftp));
        }
        match self.session.as_mut() {
            Some((_, ftp)) => Ok(ftp),
            None => Err(TransferError::OperationFailed("no FTP session".to_string())),
        }
    }

    // A negative server reply leaves the control connection usable; anything
    // else forces a reconnect on the next call.
    fn after_error(&mut self, e: &FtpError) {
        if !matches!(e, FtpError::UnexpectedResponse(_)) {
            tracing::debug!("[ftp] dropping session after error: {}", e);
            self.session = None;
        }
    }

    fn close(&mut self) {
        if let Some((key, mut ftp)) = self.session.take() {
            if let Err(e) = ftp.quit() {
                tracing::debug!("[ftp] quit {} failed: {}", key, e);
            }
        }
    }
}

/// Last reply line as text, without the trailing CRLF.
pub fn reply_line(body: &[u8]) -> String {
    String::from_utf8_lossy(body).trim_end().to_string()
}

impl FtpLike for FtpClient {
    fn make_dir(&mut self, dir_url: &str, credentials: &Credentials) -> Result<String, MkdirError> {
        let addr = self.parse(dir_url).map_err(MkdirError::InvalidAddress)?;
        let ftp = self
            .ensure_session(&addr, credentials)
            .map_err(|e| MkdirError::Connect(dir_url.to_string(), e.to_string()))?;
        // raw MKD so the 257 reply can go into the transcript
        let mkd = format!("MKD {}", addr.relative_path());
        match ftp.custom_command(mkd, &[Status::PathCreated]) {
            Ok(reply) => Ok(reply_line(&reply.body)),
            Err(e) => {
                self.after_error(&e);
                Err(MkdirError::Rejected(dir_url.to_string(), e.to_string()))
            }
        }
    }

    fn store(
        &mut self,
        file_url: &str,
        local: &Path,
        credentials: &Credentials,
    ) -> Result<u64, TransferError> {
        let addr = self.parse(file_url).map_err(TransferError::InvalidAddress)?;
        let mut local_file = File::open(local)
            .map_err(|e| TransferError::LocalOpen(local.display().to_string(), e.to_string()))?;
        let ftp = self.ensure_session(&addr, credentials)?;
        match ftp.put_file(addr.relative_path(), &mut local_file) {
            Ok(bytes) => {
                tracing::debug!("[ftp] stored {} bytes at {}", bytes, file_url);
                Ok(bytes)
            }
            Err(e) => {
                self.after_error(&e);
                Err(TransferError::Store(file_url.to_string(), e.to_string()))
            }
        }
    }

    fn finish(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let c = Credentials::new("deploy", "hunter2");
        let s = format!("{:?}", c);
        assert!(s.contains("deploy"));
        assert!(!s.contains("hunter2"));
    }

    #[test]
    fn reply_line_drops_line_ending() {
        assert_eq!(reply_line(b"257 \"/www/img\" created\r\n"), "257 \"/www/img\" created");
        assert_eq!(reply_line(b""), "");
    }

    #[test]
    fn malformed_urls_fail_before_connecting() {
        let mut client = FtpClient::new(SessionSettings::default());
        let creds = Credentials::new("u", "p");
        let err = client.make_dir("not-a-url/a", &creds).unwrap_err();
        assert!(matches!(err, MkdirError::InvalidAddress(_)));
        let err = client.store("ftp://host:x/a.png", Path::new("a.png"), &creds).unwrap_err();
        assert!(matches!(err, TransferError::InvalidAddress(_)));
    }

    #[test]
    fn missing_local_file_fails_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = FtpClient::new(SessionSettings::default());
        let creds = Credentials::new("u", "p");
        let err = client
            .store("ftp://127.0.0.1/site/a.png", &dir.path().join("a.png"), &creds)
            .unwrap_err();
        assert!(matches!(err, TransferError::LocalOpen(..)));
    }
}
