/// Failure to create one remote directory.
#[derive(Debug, Clone)]
pub enum MkdirError {
    /// The directory URL could not be parsed into host and path.
    InvalidAddress(String),
    /// No authenticated session could be established for the directory's host.
    Connect(String, String),
    /// The server refused the MKD command; keeps the URL and the server reply.
    Rejected(String, String),
}

impl MkdirError {
    /// Short type name used in the `<kind>: <message>` transcript lines.
    pub fn kind(&self) -> &'static str {
        match self {
            MkdirError::InvalidAddress(_) => "InvalidAddress",
            MkdirError::Connect(..) => "ConnectError",
            MkdirError::Rejected(..) => "FtpError",
        }
    }
}

impl std::fmt::Display for MkdirError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MkdirError::InvalidAddress(url) => write!(f, "invalid remote address: {}", url),
            MkdirError::Connect(url, msg) => write!(f, "cannot connect for {}: {}", url, msg),
            MkdirError::Rejected(_, msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for MkdirError {}

/// Errors raised along the selection and upload path.
#[derive(Debug, Clone)]
pub enum TransferError {
    InvalidAddress(String),
    // connection related
    Connect(String, String),
    Login(String, String),
    // local side
    LocalOpen(String, String),
    SourceMissing(String),
    // remote store
    Store(String, String),
    OperationFailed(String),
}

impl TransferError {
    /// Short type name used in the `<kind>: <message>` transcript lines.
    pub fn kind(&self) -> &'static str {
        use TransferError::*;
        match self {
            InvalidAddress(_) => "InvalidAddress",
            Connect(..) => "ConnectError",
            Login(..) => "LoginError",
            LocalOpen(..) => "IoError",
            SourceMissing(_) => "DirectoryNotFound",
            Store(..) => "FtpError",
            OperationFailed(_) => "OperationFailed",
        }
    }
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TransferError::*;
        match self {
            InvalidAddress(a) => write!(f, "invalid remote address: {}", a),
            Connect(addr, msg) => write!(f, "cannot connect to {}: {}", addr, msg),
            Login(addr, msg) => write!(f, "login rejected by {}: {}", addr, msg),
            LocalOpen(p, msg) => write!(f, "cannot open local file {}: {}", p, msg),
            SourceMissing(p) => write!(f, "Directory does not exist: {}", p),
            Store(_, msg) => write!(f, "{}", msg),
            OperationFailed(s) => write!(f, "operation failed: {}", s),
        }
    }
}

impl std::error::Error for TransferError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_mkdir_displays_server_reply_only() {
        let e = MkdirError::Rejected("ftp://h/a".into(), "550 Permission denied".into());
        assert_eq!(e.to_string(), "550 Permission denied");
        assert_eq!(e.kind(), "FtpError");
    }

    #[test]
    fn missing_source_message_names_directory() {
        let e = TransferError::SourceMissing("/srv/site".into());
        assert_eq!(e.to_string(), "Directory does not exist: /srv/site");
    }
}
