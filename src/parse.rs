use anyhow::Result;

/// A parsed `scheme://host[:port]/path` remote location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path part including its leading slash; empty when the URL has none.
    pub path: String,
}

impl RemoteAddress {
    /// `host:port`, suitable for socket address resolution.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path relative to the login directory (one leading slash removed).
    pub fn relative_path(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }
}

pub fn parse_remote_address(input: &str, default_port: u16) -> Result<RemoteAddress> {
    let (scheme, rest) = input
        .split_once("://")
        .ok_or_else(|| anyhow::anyhow!("missing scheme, expected ftp://host/path: {}", input))?;
    let scheme = scheme.trim().to_ascii_lowercase();
    if scheme != "ftp" {
        return Err(anyhow::anyhow!("unsupported scheme '{}': {}", scheme, input));
    }

    let (authority, path) = match rest.find('/') {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };
    // user info embedded in the URL is ignored; credentials come from the command line
    let host_port = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);

    let (host, port) = if let Some((h, p_str)) = host_port.rsplit_once(':') {
        let p: u16 = p_str.parse().map_err(|_| anyhow::anyhow!("invalid port: {}", p_str))?;
        (h.to_string(), p)
    } else {
        (host_port.to_string(), default_port)
    };
    if host.is_empty() {
        return Err(anyhow::anyhow!("missing host: {}", input));
    }

    Ok(RemoteAddress { scheme, host, port, path: path.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_nested_path() {
        let a = parse_remote_address("ftp://ftp.mysite.com/myfolder/a/index.html", 21).unwrap();
        assert_eq!(a.host, "ftp.mysite.com");
        assert_eq!(a.port, 21);
        assert_eq!(a.path, "/myfolder/a/index.html");
        assert_eq!(a.relative_path(), "myfolder/a/index.html");
        assert_eq!(a.authority(), "ftp.mysite.com:21");
    }

    #[test]
    fn explicit_port_and_user_info() {
        let a = parse_remote_address("FTP://bob@10.0.0.5:2121/site", 21).unwrap();
        assert_eq!(a.scheme, "ftp");
        assert_eq!(a.host, "10.0.0.5");
        assert_eq!(a.port, 2121);
        assert_eq!(a.relative_path(), "site");
    }

    #[test]
    fn bare_host_has_empty_path() {
        let a = parse_remote_address("ftp://host", 21).unwrap();
        assert_eq!(a.path, "");
        assert_eq!(a.relative_path(), "");
    }

    #[test]
    fn rejects_missing_scheme_and_bad_port() {
        assert!(parse_remote_address("host/folder", 21).is_err());
        assert!(parse_remote_address("http://host/folder", 21).is_err());
        assert!(parse_remote_address("ftp://host:abc/folder", 21).is_err());
        assert!(parse_remote_address("ftp:///folder", 21).is_err());
    }
}
