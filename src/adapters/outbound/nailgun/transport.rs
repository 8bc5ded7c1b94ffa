use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};

/// Prefix marking a helper address as a Unix domain socket path
pub const LOCAL_PREFIX: &str = "local:";

/// Where the helper listens: a Unix socket path or a TCP `host:port`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperAddress {
    Local(PathBuf),
    Tcp(String),
}

impl HelperAddress {
    /// Socket file to clean up around the helper's lifetime, if any
    pub fn socket_path(&self) -> Option<&Path> {
        match self {
            HelperAddress::Local(path) => Some(path),
            HelperAddress::Tcp(_) => None,
        }
    }

    pub async fn connect(&self) -> io::Result<Box<dyn HelperStream>> {
        match self {
            HelperAddress::Local(path) => Ok(Box::new(UnixStream::connect(path).await?)),
            HelperAddress::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str()).await?;
                stream.set_nodelay(true)?;
                Ok(Box::new(stream))
            }
        }
    }
}

impl FromStr for HelperAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(path) = trimmed.strip_prefix(LOCAL_PREFIX) {
            if path.is_empty() {
                return Err(format!("Invalid helper address: {}. A socket path must follow '{}'", s, LOCAL_PREFIX));
            }
            return Ok(HelperAddress::Local(PathBuf::from(path)));
        }
        match trimmed.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(HelperAddress::Tcp(trimmed.to_string()))
            }
            _ => Err(format!(
                "Invalid helper address: {}. Use '{}<socket path>' or '<host>:<port>'",
                s, LOCAL_PREFIX
            )),
        }
    }
}

/// The helper's own command-line form of the address
impl fmt::Display for HelperAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelperAddress::Local(path) => write!(f, "{}{}", LOCAL_PREFIX, path.display()),
            HelperAddress::Tcp(addr) => f.write_str(addr),
        }
    }
}

/// A connected byte stream to the helper
pub trait HelperStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> HelperStream for T {}
