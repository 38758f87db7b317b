//! [`NetworkStream`] over a blocking `std::net::TcpStream`.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use glimpse_types::backend::NetworkStream;
use glimpse_types::error::{GlimpseError, Result};

/// A plain TCP connection.
pub struct StdNetworkStream {
    stream: TcpStream,
}

impl StdNetworkStream {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl NetworkStream for StdNetworkStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.stream.read(buf)?)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        Ok(self.stream.write(data)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.stream.flush()?)
    }

    fn close(&mut self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // The peer already hung up.
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Open a blocking TCP connection to `host:port`.
///
/// Every resolved address is tried in order; the error from the last
/// attempt is reported when none accepts. There is no connect or read
/// timeout.
pub fn tcp_connect(host: &str, port: u16) -> Result<StdNetworkStream> {
    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| GlimpseError::ConnectionFailure(format!("resolve {host}:{port}: {e}")))?;

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect(addr) {
            Ok(stream) => {
                log::debug!("connected to {addr}");
                return Ok(StdNetworkStream::new(stream));
            },
            Err(e) => {
                log::debug!("connect {addr} failed: {e}");
                last_err = Some(e);
            },
        }
    }

    Err(GlimpseError::ConnectionFailure(match last_err {
        Some(e) => format!("{host}:{port}: {e}"),
        None => format!("no addresses for {host}:{port}"),
    }))
}
