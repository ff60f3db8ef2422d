//! Framing between harness and backend
//!
//! Every message is a little-endian `u32` byte count followed by that many
//! bytes of JSON.

use std::io;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::common::paths;

/// Larger frames are rejected before allocating
const MAX_MESSAGE_SIZE: u32 = 10 * 1024 * 1024;

#[cfg(unix)]
pub mod platform {
    pub use interprocess::local_socket::tokio::{prelude::*, Listener, Stream};
    pub use interprocess::local_socket::{GenericFilePath, ListenerOptions};
}

#[cfg(windows)]
pub mod platform {
    pub use interprocess::local_socket::tokio::{prelude::*, Listener, Stream};
    pub use interprocess::local_socket::{GenericNamespaced, ListenerOptions};
}

use platform::*;

pub use platform::Stream;

/// Listen on `name`, replacing a stale socket file and restricting it to the owner
pub async fn create_listener(name: &str) -> io::Result<Listener> {
    paths::ensure_socket_dir(Path::new(name))?;
    paths::remove_socket(Path::new(name))?;

    #[cfg(unix)]
    let listener = {
        let fs_name = name.to_fs_name::<GenericFilePath>()?;
        ListenerOptions::new().name(fs_name).create_tokio()?
    };

    #[cfg(windows)]
    let listener = {
        let ns_name = name.to_ns_name::<GenericNamespaced>()?;
        ListenerOptions::new().name(ns_name).create_tokio()?
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(name, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(listener)
}

/// Open a connection to the backend listening on `name`
pub async fn connect(name: &str) -> io::Result<Stream> {
    #[cfg(unix)]
    let stream = {
        let fs_name = name.to_fs_name::<GenericFilePath>()?;
        Stream::connect(fs_name).await?
    };

    #[cfg(windows)]
    let stream = {
        let ns_name = name.to_ns_name::<GenericNamespaced>()?;
        Stream::connect(ns_name).await?
    };

    Ok(stream)
}

/// Write one frame
pub async fn send_message<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    data: &[u8],
) -> io::Result<()> {
    if data.len() > MAX_MESSAGE_SIZE as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Message too large",
        ));
    }

    let len = data.len() as u32;
    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame, failing with `UnexpectedEof` if the peer hung up first
pub async fn recv_message<R: AsyncReadExt + Unpin>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_le_bytes(len_buf);

    if len > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Message too large: {} bytes", len),
        ));
    }

    let mut data = vec![0u8; len as usize];
    reader.read_exact(&mut data).await?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_length_prefixed_framing() {
        let (mut a, mut b) = tokio::io::duplex(64);
        send_message(&mut a, br#"{"id":1}"#).await.unwrap();
        let data = recv_message(&mut b).await.unwrap();
        assert_eq!(data, br#"{"id":1}"#);
    }

    #[tokio::test]
    async fn test_oversized_prefix_is_rejected() {
        let (mut a, mut b) = tokio::io::duplex(64);
        a.write_all(&(MAX_MESSAGE_SIZE + 1).to_le_bytes())
            .await
            .unwrap();
        let err = recv_message(&mut b).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
