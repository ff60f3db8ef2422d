//! Harness-side IPC client for communicating with the backend

use std::time::Duration;

use serde_json::Value;
use tokio::io::{ReadHalf, WriteHalf};

use crate::common::error::IpcError;
use crate::common::{Error, Result};

use super::protocol::{Command, Request, Response};
use super::transport::{self, Stream};

/// Client for communicating with the application backend
///
/// A call that times out or loses framing leaves the socket at an unknown
/// position in the byte stream, so that connection is dropped and the next
/// call opens a fresh one.
pub struct BackendClient {
    socket: String,
    connect_timeout: Duration,
    call_timeout: Option<Duration>,
    connection: Option<Connection>,
    next_id: u64,
}

struct Connection {
    reader: ReadHalf<Stream>,
    writer: WriteHalf<Stream>,
}

impl Connection {
    async fn open(name: &str, connect_timeout: Duration) -> Result<Self> {
        let stream = tokio::time::timeout(connect_timeout, transport::connect(name))
            .await
            .map_err(|_| Error::Timeout(connect_timeout.as_secs()))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound
                    || e.kind() == std::io::ErrorKind::ConnectionRefused
                {
                    Error::BackendNotRunning
                } else {
                    Error::BackendConnectionFailed(e)
                }
            })?;

        tracing::debug!(socket = name, "Connected to backend");

        let (reader, writer) = tokio::io::split(stream);
        Ok(Self { reader, writer })
    }

    async fn round_trip(&mut self, id: u64, command: Command) -> Result<Value> {
        let name = command.name();
        let request = Request { id, command };
        let json = serde_json::to_vec(&request)?;

        tracing::trace!(id, command = name, "Sending request");

        transport::send_message(&mut self.writer, &json)
            .await
            .map_err(|e| Error::BackendCommunication(e.to_string()))?;

        let response_data = transport::recv_message(&mut self.reader)
            .await
            .map_err(|e| Error::BackendCommunication(e.to_string()))?;

        let response: Response = serde_json::from_slice(&response_data)?;

        if response.id != id {
            return Err(Error::BackendCommunication(format!(
                "Response ID mismatch: expected {}, got {}",
                id, response.id
            )));
        }

        if response.success {
            Ok(response.result.unwrap_or(Value::Null))
        } else {
            let error = response
                .error
                .unwrap_or_else(|| IpcError::new("UNKNOWN", "Unknown error"));
            Err(Error::command_failed(name, error))
        }
    }
}

impl BackendClient {
    /// Connect to the backend listening on `name`
    pub async fn connect(name: &str, connect_timeout: Duration) -> Result<Self> {
        let connection = Connection::open(name, connect_timeout).await?;

        Ok(Self {
            socket: name.to_string(),
            connect_timeout,
            call_timeout: None,
            connection: Some(connection),
            next_id: 1,
        })
    }

    /// Bound every subsequent call by `timeout`
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Send a command and wait for the response
    pub async fn send_command(&mut self, command: Command) -> Result<Value> {
        let mut connection = match self.connection.take() {
            Some(connection) => connection,
            None => {
                tracing::debug!(socket = %self.socket, "Reconnecting to backend");
                Connection::open(&self.socket, self.connect_timeout).await?
            }
        };

        let id = self.next_id;
        self.next_id += 1;

        let outcome = match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, connection.round_trip(id, command))
                .await
                .unwrap_or(Err(Error::Timeout(limit.as_secs()))),
            None => connection.round_trip(id, command).await,
        };

        match &outcome {
            Err(e @ (Error::Timeout(_) | Error::BackendCommunication(_))) => {
                tracing::debug!(id, error = %e, "Dropping connection");
            }
            _ => self.connection = Some(connection),
        }

        outcome
    }

    /// Check if the backend is responding
    pub async fn ping(&mut self) -> Result<usize> {
        let accounts = self.send_command(Command::ListAccounts).await?;
        Ok(accounts.as_array().map_or(0, Vec::len))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use interprocess::local_socket::traits::tokio::Listener as ListenerTrait;
    use serde_json::json;
    use tokio::io::AsyncWriteExt;

    use super::*;

    #[tokio::test]
    async fn test_timed_out_call_does_not_poison_later_calls() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("backend.sock").display().to_string();
        let listener = transport::create_listener(&socket).await.unwrap();

        let server = tokio::spawn(async move {
            // First connection: announce a frame, then stall mid-body
            let first = listener.accept().await.unwrap();
            let (mut r1, mut w1) = tokio::io::split(first);
            transport::recv_message(&mut r1).await.unwrap();
            w1.write_all(&64u32.to_le_bytes()).await.unwrap();
            w1.flush().await.unwrap();

            // Second connection answers normally
            let second = listener.accept().await.unwrap();
            let (mut r2, mut w2) = tokio::io::split(second);
            let data = transport::recv_message(&mut r2).await.unwrap();
            let request: Request = serde_json::from_slice(&data).unwrap();
            let response = Response::success(request.id, json!([]));
            transport::send_message(&mut w2, &serde_json::to_vec(&response).unwrap())
                .await
                .unwrap();

            drop((r1, w1));
            request.id
        });

        let mut client = BackendClient::connect(&socket, Duration::from_secs(5))
            .await
            .unwrap()
            .with_call_timeout(Some(Duration::from_millis(300)));

        let first = client.send_command(Command::LoadConfig).await;
        assert!(matches!(first, Err(Error::Timeout(_))), "{first:?}");

        let second = client.send_command(Command::ListAccounts).await.unwrap();
        assert_eq!(second, json!([]));
        assert_eq!(server.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_mismatched_id_drops_connection() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("backend.sock").display().to_string();
        let listener = transport::create_listener(&socket).await.unwrap();

        let server = tokio::spawn(async move {
            let mut answered = Vec::new();
            for reply_offset in [7u64, 0] {
                let stream = listener.accept().await.unwrap();
                let (mut reader, mut writer) = tokio::io::split(stream);
                let data = transport::recv_message(&mut reader).await.unwrap();
                let request: Request = serde_json::from_slice(&data).unwrap();
                let response = Response::success(request.id + reply_offset, json!({}));
                transport::send_message(&mut writer, &serde_json::to_vec(&response).unwrap())
                    .await
                    .unwrap();
                answered.push(request.id);
            }
            answered
        });

        let mut client = BackendClient::connect(&socket, Duration::from_secs(5))
            .await
            .unwrap();

        let err = client.send_command(Command::LoadConfig).await.unwrap_err();
        assert!(matches!(err, Error::BackendCommunication(_)));
        assert_eq!(client.send_command(Command::LoadConfig).await.unwrap(), json!({}));
        assert_eq!(server.await.unwrap(), [1, 2]);
    }
}
