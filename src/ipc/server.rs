//! Backend-side IPC server
//!
//! Accepts connections on a local socket and answers each request by
//! executing it against a [`CommandInterface`]. Clients are served one at a
//! time, in arrival order.

use std::future::Future;

use interprocess::local_socket::traits::tokio::Listener as ListenerTrait;
use tokio::io::BufReader;

use crate::backend::CommandInterface;
use crate::common::{error::IpcError, Error, Result};

use super::protocol::{Request, Response};
use super::transport::{self, platform::Listener, Stream};

/// Serve `backend` on `listener` until `shutdown` resolves
pub async fn serve<B, F>(listener: Listener, backend: &mut B, shutdown: F) -> Result<()>
where
    B: CommandInterface,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, exiting");
                break;
            }
            accept_result = listener.accept() => {
                match accept_result {
                    Ok(stream) => {
                        if let Err(e) = handle_client(stream, backend).await {
                            tracing::error!("Error handling client: {}", e);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Handle a single client connection
async fn handle_client<B: CommandInterface>(stream: Stream, backend: &mut B) -> Result<()> {
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);

    tracing::debug!("Client connected");

    loop {
        let request_data = match transport::recv_message(&mut reader).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::debug!("Client disconnected");
                break;
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let response = match serde_json::from_slice::<Request>(&request_data) {
            Ok(request) => {
                let name = request.command.name();
                tracing::debug!(id = request.id, command = name, "Handling request");
                match backend.invoke(request.command).await {
                    Ok(result) => Response::success(request.id, result),
                    Err(e) => {
                        tracing::debug!(command = name, error = %e, "Command failed");
                        Response::error(request.id, IpcError::from(&e))
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Malformed request: {}", e);
                Response::error(0, IpcError::new("INVALID_REQUEST", e.to_string()))
            }
        };

        let json = serde_json::to_vec(&response)?;
        transport::send_message(&mut writer, &json).await?;
    }

    Ok(())
}
