use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// How the stub answers every request it reads.
#[derive(Debug, Clone, Copy)]
pub(crate) enum StubBehavior {
    Respond { status: u16, delay: Duration },
    Redirect { status: u16, location: &'static str },
    Hang,
}

/// Minimal keep-alive HTTP/1.1 server for executor and controller tests.
pub(crate) struct StubServer {
    pub(crate) addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub(crate) async fn spawn(behavior: StubBehavior) -> Result<Self, String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|err| format!("Failed to bind stub server: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("Failed to read stub address: {}", err))?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve_connection(stream, behavior, Arc::clone(&seen)));
            }
        });
        Ok(Self {
            addr,
            requests,
            handle,
        })
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Raw request heads received so far, lowercased.
    pub(crate) fn request_heads(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    behavior: StubBehavior,
    seen: Arc<Mutex<Vec<String>>>,
) {
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let head_end = loop {
            if let Some(end) = find_head_end(&buffer) {
                break end;
            }
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(read) => buffer.extend_from_slice(chunk.get(..read).unwrap_or_default()),
            }
        };
        let head: Vec<u8> = buffer.drain(..head_end).collect();
        seen.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(String::from_utf8_lossy(&head).to_lowercase());

        match behavior {
            StubBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                return;
            }
            StubBehavior::Respond { status, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let response = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Length: 2\r\nConnection: keep-alive\r\n\r\nok",
                    status
                );
                if stream.write_all(response.as_bytes()).await.is_err() {
                    return;
                }
            }
            StubBehavior::Redirect { status, location } => {
                let response = format!(
                    "HTTP/1.1 {} Moved\r\nLocation: {}\r\nContent-Length: 2\r\nConnection: keep-alive\r\n\r\nok",
                    status, location
                );
                if stream.write_all(response.as_bytes()).await.is_err() {
                    return;
                }
            }
        }
    }
}

fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos.saturating_add(4))
}
