// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mock server fixtures shared by the API tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{CallEngine, ClientConfig, Platform, Transport, UserGroupClient};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_KEY: &str = "test-key";
pub const CHECK_PATH: &str = "/api/v3/tags";

/// Configuration for an enterprise instance served by `server`.
pub fn create_test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(
        Some(server.uri()),
        Some(String::from(TEST_TOKEN)),
        Some(String::from(TEST_KEY)),
    )
    .expect("valid test config")
}

/// Answers the connectivity check with 200.
pub async fn mount_connectivity_check(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CHECK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(server)
        .await;
}

/// Opens a checked session against `server`.
pub async fn connect_transport(server: &MockServer) -> Transport {
    mount_connectivity_check(server).await;
    let config: ClientConfig = create_test_config(server);
    Transport::connect(&config, &format!("{}{CHECK_PATH}", server.uri()))
        .await
        .expect("connectivity check succeeds")
}

/// A call engine rooted at the server's v3 API.
pub async fn connect_engine(server: &MockServer) -> CallEngine {
    let transport: Transport = connect_transport(server).await;
    CallEngine::new(transport, &format!("{}/api/v3", server.uri()))
}

/// A user group client for the enterprise instance served by `server`.
pub async fn connect_group_client(server: &MockServer) -> UserGroupClient {
    mount_connectivity_check(server).await;
    UserGroupClient::connect(&create_test_config(server))
        .await
        .expect("client connects")
}

pub fn enterprise_platform(server: &MockServer) -> Platform {
    Platform::Enterprise {
        site_url: server.uri(),
    }
}

pub fn group_json(id: u64, name: &str, member_ids: &[u64]) -> Value {
    let users: Vec<Value> = member_ids
        .iter()
        .map(|id| json!({"id": id, "name": format!("User {id}")}))
        .collect();
    json!({
        "id": id,
        "name": name,
        "description": "",
        "users": users,
        "userCount": member_ids.len()
    })
}

pub fn page_json(items: Vec<Value>, page: u64, total_pages: u64) -> Value {
    json!({
        "totalCount": items.len(),
        "pageSize": 100,
        "page": page,
        "totalPages": total_pages,
        "items": items
    })
}

pub fn user_json(user_id: u64, email: &str) -> Value {
    json!({
        "user_id": user_id,
        "email": email,
        "display_name": format!("User {user_id}")
    })
}

/// Body served by [`SelfSignedServer`] for every request.
pub const SELF_SIGNED_BODY: &str = "{\"items\":[]}";

/// HTTPS server presenting a freshly generated self-signed certificate.
///
/// Answers every request with `200` and [`SELF_SIGNED_BODY`], closing the
/// connection afterwards, and counts the requests it answered. Handshakes
/// aborted by a verifying client are not counted.
pub struct SelfSignedServer {
    addr: SocketAddr,
    served: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl SelfSignedServer {
    pub async fn start() -> Self {
        let certified: rcgen::CertifiedKey = rcgen::generate_simple_self_signed(vec![
            String::from("localhost"),
            String::from("127.0.0.1"),
        ])
        .expect("Failed to generate certificate");
        let cert: CertificateDer<'static> = certified.cert.der().clone();
        let key: PrivateKeyDer<'static> =
            PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()).into();

        let config: rustls::ServerConfig = rustls::ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .expect("Failed to select protocol versions")
        .with_no_client_auth()
        .with_single_cert(vec![cert], key)
        .expect("Failed to build server config");
        let acceptor: TlsAcceptor = TlsAcceptor::from(Arc::new(config));

        let listener: TcpListener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind TCP listener");
        let addr: SocketAddr = listener.local_addr().expect("Failed to get local address");
        let served: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));

        let counter: Arc<AtomicUsize> = Arc::clone(&served);
        let handle: JoinHandle<()> = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor: TlsAcceptor = acceptor.clone();
                let counter: Arc<AtomicUsize> = Arc::clone(&counter);
                tokio::spawn(async move {
                    let Ok(mut tls) = acceptor.accept(stream).await else {
                        return;
                    };
                    if read_request_head(&mut tls).await {
                        counter.fetch_add(1, Ordering::SeqCst);
                        let response: String = format!(
                            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                             content-length: {}\r\nconnection: close\r\n\r\n{SELF_SIGNED_BODY}",
                            SELF_SIGNED_BODY.len()
                        );
                        let _ = tls.write_all(response.as_bytes()).await;
                        let _ = tls.shutdown().await;
                    }
                });
            }
        });

        Self {
            addr,
            served,
            handle,
        }
    }

    pub fn uri(&self) -> String {
        format!("https://127.0.0.1:{}", self.addr.port())
    }

    /// Requests answered so far.
    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

impl Drop for SelfSignedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Reads until the end of the request headers. Returns false if the peer
/// went away first.
async fn read_request_head(stream: &mut (impl AsyncRead + Unpin)) -> bool {
    let mut head: Vec<u8> = Vec::new();
    let mut buf: [u8; 1024] = [0; 1024];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return false,
            Ok(n) => {
                head.extend_from_slice(&buf[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    return true;
                }
            }
        }
    }
}
