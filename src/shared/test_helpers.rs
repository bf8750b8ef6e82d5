#[cfg(test)]
use axum::Router;

/// Serve `router` on an ephemeral local port and return its base URL.
///
/// Used to stand in for the AI gateway and the course catalog in handler
/// tests; the server lives until the test runtime shuts down.
#[cfg(test)]
pub async fn spawn_mock_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve mock upstream");
    });

    format!("http://{}", addr)
}
