use axum::Router;
use url::Url;

/// Serve `router` on an ephemeral local port and return its base URL
/// (`http://127.0.0.1:<port>/`). Join the path a client expects onto it.
pub async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/")).unwrap()
}
