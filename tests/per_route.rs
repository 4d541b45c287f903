//! End-to-end coverage of the per-route middleware surface: a live server,
//! raw HTTP/1.1 over TCP, exact response bodies.

use std::time::Duration;

use lane::middleware::{Chain, Next};
use lane::{with_params, Method, Params, Request, Response, Router, Server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const ADDR: &str = "127.0.0.1:18080";

async fn login(_req: Request, _params: Params) -> Response {
    Response::text("This is the content of the login controller\n")
}

async fn profile(_req: Request) -> Response {
    Response::text("This is the content of the profile controller\n")
}

async fn hello(_req: Request, params: Params) -> Response {
    Response::text(format!("Hello, {}!\n", params.get("name").unwrap_or("")))
}

async fn auth(req: Request, next: Next) -> Response {
    next.run(req).await
}

async fn start_server() {
    let router = Router::new();
    let matcher = router.clone();
    let router = router
        .post("/login", login)
        .mount(Method::Get, "/", Chain::new().link(auth).terminal(profile))
        .mount(
            Method::Get,
            "/hello/{name}",
            Chain::new().link(auth).terminal(with_params(matcher, hello)),
        );

    tokio::spawn(async move {
        Server::bind(ADDR).serve(router).await.expect("server error");
    });

    for _ in 0..50 {
        if TcpStream::connect(ADDR).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server did not come up on {ADDR}");
}

/// Sends one raw request on a fresh connection; returns (status, body).
async fn roundtrip(raw: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(ADDR).await.expect("connect");
    stream.write_all(raw.as_bytes()).await.expect("write");

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.expect("read");
    let text = String::from_utf8(buf).expect("utf-8 response");

    let status = text
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status line");
    let body = text.split("\r\n\r\n").nth(1).unwrap_or("").to_owned();
    (status, body)
}

#[tokio::test]
async fn serves_the_three_endpoints() {
    start_server().await;

    let (status, body) =
        roundtrip("GET /hello/world HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
            .await;
    assert_eq!(status, 200);
    assert_eq!(body, "Hello, world!\n");

    let (status, body) =
        roundtrip("GET / HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n").await;
    assert_eq!(status, 200);
    assert_eq!(body, "This is the content of the profile controller\n");

    let (status, body) = roundtrip(
        "POST /login HTTP/1.1\r\nhost: localhost\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, "This is the content of the login controller\n");

    let (status, _body) =
        roundtrip("GET /does-not-exist HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
            .await;
    assert_eq!(status, 404);
}
