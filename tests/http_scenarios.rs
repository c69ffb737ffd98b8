//! Black-box end-to-end scenarios driven over raw TCP, one server per test
//! bound to an OS-assigned ephemeral port.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use rankd::server::Server;
use rankd::store::UserStore;

fn start_server() -> (Server, u16) {
    // Port 0 asks the OS to pick a free one; bind directly to learn it, then
    // hand the same listener's address off to Server::start.
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);

    let store = Arc::new(UserStore::new());
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::start(&addr, 2, store).expect("server binds");
    // give the accept thread a moment to start listening.
    std::thread::sleep(Duration::from_millis(50));
    (server, port)
}

fn request(port: u16, raw: &str) -> String {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
    stream.write_all(raw.as_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let mut response = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                response.extend_from_slice(&buf[..n]);
                // the server writes one response then the caller's test body
                // stops reading; a short buffer is enough for these bodies.
                break;
            }
            Err(_) => break,
        }
    }
    String::from_utf8(response).unwrap()
}

fn body_of(response: &str) -> &str {
    response.split("\r\n\r\n").nth(1).unwrap_or("")
}

fn put_body(uid: u32, name: &str, exp_pers: u32, active: u32, exp_gang: u32) -> String {
    let json = format!(
        r#"{{"uid":{},"name":"{}","exp_pers":{},"active":{},"exp_gang":{}}}"#,
        uid, name, exp_pers, active, exp_gang
    );
    format!(
        "POST /put HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
        json.len(),
        json
    )
}

#[test]
fn scenario_1_empty_store_reports_missing_user() {
    let (server, port) = start_server();
    let response = request(port, "GET /info?uid=42 HTTP/1.1\r\n\r\n");
    assert_eq!(body_of(&response), "User 42 doesn't exist.");
    server.shutdown();
}

#[test]
fn scenario_2_put_then_rank_one() {
    let (server, port) = start_server();
    let response = request(port, &put_body(1, "A", 100, 50, 10));
    assert_eq!(body_of(&response), "Put Successfully");

    let response = request(port, "GET /get_exp_pers?uid=1 HTTP/1.1\r\n\r\n");
    assert_eq!(body_of(&response), "Exp_Pers Rank: 1");
    server.shutdown();
}

#[test]
fn scenario_3_three_user_rank_ordering() {
    let (server, port) = start_server();
    request(port, &put_body(1, "A", 100, 0, 0));
    request(port, &put_body(2, "B", 200, 0, 0));
    request(port, &put_body(3, "C", 150, 0, 0));

    assert_eq!(
        body_of(&request(port, "GET /get_exp_pers?uid=1 HTTP/1.1\r\n\r\n")),
        "Exp_Pers Rank: 3"
    );
    assert_eq!(
        body_of(&request(port, "GET /get_exp_pers?uid=2 HTTP/1.1\r\n\r\n")),
        "Exp_Pers Rank: 1"
    );
    assert_eq!(
        body_of(&request(port, "GET /get_exp_pers?uid=3 HTTP/1.1\r\n\r\n")),
        "Exp_Pers Rank: 2"
    );
    server.shutdown();
}

#[test]
fn scenario_4_duplicate_put_is_rejected() {
    let (server, port) = start_server();
    assert_eq!(
        body_of(&request(port, &put_body(1, "A", 100, 0, 0))),
        "Put Successfully"
    );
    assert_eq!(
        body_of(&request(port, &put_body(1, "A", 1, 1, 1))),
        "Bad Put"
    );
    server.shutdown();
}

#[test]
fn scenario_5_wrong_field_order_is_rejected() {
    let (server, port) = start_server();
    let json = r#"{"name":"X","uid":1,"exp_pers":100,"active":50,"exp_gang":10}"#;
    let raw = format!(
        "POST /put HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
        json.len(),
        json
    );
    assert_eq!(body_of(&request(port, &raw)), "Bad Put");
    server.shutdown();
}

#[test]
fn shutdown_stops_accepting_and_joins_workers() {
    let (server, port) = start_server();
    assert_eq!(
        body_of(&request(port, "GET /info?uid=1 HTTP/1.1\r\n\r\n")),
        "User 1 doesn't exist."
    );

    server.shutdown();

    // the listener has been torn down; a fresh connection attempt must fail
    // (refused) instead of hanging or being served.
    assert!(TcpStream::connect(("127.0.0.1", port)).is_err());
}

#[test]
fn scenario_6_remove_twice() {
    let (server, port) = start_server();
    request(port, &put_body(1, "A", 100, 0, 0));

    assert_eq!(
        body_of(&request(port, "GET /remove?uid=1 HTTP/1.1\r\n\r\n")),
        "Remove Successfully"
    );
    assert_eq!(
        body_of(&request(port, "GET /remove?uid=1 HTTP/1.1\r\n\r\n")),
        "User 1 doesn't exist."
    );
    server.shutdown();
}
