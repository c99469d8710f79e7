//! End-to-end tests against real services on loopback sockets.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use utils::{
    decrypt, encrypt, run_client, CipherJob, ClientConfig, ClientSession, ConnectionLimit, Error,
    ProtocolError, Role, Server, ValidationError,
};

fn start(role: Role, max_connections: usize) -> (SocketAddr, ConnectionLimit) {
    start_with_timeout(role, max_connections, None)
}

fn start_with_timeout(
    role: Role,
    max_connections: usize,
    timeout: Option<Duration>,
) -> (SocketAddr, ConnectionLimit) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let server = Server::from_listener(listener, role, max_connections).with_io_timeout(timeout);
    let addr = server.local_addr().unwrap();
    let limit = server.limit().clone();
    thread::spawn(move || server.run());
    (addr, limit)
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}

fn transform_via(addr: SocketAddr, role: Role, text: &str, key: &str) -> utils::Result<String> {
    let job = CipherJob::new(text.to_string(), key.to_string())?;
    let mut session = ClientSession::connect(&addr.to_string(), role)?;
    session.handshake()?;
    session.exchange(&job)
}

fn input_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn hello_world_survives_encrypt_then_decrypt() {
    let (enc, _) = start(Role::EncServer, 5);
    let (dec, _) = start(Role::DecServer, 5);
    let key = "XMCKLVBQPVH";

    let ciphertext = transform_via(enc, Role::EncClient, "HELLO WORLD", key).unwrap();
    assert_eq!(ciphertext, encrypt("HELLO WORLD", key).unwrap());
    assert_eq!(ciphertext.len(), 11);

    let plaintext = transform_via(dec, Role::DecClient, &ciphertext, key).unwrap();
    assert_eq!(plaintext, "HELLO WORLD");
}

#[test]
fn payload_larger_than_receive_buffer() {
    let (enc, _) = start(Role::EncServer, 5);
    let text = "THE RED GOOSE FLIES AT MIDNIGHT ".repeat(400);
    let key = "ZYXWVUTSRQPONMLKJIHGFEDCBA ".repeat(500);

    let ciphertext = transform_via(enc, Role::EncClient, &text, &key).unwrap();
    assert_eq!(ciphertext.len(), text.len());
    assert_eq!(decrypt(&ciphertext, &key).unwrap(), text);
}

#[test]
fn run_client_reads_files_and_prints_result() {
    let (enc, _) = start(Role::EncServer, 5);
    let text = input_file("HELLO WORLD\n");
    let key = input_file("XMCKLVBQPVHABC\n");
    let config = ClientConfig {
        text_path: text.path().to_path_buf(),
        key_path: key.path().to_path_buf(),
        host: "127.0.0.1".to_string(),
        port: enc.port(),
    };

    let ciphertext = run_client(&config, Role::EncClient).unwrap();
    assert_eq!(ciphertext, encrypt("HELLO WORLD", "XMCKLVBQPVH").unwrap());
}

#[test]
fn short_key_is_rejected_before_connecting() {
    // nothing listens on this port once the listener is dropped
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let text = input_file(&"A".repeat(20));
    let key = input_file(&"B".repeat(10));
    let config = ClientConfig {
        text_path: text.path().to_path_buf(),
        key_path: key.path().to_path_buf(),
        host: "127.0.0.1".to_string(),
        port,
    };

    let err = run_client(&config, Role::EncClient).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::KeyTooShort { key_len: 10, text_len: 20 })
    ));
}

#[test]
fn unreachable_service_is_connect_error() {
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let err = ClientSession::connect(&format!("127.0.0.1:{port}"), Role::DecClient).unwrap_err();
    assert!(matches!(err, Error::Connect { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn enc_client_is_turned_away_by_dec_server() {
    let (dec, limit) = start(Role::DecServer, 5);

    let err = transform_via(dec, Role::EncClient, "HELLO", "XMCKL").unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::WrongService { expected: "enc_server", ref received })
            if received == "dec_server"
    ));
    assert!(wait_for(|| limit.active() == 0));
}

#[test]
fn dec_server_sends_no_payload_to_foreign_client() {
    let (dec, _) = start(Role::DecServer, 5);

    let mut stream = TcpStream::connect(dec).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(b"enc_client@").unwrap();

    let mut received = Vec::new();
    stream.read_to_end(&mut received).unwrap();
    assert_eq!(received, b"dec_server@");
}

#[test]
fn connections_past_the_cap_are_closed_without_service() {
    let (enc, limit) = start(Role::EncServer, 2);
    let addr = enc.to_string();

    let mut first = ClientSession::connect(&addr, Role::EncClient).unwrap();
    first.handshake().unwrap();
    let mut second = ClientSession::connect(&addr, Role::EncClient).unwrap();
    second.handshake().unwrap();
    assert_eq!(limit.active(), 2);

    let mut third = ClientSession::connect(&addr, Role::EncClient).unwrap();
    let err = third.handshake().unwrap_err();
    assert!(matches!(err, Error::CapacityRejected), "got {err:?}");
    assert_eq!(err.exit_code(), 3);

    let job = CipherJob::new("HELLO".into(), "WORLD".into()).unwrap();
    let expected = encrypt("HELLO", "WORLD").unwrap();
    assert_eq!(first.exchange(&job).unwrap(), expected);
    assert_eq!(second.exchange(&job).unwrap(), expected);

    assert!(wait_for(|| limit.active() == 0));
    assert_eq!(transform_via(enc, Role::EncClient, "HELLO", "WORLD").unwrap(), expected);
}

#[test]
fn cap_many_clients_served_in_parallel() {
    let (enc, limit) = start(Role::EncServer, 5);

    let handles: Vec<_> = (0..5)
        .map(|i| {
            thread::spawn(move || {
                let text = format!("CLIENT {}", char::from(b'A' + i));
                let key = "QWERTYUIOPASDF".to_string();
                let ciphertext = transform_via(enc, Role::EncClient, &text, &key).unwrap();
                assert_eq!(decrypt(&ciphertext, &key).unwrap(), text);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert!(wait_for(|| limit.active() == 0));
}

#[test]
fn client_vanishing_mid_payload_releases_slot() {
    let (enc, limit) = start(Role::EncServer, 1);

    let mut stream = TcpStream::connect(enc).unwrap();
    stream.write_all(b"enc_client@HELLO@XM").unwrap();
    assert!(wait_for(|| limit.active() == 1));
    drop(stream);

    assert!(wait_for(|| limit.active() == 0));
    assert!(transform_via(enc, Role::EncClient, "A", "B").is_ok());
}

#[test]
fn stalled_client_times_out_when_deadline_set() {
    let (enc, limit) = start_with_timeout(Role::EncServer, 1, Some(Duration::from_millis(200)));

    let _idle = TcpStream::connect(enc).unwrap();
    assert!(wait_for(|| limit.active() == 1));
    assert!(wait_for(|| limit.active() == 0));
}
