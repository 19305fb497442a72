//! Integration tests for the SOCKS5 connector against a scripted fake
//! proxy over real TCP connections.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use socks_tunnel::{Credentials, SocksConfig, SocksConnector, SocksError, TargetEndpoint};

/// Start a scripted proxy on an ephemeral port. The script runs in a
/// background thread and panics on any deviation from the expected bytes;
/// join the handle to surface those panics in the test.
fn spawn_fake_proxy<F>(script: F) -> (SocketAddr, JoinHandle<()>)
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        script(stream);
    });
    (addr, handle)
}

fn read_exact(stream: &mut TcpStream, len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).unwrap();
    buf
}

fn expect_connect_request(stream: &mut TcpStream, host: &str, port: u16) {
    let request = read_exact(stream, 7 + host.len());
    let mut expected = vec![0x05, 0x01, 0x00, 0x03, host.len() as u8];
    expected.extend_from_slice(host.as_bytes());
    expected.extend_from_slice(&port.to_be_bytes());
    assert_eq!(request, expected);
}

fn config_for(addr: SocketAddr) -> SocksConfig {
    SocksConfig::new(
        addr,
        Duration::from_secs(5),
        Duration::from_secs(5),
        Duration::from_secs(60),
    )
}

#[test]
fn test_tunnel_no_auth_success() {
    let (addr, proxy) = spawn_fake_proxy(|mut stream| {
        assert_eq!(read_exact(&mut stream, 3), [0x05, 0x01, 0x00]);
        stream.write_all(&[0x05, 0x00]).unwrap();
        expect_connect_request(&mut stream, "example.com", 443);
        stream.write_all(&[0x05, 0x00, 0x00, 0x01]).unwrap();
        stream.write_all(&[0u8; 6]).unwrap();
        // The tunnel is up; talk through it like the target would
        stream.write_all(b"hello").unwrap();
    });

    let connector = SocksConnector::new(config_for(addr)).unwrap();
    let endpoint = TargetEndpoint::new("example.com", 443).unwrap();
    let mut stream = connector.connect(&endpoint, Duration::from_secs(10)).unwrap();

    // Steady-state timeout: the fresh socket had no read timeout, so the
    // final value is just the configured extra
    assert_eq!(stream.read_timeout().unwrap(), Some(Duration::from_secs(60)));

    let mut buf = [0u8; 5];
    stream.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"hello");

    proxy.join().unwrap();
}

#[test]
fn test_tunnel_with_auth_success() {
    let (addr, proxy) = spawn_fake_proxy(|mut stream| {
        assert_eq!(read_exact(&mut stream, 3), [0x05, 0x01, 0x02]);
        stream.write_all(&[0x05, 0x02]).unwrap();
        assert_eq!(read_exact(&mut stream, 2), [0x01, 0x04]);
        assert_eq!(read_exact(&mut stream, 4), *b"user");
        assert_eq!(read_exact(&mut stream, 1), [0x04]);
        assert_eq!(read_exact(&mut stream, 4), *b"pass");
        stream.write_all(&[0x01, 0x00]).unwrap();
        expect_connect_request(&mut stream, "example.com", 80);
        stream.write_all(&[0x05, 0x00, 0x00, 0x01]).unwrap();
        stream.write_all(&[0u8; 6]).unwrap();
    });

    let config = config_for(addr).with_credentials(Credentials::new("user", "pass").unwrap());
    let connector = SocksConnector::new(config).unwrap();
    let stream = connector.connect_host("example.com", 80, Duration::from_secs(10));
    assert!(stream.is_ok());

    proxy.join().unwrap();
}

#[test]
fn test_tunnel_ipv6_bound_address() {
    let (addr, proxy) = spawn_fake_proxy(|mut stream| {
        assert_eq!(read_exact(&mut stream, 3), [0x05, 0x01, 0x00]);
        stream.write_all(&[0x05, 0x00]).unwrap();
        expect_connect_request(&mut stream, "example.com", 443);
        stream.write_all(&[0x05, 0x00, 0x00, 0x04]).unwrap();
        stream.write_all(&[0u8; 18]).unwrap();
    });

    let connector = SocksConnector::new(config_for(addr)).unwrap();
    let endpoint = TargetEndpoint::new("example.com", 443).unwrap();
    assert!(connector.connect(&endpoint, Duration::from_secs(10)).is_ok());

    proxy.join().unwrap();
}

#[test]
fn test_connect_refused_by_proxy() {
    let (addr, proxy) = spawn_fake_proxy(|mut stream| {
        assert_eq!(read_exact(&mut stream, 3), [0x05, 0x01, 0x00]);
        stream.write_all(&[0x05, 0x00]).unwrap();
        expect_connect_request(&mut stream, "example.com", 443);
        stream.write_all(&[0x05, 0x01, 0x00, 0x01]).unwrap();
        stream.write_all(&[0u8; 6]).unwrap();
    });

    let connector = SocksConnector::new(config_for(addr)).unwrap();
    let endpoint = TargetEndpoint::new("example.com", 443).unwrap();
    let err = connector
        .connect(&endpoint, Duration::from_secs(10))
        .unwrap_err();
    match err {
        SocksError::ConnectFailed { code, reason } => {
            assert_eq!(code, 1);
            assert_eq!(reason, "General SOCKS server failure");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    proxy.join().unwrap();
}

#[test]
fn test_proxy_demands_authentication() {
    let (addr, proxy) = spawn_fake_proxy(|mut stream| {
        assert_eq!(read_exact(&mut stream, 3), [0x05, 0x01, 0x00]);
        stream.write_all(&[0x05, 0xFF]).unwrap();
    });

    let connector = SocksConnector::new(config_for(addr)).unwrap();
    let endpoint = TargetEndpoint::new("example.com", 443).unwrap();
    let err = connector
        .connect(&endpoint, Duration::from_secs(10))
        .unwrap_err();
    assert!(matches!(err, SocksError::AuthRequired));

    proxy.join().unwrap();
}

#[test]
fn test_proxy_closes_mid_response() {
    let (addr, proxy) = spawn_fake_proxy(|mut stream| {
        assert_eq!(read_exact(&mut stream, 3), [0x05, 0x01, 0x00]);
        // Send half of the method response, then drop the connection
        stream.write_all(&[0x05]).unwrap();
    });

    let connector = SocksConnector::new(config_for(addr)).unwrap();
    let endpoint = TargetEndpoint::new("example.com", 443).unwrap();
    let err = connector
        .connect(&endpoint, Duration::from_secs(10))
        .unwrap_err();
    assert!(matches!(err, SocksError::TruncatedStream));

    proxy.join().unwrap();
}

#[test]
fn test_zero_extra_socket_timeout_leaves_no_timeout() {
    let (addr, proxy) = spawn_fake_proxy(|mut stream| {
        assert_eq!(read_exact(&mut stream, 3), [0x05, 0x01, 0x00]);
        stream.write_all(&[0x05, 0x00]).unwrap();
        expect_connect_request(&mut stream, "example.com", 443);
        stream.write_all(&[0x05, 0x00, 0x00, 0x01]).unwrap();
        stream.write_all(&[0u8; 6]).unwrap();
    });

    let config = SocksConfig::new(
        addr,
        Duration::from_secs(5),
        Duration::ZERO,
        Duration::ZERO,
    );
    let connector = SocksConnector::new(config).unwrap();
    let endpoint = TargetEndpoint::new("example.com", 443).unwrap();
    let stream = connector.connect(&endpoint, Duration::from_secs(10)).unwrap();
    assert_eq!(stream.read_timeout().unwrap(), None);

    proxy.join().unwrap();
}
