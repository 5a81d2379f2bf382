use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
};

use socksd::{
    method_handlers::TunnelConnect,
    protocol::{
        Addr, AuthMethod, ConnectReply, Greeting, MethodSelection, Reply, Request,
        SocksSocketAddr,
    },
    Server,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

async fn start_proxy() -> SocketAddr {
    let _ = tracing_subscriber::fmt::try_init();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = Server::new(listener, TunnelConnect);
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

async fn start_echo() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::spawn(async move {
                let (mut reader, mut writer) = stream.into_split();
                let _ = tokio::io::copy(&mut reader, &mut writer).await;
            });
        }
    });
    addr
}

async fn handshake(proxy: SocketAddr, destination: SocksSocketAddr) -> (TcpStream, ConnectReply) {
    let mut stream = TcpStream::connect(proxy).await.unwrap();

    Greeting::new(vec![AuthMethod::NoAuthRequired])
        .write_to(&mut stream)
        .await
        .unwrap();
    let selection = MethodSelection::read_from(&mut stream).await.unwrap();
    assert_eq!(selection, MethodSelection::NO_AUTH);

    Request::connect(destination)
        .write_to(&mut stream)
        .await
        .unwrap();
    let reply = ConnectReply::read_from(&mut stream).await.unwrap();
    (stream, reply)
}

/// Reads until the proxy closes the connection. Closing with unread client bytes makes the
/// kernel send a reset, which also counts as closed.
async fn read_until_closed(stream: &mut TcpStream) -> Vec<u8> {
    let mut received = Vec::new();
    let mut buf = [0; 64];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) => return received,
            Ok(n) => received.extend_from_slice(&buf[..n]),
            Err(err) if err.kind() == io::ErrorKind::ConnectionReset => return received,
            Err(err) => panic!("unexpected read error: {err}"),
        }
    }
}

fn loopback(port: u16) -> SocksSocketAddr {
    SocksSocketAddr::new(Addr::Ipv4(Ipv4Addr::LOCALHOST), port)
}

#[tokio::test]
async fn connect_relays_to_destination() {
    let proxy = start_proxy().await;
    let echo = start_echo().await;

    let (mut stream, reply) = handshake(proxy, loopback(echo.port())).await;
    assert_eq!(reply.reply, Reply::Success);
    assert_eq!(*reply.bound.ip(), Ipv4Addr::LOCALHOST);
    assert_ne!(reply.bound.port(), 0);

    stream.write_all(b"through the proxy").await.unwrap();
    stream.shutdown().await.unwrap();

    let mut echoed = Vec::new();
    stream.read_to_end(&mut echoed).await.unwrap();
    assert_eq!(echoed, b"through the proxy");
}

#[tokio::test]
async fn connect_by_domain_name() {
    let proxy = start_proxy().await;
    let echo = start_echo().await;

    let destination = SocksSocketAddr::new(Addr::Domain("localhost".to_owned()), echo.port());
    let (mut stream, reply) = handshake(proxy, destination).await;
    assert_eq!(reply.reply, Reply::Success);

    stream.write_all(b"by name").await.unwrap();
    let mut echoed = [0; 7];
    stream.read_exact(&mut echoed).await.unwrap();
    assert_eq!(&echoed, b"by name");
}

#[tokio::test]
async fn unreachable_destination_gets_failure_reply() {
    let proxy = start_proxy().await;

    let closed_port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream.write_all(&[0x05, 0x01, 0x00]).await.unwrap();
    let mut request = vec![0x05, 0x01, 0x00, 0x01, 127, 0, 0, 1];
    request.extend_from_slice(&closed_port.to_be_bytes());
    stream.write_all(&request).await.unwrap();

    let received = read_until_closed(&mut stream).await;
    assert_eq!(
        received,
        [0x05, 0x00, 0x05, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
}

#[tokio::test]
async fn malformed_greeting_is_closed_silently() {
    let proxy = start_proxy().await;

    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream.write_all(&[0x04, 0x01, 0x00]).await.unwrap();

    assert!(read_until_closed(&mut stream).await.is_empty());
}

#[tokio::test]
async fn server_survives_failed_sessions() {
    let proxy = start_proxy().await;
    let echo = start_echo().await;

    let mut broken = TcpStream::connect(proxy).await.unwrap();
    broken.write_all(&[0x05, 0x00]).await.unwrap();
    assert!(read_until_closed(&mut broken).await.is_empty());

    let (_stream, reply) = handshake(proxy, loopback(echo.port())).await;
    assert_eq!(reply.reply, Reply::Success);
}

#[tokio::test]
async fn concurrent_sessions_do_not_mix_streams() {
    let proxy = start_proxy().await;
    let echo = start_echo().await;

    let clients = (0..8u8).map(|id| {
        tokio::spawn(async move {
            let (mut stream, reply) = handshake(proxy, loopback(echo.port())).await;
            assert_eq!(reply.reply, Reply::Success);

            let payload = vec![id; 4096];
            stream.write_all(&payload).await.unwrap();
            stream.shutdown().await.unwrap();

            let mut echoed = Vec::new();
            stream.read_to_end(&mut echoed).await.unwrap();
            assert_eq!(echoed, payload);
        })
    });

    for client in clients.collect::<Vec<_>>() {
        client.await.unwrap();
    }
}

#[tokio::test]
async fn ipv6_request_is_closed_without_connect_reply() {
    let proxy = start_proxy().await;

    let mut stream = TcpStream::connect(proxy).await.unwrap();
    stream.write_all(&[0x05, 0x01, 0x00]).await.unwrap();
    let mut selection = [0; 2];
    stream.read_exact(&mut selection).await.unwrap();
    assert_eq!(selection, [0x05, 0x00]);

    let mut request = vec![0x05, 0x01, 0x00, 0x04];
    request.extend_from_slice(&Ipv6Addr::LOCALHOST.octets());
    request.extend_from_slice(&[0x00, 0x50]);
    stream.write_all(&request).await.unwrap();

    assert!(read_until_closed(&mut stream).await.is_empty());
}
