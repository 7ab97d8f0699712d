//! Two RPC endpoints over a loopback TCP socket — one answers, one asks.
//!
//! Run with:
//!   cargo run --example tcp-echo

use std::net::TcpListener;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use packrpc::logging::{init_logging, LogFormat, LogLevel};
use packrpc::message::{Message, RequestBuilder, RequestMessage, ResponseBuilder, Value};
use packrpc::transport::TcpConnection;
use packrpc::RpcClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::Text, LogLevel::Debug);

    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    eprintln!("Listening on {addr}");

    // Answering endpoint: echoes request arguments back as the result.
    let server = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept should succeed");
        let mut connection = TcpConnection::new(stream);
        let endpoint = Arc::new(RpcClient::new_instance());

        endpoint.add_request_callback({
            let endpoint = Arc::clone(&endpoint);
            Arc::new(move |request: &RequestMessage| {
                eprintln!("Serving {request}");
                let response = ResponseBuilder::from_result(Value::Array(
                    request.arguments().to_vec(),
                ))
                .with_id(request.id())
                .build();
                if let Err(e) = endpoint.send(&Message::Response(response)) {
                    eprintln!("Failed to answer: {e}");
                }
            })
        });
        endpoint
            .attach(&mut connection)
            .expect("attach should succeed");

        // Serve until the asking side hangs up.
        std::thread::sleep(Duration::from_secs(2));
        endpoint.stop();
    });

    // Asking endpoint.
    let mut connection = TcpConnection::connect(addr)?;
    let client = RpcClient::new_instance();
    client.attach(&mut connection)?;

    let (response_tx, response_rx) = mpsc::channel();
    client.send_request_with_callback(
        RequestBuilder::new("echo").add_argument("hello over tcp"),
        move |id, response| {
            let _ = response_tx.send((id, response));
        },
    )?;

    let (id, response) = response_rx.recv_timeout(Duration::from_secs(2))?;
    eprintln!("Answer for #{id}: {response}");

    client.stop();
    server.join().expect("server thread should finish");
    Ok(())
}
