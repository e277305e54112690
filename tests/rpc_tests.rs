use opcode_stats::rpc::client::normalize_tx_hash;
use opcode_stats::rpc::{ChainClient, RpcClient};
use opcode_stats::utils::error::RpcError;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Answer exactly one HTTP request with `body`, returning the request body
fn serve_once(body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }

        let mut request = vec![0u8; content_length];
        reader.read_exact(&mut request).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();

        String::from_utf8(request).unwrap()
    });

    (url, handle)
}

#[test]
fn test_normalize_tx_hash() {
    assert_eq!(normalize_tx_hash("abc123"), "0xabc123");
    assert_eq!(normalize_tx_hash("0xdef456"), "0xdef456");
}

#[test]
fn test_current_height() {
    let (url, server) = serve_once(r#"{"jsonrpc":"2.0","id":1,"result":"0x10d4f"}"#);
    let client = RpcClient::new(url).unwrap();

    assert_eq!(client.current_height().unwrap(), 68943);

    let request: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
    assert_eq!(request["method"], "eth_blockNumber");
    assert_eq!(request["jsonrpc"], "2.0");
}

#[test]
fn test_block_with_transactions() {
    let (url, server) = serve_once(
        r#"{"jsonrpc":"2.0","id":1,"result":{"number":"0x64","transactions":[
            {"hash":"0xaa","to":"0xA000000000000000000000000000000000000001"},
            {"hash":"0xbb","to":null}
        ]}}"#,
    );
    let client = RpcClient::new(url).unwrap();

    let block = client.block_with_transactions(100).unwrap();
    assert_eq!(block.number, 100);
    assert_eq!(block.transactions.len(), 2);
    assert!(block.transactions[1].to.is_none());

    let request: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
    assert_eq!(request["method"], "eth_getBlockByNumber");
    assert_eq!(request["params"], serde_json::json!(["0x64", true]));
}

#[test]
fn test_missing_block_is_an_error() {
    let (url, server) = serve_once(r#"{"jsonrpc":"2.0","id":1,"result":null}"#);
    let client = RpcClient::new(url).unwrap();

    assert!(matches!(
        client.block_with_transactions(7),
        Err(RpcError::BlockNotFound(7))
    ));
    server.join().unwrap();
}

#[test]
fn test_null_trace_is_none() {
    let (url, server) = serve_once(r#"{"jsonrpc":"2.0","id":1,"result":null}"#);
    let client = RpcClient::new(url).unwrap();

    assert!(client.transaction_trace("abcd").unwrap().is_none());

    let request: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
    assert_eq!(request["method"], "debug_traceTransaction");
    assert_eq!(request["params"][0], "0xabcd");
    assert_eq!(request["params"][1]["disableStorage"], true);
}

#[test]
fn test_trace_struct_logs() {
    let (url, server) = serve_once(
        r#"{"jsonrpc":"2.0","id":1,"result":{"gas":21000,"failed":false,"returnValue":"","structLogs":[
            {"pc":0,"op":"PUSH1","gas":100,"gasCost":3,"depth":1},
            {"pc":2,"op":"STOP","gas":97,"gasCost":0,"depth":1}
        ]}}"#,
    );
    let client = RpcClient::new(url).unwrap();

    let trace = client.transaction_trace("0xabcd").unwrap().unwrap();
    assert_eq!(trace.struct_logs.len(), 2);
    assert_eq!(trace.struct_logs[0].op, "PUSH1");
    server.join().unwrap();
}

#[test]
fn test_rpc_error_response() {
    let (url, server) = serve_once(
        r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"the method debug_traceTransaction does not exist/is not available"}}"#,
    );
    let client = RpcClient::new(url).unwrap();

    assert!(matches!(
        client.transaction_trace("0xabcd"),
        Err(RpcError::MethodNotSupported(_))
    ));
    server.join().unwrap();
}
