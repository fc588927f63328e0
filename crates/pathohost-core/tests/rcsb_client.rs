use pathohost::remote::rcsb::{RcsbClient, RcsbEndpoints};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Serves canned responses on a loopback port. `route` maps the request line
/// (e.g. `GET /entry/6VXX HTTP/1.1`) to a status line and a body.
fn serve(route: fn(&str) -> (&'static str, String)) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            handle(stream, route);
        }
    });
    format!("http://{}", addr)
}

fn handle(stream: TcpStream, route: fn(&str) -> (&'static str, String)) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).unwrap();
        if header.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap();
            }
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).unwrap();

    let (status, body) = route(request_line.trim());
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = stream;
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
}

fn client_for(base: &str) -> RcsbClient {
    RcsbClient::with_endpoints(RcsbEndpoints {
        search_url: format!("{base}/query"),
        entry_url: format!("{base}/entry"),
        download_url: format!("{base}/download"),
    })
    .unwrap()
}

#[tokio::test]
async fn search_with_no_content_yields_empty_list() {
    let base = serve(|_| ("204 No Content", String::new()));
    let hits = client_for(&base)
        .search_by_organism("Nonexistent organism", 10)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn search_resolves_titles_with_fallbacks() {
    let base = serve(|request| {
        if request.starts_with("POST /query") {
            (
                "200 OK",
                r#"{"result_set":[{"identifier":"6VXX"},{"identifier":"6M0J"},{"identifier":"7ABC"}]}"#
                    .to_string(),
            )
        } else if request.starts_with("GET /entry/6VXX") {
            (
                "200 OK",
                r#"{"struct":{"title":"SARS-CoV-2 spike glycoprotein"}}"#.to_string(),
            )
        } else if request.starts_with("GET /entry/6M0J") {
            ("200 OK", r#"{"rcsb_id":"6M0J"}"#.to_string())
        } else {
            ("500 Internal Server Error", String::new())
        }
    });

    let hits = client_for(&base)
        .search_by_organism("Severe acute respiratory syndrome coronavirus 2", 10)
        .await
        .unwrap();
    let pairs: Vec<_> = hits
        .iter()
        .map(|h| (h.pdb_id.as_str(), h.title.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("6VXX", "SARS-CoV-2 spike glycoprotein"),
            ("6M0J", "No description"),
            ("7ABC", "Unknown title"),
        ]
    );
}

#[tokio::test]
async fn fetch_of_unknown_entry_yields_none() {
    let base = serve(|_| ("404 Not Found", "not found".to_string()));
    let document = client_for(&base).fetch_structure("9zzz").await.unwrap();
    assert!(document.is_none());
}

#[tokio::test]
async fn fetch_upper_cases_identifier_and_returns_text() {
    let base = serve(|request| {
        if request.starts_with("GET /download/6VXX.pdb") {
            ("200 OK", "HEADER    VIRAL PROTEIN\nEND\n".to_string())
        } else {
            ("404 Not Found", String::new())
        }
    });
    let document = client_for(&base)
        .fetch_structure("6vxx")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(document.name, "6VXX");
    assert!(document.text.starts_with("HEADER"));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    assert!(client_for(&base).fetch_structure("6VXX").await.is_err());
}
