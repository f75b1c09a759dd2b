//! Mock Prometeo API server for testing
//!
//! Simulates the subset of the Prometeo banking API the client uses,
//! so the HTTP adapter can be exercised without a real API key:
//! - POST /login/ returns { status, key }
//! - GET /logout/, /info/, /account/, /credit-card/, /provider/
//! - GET /account/{n}/movement/ and /credit-card/{n}/movements return { movements: [...] }
//!
//! Every request line is recorded so tests can assert on query strings.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::json;

/// Session key handed out by the mock login
pub const MOCK_SESSION_KEY: &str = "mock_session_key";

/// Mock Prometeo server for testing
pub struct MockPrometeoServer {
    port: u16,
    running: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<String>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Behaviour switches for the mock
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Respond to login with 200 but no session key
    pub login_without_key: bool,
    /// Status returned by every data endpoint instead of a payload
    pub fail_status: Option<u16>,
    /// Account or card number whose movements fail with HTTP 500
    pub failing_number: Option<String>,
    /// Return a non-JSON body from /account/
    pub malformed_accounts: bool,
}

impl MockPrometeoServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let requests = Arc::new(Mutex::new(Vec::new()));

        // Non-blocking accept so stop() can end the loop
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let requests_clone = requests.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let log = requests_clone.clone();
                        thread::spawn(move || handle_connection(stream, &cfg, &log));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            requests,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Request lines ("GET /path?query") received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockPrometeoServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read headers plus a Content-Length body
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buffer = [0; 4096];
    loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    Some(String::from_utf8_lossy(&data).into_owned())
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, log: &Mutex<Vec<String>>) {
    let _ = stream.set_nonblocking(false);
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid request"}"#);
        return;
    }
    let method = parts[0];
    let target = parts[1];
    if let Ok(mut entries) = log.lock() {
        entries.push(format!("{} {}", method, target));
    }

    let request_lower = request.to_lowercase();
    let has_api_key = request_lower.contains("x-api-key: test_")
        || request_lower.contains("x-api-key: valid_");
    if !has_api_key {
        send_response(&mut stream, 401, "Unauthorized", r#"{"status": "error", "message": "Key not provided"}"#);
        return;
    }

    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    if method == "POST" && path == "/login/" {
        let body = request.split("\r\n\r\n").nth(1).unwrap_or("");
        if config.login_without_key {
            send_response(&mut stream, 200, "OK", r#"{"status": "wrong_credentials"}"#);
        } else if body.contains("username=12345") && body.contains("password=gfdsa") {
            let json = json!({ "status": "logged_in", "key": MOCK_SESSION_KEY }).to_string();
            send_response(&mut stream, 200, "OK", &json);
        } else {
            send_response(&mut stream, 403, "Forbidden", r#"{"status": "wrong_credentials"}"#);
        }
        return;
    }

    if method != "GET" {
        send_response(&mut stream, 405, "Method Not Allowed", r#"{"error": "Method not allowed"}"#);
        return;
    }

    if path == "/provider/" {
        let json = json!({ "status": "success", "providers": [
            { "code": "test", "name": "Test Bank", "country": "UY" },
            { "code": "bbva_mx", "name": "BBVA", "country": "MX" }
        ]})
        .to_string();
        send_response(&mut stream, 200, "OK", &json);
        return;
    }

    if !query.contains(&format!("key={}", MOCK_SESSION_KEY)) {
        send_response(&mut stream, 401, "Unauthorized", r#"{"status": "error", "message": "Invalid key"}"#);
        return;
    }

    if let Some(status) = config.fail_status {
        send_response(&mut stream, status, "Error", r#"{"status": "error"}"#);
        return;
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let body = match segments.as_slice() {
        ["logout"] => json!({ "status": "logged_out" }),
        ["info"] => json!({ "status": "success", "info": {
            "name": "Test User", "document": "12345678", "email": "test@example.com"
        }}),
        ["account"] if config.malformed_accounts => {
            send_response(&mut stream, 200, "OK", "<html>maintenance</html>");
            return;
        }
        ["account"] => json!({ "status": "success", "accounts": [
            { "id": "a1", "name": "Cuenta Corriente", "number": "001-1", "branch": "Centro", "currency": "UYU", "balance": 1500.5 },
            { "id": "a2", "name": "Caja de Ahorro", "number": 2002, "currency": "USD", "balance": "320.00" }
        ]}),
        ["credit-card"] => json!({ "status": "success", "credit_cards": [
            { "id": "c1", "name": "Visa Oro", "number": "4111", "balance_local": 80, "balance_dollar": "" }
        ]}),
        ["account", number, "movement"] | ["credit-card", number, "movements"] => {
            let number = decode_segment(number);
            if config.failing_number.as_deref() == Some(number.as_str()) {
                send_response(&mut stream, 500, "Internal Server Error", r#"{"status": "error"}"#);
                return;
            }
            json!({ "status": "success", "movements": mock_movements(&number) })
        }
        _ => {
            send_response(&mut stream, 404, "Not Found", r#"{"error": "Endpoint not found"}"#);
            return;
        }
    };

    send_response(&mut stream, 200, "OK", &body.to_string());
}

fn mock_movements(number: &str) -> serde_json::Value {
    match number {
        "001-1" => json!([
            { "id": 1, "reference": "r1", "date": "02/05/2024", "detail": "Supermercado", "debit": 100, "credit": "" },
            { "id": 2, "reference": "r2", "date": "03/05/2024", "detail": "Transferencia", "debit": "", "credit": 50 },
            { "id": 3, "reference": "r3", "date": "04/05/2024", "detail": "Farmacia", "debit": "25.50", "credit": null }
        ]),
        "2002" => json!([
            { "id": 4, "date": "05/05/2024", "detail": "Sueldo", "debit": null, "credit": 1200 }
        ]),
        "001/1" => json!([
            { "id": 7, "date": "08/05/2024", "detail": "Cuota", "debit": 75 }
        ]),
        "4111" => json!([
            { "id": 5, "date": "06/05/2024", "detail": "Restaurante", "debit": 40 },
            { "id": 6, "date": "07/05/2024", "detail": "Devolucion", "credit": 10 }
        ]),
        _ => json!([]),
    }
}

/// Decode `%XX` escapes in a path segment
fn decode_segment(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(byte) = segment
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::prometeo::PrometeoClient;
    use crate::domain::result::ProviderError;
    use crate::domain::{Credentials, DateWindow, SessionToken};
    use crate::ports::{BankingApi, MovementSource};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        )
        .unwrap()
    }

    fn session() -> SessionToken {
        SessionToken::new(MOCK_SESSION_KEY).unwrap()
    }

    fn client(server: &MockPrometeoServer) -> PrometeoClient {
        PrometeoClient::new_with_base_url("test_key", &server.base_url()).unwrap()
    }

    #[test]
    fn test_login_returns_session_key() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let token = client(&server).login(&Credentials::sandbox()).unwrap();
        assert_eq!(token.as_str(), MOCK_SESSION_KEY);
        assert_eq!(server.requests(), vec!["POST /login/".to_string()]);
    }

    #[test]
    fn test_login_wrong_credentials() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let result = client(&server).login(&Credentials::new("test", "12345", "nope"));
        assert!(matches!(result, Err(ProviderError::Auth(_))));
    }

    #[test]
    fn test_login_without_key_is_auth_failure() {
        let server = MockPrometeoServer::start(MockConfig {
            login_without_key: true,
            ..Default::default()
        })
        .unwrap();
        let result = client(&server).login(&Credentials::sandbox());
        let err = result.unwrap_err();
        assert!(matches!(err, ProviderError::Auth(_)));
        assert!(err.to_string().contains("wrong_credentials"));
    }

    #[test]
    fn test_wrong_api_key() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let client = PrometeoClient::new_with_base_url("other_key", &server.base_url()).unwrap();
        assert!(matches!(client.get_providers(), Err(ProviderError::Auth(_))));
    }

    #[test]
    fn test_accounts_and_cards() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let client = client(&server);

        let accounts = client.get_accounts(&session()).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].number.as_deref(), Some("001-1"));
        assert_eq!(accounts[1].number.as_deref(), Some("2002"));
        assert_eq!(accounts[1].balance, Some(Decimal::new(32000, 2)));

        let cards = client.get_credit_cards(&session()).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].currency_or_default(), "USD");
    }

    #[test]
    fn test_info_and_providers() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let client = client(&server);

        let info = client.get_info(&session()).unwrap();
        assert_eq!(info["name"], "Test User");

        let providers = client.get_providers().unwrap();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].code.as_deref(), Some("test"));
    }

    #[test]
    fn test_invalid_session_key() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let stale = SessionToken::new("expired").unwrap();
        assert!(matches!(client(&server).get_accounts(&stale), Err(ProviderError::Auth(_))));
    }

    #[test]
    fn test_account_movements_query() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let movements = client(&server)
            .get_account_movements(&session(), "001-1", "UYU", &window())
            .unwrap();

        assert_eq!(movements.len(), 3);
        assert_eq!(movements[2].debit, Some(Decimal::new(2550, 2)));

        let requests = server.requests();
        let line = &requests[0];
        assert!(line.starts_with("GET /account/001-1/movement/?"));
        assert!(line.contains("accountNumber=001-1"));
        assert!(line.contains("currency=UYU"));
        assert!(line.contains("date_start=01%2F05%2F2024"));
        assert!(line.contains("date_end=15%2F06%2F2024"));
        assert!(line.contains("key=mock_session_key"));
    }

    #[test]
    fn test_credit_card_movements_query() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let movements = client(&server)
            .get_movements(&session(), MovementSource::CreditCard, "4111", "USD", &window())
            .unwrap();

        assert_eq!(movements.len(), 2);
        let line = &server.requests()[0];
        assert!(line.starts_with("GET /credit-card/4111/movements?"));
        assert!(line.contains("card_number=4111"));
    }

    #[test]
    fn test_numbers_with_reserved_characters_stay_in_one_segment() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        let client = client(&server);

        let movements = client
            .get_account_movements(&session(), "001/1", "UYU", &window())
            .unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].debit, Some(Decimal::new(75, 0)));

        let movements = client
            .get_movements(&session(), MovementSource::CreditCard, "12#3", "USD", &window())
            .unwrap();
        assert!(movements.is_empty());

        let requests = server.requests();
        assert!(requests[0].starts_with("GET /account/001%2F1/movement/?"));
        assert!(requests[0].contains("accountNumber=001%2F1"));
        assert!(requests[1].starts_with("GET /credit-card/12%233/movements?"));
    }

    #[test]
    fn test_server_error_status() {
        let server = MockPrometeoServer::start(MockConfig {
            fail_status: Some(500),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client(&server).get_accounts(&session()).unwrap_err(),
            ProviderError::Status(500)
        );
    }

    #[test]
    fn test_malformed_body() {
        let server = MockPrometeoServer::start(MockConfig {
            malformed_accounts: true,
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            client(&server).get_accounts(&session()),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn test_logout() {
        let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
        assert!(client(&server).logout(&session()).is_ok());
        assert!(server.requests()[0].starts_with("GET /logout/?key=mock_session_key"));
    }

    #[test]
    fn test_unreachable_server_is_network_error() {
        let base_url = {
            let server = MockPrometeoServer::start(MockConfig::default()).unwrap();
            server.base_url()
        };
        let client = PrometeoClient::new_with_base_url("test_key", &base_url).unwrap();
        assert!(matches!(client.get_providers(), Err(ProviderError::Network(_))));
    }
}
