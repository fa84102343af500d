//! Integration tests for the Bittrex client
//!
//! A scripted transport stands in for HTTP so retry counts, signed URLs and
//! envelope handling can be checked without a network.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use bittrex_client::bittrex::auth::sign_request;
use bittrex_client::bittrex::{
    parse_query, BittrexClient, ClientConfig, Credentials, OrderBookType, Params, Transport,
    TransportResponse,
};
use bittrex_client::common::RetryPolicy;
use bittrex_client::{Error, TransportError};
use serde_json::json;

// =============================================================================
// Test Utilities
// =============================================================================

type Reply = Result<TransportResponse, TransportError>;

/// One recorded GET
#[derive(Debug, Clone)]
struct Sent {
    url: String,
    headers: BTreeMap<String, String>,
}

/// Transport that replays scripted replies and records every request.
/// Once the script is exhausted it keeps answering with `fallback`.
struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    sent: Mutex<Vec<Sent>>,
}

impl ScriptedTransport {
    fn new(fallback: Reply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn answering(body: &str) -> Self {
        Self::new(Ok(TransportResponse::ok(body)))
    }

    /// Fail `count` times with a connection error before the fallback
    fn failing_first(count: usize, body: &str) -> Self {
        let transport = Self::answering(body);
        {
            let mut script = transport.script.lock().unwrap();
            for _ in 0..count {
                script.push_back(Err(TransportError::Connect("connection refused".into())));
            }
        }
        transport
    }

    fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn last(&self) -> Sent {
        self.sent.lock().unwrap().last().cloned().expect("no request sent")
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str, headers: &BTreeMap<String, String>) -> Reply {
        self.sent.lock().unwrap().push(Sent {
            url: url.to_string(),
            headers: headers.clone(),
        });
        match self.script.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => self.fallback.clone(),
        }
    }
}

const API_KEY: &str = "test-key";
const API_SECRET: &str = "test-secret";

fn config() -> ClientConfig {
    ClientConfig::default()
        .with_retry_policy(RetryPolicy::default().with_base_delay(Duration::ZERO))
}

fn signed_client(transport: &ScriptedTransport) -> BittrexClient<&ScriptedTransport> {
    let credentials = Credentials::new(API_KEY, API_SECRET).unwrap();
    BittrexClient::with_transport(Some(credentials), config(), transport)
}

fn public_client(transport: &ScriptedTransport) -> BittrexClient<&ScriptedTransport> {
    BittrexClient::with_transport(None, config(), transport)
}

fn query_value(url: &str, name: &str) -> Option<String> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
    parse_query(query)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v)
}

const ORDERS_OK: &str = r#"{"success":true,"message":"","result":[{"OrderUuid":"abc"}]}"#;

const EMPTY_LIST: &str = r#"{"success":true,"message":"","result":[]}"#;

const BALANCE_OK: &str = r#"{"success":true,"message":"","result":{"Currency":"BTC","Balance":1.5,"Available":1.0,"Pending":0.5}}"#;

// =============================================================================
// Retry
// =============================================================================

#[test]
fn test_recovers_after_transient_failures() {
    for failures in [0usize, 1, 3, 9] {
        let transport = ScriptedTransport::failing_first(failures, BALANCE_OK);
        let result = signed_client(&transport).balance("BTC").unwrap();

        assert_eq!(result["Currency"], "BTC");
        assert_eq!(transport.attempts(), failures + 1);
    }
}

#[test]
fn test_gives_up_after_ten_attempts() {
    let transport = ScriptedTransport::failing_first(25, BALANCE_OK);
    let err = signed_client(&transport).balance("BTC").unwrap_err();

    match err {
        Error::Transport { attempts, source } => {
            assert_eq!(attempts, 10);
            assert!(matches!(source, TransportError::Connect(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(transport.attempts(), 10);
}

#[test]
fn test_timeouts_are_retried() {
    let transport = ScriptedTransport::answering(BALANCE_OK);
    transport
        .script
        .lock()
        .unwrap()
        .push_back(Err(TransportError::Timeout("timed out".into())));

    assert!(signed_client(&transport).balance("BTC").is_ok());
    assert_eq!(transport.attempts(), 2);
}

#[test]
fn test_http_errors_are_not_retried() {
    let transport = ScriptedTransport::new(Err(TransportError::Http("bad header".into())));
    let err = signed_client(&transport).balances().unwrap_err();

    assert!(matches!(err, Error::Transport { attempts: 1, .. }));
    assert_eq!(transport.attempts(), 1);
}

#[test]
fn test_custom_attempt_cap() {
    let transport = ScriptedTransport::failing_first(5, BALANCE_OK);
    let config = ClientConfig::default().with_retry_policy(
        RetryPolicy::default()
            .with_base_delay(Duration::ZERO)
            .with_max_attempts(3),
    );
    let client = BittrexClient::with_transport(None, config, &transport);

    assert!(matches!(
        client.markets(),
        Err(Error::Transport { attempts: 3, .. })
    ));
    assert_eq!(client.retry_policy().attempts(), 3);
    assert_eq!(client.transport().attempts(), 3);
}

// =============================================================================
// Envelope handling
// =============================================================================

#[test]
fn test_rejection_is_not_retried() {
    let transport = ScriptedTransport::answering(
        r#"{"success":false,"message":"INSUFFICIENT_FUNDS","result":null}"#,
    );
    let err = signed_client(&transport)
        .buy_limit("BTC-LTC", 5.0, 0.0035)
        .unwrap_err();

    match err {
        Error::ApiRejected { message } => assert_eq!(message, "INSUFFICIENT_FUNDS"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(transport.attempts(), 1);
}

#[test]
fn test_balance_result_returned_verbatim() {
    let transport = ScriptedTransport::answering(BALANCE_OK);
    let result = signed_client(&transport).balance("BTC").unwrap();

    assert_eq!(
        result,
        json!({"Currency": "BTC", "Balance": 1.5, "Available": 1.0, "Pending": 0.5})
    );
}

#[test]
fn test_missing_result_is_connection_timeout() {
    let transport = ScriptedTransport::answering(r#"{"success":true,"message":""}"#);
    assert!(matches!(
        public_client(&transport).markets(),
        Err(Error::ConnectionTimeout)
    ));
    assert_eq!(transport.attempts(), 1);
}

#[test]
fn test_empty_list_is_connection_timeout() {
    let transport = ScriptedTransport::answering(EMPTY_LIST);
    assert!(matches!(
        signed_client(&transport).open_orders(None),
        Err(Error::ConnectionTimeout)
    ));
    assert_eq!(transport.attempts(), 1);
}

#[test]
fn test_falsy_results_are_connection_timeout() {
    for result in ["null", "false", "0", "\"\"", "[]", "{}"] {
        let body = format!(r#"{{"success":true,"message":"","result":{}}}"#, result);
        let transport = ScriptedTransport::answering(&body);
        assert!(
            matches!(public_client(&transport).markets(), Err(Error::ConnectionTimeout)),
            "result {} was accepted",
            result
        );
    }
}

#[test]
fn test_html_error_page() {
    let transport = ScriptedTransport::new(Ok(TransportResponse::new(
        503,
        "<html>Service Unavailable</html>",
    )));
    assert!(matches!(
        public_client(&transport).currencies(),
        Err(Error::InvalidResponse { status: 503, .. })
    ));
}

// =============================================================================
// Signing
// =============================================================================

#[test]
fn test_signed_request_carries_auth() {
    let transport = ScriptedTransport::answering(BALANCE_OK);
    signed_client(&transport).balance("BTC").unwrap();

    let sent = transport.last();
    assert!(sent
        .url
        .starts_with("https://bittrex.com/api/v1.1/account/getbalance?"));
    assert_eq!(query_value(&sent.url, "apikey").as_deref(), Some(API_KEY));
    assert_eq!(query_value(&sent.url, "currency").as_deref(), Some("BTC"));

    let nonce: i64 = query_value(&sent.url, "nonce").unwrap().parse().unwrap();
    let now = chrono::Utc::now().timestamp();
    assert!((now - nonce).abs() <= 5);

    assert_eq!(
        sent.headers.get("apisign"),
        Some(&sign_request(&sent.url, API_SECRET))
    );
}

#[test]
fn test_same_signature_on_every_attempt() {
    let transport = ScriptedTransport::failing_first(2, BALANCE_OK);
    signed_client(&transport).balances().unwrap();

    let sent = transport.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|s| s.url == sent[0].url));
    assert!(sent
        .iter()
        .all(|s| s.headers.get("apisign") == sent[0].headers.get("apisign")));
}

#[test]
fn test_public_request_is_unsigned() {
    let transport = ScriptedTransport::answering(r#"{"success":true,"result":{"Last":0.01}}"#);
    let ticker = signed_client(&transport).ticker("BTC-LTC").unwrap();
    assert_eq!(ticker["Last"], 0.01);

    let sent = transport.last();
    assert_eq!(
        sent.url,
        "https://bittrex.com/api/v1.1/public/getticker?market=BTC-LTC"
    );
    assert!(sent.headers.is_empty());
}

#[test]
fn test_signed_call_without_credentials_sends_nothing() {
    let transport = ScriptedTransport::answering(BALANCE_OK);
    let err = public_client(&transport).balances().unwrap_err();

    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(transport.attempts(), 0);
}

#[test]
fn test_request_with_custom_params_and_headers() {
    let transport = ScriptedTransport::answering(ORDERS_OK);
    let mut headers = BTreeMap::new();
    headers.insert("X-Trace".to_string(), "abc".to_string());

    signed_client(&transport)
        .request(
            "account/getorderhistory",
            Params::new().with("market", "BTC-ETH"),
            Some(&headers),
            true,
        )
        .unwrap();

    let sent = transport.last();
    assert_eq!(sent.headers.get("X-Trace").map(String::as_str), Some("abc"));
    assert!(sent.headers.contains_key("apisign"));
    assert_eq!(query_value(&sent.url, "market").as_deref(), Some("BTC-ETH"));
}

// =============================================================================
// Endpoint wrappers
// =============================================================================

/// Check the last request's resource path and whether it was signed
fn assert_sent(transport: &ScriptedTransport, path: &str, signed: bool) {
    let sent = transport.last();
    let (base, _) = sent.url.split_once('?').unwrap();
    assert_eq!(base, format!("https://bittrex.com/api/v1.1/{}", path));
    assert_eq!(sent.headers.contains_key("apisign"), signed, "{}", path);
    assert_eq!(query_value(&sent.url, "apikey").is_some(), signed, "{}", path);
}

#[test]
fn test_endpoint_paths() {
    let transport = ScriptedTransport::answering(r#"{"success":true,"result":{"uuid":"abc"}}"#);
    let client = signed_client(&transport);

    client.markets().unwrap();
    assert_sent(&transport, "public/getmarkets", false);
    client.currencies().unwrap();
    assert_sent(&transport, "public/getcurrencies", false);
    client.market_summaries().unwrap();
    assert_sent(&transport, "public/getmarketsummaries", false);
    client.market_summary("BTC-LTC").unwrap();
    assert_sent(&transport, "public/getmarketsummary", false);
    client.market_history("BTC-LTC").unwrap();
    assert_sent(&transport, "public/getmarkethistory", false);
    client.order_book("BTC-LTC", OrderBookType::Sell).unwrap();
    assert_sent(&transport, "public/getorderbook", false);

    client.buy_limit("BTC-LTC", 1.0, 0.5).unwrap();
    assert_sent(&transport, "market/buylimit", true);
    client.sell_limit("BTC-LTC", 1.0, 0.5).unwrap();
    assert_sent(&transport, "market/selllimit", true);
    client.cancel("some-uuid").unwrap();
    assert_sent(&transport, "market/cancel", true);
    client.open_orders(Some("BTC-LTC")).unwrap();
    assert_sent(&transport, "market/getopenorders", true);

    client.balances().unwrap();
    assert_sent(&transport, "account/getbalances", true);
    client.deposit_address("BTC").unwrap();
    assert_sent(&transport, "account/getdepositaddress", true);
    client.withdraw("BTC", 0.5, "1Addr", None).unwrap();
    assert_sent(&transport, "account/withdraw", true);
    client.order("some-uuid").unwrap();
    assert_sent(&transport, "account/getorder", true);
    client.order_history(None).unwrap();
    assert_sent(&transport, "account/getorderhistory", true);
    client.deposit_history(None).unwrap();
    assert_sent(&transport, "account/getdeposithistory", true);
    client.withdrawal_history(Some("BTC")).unwrap();
    assert_sent(&transport, "account/getwithdrawalhistory", true);
}

#[test]
fn test_order_book_type_param() {
    let transport = ScriptedTransport::answering(r#"{"success":true,"result":{"buy":[],"sell":[]}}"#);
    public_client(&transport)
        .order_book("BTC-LTC", OrderBookType::Both)
        .unwrap();
    assert_eq!(query_value(&transport.last().url, "type").as_deref(), Some("both"));
}

#[test]
fn test_withdraw_params() {
    let transport = ScriptedTransport::answering(r#"{"success":true,"result":{"uuid":"abc"}}"#);
    let client = signed_client(&transport);

    client.withdraw("XRP", 25.0, "rAddr", Some("12345")).unwrap();
    let url = transport.last().url;
    assert_eq!(query_value(&url, "paymentid").as_deref(), Some("12345"));
    assert_eq!(query_value(&url, "quantity").as_deref(), Some("25"));

    client.withdraw("BTC", 0.5, "1Addr", None).unwrap();
    assert_eq!(query_value(&transport.last().url, "paymentid"), None);
}

#[test]
fn test_optional_market_omitted() {
    let transport = ScriptedTransport::answering(ORDERS_OK);
    signed_client(&transport).open_orders(None).unwrap();
    assert_eq!(query_value(&transport.last().url, "market"), None);
}
