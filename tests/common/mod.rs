#![allow(dead_code)]

use async_trait::async_trait;
use checkout_flow::domain::capture::{Capture, CaptureResult, CapturedPurchaseUnit, Payments};
use checkout_flow::domain::money::Money;
use checkout_flow::domain::order::{CreateOrder, LinkDescription, OrderResult};
use checkout_flow::domain::ports::{ApprovalSignal, PaymentProvider};
use checkout_flow::error::{ProviderError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub const APPROVE_URL: &str = "https://www.sandbox.paypal.com/checkoutnow?token=O-1";

pub fn created_order(id: Option<&str>, approve_link: bool) -> OrderResult {
    let mut links = vec![LinkDescription::new(
        "self",
        "https://api-m.sandbox.paypal.com/v2/checkout/orders/O-1",
        "GET",
    )];
    if approve_link {
        links.push(LinkDescription::new("approve", APPROVE_URL, "GET"));
    }
    OrderResult {
        id: id.map(str::to_string),
        status: Some("CREATED".to_string()),
        links: Some(links),
        purchase_units: None,
    }
}

pub fn completed_capture(order_id: &str, capture_id: &str, amount: Money) -> CaptureResult {
    CaptureResult {
        id: Some(order_id.to_string()),
        status: Some("COMPLETED".to_string()),
        purchase_units: Some(vec![CapturedPurchaseUnit {
            payments: Some(Payments {
                captures: Some(vec![Capture {
                    id: Some(capture_id.to_string()),
                    status: Some("COMPLETED".to_string()),
                    amount: Some(amount.into()),
                }]),
            }),
        }]),
    }
}

/// A provider returning canned results and recording every call.
#[derive(Clone)]
pub struct FakeProvider {
    create: std::result::Result<OrderResult, ProviderError>,
    capture: std::result::Result<CaptureResult, ProviderError>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeProvider {
    pub fn new(order: OrderResult, capture: CaptureResult) -> Self {
        Self {
            create: Ok(order),
            capture: Ok(capture),
            calls: Arc::default(),
        }
    }

    pub fn rejecting_create(error: ProviderError) -> Self {
        Self {
            create: Err(error),
            capture: Ok(CaptureResult::default()),
            calls: Arc::default(),
        }
    }

    pub fn rejecting_capture(order: OrderResult, error: ProviderError) -> Self {
        Self {
            create: Ok(order),
            capture: Err(error),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for FakeProvider {
    async fn create_order(&self, _request: &CreateOrder) -> Result<OrderResult> {
        self.calls.lock().unwrap().push("create".to_string());
        self.create.clone().map_err(Into::into)
    }

    async fn capture_order(&self, order_id: &str) -> Result<CaptureResult> {
        self.calls.lock().unwrap().push(format!("capture:{order_id}"));
        self.capture.clone().map_err(Into::into)
    }
}

/// Approves immediately and counts how often it was asked.
#[derive(Clone, Default)]
pub struct CountingApproval {
    waits: Arc<AtomicUsize>,
}

impl CountingApproval {
    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApprovalSignal for CountingApproval {
    async fn wait_for_approval(&self) -> Result<()> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Clone)]
struct Route {
    method: &'static str,
    path: &'static str,
    status: u16,
    body: String,
}

/// A minimal HTTP/1.1 server answering fixed routes with canned JSON.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&'static str, &'static str, u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: Arc<Vec<Route>> = Arc::new(
            routes
                .into_iter()
                .map(|(method, path, status, body)| Route {
                    method,
                    path,
                    status,
                    body,
                })
                .collect(),
        );
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, routes.clone(), recorded.clone()));
            }
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

async fn serve(
    stream: TcpStream,
    routes: Arc<Vec<Route>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let mut reader = BufReader::new(stream);
    loop {
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
            return;
        }
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut headers = HashMap::new();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                return;
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }

        let length = headers
            .get("content-length")
            .and_then(|value| value.parse().ok())
            .unwrap_or(0);
        let mut body = vec![0; length];
        if reader.read_exact(&mut body).await.is_err() {
            return;
        }

        let (status, response_body) = routes
            .iter()
            .find(|route| route.method == method && route.path == path)
            .map(|route| (route.status, route.body.clone()))
            .unwrap_or((404, r#"{"name":"RESOURCE_NOT_FOUND"}"#.to_string()));

        requests.lock().unwrap().push(RecordedRequest {
            method,
            path,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        let response = format!(
            "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nPaypal-Debug-Id: stub\r\n\r\n{response_body}",
            response_body.len()
        );
        if reader.get_mut().write_all(response.as_bytes()).await.is_err() {
            return;
        }
    }
}
