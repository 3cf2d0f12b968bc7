#![allow(dead_code)]

use async_trait::async_trait;
use longmen_api::{
    Client, Result,
    interaction::{Navigator, Notifier},
    storage::MemoryStorage,
    transport::{HttpRequest, HttpResponse, Transport},
};
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::{sync::Arc, time::Duration};

type Handler = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync>;

/// 按请求返回预设响应的传输层，并记录所有发出的请求
pub struct MockTransport {
    handler: Handler,
    delays: Vec<(String, Duration)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(handler: impl Fn(&HttpRequest) -> Result<HttpResponse> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            delays: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 对 url 包含 `pattern` 的请求延迟响应
    pub fn with_delay(mut self, pattern: &str, delay: Duration) -> Self {
        self.delays.push((pattern.to_string(), delay));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().last().cloned().expect("no request sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request.clone());

        let delay = self
            .delays
            .iter()
            .find(|(pattern, _)| request.url.contains(pattern.as_str()))
            .map(|(_, delay)| *delay);

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        (self.handler)(&request)
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub urls: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, url: &str) {
        self.urls.lock().push(url.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub titles: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn show_toast(&self, title: &str) {
        self.titles.lock().push(title.to_string());
    }
}

pub struct Harness {
    pub client: Client,
    pub transport: Arc<MockTransport>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(transport: MockTransport) -> Harness {
    let transport = Arc::new(transport);
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let client = Client::builder()
        .base_url("http://localhost:8090")
        .storage(Arc::new(MemoryStorage::new()))
        .transport(transport.clone())
        .navigator(navigator.clone())
        .notifier(notifier.clone())
        .build()
        .expect("构建应该成功");

    Harness {
        client,
        transport,
        navigator,
        notifier,
    }
}

pub fn json_response(status: u16, headers: &[(&'static str, &'static str)], body: Value) -> HttpResponse {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(*name, HeaderValue::from_static(value));
    }

    HttpResponse {
        status,
        headers: map,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub fn ok(data: Value) -> HttpResponse {
    json_response(200, &[], serde_json::json!({ "code": 0, "data": data, "message": "ok" }))
}
