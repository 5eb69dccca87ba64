//! 测试辅助：脚本化数据源、记录型通知渠道、一次性本地 HTTP 服务

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use homework_bot::{BotError, HomeworkSource, HttpDiagnostics, NotificationChannel, PollOutcome};

// ============================================================================
// ScriptedSource
// ============================================================================

/// 按脚本依次返回结果的数据源；脚本用完后返回超时
#[derive(Default)]
pub struct ScriptedSource {
    outcomes: Mutex<VecDeque<PollOutcome>>,
    requests: Mutex<Vec<i64>>,
    stop: Mutex<Option<(usize, Sender<()>)>>,
}

impl ScriptedSource {
    pub fn new(outcomes: Vec<PollOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Default::default()
        }
    }

    /// 第 n 次轮询后发送 shutdown 信号
    pub fn stop_after(self, polls: usize, shutdown: Sender<()>) -> Self {
        *self.stop.lock().unwrap() = Some((polls, shutdown));
        self
    }

    /// 每次轮询使用的 from_date
    pub fn requests(&self) -> Vec<i64> {
        self.requests.lock().unwrap().clone()
    }
}

impl HomeworkSource for ScriptedSource {
    fn poll(&self, from_date: i64) -> PollOutcome {
        let polls = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(from_date);
            requests.len()
        };

        if let Some((after, shutdown)) = self.stop.lock().unwrap().as_ref() {
            if polls >= *after {
                let _ = shutdown.send(());
            }
        }

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BotError::Timeout("script exhausted".to_string())))
    }
}

pub fn not_found() -> BotError {
    BotError::EndpointNotFound(diagnostics(404))
}

pub fn server_error() -> BotError {
    BotError::UnexpectedStatus(diagnostics(500))
}

fn diagnostics(status: u16) -> HttpDiagnostics {
    HttpDiagnostics {
        url: "http://localhost/api/?from_date=0".to_string(),
        status,
        headers: "{}".to_string(),
        body: "{\"code\": \"not_found\"}".to_string(),
    }
}

// ============================================================================
// RecordingChannel
// ============================================================================

/// 记录所有发送内容的渠道，可模拟发送失败
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingChannel {
    pub fn failing() -> Self {
        let channel = Self::default();
        channel.set_failing(true);
        channel
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    fn send(&self, text: &str) -> homework_bot::error::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(BotError::NotificationDelivery("chat is unreachable".to_string()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ============================================================================
// 本地 HTTP 服务
// ============================================================================

/// 接受一个连接，返回固定响应；JoinHandle 返回收到的原始请求
pub fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
    let (url, handle) = serve_sequence(vec![(status_line, "", body)]);
    let handle = thread::spawn(move || handle.join().unwrap().remove(0));
    (url, handle)
}

/// 在同一端口上依次接受多个连接，每个连接返回 (状态行, 额外头, 响应体)
pub fn serve_sequence(responses: Vec<(&str, &str, &str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let responses: Vec<String> = responses
        .into_iter()
        .map(|(status_line, extra_header, body)| http_response(status_line, extra_header, body))
        .collect();

    let handle = thread::spawn(move || {
        responses
            .into_iter()
            .map(|response| {
                let (mut stream, _) = listener.accept().unwrap();
                let request = read_request(&mut stream);
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
                request
            })
            .collect()
    });

    (format!("http://{}", addr), handle)
}

fn http_response(status_line: &str, extra_header: &str, body: &str) -> String {
    let extra = if extra_header.is_empty() {
        String::new()
    } else {
        format!("{}\r\n", extra_header)
    };
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        extra,
        body.len(),
        body
    )
}

/// 接受一个连接但迟迟不响应
pub fn serve_silently(hold: Duration) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            thread::sleep(hold);
            drop(stream);
        }
    });

    (format!("http://{}", addr), handle)
}

/// 一个没有人监听的地址
pub fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = find_header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let total = pos + 4 + content_length(&head);
            while buf.len() < total {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            break;
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}
