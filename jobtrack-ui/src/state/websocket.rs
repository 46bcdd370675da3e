//! WebSocket Client
//!
//! Real-time connection to the jobtrack API. On open the client subscribes
//! to the `jobs` and `dashboard` topics; the server answers every change with
//! a fresh snapshot of each.

use leptos::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::global::{DashboardStats, GlobalState, Job};
use crate::api;

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const TOPICS: [&str; 2] = ["jobs", "dashboard"];

/// WebSocket message types from server
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    Connected { connection_id: String },
    Subscribed { topics: Vec<String> },
    Unsubscribed { topics: Vec<String> },
    JobsSnapshot { jobs: Vec<Job> },
    DashboardSnapshot { stats: DashboardStats },
    Pong,
    Error { message: String },
}

/// WebSocket client message types
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { topics: Vec<String> },
    Ping,
}

/// Delay before reconnect attempt `attempt` (0-based)
fn reconnect_delay_ms(attempt: u32) -> u32 {
    (2_u32.saturating_pow(attempt).saturating_mul(1000)).min(30_000)
}

/// WebSocket client for live job updates
#[derive(Clone)]
pub struct WebSocketClient {
    ws: Rc<RefCell<Option<WebSocket>>>,
    url: String,
    reconnect_attempts: Rc<Cell<u32>>,
    closed: Rc<Cell<bool>>,
}

impl WebSocketClient {
    pub fn new(url: &str) -> Self {
        Self {
            ws: Rc::new(RefCell::new(None)),
            url: url.to_string(),
            reconnect_attempts: Rc::new(Cell::new(0)),
            closed: Rc::new(Cell::new(false)),
        }
    }

    /// Connect for the stored session token
    pub fn for_session(token: &str) -> Self {
        Self::new(&api::ws_url(&api::get_api_base(), token))
    }

    /// Connect to the WebSocket server
    pub fn connect(&self, state: GlobalState) {
        if self.closed.get() {
            return;
        }

        match WebSocket::new(&self.url) {
            Ok(ws) => {
                self.setup_handlers(&ws, state);
                *self.ws.borrow_mut() = Some(ws);
            }
            Err(e) => {
                web_sys::console::error_1(&format!("WebSocket connection failed: {:?}", e).into());
                self.schedule_reconnect(state);
            }
        }
    }

    fn setup_handlers(&self, ws: &WebSocket, state: GlobalState) {
        // On open
        let client = self.clone();
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            web_sys::console::log_1(&"WebSocket connected".into());
            state.ws_connected.set(true);
            client.reconnect_attempts.set(0);

            let topics = TOPICS.iter().map(|t| t.to_string()).collect();
            if let Err(e) = client.subscribe(topics) {
                web_sys::console::error_1(&format!("Subscribe failed: {}", e).into());
            }
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        // On message
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Ok(text) = event.data().dyn_into::<js_sys::JsString>() {
                let text_str: String = text.into();
                handle_message(&text_str, &state);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        // On close
        let client = self.clone();
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            web_sys::console::log_1(
                &format!("WebSocket closed: code={}, reason={}", event.code(), event.reason()).into(),
            );
            state.ws_connected.set(false);
            client.schedule_reconnect(state);
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        // On error
        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(&format!("WebSocket error: {:?}", e).into());
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }

    fn schedule_reconnect(&self, state: GlobalState) {
        if self.closed.get() {
            return;
        }

        let attempts = self.reconnect_attempts.get();
        if attempts >= MAX_RECONNECT_ATTEMPTS {
            web_sys::console::error_1(&"Max reconnect attempts reached".into());
            return;
        }

        self.reconnect_attempts.set(attempts + 1);
        let client = self.clone();
        gloo_timers::callback::Timeout::new(reconnect_delay_ms(attempts), move || {
            web_sys::console::log_1(
                &format!("Attempting reconnect (attempt {})", client.reconnect_attempts.get()).into(),
            );
            client.connect(state);
        })
        .forget();
    }

    /// Send a message to the server
    pub fn send(&self, message: &ClientMessage) -> Result<(), String> {
        let ws_guard = self.ws.borrow();
        let ws = ws_guard.as_ref().ok_or("WebSocket not connected")?;

        let json = serde_json::to_string(message).map_err(|e| e.to_string())?;
        ws.send_with_str(&json).map_err(|e| format!("{:?}", e))
    }

    pub fn subscribe(&self, topics: Vec<String>) -> Result<(), String> {
        self.send(&ClientMessage::Subscribe { topics })
    }

    pub fn ping(&self) -> Result<(), String> {
        self.send(&ClientMessage::Ping)
    }

    /// Close the connection for good (no reconnect)
    pub fn close(&self) {
        self.closed.set(true);
        if let Some(ws) = self.ws.borrow_mut().take() {
            let _ = ws.close();
        }
    }
}

/// Handle incoming WebSocket message
fn handle_message(text: &str, state: &GlobalState) {
    match serde_json::from_str::<WsMessage>(text) {
        Ok(WsMessage::Connected { connection_id }) => {
            web_sys::console::log_1(&format!("Connected with ID: {}", connection_id).into());
        }
        Ok(WsMessage::Subscribed { topics }) => {
            web_sys::console::log_1(&format!("Subscribed to: {:?}", topics).into());
        }
        Ok(WsMessage::Unsubscribed { topics }) => {
            web_sys::console::log_1(&format!("Unsubscribed from: {:?}", topics).into());
        }
        Ok(WsMessage::JobsSnapshot { jobs }) => {
            state.jobs.set(jobs);
            refresh_search(state);
        }
        Ok(WsMessage::DashboardSnapshot { stats }) => {
            state.stats.set(Some(stats));
        }
        Ok(WsMessage::Pong) => {}
        Ok(WsMessage::Error { message }) => {
            web_sys::console::error_1(&format!("Server error: {}", message).into());
            state.show_error(&message);
        }
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to parse WebSocket message: {}", e).into());
        }
    }
}

/// Re-run an active search so results track the live job list
fn refresh_search(state: &GlobalState) {
    let query = state.search_query.get_untracked();
    if query.trim().is_empty() {
        return;
    }

    let results = state.search_results;
    spawn_local(async move {
        if let Ok(jobs) = api::fetch_jobs(Some(&query)).await {
            results.set(Some(jobs));
        }
    });
}
