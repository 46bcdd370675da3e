//! WebSocket Live Snapshots
//!
//! Pushes a user's job list and dashboard to the web UI as they change.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Manages connections and per-user topic subscriptions
//! - **Handler**: Authenticates the upgrade and processes client messages
//! - **Messages**: Client and server message formats
//!
//! ## Usage
//!
//! Clients connect to `/api/v1/ws?token=<session token>` and subscribe to:
//! - `jobs` - the full job list, newest first
//! - `dashboard` - dashboard statistics
//!
//! A snapshot is sent right after subscribing and again after every change
//! to the user's jobs.
//!
//! ```javascript
//! const ws = new WebSocket(`ws://localhost:8090/api/v1/ws?token=${token}`);
//! ws.onopen = () => ws.send(JSON.stringify({type: 'subscribe', topics: ['jobs', 'dashboard']}));
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{ConnectionHub, HubConfig, HubError};
pub use messages::{ClientMessage, ServerMessage, Topic, WsEvent};
