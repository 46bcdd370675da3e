//! App Root Component
//!
//! Main application component with routing, global providers and the
//! session-bound WebSocket connection.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{ProtectedRoute, RedirectIfAuthenticated, Toast};
use crate::pages::{Home, Login, NotFound, Register};
use crate::state::{provide_auth_state, provide_global_state, GlobalState, WebSocketClient};

const PING_INTERVAL_MS: u32 = 30_000;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    let auth = provide_auth_state();
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // One live connection per signed-in session
    let socket = store_value(None::<WebSocketClient>);
    create_effect(move |_| {
        let signed_in = auth.user.with(|user| user.is_some());

        socket.update_value(|current| {
            if let Some(client) = current.take() {
                client.close();
            }
            if signed_in {
                if let Some(token) = api::get_token() {
                    let client = WebSocketClient::for_session(&token);
                    client.connect(state);
                    *current = Some(client);
                }
            } else {
                state.ws_connected.set(false);
                state.clear();
            }
        });
    });

    gloo_timers::callback::Interval::new(PING_INTERVAL_MS, move || {
        socket.with_value(|current| {
            if let Some(client) = current {
                let _ = client.ping();
            }
        });
    })
    .forget();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white">
                <Routes>
                    <Route
                        path="/login"
                        view=|| view! { <RedirectIfAuthenticated><Login /></RedirectIfAuthenticated> }
                    />
                    <Route
                        path="/register"
                        view=|| view! { <RedirectIfAuthenticated><Register /></RedirectIfAuthenticated> }
                    />
                    <Route
                        path="/"
                        view=|| view! { <ProtectedRoute><Home /></ProtectedRoute> }
                    />
                    <Route path="/*any" view=NotFound />
                </Routes>

                <Toast />
            </div>
        </Router>
    }
}
