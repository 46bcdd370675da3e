//! Login Page

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::AuthState;

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_context::<AuthState>().expect("AuthState not found");
    let navigate = use_navigate();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let submitting = create_rw_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        submitting.set(true);

        let navigate = navigate.clone();
        spawn_local(async move {
            match api::login(email.get_untracked().trim(), &password.get_untracked()).await {
                Ok(session) => {
                    auth.sign_in(session);
                    navigate("/", Default::default());
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Login failed: {}", e).into());
                    error.set(Some("Failed to log in. Please check your credentials.".to_string()));
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-screen">
            <form class="bg-gray-800 rounded-lg p-8 w-full max-w-md space-y-4" on:submit=on_submit>
                <h1 class="text-2xl font-bold text-center">"Log In"</h1>

                {move || error.get().map(|msg| view! {
                    <p class="bg-red-600/20 text-red-300 rounded p-3 text-sm">{msg}</p>
                })}

                <input
                    type="email"
                    placeholder="Email"
                    required=true
                    class="input w-full"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    required=true
                    class="input w-full"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />

                <button
                    type="submit"
                    class="w-full py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors disabled:opacity-50"
                    disabled=move || submitting.get()
                >
                    {move || if submitting.get() { "Logging in..." } else { "Log In" }}
                </button>

                <p class="text-center text-sm text-gray-400">
                    "Don't have an account? "
                    <A href="/register" class="text-primary-400 hover:underline">"Register"</A>
                </p>
            </form>
        </div>
    }
}
