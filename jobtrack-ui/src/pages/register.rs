//! Registration Page
//!
//! Creates the account and its profile in one request, then signs in.

use leptos::*;
use leptos_router::*;

use crate::api::{self, RegisterForm};
use crate::state::AuthState;

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
pub fn Register() -> impl IntoView {
    let auth = use_context::<AuthState>().expect("AuthState not found");
    let navigate = use_navigate();

    let full_name = create_rw_signal(String::new());
    let username = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let confirm_password = create_rw_signal(String::new());
    let phone_number = create_rw_signal(String::new());
    let date_of_birth = create_rw_signal(String::new());
    let address = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let submitting = create_rw_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);

        if password.get_untracked() != confirm_password.get_untracked() {
            error.set(Some("Passwords do not match.".to_string()));
            return;
        }

        let form = RegisterForm {
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            confirm_password: confirm_password.get_untracked(),
            full_name: full_name.get_untracked().trim().to_string(),
            username: username.get_untracked().trim().to_string(),
            phone_number: optional(phone_number.get_untracked()),
            date_of_birth: optional(date_of_birth.get_untracked()),
            address: optional(address.get_untracked()),
        };

        submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::register(&form).await {
                Ok(session) => {
                    auth.sign_in(session);
                    navigate("/", Default::default());
                }
                Err(e) => {
                    web_sys::console::log_1(&format!("Registration failed: {}", e).into());
                    error.set(Some("Failed to register. Please try again.".to_string()));
                }
            }
            submitting.set(false);
        });
    };

    let field = move |kind: &'static str, placeholder: &'static str, signal: RwSignal<String>, required: bool| {
        view! {
            <input
                type=kind
                placeholder=placeholder
                required=required
                class="input w-full"
                prop:value=move || signal.get()
                on:input=move |ev| signal.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="flex items-center justify-center min-h-screen py-8">
            <form class="bg-gray-800 rounded-lg p-8 w-full max-w-md space-y-4" on:submit=on_submit>
                <h1 class="text-2xl font-bold text-center">"Create Account"</h1>

                {move || error.get().map(|msg| view! {
                    <p class="bg-red-600/20 text-red-300 rounded p-3 text-sm">{msg}</p>
                })}

                {field("text", "Full Name", full_name, true)}
                {field("text", "Username", username, true)}
                {field("email", "Email", email, true)}
                {field("password", "Password", password, true)}
                {field("password", "Confirm Password", confirm_password, true)}
                {field("tel", "Phone Number", phone_number, false)}
                {field("date", "Date of Birth", date_of_birth, false)}
                {field("text", "Address", address, false)}

                <button
                    type="submit"
                    class="w-full py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors disabled:opacity-50"
                    disabled=move || submitting.get()
                >
                    {move || if submitting.get() { "Creating account..." } else { "Register" }}
                </button>

                <p class="text-center text-sm text-gray-400">
                    "Already have an account? "
                    <A href="/login" class="text-primary-400 hover:underline">"Log in"</A>
                </p>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields() {
        assert_eq!(optional("  ".to_string()), None);
        assert_eq!(optional(" 555-0100 ".to_string()), Some("555-0100".to_string()));
    }
}
