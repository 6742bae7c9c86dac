//! Session context and the guest sign-in screen.

use dioxus::prelude::*;
use editor::{Role, Session};

use crate::repo::{forget_session, remember_session, restore_session};

/// The signed-in session, `None` until someone picks a role.
pub fn use_session() -> Signal<Option<Session>> {
    use_context::<Signal<Option<Session>>>()
}

/// Provides [`use_session`] to its children, restoring the last guest session.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let session = use_signal(restore_session);
    use_context_provider(|| session);

    rsx! {
        {children}
    }
}

/// "Continue as guest" with a role.
#[component]
pub fn RolePicker() -> Element {
    let mut session = use_session();

    rsx! {
        div {
            class: "role-picker",
            h2 { "Continue as guest" }
            p { "Guest work is kept on this device only." }
            div {
                class: "role-picker-options",
                for role in Role::ALL {
                    button {
                        key: "{role}",
                        class: "role-option",
                        onclick: move |_| {
                            let next = Session::guest(Some(role));
                            remember_session(&next);
                            session.set(Some(next));
                        },
                        "{role}"
                    }
                }
            }
        }
    }
}

/// Header showing who is signed in, with a sign-out button.
#[component]
pub fn SessionBar() -> Element {
    let mut session = use_session();
    let Some(current) = session() else {
        return rsx! {};
    };
    let role = current.role.map(|r| r.as_str()).unwrap_or("no role");
    let who = if current.is_guest() { "Guest" } else { "Signed in" };

    rsx! {
        div {
            class: "session-bar",
            span { class: "session-who", "{who} · {role}" }
            button {
                class: "session-logout",
                onclick: move |_| {
                    forget_session();
                    session.set(None);
                },
                "Sign out"
            }
        }
    }
}
