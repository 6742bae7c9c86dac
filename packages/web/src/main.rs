use dioxus::prelude::*;

use ui::views::WorkspaceView;
use ui::{ActivityLog, ActivityLogPanel, SessionProvider};

const FAVICON: Asset = asset!("/assets/favicon.svg");

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,editor=debug")),
            )
            .init();
    }

    tracing::info!("Starting Folio");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let activity_log = use_signal(ActivityLog::default);
    use_context_provider(|| activity_log);

    rsx! {
        // Global app resources
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: ui::APP_CSS }

        SessionProvider {
            WorkspaceView {}
        }
        ActivityLogPanel {}
    }
}
