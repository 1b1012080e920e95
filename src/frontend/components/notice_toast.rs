use crate::frontend::utils::notices::{Notice, NoticeKind};
use leptos::prelude::*;

/// Creates the signal that stores use to report action results, and makes it available to
/// [NoticeToast].
pub fn provide_notices() -> RwSignal<Option<Notice>> {
    let notice = RwSignal::new(None::<Notice>);
    provide_context(notice);
    notice
}

/// Shows the latest success or error message until it is dismissed.
#[component]
pub fn NoticeToast() -> impl IntoView {
    let notice = expect_context::<RwSignal<Option<Notice>>>();
    view! {
        {move || {
            notice
                .get()
                .map(|n| {
                    let class = match n.kind {
                        NoticeKind::Success => "alert alert-success",
                        NoticeKind::Error => "alert alert-error",
                    };
                    view! {
                        <div class="toast toast-end">
                            <div class=class role="alert">
                                <span>{n.message}</span>
                                <button
                                    class="btn btn-xs btn-ghost"
                                    title="Dismiss"
                                    on:click=move |_| notice.set(None)
                                >
                                    "×"
                                </button>
                            </div>
                        </div>
                    }
                })
        }}
    }
}
