//! Toast and loading notifications.
//!
//! DESIGN
//! ======
//! `App` creates one [`AppContext`] and provides it with `provide_context`.
//! Pages reach the notifier through `expect_context::<AppContext>()` instead
//! of a global, so each mounted app (and each test) has its own.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Info => "toast toast--info",
            Self::Success => "toast toast--success",
            Self::Error => "toast toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Toast queue plus a count of in-flight operations.
#[derive(Clone, Debug, Default)]
pub struct NotifyState {
    pub toasts: Vec<Toast>,
    next_id: u64,
    busy: u32,
}

/// Most toasts kept on screen; older ones are dropped first.
pub const MAX_TOASTS: usize = 4;

impl NotifyState {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.toasts.push(Toast { id: self.next_id, kind, message: message.into() });
        if self.toasts.len() > MAX_TOASTS {
            let excess = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..excess);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn begin(&mut self) {
        self.busy += 1;
    }

    pub fn end(&mut self) {
        self.busy = self.busy.saturating_sub(1);
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.busy > 0
    }
}

#[cfg(feature = "hydrate")]
const TOAST_TTL_MS: u32 = 4_000;

/// Handle for raising toasts and the global busy indicator.
#[derive(Clone, Copy)]
pub struct Notifier {
    state: RwSignal<NotifyState>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self { state: RwSignal::new(NotifyState::default()) }
    }

    #[must_use]
    pub fn state(&self) -> RwSignal<NotifyState> {
        self.state
    }

    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) {
        let mut id = 0;
        self.state.update(|s| id = s.push(kind, message));
        #[cfg(feature = "hydrate")]
        {
            let state = self.state;
            leptos::task::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(TOAST_TTL_MS).await;
                state.try_update(|s| s.dismiss(id));
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = id;
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(ToastKind::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        #[cfg(feature = "hydrate")]
        let message = {
            let message = message.into();
            log::error!("{message}");
            message
        };
        self.notify(ToastKind::Error, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.state.update(|s| s.dismiss(id));
    }

    pub fn begin_loading(&self) {
        self.state.update(NotifyState::begin);
    }

    pub fn end_loading(&self) {
        self.state.update(NotifyState::end);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared services provided at the application root.
#[derive(Clone, Copy, Default)]
pub struct AppContext {
    pub notifier: Notifier,
}
