use std::collections::VecDeque;
use std::time::{Duration, Instant};

use habitual_core::AppConfig;

use crate::view::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✕",
            ToastKind::Warning => "⚠",
            ToastKind::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastStage {
    Visible,
    /// Exit animation running since the given instant.
    Leaving { since: Instant },
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
    pub stage: ToastStage,
    pub persistent: bool,
}

impl Toast {
    pub fn markup(&self) -> String {
        let leaving = if matches!(self.stage, ToastStage::Leaving { .. }) {
            " hide"
        } else {
            ""
        };
        format!(
            r#"<div class="toast toast-{}{leaving}"><span class="toast-icon">{}</span><span class="toast-message">{}</span></div>"#,
            self.kind.as_str(),
            self.kind.icon(),
            escape_html(&self.message),
        )
    }
}

/// Bounded set of on-screen notifications.
///
/// Time is supplied by the caller: `tick(now)` moves expired toasts into their
/// exit stage and drops the ones whose exit animation has finished. When
/// `capacity` is reached the oldest non-persistent toast is evicted to make
/// room.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    next_id: u64,
    duration: Duration,
    animation_delay: Duration,
    capacity: usize,
}

impl ToastQueue {
    pub fn new(duration: Duration, animation_delay: Duration, capacity: usize) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 1,
            duration,
            animation_delay,
            capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.toast_duration(),
            config.animation_delay(),
            config.max_toasts,
        )
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) -> u64 {
        self.insert(kind, message.into(), now, false)
    }

    /// A toast that stays until dismissed.
    pub fn push_persistent(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        now: Instant,
    ) -> u64 {
        self.insert(kind, message.into(), now, true)
    }

    fn insert(&mut self, kind: ToastKind, message: String, now: Instant, persistent: bool) -> u64 {
        while self.toasts.len() >= self.capacity {
            // Persistent toasts go last.
            match self.toasts.iter().position(|t| !t.persistent) {
                Some(i) => {
                    self.toasts.remove(i);
                }
                None => {
                    self.toasts.pop_front();
                }
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push_back(Toast {
            id,
            kind,
            message,
            shown_at: now,
            stage: ToastStage::Visible,
            persistent,
        });
        id
    }

    pub fn tick(&mut self, now: Instant) {
        let duration = self.duration;
        let delay = self.animation_delay;
        for toast in self.toasts.iter_mut() {
            if toast.stage == ToastStage::Visible
                && !toast.persistent
                && now.saturating_duration_since(toast.shown_at) >= duration
            {
                toast.stage = ToastStage::Leaving { since: now };
            }
        }
        self.toasts.retain(|t| match t.stage {
            ToastStage::Visible => true,
            ToastStage::Leaving { since } => now.saturating_duration_since(since) < delay,
        });
    }

    /// Start the exit animation of one toast, persistent or not.
    pub fn dismiss(&mut self, id: u64, now: Instant) {
        if let Some(t) = self.toasts.iter_mut().find(|t| t.id == id) {
            if t.stage == ToastStage::Visible {
                t.stage = ToastStage::Leaving { since: now };
            }
        }
    }

    pub fn dismiss_all(&mut self, now: Instant) {
        for t in self.toasts.iter_mut() {
            if t.stage == ToastStage::Visible {
                t.stage = ToastStage::Leaving { since: now };
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
