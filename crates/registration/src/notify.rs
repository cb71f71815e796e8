//! Success / error notification channels.
//!
//! Each channel holds at most one message. Auto-hide is a deadline that the
//! owner's event loop checks through [`Notifications::poll`]; dismissing or
//! tearing down a channel drops the deadline with the message.

use serde::Deserialize;
use std::time::{Duration, Instant};
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

pub const DEFAULT_AUTO_HIDE_MS: u64 = 6000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ChannelKind {
    Success,
    Error,
}

/// Why a close was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Close button, Escape, ...
    Explicit,
    /// Incidental click outside the notification.
    ClickAway,
    /// Auto-hide deadline reached.
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub auto_hide_ms: u64,
    /// When set, click-away dismissals leave the channel open.
    pub ignore_background_dismiss: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            auto_hide_ms: DEFAULT_AUTO_HIDE_MS,
            ignore_background_dismiss: false,
        }
    }
}

impl NotificationSettings {
    pub fn auto_hide(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: ChannelKind,
    pub message: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.created_at + self.ttl
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

/// A single-slot, timed, dismissible message display.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    kind: ChannelKind,
    current: Option<Notification>,
    ttl: Duration,
    ignore_background_dismiss: bool,
}

impl NotificationChannel {
    pub fn new(kind: ChannelKind, settings: &NotificationSettings) -> Self {
        Self {
            kind,
            current: None,
            ttl: settings.auto_hide(),
            ignore_background_dismiss: settings.ignore_background_dismiss,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.message.as_str())
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Show `message`. An already open channel gets its text replaced and its
    /// timer restarted.
    pub fn open(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        debug!(channel = %self.kind, %message, "notification opened");
        self.current = Some(Notification {
            kind: self.kind,
            message,
            created_at: now,
            ttl: self.ttl,
        });
    }

    /// Returns true if the channel went from open to closed.
    pub fn dismiss(&mut self, reason: DismissReason) -> bool {
        if reason == DismissReason::ClickAway && self.ignore_background_dismiss {
            return false;
        }
        let closed = self.current.take().is_some();
        if closed {
            debug!(channel = %self.kind, ?reason, "notification closed");
        }
        closed
    }

    /// Close the channel if its deadline has passed. Returns true if it did.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(notification) if notification.is_expired(now) => {
                self.dismiss(DismissReason::Timeout)
            }
            _ => false,
        }
    }

    /// Time left before auto-hide, `None` when closed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|n| n.expires_at().saturating_duration_since(now))
    }
}

/// The success and error channels side by side.
#[derive(Debug, Clone)]
pub struct Notifications {
    success: NotificationChannel,
    error: NotificationChannel,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(&NotificationSettings::default())
    }
}

impl Notifications {
    pub fn new(settings: &NotificationSettings) -> Self {
        Self {
            success: NotificationChannel::new(ChannelKind::Success, settings),
            error: NotificationChannel::new(ChannelKind::Error, settings),
        }
    }

    pub fn channel(&self, kind: ChannelKind) -> &NotificationChannel {
        match kind {
            ChannelKind::Success => &self.success,
            ChannelKind::Error => &self.error,
        }
    }

    pub fn channel_mut(&mut self, kind: ChannelKind) -> &mut NotificationChannel {
        match kind {
            ChannelKind::Success => &mut self.success,
            ChannelKind::Error => &mut self.error,
        }
    }

    pub fn open(&mut self, kind: ChannelKind, message: impl Into<String>, now: Instant) {
        self.channel_mut(kind).open(message, now);
    }

    pub fn dismiss(&mut self, kind: ChannelKind, reason: DismissReason) -> bool {
        self.channel_mut(kind).dismiss(reason)
    }

    /// Expire both channels; returns the kinds that closed.
    pub fn poll(&mut self, now: Instant) -> Vec<ChannelKind> {
        let mut closed = Vec::new();
        if self.success.poll(now) {
            closed.push(ChannelKind::Success);
        }
        if self.error.poll(now) {
            closed.push(ChannelKind::Error);
        }
        closed
    }

    /// Close everything without firing anything; used when the form goes away.
    pub fn teardown(&mut self) {
        self.success.current = None;
        self.error.current = None;
    }
}
