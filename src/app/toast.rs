// SPDX-License-Identifier: GPL-3.0-only

//! Dismissible notifications with an optional action

use crate::constants::{MAX_TOASTS, TOAST_DURATION};
use crate::fl;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastMessage {
    StillCaptured,
    StillSaved(PathBuf),
    StillSaveFailed,
}

impl ToastMessage {
    pub fn text(&self) -> String {
        match self {
            ToastMessage::StillCaptured => fl!("still-captured"),
            ToastMessage::StillSaved(path) => {
                format!("{}: {}", fl!("still-saved"), path.display())
            }
            ToastMessage::StillSaveFailed => fl!("still-save-failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastAction {
    /// Open the review dialog for this frame
    Inspect(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: ToastMessage,
    pub action: Option<ToastAction>,
    pub expires_at: Instant,
}

/// Toast queue; the oldest toast is shown first
#[derive(Debug)]
pub struct Toasts {
    queue: VecDeque<Toast>,
    next_id: u64,
    duration: Duration,
    limit: usize,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(TOAST_DURATION, MAX_TOASTS)
    }
}

impl Toasts {
    pub fn new(duration: Duration, limit: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            next_id: 0,
            duration,
            limit: limit.max(1),
        }
    }

    /// Queue a toast, dropping the oldest when full; returns its id
    pub fn push(&mut self, message: ToastMessage, action: Option<ToastAction>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        while self.queue.len() >= self.limit {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            id,
            message,
            action,
            expires_at: now + self.duration,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> Option<Toast> {
        let index = self.queue.iter().position(|toast| toast.id == id)?;
        self.queue.remove(index)
    }

    /// Drop every toast carrying `action`
    pub fn dismiss_action(&mut self, action: ToastAction) {
        self.queue.retain(|toast| toast.action != Some(action));
    }

    /// Remove expired toasts; returns how many went away
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.queue.len();
        self.queue.retain(|toast| toast.expires_at > now);
        before - self.queue.len()
    }

    pub fn front(&self) -> Option<&Toast> {
        self.queue.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let mut toasts = Toasts::new(Duration::from_secs(5), 3);
        let now = Instant::now();
        toasts.push(ToastMessage::StillCaptured, None, now);

        assert_eq!(toasts.expire(now + Duration::from_secs(4)), 0);
        assert_eq!(toasts.expire(now + Duration::from_secs(5)), 1);
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_oldest_toast_dropped_when_full() {
        let mut toasts = Toasts::new(Duration::from_secs(5), 2);
        let now = Instant::now();
        let first = toasts.push(ToastMessage::StillCaptured, None, now);
        toasts.push(ToastMessage::StillSaveFailed, None, now);
        toasts.push(ToastMessage::StillCaptured, None, now);

        assert_eq!(toasts.len(), 2);
        assert!(toasts.dismiss(first).is_none());
    }

    #[test]
    fn test_dismiss_action_removes_matching_toasts() {
        let mut toasts = Toasts::default();
        let now = Instant::now();
        let id = Uuid::new_v4();
        toasts.push(ToastMessage::StillCaptured, Some(ToastAction::Inspect(id)), now);
        let other = toasts.push(ToastMessage::StillSaveFailed, None, now);

        toasts.dismiss_action(ToastAction::Inspect(id));
        assert_eq!(toasts.front().map(|toast| toast.id), Some(other));
    }

    #[test]
    fn test_captured_text_is_localized() {
        assert_eq!(ToastMessage::StillCaptured.text(), "Still captured");
    }
}
