use std::time::{Duration, Instant};

pub const DISPLAY_FOR: Duration = Duration::from_secs(3);
pub const FADE_FOR: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Fading,
    Gone,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub queued_at: Instant,
}

impl Toast {
    pub fn phase_at(&self, now: Instant) -> Phase {
        let age = now.saturating_duration_since(self.queued_at);
        if age < DISPLAY_FOR {
            Phase::Visible
        } else if age < DISPLAY_FOR + FADE_FOR {
            Phase::Fading
        } else {
            Phase::Gone
        }
    }

    /// Time left before the fade-out starts, used to schedule it in the page.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        DISPLAY_FOR.saturating_sub(now.saturating_duration_since(self.queued_at))
    }
}

#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Toast>,
}

impl Notifications {
    pub fn push_at(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) -> u64 {
        self.next_id += 1;
        self.items.push(Toast {
            id: self.next_id,
            kind,
            message: message.into(),
            queued_at: now,
        });
        self.next_id
    }

    pub fn prune_at(&mut self, now: Instant) {
        self.items.retain(|toast| toast.phase_at(now) != Phase::Gone);
    }

    /// Toasts still on screen at `now`, oldest first.
    pub fn active_at(&self, now: Instant) -> impl Iterator<Item = (&Toast, Phase)> + '_ {
        self.items.iter().filter_map(move |toast| match toast.phase_at(now) {
            Phase::Gone => None,
            phase => Some((toast, phase)),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count_of(&self, kind: ToastKind) -> usize {
        self.items.iter().filter(|toast| toast.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_fades_after_three_seconds_then_disappears() {
        let start = Instant::now();
        let mut notifications = Notifications::default();
        notifications.push_at(ToastKind::Success, "Record saved", start);

        let phases: Vec<Phase> = [0, 2_999, 3_000, 3_299, 3_300]
            .iter()
            .map(|ms| {
                notifications
                    .active_at(start + Duration::from_millis(*ms))
                    .map(|(_, phase)| phase)
                    .next()
                    .unwrap_or(Phase::Gone)
            })
            .collect();
        assert_eq!(
            phases,
            vec![Phase::Visible, Phase::Visible, Phase::Fading, Phase::Fading, Phase::Gone]
        );

        notifications.prune_at(start + Duration::from_millis(3_300));
        assert!(notifications.is_empty());
    }

    #[test]
    fn prune_keeps_younger_toasts() {
        let start = Instant::now();
        let mut notifications = Notifications::default();
        notifications.push_at(ToastKind::Error, "old", start);
        notifications.push_at(ToastKind::Warning, "new", start + Duration::from_secs(2));

        notifications.prune_at(start + Duration::from_secs(4));
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications.count_of(ToastKind::Warning), 1);
    }

    #[test]
    fn remaining_time_counts_down_to_fade() {
        let start = Instant::now();
        let toast = Toast {
            id: 1,
            kind: ToastKind::Success,
            message: String::new(),
            queued_at: start,
        };
        assert_eq!(toast.remaining_at(start + Duration::from_secs(1)), Duration::from_secs(2));
        assert_eq!(toast.remaining_at(start + Duration::from_secs(5)), Duration::ZERO);
    }
}
