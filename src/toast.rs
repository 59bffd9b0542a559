//! Toast Queue
//!
//! Transient user-facing messages. The host component renders the queue and
//! removes each entry after its time to live.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "toast toast-info",
            ToastKind::Success => "toast toast-success",
            ToastKind::Warning => "toast toast-warning",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new toast id; the oldest entry is dropped past the limit
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        self.items.push(Toast { id: self.next_id, kind, message: message.into() });
        if self.items.len() > MAX_VISIBLE {
            self.items.remove(0);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let mut queue = ToastQueue::new();
        let first = queue.push(ToastKind::Error, "Xəta baş verdi!");
        let second = queue.push(ToastKind::Info, "Leyla: salam");
        assert_ne!(first, second);
        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].message, "Leyla: salam");
    }

    #[test]
    fn test_drops_oldest_past_limit() {
        let mut queue = ToastQueue::new();
        for i in 0..7 {
            queue.push(ToastKind::Info, format!("toast {}", i));
        }
        assert_eq!(queue.items().len(), MAX_VISIBLE);
        assert_eq!(queue.items()[0].message, "toast 2");
    }
}
