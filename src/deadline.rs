//! Deadline Notifier
//!
//! Best-effort reminder for the user's tasks due within the next hour. The
//! notified set lives in memory only; the server-side `messageSent` flag keeps
//! other sessions from repeating a reminder.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::models::Task;

#[derive(Debug, Clone, PartialEq)]
pub struct DueTask {
    pub id: u32,
    pub title: String,
    pub due_at: DateTime<Utc>,
}

impl DueTask {
    pub fn minutes_left(&self, now: DateTime<Utc>) -> i64 {
        (self.due_at - now).num_minutes().max(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeadlineTracker {
    notified: HashSet<u32>,
}

impl DeadlineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_notified(&self, task_id: u32) -> bool {
        self.notified.contains(&task_id)
    }

    /// Tasks due in `[now, now + window]` that nobody was reminded about yet
    ///
    /// Selected tasks are remembered, so each is returned at most once.
    pub fn collect_due(&mut self, tasks: &[Task], now: DateTime<Utc>, window: Duration) -> Vec<DueTask> {
        let horizon = now + window;
        let mut due = Vec::new();
        for task in tasks {
            let Some(due_at) = task.due_at else { continue };
            if task.message_sent || self.was_notified(task.id) {
                continue;
            }
            if due_at < now || due_at > horizon {
                continue;
            }
            self.notified.insert(task.id);
            due.push(DueTask { id: task.id, title: task.title.clone(), due_at });
        }
        due
    }
}

pub use driver::DeadlineWatcher;

mod driver {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::Utc;
    use gloo_timers::callback::Interval;
    use leptos::prelude::*;
    use leptos::task::spawn_local;
    use tracing::{debug, info, warn};
    use web_sys::{Notification, NotificationOptions, NotificationPermission};

    use super::{DeadlineTracker, DueTask};
    use crate::commands;
    use crate::config::config;
    use crate::context::AppContext;
    use crate::query::Mutation;

    fn show_browser_notification(task: &DueTask, minutes_left: i64) {
        if Notification::permission() != NotificationPermission::Granted {
            return;
        }
        let options = NotificationOptions::new();
        options.set_body(&format!("\"{}\" {} dəqiqə sonra bitir", task.title, minutes_left));
        if let Err(e) = Notification::new_with_options("Tapşırıq vaxtı yaxınlaşır", &options) {
            debug!(error = ?e, "browser notification failed");
        }
    }

    fn run_check(tracker: Rc<RefCell<DeadlineTracker>>, ctx: AppContext) {
        spawn_local(async move {
            let tasks = match commands::task::list_assigned_to_me().await {
                Ok(tasks) => tasks,
                Err(e) => {
                    debug!(error = %e, "deadline check skipped");
                    return;
                }
            };
            let now = Utc::now();
            let window = chrono::Duration::from_std(config().reminder_window).unwrap_or(chrono::Duration::hours(1));
            let due = tracker.borrow_mut().collect_due(&tasks, now, window);

            for task in due {
                let minutes_left = task.minutes_left(now);
                info!(task_id = task.id, minutes_left, "deadline reminder");
                show_browser_notification(&task, minutes_left);
                ctx.toast_warning(format!("\"{}\" {} dəqiqə sonra bitir", task.title, minutes_left));
                match commands::task::mark_reminder_sent(task.id).await {
                    Ok(_) => ctx.apply(Mutation::MarkReminderSent),
                    Err(e) => warn!(task_id = task.id, error = %e, "reminder flag not saved"),
                }
            }
        });
    }

    /// Invisible component: polls while mounted
    #[component]
    pub fn DeadlineWatcher() -> impl IntoView {
        let ctx = expect_context::<AppContext>();
        let tracker = Rc::new(RefCell::new(DeadlineTracker::new()));

        if Notification::permission() == NotificationPermission::Default {
            let _ = Notification::request_permission();
        }

        run_check(tracker.clone(), ctx);
        let period = config().deadline_poll_interval.as_millis() as u32;
        let interval = Interval::new(period, move || run_check(tracker.clone(), ctx));
        // Dropped with the owner, which cancels the interval
        let _interval = StoredValue::new_local(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn task(id: u32, due_in_minutes: Option<i64>, message_sent: bool) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: None,
            task_list_id: 1,
            parent_id: None,
            status_id: None,
            status: None,
            assignees: vec![],
            start_at: None,
            due_at: due_in_minutes.map(|m| now() + Duration::minutes(m)),
            link: None,
            message_sent,
            position: 0,
        }
    }

    #[test]
    fn test_window_boundary() {
        let mut tracker = DeadlineTracker::new();
        let tasks = vec![task(1, Some(60), false), task(2, Some(61), false)];
        let due = tracker.collect_due(&tasks, now(), Duration::hours(1));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, 1);
        assert_eq!(due[0].minutes_left(now()), 60);
    }

    #[test]
    fn test_each_task_fires_once() {
        let mut tracker = DeadlineTracker::new();
        let tasks = vec![task(1, Some(30), false)];
        assert_eq!(tracker.collect_due(&tasks, now(), Duration::hours(1)).len(), 1);
        assert!(tracker.was_notified(1));
        assert!(tracker.collect_due(&tasks, now() + Duration::minutes(5), Duration::hours(1)).is_empty());
    }

    #[test]
    fn test_skips_sent_overdue_and_undated() {
        let mut tracker = DeadlineTracker::new();
        let tasks = vec![task(1, Some(10), true), task(2, Some(-1), false), task(3, None, false), task(4, Some(0), false)];
        let due = tracker.collect_due(&tasks, now(), Duration::hours(1));
        assert_eq!(due.iter().map(|d| d.id).collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_later_cycle_picks_up_task_entering_window() {
        let mut tracker = DeadlineTracker::new();
        let tasks = vec![task(1, Some(61), false)];
        assert!(tracker.collect_due(&tasks, now(), Duration::hours(1)).is_empty());
        let due = tracker.collect_due(&tasks, now() + Duration::minutes(5), Duration::hours(1));
        assert_eq!(due.len(), 1);
    }
}
