//! Local reminders fired shortly before an event starts.
//!
//! [`EventNotifier`] decides when a reminder should fire; a [`WorkScheduler`]
//! runs the one-shot delayed job. Jobs are identified by a tag derived from
//! the event id, so rescheduling replaces and cancelling needs only the id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::error::{JoinMeError, JoinMeResult};
use crate::event::Event;

/// Default time between the reminder and the event start.
pub const DEFAULT_LEAD_MINUTES: u32 = 15;

const TAG_PREFIX: &str = "event_notification_";

pub fn notification_tag(event_id: &str) -> String {
    format!("{TAG_PREFIX}{event_id}")
}

/// What gets delivered when a reminder fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub event_id: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
}

/// One-shot delayed work, keyed by tag.
pub trait WorkScheduler: Send + Sync {
    /// Run `notification` after `delay`, replacing any pending job with the same tag.
    fn enqueue(&self, tag: &str, delay: Duration, notification: Notification);

    /// Returns whether a pending job was cancelled.
    fn cancel(&self, tag: &str) -> bool;

    /// Tags of jobs that have not fired yet.
    fn pending(&self) -> Vec<String>;
}

/// Runs each job as a tokio task that sleeps, then delivers on a channel.
pub struct TokioWorkScheduler {
    runtime: Handle,
    sender: mpsc::UnboundedSender<Notification>,
    jobs: Arc<Mutex<HashMap<String, Job>>>,
    next_job: AtomicU64,
}

struct Job {
    id: u64,
    handle: AbortHandle,
}

impl TokioWorkScheduler {
    /// Must be called from within a tokio runtime.
    pub fn new() -> JoinMeResult<(Self, mpsc::UnboundedReceiver<Notification>)> {
        let runtime = Handle::try_current()
            .map_err(|e| JoinMeError::Scheduler(format!("No tokio runtime: {e}")))?;
        let (sender, receiver) = mpsc::unbounded_channel();

        let scheduler = TokioWorkScheduler {
            runtime,
            sender,
            jobs: Arc::new(Mutex::new(HashMap::new())),
            next_job: AtomicU64::new(0),
        };
        Ok((scheduler, receiver))
    }

    fn jobs(&self) -> MutexGuard<'_, HashMap<String, Job>> {
        lock_jobs(&self.jobs)
    }
}

fn lock_jobs(jobs: &Mutex<HashMap<String, Job>>) -> MutexGuard<'_, HashMap<String, Job>> {
    // The map holds no invariant a panicking holder could break.
    jobs.lock().unwrap_or_else(|e| e.into_inner())
}

impl WorkScheduler for TokioWorkScheduler {
    fn enqueue(&self, tag: &str, delay: Duration, notification: Notification) {
        let jobs = self.jobs.clone();
        let sender = self.sender.clone();
        let owned_tag = tag.to_string();
        let job_id = self.next_job.fetch_add(1, Ordering::Relaxed);

        // Held across the spawn so the job cannot finish before it is registered.
        let mut pending = self.jobs();

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut jobs = lock_jobs(&jobs);
                if jobs.get(&owned_tag).is_some_and(|job| job.id == job_id) {
                    jobs.remove(&owned_tag);
                }
            }

            if sender.send(notification).is_err() {
                debug!(tag = %owned_tag, "notification receiver closed");
            }
        });

        let job = Job {
            id: job_id,
            handle: task.abort_handle(),
        };
        if let Some(previous) = pending.insert(tag.to_string(), job) {
            previous.handle.abort();
            debug!(tag, "replaced pending notification");
        }
    }

    fn cancel(&self, tag: &str) -> bool {
        match self.jobs().remove(tag) {
            Some(job) => {
                job.handle.abort();
                true
            }
            None => false,
        }
    }

    fn pending(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.jobs().keys().cloned().collect();
        tags.sort();
        tags
    }
}

/// Schedules reminders for events.
pub struct EventNotifier {
    scheduler: Arc<dyn WorkScheduler>,
    lead: chrono::Duration,
}

impl EventNotifier {
    pub fn new(scheduler: Arc<dyn WorkScheduler>, lead_minutes: u32) -> Self {
        EventNotifier {
            scheduler,
            lead: chrono::Duration::minutes(i64::from(lead_minutes)),
        }
    }

    /// Schedule a reminder at `start - lead`.
    ///
    /// When that instant is not in the future nothing is scheduled and `false`
    /// is returned.
    pub fn schedule(&self, event: &Event, now: DateTime<Utc>) -> bool {
        let fire_at = event.date - self.lead;
        let delay = fire_at - now;

        let delay = match delay.to_std() {
            Ok(delay) if !delay.is_zero() => delay,
            _ => {
                debug!(event_id = %event.id, %fire_at, "reminder time already passed, skipping");
                return false;
            }
        };

        let notification = Notification {
            event_id: event.id.clone(),
            title: event.title.clone(),
            starts_at: event.date,
        };
        self.scheduler
            .enqueue(&notification_tag(&event.id), delay, notification);

        debug!(event_id = %event.id, %fire_at, "reminder scheduled");
        true
    }

    /// Schedule reminders for every event; returns how many were scheduled.
    pub fn schedule_all<'a>(
        &self,
        events: impl IntoIterator<Item = &'a Event>,
        now: DateTime<Utc>,
    ) -> usize {
        events
            .into_iter()
            .filter(|event| self.schedule(event, now))
            .count()
    }

    pub fn cancel(&self, event_id: &str) -> bool {
        let cancelled = self.scheduler.cancel(&notification_tag(event_id));
        if !cancelled {
            warn!(event_id, "no pending reminder to cancel");
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::test_event;
    use chrono::TimeZone;

    #[derive(Default)]
    struct RecordingScheduler {
        enqueued: Mutex<Vec<(String, Duration)>>,
    }

    impl WorkScheduler for RecordingScheduler {
        fn enqueue(&self, tag: &str, delay: Duration, _notification: Notification) {
            self.enqueued.lock().unwrap().push((tag.to_string(), delay));
        }

        fn cancel(&self, tag: &str) -> bool {
            let mut enqueued = self.enqueued.lock().unwrap();
            let before = enqueued.len();
            enqueued.retain(|(t, _)| t != tag);
            enqueued.len() != before
        }

        fn pending(&self) -> Vec<String> {
            self.enqueued.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_tag_is_prefixed_event_id() {
        assert_eq!(notification_tag("abc"), "event_notification_abc");
    }

    #[test]
    fn test_schedules_lead_minutes_before_start() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let notifier = EventNotifier::new(scheduler.clone(), DEFAULT_LEAD_MINUTES);
        let event = test_event("e1", now() + chrono::Duration::hours(1), 60);

        assert!(notifier.schedule(&event, now()));

        let enqueued = scheduler.enqueued.lock().unwrap().clone();
        assert_eq!(
            enqueued,
            vec![("event_notification_e1".to_string(), Duration::from_secs(45 * 60))]
        );
    }

    #[test]
    fn test_non_positive_delay_is_noop() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let notifier = EventNotifier::new(scheduler.clone(), DEFAULT_LEAD_MINUTES);

        // Reminder instant exactly now, and already past.
        let at_now = test_event("e1", now() + chrono::Duration::minutes(15), 60);
        let past = test_event("e2", now() + chrono::Duration::minutes(5), 60);

        assert!(!notifier.schedule(&at_now, now()));
        assert!(!notifier.schedule(&past, now()));
        assert!(scheduler.pending().is_empty());
    }

    #[test]
    fn test_schedule_all_counts_scheduled() {
        let scheduler = Arc::new(RecordingScheduler::default());
        let notifier = EventNotifier::new(scheduler.clone(), DEFAULT_LEAD_MINUTES);
        let events = vec![
            test_event("later", now() + chrono::Duration::days(1), 60),
            test_event("past", now() - chrono::Duration::days(1), 60),
        ];

        assert_eq!(notifier.schedule_all(&events, now()), 1);
        assert!(notifier.cancel("later"));
        assert!(!notifier.cancel("later"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_fires_after_delay() {
        let (scheduler, mut rx) = TokioWorkScheduler::new().unwrap();
        let notification = Notification {
            event_id: "e1".to_string(),
            title: "Run".to_string(),
            starts_at: now(),
        };

        scheduler.enqueue("event_notification_e1", Duration::from_secs(60), notification.clone());
        assert_eq!(scheduler.pending(), vec!["event_notification_e1"]);

        let fired = rx.recv().await.unwrap();

        assert_eq!(fired, notification);
        assert!(scheduler.pending().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_cancel_and_replace() {
        let (scheduler, mut rx) = TokioWorkScheduler::new().unwrap();
        let make = |title: &str| Notification {
            event_id: "e1".to_string(),
            title: title.to_string(),
            starts_at: now(),
        };

        scheduler.enqueue("t", Duration::from_secs(60), make("first"));
        scheduler.enqueue("t", Duration::from_secs(120), make("second"));
        scheduler.enqueue("gone", Duration::from_secs(30), make("cancelled"));
        assert!(scheduler.cancel("gone"));

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.title, "second");
        assert!(scheduler.pending().is_empty());
    }
}
