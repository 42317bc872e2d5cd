//! Shared helpers for pipeline integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use eventgate_core::Event;
use eventgate_core::processors::{NotificationSink, NotifyError};
use std::collections::HashMap;
use std::sync::Mutex;

/// Sink that remembers every event it was handed.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, event: &Event) -> Result<(), NotifyError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// The three reference events used across tests.
pub fn sample_events() -> Vec<Event> {
    vec![
        Event {
            order_type: "Purchase".to_string(),
            session_id: "29827525-06c9-4b1e-9d9b-7c4584e82f56".to_string(),
            card: "4433**1409".to_string(),
            event_date: "2023-01-04 13:44:52.835626 +00:00".to_string(),
            website_url: "https://amazon.com".to_string(),
        },
        Event {
            order_type: "CardVerify".to_string(),
            session_id: "500cf308-e666-4639-aa9f-f6376015d1b4".to_string(),
            card: "4433**1409".to_string(),
            event_date: "2023-04-07 05:29:54.362216 +00:00".to_string(),
            website_url: "https://adidas.com".to_string(),
        },
        Event {
            order_type: "SendOtp".to_string(),
            session_id: "500cf308-e666-4639-aa9f-f6376015d1b4".to_string(),
            card: "4433**1409".to_string(),
            event_date: "2023-04-06 22:52:34.930150 +00:00".to_string(),
            website_url: "https://somon.tj".to_string(),
        },
    ]
}

/// Numbered events, distinct by session id.
pub fn numbered_events(count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| Event {
            order_type: "Purchase".to_string(),
            session_id: format!("session-{i}"),
            ..Default::default()
        })
        .collect()
}

/// Multiset equality, ignoring order.
pub fn equivalent(expected: &[Event], actual: &[Event]) -> bool {
    let mut counts: HashMap<&Event, isize> = HashMap::new();
    for e in expected {
        *counts.entry(e).or_default() += 1;
    }
    for e in actual {
        *counts.entry(e).or_default() -= 1;
    }
    counts.values().all(|&c| c == 0)
}
