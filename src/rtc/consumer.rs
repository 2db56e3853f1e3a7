//! RTC consumer (spec §4.8): a FIFO-backed subscriber with non-blocking
//! enqueue and a low-watermark wait, backed by a mutex + condvar per the
//! "cooperative waiting" design note in spec §9 ("in a threaded
//! implementation, back it with a mutex + condition variable").

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

use crate::rtc::packet::RtpPacket;
use crate::rtc::track::StreamDescription;

/// Soft watermark past which queue growth gets logged (spec §4.8 backpressure
/// note: the core leaves bound-enforcement to the circuit breaker, but still
/// wants visibility into a consumer falling behind).
const QUEUE_SOFT_WATERMARK: usize = 1024;

/// Forwarded to on `on_stream_change`; kept separate from `EventHandler`
/// since a consumer's stream-change callback is per-consumer, not
/// source-wide.
pub trait StreamChangeHandler: Send + Sync {
    fn on_stream_change(&self, desc: &StreamDescription);
}

struct Inner {
    queue: VecDeque<Box<dyn RtpPacket>>,
    should_update_source_id: bool,
    wait_threshold: Option<usize>,
    cancelled: bool,
}

pub struct Consumer {
    inner: Mutex<Inner>,
    cv: Condvar,
    handler: Mutex<Option<Arc<dyn StreamChangeHandler>>>,
}

impl Consumer {
    pub fn new() -> Arc<Self> {
        Arc::new(Consumer {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                should_update_source_id: false,
                wait_threshold: None,
                cancelled: false,
            }),
            cv: Condvar::new(),
            handler: Mutex::new(None),
        })
    }

    pub fn set_handler(&self, handler: Arc<dyn StreamChangeHandler>) {
        *self.handler.lock().unwrap() = Some(handler);
    }

    /// Takes ownership of `pkt`, appends to the tail; wakes a waiter once
    /// the queue reaches its threshold.
    pub fn enqueue(&self, pkt: Box<dyn RtpPacket>) {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.push_back(pkt);
        if inner.queue.len() == QUEUE_SOFT_WATERMARK {
            log::debug!("consumer queue crossed soft watermark ({QUEUE_SOFT_WATERMARK} packets)");
        }
        let should_wake = matches!(inner.wait_threshold, Some(n) if inner.queue.len() >= n);
        drop(inner);
        if should_wake {
            self.cv.notify_all();
        }
    }

    /// Pops the head, if any.
    pub fn dump_packet(&self) -> Option<Box<dyn RtpPacket>> {
        let mut inner = self.inner.lock().unwrap();
        let pkt = inner.queue.pop_front();
        if inner.should_update_source_id {
            log::info!("consumer source id changed");
            inner.should_update_source_id = false;
        }
        pkt
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocks cooperatively until the queue reaches `n` entries or the
    /// wait is cancelled. Non-positive `n` is always already satisfied —
    /// this crate treats `wait(-1)` and `wait(0)` identically (both are a
    /// non-blocking check), since queue length is never negative and the
    /// "n <= len" predicate is trivially true for any n <= 0.
    pub fn wait(&self, n: i64) {
        if n <= 0 {
            return;
        }
        let n = n as usize;
        let mut inner = self.inner.lock().unwrap();
        if inner.queue.len() >= n {
            return;
        }
        inner.wait_threshold = Some(n);
        while inner.queue.len() < n && !inner.cancelled {
            inner = self.cv.wait(inner).unwrap();
        }
        inner.wait_threshold = None;
    }

    /// Cancels any in-progress `wait`, letting the owning task exit (spec
    /// §5: "a consumer's wait must be cancellable").
    pub fn cancel(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.cancelled = true;
        drop(inner);
        self.cv.notify_all();
    }

    pub fn on_stream_change(&self, desc: &StreamDescription) {
        if let Some(h) = self.handler.lock().unwrap().as_ref() {
            h.on_stream_change(desc);
        }
    }

    pub fn update_source_id(&self) {
        self.inner.lock().unwrap().should_update_source_id = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtc::packet::RawRtpPacket;
    use std::thread;
    use std::time::Duration;

    fn pkt(seq: u16) -> Box<dyn RtpPacket> {
        Box::new(RawRtpPacket {
            sequence_number: seq,
            timestamp: 0,
            ssrc: 1,
            payload: vec![],
        })
    }

    #[test]
    fn fifo_order_is_preserved() {
        let c = Consumer::new();
        c.enqueue(pkt(1));
        c.enqueue(pkt(2));
        assert_eq!(c.dump_packet().unwrap().sequence_number(), 1);
        assert_eq!(c.dump_packet().unwrap().sequence_number(), 2);
        assert!(c.dump_packet().is_none());
    }

    #[test]
    fn wait_zero_and_negative_return_immediately_on_empty_queue() {
        let c = Consumer::new();
        c.wait(0);
        c.wait(-1);
    }

    #[test]
    fn wait_wakes_once_threshold_reached() {
        let c = Consumer::new();
        let c2 = c.clone();
        let handle = thread::spawn(move || {
            c2.wait(2);
            c2.len()
        });
        thread::sleep(Duration::from_millis(20));
        c.enqueue(pkt(1));
        c.enqueue(pkt(2));
        assert_eq!(handle.join().unwrap(), 2);
    }

    #[test]
    fn cancel_releases_a_stuck_wait() {
        let c = Consumer::new();
        let c2 = c.clone();
        let handle = thread::spawn(move || {
            c2.wait(5);
        });
        thread::sleep(Duration::from_millis(20));
        c.cancel();
        handle.join().unwrap();
    }
}
