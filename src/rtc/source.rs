//! RTC source (spec §4.7): the publisher hub. One `Source` per stream URL,
//! shared via `Arc` from the source manager (spec §5 ownership rules: "last
//! reference drops the source").

use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::error::Result;
use crate::rtc::bridge::{Bridge, PublishRequest, DEFAULT_AUDIO_CODEC, DEFAULT_VIDEO_CODEC};
use crate::rtc::circuit_breaker::CircuitBreaker;
use crate::rtc::consumer::Consumer;
use crate::rtc::handler::EventHandler;
use crate::rtc::packet::RtpPacket;
use crate::rtc::track::{StreamDescription, TrackDesc, TrackKind};

#[derive(Debug, Clone, Copy, Default)]
struct State {
    is_created: bool,
    is_delivering: bool,
}

pub struct Source {
    stream_url: String,
    state: Mutex<State>,
    consumers: Mutex<Vec<Arc<Consumer>>>,
    handlers: Mutex<Vec<Arc<dyn EventHandler>>>,
    bridge: Mutex<Option<Box<dyn Bridge>>>,
    circuit_breaker: CircuitBreaker,
    source_id: Mutex<String>,
    pre_source_id: Mutex<String>,
    stream_description: Mutex<Option<StreamDescription>>,
    stream_die_at: Mutex<Option<Instant>>,
}

impl Source {
    pub fn new(stream_url: String) -> Self {
        Source {
            stream_url,
            state: Mutex::new(State::default()),
            consumers: Mutex::new(Vec::new()),
            handlers: Mutex::new(Vec::new()),
            bridge: Mutex::new(None),
            circuit_breaker: CircuitBreaker::new(),
            source_id: Mutex::new(String::new()),
            pre_source_id: Mutex::new(String::new()),
            stream_description: Mutex::new(None),
            stream_die_at: Mutex::new(None),
        }
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    pub fn can_publish(&self) -> bool {
        !self.state.lock().unwrap().is_created
    }

    pub fn is_delivering(&self) -> bool {
        self.state.lock().unwrap().is_delivering
    }

    pub fn set_bridge(&self, bridge: Box<dyn Bridge>) {
        *self.bridge.lock().unwrap() = Some(bridge);
    }

    pub fn set_stream_description(&self, desc: StreamDescription) {
        *self.stream_description.lock().unwrap() = Some(desc);
    }

    /// Source manager's `fetch_or_create` init step: binds this source to
    /// its first publish request. Distinct from the per-publish
    /// `on_publish`/bridge initialization below.
    pub fn initialize(&self, _req: &PublishRequest) -> Result<()> {
        Ok(())
    }

    pub fn update_auth(&self, _req: &PublishRequest) {}

    /// One-shot `(false,false) -> (true,false)` transition.
    pub fn set_stream_created(&self) {
        let mut state = self.state.lock().unwrap();
        assert!(!state.is_created, "set_stream_created called on an already-created source");
        assert!(!state.is_delivering);
        state.is_created = true;
    }

    pub fn on_publish(&self, req: &PublishRequest) -> Result<()> {
        {
            let mut bridge = self.bridge.lock().unwrap();
            if let Some(b) = bridge.as_mut() {
                b.initialize(req)?;
                b.setup_codec(
                    req.audio_codec.as_deref().unwrap_or(DEFAULT_AUDIO_CODEC),
                    req.video_codec.as_deref().unwrap_or(DEFAULT_VIDEO_CODEC),
                );
                b.on_publish()?;
            }
        }
        {
            let mut state = self.state.lock().unwrap();
            state.is_created = true;
            state.is_delivering = true;
        }
        log::debug!("source {} published", self.stream_url);
        self.notify_stream_changed();
        Ok(())
    }

    pub fn on_unpublish(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.is_created = false;
            state.is_delivering = false;
        }
        log::debug!("source {} unpublished", self.stream_url);
        if let Some(b) = self.bridge.lock().unwrap().as_mut() {
            b.on_unpublish();
        }
        for h in self.handlers.lock().unwrap().iter() {
            h.on_unpublish();
        }
        if self.consumers.lock().unwrap().is_empty() {
            *self.stream_die_at.lock().unwrap() = Some(Instant::now());
        }
    }

    pub fn create_consumer(&self) -> Arc<Consumer> {
        let consumer = Consumer::new();
        self.consumers.lock().unwrap().push(consumer.clone());
        consumer
    }

    pub fn on_consumer_destroy(&self, consumer: &Arc<Consumer>) {
        let now_empty = {
            let mut consumers = self.consumers.lock().unwrap();
            consumers.retain(|c| !Arc::ptr_eq(c, consumer));
            consumers.is_empty()
        };
        if now_empty && self.state.lock().unwrap().is_created {
            for h in self.handlers.lock().unwrap().iter() {
                h.on_consumers_finished();
            }
        }
        if !self.state.lock().unwrap().is_delivering {
            *self.stream_die_at.lock().unwrap() = Some(Instant::now());
        }
    }

    pub fn stream_die_at(&self) -> Option<Instant> {
        *self.stream_die_at.lock().unwrap()
    }

    /// Spec §4.7 fan-out: dying breaker discards, bridge gets first look,
    /// then every consumer gets an independent copy in enqueue order.
    pub fn on_rtp(&self, pkt: &dyn RtpPacket) -> Result<()> {
        if self.circuit_breaker.is_dying() {
            log::warn!("dropping packet on dying source {}", self.stream_url);
            return Ok(());
        }
        if let Some(b) = self.bridge.lock().unwrap().as_mut() {
            b.on_rtp(pkt)?;
        }
        for c in self.consumers.lock().unwrap().iter() {
            c.enqueue(pkt.copy());
        }
        Ok(())
    }

    /// Spec §4.7 source-ID propagation: on the first transition, both
    /// `source_id` and `pre_source_id` become the new context ID (the
    /// latter only while still empty) — documented behavior, not a bug.
    pub fn on_source_changed(&self, context_id: &str) {
        {
            let mut source_id = self.source_id.lock().unwrap();
            if source_id.as_str() != context_id {
                *source_id = context_id.to_string();
                let mut pre = self.pre_source_id.lock().unwrap();
                if pre.is_empty() {
                    *pre = context_id.to_string();
                }
            }
        }
        for c in self.consumers.lock().unwrap().iter() {
            c.update_source_id();
        }
        self.notify_stream_changed();
    }

    fn notify_stream_changed(&self) {
        let desc = self.stream_description.lock().unwrap().clone();
        if let Some(desc) = desc {
            for c in self.consumers.lock().unwrap().iter() {
                c.on_stream_change(&desc);
            }
        }
    }

    /// Idempotent by pointer identity.
    pub fn subscribe(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.lock().unwrap();
        if !handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            handlers.push(handler);
        }
    }

    pub fn unsubscribe(&self, handler: &Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.lock().unwrap();
        if let Some(pos) = handlers.iter().position(|h| Arc::ptr_eq(h, handler)) {
            handlers.remove(pos);
        }
    }

    pub fn get_track_desc(&self, kind: TrackKind, codec: &str) -> Vec<TrackDesc> {
        match self.stream_description.lock().unwrap().as_ref() {
            Some(desc) => desc.get_track_desc(kind, codec),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtc::packet::RawRtpPacket;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        unpublishes: AtomicUsize,
        finishes: AtomicUsize,
    }
    impl EventHandler for CountingHandler {
        fn on_unpublish(&self) {
            self.unpublishes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_consumers_finished(&self) {
            self.finishes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn fan_out_delivers_independent_copies_in_order() {
        let source = Source::new("rtmp://example/live".to_string());
        let a = source.create_consumer();
        let b = source.create_consumer();
        source
            .on_rtp(&RawRtpPacket {
                sequence_number: 7,
                timestamp: 0,
                ssrc: 1,
                payload: vec![1, 2, 3],
            })
            .unwrap();
        assert_eq!(a.dump_packet().unwrap().sequence_number(), 7);
        assert_eq!(b.dump_packet().unwrap().sequence_number(), 7);
    }

    #[test]
    fn dying_breaker_discards_without_error() {
        use crate::rtc::circuit_breaker::WaterLevel;
        let source = Source::new("rtmp://example/live".to_string());
        source.circuit_breaker().set_level(WaterLevel::Dying);
        let c = source.create_consumer();
        source
            .on_rtp(&RawRtpPacket {
                sequence_number: 1,
                timestamp: 0,
                ssrc: 1,
                payload: vec![],
            })
            .unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn unpublish_notifies_handlers_and_marks_die_at_when_no_consumers() {
        let source = Source::new("rtmp://example/live".to_string());
        let handler = Arc::new(CountingHandler {
            unpublishes: AtomicUsize::new(0),
            finishes: AtomicUsize::new(0),
        });
        source.subscribe(handler.clone());
        source.on_unpublish();
        assert_eq!(handler.unpublishes.load(Ordering::SeqCst), 1);
        assert!(source.stream_die_at().is_some());
    }

    #[test]
    fn first_source_changed_sets_both_ids() {
        let source = Source::new("rtmp://example/live".to_string());
        source.on_source_changed("ctx-1");
        assert_eq!(*source.source_id.lock().unwrap(), "ctx-1");
        assert_eq!(*source.pre_source_id.lock().unwrap(), "ctx-1");
        source.on_source_changed("ctx-2");
        assert_eq!(*source.source_id.lock().unwrap(), "ctx-2");
        assert_eq!(*source.pre_source_id.lock().unwrap(), "ctx-1");
    }
}
