//! RTC source/consumer subsystem (spec §4.7-§4.9, §5). Maps the spec's
//! cooperative-coroutine scheduling model onto `std::sync::{Mutex,
//! Condvar, Arc}`: each public method here runs to completion between the
//! wait points spec §5 calls out (`consumer.wait`, the bridge calls inside
//! `on_publish`), so within one call the critical sections are exactly the
//! lock scopes below.

pub mod bridge;
pub mod circuit_breaker;
pub mod consumer;
pub mod handler;
pub mod manager;
pub mod packet;
pub mod source;
pub mod track;

pub use bridge::{Bridge, PublishRequest};
pub use circuit_breaker::{CircuitBreaker, WaterLevel};
pub use consumer::{Consumer, StreamChangeHandler};
pub use handler::EventHandler;
pub use manager::SourceManager;
pub use packet::{RawRtpPacket, RtpPacket};
pub use source::Source;
pub use track::{StreamDescription, TrackDesc, TrackKind};
