//! Interrupt-to-main receive byte queue
//!
//! On hardware the serial receive interrupt is the only producer and the
//! main loop the only consumer, so the hand-off is a bounded
//! single-producer/single-consumer queue. The split ends own their side of
//! the head/tail indices; no further locking is required on a single-core
//! part, which is this device's equivalent of a disable-interrupts critical
//! section around a shared buffer.
//!
//! A port typically calls [`RxQueue::split`] at startup, moves the producer
//! into the receive ISR, and implements its transport's `read_byte` as a
//! dequeue on the consumer. Bytes arriving while the queue is full are
//! dropped; at command-line rates the 32-byte depth outruns any human or
//! scripted sender between polls.

use heapless::spsc::{Consumer, Producer, Queue};

/// Queue depth in bytes
pub const RX_QUEUE_CAPACITY: usize = 32;

/// The shared receive queue
pub type RxQueue = Queue<u8, RX_QUEUE_CAPACITY>;

/// Interrupt-side handle: push received bytes
pub type RxProducer<'a> = Producer<'a, u8, RX_QUEUE_CAPACITY>;

/// Main-loop-side handle: drain bytes into the dispatcher
pub type RxConsumer<'a> = Consumer<'a, u8, RX_QUEUE_CAPACITY>;
