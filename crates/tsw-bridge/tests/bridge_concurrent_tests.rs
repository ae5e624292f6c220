//! 传输线程与帧线程并发测试
//!
//! 多个传输线程持续写入，帧线程（当前测试线程）持续 tick，验证：
//! - 入队的命令不会丢失（每个控件最终值是其写入者的最后一个值）
//! - 合并只会减少写入次数，不会增加

mod common;

use common::FakeHost;
use crossbeam_channel::unbounded;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tsw_bridge::host::ControlCapability;
use tsw_bridge::{BridgeBuilder, TickOutcome};
use tsw_protocol::SyncControlMessage;

#[test]
fn test_producers_and_frame_thread_interleave() {
    let (tx, _rx) = unbounded::<SyncControlMessage>();
    let (inbound, frame) = BridgeBuilder::new().sink(tx).build().unwrap();

    let writers = 4;
    let per_writer = 2_000;
    let mut host = FakeHost::new();
    for w in 0..writers {
        host = host.control(&format!("Lever{w}"), ControlCapability::Continuous);
    }

    let finished = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let inbound = inbound.clone();
            let finished = finished.clone();
            thread::spawn(move || {
                for i in 1..=per_writer {
                    inbound.on_message_received(&format!("direct_control,Lever{w},{i}"));
                    if i % 100 == 0 {
                        thread::yield_now();
                    }
                }
                finished.fetch_add(1, Ordering::Release);
            })
        })
        .collect();

    let mut ticks = 0usize;
    let mut applied = 0usize;
    loop {
        let done = finished.load(Ordering::Acquire) == writers;
        match frame.tick(&host) {
            TickOutcome::Applied(report) => applied += report.applied,
            TickOutcome::Idle if done => break,
            TickOutcome::Idle => thread::yield_now(),
            TickOutcome::Discarded { reason, .. } => panic!("unexpected discard: {reason}"),
        }
        ticks += 1;
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for w in 0..writers {
        assert_eq!(host.value(&format!("Lever{w}")), Some(per_writer as f32));
    }

    let metrics = frame.metrics();
    assert_eq!(metrics.commands_enqueued, (writers * per_writer) as u64);
    assert_eq!(
        metrics.applies + metrics.commands_superseded,
        metrics.commands_enqueued
    );
    assert!(applied <= writers * per_writer);
    assert!(ticks > 0);
}

#[test]
fn test_inbound_from_many_threads_counts_every_message() {
    let (tx, _rx) = unbounded::<SyncControlMessage>();
    let (inbound, frame) = BridgeBuilder::new().sink(tx).build().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let inbound = inbound.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    if i % 5 == 0 {
                        inbound.on_message_received("garbage");
                    } else {
                        inbound.on_message_received(&format!("direct_control,C{t},{i}"));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = frame.metrics();
    assert_eq!(metrics.messages_received, 2_000);
    assert_eq!(metrics.messages_rejected, 400);
    assert_eq!(frame.queue().len(), 1_600);
}
