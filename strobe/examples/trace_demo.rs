//! End-to-end demo: traced workload + synthetic kernel record producer.
//!
//! Spawns a few worker threads whose functions are traced through the hook
//! entry points, feeds syscall/sample records through a channel-backed
//! source standing in for the kernel producer, then finalizes and writes
//! the JSON artifact, the text trace, and folded flame-graph data.
//!
//! Run with: `cargo run --example trace_demo`

use std::thread;

use strobe::export::{write_folded, TextFormatter};
use strobe::source::{ChannelSource, KernelRecord};
use strobe::{
    rank_hotspots, FlameGraph, SourceLocation, Tid, TraceConfig, TraceEvent, TraceSession,
    TypedValue,
};
use strobe_common::{SampleRecord, SyscallRecord, MAX_STACK_DEPTH};

fn sample_record(tid: u32, ts: u64, addrs: &[u64]) -> SampleRecord {
    let mut stack = [0u64; MAX_STACK_DEPTH];
    stack[..addrs.len()].copy_from_slice(addrs);
    SampleRecord {
        pid: std::process::id(),
        tid,
        timestamp_ns: ts,
        ip: addrs.first().copied().unwrap_or(0),
        depth: addrs.len() as u32,
        _padding: 0,
        stack,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = TraceConfig { output_path: "trace.json".to_string(), ..TraceConfig::default() };
    let mut session = TraceSession::new("trace_demo", config.clone())?;

    // Stand-in for the kernel-side producer: records delivered over a
    // channel, with a lost-record counter the producer bumps on overflow.
    let (record_tx, record_rx) = crossbeam_channel::unbounded();
    let (source, _lost) = ChannelSource::new(record_rx);
    session.attach_source(Box::new(source));

    let mut handles = Vec::new();
    for tid in 1..=3u32 {
        let mut ctx = session.register_thread(Tid(tid));
        let record_tx = record_tx.clone();
        handles.push(thread::spawn(move || {
            for i in 0..10u64 {
                strobe::hooks::function_enter(
                    &mut ctx,
                    "process_batch",
                    vec![TypedValue::uint(i)],
                    SourceLocation::new("demo.x", 14, 5),
                );

                // Pretend the kernel observed a write and a CPU sample here
                let now = ctx.now_ns();
                record_tx
                    .send(KernelRecord::Syscall(SyscallRecord {
                        pid: std::process::id(),
                        tid,
                        number: 1,
                        args: [1, 0, 64, 0, 0, 0],
                        return_value: 64,
                        timestamp_ns: now,
                        duration_ns: 2_000,
                    }))
                    .ok();
                record_tx
                    .send(KernelRecord::Sample(sample_record(tid, now, &[0x30, 0x20, 0x10])))
                    .ok();

                strobe::hooks::function_exit(&mut ctx, "process_batch", Some(TypedValue::uint(i * 2)));
            }
        }));
    }
    drop(record_tx);
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let trace = session.finalize()?;
    println!(
        "captured {} events ({} dropped, {} kernel records lost)",
        trace.stats.total_events, trace.stats.dropped_events, trace.stats.lost_kernel_records
    );

    // Structured artifact
    strobe::export::write_artifact(&trace, &config)?;

    // Text trace to stdout
    TextFormatter.write_stream(&trace.events, std::io::stdout().lock())?;

    // Flame graph from the sample events, via a toy resolver
    let resolver = |addr: u64| match addr {
        0x10 => Some("main".to_string()),
        0x20 => Some("run_workers".to_string()),
        0x30 => Some("process_batch".to_string()),
        _ => None,
    };
    let mut flame = FlameGraph::new();
    for event in &trace.events {
        if let TraceEvent::Sample { stack, .. } = event {
            flame.record_sample(stack, &resolver);
        }
    }
    write_folded(&flame, std::fs::File::create("profile.folded")?)?;

    for hotspot in rank_hotspots(&flame, 5) {
        println!(
            "{:>6.2}%  {} ({} samples)",
            hotspot.percentage_of_total, hotspot.name, hotspot.sample_count
        );
    }

    Ok(())
}
