//! Raw record decoding
//!
//! Turns producer records into [`TraceEvent`]s: syscall numbers become
//! names, raw argument registers become typed values, sample stacks are
//! truncated to their valid depth. Malformed records (impossible depth)
//! are counted and skipped; nothing on this path propagates an error into
//! the session.

use log::warn;

use strobe_common::{SampleRecord, SyscallRecord, MAX_STACK_DEPTH};

use super::KernelRecord;
use crate::event::{TraceEvent, TypedValue};

/// Well-known Linux syscall numbers (x86_64 ABI)
///
/// Unknown numbers render as `sys_<number>`; the table only needs to cover
/// what shows up in ordinary traces.
const SYSCALL_NAMES: &[(u64, &str)] = &[
    (0, "read"),
    (1, "write"),
    (2, "open"),
    (3, "close"),
    (4, "stat"),
    (5, "fstat"),
    (8, "lseek"),
    (9, "mmap"),
    (11, "munmap"),
    (12, "brk"),
    (16, "ioctl"),
    (17, "pread64"),
    (18, "pwrite64"),
    (22, "pipe"),
    (23, "select"),
    (28, "madvise"),
    (32, "dup"),
    (35, "nanosleep"),
    (39, "getpid"),
    (41, "socket"),
    (42, "connect"),
    (43, "accept"),
    (44, "sendto"),
    (45, "recvfrom"),
    (56, "clone"),
    (57, "fork"),
    (59, "execve"),
    (60, "exit"),
    (61, "wait4"),
    (72, "fcntl"),
    (74, "fsync"),
    (78, "getdents"),
    (79, "getcwd"),
    (83, "mkdir"),
    (87, "unlink"),
    (89, "readlink"),
    (96, "gettimeofday"),
    (202, "futex"),
    (228, "clock_gettime"),
    (230, "clock_nanosleep"),
    (231, "exit_group"),
    (257, "openat"),
    (262, "newfstatat"),
    (281, "epoll_pwait"),
    (318, "getrandom"),
];

/// Resolve a syscall number to its conventional name
#[must_use]
pub fn syscall_name(number: u64) -> String {
    SYSCALL_NAMES
        .iter()
        .find(|&&(n, _)| n == number)
        .map_or_else(|| format!("sys_{number}"), |&(_, name)| name.to_string())
}

/// Stateful decoder tracking how many records it had to skip
#[derive(Debug, Default)]
pub struct RecordDecoder {
    skipped: u64,
}

impl RecordDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records skipped as malformed so far
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Decode one record; `None` means it was malformed and counted
    pub fn decode(&mut self, record: KernelRecord) -> Option<TraceEvent> {
        match record {
            KernelRecord::Sample(sample) => self.decode_sample(&sample),
            KernelRecord::Syscall(syscall) => Some(Self::decode_syscall(&syscall)),
        }
    }

    fn decode_sample(&mut self, sample: &SampleRecord) -> Option<TraceEvent> {
        if sample.depth as usize > MAX_STACK_DEPTH {
            self.skipped += 1;
            warn!(
                "skipping malformed sample record: depth {} exceeds {}",
                sample.depth, MAX_STACK_DEPTH
            );
            return None;
        }
        Some(TraceEvent::Sample {
            instruction_pointer: sample.ip,
            stack: sample.frames().to_vec(),
            thread_id: sample.tid,
            timestamp_ns: sample.timestamp_ns,
            parent_function: None,
        })
    }

    fn decode_syscall(syscall: &SyscallRecord) -> TraceEvent {
        TraceEvent::Syscall {
            number: syscall.number,
            name: syscall_name(syscall.number),
            args: syscall.args.iter().map(|&arg| TypedValue::uint(arg)).collect(),
            return_value: syscall.return_value,
            duration_ns: syscall.duration_ns,
            timestamp_ns: syscall.timestamp_ns,
            pid: syscall.pid,
            tid: syscall.tid,
            parent_function: None,
        }
    }
}
