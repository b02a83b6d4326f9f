//! Cross-source correlation
//!
//! Replays the merged stream once, maintaining an explicit per-thread call
//! stack from `FunctionEnter`/`FunctionExit` events (push on enter, pop on
//! exit). Every `Syscall` and `Sample` is attributed to the function frame
//! open on its thread at its timestamp.
//!
//! No open frame is a valid, expected outcome (the syscall happened outside
//! any traced function, or inside an un-instrumented library): the parent
//! stays `None`. One linear pass; O(depth) state per thread.

use std::collections::HashMap;

use crate::event::TraceEvent;

/// Attach `parent_function` to syscalls and samples in a merged stream
pub fn attach_parents(events: &mut [TraceEvent]) {
    let mut stacks: HashMap<u32, Vec<String>> = HashMap::new();

    for event in events.iter_mut() {
        match event {
            TraceEvent::FunctionEnter { name, thread_id, .. } => {
                stacks.entry(*thread_id).or_default().push(name.clone());
            }
            TraceEvent::FunctionExit { name, thread_id, .. } => {
                if let Some(stack) = stacks.get_mut(thread_id) {
                    // Pop back to the named frame; frames above it were
                    // unwound without their exits reaching the stream.
                    if let Some(pos) = stack.iter().rposition(|frame| frame == name) {
                        stack.truncate(pos);
                    }
                }
            }
            TraceEvent::Syscall { tid, parent_function, .. } => {
                *parent_function = stacks.get(tid).and_then(|stack| stack.last().cloned());
            }
            TraceEvent::Sample { thread_id, parent_function, .. } => {
                *parent_function = stacks.get(thread_id).and_then(|stack| stack.last().cloned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SourceLocation;

    fn enter(name: &str, ts: u64, tid: u32) -> TraceEvent {
        TraceEvent::function_enter(name, vec![], SourceLocation::new("t.x", 1, 1), ts, tid)
    }

    fn exit(name: &str, ts: u64, tid: u32) -> TraceEvent {
        TraceEvent::function_exit(name, None, 0, ts, tid)
    }

    fn syscall(name: &str, ts: u64, tid: u32) -> TraceEvent {
        TraceEvent::Syscall {
            number: 0,
            name: name.to_string(),
            args: vec![],
            return_value: 0,
            duration_ns: 0,
            timestamp_ns: ts,
            pid: 1,
            tid,
            parent_function: None,
        }
    }

    fn parent_of(event: &TraceEvent) -> Option<&str> {
        match event {
            TraceEvent::Syscall { parent_function, .. }
            | TraceEvent::Sample { parent_function, .. } => parent_function.as_deref(),
            _ => panic!("event has no parent_function"),
        }
    }

    #[test]
    fn test_syscalls_attach_to_enclosing_function() {
        let mut events = vec![
            enter("write_file", 100, 1),
            syscall("open", 110, 1),
            syscall("write", 120, 1),
            exit("write_file", 130, 1),
            syscall("close", 200, 1),
        ];
        attach_parents(&mut events);

        assert_eq!(parent_of(&events[1]), Some("write_file"));
        assert_eq!(parent_of(&events[2]), Some("write_file"));
        // After the matching exit, no frame is open
        assert_eq!(parent_of(&events[4]), None);
    }

    #[test]
    fn test_nested_frames_attach_to_innermost() {
        let mut events = vec![
            enter("outer", 10, 1),
            enter("inner", 20, 1),
            syscall("read", 30, 1),
            exit("inner", 40, 1),
            syscall("read", 50, 1),
            exit("outer", 60, 1),
        ];
        attach_parents(&mut events);

        assert_eq!(parent_of(&events[2]), Some("inner"));
        assert_eq!(parent_of(&events[4]), Some("outer"));
    }

    #[test]
    fn test_threads_track_independent_stacks() {
        let mut events = vec![
            enter("t1_fn", 10, 1),
            enter("t2_fn", 15, 2),
            syscall("read", 20, 1),
            syscall("read", 25, 2),
        ];
        attach_parents(&mut events);

        assert_eq!(parent_of(&events[2]), Some("t1_fn"));
        assert_eq!(parent_of(&events[3]), Some("t2_fn"));
    }

    #[test]
    fn test_samples_attach_like_syscalls() {
        let mut events = vec![
            enter("hot", 10, 1),
            TraceEvent::Sample {
                instruction_pointer: 0x42,
                stack: vec![0x42],
                thread_id: 1,
                timestamp_ns: 20,
                parent_function: None,
            },
            exit("hot", 30, 1),
        ];
        attach_parents(&mut events);
        assert_eq!(parent_of(&events[1]), Some("hot"));
    }

    #[test]
    fn test_unwound_frames_are_discarded_on_exit() {
        // "panicked" never exits; the exit of "outer" pops past it
        let mut events = vec![
            enter("outer", 10, 1),
            enter("panicked", 20, 1),
            exit("outer", 30, 1),
            syscall("write", 40, 1),
        ];
        attach_parents(&mut events);
        assert_eq!(parent_of(&events[3]), None);
    }

    #[test]
    fn test_syscall_outside_any_frame_gets_none() {
        let mut events = vec![syscall("open", 10, 1)];
        attach_parents(&mut events);
        assert_eq!(parent_of(&events[0]), None);
    }
}
