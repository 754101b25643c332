//! Task descriptor tests for tt-core

use core::cell::Cell;
use tt_core::{Task, TaskCounter, TaskDescriptor};

struct Counter {
    runs: u32,
}

impl Task for Counter {
    fn run(&mut self) {
        self.runs += 1;
    }
}

#[test]
fn test_descriptor_biases_initial_delay() {
    let mut task = || {};
    let desc = TaskDescriptor::new(&mut task, 3, 5);
    assert_eq!(desc.delay(), TaskCounter::new(4));
    assert_eq!(desc.period(), TaskCounter::new(5));
}

#[test]
fn test_zero_delay_fires_on_first_tick() {
    let runs = Cell::new(0);
    let mut task = || runs.set(runs.get() + 1);
    let mut desc = TaskDescriptor::new(&mut task, 0, 4);

    assert!(desc.release());
    assert_eq!(desc.delay(), TaskCounter::new(4));
    assert_eq!(runs.get(), 1);
}

#[test]
fn test_release_reloads_period() {
    let runs = Cell::new(0);
    let mut task = || runs.set(runs.get() + 1);
    let mut desc = TaskDescriptor::new(&mut task, 2, 3);

    let fired: Vec<bool> = (0..9).map(|_| desc.release()).collect();
    assert_eq!(
        fired,
        [false, false, true, false, false, true, false, false, true]
    );
    assert_eq!(runs.get(), 3);
}

#[test]
fn test_struct_task() {
    let mut counter = Counter { runs: 0 };
    {
        let mut desc = TaskDescriptor::new(&mut counter, 0, 1);
        for _ in 0..5 {
            assert!(desc.release());
        }
    }
    assert_eq!(counter.runs, 5);
}

fn plain_task() {}

#[test]
fn test_fn_item_task() {
    let mut handle = plain_task;
    let mut desc = TaskDescriptor::new(&mut handle, 1, 2);
    assert!(!desc.release());
    assert!(desc.release());
}
