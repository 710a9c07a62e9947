//! Deferred task queue for idle processing.
//!
//! Tasks can be posted to run during idle time when no other events are
//! pending. The overlay uses this to defer work out of input handlers (for
//! example, opening an assignment window after the click that requested it
//! has finished dispatching).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// The deferred task queue.
pub(crate) struct TaskQueue {
    tasks: VecDeque<TaskData>,
    /// Maximum number of tasks to process per idle cycle.
    batch_size: usize,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: 10,
        }
    }

    pub fn post<F>(&mut self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.tasks.push_back(TaskData {
            id,
            task: Box::new(task),
        });
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Process up to `batch_size` tasks, returning how many ran.
    pub fn process_batch(&mut self) -> usize {
        let count = self.tasks.len().min(self.batch_size);
        for _ in 0..count {
            if let Some(task_data) = self.tasks.pop_front() {
                (task_data.task)();
            }
        }
        count
    }

    #[cfg(test)]
    pub fn process_all(&mut self) -> usize {
        let count = self.tasks.len();
        while let Some(task_data) = self.tasks.pop_front() {
            (task_data.task)();
        }
        count
    }
}

/// Thread-safe wrapper for use from the application.
pub(crate) struct SharedTaskQueue {
    inner: Mutex<TaskQueue>,
}

impl SharedTaskQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TaskQueue::new()),
        }
    }

    pub fn post<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.lock().post(task)
    }

    pub fn cancel(&self, id: TaskId) -> bool {
        self.inner.lock().cancel(id)
    }

    pub fn has_pending(&self) -> bool {
        self.inner.lock().has_pending()
    }

    pub fn process_batch(&self) -> usize {
        self.inner.lock().process_batch()
    }
}
