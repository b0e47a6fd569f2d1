mod task;

pub use task::{NEVER_DONE_SENTINEL, Task, TaskStatus};
