mod task_board;
mod task_poller;

pub use task_board::*;
pub use task_poller::*;
