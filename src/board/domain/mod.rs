//! Domain model for board task reordering.
//!
//! Everything here is synchronous and free of I/O: task values, the order
//! index model, the drop resolver, and the grouping used by board and list
//! presentations.

mod bucket;
mod error;
mod ids;
mod order;
mod resolver;
mod status;
mod task;

pub use bucket::{BoardColumn, BoardView, GroupedList, ListRow, bucket_of};
pub use error::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{ContainerId, TaskId};
pub use order::{ORDER_STEP, OrderIndex, TaskPatch, TaskUpdate, append_order, reindex};
pub use resolver::{DragEnd, DropTarget, resolve_drop};
pub use status::{TaskPriority, TaskStatus};
pub use task::{PersistedTaskData, Task, TaskDetails};
