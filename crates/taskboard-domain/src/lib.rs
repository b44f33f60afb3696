pub mod board_state;
pub mod collision;
pub mod drag;
pub mod focus;
pub mod metrics;
pub mod order;
pub mod preferences;
pub mod sort;
pub mod status;
pub mod task;
pub mod transport;

pub use board_state::{derive_board_state, BoardState, ColumnState};
pub use collision::{
    detect_collisions, resolve_drop_target, Collision, CollisionInput, CollisionStrategy,
    DropTargetId, Droppable, Point, Rect,
};
pub use drag::{DragController, DragSession, DragState, DropOutcome, TransitionRequest};
pub use focus::apply_focus;
pub use metrics::{compute_metrics, BoardMetrics, MetricWindows};
pub use order::{apply_manual_order, merge_order, OrderLedger};
pub use preferences::{Density, FocusMode, Preferences};
pub use status::{normalize_status, normalize_status_str, BoardStatus, TaskStatus};
pub use task::{parse_task_list, Task, TaskId, TaskPriority};
pub use transport::TaskTransport;
