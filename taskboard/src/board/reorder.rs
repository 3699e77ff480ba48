//! Drag-and-drop reorder engine.
//!
//! [`compute_reorder`] is a pure function from the current collection and a
//! drag-end event to the collection after the move. It never fails: every
//! gesture that cannot be applied (dropped outside a card, onto itself, or
//! naming a task that no longer exists) is a no-op.

use taskboard_proto::{Status, Task, TaskId};

use super::columns::column_indices;

/// A completed drag: `active` was released over `over`, if over any card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    /// The dragged task.
    pub active: TaskId,
    /// The task under the pointer at release.
    pub over: Option<TaskId>,
}

impl DragEnd {
    /// `active` dropped onto `over`.
    #[must_use]
    pub const fn onto(active: TaskId, over: TaskId) -> Self {
        Self {
            active,
            over: Some(over),
        }
    }

    /// `active` dropped outside any card.
    #[must_use]
    pub const fn nowhere(active: TaskId) -> Self {
        Self { active, over: None }
    }
}

/// Which columns a move touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Reordered within one column.
    SameColumn,
    /// Moved into another column.
    CrossColumn {
        /// Column the task left.
        from: Status,
    },
}

/// Result of a drag that changes the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reorder {
    /// The full collection after the move, in the input's element order.
    pub tasks: Vec<Task>,
    /// The moved task with its new `status` and `order`.
    pub moved: Task,
    /// Which columns were touched.
    pub kind: MoveKind,
}

/// Computes the collection after `drag`, or `None` if the drag is a no-op.
///
/// Same column: the dragged task is removed from its slot and reinserted at
/// the slot of the task it was dropped on (shifting, not swapping), and the
/// column is renumbered `0..n`.
///
/// Across columns: the dragged task takes the target's status and is placed
/// at the front of the destination column, which is then renumbered `0..n`.
/// The source column keeps its numbers, gap included, until its next
/// reorder or a reload.
///
/// Tasks outside the renumbered column are returned unchanged.
#[must_use]
pub fn compute_reorder(tasks: &[Task], drag: DragEnd) -> Option<Reorder> {
    let over = drag.over.filter(|&over| over != drag.active)?;
    let active_idx = tasks.iter().position(|t| t.id == drag.active)?;
    let over_idx = tasks.iter().position(|t| t.id == over)?;

    let source = tasks[active_idx].status;
    let target = tasks[over_idx].status;
    let mut next = tasks.to_vec();

    let kind = if source == target {
        let mut slots = column_indices(&next, target);
        let from = slots.iter().position(|&i| i == active_idx)?;
        let to = slots.iter().position(|&i| i == over_idx)?;
        let dragged = slots.remove(from);
        slots.insert(to, dragged);
        renumber(&mut next, &slots);
        MoveKind::SameColumn
    } else {
        next[active_idx].status = target;
        next[active_idx].order = 0;
        let mut slots: Vec<usize> = next
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == target)
            .map(|(i, _)| i)
            .collect();
        // The dragged task wins ties at its tentative front position.
        slots.sort_by_key(|&i| (next[i].order, i != active_idx, i));
        renumber(&mut next, &slots);
        MoveKind::CrossColumn { from: source }
    };

    let moved = next[active_idx].clone();
    Some(Reorder {
        tasks: next,
        moved,
        kind,
    })
}

/// Assigns `order = position` to the tasks at `slots`.
fn renumber(tasks: &mut [Task], slots: &[usize]) {
    for (order, &i) in (0u32..).zip(slots) {
        tasks[i].order = order;
    }
}
