//! In-memory project draft: a project with ordered milestones, each with an
//! ordered list of to-dos.
//!
//! Positions are authoritative and labels derive from them. Every mutation
//! runs to completion and leaves labels consistent before returning, so a
//! caller can never observe a half-relabeled tree.

use serde::Serialize;
use shared::domain::{DraftKey, UserId};
use thiserror::Error;

/// A structural index outside the current bounds. This is a wiring defect in
/// the caller, not user input, so it is reported rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("milestone index {index} out of bounds ({len} milestones)")]
    Milestone { index: usize, len: usize },
    #[error("to-do index {index} out of bounds (milestone {milestone} has {len} to-dos)")]
    Todo {
        milestone: usize,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToDo {
    pub key: DraftKey,
    pub name: String,
    pub is_complete: bool,
    pub label: String,
}

impl ToDo {
    fn blank() -> Self {
        Self {
            key: DraftKey::fresh(),
            name: String::new(),
            is_complete: false,
            label: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub key: DraftKey,
    pub name: String,
    pub label: String,
    pub todos: Vec<ToDo>,
}

impl Milestone {
    /// A new milestone starts with one blank to-do already in place.
    fn blank() -> Self {
        Self {
            key: DraftKey::fresh(),
            name: String::new(),
            label: String::new(),
            todos: vec![ToDo::blank()],
        }
    }
}

/// The draft tree a host edits and eventually submits.
///
/// Fields are public for rendering; hosts mutate through the methods so the
/// label invariants hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    pub owner_id: UserId,
    pub milestones: Vec<Milestone>,
}

pub fn milestone_label(position: usize) -> String {
    format!("Milestone {}", position + 1)
}

pub fn todo_label(position: usize) -> String {
    format!("To-Do {}", position + 1)
}

/// Rewrites every milestone label from its position.
pub fn relabel_milestones(milestones: &mut [Milestone]) {
    for (position, milestone) in milestones.iter_mut().enumerate() {
        milestone.label = milestone_label(position);
    }
}

/// Rewrites every to-do label in one milestone's sequence from its position.
pub fn relabel_todos(todos: &mut [ToDo]) {
    for (position, todo) in todos.iter_mut().enumerate() {
        todo.label = todo_label(position);
    }
}

impl ProjectDraft {
    /// A fresh draft: unnamed, owned by `owner_id`, with one blank milestone
    /// holding one blank to-do.
    pub fn new(owner_id: UserId) -> Self {
        let mut draft = Self {
            name: String::new(),
            owner_id,
            milestones: Vec::new(),
        };
        draft.add_milestone();
        draft
    }

    /// Appends a blank milestone (with its initial to-do) and relabels.
    pub fn add_milestone(&mut self) {
        self.milestones.push(Milestone::blank());
        relabel_milestones(&mut self.milestones);
        if let Some(added) = self.milestones.last_mut() {
            relabel_todos(&mut added.todos);
        }
    }

    /// Removes the milestone at `index` along with all of its to-dos, then
    /// relabels every remaining milestone and every remaining to-do sequence.
    pub fn remove_milestone(&mut self, index: usize) -> Result<(), IndexError> {
        self.check_milestone(index)?;
        self.milestones.remove(index);
        relabel_milestones(&mut self.milestones);
        for milestone in &mut self.milestones {
            relabel_todos(&mut milestone.todos);
        }
        Ok(())
    }

    /// Appends a blank to-do to the milestone at `milestone_index`.
    pub fn add_todo(&mut self, milestone_index: usize) -> Result<(), IndexError> {
        self.check_milestone(milestone_index)?;
        let milestone = &mut self.milestones[milestone_index];
        milestone.todos.push(ToDo::blank());
        relabel_todos(&mut milestone.todos);
        Ok(())
    }

    /// Removes one to-do and relabels that milestone's sequence. Removal does
    /// not restore the one-to-do floor: a milestone may end up empty and is
    /// carried through submission that way.
    pub fn remove_todo(
        &mut self,
        milestone_index: usize,
        todo_index: usize,
    ) -> Result<(), IndexError> {
        self.check_todo(milestone_index, todo_index)?;
        let milestone = &mut self.milestones[milestone_index];
        milestone.todos.remove(todo_index);
        relabel_todos(&mut milestone.todos);
        Ok(())
    }

    pub fn rename_project(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_owner(&mut self, owner_id: UserId) {
        self.owner_id = owner_id;
    }

    pub fn rename_milestone(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), IndexError> {
        self.check_milestone(index)?;
        self.milestones[index].name = name.into();
        Ok(())
    }

    pub fn rename_todo(
        &mut self,
        milestone_index: usize,
        todo_index: usize,
        name: impl Into<String>,
    ) -> Result<(), IndexError> {
        self.check_todo(milestone_index, todo_index)?;
        self.milestones[milestone_index].todos[todo_index].name = name.into();
        Ok(())
    }

    pub fn set_todo_complete(
        &mut self,
        milestone_index: usize,
        todo_index: usize,
        is_complete: bool,
    ) -> Result<(), IndexError> {
        self.check_todo(milestone_index, todo_index)?;
        self.milestones[milestone_index].todos[todo_index].is_complete = is_complete;
        Ok(())
    }

    fn check_milestone(&self, index: usize) -> Result<(), IndexError> {
        let len = self.milestones.len();
        if index >= len {
            return Err(IndexError::Milestone { index, len });
        }
        Ok(())
    }

    fn check_todo(&self, milestone_index: usize, todo_index: usize) -> Result<(), IndexError> {
        self.check_milestone(milestone_index)?;
        let len = self.milestones[milestone_index].todos.len();
        if todo_index >= len {
            return Err(IndexError::Todo {
                milestone: milestone_index,
                index: todo_index,
                len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
