use std::collections::HashSet;

use shared::domain::UserId;

use super::*;

fn draft() -> ProjectDraft {
    ProjectDraft::new(UserId::from("user-1"))
}

/// Checks both label invariants over the whole tree.
fn assert_labels(draft: &ProjectDraft) {
    for (position, milestone) in draft.milestones.iter().enumerate() {
        assert_eq!(milestone.label, format!("Milestone {}", position + 1));
        for (todo_position, todo) in milestone.todos.iter().enumerate() {
            assert_eq!(todo.label, format!("To-Do {}", todo_position + 1));
        }
    }
}

#[test]
fn fresh_draft_has_one_blank_milestone_with_one_blank_todo() {
    let draft = draft();

    assert_eq!(draft.name, "");
    assert_eq!(draft.owner_id, UserId::from("user-1"));
    assert_eq!(draft.milestones.len(), 1);

    let milestone = &draft.milestones[0];
    assert_eq!(milestone.label, "Milestone 1");
    assert_eq!(milestone.name, "");
    assert_eq!(milestone.todos.len(), 1);

    let todo = &milestone.todos[0];
    assert_eq!(todo.label, "To-Do 1");
    assert_eq!(todo.name, "");
    assert!(!todo.is_complete);
}

#[test]
fn milestone_labels_follow_positions_through_adds_and_removals() {
    let mut draft = draft();

    for _ in 0..3 {
        draft.add_milestone();
        assert_labels(&draft);
    }
    assert_eq!(draft.milestones.len(), 4);

    draft.remove_milestone(1).expect("index 1 exists");
    assert_labels(&draft);
    assert_eq!(draft.milestones.len(), 3);

    draft.remove_milestone(2).expect("index 2 exists");
    assert_labels(&draft);

    draft.add_milestone();
    assert_labels(&draft);
    assert_eq!(draft.milestones.len(), 3);
}

#[test]
fn todo_labels_follow_positions_within_their_milestone() {
    let mut draft = draft();
    draft.add_milestone();

    draft.add_todo(1).expect("milestone 1 exists");
    draft.add_todo(1).expect("milestone 1 exists");
    assert_eq!(draft.milestones[1].todos.len(), 3);
    assert_labels(&draft);

    draft.remove_todo(1, 0).expect("to-do 0 exists");
    assert_labels(&draft);
    assert_eq!(draft.milestones[1].todos.len(), 2);

    // The sibling milestone's sequence is untouched.
    assert_eq!(draft.milestones[0].todos.len(), 1);
    assert_eq!(draft.milestones[0].todos[0].label, "To-Do 1");
}

#[test]
fn elements_created_back_to_back_get_distinct_keys() {
    let mut draft = draft();
    draft.add_todo(0).expect("milestone 0 exists");
    draft.add_todo(0).expect("milestone 0 exists");
    draft.add_milestone();
    draft.add_milestone();

    let mut keys = HashSet::new();
    for milestone in &draft.milestones {
        assert!(keys.insert(milestone.key), "duplicate milestone key");
        for todo in &milestone.todos {
            assert!(keys.insert(todo.key), "duplicate to-do key");
        }
    }
}

#[test]
fn keys_are_stable_while_labels_reflow() {
    let mut draft = draft();
    draft.add_milestone();
    draft.rename_milestone(1, "Build").expect("milestone 1 exists");
    let surviving_key = draft.milestones[1].key;

    draft.remove_milestone(0).expect("milestone 0 exists");

    let survivor = &draft.milestones[0];
    assert_eq!(survivor.key, surviving_key);
    assert_eq!(survivor.name, "Build");
    assert_eq!(survivor.label, "Milestone 1");
}

#[test]
fn removing_a_milestone_discards_its_todos_and_relabels_survivors() {
    let mut draft = draft();
    draft.add_milestone();
    draft.add_todo(1).expect("milestone 1 exists");
    assert_eq!(draft.milestones[1].todos.len(), 2);

    draft.remove_milestone(0).expect("milestone 0 exists");

    assert_eq!(draft.milestones.len(), 1);
    let survivor = &draft.milestones[0];
    assert_eq!(survivor.label, "Milestone 1");
    assert_eq!(survivor.todos.len(), 2);
    assert_eq!(survivor.todos[0].label, "To-Do 1");
    assert_eq!(survivor.todos[1].label, "To-Do 2");
}

#[test]
fn empty_milestone_persists_after_removing_its_last_todo() {
    let mut draft = draft();

    draft.remove_todo(0, 0).expect("to-do 0 exists");

    // The one-to-do floor holds at creation only; removal may empty it.
    assert_eq!(draft.milestones.len(), 1);
    assert!(draft.milestones[0].todos.is_empty());

    assert_eq!(
        draft.remove_todo(0, 0),
        Err(IndexError::Todo {
            milestone: 0,
            index: 0,
            len: 0,
        })
    );
}

#[test]
fn added_milestone_always_starts_with_one_todo() {
    let mut draft = draft();
    draft.remove_todo(0, 0).expect("to-do 0 exists");

    draft.add_milestone();

    assert!(draft.milestones[0].todos.is_empty());
    assert_eq!(draft.milestones[1].todos.len(), 1);
    assert_eq!(draft.milestones[1].todos[0].label, "To-Do 1");
}

#[test]
fn out_of_bounds_indices_are_rejected_without_mutation() {
    let mut draft = draft();
    let before = draft.clone();

    assert_eq!(
        draft.remove_milestone(5),
        Err(IndexError::Milestone { index: 5, len: 1 })
    );
    assert_eq!(
        draft.add_todo(2),
        Err(IndexError::Milestone { index: 2, len: 1 })
    );
    assert_eq!(
        draft.remove_todo(0, 9),
        Err(IndexError::Todo {
            milestone: 0,
            index: 9,
            len: 1,
        })
    );
    assert_eq!(
        draft.rename_milestone(3, "x"),
        Err(IndexError::Milestone { index: 3, len: 1 })
    );
    assert_eq!(
        draft.rename_todo(1, 0, "x"),
        Err(IndexError::Milestone { index: 1, len: 1 })
    );
    assert_eq!(
        draft.set_todo_complete(0, 1, true),
        Err(IndexError::Todo {
            milestone: 0,
            index: 1,
            len: 1,
        })
    );

    assert_eq!(draft, before);
}

#[test]
fn setters_are_idempotent_and_preserve_labels() {
    let mut draft = draft();

    draft.rename_project("Apollo");
    draft.rename_milestone(0, "Design").expect("milestone 0 exists");
    draft.rename_todo(0, 0, "Outline").expect("to-do 0 exists");
    draft.set_todo_complete(0, 0, true).expect("to-do 0 exists");
    let once = draft.clone();

    draft.rename_project("Apollo");
    draft.rename_milestone(0, "Design").expect("milestone 0 exists");
    draft.rename_todo(0, 0, "Outline").expect("to-do 0 exists");
    draft.set_todo_complete(0, 0, true).expect("to-do 0 exists");

    assert_eq!(draft, once);
    assert_labels(&draft);
}

#[test]
fn set_owner_replaces_the_owner_only() {
    let mut draft = draft();
    draft.rename_project("Apollo");

    draft.set_owner(UserId::from("user-2"));

    assert_eq!(draft.owner_id, UserId::from("user-2"));
    assert_eq!(draft.name, "Apollo");
    assert_eq!(draft.milestones.len(), 1);
}

#[test]
fn relabel_passes_assign_positional_labels() {
    let mut milestones = vec![Milestone::blank(), Milestone::blank(), Milestone::blank()];
    for milestone in &mut milestones {
        milestone.label = "stale".to_string();
        for todo in &mut milestone.todos {
            todo.label = "stale".to_string();
        }
    }

    relabel_milestones(&mut milestones);
    for milestone in &mut milestones {
        relabel_todos(&mut milestone.todos);
    }

    assert_eq!(milestones[0].label, "Milestone 1");
    assert_eq!(milestones[1].label, "Milestone 2");
    assert_eq!(milestones[2].label, "Milestone 3");
    assert_eq!(milestones[0].todos[0].label, "To-Do 1");
}

#[test]
fn surviving_milestone_relabels_after_leading_removal() {
    // Two milestones, second with two to-dos; removing the first renumbers
    // everything that survives.
    let mut draft = draft();
    draft.add_milestone();
    draft.add_todo(1).expect("milestone 1 exists");

    draft.remove_milestone(0).expect("milestone 0 exists");

    assert_eq!(draft.milestones.len(), 1);
    assert_eq!(draft.milestones[0].label, "Milestone 1");
    let labels: Vec<&str> = draft.milestones[0]
        .todos
        .iter()
        .map(|todo| todo.label.as_str())
        .collect();
    assert_eq!(labels, ["To-Do 1", "To-Do 2"]);
}
