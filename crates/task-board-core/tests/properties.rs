//! Property tests for board mutations and view derivation.

use proptest::prelude::*;

use task_board_core::{
    BoardState, PriorityFilter, Priority, TaskDraft, TaskFilter, TaskId, TaskStatus, TaskUpdate,
};

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Todo),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Done),
    ]
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
}

fn draft_strategy() -> impl Strategy<Value = TaskDraft> {
    (
        "[a-zA-Z ]{1,12}",
        proptest::option::of("[a-zA-Z ]{0,16}"),
        status_strategy(),
        priority_strategy(),
    )
        .prop_map(|(title, description, status, priority)| {
            let draft = TaskDraft::new(title)
                .with_status(status)
                .with_priority(priority);
            match description {
                Some(text) => draft.with_description(text),
                None => draft,
            }
        })
}

fn board_from(drafts: Vec<TaskDraft>) -> (BoardState, Vec<TaskId>) {
    let mut board = BoardState::new();
    let ids = drafts.into_iter().map(|draft| board.add_task(draft)).collect();
    (board, ids)
}

fn ids(board: &BoardState) -> Vec<TaskId> {
    board.tasks().iter().map(|task| task.id).collect()
}

/// True when `sub` appears in `full` in the same relative order.
fn is_subsequence(sub: &[TaskId], full: &[TaskId]) -> bool {
    let mut rest = full.iter();
    sub.iter().all(|id| rest.any(|candidate| candidate == id))
}

proptest! {
    #[test]
    fn ids_stay_unique(drafts in prop::collection::vec(draft_strategy(), 0..32)) {
        let (board, added) = board_from(drafts);
        let mut sorted = added.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), added.len());
        prop_assert_eq!(ids(&board), added);
    }

    #[test]
    fn add_then_delete_restores_board(
        drafts in prop::collection::vec(draft_strategy(), 0..16),
        extra in draft_strategy(),
    ) {
        let (mut board, _) = board_from(drafts);
        let before = board.clone();
        let id = board.add_task(extra);
        prop_assert!(board.delete_task(id));
        prop_assert_eq!(board, before);
    }

    #[test]
    fn update_is_idempotent(
        drafts in prop::collection::vec(draft_strategy(), 1..16),
        pick in any::<prop::sample::Index>(),
        status in status_strategy(),
        priority in priority_strategy(),
    ) {
        let (mut board, added) = board_from(drafts);
        let id = added[pick.index(added.len())];
        let update = TaskUpdate {
            status: Some(status),
            priority: Some(priority),
            ..TaskUpdate::default()
        };
        board.update_task(id, &update);
        let once = board.clone();
        prop_assert!(!board.update_task(id, &update));
        prop_assert_eq!(board, once);
    }

    #[test]
    fn reorder_yields_exactly_the_given_order(
        drafts in prop::collection::vec(draft_strategy(), 0..16)
            .prop_flat_map(|drafts| {
                let len = drafts.len();
                (Just(drafts), Just((0..len).collect::<Vec<_>>()).prop_shuffle())
            }),
    ) {
        let (drafts, permutation) = drafts;
        let (mut board, added) = board_from(drafts);
        let order: Vec<TaskId> = permutation.iter().map(|&idx| added[idx]).collect();
        board
            .reorder_tasks(&order)
            .unwrap_or_else(|err| panic!("permutation rejected: {err}"));
        prop_assert_eq!(ids(&board), order);
    }

    #[test]
    fn clear_completed_removes_only_done(drafts in prop::collection::vec(draft_strategy(), 0..32)) {
        let (mut board, _) = board_from(drafts);
        let before = board.tasks().len();
        let expected: Vec<TaskId> = board
            .tasks()
            .iter()
            .filter(|task| task.status != TaskStatus::Done)
            .map(|task| task.id)
            .collect();
        let removed = board.clear_completed_tasks();
        prop_assert_eq!(before - removed, expected.len());
        prop_assert_eq!(ids(&board), expected);
    }

    #[test]
    fn narrowing_the_query_never_grows_the_visible_set(
        drafts in prop::collection::vec(draft_strategy(), 0..24),
        query in "[a-z]{0,3}",
        suffix in "[a-z]{1,2}",
        priority in prop_oneof![Just(PriorityFilter::All), priority_strategy().prop_map(PriorityFilter::Only)],
    ) {
        let (board, _) = board_from(drafts);
        let broad = TaskFilter::new(query.clone(), priority);
        let narrow = TaskFilter::new(format!("{query}{suffix}"), priority);
        let broad_view = board.view_with(&broad);
        let narrow_view = board.view_with(&narrow);
        let broad_ids: Vec<TaskId> = broad_view.visible().iter().map(|task| task.id).collect();
        let narrow_ids: Vec<TaskId> = narrow_view.visible().iter().map(|task| task.id).collect();
        prop_assert!(is_subsequence(&narrow_ids, &broad_ids));
        prop_assert!(is_subsequence(&broad_ids, &ids(&board)));
    }

    #[test]
    fn empty_filter_shows_every_task_in_order(drafts in prop::collection::vec(draft_strategy(), 0..24)) {
        let (board, _) = board_from(drafts);
        let view = board.view_with(&TaskFilter::new("", PriorityFilter::All));
        let visible: Vec<TaskId> = view.visible().iter().map(|task| task.id).collect();
        prop_assert_eq!(visible, ids(&board));
    }

    #[test]
    fn columns_partition_the_visible_set(
        drafts in prop::collection::vec(draft_strategy(), 0..24),
        query in "[a-z]{0,2}",
    ) {
        let (board, _) = board_from(drafts);
        let view = board.view_with(&TaskFilter::new(query, PriorityFilter::All));
        let counted: usize = TaskStatus::ALL.iter().map(|status| view.count(*status)).sum();
        prop_assert_eq!(counted, view.total());
        let mut from_columns = Vec::new();
        for (status, tasks) in view.columns() {
            prop_assert!(tasks.iter().all(|task| task.status == status));
            from_columns.extend(tasks.iter().map(|task| task.id));
        }
        let mut visible: Vec<TaskId> = view.visible().iter().map(|task| task.id).collect();
        from_columns.sort();
        visible.sort();
        prop_assert_eq!(from_columns, visible);
    }
}
