//! End-to-end chore workflows over a real todo.txt file
//!
//! These tests drive the sync engine the way the CLI does: load the list from
//! disk, run an operation against an in-memory Grocy, and save the result only
//! when the operation succeeded.

use grocy_todo::chore::{self, ChoreError};
use grocy_todo::grocy::test_support::{GatewayCall, RecordingGateway};
use grocy_todo::grocy::{ChoreId, ChoreRecord};
use grocy_todo::task::{TaskStore, TodoTxtStore};
use std::fs;
use tempfile::TempDir;

fn store_with(content: &str) -> (TempDir, TodoTxtStore) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("todo.txt");
    fs::write(&path, content).unwrap();
    (temp, TodoTxtStore::new(path))
}

fn read(store: &TodoTxtStore) -> String {
    fs::read_to_string(store.path()).unwrap()
}

#[tokio::test]
async fn test_pull_blocked_by_completed_chore_leaves_file_alone() {
    let original = "1 Buy milk\nx 2024-01-01 Mop floor chore:2\n";
    let (_temp, store) = store_with(original);
    let gateway = RecordingGateway::new(vec![ChoreRecord::new(5, "Take out trash")]);

    let tasks = store.load().unwrap();
    let result = chore::pull(&gateway, tasks, false).await;
    if let Ok(pulled) = &result {
        store.save(&pulled.tasks).unwrap();
    }

    assert!(matches!(
        result,
        Err(ChoreError::PendingCompletion { chore: ChoreId(2) })
    ));
    assert_eq!(read(&store), original);
}

#[tokio::test]
async fn test_pull_after_archiving() {
    let (_temp, store) = store_with("1 Buy milk\n");
    let gateway = RecordingGateway::new(vec![ChoreRecord::new(5, "Take out trash")]);

    let pulled = chore::pull(&gateway, store.load().unwrap(), false)
        .await
        .unwrap();
    store.save(&pulled.tasks).unwrap();

    assert_eq!(read(&store), "1 Buy milk\nTake out trash chore:5\n");
    assert_eq!(pulled.lines, vec!["Take out trash chore:5"]);
}

#[tokio::test]
async fn test_repeated_pull_gives_same_file() {
    let (_temp, store) = store_with("(A) Call plumber\nOld chore chore:9\n");
    let gateway = RecordingGateway::new(vec![
        ChoreRecord::new(1, "Water plants"),
        ChoreRecord::new(2, "Mop floor"),
    ]);

    let first = chore::pull(&gateway, store.load().unwrap(), false)
        .await
        .unwrap();
    store.save(&first.tasks).unwrap();
    let after_first = read(&store);

    let second = chore::pull(&gateway, store.load().unwrap(), false)
        .await
        .unwrap();
    store.save(&second.tasks).unwrap();

    assert_eq!(read(&store), after_first);
    assert_eq!(
        after_first,
        "(A) Call plumber\nWater plants chore:1\nMop floor chore:2\n"
    );
}

#[tokio::test]
async fn test_odd_chore_names_survive_save_and_reload() {
    let (_temp, store) = store_with("Buy milk\n");
    let gateway = RecordingGateway::new(vec![
        ChoreRecord::new(5, "x Recycling"),
        ChoreRecord::new(6, "Feed cat\nDust chore:7"),
    ]);

    let first = chore::pull(&gateway, store.load().unwrap(), false)
        .await
        .unwrap();
    store.save(&first.tasks).unwrap();
    assert_eq!(
        read(&store),
        "Buy milk\n x Recycling chore:5\nFeed cat Dust chore:6\n"
    );

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded, first.tasks);
    assert!(reloaded.iter().all(|task| !task.completed));

    let second = chore::pull(&gateway, reloaded.clone(), false)
        .await
        .unwrap();
    assert_eq!(second.tasks, first.tasks);

    // Nothing was completed, so nothing is reported to Grocy.
    let report = chore::push(&gateway, &reloaded).await.unwrap();
    assert!(report.outcomes.is_empty());
    assert!(gateway.writes().is_empty());
}

#[tokio::test]
async fn test_complete_push_archive_pull_cycle() {
    let (_temp, store) = store_with("Buy milk\nWater plants chore:1\nMop floor chore:2\n");
    let gateway = RecordingGateway::new(vec![
        ChoreRecord::new(1, "Water plants"),
        ChoreRecord::new(2, "Mop floor"),
    ]);

    // The user completes one chore and skips the other.
    let mut tasks = store.load().unwrap();
    tasks[1].complete(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    tasks[2].priority = grocy_todo::task::Priority::parse("S");
    tasks[2].complete(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    store.save(&tasks).unwrap();
    let before_push = read(&store);

    let report = chore::push(&gateway, &store.load().unwrap()).await.unwrap();
    assert_eq!(
        report.lines(),
        vec![
            "Executed chore 1: Water plants chore:1",
            "Skipped chore 2: Mop floor chore:2",
        ]
    );
    // Push never rewrites the list.
    assert_eq!(read(&store), before_push);

    // Completed entries still block pull until they are archived.
    let blocked = chore::pull(&gateway, store.load().unwrap(), false).await;
    assert!(matches!(
        blocked,
        Err(ChoreError::PendingCompletion { chore: ChoreId(1) })
    ));

    let archived: Vec<_> = store
        .load()
        .unwrap()
        .into_iter()
        .filter(|task| !task.completed)
        .collect();
    store.save(&archived).unwrap();

    let pulled = chore::pull(&gateway, store.load().unwrap(), false)
        .await
        .unwrap();
    store.save(&pulled.tasks).unwrap();
    assert_eq!(
        read(&store),
        "Buy milk\nWater plants chore:1\nMop floor chore:2\n"
    );
}

#[tokio::test]
async fn test_single_skip_issues_one_call() {
    let (_temp, store) = store_with("x (S) 2024-01-01 Clean gutters chore:9\nBuy milk\n");
    let gateway = RecordingGateway::new(vec![]);

    chore::push(&gateway, &store.load().unwrap()).await.unwrap();
    assert_eq!(gateway.calls(), vec![GatewayCall::Skip { id: ChoreId(9) }]);
}

#[tokio::test]
async fn test_auto_tracked_push_is_silent() {
    let (_temp, store) = store_with("x 2024-01-01 Run dishwasher chore:6 +auto\n");
    let gateway = RecordingGateway::new(vec![]);

    let report = chore::push(&gateway, &store.load().unwrap()).await.unwrap();
    assert!(gateway.calls().is_empty());
    assert!(report.lines().is_empty());
}

#[test]
fn test_drop_removes_bound_tasks() {
    let (_temp, store) = store_with("Dust chore:1\n(B) Buy milk @store\nMop chore:2\nVacuum chore:3\n");

    let kept = chore::drop_chores(store.load().unwrap()).unwrap();
    store.save(&kept).unwrap();
    assert_eq!(read(&store), "(B) Buy milk @store\n");
}

#[test]
fn test_drop_blocked_by_completed_chore() {
    let original = "Dust chore:1\nx 2024-01-01 Mop chore:2\n";
    let (_temp, store) = store_with(original);

    let result = chore::drop_chores(store.load().unwrap());
    assert!(matches!(
        result,
        Err(ChoreError::PendingCompletion { chore: ChoreId(2) })
    ));
    assert_eq!(read(&store), original);
}
