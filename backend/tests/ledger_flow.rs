use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use chore_tracker_backend::domain::calendar::FixedClock;
use chore_tracker_backend::domain::commands::chores::ToggleTaskCommand;
use chore_tracker_backend::domain::commands::redemption::RedeemRewardCommand;
use chore_tracker_backend::domain::{points, seed_data, ChoreError, PointsError};
use chore_tracker_backend::storage::{
    CompletionStorage, Connection, Connectivity, CsvConnection, StorageConfig,
};
use chore_tracker_backend::{Backend, TrackerConfig};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn backend_on(dir: &TempDir, day: &str) -> Backend<CsvConnection> {
    let connection = CsvConnection::new_local(dir.path()).unwrap();
    seed_data(&connection).unwrap();
    Backend::new(connection, Arc::new(FixedClock::on_date(date(day))), 5)
}

#[test]
fn test_a_week_of_chores() {
    let dir = TempDir::new().unwrap();
    let backend = backend_on(&dir, "2024-01-01");

    let eli = backend
        .child_service
        .list_children()
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Eli")
        .unwrap();
    let tasks = backend.catalog_service.list_tasks().unwrap();
    let math = tasks.iter().find(|t| t.title == "Do math workbook").unwrap();
    let dishes = tasks.iter().find(|t| t.title == "Put away dishes").unwrap();

    for task in [math, dishes] {
        backend
            .chore_service
            .toggle_task(ToggleTaskCommand {
                kid_id: eli.id.clone(),
                task_id: task.id.clone(),
                date: date("2024-01-01"),
                completed: true,
            })
            .unwrap();
    }

    // Next day, reopen on the same files with a new clock
    let backend = backend_on(&dir, "2024-01-02");
    let yesterday = backend.chore_service.day_view(&eli.id, date("2024-01-01")).unwrap();
    assert!(!yesterday.editable);
    assert_eq!(yesterday.tasks.iter().filter(|t| t.completed).count(), 2);

    let late = backend.chore_service.toggle_task(ToggleTaskCommand {
        kid_id: eli.id.clone(),
        task_id: math.id.clone(),
        date: date("2024-01-01"),
        completed: false,
    });
    assert!(matches!(
        late.unwrap_err().downcast_ref::<ChoreError>(),
        Some(ChoreError::DateNotEditable { .. })
    ));

    backend
        .chore_service
        .toggle_task(ToggleTaskCommand {
            kid_id: eli.id.clone(),
            task_id: math.id.clone(),
            date: date("2024-01-02"),
            completed: true,
        })
        .unwrap();

    let eli = backend.child_service.get_child(&eli.id).unwrap().unwrap();
    assert_eq!(eli.points, 50 + 10 + 7 + 10);

    // The ledger alone accounts for everything earned on top of the opening balance
    let ledger = backend.connection.create_completion_repository().load_completion_ledger().unwrap();
    assert_eq!(points::recalc(&eli, &tasks, &ledger), 27);

    let stats = backend.chore_service.weekly_stats().unwrap();
    let eli_week = stats.iter().find(|s| s.kid_id == eli.id).unwrap();
    assert_eq!(eli_week.week_points, 27);
    assert!(stats.iter().filter(|s| s.kid_id != eli.id).all(|s| s.week_points == 0));

    // Spend, then fail to overspend
    let rewards = backend.catalog_service.list_rewards().unwrap();
    let game = rewards.iter().find(|r| r.label == "30 min Game Time").unwrap();
    let redeemed = backend
        .redemption_service
        .redeem(RedeemRewardCommand {
            kid_id: eli.id.clone(),
            reward_id: game.id.clone(),
        })
        .unwrap();
    assert_eq!(redeemed.child.points, 47);

    backend
        .redemption_service
        .redeem(RedeemRewardCommand {
            kid_id: eli.id.clone(),
            reward_id: game.id.clone(),
        })
        .unwrap();
    let broke = backend.redemption_service.redeem(RedeemRewardCommand {
        kid_id: eli.id.clone(),
        reward_id: game.id.clone(),
    });
    assert!(broke.unwrap_err().downcast_ref::<PointsError>().is_some());
    assert_eq!(backend.redemption_service.recent_redemptions(&eli.id).unwrap().len(), 2);

    // Clearing today takes back only today's 10 points
    let cleared = backend.chore_service.clear_today(&eli.id).unwrap();
    assert_eq!(cleared.points_removed, 10);
    assert_eq!(cleared.child.points, 7);

    backend.chore_service.new_week().unwrap();
    let eli = backend.child_service.get_child(&eli.id).unwrap().unwrap();
    assert_eq!(eli.points, 7);
    assert!(backend
        .chore_service
        .weekly_stats()
        .unwrap()
        .iter()
        .all(|s| s.week_points == 0));
}

#[test]
fn test_shared_directory_fallback() {
    let local = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    let missing = shared.path().join("not-mounted");

    let connection = CsvConnection::new(
        StorageConfig::local(local.path()).with_shared_directory(&missing),
    )
    .unwrap();
    assert_eq!(connection.connectivity(), Connectivity::Offline);
    assert_eq!(connection.data_directory(), local.path());

    let online = CsvConnection::new(
        StorageConfig::local(local.path()).with_shared_directory(shared.path()),
    )
    .unwrap();
    assert_eq!(online.connectivity(), Connectivity::Online);
    assert_eq!(online.data_directory(), shared.path());
}

#[test]
fn test_open_from_config_seeds_once() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.yaml");
    let mut config = TrackerConfig::load_from_path(&config_path).unwrap();
    config.storage = StorageConfig::local(dir.path().join("data"));
    config.save_to_path(&config_path).unwrap();

    let config = TrackerConfig::load_from_path(&config_path).unwrap();
    let backend = Backend::open(&config).unwrap();
    assert_eq!(backend.child_service.list_children().unwrap().len(), 3);

    let backend = Backend::open(&config).unwrap();
    assert_eq!(backend.child_service.list_children().unwrap().len(), 3);
    assert_eq!(backend.catalog_service.list_rewards().unwrap().len(), 3);
}
