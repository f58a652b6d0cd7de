use anyhow::Result;
use log::info;

use chore_tracker_backend::domain::calendar::format_date_key;
use chore_tracker_backend::domain::points;
use chore_tracker_backend::storage::CompletionStorage;
use chore_tracker_backend::storage::Connection;
use chore_tracker_backend::{Backend, TrackerConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrackerConfig::load()?;
    let backend = Backend::open(&config)?;

    let today = backend.chore_service.today();
    info!(
        "Using {} ({})",
        backend.connection.data_directory().display(),
        backend.connection.connectivity()
    );

    let ledger = backend.connection.create_completion_repository().load_completion_ledger()?;
    let tasks = backend.catalog_service.list_tasks()?;
    let stats = backend.chore_service.weekly_stats()?;

    println!("Chore chart for {}", format_date_key(today));
    for child in backend.child_service.list_children()? {
        let done = points::today_completions(&child.id, &ledger, today);
        let checked: Vec<&str> = points::tasks_for_child(&tasks, &child.id)
            .into_iter()
            .filter(|task| done.get(&task.id).copied().unwrap_or(false))
            .map(|task| task.title.as_str())
            .collect();
        let week_points = stats
            .iter()
            .find(|stat| stat.kid_id == child.id)
            .map(|stat| stat.week_points)
            .unwrap_or(0);

        println!(
            "{} {}: {} points ({} this week)",
            child.avatar.as_deref().unwrap_or("-"),
            child.name,
            child.points,
            week_points
        );
        if checked.is_empty() {
            println!("    nothing checked today");
        } else {
            println!("    done today: {}", checked.join(", "));
        }
    }

    Ok(())
}
