use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Set};

use crate::entities::{robot, Robot};

const SAMPLE_ROBOTS: [(&str, bool); 5] = [
    ("Invoice Processor", true),
    ("Customer Onboarding Bot", true),
    ("Data Extractor", false),
    ("Email Classifier", true),
    ("Report Generator", false),
];

/// Inserts the sample fleet when the table is empty. Returns how many robots
/// were inserted.
pub async fn seed_robots(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let existing = Robot::find().count(db).await?;
    if existing > 0 {
        tracing::info!("Database already has {} robots, skipping seed", existing);
        return Ok(0);
    }

    // insert_many skips ActiveModelBehavior, so timestamps are set here.
    let now = chrono::Utc::now().naive_utc();
    let models = SAMPLE_ROBOTS.iter().map(|(name, status)| robot::ActiveModel {
        name: Set(name.to_string()),
        status: Set(*status),
        alert: Set(None),
        priority: Set(robot::Priority::default()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    });
    Robot::insert_many(models).exec(db).await?;

    tracing::info!("Seeded {} sample robots", SAMPLE_ROBOTS.len());
    Ok(SAMPLE_ROBOTS.len() as u64)
}

/// Deletes every robot. Returns the number of rows removed.
pub async fn clear_robots(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let result = Robot::delete_many().exec(db).await?;
    tracing::info!("Cleared {} robots", result.rows_affected);
    Ok(result.rows_affected)
}
