//! Integration tests for the repository layer.
//!
//! Exercises every repository against a real database:
//! - Project/task CRUD and ordering
//! - Cascade delete behaviour
//! - Foreign key violations
//! - OAuth upsert idempotency

use assert_matches::assert_matches;
use ordo_core::date::NullableDate;
use ordo_db::models::project::CreateProject;
use ordo_db::models::task::CreateTask;
use ordo_db::models::user::{CreateUser, UpsertOAuthUser};
use ordo_db::repositories::{ProjectRepo, TaskRepo, UserRepo};
use ordo_db::DbError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(s: &str) -> NullableDate {
    NullableDate::parse(s).unwrap()
}

fn new_project(title: &str) -> CreateProject {
    CreateProject {
        title: title.to_string(),
        ..Default::default()
    }
}

fn new_task(project_id: i64, title: &str, start: &str) -> CreateTask {
    CreateTask {
        project_id,
        title: title.to_string(),
        description: String::new(),
        start_date: date(start),
        finish_date: NullableDate::empty(),
    }
}

fn oauth_user(google_id: &str, name: &str, picture: &str) -> UpsertOAuthUser {
    UpsertOAuthUser {
        google_id: google_id.to_string(),
        email: format!("{google_id}@example.com"),
        name: name.to_string(),
        picture: Some(picture.to_string()),
        verified_email: true,
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_dates_round_trip_through_storage(pool: PgPool) {
    let input = CreateProject {
        title: "Launch".to_string(),
        start_date: date("2025-01-01"),
        finish_date: NullableDate::empty(),
    };
    let project = ProjectRepo::create(&pool, &input).await.unwrap();

    assert_eq!(project.start_date, date("2025-01-01"));
    assert!(project.finish_date.is_empty());

    let fetched = ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.start_date, project.start_date);
    assert_eq!(fetched.finish_date, project.finish_date);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_replaces_all_fields(pool: PgPool) {
    let input = CreateProject {
        title: "Before".to_string(),
        start_date: date("2025-01-01"),
        finish_date: date("2025-02-01"),
    };
    let project = ProjectRepo::create(&pool, &input).await.unwrap();

    let updated = ProjectRepo::update(&pool, project.id, &new_project("After"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id, project.id);
    assert_eq!(updated.title, "After");
    assert!(updated.start_date.is_empty());
    assert!(updated.finish_date.is_empty());
    assert_eq!(updated.created_at, project.created_at);
    assert!(updated.updated_at >= project.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_project_id(pool: PgPool) {
    assert!(ProjectRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
    assert!(ProjectRepo::update(&pool, 999_999, &new_project("x"))
        .await
        .unwrap()
        .is_none());
    assert!(!ProjectRepo::delete(&pool, 999_999).await.unwrap());
    assert!(!ProjectRepo::exists(&pool, 999_999).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_projects_listed_newest_first(pool: PgPool) {
    let first = ProjectRepo::create(&pool, &new_project("First")).await.unwrap();
    let second = ProjectRepo::create(&pool, &new_project("Second")).await.unwrap();

    let projects = ProjectRepo::list(&pool).await.unwrap();
    let ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

// ---------------------------------------------------------------------------
// Project with tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_with_tasks_orders_by_start_date_nulls_last(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Ordered")).await.unwrap();
    let undated = TaskRepo::create(&pool, &new_task(project.id, "Undated", ""))
        .await
        .unwrap();
    let late = TaskRepo::create(&pool, &new_task(project.id, "Late", "2025-03-01"))
        .await
        .unwrap();
    let early = TaskRepo::create(&pool, &new_task(project.id, "Early", "2025-01-01"))
        .await
        .unwrap();

    let loaded = ProjectRepo::find_with_tasks(&pool, project.id).await.unwrap();
    assert_eq!(loaded.project.id, project.id);

    let ids: Vec<i64> = loaded.tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![early.id, late.id, undated.id]);

    let listed = TaskRepo::list_by_project(&pool, project.id).await.unwrap();
    let listed_ids: Vec<i64> = listed.iter().map(|t| t.id).collect();
    assert_eq!(listed_ids, ids);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_with_tasks_missing_project(pool: PgPool) {
    let result = ProjectRepo::find_with_tasks(&pool, 424_242).await;
    assert_matches!(result, Err(DbError::NotFound { entity: "Project" }));
}

// ---------------------------------------------------------------------------
// Cascade delete and referential integrity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cascade_delete_project(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Cascade")).await.unwrap();
    let task_a = TaskRepo::create(&pool, &new_task(project.id, "A", ""))
        .await
        .unwrap();
    let task_b = TaskRepo::create(&pool, &new_task(project.id, "B", ""))
        .await
        .unwrap();

    assert_eq!(TaskRepo::count_for_project(&pool, project.id).await.unwrap(), 2);

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());

    assert!(TaskRepo::find_by_id(&pool, task_a.id).await.unwrap().is_none());
    assert!(TaskRepo::find_by_id(&pool, task_b.id).await.unwrap().is_none());
    assert_eq!(TaskRepo::count_for_project(&pool, project.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_tasks_for_project(pool: PgPool) {
    let keep = ProjectRepo::create(&pool, &new_project("Keep")).await.unwrap();
    let clear = ProjectRepo::create(&pool, &new_project("Clear")).await.unwrap();
    TaskRepo::create(&pool, &new_task(keep.id, "Stays", "")).await.unwrap();
    TaskRepo::create(&pool, &new_task(clear.id, "Goes 1", "")).await.unwrap();
    TaskRepo::create(&pool, &new_task(clear.id, "Goes 2", "")).await.unwrap();

    let removed = TaskRepo::delete_for_project(&pool, clear.id).await.unwrap();
    assert_eq!(removed, 2);

    assert!(ProjectRepo::exists(&pool, clear.id).await.unwrap());
    assert_eq!(TaskRepo::count_for_project(&pool, clear.id).await.unwrap(), 0);
    assert_eq!(TaskRepo::count_for_project(&pool, keep.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_with_tasks_counts_removed_tasks(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Wrap up")).await.unwrap();
    let other = ProjectRepo::create(&pool, &new_project("Other")).await.unwrap();
    TaskRepo::create(&pool, &new_task(project.id, "A", "")).await.unwrap();
    TaskRepo::create(&pool, &new_task(project.id, "B", "")).await.unwrap();
    TaskRepo::create(&pool, &new_task(other.id, "C", "")).await.unwrap();

    let removed = ProjectRepo::delete_with_tasks(&pool, project.id).await.unwrap();
    assert_eq!(removed, Some(2));
    assert!(!ProjectRepo::exists(&pool, project.id).await.unwrap());
    assert_eq!(TaskRepo::count_for_project(&pool, other.id).await.unwrap(), 1);

    assert_eq!(ProjectRepo::delete_with_tasks(&pool, project.id).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_with_tasks_accounts_for_concurrent_insert(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &new_project("Busy")).await.unwrap();
    TaskRepo::create(&pool, &new_task(project.id, "Existing", "")).await.unwrap();

    let late = new_task(project.id, "Late", "");
    let (removed, inserted) = tokio::join!(
        ProjectRepo::delete_with_tasks(&pool, project.id),
        TaskRepo::create(&pool, &late),
    );

    // Either the insert landed first and was counted, or it lost the race
    // and hit the foreign key.
    let removed = removed.unwrap().unwrap();
    match inserted {
        Ok(_) => assert_eq!(removed, 2),
        Err(err) => {
            assert!(err.is_foreign_key_violation(), "got {err:?}");
            assert_eq!(removed, 1);
        }
    }
    assert_eq!(TaskRepo::count_for_project(&pool, project.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_with_unknown_project_is_fk_violation(pool: PgPool) {
    let err = TaskRepo::create(&pool, &new_task(999_999, "Orphan", ""))
        .await
        .unwrap_err();
    assert!(err.is_foreign_key_violation(), "got {err:?}");
    assert_eq!(err.constraint(), Some("fk_tasks_project_id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_can_move_between_projects(pool: PgPool) {
    let from = ProjectRepo::create(&pool, &new_project("From")).await.unwrap();
    let to = ProjectRepo::create(&pool, &new_project("To")).await.unwrap();
    let task = TaskRepo::create(&pool, &new_task(from.id, "Mover", "2025-01-01"))
        .await
        .unwrap();

    let moved = TaskRepo::update(&pool, task.id, &new_task(to.id, "Mover", "2025-01-02"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.project_id, to.id);
    assert_eq!(moved.start_date, date("2025-01-02"));
    assert!(!TaskRepo::delete(&pool, 999_999).await.unwrap());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_users_listed_by_id(pool: PgPool) {
    let a = UserRepo::create(
        &pool,
        &CreateUser {
            email: "a@example.com".into(),
            name: "A".into(),
        },
    )
    .await
    .unwrap();
    let b = UserRepo::create(
        &pool,
        &CreateUser {
            email: "b@example.com".into(),
            name: "B".into(),
        },
    )
    .await
    .unwrap();

    assert!(a.google_id.is_none());
    assert!(!a.verified_email);

    let ids: Vec<i64> = UserRepo::list(&pool)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec![a.id, b.id]);

    assert!(UserRepo::delete(&pool, a.id).await.unwrap());
    assert!(!UserRepo::delete(&pool, a.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_is_idempotent_on_google_id(pool: PgPool) {
    let first = UserRepo::upsert_by_google_id(&pool, &oauth_user("g-123", "Ada", "a.png"))
        .await
        .unwrap();
    let second = UserRepo::upsert_by_google_id(&pool, &oauth_user("g-123", "Ada L.", "b.png"))
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.name, "Ada L.");
    assert_eq!(second.picture.as_deref(), Some("b.png"));
    assert!(second.updated_at >= first.updated_at);

    assert_eq!(UserRepo::list(&pool).await.unwrap().len(), 1);
    let found = UserRepo::find_by_google_id(&pool, "g-123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_upserts_resolve_to_one_row(pool: PgPool) {
    let a = oauth_user("g-race", "One", "1.png");
    let b = oauth_user("g-race", "Two", "2.png");
    let (left, right) = tokio::join!(
        UserRepo::upsert_by_google_id(&pool, &a),
        UserRepo::upsert_by_google_id(&pool, &b),
    );

    assert_eq!(left.unwrap().id, right.unwrap().id);
    assert_eq!(UserRepo::list(&pool).await.unwrap().len(), 1);
}
