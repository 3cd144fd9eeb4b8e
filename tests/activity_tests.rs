mod common;
use common::{register, test_app};

use absensi::db::activities::ActivityStore;
use absensi::db::log::load_log;
use absensi::errors::AppError;
use absensi::models::activity::{ActivityRequest, DateRangeRequest};
use absensi::utils::date;
use chrono::{Duration, NaiveDate};

fn req(text: &str) -> ActivityRequest {
    ActivityRequest {
        description: text.into(),
    }
}

#[test]
fn owner_can_update_and_delete() {
    let app = test_app();
    let owner = register(&app, "Rina", "rina@example.com");

    let added = app.state.activities.add(owner.id, &req("rapat pagi")).unwrap();
    assert!(added.updated_at.is_none());

    let updated = app
        .state
        .activities
        .update(added.id, owner.id, &req("rapat siang"))
        .unwrap();
    assert_eq!(updated.description, "rapat siang");
    assert!(updated.updated_at.is_some());

    app.state.activities.delete(added.id, owner.id).unwrap();

    let store = ActivityStore::new(app.pool.clone());
    assert!(matches!(store.find_by_id(added.id), Err(AppError::NotFound)));

    let ops: Vec<String> = app
        .pool
        .with_conn(|conn| load_log(conn))
        .unwrap()
        .into_iter()
        .map(|r| r.operation)
        .collect();
    for op in ["activity_add", "activity_update", "activity_delete"] {
        assert!(ops.iter().any(|o| o == op), "no {} row in the audit log", op);
    }
}

#[test]
fn foreign_update_and_delete_are_unauthorized_and_change_nothing() {
    let app = test_app();
    let owner = register(&app, "Rina", "rina@example.com");
    let intruder = register(&app, "Joko", "joko@example.com");

    let added = app.state.activities.add(owner.id, &req("laporan")).unwrap();

    let upd = app
        .state
        .activities
        .update(added.id, intruder.id, &req("diubah"));
    assert!(matches!(upd, Err(AppError::Unauthorized)));

    let del = app.state.activities.delete(added.id, intruder.id);
    assert!(matches!(del, Err(AppError::Unauthorized)));

    let store = ActivityStore::new(app.pool.clone());
    let still = store.find_by_id(added.id).unwrap();
    assert_eq!(still.description, "laporan");
    assert!(still.updated_at.is_none());
}

#[test]
fn missing_activity_is_not_found() {
    let app = test_app();
    let owner = register(&app, "Rina", "rina@example.com");

    let upd = app.state.activities.update(4242, owner.id, &req("x"));
    assert!(matches!(upd, Err(AppError::NotFound)));
    let del = app.state.activities.delete(4242, owner.id);
    assert!(matches!(del, Err(AppError::NotFound)));
}

#[test]
fn history_without_to_runs_until_today_in_ascending_order() {
    let app = test_app();
    let owner = register(&app, "Rina", "rina@example.com");
    let other = register(&app, "Joko", "joko@example.com");
    let store = ActivityStore::new(app.pool.clone());

    let now = date::now();
    let today_noon = date::today().and_hms_opt(12, 0, 0).unwrap();
    let three_days_ago = now - Duration::days(3);
    let yesterday = now - Duration::days(1);
    let tomorrow = now + Duration::days(1);
    let long_ago = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    store.create(owner.id, "hari ini", &today_noon).unwrap();
    store.create(owner.id, "besok", &tomorrow).unwrap();
    store.create(owner.id, "kemarin", &yesterday).unwrap();
    store.create(owner.id, "tiga hari lalu", &three_days_ago).unwrap();
    store.create(owner.id, "dulu sekali", &long_ago).unwrap();
    store.create(other.id, "bukan milik saya", &yesterday).unwrap();

    let from = date::date_to_db(&(date::today() - Duration::days(7)));
    let rows = app
        .state
        .activities
        .history(owner.id, &DateRangeRequest { from, to: None })
        .unwrap();

    let texts: Vec<&str> = rows.iter().map(|a| a.description.as_str()).collect();
    assert_eq!(texts, ["tiga hari lalu", "kemarin", "hari ini"]);
}

#[test]
fn history_starting_today_includes_today_only() {
    let app = test_app();
    let owner = register(&app, "Rina", "rina@example.com");
    let store = ActivityStore::new(app.pool.clone());

    let now = date::now();
    store.create(owner.id, "sekarang", &now).unwrap();
    store.create(owner.id, "besok", &(now + Duration::days(1))).unwrap();

    let rows = app
        .state
        .activities
        .history(
            owner.id,
            &DateRangeRequest {
                from: date::date_to_db(&date::today()),
                to: None,
            },
        )
        .unwrap();

    let texts: Vec<&str> = rows.iter().map(|a| a.description.as_str()).collect();
    assert_eq!(texts, ["sekarang"]);
}

#[test]
fn history_requires_from() {
    let app = test_app();
    let owner = register(&app, "Rina", "rina@example.com");

    let res = app.state.activities.history(
        owner.id,
        &DateRangeRequest {
            from: String::new(),
            to: None,
        },
    );
    assert!(matches!(res, Err(AppError::BadRequest(_))));
}
