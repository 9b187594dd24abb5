// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Synchronization and session flow tests against the in-memory remote.

use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trackfit::db::remote::{daily_stats_path, goals_path, user_path, DailyStatsDocument, RemoteStore};
use trackfit::db::MemoryRemoteStore;
use trackfit::models::{DailyEntry, Goals, Profile};
use trackfit::services::{SessionService, SyncOutcome};
use trackfit::time_utils::{date_key, today};

mod common;
use common::{test_sync, TestSync};

const UID: &str = "user-123";

fn sample_profile() -> Profile {
    Profile {
        name: "Alex".to_string(),
        age: 33,
        height: 182,
        weight: 79.5,
        gender: "male".to_string(),
    }
}

fn session_for(t: &TestSync) -> SessionService {
    SessionService::new(
        t.identity.clone(),
        t.stores.local.clone(),
        t.stores.prefs.clone(),
        t.sync.clone(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// UNAUTHENTICATED
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_signed_out_operations_never_touch_remote() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), None);
    t.stores
        .local
        .save_daily_data(DailyEntry {
            steps: 1,
            calories: 2,
            active_time: 3,
        })
        .unwrap();

    assert_eq!(t.sync.push_goals().await, SyncOutcome::Skipped);
    assert_eq!(t.sync.push_profile(&sample_profile()).await, SyncOutcome::Skipped);
    assert_eq!(t.sync.pull_profile().await, SyncOutcome::Skipped);
    assert_eq!(t.sync.push_today_metrics().await, SyncOutcome::Skipped);
    assert_eq!(t.sync.pull_goals().await, SyncOutcome::Skipped);
    assert_eq!(t.sync.pull_all_metrics().await, SyncOutcome::Skipped);

    let called = AtomicBool::new(false);
    let outcome = t.sync.wipe_remote(|| called.store(true, Ordering::SeqCst)).await;
    assert_eq!(outcome, SyncOutcome::Skipped);
    assert!(!called.load(Ordering::SeqCst));

    assert_eq!(t.remote.call_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// PUSH / PULL
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_goals_round_trip_between_devices() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let phone = test_sync(remote.clone(), Some(UID));
    let tablet = test_sync(remote.clone(), Some(UID));

    phone.stores.local.save_goals(&Goals::new(12_000, 700, 50)).unwrap();
    assert_eq!(phone.sync.push_goals().await, SyncOutcome::Completed);

    let doc = remote.document(&goals_path(UID)).unwrap();
    assert_eq!(
        doc,
        serde_json::json!({
            "goal_steps": 12_000,
            "goal_calories": 700,
            "goal_active_time": 50,
        })
    );

    assert_eq!(tablet.sync.pull_goals().await, SyncOutcome::Completed);
    assert_eq!(
        tablet.stores.local.get_goals().unwrap(),
        Some(Goals::new(12_000, 700, 50))
    );
}

#[tokio::test]
async fn test_pull_goals_without_document_keeps_local() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));
    t.stores.local.save_goals(&Goals::new(1, 2, 3)).unwrap();

    assert_eq!(t.sync.pull_goals().await, SyncOutcome::NotFound);
    assert_eq!(t.stores.local.get_goals().unwrap(), Some(Goals::new(1, 2, 3)));
}

#[tokio::test]
async fn test_push_profile_marks_setup_and_stamps_time() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));

    assert_eq!(t.sync.push_profile(&sample_profile()).await, SyncOutcome::Completed);
    let first = t.remote.document(&user_path(UID)).unwrap();
    assert_eq!(first["name"], "Alex");
    assert_eq!(first["setup_complete"], true);
    let first_stamp = first["createdAt"].as_i64().unwrap();
    assert!(first_stamp > 0);

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    t.sync.push_profile(&sample_profile()).await;
    let second = t.remote.document(&user_path(UID)).unwrap();

    // Every push overwrites the creation time
    assert!(second["createdAt"].as_i64().unwrap() > first_stamp);
}

#[tokio::test]
async fn test_pull_profile_fills_preferences() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let writer = test_sync(remote.clone(), Some(UID));
    let reader = test_sync(remote.clone(), Some(UID));

    writer.sync.push_profile(&sample_profile()).await;

    assert_eq!(reader.sync.pull_profile().await, SyncOutcome::Completed);
    assert_eq!(reader.stores.prefs.profile().unwrap(), sample_profile());
    assert!(reader.stores.prefs.is_setup_complete().unwrap());
}

#[tokio::test]
async fn test_pull_profile_absent_is_noop() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));
    t.stores.prefs.save_age_and_name(20, "Local").unwrap();

    assert_eq!(t.sync.pull_profile().await, SyncOutcome::NotFound);
    assert_eq!(t.stores.prefs.get_user_name().unwrap(), "Local");
}

#[tokio::test]
async fn test_push_today_metrics() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));

    // Nothing saved yet
    assert_eq!(t.sync.push_today_metrics().await, SyncOutcome::NotFound);

    t.stores
        .local
        .save_daily_data(DailyEntry {
            steps: 6543,
            calories: 321,
            active_time: 42,
        })
        .unwrap();
    assert_eq!(t.sync.push_today_metrics().await, SyncOutcome::Completed);

    let key = date_key(today());
    let doc = t.remote.document(&daily_stats_path(UID, &key)).unwrap();
    assert_eq!(
        doc,
        serde_json::json!({
            "steps": 6543,
            "calories": 321,
            "active_time": 42,
            "date": key,
        })
    );
}

#[tokio::test]
async fn test_pull_all_metrics_restores_history() {
    let remote = Arc::new(MemoryRemoteStore::new());
    for (date, steps) in [("2024-04-01", 100), ("2024-04-03", 300), ("2024-04-02", 200)] {
        remote
            .set_daily_stats(
                UID,
                &DailyStatsDocument {
                    steps,
                    calories: 10,
                    active_time: 5,
                    date: date.to_string(),
                    doc_id: None,
                },
            )
            .await
            .unwrap();
    }

    let t = test_sync(remote, Some(UID));
    assert_eq!(t.sync.pull_all_metrics().await, SyncOutcome::Completed);

    let history = t.stores.local.get_history().unwrap();
    let steps: Vec<u32> = history.iter().map(|m| m.steps).collect();
    assert_eq!(steps, vec![300, 200, 100]);
    assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
}

#[tokio::test]
async fn test_pull_all_metrics_keys_days_by_document_id() {
    let remote = Arc::new(MemoryRemoteStore::new());
    // No `date` field at all
    remote.insert_document(
        daily_stats_path(UID, "2024-01-01"),
        serde_json::json!({ "steps": 11, "calories": 12, "active_time": 13 }),
    );
    // `date` field disagrees with the id
    remote.insert_document(
        daily_stats_path(UID, "2024-01-02"),
        serde_json::json!({
            "steps": 21,
            "calories": 22,
            "active_time": 23,
            "date": "2024-03-03",
        }),
    );

    let t = test_sync(remote, Some(UID));
    assert_eq!(t.sync.pull_all_metrics().await, SyncOutcome::Completed);

    let first = t
        .stores
        .local
        .get_daily_data(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(first.steps, 11);

    let second = t
        .stores
        .local
        .get_daily_data(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(second.steps, 21);

    assert_eq!(
        t.stores
            .local
            .get_daily_data(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap())
            .unwrap(),
        None
    );
    assert_eq!(t.stores.local.get_history().unwrap().len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_offline_failures_are_reported_not_raised() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));
    t.stores.local.save_goals(&Goals::new(5, 6, 7)).unwrap();
    t.remote.set_offline(true);

    assert_eq!(t.sync.push_goals().await, SyncOutcome::Failed);
    assert_eq!(t.sync.pull_goals().await, SyncOutcome::Failed);
    assert_eq!(t.sync.pull_profile().await, SyncOutcome::Failed);
    assert_eq!(t.sync.pull_all_metrics().await, SyncOutcome::Failed);

    // Local state untouched
    assert_eq!(t.stores.local.get_goals().unwrap(), Some(Goals::new(5, 6, 7)));
}

#[tokio::test]
async fn test_wipe_callback_only_on_success() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));
    t.remote.set_offline(true);

    let called = AtomicBool::new(false);
    let outcome = t.sync.wipe_remote(|| called.store(true, Ordering::SeqCst)).await;
    assert_eq!(outcome, SyncOutcome::Failed);
    assert!(!called.load(Ordering::SeqCst));

    t.remote.set_offline(false);
    let outcome = t.sync.wipe_remote(|| called.store(true, Ordering::SeqCst)).await;
    assert_eq!(outcome, SyncOutcome::Completed);
    assert!(called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_wipe_leaves_subcollections_behind() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));
    t.stores
        .local
        .save_daily_data(DailyEntry {
            steps: 1,
            calories: 1,
            active_time: 1,
        })
        .unwrap();

    t.sync.push_profile(&sample_profile()).await;
    t.sync.push_goals().await;
    t.sync.push_today_metrics().await;

    t.sync.wipe_remote(|| {}).await;

    assert!(!t.remote.contains(&user_path(UID)));
    assert!(t.remote.contains(&goals_path(UID)));
    assert!(t
        .remote
        .contains(&daily_stats_path(UID, &date_key(today()))));

    // Signing back in on a clean device still restores the orphaned day
    session_for(&t).sign_out().await.unwrap();
    let fresh = test_sync(t.remote.clone(), None);
    let report = session_for(&fresh).sign_in(UID).await.unwrap();
    assert!(!report.setup_complete);

    fresh.stores.local.reset_daily_data().unwrap();
    assert_eq!(fresh.sync.pull_all_metrics().await, SyncOutcome::Completed);
    let restored = fresh.stores.local.get_today_data().unwrap().unwrap();
    assert_eq!(restored.steps, 1);
    assert_eq!(restored.active_time, 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_sign_in_restores_everything() {
    let remote = Arc::new(MemoryRemoteStore::new());
    let old_device = test_sync(remote.clone(), Some(UID));
    old_device
        .stores
        .local
        .save_goals(&Goals::new(15_000, 800, 90))
        .unwrap();
    old_device
        .stores
        .local
        .save_daily_data(DailyEntry {
            steps: 4321,
            calories: 210,
            active_time: 33,
        })
        .unwrap();
    old_device.sync.push_profile(&sample_profile()).await;
    old_device.sync.push_goals().await;
    old_device.sync.push_today_metrics().await;

    let new_device = test_sync(remote, None);
    let session = session_for(&new_device);
    let report = session.sign_in(UID).await.unwrap();

    assert!(report.setup_complete);
    assert_eq!(report.profile, SyncOutcome::Completed);
    assert_eq!(report.goals, SyncOutcome::Completed);
    assert_eq!(report.metrics, SyncOutcome::Completed);

    assert_eq!(new_device.stores.prefs.profile().unwrap(), sample_profile());
    assert_eq!(
        new_device.stores.local.get_goals().unwrap(),
        Some(Goals::new(15_000, 800, 90))
    );
    assert_eq!(
        new_device.stores.local.get_today_data().unwrap().unwrap().steps,
        4321
    );
}

#[tokio::test]
async fn test_sign_in_new_user_needs_setup() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), None);
    // Leftover flag from an earlier session is cleared
    t.stores.prefs.set_setup_complete(true).unwrap();

    let report = session_for(&t).sign_in("fresh-user").await.unwrap();
    assert!(!report.setup_complete);
    assert_eq!(report.profile, SyncOutcome::NotFound);
}

#[tokio::test]
async fn test_sign_in_offline_keeps_local_flag() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), None);
    t.stores.prefs.set_setup_complete(true).unwrap();
    t.remote.set_offline(true);

    let report = session_for(&t).sign_in(UID).await.unwrap();
    assert!(report.setup_complete);
    assert_eq!(report.goals, SyncOutcome::Failed);
}

#[tokio::test]
async fn test_sign_out_resets_local_state() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));
    t.stores.prefs.save_profile(&sample_profile()).unwrap();
    t.stores.prefs.set_setup_complete(true).unwrap();
    t.stores.local.save_goals(&Goals::new(1, 1, 1)).unwrap();

    session_for(&t).sign_out().await.unwrap();

    assert_eq!(t.stores.prefs.profile().unwrap(), Profile::default());
    assert!(!t.stores.prefs.is_setup_complete().unwrap());
    assert_eq!(t.stores.local.get_goals().unwrap(), Some(Goals::default()));

    // Signed out: further syncs are skipped
    assert_eq!(t.sync.push_goals().await, SyncOutcome::Skipped);
}

#[tokio::test]
async fn test_delete_account_offline_keeps_local_data() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));
    t.stores.local.save_goals(&Goals::new(2, 2, 2)).unwrap();
    t.remote.set_offline(true);

    assert!(session_for(&t).delete_account().await.is_err());
    assert_eq!(t.stores.local.get_goals().unwrap(), Some(Goals::new(2, 2, 2)));
}

#[tokio::test]
async fn test_delete_account_clears_everything_local() {
    let t = test_sync(Arc::new(MemoryRemoteStore::new()), Some(UID));
    t.sync.push_profile(&sample_profile()).await;
    t.stores.local.save_goals(&Goals::new(2, 2, 2)).unwrap();

    session_for(&t).delete_account().await.unwrap();

    assert!(!t.remote.contains(&user_path(UID)));
    assert_eq!(t.stores.local.get_goals().unwrap(), Some(Goals::default()));
    assert_eq!(t.sync.pull_goals().await, SyncOutcome::Skipped);
}
