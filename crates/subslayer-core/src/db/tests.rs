//! Database tests

use super::*;
use crate::models::*;
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_sub(name: &str, cost: f64, renewal: NaiveDate, category: Category) -> NewSubscription {
    NewSubscription {
        name: name.to_string(),
        cost,
        renewal_date: renewal,
        category,
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_subscriptions("alice").unwrap().is_empty());
    assert_eq!(db.count_subscriptions("alice").unwrap(), 0);
}

#[test]
fn test_subscriptions_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let columns: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('subscriptions') WHERE name IN ('id', 'owner', 'name', 'cost', 'renewal_date', 'category', 'created_at', 'updated_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(columns, 8, "subscriptions table should have 8 expected columns");
}

#[test]
fn test_create_and_get_subscription() {
    let db = Database::in_memory().unwrap();

    let created = db
        .create_subscription(
            "alice",
            &new_sub(" Netflix ", 15.99, date(2024, 3, 15), Category::Entertainment),
        )
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.owner, "alice");
    assert_eq!(created.name, "Netflix");
    assert_eq!(created.cost, 15.99);
    assert_eq!(created.renewal_date, date(2024, 3, 15));
    assert_eq!(created.category, Category::Entertainment);

    let fetched = db.get_subscription("alice", created.id).unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn test_create_rejects_invalid_input() {
    let db = Database::in_memory().unwrap();

    let result = db.create_subscription("alice", &new_sub("", 5.0, date(2024, 1, 1), Category::Other));
    assert!(matches!(result, Err(Error::InvalidData(_))));

    let result =
        db.create_subscription("alice", &new_sub("Gym", -1.0, date(2024, 1, 1), Category::Other));
    assert!(matches!(result, Err(Error::InvalidData(_))));

    assert_eq!(db.count_subscriptions("alice").unwrap(), 0);
}

#[test]
fn test_list_orders_by_renewal_date() {
    let db = Database::in_memory().unwrap();

    db.create_subscription("alice", &new_sub("Late", 1.0, date(2024, 5, 1), Category::Other))
        .unwrap();
    db.create_subscription("alice", &new_sub("Early", 2.0, date(2024, 2, 1), Category::Other))
        .unwrap();
    db.create_subscription("alice", &new_sub("Middle", 3.0, date(2024, 3, 1), Category::Other))
        .unwrap();

    let names: Vec<String> = db
        .list_subscriptions("alice")
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Early", "Middle", "Late"]);
}

#[test]
fn test_subscriptions_are_scoped_by_owner() {
    let db = Database::in_memory().unwrap();

    let alice_sub = db
        .create_subscription("alice", &new_sub("Netflix", 15.99, date(2024, 3, 15), Category::Entertainment))
        .unwrap();
    db.create_subscription("bob", &new_sub("Spotify", 9.99, date(2024, 3, 22), Category::Music))
        .unwrap();

    assert_eq!(db.list_subscriptions("alice").unwrap().len(), 1);
    assert_eq!(db.list_subscriptions("bob").unwrap().len(), 1);

    // Bob cannot see, change or delete Alice's row
    assert!(db.get_subscription("bob", alice_sub.id).unwrap().is_none());
    let update = SubscriptionUpdate {
        cost: Some(0.0),
        ..Default::default()
    };
    assert!(db.update_subscription("bob", alice_sub.id, &update).unwrap().is_none());
    assert!(!db.delete_subscription("bob", alice_sub.id).unwrap());

    let still_there = db.get_subscription("alice", alice_sub.id).unwrap().unwrap();
    assert_eq!(still_there.cost, 15.99);
}

#[test]
fn test_update_subscription() {
    let db = Database::in_memory().unwrap();
    let sub = db
        .create_subscription("alice", &new_sub("Netflix", 15.99, date(2024, 3, 15), Category::Entertainment))
        .unwrap();

    let update = SubscriptionUpdate {
        name: Some("Netflix Premium".to_string()),
        cost: Some(22.99),
        renewal_date: Some(date(2024, 4, 15)),
        category: None,
    };
    let updated = db.update_subscription("alice", sub.id, &update).unwrap().unwrap();

    assert_eq!(updated.name, "Netflix Premium");
    assert_eq!(updated.cost, 22.99);
    assert_eq!(updated.renewal_date, date(2024, 4, 15));
    assert_eq!(updated.category, Category::Entertainment);
}

#[test]
fn test_concurrent_updates_to_different_fields_both_persist() {
    let db = Database::in_memory().unwrap();
    let sub = db
        .create_subscription("alice", &new_sub("Netflix", 15.99, date(2024, 3, 15), Category::Entertainment))
        .unwrap();

    let renamer = {
        let db = db.clone();
        std::thread::spawn(move || {
            for i in 0..25 {
                let update = SubscriptionUpdate {
                    name: Some(format!("Netflix {}", i)),
                    ..Default::default()
                };
                db.update_subscription("alice", sub.id, &update).unwrap().unwrap();
            }
        })
    };
    let repricer = {
        let db = db.clone();
        std::thread::spawn(move || {
            for i in 0..25 {
                let update = SubscriptionUpdate {
                    cost: Some(20.0 + i as f64),
                    ..Default::default()
                };
                db.update_subscription("alice", sub.id, &update).unwrap().unwrap();
            }
        })
    };
    renamer.join().unwrap();
    repricer.join().unwrap();

    let stored = db.get_subscription("alice", sub.id).unwrap().unwrap();
    assert_eq!(stored.name, "Netflix 24");
    assert_eq!(stored.cost, 44.0);
    assert_eq!(stored.renewal_date, date(2024, 3, 15));
}

#[test]
fn test_update_other_owners_row_is_none() {
    let db = Database::in_memory().unwrap();
    let sub = db
        .create_subscription("alice", &new_sub("Netflix", 15.99, date(2024, 3, 15), Category::Entertainment))
        .unwrap();

    let update = SubscriptionUpdate {
        name: Some("Hijacked".to_string()),
        ..Default::default()
    };
    assert!(db.update_subscription("bob", sub.id, &update).unwrap().is_none());
    assert!(db.update_subscription("alice", 9999, &update).unwrap().is_none());
    assert_eq!(db.get_subscription("alice", sub.id).unwrap().unwrap().name, "Netflix");
}

#[test]
fn test_update_rejects_negative_cost() {
    let db = Database::in_memory().unwrap();
    let sub = db
        .create_subscription("alice", &new_sub("Netflix", 15.99, date(2024, 3, 15), Category::Entertainment))
        .unwrap();

    let update = SubscriptionUpdate {
        cost: Some(-1.0),
        ..Default::default()
    };
    assert!(db.update_subscription("alice", sub.id, &update).is_err());
    assert_eq!(db.get_subscription("alice", sub.id).unwrap().unwrap().cost, 15.99);
}

#[test]
fn test_delete_subscription() {
    let db = Database::in_memory().unwrap();
    let sub = db
        .create_subscription("alice", &new_sub("Netflix", 15.99, date(2024, 3, 15), Category::Entertainment))
        .unwrap();

    assert!(db.delete_subscription("alice", sub.id).unwrap());
    assert!(!db.delete_subscription("alice", sub.id).unwrap());
    assert!(db.get_subscription("alice", sub.id).unwrap().is_none());
}

#[test]
fn test_unrecognized_category_survives_storage() {
    let db = Database::in_memory().unwrap();
    let sub = db
        .create_subscription(
            "alice",
            &new_sub("Audible", 14.95, date(2024, 3, 1), Category::parse("Audiobooks")),
        )
        .unwrap();

    let fetched = db.get_subscription("alice", sub.id).unwrap().unwrap();
    assert_eq!(fetched.category, Category::Unrecognized("Audiobooks".to_string()));
}

#[test]
fn test_seed_sample_subscriptions() {
    let db = Database::in_memory().unwrap();
    let today = date(2024, 1, 10);

    let inserted = db.seed_sample_subscriptions("alice", today).unwrap();
    assert_eq!(inserted, 6);

    let subs = db.list_subscriptions("alice").unwrap();
    assert_eq!(subs.len(), 6);

    // Disney+ renews on the 8th, earliest of the month
    assert_eq!(subs[0].name, "Disney+");
    assert_eq!(subs[0].renewal_date, date(2024, 1, 8));

    let gym = subs.iter().find(|s| s.name == "Planet Fitness").unwrap();
    assert_eq!(gym.renewal_date, date(2024, 2, 1));
    assert_eq!(gym.category, Category::HealthFitness);

    let xbox = subs.iter().find(|s| s.name == "Xbox Game Pass").unwrap();
    assert_eq!(xbox.renewal_date, date(2024, 2, 5));

    // Seeding is a no-op once the owner has data
    assert_eq!(db.seed_sample_subscriptions("alice", today).unwrap(), 0);
    assert_eq!(db.count_subscriptions("alice").unwrap(), 6);
}

#[test]
fn test_seed_sample_subscriptions_wraps_year() {
    let db = Database::in_memory().unwrap();
    db.seed_sample_subscriptions("alice", date(2024, 12, 20)).unwrap();

    let subs = db.list_subscriptions("alice").unwrap();
    let gym = subs.iter().find(|s| s.name == "Planet Fitness").unwrap();
    assert_eq!(gym.renewal_date, date(2025, 1, 1));
}

#[test]
fn test_audit_log() {
    let db = Database::in_memory().unwrap();

    db.log_audit("alice@example.com", "list", Some("subscription"), None, Some("count=0"))
        .unwrap();
    db.log_audit("alice@example.com", "delete", Some("subscription"), Some(7), None)
        .unwrap();

    let entries = db.list_audit_log("alice@example.com", 10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "delete");
    assert_eq!(entries[0].entity_id, Some(7));
    assert_eq!(entries[1].details.as_deref(), Some("count=0"));

    assert_eq!(db.list_audit_log("alice@example.com", 1).unwrap().len(), 1);
}

#[test]
fn test_audit_log_is_per_user() {
    let db = Database::in_memory().unwrap();

    db.log_audit("alice@example.com", "create", Some("subscription"), Some(1), Some("name=Therapy, cost=99.00"))
        .unwrap();
    db.log_audit("bob@example.com", "list", Some("subscription"), None, Some("count=0"))
        .unwrap();

    let bob = db.list_audit_log("bob@example.com", 10).unwrap();
    assert_eq!(bob.len(), 1);
    assert!(bob.iter().all(|e| e.user_email == "bob@example.com"));

    let alice = db.list_audit_log("alice@example.com", 10).unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].action, "create");

    assert!(db.list_audit_log("carol@example.com", 10).unwrap().is_empty());
}

#[test]
fn test_encrypted_database_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encrypted.db");
    let path = path.to_str().unwrap();

    let db = Database::new_with_key(path, Some("correct horse battery staple")).unwrap();
    db.create_subscription("alice", &new_sub("Netflix", 15.99, date(2024, 3, 15), Category::Entertainment))
        .unwrap();
    drop(db);

    let reopened = Database::new_with_key(path, Some("correct horse battery staple")).unwrap();
    assert_eq!(reopened.list_subscriptions("alice").unwrap().len(), 1);

    assert!(Database::new_with_key(path, Some("wrong passphrase")).is_err());
}
