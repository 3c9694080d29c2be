use chrono::NaiveDate;
use tempfile::TempDir;
use user_records::db::{SchemaStore, find_users, get_user, insert_user};
use user_records::types::{NewUser, UserFilter};

fn new_user(first: &str, last: &str, y: i32, m: u32, d: u32) -> NewUser {
    NewUser {
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(y, m, d).expect("valid date"),
    }
}

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[tokio::test]
async fn initialize_creates_users_table() {
    let dir = temp_dir();
    let db_path = dir.path().join("test_users.db");

    let store = SchemaStore::initialize(&db_path)
        .await
        .expect("initialize failed");

    assert!(db_path.exists());
    let table = store.table();
    assert_eq!(table.name, "users");
    assert_eq!(
        table.column_names(),
        vec!["id", "first_name", "last_name", "date_of_birth"]
    );

    let id = table.column("id").expect("id column");
    assert!(id.primary_key);
    let dob = table.column("date_of_birth").expect("date_of_birth column");
    assert_eq!(dob.sql_type, "DATE");
    assert!(dob.not_null);
    assert!(table.column("first_name").expect("first_name column").not_null);
    assert!(table.column("last_name").expect("last_name column").not_null);
}

#[tokio::test]
async fn initialize_twice_keeps_table_and_rows() {
    let dir = temp_dir();
    let db_path = dir.path().join("users.db");

    let first = SchemaStore::initialize(&db_path)
        .await
        .expect("first initialize failed");
    let mut conn = first.acquire().await.expect("acquire failed");
    let stored = insert_user(&mut conn, new_user("Luke", "Barrett", 1998, 6, 12))
        .await
        .expect("insert failed");
    drop(conn);

    let second = SchemaStore::initialize(&db_path)
        .await
        .expect("second initialize failed");
    assert_eq!(first.table(), second.table());

    let tables: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'")
            .fetch_all(second.pool())
            .await
            .expect("schema query failed");
    assert_eq!(tables.len(), 1);

    let mut conn = second.acquire().await.expect("acquire failed");
    let reloaded = get_user(&mut conn, stored.id).await.expect("get failed");
    assert_eq!(reloaded, stored);
}

#[tokio::test]
async fn existing_table_is_reflected_not_altered() {
    let dir = temp_dir();
    let db_path = dir.path().join("legacy.db");

    let bootstrap = SchemaStore::initialize(&db_path)
        .await
        .expect("initialize failed");
    sqlx::query("ALTER TABLE users ADD COLUMN nickname TEXT")
        .execute(bootstrap.pool())
        .await
        .expect("alter failed");
    bootstrap.close().await;

    let store = SchemaStore::initialize(&db_path)
        .await
        .expect("reinitialize failed");
    assert_eq!(
        store.table().column_names(),
        vec!["id", "first_name", "last_name", "date_of_birth", "nickname"]
    );
    assert!(!store.table().column("nickname").expect("nickname").not_null);
}

#[tokio::test]
async fn insert_assigns_increasing_ids_that_are_never_reused() {
    let dir = temp_dir();
    let store = SchemaStore::initialize(dir.path().join("users.db"))
        .await
        .expect("initialize failed");
    let mut conn = store.acquire().await.expect("acquire failed");

    let a = insert_user(&mut conn, new_user("Ann", "Lee", 1980, 1, 2))
        .await
        .expect("insert failed");
    let b = insert_user(&mut conn, new_user("Bob", "Lee", 1981, 3, 4))
        .await
        .expect("insert failed");
    assert!(b.id > a.id);

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(b.id)
        .execute(&mut *conn)
        .await
        .expect("delete failed");

    let c = insert_user(&mut conn, new_user("Cat", "Lee", 1982, 5, 6))
        .await
        .expect("insert failed");
    assert!(c.id > b.id);
}

#[tokio::test]
async fn find_users_applies_only_supplied_predicates() {
    let dir = temp_dir();
    let store = SchemaStore::initialize(dir.path().join("users.db"))
        .await
        .expect("initialize failed");
    let mut conn = store.acquire().await.expect("acquire failed");

    let mut all = Vec::new();
    for user in [
        new_user("Luke", "Barrett", 1998, 6, 12),
        new_user("Luke", "Barrett", 1990, 1, 1),
        new_user("Luke", "Skywalker", 1998, 6, 12),
        new_user("Anna", "Barrett", 1998, 6, 12),
    ] {
        all.push(insert_user(&mut conn, user).await.expect("insert failed"));
    }

    let everything = find_users(&mut conn, &UserFilter::default())
        .await
        .expect("query failed");
    assert_eq!(everything, all);

    let luke = || Some("Luke".to_string());
    let june_12 = NaiveDate::from_ymd_opt(1998, 6, 12);
    let cases = [
        (
            UserFilter {
                first_name: luke(),
                ..Default::default()
            },
            vec![0, 1, 2],
        ),
        (
            UserFilter {
                first_name: luke(),
                date_of_birth: june_12,
                ..Default::default()
            },
            vec![0, 2],
        ),
        (
            UserFilter {
                first_name: luke(),
                last_name: Some("Barrett".to_string()),
                date_of_birth: june_12,
            },
            vec![0],
        ),
        (
            UserFilter {
                last_name: Some("Nobody".to_string()),
                ..Default::default()
            },
            vec![],
        ),
    ];

    for (filter, indices) in &cases {
        let found = find_users(&mut conn, filter).await.expect("query failed");
        let expected: Vec<_> = indices.iter().map(|&i| all[i].clone()).collect();
        assert_eq!(found, expected, "{filter:?}");
    }
}

#[tokio::test]
async fn failed_read_back_rolls_back_the_insert() {
    let dir = temp_dir();
    let store = SchemaStore::initialize(dir.path().join("users.db"))
        .await
        .expect("initialize failed");
    let mut conn = store.acquire().await.expect("acquire failed");

    // Leaves the freshly inserted row unreadable as a record.
    sqlx::query(
        "CREATE TRIGGER garble_dob AFTER INSERT ON users BEGIN \
         UPDATE users SET date_of_birth = 'garbage' WHERE id = NEW.id; END",
    )
    .execute(&mut *conn)
    .await
    .expect("create trigger failed");

    let err = insert_user(&mut conn, new_user("Luke", "Barrett", 1998, 6, 12))
        .await
        .expect_err("insert should fail on read-back");
    assert!(matches!(err, sqlx::Error::Decode(_)));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await
        .expect("count failed");
    assert_eq!(count, 0);
}
