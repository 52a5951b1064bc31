use airbnb_bot::domain::model::FieldValue;
use airbnb_bot::domain::ports::ListingSource;
use airbnb_bot::{BotError, SqliteListingStore};
use rusqlite::{params, Connection};
use tempfile::TempDir;

fn create_store(dir: &TempDir, rows: &[(&str, &str, &str, i64)]) -> SqliteListingStore {
    let path = dir.path().join("listings.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "CREATE TABLE listings (id INTEGER, name TEXT, neighbourhood TEXT, neighbourhood_group TEXT, price INTEGER)",
        [],
    )
    .unwrap();
    for (i, (name, neighbourhood, group, price)) in rows.iter().enumerate() {
        conn.execute(
            "INSERT INTO listings VALUES (?1, ?2, ?3, ?4, ?5)",
            params![i as i64, name, neighbourhood, group, price],
        )
        .unwrap();
    }
    SqliteListingStore::open_existing(path).unwrap()
}

#[test]
fn test_query_returns_requested_columns_in_order() {
    let dir = TempDir::new().unwrap();
    let store = create_store(
        &dir,
        &[
            ("Loft am Hackeschen Markt", "Alexanderplatz", "Mitte", 95),
            ("Zimmer im Kiez", "Reuterstraße", "Neukölln", 30),
        ],
    );

    let rows = store
        .query("neighbourhood_group", "Mitte", &["price", "name", "neighbourhood"])
        .unwrap();

    assert_eq!(
        rows,
        vec![vec![
            FieldValue::Integer(95),
            FieldValue::from("Loft am Hackeschen Markt"),
            FieldValue::from("Alexanderplatz"),
        ]]
    );
}

#[test]
fn test_query_without_matches_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = create_store(&dir, &[("Loft", "Alexanderplatz", "Mitte", 95)]);

    let rows = store
        .query("neighbourhood_group", "Spandau", &["name"])
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_query_value_is_bound_not_interpolated() {
    let dir = TempDir::new().unwrap();
    let store = create_store(&dir, &[("Loft", "Alexanderplatz", "Mitte", 95)]);

    let rows = store
        .query("neighbourhood_group", "Mitte\" OR \"1\" = \"1", &["name"])
        .unwrap();
    assert!(rows.is_empty());

    let rows = store
        .query("neighbourhood_group", "x' OR '1'='1", &["name"])
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_unknown_column_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = create_store(&dir, &[("Loft", "Alexanderplatz", "Mitte", 95)]);

    let err = store
        .query("neighbourhood_group", "Mitte", &["name", "price; DROP TABLE listings"])
        .unwrap_err();
    assert!(matches!(err, BotError::UnknownColumn { .. }));

    let err = store.query("district", "Mitte", &["name"]).unwrap_err();
    assert!(matches!(err, BotError::UnknownColumn { ref column, .. } if column == "district"));
}

#[test]
fn test_missing_table_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.db");
    Connection::open(&path)
        .unwrap()
        .execute("CREATE TABLE other (x INTEGER)", [])
        .unwrap();

    let store = SqliteListingStore::open_existing(&path).unwrap();
    let err = store
        .query("neighbourhood_group", "Mitte", &["name"])
        .unwrap_err();
    assert!(matches!(err, BotError::MissingTable { .. }));
}

#[test]
fn test_corrupt_file_is_store_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.db");
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();

    let store = SqliteListingStore::open_existing(&path).unwrap();
    let err = store
        .query("neighbourhood_group", "Mitte", &["name"])
        .unwrap_err();
    assert!(matches!(err, BotError::StoreError(_)));
}

#[test]
fn test_count_matches_query() {
    let dir = TempDir::new().unwrap();
    let store = create_store(
        &dir,
        &[
            ("A", "Alexanderplatz", "Mitte", 50),
            ("B", "Moabit West", "Mitte", 60),
            ("C", "Reuterstraße", "Neukölln", 30),
        ],
    );

    assert_eq!(store.count("neighbourhood_group", "Mitte").unwrap(), 2);
    assert_eq!(store.count("neighbourhood_group", "Pankow").unwrap(), 0);
}

#[test]
fn test_connection_is_released_between_queries() {
    let dir = TempDir::new().unwrap();
    let store = create_store(&dir, &[("A", "Alexanderplatz", "Mitte", 50)]);

    for _ in 0..3 {
        store.query("neighbourhood_group", "Mitte", &["name"]).unwrap();
        store.query("neighbourhood_group", "Spandau", &["name"]).unwrap();
    }

    // 讀取連線已關閉，寫入不會被鎖住
    let conn = Connection::open(store.path()).unwrap();
    conn.execute("DELETE FROM listings", []).unwrap();
    assert!(store
        .query("neighbourhood_group", "Mitte", &["name"])
        .unwrap()
        .is_empty());
}
