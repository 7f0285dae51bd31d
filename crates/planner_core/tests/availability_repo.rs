use planner_core::db::open_db_in_memory;
use planner_core::{
    AvailabilityRepository, AvailabilityRow, CachedAvailabilityRepository, RepoError,
    SqliteAvailabilityRepository,
};
use rusqlite::Connection;
use std::time::Duration;

#[test]
fn replace_then_read_preserves_row_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAvailabilityRepository::try_new(&conn, "Feuille 1").unwrap();

    let rows = vec![
        AvailabilityRow::new("Client", "2024-05-02"),
        AvailabilityRow::new("Akanup", "2024-05-01"),
    ];
    repo.replace_rows(&rows).unwrap();

    assert_eq!(repo.read_rows().unwrap(), rows);
}

#[test]
fn replace_rows_is_full_replacement() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAvailabilityRepository::try_new(&conn, "Feuille 1").unwrap();

    repo.replace_rows(&[
        AvailabilityRow::new("Client", "2024-05-02"),
        AvailabilityRow::new("Akanup", "2024-05-01"),
    ])
    .unwrap();
    repo.replace_rows(&[AvailabilityRow::new("Formateur", "2024-06-01")])
        .unwrap();

    assert_eq!(
        repo.read_rows().unwrap(),
        vec![AvailabilityRow::new("Formateur", "2024-06-01")]
    );

    repo.replace_rows(&[]).unwrap();
    assert!(repo.read_rows().unwrap().is_empty());
}

#[test]
fn sheets_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let first = SqliteAvailabilityRepository::try_new(&conn, "Feuille 1").unwrap();
    let second = SqliteAvailabilityRepository::try_new(&conn, "Feuille 2").unwrap();

    first
        .replace_rows(&[AvailabilityRow::new("Akanup", "2024-05-01")])
        .unwrap();
    second.replace_rows(&[]).unwrap();

    assert_eq!(first.read_rows().unwrap().len(), 1);
    assert!(second.read_rows().unwrap().is_empty());
}

#[test]
fn read_returns_partial_rows_and_ignores_extra_columns() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO availability_rows (sheet, participant, date, note)
         VALUES ('Feuille 1', 'Akanup', '2024-05-01', 'morning only'),
                ('Feuille 1', NULL, '2024-05-02', NULL),
                ('Feuille 1', 'Client', NULL, NULL);",
    )
    .unwrap();
    let repo = SqliteAvailabilityRepository::try_new(&conn, "Feuille 1").unwrap();

    let rows = repo.read_rows().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], AvailabilityRow::new("Akanup", "2024-05-01"));
    assert_eq!(rows[1].participant, None);
    assert_eq!(rows[2].date, None);
}

#[test]
fn try_new_rejects_blank_sheet_and_unmigrated_connection() {
    let conn = open_db_in_memory().unwrap();
    assert!(matches!(
        SqliteAvailabilityRepository::try_new(&conn, "   "),
        Err(RepoError::InvalidSheet(_))
    ));

    let raw = Connection::open_in_memory().unwrap();
    assert!(matches!(
        SqliteAvailabilityRepository::try_new(&raw, "Feuille 1"),
        Err(RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        })
    ));
}

#[test]
fn cached_repository_observes_own_writes_and_tolerates_foreign_staleness() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = SqliteAvailabilityRepository::try_new(&conn, "Feuille 1").unwrap();
    let cached = CachedAvailabilityRepository::new(sqlite, Duration::from_secs(300));

    assert!(cached.read_rows().unwrap().is_empty());

    // A foreign writer bypasses the cache: stale reads are tolerated.
    conn.execute(
        "INSERT INTO availability_rows (sheet, participant, date) VALUES ('Feuille 1', 'Client', '2024-05-03');",
        [],
    )
    .unwrap();
    assert!(cached.read_rows().unwrap().is_empty());

    // Own writes are always visible to the next read.
    cached
        .replace_rows(&[AvailabilityRow::new("Akanup", "2024-05-01")])
        .unwrap();
    assert_eq!(
        cached.read_rows().unwrap(),
        vec![AvailabilityRow::new("Akanup", "2024-05-01")]
    );
}
