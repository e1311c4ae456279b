use chrono::{TimeZone, Utc};
use storage::repository::{DefaultsStore, StorageError};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_round_trips_ints_and_instants() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_defaults?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_int("gamesCount").await.unwrap(), None);

    repo.set_int("gamesCount", 1).await.unwrap();
    repo.set_int("correct", 6).await.unwrap();
    assert_eq!(repo.get_int("gamesCount").await.unwrap(), Some(1));
    assert_eq!(repo.get_int("correct").await.unwrap(), Some(6));

    repo.set_int("correct", 16).await.unwrap();
    assert_eq!(repo.get_int("correct").await.unwrap(), Some(16));

    let at = Utc.with_ymd_and_hms(2024, 7, 3, 9, 46, 40).unwrap();
    repo.set_instant("bestGameDate", at).await.unwrap();
    assert_eq!(repo.get_instant("bestGameDate").await.unwrap(), Some(at));
}

#[tokio::test]
async fn sqlite_rewriting_a_key_switches_its_type() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_retype?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let at = Utc.with_ymd_and_hms(2024, 7, 3, 9, 46, 40).unwrap();
    repo.set_instant("bestGameDate", at).await.unwrap();

    let err = repo.get_int("bestGameDate").await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));

    repo.set_int("bestGameDate", 7).await.unwrap();
    assert_eq!(repo.get_int("bestGameDate").await.unwrap(), Some(7));
    let err = repo.get_instant("bestGameDate").await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first run");
    repo.migrate().await.expect("second run");

    repo.set_int("correct", 3).await.unwrap();
    assert_eq!(repo.get_int("correct").await.unwrap(), Some(3));
}
