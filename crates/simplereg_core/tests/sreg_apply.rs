use simplereg_core::db::open_db_in_memory;
use simplereg_core::{
    assign_sreg_attributes, Account, AccountListQuery, AccountRecord, AccountRepository,
    AttributeBag, RegistrationService, RepoError, SqliteAccountRepository, SregError, SregModel,
};
use std::collections::HashMap;
use uuid::Uuid;

fn provider_bag() -> AttributeBag {
    serde_json::from_value(serde_json::json!({
        "email": "email@test.local",
        "username": "jdoe",
        "name": "Jane Doe",
        "zip": "6011",
        "timezone": "Pacific/Auckland",
        "country": null
    }))
    .unwrap()
}

#[test]
fn request_fields_follow_account_declaration() {
    let conn = open_db_in_memory().unwrap();
    let service = RegistrationService::new(SqliteAccountRepository::new(&conn));

    let fields = service.request_fields().unwrap();
    assert_eq!(fields.required, ["email", "nickname"]);
    assert_eq!(
        fields.optional,
        ["timezone", "language", "country", "dob", "fullname", "postcode"]
    );
}

#[test]
fn register_applies_renamed_attributes_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::new(&conn);
    let service = RegistrationService::new(&repo);

    let outcome = service.register(&provider_bag()).unwrap();
    assert!(outcome.persisted);

    let stored = repo.get_account(outcome.account.id).unwrap().unwrap();
    assert_eq!(stored, outcome.account);
    assert_eq!(stored.profile.email.as_deref(), Some("email@test.local"));
    assert_eq!(stored.profile.nickname.as_deref(), Some("jdoe"));
    assert_eq!(stored.profile.fullname.as_deref(), Some("Jane Doe"));
    assert_eq!(stored.profile.postcode.as_deref(), Some("6011"));
    assert_eq!(stored.profile.timezone.as_deref(), Some("Pacific/Auckland"));
    assert_eq!(stored.profile.country, None);
    assert_eq!(stored.profile.gender, None);
}

#[test]
fn refresh_skips_write_when_nothing_changed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::new(&conn);
    let service = RegistrationService::new(&repo);

    let created = service.register(&provider_bag()).unwrap();
    let refreshed = service.refresh(created.account.id, &provider_bag()).unwrap();
    assert!(!refreshed.persisted);
    assert_eq!(refreshed.account, created.account);
}

#[test]
fn refresh_blanks_attributes_missing_from_bag() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::new(&conn);
    let service = RegistrationService::new(&repo);
    let created = service.register(&provider_bag()).unwrap();

    let mut bag = HashMap::new();
    bag.insert("email".to_string(), "new@test.local".to_string());
    let refreshed = service.refresh(created.account.id, &bag).unwrap();

    assert!(refreshed.persisted);
    let stored = repo.get_account(created.account.id).unwrap().unwrap();
    assert_eq!(stored.profile.email.as_deref(), Some("new@test.local"));
    assert_eq!(stored.profile.nickname, None);
    assert_eq!(stored.profile.fullname, None);
}

#[test]
fn refresh_unknown_account_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = RegistrationService::new(SqliteAccountRepository::new(&conn));
    let missing = Uuid::new_v4();

    let err = service.refresh(missing, &provider_bag()).unwrap_err();
    match err {
        SregError::Persist(RepoError::NotFound(id)) => assert_eq!(id, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn null_email_is_assigned_as_blank() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::new(&conn);
    let schema = simplereg_core::schema_for::<Account>().unwrap();

    let mut record = AccountRecord::new(&repo);
    record.assign_sreg_field(simplereg_core::SregAttribute::Email, Some("old@test.local"));
    let mut bag = AttributeBag::new();
    bag.insert_null("email");
    assign_sreg_attributes(&mut record, &schema, &bag);

    assert_eq!(record.profile().email, None);
}

#[test]
fn persist_failure_surfaces_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::new(&conn);
    let service = RegistrationService::new(&repo);

    let mut record = service.new_record();
    conn.execute_batch("DROP TABLE accounts;").unwrap();

    let err = service.apply_response(&mut record, &provider_bag()).unwrap_err();
    assert!(matches!(err, SregError::Persist(RepoError::Db(_))));
    assert_eq!(record.profile().email.as_deref(), Some("email@test.local"));
    assert!(record.is_new_record());
}

#[test]
fn registered_accounts_are_listed_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::new(&conn);
    let service = RegistrationService::new(&repo);

    let older = service.register(&provider_bag()).unwrap().account.id;
    let newer = service.register(&provider_bag()).unwrap().account.id;
    let newest = service.register(&provider_bag()).unwrap().account.id;
    for (id, created_at) in [(newest, 3_000_i64), (older, 1_000), (newer, 2_000)] {
        conn.execute(
            "UPDATE accounts SET created_at = ?1 WHERE id = ?2;",
            rusqlite::params![created_at, id.to_string()],
        )
        .unwrap();
    }

    let listed = repo.list_accounts(&AccountListQuery::default()).unwrap();
    let ids: Vec<_> = listed.iter().map(|account| account.id).collect();
    assert_eq!(ids, [older, newer, newest]);

    let page = repo
        .list_accounts(&AccountListQuery {
            limit: Some(1),
            offset: 1,
        })
        .unwrap();
    let page_ids: Vec<_> = page.iter().map(|account| account.id).collect();
    assert_eq!(page_ids, [newer]);
}
