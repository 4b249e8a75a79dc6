//! EntryService tests: collections, disbursements and auto-processing

use std::str::FromStr;
use std::sync::{Arc, Once};

use rust_decimal::Decimal;
use tempfile::TempDir;

use treasury_ledger::config::init_config;
use treasury_ledger::errors::LedgerError;
use treasury_ledger::services::{
    CollectionItem, DisbursementItem, EntryService, InstrumentInput, InstrumentService,
    UpdateDisbursementRequest,
};
use treasury_ledger::storage::{EntryStatus, InstrumentKind, SeaOrmStorage};

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

struct Fixture {
    instruments: InstrumentService,
    entries: EntryService,
    _temp: TempDir,
}

async fn setup() -> Fixture {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("entries.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    Fixture {
        instruments: InstrumentService::new(storage.clone()),
        entries: EntryService::new(storage),
        _temp: temp_dir,
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn create_instrument(fx: &Fixture, kind: InstrumentKind, account: &str) -> i64 {
    fx.instruments
        .create(
            kind,
            InstrumentInput {
                name: format!("{} account", kind),
                account_number: account.to_string(),
                beginning_balance: dec("10000"),
                maturity_date: "12/31/2098".to_string(),
                acquisition_date: Some("01/15/2026".to_string()),
                explanation: Some("Opening".to_string()),
            },
        )
        .await
        .expect("Failed to create instrument")
        .id
}

fn collection(amount: &str) -> CollectionItem {
    CollectionItem {
        amount: dec(amount),
        deposit_slip: Some(" DS-1 ".to_string()),
        check_reference: Some(String::new()),
    }
}

fn disbursement(check: &str, amount: &str) -> DisbursementItem {
    DisbursementItem {
        check_number: check.to_string(),
        date: "10/16/2026".to_string(),
        amount: dec(amount),
    }
}

#[tokio::test]
async fn test_store_collections_on_operating_account() {
    let fx = setup().await;
    let id = create_instrument(&fx, InstrumentKind::OperatingAccounts, "OA-1").await;

    let saved = fx
        .entries
        .store_collections(id, vec![collection("100"), collection("25.555")])
        .await
        .unwrap();

    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|c| c.status == EntryStatus::Pending));
    assert_eq!(saved[0].deposit_slip.as_deref(), Some("DS-1"));
    assert_eq!(saved[0].check_reference, None);
    assert_eq!(saved[1].amount.to_string(), "25.56");

    assert_eq!(fx.entries.list_collections(Some(id)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_collections_rejected_for_other_kinds() {
    let fx = setup().await;
    let id = create_instrument(&fx, InstrumentKind::Collateral, "COL-1").await;

    assert!(matches!(
        fx.entries.store_collections(id, vec![collection("1")]).await,
        Err(LedgerError::Unsupported(_))
    ));
    assert!(matches!(
        fx.entries.store_collections(999, vec![collection("1")]).await,
        Err(LedgerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_collection_batch_validation() {
    let fx = setup().await;
    let id = create_instrument(&fx, InstrumentKind::OperatingAccounts, "OA-2").await;

    assert!(matches!(
        fx.entries.store_collections(id, Vec::new()).await,
        Err(LedgerError::Validation(_))
    ));
    match fx
        .entries
        .store_collections(id, vec![collection("5"), collection("0")])
        .await
    {
        Err(LedgerError::Validation(msg)) => assert!(msg.starts_with("Collection #2")),
        other => panic!("Expected Validation, got {:?}", other),
    }
    assert!(fx.entries.list_collections(Some(id)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_process_collections_requires_known_ids() {
    let fx = setup().await;
    let id = create_instrument(&fx, InstrumentKind::OperatingAccounts, "OA-3").await;

    let saved = fx
        .entries
        .store_collections(id, vec![collection("1"), collection("2")])
        .await
        .unwrap();
    let first = saved[0].id;

    match fx.entries.process_collections(&[first, 4242]).await {
        Err(LedgerError::NotFound(msg)) => assert!(msg.contains("4242")),
        other => panic!("Expected NotFound, got {:?}", other),
    }
    assert!(fx.entries.process_collections(&[]).await.is_err());

    assert_eq!(fx.entries.process_collections(&[first]).await.unwrap(), 1);
    let listed = fx.entries.list_collections(Some(id)).await.unwrap();
    let processed = listed.iter().find(|c| c.id == first).unwrap();
    assert_eq!(processed.status, EntryStatus::Processed);
}

#[tokio::test]
async fn test_store_disbursements_and_uniqueness() {
    let fx = setup().await;
    let collateral = create_instrument(&fx, InstrumentKind::Collateral, "COL-2").await;
    let operating = create_instrument(&fx, InstrumentKind::OperatingAccounts, "OA-4").await;

    let saved = fx
        .entries
        .store_disbursements(
            collateral,
            vec![disbursement("1001", "500"), disbursement(" 1002 ", "0.01")],
        )
        .await
        .unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[1].check_number, "1002");

    // taken on another instrument
    match fx
        .entries
        .store_disbursements(operating, vec![disbursement("1001", "5")])
        .await
    {
        Err(LedgerError::Conflict(msg)) => assert_eq!(
            msg,
            "Check number 1001 already exists. Check numbers must be unique."
        ),
        other => panic!("Expected Conflict, got {:?}", other),
    }

    // repeated inside one batch
    assert!(matches!(
        fx.entries
            .store_disbursements(operating, vec![disbursement("2001", "5"), disbursement("2001", "6")])
            .await,
        Err(LedgerError::Conflict(_))
    ));
    assert!(
        fx.entries
            .list_disbursements(Some(operating))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_disbursement_line_validation() {
    let fx = setup().await;
    let id = create_instrument(&fx, InstrumentKind::Collateral, "COL-3").await;
    let dollar = create_instrument(&fx, InstrumentKind::Dollar, "USD-1").await;

    assert!(matches!(
        fx.entries
            .store_disbursements(dollar, vec![disbursement("1", "5")])
            .await,
        Err(LedgerError::Unsupported(_))
    ));
    assert!(matches!(
        fx.entries
            .store_disbursements(id, vec![disbursement("", "5")])
            .await,
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        fx.entries
            .store_disbursements(id, vec![disbursement(&"9".repeat(51), "5")])
            .await,
        Err(LedgerError::Validation(_))
    ));
    assert!(matches!(
        fx.entries
            .store_disbursements(id, vec![disbursement("3", "0.004")])
            .await,
        Err(LedgerError::Validation(_))
    ));

    let mut bad_date = disbursement("4", "5");
    bad_date.date = "2026/10/16".to_string();
    assert!(matches!(
        fx.entries.store_disbursements(id, vec![bad_date]).await,
        Err(LedgerError::DateParse(_))
    ));
}

#[tokio::test]
async fn test_validate_disbursements_reports_first_duplicate() {
    let fx = setup().await;
    let id = create_instrument(&fx, InstrumentKind::Collateral, "COL-4").await;

    fx.entries
        .store_disbursements(id, vec![disbursement("7001", "5")])
        .await
        .unwrap();

    let ok = fx
        .entries
        .validate_disbursements(&[disbursement("7002", "1"), disbursement("7003", "1")])
        .await
        .unwrap();
    assert!(ok.valid);
    assert!(ok.message.is_none());

    let taken = fx
        .entries
        .validate_disbursements(&[disbursement("7004", "1"), disbursement("7001", "1")])
        .await
        .unwrap();
    assert!(!taken.valid);
    assert_eq!(
        taken.message.as_deref(),
        Some("Check number 7001 already exists. Check numbers must be unique.")
    );

    let repeated = fx
        .entries
        .validate_disbursements(&[disbursement("7005", "1"), disbursement("7005", "1")])
        .await
        .unwrap();
    assert!(!repeated.valid);
}

#[tokio::test]
async fn test_update_and_delete_disbursement() {
    let fx = setup().await;
    let id = create_instrument(&fx, InstrumentKind::Collateral, "COL-5").await;

    let saved = fx
        .entries
        .store_disbursements(id, vec![disbursement("8001", "5"), disbursement("8002", "6")])
        .await
        .unwrap();
    let first = saved[0].id;

    // keeping its own number is fine
    let updated = fx
        .entries
        .update_disbursement(
            first,
            UpdateDisbursementRequest {
                check_number: "8001".to_string(),
                date: "2026-10-20".to_string(),
                amount: dec("7.5"),
                status: Some(EntryStatus::Processed),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount.to_string(), "7.50");
    assert_eq!(updated.status, EntryStatus::Processed);

    assert!(matches!(
        fx.entries
            .update_disbursement(
                first,
                UpdateDisbursementRequest {
                    check_number: "8002".to_string(),
                    date: "2026-10-20".to_string(),
                    amount: dec("7.5"),
                    status: None,
                },
            )
            .await,
        Err(LedgerError::Conflict(_))
    ));

    fx.entries.delete_disbursement(first).await.unwrap();
    assert!(matches!(
        fx.entries.delete_disbursement(first).await,
        Err(LedgerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_process_disbursements_and_auto_process() {
    let fx = setup().await;
    let operating = create_instrument(&fx, InstrumentKind::OperatingAccounts, "OA-5").await;

    let disbursements = fx
        .entries
        .store_disbursements(
            operating,
            vec![disbursement("9001", "1"), disbursement("9002", "2")],
        )
        .await
        .unwrap();
    fx.entries
        .store_collections(operating, vec![collection("3")])
        .await
        .unwrap();

    let first = disbursements[0].id;
    assert_eq!(fx.entries.process_disbursements(&[first]).await.unwrap(), 1);
    assert_eq!(fx.entries.process_disbursements(&[first]).await.unwrap(), 0);
    assert!(fx.entries.process_disbursements(&[]).await.is_err());

    let counts = fx.entries.auto_process_pending().await.unwrap();
    assert_eq!(counts.collections, 1);
    assert_eq!(counts.disbursements, 1);

    let counts = fx.entries.auto_process_pending().await.unwrap();
    assert_eq!(counts.collections, 0);
    assert_eq!(counts.disbursements, 0);
}
