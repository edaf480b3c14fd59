//! Serde roundtrip and JsonSchema validation tests for all entity types.

use chrono::{NaiveDate, Utc};
use noces_core::entities::*;
use noces_core::enums::*;
use noces_core::responses::*;
use pretty_assertions::assert_eq;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn signature(status: EnvelopeStatus) -> SignatureTracking {
    SignatureTracking {
        envelope_id: "4f1c-env".into(),
        envelope_status: status,
        signers: vec![
            Signer {
                name: "Camille Martin".into(),
                email: "camille@example.com".into(),
                status: RecipientStatus::Completed,
                signed_at: Some(Utc::now()),
            },
            Signer {
                name: "Hugo Bernard".into(),
                email: "hugo@example.com".into(),
                status: RecipientStatus::Delivered,
                signed_at: None,
            },
        ],
        sent_at: Some(Utc::now()),
        completed_at: None,
        signed_pdf_url: None,
    }
}

roundtrip_and_validate!(
    client_roundtrip,
    Client,
    Client {
        id: "cli-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        name: "Camille Martin".into(),
        partner_name: Some("Hugo Bernard".into()),
        email: Some("camille@example.com".into()),
        phone: None,
        address: Some("12 rue des Lilas, Lyon".into()),
        wedding_date: date(2027, 6, 19),
        budget_cents: Some(2_500_000),
        status: ClientStatus::Active,
        notes: None,
        portal_email: Some("camille@example.com".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    event_roundtrip,
    Event,
    Event {
        id: "evt-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        client_id: "cli-a3f8b2c1".into(),
        title: "Mariage Camille & Hugo".into(),
        date: date(2027, 6, 19),
        venue: Some("Château de la Roche".into()),
        guest_count: Some(120),
        status: EventStatus::Confirmed,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    task_roundtrip,
    Task,
    Task {
        id: "tsk-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        title: "Book the florist".into(),
        description: None,
        client_id: Some("cli-a3f8b2c1".into()),
        event_id: None,
        due_date: date(2027, 3, 1),
        priority: TaskPriority::High,
        status: TaskStatus::InProgress,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    expense_roundtrip,
    Expense,
    Expense {
        id: "exp-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        label: "Deposit florist".into(),
        category: Some("flowers".into()),
        amount_cents: 45_000,
        date: date(2027, 1, 10),
        client_id: Some("cli-a3f8b2c1".into()),
        event_id: Some("evt-a3f8b2c1".into()),
        vendor_id: Some("vnd-a3f8b2c1".into()),
        paid: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    invoice_roundtrip,
    Invoice,
    Invoice {
        id: "inv-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        client_id: "cli-a3f8b2c1".into(),
        number: "F-2027-001".into(),
        items: vec![LineItem {
            label: "Wedding planning".into(),
            quantity: 1,
            unit_price_cents: 300_000,
        }],
        total_cents: 300_000,
        paid_cents: 100_000,
        status: InvoiceStatus::PartiallyPaid,
        due_date: date(2027, 2, 1),
        devis_id: Some("dev-a3f8b2c1".into()),
        qonto_payment_link_id: Some("pl-123".into()),
        payment_link_url: Some("https://pay.qonto.com/pl-123".into()),
        payment_link_status: Some(PaymentLinkStatus::Open),
        paid_before_link_cents: 100_000,
        paid_at: None,
        pdf_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    devis_roundtrip,
    Devis,
    Devis {
        id: "dev-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        client_id: "cli-a3f8b2c1".into(),
        number: "D-2027-001".into(),
        items: vec![],
        total_cents: 300_000,
        status: DevisStatus::Sent,
        valid_until: date(2027, 1, 31),
        signature: Some(signature(EnvelopeStatus::Sent)),
        invoice_id: None,
        pdf_url: Some("https://res.cloudinary.com/demo/devis.pdf".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    contract_roundtrip,
    Contract,
    Contract {
        id: "ctr-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        client_id: "cli-a3f8b2c1".into(),
        title: "Contrat de prestation".into(),
        status: ContractStatus::PartiallySigned,
        signature: Some(signature(EnvelopeStatus::Delivered)),
        pdf_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    vendor_roundtrip,
    Vendor,
    Vendor {
        id: "vnd-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        name: "Fleurs de Lyon".into(),
        category: Some("florist".into()),
        email: None,
        phone: Some("+33 4 00 00 00 00".into()),
        website: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    article_roundtrip,
    Article,
    Article {
        id: "art-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        name: "Glass vase".into(),
        category: None,
        unit_price_cents: 450,
        stock: 40,
        warehouse_id: Some("whs-a3f8b2c1".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    composition_roundtrip,
    Composition,
    Composition {
        id: "cmp-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        name: "Table centerpiece".into(),
        description: None,
        items: vec![CompositionItem {
            article_id: "art-a3f8b2c1".into(),
            quantity: 3,
        }],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    warehouse_roundtrip,
    Warehouse,
    Warehouse {
        id: "whs-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        name: "Dépôt Villeurbanne".into(),
        address: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    post_it_roundtrip,
    PostIt,
    PostIt {
        id: "pst-a3f8b2c1".into(),
        planner_id: "uid-planner".into(),
        content: "Call the caterer about vegan menus".into(),
        color: PostItColor::Pink,
        client_id: None,
        pinned: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    integration_roundtrip,
    IntegrationCredentials,
    IntegrationCredentials {
        id: "qonto:uid-planner".into(),
        planner_id: "uid-planner".into(),
        provider: "qonto".into(),
        access_token: "at".into(),
        refresh_token: Some("rt".into()),
        expires_at: Some(Utc::now()),
        scope: Some("payment_link.write offline_access".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    sync_report_roundtrip,
    SyncReport,
    SyncReport {
        checked: 3,
        updated: 1,
        failed: 1,
        failures: vec![SyncFailure {
            id: "inv-1".into(),
            error: "boom".into(),
        }],
    }
);

roundtrip_and_validate!(
    composition_cost_roundtrip,
    CompositionCost,
    CompositionCost {
        composition_id: "cmp-1".into(),
        total_cents: 1350,
        missing_articles: vec!["art-gone".into()],
    }
);

#[test]
fn sparse_document_fills_defaults() {
    let json = serde_json::json!({
        "id": "tsk-1",
        "planner_id": "local",
        "title": "Pick the menu",
        "created_at": "2026-10-01T10:00:00Z",
        "updated_at": "2026-10-01T10:00:00Z",
        "legacy_field": "kept in the store, ignored here"
    });
    let task: Task = serde_json::from_value(json).unwrap();
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert!(task.client_id.is_none());
}

#[test]
fn signed_count_counts_completed_signers() {
    assert_eq!(signature(EnvelopeStatus::Delivered).signed_count(), 1);
}
