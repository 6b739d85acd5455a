mod common;

use common::{labelled, num, text};
use invoice_cleaner::ToolError;
use invoice_cleaner::clean::{CanonicalFields, SynonymTable};
use invoice_cleaner::model::{CellValue, Table};

fn template() -> Table {
    labelled(
        &["PO", "Inv", "Date", "Value", "Payee"],
        vec![
            vec![text("PO No"), text("Inv No"), text("Inv Date"), text("Amount"), text("Payee")],
            vec![
                text("PO Number"),
                text("Invoice Number"),
                CellValue::Empty,
                text("Amount"),
                num(0.0),
            ],
            vec![
                text("Purchase Order"),
                CellValue::Empty,
                CellValue::Empty,
                text("Invoice Value"),
                CellValue::Empty,
            ],
        ],
    )
}

#[test]
fn template_columns_map_to_fields_by_position() {
    let synonyms = SynonymTable::from_template(&template(), &CanonicalFields::default())
        .expect("synonym table built");

    let fields: Vec<&str> = synonyms.fields().collect();
    assert_eq!(
        fields,
        vec!["Purchase Order", "Invoice", "Invoice Date", "Invoice Value", "Payee Number"]
    );
    assert_eq!(
        synonyms.synonyms("Purchase Order"),
        ["PO No", "PO Number", "Purchase Order"]
    );
    assert_eq!(synonyms.synonyms("Invoice"), ["Inv No", "Invoice Number"]);
    assert_eq!(synonyms.invoice_date_synonyms(), ["Inv Date"]);
}

#[test]
fn filler_cells_and_duplicates_are_removed() {
    let synonyms = SynonymTable::from_template(&template(), &CanonicalFields::default())
        .expect("synonym table built");

    assert_eq!(synonyms.synonyms("Invoice Value"), ["Amount", "Invoice Value"]);
    assert_eq!(synonyms.synonyms("Payee Number"), ["Payee"]);
}

#[test]
fn repeated_builds_are_identical() {
    let fields = CanonicalFields::default();
    let first = SynonymTable::from_template(&template(), &fields).expect("first build");
    let second = SynonymTable::from_template(&template(), &fields).expect("second build");

    assert_eq!(first, second);
}

#[test]
fn column_count_mismatch_is_rejected() {
    let short = labelled(&["PO", "Inv"], vec![vec![text("PO No"), text("Inv No")]]);

    let error = SynonymTable::from_template(&short, &CanonicalFields::default())
        .expect_err("mismatch detected");

    assert!(matches!(
        error,
        ToolError::TemplateMismatch {
            expected: 5,
            found: 2
        }
    ));
}

#[test]
fn custom_field_names_are_honoured() {
    let fields = CanonicalFields {
        names: vec!["Order".into(), "Booked".into()],
        purchase_order: "Order".into(),
        invoice_date: "Booked".into(),
    };
    let template = labelled(&["a", "b"], vec![vec![text("PO"), text("Date")]]);

    let synonyms = SynonymTable::from_template(&template, &fields).expect("synonym table built");

    assert_eq!(synonyms.purchase_order_synonyms(), ["PO"]);
    assert_eq!(synonyms.invoice_date_synonyms(), ["Date"]);
}

#[test]
fn role_fields_must_be_configured_names() {
    let fields = CanonicalFields {
        names: vec!["Order".into(), "Booked".into()],
        purchase_order: "Purchase Order".into(),
        invoice_date: "Booked".into(),
    };

    assert!(matches!(fields.validate(), Err(ToolError::InvalidFields(_))));
}

#[test]
fn duplicate_field_names_are_rejected() {
    let fields = CanonicalFields {
        names: vec!["Order".into(), "Order".into()],
        purchase_order: "Order".into(),
        invoice_date: "Order".into(),
    };

    assert!(matches!(fields.validate(), Err(ToolError::InvalidFields(_))));
}

#[test]
fn synonym_table_serialises_in_field_order() {
    let synonyms = SynonymTable::from_template(&template(), &CanonicalFields::default())
        .expect("synonym table built");

    let json = serde_json::to_value(&synonyms).expect("serialised");

    assert_eq!(json["entries"][0]["field"], "Purchase Order");
    assert_eq!(json["entries"][4]["synonyms"], serde_json::json!(["Payee"]));
}
