//! Built-in schemas for the console's business modules, with demo sample data
//!
//! Sample rows are written as JSON and go through the same boundary decoder
//! as REST payloads.

use super::field::{BadgeTone, FieldDescriptor};
use super::record::Record;
use super::schema::RecordSchema;
use serde_json::{Value, json};

/// Names of all built-in schemas
pub const BUILTIN_SCHEMAS: &[&str] = &[
    "bank-documents",
    "billing",
    "tenders",
    "employees",
    "attendance",
    "inventory",
];

/// Look up a built-in schema by name
pub fn builtin_schema(name: &str) -> Option<RecordSchema> {
    let schema = match name {
        "bank-documents" => bank_documents(),
        "billing" => billing(),
        "tenders" => tenders(),
        "employees" => employees(),
        "attendance" => attendance(),
        "inventory" => inventory(),
        _ => return None,
    };
    Some(schema)
}

/// Demo records for a built-in schema (empty for unknown schemas)
pub fn sample_records(schema: &RecordSchema) -> Vec<Record> {
    sample_records_of(&schema.name, schema)
}

/// Demo records of the catalog entry `catalog_name`, decoded through `schema`
///
/// Used when a module reuses a built-in schema under another name.
pub fn sample_records_of(catalog_name: &str, schema: &RecordSchema) -> Vec<Record> {
    let rows = sample_rows(catalog_name);
    let (records, _) = schema.decode_all(&rows);
    records
}

fn bank_documents() -> RecordSchema {
    RecordSchema::new(
        "bank-documents",
        "Bank Documents",
        vec![
            FieldDescriptor::text("document_no", "Document No.").required(),
            FieldDescriptor::select(
                "doc_type",
                "Type",
                &["Bank Guarantee", "Letter of Credit", "Fixed Deposit", "Statement"],
            )
            .required(),
            FieldDescriptor::text("bank", "Bank").required(),
            FieldDescriptor::currency("amount", "Amount"),
            FieldDescriptor::date("issue_date", "Issue Date"),
            FieldDescriptor::date("expiry_date", "Expiry Date"),
            FieldDescriptor::status(
                "status",
                "Status",
                &[
                    ("Active", BadgeTone::Success),
                    ("Expiring", BadgeTone::Warning),
                    ("Expired", BadgeTone::Danger),
                    ("Released", BadgeTone::Info),
                ],
            ),
            FieldDescriptor::textarea("remarks", "Remarks"),
        ],
    )
    .searchable(&["document_no", "bank", "remarks"])
    .filterable(&["doc_type", "status"])
}

fn billing() -> RecordSchema {
    RecordSchema::new(
        "billing",
        "Billing Entries",
        vec![
            FieldDescriptor::text("invoice_no", "Invoice No.").required(),
            FieldDescriptor::text("customer", "Customer").required(),
            FieldDescriptor::currency("amount", "Amount").required(),
            FieldDescriptor::date("due_date", "Due Date"),
            FieldDescriptor::status(
                "status",
                "Status",
                &[
                    ("Paid", BadgeTone::Success),
                    ("Pending", BadgeTone::Warning),
                    ("Overdue", BadgeTone::Danger),
                ],
            )
            .with_fallback("Pending")
            .required(),
            FieldDescriptor::textarea("notes", "Notes"),
        ],
    )
    .searchable(&["invoice_no", "customer"])
    .filterable(&["status"])
}

fn tenders() -> RecordSchema {
    RecordSchema::new(
        "tenders",
        "Tenders",
        vec![
            FieldDescriptor::text("reference", "Reference").required(),
            FieldDescriptor::text("title", "Title").required(),
            FieldDescriptor::select(
                "department",
                "Department",
                &["Civil", "Electrical", "Procurement", "IT"],
            ),
            FieldDescriptor::currency("estimated_value", "Estimated Value"),
            FieldDescriptor::date("closing_date", "Closing Date").required(),
            FieldDescriptor::status(
                "status",
                "Status",
                &[
                    ("Open", BadgeTone::Info),
                    ("Submitted", BadgeTone::Warning),
                    ("Awarded", BadgeTone::Success),
                    ("Rejected", BadgeTone::Danger),
                ],
            )
            .with_fallback("Open"),
            FieldDescriptor::textarea("description", "Description"),
        ],
    )
    .searchable(&["reference", "title", "description"])
    .filterable(&["department", "status"])
}

fn employees() -> RecordSchema {
    RecordSchema::new(
        "employees",
        "Employees",
        vec![
            FieldDescriptor::text("name", "Name").required(),
            FieldDescriptor::text("email", "Email"),
            FieldDescriptor::select(
                "department",
                "Department",
                &["HR", "Finance", "Operations", "Store", "IT"],
            )
            .required(),
            FieldDescriptor::text("designation", "Designation"),
            FieldDescriptor::date("joining_date", "Joining Date"),
            FieldDescriptor::currency("salary", "Salary"),
            FieldDescriptor::status(
                "status",
                "Status",
                &[
                    ("Active", BadgeTone::Success),
                    ("On Leave", BadgeTone::Warning),
                    ("Resigned", BadgeTone::Neutral),
                ],
            )
            .with_fallback("Active"),
        ],
    )
    .searchable(&["name", "email", "designation"])
    .filterable(&["department", "status"])
}

fn attendance() -> RecordSchema {
    RecordSchema::new(
        "attendance",
        "Attendance",
        vec![
            FieldDescriptor::text("employee", "Employee").required(),
            FieldDescriptor::date("date", "Date").required(),
            FieldDescriptor::text("check_in", "Check In"),
            FieldDescriptor::text("check_out", "Check Out"),
            FieldDescriptor::number("hours", "Hours"),
            FieldDescriptor::status(
                "status",
                "Status",
                &[
                    ("Present", BadgeTone::Success),
                    ("Late", BadgeTone::Warning),
                    ("Half Day", BadgeTone::Info),
                    ("Absent", BadgeTone::Danger),
                ],
            )
            .required(),
        ],
    )
    .searchable(&["employee"])
    .filterable(&["status"])
}

fn inventory() -> RecordSchema {
    RecordSchema::new(
        "inventory",
        "Store Inventory",
        vec![
            FieldDescriptor::text("item", "Item").required(),
            FieldDescriptor::text("sku", "SKU"),
            FieldDescriptor::select(
                "category",
                "Category",
                &["Raw Material", "Consumable", "Spare Part", "Finished Good"],
            ),
            FieldDescriptor::number("quantity", "Quantity").required(),
            FieldDescriptor::currency("unit_price", "Unit Price"),
            FieldDescriptor::status(
                "status",
                "Status",
                &[
                    ("In Stock", BadgeTone::Success),
                    ("Low Stock", BadgeTone::Warning),
                    ("Out of Stock", BadgeTone::Danger),
                ],
            )
            .with_fallback("In Stock"),
        ],
    )
    .searchable(&["item", "sku"])
    .filterable(&["category", "status"])
}

fn sample_rows(name: &str) -> Vec<Value> {
    match name {
        "bank-documents" => vec![
            json!({ "id": 1, "document_no": "BG-2024-001", "doc_type": "Bank Guarantee", "bank": "State Bank", "amount": 250000, "issue_date": "2024-01-10", "expiry_date": "2025-01-09", "status": "Active" }),
            json!({ "id": 2, "document_no": "LC-2024-014", "doc_type": "Letter of Credit", "bank": "City Union Bank", "amount": 78000.5, "issue_date": "2024-03-02", "expiry_date": "2024-09-01", "status": "Expired", "remarks": "Renewal requested" }),
            json!({ "id": 3, "document_no": "FD-2023-112", "doc_type": "Fixed Deposit", "bank": "State Bank", "amount": 100000, "issue_date": "2023-11-20", "status": "Released" }),
        ],
        "billing" => vec![
            json!({ "id": 1, "invoice_no": "INV-1001", "customer": "Acme Traders", "amount": 12500, "due_date": "2024-04-15", "status": "Paid" }),
            json!({ "id": 2, "invoice_no": "INV-1002", "customer": "Globex Ltd", "amount": 8400.75, "due_date": "2024-05-01", "status": "Pending" }),
            json!({ "id": 3, "invoice_no": "INV-1003", "customer": "Initech", "amount": 3200, "due_date": "2024-03-01", "status": "Overdue", "notes": "Second reminder sent" }),
        ],
        "tenders" => vec![
            json!({ "id": 1, "reference": "TN/CIV/24/07", "title": "Warehouse roofing", "department": "Civil", "estimated_value": 1850000, "closing_date": "2024-06-30", "status": "Open" }),
            json!({ "id": 2, "reference": "TN/IT/24/02", "title": "Network switches", "department": "IT", "estimated_value": 420000, "closing_date": "2024-05-15", "status": "Submitted" }),
        ],
        "employees" => vec![
            json!({ "id": 1, "name": "Priya Raman", "email": "priya@example.com", "department": "Finance", "designation": "Accountant", "joining_date": "2021-07-01", "salary": 54000, "status": "Active" }),
            json!({ "id": 2, "name": "Arun Kumar", "email": "arun@example.com", "department": "Store", "designation": "Store Keeper", "joining_date": "2019-02-11", "salary": 38000, "status": "On Leave" }),
            json!({ "id": 3, "name": "Meena Das", "department": "HR", "designation": "HR Executive", "joining_date": "2022-10-03", "status": "Active" }),
        ],
        "attendance" => vec![
            json!({ "id": 1, "employee": "Priya Raman", "date": "2024-04-01", "check_in": "09:02", "check_out": "18:05", "hours": 9, "status": "Present" }),
            json!({ "id": 2, "employee": "Arun Kumar", "date": "2024-04-01", "check_in": "10:15", "check_out": "18:00", "hours": 7.75, "status": "Late" }),
            json!({ "id": 3, "employee": "Meena Das", "date": "2024-04-01", "status": "Absent" }),
        ],
        "inventory" => vec![
            json!({ "id": 1, "item": "Steel rod 12mm", "sku": "RM-STL-12", "category": "Raw Material", "quantity": 1200, "unit_price": 64.5, "status": "In Stock" }),
            json!({ "id": 2, "item": "Safety gloves", "sku": "CN-GLV-01", "category": "Consumable", "quantity": 18, "unit_price": 120, "status": "Low Stock" }),
            json!({ "id": 3, "item": "Bearing 6205", "sku": "SP-BRG-6205", "category": "Spare Part", "quantity": 0, "unit_price": 310, "status": "Out of Stock" }),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::schema::DecodeIssue;

    fn builtin_schemas() -> Vec<RecordSchema> {
        BUILTIN_SCHEMAS
            .iter()
            .filter_map(|name| builtin_schema(name))
            .collect()
    }

    #[test]
    fn test_all_builtin_schemas_are_valid() {
        for schema in builtin_schemas() {
            assert!(schema.validate().is_ok(), "{:?}", schema.validate());
        }
        assert_eq!(builtin_schemas().len(), BUILTIN_SCHEMAS.len());
    }

    #[test]
    fn test_sample_rows_decode_without_issues() {
        for schema in builtin_schemas() {
            let rows = sample_rows(&schema.name);
            assert!(!rows.is_empty(), "no samples for {}", schema.name);
            for row in &rows {
                let (record, issues): (Record, Vec<DecodeIssue>) =
                    schema.decode(row.as_object().unwrap()).unwrap();
                assert!(issues.is_empty(), "{}: {:?}", schema.name, issues);
                assert!(
                    schema.missing_required(&record).is_empty(),
                    "{} #{} is missing required fields",
                    schema.name,
                    record.id
                );
            }
        }
    }

    #[test]
    fn test_unknown_schema() {
        assert!(builtin_schema("payroll").is_none());
    }
}
