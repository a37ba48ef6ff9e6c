use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;

use crate::core::model::{fields, ConsolidatedDocument, MergedRecord};
use crate::export::Exporter;
use crate::merge::fields::is_nullish;

/// Column set of the flattened maintenance inventory sheet. Several
/// columns stay empty on purpose: the downstream template expects them
/// and fills them by hand.
const COLUMNS: [&str; 19] = [
    "Analyse",
    "Assembly level",
    "ATA",
    "Kardex No",
    "Kardex designation/ Function",
    "Designation",
    "F.I.N. Code",
    "Zone",
    "ACCESS",
    "P/N",
    "S/N",
    "Installation Date A/C",
    "TSN A/C",
    "CSN A/C",
    "Item Consumed (at installation).NEW",
    "Item Consumed (at installation).Overhaul",
    "Item Consumed (at installation).Maintenance",
    "Item Consumed (at installation).Inspection",
    "MONITORING",
];

/// Writes one CSV row per consolidated record, mapping the fixed column
/// set to record fields plus the synthetic Kardex and consumption columns.
#[derive(Debug, Clone)]
pub struct TableExporter {
    out_dir: PathBuf,
}

impl TableExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn record_row(record: &MergedRecord) -> Vec<String> {
        let ata = field_text(record, fields::ATA);
        let name = field_text(record, fields::NAME);

        let kardex_no = if ata.is_empty() {
            String::new()
        } else {
            format!("{ata}-??-????")
        };
        let ata_col = if ata.is_empty() {
            String::new()
        } else {
            format!("{ata}-??")
        };
        let kardex_designation = if name.is_empty() {
            String::new()
        } else {
            format!("{name} ??")
        };

        let monitoring = match record.field(fields::INVENTORY_LIFED_COMPONENTS) {
            Some(Value::Bool(true)) => "HT LLP",
            _ => "O/C",
        };

        vec![
            String::new(),
            String::new(),
            ata_col,
            kardex_no,
            kardex_designation,
            name,
            String::new(),
            String::new(),
            String::new(),
            field_text(record, fields::MANUFACTURER_PN),
            field_text(record, fields::SN),
            field_text(record, fields::INSTALL_DATE_AC),
            field_text(record, fields::TSN_AC),
            field_text(record, fields::CSN_AC),
            item_consumed_new(record),
            String::new(),
            String::new(),
            String::new(),
            monitoring.to_string(),
        ]
    }
}

impl Exporter for TableExporter {
    fn export(&self, document: &ConsolidatedDocument) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("logcards.csv");

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(COLUMNS)?;
        for record in &document.log_cards {
            writer.write_record(Self::record_row(record))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn field_text(record: &MergedRecord, key: &str) -> String {
    match record.field(key) {
        Some(value) if !is_nullish(value) => match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        },
        _ => String::new(),
    }
}

/// `"{TSN_Part} FH & {CSN_Part} & ?? OCY"` when either counter is known.
fn item_consumed_new(record: &MergedRecord) -> String {
    let tsn = field_text(record, fields::TSN_PART);
    let csn = field_text(record, fields::CSN_PART);
    if tsn.is_empty() && csn.is_empty() {
        return String::new();
    }
    format!("{tsn} FH & {csn} & ?? OCY")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::core::model::{PairInfo, SourceTextPair};

    fn record(data: &[(&str, Value)]) -> MergedRecord {
        MergedRecord {
            log_card: 1,
            page_numbers: vec![2, 3],
            log_card_data: data
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            original_markdown: SourceTextPair {
                front: String::new(),
                back: None,
            },
            pair_info: PairInfo {
                front: 1,
                back: Some(2),
            },
        }
    }

    fn row_map(record_row: Vec<String>) -> std::collections::HashMap<&'static str, String> {
        COLUMNS.iter().copied().zip(record_row).collect()
    }

    #[test]
    fn synthetic_columns_follow_their_templates() {
        let row = row_map(TableExporter::record_row(&record(&[
            (fields::ATA, json!("22")),
            (fields::NAME, json!("VERIN SEMA")),
            (fields::TSN_PART, json!("00:00")),
            (fields::CSN_PART, json!(0)),
            (fields::INVENTORY_LIFED_COMPONENTS, json!(true)),
        ])));
        assert_eq!(row["ATA"], "22-??");
        assert_eq!(row["Kardex No"], "22-??-????");
        assert_eq!(row["Kardex designation/ Function"], "VERIN SEMA ??");
        assert_eq!(row["Designation"], "VERIN SEMA");
        assert_eq!(
            row["Item Consumed (at installation).NEW"],
            "00:00 FH & 0 & ?? OCY"
        );
        assert_eq!(row["MONITORING"], "HT LLP");
    }

    #[test]
    fn missing_fields_leave_cells_empty() {
        let row = row_map(TableExporter::record_row(&record(&[(
            fields::SN,
            json!("1202"),
        )])));
        assert_eq!(row["ATA"], "");
        assert_eq!(row["Kardex No"], "");
        assert_eq!(row["S/N"], "1202");
        assert_eq!(row["Item Consumed (at installation).NEW"], "");
        // No lifed-components answer means on-condition monitoring.
        assert_eq!(row["MONITORING"], "O/C");
    }

    #[test]
    fn nullish_field_values_render_empty() {
        let row = row_map(TableExporter::record_row(&record(&[
            (fields::ATA, json!("N/A")),
            (fields::SN, Value::Null),
        ])));
        assert_eq!(row["ATA"], "");
        assert_eq!(row["S/N"], "");
    }

    #[test]
    fn row_width_matches_header() {
        let row = TableExporter::record_row(&record(&[]));
        assert_eq!(row.len(), COLUMNS.len());
    }
}
