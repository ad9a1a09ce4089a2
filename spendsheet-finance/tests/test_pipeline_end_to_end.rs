use rust_decimal_macros::dec;
use spendsheet_core::{Category, Kind};
use spendsheet_finance::{CsvDirPublisher, SourceInput, publish_by_category, run_pipeline};
use spendsheet_ingest::{IngestSettings, Source};
use std::fs;
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
}

fn all_inputs() -> Vec<SourceInput> {
    let dir = fixtures();
    vec![
        SourceInput::new(Source::Bank, dir.join("bank.csv")),
        SourceInput::new(Source::Brokerage, dir.join("brokerage.csv")),
        SourceInput::new(Source::MembershipCard, dir.join("card.csv")),
    ]
}

/// Full run over the three fixture exports: adapters, merge, categorize, sort.
#[test]
fn test_fixture_exports_merge_in_date_order() {
    let out = run_pipeline(all_inputs(), &IngestSettings::default()).unwrap();
    assert!(out.is_complete());

    let got: Vec<[String; 5]> = out.records.iter().map(|r| r.fields()).collect();
    let expected = [
        ["03/01/2024", "CREDIT", "EMPLOYER INC", "2500.00", "INCOME"],
        ["03/02/2024", "DEBIT", "COSTCO", "12.50", "FOOD"],
        ["03/02/2024", "DEBIT", "COSTCO GAS", "41.07", "CAR"],
        ["03/02/2024", "DEBIT", "RENTERS INSURANCE", "18.00", "HOUSING"],
        ["03/04/2024", "DEBIT", "CAR INSURANCE", "95.00", "HOUSING"],
        ["03/05/2024", "DEBIT", "SAFEWAY", "30.10", "FOOD"],
        ["03/07/2024", "DEBIT", "SPOTIFY", "11.99", "SUBSCRIPTIONS"],
        ["03/08/2024", "DEBIT", "JOE'S CORNER STORE", "7.25", "OTHER"],
        ["03/09/2024", "DEBIT", "HULU", "17.99", "SUBSCRIPTIONS"],
        ["03/11/2024", "DEBIT", "GROOMER", "55.00", "PET"],
        ["03/12/2024", "CREDIT", "AMAZON", "-19.99", "INCOME"],
        ["03/12/2024", "DEBIT", "XCEL ENERGY", "61.20", "UTILITIES"],
        ["03/14/2024", "DEBIT", "AMAZON PRIME", "14.99", "SUBSCRIPTIONS"],
        ["03/15/2024", "CREDIT", "REFUND SHOP", "-40.00", "INCOME"],
        ["03/31/2024", "CREDIT", "INTEREST", "1.37", "INCOME"],
    ];
    assert_eq!(got.len(), expected.len());
    for (row, want) in got.iter().zip(expected.iter()) {
        assert_eq!(row, want);
    }
}

#[test]
fn test_credits_are_income_and_every_record_categorized() {
    let out = run_pipeline(all_inputs(), &IngestSettings::default()).unwrap();
    for c in &out.records {
        if c.record.kind == Kind::Credit {
            assert_eq!(c.category, Category::Income, "{}", c.record.name);
        }
        assert!(Category::ALL.contains(&c.category));
        assert!(!c.record.name.is_empty());
        assert_eq!(c.record.name, c.record.name.trim());
    }
}

#[test]
fn test_raised_threshold_reclassifies_insurance() {
    let settings = IngestSettings {
        insurance_threshold: dec!(100.00),
    };
    let out = run_pipeline(all_inputs(), &settings).unwrap();
    let insurance: Vec<_> = out
        .records
        .iter()
        .filter(|c| c.record.name.ends_with("INSURANCE"))
        .map(|c| c.record.name.as_str())
        .collect();
    assert_eq!(insurance, vec!["RENTERS INSURANCE", "RENTERS INSURANCE"]);
}

#[test]
fn test_publish_to_csv_directory() {
    let out = run_pipeline(all_inputs(), &IngestSettings::default()).unwrap();
    let dir = std::env::temp_dir().join(format!("spendsheet-e2e-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    let dest = dir.to_string_lossy().to_string();

    let mut publisher = CsvDirPublisher::new();
    let summary = publish_by_category(&mut publisher, &dest, &out.records).unwrap();

    assert_eq!(publisher.written().len(), Category::ALL.len());
    // 15 data rows and 9 header rows, 3 columns each
    assert_eq!(summary.total_cells(), 3 * (15 + 9));

    let income = fs::read_to_string(dir.join("Income.csv")).unwrap();
    let lines: Vec<&str> = income.lines().collect();
    assert_eq!(lines[0], "Date,Name,Amount");
    assert_eq!(lines[1], "03/01/2024,EMPLOYER INC,2500.00");
    assert_eq!(lines.len(), 5);

    let medical = fs::read_to_string(dir.join("Medical.csv")).unwrap();
    assert_eq!(medical.trim_end(), "Date,Name,Amount");

    let _ = fs::remove_dir_all(&dir);
}
