use clap::Args;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

use prepayment_core::certificate::{self, CertificateInput, CertificateOutput};

use crate::input;

/// Arguments for building a full certificate
#[derive(Args)]
pub struct CertificateArgs {
    /// Path to JSON/YAML certificate snapshot
    #[arg(long)]
    pub input: Option<String>,

    /// Also write the calculated details-sheet rows to this CSV file
    #[arg(long)]
    pub export_csv: Option<PathBuf>,
}

/// Write `row,label,B,...` (one column per project letter) followed by one
/// line per details-sheet row.
pub fn export_details_csv(
    output: &CertificateOutput,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| format!("Failed to create '{}': {}", path.display(), e))?;

    let mut header = vec!["row".to_string(), "label".to_string()];
    header.extend(output.columns().into_iter().map(String::from));
    wtr.write_record(&header)?;

    for details in output.details_rows() {
        let mut record = vec![details.row.to_string(), details.label.to_string()];
        record.extend(details.values);
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run_certificate(args: CertificateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cert_input: CertificateInput = input::read_input(args.input.as_deref(), "certificate")?;
    let result = certificate::build_certificate(&cert_input)?;

    if let Some(ref path) = args.export_csv {
        export_details_csv(&result.result, path)?;
        info!(path = %path.display(), file_name = %result.result.file_name, "details rows exported");
    }

    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepayment_core::amount_due::RawPaymentFields;
    use prepayment_core::certificate::PaymentStage;

    #[test]
    fn test_export_details_csv() {
        let input = CertificateInput {
            contractor: "Okafor Ltd".to_string(),
            project_name: "Ikeja Road".to_string(),
            payment_stage: None,
            projects: vec![
                RawPaymentFields {
                    work_completed: "1,000".to_string(),
                    ..Default::default()
                },
                RawPaymentFields {
                    work_completed: "21.5".to_string(),
                    ..Default::default()
                },
            ],
        };
        let out = certificate::build_certificate(&input).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("details.csv");
        export_details_csv(&out.result, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "row,label,B,E");
        assert_eq!(lines[1], "5,Contractor,Okafor Ltd,Okafor Ltd");
        assert_eq!(lines[5], "12,Work completed,\"1,000\",21.5");
        assert_eq!(lines[10], "18,Amount due,\"1,000.00\",21.50");
        assert_eq!(
            lines[11],
            "19,Amount in words,One thousand naira,\"Twenty one naira, fifty kobo\""
        );
    }

    #[test]
    fn test_export_three_projects_uses_b_e_h() {
        let project = |work: &str, vat: &str| RawPaymentFields {
            work_completed: work.to_string(),
            vat_percent: vat.to_string(),
            ..Default::default()
        };
        let input = CertificateInput {
            contractor: "Bello".to_string(),
            project_name: "Kano Water".to_string(),
            payment_stage: Some(PaymentStage::FinalPayment),
            projects: vec![project("100", ""), project("200", "7.5%"), project("300", "nil")],
        };
        let out = certificate::build_certificate(&input).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("details.csv");
        export_details_csv(&out.result, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["row", "label", "B", "E", "H"]);

        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        let vat = records.iter().find(|r| &r[0] == "16").unwrap();
        assert_eq!(vat.iter().collect::<Vec<_>>(), vec!["16", "VAT %", "", "7.5%", "nil"]);
        let due = records.iter().find(|r| &r[0] == "18").unwrap();
        assert_eq!(due.iter().collect::<Vec<_>>(), vec!["18", "Amount due", "100.00", "215.00", "300.00"]);
    }
}
