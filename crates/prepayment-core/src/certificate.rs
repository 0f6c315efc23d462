use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::amount_due::{
    amount_due_breakdown, option_warnings, result_warnings, AmountDueBreakdown, PaymentInputs,
    RawPaymentFields, Saturating,
};
use crate::display::format_money;
use crate::error::PrepaymentError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::words::format_amount_in_words;
use crate::PrepaymentResult;

/// A certificate covers at most this many projects side by side.
pub const MAX_PROJECTS: usize = 3;

/// Details-sheet column for each project, by position.
pub const PROJECT_COLUMNS: [&str; MAX_PROJECTS] = ["B", "E", "H"];

pub const CONTRACTOR_ROW: u32 = 5;
pub const PROJECT_NAME_ROW: u32 = 7;
/// Details-sheet rows for the payment fields, in `RawPaymentFields::FIELD_NAMES` order.
pub const PAYMENT_FIELD_ROWS: [u32; 7] = [9, 11, 12, 13, 14, 15, 16];
const PAYMENT_FIELD_LABELS: [&str; 7] = [
    "Contract sum",
    "Advance payment %",
    "Work completed",
    "Retention %",
    "Previous payment",
    "Advance refund %",
    "VAT %",
];
/// Details-sheet row holding the formatted amount due.
pub const AMOUNT_DUE_ROW: u32 = 18;
/// Details-sheet row holding the amount in words.
pub const AMOUNT_IN_WORDS_ROW: u32 = 19;

const DEFAULT_CONTRACTOR: &str = "Contractor";
const DEFAULT_PROJECT: &str = "Project";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Payment stage options offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStage {
    #[serde(rename = "Stage Payment")]
    StagePayment,
    #[serde(rename = "Final Payment")]
    FinalPayment,
    Retention,
}

impl PaymentStage {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStage::StagePayment => "Stage Payment",
            PaymentStage::FinalPayment => "Final Payment",
            PaymentStage::Retention => "Retention",
        }
    }
}

impl fmt::Display for PaymentStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Form snapshot for one Prepayment Certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateInput {
    #[serde(default)]
    pub contractor: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_stage: Option<PaymentStage>,
    /// Payment fields for each project, in column order
    pub projects: Vec<RawPaymentFields>,
}

/// Computed figures for one project column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResult {
    /// 1-based column position on the certificate
    pub project: usize,
    /// Details-sheet column letter
    pub column: String,
    /// Form fields as entered
    pub raw: RawPaymentFields,
    pub inputs: PaymentInputs,
    pub breakdown: AmountDueBreakdown,
    pub amount_due: Money,
    pub amount_due_display: String,
    pub amount_in_words: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateOutput {
    pub contractor: String,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_stage: Option<PaymentStage>,
    pub projects: Vec<ProjectResult>,
    /// Sum of amount due across all projects
    pub total_amount_due: Money,
    /// Suggested download name for the filled spreadsheet
    pub file_name: String,
}

/// One details-sheet row: a value per project column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsRow {
    pub row: u32,
    pub label: &'static str,
    pub values: Vec<String>,
}

impl CertificateOutput {
    /// Column letters used by this certificate's projects.
    pub fn columns(&self) -> Vec<&str> {
        self.projects.iter().map(|p| p.column.as_str()).collect()
    }

    /// Every row written to the details sheet, one value per project column.
    /// Inputs are carried as typed; rows 18 and 19 hold the calculated figures.
    pub fn details_rows(&self) -> Vec<DetailsRow> {
        let count = self.projects.len();
        let mut rows = vec![
            DetailsRow {
                row: CONTRACTOR_ROW,
                label: "Contractor",
                values: vec![self.contractor.clone(); count],
            },
            DetailsRow {
                row: PROJECT_NAME_ROW,
                label: "Project name",
                values: vec![self.project_name.clone(); count],
            },
        ];

        for (i, (row, label)) in PAYMENT_FIELD_ROWS.iter().zip(PAYMENT_FIELD_LABELS).enumerate() {
            rows.push(DetailsRow {
                row: *row,
                label,
                values: self
                    .projects
                    .iter()
                    .map(|p| p.raw.values()[i].to_string())
                    .collect(),
            });
        }

        rows.push(DetailsRow {
            row: AMOUNT_DUE_ROW,
            label: "Amount due",
            values: self
                .projects
                .iter()
                .map(|p| p.amount_due_display.clone())
                .collect(),
        });
        rows.push(DetailsRow {
            row: AMOUNT_IN_WORDS_ROW,
            label: "Amount in words",
            values: self
                .projects
                .iter()
                .map(|p| p.amount_in_words.clone())
                .collect(),
        });
        rows
    }

    /// The same content as `(cell, value)` pairs, e.g. `("E18", "200,000.50")`.
    pub fn details_cells(&self) -> Vec<(String, String)> {
        let columns = self.columns();
        self.details_rows()
            .into_iter()
            .flat_map(|r| {
                let row = r.row;
                columns
                    .iter()
                    .zip(r.values)
                    .map(move |(col, value)| (format!("{col}{row}"), value))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

fn sanitize_file_component(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// `"{project}_by_{contractor}.xlsx"`, with blank names defaulted.
pub fn certificate_file_name(project_name: &str, contractor: &str) -> String {
    format!(
        "{}_by_{}.xlsx",
        sanitize_file_component(or_default(project_name, DEFAULT_PROJECT)),
        sanitize_file_component(or_default(contractor, DEFAULT_CONTRACTOR)),
    )
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Compute amount due and words for every project on the certificate.
pub fn build_certificate(
    input: &CertificateInput,
) -> PrepaymentResult<ComputationOutput<CertificateOutput>> {
    let start = Instant::now();

    if input.projects.is_empty() || input.projects.len() > MAX_PROJECTS {
        return Err(PrepaymentError::InvalidInput {
            field: "projects".into(),
            reason: format!(
                "A certificate needs between 1 and {MAX_PROJECTS} projects, got {}",
                input.projects.len()
            ),
        });
    }

    let mut warnings: Vec<String> = Vec::new();
    let mut projects = Vec::with_capacity(input.projects.len());

    for (idx, raw) in input.projects.iter().enumerate() {
        let number = idx + 1;
        let (inputs, mut project_warnings) = raw.parse_with_warnings();
        project_warnings.extend(option_warnings(&inputs));

        let breakdown = amount_due_breakdown(&inputs);
        let amount_due = breakdown.amount_due;
        project_warnings.extend(result_warnings(&breakdown));
        warnings.extend(
            project_warnings
                .into_iter()
                .map(|w| format!("Project {number}: {w}")),
        );

        projects.push(ProjectResult {
            project: number,
            column: PROJECT_COLUMNS[idx].to_string(),
            raw: raw.clone(),
            amount_due_display: format_money(amount_due),
            amount_in_words: format_amount_in_words(amount_due),
            amount_due,
            breakdown,
            inputs,
        });
    }

    if input.contractor.trim().is_empty() {
        warnings.push(format!("Contractor is blank; using '{DEFAULT_CONTRACTOR}'"));
    }
    if input.project_name.trim().is_empty() {
        warnings.push(format!("Project name is blank; using '{DEFAULT_PROJECT}'"));
    }

    let mut ops = Saturating::default();
    let total_amount_due = projects
        .iter()
        .fold(Money::ZERO, |total, p| ops.add(total, p.amount_due));
    if ops.hit {
        warnings.push(format!(
            "Total amount due overflowed the decimal range; clamped to {}",
            format_money(total_amount_due)
        ));
    }

    let output = CertificateOutput {
        contractor: or_default(&input.contractor, DEFAULT_CONTRACTOR).to_string(),
        project_name: or_default(&input.project_name, DEFAULT_PROJECT).to_string(),
        payment_stage: input.payment_stage,
        file_name: certificate_file_name(&input.project_name, &input.contractor),
        total_amount_due,
        projects,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Prepayment certificate: per-project amount due with naira/kobo words",
        &serde_json::json!({
            "project_count": input.projects.len(),
            "max_projects": MAX_PROJECTS,
            "columns": &PROJECT_COLUMNS[..input.projects.len()],
            "amount_due_row": AMOUNT_DUE_ROW,
            "amount_in_words_row": AMOUNT_IN_WORDS_ROW,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
