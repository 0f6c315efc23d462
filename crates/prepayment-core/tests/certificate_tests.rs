use prepayment_core::amount_due::{self, PaymentInputs, RawPaymentFields};
use prepayment_core::certificate::{self, CertificateInput, PaymentStage};
use prepayment_core::fields::parse_field;
use prepayment_core::words::{self, AMOUNT_IN_WORDS_ERROR};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn scenario_fields() -> RawPaymentFields {
    RawPaymentFields {
        contract_sum: "1,000,000".to_string(),
        advance_payment_percent: "40%".to_string(),
        work_completed: "500,000".to_string(),
        retention_percent: "5%".to_string(),
        previous_payment: "0".to_string(),
        advance_refund_percent: "40%".to_string(),
        vat_percent: "7.5%".to_string(),
    }
}

// ===========================================================================
// Amount due — end to end
// ===========================================================================

#[test]
fn test_end_to_end_scenario() {
    let out = amount_due::calculate_amount_due(&scenario_fields()).unwrap();
    let b = &out.result.breakdown;
    assert_eq!(b.advance_payment, dec!(400000));
    assert_eq!(b.retention, dec!(25000));
    assert_eq!(b.total_net_payment, dec!(475000));
    assert_eq!(b.vat, dec!(35625));
    assert_eq!(b.total_net_amount, dec!(510625));
    assert_eq!(b.advance_refund_amount, dec!(160000));
    assert_eq!(out.result.amount_due, dec!(350625));
    assert_eq!(out.result.amount_due_display, "350,625.00");
    assert_eq!(
        out.result.amount_in_words,
        "Three hundred and fifty thousand six hundred and twenty five naira"
    );
}

#[test]
fn test_malformed_work_completed_yields_minus_previous_payment() {
    for previous in ["0", "1,500", "75,000.25"] {
        let raw = RawPaymentFields {
            work_completed: "abc".to_string(),
            previous_payment: previous.to_string(),
            ..Default::default()
        };
        let out = amount_due::calculate_amount_due(&raw).unwrap();
        assert_eq!(out.result.amount_due, -parse_field(previous));
    }
}

#[test]
fn test_amount_due_linear_in_previous_payment() {
    let base = scenario_fields().parse();
    let due = amount_due::compute_amount_due(&base);
    for delta in [dec!(1), dec!(0.01), dec!(350625), dec!(1000000)] {
        let shifted = PaymentInputs {
            previous_payment: base.previous_payment + delta,
            ..base.clone()
        };
        assert_eq!(amount_due::compute_amount_due(&shifted), due - delta);
    }
}

#[test]
fn test_overpayment_goes_negative_without_clamping() {
    let mut raw = scenario_fields();
    raw.previous_payment = "400,000".to_string();
    let out = amount_due::calculate_amount_due(&raw).unwrap();
    assert_eq!(out.result.amount_due, dec!(-49375));
    assert_eq!(out.result.amount_due_display, "-49,375.00");
    assert_eq!(
        out.result.amount_in_words,
        "Negative forty nine thousand three hundred and seventy five naira"
    );
}

// ===========================================================================
// Words
// ===========================================================================

#[test]
fn test_words_zero_and_kobo() {
    assert_eq!(words::format_amount_in_words(Decimal::ZERO), "Zero naira");
    assert!(!words::format_amount_in_words(dec!(100.00)).contains("kobo"));
    assert!(words::format_amount_in_words(dec!(100.5)).ends_with("fifty kobo"));
}

#[test]
fn test_words_never_hyphenated() {
    let mut amount = dec!(-1234.56);
    while amount < dec!(5000) {
        assert!(!words::format_amount_in_words(amount).contains('-'));
        amount += dec!(97.31);
    }
}

#[test]
fn test_words_placeholder_for_non_numeric_text() {
    assert_eq!(words::format_text_in_words("twelve"), AMOUNT_IN_WORDS_ERROR);
    assert!(words::try_format_amount_in_words(dec!(12)).is_ok());
}

#[test]
fn test_words_placeholder_for_out_of_range_text() {
    assert_eq!(words::format_text_in_words("1e30"), AMOUNT_IN_WORDS_ERROR);
    assert_eq!(
        words::format_text_in_words("79,228,162,514,264,337,593,543,950,336"),
        AMOUNT_IN_WORDS_ERROR
    );
}

// ===========================================================================
// Range limits
// ===========================================================================

#[test]
fn test_huge_inputs_saturate_with_warning() {
    let raw = RawPaymentFields {
        contract_sum: "79,228,162,514,264,337,593,543,950,335".to_string(),
        advance_payment_percent: "200".to_string(),
        advance_refund_percent: "100".to_string(),
        work_completed: "79,228,162,514,264,337,593,543,950,335".to_string(),
        vat_percent: "7.5".to_string(),
        ..Default::default()
    };
    let out = amount_due::calculate_amount_due(&raw).unwrap();
    assert!(out.result.breakdown.saturated);
    assert!(out.warnings.iter().any(|w| w.contains("overflowed")));
    assert!(!out.result.amount_in_words.is_empty());
}

#[test]
fn test_out_of_range_field_counts_as_zero_with_its_own_warning() {
    let mut raw = scenario_fields();
    raw.previous_payment = "1e40".to_string();
    let out = amount_due::calculate_amount_due(&raw).unwrap();
    assert_eq!(out.result.amount_due, dec!(350625));
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].starts_with("previousPayment: '1e40' is out of range"));
}

// ===========================================================================
// Certificate
// ===========================================================================

#[test]
fn test_certificate_from_json_snapshot() {
    let json = r#"{
        "contractor": "Bello Construction",
        "projectName": "Kano Water Scheme",
        "projects": [
            {
                "contractSum": "1,000,000",
                "advancePaymentPercent": "40%",
                "workCompleted": "500,000",
                "retentionPercent": "5%",
                "previousPayment": "nil",
                "advanceRefundPercent": "40%",
                "vatPercent": "7.5%"
            },
            { "workCompleted": "10,000.10" }
        ]
    }"#;
    let input: CertificateInput = serde_json::from_str(json).unwrap();
    let out = certificate::build_certificate(&input).unwrap();
    assert_eq!(out.result.projects.len(), 2);
    assert_eq!(out.result.projects[0].amount_due, dec!(350625));
    assert_eq!(
        out.result.projects[1].amount_in_words,
        "Ten thousand naira, ten kobo"
    );
    assert_eq!(out.result.total_amount_due, dec!(360625.10));
    assert_eq!(out.result.file_name, "Kano Water Scheme_by_Bello Construction.xlsx");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_certificate_accepts_numeric_json_values() {
    let json = r#"{
        "contractor": "Bello Construction",
        "projectName": "Kano Water Scheme",
        "paymentStage": "Stage Payment",
        "projects": [
            {
                "contractSum": 1000000,
                "advancePaymentPercent": 40,
                "workCompleted": 500000,
                "retentionPercent": 5,
                "previousPayment": null,
                "advanceRefundPercent": 40,
                "vatPercent": 7.5
            }
        ]
    }"#;
    let input: CertificateInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.payment_stage, Some(PaymentStage::StagePayment));
    let out = certificate::build_certificate(&input).unwrap();
    assert_eq!(out.result.projects[0].amount_due, dec!(350625));
    assert_eq!(out.result.projects[0].raw.vat_percent, "7.5");
    assert!(out.warnings.is_empty());
}

#[test]
fn test_certificate_flags_unknown_percent_and_stage() {
    let mut fields = scenario_fields();
    fields.vat_percent = "10%".to_string();
    let input = CertificateInput {
        contractor: "Bello".to_string(),
        project_name: "Kano".to_string(),
        payment_stage: Some(PaymentStage::Retention),
        projects: vec![fields],
    };
    let out = certificate::build_certificate(&input).unwrap();
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].starts_with("Project 1: vatPercent: 10%"));

    let bad = r#"{"paymentStage": "Midway", "projects": [{}]}"#;
    assert!(serde_json::from_str::<CertificateInput>(bad).is_err());
}

#[test]
fn test_certificate_details_cover_three_columns() {
    let input = CertificateInput {
        contractor: "Bello".to_string(),
        project_name: "Kano".to_string(),
        payment_stage: None,
        projects: vec![scenario_fields(); 3],
    };
    let out = certificate::build_certificate(&input).unwrap();
    let cells = out.result.details_cells();
    for col in ["B", "E", "H"] {
        assert!(cells.contains(&(format!("{col}9"), "1,000,000".to_string())));
        assert!(cells.contains(&(format!("{col}18"), "350,625.00".to_string())));
    }
    assert_eq!(out.result.total_amount_due, dec!(1051875));
}
