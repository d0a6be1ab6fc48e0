// src/extractors/third_table.rs
//! Table 3: Title I Insured Mortgage Portfolio.
//!
//! The table repeats the same two loan types ("Property Improvement" and
//! "Manufactured Housing") under each portfolio section. Section header rows
//! carry the section total; the loan-type rows that follow them belong to the
//! most recent header.

use crate::extractors::fields::{Diagnostic, FieldDictionary};
use crate::extractors::role::TableRole;
use crate::extractors::rules::{
    Extraction, ExtractOptions, LabelRule, Matcher, RowFilter, RowRepair, RuleEngine, RuleSet, Section, Target,
};
use crate::tables::ExtractedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioSection {
    InsuranceBeginning,
    Prepayments,
    Claims,
    Endorsements,
    Adjustment,
    InsuranceEnding,
}

impl Section for PortfolioSection {
    fn key_prefix(self) -> &'static str {
        match self {
            PortfolioSection::InsuranceBeginning => "insurance_beg",
            PortfolioSection::Prepayments => "prepayment",
            PortfolioSection::Claims => "claims",
            PortfolioSection::Endorsements => "endorsements",
            PortfolioSection::Adjustment => "adjustment",
            PortfolioSection::InsuranceEnding => "insurance_end",
        }
    }
}

const fn header(needle: &'static [&'static str], section: PortfolioSection) -> LabelRule<PortfolioSection> {
    LabelRule {
        label: needle[0],
        matcher: Matcher::contains(needle),
        target: Target::Enter(section, "tot"),
        kind: Extraction::Pair,
    }
}

const fn loan_type(needle: &'static [&'static str], suffix: &'static str) -> LabelRule<PortfolioSection> {
    LabelRule {
        label: needle[0],
        matcher: Matcher::contains(needle),
        target: Target::WithinSection(suffix),
        kind: Extraction::Pair,
    }
}

// Headers come first so a loan-type label on the same row sees the new section.
static THIRD_TABLE_RULES: &[LabelRule<PortfolioSection>] = &[
    header(&["insurance in force (beginning)"], PortfolioSection::InsuranceBeginning),
    header(&["prepayments"], PortfolioSection::Prepayments),
    header(&["claims"], PortfolioSection::Claims),
    header(&["endorsements"], PortfolioSection::Endorsements),
    header(&["adjustment"], PortfolioSection::Adjustment),
    header(&["insurance in force (ending)"], PortfolioSection::InsuranceEnding),
    loan_type(&["property improvement"], "pi"),
    loan_type(&["manufactured housing"], "mh"),
];

pub static THIRD_TABLE: RuleSet<PortfolioSection> = RuleSet {
    role: TableRole::ThirdTable,
    rules: THIRD_TABLE_RULES,
    filter: RowFilter::HasDigit,
    repair: RowRepair::SingleColumn,
    separators: &['-'],
};

/// Fills `dict` from a classified Table 3.
pub fn extract(
    table: &ExtractedTable,
    dict: &mut FieldDictionary,
    diagnostics: &mut Vec<Diagnostic>,
    options: ExtractOptions,
) {
    RuleEngine::new(&THIRD_TABLE, options).run(table, dict, diagnostics);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::fields::FieldValue;

    fn run(rows: Vec<Vec<&str>>) -> (FieldDictionary, Vec<Diagnostic>) {
        let table = ExtractedTable::from_text_rows(rows);
        let mut dict = FieldDictionary::new(None, "FHAProdReport_Dec2021.pdf");
        let mut diagnostics = Vec::new();
        extract(&table, &mut dict, &mut diagnostics, ExtractOptions::default());
        (dict, diagnostics)
    }

    fn dec(v: &str) -> Option<FieldValue> {
        Some(FieldValue::Decimal(v.to_string()))
    }

    #[test]
    fn claims_sub_rows_attribute_to_claims_section() {
        let (dict, diagnostics) = run(vec![
            vec!["Insurance in Force (Beginning)", "20,100", "0.9"],
            vec!["Property Improvement", "19,000", "0.5"],
            vec!["Claims", "(120)", "(0.01)"],
            vec!["Property Improvement", "(100)", "(0.004)"],
            vec!["Manufactured Housing", "(20)", "(0.001)"],
        ]);
        assert!(diagnostics.is_empty());
        assert_eq!(dict.get("insurance_beg_tot_k").cloned(), dec("20100"));
        assert_eq!(dict.get("insurance_beg_pi_k").cloned(), dec("19000"));
        assert_eq!(dict.get("claims_tot_k").cloned(), dec("-120"));
        assert_eq!(dict.get("claims_pi_k").cloned(), dec("-100"));
        assert_eq!(dict.get("claims_pi_b").cloned(), dec("-0.004"));
        assert_eq!(dict.get("claims_mh_k").cloned(), dec("-20"));
        assert!(dict.get("insurance_beg_mh_k").is_none());
    }

    #[test]
    fn section_names_follow_table_three_conventions() {
        let (dict, _) = run(vec![
            vec!["Prepayments", "(300)", "(0.02)"],
            vec!["Manufactured Housing", "(30)", "(0.002)"],
        ]);
        assert_eq!(dict.get("prepayment_tot_k").cloned(), dec("-300"));
        assert_eq!(dict.get("prepayment_mh_k").cloned(), dec("-30"));
    }

    #[test]
    fn loan_type_before_any_header_is_skipped() {
        let (dict, diagnostics) = run(vec![vec!["Property Improvement", "1", "2"]]);
        assert!(!dict.has_data());
        assert!(matches!(
            diagnostics.as_slice(),
            [Diagnostic::SectionMissing { role: TableRole::ThirdTable, .. }]
        ));
    }
}
