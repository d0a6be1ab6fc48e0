// src/extractors/first_table.rs
//! Table 1: Single Family Insured Mortgage Portfolio Change during Month.
//!
//! Every recognized row carries a loan count (thousands) and an amount
//! (billions); both are stored as a `_k`/`_b` pair.

use crate::extractors::fields::{Diagnostic, FieldDictionary};
use crate::extractors::role::TableRole;
use crate::extractors::rules::{
    Extraction, ExtractOptions, LabelRule, Matcher, NoSection, RowFilter, RowRepair, RuleEngine, RuleSet, Target,
};
use crate::tables::ExtractedTable;

const fn pair(needles: &'static [&'static str], base: &'static str) -> LabelRule<NoSection> {
    LabelRule {
        label: needles[0],
        matcher: Matcher::contains(needles),
        target: Target::Field(base),
        kind: Extraction::Pair,
    }
}

static FIRST_TABLE_RULES: &[LabelRule<NoSection>] = &[
    pair(&["insurance in force (beginning)"], "insurance_beg"),
    pair(&["prepayments"], "prepay"),
    pair(&["refinance with fha"], "refi_fha"),
    pair(&["full payoff"], "payoff"),
    pair(&["claims"], "claims"),
    pair(&["conveyance"], "conveyance"),
    pair(&["pre foreclosure sale"], "pre_foreclosure_sale"),
    pair(&["note sales"], "note_sale"),
    pair(&["third party sales"], "third_party_sale"),
    pair(&["endorsements"], "endorsements"),
    pair(&["adjustment"], "adjustment"),
    pair(&["insurance in force (ending)"], "insurance_end"),
];

pub static FIRST_TABLE: RuleSet<NoSection> = RuleSet {
    role: TableRole::FirstTable,
    rules: FIRST_TABLE_RULES,
    filter: RowFilter::HasDigit,
    repair: RowRepair::SingleColumn,
    separators: &['-'],
};

/// Fills `dict` from a classified Table 1.
pub fn extract(
    table: &ExtractedTable,
    dict: &mut FieldDictionary,
    diagnostics: &mut Vec<Diagnostic>,
    options: ExtractOptions,
) {
    RuleEngine::new(&FIRST_TABLE, options).run(table, dict, diagnostics);
}
