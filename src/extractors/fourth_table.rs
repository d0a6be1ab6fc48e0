// src/extractors/fourth_table.rs
//! Table 4: Single-Family Insured Mortgage Endorsement Characteristic Shares.
//!
//! Mostly one percentage per row. The refinance breakdown repeats
//! "Non Cash-Out" and "Cash-Out" under both the FHA-to-FHA and the
//! Conventional-to-FHA headers, so those two rows are keyed by section.

use crate::extractors::fields::{Diagnostic, FieldDictionary};
use crate::extractors::role::TableRole;
use crate::extractors::rules::{
    Extraction, ExtractOptions, LabelRule, Matcher, RowFilter, RowRepair, RuleEngine, RuleSet, Section, Target,
};
use crate::tables::ExtractedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinanceSection {
    FhaToFha,
    ConventionalToFha,
}

impl Section for RefinanceSection {
    fn key_prefix(self) -> &'static str {
        match self {
            RefinanceSection::FhaToFha => "fha_to_fha",
            RefinanceSection::ConventionalToFha => "conv_to_fha",
        }
    }
}

type Rule = LabelRule<RefinanceSection>;

const fn share(label: &'static str, matcher: Matcher, base: &'static str) -> Rule {
    LabelRule {
        label,
        matcher,
        target: Target::Field(base),
        kind: Extraction::Percent,
    }
}

const fn count(label: &'static str, matcher: Matcher, base: &'static str) -> Rule {
    LabelRule {
        label,
        matcher,
        target: Target::Field(base),
        kind: Extraction::Count,
    }
}

static FOURTH_TABLE_RULES: &[Rule] = &[
    count("total endorsement count", Matcher::contains(&["total endorsement count"]), "total_endorsement"),
    share("purchase (%)", Matcher::starts_with(&["purchase (%)"]), "purchase"),
    share("refinance (%)", Matcher::starts_with(&["refinance (%)"]), "refinance"),
    count(
        "purchase loan count",
        Matcher::contains(&["purchase loan count"]).excluding(&["shares"]),
        "purchase_loan",
    ),
    share("first time homebuyer", Matcher::contains(&["first time homebuyer"]), "first_time_homebuyer"),
    share("203(k)", Matcher::contains(&["203(k)", "203k"]), "203k"),
    share("minority (%)", Matcher::starts_with(&["minority (%)"]), "minority"),
    share("non minority (%)", Matcher::contains(&["non minority (%)"]), "non_minority"),
    share("undisclosed race", Matcher::contains(&["undisclosed race"]), "undisclosed_race"),
    count(
        "refinance loan count",
        Matcher::contains(&["refinance loan count"]).excluding(&["shares"]),
        "refinance_loan",
    ),
    share("fha streamline", Matcher::contains(&["fha streamline"]), "fha_streamline"),
    LabelRule {
        label: "fha to fha (fully underwritten)",
        matcher: Matcher::contains(&["fha to fha"]).requiring(&["fully underwritten"]),
        target: Target::Enter(RefinanceSection::FhaToFha, ""),
        kind: Extraction::Percent,
    },
    LabelRule {
        label: "conventional to fha",
        matcher: Matcher::contains(&["conventional to fha"]).excluding(&["non cash", "cash out"]),
        target: Target::Enter(RefinanceSection::ConventionalToFha, ""),
        kind: Extraction::Percent,
    },
    LabelRule {
        label: "non cash out",
        matcher: Matcher::contains(&["non cash out"]),
        target: Target::WithinSection("noncash"),
        kind: Extraction::Percent,
    },
    LabelRule {
        label: "cash out",
        matcher: Matcher::contains(&["cash out"]).excluding(&["non"]),
        target: Target::WithinSection("cashout"),
        kind: Extraction::Percent,
    },
    share("single family detached", Matcher::contains(&["single family detached"]), "single_family_detached"),
    share("townhome (%)", Matcher::starts_with(&["townhome (%)"]), "townhome"),
    share("condominium (%)", Matcher::starts_with(&["condominium (%)"]), "condominium"),
    share("2 4 unit", Matcher::contains(&["2 4 unit"]), "2_4_unit"),
    share("manufactured housing", Matcher::contains(&["manufactured housing"]), "manufactured_housing"),
];

pub static FOURTH_TABLE: RuleSet<RefinanceSection> = RuleSet {
    role: TableRole::FourthTable,
    rules: FOURTH_TABLE_RULES,
    filter: RowFilter::HasLetter,
    repair: RowRepair::NarrowerThan(3),
    // Hyphen, en dash, em dash and the carriage returns of wrapped cells
    separators: &['-', '\u{2013}', '\u{2014}', '\r'],
};

/// Fills `dict` from a classified Table 4.
pub fn extract(
    table: &ExtractedTable,
    dict: &mut FieldDictionary,
    diagnostics: &mut Vec<Diagnostic>,
    options: ExtractOptions,
) {
    RuleEngine::new(&FOURTH_TABLE, options).run(table, dict, diagnostics);
}
