// src/extractors/rules.rs
//! Ordered label rules shared by the three row extractors.
//!
//! Each row of a classified table is reduced to lowercase text and tested
//! against every rule in order. A matching rule pulls a value pair, a count
//! or a percentage out of the row and stores it under a key derived from the
//! rule's target. Rules can also move the extractor into a named section,
//! which later sub-label rules use to build their keys.

use crate::extractors::fields::{Diagnostic, FieldDictionary, FieldValue};
use crate::extractors::numeric::{row_percentage, row_values, RowPair};
use crate::extractors::role::TableRole;
use crate::tables::ExtractedTable;

/// Switches that change how matched values are stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Store counts and percentages equal to zero instead of dropping them.
    pub keep_zero_values: bool,
}

/// Substring test against a row's normalized text.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    any_of: &'static [&'static str],
    all_of: &'static [&'static str],
    none_of: &'static [&'static str],
    anchored: bool,
}

impl Matcher {
    /// Matches when the row text contains any of `needles`.
    pub const fn contains(needles: &'static [&'static str]) -> Self {
        Self {
            any_of: needles,
            all_of: &[],
            none_of: &[],
            anchored: false,
        }
    }

    /// Matches when the trimmed row text starts with any of `prefixes`.
    pub const fn starts_with(prefixes: &'static [&'static str]) -> Self {
        Self {
            any_of: prefixes,
            all_of: &[],
            none_of: &[],
            anchored: true,
        }
    }

    pub const fn requiring(self, needles: &'static [&'static str]) -> Self {
        Self { all_of: needles, ..self }
    }

    pub const fn excluding(self, needles: &'static [&'static str]) -> Self {
        Self { none_of: needles, ..self }
    }

    pub fn matches(&self, text: &str) -> bool {
        let hit = if self.anchored {
            let trimmed = text.trim();
            self.any_of.iter().any(|p| trimmed.starts_with(p))
        } else {
            self.any_of.iter().any(|n| text.contains(n))
        };
        hit && self.all_of.iter().all(|n| text.contains(n)) && !self.none_of.iter().any(|n| text.contains(n))
    }
}

/// Named sections of a table whose sub-labels repeat under several headers.
pub trait Section: Copy + std::fmt::Debug {
    fn key_prefix(self) -> &'static str;
}

/// Where a matched value goes.
#[derive(Debug, Clone, Copy)]
pub enum Target<S> {
    /// A fixed key base.
    Field(&'static str),
    /// Enter `section`, then store under `<section>` or `<section>_<suffix>`.
    Enter(S, &'static str),
    /// Store under `<current section>_<suffix>`.
    WithinSection(&'static str),
}

/// How a value is pulled out of a matched row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// First two numbers, stored as `<base>_k` and `<base>_b`.
    Pair,
    /// First number of the row pair, stored as `<base>_count`.
    Count,
    /// First percentage-looking token, stored as `<base>_pct`.
    Percent,
}

#[derive(Debug, Clone, Copy)]
pub struct LabelRule<S: 'static> {
    pub label: &'static str,
    pub matcher: Matcher,
    pub target: Target<S>,
    pub kind: Extraction,
}

/// Which rows are worth testing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFilter {
    HasDigit,
    HasLetter,
}

/// When a row is re-split because the extractor merged its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRepair {
    /// Single-column tables: split the only cell on whitespace.
    SingleColumn,
    /// Tables narrower than this: split the first cell on whitespace.
    NarrowerThan(usize),
}

/// A complete extractor description for one table role.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet<S: 'static> {
    pub role: TableRole,
    pub rules: &'static [LabelRule<S>],
    pub filter: RowFilter,
    pub repair: RowRepair,
    /// Characters replaced with a space before matching.
    pub separators: &'static [char],
}

/// Lowercased, space-joined text of a row's present cells.
pub fn row_text(cells: &[Option<String>], separators: &[char]) -> String {
    let joined = cells
        .iter()
        .flatten()
        .map(|cell| cell.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    joined.replace(separators, " ")
}

fn repair_row(cells: &[Option<String>], repair: RowRepair) -> Vec<Option<String>> {
    let split = |cell: &str| -> Vec<Option<String>> {
        cell.split_whitespace().map(|t| Some(t.to_string())).collect()
    };
    match repair {
        RowRepair::SingleColumn if cells.len() == 1 => match &cells[0] {
            Some(cell) => split(cell),
            None => cells.to_vec(),
        },
        RowRepair::NarrowerThan(width) if cells.len() < width => match cells.first() {
            Some(Some(cell)) => split(cell),
            _ => cells.to_vec(),
        },
        _ => cells.to_vec(),
    }
}

/// Walks a table with a rule set, tracking the current section.
pub struct RuleEngine<'a, S: Section + 'static> {
    rule_set: &'a RuleSet<S>,
    options: ExtractOptions,
    section: Option<S>,
}

impl<'a, S: Section + 'static> RuleEngine<'a, S> {
    pub fn new(rule_set: &'a RuleSet<S>, options: ExtractOptions) -> Self {
        Self {
            rule_set,
            options,
            section: None,
        }
    }

    /// Section entered by the most recent header rule, if any.
    #[cfg(test)]
    pub fn current_section(&self) -> Option<S> {
        self.section
    }

    /// Extracts every recognized label of `table` into `dict`.
    pub fn run(&mut self, table: &ExtractedTable, dict: &mut FieldDictionary, diagnostics: &mut Vec<Diagnostic>) {
        for cells in table.rows() {
            self.apply_row(cells, dict, diagnostics);
        }
    }

    fn apply_row(&mut self, cells: &[Option<String>], dict: &mut FieldDictionary, diagnostics: &mut Vec<Diagnostic>) {
        let text = row_text(cells, self.rule_set.separators);
        let relevant = match self.rule_set.filter {
            RowFilter::HasDigit => text.chars().any(|c| c.is_ascii_digit()),
            RowFilter::HasLetter => text.chars().any(char::is_alphabetic),
        };
        if !relevant {
            return;
        }

        let row = repair_row(cells, self.rule_set.repair);
        for rule in self.rule_set.rules {
            if !rule.matcher.matches(&text) {
                continue;
            }
            tracing::trace!("{}: '{}' matched row '{}'", self.rule_set.role, rule.label, text);

            let base = match rule.target {
                Target::Field(base) => base.to_string(),
                Target::Enter(section, suffix) => {
                    self.section = Some(section);
                    join_key(section.key_prefix(), suffix)
                }
                Target::WithinSection(suffix) => match self.section {
                    Some(section) => join_key(section.key_prefix(), suffix),
                    None => {
                        diagnostics.push(Diagnostic::SectionMissing {
                            role: self.rule_set.role,
                            label: rule.label.to_string(),
                        });
                        continue;
                    }
                },
            };

            self.store(rule.kind, &base, &row, dict, diagnostics);
        }
    }

    fn store(
        &self,
        kind: Extraction,
        base: &str,
        row: &[Option<String>],
        dict: &mut FieldDictionary,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        match kind {
            Extraction::Pair => match self.pair(row, diagnostics) {
                RowPair::Found(k, b) => {
                    dict.insert(format!("{}_k", base), FieldValue::Decimal(k));
                    dict.insert(format!("{}_b", base), FieldValue::Decimal(b));
                }
                RowPair::Malformed => {
                    dict.insert(format!("{}_k", base), FieldValue::Null);
                    dict.insert(format!("{}_b", base), FieldValue::Null);
                }
            },
            Extraction::Count => {
                let value = self
                    .pair(row, diagnostics)
                    .first()
                    .map(|v| FieldValue::Decimal(v.to_string()));
                self.store_scalar(dict, format!("{}_count", base), value);
            }
            Extraction::Percent => {
                let value = row_percentage(row).map(FieldValue::Percent);
                self.store_scalar(dict, format!("{}_pct", base), value);
            }
        }
    }

    fn pair(&self, row: &[Option<String>], diagnostics: &mut Vec<Diagnostic>) -> RowPair {
        let pair = row_values(row);
        if pair == RowPair::Malformed {
            diagnostics.push(Diagnostic::MalformedRow {
                role: self.rule_set.role,
                row: row.iter().flatten().cloned().collect(),
            });
        }
        pair
    }

    fn store_scalar(&self, dict: &mut FieldDictionary, key: String, value: Option<FieldValue>) {
        match value {
            Some(value) if value.is_zero() && !self.options.keep_zero_values => {
                tracing::debug!("{}: dropping zero value for {}", self.rule_set.role, key);
            }
            Some(value) => dict.insert(key, value),
            None => {}
        }
    }
}

fn join_key(prefix: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        prefix.to_string()
    } else {
        format!("{}_{}", prefix, suffix)
    }
}

/// Section type for tables without sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoSection {}

impl Section for NoSection {
    fn key_prefix(self) -> &'static str {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_combinators() {
        let m = Matcher::contains(&["loan count"]).excluding(&["shares"]);
        assert!(m.matches("purchase loan count 1 2"));
        assert!(!m.matches("purchase loan count shares"));

        let m = Matcher::contains(&["fha to fha"]).requiring(&["fully underwritten"]);
        assert!(m.matches("fha to fha (fully underwritten) (%) 1.0"));
        assert!(!m.matches("fha to fha (%) 1.0"));

        let m = Matcher::starts_with(&["purchase (%)"]);
        assert!(m.matches("  purchase (%) 45.0"));
        assert!(!m.matches("first purchase (%) 45.0"));
    }

    #[test]
    fn row_text_replaces_separators() {
        let cells = vec![Some("Pre-Foreclosure Sale".to_string()), None, Some("12".to_string())];
        assert_eq!(row_text(&cells, &['-']), "pre foreclosure sale 12");
    }

    #[test]
    fn repair_splits_single_cell() {
        let cells = vec![Some("Claims 1,234 5.6".to_string())];
        let row = repair_row(&cells, RowRepair::SingleColumn);
        assert_eq!(row.len(), 3);
        let wide = vec![Some("Claims".to_string()), Some("1".to_string()), Some("2".to_string())];
        assert_eq!(repair_row(&wide, RowRepair::NarrowerThan(3)), wide);
    }

    #[test]
    fn sub_label_without_section_is_reported() {
        #[derive(Debug, Clone, Copy)]
        enum Demo {
            Claims,
        }
        impl Section for Demo {
            fn key_prefix(self) -> &'static str {
                "claims"
            }
        }
        static RULES: &[LabelRule<Demo>] = &[
            LabelRule {
                label: "claims",
                matcher: Matcher::contains(&["claims"]),
                target: Target::Enter(Demo::Claims, "tot"),
                kind: Extraction::Pair,
            },
            LabelRule {
                label: "property improvement",
                matcher: Matcher::contains(&["property improvement"]),
                target: Target::WithinSection("pi"),
                kind: Extraction::Pair,
            },
        ];
        let set = RuleSet {
            role: TableRole::ThirdTable,
            rules: RULES,
            filter: RowFilter::HasDigit,
            repair: RowRepair::SingleColumn,
            separators: &['-'],
        };
        let table = ExtractedTable::from_text_rows(vec![
            vec!["Property Improvement", "1", "2"],
            vec!["Claims", "3", "4"],
            vec!["Property Improvement", "5", "6"],
        ]);
        let mut dict = FieldDictionary::new(None, "x.pdf");
        let mut diagnostics = Vec::new();
        let mut engine = RuleEngine::new(&set, ExtractOptions::default());
        engine.run(&table, &mut dict, &mut diagnostics);

        assert!(matches!(diagnostics.as_slice(), [Diagnostic::SectionMissing { .. }]));
        assert_eq!(dict.get("claims_pi_k"), Some(&FieldValue::Decimal("5".into())));
        assert_eq!(dict.get("claims_tot_b"), Some(&FieldValue::Decimal("4".into())));
        assert!(engine.current_section().is_some());
    }
}
