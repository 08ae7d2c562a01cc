//! Header detection: mapping table columns to semantic fields

use crate::fields::{Field, FieldMap};
use crate::mapping::{ColumnChoice, Overrides};
use crate::table::{ColumnRef, Table};
use std::fmt;

/// Header comparison key: trimmed and lowercased
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Find the column matching the earliest candidate.
///
/// Names and candidates are compared trimmed and lowercased. Candidate order
/// decides ties: an earlier candidate wins even when a later candidate matches
/// a column further left. If several columns normalize to the same name, the
/// leftmost is returned.
pub fn resolve<'a, I>(columns: I, candidates: &[&str]) -> Option<ColumnRef>
where
    I: IntoIterator<Item = &'a str>,
{
    let normalized: Vec<String> = columns.into_iter().map(normalize).collect();
    candidates.iter().find_map(|candidate| {
        let candidate = normalize(candidate);
        normalized
            .iter()
            .position(|name| *name == candidate)
            .map(ColumnRef)
    })
}

/// How a field ended up mapped to a column (or not)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Matched one of the field's aliases
    Detected(ColumnRef),
    /// Chosen explicitly by an override or at the prompt
    Selected(ColumnRef),
    /// Explicitly marked as not present
    Absent,
    /// No alias matched and no choice was made
    Unresolved,
}

impl Resolution {
    pub fn column(&self) -> Option<ColumnRef> {
        match self {
            Resolution::Detected(column) | Resolution::Selected(column) => Some(*column),
            Resolution::Absent | Resolution::Unresolved => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Resolution::Unresolved)
    }

    pub fn describe(&self, table: &Table) -> String {
        match self {
            Resolution::Detected(column) => {
                table.column_name(*column).unwrap_or_default().to_string()
            }
            Resolution::Selected(column) => format!(
                "{} (selected)",
                table.column_name(*column).unwrap_or_default()
            ),
            Resolution::Absent => "None (treated as zero)".to_string(),
            Resolution::Unresolved => "Not found".to_string(),
        }
    }
}

/// Which input register a table is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Sales,
    Purchases,
}

impl Side {
    pub fn name(&self) -> &'static str {
        match self {
            Side::Sales => "sales",
            Side::Purchases => "purchases",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("{side} {field}: no column named '{column}' (available: {})", .available.join(", "))]
    UnknownColumn {
        side: Side,
        field: Field,
        column: String,
        available: Vec<String>,
    },
    #[error(
        "could not detect the {side} taxable value column; choose columns with --{side}-taxable-value \
         (and --{side}-cgst/--{side}-sgst/--{side}-igst, or 'none'), a --mapping file, or \
         --interactive (available: {})",
        .available.join(", ")
    )]
    SelectionRequired { side: Side, available: Vec<String> },
}

/// Turn an explicit choice into a resolution against `table`
pub fn apply_choice(
    table: &Table,
    side: Side,
    field: Field,
    choice: &ColumnChoice,
) -> Result<Resolution, MappingError> {
    match choice {
        ColumnChoice::Absent => Ok(Resolution::Absent),
        ColumnChoice::Named(name) => resolve(table.column_names(), &[name.as_str()])
            .map(Resolution::Selected)
            .ok_or_else(|| MappingError::UnknownColumn {
                side,
                field,
                column: name.clone(),
                available: table.column_names().map(str::to_string).collect(),
            }),
    }
}

/// Resolve all four fields, giving explicit choices priority over detection
pub fn resolve_table(
    table: &Table,
    side: Side,
    overrides: &Overrides,
) -> Result<FieldMap<Resolution>, MappingError> {
    let mut resolutions = FieldMap::from_fn(|_| Resolution::Unresolved);
    for field in Field::ALL {
        let resolution = match overrides.get(field) {
            Some(choice) => apply_choice(table, side, field, choice)?,
            None => resolve(table.column_names(), field.aliases())
                .map_or(Resolution::Unresolved, Resolution::Detected),
        };
        *resolutions.get_mut(field) = resolution;
    }
    Ok(resolutions)
}

/// Fields that must be chosen explicitly before the table can be summed.
///
/// An unresolved required field puts every field of the table up for selection,
/// except those already fixed by an override.
pub fn selection_needed(
    resolutions: &FieldMap<Resolution>,
    overrides: &Overrides,
) -> Vec<Field> {
    let required_missing = resolutions
        .iter()
        .any(|(field, resolution)| field.is_required() && resolution.is_unresolved());
    if !required_missing {
        return Vec::new();
    }
    Field::ALL
        .into_iter()
        .filter(|field| overrides.get(*field).is_none())
        .collect()
}

/// Column references for aggregation; anything unresolved counts as absent
pub fn column_refs(
    side: Side,
    table: &Table,
    resolutions: &FieldMap<Resolution>,
) -> FieldMap<Option<ColumnRef>> {
    resolutions.map(|field, resolution| {
        if resolution.is_unresolved() && !field.is_required() {
            log::warn!("{side} {field}: no matching column, treating as zero");
        }
        let column = resolution.column();
        if let Some(name) = column.and_then(|c| table.column_name(c)) {
            log::info!("{side} {field}: using column '{name}'");
        }
        column
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Delimiter;

    fn table(csv: &str) -> Table {
        Table::parse(csv.as_bytes(), Delimiter::Comma).unwrap()
    }

    fn no_overrides() -> Overrides {
        Overrides::default()
    }

    #[test]
    fn match_ignores_case_and_surrounding_whitespace() {
        let columns = ["Invoice", "  taxable AMOUNT "];
        assert_eq!(resolve(columns, &["Taxable Amount"]), Some(ColumnRef(1)));
    }

    #[test]
    fn earlier_candidate_wins_over_earlier_column() {
        let columns = ["Amount", "TaxableValue"];
        assert_eq!(
            resolve(columns, Field::TaxableValue.aliases()),
            Some(ColumnRef(1))
        );
    }

    #[test]
    fn duplicate_names_resolve_to_leftmost() {
        let columns = ["Date", "cgst", "CGST "];
        assert_eq!(resolve(columns, &["CGST"]), Some(ColumnRef(1)));
    }

    #[test]
    fn empty_candidate_list_is_unresolved() {
        assert_eq!(resolve(["CGST", "SGST"], &[]), None);
    }

    #[test]
    fn no_matching_candidate_is_unresolved() {
        assert_eq!(resolve(["Date", "Party"], Field::Igst.aliases()), None);
    }

    #[test]
    fn inner_whitespace_is_significant() {
        assert_eq!(resolve(["Taxable  Amount"], Field::TaxableValue.aliases()), None);
    }

    #[test]
    fn detects_every_field() {
        let t = table("Taxable Amount,Central GST,state_gst,IGST_Amount\n1,2,3,4\n");
        let resolutions = resolve_table(&t, Side::Sales, &no_overrides()).unwrap();
        assert_eq!(resolutions.taxable_value, Resolution::Detected(ColumnRef(0)));
        assert_eq!(resolutions.cgst, Resolution::Detected(ColumnRef(1)));
        assert_eq!(resolutions.sgst, Resolution::Detected(ColumnRef(2)));
        assert_eq!(resolutions.igst, Resolution::Detected(ColumnRef(3)));
    }

    #[test]
    fn override_takes_priority_over_detection() {
        let t = table("Amount,Net,CGST\n1,2,3\n");
        let overrides = Overrides {
            taxable_value: Some(ColumnChoice::Named("net".to_string())),
            cgst: Some(ColumnChoice::Absent),
            ..Overrides::default()
        };
        let resolutions = resolve_table(&t, Side::Sales, &overrides).unwrap();
        assert_eq!(resolutions.taxable_value, Resolution::Selected(ColumnRef(1)));
        assert_eq!(resolutions.cgst, Resolution::Absent);
        assert_eq!(resolutions.sgst, Resolution::Unresolved);
    }

    #[test]
    fn unknown_override_column_is_an_error() {
        let t = table("Amount,CGST\n1,2\n");
        let overrides = Overrides {
            sgst: Some(ColumnChoice::Named("State Tax".to_string())),
            ..Overrides::default()
        };
        let err = resolve_table(&t, Side::Purchases, &overrides).unwrap_err();
        assert_eq!(
            err,
            MappingError::UnknownColumn {
                side: Side::Purchases,
                field: Field::Sgst,
                column: "State Tax".to_string(),
                available: vec!["Amount".to_string(), "CGST".to_string()],
            }
        );
    }

    #[test]
    fn unresolved_taxable_value_needs_selection_of_remaining_fields() {
        let t = table("Net,CGST\n1,2\n");
        let overrides = Overrides {
            igst: Some(ColumnChoice::Absent),
            ..Overrides::default()
        };
        let resolutions = resolve_table(&t, Side::Sales, &overrides).unwrap();
        assert_eq!(
            selection_needed(&resolutions, &overrides),
            vec![Field::TaxableValue, Field::Cgst, Field::Sgst]
        );
    }

    #[test]
    fn unresolved_tax_field_alone_needs_no_selection() {
        let t = table("Amount,CGST\n1,2\n");
        let resolutions = resolve_table(&t, Side::Sales, &no_overrides()).unwrap();
        assert!(selection_needed(&resolutions, &no_overrides()).is_empty());
        let refs = column_refs(Side::Sales, &t, &resolutions);
        assert_eq!(refs.sgst, None);
        assert_eq!(refs.cgst, Some(ColumnRef(1)));
    }
}
