use std::fmt;

/// Semantic field a column can be mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TaxableValue,
    Cgst,
    Sgst,
    Igst,
}

const TAXABLE_ALIASES: &[&str] = &[
    "TaxableValue",
    "Taxable_Value",
    "taxablevalue",
    "taxable value",
    "amount",
    "Amount",
    "value",
    "Value",
    "Taxable Amount",
    "taxable_amount",
];

const CGST_ALIASES: &[&str] = &[
    "CGST",
    "cgst",
    "CGST_Amount",
    "cgst_amount",
    "cgst amount",
    "Central GST",
    "central_gst",
];

const SGST_ALIASES: &[&str] = &[
    "SGST",
    "sgst",
    "SGST_Amount",
    "sgst_amount",
    "sgst amount",
    "State GST",
    "state_gst",
];

const IGST_ALIASES: &[&str] = &[
    "IGST",
    "igst",
    "IGST_Amount",
    "igst_amount",
    "igst amount",
    "Integrated GST",
    "integrated_gst",
];

impl Field {
    pub const ALL: [Field; 4] = [Field::TaxableValue, Field::Cgst, Field::Sgst, Field::Igst];

    /// Accepted header spellings, in priority order
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::TaxableValue => TAXABLE_ALIASES,
            Field::Cgst => CGST_ALIASES,
            Field::Sgst => SGST_ALIASES,
            Field::Igst => IGST_ALIASES,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::TaxableValue => "Taxable Value",
            Field::Cgst => "CGST",
            Field::Sgst => "SGST",
            Field::Igst => "IGST",
        }
    }

    /// Key used in mapping files and CLI flag names
    pub fn key(&self) -> &'static str {
        match self {
            Field::TaxableValue => "taxable_value",
            Field::Cgst => "cgst",
            Field::Sgst => "sgst",
            Field::Igst => "igst",
        }
    }

    /// Only the taxable value must be known before a table can be summed.
    pub fn is_required(&self) -> bool {
        matches!(self, Field::TaxableValue)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per semantic field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap<T> {
    pub taxable_value: T,
    pub cgst: T,
    pub sgst: T,
    pub igst: T,
}

impl<T> FieldMap<T> {
    pub fn from_fn(mut f: impl FnMut(Field) -> T) -> Self {
        FieldMap {
            taxable_value: f(Field::TaxableValue),
            cgst: f(Field::Cgst),
            sgst: f(Field::Sgst),
            igst: f(Field::Igst),
        }
    }

    pub fn get(&self, field: Field) -> &T {
        match field {
            Field::TaxableValue => &self.taxable_value,
            Field::Cgst => &self.cgst,
            Field::Sgst => &self.sgst,
            Field::Igst => &self.igst,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut T {
        match field {
            Field::TaxableValue => &mut self.taxable_value,
            Field::Cgst => &mut self.cgst,
            Field::Sgst => &mut self.sgst,
            Field::Igst => &mut self.igst,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Field, &T) -> U) -> FieldMap<U> {
        FieldMap::from_fn(|field| f(field, self.get(field)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &T)> {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }
}
