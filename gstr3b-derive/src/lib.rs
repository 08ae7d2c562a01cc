use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta};

/// Derive macro that describes the CSV columns a report record serializes to.
///
/// For each field, extracts:
/// - Column name (respects `#[serde(rename = "...")]`)
/// - Description (from doc comments)
///
/// Fields marked `#[serde(skip)]` or `#[serde(skip_serializing)]` are left out.
///
/// Generates a `report_columns() -> &'static [ReportColumn]` method; a
/// `ReportColumn` type with `name` and `description` fields must be in scope.
#[proc_macro_derive(ReportColumns, attributes(serde))]
pub fn derive_report_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "ReportColumns only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "ReportColumns only supports structs",
            ))
        }
    };

    let mut columns = Vec::new();
    for field in fields {
        let attrs = SerdeAttrs::parse(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let column = match attrs.rename {
            Some(rename) => rename,
            None => field
                .ident
                .as_ref()
                .map(|ident| ident.to_string())
                .unwrap_or_default(),
        };
        columns.push((column, doc_comment(&field.attrs)));
    }

    let entries = columns.iter().map(|(column, description)| {
        quote! {
            ReportColumn {
                name: #column,
                description: #description,
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            pub fn report_columns() -> &'static [ReportColumn] {
                static COLUMNS: &[ReportColumn] = &[
                    #(#entries),*
                ];
                COLUMNS
            }
        }
    })
}

#[derive(Default)]
struct SerdeAttrs {
    rename: Option<String>,
    skip: bool,
}

impl SerdeAttrs {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut parsed = SerdeAttrs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    parsed.rename = Some(value.value());
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    parsed.skip = true;
                } else if meta.input.peek(syn::Token![=]) {
                    // other key-value options (default, serialize_with, ...) don't affect the column
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(expr_lit) => match &expr_lit.lit {
                    Lit::Str(lit_str) => Some(lit_str.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
