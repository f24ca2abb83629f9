use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

/// Generates `split_arg`, `apply_cli_option` and `cli_usage` for a named-field struct.
///
/// Only fields carrying `#[cli(long = "...")]` take part. `parse_with = "path::to::fn"`
/// replaces the default `FromStr` parse. The first doc line of a field becomes its usage
/// description.
pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "CliOptions can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "CliOptions requires named fields")
            .to_compile_error()
            .into();
    };

    let mut arms = Vec::new();
    let mut usage_lines = Vec::new();

    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let mut long_name: Option<String> = None;
        let mut parse_with: Option<Path> = None;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("cli")) {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("long") {
                    let lit: LitStr = meta.value()?.parse()?;
                    long_name = Some(lit.value());
                    return Ok(());
                }
                if meta.path.is_ident("parse_with") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parse_with = Some(syn::parse_str(&lit.value())?);
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected long/parse_with"))
            });
            if let Err(err) = parsed {
                return err.to_compile_error().into();
            }
        }

        let Some(long_name) = long_name else {
            continue;
        };

        let hint = utils::type_hint(&field.ty);
        let summary = utils::doc_summary(&field.attrs);
        usage_lines.push(if summary.is_empty() {
            format!("  --{long_name} <{hint}>")
        } else {
            format!("  --{long_name} <{hint}>\n      {summary}")
        });

        let long_name_lit = LitStr::new(&long_name, Span::call_site());
        let parse_expr = utils::build_cli_parse_expr(&field.ty, parse_with.as_ref());
        arms.push(quote! {
            #long_name_lit => {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_input(format!("Missing value for --{name}"))
                })?;
                self.#field_ident = #parse_expr;
                Ok(true)
            }
        });
    }

    let usage_lit = LitStr::new(&usage_lines.join("\n"), Span::call_site());

    let expanded = quote! {
        impl #struct_ident {
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((key, value)) = raw_name.split_once('=') {
                    return (key.to_string(), Some(value.to_string()));
                }
                let value = args.next_if(|next| !next.starts_with("--"));
                (raw_name.to_string(), value)
            }

            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }

            /// One entry per value-taking option, generated from the field docs.
            pub fn cli_usage() -> &'static str {
                #usage_lit
            }
        }
    };

    TokenStream::from(expanded)
}
