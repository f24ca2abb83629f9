use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

/// Unit-variant enums get a case-insensitive `parse`, a kebab-case `Display`, and
/// `VALUES` listing the canonical spellings.
pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let enum_ident = input.ident.clone();

    let Data::Enum(data_enum) = input.data else {
        return syn::Error::new(input.span(), "CliValue can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let mut option_name = utils::to_kebab_case(&enum_ident.to_string());
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                option_name = lit.value();
                return Ok(());
            }
            Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
        });
        if let Err(err) = parsed {
            return err.to_compile_error().into();
        }
    }

    let mut parse_arms = Vec::new();
    let mut display_arms = Vec::new();
    let mut canonical_names = Vec::new();

    for variant in data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(variant.span(), "CliValue only supports unit variants")
                .to_compile_error()
                .into();
        }

        let variant_ident = variant.ident;
        let mut canonical = utils::to_kebab_case(&variant_ident.to_string());
        let mut spellings: Vec<String> = Vec::new();

        for attr in variant.attrs.iter().filter(|a| a.path().is_ident("cli")) {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    canonical = lit.value();
                    return Ok(());
                }
                if meta.path.is_ident("alias") {
                    let lit: LitStr = meta.value()?.parse()?;
                    spellings.push(lit.value());
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected name/alias"))
            });
            if let Err(err) = parsed {
                return err.to_compile_error().into();
            }
        }
        spellings.insert(0, canonical.clone());

        let spelling_lits = spellings
            .iter()
            .map(|s| LitStr::new(s, Span::call_site()));
        let canonical_lit = LitStr::new(&canonical, Span::call_site());

        parse_arms.push(quote! {
            #(#spelling_lits)|* => Ok(Self::#variant_ident),
        });
        display_arms.push(quote! {
            Self::#variant_ident => #canonical_lit,
        });
        canonical_names.push(canonical_lit);
    }

    let option_lit = LitStr::new(&option_name, Span::call_site());

    let expanded = quote! {
        impl #enum_ident {
            pub const VALUES: &'static [&'static str] = &[#(#canonical_names),*];

            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit,
                        raw,
                        Self::VALUES.join("|")
                    ))),
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    #(#display_arms)*
                })
            }
        }
    };

    TokenStream::from(expanded)
}
