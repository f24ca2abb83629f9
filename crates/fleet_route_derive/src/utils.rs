use quote::quote;
use syn::{
    AngleBracketedGenericArguments, Attribute, Expr, ExprLit, GenericArgument, Lit, Meta, Path,
    PathArguments, Type, TypePath,
};

pub fn inner_of_option(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { path, .. }) = ty else {
        return None;
    };
    let idents: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let is_option = match idents.as_slice() {
        [only] => only == "Option",
        [root, module, last] => {
            (root == "std" || root == "core") && module == "option" && last == "Option"
        }
        _ => false,
    };
    if !is_option {
        return None;
    }

    if let Some(seg) = path.segments.last()
        && let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
            &seg.arguments
        && let Some(GenericArgument::Type(inner)) = args.first()
    {
        return Some(inner);
    }
    None
}

pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    match parse_with {
        Some(parse_with) => quote! { #parse_with(&raw)? },
        None => quote! {
            raw.trim().parse::<#ty>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        },
    }
}

/// First non-empty line of the `///` docs on an item.
pub fn doc_summary(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| match &a.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}

/// Placeholder shown after an option name in usage text.
pub fn type_hint(ty: &Type) -> String {
    let Type::Path(TypePath { path, .. }) = ty else {
        return String::from("value");
    };
    match path.segments.last().map(|s| s.ident.to_string()) {
        Some(ident) if ident == "String" || ident == "PathBuf" => String::from("text"),
        Some(ident) if ident == "Vec" => String::from("list"),
        Some(ident) if ident.chars().next().is_some_and(|c| c.is_ascii_lowercase()) => ident,
        Some(ident) => to_kebab_case(&ident),
        None => String::from("value"),
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use syn::{Attribute, parse_quote};

    use super::{doc_summary, inner_of_option, to_kebab_case, type_hint};

    #[test]
    fn inner_of_option_supports_short_std_and_core_paths() {
        let short_ty: syn::Type = parse_quote!(Option<String>);
        let std_ty: syn::Type = parse_quote!(std::option::Option<u8>);
        let core_ty: syn::Type = parse_quote!(core::option::Option<bool>);
        let non_opt: syn::Type = parse_quote!(Vec<String>);

        let short_inner = inner_of_option(&short_ty).expect("Option inner type");
        let std_inner = inner_of_option(&std_ty).expect("std Option inner type");
        let core_inner = inner_of_option(&core_ty).expect("core Option inner type");

        assert_eq!(quote::quote!(#short_inner).to_string(), "String");
        assert_eq!(quote::quote!(#std_inner).to_string(), "u8");
        assert_eq!(quote::quote!(#core_inner).to_string(), "bool");
        assert!(inner_of_option(&non_opt).is_none());
    }

    #[test]
    fn doc_summary_takes_first_non_empty_line() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[doc = ""]),
            parse_quote!(#[doc = " Neighborhood radius in kilometres."]),
            parse_quote!(#[doc = " Second line."]),
        ];
        assert_eq!(doc_summary(&attrs), "Neighborhood radius in kilometres.");
        assert_eq!(doc_summary(&[]), "");
    }

    #[test]
    fn type_hint_maps_primitives_strings_and_enums() {
        let float: syn::Type = parse_quote!(f64);
        let text: syn::Type = parse_quote!(String);
        let level: syn::Type = parse_quote!(LogLevel);
        let list: syn::Type = parse_quote!(Vec<DriverId>);
        let tuple: syn::Type = parse_quote!((u8, u8));

        assert_eq!(type_hint(&float), "f64");
        assert_eq!(type_hint(&text), "text");
        assert_eq!(type_hint(&level), "log-level");
        assert_eq!(type_hint(&list), "list");
        assert_eq!(type_hint(&tuple), "value");
    }

    #[test]
    fn to_kebab_case_inserts_dashes_before_ascii_uppercase() {
        assert_eq!(to_kebab_case("LogFormat"), "log-format");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
        assert_eq!(to_kebab_case("X"), "x");
    }
}
