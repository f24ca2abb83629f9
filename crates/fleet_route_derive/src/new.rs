use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, parse_macro_input};

use crate::utils;

/// `new(..)` takes every non-`Option` field in declaration order; `Option` fields start as
/// `None`. Every field gets a consuming `with_<field>` setter.
pub fn derive_new_inner(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(name, "`New` can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let Fields::Named(fields) = &data.fields else {
        return syn::Error::new_spanned(name, "`New` requires a struct with named fields")
            .to_compile_error()
            .into();
    };

    let mut params = Vec::new();
    let mut inits = Vec::new();
    let mut setters = Vec::new();

    for field in &fields.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let setter = format_ident!("with_{}", ident);

        match utils::inner_of_option(&field.ty) {
            Some(inner) => {
                inits.push(quote! { #ident: None });
                setters.push(quote! {
                    pub fn #setter(mut self, #ident: #inner) -> Self {
                        self.#ident = Some(#ident);
                        self
                    }
                });
            }
            None => {
                let ty = &field.ty;
                params.push(quote! { #ident: #ty });
                inits.push(quote! { #ident });
                setters.push(quote! {
                    pub fn #setter(mut self, #ident: #ty) -> Self {
                        self.#ident = #ident;
                        self
                    }
                });
            }
        }
    }

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            pub fn new(#(#params),*) -> Self {
                Self { #(#inits),* }
            }

            #(#setters)*
        }
    };

    TokenStream::from(expanded)
}
