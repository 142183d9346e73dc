//! Derive macro implementation for the Fill trait
//!
//! Fill re-assigns the fields of an existing instance in place, which is the
//! path on which a lenient error policy can skip individual fields. Only
//! structs with named fields are supported.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Result, parse_macro_input};

use crate::derive::{add_trait_bounds, parse_field_attributes};

/// Main entry point for the Fill derive macro
pub fn derive_fill_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_fill_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the Fill implementation for the given input
fn generate_fill_impl(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (_, ty_generics, _) = generics.split_for_impl();

    let mut bounded_generics = generics.clone();
    add_trait_bounds(&mut bounded_generics);
    let (bounded_impl_generics, _, bounded_where_clause) = bounded_generics.split_for_impl();

    let Data::Struct(data_struct) = &input.data else {
        return Err(Error::new_spanned(
            input,
            "Fill derive is only supported for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new_spanned(
            input,
            "Fill derive is only supported for structs with named fields",
        ));
    };

    let field_statements = fields_named
        .named
        .iter()
        .map(|field| {
            let field_name = field.ident.as_ref().unwrap();
            let property = field_name.to_string();
            let attr = parse_field_attributes(field)?;

            if attr.skip {
                return Ok(quote! {});
            }
            if let Some(with) = attr.with {
                return Ok(quote! {
                    self.#field_name = #with(session)
                        .map_err(|cause| specimen::SpecimenError::property(#property, cause))?;
                });
            }
            Ok(quote! {
                session.fill_property(#property, &mut self.#field_name)?;
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        impl #bounded_impl_generics specimen::Fill for #name #ty_generics
        #bounded_where_clause
        {
            fn fill(
                &mut self,
                session: &mut specimen::Session<'_>,
            ) -> Result<(), specimen::SpecimenError> {
                if session.guard().exhausted() {
                    return Ok(());
                }
                session.composite(|session| {
                    #(#field_statements)*
                    Ok(())
                })
            }
        }
    })
}
