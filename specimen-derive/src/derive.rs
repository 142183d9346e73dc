//! Derive macro implementation for automatic Specimen trait derivation
//!
//! This module provides the procedural macro for implementing the Specimen
//! trait for structs and enums, with support for customization through
//! attributes.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, FieldsNamed, FieldsUnnamed, GenericParam,
    Lit, Meta, MetaList, MetaNameValue, Path, Result, Variant, parse_macro_input, parse_quote,
};

/// Main entry point for the Specimen derive macro
pub fn derive_specimen_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_specimen_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the Specimen implementation for the given input
fn generate_specimen_impl(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (_, ty_generics, _) = generics.split_for_impl();

    // Add bounds for Specimen trait requirements
    let mut bounded_generics = generics.clone();
    add_trait_bounds(&mut bounded_generics);
    let (bounded_impl_generics, _, bounded_where_clause) = bounded_generics.split_for_impl();

    let builders = parse_builder_attributes(&input.attrs)?;

    let body = if builders.is_empty() {
        match &input.data {
            Data::Struct(data_struct) => generate_struct_body(name, &data_struct.fields)?,
            Data::Enum(data_enum) => {
                generate_enum_body(name, &data_enum.variants.iter().collect::<Vec<_>>())?
            }
            Data::Union(_) => {
                return Err(Error::new_spanned(
                    input,
                    "Specimen derive is not supported for unions",
                ));
            }
        }
    } else {
        // Named constructors replace the field-by-field body entirely; one
        // of them is picked uniformly per call.
        quote! {
            session.composite(|session| {
                session.construct_with(&[
                    #(#builders as specimen::SpecimenBuilder<Self>,)*
                ])
            })
        }
    };

    Ok(quote! {
        impl #bounded_impl_generics specimen::Specimen for #name #ty_generics
        #bounded_where_clause
        {
            fn specimen(
                session: &mut specimen::Session<'_>,
            ) -> Result<Self, specimen::SpecimenError> {
                #body
            }
        }
    })
}

/// Add necessary trait bounds to generic parameters
pub(crate) fn add_trait_bounds(generics: &mut syn::Generics) {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(specimen::Specimen));
            type_param.bounds.push(parse_quote!('static));
        }
    }
}

/// Generate the body for struct synthesis
fn generate_struct_body(name: &syn::Ident, fields: &Fields) -> Result<TokenStream> {
    match fields {
        Fields::Named(fields_named) => generate_named_fields_body(name, fields_named),
        Fields::Unnamed(fields_unnamed) => generate_unnamed_fields_body(name, fields_unnamed),
        Fields::Unit => Ok(quote! { Ok(#name) }),
    }
}

/// Generate body for structs with named fields
fn generate_named_fields_body(name: &syn::Ident, fields: &FieldsNamed) -> Result<TokenStream> {
    let field_values = fields
        .named
        .iter()
        .map(|field| {
            let field_name = field.ident.as_ref().unwrap();
            let value_expr = field_value_expr(field, &field_name.to_string())?;

            Ok(quote! {
                #field_name: #value_expr
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        session.composite(|session| {
            Ok(#name {
                #(#field_values,)*
            })
        })
    })
}

/// Generate body for structs with unnamed fields (tuple structs)
fn generate_unnamed_fields_body(name: &syn::Ident, fields: &FieldsUnnamed) -> Result<TokenStream> {
    let field_values = fields
        .unnamed
        .iter()
        .enumerate()
        .map(|(index, field)| field_value_expr(field, &index.to_string()))
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        session.composite(|session| {
            Ok(#name(
                #(#field_values,)*
            ))
        })
    })
}

/// Generate the body for enum synthesis
fn generate_enum_body(name: &syn::Ident, variants: &[&Variant]) -> Result<TokenStream> {
    if variants.is_empty() {
        return Err(Error::new_spanned(
            name,
            "Cannot derive Specimen for empty enum",
        ));
    }

    let variant_count = variants.len();
    let variant_arms = variants
        .iter()
        .enumerate()
        .map(|(index, variant)| {
            let variant_name = &variant.ident;
            let variant_body = match &variant.fields {
                Fields::Named(fields_named) => {
                    let field_values = fields_named
                        .named
                        .iter()
                        .map(|field| {
                            let field_name = field.ident.as_ref().unwrap();
                            let value_expr = field_value_expr(field, &field_name.to_string())?;

                            Ok(quote! {
                                #field_name: #value_expr
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;

                    Ok::<TokenStream, Error>(quote! {
                        #name::#variant_name {
                            #(#field_values,)*
                        }
                    })
                }
                Fields::Unnamed(fields_unnamed) => {
                    let field_values = fields_unnamed
                        .unnamed
                        .iter()
                        .enumerate()
                        .map(|(index, field)| field_value_expr(field, &index.to_string()))
                        .collect::<Result<Vec<_>>>()?;

                    Ok::<TokenStream, Error>(quote! {
                        #name::#variant_name(
                            #(#field_values,)*
                        )
                    })
                }
                Fields::Unit => Ok::<TokenStream, Error>(quote! { #name::#variant_name }),
            }?;

            Ok(quote! {
                #index => #variant_body
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        session.composite(|session| {
            let variant_index = session.variant_index(#variant_count);
            Ok(match variant_index {
                #(#variant_arms,)*
                _ => unreachable!("variant index out of range"),
            })
        })
    })
}

/// The expression that produces one field's value inside a composite scope
fn field_value_expr(field: &Field, property: &str) -> Result<TokenStream> {
    let attr = parse_field_attributes(field)?;

    if attr.skip {
        return Ok(quote! { std::default::Default::default() });
    }
    if let Some(with) = attr.with {
        return Ok(quote! {
            #with(session)
                .map_err(|cause| specimen::SpecimenError::property(#property, cause))?
        });
    }
    Ok(quote! { session.property(#property)? })
}

/// Per-field customization parsed from `#[specimen(...)]`
pub(crate) struct FieldAttr {
    pub(crate) with: Option<Path>,
    pub(crate) skip: bool,
}

/// Parse field-level `#[specimen(...)]` attributes
pub(crate) fn parse_field_attributes(field: &Field) -> Result<FieldAttr> {
    let mut attr = FieldAttr {
        with: None,
        skip: false,
    };

    for raw in &field.attrs {
        if !raw.path().is_ident("specimen") {
            continue;
        }
        let Meta::List(MetaList { tokens, .. }) = raw.meta.clone() else {
            return Err(Error::new_spanned(
                raw,
                "specimen attribute must be a list, e.g. #[specimen(skip)]",
            ));
        };
        let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
        for meta in parser.parse2(tokens)? {
            match meta {
                Meta::Path(path) if path.is_ident("skip") => {
                    attr.skip = true;
                }
                Meta::NameValue(MetaNameValue { path, value, .. }) if path.is_ident("with") => {
                    attr.with = Some(parse_path_literal(&value)?);
                }
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "unsupported specimen field attribute; expected `skip` or `with = \"path\"`",
                    ));
                }
            }
        }
    }

    if attr.skip && attr.with.is_some() {
        return Err(Error::new_spanned(
            field,
            "`skip` and `with` cannot be combined on one field",
        ));
    }
    Ok(attr)
}

/// Parse container-level `#[specimen(builder = "path")]` attributes
fn parse_builder_attributes(attrs: &[Attribute]) -> Result<Vec<Path>> {
    let mut builders = Vec::new();

    for raw in attrs {
        if !raw.path().is_ident("specimen") {
            continue;
        }
        let Meta::List(MetaList { tokens, .. }) = raw.meta.clone() else {
            return Err(Error::new_spanned(raw, "specimen attribute must be a list"));
        };
        let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
        for meta in parser.parse2(tokens)? {
            match meta {
                Meta::NameValue(MetaNameValue { path, value, .. }) if path.is_ident("builder") => {
                    builders.push(parse_path_literal(&value)?);
                }
                other => {
                    return Err(Error::new_spanned(
                        other,
                        "unsupported specimen container attribute; expected `builder = \"path\"`",
                    ));
                }
            }
        }
    }
    Ok(builders)
}

/// Resolve a string literal attribute value into a function path
fn parse_path_literal(value: &syn::Expr) -> Result<Path> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: Lit::Str(lit_str),
        ..
    }) = value
    {
        return lit_str.parse();
    }
    Err(Error::new_spanned(
        value,
        "attribute value must be a string literal naming a function path",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_add_trait_bounds() {
        let mut generics: syn::Generics = parse_quote! { <T, U> };
        add_trait_bounds(&mut generics);

        if let GenericParam::Type(type_param) = &generics.params[0] {
            assert_eq!(type_param.bounds.len(), 2); // Specimen, 'static
        }
    }

    #[test]
    fn test_generate_struct_body_unit() {
        let name: syn::Ident = parse_quote! { UnitStruct };
        let fields = Fields::Unit;

        let result = generate_struct_body(&name, &fields).unwrap();
        let expected = quote! { Ok(UnitStruct) };

        assert_eq!(result.to_string(), expected.to_string());
    }

    #[test]
    fn test_skip_and_with_conflict_is_rejected() {
        let field: Field = Field::parse_named
            .parse2(quote! {
                #[specimen(skip, with = "some::path")]
                total: u64
            })
            .unwrap();

        assert!(parse_field_attributes(&field).is_err());
    }

    #[test]
    fn test_builder_attribute_collects_paths() {
        let input: DeriveInput = parse_quote! {
            #[specimen(builder = "Point::origin_builder")]
            #[specimen(builder = "Point::random_builder")]
            struct Point {
                x: i32,
                y: i32,
            }
        };

        let builders = parse_builder_attributes(&input.attrs).unwrap();
        assert_eq!(builders.len(), 2);
    }

    #[test]
    fn test_empty_enum_is_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Nothing {}
        };

        assert!(generate_specimen_impl(&input).is_err());
    }
}
