//! # Loandesk Derive Macros
//!
//! This crate provides derive macros for the loandesk library, specifically for
//! generating by-name field access on records and drafts.
//!
//! ## Form Derive Macro
//!
//! The `Form` derive macro implements the `loandesk::Form` trait for structs with
//! named fields.  Every field is exposed under its camelCase wire name, the same
//! name the remote API uses, so that a console command such as `cityName=Paris`
//! lands in the right field of a draft.
//!
//! Field types must implement `loandesk::FormValue`, which knows how to parse a
//! raw form string into the field and how to render the field back out.
//!
//! ### Examples
//!
//! ```rust,ignore
//! use loandesk::Form;
//!
//! #[derive(Default, loandesk_derive::Form)]
//! struct Draft {
//!     city_name: String,
//! }
//!
//! let mut draft = Draft::default();
//! draft.set_field("cityName", "Nairobi").unwrap();
//! assert_eq!(Draft::FIELDS, &["cityName"]);
//! assert_eq!(draft.field("cityName").as_deref(), Some("Nairobi"));
//! ```
//!
//! ## Implementation Details
//!
//! The derive macro uses the `derive_util` crate to traverse the struct and emits one
//! match arm per field for both the getter and the setter.  Unknown names fall through
//! to `None` and `FormError::UnknownField` respectively.

#![recursion_limit = "128"]

extern crate proc_macro;
#[macro_use]
extern crate quote;
extern crate syn;

use proc_macro2::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use derive_util::StructVisitor;

/// Derive the Form trait for structs with named fields.
#[proc_macro_derive(Form, attributes())]
pub fn derive_form(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ty_name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (names, getters, setters) = match input.data {
        syn::Data::Struct(ref ds) => {
            let mut fsv = FormStructVisitor;
            fsv.visit_struct(&ty_name, ds)
        }
        syn::Data::Enum(_) => {
            panic!("enums are not supported; derive Form on a struct with named fields");
        }
        syn::Data::Union(_) => {
            panic!("unions are not supported");
        }
    };

    let generated = quote! {
        impl #impl_generics loandesk::Form for #ty_name #ty_generics #where_clause {
            const FIELDS: &'static [&'static str] = &[#(#names),*];

            fn field(&self, name: &str) -> Option<String> {
                match name {
                    #getters
                    _ => None,
                }
            }

            fn set_field(&mut self, name: &str, raw: &str) -> Result<(), loandesk::FormError> {
                match name {
                    #setters
                    _ => Err(loandesk::FormError::UnknownField(name.to_string())),
                }
            }
        }
    };
    generated.into()
}

/// Converts a snake_case Rust field name into the camelCase name used on the wire.
fn wire_name(field_ident: &str) -> String {
    let field_ident = field_ident.strip_prefix("r#").unwrap_or(field_ident);
    let mut result = String::with_capacity(field_ident.len());
    let mut upper_next = false;
    for c in field_ident.chars() {
        if c == '_' {
            upper_next = !result.is_empty();
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

////////////////////////////////////////// FormStructVisitor /////////////////////////////////////////

struct FormStructVisitor;

impl StructVisitor for FormStructVisitor {
    type Output = (Vec<String>, TokenStream, TokenStream);

    fn visit_struct_named_fields(
        &mut self,
        _ty_name: &syn::Ident,
        _ds: &syn::DataStruct,
        fields: &syn::FieldsNamed,
    ) -> Self::Output {
        let mut names = vec![];
        let mut getters = quote! {};
        let mut setters = quote! {};
        for field in fields.named.iter() {
            if let Some(field_ident) = &field.ident {
                let wire = wire_name(&field_ident.to_string());
                let field_type = field.ty.clone();
                getters = quote! {
                    #getters
                    #wire => Some(<#field_type as loandesk::FormValue>::render_form(&self.#field_ident)),
                };
                setters = quote! {
                    #setters
                    #wire => {
                        self.#field_ident = <#field_type as loandesk::FormValue>::parse_form(raw)
                            .map_err(|reason| loandesk::FormError::InvalidValue {
                                field: name.to_string(),
                                reason,
                            })?;
                        Ok(())
                    }
                };
                names.push(wire);
            }
        }
        (names, getters, setters)
    }
}
