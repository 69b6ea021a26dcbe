//! Entity derive macro implementation

mod attrs;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let struct_attr = attrs::struct_attr(&input.attrs)?;
    let table = match &struct_attr.table {
        Some(table) => quote! { ::core::option::Option::Some(#table) },
        None => quote! { ::core::option::Option::None },
    };
    let type_name = name.to_string();

    let mut descriptors = Vec::new();
    let mut getters = Vec::new();
    let mut setters = Vec::new();

    for field in fields {
        let field_attr = attrs::field_attr(&field.attrs)?;
        if field_attr.skip {
            continue;
        }
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let ty = &field.ty;
        let field_name = ident.to_string();
        let column = match &field_attr.column {
            Some(column) => quote! { ::core::option::Option::Some(#column) },
            None => quote! { ::core::option::Option::None },
        };

        descriptors.push(quote! {
            ::modelsql::FieldDescriptor {
                name: #field_name,
                column: #column,
                ty: <#ty as ::modelsql::SqlType>::FIELD_TYPE,
                offset: ::core::mem::offset_of!(Self, #ident),
            }
        });
        getters.push(quote! {
            #field_name => ::core::option::Option::Some(::modelsql::ToValue::to_value(&self.#ident))
        });
        setters.push(quote! {
            #field_name => {
                self.#ident = <#ty as ::modelsql::FromValue>::from_value(value)
                    .map_err(|m| m.into_error(name))?;
                ::core::result::Result::Ok(())
            }
        });
    }

    Ok(quote! {
        unsafe impl #impl_generics ::modelsql::Entity for #name #ty_generics #where_clause {
            fn descriptor() -> ::modelsql::EntityDescriptor {
                ::modelsql::EntityDescriptor {
                    type_name: #type_name,
                    table: #table,
                    fields: ::std::vec![#(#descriptors),*],
                }
            }

            fn get_field(&self, name: &str) -> ::core::option::Option<::modelsql::Value> {
                match name {
                    #(#getters,)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unreachable_code, unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: ::modelsql::Value,
            ) -> ::modelsql::OrmResult<()> {
                match name {
                    #(#setters)*
                    _ => ::core::result::Result::Err(::modelsql::OrmError::unknown_field(name)),
                }
            }
        }
    })
}
