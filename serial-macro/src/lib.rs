use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive `SerialType` for a struct with named fields.
///
/// The struct must also implement `Default`; blank instances are created
/// with it before their fields are read back.
///
/// # Attributes
///
/// - `#[serial(name = "...")]` on the struct: registered identifier
///   (defaults to the struct name).
/// - `#[serial(extends)]` on one field: the embedded base record. Its
///   fields are written first, as if declared on this struct.
/// - `#[serial(rename = "...")]` on a field: payload key.
/// - `#[serial(skip)]` on a field: not serialized; keeps its default.
///
/// ```ignore
/// #[derive(Default, Serializable)]
/// struct Record {
///     label: String,
///     counts: Vec<i32>,
/// }
///
/// #[derive(Default, Serializable)]
/// #[serial(name = "records.Tagged")]
/// struct TaggedRecord {
///     #[serial(extends)]
///     record: Record,
///     tag: String,
/// }
/// ```
#[proc_macro_derive(Serializable, attributes(serial))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

struct FieldSpec<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    key: String,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut serial_name = name.to_string();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("serial")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                serial_name = lit.value();
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Serializable requires named fields; add a field or use `{}`",
                ));
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Serializable can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Serializable can only be derived for structs",
            ));
        }
    };

    let mut base: Option<(&syn::Ident, &syn::Type)> = None;
    let mut own = Vec::new();
    for field in named {
        // Named fields always carry an ident.
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let mut extends = false;
        let mut skip = false;
        let mut key = ident.to_string();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("serial")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("extends") {
                    extends = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    key = lit.value();
                    Ok(())
                } else {
                    Err(meta.error("expected `extends`, `skip` or `rename = \"...\"`"))
                }
            })?;
        }

        if extends {
            if base.is_some() {
                return Err(syn::Error::new_spanned(
                    ident,
                    "only one field can be marked `#[serial(extends)]`",
                ));
            }
            base = Some((ident, &field.ty));
        } else if !skip {
            own.push(FieldSpec {
                ident,
                ty: &field.ty,
                key,
            });
        }
    }

    let krate = quote! { ::redlilium_serial };

    let extends_const = match base {
        Some((_, ty)) => quote! {
            const EXTENDS: ::core::option::Option<&'static str> =
                ::core::option::Option::Some(<#ty as #krate::SerialType>::NAME);
        },
        None => quote! {},
    };

    let base_fields = match base {
        Some((_, ty)) => quote! { <#ty as #krate::SerialType>::fields() },
        None => quote! { ::std::vec::Vec::new() },
    };
    let base_write = base.map(|(ident, ty)| {
        quote! { <#ty as #krate::SerialType>::write_fields(&self.#ident, ctx)?; }
    });
    let base_read = base.map(|(ident, ty)| {
        quote! { <#ty as #krate::SerialType>::read_fields(&mut self.#ident, ctx)?; }
    });

    let infos = own.iter().map(|f| {
        let key = &f.key;
        let ty = f.ty;
        quote! {
            fields.push(#krate::FieldInfo {
                name: #key,
                kind: <#ty as #krate::SerialField>::KIND,
            });
        }
    });
    let writes = own.iter().map(|f| {
        let key = &f.key;
        let ident = f.ident;
        quote! { ctx.write_field(#key, &self.#ident)?; }
    });
    let reads = own.iter().map(|f| {
        let key = &f.key;
        let ident = f.ident;
        let ty = f.ty;
        quote! { self.#ident = ctx.read_field::<#ty>(#key)?; }
    });

    Ok(quote! {
        impl #impl_generics #krate::SerialType for #name #ty_generics #where_clause {
            const NAME: &'static str = #serial_name;
            #extends_const

            #[allow(unused_mut)]
            fn fields() -> ::std::vec::Vec<#krate::FieldInfo> {
                let mut fields: ::std::vec::Vec<#krate::FieldInfo> = #base_fields;
                #(#infos)*
                fields
            }

            #[allow(unused_variables)]
            fn write_fields(
                &self,
                ctx: &mut #krate::SerializeContext<'_>,
            ) -> ::core::result::Result<(), #krate::SerializeError> {
                #base_write
                #(#writes)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn read_fields(
                &mut self,
                ctx: &mut #krate::DeserializeContext<'_>,
            ) -> ::core::result::Result<(), #krate::DeserializeError> {
                #base_read
                #(#reads)*
                ::core::result::Result::Ok(())
            }
        }
    })
}
