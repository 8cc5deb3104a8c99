use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type};

struct KeyField {
    ident: Ident,
    ty: Type,
    serialized: String,
}

pub fn derive_keyed(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let store = match extract_store(&input) {
        Ok(store) => store,
        Err(err) => return err.to_compile_error().into(),
    };

    let key = match extract_key_field(&input) {
        Ok(key) => key,
        Err(err) => return err.to_compile_error().into(),
    };

    let key_ident = &key.ident;
    let key_ty = &key.ty;
    let key_name = &key.serialized;

    let expanded = quote! {
        impl #impl_generics ::observable_store::Keyed for #name #ty_generics #where_clause {
            const STORE: &'static str = #store;
            const KEY_FIELD: &'static str = #key_name;

            type Key = #key_ty;

            fn key(&self) -> &Self::Key {
                &self.#key_ident
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_store(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("keyed") {
            continue;
        }

        let mut store = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("store") {
                let value: LitStr = meta.value()?.parse()?;
                store = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `store = \"...\"`"))
            }
        })?;

        if let Some(s) = store {
            return Ok(s);
        }
    }

    // Default: snake_case struct name + "s"
    let name = input.ident.to_string();
    Ok(format!("{}s", to_snake_case(&name)))
}

fn extract_key_field(input: &DeriveInput) -> syn::Result<KeyField> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => fields,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Keyed derive: only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Keyed derive: only structs are supported",
            ))
        }
    };

    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("keyed") {
                continue;
            }

            let mut is_key = false;
            let mut rename = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    is_key = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    rename = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `key` or `rename = \"...\"`"))
                }
            })?;

            if is_key {
                if let Some(ident) = &field.ident {
                    return Ok(KeyField {
                        ident: ident.clone(),
                        ty: field.ty.clone(),
                        serialized: rename.unwrap_or_else(|| ident.to_string()),
                    });
                }
            }
        }
    }

    // Default: look for a field named "id"
    for field in &fields.named {
        if let Some(ident) = &field.ident {
            if ident == "id" {
                return Ok(KeyField {
                    ident: ident.clone(),
                    ty: field.ty.clone(),
                    serialized: "id".to_string(),
                });
            }
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "Keyed derive: no field marked with #[keyed(key)] and no field named `id`",
    ))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
