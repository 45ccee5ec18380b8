use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::{
    parse_macro_input, parse_quote, spanned::Spanned, Attribute, Data, DeriveInput, Fields,
    LitStr,
};

/// Implements `crate::walk::Walk` and `crate::walk::FieldWalk`.
///
/// Structs must have named fields; each one is reported through `FieldWalk`.
/// Enums must wrap exactly one node per variant and delegate to it. An
/// optional `#[walk(category = "...")]` on the enum or a variant names the
/// grammar category; the innermost category wins.
#[proc_macro_derive(WalkAst, attributes(walk))]
pub fn derive_walk_ast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(ts) => ts.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn expand(mut input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = input.ident.clone();
    let span = input.span();
    let category = category_of(&input.attrs)?;

    for param in input.generics.type_params_mut() {
        param.bounds.push(parse_quote!(crate::walk::Walk));
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (kind_body, walk_body) = match &input.data {
        Data::Struct(data) => struct_bodies(&name, &data.fields, &category)?,
        Data::Enum(data) => {
            let mut kind_arms = Vec::new();
            let mut walk_arms = Vec::new();
            for variant in &data.variants {
                let ident = &variant.ident;
                match &variant.fields {
                    Fields::Unnamed(f) if f.unnamed.len() == 1 => {}
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "WalkAst enum variants must wrap exactly one node",
                        ))
                    }
                }
                let variant_category = option_tokens(&category_of(&variant.attrs)?);
                kind_arms.push(quote! {
                    Self::#ident(inner) => {
                        let k = crate::walk::Walk::kind(inner);
                        crate::walk::NodeKind {
                            category: k.category.or(#variant_category),
                            name: k.name,
                        }
                    }
                });
                walk_arms.push(quote! {
                    Self::#ident(inner) => crate::walk::Walk::walk(inner, v),
                });
            }
            let enum_category = option_tokens(&category);
            (
                quote! {
                    let k = match self { #(#kind_arms)* };
                    crate::walk::NodeKind {
                        category: k.category.or(#enum_category),
                        name: k.name,
                    }
                },
                quote! { match self { #(#walk_arms)* } },
            )
        }
        Data::Union(u) => {
            return Err(syn::Error::new_spanned(
                u.union_token,
                "WalkAst cannot be derived for unions",
            ))
        }
    };

    Ok(quote_spanned! {span =>
        impl #impl_generics crate::walk::Walk for #name #ty_generics #where_clause {
            fn kind(&self) -> crate::walk::NodeKind {
                #kind_body
            }

            fn walk<'ast>(&'ast self, v: &mut dyn crate::walk::Visitor<'ast>) {
                #walk_body
            }
        }

        impl #impl_generics crate::walk::FieldWalk for #name #ty_generics #where_clause {
            #[inline]
            fn walk_field<'ast>(
                &'ast self,
                name: &'static str,
                v: &mut dyn crate::walk::Visitor<'ast>,
            ) {
                v.visit_node(name, self);
            }
        }
    })
}

fn struct_bodies(
    name: &syn::Ident,
    fields: &Fields,
    category: &Option<LitStr>,
) -> syn::Result<(proc_macro2::TokenStream, proc_macro2::TokenStream)> {
    let Fields::Named(named) = fields else {
        return Err(syn::Error::new_spanned(
            fields,
            "WalkAst structs must have named fields",
        ));
    };

    let calls = named.named.iter().filter_map(|f| f.ident.as_ref()).map(|ident| {
        let label = ident.to_string();
        quote! { crate::walk::FieldWalk::walk_field(&self.#ident, #label, v); }
    });
    let category = option_tokens(category);
    let label = name.to_string();

    Ok((
        quote! {
            crate::walk::NodeKind { category: #category, name: #label }
        },
        quote! { #(#calls)* },
    ))
}

fn category_of(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut category = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("walk")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("category") {
                category = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported walk attribute"))
            }
        })?;
    }
    Ok(category)
}

fn option_tokens(lit: &Option<LitStr>) -> proc_macro2::TokenStream {
    match lit {
        Some(lit) => quote! { ::core::option::Option::Some(#lit) },
        None => quote! { ::core::option::Option::None },
    }
}
