use heck::ToUpperCamelCase;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, spanned::Spanned};

#[derive(Default)]
struct SecureConfig {
    id_col: Option<(String, Span)>,
    dept: Option<Dimension>,
    creator: Option<Dimension>,
    updater: Option<Dimension>,
}

enum Dimension {
    Column(String, Span),
    Absent,
}

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "#[derive(Scopable)] can only be applied to structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            input.span(),
            "#[derive(Scopable)] requires named fields",
        ));
    };
    let field_names: Vec<String> = fields
        .named
        .iter()
        .filter_map(|f| f.ident.as_ref().map(ToString::to_string))
        .collect();

    let config = parse_secure_attrs(input)?;

    let Some((id_col, id_span)) = config.id_col else {
        return Err(syn::Error::new(
            input.span(),
            "secure: missing `id_col = \"column_name\"`",
        ));
    };
    ensure_field(&field_names, &id_col, id_span)?;

    let dept = require("dept", config.dept, input.span())?;
    let creator = require("creator", config.creator, input.span())?;
    let updater = require("updater", config.updater, input.span())?;
    for dim in [&dept, &creator, &updater] {
        if let Dimension::Column(name, span) = dim {
            ensure_field(&field_names, name, *span)?;
        }
    }

    let id_variant = column_ident(&id_col);
    let id_field = Ident::new(&id_col, id_span);
    let dept_impl = col_method("dept_col", &dept);
    let creator_impl = col_method("creator_col", &creator);
    let updater_impl = col_method("updater_col", &updater);

    Ok(quote! {
        impl ::eduadmin_db::secure::ScopableEntity for Entity {
            fn id_col() -> Self::Column {
                Self::Column::#id_variant
            }

            #dept_impl

            #creator_impl

            #updater_impl

            fn id_of(model: &Self::Model) -> ::eduadmin_db::secure::RecordId {
                model.#id_field
            }
        }
    })
}

fn column_ident(name: &str) -> Ident {
    Ident::new(&name.to_upper_camel_case(), Span::call_site())
}

fn col_method(method: &str, dim: &Dimension) -> TokenStream {
    let method_ident = Ident::new(method, Span::call_site());
    match dim {
        Dimension::Column(name, _) => {
            let variant = column_ident(name);
            quote! {
                fn #method_ident() -> ::core::option::Option<Self::Column> {
                    ::core::option::Option::Some(Self::Column::#variant)
                }
            }
        }
        Dimension::Absent => quote! {
            fn #method_ident() -> ::core::option::Option<Self::Column> {
                ::core::option::Option::None
            }
        },
    }
}

fn ensure_field(fields: &[String], name: &str, span: Span) -> syn::Result<()> {
    if fields.iter().any(|f| f == name) {
        Ok(())
    } else {
        Err(syn::Error::new(
            span,
            format!("secure: `{name}` is not a field of this model"),
        ))
    }
}

fn require(name: &str, dim: Option<Dimension>, span: Span) -> syn::Result<Dimension> {
    dim.ok_or_else(|| {
        syn::Error::new(
            span,
            format!(
                "secure: missing explicit decision for {name}:\n  \
                 use `{name}_col = \"column_name\"` or `no_{name}`"
            ),
        )
    })
}

fn set_dimension(
    slot: &mut Option<Dimension>,
    name: &str,
    value: Dimension,
    span: Span,
) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            span,
            format!("secure: specify `{name}_col` or `no_{name}` exactly once"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_secure_attrs(input: &DeriveInput) -> syn::Result<SecureConfig> {
    let mut config = SecureConfig::default();

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("secure")) {
        attr.parse_nested_meta(|meta| {
            let span = meta.path.span();
            let key = meta
                .path
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();

            match key.as_str() {
                "no_dept" => set_dimension(&mut config.dept, "dept", Dimension::Absent, span),
                "no_creator" => {
                    set_dimension(&mut config.creator, "creator", Dimension::Absent, span)
                }
                "no_updater" => {
                    set_dimension(&mut config.updater, "updater", Dimension::Absent, span)
                }
                "id_col" | "dept_col" | "creator_col" | "updater_col" => {
                    let value = meta.value()?.parse::<LitStr>()?.value();
                    match key.as_str() {
                        "id_col" => {
                            if config.id_col.is_some() {
                                return Err(meta.error("secure: duplicate attribute `id_col`"));
                            }
                            config.id_col = Some((value, span));
                            Ok(())
                        }
                        "dept_col" => set_dimension(
                            &mut config.dept,
                            "dept",
                            Dimension::Column(value, span),
                            span,
                        ),
                        "creator_col" => set_dimension(
                            &mut config.creator,
                            "creator",
                            Dimension::Column(value, span),
                            span,
                        ),
                        _ => set_dimension(
                            &mut config.updater,
                            "updater",
                            Dimension::Column(value, span),
                            span,
                        ),
                    }
                }
                _ => Err(meta.error(format!(
                    "secure: unknown attribute `{key}`; expected one of \
                     id_col, dept_col, no_dept, creator_col, no_creator, updater_col, no_updater"
                ))),
            }
        })?;
    }

    Ok(config)
}
