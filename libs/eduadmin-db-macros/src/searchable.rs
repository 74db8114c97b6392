use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, spanned::Spanned};

/// Operator tags understood by the condition builder. Kept in sync with
/// `eduadmin_db::search::SearchOp`.
const OPERATORS: &[&str] = &[
    "exact",
    "iexact",
    "contains",
    "icontains",
    "startswith",
    "endswith",
    "gt",
    "gte",
    "lt",
    "lte",
    "range",
    "in",
    "order",
];

struct SearchFieldDecl {
    ident: Ident,
    op: String,
    column: String,
}

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "#[derive(Searchable)] can only be applied to structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            input.span(),
            "#[derive(Searchable)] requires named fields",
        ));
    };

    let mut decls = Vec::new();
    let mut pagination: Option<Ident> = None;

    for field in &fields.named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("search")) {
            let mut op: Option<(String, Span)> = None;
            let mut column: Option<String> = None;
            let mut is_page = false;

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("pagination") {
                    is_page = true;
                    Ok(())
                } else if meta.path.is_ident("op") {
                    let lit = meta.value()?.parse::<LitStr>()?;
                    op = Some((lit.value(), lit.span()));
                    Ok(())
                } else if meta.path.is_ident("column") {
                    column = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else {
                    Err(meta.error("search: expected `op`, `column` or `pagination`"))
                }
            })?;

            if is_page {
                if op.is_some() || column.is_some() {
                    return Err(syn::Error::new(
                        attr.span(),
                        "search: `pagination` cannot be combined with `op` or `column`",
                    ));
                }
                if pagination.is_some() {
                    return Err(syn::Error::new(
                        ident.span(),
                        "search: only one field may be marked `pagination`",
                    ));
                }
                pagination = Some(ident.clone());
                continue;
            }

            let Some((op, op_span)) = op else {
                return Err(syn::Error::new(attr.span(), "search: missing `op = \"...\"`"));
            };
            if !OPERATORS.contains(&op.as_str()) {
                return Err(syn::Error::new(
                    op_span,
                    format!(
                        "search: unsupported operator `{op}`; expected one of: {}",
                        OPERATORS.join(", ")
                    ),
                ));
            }
            decls.push(SearchFieldDecl {
                column: column.unwrap_or_else(|| ident.to_string()),
                ident: ident.clone(),
                op,
            });
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_entries = decls.iter().map(|d| {
        let field = d.ident.to_string();
        let op = &d.op;
        let column = &d.column;
        quote! {
            ::eduadmin_db::search::SearchField {
                field: #field,
                op: #op,
                column: #column,
            }
        }
    });
    let value_exprs = decls.iter().map(|d| {
        let ident = &d.ident;
        quote! {
            ::eduadmin_db::search::IntoSearchValue::to_search_value(&self.#ident)
        }
    });
    let page_impl = pagination.map(|ident| {
        quote! {
            fn page(&self) -> ::eduadmin_db::paging::PageRequest {
                self.#ident
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::eduadmin_db::search::SearchRequest for #name #ty_generics #where_clause {
            const FIELDS: &'static [::eduadmin_db::search::SearchField] = &[
                #(#field_entries),*
            ];

            fn search_values(&self) -> ::std::vec::Vec<::eduadmin_db::search::SearchValue> {
                ::std::vec![#(#value_exprs),*]
            }

            #page_impl
        }
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn expands_fields_in_declaration_order() {
        let input: DeriveInput = parse_quote! {
            pub struct GetPageReq {
                #[search(pagination)]
                pub page: PageRequest,
                #[search(op = "contains", column = "name")]
                pub name: String,
                #[search(op = "exact")]
                pub status: String,
                pub ignored: String,
            }
        };
        let out = expand(&input).unwrap().to_string();
        let name_at = out.find("field : \"name\"").unwrap();
        let status_at = out.find("field : \"status\"").unwrap();
        assert!(name_at < status_at);
        assert!(out.contains("column : \"status\""));
        assert!(out.contains("fn page"));
        assert!(!out.contains("ignored"));
    }

    #[test]
    fn unsupported_operator_is_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Req {
                #[search(op = "like")]
                pub name: String,
            }
        };
        let err = expand(&input).unwrap_err().to_string();
        assert!(err.contains("unsupported operator `like`"));
    }

    #[test]
    fn missing_operator_is_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Req {
                #[search(column = "name")]
                pub name: String,
            }
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn duplicate_pagination_is_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Req {
                #[search(pagination)]
                pub a: PageRequest,
                #[search(pagination)]
                pub b: PageRequest,
            }
        };
        let err = expand(&input).unwrap_err().to_string();
        assert!(err.contains("only one field"));
    }
}
