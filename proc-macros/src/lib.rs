use proc_macro::{self, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, LitStr, parse_macro_input};

/// Gives a struct with named fields its own record type.
///
/// The record type is named after the struct (or `#[record(name = "...")]`)
/// and lists the fields in declaration order. It is defined once, the first
/// time it is asked for.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_record_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_record_impl(input: DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    ident,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Record can only be derived for structs",
            ));
        }
    };

    let name = record_name(&input)?.unwrap_or_else(|| ident.to_string());

    let field_idents: Vec<_> = fields.iter().filter_map(|f| f.ident.clone()).collect();
    let field_names: Vec<_> = field_idents
        .iter()
        .map(|f| f.to_string().trim_start_matches("r#").to_string())
        .collect();

    Ok(quote! {
        impl ::immutable_record::records::HasRecordType for #ident {
            fn record_type() -> ::std::sync::Arc<::immutable_record::records::RecordType> {
                static RECORD_TYPE: ::std::sync::LazyLock<
                    ::std::sync::Arc<::immutable_record::records::RecordType>,
                > = ::std::sync::LazyLock::new(|| {
                    ::immutable_record::records::RecordType::from_names(
                        Some(#name),
                        &[ #( #field_names, )* ],
                    )
                });
                RECORD_TYPE.clone()
            }

            fn into_values(self) -> Vec<::immutable_record::value::Value> {
                vec![ #( ::immutable_record::value::Value::from(self.#field_idents), )* ]
            }

            fn from_values(
                values: Vec<::immutable_record::value::Value>,
            ) -> Result<Self, ::immutable_record::error::RecordError> {
                let mut values = values.into_iter();
                Ok(Self {
                    #(
                        #field_idents: ::std::convert::TryFrom::try_from(
                            values.next().unwrap_or(::immutable_record::value::Value::Null),
                        )?,
                    )*
                })
            }
        }

        impl TryFrom<#ident> for ::immutable_record::records::Record {
            type Error = ::immutable_record::error::RecordError;

            fn try_from(value: #ident) -> Result<Self, Self::Error> {
                ::immutable_record::records::Record::from_rust_type(value)
            }
        }

        impl<'a> TryFrom<&'a ::immutable_record::records::Record> for #ident {
            type Error = ::immutable_record::error::RecordError;

            fn try_from(record: &'a ::immutable_record::records::Record) -> Result<Self, Self::Error> {
                record.try_into_rust()
            }
        }
    })
}

fn record_name(input: &DeriveInput) -> Result<Option<String>, Error> {
    let mut name = None;
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute"))
            }
        })?;
    }
    Ok(name)
}
