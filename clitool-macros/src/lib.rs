//! Procedural macros for tool registration.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, parse_quote, DeriveInput, Path};

/// Registers a tool type with the link-time tool discoverer.
///
/// The annotated type must implement `CliTool` and `Default`; a fresh
/// instance is created every time tools are discovered.
///
/// Generated code refers to `::clitool_registry` unless another path is given
/// with `#[cli_tool(crate = path::to::registry)]`.
///
/// # Compile errors
///
/// - Any argument other than `crate = <path>` is rejected with
///   `unsupported cli_tool argument`.
/// - Generic types are rejected with `cli_tool types cannot be generic`,
///   since a registration must name one concrete type.
#[proc_macro_attribute]
pub fn cli_tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut registry: Path = parse_quote!(::clitool_registry);
    if !attr.is_empty() {
        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("crate") {
                registry = meta.value()?.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported cli_tool argument"))
            }
        });
        parse_macro_input!(attr with parser);
    }

    let input = parse_macro_input!(item as DeriveInput);
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "cli_tool types cannot be generic")
            .to_compile_error()
            .into();
    }

    let ident = &input.ident;
    let factory = format_ident!("__cli_tool_factory_{}", ident);

    quote! {
        #input

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #factory() -> ::std::boxed::Box<dyn #registry::CliTool> {
            ::std::boxed::Box::new(<#ident as ::core::default::Default>::default())
        }

        #registry::inventory::submit! {
            #registry::ToolRegistration::new(#factory)
        }
    }
    .into()
}
