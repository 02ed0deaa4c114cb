use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod node_meta;
use node_meta::{parse_node_info, parse_ports, PortField};

#[proc_macro_derive(FlowNode, attributes(node_meta, input, output))]
pub fn derive_flow_node(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let node_info = match parse_node_info(&input) {
        Ok(info) => info,
        Err(e) => return e.write_errors().into(),
    };

    let (inputs, outputs) = match parse_ports(&input) {
        Ok(ports) => ports,
        Err(e) => return e.write_errors().into(),
    };

    let struct_name = &input.ident;
    let node_id = struct_name.to_string().to_lowercase();
    let node_name = &node_info.name;

    let kind = match node_info.kind.as_str() {
        "source" => quote!(Source),
        "operator" => quote!(Operator),
        "sink" => quote!(Sink),
        other => {
            return syn::Error::new(
                struct_name.span(),
                format!("unknown node kind `{}`, expected source, operator or sink", other),
            )
            .to_compile_error()
            .into();
        }
    };

    if node_info.kind == "source" && !inputs.is_empty() {
        return syn::Error::new(struct_name.span(), "source nodes cannot declare inputs")
            .to_compile_error()
            .into();
    }

    if node_info.kind == "sink" && !outputs.is_empty() {
        return syn::Error::new(struct_name.span(), "sink nodes cannot declare outputs")
            .to_compile_error()
            .into();
    }

    let input_metas = inputs.iter().map(port_metadata);
    let output_metas = outputs.iter().map(port_metadata);

    let mod_name = syn::Ident::new(
        &format!("__flowplug_registration_{}", node_id),
        struct_name.span(),
    );

    let factory_fn_name = syn::Ident::new(
        &format!("create_metadata_{}", node_id),
        struct_name.span(),
    );

    let expanded = quote! {
        mod #mod_name {
            use super::*;

            fn #factory_fn_name() -> crate::registry::NodeMetadata {
                crate::registry::NodeMetadata {
                    id: #node_id.to_string(),
                    name: #node_name.to_string(),
                    kind: crate::registry::NodeKind::#kind,
                    inputs: vec![#(#input_metas),*],
                    outputs: vec![#(#output_metas),*],
                    factory: || crate::registry::RegisteredNode::#kind(
                        ::std::boxed::Box::new(#struct_name::default())
                    ),
                }
            }

            ::inventory::submit! {
                crate::registry::NodeMetadataFactoryWrapper(#factory_fn_name)
            }
        }
    };

    TokenStream::from(expanded)
}

fn port_metadata(port: &PortField) -> proc_macro2::TokenStream {
    let port_id = port.port_id();
    let data_type = port.data_type.as_deref().unwrap_or("bytes");

    quote! {
        crate::registry::PortMetadata {
            id: crate::core::PortId::from(#port_id),
            data_type: #data_type.to_string(),
        }
    }
}
