use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Expr, parse_macro_input};

const LEVELS: [(&str, &str); 5] = [
    ("ERROR", "error"),
    ("WARN", "warn"),
    ("INFO", "info"),
    ("DEBUG", "debug"),
    ("TRACE", "trace"),
];

pub fn log_impl(input: TokenStream) -> TokenStream {
    let value = parse_macro_input!(input as Expr);

    // tracing needs the level at compile time, so dispatch on it here.
    let arms = LEVELS.iter().map(|(level, event)| {
        let level = format_ident!("{}", level);
        let event = format_ident!("{}", event);
        quote! {
            tracing::Level::#level => tracing::#event!("{}", message)
        }
    });

    quote! {
        {
            let loggable = &#value;
            let message = loggable.to_string();
            match loggable.level() {
                #(#arms,)*
            }
        }
    }
    .into()
}
