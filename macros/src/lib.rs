mod log;
mod loggable;

use proc_macro::TokenStream;

/// Emits a loggable value at the level it carries.
#[proc_macro]
pub fn log(input: TokenStream) -> TokenStream {
    log::log_impl(input)
}

/// Declares an error or event enum whose variants each carry a message and a
/// `tracing::Level`, exposed through `level()`.
#[proc_macro]
pub fn loggable(input: TokenStream) -> TokenStream {
    loggable::loggable_impl(input)
}
