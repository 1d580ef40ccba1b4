mod utils;

use proc_macro::{TokenStream, TokenTree};

/// Runs an `async fn main` on a freshly built runtime.
///
/// Accepts an optional `worker_threads = N` argument.
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let worker_threads = match utils::parse_worker_threads(&attr.to_string()) {
        Ok(n) => n,
        Err(message) => return utils::compile_error(&message),
    };

    let mut tokens: Vec<TokenTree> = item.into_iter().collect();
    let builder = utils::runtime_builder(worker_threads);

    utils::strip_async(&mut tokens);

    let replaced = utils::replace_body(&mut tokens, |block| {
        format!(
            "{{
                let runtime = {builder};
                runtime
                    .block_on(async move {{
                        {block}
                    }})
            }}"
        )
    });

    if !replaced {
        return utils::compile_error("#[eventual::main] expects a function body");
    }

    tokens.into_iter().collect()
}

/// Turns an `async fn` into a `#[test]` that runs on its own runtime.
///
/// Accepts an optional `worker_threads = N` argument.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let worker_threads = match utils::parse_worker_threads(&attr.to_string()) {
        Ok(n) => n,
        Err(message) => return utils::compile_error(&message),
    };

    let mut tokens: Vec<TokenTree> = item.into_iter().collect();
    let builder = utils::runtime_builder(worker_threads);

    utils::strip_async(&mut tokens);

    let replaced = utils::replace_body(&mut tokens, |block| {
        format!(
            "{{
                let runtime = {builder};
                runtime
                    .block_on(async move {{ {block} }});
            }}"
        )
    });

    if !replaced {
        return utils::compile_error("#[eventual::test] expects a function body");
    }

    let test_attr: TokenStream = "#[test]".parse().unwrap_or_default();
    let mut result: Vec<TokenTree> = test_attr.into_iter().collect();
    result.extend(tokens);

    result.into_iter().collect()
}
