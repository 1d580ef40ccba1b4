use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Parses the arguments accepted by the attribute macros.
///
/// The only argument is `worker_threads = N`. Returns `Ok(None)` when no
/// argument is given, and a message for `compile_error!` on any unknown
/// key or invalid value.
pub(crate) fn parse_worker_threads(attr: &str) -> Result<Option<usize>, String> {
    let mut worker_threads = None;

    for part in attr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = part.split_once('=') else {
            return Err(format!("expected `worker_threads = N`, found `{part}`"));
        };

        let (key, value) = (key.trim(), value.trim());
        if key != "worker_threads" {
            return Err(format!("unknown argument `{key}`, expected `worker_threads`"));
        }

        match value.parse::<usize>() {
            Ok(n) if n > 0 => worker_threads = Some(n),
            _ => {
                return Err(format!(
                    "`worker_threads` expects a positive integer, found `{value}`"
                ));
            }
        }
    }

    Ok(worker_threads)
}

/// Turns a message into a `compile_error!` invocation.
pub(crate) fn compile_error(message: &str) -> TokenStream {
    format!("compile_error!({message:?});")
        .parse()
        .unwrap_or_default()
}

/// Builds the `RuntimeBuilder` expression for the given thread count.
pub(crate) fn runtime_builder(worker_threads: Option<usize>) -> String {
    let mut builder = String::from("::eventual::RuntimeBuilder::new()");

    if let Some(n) = worker_threads {
        builder.push_str(&format!(".worker_threads({n})"));
    }

    builder.push_str(".build()");
    builder
}

/// Removes the `async` keyword from a function signature.
pub(crate) fn strip_async(tokens: &mut Vec<TokenTree>) {
    if let Some(pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        tokens.remove(pos);
    }
}

/// Replaces the function body (the last brace group) with `body`.
///
/// The original body is handed to `body` as source text. Returns `false`
/// if no body was found.
pub(crate) fn replace_body(tokens: &mut [TokenTree], body: impl FnOnce(String) -> String) -> bool {
    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return false;
    };

    let TokenTree::Group(group) = &tokens[pos] else {
        return false;
    };

    let new_block = body(group.stream().to_string());

    match new_block.parse::<TokenStream>() {
        Ok(stream) => {
            tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, stream));
            true
        }
        Err(_) => false,
    }
}
