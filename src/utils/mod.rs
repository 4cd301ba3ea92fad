pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();
const DEFAULT_DIRECTIVE: &str = "spendbook=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` is honoured first; `extra` adds comma separated directives on top.
/// Log lines go to stderr so command output on stdout stays clean.
pub fn init_tracing(extra: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        for directive in directives(extra) {
            filter = filter.add_directive(directive);
        }

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn directives(extra: Option<&str>) -> Vec<Directive> {
    let mut parsed: Vec<Directive> = DEFAULT_DIRECTIVE.parse::<Directive>().into_iter().collect();
    for raw in extra.unwrap_or_default().split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match raw.parse() {
            Ok(directive) => parsed.push(directive),
            Err(err) => eprintln!("ignoring log filter `{raw}`: {err}"),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directives_extend_the_default() {
        assert_eq!(directives(None).len(), 1);
        assert_eq!(directives(Some("spendbook_core=debug, ,reqwest=warn")).len(), 3);
    }
}
