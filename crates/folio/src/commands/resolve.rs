//! `folio resolve` command implementation.

use clap::Args;
use folio_router::{Request, RouteResult};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::site::build_router;

/// Arguments for the resolve command.
#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// Request path, e.g. `/docs/intro`.
    path: String,

    /// Request method.
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header as `Name: value` (repeatable).
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    #[command(flatten)]
    pub site: SiteArgs,
}

impl ResolveArgs {
    /// Route one request and print the match.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a header is malformed, or the
    /// request does not resolve.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config()?;
        let request = self.request()?;
        let router = build_router(&config)?;

        match router.route(&request) {
            RouteResult::Success(m) => {
                output.highlight(&format!(
                    "{} {} -> {}",
                    m.method,
                    request.path(),
                    m.page.logical_path()
                ));
                output.info(&format!("Handler: {}", m.handler.name()));
                output.info(&format!("Variant: {}", m.extension));
                if !m.trailing.is_empty() {
                    output.info(&format!("Trailing: /{}", m.trailing.join("/")));
                }
                output.result(&serde_json::to_string_pretty(&m.variables)?);
                Ok(())
            }
            RouteResult::NotFound => Err(CliError::NotFound(request.path().to_string())),
            RouteResult::MethodNotAllowed { allowed } => Err(CliError::MethodNotAllowed {
                method: request.method().to_owned(),
                path: request.path().to_string(),
                allowed: allowed.into_iter().collect::<Vec<_>>().join(", "),
            }),
        }
    }

    fn request(&self) -> Result<Request, CliError> {
        let mut request = Request::new(&self.method, &self.path);
        for header in &self.headers {
            let (name, value) = parse_header(header)?;
            request = request.with_header(name, value);
        }
        Ok(request)
    }
}

fn parse_header(raw: &str) -> Result<(&str, &str), CliError> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(CliError::Validation(format!(
            "Invalid header '{raw}', expected 'Name: value'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept: text/html").unwrap(),
            ("Accept", "text/html")
        );
        assert_eq!(parse_header("X-Empty:").unwrap(), ("X-Empty", ""));
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }
}
