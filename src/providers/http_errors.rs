use anyhow::anyhow;
use std::error::Error as StdError;
use std::io::ErrorKind;

fn error_chain_has_io_kind(
    err: &(dyn StdError + 'static),
    kind: ErrorKind,
    needle: &str,
) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == kind
        {
            return true;
        }

        if source.to_string().to_ascii_lowercase().contains(needle) {
            return true;
        }

        current = source.source();
    }

    false
}

fn error_chain_has_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    error_chain_has_io_kind(err, ErrorKind::ConnectionRefused, "connection refused")
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    error_chain_has_io_kind(err, ErrorKind::TimedOut, "timed out")
}

/// Innermost message of the chain, e.g. the DNS or TLS failure behind a
/// generic "error sending request".
fn root_cause(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// Turns a transport failure into a one-line diagnostic. `api_url` must not
/// carry the API key; the URL stored inside `err` is dropped for the same
/// reason.
pub(crate) fn model_api_request_error(
    err: reqwest::Error,
    api_url: &str,
    timeout_secs: Option<u64>,
) -> anyhow::Error {
    let err = err.without_url();

    if err.is_timeout() || error_chain_has_timeout(&err) {
        return match timeout_secs {
            Some(secs) => anyhow!(
                "request to '{}' timed out after {}s; raise Q_TIMEOUT_SECS or try again",
                api_url,
                secs
            ),
            None => anyhow!("request to '{}' timed out", api_url),
        };
    }

    if err.is_connect() {
        if error_chain_has_connection_refused(&err) {
            return anyhow!("connection refused by '{}'; check Q_BASE_URL", api_url);
        }

        return anyhow!(
            "failed to connect to '{}': {}; check Q_BASE_URL and network connectivity",
            api_url,
            root_cause(&err)
        );
    }

    if err.is_builder() {
        return anyhow!(
            "failed to build request for '{}': {}",
            api_url,
            root_cause(&err)
        );
    }

    anyhow!("failed to call '{}': {}", api_url, root_cause(&err))
}
