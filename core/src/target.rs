//! Target URL assembly and parsing helpers.

use url::Url;

use crate::error::ConfigError;
use crate::http::Values;

/// Join path segments with `/`.
///
/// A single leading and a single trailing `/` are stripped from each segment
/// first; no separator follows the last segment.
pub fn combine_path_components<S: AsRef<str>>(components: &[S]) -> String {
    components
        .iter()
        .map(|component| {
            let component = component.as_ref();
            let component = component.strip_prefix('/').unwrap_or(component);
            component.strip_suffix('/').unwrap_or(component)
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a raw query string on `&`, then on the first `=`.
///
/// A parameter without `=` maps to an empty value. Keys and values are
/// percent-decoded, `+` decodes to a space.
pub fn parse_query(raw: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Build `scheme://host/path?query` from its parts.
///
/// Query parameters are form-encoded with keys in sorted order, so repeated
/// calls over the same parts produce identical URLs.
pub fn build_url(scheme: &str, host: &str, path: &str, query: &Values) -> Result<Url, ConfigError> {
    let base = format!("{scheme}://{host}");
    let mut url = Url::parse(&base).map_err(|source| ConfigError::InvalidUrl { url: base, source })?;
    url.set_path(path);
    if !query.is_empty() {
        url.set_query(Some(&query.encode()));
    }
    Ok(url)
}

/// Host plus port, when the URL names a non-default port.
pub(crate) fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_strips_one_separator_per_side() {
        assert_eq!(combine_path_components(&["/api/", "/v1/", "users/"]), "api/v1/users");
        assert_eq!(combine_path_components(&["//a//", "b"]), "/a//b");
        assert_eq!(combine_path_components::<&str>(&[]), "");
    }

    #[test]
    fn bare_key_maps_to_empty_value() {
        assert_eq!(
            parse_query("a&b=2"),
            vec![("a".to_string(), String::new()), ("b".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn query_splits_on_first_equals_and_decodes() {
        assert_eq!(
            parse_query("expr=a%3Db=c&name=hello+world&&"),
            vec![
                ("expr".to_string(), "a=b=c".to_string()),
                ("name".to_string(), "hello world".to_string()),
            ]
        );
    }

    #[test]
    fn bare_keys_survive_anywhere_in_the_query() {
        assert_eq!(
            parse_query("first&x=1&last"),
            vec![
                ("first".to_string(), String::new()),
                ("x".to_string(), "1".to_string()),
                ("last".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn build_url_is_idempotent() {
        let query: Values = [("z", "1"), ("a", "x y")].into_iter().collect();
        let first = build_url("https", "example.com:8443", "/search", &query).unwrap();
        let second = build_url("https", "example.com:8443", "/search", &query).unwrap();
        assert_eq!(first.as_str(), "https://example.com:8443/search?a=x+y&z=1");
        assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn build_url_adds_leading_slash() {
        let url = build_url("http", "localhost", "orders", &Values::new()).unwrap();
        assert_eq!(url.as_str(), "http://localhost/orders");
    }

    #[test]
    fn empty_host_is_a_config_error() {
        let err = build_url("http", "", "/", &Values::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn host_with_port_omits_default_port() {
        let url = Url::parse("http://example.com:80/x").unwrap();
        assert_eq!(host_with_port(&url), "example.com");
        let url = Url::parse("http://example.com:8080/x").unwrap();
        assert_eq!(host_with_port(&url), "example.com:8080");
    }
}
