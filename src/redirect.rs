//! Redirect-safety validation for the `next` login parameter.

use url::Url;

/// Validate a candidate post-login redirect target.
///
/// Returns the target unchanged when it is safe to redirect to, `None`
/// otherwise. Safe means either a host-relative path, or an absolute
/// `http`/`https` URL pointing at `public_url`'s own origin. Anything else
/// (foreign hosts, other schemes, protocol-relative or malformed input) is
/// rejected so it never reaches a `Location` header.
pub fn safe_redirect_target(raw: &str, public_url: Option<&str>) -> Option<String> {
    let candidate = raw.trim();
    if candidate.is_empty() || candidate.contains('\\') || candidate.starts_with("///") {
        return None;
    }

    match Url::parse(candidate) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                return None;
            }
            // Absolute URLs are only allowed back to our own origin.
            let base = Url::parse(public_url?).ok()?;
            if url.scheme() == base.scheme()
                && url.host_str() == base.host_str()
                && url.port_or_known_default() == base.port_or_known_default()
            {
                Some(candidate.to_string())
            } else {
                None
            }
        }
        // No scheme: a plain path is fine, a protocol-relative URL is not.
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if candidate.starts_with('/') && !candidate.starts_with("//") {
                Some(candidate.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_URL: Option<&str> = Some("https://atrium.example.com");

    #[test]
    fn accepts_host_relative_paths() {
        assert_eq!(
            safe_redirect_target("/dashboard/list", PUBLIC_URL).as_deref(),
            Some("/dashboard/list")
        );
        assert_eq!(
            safe_redirect_target("/billing?tab=open", PUBLIC_URL).as_deref(),
            Some("/billing?tab=open")
        );
    }

    #[test]
    fn accepts_absolute_urls_to_own_origin_only() {
        assert_eq!(
            safe_redirect_target("https://atrium.example.com/reports", PUBLIC_URL).as_deref(),
            Some("https://atrium.example.com/reports")
        );
        // Same host, wrong scheme counts as a different origin.
        assert_eq!(
            safe_redirect_target("http://atrium.example.com/reports", PUBLIC_URL),
            None
        );
    }

    #[test]
    fn rejects_foreign_hosts() {
        assert_eq!(
            safe_redirect_target("http://evil.example.com/x", PUBLIC_URL),
            None
        );
        assert_eq!(
            safe_redirect_target("https://evil.example.com/x", PUBLIC_URL),
            None
        );
    }

    #[test]
    fn rejects_absolute_urls_when_no_public_url_is_configured() {
        assert_eq!(
            safe_redirect_target("https://atrium.example.com/reports", None),
            None
        );
        // Relative targets need no origin to compare against.
        assert_eq!(
            safe_redirect_target("/dashboard/list", None).as_deref(),
            Some("/dashboard/list")
        );
    }

    #[test]
    fn rejects_protocol_relative_and_scheme_tricks() {
        assert_eq!(safe_redirect_target("//evil.example.com/x", PUBLIC_URL), None);
        assert_eq!(safe_redirect_target("///evil.example.com", PUBLIC_URL), None);
        assert_eq!(
            safe_redirect_target("javascript:alert(1)", PUBLIC_URL),
            None
        );
        assert_eq!(
            safe_redirect_target("data:text/html,hello", PUBLIC_URL),
            None
        );
    }

    #[test]
    fn rejects_empty_and_backslash_targets() {
        assert_eq!(safe_redirect_target("", PUBLIC_URL), None);
        assert_eq!(safe_redirect_target("   ", PUBLIC_URL), None);
        assert_eq!(
            safe_redirect_target("/\\evil.example.com", PUBLIC_URL),
            None
        );
    }
}
