//! Page-context probe scripts.
//!
//! All scripts are self-contained expressions. String literals embedded in
//! generated scripts go through `serde_json::to_string` so selectors cannot
//! break out of their quoting.

use pagesync_core_types::Locator;

use crate::detector::ReadinessScope;

pub const DOCUMENT_READY_STATE: &str = "return document.readyState;";

/// True when no jQuery global exists or its request counter is drained.
pub const LEGACY_AJAX_IDLE: &str =
    "return (typeof jQuery === 'undefined') || jQuery.active === 0;";

/// True when no Angular injector exists or its pending HTTP queue is empty.
/// Pages that ship a partial Angular bundle throw on injector access; that
/// counts as absent.
pub const FRAMEWORK_DIGEST_IDLE: &str = r#"return (function() {
    if (typeof angular === 'undefined') { return true; }
    try {
        var injector = angular.element(document).injector();
        if (!injector) { return true; }
        return injector.get('$http').pendingRequests.length === 0;
    } catch (e) {
        return true;
    }
})();"#;

/// Milliseconds since the last observed DOM mutation, or null when the
/// probe is not installed.
pub const MUTATION_AGE: &str =
    "return window.__pagesyncProbe ? (Date.now() - window.__pagesyncProbe.lastMutation) : null;";

/// Denied fetch responses recorded by the probe, oldest first.
pub const DENIED_RESPONSES: &str =
    "return window.__pagesyncProbe ? window.__pagesyncProbe.denied : [];";

/// One-time instrumentation: a mutation observer stamping the last DOM
/// change under the scope root, and a fetch wrapper recording denied
/// responses (401/403) for later diagnostics. Guarded so re-evaluation on
/// the same page is a no-op; returns false when the scope root does not
/// resolve yet.
pub fn install_probe(scope: &ReadinessScope) -> String {
    format!(
        r#"return (function() {{
    if (window.__pagesyncProbe) {{ return true; }}
    var root = {root};
    if (!root) {{ return false; }}
    var probe = {{ lastMutation: Date.now(), denied: [] }};
    new MutationObserver(function() {{ probe.lastMutation = Date.now(); }})
        .observe(root, {{ subtree: true, childList: true, attributes: true, characterData: true }});
    if (window.fetch) {{
        var nativeFetch = window.fetch;
        window.fetch = function() {{
            return nativeFetch.apply(this, arguments).then(function(response) {{
                if (response.status === 403 || response.status === 401) {{
                    probe.denied.push({{ url: response.url, status: response.status, at: Date.now() }});
                }}
                return response;
            }});
        }};
    }}
    window.__pagesyncProbe = probe;
    return true;
}})();"#,
        root = scope_root_snippet(scope),
    )
}

fn scope_root_snippet(scope: &ReadinessScope) -> String {
    match scope {
        ReadinessScope::Document => "document.documentElement".to_string(),
        ReadinessScope::Under(Locator::Css(selector)) => {
            let literal =
                serde_json::to_string(selector).unwrap_or_else(|_| "''".to_string());
            format!("document.querySelector({literal})")
        }
        ReadinessScope::Under(Locator::XPath(path)) => {
            let literal = serde_json::to_string(path).unwrap_or_else(|_| "''".to_string());
            format!(
                "document.evaluate({literal}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
            )
        }
    }
}
