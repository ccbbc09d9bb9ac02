use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{Result, VerimedError};

/// `{{ env.NAME }}` or `{{ env.NAME | default("value") }}`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([\w.]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#)
        .expect("placeholder pattern is valid")
});

/// Substitute environment placeholders in config text
///
/// Comment lines are left alone so commented-out settings may reference
/// variables that are not set.
pub fn expand_env(input: &str) -> Result<String> {
    input.split_inclusive('\n').map(expand_line).collect()
}

fn expand_line(line: &str) -> Result<Cow<'_, str>> {
    if line.trim_start().starts_with('#') {
        return Ok(Cow::Borrowed(line));
    }

    let mut failure = None;
    let expanded = PLACEHOLDER.replace_all(line, |caps: &Captures<'_>| {
        lookup(&caps[1], caps.get(2).map(|m| m.as_str())).unwrap_or_else(|e| {
            failure.get_or_insert(e);
            String::new()
        })
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(expanded),
    }
}

fn lookup(key: &str, fallback: Option<&str>) -> Result<String> {
    let name = key
        .strip_prefix("env.")
        .filter(|name| !name.is_empty() && !name.contains('.'))
        .ok_or_else(|| VerimedError::Config(format!("unsupported placeholder `{key}`, expected `env.NAME`")))?;

    std::env::var(name)
        .ok()
        .or_else(|| fallback.map(str::to_owned))
        .ok_or_else(|| VerimedError::Config(format!("environment variable `{name}` is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "base_url = \"https://api.verimed.app\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_every_placeholder() {
        let vars = [
            ("VERIMED_TEST_URL", Some("https://api.verimed.app")),
            ("VERIMED_TEST_KEY", Some("k-123")),
        ];
        temp_env::with_vars(vars, || {
            let result = expand_env(
                "base_url = \"{{ env.VERIMED_TEST_URL }}\"\napi_key = \"{{env.VERIMED_TEST_KEY}}\"\n",
            )
            .unwrap();
            assert_eq!(
                result,
                "base_url = \"https://api.verimed.app\"\napi_key = \"k-123\"\n"
            );
        });
    }

    #[test]
    fn missing_var_names_the_variable() {
        temp_env::with_var_unset("VERIMED_MISSING", || {
            let err = expand_env("api_key = \"{{ env.VERIMED_MISSING }}\"").unwrap_err();
            assert!(matches!(err, VerimedError::Config(_)));
            assert!(err.to_string().contains("VERIMED_MISSING"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        let line = "timeout_secs = {{ env.VERIMED_TIMEOUT | default(\"30\") }}";

        temp_env::with_var_unset("VERIMED_TIMEOUT", || {
            assert_eq!(expand_env(line).unwrap(), "timeout_secs = 30");
        });
        temp_env::with_var("VERIMED_TIMEOUT", Some("5"), || {
            assert_eq!(expand_env(line).unwrap(), "timeout_secs = 5");
        });
    }

    #[test]
    fn only_env_scope_is_accepted() {
        let err = expand_env("api_key = \"{{ secrets.KEY }}\"").unwrap_err();
        assert!(err.to_string().contains("expected `env.NAME`"));
    }

    #[test]
    fn commented_settings_may_reference_unset_vars() {
        temp_env::with_var_unset("VERIMED_MISSING", || {
            let input = "  # bearer_token = \"{{ env.VERIMED_MISSING }}\"\n";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
