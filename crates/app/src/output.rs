//! Printing results to stdout.

use std::io::Write;

use portal_domain::ApiResponse;
use serde::Serialize;

/// Writes `value` as pretty JSON.
pub fn json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Writes a raw response body, pretty-printed when it is JSON.
pub fn body(out: &mut impl Write, response: &ApiResponse) -> anyhow::Result<()> {
    match serde_json::from_slice::<serde_json::Value>(&response.body) {
        Ok(value) => json(out, &value),
        Err(_) => {
            writeln!(out, "{}", response.text())?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_body_pretty_prints_json() {
        let mut out = Vec::new();
        body(&mut out, &ApiResponse::new(200, r#"{"ok":true}"#)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"ok\": true\n}\n");
    }

    #[test]
    fn test_body_passes_text_through() {
        let mut out = Vec::new();
        body(&mut out, &ApiResponse::new(200, "pong")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "pong\n");
    }
}
