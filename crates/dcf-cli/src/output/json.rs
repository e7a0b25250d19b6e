use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_json(value, stdout.lock()) {
        eprintln!("JSON serialization error: {}", e);
    }
}

fn write_json<W: Write>(value: &Value, mut out: W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_with_trailing_newline() {
        let mut buf = Vec::new();
        write_json(&json!({ "result": { "intrinsic_value": "1446.21" } }), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\n  \"result\": {"));
        assert!(text.ends_with("}\n"));
    }
}
