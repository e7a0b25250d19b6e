use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    tracing::debug!(path = %canonical.display(), "read input file");
    Ok(value)
}

/// Resolve the path against the working directory and check it is a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcf_core::valuation::ValuationInputs;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_file() {
        let err = read_json::<ValuationInputs>("/nonexistent/inputs.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = std::env::temp_dir();
        let err = read_json::<ValuationInputs>(dir.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Not a file"));
    }

    #[test]
    fn test_reads_valuation_inputs() {
        let path = std::env::temp_dir().join(format!("dcf-inputs-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{"free_cash_flow":"100","growth_rate":"0.05","wacc":"0.10","projection_years":5,"terminal_growth":"0.02"}"#,
        )
        .unwrap();

        let inputs: ValuationInputs = read_json(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(inputs.free_cash_flow, dec!(100));
        assert_eq!(inputs.projection_years, 5);
    }
}
