use clap::Args;
use serde_json::Value;

use pairs_lab_core::stats;

use crate::input;

/// Arguments for the half-life estimator
#[derive(Args)]
pub struct HalfLifeArgs {
    /// JSON file holding an array of spread values (null for gaps)
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated spread values, e.g. 0.4,-0.1,0.2
    #[arg(long, allow_hyphen_values = true)]
    pub spread: Option<String>,
}

pub fn run_half_life(args: HalfLifeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let spread: Vec<f64> = if let Some(ref raw) = args.spread {
        parse_spread(raw)?
    } else if let Some(ref path) = args.input {
        undefined_as_nan(input::file::read_json(path)?)
    } else if let Some(data) = input::stdin::read_stdin_json()? {
        undefined_as_nan(data)
    } else {
        return Err("--spread <v1,v2,...>, --input <file.json> or stdin required".into());
    };
    let result = stats::estimate_half_life(&spread);
    Ok(serde_json::to_value(result)?)
}

/// JSON `null` entries are undefined observations; the estimator drops them.
fn undefined_as_nan(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

fn parse_spread(raw: &str) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("invalid spread value '{}'", s).into())
        })
        .collect::<Result<Vec<f64>, Box<dyn std::error::Error>>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spread() {
        assert_eq!(parse_spread("1, -0.5,2,").unwrap(), vec![1.0, -0.5, 2.0]);
        assert!(parse_spread("1,x").is_err());
    }

    #[test]
    fn test_half_life_from_flag() {
        let args = HalfLifeArgs {
            input: None,
            spread: Some("1,-1,1,-1,1,-1,1,-1".into()),
        };
        let v = run_half_life(args).unwrap();
        let hl = v["result"]["half_life"].as_f64().unwrap();
        assert!(hl > 0.0 && hl < 1.0);
    }
}
