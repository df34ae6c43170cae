use pairs_lab_core::data::CandidatePair;

use super::file::resolve_path;

/// Load the screener output (`ticker1,ticker2,pvalue,score`).
pub fn load_candidates_csv(path: &str) -> Result<Vec<CandidatePair>, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let mut rdr = csv::Reader::from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let mut out = Vec::new();
    for (i, row) in rdr.deserialize::<CandidatePair>().enumerate() {
        let cand = row.map_err(|e| {
            format!("Failed to parse '{}' row {}: {}", canonical.display(), i + 1, e)
        })?;
        out.push(cand);
    }
    Ok(out)
}
