use serde::{Deserialize, Serialize};

/// A pair flagged by the upstream cointegration screener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePair {
    pub ticker1: String,
    pub ticker2: String,
    /// Engle-Granger p-value (lower = stronger evidence of cointegration)
    pub pvalue: f64,
    /// Engle-Granger test statistic
    pub score: f64,
}

impl CandidatePair {
    /// Identifier of the form `T1-T2`.
    pub fn pair_id(&self) -> String {
        format!("{}-{}", self.ticker1, self.ticker2)
    }
}

/// Candidate with the lowest p-value.
pub fn top_candidate(candidates: &[CandidatePair]) -> Option<&CandidatePair> {
    candidates
        .iter()
        .min_by(|a, b| a.pvalue.total_cmp(&b.pvalue))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(t1: &str, t2: &str, pvalue: f64) -> CandidatePair {
        CandidatePair {
            ticker1: t1.into(),
            ticker2: t2.into(),
            pvalue,
            score: -3.0,
        }
    }

    #[test]
    fn test_top_candidate_lowest_pvalue() {
        let list = vec![cand("A", "B", 0.04), cand("C", "D", 0.001), cand("E", "F", 0.02)];
        let top = top_candidate(&list).unwrap();
        assert_eq!(top.pair_id(), "C-D");
    }

    #[test]
    fn test_top_candidate_empty() {
        assert!(top_candidate(&[]).is_none());
    }
}
