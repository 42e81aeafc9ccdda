//! Parsing of the EDGAR company submissions payload.

use crate::edgar::tickers::cik_without_zeros;
use crate::models::{FilingMeta, FilingQuery};
use serde::Deserialize;

/// Company submissions JSON (`/submissions/CIK##########.json`).
///
/// Only the `filings.recent` columns we need are deserialized.
#[derive(Debug, Default, Deserialize)]
pub struct Submissions {
    #[serde(default)]
    pub filings: Filings,
}

#[derive(Debug, Default, Deserialize)]
pub struct Filings {
    #[serde(default)]
    pub recent: RecentFilings,
}

/// Column-oriented listing of recent filings, newest first.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub report_date: Vec<String>,
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub primary_document: Vec<String>,
}

fn column(values: &[String], i: usize) -> Option<String> {
    values.get(i).filter(|v| !v.is_empty()).cloned()
}

/// Filing index page for an accession.
pub fn filing_detail_url(archives_base: &str, cik: &str, accession_number: &str) -> String {
    format!(
        "{}/{}/{}/index.html",
        archives_base.trim_end_matches('/'),
        cik_without_zeros(cik),
        accession_number.replace('-', "")
    )
}

impl RecentFilings {
    /// Pick the newest filing accepted by `query`.
    pub fn latest(
        &self,
        query: &FilingQuery,
        ticker: &str,
        cik: &str,
        archives_base: &str,
    ) -> Option<FilingMeta> {
        self.form.iter().enumerate().find_map(|(i, form)| {
            let filing_date = column(&self.filing_date, i);
            if !query.accepts(form, filing_date.as_deref()) {
                return None;
            }

            let accession_number = column(&self.accession_number, i)?;
            Some(FilingMeta {
                ticker: ticker.to_string(),
                cik: cik.to_string(),
                form: form.clone(),
                filing_date,
                report_date: column(&self.report_date, i),
                filing_detail_url: filing_detail_url(archives_base, cik, &accession_number),
                accession_number,
                primary_document: column(&self.primary_document, i),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const ARCHIVES: &str = "https://www.sec.gov/Archives/edgar/data";

    fn sample() -> Submissions {
        serde_json::from_str(
            r#"{
                "cik": "320193",
                "name": "Apple Inc.",
                "filings": {
                    "recent": {
                        "form": ["8-K", "10-Q", "10-K"],
                        "filingDate": ["2024-11-20", "2024-08-02", "2023-11-03"],
                        "reportDate": ["2024-11-19", "2024-06-29"],
                        "accessionNumber": ["0000320193-24-000130", "0000320193-24-000081", "0000320193-23-000106"],
                        "primaryDocument": ["a8k.htm", "aapl-20240629.htm", "aapl-20230930.htm"]
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_latest_skips_other_forms() {
        let subs = sample();
        let meta = subs
            .filings
            .recent
            .latest(&FilingQuery::default(), "AAPL", "0000320193", ARCHIVES)
            .unwrap();

        assert_eq!(meta.form, "10-Q");
        assert_eq!(meta.accession_number, "0000320193-24-000081");
        assert_eq!(meta.primary_document.as_deref(), Some("aapl-20240629.htm"));
        assert_eq!(meta.report_date.as_deref(), Some("2024-06-29"));
        assert_eq!(
            meta.filing_detail_url,
            "https://www.sec.gov/Archives/edgar/data/320193/000032019324000081/index.html"
        );
    }

    #[test]
    fn test_latest_handles_short_columns() {
        let subs = sample();
        let query = FilingQuery {
            forms: vec!["10-K".to_string()],
            ..FilingQuery::default()
        };
        let meta = subs
            .filings
            .recent
            .latest(&query, "AAPL", "0000320193", ARCHIVES)
            .unwrap();

        assert_eq!(meta.form, "10-K");
        assert_eq!(meta.report_date, None);
    }

    #[test]
    fn test_latest_respects_date_range() {
        let subs = sample();
        let query = FilingQuery {
            to: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..FilingQuery::default()
        };
        let meta = subs
            .filings
            .recent
            .latest(&query, "AAPL", "0000320193", ARCHIVES)
            .unwrap();
        assert_eq!(meta.accession_number, "0000320193-23-000106");
    }

    #[test]
    fn test_latest_none_when_no_match() {
        let subs: Submissions = serde_json::from_str("{}").unwrap();
        assert!(subs
            .filings
            .recent
            .latest(&FilingQuery::default(), "X", "0000000001", ARCHIVES)
            .is_none());
    }
}
