use arxcon_core::PaperMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One search hit from the arXiv API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivPaper {
    /// Abstract page URL, e.g. `http://arxiv.org/abs/2401.01234v2`
    pub entry_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: DateTime<Utc>,
    pub summary: String,
    pub pdf_url: String,
}

impl ArxivPaper {
    /// `http://arxiv.org/abs/2401.01234v2` becomes `2401_01234v2.pdf`
    pub fn file_name(&self) -> String {
        let last = self
            .entry_id
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.entry_id);
        format!("{}.pdf", last.replace('.', "_"))
    }

    /// File name without the `.pdf` suffix; used to name tools and index dirs
    pub fn paper_name(&self) -> String {
        paper_name_of(&self.file_name())
    }

    pub fn metadata(&self) -> PaperMetadata {
        PaperMetadata {
            title: self.title.clone(),
            authors: self.authors.join(", "),
            published: self.published.format("%m/%d/%Y").to_string(),
            url: self.entry_id.clone(),
            summary: self.summary.clone(),
        }
    }
}

pub fn paper_name_of(file_name: &str) -> String {
    file_name
        .strip_suffix(".pdf")
        .unwrap_or(file_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn paper(entry_id: &str) -> ArxivPaper {
        ArxivPaper {
            entry_id: entry_id.to_string(),
            title: "Mamba".to_string(),
            authors: vec!["Albert Gu".to_string(), "Tri Dao".to_string()],
            published: Utc.with_ymd_and_hms(2023, 12, 1, 18, 0, 0).unwrap(),
            summary: "Selective state spaces.".to_string(),
            pdf_url: String::new(),
        }
    }

    #[test]
    fn file_and_paper_names() {
        let p = paper("http://arxiv.org/abs/2312.00752v1");
        assert_eq!(p.file_name(), "2312_00752v1.pdf");
        assert_eq!(p.paper_name(), "2312_00752v1");

        let old_style = paper("http://arxiv.org/abs/hep-th/9901001v1");
        assert_eq!(old_style.file_name(), "9901001v1.pdf");
    }

    #[test]
    fn metadata_formatting() {
        let meta = paper("http://arxiv.org/abs/2312.00752v1").metadata();
        assert_eq!(meta.authors, "Albert Gu, Tri Dao");
        assert_eq!(meta.published, "12/01/2023");
        assert_eq!(meta.url, "http://arxiv.org/abs/2312.00752v1");
    }
}
