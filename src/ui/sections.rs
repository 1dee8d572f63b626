//! Split a finished analysis reply on the contract section headers
//!
//! Headers are matched as whole lines (surrounding whitespace ignored). Text
//! before the first header is kept as the preamble. Missing sections are
//! simply absent.

use crate::llm::contracts::SECTION_HEADERS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: &'static str,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisSections {
    pub preamble: String,
    pub sections: Vec<Section>,
}

impl AnalysisSections {
    pub fn get(&self, header: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.header == header)
    }

    /// True when every contract header was found
    pub fn is_complete(&self) -> bool {
        SECTION_HEADERS.iter().all(|h| self.get(h).is_some())
    }
}

fn header_of(line: &str) -> Option<&'static str> {
    let line = line.trim();
    SECTION_HEADERS.iter().copied().find(|h| *h == line)
}

pub fn split_sections(reply: &str) -> AnalysisSections {
    let mut out = AnalysisSections::default();
    let mut current: Option<Section> = None;
    let mut preamble = Vec::new();

    for line in reply.lines() {
        if let Some(header) = header_of(line) {
            if let Some(done) = current.take() {
                out.sections.push(done);
            }
            current = Some(Section {
                header,
                body: String::new(),
            });
            continue;
        }
        match current.as_mut() {
            Some(section) => {
                section.body.push_str(line);
                section.body.push('\n');
            }
            None => preamble.push(line),
        }
    }
    if let Some(done) = current {
        out.sections.push(done);
    }

    for section in &mut out.sections {
        section.body = section.body.trim().to_string();
    }
    out.preamble = preamble.join("\n").trim().to_string();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::contracts::{SECTION_CAUTIONS, SECTION_PATTERN_ANALYSIS, SECTION_RECOMMENDATIONS};

    #[test]
    fn test_splits_all_three_sections() {
        let reply = format!(
            "根据您的描述：\n\n{}\n气虚证\n\n{}\n### 1. 饮食调理\n多吃山药\n{}\n及时就医\n",
            SECTION_PATTERN_ANALYSIS, SECTION_RECOMMENDATIONS, SECTION_CAUTIONS
        );
        let parsed = split_sections(&reply);

        assert_eq!(parsed.preamble, "根据您的描述：");
        assert!(parsed.is_complete());
        assert_eq!(parsed.get(SECTION_PATTERN_ANALYSIS).unwrap().body, "气虚证");
        assert_eq!(
            parsed.get(SECTION_RECOMMENDATIONS).unwrap().body,
            "### 1. 饮食调理\n多吃山药"
        );
        assert_eq!(parsed.get(SECTION_CAUTIONS).unwrap().body, "及时就医");
    }

    #[test]
    fn test_missing_sections_absent() {
        let reply = format!("{}\n只有分析", SECTION_PATTERN_ANALYSIS);
        let parsed = split_sections(&reply);
        assert_eq!(parsed.sections.len(), 1);
        assert!(!parsed.is_complete());
        assert!(parsed.get(SECTION_CAUTIONS).is_none());
    }

    #[test]
    fn test_header_inside_text_not_split() {
        let reply = format!("请参考 {} 部分", SECTION_CAUTIONS);
        let parsed = split_sections(&reply);
        assert!(parsed.sections.is_empty());
        assert_eq!(parsed.preamble, reply);
    }
}
