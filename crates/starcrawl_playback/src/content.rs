// SPDX-License-Identifier: MIT OR Apache-2.0
//! Crawl content.
//!
//! The engine never renders text; it only needs to know when the content
//! changes so playback can restart from the beginning.

use serde::{Deserialize, Serialize};

/// Text shown by one crawl
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrawlContent {
    /// Caption shown in the opening phase
    pub opening_text: String,
    /// Title shown in the logo phase
    pub logo_text: String,
    /// Episode number heading the crawl
    pub episode_number: String,
    /// Episode title heading the crawl
    pub episode_subtitle: String,
    /// Body of the crawl
    pub crawl_text: String,
}

impl CrawlContent {
    /// Whether every field is blank
    pub fn is_empty(&self) -> bool {
        [
            &self.opening_text,
            &self.logo_text,
            &self.episode_number,
            &self.episode_subtitle,
            &self.crawl_text,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }

    /// Plain-text rendition of the whole crawl, in playback order
    pub fn transcript(&self) -> String {
        let mut parts = Vec::new();
        if !self.opening_text.is_empty() {
            parts.push(self.opening_text.clone());
        }
        if !self.logo_text.is_empty() {
            parts.push(format!("\n{}\n", self.logo_text));
        }

        let mut episode = Vec::new();
        if !self.episode_number.is_empty() {
            episode.push(format!("EPISODE {}", self.episode_number));
        }
        if !self.episode_subtitle.is_empty() {
            episode.push(self.episode_subtitle.clone());
        }
        if !episode.is_empty() {
            parts.push(format!("\n{}\n", episode.join("\n")));
        }

        if !self.crawl_text.is_empty() {
            parts.push(self.crawl_text.clone());
        }
        parts.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CrawlContent {
        CrawlContent {
            opening_text: "A long time ago...".to_string(),
            logo_text: "STAR CRAWL".to_string(),
            episode_number: "IV".to_string(),
            episode_subtitle: "A NEW BUILD".to_string(),
            crawl_text: "It is a period of refactoring.".to_string(),
        }
    }

    #[test]
    fn test_transcript_order() {
        let text = sample().transcript();
        assert_eq!(
            text,
            "A long time ago...\n\n\nSTAR CRAWL\n\n\n\nEPISODE IV\nA NEW BUILD\n\n\nIt is a period of refactoring."
        );
    }

    #[test]
    fn test_equality_is_by_value() {
        let a = sample();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.crawl_text.push('!');
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty() {
        assert!(CrawlContent::default().is_empty());
        assert!(!sample().is_empty());
    }
}
