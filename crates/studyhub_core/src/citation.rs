//! Citation formatting.
//!
//! # Responsibility
//! - Render source metadata as APA/MLA/Chicago citation strings.

use chrono::NaiveDate;

/// Supported citation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationStyle {
    Apa7,
    Mla9,
    Chicago,
}

/// Source metadata for one citation.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Book {
        author: String,
        year: String,
        title: String,
        publisher: String,
    },
    JournalArticle {
        author: String,
        year: String,
        title: String,
        journal: String,
        volume: String,
        pages: String,
    },
    Website {
        author: String,
        year: String,
        title: String,
        url: String,
        accessed: NaiveDate,
    },
}

/// Formats one source in the requested style.
pub fn format_citation(style: CitationStyle, source: &Source) -> String {
    match source {
        Source::Book {
            author,
            year,
            title,
            publisher,
        } => match style {
            CitationStyle::Apa7 => format!("{author} ({year}). *{title}*. {publisher}."),
            // MLA 9 and Chicago share the book layout.
            CitationStyle::Mla9 | CitationStyle::Chicago => {
                format!("{author}. *{title}*. {publisher}, {year}.")
            }
        },
        Source::JournalArticle {
            author,
            year,
            title,
            journal,
            volume,
            pages,
        } => match style {
            CitationStyle::Apa7 => {
                format!("{author} ({year}). {title}. *{journal}, {volume}*, {pages}.")
            }
            CitationStyle::Mla9 => format!(
                "{author}. \"{title}.\" *{journal}*, vol. {volume}, {year}, pp. {pages}."
            ),
            CitationStyle::Chicago => {
                format!("{author}. \"{title}.\" *{journal}* {volume} ({year}): {pages}.")
            }
        },
        Source::Website {
            author,
            year,
            title,
            url,
            accessed,
        } => match style {
            CitationStyle::Apa7 => {
                format!("{author} ({year}). *{title}*. Retrieved {accessed}, from {url}")
            }
            CitationStyle::Mla9 => {
                format!("{author}. \"{title}.\" {year}. {url}. Accessed {accessed}.")
            }
            CitationStyle::Chicago => {
                format!("{author}. \"{title}.\" Accessed {accessed}. {url}.")
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{format_citation, CitationStyle, Source};
    use chrono::NaiveDate;

    fn book() -> Source {
        Source::Book {
            author: "Woolf, Virginia".to_string(),
            year: "1929".to_string(),
            title: "A Room of One's Own".to_string(),
            publisher: "Hogarth Press".to_string(),
        }
    }

    #[test]
    fn apa_book_puts_the_year_after_the_author() {
        let citation = format_citation(CitationStyle::Apa7, &book());
        assert_eq!(
            citation,
            "Woolf, Virginia (1929). *A Room of One's Own*. Hogarth Press."
        );
    }

    #[test]
    fn mla_book_puts_the_year_last() {
        let citation = format_citation(CitationStyle::Mla9, &book());
        assert!(citation.ends_with("Hogarth Press, 1929."));
    }

    #[test]
    fn journal_styles_differ_in_volume_notation() {
        let article = Source::JournalArticle {
            author: "Shannon, Claude".to_string(),
            year: "1948".to_string(),
            title: "A Mathematical Theory of Communication".to_string(),
            journal: "Bell System Technical Journal".to_string(),
            volume: "27".to_string(),
            pages: "379-423".to_string(),
        };
        let mla = format_citation(CitationStyle::Mla9, &article);
        assert!(mla.contains("vol. 27"));
        let chicago = format_citation(CitationStyle::Chicago, &article);
        assert!(chicago.contains("27 (1948)"));
    }

    #[test]
    fn website_citations_carry_the_access_date() {
        let site = Source::Website {
            author: "Rust Project".to_string(),
            year: "2024".to_string(),
            title: "The Rust Programming Language".to_string(),
            url: "https://doc.rust-lang.org/book/".to_string(),
            accessed: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        };
        let apa = format_citation(CitationStyle::Apa7, &site);
        assert!(apa.contains("Retrieved 2025-01-15"));
    }
}
