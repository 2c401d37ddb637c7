//! Estimated reading time for a post's content

use super::ContentSection;

/// Average adult reading speed, words per minute
const WORDS_PER_MINUTE: u64 = 200;

/// Estimate the reading time of a post in whole minutes.
///
/// Counts whitespace-delimited words across every section heading and body
/// paragraph, then rounds `total / 200` up. Pure and total: empty content
/// yields 0 minutes.
pub fn estimate_minutes(content: &[ContentSection]) -> u64 {
    let words: u64 = content
        .iter()
        .map(|section| {
            let heading = count_words(&section.heading);
            let body: u64 = section.body.iter().map(|b| count_words(&b.text)).sum();
            heading + body
        })
        .sum();

    words.div_ceil(WORDS_PER_MINUTE)
}

fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BodyText;

    fn section(heading: &str, body: &[&str]) -> ContentSection {
        ContentSection {
            heading: heading.to_string(),
            body: body
                .iter()
                .map(|text| BodyText {
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_five_words_is_one_minute() {
        let content = vec![section("a b", &["c d e"])];
        assert_eq!(estimate_minutes(&content), 1);
    }

    #[test]
    fn test_empty_content_is_zero() {
        assert_eq!(estimate_minutes(&[]), 0);
    }

    #[test]
    fn test_rounds_up_at_boundary() {
        let two_hundred = "word ".repeat(200);
        assert_eq!(estimate_minutes(&[section("", &[&two_hundred])]), 1);

        let two_hundred_one = "word ".repeat(201);
        assert_eq!(estimate_minutes(&[section("", &[&two_hundred_one])]), 2);
    }

    #[test]
    fn test_sums_across_sections() {
        let content = vec![
            section("intro", &["one two three"]),
            section("outro words here", &["four five", "six"]),
        ];
        // 1 + 3 + 3 + 2 + 1 = 10 words
        assert_eq!(estimate_minutes(&content), 1);
    }

    #[test]
    fn test_blank_heading_and_whitespace_only_body() {
        let content = vec![section("", &["   \t  "])];
        assert_eq!(estimate_minutes(&content), 0);
    }
}
