use chrono::{DateTime, Utc};
use common::config::{KeywordWeight, SentimentConfig};
use common::models::{Headline, HeadlineContribution, SentimentLabel, SentimentResult};
use tracing::debug;

const TITLE_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone)]
struct Keyword {
    needle: String,
    label: String,
    weight: f64,
}

fn compile(table: &[KeywordWeight], marker: char) -> Vec<Keyword> {
    table
        .iter()
        .map(|k| Keyword {
            needle: k.keyword.to_lowercase(),
            label: format!("{}{}", marker, k.keyword),
            weight: k.weight,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SentimentScorer {
    bullish: Vec<Keyword>,
    bearish: Vec<Keyword>,
    amplifiers: Vec<Keyword>,
    freshness_hours: f64,
    decay_per_hour: f64,
    normalization: f64,
    top_n: usize,
}

impl SentimentScorer {
    pub fn new(config: &SentimentConfig) -> Self {
        Self {
            bullish: compile(&config.bullish, '+'),
            bearish: compile(&config.bearish, '-'),
            amplifiers: compile(&config.amplifiers, '*'),
            freshness_hours: config.freshness_hours,
            decay_per_hour: config.decay_per_hour,
            normalization: config.normalization,
            top_n: config.top_n,
        }
    }

    /// 1.0 inside the freshness window, then linear decay floored at 0.
    pub fn decay_factor(&self, age_hours: f64) -> f64 {
        if age_hours <= self.freshness_hours {
            return 1.0;
        }
        let excess = age_hours - self.freshness_hours;
        (1.0 - excess * self.decay_per_hour).max(0.0)
    }

    pub fn score(&self, headlines: &[Headline], as_of: DateTime<Utc>) -> SentimentResult {
        if headlines.is_empty() {
            return SentimentResult::no_data(0);
        }

        let mut total_score = 0.0;
        let mut total_decay = 0.0;
        let mut contributions = Vec::new();

        for headline in headlines {
            let text = headline.text.to_lowercase();
            let age_hours = headline.age_hours(as_of);
            let decay = self.decay_factor(age_hours);

            let mut raw = 0.0;
            let mut keywords = Vec::new();
            for keyword in self.bullish.iter().chain(self.bearish.iter()) {
                if text.contains(&keyword.needle) {
                    raw += keyword.weight;
                    keywords.push(keyword.label.clone());
                }
            }

            // strongest amplifier wins, they never stack
            let mut multiplier: f64 = 1.0;
            for amplifier in &self.amplifiers {
                if text.contains(&amplifier.needle) {
                    multiplier = multiplier.max(amplifier.weight);
                    keywords.push(amplifier.label.clone());
                }
            }

            let weighted = raw * multiplier * decay;
            total_score += weighted;
            total_decay += decay;

            if !keywords.is_empty() {
                contributions.push(HeadlineContribution {
                    title: headline.text.clone(),
                    source: headline.source.clone(),
                    keywords,
                    weighted,
                    age_hours,
                });
            }
        }

        if total_decay <= 0.0 {
            debug!("All {} headlines fully decayed", headlines.len());
            return SentimentResult::no_data(headlines.len());
        }

        let score = (total_score / (total_decay * self.normalization)).clamp(-1.0, 1.0);

        // sort_by is stable: equal weights keep feed order
        contributions.sort_by(|a, b| b.weighted.abs().total_cmp(&a.weighted.abs()));
        contributions.truncate(self.top_n);

        let label = SentimentLabel::from_score(score);
        let summary = summarize(label, &contributions);
        debug!(
            "Sentiment {:+.3} ({}) from {} headlines",
            score,
            label,
            headlines.len()
        );

        SentimentResult {
            score,
            label,
            headline_count: headlines.len(),
            contributions,
            summary,
        }
    }
}

fn summarize(label: SentimentLabel, contributions: &[HeadlineContribution]) -> String {
    let mut lines = vec![label.to_string()];
    for c in contributions {
        lines.push(format!(
            "  - {} ({}) [{}]",
            preview(&c.title),
            format_age(c.age_hours),
            c.keywords.join(" ")
        ));
    }
    lines.join("\n")
}

fn preview(title: &str) -> String {
    if title.chars().count() <= TITLE_PREVIEW_CHARS {
        return title.to_string();
    }
    let cut: String = title.chars().take(TITLE_PREVIEW_CHARS).collect();
    format!("{}...", cut)
}

pub fn format_age(age_hours: f64) -> String {
    let hours = age_hours.max(0.0);
    if hours < 1.0 {
        format!("{} minutes ago", (hours * 60.0) as i64)
    } else if hours < 24.0 {
        format!("{} hours ago", hours as i64)
    } else {
        format!("{} days ago", (hours / 24.0) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{epoch, headline};
    use chrono::Duration;
    use proptest::prelude::*;

    fn scorer() -> SentimentScorer {
        SentimentScorer::new(&SentimentConfig::default())
    }

    #[test]
    fn empty_feed_is_exactly_neutral() {
        let result = scorer().score(&[], epoch());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::NoData);
        assert!(result.summary.contains("no news data"));
        assert!(result.contributions.is_empty());
    }

    #[test]
    fn decay_edges() {
        let s = scorer();
        assert_eq!(s.decay_factor(0.0), 1.0);
        assert_eq!(s.decay_factor(24.0), 1.0);
        assert!((s.decay_factor(34.0) - 0.5).abs() < 1e-12);
        assert_eq!(s.decay_factor(44.0), 0.0);
        assert_eq!(s.decay_factor(100.0), 0.0);
    }

    #[test]
    fn headline_ages_feed_decay() {
        let as_of = epoch();
        let s = scorer();
        let fresh = headline("x", 24, as_of);
        let stale = headline("x", 44, as_of);
        assert_eq!(s.decay_factor(fresh.age_hours(as_of)), 1.0);
        assert_eq!(s.decay_factor(stale.age_hours(as_of)), 0.0);
    }

    #[test]
    fn fully_decayed_feed_reports_no_data() {
        let as_of = epoch();
        let feed = vec![headline("ETF approved after rally", 60, as_of)];
        let result = scorer().score(&feed, as_of);

        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::NoData);
        assert_eq!(result.headline_count, 1);
    }

    #[test]
    fn amplifiers_take_the_maximum() {
        let as_of = epoch();
        // bullish: 2 ("bullish"); amplifiers: trump 1.5, fed 2.0 -> 2.0
        let feed = vec![headline("Trump and the Fed turn bullish", 1, as_of)];
        let result = scorer().score(&feed, as_of);

        let c = &result.contributions[0];
        assert_eq!(c.weighted, 4.0);
        assert!(c.keywords.contains(&"*trump".to_string()));
        assert!(c.keywords.contains(&"*fed".to_string()));
        // 4 / (1 * 5)
        assert!((result.score - 0.8).abs() < 1e-12);
        assert_eq!(result.label, SentimentLabel::StronglyBullish);
    }

    #[test]
    fn unmatched_headlines_still_dilute_the_score() {
        let as_of = epoch();
        let feed = vec![
            headline("Markets crash as selling accelerates", 2, as_of),
            headline("Exchange lists new token pair", 3, as_of),
        ];
        let result = scorer().score(&feed, as_of);

        // crash -2, selling -2 => -4 over decay sum 2 => -4 / 10
        assert!((result.score + 0.4).abs() < 1e-12);
        assert_eq!(result.contributions.len(), 1);
        assert_eq!(result.label, SentimentLabel::Bearish);
    }

    #[test]
    fn ranking_is_by_magnitude_and_stable() {
        let as_of = epoch();
        let feed = vec![
            headline("analysts optimistic", 1, as_of),   // +1
            headline("regulators ban exchange", 1, as_of), // -3
            headline("positive outlook", 1, as_of),     // +1
            headline("breakout confirmed", 1, as_of),   // +1
        ];
        let result = scorer().score(&feed, as_of);
        let titles: Vec<&str> = result.contributions.iter().map(|c| c.title.as_str()).collect();

        assert_eq!(
            titles,
            vec!["regulators ban exchange", "analysts optimistic", "positive outlook"]
        );
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let as_of = epoch();
        let feed = vec![headline("RATE CUT expected; Holders cheer", 0, as_of)];
        let result = scorer().score(&feed, as_of);
        let keywords = &result.contributions[0].keywords;

        assert!(keywords.contains(&"+rate cut".to_string()));
        assert!(keywords.contains(&"+hold".to_string()));
    }

    #[test]
    fn summary_truncates_long_titles() {
        let as_of = epoch();
        let long = "Bullish ".repeat(10);
        let result = scorer().score(&[headline(&long, 3, as_of)], as_of);

        assert!(result.summary.contains("..."));
        assert!(result.summary.contains("3 hours ago"));
    }

    #[test]
    fn ages_format_by_magnitude() {
        assert_eq!(format_age(0.5), "30 minutes ago");
        assert_eq!(format_age(5.2), "5 hours ago");
        assert_eq!(format_age(50.0), "2 days ago");
        assert_eq!(format_age(-1.0), "0 minutes ago");
    }

    proptest! {
        #[test]
        fn score_is_always_clamped(
            picks in proptest::collection::vec((0usize..8, 0i64..96), 0..20)
        ) {
            let words = [
                "rate cut", "ban", "liquidation", "bullish",
                "trump fed crash", "etf approved rally", "hold", "nothing",
            ];
            let as_of = epoch();
            let feed: Vec<Headline> = picks
                .iter()
                .map(|(w, age)| Headline::new(words[*w], as_of - Duration::hours(*age), "p"))
                .collect();

            let result = scorer().score(&feed, as_of);
            prop_assert!((-1.0..=1.0).contains(&result.score));
            prop_assert!(result.contributions.len() <= 3);
        }
    }
}
