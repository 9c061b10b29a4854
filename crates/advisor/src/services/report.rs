use chrono::{DateTime, Utc};
use common::models::{Abstention, AnalysisOutcome, Direction, Recommendation, TradingPair};

const RULE: &str = "======================================================================";

/// `1234567.891` -> `1,234,567.89`
pub fn money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Long => "LONG",
        Direction::Short => "SHORT",
    }
}

fn header(pair: &TradingPair, capital: f64, as_of: DateTime<Utc>) -> Vec<String> {
    vec![
        RULE.to_string(),
        format!("Strategy analysis: {}", pair),
        format!("Capital: ${} {}", money(capital), pair.quote),
        format!("As of: {}", as_of.format("%Y-%m-%d %H:%M:%S UTC")),
        RULE.to_string(),
    ]
}

pub fn render_recommendation(rec: &Recommendation, pair: &TradingPair, capital: f64) -> String {
    let pos = &rec.position;
    let mut lines = header(pair, capital, rec.generated_at);

    lines.push(format!("Direction:     {}", direction_label(rec.direction)));
    lines.push(format!("Entry:         ${} (limit)", money(rec.entry_price)));
    lines.push(format!("Current price: ${}", money(rec.current_price)));
    lines.push(format!("Stop loss:     ${}", money(rec.stop_loss)));
    lines.push(format!("Take profit 1: ${} (close 50%)", money(rec.take_profit_1)));
    lines.push(format!("Take profit 2: ${} (trail the rest)", money(rec.take_profit_2)));
    lines.push(String::new());
    lines.push("Position".to_string());
    lines.push(format!(
        "  - ratio:    {:.2}% (news adjustment {:+.1}%)",
        pos.position_ratio * 100.0,
        pos.sentiment_adjustment_pct
    ));
    lines.push(format!("  - value:    ${} {}", money(pos.position_value), pair.quote));
    lines.push(format!("  - quantity: {:.6} {}", pos.coin_amount, pair.base));
    lines.push(format!("  - max loss: ${}", money(pos.max_loss_usd)));
    lines.push(String::new());
    lines.push(format!(
        "Scores: technical {:.2}, sentiment {:+.2}, composite {:.2}",
        rec.technical_score, rec.sentiment_score, rec.composite_score
    ));
    lines.push("Rationale".to_string());
    for (i, reason) in rec.rationale.iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, reason));
    }
    lines.push(RULE.to_string());
    lines.push("Use limit orders only. Cancel if unfilled within 4 hours.".to_string());
    lines.push("Exit at the stop. After take profit 1, move the stop to entry.".to_string());
    lines.push(RULE.to_string());

    lines.join("\n")
}

pub fn render_abstention(
    abstention: &Abstention,
    pair: &TradingPair,
    capital: f64,
    as_of: DateTime<Utc>,
) -> String {
    let mut lines = header(pair, capital, as_of);
    lines.push(format!("No trade: {} at {}", abstention.kind, abstention.stage));
    for reason in &abstention.reasons {
        lines.push(format!("  - {}", reason));
    }
    lines.push("Stay on the sidelines and re-check later.".to_string());
    lines.push(RULE.to_string());
    lines.join("\n")
}

pub fn render(
    outcome: &AnalysisOutcome,
    pair: &TradingPair,
    capital: f64,
    as_of: DateTime<Utc>,
) -> String {
    match outcome {
        AnalysisOutcome::Recommend(rec) => render_recommendation(rec, pair, capital),
        AnalysisOutcome::Abstain(abstention) => render_abstention(abstention, pair, capital, as_of),
    }
}
