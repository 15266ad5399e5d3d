//! Cron expression parser tool definition.
//!
//! Accepts classic 5-field expressions (minute first, day of week 0-7 with
//! 0 and 7 meaning Sunday), 6/7-field expressions with leading seconds and
//! trailing year, and `@daily`-style shortcuts. When both day of month and
//! day of week are restricted, a day matching either one fires.

use chrono::{DateTime, SecondsFormat, Utc};
use cron::Schedule;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domains::tools::ToolError;
use crate::domains::tools::definitions::common::TransformTool;

/// Number of upcoming fire times returned.
pub const NEXT_RUNS: usize = 10;

const WEEKDAYS: [&str; 8] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CronParseParams {
    /// Cron expression, e.g. `*/15 9-17 * * 1-5`.
    pub expression: String,

    /// RFC 3339 instant to start from (default: now).
    #[serde(default)]
    pub from: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CronParseOutput {
    /// Expression as evaluated, in seconds-first form.
    pub normalized: String,
    /// Next fire times, RFC 3339 in UTC.
    pub next_runs: Vec<String>,
}

pub struct CronParseTool;

impl TransformTool for CronParseTool {
    type Params = CronParseParams;
    type Output = CronParseOutput;

    const NAME: &'static str = "cron_parse";
    const TITLE: &'static str = "Cron Job Parser";
    const DESCRIPTION: &'static str = "Parse a cron expression and list its next 10 fire times (UTC). Supports 5-field, seconds-first 6/7-field and @shortcut expressions.";
    const SLUG: &'static str = "cron";

    fn transform(params: &CronParseParams) -> Result<CronParseOutput, ToolError> {
        if params.expression.trim().is_empty() {
            return Ok(CronParseOutput::default());
        }

        let from = match params.from.as_deref() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| ToolError::validation(format!("Invalid start time '{raw}': {e}")))?,
            None => Utc::now(),
        };

        let normalized = normalize_expression(&params.expression)?;
        let next_runs = upcoming(&normalized, &from)?
            .into_iter()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .collect();

        Ok(CronParseOutput {
            normalized,
            next_runs,
        })
    }

    fn summarize(output: &CronParseOutput) -> String {
        output.next_runs.join("\n")
    }
}

/// Rewrite an expression into the seconds-first form the scheduler expects.
pub fn normalize_expression(expression: &str) -> Result<String, ToolError> {
    let trimmed = expression.trim();
    if trimmed.starts_with('@') {
        return Ok(trimmed.to_string());
    }

    let mut fields: Vec<String> = trimmed.split_whitespace().map(str::to_string).collect();
    match fields.len() {
        5 => fields.insert(0, "0".to_string()),
        6 | 7 => {}
        n => {
            return Err(ToolError::validation(format!(
                "Invalid cron expression: expected 5, 6 or 7 fields, got {n}"
            )));
        }
    }

    fields[5] = weekday_names(&fields[5]);
    Ok(fields.join(" "))
}

fn schedule(expression: &str) -> Result<Schedule, ToolError> {
    Schedule::from_str(expression)
        .map_err(|e| ToolError::validation(format!("Invalid cron expression: {e}")))
}

fn is_restricted(field: &str) -> bool {
    field != "*" && field != "?"
}

/// Next fire times of a normalized expression after `from`.
///
/// The scheduler requires both day fields to match, whereas cron fires on
/// either when both are restricted. That case is evaluated as the union of
/// a day-of-month schedule and a day-of-week schedule.
fn upcoming(normalized: &str, from: &DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, ToolError> {
    let combined = schedule(normalized)?;
    let fields: Vec<&str> = normalized.split_whitespace().collect();
    if fields.len() < 6 || !(is_restricted(fields[3]) && is_restricted(fields[5])) {
        return Ok(combined.after(from).take(NEXT_RUNS).collect());
    }

    let mut by_month_day = fields.clone();
    by_month_day[5] = "*";
    let mut by_weekday = fields;
    by_weekday[3] = "*";

    let mut runs: Vec<DateTime<Utc>> = schedule(&by_month_day.join(" "))?
        .after(from)
        .take(NEXT_RUNS)
        .chain(schedule(&by_weekday.join(" "))?.after(from).take(NEXT_RUNS))
        .collect();
    runs.sort();
    runs.dedup();
    runs.truncate(NEXT_RUNS);
    Ok(runs)
}

/// Replace numeric weekdays (0-7, Sunday = 0 or 7) with names. Step
/// values after `/` are left alone.
fn weekday_names(field: &str) -> String {
    field
        .split(',')
        .map(|part| {
            let (range, step) = match part.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (part, None),
            };
            let named = range
                .split('-')
                .map(|token| match token.parse::<usize>() {
                    Ok(n) if n < WEEKDAYS.len() => WEEKDAYS[n].to_string(),
                    _ => token.to_string(),
                })
                .collect::<Vec<_>>()
                .join("-");
            match step {
                Some(step) => format!("{named}/{step}"),
                None => named,
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(expression: &str, from: &str) -> Result<CronParseOutput, ToolError> {
        CronParseTool::transform(&CronParseParams {
            expression: expression.to_string(),
            from: Some(from.to_string()),
        })
    }

    #[test]
    fn test_every_minute_yields_ten_runs_sixty_seconds_apart() {
        let output = parse("* * * * *", "2024-01-01T00:00:30Z").unwrap();
        assert_eq!(output.next_runs.len(), NEXT_RUNS);
        assert_eq!(output.next_runs[0], "2024-01-01T00:01:00Z");

        let times: Vec<DateTime<Utc>> = output
            .next_runs
            .iter()
            .map(|s| DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc))
            .collect();
        for pair in times.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_seconds(), 60);
        }
    }

    #[test]
    fn test_weekday_numbers_follow_classic_cron() {
        // 2024-01-01 is a Monday.
        let output = parse("0 9 * * 0", "2024-01-01T00:00:00Z").unwrap();
        assert_eq!(output.next_runs[0], "2024-01-07T09:00:00Z");

        let weekdays = parse("30 8 * * 1-5", "2024-01-05T09:00:00Z").unwrap();
        assert_eq!(weekdays.next_runs[0], "2024-01-08T08:30:00Z");
    }

    #[test]
    fn test_day_of_month_or_day_of_week() {
        let output = parse("0 0 15 * 1", "2024-01-01T12:00:00Z").unwrap();
        let days: Vec<&str> = output.next_runs.iter().map(|s| &s[..10]).collect();
        assert_eq!(
            days,
            [
                "2024-01-08", "2024-01-15", "2024-01-22", "2024-01-29", "2024-02-05",
                "2024-02-12", "2024-02-15", "2024-02-19", "2024-02-26", "2024-03-04",
            ]
        );
        assert!(output.next_runs.iter().all(|s| s.ends_with("T00:00:00Z")));
    }

    #[test]
    fn test_single_day_field_is_unchanged() {
        let output = parse("0 0 15 * *", "2024-01-01T12:00:00Z").unwrap();
        assert_eq!(output.next_runs[0], "2024-01-15T00:00:00Z");
        assert_eq!(output.next_runs[1], "2024-02-15T00:00:00Z");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_expression("*/5 * * * *").unwrap(), "0 */5 * * * *");
        assert_eq!(normalize_expression("0 0 * * * 1-5/2").unwrap(), "0 0 * * * MON-FRI/2");
        assert_eq!(normalize_expression("@hourly").unwrap(), "@hourly");
        assert!(normalize_expression("* * *").is_err());
    }

    #[test]
    fn test_invalid_expression_and_start() {
        assert!(parse("61 * * * *", "2024-01-01T00:00:00Z").is_err());
        assert!(parse("* * * * *", "yesterday").is_err());
    }

    #[test]
    fn test_blank_expression() {
        let output = parse("  ", "2024-01-01T00:00:00Z").unwrap();
        assert!(output.next_runs.is_empty());
    }
}
