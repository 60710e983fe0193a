//! Planning: objective text to an ordered task list.
//!
//! [`KeywordPlanner`] is the deterministic reference strategy. Anything
//! implementing [`Planner`] can replace it without touching the executor.

use crate::error::AgentResult;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use taskweave_core::{Parameters, Task, TaskId};
use taskweave_tools::Operation;

/// Tool names the keyword planner routes to.
pub const WEATHER_TOOL: &str = "get_weather";
pub const CALCULATOR_TOOL: &str = "calculator";

/// Default simulated planning latency.
pub const PLANNING_LATENCY: Duration = Duration::from_millis(200);

/// Strategy turning an objective into tasks.
///
/// Implementations must return every task `Pending`, with ids unique
/// within the plan.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, objective: &str) -> AgentResult<Vec<Task>>;
}

static ARITHMETIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?\d+(?:\.\d+)?)\s*([-+*/xX×÷])\s*(-?\d+(?:\.\d+)?)")
        .expect("valid arithmetic pattern")
});

static CITY_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[Ii]n|[Ff]or|[Aa]t)\s+(\p{Lu}\p{L}*(?:\s+\p{Lu}\p{L}*)*)")
        .expect("valid city pattern")
});

/// Canonical city name and the spellings that identify it.
const KNOWN_CITIES: &[(&str, &[&str])] = &[
    ("Beijing", &["beijing", "北京"]),
    ("Shanghai", &["shanghai", "上海"]),
    ("Guangzhou", &["guangzhou", "广州"]),
    ("Shenzhen", &["shenzhen", "深圳"]),
    ("Hangzhou", &["hangzhou", "杭州"]),
    ("Tokyo", &["tokyo", "东京"]),
    ("London", &["london", "伦敦"]),
    ("Paris", &["paris", "巴黎"]),
    ("New York", &["new york", "纽约"]),
];

/// Keyword-triggered planner.
///
/// Checks weather intent, then calculation intent, emitting one tool-call
/// task per match, and always ends with a single summarize task.
#[derive(Debug, Clone)]
pub struct KeywordPlanner {
    weather_triggers: Vec<String>,
    calculation_triggers: Vec<String>,
    default_city: String,
    default_calculation: (Operation, f64, f64),
    latency: Duration,
}

impl Default for KeywordPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordPlanner {
    pub fn new() -> Self {
        Self {
            weather_triggers: vec!["weather".into(), "forecast".into(), "天气".into()],
            calculation_triggers: vec!["calculate".into(), "compute".into(), "计算".into()],
            default_city: "Beijing".to_string(),
            default_calculation: (Operation::Add, 10.0, 25.0),
            latency: PLANNING_LATENCY,
        }
    }

    /// Replace the weather-intent triggers.
    pub fn with_weather_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.weather_triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the calculation-intent triggers.
    pub fn with_calculation_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calculation_triggers = triggers.into_iter().map(Into::into).collect();
        self
    }

    /// City used when the objective names none.
    pub fn with_default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = city.into();
        self
    }

    /// Simulated planning latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn wants_weather(&self, objective: &str) -> bool {
        contains_any(objective, &self.weather_triggers)
    }

    pub fn wants_calculation(&self, objective: &str) -> bool {
        contains_any(objective, &self.calculation_triggers)
    }

    /// City named in `objective`: an explicit `in/for/at <City>` phrase,
    /// then the earliest known city, then the default.
    pub fn extract_city(&self, objective: &str) -> String {
        let phrase = CITY_PHRASE
            .captures(objective)
            .and_then(|c| c.get(1))
            .map(|m| {
                let named = m.as_str();
                canonical_city(named).map_or_else(|| named.to_string(), str::to_string)
            });

        phrase
            .or_else(|| {
                let lower = objective.to_lowercase();
                KNOWN_CITIES
                    .iter()
                    .filter_map(|(name, aliases)| {
                        aliases
                            .iter()
                            .filter_map(|alias| find_alias(&lower, alias))
                            .min()
                            .map(|pos| (pos, *name))
                    })
                    .min_by_key(|(pos, _)| *pos)
                    .map(|(_, name)| name.to_string())
            })
            .unwrap_or_else(|| self.default_city.clone())
    }

    /// First standalone `a <op> b` expression in `objective`, or the
    /// default. Matches that are part of a longer run such as a date
    /// (`2024-05-01`) or an identifier are skipped, as are operands that do
    /// not fit a finite `f64`.
    pub fn extract_calculation(&self, objective: &str) -> (Operation, f64, f64) {
        ARITHMETIC
            .captures_iter(objective)
            .find_map(|c| {
                let whole = c.get(0)?;
                if !stands_alone(objective, whole.start(), whole.end()) {
                    return None;
                }
                let a = parse_operand(c.get(1)?.as_str())?;
                let op = Operation::from_symbol(c.get(2)?.as_str().chars().next()?)?;
                let b = parse_operand(c.get(3)?.as_str())?;
                Some((op, a, b))
            })
            .unwrap_or(self.default_calculation)
    }

    /// Weather tool parameters for `objective`.
    pub fn weather_parameters(&self, objective: &str) -> Parameters {
        Parameters::new().with("city", self.extract_city(objective))
    }

    /// Calculator parameters for `objective`.
    pub fn calculation_parameters(&self, objective: &str) -> Parameters {
        let (operation, a, b) = self.extract_calculation(objective);
        Parameters::new()
            .with("operation", operation.as_str())
            .with("a", a)
            .with("b", b)
    }

    /// Plan without the simulated latency.
    pub fn plan_now(&self, objective: &str) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(3);

        if self.wants_weather(objective) {
            let params = self.weather_parameters(objective);
            let description = format!(
                "Look up the weather in {}",
                params.str("city").unwrap_or(&self.default_city)
            );
            tasks.push(Task::tool_call(
                TaskId::generate(),
                description,
                WEATHER_TOOL,
                params,
            ));
        }

        if self.wants_calculation(objective) {
            let (operation, a, b) = self.extract_calculation(objective);
            let params = self.calculation_parameters(objective);
            tasks.push(Task::tool_call(
                TaskId::generate(),
                format!("Calculate {} {} {}", operation, a, b),
                CALCULATOR_TOOL,
                params,
            ));
        }

        tasks.push(Task::summarize(
            TaskId::generate(),
            "Summarize the execution results",
        ));

        tasks
    }
}

fn canonical_city(named: &str) -> Option<&'static str> {
    let lower = named.to_lowercase();
    KNOWN_CITIES
        .iter()
        .find(|(_, aliases)| aliases.contains(&lower.as_str()))
        .map(|(name, _)| *name)
}

/// Position of `alias` in `lower`. Latin aliases must be whole words, so
/// "comparison" does not mention Paris.
fn find_alias(lower: &str, alias: &str) -> Option<usize> {
    if !alias.is_ascii() {
        return lower.find(alias);
    }
    lower.match_indices(alias).map(|(pos, _)| pos).find(|&pos| {
        let before = lower[..pos].chars().next_back();
        let after = lower[pos + alias.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric())
            && !after.is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

/// True when `text[start..end]` is not glued to a surrounding number,
/// word or operator chain.
fn stands_alone(text: &str, start: usize, end: usize) -> bool {
    let mut before = text[..start].chars().rev();
    if before.next().is_some_and(is_number_char) {
        return false;
    }

    let mut after = text[end..].chars();
    match after.next() {
        Some(c) if is_number_char(c) => false,
        Some(c) if "+-*/xX×÷".contains(c) => !after.next().is_some_and(|d| d.is_ascii_digit()),
        _ => true,
    }
}

fn parse_operand(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn contains_any(text: &str, triggers: &[String]) -> bool {
    let lower = text.to_lowercase();
    triggers
        .iter()
        .filter(|t| !t.is_empty())
        .any(|t| lower.contains(&t.to_lowercase()))
}

#[async_trait]
impl Planner for KeywordPlanner {
    async fn plan(&self, objective: &str) -> AgentResult<Vec<Task>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.plan_now(objective))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use taskweave_core::{TaskKind, TaskStatus};

    fn planner() -> KeywordPlanner {
        KeywordPlanner::new().with_latency(Duration::ZERO)
    }

    #[test]
    fn test_no_trigger_plans_only_summary() {
        let tasks = planner().plan_now("tell me a story");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].kind(), &TaskKind::Summarize);
        assert!(tasks[0].parameters().is_empty());
    }

    #[test]
    fn test_weather_then_calculation_then_summary() {
        let tasks = planner().plan_now("Check the WEATHER in Shanghai, then calculate 6 * 7");
        let kinds: Vec<_> = tasks.iter().map(|t| t.tool_name()).collect();
        assert_eq!(kinds, vec![Some(WEATHER_TOOL), Some(CALCULATOR_TOOL), None]);
        assert_eq!(tasks[0].parameters().str("city"), Some("Shanghai"));
        assert_eq!(tasks[1].parameters().str("operation"), Some("multiply"));
        assert_eq!(tasks[1].parameters().f64("a"), Some(6.0));
        assert_eq!(tasks[1].parameters().f64("b"), Some(7.0));
        assert_eq!(tasks[2].kind(), &TaskKind::Summarize);
    }

    #[test]
    fn test_chinese_objective_uses_extracted_entities() {
        let tasks = planner().plan_now("请帮我查询北京的天气，然后计算10+25的结果");
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].parameters().str("city"), Some("Beijing"));
        assert_eq!(tasks[1].parameters().str("operation"), Some("add"));
        assert_eq!(tasks[1].parameters().f64("a"), Some(10.0));
        assert_eq!(tasks[1].parameters().f64("b"), Some(25.0));
    }

    #[test]
    fn test_ids_unique_and_pending() {
        let tasks = planner().plan_now("weather and calculate");
        let ids: HashSet<_> = tasks.iter().map(|t| t.id().clone()).collect();
        assert_eq!(ids.len(), tasks.len());
        assert!(tasks.iter().all(|t| t.status() == TaskStatus::Pending));
    }

    #[test]
    fn test_city_extraction() {
        let p = planner();
        assert_eq!(p.extract_city("weather in Reykjavik please"), "Reykjavik");
        assert_eq!(p.extract_city("forecast for New York and Paris"), "New York");
        assert_eq!(p.extract_city("weather for tomorrow"), "Beijing");
        assert_eq!(
            planner().with_default_city("Oslo").extract_city("weather"),
            "Oslo"
        );
    }

    #[test]
    fn test_calculation_extraction() {
        let p = planner();
        assert_eq!(p.extract_calculation("compute 9 ÷ 3"), (Operation::Divide, 9.0, 3.0));
        assert_eq!(p.extract_calculation("compute 2.5 - 1"), (Operation::Subtract, 2.5, 1.0));
        assert_eq!(p.extract_calculation("compute something"), (Operation::Add, 10.0, 25.0));
    }

    #[test]
    fn test_named_city_beats_embedded_city_names() {
        let p = planner();
        assert_eq!(p.extract_city("weather comparison in Reykjavik"), "Reykjavik");
        assert_eq!(p.extract_city("weather comparison please"), "Beijing");
        assert_eq!(p.extract_city("weather in Tokyo, not London"), "Tokyo");
        assert_eq!(p.extract_city("weather in BEIJING"), "Beijing");
        assert_eq!(p.extract_city("查询Paris的天气"), "Paris");
    }

    #[test]
    fn test_dates_and_ids_are_not_calculations() {
        let p = planner();
        assert_eq!(
            p.extract_calculation("weather on 2024-05-01, then calculate 3 + 4"),
            (Operation::Add, 3.0, 4.0)
        );
        assert_eq!(
            p.extract_calculation("order ab12-34 shipped, compute 8 / 2"),
            (Operation::Divide, 8.0, 2.0)
        );
        assert_eq!(
            p.extract_calculation("version 1.2.3-4 only"),
            (Operation::Add, 10.0, 25.0)
        );
    }

    #[test]
    fn test_overflowing_operand_falls_back_to_default() {
        let huge = "9".repeat(400);
        let p = planner();
        assert_eq!(
            p.extract_calculation(&format!("calculate {huge} + 1")),
            (Operation::Add, 10.0, 25.0)
        );

        let params = p.calculation_parameters(&format!("calculate {huge} * 2"));
        assert_eq!(params.f64("a"), Some(10.0));
        assert_eq!(params.f64("b"), Some(25.0));
    }

    #[test]
    fn test_custom_triggers() {
        let p = planner().with_weather_triggers(["umbrella"]);
        assert!(p.wants_weather("Do I need an UMBRELLA?"));
        assert!(!p.wants_weather("weather"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_planner_trait_object() {
        let planner: Box<dyn Planner> = Box::new(KeywordPlanner::new());
        let tasks = planner.plan("天气").await.unwrap();
        assert_eq!(tasks.len(), 2);
    }
}
