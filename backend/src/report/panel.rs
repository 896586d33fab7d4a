//! Display models for the week strip and the results panel.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::daily_info::NutritionInfo;

/// Monday-to-Sunday week containing `date`.
pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub label: String,
    pub selected: bool,
    pub has_entry: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsPanel {
    pub analysis: String,
    /// Empty when the record has analysis text but no nutrition estimate.
    pub nutrition: Vec<NutritionLine>,
}

impl ResultsPanel {
    /// Shown only once there is analysis text to display.
    pub fn build(analysis: Option<&str>, nutrition: Option<&NutritionInfo>) -> Option<Self> {
        let analysis = analysis.filter(|a| !a.is_empty())?;
        let nutrition = nutrition.map(nutrition_lines).unwrap_or_default();
        Some(Self {
            analysis: analysis.to_string(),
            nutrition,
        })
    }
}

fn nutrition_lines(n: &NutritionInfo) -> Vec<NutritionLine> {
    let line = |label, value: String| NutritionLine { label, value };
    vec![
        line("Calories Consumed", amount(n.calories)),
        line("Calories Burned", amount(n.calories_burned)),
        line("Maintenance Calories", amount(n.calories_maintenance)),
        line("Net Calories", amount(n.net_calories())),
        line("Protein (g)", amount(n.protein)),
        line("Carbs (g)", amount(n.carbs)),
        line("Fats (g)", amount(n.fats)),
    ]
}

fn amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_of_midweek() {
        let week = week_of(date(2026, 10, 16)); // Friday
        assert_eq!(week[0], date(2026, 10, 12));
        assert_eq!(week[6], date(2026, 10, 18));
    }

    #[test]
    fn test_week_of_sunday_belongs_to_prior_monday() {
        let week = week_of(date(2026, 10, 18));
        assert_eq!(week[0], date(2026, 10, 12));
    }

    #[test]
    fn test_week_of_crosses_month() {
        let week = week_of(date(2026, 11, 1)); // Sunday
        assert_eq!(week[0], date(2026, 10, 26));
        assert_eq!(week[6], date(2026, 11, 1));
    }

    #[test]
    fn test_panel_hidden_without_analysis() {
        assert!(ResultsPanel::build(None, None).is_none());
        assert!(ResultsPanel::build(Some(""), None).is_none());
    }

    #[test]
    fn test_panel_lines() {
        let n = NutritionInfo {
            calories: 2000.0,
            protein: 100.0,
            carbs: 250.5,
            fats: 70.0,
            calories_burned: 500.0,
            calories_maintenance: 2200.0,
        };
        let panel = ResultsPanel::build(Some("Great day"), Some(&n)).unwrap();
        assert_eq!(panel.analysis, "Great day");
        assert_eq!(panel.nutrition[0].label, "Calories Consumed");
        assert_eq!(panel.nutrition[0].value, "2000");
        assert_eq!(panel.nutrition[3].value, "-700");
        assert_eq!(panel.nutrition[5].label, "Carbs (g)");
        assert_eq!(panel.nutrition[5].value, "250.5");
        let labels: Vec<_> = panel.nutrition.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            [
                "Calories Consumed",
                "Calories Burned",
                "Maintenance Calories",
                "Net Calories",
                "Protein (g)",
                "Carbs (g)",
                "Fats (g)",
            ]
        );
    }

    #[test]
    fn test_panel_without_nutrition() {
        let panel = ResultsPanel::build(Some("Rest day"), None).unwrap();
        assert!(panel.nutrition.is_empty());
    }
}
