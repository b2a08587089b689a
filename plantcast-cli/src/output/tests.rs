//! CLI output formatting tests.
//!
//! These tests build small forecasts and check the table, chart and JSON
//! renditions against them.

#[cfg(test)]
mod fixtures {
    use chrono::NaiveDate;
    use plantcast_core::{ForecastDay, ForecastRecord, MergedForecast, PlantCode, SlotValue};

    pub fn code(s: &str) -> PlantCode {
        PlantCode::new(s).unwrap()
    }

    pub fn record(plant: &str, slots: &[(&str, Option<f64>)]) -> ForecastRecord {
        ForecastRecord {
            code: code(plant),
            slots: slots
                .iter()
                .map(|(label, value)| SlotValue {
                    label: (*label).to_string(),
                    value: *value,
                })
                .collect(),
        }
    }

    pub fn day(day: ForecastDay, records: Vec<ForecastRecord>) -> (ForecastDay, MergedForecast) {
        let base = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let mut forecast = MergedForecast::new(day.date_from(base));
        forecast.extend(records).unwrap();
        (day, forecast)
    }
}

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use super::fixtures::{code, day, record};
    use plantcast_core::{ForecastDay, ForecastTable, MergedForecast, SLOT_COUNT};

    fn table(days: &[(ForecastDay, MergedForecast)], selected: &[&str]) -> ForecastTable {
        let selected: Vec<_> = selected.iter().map(|s| code(s)).collect();
        let borrowed: Vec<_> = days.iter().map(|(d, f)| (*d, f)).collect();
        ForecastTable::build(&selected, &borrowed)
    }

    #[test]
    fn test_table_layout() {
        let days = vec![day(
            ForecastDay::Today,
            vec![record("VLAB2", &[("00:30", Some(1.5)), ("01:00", None)])],
        )];
        let out = TextFormatter::new(false).format_table(&table(&days, &["VLAB2"]));
        let lines: Vec<&str> = out.lines().collect();

        // header + rule + one row per slot
        assert_eq!(lines.len(), 2 + SLOT_COUNT);
        assert!(lines[0].starts_with("Interval"));
        assert!(lines[0].ends_with("VLAB2 (Today)"));
        assert!(lines[2].starts_with("00:30"));
        assert!(lines[2].ends_with("1.50 MW"));
        assert!(lines[3].starts_with("01:00"));
        assert!(lines[3].ends_with('-'));
        assert!(lines.last().unwrap().starts_with("24:00:00"));
    }

    #[test]
    fn test_table_pairs_days_per_plant() {
        let days = vec![
            day(
                ForecastDay::Today,
                vec![record("VLAB2", &[]), record("VLFIG", &[])],
            ),
            day(
                ForecastDay::Tomorrow,
                vec![record("VLAB2", &[]), record("VLFIG", &[])],
            ),
        ];
        let out = TextFormatter::new(false).format_table(&table(&days, &["VLAB2", "VLFIG"]));
        let header = out.lines().next().unwrap();

        let positions: Vec<usize> = [
            "VLAB2 (Today)",
            "VLAB2 (Tomorrow)",
            "VLFIG (Today)",
            "VLFIG (Tomorrow)",
        ]
        .iter()
        .map(|h| header.find(h).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_table_columns_align() {
        let days = vec![day(
            ForecastDay::Today,
            vec![record("VLAB2", &[("00:30", Some(1234.5)), ("01:00", Some(2.0))])],
        )];
        let out = TextFormatter::new(false).format_table(&table(&days, &["VLAB2"]));
        let widths: Vec<usize> = out.lines().skip(2).map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_missing_plant_gets_no_column() {
        let days = vec![day(ForecastDay::Today, vec![record("VLAB2", &[])])];
        let out = TextFormatter::new(false).format_table(&table(&days, &["VLAB2", "VLFIG"]));
        assert!(!out.contains("VLFIG"));
    }

    #[test]
    fn test_colored_table_marks_absent_values_dim() {
        let days = vec![day(ForecastDay::Today, vec![record("VLAB2", &[])])];
        let out = TextFormatter::new(true).format_table(&table(&days, &["VLAB2"]));
        assert!(out.contains("\x1b[2m"));
        assert!(out.contains("\x1b[1m"));
    }
}

#[cfg(test)]
mod chart_tests {
    use super::super::chart::ChartRenderer;
    use super::fixtures::{code, day, record};
    use plantcast_core::{ForecastDay, ForecastTable};

    #[test]
    fn test_one_line_per_column() {
        let days = vec![
            day(ForecastDay::Today, vec![record("VLAB2", &[("00:30", Some(10.0))])]),
            day(ForecastDay::Tomorrow, vec![record("VLAB2", &[("00:30", Some(5.0))])]),
        ];
        let borrowed: Vec<_> = days.iter().map(|(d, f)| (*d, f)).collect();
        let table = ForecastTable::build(&[code("VLAB2")], &borrowed);

        let out = ChartRenderer::new(false).render(&table);
        let lines: Vec<&str> = out.lines().collect();

        // title, two series, axis
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("max 10.00 MW"));
        assert!(lines[1].starts_with("VLAB2 (Today)"));
        assert!(lines[1].contains("│█"));
        assert!(lines[2].starts_with("VLAB2 (Tomorrow)"));
        assert!(lines[2].contains("│▅"));
    }

    #[test]
    fn test_tomorrow_is_dimmed_and_plants_share_color() {
        let days = vec![
            day(ForecastDay::Today, vec![record("VLAB2", &[("00:30", Some(1.0))])]),
            day(ForecastDay::Tomorrow, vec![record("VLAB2", &[("00:30", Some(1.0))])]),
        ];
        let borrowed: Vec<_> = days.iter().map(|(d, f)| (*d, f)).collect();
        let table = ForecastTable::build(&[code("VLAB2")], &borrowed);

        let out = ChartRenderer::new(true).render(&table);
        let lines: Vec<&str> = out.lines().collect();
        assert!(!lines[1].starts_with("\x1b[2m"));
        assert!(lines[2].starts_with("\x1b[2m"));
        assert_eq!(out.matches("38;5;196m").count(), 2);
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use super::fixtures::{code, day, record};
    use plantcast_core::{ForecastDay, SLOT_COUNT};

    #[test]
    fn test_forecast_shape() {
        let days = vec![
            day(
                ForecastDay::Today,
                vec![record("VLAB2", &[("00:30", Some(3.25)), ("01:00", None)])],
            ),
            day(ForecastDay::Tomorrow, vec![]),
        ];

        let out = JsonFormatter::new(false)
            .format_forecast(&days, &[code("VLAB2")])
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        let today = &value["days"][0];
        assert_eq!(today["day"], "today");
        assert_eq!(today["date"], "2024-05-17");
        assert_eq!(today["plants"][0]["code"], "VLAB2");

        let slots = today["plants"][0]["slots"].as_array().unwrap();
        assert_eq!(slots.len(), SLOT_COUNT);
        assert_eq!(slots[0]["label"], "00:30");
        assert_eq!(slots[0]["value"], 3.25);
        assert!(slots[1]["value"].is_null());

        let tomorrow = &value["days"][1];
        assert_eq!(tomorrow["day"], "tomorrow");
        assert_eq!(tomorrow["date"], "2024-05-18");
        assert!(tomorrow["plants"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_plants_follow_selection_order() {
        let days = vec![day(
            ForecastDay::Today,
            vec![record("VLAB2", &[]), record("VLFIG", &[])],
        )];
        let output = JsonFormatter::forecast_output(&days, &[code("VLFIG"), code("VLAB2")]);
        let codes: Vec<&str> = output.days[0]
            .plants
            .iter()
            .map(|p| p.code.as_str())
            .collect();
        assert_eq!(codes, vec!["VLFIG", "VLAB2"]);
    }
}
