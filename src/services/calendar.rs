//! Expansión de calendario
//!
//! Función pura que convierte un rango de fechas en la secuencia ordenada
//! de días hábiles (lunes a viernes) del calendario gregoriano. Las fechas
//! se comparan como fechas de calendario, sin conversión de timezone.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Expandir el rango inclusivo [start, end] a todos sus días hábiles,
/// en orden ascendente. Un rango con start > end produce una secuencia
/// vacía; el caller decide si eso es un error de validación.
pub fn expand_weekdays(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;

    while current <= end {
        match current.weekday() {
            Weekday::Sat | Weekday::Sun => {}
            _ => dates.push(current),
        }
        current = match current.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_week_monday_to_friday() {
        let dates = expand_weekdays(date(2025, 1, 20), date(2025, 1, 24));
        assert_eq!(
            dates,
            vec![
                date(2025, 1, 20),
                date(2025, 1, 21),
                date(2025, 1, 22),
                date(2025, 1, 23),
                date(2025, 1, 24),
            ]
        );
    }

    #[test]
    fn test_weekend_only_range_is_empty() {
        let dates = expand_weekdays(date(2025, 1, 25), date(2025, 1, 26));
        assert!(dates.is_empty());
    }

    #[test]
    fn test_range_spanning_weekend_skips_it() {
        let dates = expand_weekdays(date(2025, 1, 24), date(2025, 1, 27));
        assert_eq!(dates, vec![date(2025, 1, 24), date(2025, 1, 27)]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let dates = expand_weekdays(date(2025, 1, 24), date(2025, 1, 20));
        assert!(dates.is_empty());
    }

    #[test]
    fn test_single_weekday() {
        let dates = expand_weekdays(date(2025, 1, 22), date(2025, 1, 22));
        assert_eq!(dates, vec![date(2025, 1, 22)]);
    }

    #[test]
    fn test_idempotent_for_same_inputs() {
        let first = expand_weekdays(date(2025, 3, 1), date(2025, 4, 30));
        let second = expand_weekdays(date(2025, 3, 1), date(2025, 4, 30));
        assert_eq!(first, second);
    }
}
