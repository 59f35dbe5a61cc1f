use crate::types::board::TeamRow;

/// Mean of the criteria above zero, rounded to one decimal place.
///
/// A zero criterion counts as unrated, so an explicit score of 0 does not
/// pull the average down. A row with no positive criterion averages to 0.
pub fn average(row: &TeamRow) -> f64 {
    let total: f64 = row.criteria.iter().sum();
    let count = row.criteria.iter().filter(|value| **value > 0.0).count();
    if count == 0 {
        return 0.0;
    }
    round_one_decimal(total / count as f64)
}

/// Rounds the exact binary value to one decimal; exact ties go away from zero.
///
/// A tie at one decimal is only exactly representable as an odd multiple of
/// 0.25, so every other value is settled by decimal formatting, which works
/// on the exact value rather than on `value * 10.0`.
fn round_one_decimal(value: f64) -> f64 {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters.rem_euclid(2.0) == 1.0 {
        return (value * 10.0).round() / 10.0;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(criteria: [f64; 5]) -> TeamRow {
        TeamRow {
            id: 1,
            name: "team".to_string(),
            criteria,
        }
    }

    #[test]
    fn average_ignores_zero_criteria() {
        assert_eq!(average(&row([4.0, 0.0, 0.0, 0.0, 0.0])), 4.0);
    }

    #[test]
    fn average_of_all_zero_row_is_zero() {
        assert_eq!(average(&row([0.0; 5])), 0.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average(&row([3.0, 4.0, 0.0, 0.0, 0.0])), 3.5);
        assert_eq!(average(&row([1.0, 1.0, 2.0, 0.0, 0.0])), 1.3);
        assert_eq!(average(&row([2.0, 2.0, 1.0, 0.0, 0.0])), 1.7);
    }

    #[test]
    fn average_rounds_the_stored_value_not_the_scaled_one() {
        // (1.1 + 1.2) / 2 is stored just below 1.15
        assert_eq!(average(&row([1.1, 1.2, 0.0, 0.0, 0.0])), 1.1);
        assert_eq!(average(&row([3.45, 0.0, 0.0, 0.0, 0.0])), 3.5);
    }

    #[test]
    fn average_rounds_exact_ties_away_from_zero() {
        assert_eq!(average(&row([1.0, 1.5, 0.0, 0.0, 0.0])), 1.3);
        assert_eq!(average(&row([0.5, 1.0, 0.0, 0.0, 0.0])), 0.8);
        assert_eq!(average(&row([2.0, 2.0, 2.0, 1.0, 0.0])), 1.8);
    }

    #[test]
    fn average_uses_all_five_criteria() {
        assert_eq!(average(&row([5.0, 5.0, 5.0, 5.0, 10.0])), 6.0);
    }
}
