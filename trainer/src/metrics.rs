use std::collections::BTreeSet;

/// Fraction of positions where prediction equals label.
pub fn accuracy(predicted: &[String], actual: &[String]) -> f64 {
    assert_eq!(predicted.len(), actual.len(), "Length mismatch");
    if actual.is_empty() {
        return 0.0;
    }

    let correct = predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| p == a)
        .count();
    correct as f64 / actual.len() as f64
}

/// Per-class precision/recall/F1/support table, plus accuracy and macro
/// average rows.
pub fn classification_report(predicted: &[String], actual: &[String]) -> String {
    assert_eq!(predicted.len(), actual.len(), "Length mismatch");

    let classes: Vec<&String> = predicted
        .iter()
        .chain(actual)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let width = classes
        .iter()
        .map(|c| c.len())
        .max()
        .unwrap_or(0)
        .max("macro avg".len());

    let mut report = format!("{:>width$}  precision  recall  f1-score  support\n\n", "");

    let mut precision_sum = 0.0;
    let mut recall_sum = 0.0;
    let mut f1_sum = 0.0;

    for class in &classes {
        let true_positives = count(predicted, actual, |p, a| p == *class && a == *class);
        let predicted_positives = count(predicted, actual, |p, _| p == *class);
        let support = count(predicted, actual, |_, a| a == *class);

        let precision = ratio(true_positives, predicted_positives);
        let recall = ratio(true_positives, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        precision_sum += precision;
        recall_sum += recall;
        f1_sum += f1;

        report.push_str(&format!(
            "{class:>width$}  {precision:>9.2}  {recall:>6.2}  {f1:>8.2}  {support:>7}\n"
        ));
    }

    let n = classes.len().max(1) as f64;
    let total = actual.len();

    report.push_str(&format!(
        "\n{:>width$}  {:>9}  {:>6}  {:>8.2}  {total:>7}\n",
        "accuracy",
        "",
        "",
        accuracy(predicted, actual)
    ));
    report.push_str(&format!(
        "{:>width$}  {:>9.2}  {:>6.2}  {:>8.2}  {total:>7}\n",
        "macro avg",
        precision_sum / n,
        recall_sum / n,
        f1_sum / n
    ));

    report
}

fn count(predicted: &[String], actual: &[String], test: impl Fn(&String, &String) -> bool) -> usize {
    predicted.iter().zip(actual).filter(|(p, a)| test(p, a)).count()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_accuracy() {
        let actual = labels(&["blues", "rock", "rock", "jazz"]);
        let predicted = labels(&["blues", "rock", "jazz", "jazz"]);
        assert_eq!(0.75, accuracy(&predicted, &actual));
    }

    #[test]
    fn test_accuracy_empty() {
        assert_eq!(0.0, accuracy(&[], &[]));
    }

    #[test]
    fn test_perfect_report() {
        let actual = labels(&["blues", "rock", "blues", "rock"]);
        let report = classification_report(&actual, &actual);

        assert!(report.contains("precision"));
        assert!(report.contains("blues"));
        assert!(report.contains("rock"));
        assert!(report.contains("macro avg"));
        // Perfect scores everywhere.
        assert!(report.contains("1.00"));
        assert!(!report.contains("0.50"));
    }

    #[test]
    fn test_report_scores() {
        // "rock" is predicted twice, correct once; one blues is missed.
        let actual = labels(&["blues", "blues", "rock"]);
        let predicted = labels(&["blues", "rock", "rock"]);
        let report = classification_report(&predicted, &actual);

        // blues: precision 1.00, recall 0.50; rock: precision 0.50, recall 1.00.
        assert!(report.contains("0.50"));
        assert!(report.contains("1.00"));
        // Supports: 2 for blues, 1 for rock, 3 total.
        assert!(report.contains("      2\n"));
    }

    #[test]
    fn test_class_absent_from_predictions() {
        let actual = labels(&["blues", "jazz"]);
        let predicted = labels(&["blues", "blues"]);
        let report = classification_report(&predicted, &actual);

        assert!(report.contains("jazz"));
        assert!(report.contains("0.00"));
    }
}
