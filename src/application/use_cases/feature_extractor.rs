// ============================================================
// FEATURE EXTRACTOR
// ============================================================
// One passenger record -> fixed-length numeric vector

use crate::domain::csv::{Record, Value};
use crate::domain::features::{
    columns, FeatureVector, ImputationParameters, EMBARKED_CATEGORIES, PCLASS_CATEGORIES,
    SEX_CATEGORIES,
};

/// Encode `record` using constants derived from the training set.
///
/// Slot order: `[age, fare, sib_sp, parch] ++ pclass(3) ++ sex(2) ++ embarked(3)`,
/// then `[family_size, is_alone]` when `include_family_features` is set.
pub fn extract(
    record: &Record,
    params: &ImputationParameters,
    include_family_features: bool,
) -> FeatureVector {
    let age = record
        .get(columns::AGE)
        .as_number()
        .unwrap_or(params.age_median);
    let fare = record
        .get(columns::FARE)
        .as_number()
        .unwrap_or(params.fare_median);
    let sib_sp = record.get(columns::SIB_SP).as_number().unwrap_or(0.0);
    let parch = record.get(columns::PARCH).as_number().unwrap_or(0.0);

    let embarked = match record.get(columns::EMBARKED) {
        Value::Absent => params.embarked_mode.as_str(),
        value => value.as_text().unwrap_or_default(),
    };

    let capacity = if include_family_features { 14 } else { 12 };
    let mut features = Vec::with_capacity(capacity);
    features.push(standardize(age, params.age_median, params.age_std_dev));
    features.push(standardize(fare, params.fare_median, params.fare_std_dev));
    features.push(sib_sp);
    features.push(parch);
    features.extend(one_hot_number(record.get(columns::PCLASS), &PCLASS_CATEGORIES));
    features.extend(one_hot_text(record.get(columns::SEX).as_text(), &SEX_CATEGORIES));
    features.extend(one_hot_text(Some(embarked), &EMBARKED_CATEGORIES));

    if include_family_features {
        let family_size = sib_sp + parch + 1.0;
        features.push(family_size);
        features.push(if family_size == 1.0 { 1.0 } else { 0.0 });
    }

    features
}

/// `(value - center) / scale`; a zero scale leaves the value centred but unscaled
pub fn standardize(value: f64, center: f64, scale: f64) -> f64 {
    if scale == 0.0 {
        value - center
    } else {
        (value - center) / scale
    }
}

/// Single 1 at the matching category, all zeros when nothing matches
pub fn one_hot_text(value: Option<&str>, categories: &[&str]) -> Vec<f64> {
    categories
        .iter()
        .map(|category| if value == Some(*category) { 1.0 } else { 0.0 })
        .collect()
}

pub fn one_hot_number(value: &Value, categories: &[f64]) -> Vec<f64> {
    let number = value.as_number();
    categories
        .iter()
        .map(|category| if number == Some(*category) { 1.0 } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ImputationParameters {
        ImputationParameters {
            age_median: 28.0,
            fare_median: 14.0,
            embarked_mode: "S".to_string(),
            age_std_dev: 2.0,
            fare_std_dev: 7.0,
        }
    }

    fn passenger(age: Value, embarked: Value, sib_sp: f64, parch: f64) -> Record {
        Record::from_pairs([
            ("Age", age),
            ("Fare", Value::Number(21.0)),
            ("Pclass", Value::Number(2.0)),
            ("Sex", Value::text("female")),
            ("SibSp", Value::Number(sib_sp)),
            ("Parch", Value::Number(parch)),
            ("Embarked", embarked),
        ])
        .unwrap()
    }

    #[test]
    fn test_vector_assembly_order() {
        let record = passenger(Value::Number(30.0), Value::text("Q"), 1.0, 2.0);
        let features = extract(&record, &params(), false);

        assert_eq!(
            features,
            vec![
                1.0, 1.0, 1.0, 2.0, // age, fare, sib_sp, parch
                0.0, 1.0, 0.0, // pclass
                0.0, 1.0, // sex
                0.0, 1.0, 0.0, // embarked
            ]
        );
    }

    #[test]
    fn test_family_features_appended() {
        let record = passenger(Value::Number(30.0), Value::text("C"), 1.0, 2.0);
        let features = extract(&record, &params(), true);
        assert_eq!(features.len(), 14);
        assert_eq!(&features[12..], &[4.0, 0.0]);

        let alone = passenger(Value::Number(30.0), Value::text("C"), 0.0, 0.0);
        let features = extract(&alone, &params(), true);
        assert_eq!(&features[12..], &[1.0, 1.0]);
    }

    #[test]
    fn test_missing_values_are_imputed() {
        let record = passenger(Value::Absent, Value::Absent, 0.0, 0.0);
        let features = extract(&record, &params(), false);

        // Imputed age sits exactly on the median
        assert_eq!(features[0], 0.0);
        // Embarked falls back to the mode "S"
        assert_eq!(&features[9..12], &[0.0, 0.0, 1.0]);

        let sparse = Record::from_pairs([("Age", Value::Number(28.0))]).unwrap();
        let features = extract(&sparse, &params(), false);
        assert_eq!(features[2], 0.0);
        assert_eq!(features[3], 0.0);
    }

    #[test]
    fn test_one_hot_exactly_one_for_known_categories() {
        for category in ["C", "Q", "S"] {
            let encoded = one_hot_text(Some(category), &EMBARKED_CATEGORIES);
            assert_eq!(encoded.iter().filter(|&&x| x == 1.0).count(), 1);
            assert_eq!(encoded.iter().sum::<f64>(), 1.0);
        }
        for class in PCLASS_CATEGORIES {
            let encoded = one_hot_number(&Value::Number(class), &PCLASS_CATEGORIES);
            assert_eq!(encoded.iter().sum::<f64>(), 1.0);
        }
    }

    #[test]
    fn test_one_hot_unknown_category_is_all_zero() {
        assert_eq!(one_hot_text(Some("X"), &EMBARKED_CATEGORIES), vec![0.0; 3]);
        assert_eq!(one_hot_text(None, &SEX_CATEGORIES), vec![0.0; 2]);
        assert_eq!(one_hot_number(&Value::Number(4.0), &PCLASS_CATEGORIES), vec![0.0; 3]);
        assert_eq!(one_hot_number(&Value::Absent, &PCLASS_CATEGORIES), vec![0.0; 3]);
    }

    #[test]
    fn test_zero_scale_does_not_divide() {
        assert_eq!(standardize(5.0, 3.0, 0.0), 2.0);
        assert_eq!(standardize(5.0, 3.0, 4.0), 0.5);
    }
}
