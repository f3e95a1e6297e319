//! Rule-based contributing factors.
//!
//! These mirror the triage guidance the frontend renders next to the model
//! output: simple vital-sign thresholds with linearly graded, capped impact
//! scores, plus two flat-impact lookups for critical symptoms and serious
//! pre-existing conditions. All thresholds are strict comparisons; a reading
//! exactly on a boundary fires nothing.

use crate::models::{Factor, Observation};

/// Symptoms that fire the flat critical-symptom factor when present anywhere
/// in the submitted list, not just in the primary slot.
const CRITICAL_SYMPTOMS: [&str; 5] = [
    "Difficulty Breathing",
    "Chest Pain",
    "Stroke Symptoms",
    "Loss of Consciousness",
    "Severe Headache",
];

/// Pre-existing conditions that fire the flat serious-condition factor.
const SERIOUS_CONDITIONS: [&str; 6] = [
    "Heart Disease",
    "Diabetes",
    "Cancer",
    "Kidney Disease",
    "COPD",
    "Stroke History",
];

const CRITICAL_SYMPTOM_IMPACT: f64 = 30.0;
const SERIOUS_CONDITION_IMPACT: f64 = 18.0;

/// A graded rule: impact grows linearly with the excursion past the
/// threshold and clamps at a per-rule ceiling.
struct GradedRule {
    name: &'static str,
    scale: f64,
    cap: f64,
}

impl GradedRule {
    fn fire(&self, excursion: f64) -> Factor {
        Factor {
            name: self.name.to_string(),
            impact: (excursion * self.scale).min(self.cap),
        }
    }
}

const AGE_OVER_65: GradedRule = GradedRule {
    name: "Age > 65 years",
    scale: 0.5,
    cap: 25.0,
};
const AGE_OVER_50: GradedRule = GradedRule {
    name: "Age > 50 years",
    scale: 0.3,
    cap: 15.0,
};
const ELEVATED_BP: GradedRule = GradedRule {
    name: "Elevated Blood Pressure",
    scale: 0.3,
    cap: 20.0,
};
const TACHYCARDIA: GradedRule = GradedRule {
    name: "Tachycardia",
    scale: 0.2,
    cap: 15.0,
};
const BRADYCARDIA: GradedRule = GradedRule {
    name: "Bradycardia",
    scale: 0.2,
    cap: 15.0,
};
const HIGH_FEVER: GradedRule = GradedRule {
    name: "High Fever",
    scale: 5.0,
    cap: 20.0,
};
const HYPOTHERMIA: GradedRule = GradedRule {
    name: "Hypothermia",
    scale: 5.0,
    cap: 20.0,
};

/// Evaluate every rule against one observation.
///
/// Emission order is fixed: age, blood pressure, heart rate, temperature,
/// critical symptoms, pre-existing condition. The age and heart-rate and
/// temperature pairs are mutually exclusive; at most one of each pair fires.
pub fn contributing_factors(obs: &Observation) -> Vec<Factor> {
    let mut factors = Vec::new();

    if obs.age > 65.0 {
        factors.push(AGE_OVER_65.fire(obs.age - 65.0));
    } else if obs.age > 50.0 {
        factors.push(AGE_OVER_50.fire(obs.age - 50.0));
    }

    if obs.systolic_bp > 140.0 || obs.diastolic_bp > 90.0 {
        // When only one reading is elevated the other contributes a negative
        // deviation, so the max picks the elevated one.
        let deviation = (obs.systolic_bp - 140.0).max(obs.diastolic_bp - 90.0);
        factors.push(ELEVATED_BP.fire(deviation));
    }

    if obs.heart_rate > 100.0 {
        factors.push(TACHYCARDIA.fire(obs.heart_rate - 100.0));
    } else if obs.heart_rate < 60.0 {
        factors.push(BRADYCARDIA.fire(60.0 - obs.heart_rate));
    }

    if obs.temperature > 38.5 {
        factors.push(HIGH_FEVER.fire(obs.temperature - 38.5));
    } else if obs.temperature < 36.0 {
        factors.push(HYPOTHERMIA.fire(36.0 - obs.temperature));
    }

    if obs
        .symptoms
        .iter()
        .any(|s| CRITICAL_SYMPTOMS.contains(&s.as_str()))
    {
        factors.push(Factor {
            name: "Critical Symptoms Present".to_string(),
            impact: CRITICAL_SYMPTOM_IMPACT,
        });
    }

    if SERIOUS_CONDITIONS.contains(&obs.pre_existing.as_str()) {
        factors.push(Factor {
            name: format!("Pre-existing: {}", obs.pre_existing),
            impact: SERIOUS_CONDITION_IMPACT,
        });
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> Observation {
        Observation {
            age: 35.0,
            gender: "Male".to_string(),
            systolic_bp: 120.0,
            diastolic_bp: 80.0,
            heart_rate: 75.0,
            temperature: 37.0,
            symptoms: vec!["Cough".to_string()],
            pre_existing: "No History".to_string(),
        }
    }

    #[test]
    fn healthy_observation_fires_nothing() {
        assert!(contributing_factors(&healthy()).is_empty());
    }

    #[test]
    fn boundary_readings_fire_nothing() {
        let mut obs = healthy();
        obs.age = 65.0;
        obs.systolic_bp = 140.0;
        obs.diastolic_bp = 90.0;
        obs.heart_rate = 100.0;
        obs.temperature = 38.5;
        assert!(contributing_factors(&obs).is_empty());

        obs.heart_rate = 60.0;
        obs.temperature = 36.0;
        assert!(contributing_factors(&obs).is_empty());
    }

    #[test]
    fn age_factor_grades_and_caps() {
        let mut obs = healthy();
        obs.age = 70.0;
        let factors = contributing_factors(&obs);
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].name, "Age > 65 years");
        assert!((factors[0].impact - 2.5).abs() < 1e-12);

        obs.age = 120.0;
        assert!((contributing_factors(&obs)[0].impact - 25.0).abs() < 1e-12);

        // The 50-65 band uses its own rule; only one of the pair ever fires.
        obs.age = 55.0;
        let factors = contributing_factors(&obs);
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].name, "Age > 50 years");
        assert!((factors[0].impact - 1.5).abs() < 1e-12);
    }

    #[test]
    fn blood_pressure_uses_the_larger_deviation() {
        let mut obs = healthy();
        obs.systolic_bp = 165.0;
        let factors = contributing_factors(&obs);
        assert_eq!(factors[0].name, "Elevated Blood Pressure");
        assert!((factors[0].impact - 7.5).abs() < 1e-12);

        // Diastolic alone can trigger it.
        obs.systolic_bp = 120.0;
        obs.diastolic_bp = 95.0;
        let factors = contributing_factors(&obs);
        assert_eq!(factors.len(), 1);
        assert!((factors[0].impact - 1.5).abs() < 1e-12);
    }

    #[test]
    fn heart_rate_rules_are_exclusive() {
        let mut obs = healthy();
        obs.heart_rate = 110.0;
        let factors = contributing_factors(&obs);
        assert_eq!(factors[0].name, "Tachycardia");
        assert!((factors[0].impact - 2.0).abs() < 1e-12);

        obs.heart_rate = 50.0;
        let factors = contributing_factors(&obs);
        assert_eq!(factors[0].name, "Bradycardia");
        assert!((factors[0].impact - 2.0).abs() < 1e-12);
    }

    #[test]
    fn temperature_rules_grade_steeply_and_cap() {
        let mut obs = healthy();
        obs.temperature = 39.5;
        let factors = contributing_factors(&obs);
        assert_eq!(factors[0].name, "High Fever");
        assert!((factors[0].impact - 5.0).abs() < 1e-12);

        obs.temperature = 45.0;
        assert!((contributing_factors(&obs)[0].impact - 20.0).abs() < 1e-12);

        obs.temperature = 35.0;
        let factors = contributing_factors(&obs);
        assert_eq!(factors[0].name, "Hypothermia");
        assert!((factors[0].impact - 5.0).abs() < 1e-12);
    }

    #[test]
    fn critical_symptoms_count_beyond_the_primary_slot() {
        let mut obs = healthy();
        obs.symptoms = vec!["Cough".to_string(), "Chest Pain".to_string()];
        let factors = contributing_factors(&obs);
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].name, "Critical Symptoms Present");
        assert!((factors[0].impact - 30.0).abs() < 1e-12);
    }

    #[test]
    fn serious_condition_factor_names_the_condition() {
        let mut obs = healthy();
        obs.pre_existing = "Heart Disease".to_string();
        let factors = contributing_factors(&obs);
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].name, "Pre-existing: Heart Disease");
        assert!((factors[0].impact - 18.0).abs() < 1e-12);
    }

    #[test]
    fn emission_order_is_stable() {
        let obs = Observation {
            age: 72.0,
            gender: "Female".to_string(),
            systolic_bp: 160.0,
            diastolic_bp: 95.0,
            heart_rate: 110.0,
            temperature: 39.0,
            symptoms: vec!["Chest Pain".to_string()],
            pre_existing: "Diabetes".to_string(),
        };
        let factors = contributing_factors(&obs);
        let names: Vec<&str> = factors.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Age > 65 years",
                "Elevated Blood Pressure",
                "Tachycardia",
                "High Fever",
                "Critical Symptoms Present",
                "Pre-existing: Diabetes",
            ]
        );
    }
}
