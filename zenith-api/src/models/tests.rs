#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use super::super::experience::*;
    use chrono::Utc;

    #[test]
    fn test_source_serialization() {
        assert_eq!(serde_json::to_string(&Source::Query).unwrap(), "\"query\"");
        assert_eq!(
            serde_json::to_string(&Source::Recommend).unwrap(),
            "\"recommend\""
        );
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!("query".parse::<Source>().unwrap(), Source::Query);
        assert_eq!("recommend".parse::<Source>().unwrap(), Source::Recommend);
        assert!("Query".parse::<Source>().is_err());
        assert!("".parse::<Source>().is_err());
    }

    #[test]
    fn test_experience_from_new_starts_without_feedback() {
        let now = Utc::now();
        let record = NewExperience::new(Source::Query, "cpu?", "METRIC: up", "Success");
        let experience = Experience::from_new(7, now, record);

        assert_eq!(experience.id, 7);
        assert_eq!(experience.timestamp, now);
        assert_eq!(experience.user_feedback, 0);
        assert_eq!(experience.generated_query, "METRIC: up");
    }

    #[test]
    fn test_experience_serialization() {
        let record = NewExperience::new(Source::Recommend, "p", "", "Success");
        let experience = Experience::from_new(1, Utc::now(), record);

        let json = serde_json::to_value(&experience).unwrap();
        assert_eq!(json["source"], "recommend");
        assert_eq!(json["generated_query"], "");
        assert_eq!(json["user_feedback"], 0);
        assert!(json["timestamp"].is_string());
    }
}
