#[cfg(test)]
mod tests {

    use std::error::Error;

    use ron;
    use rs_wordle_deduction::feedback::*;
    use rs_wordle_deduction::inference::InferredMarkupFeedbackProvider;
    use rs_wordle_deduction::*;

    #[test]
    fn constraint_serde() -> Result<(), Box<dyn Error>> {
        let constraint = Constraint::from_secret("AABB", "ABCD")?;

        let ser = ron::to_string(&constraint)?;
        let deser = ron::from_str::<Constraint>(&ser)?;

        assert_eq!(deser, constraint);
        assert_eq!(deser.exact(), 1);
        assert_eq!(deser.included(), 1);
        Ok(())
    }

    #[test]
    fn constraint_deserialize_checks_markup_length() {
        let ser = r#"(candidate: "ABCD", markup: [Exact, No])"#;

        assert!(ron::from_str::<Constraint>(ser).is_err());
    }

    #[test]
    fn game_settings_serde() -> Result<(), Box<dyn Error>> {
        let settings = GameSettings {
            code_length: 4,
            alphabet: vec!['A', 'B', 'C', 'D'],
            guess_policy: ConstraintPolicy::Positive,
            feedback_policy: FeedbackPolicy::CountIncluded,
            max_occurrences: Some(2),
            seed: 42,
            ..GameSettings::default()
        };

        let ser = ron::to_string(&settings)?;
        let deser = ron::from_str::<GameSettings>(&ser)?;

        assert_eq!(deser, settings);
        Ok(())
    }

    #[test]
    fn game_settings_missing_fields_use_defaults() -> Result<(), Box<dyn Error>> {
        let settings = ron::from_str::<GameSettings>("(code_length: 4, shuffle: true)")?;

        assert_eq!(settings.code_length, 4);
        assert!(settings.shuffle);
        assert_eq!(settings.alphabet, GameSettings::default().alphabet);
        assert_eq!(settings.solution_policy, ConstraintPolicy::All);
        Ok(())
    }

    #[test]
    fn feedback_serde() -> Result<(), Box<dyn Error>> {
        let provider = InferredMarkupFeedbackProvider::new(&['A', 'B', 'C', 'D'], 4)?;
        let constraints = [Constraint::from_secret("AABB", "ABCD")?];
        let feedback = provider.get_feedback(FeedbackPolicy::CharacterMarkup, &constraints)?;
        let hints =
            provider.get_character_feedback(FeedbackPolicy::CharacterMarkup, &constraints)?;

        let feedback_ser = ron::to_string(&feedback)?;
        let hint_ser = ron::to_string(&hints[&'B'])?;

        assert_eq!(ron::from_str::<Feedback>(&feedback_ser)?, feedback);
        assert_eq!(ron::from_str::<CharacterFeedback>(&hint_ser)?, hints[&'B']);
        Ok(())
    }

    #[test]
    fn occurrence_range_serde() -> Result<(), Box<dyn Error>> {
        let range = OccurrenceRange::new(1, 3).ok_or("empty range")?;

        let ser = ron::to_string(&range)?;

        assert_eq!(ron::from_str::<OccurrenceRange>(&ser)?, range);
        Ok(())
    }

    #[test]
    fn occurrence_range_deserialize_rejects_inverted_bounds() {
        assert!(ron::from_str::<OccurrenceRange>("(min: 3, max: 1)").is_err());
        assert!(ron::from_str::<OccurrenceRange>("(min: 2, max: 2)").is_ok());
    }

    #[test]
    fn candidates_serde() -> Result<(), Box<dyn Error>> {
        let candidates = Candidates::single("ABCD".into());

        let ser = ron::to_string(&candidates)?;

        assert_eq!(ron::from_str::<Candidates>(&ser)?, candidates);
        Ok(())
    }
}
