//! Directory matching tests: loading, automatic matching over a batch,
//! suggestions, and manual resolution.

use anyhow::Result;
use holerite::{
    Directory, DirectoryMatcher, Employee, HoleriteError, MatchConfig, MatchStats, MatchStatus,
    NameExtractor, PageText, PayslipBatch, Settings, TieBreak,
};
use tempfile::TempDir;

mod common;
use common::*;

fn sample_matcher() -> DirectoryMatcher {
    let directory = Directory::from_employees(sample_employees()).unwrap();
    DirectoryMatcher::new(directory, MatchConfig::default())
}

mod loading {
    use super::*;

    #[test]
    fn test_load_json_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = write_directory(temp_dir.path())?;
        let directory = Directory::load(&path)?;
        assert_eq!(directory.len(), sample_employees().len());
        Ok(())
    }

    #[test]
    fn test_records_without_contact_are_dropped() -> Result<()> {
        let directory = Directory::from_json_str(
            r#"[
                {"name": "JOÃO SILVA", "email": "j@x.com"},
                {"name": "SEM CONTATO"},
                {"name": "", "email": "orphan@x.com"},
                {"name": "BRUNA LIMA", "slack_id": "U088MU33XRC"}
            ]"#,
        )?;
        let names: Vec<&str> = directory.employees().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["JOÃO SILVA", "BRUNA LIMA"]);
        Ok(())
    }

    #[test]
    fn test_unusable_directories_fail() {
        let err = Directory::from_json_str(r#"[{"name": "SEM CONTATO"}]"#).unwrap_err();
        assert!(matches!(err, HoleriteError::EmptyDirectory { dropped: 1 }));

        let err = Directory::from_json_str("[]").unwrap_err();
        assert!(matches!(err, HoleriteError::EmptyDirectory { dropped: 0 }));

        let err = Directory::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, HoleriteError::Json(_)));

        let err = Directory::load(std::path::Path::new("/nonexistent/employees.json")).unwrap_err();
        assert!(matches!(err, HoleriteError::Io { .. }));
    }

    #[test]
    fn test_spreadsheet_rows() -> Result<()> {
        let headers = ["Nome", "Email", "SlackId"];
        let rows = vec![
            vec!["Amanda Santos Costa", "amanda@example.com", ""],
            vec!["Hugo Castro Lopes", "", ""],
            vec!["Yuri Castro Gomes", "", "U094A8J5R2L"],
        ];
        let directory = Directory::from_table(&headers, &rows)?;
        assert_eq!(directory.len(), 2);

        let matcher = DirectoryMatcher::new(directory, MatchConfig::default());
        let result = matcher.match_page(0, 1, Some("YURI CASTRO GOMES"));
        assert_eq!(
            result.employee.and_then(|e| e.slack_id).as_deref(),
            Some("U094A8J5R2L")
        );
        Ok(())
    }
}

mod automatic {
    use super::*;

    #[test]
    fn test_exact_match_ignores_accents() {
        let matcher = DirectoryMatcher::new(
            Directory::from_employees(vec![Employee::new("JOÃO SILVA").with_email("j@x.com")])
                .unwrap(),
            MatchConfig::default(),
        );
        let result = matcher.match_page(0, 1, Some("JOAO SILVA"));
        assert_matched(&result, "JOÃO SILVA");
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_missing_middle_word_at_threshold() {
        // 3 of 4 words overlap: 60, exactly the acceptance threshold.
        let result = sample_matcher().match_page(0, 1, Some("ANA LUIZA SANTOS"));
        assert_matched(&result, "Ana Luiza dos Santos");
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_stricter_threshold_rejects() {
        let directory = Directory::from_employees(sample_employees()).unwrap();
        let settings = Settings::from_json_str(r#"{"matching": {"accept_threshold": 61}}"#).unwrap();
        let matcher = DirectoryMatcher::new(directory, settings.matching);
        let result = matcher.match_page(0, 1, Some("ANA LUIZA SANTOS"));
        assert_eq!(result.status, MatchStatus::NotFound);
        assert_result_consistent(&result, 61);
    }

    #[test]
    fn test_batch_matches_never_score_below_threshold() -> Result<()> {
        let pages = vec![
            PageText::new(1, payslip(20, "AMANDA SANTOS COSTA")),
            PageText::new(2, payslip(22, "ANA LUIZA SANTOS")),
            PageText::new(3, payslip(45, "LEIDIANE SOUZA")),
        ];
        let batch = PayslipBatch::extract(&pages, &NameExtractor::default())?;

        for threshold in [60, 61, 90, 100] {
            let config = MatchConfig {
                accept_threshold: threshold,
                ..Default::default()
            };
            let directory = Directory::from_employees(sample_employees())?;
            let matcher = DirectoryMatcher::new(directory, config);
            for result in batch.match_directory(&matcher) {
                assert_result_consistent(&result, threshold);
            }
        }
        Ok(())
    }

    #[test]
    fn test_ambiguous_name_with_reject_policy() {
        let directory = Directory::from_employees(vec![
            Employee::new("MARIA TATIANE BASTO CARDOSO").with_email("mt1@x.com"),
            Employee::new("MARIA TATIANE OLIVEIRA SANTOS").with_email("mt2@x.com"),
        ])
        .unwrap();
        let config = MatchConfig {
            accept_threshold: 40,
            tie_break: TieBreak::RejectAmbiguous,
            ..Default::default()
        };
        let matcher = DirectoryMatcher::new(directory, config);
        let result = matcher.match_page(0, 1, Some("TATIANE MARIA"));
        assert_eq!(result.status, MatchStatus::NotFound);
        assert_eq!(matcher.suggest_for(&result).len(), 0);
    }

    #[test]
    fn test_batch_against_directory() -> Result<()> {
        let pages = vec![
            PageText::new(1, payslip(20, "AMANDA SANTOS COSTA")),
            PageText::new(2, birthday_page()),
            PageText::new(3, payslip(21, "JOAO SILVA")),
            PageText::new(4, payslip(33, "PEDRO LUCAS ROCHA")),
            PageText::new(5, payslip(20, "AMANDA SANTOS COSTA")),
        ];
        let batch = PayslipBatch::extract(&pages, &NameExtractor::default())?;
        let matcher = sample_matcher();
        let results = batch.match_directory(&matcher);

        assert_eq!(results.len(), 5);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.page_index, i);
            assert_eq!(result.page_number, i + 1);
            assert_result_consistent(result, MatchConfig::default().accept_threshold);
        }

        assert_matched(&results[0], "Amanda Santos Costa");
        assert_eq!(results[1].status, MatchStatus::NoName);
        assert_matched(&results[2], "João Silva");
        assert_eq!(results[3].status, MatchStatus::NotFound);
        assert_matched(&results[4], "Amanda Santos Costa");

        let stats = MatchStats::from_results(&results);
        assert_eq!(stats.matched, 3);
        assert_eq!(stats.unresolved(), 2);
        Ok(())
    }
}

mod manual {
    use super::*;

    #[test]
    fn test_typo_gets_suggestion_then_manual_assignment() {
        let matcher = sample_matcher();
        let mut result = matcher.match_page(0, 1, Some("JOAO SILVE"));
        assert_eq!(result.status, MatchStatus::NotFound);

        let suggestions = matcher.suggest_for(&result);
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= 5);
        assert_eq!(suggestions[0].employee.name, "João Silva");
        assert_eq!(suggestions[0].similarity, 90);

        result.assign(suggestions[0].employee.clone());
        assert_eq!(result.status, MatchStatus::Manual);
        assert_eq!(result.score, 100);
        assert!(result.is_deliverable());
        assert_result_consistent(&result, MatchConfig::default().accept_threshold);
    }

    #[test]
    fn test_no_name_page_assigned_by_lookup() {
        let matcher = sample_matcher();
        let mut result = matcher.match_page(1, 2, None);
        assert!(matcher.suggest_for(&result).is_empty());

        let employee = matcher.lookup("leidiane souza").cloned().unwrap();
        result.assign(employee);
        assert_eq!(
            result.employee.as_ref().and_then(|e| e.email.as_deref()),
            Some("leidiane@example.com")
        );

        result.clear();
        assert_eq!(result.status, MatchStatus::NoName);
        assert_result_consistent(&result, MatchConfig::default().accept_threshold);
    }
}
