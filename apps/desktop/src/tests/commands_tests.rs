use super::*;

#[test]
fn blank_lines_are_ignored() {
    assert_eq!(parse_command("   ").expect("parse"), None);
}

#[test]
fn parses_positions_as_one_based() {
    assert_eq!(
        parse_command("remove 2").expect("parse"),
        Some(ConsoleCommand::Remove { index: 1 })
    );
    assert_eq!(
        parse_command("cite 3 1").expect("parse"),
        Some(ConsoleCommand::Cite { turn: 2, index: 0 })
    );
    assert_eq!(
        parse_command("rm 0").expect_err("zero"),
        CommandParseError::InvalidNumber("0".to_string())
    );
    assert_eq!(
        parse_command("cite 3").expect_err("missing"),
        CommandParseError::MissingArgument("citation number")
    );
}

#[test]
fn keeps_question_and_path_text_intact() {
    assert_eq!(
        parse_command("ask What was the trend in Creatinine levels?").expect("parse"),
        Some(ConsoleCommand::Ask {
            question: "What was the trend in Creatinine levels?".to_string()
        })
    );
    assert_eq!(
        parse_command("ADD  records/lab results.pdf ").expect("parse"),
        Some(ConsoleCommand::Add {
            path: PathBuf::from("records/lab results.pdf")
        })
    );
    assert_eq!(
        parse_command("ask").expect("parse"),
        Some(ConsoleCommand::Ask {
            question: String::new()
        })
    );
}

#[test]
fn rejects_unknown_verbs_and_missing_paths() {
    assert_eq!(
        parse_command("upload a.pdf").expect_err("unknown"),
        CommandParseError::Unknown("upload".to_string())
    );
    assert_eq!(
        parse_command("add").expect_err("missing"),
        CommandParseError::MissingArgument("path")
    );
}
