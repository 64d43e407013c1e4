use preserve::config::LogLevel;
use std::str::FromStr;

#[test]
fn parse_common_levels_case_insensitive() {
    assert_eq!(LogLevel::parse("quiet"), Some(LogLevel::Quiet));
    assert_eq!(LogLevel::parse("ERROR"), Some(LogLevel::Quiet));
    assert_eq!(LogLevel::parse("Normal"), Some(LogLevel::Normal));
    assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
    assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Debug));
    assert_eq!(LogLevel::parse("loud"), None);
}

#[test]
fn display_roundtrips_with_fromstr() {
    for lvl in [LogLevel::Quiet, LogLevel::Normal, LogLevel::Info, LogLevel::Debug] {
        let s = lvl.to_string();
        assert_eq!(LogLevel::from_str(&s).unwrap(), lvl, "roundtrip failed for {s}");
    }
    assert!(LogLevel::from_str("").is_err());
}
