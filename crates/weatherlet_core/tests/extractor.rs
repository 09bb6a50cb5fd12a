use weatherlet_core::{extract_first_group, matches, Pattern};

#[test]
fn missing_arguments_yield_none() {
    assert_eq!(extract_first_group(None, Some("x")), None);
    assert_eq!(extract_first_group(Some("x"), None), None);
    assert_eq!(extract_first_group(Some(""), Some("x")), None);
    assert_eq!(extract_first_group(Some("(x)"), Some("")), None);
}

#[test]
fn extracts_first_group() {
    assert_eq!(
        extract_first_group(Some(r"Temp: (\d+)F"), Some("Temp: 72F")),
        Some("72".to_string())
    );
}

#[test]
fn only_first_match_is_used() {
    let text = "Temp: 72F\nTemp: 65F\n";
    assert_eq!(
        extract_first_group(Some(r"Temp: (\d+)F"), Some(text)),
        Some("72".to_string())
    );
}

#[test]
fn line_anchors_work_inside_text() {
    let text = "Station Report\nHumidity: 40%\nPressure: 1012 hPa\n";
    assert_eq!(
        extract_first_group(Some(r"^Pressure: (.+)$"), Some(text)),
        Some("1012 hPa".to_string())
    );
    assert!(matches(Some(r"^Station Report$"), Some(text)));
}

#[test]
fn no_match_yields_none() {
    assert_eq!(extract_first_group(Some(r"Wind: (\w+)"), Some("Temp: 72F")), None);
}

#[test]
fn pattern_without_group_yields_none() {
    assert_eq!(extract_first_group(Some(r"Temp: \d+"), Some("Temp: 72")), None);
    assert_eq!(extract_first_group(Some(r"Temp: (\d+)?x"), Some("Temp: x")), None);
}

#[test]
fn invalid_pattern_is_no_match_not_a_fault() {
    assert_eq!(extract_first_group(Some(r"Temp: (\d+"), Some("Temp: 72")), None);
    assert!(!matches(Some(r"(unclosed"), Some("(unclosed")));

    let pattern = Pattern::compile(r"[bad").expect("non-empty source");
    assert!(!pattern.is_valid());
    assert_eq!(pattern.first_group("[bad"), None);
    assert_eq!(pattern.source(), "[bad");
}

#[test]
fn matches_is_false_for_missing_arguments() {
    assert!(!matches(None, Some("Station Offline")));
    assert!(!matches(Some("Offline"), None));
    assert!(matches(Some("Offline"), Some("Station Offline")));
}

#[test]
fn empty_source_compiles_to_nothing() {
    assert_eq!(Pattern::compile(""), None);
    assert_eq!(Pattern::compile_opt(None), None);
}
