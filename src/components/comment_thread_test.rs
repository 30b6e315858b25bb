use super::*;

#[test]
fn parse_initial_reads_flat_list() {
    let raw = r#"[
        {"commentid":2,"userid":5,"username":"ana","content":"Lovely","lastedit":"2024-05-01 10:00:00","parentid":null},
        {"commentid":3,"userid":6,"content":"Agreed","parentid":2}
    ]"#;
    let comments = parse_initial(raw);
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].parentid, Some(2));
    assert_eq!(comments[1].display_name(), "User 6");
}

#[test]
fn parse_initial_tolerates_garbage() {
    assert!(parse_initial("not json").is_empty());
    assert!(parse_initial("").is_empty());
}

#[test]
fn accept_draft_drops_blank_and_overlong() {
    assert_eq!(accept_draft("  hi  ").as_deref(), Some("hi"));
    assert_eq!(accept_draft("   "), None);
    assert_eq!(accept_draft(&"x".repeat(2000)), None);
}
