use super::*;

#[test]
fn string_list_drops_blanks_and_bad_json() {
    assert_eq!(
        parse_string_list(Some(r#"["2 eggs", " ", "1 cup milk"]"#)),
        vec!["2 eggs".to_owned(), "1 cup milk".to_owned()]
    );
    assert!(parse_string_list(Some("{oops")).is_empty());
    assert!(parse_string_list(None).is_empty());
}

#[test]
fn host_recipe_id_requires_positive_integer() {
    assert_eq!(host_recipe_id(Some(" 12 ")), Some(12));
    assert_eq!(host_recipe_id(Some("0")), None);
    assert_eq!(host_recipe_id(Some("abc")), None);
    assert_eq!(host_recipe_id(None), None);
}
