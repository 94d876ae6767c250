use anyhow::anyhow;
use ironstream::error::{MultiError, StreamingError, merge_errors};
use pretty_assertions::assert_eq;

#[test]
fn nothing_to_merge_is_success() {
    assert!(merge_errors([None, None, None]).is_ok());
    assert!(merge_errors(Vec::<Option<anyhow::Error>>::new()).is_ok());
}

#[test]
fn single_error_is_returned_unchanged() {
    let err = merge_errors([None, Some(anyhow::Error::from(StreamingError::config("no codec"))), None]).unwrap_err();
    assert!(err.downcast_ref::<MultiError>().is_none());
    assert!(matches!(
        err.downcast_ref::<StreamingError>(),
        Some(StreamingError::Config(msg)) if msg == "no codec"
    ));
}

#[test]
fn several_errors_render_as_a_list() {
    let err = merge_errors([Some(anyhow!("first")), None, Some(anyhow!("second"))]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "multiple errors occurred:\n - first\n - second"
    );
}

#[test]
fn composites_are_flattened_when_merged() {
    let inner = merge_errors([Some(anyhow!("a")), Some(anyhow!("b"))]).unwrap_err();
    let err = merge_errors([Some(inner), Some(anyhow!("c"))]).unwrap_err();
    let multi = err.downcast_ref::<MultiError>().expect("composite");
    let messages: Vec<String> = multi.errors().iter().map(ToString::to_string).collect();
    assert_eq!(messages, vec!["a", "b", "c"]);
}

#[test]
fn collapsing_a_composite() {
    let mut multi = MultiError::new();
    assert!(multi.is_empty());
    multi.push(anyhow!("only"));
    let err = multi.into_result().unwrap_err();
    assert_eq!(err.to_string(), "only");
}
