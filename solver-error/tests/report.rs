use pretty_assertions::assert_eq;
use solver_attrs::ErrorKind;
use solver_error::Error;

#[derive(Debug, ErrorKind)]
#[error(message = "unexpected token", labels = ["this token"], help = "remove it")]
struct Unexpected;

#[derive(Debug, ErrorKind)]
#[error(
    message = format!("`{}` is not allowed as child {} of `{}`", child, position, operator),
    labels = [format!("this `{}`", child), String::new()],
)]
struct Misplaced {
    child: String,
    position: usize,
    operator: String,
}

#[test]
fn display_uses_message_and_help() {
    let error = Error::new(vec![0..1], Unexpected);
    assert_eq!(error.to_string(), "unexpected token (remove it)");
}

#[test]
fn fields_are_in_scope() {
    let error = Error::unspanned(Misplaced {
        child: "Sum".to_string(),
        position: 0,
        operator: "Power".to_string(),
    });
    assert_eq!(error.to_string(), "`Sum` is not allowed as child 0 of `Power`");
    assert_eq!(error.kind.labels(), vec!["this `Sum`".to_string(), String::new()]);
    assert_eq!(error.kind.help(), None);
}

#[test]
fn report_points_at_span() {
    let error = Error::new(vec![4..5], Unexpected);
    let report = error.report_string("input", "1 + ) 2");
    let plain = String::from_utf8(strip_ansi_escapes::strip(report)).unwrap();
    assert!(plain.contains("unexpected token"));
    assert!(plain.contains("this token"));
    assert!(plain.contains("remove it"));
}

#[test]
fn report_without_spans() {
    let error = Error::unspanned(Unexpected);
    let report = error.report_string("input", "");
    let plain = String::from_utf8(strip_ansi_escapes::strip(report)).unwrap();
    assert!(plain.contains("unexpected token"));
}
