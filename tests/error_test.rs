use std::io;
use std::path::PathBuf;

use g8gen::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::UnknownFilter { name: "shout".to_string() };
    assert_eq!(err.to_string(), "Unknown filter 'shout'.");

    let err = Error::UnresolvedField { field: "org".to_string() };
    assert_eq!(err.to_string(), "Field 'org' is referenced by the template but has no value.");
}

#[test]
fn test_in_file_wraps_once() {
    let err = Error::TargetNameError.in_file("a.txt").in_file("b.txt");
    match err {
        Error::ProcessError { path, source } => {
            assert_eq!(path, PathBuf::from("a.txt"));
            assert!(matches!(*source, Error::TargetNameError));
        }
        other => panic!("Expected ProcessError, got {other:?}"),
    }
}
