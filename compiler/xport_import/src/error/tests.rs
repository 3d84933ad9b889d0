use pretty_assertions::assert_eq;

use super::*;

#[test]
fn not_found_quotes_identity() {
    let err = ImportError::NotFound {
        id: "example.com/missing".to_owned(),
    };
    assert_eq!(err.to_string(), r#"can't find import: "example.com/missing""#);
    assert_eq!(err.kind(), ImportErrorKind::NotFound);
}

#[test]
fn obsolete_formats_ask_for_recompile() {
    let text = ImportError::ObsoleteFormat {
        path: "fmt".to_owned(),
        format: RetiredFormat::Text,
    };
    let binary = ImportError::ObsoleteFormat {
        path: "fmt".to_owned(),
        format: RetiredFormat::Binary,
    };

    assert_eq!(
        text.to_string(),
        r#"import "fmt": old export format no longer supported (recompile library)"#
    );
    assert_eq!(
        binary.to_string(),
        r#"import "fmt": old binary export format no longer supported (recompile library)"#
    );
}

#[test]
fn in_file_prefixes_location_and_keeps_kind() {
    let err = ImportError::from(io::Error::other("disk on fire"))
        .in_file(Path::new("/tmp/x.a"));

    assert_eq!(err.to_string(), "/tmp/x.a: disk on fire");
    assert_eq!(err.kind(), ImportErrorKind::Io);
    assert_eq!(err.location(), Some(Path::new("/tmp/x.a")));
}

#[test]
fn unknown_header_is_escaped() {
    let err = ImportError::UnknownFormat {
        header: "$$X\n".to_owned(),
    };
    assert_eq!(err.to_string(), r#"unknown export data header: "$$X\n""#);
}

#[test]
fn decode_error_passes_message_through() {
    let err = ImportError::from(DecodeError::new("bad index table"));
    assert_eq!(err.to_string(), "bad index table");
    assert_eq!(err.kind(), ImportErrorKind::Decode);
    assert!(err.location().is_none());
}

#[test]
fn decode_error_from_io_keeps_source() {
    let err = DecodeError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "short read"));
    assert_eq!(err.message(), "short read");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn in_source_names_identity_not_a_file() {
    let err = ImportError::from(io::Error::other("stream closed")).in_source("mem/pkg");

    assert_eq!(err.to_string(), "mem/pkg: stream closed");
    assert_eq!(err.kind(), ImportErrorKind::Io);
    assert_eq!(err.source_id(), Some("mem/pkg"));
    assert!(err.location().is_none());
}
