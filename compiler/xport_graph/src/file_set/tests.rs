use pretty_assertions::assert_eq;

use super::*;

#[test]
fn bases_leave_room_for_end_offset() {
    let mut files = FileSet::new();

    assert_eq!(files.add_file("a.go", 10), 1);
    assert_eq!(files.add_file("b.go", 5), 12);
    assert_eq!(files.add_file("c.go", 0), 18);
    assert_eq!(files.len(), 3);
}

#[test]
fn position_zero_is_no_position() {
    let mut files = FileSet::new();
    files.add_file("a.go", 10);

    assert_eq!(files.position(0), None);
    assert_eq!(files.file(0), None);
}

#[test]
fn positions_resolve_to_owning_file() {
    let mut files = FileSet::new();
    files.add_file("a.go", 10);
    files.add_file("b.go", 5);

    assert_eq!(
        files.position(1),
        Some(Position {
            file: "a.go".to_owned(),
            offset: 0
        })
    );
    assert_eq!(
        files.position(11),
        Some(Position {
            file: "a.go".to_owned(),
            offset: 10
        })
    );
    assert_eq!(
        files.position(14),
        Some(Position {
            file: "b.go".to_owned(),
            offset: 2
        })
    );
    assert_eq!(files.file(17), Some("b.go"));
}

#[test]
fn positions_past_last_file_are_unknown() {
    let mut files = FileSet::new();
    files.add_file("a.go", 3);

    assert_eq!(files.position(5), None);
    assert!(FileSet::new().is_empty());
}
