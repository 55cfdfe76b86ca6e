use pretty_assertions::assert_eq;

use exparse::parse::{Cursor, OutOfRange};

#[test]
fn test_advance_returns_new_cursor() {
    let items = ['a', 'b', 'c'];
    let start = Cursor::new(&items);
    let next = start.advance();

    assert_eq!(start.current(), Ok(&'a'));
    assert_eq!(next.current(), Ok(&'b'));
    assert_eq!(next.remaining(), &['b', 'c']);
}

#[test]
fn test_advance_past_end() {
    let items = [1, 2];
    let cursor = Cursor::new(&items).advance_by(5);

    assert!(cursor.is_exhausted());
    assert_eq!(cursor.peek(), None);
    assert!(cursor.remaining().is_empty());
    assert_eq!(cursor.current(), Err(OutOfRange { pos: 5, len: 2 }));
}

#[test]
fn test_empty_sequence() {
    let cursor = Cursor::<u8>::new(&[]);

    assert!(cursor.is_empty());
    assert!(cursor.is_exhausted());
    assert_eq!(
        cursor.current().unwrap_err().to_string(),
        "cannot access item 0 of a sequence of length 0"
    );
}
