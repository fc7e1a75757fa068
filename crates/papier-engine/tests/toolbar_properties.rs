use papier_engine::{
    EditBuffer, HeadingLevel, InvariantViolation, Transformation, transform, transform_action,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const TEXTS: &[&str] = &[
    "",
    "Hello",
    "Hello ",
    "one\ntwo\nthree",
    "# Title\n\nbody text\n",
    "- item\n- other",
    "naïve café ☕",
];

fn all_transformations() -> Vec<Transformation> {
    let mut all = vec![
        Transformation::Bold,
        Transformation::Italic,
        Transformation::ListToggle,
        Transformation::Link,
        Transformation::Code,
    ];
    all.extend((1..=6).filter_map(HeadingLevel::new).map(Transformation::Heading));
    all
}

/// Every char boundary in `text`, including the end
fn boundaries(text: &str) -> Vec<usize> {
    (0..=text.len()).filter(|&i| text.is_char_boundary(i)).collect()
}

#[test]
fn bold_on_empty_selection_inserts_placeholder_everywhere() {
    for text in TEXTS {
        for at in boundaries(text) {
            let result = transform(text, at..at, Transformation::Bold).unwrap();
            let expected = format!("{}**bold text**{}", &text[..at], &text[at..]);
            assert_eq!(result.text, expected);
            assert_eq!(result.caret, at + 13);
        }
    }
}

#[test]
fn bold_wraps_exactly_at_selection_bounds() {
    for text in TEXTS {
        let points = boundaries(text);
        for &start in &points {
            for &end in points.iter().filter(|&&end| end > start) {
                let result = transform(text, start..end, Transformation::Bold).unwrap();
                assert_eq!(result.text.len(), text.len() + 4);
                assert_eq!(result.caret, end + 4);
                assert_eq!(&result.text[..start], &text[..start]);
                assert_eq!(&result.text[start..start + 2], "**");
                assert_eq!(&result.text[end + 2..end + 4], "**");
                assert_eq!(&result.text[end + 4..], &text[end..]);
            }
        }
    }
}

#[test]
fn every_result_caret_is_a_valid_position() {
    for text in TEXTS {
        let points = boundaries(text);
        for &start in &points {
            for &end in points.iter().filter(|&&end| end >= start) {
                for t in all_transformations() {
                    let result = transform(text, start..end, t).unwrap();
                    assert!(
                        result.caret <= result.text.len()
                            && result.text.is_char_boundary(result.caret),
                        "{t:?} on {text:?} at {start}..{end} gave caret {}",
                        result.caret
                    );
                }
            }
        }
    }
}

#[rstest]
#[case(0)]
#[case(2)]
#[case(5)]
fn heading_two_on_plain_line(#[case] at: usize) {
    let result = transform("Hello", at..at, Transformation::Heading(HeadingLevel::new(2).unwrap()))
        .unwrap();
    assert_eq!(result.text, "## Hello");
}

#[test]
fn heading_three_replaces_existing_prefix() {
    let result = transform(
        "## Hello",
        5..5,
        Transformation::Heading(HeadingLevel::new(3).unwrap()),
    )
    .unwrap();
    assert_eq!(result.text, "### Hello");
    let hashes = result.text.split(' ').next().unwrap();
    assert_eq!(hashes, "###");
}

#[test]
fn list_toggle_twice_restores_line() {
    for text in ["Hello", "one\ntwo\nthree", "", "  indented", "-not a list"] {
        for at in boundaries(text) {
            let on = transform(text, at..at, Transformation::ListToggle).unwrap();
            let off = transform(&on.text, on.caret..on.caret, Transformation::ListToggle).unwrap();
            assert_eq!(off.text, text);
            assert_eq!(off.caret, at);
        }
    }
}

#[test]
fn code_chooses_block_or_inline() {
    let block = transform("a\nb", 0..3, Transformation::Code).unwrap();
    assert_eq!(block.text, "```\na\nb\n```");

    let inline = transform("a", 0..1, Transformation::Code).unwrap();
    assert_eq!(inline.text, "`a`");

    let empty = transform("", 0..0, Transformation::Code).unwrap();
    assert_eq!(empty.text, "`code`");
}

#[test]
fn link_on_empty_selection() {
    let result = transform("Hello ", 6..6, Transformation::Link).unwrap();
    assert_eq!(result.text, "Hello [link text](url)");
    assert_eq!(result.caret, 6 + 1 + 9 + 2);
}

#[test]
fn unrecognized_action_returns_original() {
    for text in TEXTS {
        let end = text.len();
        let result = transform_action(text, 0..end, "spoiler", None).unwrap();
        assert_eq!(result.text, *text);
        assert_eq!(result.caret, end);
    }
}

#[test]
fn out_of_range_selection_fails_for_every_variant() {
    let text = "Hello";
    for t in all_transformations() {
        let err = transform(text, 6..6, t).unwrap_err();
        assert!(
            matches!(err, InvariantViolation::OutOfBounds { .. }),
            "{t:?} gave {err:?}"
        );
    }
    for tag in ["bold", "italic", "heading", "list", "link", "code", "unknown"] {
        let err = transform_action(text, 6..6, tag, Some(1)).unwrap_err();
        assert!(matches!(err, InvariantViolation::OutOfBounds { .. }));
    }
}

#[test]
fn toolbar_session_round_trip() {
    // Simulates a user building a small document through the toolbar
    let mut buffer = EditBuffer::with_caret("Shopping", 0).unwrap();

    buffer = buffer
        .apply(Transformation::Heading(HeadingLevel::new(1).unwrap()))
        .into_buffer()
        .unwrap();
    assert_eq!(buffer.text(), "# Shopping");

    let mut text = buffer.into_text();
    text.push_str("\nmilk");
    let caret = text.len();

    let buffer = EditBuffer::with_caret(text, caret).unwrap();
    let buffer = buffer
        .apply(Transformation::ListToggle)
        .into_buffer()
        .unwrap();
    assert_eq!(buffer.text(), "# Shopping\n- milk");
    assert_eq!(buffer.selection(), 17..17);

    let start = buffer.text().find("milk").unwrap();
    let buffer = EditBuffer::new(buffer.into_text(), start..start + 4).unwrap();
    let result = buffer.apply(Transformation::Bold);
    assert_eq!(result.text, "# Shopping\n- **milk**");
    assert_eq!(result.caret, result.text.len());
}
