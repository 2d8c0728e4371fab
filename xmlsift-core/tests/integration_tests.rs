/// Integration tests for xmlsift-core
///
/// These tests verify:
/// 1. All three strategies return the same records for the same query
/// 2. Field listings agree with the field index
/// 3. Error behavior for missing and malformed documents
/// 4. Export of a result set
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use xmlsift_core::{
    build_fragment, parse_summary, ElementRecord, ExportFormat, Result, SearchFilter,
    SearchStrategy, SiftError, StrategyKind,
};

const LIBRARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- sample catalogue -->
<library xmlns:x="urn:example">
  <book>
    <title>Dune</title>
    <author>Frank Herbert</author>
    <genre>SciFi</genre>
  </book>
  <book>
    <title>Emma</title>
    <author>Jane Austen</author>
    <genre>Romance</genre>
  </book>
  <shelf>
    <book>
      <x:title>The Left Hand of Darkness</x:title>
      <author>Ursula K. Le Guin</author>
      <genre>SciFi</genre>
      <note>Fish &amp; <em>chips</em> <![CDATA[<raw>]]></note>
    </book>
  </shelf>
  <book/>
  <magazine>
    <title>Dune Digest</title>
  </magazine>
</library>
"#;

fn write_doc(xml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(xml.as_bytes()).expect("write temp file");
    file
}

fn run(kind: StrategyKind, path: &Path, tag: &str, filter: &SearchFilter) -> Result<Vec<ElementRecord>> {
    kind.build().search(path, tag, filter)?.collect()
}

/// Run every strategy and assert they agree, returning the shared result
fn run_all(path: &Path, tag: &str, filter: &SearchFilter) -> Vec<ElementRecord> {
    let expected = run(StrategyKind::Tree, path, tag, filter).expect("tree search");
    for kind in [StrategyKind::Streaming, StrategyKind::Query] {
        let actual = run(kind, path, tag, filter).expect("search");
        assert_eq!(actual, expected, "{} disagrees with tree for {:?}", kind, filter);
    }
    expected
}

#[test]
fn test_cross_strategy_equivalence() {
    let file = write_doc(LIBRARY);
    let filters = [
        SearchFilter::new(),
        SearchFilter::new().with_field("genre", "SciFi"),
        SearchFilter::new().with_field("genre", "scifi"),
        SearchFilter::new().with_keyword(Some("austen".to_string())),
        SearchFilter::new().with_keyword(Some("DUNE".to_string())),
        SearchFilter::new().with_keyword(Some("chips <raw>".to_string())),
        SearchFilter::new()
            .with_field("genre", "SciFi")
            .with_keyword(Some("le guin".to_string())),
        SearchFilter::new().with_keyword(Some("it's".to_string())),
    ];

    for tag in ["book", "title", "magazine", "missing"] {
        for filter in &filters {
            run_all(file.path(), tag, filter);
        }
    }
}

#[test]
fn test_all_candidates_in_document_order() {
    let file = write_doc(LIBRARY);
    let records = run_all(file.path(), "book", &SearchFilter::new());

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].fields[0], ("title".to_string(), "Dune".to_string()));
    assert_eq!(records[1].fields[0], ("title".to_string(), "Emma".to_string()));
    // local name, namespace prefix dropped
    assert_eq!(records[2].fields[0].0, "title");
    assert!(records[3].fields.is_empty());
    assert_eq!(records[3].text, "");
}

#[test]
fn test_field_value_is_full_descendant_text() {
    let file = write_doc(LIBRARY);
    let filter = SearchFilter::new().with_field("author", "Ursula K. Le Guin");
    let records = run_all(file.path(), "book", &filter);

    assert_eq!(records.len(), 1);
    let note: Vec<_> = records[0].field_values("note").collect();
    assert_eq!(note, vec!["Fish & chips <raw>"]);
    assert_eq!(
        records[0].text,
        "The Left Hand of Darkness Ursula K. Le Guin SciFi Fish & chips <raw>"
    );
}

#[test]
fn test_keyword_scenario() {
    let file = write_doc(r#"<r><book title="A">x</book><book title="B">y</book></r>"#);
    let filter = SearchFilter::new().with_keyword(Some("y".to_string()));
    let records = run_all(file.path(), "book", &filter);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].node_name, "book");
    assert!(records[0].text.contains('y'));
}

#[test]
fn test_blank_keyword_matches_every_candidate() {
    let file = write_doc(LIBRARY);
    for keyword in [None, Some(String::new()), Some(" \t".to_string())] {
        let filter = SearchFilter::new().with_keyword(keyword);
        assert_eq!(run_all(file.path(), "book", &filter).len(), 4);
    }
}

#[test]
fn test_field_name_without_value_does_not_filter() {
    let file = write_doc(LIBRARY);
    let filter = SearchFilter::new().with_field_name(Some("genre".to_string()));
    assert_eq!(run_all(file.path(), "book", &filter).len(), 4);
}

#[test]
fn test_nested_candidates() {
    let file = write_doc(
        "<menu><item><label>File</label><item><label>Open</label></item></item><item><label>Edit</label></item></menu>",
    );
    let records = run_all(file.path(), "item", &SearchFilter::new());
    let labels: Vec<_> = records.iter().map(|r| r.fields[0].1.as_str()).collect();
    assert_eq!(labels, vec!["File", "Open", "Edit"]);
    assert_eq!(records[0].summary(), "label=File, item=Open");

    let open = run_all(file.path(), "item", &SearchFilter::new().with_field("label", "Open"));
    assert_eq!(open.len(), 1);
}

#[test]
fn test_crlf_is_normalized() {
    let file = write_doc("<r>\r\n<book><title>Line one\r\nLine two</title></book>\r\n</r>");
    let records = run_all(file.path(), "book", &SearchFilter::new());
    assert_eq!(records[0].fields[0].1, "Line one\nLine two");
}

#[test]
fn test_missing_tag_is_empty_not_error() {
    let file = write_doc(LIBRARY);
    assert!(run_all(file.path(), "dvd", &SearchFilter::new()).is_empty());
}

#[test]
fn test_malformed_document_fails_before_any_record() {
    let file = write_doc("<library><book><title>Dune</title>");
    for kind in StrategyKind::all() {
        let outcome: Vec<Result<ElementRecord>> = match kind.build().search(file.path(), "book", &SearchFilter::new()) {
            Ok(iter) => iter.collect(),
            Err(e) => vec![Err(e)],
        };
        assert_eq!(outcome.len(), 1, "{} yielded records", kind);
        match &outcome[0] {
            Err(SiftError::Parse { .. }) => {}
            other => panic!("{}: expected parse error, got {:?}", kind, other),
        }
    }
}

#[test]
fn test_malformed_start_tag_is_parse_error_in_every_strategy() {
    let documents = [
        "<r><book title=A><t>x</t></book></r>",
        r#"<r><book a="1" a="2"><t>x</t></book></r>"#,
        r#"<r><book a="&bogus;"><t>x</t></book></r>"#,
        "<r><book><x:t>x</x:t></book></r>",
    ];
    for xml in documents {
        let file = write_doc(xml);
        for kind in StrategyKind::all() {
            let outcome: Vec<Result<ElementRecord>> = match kind.build().search(file.path(), "book", &SearchFilter::new()) {
                Ok(iter) => iter.collect(),
                Err(e) => vec![Err(e)],
            };
            assert_eq!(outcome.len(), 1, "{} yielded records for {}", kind, xml);
            assert!(
                matches!(&outcome[0], Err(SiftError::Parse { .. })),
                "{}: expected parse error for {}, got {:?}",
                kind,
                xml,
                outcome[0]
            );
        }
    }
}

#[test]
fn test_character_reference_carriage_return_survives() {
    let file = write_doc("<r><book><t>a&#13;b</t></book><book><t>a&#10;b</t></book></r>");
    let records = run_all(file.path(), "book", &SearchFilter::new());
    assert_eq!(records[0].fields[0].1, "a\rb");
    assert_eq!(records[1].fields[0].1, "a\nb");

    let filter = SearchFilter::new().with_field("t", "a\rb");
    let matched = run_all(file.path(), "book", &filter);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].fields[0].1, "a\rb");
}

#[test]
fn test_missing_document_is_not_found() {
    let path = Path::new("/nonexistent/library.xml");
    for kind in StrategyKind::all() {
        let err = kind
            .build()
            .search(path, "book", &SearchFilter::new())
            .err()
            .expect("search should fail");
        assert!(err.is_not_found(), "{}: {}", kind, err);
    }
}

#[test]
fn test_field_names_are_keys_of_field_values() {
    let file = write_doc(LIBRARY);
    for kind in StrategyKind::all() {
        let strategy = kind.build();
        let names = strategy.list_field_names(file.path(), "book").unwrap();
        let values = strategy.list_field_values(file.path(), "book").unwrap();

        assert!(names.iter().all(|n| values.values_for(n).is_some()));
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["author", "genre", "note", "title"]
        );
        assert_eq!(values.values_for("genre").map(|v| v.len()), Some(2));
    }
}

#[test]
fn test_field_index_matches_across_strategies() {
    let file = write_doc(LIBRARY);
    let expected = StrategyKind::Tree.build().list_field_values(file.path(), "book").unwrap();
    for kind in [StrategyKind::Streaming, StrategyKind::Query] {
        let actual = kind.build().list_field_values(file.path(), "book").unwrap();
        assert_eq!(actual, expected, "{}", kind);
    }
}

#[test]
fn test_early_abandon_releases_document() {
    let file = write_doc(LIBRARY);
    for kind in StrategyKind::all() {
        let mut iter = kind.build().search(file.path(), "book", &SearchFilter::new()).unwrap();
        assert!(iter.next().is_some());
        drop(iter);
    }
    // the file can still be removed once every iterator is gone
    file.close().expect("temp file closes");
}

#[test]
fn test_summary_round_trip_from_search() {
    let file = write_doc(LIBRARY);
    let records = run_all(file.path(), "book", &SearchFilter::new().with_field("title", "Dune"));
    let record = &records[0];
    assert_eq!(parse_summary(&record.summary()), record.fields);
}

#[test]
fn test_export_fragment_of_results() {
    let file = write_doc(LIBRARY);
    let records = run_all(file.path(), "book", &SearchFilter::new().with_field("genre", "SciFi"));
    let fragment = build_fragment(&records);

    let exported = write_doc(&fragment);
    // the fragment is itself searchable with the same semantics
    let reloaded = run_all(exported.path(), "book", &SearchFilter::new());
    assert_eq!(
        reloaded.iter().map(|r| &r.fields).collect::<Vec<_>>(),
        records.iter().map(|r| &r.fields).collect::<Vec<_>>()
    );

    assert!("csv".parse::<ExportFormat>().is_err());
}
