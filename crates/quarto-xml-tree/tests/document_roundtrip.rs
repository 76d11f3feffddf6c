/*
 * document_roundtrip.rs
 *
 * Loading, querying and saving whole documents.
 */

use pretty_assertions::assert_eq;
use quarto_xml_tree::{Document, Error, NodeKind, TreeConfig, WILDCARD};
use serde::Deserialize;
use tempfile::TempDir;

fn load(text: &str) -> Document {
    let mut doc = Document::new();
    doc.load_str(text).expect("document should load");
    doc
}

#[test]
fn simple_document_round_trips() {
    let mut doc = load(r#"<a><b/><c x="1">hi</c></a>"#);
    let c = doc.select_node("", "c").expect("c exists");
    assert_eq!(c.attribute("", "x"), Some("1"));
    assert_eq!(c.value(), "hi");

    doc.save_declaration = false;
    assert_eq!(doc.save_string(), r#"<a><b /><c x="1">hi</c></a>"#);
}

#[test]
fn declaration_sets_standalone_without_creating_a_node() {
    let doc = load(r#"<?xml version="1.0" standalone="yes"?><r/>"#);
    assert_eq!(doc.standalone, "yes");
    let children: Vec<_> = doc.root().children().collect();
    assert_eq!(children.len(), 1);
    assert!(children[0].is_element());
}

#[test]
fn full_document_keeps_every_node_kind() {
    let doc = load(
        r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<!DOCTYPE catalog>
<?xml-stylesheet href="style.css"?>
<!-- inventory -->
<cat:catalog xmlns:cat="urn:catalog">
  <cat:book id="7" available="true">
    <cat:title>Rust</cat:title>
    <cat:price>29.5</cat:price>
  </cat:book>
</cat:catalog>"#,
    );

    assert_eq!(doc.standalone, "no");
    let kinds: Vec<_> = doc
        .root()
        .children()
        .map(|n| match n.kind() {
            NodeKind::Root => "root",
            NodeKind::Directive(_) => "directive",
            NodeKind::ProcessingInstruction { .. } => "pi",
            NodeKind::Comment(_) => "comment",
            NodeKind::Element { .. } => "element",
        })
        .collect();
    assert_eq!(kinds, vec!["directive", "pi", "comment", "element"]);

    let book = doc.select_node("cat", "book").expect("book exists");
    assert_eq!(book.attribute_as::<i32>("", "id"), 7);
    assert!(book.attribute_bool("", "available"));
    assert_eq!(book.value_of("cat", "title"), "Rust");
    assert_eq!(doc.tree().value_as::<f64>(book.id(), "cat", "price"), 29.5);
    assert_eq!(doc.tree().value_as::<i32>(book.id(), "cat", "title"), 0);

    insta::assert_snapshot!(doc.to_string(), @r#"<?xml version="1.0" encoding="utf-8" standalone="no"?><!DOCTYPE catalog!><?xml-stylesheet href="style.css"?><!-- inventory --><cat:catalog xmlns:cat="urn:catalog"><cat:book id="7" available="true"><cat:title>Rust</cat:title><cat:price>29.5</cat:price></cat:book></cat:catalog>"#);
}

#[test]
fn mixed_content_keeps_last_text_run() {
    let mut doc = load("<p>Hello <b>big</b> world</p>");
    doc.save_declaration = false;
    assert_eq!(doc.select_node("", "p").unwrap().value(), "world");
    assert_eq!(doc.save_string(), "<p><b>big</b>world</p>");
}

#[test]
fn wildcard_search_matches_any_element() {
    let doc = load("<r><x:a/><b><c/></b><!-- not an element --></r>");
    let shallow: Vec<_> = doc
        .select_nodes("*", "*")
        .iter()
        .map(|n| n.name().map(ToString::to_string).unwrap_or_default())
        .collect();
    assert_eq!(shallow, vec!["r"]);

    let recursive: Vec<_> = doc
        .select_nodes_recursive("*", "*")
        .iter()
        .map(|n| n.name().map(ToString::to_string).unwrap_or_default())
        .collect();
    assert_eq!(recursive, vec!["r", "x:a", "b", "c"]);

    let unprefixed = doc.select_nodes_recursive("", "*");
    assert_eq!(unprefixed.len(), 3);
}

#[test]
fn custom_and_extended_entities_resolve() {
    let config = TreeConfig::from_json_str(
        r#"{ "load": { "extendedEntities": true, "entities": { "brand": "Quarto" } } }"#,
    )
    .unwrap();
    let mut doc = Document::with_config(&config);
    doc.load_str(r#"<r label="&brand;&trade;">&copy; &brand;</r>"#)
        .unwrap();
    let r = doc.select_node("", "r").unwrap();
    assert_eq!(r.attribute("", "label"), Some("Quarto\u{2122}"));
    assert_eq!(r.value(), "\u{a9} Quarto");
}

#[test]
fn unknown_entity_is_a_syntax_error() {
    let mut doc = Document::new();
    let err = doc.load_str("<r>&copy;</r>").unwrap_err();
    assert!(matches!(err, Error::XmlSyntax { .. }), "{err}");
}

#[test]
fn permissive_mode_tolerates_unbalanced_markup() {
    let mut doc = load("<a></a></b><c/>");
    doc.save_declaration = false;
    assert_eq!(doc.save_string(), "<a />");

    let mut doc = load("<a><b>");
    doc.save_declaration = false;
    assert_eq!(doc.save_string(), "<a><b /></a>");
}

#[test]
fn strict_mode_rejects_unbalanced_markup() {
    let mut doc = Document::new();
    doc.strict = true;

    let err = doc.load_str("<a></a></b>").unwrap_err();
    assert!(matches!(err, Error::UnexpectedEndTag { .. } | Error::XmlSyntax { .. }));

    let err = doc.load_str("<a><b></b>").unwrap_err();
    assert!(matches!(err, Error::UnclosedElement { ref name } if name == "a"));

    let err = doc.load_str("<a></b>").unwrap_err();
    assert!(matches!(err, Error::XmlSyntax { .. }));

    assert!(doc.tree().is_empty());
}

#[test]
fn indented_output_reloads_to_the_same_document() {
    let source = r#"<?xml version="1.0" standalone="no"?><!-- c --><a k="v"><b>one</b><c><d/></c>tail</a>"#;
    let mut doc = load(source);
    let compact = doc.save_string();

    doc.indent = Some("\t".to_string());
    let indented = doc.save_string();
    assert_eq!(
        indented,
        "<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>\n\
         <!-- c -->\n\
         <a k=\"v\">\n\
         \t<b>one</b>\n\
         \t<c>\n\
         \t\t<d />\n\
         \t</c>\n\
         \ttail\n\
         </a>\n"
    );

    let reloaded = load(&indented);
    assert_eq!(reloaded.save_string(), compact);
}

#[test]
fn file_wrappers_round_trip() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let input = temp.path().join("in.xml");
    let output = temp.path().join("out.xml");
    std::fs::write(&input, "<list><item n=\"1\"/><item n=\"2\"/></list>").unwrap();

    let mut doc = Document::new();
    doc.load_file(&input).unwrap();
    doc.save_file(&output).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?><list><item n="1" /><item n="2" /></list>"#
    );

    let mut again = Document::new();
    again.load_reader(std::fs::File::open(&output).unwrap()).unwrap();
    assert_eq!(again.select_nodes("", "item").len(), 2);
}

#[test]
fn save_writer_matches_save_string() {
    let doc = load("<a>x</a>");
    let mut buffer = Vec::new();
    doc.save_writer(&mut buffer).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), doc.save_string());
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let mut doc = Document::new();
    let err = doc.load_file(temp.path().join("absent.xml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn documents_can_be_read_from_several_threads() {
    let doc = load("<r><a>1</a><a>2</a><a>3</a></r>");
    let totals: Vec<i64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    doc.select_nodes_recursive("", "a")
                        .iter()
                        .map(|a| a.value().parse::<i64>().unwrap_or_default())
                        .sum()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(totals, vec![6; 4]);
}

#[test]
fn deeply_nested_document_saves() {
    let depth = 100_000;
    let source = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
    let mut doc = load(&source);
    doc.save_declaration = false;
    assert_eq!(doc.tree().len(), depth + 1);

    let expected = format!("{}<a />{}", "<a>".repeat(depth - 1), "</a>".repeat(depth - 1));
    let saved = doc.save_string();
    assert!(saved == expected, "deep document did not round trip");
    assert!(doc.to_string() == expected);

    let half = depth / 2;
    let middle = doc.select_nodes_recursive("", "a")[half];
    let subtree = format!("{}<a />{}", "<a>".repeat(half - 1), "</a>".repeat(half - 1));
    assert!(middle.to_string() == subtree);
}

#[derive(Debug, PartialEq, Deserialize)]
struct Book {
    #[serde(rename = "@id")]
    id: u32,
    title: String,
    price: f64,
}

#[derive(Debug, PartialEq, Deserialize)]
struct Shelf {
    book: Vec<Book>,
}

#[test]
fn subtrees_unmarshal_into_typed_values() {
    let doc = load(
        r#"<?xml version="1.0"?>
<shelf>
  <book id="7"><title>Rust</title><price>29.5</price></book>
  <book id="8"><title>Go</title><price>20</price></book>
</shelf>"#,
    );

    let second = doc.select_nodes("", "book")[1];
    let book: Book = second.unmarshal().unwrap();
    assert_eq!(
        book,
        Book {
            id: 8,
            title: "Go".to_string(),
            price: 20.0,
        }
    );

    let shelf: Shelf = doc.select_node("", "shelf").unwrap().unmarshal().unwrap();
    assert_eq!(shelf.book.len(), 2);
    assert_eq!(shelf.book[0].title, "Rust");

    let title = doc.select_node("", "title").unwrap();
    let err = title.unmarshal::<Book>().unwrap_err();
    assert!(matches!(err, Error::Unmarshal(_)), "{err}");
}

#[test]
fn colon_at_name_edges_is_part_of_the_local_name() {
    let mut doc = load("<r><x:>v</x:></r>");
    doc.save_declaration = false;
    let x = doc.select_node("", "x:").expect("x: is an unprefixed name");
    assert_eq!(x.value(), "v");
    assert!(doc.select_node("x", WILDCARD).is_none());
    assert_eq!(doc.save_string(), "<r><x:>v</x:></r>");
}

#[test]
fn document_is_empty_after_removing_every_top_level_node() {
    let mut doc = load("<!-- c --><a><b/></a>");
    assert!(!doc.tree().is_empty());

    let root = doc.tree().root();
    let top: Vec<_> = doc.tree().children(root).to_vec();
    for id in top {
        doc.tree_mut().remove_child(root, id);
    }
    assert!(doc.tree().is_empty());

    doc.save_declaration = false;
    assert_eq!(doc.save_string(), "");
}
